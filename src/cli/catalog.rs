//! Demo data graph served by `hypeql check`: a catalog of films, each with
//! comments. Names, descriptions and release years are derived from the
//! `seed` context key so that one seed always yields the same catalog.

use std::sync::LazyLock;

use crate::{Arguments, BoxError, Context, FieldTable, Object, Resolution, Value};

const PART_SUFFIXES: [&str; 6] = [
    "A spider under the bed",
    "Spider vs. fly",
    "The most epic movie",
    "New enemy",
    "Epic battle",
    "Tasty fly",
];

const DESCRIPTIONS: [&str; 3] = [
    "Epic movie about spiderman, part {part}",
    "The city is in danger (again) and spiderman will save it (again)",
    "Cool movie about a cool superhero",
];

/// Upper bound for `films(count: n)`.
pub const MAX_FILM_COUNT: i64 = 100;

/// Stable pseudo-random pick in `0..len` for a film and a seed.
fn pick(seed: i64, film: i64, salt: u64, len: usize) -> usize {
    let mut x = (seed as u64) ^ ((film as u64).wrapping_add(1) << 16) ^ salt;
    x = x.wrapping_mul(0x9E37_79B9_7F4A_7C15);
    x ^= x >> 29;
    (x % len as u64) as usize
}

fn seed(ctx: &Context) -> i64 {
    ctx.get("seed").and_then(Value::as_int).unwrap_or_default()
}

/// Root of the demo graph.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub films: Vec<Film>,
}

impl Catalog {
    pub fn new(count: i64) -> Self {
        Catalog {
            films: (0..count).map(Film::new).collect(),
        }
    }

    /// `films(p: 3)` selects the third part; `films(count: n)` lists n parts,
    /// at most [`MAX_FILM_COUNT`]. Parts below 1 are rejected by the film's
    /// prefetch hook.
    fn resolve_films(&self, _ctx: &mut Context, args: &Arguments) -> Resolution<Vec<Film>> {
        if let Some(part) = args.get("p").and_then(|v| v.as_int()) {
            return Resolution::Override(vec![Film::new(part.saturating_sub(1))]);
        }
        if let Some(count) = args.get("count").and_then(|v| v.as_int()) {
            let count = count.clamp(0, MAX_FILM_COUNT);
            return Resolution::Override((0..count).map(Film::new).collect());
        }
        Resolution::UseDefault
    }
}

impl Object for Catalog {
    fn field_table() -> &'static FieldTable<Self> {
        static TABLE: LazyLock<FieldTable<Catalog>> = LazyLock::new(|| {
            FieldTable::<Catalog>::builder()
                .collection_with("films", |c| c.films.as_slice(), Catalog::resolve_films)
                .build()
        });
        &TABLE
    }
}

#[derive(Debug, Clone, Default)]
pub struct Film {
    pub id: i64,
    pub comments: Vec<Comment>,
}

impl Film {
    pub fn new(id: i64) -> Self {
        Film {
            id,
            comments: Vec::new(),
        }
    }

    fn key(&self) -> String {
        format!("film:{}", self.id)
    }

    /// Stands in for a database round-trip: computes every requested detail
    /// of this film once and stashes it in the context.
    fn prefetch(&self, ctx: &mut Context, requested: &[&str]) -> Result<(), BoxError> {
        if self.id < 0 {
            return Err(format!("film part {} does not exist", self.id.saturating_add(1)).into());
        }

        let seed = seed(ctx);
        let part = self.id + 1;
        for field in requested {
            let value = match *field {
                "name" => Value::from(format!(
                    "Spiderman {}. {}",
                    part,
                    PART_SUFFIXES[pick(seed, self.id, 1, PART_SUFFIXES.len())]
                )),
                "description" => Value::from(
                    DESCRIPTIONS[pick(seed, self.id, 2, DESCRIPTIONS.len())]
                        .replace("{part}", &part.to_string()),
                ),
                "releaseYear" => Value::from(1990 + pick(seed, self.id, 3, 35) as i64),
                _ => continue,
            };
            ctx.insert(format!("{}:{}", self.key(), field), value);
        }
        Ok(())
    }

    fn prefetched(&self, ctx: &Context, field: &str) -> Resolution<Value> {
        match ctx.get(&format!("{}:{}", self.key(), field)) {
            Some(value) => Resolution::Override(value.clone()),
            None => Resolution::UseDefault,
        }
    }

    fn resolve_name(&self, ctx: &mut Context) -> Resolution<Value> {
        self.prefetched(ctx, "name")
    }

    fn resolve_description(&self, ctx: &mut Context) -> Resolution<Value> {
        self.prefetched(ctx, "description")
    }

    fn resolve_release_year(&self, ctx: &mut Context) -> Resolution<Value> {
        self.prefetched(ctx, "releaseYear")
    }

    fn resolve_comments(&self, _ctx: &mut Context, _args: &Arguments) -> Resolution<Vec<Comment>> {
        Resolution::Override(vec![
            Comment {
                username: "Spiderman fan".to_string(),
                text: format!("Part {} is my favourite!", self.id + 1),
            },
            Comment {
                username: "Spiderman".to_string(),
                text: "Aw, I have so many fans!".to_string(),
            },
        ])
    }
}

impl Object for Film {
    fn field_table() -> &'static FieldTable<Self> {
        static TABLE: LazyLock<FieldTable<Film>> = LazyLock::new(|| {
            FieldTable::<Film>::builder()
                .scalar("id", |f| f.id.into())
                .scalar_with("name", |_| Value::Null, Film::resolve_name)
                .scalar_with("description", |_| Value::Null, Film::resolve_description)
                .scalar_with("releaseYear", |_| Value::Null, Film::resolve_release_year)
                .collection_with("comments", |f| f.comments.as_slice(), Film::resolve_comments)
                .batch_resolve(Film::prefetch)
                .build()
        });
        &TABLE
    }
}

#[derive(Debug, Clone, Default)]
pub struct Comment {
    pub username: String,
    pub text: String,
}

impl Object for Comment {
    fn field_table() -> &'static FieldTable<Self> {
        static TABLE: LazyLock<FieldTable<Comment>> = LazyLock::new(|| {
            FieldTable::<Comment>::builder()
                .scalar("username", |c| c.username.as_str().into())
                .scalar("text", |c| c.text.as_str().into())
                .build()
        });
        &TABLE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pick_is_stable_and_in_range() {
        for film in 0..20 {
            let a = pick(42, film, 1, PART_SUFFIXES.len());
            assert_eq!(a, pick(42, film, 1, PART_SUFFIXES.len()));
            assert!(a < PART_SUFFIXES.len());
        }
    }

    #[test]
    fn test_prefetch_only_requested() {
        let mut ctx = Context::new();
        Film::new(0).prefetch(&mut ctx, &["name", "comments"]).unwrap();
        assert!(ctx.contains_key("film:0:name"));
        assert!(!ctx.contains_key("film:0:releaseYear"));
        assert_eq!(ctx.len(), 1);
    }

    #[test]
    fn test_unknown_part_fails() {
        let err = Film::new(-1).prefetch(&mut Context::new(), &["name"]).unwrap_err();
        assert_eq!(err.to_string(), "film part 0 does not exist");
    }
}
