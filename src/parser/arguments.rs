use std::mem;

use crate::ast::{ArgumentValue, Arguments};

use super::{ParseError, Position};

/// Outcome of feeding one character to an open argument list.
pub(super) enum Step {
    Continue,
    Closed(Arguments),
}

/// State machine for the inside of `( ... )`.
///
/// Pairs are `key: value` separated by commas. Values are bare integers or
/// double-quoted strings; adjacent quoted segments concatenate. Whitespace
/// outside quotes is insignificant and newlines are rejected outright.
pub(super) struct ArgumentScanner {
    opened_at: Position,
    arguments: Arguments,
    key: String,
    value: String,
    writing_value: bool,
    // Value contained at least one quoted segment
    quoted: bool,
    in_quote: bool,
    escaped: bool,
    // Whitespace followed a started key or bare value
    gap: bool,
}

impl ArgumentScanner {
    pub(super) fn new(opened_at: Position) -> Self {
        ArgumentScanner {
            opened_at,
            arguments: Arguments::new(),
            key: String::new(),
            value: String::new(),
            writing_value: false,
            quoted: false,
            in_quote: false,
            escaped: false,
            gap: false,
        }
    }

    pub(super) fn opened_at(&self) -> Position {
        self.opened_at
    }

    pub(super) fn feed(&mut self, c: char, at: Position) -> Result<Step, ParseError> {
        if c == '\n' {
            return Err(ParseError::NewlineInArguments(at));
        }

        if self.in_quote {
            self.feed_quoted(c);
            return Ok(Step::Continue);
        }

        match c {
            ')' => {
                self.commit(at)?;
                return Ok(Step::Closed(mem::take(&mut self.arguments)));
            }
            ',' => self.commit(at)?,
            c if c.is_whitespace() => {
                self.gap = if self.writing_value {
                    !self.quoted && !self.value.is_empty()
                } else {
                    !self.key.is_empty()
                };
            }
            ':' if !self.writing_value => {
                if self.key.is_empty() {
                    return Err(ParseError::MissingArgumentKey(at));
                }
                self.writing_value = true;
                self.gap = false;
            }
            '"' if self.writing_value => {
                if !self.quoted && !self.value.is_empty() {
                    return Err(ParseError::InvalidArgumentValue {
                        key: self.key.clone(),
                        value: format!("{}\"", self.value),
                        position: at,
                    });
                }
                self.quoted = true;
                self.in_quote = true;
            }
            c if self.writing_value => {
                if self.quoted {
                    return Err(ParseError::UnexpectedCharacter { ch: c, position: at });
                }
                // Keeps the gap so `1 2` fails integer coercion as a whole
                if mem::take(&mut self.gap) {
                    self.value.push(' ');
                }
                self.value.push(c);
            }
            c if self.gap => {
                return Err(ParseError::UnexpectedCharacter { ch: c, position: at });
            }
            c if c.is_alphanumeric() || c == '_' || c == '-' => self.key.push(c),
            c => return Err(ParseError::UnexpectedCharacter { ch: c, position: at }),
        }
        Ok(Step::Continue)
    }

    fn feed_quoted(&mut self, c: char) {
        if self.escaped {
            self.escaped = false;
            self.value.push(if c == 'n' { '\n' } else { c });
        } else if c == '\\' {
            self.escaped = true;
        } else if c == '"' {
            self.in_quote = false;
        } else {
            self.value.push(c);
        }
    }

    /// Stores the pending pair. An empty slot (as in `()` or a trailing comma)
    /// is skipped.
    fn commit(&mut self, at: Position) -> Result<(), ParseError> {
        if !self.writing_value {
            if self.key.is_empty() {
                return Ok(());
            }
            return Err(ParseError::MissingArgumentValue {
                key: mem::take(&mut self.key),
                position: at,
            });
        }

        let key = mem::take(&mut self.key);
        let raw = mem::take(&mut self.value);
        let value = if self.quoted {
            ArgumentValue::Str(raw)
        } else if raw.is_empty() {
            return Err(ParseError::MissingArgumentValue { key, position: at });
        } else {
            match raw.parse::<i64>() {
                Ok(n) => ArgumentValue::Int(n),
                Err(_) => {
                    return Err(ParseError::InvalidArgumentValue {
                        key,
                        value: raw,
                        position: at,
                    });
                }
            }
        };

        if self.arguments.contains_key(&key) {
            return Err(ParseError::DuplicateArgument { key, position: at });
        }
        self.arguments.insert(key, value);

        self.writing_value = false;
        self.quoted = false;
        self.gap = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(input: &str) -> Result<Arguments, ParseError> {
        let mut scanner = ArgumentScanner::new(Position::start());
        let mut at = Position::start();
        for c in input.chars() {
            if let Step::Closed(arguments) = scanner.feed(c, at)? {
                return Ok(arguments);
            }
            at.advance(c);
        }
        Err(ParseError::UnterminatedArguments(scanner.opened_at()))
    }

    #[test]
    fn test_int_and_string() {
        let args = scan(r#"a: 1, b: "1")"#).unwrap();
        assert_eq!(args["a"], ArgumentValue::Int(1));
        assert_eq!(args["b"], ArgumentValue::Str("1".into()));
    }

    #[test]
    fn test_negative_int() {
        let args = scan("offset: -3)").unwrap();
        assert_eq!(args["offset"], ArgumentValue::Int(-3));
    }

    #[test]
    fn test_escapes() {
        let args = scan(r#"c: "Hello\nWorld\"", d: "a\\b")"#).unwrap();
        assert_eq!(args["c"], ArgumentValue::Str("Hello\nWorld\"".into()));
        assert_eq!(args["d"], ArgumentValue::Str("a\\b".into()));
    }

    #[test]
    fn test_quoted_punctuation_is_kept() {
        let args = scan(r#"q: "(a, b): {c}")"#).unwrap();
        assert_eq!(args["q"], ArgumentValue::Str("(a, b): {c}".into()));
    }

    #[test]
    fn test_empty_and_trailing_comma() {
        assert!(scan(")").unwrap().is_empty());
        assert_eq!(scan("a: 1,)").unwrap().len(), 1);
    }

    #[test]
    fn test_bare_word_rejected() {
        assert!(matches!(
            scan("a: abc)"),
            Err(ParseError::InvalidArgumentValue { ref value, .. }) if value == "abc"
        ));
    }

    #[test]
    fn test_missing_value() {
        assert!(matches!(scan("a)"), Err(ParseError::MissingArgumentValue { .. })));
        assert!(matches!(scan("a: )"), Err(ParseError::MissingArgumentValue { .. })));
    }

    #[test]
    fn test_missing_key() {
        assert!(matches!(scan(": 1)"), Err(ParseError::MissingArgumentKey(_))));
    }

    #[test]
    fn test_duplicate_key() {
        assert!(matches!(
            scan("a: 1, a: 2)"),
            Err(ParseError::DuplicateArgument { ref key, .. }) if key == "a"
        ));
    }

    #[test]
    fn test_space_inside_bare_value() {
        assert!(matches!(
            scan("a: 1 2)"),
            Err(ParseError::InvalidArgumentValue { ref value, .. }) if value == "1 2"
        ));
        assert_eq!(scan("a : 1 , b :2 )").unwrap()["a"], ArgumentValue::Int(1));
    }

    #[test]
    fn test_space_inside_key() {
        assert!(matches!(
            scan("a b: 1)"),
            Err(ParseError::UnexpectedCharacter { ch: 'b', .. })
        ));
    }

    #[test]
    fn test_newline_rejected() {
        assert_eq!(
            scan("a: 1\n)").unwrap_err(),
            ParseError::NewlineInArguments(Position { line: 1, column: 5 })
        );
    }
}
