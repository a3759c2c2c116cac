//! Query text to [`Selection`] trees.
//!
//! The parser is a single left-to-right scan over characters. There is no
//! token stream: the scanner keeps a handful of flags (inside an argument
//! list, inside a comment, inside a branch body) plus the raw text of the
//! branch body it is currently collecting. When the braces of a body balance
//! out, the interior is parsed again as a fresh selection set one level
//! deeper. Parse cost is therefore proportional to input size times nesting
//! depth, which the depth limit bounds.

mod arguments;

use std::{fmt, mem};

use tracing::debug;

use crate::{
    ast::{Arguments, Selection},
    config::{self, ParserConfig},
};
use arguments::{ArgumentScanner, Step};

/// 1-based location in the query text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn start() -> Self {
        Position { line: 1, column: 1 }
    }

    fn advance(&mut self, c: char) {
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Position::start()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// Errors that can occur while parsing query text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("the curly bracket opened at {0} is not closed")]
    UnterminatedBrace(Position),

    #[error("the argument list opened at {0} is not closed")]
    UnterminatedArguments(Position),

    #[error("argument declaration interrupted by a newline at {0}")]
    NewlineInArguments(Position),

    #[error("unexpected '}}' at {0}")]
    UnexpectedClosingBrace(Position),

    #[error("unexpected character {ch:?} at {position}")]
    UnexpectedCharacter { ch: char, position: Position },

    #[error("argument list at {0} does not follow a field name")]
    ArgumentsWithoutField(Position),

    #[error("field '{name}' at {position} has arguments but no selection block")]
    ArgumentsWithoutSelection { name: String, position: Position },

    #[error("field '{name}' declares a second argument list at {position}")]
    DuplicateArgumentList { name: String, position: Position },

    #[error("argument value without a key at {0}")]
    MissingArgumentKey(Position),

    #[error("argument '{key}' has no value at {position}")]
    MissingArgumentValue { key: String, position: Position },

    #[error("argument '{key}' is declared twice at {position}")]
    DuplicateArgument { key: String, position: Position },

    #[error("argument '{key}' at {position} has value {value:?}; expected an integer or a quoted string")]
    InvalidArgumentValue {
        key: String,
        value: String,
        position: Position,
    },

    #[error("maximum query depth of {limit} exceeded at {position}")]
    DepthLimitExceeded { limit: u64, position: Position },
}

/// Parses query text into a list of top-level selections.
///
/// # Examples
///
/// ```
/// use hypeql::{ParserConfig, QueryParser, Selection};
///
/// let parser = QueryParser::new(ParserConfig::default());
/// let query = parser.parse("{ version, films(p: 1) { name } }").unwrap();
///
/// assert_eq!(query[0], Selection::leaf("version"));
/// assert_eq!(query[1].name(), "films");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryParser {
    config: ParserConfig,
}

impl QueryParser {
    pub fn new(config: ParserConfig) -> Self {
        QueryParser { config }
    }

    pub fn config(&self) -> ParserConfig {
        self.config
    }

    /// Parses a whole query. Enclosing braces around the top level are optional.
    pub fn parse(&self, text: &str) -> Result<Vec<Selection>, ParseError> {
        let selections = self.parse_selection_set(text, Position::start(), 1)?;
        debug!(selections = selections.len(), "parsed query");
        Ok(selections)
    }

    fn parse_selection_set(
        &self,
        text: &str,
        origin: Position,
        depth: usize,
    ) -> Result<Vec<Selection>, ParseError> {
        if config::exceeds(self.config.max_depth, depth) {
            return Err(ParseError::DepthLimitExceeded {
                limit: self.config.max_depth,
                position: origin,
            });
        }

        let mut scanner = SelectionScanner::new(self, origin, depth);
        for c in text.chars() {
            scanner.feed(c)?;
        }
        scanner.finish()
    }
}

/// Raw text of a branch body, collected until its braces balance.
struct Body {
    raw: String,
    opened_at: Position,
    origin: Position,
    open_braces: usize,
    in_arguments: bool,
    in_quote: bool,
    escaped: bool,
    in_comment: bool,
}

impl Body {
    fn new(opened_at: Position, origin: Position) -> Self {
        Body {
            raw: String::new(),
            opened_at,
            origin,
            open_braces: 1,
            in_arguments: false,
            in_quote: false,
            escaped: false,
            in_comment: false,
        }
    }

    /// Returns true once the closing brace of the body has been consumed.
    /// Braces inside comments and quoted argument values do not count.
    fn push(&mut self, c: char, at: Position) -> Result<bool, ParseError> {
        if c == '\n' && self.in_arguments {
            return Err(ParseError::NewlineInArguments(at));
        }

        if self.in_comment {
            self.in_comment = c != '\n';
        } else if self.in_quote {
            if self.escaped {
                self.escaped = false;
            } else if c == '\\' {
                self.escaped = true;
            } else if c == '"' {
                self.in_quote = false;
            }
        } else if self.in_arguments {
            match c {
                '"' => self.in_quote = true,
                ')' => self.in_arguments = false,
                _ => {}
            }
        } else {
            match c {
                '#' => self.in_comment = true,
                '(' => self.in_arguments = true,
                '{' => self.open_braces += 1,
                '}' => {
                    self.open_braces -= 1;
                    if self.open_braces == 0 {
                        return Ok(true);
                    }
                }
                _ => {}
            }
        }

        self.raw.push(c);
        Ok(false)
    }
}

/// State of one selection set scan.
struct SelectionScanner<'p> {
    parser: &'p QueryParser,
    depth: usize,
    position: Position,
    selections: Vec<Selection>,

    // Field name being written and whether whitespace has ended it
    name: String,
    name_at: Position,
    name_ended: bool,

    arguments: Option<Arguments>,
    open_arguments: Option<ArgumentScanner>,
    body: Option<Body>,
    // Bare `{` that wrap this set (normally just the top-level one)
    open_sets: Vec<Position>,
    in_comment: bool,
}

impl<'p> SelectionScanner<'p> {
    fn new(parser: &'p QueryParser, origin: Position, depth: usize) -> Self {
        SelectionScanner {
            parser,
            depth,
            position: origin,
            selections: Vec::new(),
            name: String::new(),
            name_at: origin,
            name_ended: false,
            arguments: None,
            open_arguments: None,
            body: None,
            open_sets: Vec::new(),
            in_comment: false,
        }
    }

    fn feed(&mut self, c: char) -> Result<(), ParseError> {
        let at = self.position;
        self.position.advance(c);

        if let Some(body) = &mut self.body {
            if body.push(c, at)? {
                return self.close_branch();
            }
            return Ok(());
        }

        if self.in_comment {
            if c == '\n' {
                self.in_comment = false;
                self.end_name();
            }
            return Ok(());
        }

        if let Some(scanner) = &mut self.open_arguments {
            if let Step::Closed(arguments) = scanner.feed(c, at)? {
                self.open_arguments = None;
                self.arguments = Some(arguments);
            }
            return Ok(());
        }

        match c {
            '#' => {
                self.end_name();
                self.in_comment = true;
            }
            ',' => self.flush_leaf()?,
            c if c.is_whitespace() => self.end_name(),
            '(' => self.open_argument_list(at)?,
            '{' => self.open_block(at),
            '}' => self.close_set(at)?,
            ')' | ':' | '"' | '\\' => {
                return Err(ParseError::UnexpectedCharacter { ch: c, position: at });
            }
            c if c.is_control() => {
                return Err(ParseError::UnexpectedCharacter { ch: c, position: at });
            }
            c => self.push_name(c, at)?,
        }
        Ok(())
    }

    fn finish(mut self) -> Result<Vec<Selection>, ParseError> {
        if let Some(scanner) = &self.open_arguments {
            return Err(ParseError::UnterminatedArguments(scanner.opened_at()));
        }
        if let Some(body) = &self.body {
            return Err(ParseError::UnterminatedBrace(body.opened_at));
        }
        self.flush_leaf()?;
        if let Some(at) = self.open_sets.last() {
            return Err(ParseError::UnterminatedBrace(*at));
        }
        Ok(self.selections)
    }

    fn end_name(&mut self) {
        if !self.name.is_empty() {
            self.name_ended = true;
        }
    }

    fn push_name(&mut self, c: char, at: Position) -> Result<(), ParseError> {
        // A closed argument list may only be followed by its block
        if self.name_ended || self.arguments.is_some() {
            self.flush_leaf()?;
        }
        if self.name.is_empty() {
            self.name_at = at;
        }
        self.name.push(c);
        Ok(())
    }

    /// Emits the pending name as a leaf. A name that already owns an argument
    /// list can only become a branch.
    fn flush_leaf(&mut self) -> Result<(), ParseError> {
        if self.arguments.is_some() {
            return Err(ParseError::ArgumentsWithoutSelection {
                name: mem::take(&mut self.name),
                position: self.name_at,
            });
        }
        if !self.name.is_empty() {
            self.selections.push(Selection::Leaf(mem::take(&mut self.name)));
        }
        self.name_ended = false;
        Ok(())
    }

    fn open_argument_list(&mut self, at: Position) -> Result<(), ParseError> {
        if self.name.is_empty() {
            return Err(ParseError::ArgumentsWithoutField(at));
        }
        if self.arguments.is_some() {
            return Err(ParseError::DuplicateArgumentList {
                name: self.name.clone(),
                position: at,
            });
        }
        self.open_arguments = Some(ArgumentScanner::new(at));
        Ok(())
    }

    fn open_block(&mut self, at: Position) {
        if self.name.is_empty() {
            self.open_sets.push(at);
        } else {
            self.body = Some(Body::new(at, self.position));
        }
    }

    fn close_set(&mut self, at: Position) -> Result<(), ParseError> {
        self.flush_leaf()?;
        match self.open_sets.pop() {
            Some(_) => Ok(()),
            None => Err(ParseError::UnexpectedClosingBrace(at)),
        }
    }

    fn close_branch(&mut self) -> Result<(), ParseError> {
        let Some(body) = self.body.take() else {
            return Ok(());
        };
        let selections = self
            .parser
            .parse_selection_set(&body.raw, body.origin, self.depth + 1)?;

        self.selections.push(Selection::Branch {
            name: mem::take(&mut self.name),
            selections,
            arguments: self.arguments.take().unwrap_or_default(),
        });
        self.name_ended = false;
        Ok(())
    }
}
