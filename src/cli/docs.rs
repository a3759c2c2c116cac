//! Documentation content for the hypeql CLI

use super::CliError;

/// Available documentation categories
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocCategory {
    Syntax,
    Arguments,
    Errors,
}

impl DocCategory {
    /// Parse category name from string
    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "syntax" | "selections" => Some(Self::Syntax),
            "arguments" | "args" => Some(Self::Arguments),
            "errors" | "error" => Some(Self::Errors),
            _ => None,
        }
    }
}

/// Get the docs overview (category listing)
pub fn get_docs_overview() -> &'static str {
    r#"HYPEQL DOCUMENTATION

hypeql asks a data graph for exactly the fields you need. A query is a set of
field names in curly braces; fields that hold lists of objects take their own
nested set.

DOCUMENTATION CATEGORIES

  syntax            Selections, separators, nesting and comments
  arguments         Passing integers and strings to list fields
  errors            What fails, and how failures are reported

QUICK REFERENCE

  { a, b }          Two scalar fields
  list { a }        A list field and the fields of each element
  list(p: 1) { a }  Arguments for a list field
  # text            Comment until end of line

Run 'hypeql doc <category>' for detailed documentation.
"#
}

/// Get documentation for a specific category
pub fn get_doc_category(name: &str) -> Result<&'static str, CliError> {
    match DocCategory::from_name(name) {
        Some(DocCategory::Syntax) => Ok(SYNTAX_DOC),
        Some(DocCategory::Arguments) => Ok(ARGUMENTS_DOC),
        Some(DocCategory::Errors) => Ok(ERRORS_DOC),
        None => Err(CliError::UnknownCategory(name.to_string())),
    }
}

const SYNTAX_DOC: &str = r#"SYNTAX

SELECTIONS
----------
A query is a set of selections between curly braces. Spaces, newlines and
commas all separate selections, so these are the same query:

  {version,isBeta,films{name}}

  {
      version
      isBeta
      films {
          name
      }
  }

The outer braces may be left out.

NESTING
-------
A field that holds a list of objects must be followed by a block. The block
is applied to every element of the list and may be empty:

  films { name, comments { text } }
  films {}

COMMENTS
--------
'#' starts a comment that runs to the end of the line:

  {
      version   # the API version
      films { name }
  }

DUPLICATES
----------
Asking for the same field twice at one level returns it once.
"#;

const ARGUMENTS_DOC: &str = r#"ARGUMENTS

List fields accept arguments in parentheses, between the field name and its
block:

  films(p: 2) { name }
  films(count: 5, sort: "year") { name, releaseYear }

VALUES
------
  42          Integer (bare digits, optional leading '-')
  "42"        String (quoted, even when it contains only digits)
  "a\"b"      Escaped quote
  "a\\b"      Escaped backslash
  "line\nend" Newline
  "ab""cd"    Adjacent quoted parts are joined: "abcd"

RULES
-----
  - An argument list must stay on one line.
  - Each key may appear once.
  - '#' does not start a comment inside parentheses.
"#;

const ERRORS_DOC: &str = r#"ERRORS

PARSE ERRORS
------------
Reported with the line and column where they were found:

  - a '{' that is never closed
  - a '(' that is never closed, or a newline before its ')'
  - an argument value that is neither an integer nor a quoted string
  - arguments without a following block
  - nesting deeper than the configured limit (--max-depth)

EXECUTION ERRORS
----------------
Reported with the dotted path of the field:

  films.rating not found          no such scalar field
  films.reviews field not found   no such list field

A failing data source aborts the whole query; no partial result is returned.
With --legacy-errors, failures are printed as {"errors": ["..."]}.
"#;
