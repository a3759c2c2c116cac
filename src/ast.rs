//! # hypeql - Abstract Syntax Tree
//!
//! This module defines the tree a query is parsed into and the executor walks.
//!
//! ## Architecture Overview
//!
//! - **[selection]** - [`Selection`], one requested field (a leaf or a branch)
//! - **[arguments]** - [`Arguments`] and [`ArgumentValue`] attached to branches
//!
//! ## Quick Start
//!
//! ```text
//! {
//!     version
//!     films(p: 2) {
//!         name
//!         comments { username, text }
//!     }
//! }
//! ```
//!
//! parses into
//!
//! ```text
//! Leaf("version")
//! Branch { name: "films", arguments: {p: 2}, selections: [
//!     Leaf("name"),
//!     Branch { name: "comments", arguments: {}, selections: [Leaf("username"), Leaf("text")] },
//! ] }
//! ```
//!
//! ## Core Concepts
//!
//! ### Leaves and Branches
//!
//! A **leaf** asks for a scalar field. A **branch** asks for a collection
//! field and carries the selection set applied to every element of that
//! collection. The selection set of a branch may be empty, in which case each
//! element contributes an empty object.
//!
//! ### Arguments
//!
//! Branches can carry `key: value` arguments. Values are either integers or
//! strings; nothing else is representable. The executor hands them to the
//! collection resolver untouched.
//!
//! ### Duplicates
//!
//! The parser keeps repeated selections in order. Deduplication happens at
//! execution time, where the first occurrence of a name wins.
//!
//! ## Building a tree by hand
//!
//! ```
//! use hypeql::{ArgumentValue, Arguments, Selection};
//!
//! let query = vec![
//!     Selection::leaf("version"),
//!     Selection::branch("films", vec![Selection::leaf("name")])
//!         .with_arguments(Arguments::from([("p".to_string(), ArgumentValue::Int(2))])),
//! ];
//! assert_eq!(query[1].name(), "films");
//! ```
pub mod arguments;
pub mod selection;

pub use arguments::{ArgumentValue, Arguments};
pub use selection::Selection;
