use crate::ast::Arguments;

/// One requested field in a selection set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Scalar field request
    ///
    /// # Example
    /// ```text
    /// version
    /// ```
    Leaf(String),

    /// Collection field request with a nested selection set
    ///
    /// # Example
    /// ```text
    /// films(p: 2) { name }
    /// ```
    Branch {
        name: String,
        selections: Vec<Selection>,
        arguments: Arguments,
    },
}

impl Selection {
    pub fn leaf(name: impl Into<String>) -> Self {
        Selection::Leaf(name.into())
    }

    /// A branch without arguments.
    pub fn branch(name: impl Into<String>, selections: Vec<Selection>) -> Self {
        Selection::Branch {
            name: name.into(),
            selections,
            arguments: Arguments::new(),
        }
    }

    /// Replaces the arguments of a branch. Leaves are returned unchanged.
    pub fn with_arguments(self, arguments: Arguments) -> Self {
        match self {
            Selection::Branch {
                name, selections, ..
            } => Selection::Branch {
                name,
                selections,
                arguments,
            },
            leaf => leaf,
        }
    }

    /// The field name this selection asks for.
    pub fn name(&self) -> &str {
        match self {
            Selection::Leaf(name) => name,
            Selection::Branch { name, .. } => name,
        }
    }

    /// Nesting depth of this selection, counting its own level as 1.
    pub fn depth(&self) -> usize {
        match self {
            Selection::Leaf(_) => 1,
            Selection::Branch { selections, .. } => {
                1 + selections.iter().map(Selection::depth).max().unwrap_or(0)
            }
        }
    }
}
