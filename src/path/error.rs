//! Error types for path compilation and walking.

/// Errors that can occur while compiling a path expression.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompileError {
    /// Delimiters or required parts are missing or malformed.
    #[error("Malformed path at '{fragment}': {reason}")]
    MalformedPath { fragment: String, reason: String },

    /// An alternation appears before the final segment.
    #[error("Alternation must be in the last segment of the path: '{fragment}'")]
    MisplacedAlternation { fragment: String },

    /// An alternation sub-path contains another alternation.
    #[error("Alternation cannot contain another alternation: '{fragment}'")]
    NestedAlternation { fragment: String },

    /// An alternation sub-path contains a mapping wildcard.
    #[error("Alternation cannot contain a mapping wildcard: '{fragment}'")]
    DictIterInAlternation { fragment: String },

    /// An alternation sub-path contains a wildcard or open-ended index.
    #[error("Alternation requires explicit index bounds: '{fragment}'")]
    UnboundedIndexInAlternation { fragment: String },

    /// A default names a type that is not int, str, float, bool, list or dict.
    #[error("Unknown default type '{type_name}' in '{fragment}'")]
    UnknownDefaultType { type_name: String, fragment: String },

    /// A list or dict default is not a literal of that shape.
    #[error("Invalid {kind} literal in '{fragment}': {message}")]
    InvalidDefaultLiteral {
        kind: &'static str,
        fragment: String,
        message: String,
    },
}

impl CompileError {
    pub(crate) fn malformed(fragment: &str, reason: impl Into<String>) -> Self {
        CompileError::MalformedPath {
            fragment: fragment.to_string(),
            reason: reason.into(),
        }
    }
}

/// Errors that can occur while walking a tree.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WalkError {
    /// The path text given to the walk did not compile.
    #[error(transparent)]
    Compile(#[from] CompileError),

    /// An index was applied to something other than a sequence.
    #[error("Index '{index}' can only be used on a list, found {found}")]
    NonSequenceIndex { index: String, found: &'static str },
}
