use crate::settings::ValueKind;

/// Errors surfaced by declaration, parsing, and checked lookups.
///
/// Soft validation failures (a required argument that never appeared, a
/// multi-value argument under its minimum count) are not errors: they only turn
/// the verdict returned by `parse` to `false`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ArgError {
    /// A long name or short alias that was never declared.
    #[error("unknown argument: {0}")]
    UnknownArgument(String),
    /// A token that should hold an integer does not parse as one.
    #[error("invalid integer '{value}' for argument '{name}'")]
    InvalidInt { name: String, value: String },
    /// A typed accessor or binding that does not match the declared kind.
    #[error("argument '{name}' holds {actual} values, not {expected}")]
    KindMismatch {
        name: String,
        expected: ValueKind,
        actual: ValueKind,
    },
    /// No stored value and no default at the requested position.
    #[error("argument '{name}' has no value at index {index}")]
    MissingValue { name: String, index: usize },
    /// Builder misuse, reported by the next `parse` call.
    #[error("declaration error: {0}")]
    Declaration(String),
}

pub type Result<T> = std::result::Result<T, ArgError>;
