use thiserror::Error; // Import the `Error` derive macro from the `thiserror` crate

// Every hard failure raised while compiling or applying a filter query.
// The validator never produces these; it reports problems as messages instead.
#[derive(Debug, Error)]
pub enum FqlError {
    // A dotted path did not resolve; `path` is always the full path as given
    #[error("field `{path}` does not exist on type `{model}`")]
    FieldNotFound { path: String, model: String },

    // A literal could not be parsed into the runtime type of its field
    #[error("cannot convert value `{literal}` to {target}")]
    Coercion { literal: String, target: String },

    // Contains/StartsWith/EndsWith against a field that is not a string
    #[error("string operation {op} requires a string field, but `{path}` is {actual}")]
    StringOperation {
        op: String,
        path: String,
        actual: String,
    },

    // Two operands that cannot be compared with the requested operation
    #[error("cannot apply {op} to {left} and {right}")]
    TypeMismatch {
        op: String,
        left: String,
        right: String,
    },

    // NOT is unary and has no n-ary composition
    #[error("cannot group filters using 'Not' logic")]
    InvalidGroupLogic,

    // An operation value the compiler has no builder step for
    #[error("operator type {0} has not been implemented")]
    NotImplemented(String),

    #[error("invalid sort direction `{direction}` for field `{field}`")]
    InvalidSortDirection { field: String, direction: String },

    #[error("field name cannot be empty")]
    EmptyField,

    // Malformed runtime schema document
    #[error("schema error: {0}")]
    Schema(String),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

// Type alias for results that use `FqlError` as the error type
pub type Result<T> = std::result::Result<T, FqlError>;
