use json_subtypes::ResolveError;
use thiserror::Error;

/// Errors while materializing a polymorphic value.
#[derive(Debug, Error)]
pub enum DeError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("no materializer registered for `{ty}`")]
    NotMaterializable { ty: String },
    #[error("polymorphic values nested deeper than {limit}")]
    DepthExceeded { limit: usize },
}

impl DeError {
    /// The resolution error behind this failure, if any.
    pub fn as_resolve(&self) -> Option<&ResolveError> {
        match self {
            Self::Resolve(err) => Some(err),
            _ => None,
        }
    }
}
