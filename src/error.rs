use thiserror::Error;

/// Error structure representing the failure scenarios of a deparse call.
///
/// Every variant aborts the whole in-progress object tree; a caller never sees
/// a partially built document.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    #[error("Object name not found in format string: {0:?}")]
    MalformedTemplate(String),
    #[error("Invalid object tree element type: {0}")]
    InvalidKind(String),
    #[error("Cache lookup failed for {0}")]
    CatalogLookup(String),
    #[error("Unexpected {0}")]
    Unexpected(String),
    #[error("ALTER TABLE command using volatile function cannot be replicated")]
    VolatileFunction,
    #[error("Object tree nesting exceeds the maximum depth of {0}")]
    DepthExceeded(usize),
    #[error("Error serializing object tree: {0}")]
    Serialize(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialize(err.to_string())
    }
}

/// Convenient Result alias for returning `pg_ddl_deparse::Error`.
pub type Result<T> = core::result::Result<T, Error>;
