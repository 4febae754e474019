//! Error types for JSON pointer lookups and patch application.

/// Why a single patch operation could not be applied.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum OpFailure {
    #[error("path '{0}' does not exist")]
    PathNotFound(String),

    #[error("'{0}' is not a valid array index here")]
    InvalidIndex(String),

    #[error("cannot address a child of a scalar at '{0}'")]
    InvalidTarget(String),

    #[error("cannot remove the document root")]
    RemoveRoot,

    #[error("cannot move '{from}' into its own child '{path}'")]
    MoveIntoChild { from: String, path: String },

    #[error("test failed: value at '{0}' differs")]
    TestFailed(String),

    #[error(transparent)]
    Pointer(#[from] PointerError),
}

/// A malformed RFC 6901 pointer.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PointerError {
    #[error("JSON pointer '{0}' must be empty or start with '/'")]
    MissingSlash(String),

    #[error("JSON pointer '{0}' contains an invalid '~' escape")]
    InvalidEscape(String),
}

/// Errors from the JSON-aware bucket operations.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The patch document is not a JSON array of patch operations.
    #[error("invalid JSON patch: {0}")]
    InvalidPatch(#[source] serde_json::Error),

    /// The value spliced into a synthesized `add` patch is not valid JSON.
    #[error("synthesized patch {patch} is not valid JSON (string values need their own quotes): {source}")]
    InvalidSplice {
        patch: String,
        #[source]
        source: serde_json::Error,
    },

    /// The stored value could not be decoded as JSON.
    #[error("stored value is not JSON: {0}")]
    NotJson(#[source] serde_json::Error),

    #[error(transparent)]
    Pointer(#[from] PointerError),

    /// The pointer is well formed but addresses nothing.
    #[error("JSON pointer '{0}' not found")]
    PointerNotFound(String),

    /// Operation `index` of the patch failed; nothing was written.
    #[error("patch operation {index} ({op}) failed: {reason}")]
    Operation {
        index: usize,
        op: &'static str,
        reason: OpFailure,
    },

    #[error("failed to encode JSON: {0}")]
    Encode(#[source] serde_json::Error),

    #[error(transparent)]
    Store(#[from] thunder_store::Error),
}
