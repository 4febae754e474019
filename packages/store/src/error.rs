//! Error types for bucket operations.

use std::fmt;

/// A bucket or key name rendered for messages.
///
/// Names are raw bytes; anything that is not UTF-8 is shown lossily.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayName(pub Vec<u8>);

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.0))
    }
}

impl From<&[u8]> for DisplayName {
    fn from(name: &[u8]) -> Self {
        DisplayName(name.to_vec())
    }
}

/// Errors returned by [`Bucket`](crate::Bucket) and
/// [`Transaction`](crate::Transaction) implementations.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// No bucket or key exists under this name.
    #[error("'{name}' not found")]
    NotFound { name: DisplayName },

    /// `mkdir` collided with an existing key or bucket.
    #[error("'{name}' already exists")]
    AlreadyExists { name: DisplayName },

    /// A value was written onto a name that holds a bucket.
    #[error("'{name}' is a bucket, not a key")]
    IncompatibleValue { name: DisplayName },

    /// An empty key or bucket name was given.
    #[error("key required")]
    KeyRequired,

    /// Failure inside the underlying store engine.
    #[error("storage error: {0}")]
    Storage(#[from] redb::Error),
}

impl Error {
    pub fn not_found(name: &[u8]) -> Self {
        Error::NotFound { name: name.into() }
    }

    pub fn already_exists(name: &[u8]) -> Self {
        Error::AlreadyExists { name: name.into() }
    }

    pub fn incompatible_value(name: &[u8]) -> Self {
        Error::IncompatibleValue { name: name.into() }
    }

    /// True for the "nothing at this name" family, which commands report
    /// without ending the session.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }
}

impl From<redb::StorageError> for Error {
    fn from(e: redb::StorageError) -> Self {
        Error::Storage(e.into())
    }
}

impl From<redb::TableError> for Error {
    fn from(e: redb::TableError) -> Self {
        Error::Storage(e.into())
    }
}

impl From<redb::TransactionError> for Error {
    fn from(e: redb::TransactionError) -> Self {
        Error::Storage(e.into())
    }
}

impl From<redb::CommitError> for Error {
    fn from(e: redb::CommitError) -> Self {
        Error::Storage(e.into())
    }
}

impl From<redb::DatabaseError> for Error {
    fn from(e: redb::DatabaseError) -> Self {
        Error::Storage(e.into())
    }
}
