//! Core traits: Bucket, Transaction.

use std::fmt;

use crate::Error;

/// One namespace level of a hierarchical, transactional key-value store.
///
/// A bucket holds keys (opaque byte values) and child buckets in a single
/// flat namespace per level. Bucket values are cheap views: they borrow the
/// transaction that owns the tree and carry only enough state to find their
/// own node again. None of them can outlive that transaction.
///
/// `Display` renders the canonical path from the root: `/` for the root,
/// `/a/b` below it.
pub trait Bucket: Clone + fmt::Display + Sized {
    /// This bucket's own name. Empty for the root.
    fn name(&self) -> &[u8];

    /// Enter the child bucket `name`.
    ///
    /// Fails with [`Error::NotFound`] if there is no child bucket by that
    /// name, including when `name` is a key.
    fn cd(&self, name: &[u8]) -> Result<Self, Error>;

    /// The parent bucket, or `None` at the root.
    fn prev(&self) -> Option<Self>;

    /// Names of all direct children, buckets and keys mixed, in byte order.
    fn list(&self) -> Result<Vec<Vec<u8>>, Error>;

    /// The value stored under `key`.
    ///
    /// Fails with [`Error::NotFound`] if there is no such key or the name
    /// belongs to a bucket.
    fn get(&self, key: &[u8]) -> Result<Vec<u8>, Error>;

    /// Create or overwrite `key`.
    fn put(&self, key: &[u8], value: &[u8]) -> Result<(), Error>;

    /// Create an empty child bucket.
    ///
    /// Fails with [`Error::AlreadyExists`] if a key or bucket already uses
    /// `name`.
    fn mkdir(&self, name: &[u8]) -> Result<(), Error>;

    /// Remove the key or bucket `name`. Buckets are removed with their whole
    /// subtree.
    fn rm(&self, name: &[u8]) -> Result<(), Error>;

    /// Names of child buckets in byte order.
    ///
    /// With `direct_only` this is just the immediate children. Otherwise every
    /// descendant bucket is listed as a `/`-joined path relative to this
    /// bucket, each parent ahead of its children.
    fn buckets(&self, direct_only: bool) -> Result<Vec<Vec<u8>>, Error>;

    /// Walk `prev()` up to the root.
    fn root(&self) -> Self {
        let mut current = self.clone();
        while let Some(parent) = current.prev() {
            current = parent;
        }
        current
    }
}

/// A read-write transaction owning a bucket tree.
///
/// Every [`Bucket`] view borrows its transaction, so the borrow checker
/// guarantees all views are gone before `commit` or `rollback` consume it.
pub trait Transaction {
    /// The bucket view type handed out by this transaction.
    type View<'tx>: Bucket
    where
        Self: 'tx;

    /// The root bucket of this transaction.
    fn root(&self) -> Self::View<'_>;

    /// Make every mutation made through this transaction durable.
    fn commit(self) -> Result<(), Error>;

    /// Discard every mutation made through this transaction.
    fn rollback(self) -> Result<(), Error>;
}

/// Format a bucket path from its segments.
pub(crate) fn format_segments(f: &mut fmt::Formatter<'_>, segments: &[Vec<u8>]) -> fmt::Result {
    if segments.is_empty() {
        return write!(f, "/");
    }
    for segment in segments {
        write!(f, "/{}", String::from_utf8_lossy(segment))?;
    }
    Ok(())
}

/// Join a relative descendant path.
pub(crate) fn join_relative(prefix: &[u8], name: &[u8]) -> Vec<u8> {
    if prefix.is_empty() {
        return name.to_vec();
    }
    let mut joined = Vec::with_capacity(prefix.len() + 1 + name.len());
    joined.extend_from_slice(prefix);
    joined.push(b'/');
    joined.extend_from_slice(name);
    joined
}
