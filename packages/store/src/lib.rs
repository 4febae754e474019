//! # thunder-store
//!
//! Hierarchical, transactional key-value storage seen as a tree of buckets.
//!
//! - [`Bucket`]: one namespace level holding keys and child buckets
//! - [`Transaction`]: the read-write transaction every bucket view borrows
//! - [`travel`] / [`parse_key_path`]: turn `a/../b/key` style paths into
//!   buckets and key names
//! - [`RedbStore`]: the on-disk store, backed by redb
//! - [`MemoryStore`]: an in-memory store with the same semantics
//!
//! # Example
//!
//! ```rust
//! use thunder_store::{parse_key_path, Bucket, MemoryStore, Transaction};
//!
//! let store = MemoryStore::new();
//! let tx = store.begin();
//! let root = tx.root();
//! root.mkdir(b"users").unwrap();
//!
//! let (bucket, key) = parse_key_path(&root, "users/alice").unwrap();
//! bucket.put(key.as_bytes(), b"{\"age\": 30}").unwrap();
//! assert_eq!(bucket.to_string(), "/users");
//! ```

mod error;
pub mod in_memory;
mod key_codec;
mod path;
pub mod redb_store;
mod traits;

pub use error::{DisplayName, Error};
pub use in_memory::{MemoryBucket, MemoryStore, MemoryTransaction};
pub use path::{is_printable, parse_key_path, printable_list, travel, Stranded};
pub use redb_store::{RedbBucket, RedbStore, RedbTransaction, DEFAULT_LOCK_TIMEOUT};
pub use traits::{Bucket, Transaction};
