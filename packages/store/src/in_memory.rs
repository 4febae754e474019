//! In-memory bucket store.
//!
//! Keeps the whole tree in a `BTreeMap`, which gives the same byte ordering
//! as the on-disk store. Used to test path resolution and commands without
//! touching the filesystem.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;

use crate::traits::{format_segments, join_relative};
use crate::{Bucket, Error, Transaction};

type Children = BTreeMap<Vec<u8>, Node>;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Node {
    Value(Vec<u8>),
    Bucket(Children),
}

/// The committed state of an in-memory store.
///
/// # Example
///
/// ```rust
/// use thunder_store::{Bucket, MemoryStore, Transaction};
///
/// let store = MemoryStore::new();
/// let tx = store.begin();
/// tx.root().put(b"name", b"Alice").unwrap();
/// tx.commit().unwrap();
///
/// let tx = store.begin();
/// assert_eq!(tx.root().get(b"name").unwrap(), b"Alice");
/// ```
#[derive(Debug, Default)]
pub struct MemoryStore {
    committed: RefCell<Children>,
}

impl MemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin a transaction working on a private copy of the committed tree.
    pub fn begin(&self) -> MemoryTransaction<'_> {
        MemoryTransaction {
            store: self,
            working: RefCell::new(self.committed.borrow().clone()),
        }
    }
}

/// A transaction over a [`MemoryStore`].
pub struct MemoryTransaction<'s> {
    store: &'s MemoryStore,
    working: RefCell<Children>,
}

impl<'s> Transaction for MemoryTransaction<'s> {
    type View<'tx>
        = MemoryBucket<'tx>
    where
        Self: 'tx;

    fn root(&self) -> MemoryBucket<'_> {
        MemoryBucket {
            tree: &self.working,
            path: Vec::new(),
        }
    }

    fn commit(self) -> Result<(), Error> {
        *self.store.committed.borrow_mut() = self.working.into_inner();
        Ok(())
    }

    fn rollback(self) -> Result<(), Error> {
        Ok(())
    }
}

/// A bucket view into a [`MemoryTransaction`].
#[derive(Clone)]
pub struct MemoryBucket<'tx> {
    tree: &'tx RefCell<Children>,
    path: Vec<Vec<u8>>,
}

impl<'tx> MemoryBucket<'tx> {
    fn with_children<R>(&self, f: impl FnOnce(&Children) -> Result<R, Error>) -> Result<R, Error> {
        let tree = self.tree.borrow();
        let mut children = &*tree;
        for segment in &self.path {
            match children.get(segment) {
                Some(Node::Bucket(inner)) => children = inner,
                _ => return Err(Error::not_found(segment)),
            }
        }
        f(children)
    }

    fn with_children_mut<R>(
        &self,
        f: impl FnOnce(&mut Children) -> Result<R, Error>,
    ) -> Result<R, Error> {
        let mut tree = self.tree.borrow_mut();
        let mut children = &mut *tree;
        for segment in &self.path {
            match children.get_mut(segment) {
                Some(Node::Bucket(inner)) => children = inner,
                _ => return Err(Error::not_found(segment)),
            }
        }
        f(children)
    }
}

fn collect_buckets(children: &Children, prefix: &[u8], out: &mut Vec<Vec<u8>>) {
    for (name, node) in children {
        if let Node::Bucket(inner) = node {
            let relative = join_relative(prefix, name);
            out.push(relative.clone());
            collect_buckets(inner, &relative, out);
        }
    }
}

impl<'tx> Bucket for MemoryBucket<'tx> {
    fn name(&self) -> &[u8] {
        self.path.last().map(Vec::as_slice).unwrap_or(&[])
    }

    fn cd(&self, name: &[u8]) -> Result<Self, Error> {
        self.with_children(|children| match children.get(name) {
            Some(Node::Bucket(_)) => Ok(()),
            _ => Err(Error::not_found(name)),
        })?;
        let mut path = self.path.clone();
        path.push(name.to_vec());
        Ok(MemoryBucket {
            tree: self.tree,
            path,
        })
    }

    fn prev(&self) -> Option<Self> {
        let (_, parent) = self.path.split_last()?;
        Some(MemoryBucket {
            tree: self.tree,
            path: parent.to_vec(),
        })
    }

    fn list(&self) -> Result<Vec<Vec<u8>>, Error> {
        self.with_children(|children| Ok(children.keys().cloned().collect()))
    }

    fn get(&self, key: &[u8]) -> Result<Vec<u8>, Error> {
        self.with_children(|children| match children.get(key) {
            Some(Node::Value(value)) => Ok(value.clone()),
            _ => Err(Error::not_found(key)),
        })
    }

    fn put(&self, key: &[u8], value: &[u8]) -> Result<(), Error> {
        if key.is_empty() {
            return Err(Error::KeyRequired);
        }
        self.with_children_mut(|children| {
            if let Some(Node::Bucket(_)) = children.get(key) {
                return Err(Error::incompatible_value(key));
            }
            children.insert(key.to_vec(), Node::Value(value.to_vec()));
            Ok(())
        })
    }

    fn mkdir(&self, name: &[u8]) -> Result<(), Error> {
        if name.is_empty() {
            return Err(Error::KeyRequired);
        }
        self.with_children_mut(|children| {
            if children.contains_key(name) {
                return Err(Error::already_exists(name));
            }
            children.insert(name.to_vec(), Node::Bucket(Children::new()));
            Ok(())
        })
    }

    fn rm(&self, name: &[u8]) -> Result<(), Error> {
        self.with_children_mut(|children| {
            children
                .remove(name)
                .map(|_| ())
                .ok_or_else(|| Error::not_found(name))
        })
    }

    fn buckets(&self, direct_only: bool) -> Result<Vec<Vec<u8>>, Error> {
        self.with_children(|children| {
            if direct_only {
                return Ok(children
                    .iter()
                    .filter(|(_, node)| matches!(node, Node::Bucket(_)))
                    .map(|(name, _)| name.clone())
                    .collect());
            }
            let mut out = Vec::new();
            collect_buckets(children, &[], &mut out);
            Ok(out)
        })
    }
}

impl fmt::Display for MemoryBucket<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        format_segments(f, &self.path)
    }
}

impl fmt::Debug for MemoryBucket<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MemoryBucket({})", self)
    }
}
