//! Bucket store backed by a redb database file.
//!
//! redb owns the file format, locking and transactions. Nested buckets are
//! flattened into a single table; see [`key_codec`](crate::key_codec) for
//! the key layout.

use std::fmt;
use std::path::Path;
use std::thread;
use std::time::{Duration, Instant};

use redb::{Database, DatabaseError, ReadableTable, Table, TableDefinition, WriteTransaction};

use crate::key_codec::{
    children_prefix, encode_value, entry_key, entry_name, TAG_BUCKET, TAG_VALUE,
};
use crate::traits::{format_segments, join_relative};
use crate::{Bucket, Error, Transaction};

const ENTRIES: TableDefinition<&[u8], &[u8]> = TableDefinition::new("thunder");

/// How long [`RedbStore::open`] waits for another process to release the file.
pub const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_secs(1);

const LOCK_RETRY_INTERVAL: Duration = Duration::from_millis(50);

type EntryTable<'txn> = Table<'txn, &'static [u8], &'static [u8]>;

/// An open store file.
pub struct RedbStore {
    db: Database,
}

impl RedbStore {
    /// Open the store at `path`, initialising it if the file is empty.
    ///
    /// If another process holds the file, retries until `lock_timeout` has
    /// passed.
    pub fn open(path: impl AsRef<Path>, lock_timeout: Duration) -> Result<Self, Error> {
        let path = path.as_ref();
        let deadline = Instant::now() + lock_timeout;
        loop {
            match Database::create(path) {
                Ok(db) => {
                    log::debug!("Opened {}", path.display());
                    return Ok(Self { db });
                }
                Err(DatabaseError::DatabaseAlreadyOpen) if Instant::now() < deadline => {
                    log::debug!("{} is locked, retrying...", path.display());
                    thread::sleep(LOCK_RETRY_INTERVAL);
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Begin the read-write transaction that owns every bucket view.
    pub fn begin(&self) -> Result<RedbTransaction, Error> {
        let txn = self.db.begin_write()?;
        Ok(RedbTransaction { txn })
    }
}

/// A read-write transaction on a [`RedbStore`].
pub struct RedbTransaction {
    txn: WriteTransaction,
}

impl Transaction for RedbTransaction {
    type View<'tx>
        = RedbBucket<'tx>
    where
        Self: 'tx;

    fn root(&self) -> RedbBucket<'_> {
        RedbBucket {
            txn: &self.txn,
            path: Vec::new(),
        }
    }

    fn commit(self) -> Result<(), Error> {
        self.txn.commit()?;
        log::debug!("Committed transaction");
        Ok(())
    }

    fn rollback(self) -> Result<(), Error> {
        self.txn.abort()?;
        log::debug!("Rolled back transaction");
        Ok(())
    }
}

/// A bucket view into a [`RedbTransaction`].
#[derive(Clone)]
pub struct RedbBucket<'tx> {
    txn: &'tx WriteTransaction,
    path: Vec<Vec<u8>>,
}

fn lookup(table: &EntryTable<'_>, key: &[u8]) -> Result<Option<Vec<u8>>, Error> {
    let found = table.get(key)?.map(|guard| guard.value().to_vec());
    Ok(found)
}

/// Direct children of the bucket whose children share `prefix`, with tags.
fn scan(table: &EntryTable<'_>, prefix: &[u8]) -> Result<Vec<(Vec<u8>, u8)>, Error> {
    let mut entries = Vec::new();
    for item in table.range(prefix..)? {
        let (key, value) = item?;
        let key = key.value();
        if !key.starts_with(prefix) {
            break;
        }
        let tag = value.value().first().copied().unwrap_or(TAG_VALUE);
        entries.push((entry_name(prefix, key), tag));
    }
    Ok(entries)
}

fn child_path(path: &[Vec<u8>], name: &[u8]) -> Vec<Vec<u8>> {
    let mut child = path.to_vec();
    child.push(name.to_vec());
    child
}

fn collect_buckets(
    table: &EntryTable<'_>,
    path: &[Vec<u8>],
    relative: &[u8],
    out: &mut Vec<Vec<u8>>,
) -> Result<(), Error> {
    for (name, tag) in scan(table, &children_prefix(path))? {
        if tag == TAG_BUCKET {
            let nested = join_relative(relative, &name);
            out.push(nested.clone());
            collect_buckets(table, &child_path(path, &name), &nested, out)?;
        }
    }
    Ok(())
}

fn remove_subtree(table: &mut EntryTable<'_>, path: &[Vec<u8>]) -> Result<(), Error> {
    for (name, tag) in scan(table, &children_prefix(path))? {
        if tag == TAG_BUCKET {
            remove_subtree(table, &child_path(path, &name))?;
        }
        table.remove(entry_key(path, &name).as_slice())?;
    }
    Ok(())
}

impl<'tx> RedbBucket<'tx> {
    fn open(&self) -> Result<EntryTable<'tx>, Error> {
        let table = self.txn.open_table(ENTRIES)?;
        self.check_exists(&table)?;
        Ok(table)
    }

    /// A view can outlive its bucket if something removed it since.
    fn check_exists(&self, table: &EntryTable<'_>) -> Result<(), Error> {
        let Some((name, parent)) = self.path.split_last() else {
            return Ok(());
        };
        match lookup(table, &entry_key(parent, name))? {
            Some(entry) if entry.first() == Some(&TAG_BUCKET) => Ok(()),
            _ => Err(Error::not_found(name)),
        }
    }
}

impl<'tx> Bucket for RedbBucket<'tx> {
    fn name(&self) -> &[u8] {
        self.path.last().map(Vec::as_slice).unwrap_or(&[])
    }

    fn cd(&self, name: &[u8]) -> Result<Self, Error> {
        let table = self.open()?;
        match lookup(&table, &entry_key(&self.path, name))? {
            Some(entry) if entry.first() == Some(&TAG_BUCKET) => Ok(RedbBucket {
                txn: self.txn,
                path: child_path(&self.path, name),
            }),
            _ => Err(Error::not_found(name)),
        }
    }

    fn prev(&self) -> Option<Self> {
        let (_, parent) = self.path.split_last()?;
        Some(RedbBucket {
            txn: self.txn,
            path: parent.to_vec(),
        })
    }

    fn list(&self) -> Result<Vec<Vec<u8>>, Error> {
        let table = self.open()?;
        let names = scan(&table, &children_prefix(&self.path))?
            .into_iter()
            .map(|(name, _)| name)
            .collect();
        Ok(names)
    }

    fn get(&self, key: &[u8]) -> Result<Vec<u8>, Error> {
        let table = self.open()?;
        match lookup(&table, &entry_key(&self.path, key))? {
            Some(entry) if entry.first() == Some(&TAG_VALUE) => Ok(entry[1..].to_vec()),
            _ => Err(Error::not_found(key)),
        }
    }

    fn put(&self, key: &[u8], value: &[u8]) -> Result<(), Error> {
        if key.is_empty() {
            return Err(Error::KeyRequired);
        }
        let mut table = self.open()?;
        let entry = entry_key(&self.path, key);
        if let Some(existing) = lookup(&table, &entry)? {
            if existing.first() == Some(&TAG_BUCKET) {
                return Err(Error::incompatible_value(key));
            }
        }
        table.insert(entry.as_slice(), encode_value(value).as_slice())?;
        Ok(())
    }

    fn mkdir(&self, name: &[u8]) -> Result<(), Error> {
        if name.is_empty() {
            return Err(Error::KeyRequired);
        }
        let mut table = self.open()?;
        let entry = entry_key(&self.path, name);
        if lookup(&table, &entry)?.is_some() {
            return Err(Error::already_exists(name));
        }
        table.insert(entry.as_slice(), [TAG_BUCKET].as_slice())?;
        Ok(())
    }

    fn rm(&self, name: &[u8]) -> Result<(), Error> {
        let mut table = self.open()?;
        let entry = entry_key(&self.path, name);
        match lookup(&table, &entry)? {
            None => return Err(Error::not_found(name)),
            Some(existing) if existing.first() == Some(&TAG_BUCKET) => {
                remove_subtree(&mut table, &child_path(&self.path, name))?;
            }
            Some(_) => {}
        }
        table.remove(entry.as_slice())?;
        Ok(())
    }

    fn buckets(&self, direct_only: bool) -> Result<Vec<Vec<u8>>, Error> {
        let table = self.open()?;
        if direct_only {
            let names = scan(&table, &children_prefix(&self.path))?
                .into_iter()
                .filter(|(_, tag)| *tag == TAG_BUCKET)
                .map(|(name, _)| name)
                .collect();
            return Ok(names);
        }
        let mut out = Vec::new();
        collect_buckets(&table, &self.path, &[], &mut out)?;
        Ok(out)
    }
}

impl fmt::Display for RedbBucket<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        format_segments(f, &self.path)
    }
}

impl fmt::Debug for RedbBucket<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RedbBucket({})", self)
    }
}
