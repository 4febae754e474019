//! Flattening of nested bucket entries into ordered table keys.
//!
//! An entry named `name` inside the bucket at `path` is stored under
//!
//! ```text
//! depth (u32, big endian) ++ escape(path[0]) ++ END ++ ... ++ escape(path[n-1]) ++ END ++ escape(name)
//! ```
//!
//! `escape` turns `0x00` into `0x00 0xFF` and `END` is `0x00 0x01`, so a
//! segment boundary can never be confused with segment content. The escaping
//! preserves byte order, and because the depth leads the key, every direct
//! child of a bucket shares one prefix that no deeper descendant has.

const ESCAPE: u8 = 0x00;
const ESCAPED_ZERO: u8 = 0xFF;
const END: u8 = 0x01;

/// Tag byte for an entry that is a bucket.
pub(crate) const TAG_BUCKET: u8 = 0x00;
/// Tag byte for an entry that is a value; the value bytes follow.
pub(crate) const TAG_VALUE: u8 = 0x01;

fn escape_into(out: &mut Vec<u8>, segment: &[u8]) {
    for &byte in segment {
        out.push(byte);
        if byte == ESCAPE {
            out.push(ESCAPED_ZERO);
        }
    }
}

fn unescape(encoded: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(encoded.len());
    let mut bytes = encoded.iter();
    while let Some(&byte) = bytes.next() {
        out.push(byte);
        if byte == ESCAPE {
            bytes.next();
        }
    }
    out
}

/// The key prefix shared by every direct child of the bucket at `path`.
pub(crate) fn children_prefix(path: &[Vec<u8>]) -> Vec<u8> {
    let depth = path.len() as u32;
    let mut out = depth.to_be_bytes().to_vec();
    for segment in path {
        escape_into(&mut out, segment);
        out.push(ESCAPE);
        out.push(END);
    }
    out
}

/// The table key for the entry `name` in the bucket at `path`.
pub(crate) fn entry_key(path: &[Vec<u8>], name: &[u8]) -> Vec<u8> {
    let mut out = children_prefix(path);
    escape_into(&mut out, name);
    out
}

/// Recover the entry name from a key that starts with `prefix`.
pub(crate) fn entry_name(prefix: &[u8], key: &[u8]) -> Vec<u8> {
    unescape(&key[prefix.len()..])
}

pub(crate) fn encode_value(value: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(value.len() + 1);
    out.push(TAG_VALUE);
    out.extend_from_slice(value);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(segments: &[&[u8]]) -> Vec<Vec<u8>> {
        segments.iter().map(|s| s.to_vec()).collect()
    }

    #[test]
    fn names_round_trip_through_escaping() {
        let prefix = children_prefix(&path(&[b"a\x00b"]));
        let names: [&[u8]; 4] = [b"plain", b"\x00", b"x\x00\x01y", b"\xff\x00"];
        for name in names {
            let key = entry_key(&path(&[b"a\x00b"]), name);
            assert!(key.starts_with(&prefix));
            assert_eq!(entry_name(&prefix, &key), name);
        }
    }

    #[test]
    fn escaping_preserves_byte_order() {
        let names = [
            "", "\x00", "\x00\x00", "\x00\x01", "\x01", "a", "a\x00", "ab",
        ];
        let keys: Vec<Vec<u8>> = names
            .iter()
            .map(|n| entry_key(&[], n.as_bytes()))
            .collect();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
    }

    #[test]
    fn grandchildren_do_not_share_child_prefix() {
        let parent = path(&[b"a"]);
        let prefix = children_prefix(&parent);
        let grandchild = entry_key(&path(&[b"a", b"b"]), b"c");
        assert!(!grandchild.starts_with(&prefix));
    }

    #[test]
    fn sibling_buckets_do_not_share_prefix() {
        let prefix = children_prefix(&path(&[b"a"]));
        let other = entry_key(&path(&[b"ab"]), b"c");
        assert!(!other.starts_with(&prefix));
        let nul = entry_key(&path(&[b"a\x00"]), b"c");
        assert!(!nul.starts_with(&prefix));
    }
}
