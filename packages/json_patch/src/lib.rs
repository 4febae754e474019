//! # thunder-json-patch
//!
//! JSON-aware editing of values held in a [`Bucket`].
//!
//! - [`pointer`]: RFC 6901 JSON Pointer parsing and lookup
//! - [`Patch`]: RFC 6902 JSON Patch documents, applied atomically
//! - [`find`], [`patch_value`], [`add_at_pointer`]: the glue between stored
//!   bytes and the two above
//!
//! A failing patch never writes: the stored value is only replaced once
//! every operation has succeeded on a private copy.

mod error;
mod patch;
pub mod pointer;

pub use error::{Error, OpFailure, PointerError};
pub use patch::{Operation, Patch};

use serde_json::value::Value as JsonValue;
use thunder_store::Bucket;

fn decode_document(bytes: &[u8]) -> Result<JsonValue, Error> {
    serde_json::from_slice(bytes).map_err(Error::NotJson)
}

/// Extract the value addressed by `pointer` from a JSON document, re-encoded
/// as compact JSON.
pub fn find(document: &[u8], pointer: &str) -> Result<Vec<u8>, Error> {
    let doc = decode_document(document)?;
    let found = pointer::lookup(&doc, pointer)?
        .ok_or_else(|| Error::PointerNotFound(pointer.to_string()))?;
    serde_json::to_vec(found).map_err(Error::Encode)
}

/// Apply the patch document `patch` to the JSON value stored under `key`.
///
/// The result is written back compactly, and only if every operation
/// succeeded. An empty patch leaves the stored bytes untouched.
pub fn patch_value<B: Bucket>(bucket: &B, key: &[u8], patch: &[u8]) -> Result<(), Error> {
    let stored = bucket.get(key)?;
    let patch = Patch::from_slice(patch)?;
    apply_and_store(bucket, key, &stored, &patch)
}

/// Set the member addressed by `pointer` inside the JSON value stored under
/// `key`, by way of a single `add` operation.
///
/// `raw_value` is spliced into the operation as JSON text, unescaped, so it
/// must already be valid JSON: a string needs its own quotes.
pub fn add_at_pointer<B: Bucket>(
    bucket: &B,
    key: &[u8],
    pointer: &str,
    raw_value: &str,
) -> Result<(), Error> {
    let stored = bucket.get(key)?;
    let synthesized = synthesize_add(pointer, raw_value)?;
    let patch = Patch::from_slice(synthesized.as_bytes()).map_err(|e| match e {
        Error::InvalidPatch(source) => Error::InvalidSplice {
            patch: synthesized.clone(),
            source,
        },
        other => other,
    })?;
    apply_and_store(bucket, key, &stored, &patch)
}

fn synthesize_add(pointer: &str, raw_value: &str) -> Result<String, Error> {
    let path = serde_json::to_string(pointer).map_err(Error::Encode)?;
    Ok(format!(r#"[{{"op": "add", "path": {path}, "value": {raw_value}}}]"#))
}

fn apply_and_store<B: Bucket>(
    bucket: &B,
    key: &[u8],
    stored: &[u8],
    patch: &Patch,
) -> Result<(), Error> {
    let doc = decode_document(stored)?;
    if patch.is_empty() {
        log::debug!("Empty patch for '{}', nothing to write", String::from_utf8_lossy(key));
        return Ok(());
    }
    let patched = patch.apply(&doc)?;
    let encoded = serde_json::to_vec(&patched).map_err(Error::Encode)?;
    log::debug!(
        "Applied {} patch operation(s) to '{}' in {}",
        patch.0.len(),
        String::from_utf8_lossy(key),
        bucket
    );
    bucket.put(key, &encoded)?;
    Ok(())
}
