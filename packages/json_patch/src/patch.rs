//! JSON Patch (RFC 6902) documents and their atomic application.

use serde::{Deserialize, Serialize};
use serde_json::value::Value as JsonValue;

use crate::error::{Error, OpFailure};
use crate::pointer;

/// One patch operation.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum Operation {
    Add { path: String, value: JsonValue },
    Remove { path: String },
    Replace { path: String, value: JsonValue },
    Move { from: String, path: String },
    Copy { from: String, path: String },
    Test { path: String, value: JsonValue },
}

impl Operation {
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Add { .. } => "add",
            Operation::Remove { .. } => "remove",
            Operation::Replace { .. } => "replace",
            Operation::Move { .. } => "move",
            Operation::Copy { .. } => "copy",
            Operation::Test { .. } => "test",
        }
    }

    fn apply(&self, doc: &mut JsonValue) -> Result<(), OpFailure> {
        match self {
            Operation::Add { path, value } => add(doc, &pointer::parse(path)?, value.clone()),
            Operation::Remove { path } => remove(doc, &pointer::parse(path)?).map(drop),
            Operation::Replace { path, value } => {
                pointer::parse(path)?;
                let target = doc
                    .pointer_mut(path)
                    .ok_or_else(|| OpFailure::PathNotFound(path.clone()))?;
                *target = value.clone();
                Ok(())
            }
            Operation::Move { from, path } => {
                let from_tokens = pointer::parse(from)?;
                let path_tokens = pointer::parse(path)?;
                if from_tokens == path_tokens {
                    return doc
                        .pointer(from)
                        .map(drop)
                        .ok_or_else(|| OpFailure::PathNotFound(from.clone()));
                }
                if path_tokens.starts_with(&from_tokens) {
                    return Err(OpFailure::MoveIntoChild {
                        from: from.clone(),
                        path: path.clone(),
                    });
                }
                let value = remove(doc, &from_tokens)?;
                add(doc, &path_tokens, value)
            }
            Operation::Copy { from, path } => {
                let value = pointer::lookup(doc, from)?
                    .cloned()
                    .ok_or_else(|| OpFailure::PathNotFound(from.clone()))?;
                add(doc, &pointer::parse(path)?, value)
            }
            Operation::Test { path, value } => {
                let found = pointer::lookup(doc, path)?
                    .ok_or_else(|| OpFailure::PathNotFound(path.clone()))?;
                if same_value(found, value) {
                    Ok(())
                } else {
                    Err(OpFailure::TestFailed(path.clone()))
                }
            }
        }
    }
}

/// JSON equality where numbers compare by value, so `1` equals `1.0`.
fn same_value(a: &JsonValue, b: &JsonValue) -> bool {
    match (a, b) {
        (JsonValue::Number(x), JsonValue::Number(y)) => match (x.as_f64(), y.as_f64()) {
            (Some(x), Some(y)) => x == y,
            _ => x == y,
        },
        (JsonValue::Array(xs), JsonValue::Array(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| same_value(x, y))
        }
        (JsonValue::Object(xs), JsonValue::Object(ys)) => {
            xs.len() == ys.len()
                && xs
                    .iter()
                    .all(|(key, x)| ys.get(key).is_some_and(|y| same_value(x, y)))
        }
        _ => a == b,
    }
}

/// Split off the last token and find the container it indexes into.
fn parent_of<'doc>(
    doc: &'doc mut JsonValue,
    tokens: &[String],
) -> Result<(&'doc mut JsonValue, String), OpFailure> {
    let (last, parent) = tokens.split_last().ok_or(OpFailure::RemoveRoot)?;
    let parent = pointer::format(parent);
    let container = doc
        .pointer_mut(&parent)
        .ok_or(OpFailure::PathNotFound(parent))?;
    Ok((container, last.clone()))
}

fn add(doc: &mut JsonValue, tokens: &[String], value: JsonValue) -> Result<(), OpFailure> {
    if tokens.is_empty() {
        *doc = value;
        return Ok(());
    }
    let (container, last) = parent_of(doc, tokens)?;
    match container {
        JsonValue::Object(map) => {
            map.insert(last, value);
            Ok(())
        }
        JsonValue::Array(items) if last == "-" => {
            items.push(value);
            Ok(())
        }
        JsonValue::Array(items) => match pointer::array_index(&last) {
            Some(index) if index <= items.len() => {
                items.insert(index, value);
                Ok(())
            }
            _ => Err(OpFailure::InvalidIndex(last)),
        },
        _ => Err(OpFailure::InvalidTarget(pointer::format(&tokens[..tokens.len() - 1]))),
    }
}

fn remove(doc: &mut JsonValue, tokens: &[String]) -> Result<JsonValue, OpFailure> {
    let (container, last) = parent_of(doc, tokens)?;
    let removed = match container {
        JsonValue::Object(map) => map.shift_remove(&last),
        JsonValue::Array(items) => match pointer::array_index(&last) {
            Some(index) if index < items.len() => Some(items.remove(index)),
            _ => return Err(OpFailure::InvalidIndex(last)),
        },
        _ => None,
    };
    removed.ok_or_else(|| OpFailure::PathNotFound(pointer::format(tokens)))
}

/// An ordered list of patch operations.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(transparent)]
pub struct Patch(pub Vec<Operation>);

impl Patch {
    /// Decode a patch document: a JSON array of operations.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, Error> {
        serde_json::from_slice(bytes).map_err(Error::InvalidPatch)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Apply every operation to a copy of `doc`.
    ///
    /// Either all operations succeed and the patched copy is returned, or the
    /// first failure is reported and `doc` is untouched.
    pub fn apply(&self, doc: &JsonValue) -> Result<JsonValue, Error> {
        let mut patched = doc.clone();
        for (index, op) in self.0.iter().enumerate() {
            op.apply(&mut patched).map_err(|reason| Error::Operation {
                index,
                op: op.name(),
                reason,
            })?;
        }
        Ok(patched)
    }
}
