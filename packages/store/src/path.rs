//! Path resolution over buckets.
//!
//! Paths are `/`-separated. Empty segments are skipped, `.` stays put and
//! `..` moves to the parent (staying put at the root). Every other segment
//! enters a child bucket. A leading `/` is just an empty segment, so paths
//! always resolve relative to the starting bucket.

use std::fmt;

use unicode_properties::{GeneralCategory, GeneralCategoryGroup, UnicodeGeneralCategory};

use crate::{Bucket, Error};

/// A failed walk: the error, plus the furthest bucket reached before it.
pub struct Stranded<B> {
    pub reached: B,
    pub error: Error,
}

impl<B> Stranded<B> {
    pub fn into_error(self) -> Error {
        self.error
    }
}

impl<B: Bucket> fmt::Debug for Stranded<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stranded")
            .field("reached", &self.reached.to_string())
            .field("error", &self.error)
            .finish()
    }
}

impl<B: Bucket> From<Stranded<B>> for Error {
    fn from(stranded: Stranded<B>) -> Self {
        stranded.error
    }
}

/// Walk `path` starting at `start`.
///
/// Stops at the first segment that cannot be entered.
pub fn travel<B: Bucket>(start: &B, path: &str) -> Result<B, Stranded<B>> {
    let mut current = start.clone();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if let Some(parent) = current.prev() {
                    current = parent;
                }
            }
            name => match current.cd(name.as_bytes()) {
                Ok(child) => current = child,
                Err(error) => {
                    return Err(Stranded {
                        reached: current,
                        error,
                    })
                }
            },
        }
    }
    Ok(current)
}

/// Split `path` into the bucket holding its last segment and that segment.
///
/// The leaf is never resolved, so it may name a key that does not exist yet.
/// Everything before the last `/` goes through [`travel`]; missing
/// intermediate buckets are an error, never created.
pub fn parse_key_path<'p, B: Bucket>(start: &B, path: &'p str) -> Result<(B, &'p str), Stranded<B>> {
    match path.rfind('/') {
        None => Ok((start.clone(), path)),
        Some(slash) => {
            let bucket = travel(start, &path[..slash])?;
            Ok((bucket, &path[slash + 1..]))
        }
    }
}

/// True if `name` is UTF-8 made only of graphic characters.
///
/// Graphic means the Unicode general categories L, M, N, P, S and Zs.
/// Controls, line/paragraph separators, format characters, private-use and
/// unassigned code points are not.
pub fn is_printable(name: &[u8]) -> bool {
    match std::str::from_utf8(name) {
        Ok(s) => s.chars().all(is_graphic),
        Err(_) => false,
    }
}

fn is_graphic(c: char) -> bool {
    matches!(
        c.general_category_group(),
        GeneralCategoryGroup::Letter
            | GeneralCategoryGroup::Mark
            | GeneralCategoryGroup::Number
            | GeneralCategoryGroup::Punctuation
            | GeneralCategoryGroup::Symbol
    ) || c.general_category() == GeneralCategory::SpaceSeparator
}

/// Keep only the printable names, as strings.
pub fn printable_list(names: &[Vec<u8>]) -> Vec<String> {
    names
        .iter()
        .filter(|name| is_printable(name))
        .filter_map(|name| String::from_utf8(name.clone()).ok())
        .collect()
}
