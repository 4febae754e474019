//! JSON Pointer (RFC 6901) parsing and lookup.

use serde_json::value::Value as JsonValue;

use crate::error::PointerError;

/// Split a pointer into unescaped reference tokens.
///
/// The empty pointer addresses the whole document and yields no tokens.
pub fn parse(pointer: &str) -> Result<Vec<String>, PointerError> {
    if pointer.is_empty() {
        return Ok(Vec::new());
    }
    let rest = pointer
        .strip_prefix('/')
        .ok_or_else(|| PointerError::MissingSlash(pointer.to_string()))?;
    rest.split('/')
        .map(|token| unescape(token).ok_or_else(|| PointerError::InvalidEscape(pointer.to_string())))
        .collect()
}

fn unescape(token: &str) -> Option<String> {
    if !token.contains('~') {
        return Some(token.to_string());
    }
    let mut out = String::with_capacity(token.len());
    let mut chars = token.chars();
    while let Some(c) = chars.next() {
        if c != '~' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('0') => out.push('~'),
            Some('1') => out.push('/'),
            _ => return None,
        }
    }
    Some(out)
}

/// Format tokens back into a pointer, for messages.
pub fn format(tokens: &[String]) -> String {
    tokens
        .iter()
        .map(|token| format!("/{}", token.replace('~', "~0").replace('/', "~1")))
        .collect()
}

/// Parse an array index token: `0` or digits without a leading zero.
pub(crate) fn array_index(token: &str) -> Option<usize> {
    let well_formed = !token.is_empty()
        && token.bytes().all(|b| b.is_ascii_digit())
        && (token == "0" || !token.starts_with('0'));
    if well_formed {
        token.parse().ok()
    } else {
        None
    }
}

/// The value addressed by `pointer`, if any.
///
/// The pointer's syntax is checked first, so a malformed pointer is an error
/// rather than a miss.
pub fn lookup<'doc>(
    document: &'doc JsonValue,
    pointer: &str,
) -> Result<Option<&'doc JsonValue>, PointerError> {
    parse(pointer)?;
    Ok(document.pointer(pointer))
}
