//! RFC 6901 JSON pointer helpers.

use super::PatchError;

/// Escape a single reference token (`~` → `~0`, `/` → `~1`)
pub fn escape_token(token: &str) -> String {
    token.replace('~', "~0").replace('/', "~1")
}

/// Reverse of [`escape_token`]
pub fn unescape_token(token: &str) -> String {
    token.replace("~1", "/").replace("~0", "~")
}

/// Append an unescaped token to an existing pointer
pub fn join(parent: &str, token: &str) -> String {
    format!("{parent}/{}", escape_token(token))
}

/// Split a non-root pointer into its parent pointer and unescaped last token
pub fn split_parent(path: &str) -> Result<(&str, String), PatchError> {
    if !path.starts_with('/') {
        return Err(PatchError::InvalidPointer {
            path: path.to_string(),
        });
    }
    // starts_with('/') guarantees a separator exists
    let idx = path.rfind('/').unwrap_or(0);
    Ok((&path[..idx], unescape_token(&path[idx + 1..])))
}

/// Parse an array index token; `len` bounds it (inclusive when `allow_end`)
pub fn parse_index(path: &str, token: &str, len: usize, allow_end: bool) -> Result<usize, PatchError> {
    let invalid = || PatchError::InvalidIndex {
        path: path.to_string(),
        index: token.to_string(),
    };
    if token.is_empty() || (token.len() > 1 && token.starts_with('0')) {
        return Err(invalid());
    }
    let index: usize = token.parse().map_err(|_| invalid())?;
    let bound_ok = if allow_end { index <= len } else { index < len };
    if bound_ok {
        Ok(index)
    } else {
        Err(invalid())
    }
}
