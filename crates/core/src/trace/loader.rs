//! Trace Loader.
//!
//! This module turns the simulator's newline-delimited JSON output into raw cycle records. It performs:
//! 1. **Normalization:** Strips the quoting layer that a process boundary may wrap around the text.
//! 2. **Parsing:** Reads one [`RawCycle`] per non-blank line, reporting the first bad line.
//! 3. **File loading:** Reads a saved trace from disk.

use std::borrow::Cow;
use std::fs;
use std::path::Path;

use tracing::debug;

use crate::common::error::{Result, TraceError};
use crate::trace::raw::RawCycle;

/// Removes one layer of byte-string quoting from captured process output.
///
/// Output captured through a shell or a scripting layer can arrive as `b'...'` or `'...'`.
/// Only the outermost layer is removed; text without such a wrapper is returned unchanged.
///
/// # Arguments
///
/// * `text` - Raw captured text.
///
/// # Returns
///
/// The text with a leading `b'` / `'` (or the double-quoted forms) and its matching closing
/// quote removed.
pub fn strip_quoting(text: &str) -> &str {
    let trimmed = text.trim();
    let body = trimmed.strip_prefix('b').unwrap_or(trimmed);
    for quote in ['\'', '"'] {
        if let Some(inner) = body.strip_prefix(quote) {
            return inner.strip_suffix(quote).unwrap_or(inner);
        }
    }
    text
}

/// Strips capture quoting and undoes the escapes of a byte-string repr.
///
/// A trace captured as `b'{...}\n{...}\n'` has its record separators written as the two
/// characters `\n`, and every backslash inside a message doubled. When the wrapper is present
/// and the body holds no real newline, the escapes are undone in one pass.
pub fn normalize(text: &str) -> Cow<'_, str> {
    let body = strip_quoting(text);
    if body.len() != text.len() && !body.contains('\n') && body.contains('\\') {
        Cow::Owned(unescape(body))
    } else {
        Cow::Borrowed(body)
    }
}

/// Decodes the escape sequences of a Python bytes repr; unknown escapes are kept verbatim.
fn unescape(body: &str) -> String {
    let mut out = Vec::with_capacity(body.len());
    let mut rest = body.as_bytes();

    while let Some((&byte, tail)) = rest.split_first() {
        rest = tail;
        if byte != b'\\' {
            out.push(byte);
            continue;
        }
        match escape(rest) {
            Some((decoded, used)) => {
                out.push(decoded);
                rest = rest.get(used..).unwrap_or_default();
            }
            None => out.push(byte),
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}

/// Decodes the escape following a backslash, returning the byte and how many inputs it used.
fn escape(rest: &[u8]) -> Option<(u8, usize)> {
    let decoded = match rest {
        [b'\\', ..] => b'\\',
        [b'\'', ..] => b'\'',
        [b'"', ..] => b'"',
        [b'n', ..] => b'\n',
        [b'r', ..] => b'\r',
        [b't', ..] => b'\t',
        [b'x', hi, lo, ..] if hi.is_ascii_hexdigit() && lo.is_ascii_hexdigit() => {
            let digits = [*hi, *lo];
            let value = std::str::from_utf8(&digits).ok()?;
            return u8::from_str_radix(value, 16).ok().map(|v| (v, 3));
        }
        _ => return None,
    };
    Some((decoded, 1))
}

/// Parses a complete trace into raw cycle records.
///
/// Blank lines (including the trailing one left by the final newline) are skipped. Every other
/// line must be one JSON object.
///
/// # Arguments
///
/// * `text` - Complete, already normalized trace text.
///
/// # Returns
///
/// The cycles in emission order.
///
/// # Errors
///
/// [`TraceError::MalformedTrace`] for the first line that fails to parse, or
/// [`TraceError::EmptyTrace`] when no records are present.
pub fn load(text: &str) -> Result<Vec<RawCycle>> {
    let mut cycles = Vec::new();

    for (idx, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let cycle = serde_json::from_str::<RawCycle>(line).map_err(|e| {
            TraceError::MalformedTrace {
                line: idx + 1,
                reason: e.to_string(),
            }
        })?;
        cycles.push(cycle);
    }

    if cycles.is_empty() {
        return Err(TraceError::EmptyTrace);
    }

    debug!(cycles = cycles.len(), "trace parsed");
    Ok(cycles)
}

/// Reads and parses a trace saved to disk.
///
/// The file may still carry the capture quoting; it is removed by [`normalize`] before parsing.
///
/// # Errors
///
/// [`TraceError::Io`] if the file cannot be read, otherwise as for [`load`].
pub fn load_file(path: &Path) -> Result<Vec<RawCycle>> {
    let text = fs::read_to_string(path).map_err(|source| TraceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load(&normalize(&text))
}
