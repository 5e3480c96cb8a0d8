//! Filename sanitization for uploaded files.

use unicode_normalization::UnicodeNormalization;

use super::MAX_FILENAME_LENGTH;
use crate::{Result, SmplbinError};

/// Reserved device names on Windows.
const WINDOWS_DEVICE_NAMES: &[&str] = &[
    "CON", "AUX", "COM1", "COM2", "COM3", "COM4", "LPT1", "LPT2", "LPT3", "PRN", "NUL",
];

/// Reduce an uploaded filename to a single safe path segment.
///
/// The name is NFKD-normalized and reduced to ASCII, so accented letters
/// keep their base letter. Path separators become spaces, every character
/// outside `[A-Za-z0-9_.-]` and whitespace is dropped, whitespace runs are joined with `_`, and
/// leading or trailing dots and underscores are stripped. The result can
/// never contain a separator or be `.`/`..`.
///
/// # Errors
///
/// Returns `BadInput` if nothing usable is left.
pub fn sanitize_filename(name: &str) -> Result<String> {
    let replaced: String = name
        .nfkd()
        .filter(char::is_ascii)
        .map(|c| if c == '/' || c == '\\' { ' ' } else { c })
        .collect();

    let joined = replaced.split_whitespace().collect::<Vec<_>>().join("_");

    let filtered: String = joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        .collect();

    let mut result = filtered.trim_matches(|c| c == '.' || c == '_').to_string();

    if is_device_name(&result) {
        result.insert(0, '_');
    }

    // ASCII only, so any byte index is a char boundary
    if result.len() > MAX_FILENAME_LENGTH {
        result.truncate(MAX_FILENAME_LENGTH);
        let trimmed_len = result.trim_end_matches(|c| c == '.' || c == '_').len();
        result.truncate(trimmed_len);
    }

    if result.is_empty() {
        return Err(SmplbinError::BadInput(format!(
            "filename '{name}' is empty after sanitization"
        )));
    }

    Ok(result)
}

fn is_device_name(name: &str) -> bool {
    let stem = name.split('.').next().unwrap_or(name);
    WINDOWS_DEVICE_NAMES
        .iter()
        .any(|dev| dev.eq_ignore_ascii_case(stem))
}
