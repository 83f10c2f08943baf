//! Text decoding for archive entries.

use encoding_rs::UTF_8;
use std::borrow::Cow;

/// Decode entry bytes as UTF-8, dropping a leading byte-order mark.
///
/// Returns `None` when the bytes contain any malformed sequence; callers
/// decide whether that skips the entry or aborts the run.
pub fn decode_text(bytes: &[u8]) -> Option<Cow<'_, str>> {
    let (text, had_errors) = UTF_8.decode_with_bom_removal(bytes);
    if had_errors {
        None
    } else {
        Some(text)
    }
}
