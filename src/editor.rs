//! Highlight editing: wrap the selected span of the poster text in markers

use std::ops::Range;

use crate::rendering::markup::{HIGHLIGHT_CLOSE, HIGHLIGHT_OPEN};

/// Result of wrapping a selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightEdit {
    pub text: String,
    /// Caret position (in chars) just after the closing marker
    pub cursor: usize,
}

/// Wrap `selection` (char offsets) in `[g]`/`[/g]`.
///
/// Returns `None`, leaving the text untouched, when the selection is empty,
/// reversed, or extends past the end of the text.
pub fn wrap_highlight(text: &str, selection: Range<usize>) -> Option<HighlightEdit> {
    if selection.start >= selection.end {
        return None;
    }
    let start = byte_offset(text, selection.start)?;
    let end = byte_offset(text, selection.end)?;

    let (before, rest) = text.split_at(start);
    let (selected, after) = rest.split_at(end - start);
    let wrapped = format!("{}{}{}{}{}", before, HIGHLIGHT_OPEN, selected, HIGHLIGHT_CLOSE, after);

    let cursor = selection.end + HIGHLIGHT_OPEN.chars().count() + HIGHLIGHT_CLOSE.chars().count();
    Some(HighlightEdit { text: wrapped, cursor })
}

/// Byte offset of the `chars`-th char; the text length is a valid offset.
fn byte_offset(text: &str, chars: usize) -> Option<usize> {
    text.char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(text.len()))
        .nth(chars)
}
