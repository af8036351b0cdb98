//! Index primitives over page text.
//!
//! All positions are byte offsets into the page string and always fall on
//! char boundaries.

/// Direction of a [`scan_while`] walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Forward,
    Backward,
}

/// Position of the first occurrence of `needle` at or after `from`.
pub fn find(text: &str, needle: &str, from: usize) -> Option<usize> {
    text.get(from..)?.find(needle).map(|i| i + from)
}

/// Walk from `index` (inclusive) while `predicate` holds and return the
/// position of the first char that fails it.
///
/// Returns `None` when the walk runs off either end of the text or `index`
/// is not a valid char position.
pub fn scan_while(
    text: &str,
    index: usize,
    step: Step,
    predicate: impl Fn(char) -> bool,
) -> Option<usize> {
    let rest = text.get(index..)?;
    match step {
        Step::Forward => rest
            .char_indices()
            .find(|(_, c)| !predicate(*c))
            .map(|(i, _)| index + i),
        Step::Backward => {
            let end = index + rest.chars().next()?.len_utf8();
            text[..end]
                .char_indices()
                .rev()
                .find(|(_, c)| !predicate(*c))
                .map(|(i, _)| i)
        }
    }
}

/// Start of the line containing `index`.
pub fn line_start(text: &str, index: usize) -> usize {
    let head = &text[..floor_boundary(text, index)];
    match head.char_indices().next_back() {
        Some((previous, _)) => {
            scan_while(text, previous, Step::Backward, |c| c != '\n').map_or(0, |nl| nl + 1)
        }
        None => 0,
    }
}

/// Nearest char boundary at or before `index`.
fn floor_boundary(text: &str, index: usize) -> usize {
    let mut index = index.min(text.len());
    while !text.is_char_boundary(index) {
        index -= 1;
    }
    index
}

/// End of the line containing `index` (position of its newline, or the text length).
pub fn line_end(text: &str, index: usize) -> usize {
    find(text, "\n", index).unwrap_or(text.len())
}

/// Start of the line `count` lines above the one containing `index`,
/// never earlier than `floor`.
pub fn lines_above(text: &str, index: usize, count: usize, floor: usize) -> usize {
    let mut start = line_start(text, index);
    for _ in 0..count {
        if start <= floor {
            break;
        }
        start = line_start(text, start - 1);
    }
    start.max(floor)
}

/// The line containing `index`, without its newline.
pub fn line_at(text: &str, index: usize) -> &str {
    &text[line_start(text, index)..line_end(text, index)]
}

/// The first non-blank line after the line containing `index`.
pub fn next_non_blank_line(text: &str, index: usize) -> Option<&str> {
    let after = line_end(text, index) + 1;
    text.get(after..)?.lines().find(|l| !l.trim().is_empty())
}
