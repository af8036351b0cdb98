use crate::error::ReconError;

/// A run of text in a layout line, bounded by gaps of 2+ whitespace chars.
///
/// `start` and `end` are char columns (end exclusive), so positions line up
/// visually with the header row even when descriptions contain non-ASCII text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column<'a> {
    pub text: &'a str,
    pub start: usize,
    pub end: usize,
}

/// Split a line into columns on gaps of 2+ whitespace characters.
pub fn columns(line: &str) -> Vec<Column<'_>> {
    let mut out = Vec::new();
    // (byte offset, char column) of the current column's first char
    let mut start: Option<(usize, usize)> = None;
    // (byte offset, char column) just past the last non-whitespace char
    let mut last = (0, 0);
    let mut gap = 0;

    for (col, (i, c)) in line.char_indices().enumerate() {
        if c.is_whitespace() {
            gap += 1;
            if gap == 2 {
                if let Some((byte, first)) = start.take() {
                    out.push(Column {
                        text: &line[byte..last.0],
                        start: first,
                        end: last.1,
                    });
                }
            }
        } else {
            if start.is_none() {
                start = Some((i, col));
            }
            gap = 0;
            last = (i + c.len_utf8(), col + 1);
        }
    }

    if let Some((byte, first)) = start {
        out.push(Column {
            text: &line[byte..last.0],
            start: first,
            end: last.1,
        });
    }

    out
}

/// Right edges of the amount columns named in a page's header row.
///
/// Amounts are right-aligned under their heading, so a value belongs to the
/// label whose right edge is nearest its own right edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnGuide {
    edges: Vec<(&'static str, usize)>,
}

impl ColumnGuide {
    pub fn from_header(header: &str, labels: &[&'static str]) -> Result<Self, ReconError> {
        let mut edges = Vec::with_capacity(labels.len());
        for label in labels {
            let byte = header.find(label).ok_or_else(|| {
                ReconError::structure(*label, format!("column heading missing from '{}'", header.trim()))
            })?;
            let col = header[..byte].chars().count();
            edges.push((*label, col + label.chars().count()));
        }
        Ok(ColumnGuide { edges })
    }

    /// The label whose right edge is nearest to the column's right edge.
    pub fn label_for(&self, column: &Column<'_>) -> Option<&'static str> {
        self.edges
            .iter()
            .min_by_key(|(_, edge)| edge.abs_diff(column.end))
            .map(|(label, _)| *label)
    }
}
