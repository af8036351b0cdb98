use tracing::debug;

use crate::error::ReconError;
use crate::extraction::PageContent;
use crate::parsing::scan::{find, line_end, lines_above};

/// A string that terminates the transaction region of a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EndAnchor {
    pub text: &'static str,
    /// Lines directly above the anchor that are also cut (e.g. a page total).
    pub skip_lines: usize,
}

impl EndAnchor {
    pub const fn line(text: &'static str) -> Self {
        EndAnchor {
            text,
            skip_lines: 0,
        }
    }

    pub const fn above(text: &'static str, skip_lines: usize) -> Self {
        EndAnchor { text, skip_lines }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Anchors {
    /// Keywords that must all appear on the column header row.
    pub start: &'static [&'static str],
    /// The earliest of these after the header row ends the region.
    pub end: &'static [EndAnchor],
    /// Without any end anchor the region runs to the end of the page
    /// instead of failing.
    pub to_page_end: bool,
}

/// Where the transaction rows live in a provider's page layout.
#[derive(Debug, Clone, Copy)]
pub struct Layout {
    /// A page takes part only when it contains all of these.
    pub page_keywords: &'static [&'static str],
    pub anchors: Anchors,
    /// Balance carry lines inside the region that are not transactions.
    pub carry_markers: &'static [&'static str],
}

/// The transaction region of one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region<'a> {
    /// The column header row.
    pub header: &'a str,
    /// Text strictly between the header row and the end anchor.
    pub body: &'a str,
}

/// A non-blank physical line of a transaction region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegionLine<'a> {
    pub text: &'a str,
    /// Header row of the region the line came from.
    pub header: &'a str,
    pub page_number: usize,
}

/// Cut the transaction region out of a page.
pub fn segment<'a>(page: &'a str, anchors: &Anchors) -> Result<Region<'a>, ReconError> {
    let (header_start, header) = header_row(page, anchors.start).ok_or_else(|| {
        ReconError::structure(
            anchors.start.join(" + "),
            "no line carries every column heading",
        )
    })?;

    let body_start = (header_start + header.len() + 1).min(page.len());

    let earliest = anchors
        .end
        .iter()
        .filter_map(|a| find(page, a.text, body_start).map(|pos| (pos, a)))
        .min_by_key(|(pos, _)| *pos);

    let body_end = match earliest {
        Some((position, anchor)) => lines_above(page, position, anchor.skip_lines, body_start),
        None if anchors.to_page_end => page.len(),
        None => {
            let names: Vec<&str> = anchors.end.iter().map(|a| a.text).collect();
            return Err(ReconError::structure(
                names.join(" | "),
                "no end anchor after the column headings",
            ));
        }
    };

    Ok(Region {
        header,
        body: &page[body_start..body_end],
    })
}

fn header_row<'a>(page: &'a str, keywords: &[&str]) -> Option<(usize, &'a str)> {
    let mut start = 0;
    while start < page.len() {
        let end = line_end(page, start);
        let line = &page[start..end];
        if keywords.iter().all(|k| line.contains(k)) {
            return Some((start, line));
        }
        start = end + 1;
    }
    None
}

/// Pages that carry every keyword, in document order.
pub fn select_pages<'a>(
    pages: &'a [PageContent],
    keywords: &[&str],
) -> Result<Vec<&'a PageContent>, ReconError> {
    let selected: Vec<&PageContent> = pages.iter().filter(|p| p.contains_all(keywords)).collect();
    if selected.is_empty() {
        return Err(ReconError::structure(
            keywords.join(" + "),
            format!("none of {} pages holds transactions", pages.len()),
        ));
    }
    Ok(selected)
}

/// The transaction lines of a statement: every selected page segmented,
/// blank lines and balance carry lines dropped.
pub fn region_lines<'a>(
    pages: &'a [PageContent],
    layout: &Layout,
) -> Result<Vec<RegionLine<'a>>, ReconError> {
    let mut out = Vec::new();
    for page in select_pages(pages, layout.page_keywords)? {
        let region = segment(&page.text, &layout.anchors).map_err(|e| match e {
            ReconError::Structure { anchor, context } => ReconError::Structure {
                anchor,
                context: format!("page {}: {}", page.page_number, context),
            },
            other => other,
        })?;

        let before = out.len();
        out.extend(
            region
                .body
                .lines()
                .filter(|l| !l.trim().is_empty())
                .filter(|l| !layout.carry_markers.iter().any(|m| l.contains(m)))
                .map(|text| RegionLine {
                    text,
                    header: region.header,
                    page_number: page.page_number,
                }),
        );
        debug!(
            page = page.page_number,
            lines = out.len() - before,
            "segmented transaction region"
        );
    }
    Ok(out)
}
