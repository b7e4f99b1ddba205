//! Critique section parser. Pure and deterministic.
//!
//! The vision model is prompted to answer with numbered, colon-terminated
//! headings wrapped in a `**…**` emphasis pair, followed by free text with
//! optional `*` bullet lines. This module extracts that structure with a
//! small hand-written scanner so prompt changes can be validated against
//! parser expectations without touching the network client.

use crate::domain::{Line, Section};

/// Emphasis delimiter wrapping the `numeral…colon` span of a heading marker.
const EMPHASIS: &str = "**";

/// Accepted bullet markers at the start of a body line.
const BULLET_MARKERS: [char; 3] = ['*', '-', '•'];

struct Heading {
    /// Byte offset of the opening delimiter.
    start: usize,
    /// Byte offset just past the closing delimiter.
    end: usize,
    label: String,
}

/// Splits raw response text into ordered, labeled sections.
///
/// Text preceding the first heading marker is discarded. Input with no
/// markers (including the empty string) yields an empty vector; deciding
/// whether that is an error belongs to the caller.
pub fn parse_sections(raw: &str) -> Vec<Section> {
    let headings = find_headings(raw);
    let mut sections = Vec::with_capacity(headings.len());
    for (i, heading) in headings.iter().enumerate() {
        let content_end = headings.get(i + 1).map_or(raw.len(), |next| next.start);
        let content = &raw[heading.end..content_end];
        let body = content.lines().filter_map(classify_line).collect();
        sections.push(Section {
            heading: heading.label.clone(),
            body,
        });
    }
    sections
}

/// Scans for `**N. Label:**` markers, left to right.
fn find_headings(raw: &str) -> Vec<Heading> {
    let mut found = Vec::new();
    let mut cursor = 0;
    while let Some(rel_open) = raw[cursor..].find(EMPHASIS) {
        let open = cursor + rel_open;
        let inner_start = open + EMPHASIS.len();
        let Some(rel_close) = raw[inner_start..].find(EMPHASIS) else {
            break;
        };
        let close = inner_start + rel_close;
        match heading_label(&raw[inner_start..close]) {
            Some(label) => {
                found.push(Heading {
                    start: open,
                    end: close + EMPHASIS.len(),
                    label,
                });
                cursor = close + EMPHASIS.len();
            }
            // Not a heading span; its closing delimiter may open the next one.
            None => cursor = close,
        }
    }
    found
}

/// Validates a candidate heading span: `numeral(s) '.' optional-ws label ':'`
/// on a single line. Returns the display label with the ordinal prefix and
/// trailing colon stripped.
fn heading_label(inner: &str) -> Option<String> {
    if inner.contains('\n') {
        return None;
    }
    let digits_end = inner.find(|c: char| !c.is_ascii_digit())?;
    if digits_end == 0 {
        return None;
    }
    let rest = inner[digits_end..].strip_prefix('.')?;
    let label = rest.trim_start().strip_suffix(':')?.trim_end();
    if label.is_empty() {
        return None;
    }
    Some(label.to_string())
}

/// Trims a body line and classifies it; blank lines are dropped.
///
/// The bullet marker itself is removed here — rendering prepends the
/// normalized glyph based on `LineKind`.
fn classify_line(line: &str) -> Option<Line> {
    let trimmed = line.trim();
    let mut chars = trimmed.chars();
    let first = chars.next()?;
    if BULLET_MARKERS.contains(&first) {
        Some(Line::sub_point(chars.as_str().trim()))
    } else {
        Some(Line::plain(trimmed))
    }
}
