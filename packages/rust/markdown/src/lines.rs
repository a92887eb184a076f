//! Line classification ahead of structural parsing.
//!
//! Splits text into lines (accepting `\n` and `\r\n`) and tags each one as
//! either plain or inside a fenced code block, so heading markers in code
//! samples never become structural boundaries.

/// A source line, tagged by whether it can carry a heading marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Line<'a> {
    /// Outside any code fence.
    Plain(&'a str),
    /// A fence delimiter or a line inside a fenced block.
    Fenced(&'a str),
}

/// Classify every line of `text`.
pub(crate) fn classify_lines(text: &str) -> Vec<Line<'_>> {
    let mut fence: Option<&str> = None;
    let mut out = Vec::new();

    for raw in text.lines() {
        let raw = raw.strip_suffix('\r').unwrap_or(raw);
        let trimmed = raw.trim_start();

        match fence {
            Some(open) => {
                if trimmed.starts_with(open) {
                    fence = None;
                }
                out.push(Line::Fenced(raw));
            }
            None => {
                if let Some(open) = fence_delimiter(trimmed) {
                    fence = Some(open);
                    out.push(Line::Fenced(raw));
                } else {
                    out.push(Line::Plain(raw));
                }
            }
        }
    }

    out
}

/// The fence style a line opens, if any.
fn fence_delimiter(trimmed: &str) -> Option<&'static str> {
    if trimmed.starts_with("```") {
        Some("```")
    } else if trimmed.starts_with("~~~") {
        Some("~~~")
    } else {
        None
    }
}
