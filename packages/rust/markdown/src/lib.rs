//! Structural parsing and linearization of narrative Markdown.
//!
//! [`parse_document`] turns raw text into a [`Document`] (title, leading body,
//! headed sections). [`linearize`] flattens that document into keyed
//! [`ContentUnit`]s under one of the two [`Policy`] variants.

mod lines;
mod linearize;

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, instrument};

use storyboard_shared::{Document, Section};

pub use linearize::{LinearizeOptions, linearize};
pub use storyboard_shared::{ContentUnit, Policy, UnitKind};

use lines::{Line, classify_lines};

// ---------------------------------------------------------------------------
// Heading markers
// ---------------------------------------------------------------------------

/// Level-1 heading: exactly one `#`, one space, then text.
static TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^# (.+)$").expect("valid regex"));

/// Section heading: two or more `#`, one space, then text.
static SECTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(#{2,}) (.+)$").expect("valid regex"));

// ---------------------------------------------------------------------------
// Parser
// ---------------------------------------------------------------------------

/// Where body lines currently accumulate.
enum Region {
    /// Before both the title and the first section; discarded.
    Preamble,
    /// Between the title line and the first section heading.
    Leading,
    /// Inside the section at this index.
    Section(usize),
}

/// Parse raw narrative text into a [`Document`].
///
/// - The first `# ` line is the title; later `# ` lines are body text.
/// - Each `## `, `### `, ... line starts a section.
/// - Text between the title and the first section is the leading body.
/// - Headings inside fenced code blocks are body text.
///
/// Never fails: missing pieces degrade to `None` or an empty section list.
#[instrument(skip_all, fields(len = text.len()))]
pub fn parse_document(text: &str) -> Document {
    let mut title: Option<String> = None;
    let mut title_seen = false;
    let mut leading: Vec<&str> = Vec::new();
    let mut sections: Vec<(u8, String, Vec<&str>)> = Vec::new();
    let mut region = Region::Preamble;

    for line in classify_lines(text) {
        let raw = match line {
            Line::Fenced(raw) => {
                push_body(&mut region, &mut leading, &mut sections, raw);
                continue;
            }
            Line::Plain(raw) => raw,
        };

        if !title_seen {
            if let Some(caps) = TITLE_RE.captures(raw) {
                title_seen = true;
                let heading = caps[1].trim();
                title = (!heading.is_empty()).then(|| heading.to_string());
                if sections.is_empty() {
                    region = Region::Leading;
                }
                continue;
            }
        }

        if let Some(caps) = SECTION_RE.captures(raw) {
            let level = u8::try_from(caps[1].len()).unwrap_or(u8::MAX);
            sections.push((level, caps[2].trim().to_string(), Vec::new()));
            region = Region::Section(sections.len() - 1);
            continue;
        }

        push_body(&mut region, &mut leading, &mut sections, raw);
    }

    let leading_body = Some(leading.join("\n").trim().to_string()).filter(|b| !b.is_empty());

    let sections: Vec<Section> = sections
        .into_iter()
        .map(|(level, header, body)| Section {
            level,
            header,
            body: body.join("\n").trim().to_string(),
        })
        .collect();

    debug!(
        has_title = title.is_some(),
        has_leading = leading_body.is_some(),
        sections = sections.len(),
        "document parsed"
    );

    Document {
        title,
        leading_body,
        sections,
    }
}

fn push_body<'a>(
    region: &mut Region,
    leading: &mut Vec<&'a str>,
    sections: &mut [(u8, String, Vec<&'a str>)],
    line: &'a str,
) {
    match region {
        Region::Preamble => {}
        Region::Leading => leading.push(line),
        Region::Section(idx) => sections[*idx].2.push(line),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
