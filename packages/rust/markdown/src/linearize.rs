//! Flatten a [`Document`] into an ordered list of keyed [`ContentUnit`]s.
//!
//! Keys are dense: only non-empty text receives one, so the key set is always
//! a contiguous integer run. Units that share a key form one scene.

use tracing::{debug, instrument, trace};

use storyboard_shared::{
    ContentUnit, ConvertConfig, DEFAULT_SEGMENT_MARKER, Document, Policy, UnitKind,
};

/// Options controlling linearization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinearizeOptions {
    /// Which keying scheme to apply.
    pub policy: Policy,
    /// Token splitting bodies into segments (segmented policy only).
    pub marker: String,
}

impl Default for LinearizeOptions {
    fn default() -> Self {
        Self {
            policy: Policy::default(),
            marker: DEFAULT_SEGMENT_MARKER.to_string(),
        }
    }
}

impl From<&ConvertConfig> for LinearizeOptions {
    fn from(config: &ConvertConfig) -> Self {
        Self {
            policy: config.policy,
            marker: config.marker.clone(),
        }
    }
}

/// Flatten `doc` according to `opts.policy`.
///
/// The result is ordered by non-decreasing key and follows document order.
#[instrument(skip_all, fields(policy = %opts.policy, sections = doc.sections.len()))]
pub fn linearize(doc: &Document, opts: &LinearizeOptions) -> Vec<ContentUnit> {
    let units = match opts.policy {
        Policy::Paired => linearize_paired(doc),
        Policy::Segmented => linearize_segmented(doc, &opts.marker),
    };

    debug!(units = units.len(), "document linearized");
    units
}

/// Paired policy: `title` / `description-title` at position 0, then
/// `header-{i}` / `description-{i}` for each kept section, 1-based.
fn linearize_paired(doc: &Document) -> Vec<ContentUnit> {
    let mut units = Vec::with_capacity(doc.sections.len() * 2 + 2);

    if let Some(title) = non_empty(doc.title.as_deref()) {
        units.push(ContentUnit::new("title", UnitKind::Title, 0, title));
    }
    if let Some(lead) = non_empty(doc.leading_body.as_deref()) {
        units.push(ContentUnit::new(
            "description-title",
            UnitKind::Description,
            0,
            lead,
        ));
    }

    let mut position: u32 = 0;
    for section in &doc.sections {
        let header = non_empty(Some(section.header.as_str()));
        let body = non_empty(Some(section.body.as_str()));

        if header.is_none() && body.is_none() {
            trace!("dropping empty section");
            continue;
        }

        position += 1;
        if let Some(header) = header {
            units.push(ContentUnit::new(
                format!("header-{position}"),
                UnitKind::Header,
                position,
                header,
            ));
        }
        if let Some(body) = body {
            units.push(ContentUnit::new(
                format!("description-{position}"),
                UnitKind::Description,
                position,
                body,
            ));
        }
    }

    units
}

/// Segmented policy: one shared 0-based counter over every body piece.
///
/// The title is `header-0`. A section header takes the key of its first
/// piece and is dropped when the body has no pieces or the key already has
/// a header.
fn linearize_segmented(doc: &Document, marker: &str) -> Vec<ContentUnit> {
    let mut units = Vec::new();
    let mut counter: u32 = 0;
    let mut last_header_key: Option<u32> = None;

    if let Some(title) = non_empty(doc.title.as_deref()) {
        units.push(ContentUnit::new("header-0", UnitKind::Title, 0, title));
        last_header_key = Some(0);
    }

    for piece in doc.leading_pieces(marker) {
        push_segment(&mut units, &mut counter, piece);
    }

    for section in &doc.sections {
        let pieces = section.pieces(marker);
        if pieces.is_empty() {
            trace!(header = %section.header, "dropping section without pieces");
            continue;
        }

        if let Some(header) = non_empty(Some(section.header.as_str())) {
            if last_header_key == Some(counter) {
                debug!(key = counter, header, "header key already taken, dropping header");
            } else {
                units.push(ContentUnit::new(
                    format!("header-{counter}"),
                    UnitKind::Header,
                    counter,
                    header,
                ));
                last_header_key = Some(counter);
            }
        }

        for piece in pieces {
            push_segment(&mut units, &mut counter, piece);
        }
    }

    units
}

fn push_segment(units: &mut Vec<ContentUnit>, counter: &mut u32, piece: &str) {
    units.push(ContentUnit::new(
        format!("segment-{counter}"),
        UnitKind::Segment,
        *counter,
        piece,
    ));
    *counter += 1;
}

fn non_empty(text: Option<&str>) -> Option<&str> {
    text.map(str::trim).filter(|t| !t.is_empty())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
