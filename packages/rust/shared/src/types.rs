//! Core domain types for Storyboard documents and their linearized form.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::StoryboardError;

/// Default token that splits a body into free segments.
pub const DEFAULT_SEGMENT_MARKER: &str = "[segment]";

// ---------------------------------------------------------------------------
// Document
// ---------------------------------------------------------------------------

/// A parsed narrative document: optional title, optional leading body, and
/// the headed sections in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    /// Text of the first level-1 heading, trimmed.
    pub title: Option<String>,
    /// Text between the title line and the first section heading, trimmed.
    pub leading_body: Option<String>,
    /// Sections in source order.
    pub sections: Vec<Section>,
}

impl Document {
    /// Marker-delimited, non-empty pieces of the leading body.
    pub fn leading_pieces<'a>(&'a self, marker: &str) -> Vec<&'a str> {
        match &self.leading_body {
            Some(body) => split_pieces(body, marker),
            None => Vec::new(),
        }
    }

    /// True when the document has neither a title nor any section.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.leading_body.is_none() && self.sections.is_empty()
    }
}

/// A headed section (`## Header`) and the body text up to the next heading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// Heading depth: 2 for `##`, 3 for `###`, and so on.
    pub level: u8,
    /// Heading text, trimmed. May be empty.
    pub header: String,
    /// Body text, trimmed. May be empty.
    pub body: String,
}

impl Section {
    /// Marker-delimited, non-empty pieces of this section's body.
    pub fn pieces<'a>(&'a self, marker: &str) -> Vec<&'a str> {
        split_pieces(&self.body, marker)
    }
}

/// Split `text` on `marker`, trimming each piece and dropping empty ones.
///
/// An empty marker never splits.
pub fn split_pieces<'a>(text: &'a str, marker: &str) -> Vec<&'a str> {
    if marker.is_empty() {
        let trimmed = text.trim();
        return if trimmed.is_empty() {
            Vec::new()
        } else {
            vec![trimmed]
        };
    }

    text.split(marker)
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .collect()
}

// ---------------------------------------------------------------------------
// ContentUnit
// ---------------------------------------------------------------------------

/// What role a content unit plays on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnitKind {
    /// The document title.
    Title,
    /// A section header.
    Header,
    /// A whole section body (paired policy).
    Description,
    /// One marker-delimited body piece (segmented policy).
    Segment,
}

impl UnitKind {
    /// Name used for the `type` field of the timeline wire format.
    pub fn wire_name(self) -> &'static str {
        match self {
            Self::Title => "titleText",
            Self::Header => "header",
            Self::Description => "description",
            Self::Segment => "segment",
        }
    }

    /// Header-like units (title and headers), as opposed to body units.
    pub fn is_header(self) -> bool {
        matches!(self, Self::Title | Self::Header)
    }
}

impl Serialize for UnitKind {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.wire_name())
    }
}

/// One addressable piece of narrative text with a stable identifier.
///
/// Units sharing a `key` belong to the same scene and are shown together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentUnit {
    /// Stable lookup id, e.g. `header-3`, `description-title`, `segment-5`.
    pub id: String,
    /// Role of the unit.
    pub kind: UnitKind,
    /// Dense scene key.
    pub key: u32,
    /// Display text, trimmed and non-empty.
    pub text: String,
}

impl ContentUnit {
    pub fn new(id: impl Into<String>, kind: UnitKind, key: u32, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind,
            key,
            text: text.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Policy / ContentFormat
// ---------------------------------------------------------------------------

/// How a document is flattened into content units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Policy {
    /// One header/description pair per section, 1-based, title at position 0.
    #[default]
    Paired,
    /// Marker-delimited free segmentation sharing one 0-based counter.
    Segmented,
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Paired => write!(f, "paired"),
            Self::Segmented => write!(f, "segmented"),
        }
    }
}

impl FromStr for Policy {
    type Err = StoryboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "paired" => Ok(Self::Paired),
            "segmented" | "segments" => Ok(Self::Segmented),
            other => Err(StoryboardError::parse(format!(
                "unknown policy '{other}': expected 'paired' or 'segmented'"
            ))),
        }
    }
}

/// Output format of the content map artifact.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentFormat {
    /// `export const <name> = { ... };` module.
    #[default]
    Module,
    /// Plain JSON object.
    Json,
}

impl fmt::Display for ContentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Module => write!(f, "module"),
            Self::Json => write!(f, "json"),
        }
    }
}

impl FromStr for ContentFormat {
    type Err = StoryboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "module" | "js" => Ok(Self::Module),
            "json" => Ok(Self::Json),
            other => Err(StoryboardError::parse(format!(
                "unknown content format '{other}': expected 'module' or 'json'"
            ))),
        }
    }
}
