//! End-to-end `convert` pipeline: source → parse → linearize → {content map, timeline} → artifacts.

use std::time::{Duration, Instant};

use tracing::{info, instrument};

use storyboard_markdown::{LinearizeOptions, linearize, parse_document};
use storyboard_shared::{ContentUnit, ConvertConfig, Document, Policy, Result, StoryboardError};

use crate::assembler::{self, ArtifactMeta};
use crate::content::{self, ContentMap};
use crate::timeline::{self, Timeline};

/// Both projections of one document, plus the intermediate forms.
#[derive(Debug, Clone)]
pub struct Projection {
    /// Parsed document.
    pub document: Document,
    /// Linearized units, the single source for both outputs.
    pub units: Vec<ContentUnit>,
    /// Display-side content map.
    pub content: ContentMap,
    /// Playback timeline.
    pub timeline: Timeline,
}

/// Result of the `convert` pipeline.
#[derive(Debug)]
pub struct ConvertResult {
    /// Policy the units were keyed with.
    pub policy: Policy,
    /// Number of linearized units.
    pub unit_count: usize,
    /// Number of timeline intervals.
    pub item_count: usize,
    /// Written content map artifact.
    pub content: ArtifactMeta,
    /// Written timeline artifact.
    pub timeline: ArtifactMeta,
    /// Total elapsed time.
    pub elapsed: Duration,
}

/// Parse and linearize `text`, then derive the content map and timeline
/// from the same unit sequence.
pub fn project(text: &str, opts: &LinearizeOptions) -> Projection {
    let document = parse_document(text);
    let units = linearize(&document, opts);
    let content = ContentMap::from_units(&units);
    let timeline = timeline::build_timeline(&units);

    Projection {
        document,
        units,
        content,
        timeline,
    }
}

/// Run the full `convert` pipeline.
///
/// 1. Validate the config
/// 2. Read the source document (fatal if missing, nothing is written)
/// 3. Parse, linearize, build both projections
/// 4. Render both artifacts in memory
/// 5. Write each artifact atomically
#[instrument(skip_all, fields(input = %config.input.display(), policy = %config.policy))]
pub fn convert(config: &ConvertConfig) -> Result<ConvertResult> {
    let start = Instant::now();
    config.validate()?;

    let text = std::fs::read_to_string(&config.input)
        .map_err(|e| StoryboardError::io(&config.input, e))?;

    let projection = project(&text, &LinearizeOptions::from(config));

    let content_text = content::render(&projection.content, config.format, &config.export_name)?;
    let timeline_text = projection.timeline.to_json()?;

    let content = assembler::write_artifact(&config.content_out, &content_text)?;
    let timeline = assembler::write_artifact(&config.timeline_out, &timeline_text)?;

    let result = ConvertResult {
        policy: config.policy,
        unit_count: projection.units.len(),
        item_count: projection.timeline.item_count(),
        content,
        timeline,
        elapsed: start.elapsed(),
    };

    info!(
        units = result.unit_count,
        items = result.item_count,
        "conversion complete"
    );

    Ok(result)
}
