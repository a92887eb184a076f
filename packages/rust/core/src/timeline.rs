//! Timeline generation.
//!
//! Splits playback progress `[0, 1]` evenly across the document's items (the
//! groups of units sharing a key) and gives every unit its item's
//! `[entry_at, exit_at)` interval. Headers and their bodies are simultaneous.

use serde::Serialize;
use tracing::{debug, instrument};

use storyboard_shared::{ContentUnit, Result, UnitKind};

/// A content unit paired with its active progress interval.
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineEntry {
    /// Lookup key into the content map.
    pub id: String,
    /// Role of the unit on screen.
    pub kind: UnitKind,
    /// Display text.
    pub content: String,
    /// Progress at which the unit enters.
    pub entry_at: f64,
    /// Progress at which the unit exits.
    pub exit_at: f64,
}

/// Ordered timeline entries. Serializes as the wire array consumed by the
/// presentation engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Timeline {
    pub entries: Vec<TimelineEntry>,
}

impl Timeline {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of distinct intervals.
    pub fn item_count(&self) -> usize {
        let mut count = 0;
        let mut last: Option<f64> = None;
        for entry in &self.entries {
            if last != Some(entry.entry_at) {
                count += 1;
                last = Some(entry.entry_at);
            }
        }
        count
    }

    /// Pretty-printed JSON array.
    pub fn to_json(&self) -> Result<String> {
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        Ok(json)
    }
}

// ---------------------------------------------------------------------------
// Wire format
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct WireEntry<'a> {
    id: &'a str,
    #[serde(rename = "type")]
    kind: UnitKind,
    content: &'a str,
    transition: WireTransition,
}

#[derive(Serialize)]
struct WireTransition {
    entry_from: WirePoint,
    exit_to: WirePoint,
}

#[derive(Serialize)]
struct WirePoint {
    at: f64,
}

impl Serialize for TimelineEntry {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        WireEntry {
            id: &self.id,
            kind: self.kind,
            content: &self.content,
            transition: WireTransition {
                entry_from: WirePoint { at: self.entry_at },
                exit_to: WirePoint { at: self.exit_at },
            },
        }
        .serialize(serializer)
    }
}

// ---------------------------------------------------------------------------
// Generator
// ---------------------------------------------------------------------------

/// Build the timeline for linearized `units`.
///
/// Consecutive units with the same key form one item. With `n` items, item
/// `i` spans `[i / n, (i + 1) / n)`, where every boundary is the single
/// product `k * (1 / n)` and the final boundary is exactly `1.0`. No items
/// means an empty timeline.
#[instrument(skip_all, fields(units = units.len()))]
pub fn build_timeline(units: &[ContentUnit]) -> Timeline {
    let item_count = count_items(units);
    if item_count == 0 {
        debug!("no items, empty timeline");
        return Timeline::default();
    }

    let duration = 1.0 / item_count as f64;
    let mut entries = Vec::with_capacity(units.len());
    let mut ordinal = 0usize;
    let mut current_key: Option<u32> = None;

    for unit in units {
        match current_key {
            Some(key) if key == unit.key => {}
            Some(_) => {
                ordinal += 1;
                current_key = Some(unit.key);
            }
            None => current_key = Some(unit.key),
        }

        entries.push(TimelineEntry {
            id: unit.id.clone(),
            kind: unit.kind,
            content: unit.text.clone(),
            entry_at: boundary(ordinal, item_count, duration),
            exit_at: boundary(ordinal + 1, item_count, duration),
        });
    }

    debug!(items = item_count, entries = entries.len(), duration, "timeline built");

    Timeline { entries }
}

/// Number of runs of equal keys.
fn count_items(units: &[ContentUnit]) -> usize {
    let mut count = 0;
    let mut last: Option<u32> = None;
    for unit in units {
        if last != Some(unit.key) {
            count += 1;
            last = Some(unit.key);
        }
    }
    count
}

/// Progress at boundary `k` of `n`.
fn boundary(k: usize, n: usize, duration: f64) -> f64 {
    if k >= n { 1.0 } else { k as f64 * duration }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn unit(id: &str, kind: UnitKind, key: u32) -> ContentUnit {
        ContentUnit::new(id, kind, key, format!("text of {id}"))
    }

    /// One unit per key, keys `0..n`.
    fn items(n: u32) -> Vec<ContentUnit> {
        (0..n)
            .map(|k| unit(&format!("segment-{k}"), UnitKind::Segment, k))
            .collect()
    }

    fn assert_contiguous(timeline: &Timeline) {
        let entries = &timeline.entries;
        assert_eq!(entries[0].entry_at, 0.0);
        assert_eq!(entries[entries.len() - 1].exit_at, 1.0);
        for pair in entries.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            if a.entry_at == b.entry_at {
                assert_eq!(a.exit_at, b.exit_at, "simultaneous entries disagree");
            } else {
                assert_eq!(b.entry_at, a.exit_at, "gap or overlap between {} and {}", a.id, b.id);
            }
            assert!(a.entry_at < a.exit_at);
        }
    }

    #[test]
    fn empty_units_give_empty_timeline() {
        let timeline = build_timeline(&[]);
        assert!(timeline.is_empty());
        assert_eq!(timeline.item_count(), 0);
        assert_eq!(timeline.to_json().unwrap(), "[]\n");
    }

    #[test]
    fn three_items_split_in_thirds() {
        let units = vec![
            unit("title", UnitKind::Title, 0),
            unit("header-1", UnitKind::Header, 1),
            unit("description-1", UnitKind::Description, 1),
            unit("header-2", UnitKind::Header, 2),
            unit("description-2", UnitKind::Description, 2),
        ];
        let timeline = build_timeline(&units);
        let third = 1.0 / 3.0;

        assert_eq!(timeline.item_count(), 3);
        let e = &timeline.entries;
        assert_eq!((e[0].entry_at, e[0].exit_at), (0.0, third));
        assert_eq!((e[1].entry_at, e[1].exit_at), (third, 2.0 * third));
        assert_eq!((e[2].entry_at, e[2].exit_at), (third, 2.0 * third));
        assert_eq!((e[3].entry_at, e[3].exit_at), (2.0 * third, 1.0));
        assert_eq!((e[4].entry_at, e[4].exit_at), (2.0 * third, 1.0));
    }

    #[test]
    fn header_and_description_are_simultaneous() {
        let units = vec![
            unit("header-1", UnitKind::Header, 1),
            unit("description-1", UnitKind::Description, 1),
        ];
        let timeline = build_timeline(&units);
        assert_eq!(timeline.entries[0].entry_at, timeline.entries[1].entry_at);
        assert_eq!(timeline.entries[0].exit_at, 1.0);
        assert_eq!(timeline.entries[1].exit_at, 1.0);
    }

    #[test]
    fn single_item_spans_everything() {
        let timeline = build_timeline(&items(1));
        assert_eq!(timeline.entries[0].entry_at, 0.0);
        assert_eq!(timeline.entries[0].exit_at, 1.0);
    }

    #[test]
    fn boundaries_exact_for_awkward_counts() {
        for n in 1..=120 {
            let timeline = build_timeline(&items(n));
            assert_eq!(timeline.len(), n as usize);
            assert_contiguous(&timeline);
        }
    }

    #[test]
    fn wire_format_shape() {
        let units = vec![
            unit("title", UnitKind::Title, 0),
            unit("segment-1", UnitKind::Segment, 1),
        ];
        let json = build_timeline(&units).to_json().unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed[0]["id"], "title");
        assert_eq!(parsed[0]["type"], "titleText");
        assert_eq!(parsed[0]["content"], "text of title");
        assert_eq!(parsed[0]["transition"]["entry_from"]["at"], 0.0);
        assert_eq!(parsed[0]["transition"]["exit_to"]["at"], 0.5);
        assert_eq!(parsed[1]["type"], "segment");
        assert_eq!(parsed[1]["transition"]["entry_from"]["at"], 0.5);
        assert_eq!(parsed[1]["transition"]["exit_to"]["at"], 1.0);
    }

    proptest! {
        #[test]
        fn grouped_units_stay_contiguous(group_sizes in proptest::collection::vec(1usize..4, 1..40)) {
            let mut units = Vec::new();
            for (key, size) in group_sizes.iter().enumerate() {
                for part in 0..*size {
                    units.push(unit(&format!("u-{key}-{part}"), UnitKind::Segment, key as u32));
                }
            }
            let timeline = build_timeline(&units);
            prop_assert_eq!(timeline.item_count(), group_sizes.len());
            assert_contiguous(&timeline);
        }
    }
}
