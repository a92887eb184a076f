//! Content map construction and rendering.
//!
//! The content map is the display-side projection of the linearized units:
//! an ordered `id -> text` table, rendered either as a JavaScript module
//! (`export const sceneContent = { ... };`) or as a JSON object.

use serde::ser::{Serialize, SerializeMap, Serializer};
use tracing::{debug, instrument};

use storyboard_shared::{ContentFormat, ContentUnit, Result};

/// Static navigation entries appended after every dynamic entry.
pub const NAVIGATION_ENTRIES: [(&str, &str); 2] =
    [("return-to-story", "⌃"), ("forward-to-story", "⌃")];

// ---------------------------------------------------------------------------
// ContentMap
// ---------------------------------------------------------------------------

/// Ordered `id -> text` table. Insertion order is linearization order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentMap {
    entries: Vec<(String, String)>,
}

impl ContentMap {
    /// Build the map from linearized units, then append the navigation entries.
    pub fn from_units(units: &[ContentUnit]) -> Self {
        let mut entries: Vec<(String, String)> = units
            .iter()
            .map(|unit| (unit.id.clone(), unit.text.clone()))
            .collect();

        entries.extend(
            NAVIGATION_ENTRIES
                .iter()
                .map(|(key, glyph)| ((*key).to_string(), (*glyph).to_string())),
        );

        Self { entries }
    }

    /// Look up a value by key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Iterate entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for ContentMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Render the map in the requested format.
#[instrument(skip(map), fields(entries = map.len()))]
pub fn render(map: &ContentMap, format: ContentFormat, export_name: &str) -> Result<String> {
    let out = match format {
        ContentFormat::Module => render_module(map, export_name),
        ContentFormat::Json => render_json(map)?,
    };
    debug!(bytes = out.len(), "content map rendered");
    Ok(out)
}

/// Render the map as an `export const <name> = { ... };` module.
///
/// Single-line values are double-quoted; multi-line values become backtick
/// raw blocks followed by a blank line. The final entry has no separator.
pub fn render_module(map: &ContentMap, export_name: &str) -> String {
    if map.is_empty() {
        return format!("export const {export_name} = {{}};\n");
    }

    let mut out = format!("export const {export_name} = {{\n");
    let last = map.len() - 1;

    for (idx, (key, value)) in map.iter().enumerate() {
        let multi_line = is_multi_line(value);
        let rendered = if multi_line {
            quote_raw_block(value)
        } else {
            quote_single_line(value)
        };

        out.push_str("    ");
        out.push_str(&quote_single_line(key));
        out.push_str(": ");
        out.push_str(&rendered);

        if idx < last {
            out.push(',');
            out.push('\n');
            if multi_line {
                out.push('\n');
            }
        } else {
            out.push('\n');
        }
    }

    out.push_str("};\n");
    out
}

/// Render the map as a pretty-printed JSON object in insertion order.
pub fn render_json(map: &ContentMap) -> Result<String> {
    let mut json = serde_json::to_string_pretty(map)?;
    json.push('\n');
    Ok(json)
}

/// A value is multi-line when it contains a line break.
pub fn is_multi_line(value: &str) -> bool {
    value.contains('\n') || value.contains('\r')
}

/// Quote a single-line value. Only the `"` delimiter is escaped.
pub fn quote_single_line(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\\\""))
}

/// Quote a multi-line value as a backtick raw block.
pub fn quote_raw_block(value: &str) -> String {
    format!("`{}`", escape_raw_block(value))
}

/// Escape text for a backtick raw block.
///
/// Backslashes are doubled first, then the block delimiter and the `${`
/// interpolation opener are backslash-escaped. A single unescape pass
/// (`\x` -> `x`) restores the input. Line breaks and quotes pass through.
pub fn escape_raw_block(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('`', "\\`")
        .replace("${", "\\${")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use storyboard_shared::UnitKind;

    fn unit(id: &str, kind: UnitKind, key: u32, text: &str) -> ContentUnit {
        ContentUnit::new(id, kind, key, text)
    }

    fn sample_units() -> Vec<ContentUnit> {
        vec![
            unit("title", UnitKind::Title, 0, "Intro"),
            unit("description-title", UnitKind::Description, 0, "line one\nline two"),
            unit("header-1", UnitKind::Header, 1, "Say \"hi\""),
            unit("description-1", UnitKind::Description, 1, "single"),
        ]
    }

    /// Single unescape pass, as a reader of the raw block would apply it.
    fn unescape(block: &str) -> String {
        let mut out = String::new();
        let mut chars = block.chars();
        while let Some(c) = chars.next() {
            if c == '\\' {
                if let Some(next) = chars.next() {
                    out.push(next);
                }
            } else {
                out.push(c);
            }
        }
        out
    }

    #[test]
    fn map_preserves_unit_order_then_navigation() {
        let map = ContentMap::from_units(&sample_units());
        let keys: Vec<&str> = map.keys().collect();
        assert_eq!(
            keys,
            vec![
                "title",
                "description-title",
                "header-1",
                "description-1",
                "return-to-story",
                "forward-to-story",
            ]
        );
        assert_eq!(map.get("header-1"), Some("Say \"hi\""));
        assert_eq!(map.get("forward-to-story"), Some("⌃"));
        assert_eq!(map.get("missing"), None);
    }

    #[test]
    fn navigation_entries_present_for_empty_input() {
        let map = ContentMap::from_units(&[]);
        assert_eq!(map.len(), 2);
        let rendered = render_module(&map, "sceneContent");
        assert_eq!(
            rendered,
            "export const sceneContent = {\n    \"return-to-story\": \"⌃\",\n    \"forward-to-story\": \"⌃\"\n};\n"
        );
    }

    #[test]
    fn module_has_no_dangling_separator() {
        let map = ContentMap::from_units(&sample_units());
        let rendered = render_module(&map, "sceneContent");
        assert!(rendered.starts_with("export const sceneContent = {\n"));
        assert!(rendered.ends_with("    \"forward-to-story\": \"⌃\"\n};\n"));
        assert!(!rendered.contains(",\n};"));
        assert!(!rendered.contains(",\n\n};"));
    }

    #[test]
    fn multi_line_value_as_raw_block() {
        let map = ContentMap::from_units(&sample_units());
        let rendered = render_module(&map, "sceneContent");
        assert!(rendered.contains("    \"description-title\": `line one\nline two`,\n\n"));
        assert!(rendered.contains("    \"description-1\": \"single\",\n    \"return-to-story\""));
    }

    #[test]
    fn single_line_escapes_only_quotes() {
        assert_eq!(quote_single_line(r#"Say "hi""#), r#""Say \"hi\"""#);
        assert_eq!(quote_single_line("it's `fine`"), "\"it's `fine`\"");
    }

    #[test]
    fn raw_block_doubles_backslashes() {
        let text = "$$\\alpha + \\beta$$\nnext";
        assert_eq!(escape_raw_block(text), "$$\\\\alpha + \\\\beta$$\nnext");
        assert_eq!(unescape(&escape_raw_block(text)), text);
    }

    #[test]
    fn raw_block_keeps_quotes_and_escapes_delimiters() {
        let text = "She said \"go\" and 'stay'\nuse `code` and ${x}";
        let escaped = escape_raw_block(text);
        assert!(escaped.contains("\"go\""));
        assert!(escaped.contains("'stay'"));
        assert!(escaped.contains("\\`code\\`"));
        assert!(escaped.contains("\\${x}"));
        assert_eq!(unescape(&escaped), text);
    }

    #[test]
    fn trailing_multi_line_entry_has_no_comma() {
        let map = ContentMap {
            entries: vec![("segment-0".into(), "a\nb".into())],
        };
        assert_eq!(
            render_module(&map, "x"),
            "export const x = {\n    \"segment-0\": `a\nb`\n};\n"
        );
    }

    #[test]
    fn empty_map_renders_empty_object() {
        assert_eq!(render_module(&ContentMap::default(), "x"), "export const x = {};\n");
    }

    #[test]
    fn json_keeps_insertion_order() {
        let map = ContentMap::from_units(&sample_units());
        let json = render(&map, ContentFormat::Json, "unused").unwrap();
        let title_at = json.find("\"title\"").unwrap();
        let header_at = json.find("\"header-1\"").unwrap();
        let nav_at = json.find("\"return-to-story\"").unwrap();
        assert!(title_at < header_at && header_at < nav_at);

        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["description-title"], "line one\nline two");
    }

    proptest! {
        #[test]
        fn raw_block_round_trips(text in "[a-z\\\\`$ {}\n\"']{0,40}") {
            prop_assert_eq!(unescape(&escape_raw_block(&text)), text);
        }
    }
}
