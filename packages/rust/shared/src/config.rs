//! Application configuration for Storyboard.
//!
//! User config lives at `~/.storyboard/storyboard.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, StoryboardError};
use crate::types::{ContentFormat, DEFAULT_SEGMENT_MARKER, Policy};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "storyboard.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".storyboard";

// ---------------------------------------------------------------------------
// Config structs (matching storyboard.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Global defaults.
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Segmentation markers.
    #[serde(default)]
    pub markers: MarkersConfig,

    /// Artifact locations and naming.
    #[serde(default)]
    pub output: OutputConfig,
}

/// `[defaults]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Linearization policy.
    #[serde(default)]
    pub policy: Policy,

    /// Content map artifact format.
    #[serde(default)]
    pub content_format: ContentFormat,
}

/// `[markers]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkersConfig {
    /// Token that splits a body into free segments.
    #[serde(default = "default_segment_marker")]
    pub segment: String,
}

impl Default for MarkersConfig {
    fn default() -> Self {
        Self {
            segment: default_segment_marker(),
        }
    }
}

fn default_segment_marker() -> String {
    DEFAULT_SEGMENT_MARKER.into()
}

/// `[output]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Content map artifact path.
    #[serde(default = "default_content_path")]
    pub content_path: String,

    /// Timeline artifact path.
    #[serde(default = "default_timeline_path")]
    pub timeline_path: String,

    /// Name of the exported binding in the module format.
    #[serde(default = "default_export_name")]
    pub export_name: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            content_path: default_content_path(),
            timeline_path: default_timeline_path(),
            export_name: default_export_name(),
        }
    }
}

fn default_content_path() -> String {
    "content.js".into()
}
fn default_timeline_path() -> String {
    "timeline.json".into()
}
fn default_export_name() -> String {
    "sceneContent".into()
}

// ---------------------------------------------------------------------------
// Convert config (runtime, merged from config + CLI flags)
// ---------------------------------------------------------------------------

/// Runtime conversion configuration, merged from config file and CLI flags.
#[derive(Debug, Clone)]
pub struct ConvertConfig {
    /// Source document path.
    pub input: PathBuf,
    /// Content map artifact path.
    pub content_out: PathBuf,
    /// Timeline artifact path.
    pub timeline_out: PathBuf,
    /// Linearization policy.
    pub policy: Policy,
    /// Segment marker token.
    pub marker: String,
    /// Content map format.
    pub format: ContentFormat,
    /// Exported binding name for the module format.
    pub export_name: String,
}

impl ConvertConfig {
    /// Build a runtime config from the app config for a given input file.
    pub fn from_app(config: &AppConfig, input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            content_out: PathBuf::from(&config.output.content_path),
            timeline_out: PathBuf::from(&config.output.timeline_path),
            policy: config.defaults.policy,
            marker: config.markers.segment.clone(),
            format: config.defaults.content_format,
            export_name: config.output.export_name.clone(),
        }
    }

    /// Reject settings that would produce an unusable artifact.
    pub fn validate(&self) -> Result<()> {
        if self.policy == Policy::Segmented && self.marker.trim().is_empty() {
            return Err(StoryboardError::validation(
                "segment marker must not be empty for the segmented policy",
            ));
        }
        if !is_identifier(&self.export_name) {
            return Err(StoryboardError::validation(format!(
                "export name '{}' is not a valid identifier",
                self.export_name
            )));
        }
        if self.content_out == self.timeline_out {
            return Err(StoryboardError::validation(format!(
                "content and timeline outputs both point at {}",
                self.content_out.display()
            )));
        }
        Ok(())
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.storyboard/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| StoryboardError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.storyboard/storyboard.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| StoryboardError::io(path, e))?;

    toml::from_str(&content).map_err(|e| {
        StoryboardError::config(format!("failed to parse {}: {e}", path.display()))
    })
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    init_config_in(&config_dir()?)
}

/// Write a default config file into `dir`, creating it if needed.
pub fn init_config_in(dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(dir).map_err(|e| StoryboardError::io(dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| StoryboardError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| StoryboardError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}
