//! Shared types, error model, and configuration for Storyboard.
//!
//! This crate is the foundation depended on by all other Storyboard crates.
//! It provides:
//! - [`StoryboardError`]: the unified error type
//! - Domain types ([`Document`], [`Section`], [`ContentUnit`], [`Policy`])
//! - Configuration ([`AppConfig`], [`ConvertConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, ConvertConfig, DefaultsConfig, MarkersConfig, OutputConfig, config_dir,
    config_file_path, init_config, init_config_in, load_config, load_config_from,
};
pub use error::{Result, StoryboardError};
pub use types::{
    ContentFormat, ContentUnit, DEFAULT_SEGMENT_MARKER, Document, Policy, Section, UnitKind,
    split_pieces,
};
