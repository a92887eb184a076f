//! Content map, timeline, and artifact pipeline for Storyboard.
//!
//! This crate takes the linearized units produced by `storyboard-markdown`
//! and projects them into the two artifacts the presentation engine reads:
//! the content map and the playback timeline (e.g., `pipeline::convert`).

pub mod assembler;
pub mod content;
pub mod pipeline;
pub mod timeline;
