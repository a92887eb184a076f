//! Storyboard CLI: narrative Markdown to scene content and playback timeline.
//!
//! Converts a hand-authored story document into the content map and the
//! timeline config read by the presentation engine.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli)
}
