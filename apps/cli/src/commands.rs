//! CLI command definitions, routing, and tracing setup.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use storyboard_core::pipeline;
use storyboard_markdown::LinearizeOptions;
use storyboard_shared::{
    AppConfig, ContentFormat, ConvertConfig, Policy, StoryboardError, config_file_path,
    init_config, load_config,
};
use tracing::info;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// Storyboard: turn narrative Markdown into scene content and a timeline.
#[derive(Parser)]
#[command(
    name = "storyboard",
    version,
    about = "Turn a narrative Markdown document into a scene content map and playback timeline.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Convert a source document into the content map and timeline artifacts.
    Convert {
        /// Source Markdown document.
        input: PathBuf,

        /// Linearization policy: paired or segmented.
        #[arg(short, long)]
        policy: Option<Policy>,

        /// Content map output path.
        #[arg(long)]
        content_out: Option<PathBuf>,

        /// Timeline output path.
        #[arg(long)]
        timeline_out: Option<PathBuf>,

        /// Content map format: module or json.
        #[arg(short, long)]
        format: Option<ContentFormat>,

        /// Segment marker token (segmented policy).
        #[arg(short, long)]
        marker: Option<String>,

        /// Exported binding name in the module format.
        #[arg(long)]
        export_name: Option<String>,
    },

    /// Print the linearized units and their intervals without writing files.
    Inspect {
        /// Source Markdown document.
        input: PathBuf,

        /// Linearization policy: paired or segmented.
        #[arg(short, long)]
        policy: Option<Policy>,

        /// Segment marker token (segmented policy).
        #[arg(short, long)]
        marker: Option<String>,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "storyboard=info",
        1 => "storyboard=debug",
        _ => "storyboard=trace",
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Convert {
            input,
            policy,
            content_out,
            timeline_out,
            format,
            marker,
            export_name,
        } => {
            let mut config = ConvertConfig::from_app(&load_config()?, input);
            merge_flags(&mut config, policy, marker);
            if let Some(path) = content_out {
                config.content_out = path;
            }
            if let Some(path) = timeline_out {
                config.timeline_out = path;
            }
            if let Some(format) = format {
                config.format = format;
            }
            if let Some(name) = export_name {
                config.export_name = name;
            }
            cmd_convert(&config)
        }
        Command::Inspect {
            input,
            policy,
            marker,
        } => {
            let mut config = ConvertConfig::from_app(&load_config()?, input);
            merge_flags(&mut config, policy, marker);
            cmd_inspect(&config)
        }
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(),
        },
    }
}

/// Apply the flags shared by `convert` and `inspect`.
fn merge_flags(config: &mut ConvertConfig, policy: Option<Policy>, marker: Option<String>) {
    if let Some(policy) = policy {
        config.policy = policy;
    }
    if let Some(marker) = marker {
        config.marker = marker;
    }
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

fn cmd_convert(config: &ConvertConfig) -> Result<()> {
    info!(
        input = %config.input.display(),
        policy = %config.policy,
        format = %config.format,
        "converting story document"
    );

    let result = pipeline::convert(config).map_err(|e| match e {
        StoryboardError::Io { ref path, .. } if path == &config.input => {
            eyre!("cannot read source document '{}': {e}", config.input.display())
        }
        other => other.into(),
    })?;

    println!();
    println!("  Story converted!");
    println!("  Policy:   {}", result.policy);
    println!("  Units:    {}", result.unit_count);
    println!("  Scenes:   {}", result.item_count);
    println!(
        "  Content:  {} ({} bytes, sha256 {})",
        result.content.path.display(),
        result.content.size_bytes,
        &result.content.sha256[..12]
    );
    println!(
        "  Timeline: {} ({} bytes, sha256 {})",
        result.timeline.path.display(),
        result.timeline.size_bytes,
        &result.timeline.sha256[..12]
    );
    println!("  Time:     {:.1}ms", result.elapsed.as_secs_f64() * 1000.0);
    println!();

    Ok(())
}

fn cmd_inspect(config: &ConvertConfig) -> Result<()> {
    config.validate()?;

    let text = std::fs::read_to_string(&config.input)
        .map_err(|e| eyre!("cannot read source document '{}': {e}", config.input.display()))?;

    let projection = pipeline::project(&text, &LinearizeOptions::from(config));

    println!(
        "{} ({} policy): {} units, {} scenes",
        config.input.display(),
        config.policy,
        projection.units.len(),
        projection.timeline.item_count()
    );
    println!();
    println!("  {:<4} {:<20} {:<12} {:<22} text", "key", "id", "type", "interval");

    for (unit, entry) in projection.units.iter().zip(&projection.timeline.entries) {
        let interval = format!("[{:.4}, {:.4})", entry.entry_at, entry.exit_at);
        println!(
            "  {:<4} {:<20} {:<12} {:<22} {}",
            unit.key,
            unit.id,
            unit.kind.wire_name(),
            interval,
            preview(&unit.text, 48)
        );
    }

    Ok(())
}

/// First line of `text`, cut to `max` characters.
fn preview(text: &str, max: usize) -> String {
    let line = text.lines().next().unwrap_or("");
    let mut out: String = line.chars().take(max).collect();
    if line.chars().count() > max || text.contains('\n') {
        out.push('…');
    }
    out
}

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show() -> Result<()> {
    let config: AppConfig = load_config()?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("# {}", config_file_path()?.display());
    println!("{toml_str}");
    Ok(())
}
