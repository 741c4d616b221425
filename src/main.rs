//! gpxutils cli - list, split and re-time the tracks of a GPX file

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

use gpxutils::options::{RedistributeOptions, Spacing, DEFAULT_STEP_SECONDS};
use gpxutils::output::{self, OutputFile};
use gpxutils::parser::parse_gpx;
use gpxutils::redistribute::TimeWindow;

#[derive(Debug, Parser)]
#[command(version, about)]
struct Command {
    /// Log progress at info level (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    mode: ModeArgs,
}

#[derive(Debug, Subcommand)]
enum ModeArgs {
    /// List the tracks contained in a file
    Ls {
        /// GPX file to read
        input: PathBuf,
        /// Print the listing as JSON
        #[arg(long)]
        json: bool,
    },
    /// Write every track to its own file
    Split {
        /// GPX file to read
        input: PathBuf,
        /// Output directory
        #[arg(short, long, default_value = "out")]
        out: PathBuf,
    },
    /// Write every track to its own file with evenly spread timestamps
    Timestamp {
        /// GPX file to read
        input: PathBuf,
        /// Time of the first point, RFC3339
        #[arg(long)]
        begin: String,
        /// End of the time window, RFC3339
        #[arg(long)]
        end: String,
        /// Output directory
        #[arg(short, long, default_value = "out")]
        out: PathBuf,
        #[arg(long, value_enum, default_value_t = SpacingArg::Proportional)]
        spacing: SpacingArg,
        /// Seconds between points with --spacing fixed
        #[arg(long, default_value_t = DEFAULT_STEP_SECONDS)]
        step: u32,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SpacingArg {
    Proportional,
    Fixed,
}

impl From<SpacingArg> for Spacing {
    fn from(arg: SpacingArg) -> Self {
        match arg {
            SpacingArg::Proportional => Spacing::Proportional,
            SpacingArg::Fixed => Spacing::Fixed,
        }
    }
}

/// Everything one run needs, validated up front.
#[derive(Debug)]
struct RunConfig {
    input: PathBuf,
    mode: Mode,
}

#[derive(Debug)]
enum Mode {
    List {
        json: bool,
    },
    Split {
        out_dir: PathBuf,
    },
    Timestamp {
        out_dir: PathBuf,
        window: TimeWindow,
        options: RedistributeOptions,
    },
}

impl TryFrom<ModeArgs> for RunConfig {
    type Error = anyhow::Error;

    fn try_from(args: ModeArgs) -> Result<Self> {
        let config = match args {
            ModeArgs::Ls { input, json } => RunConfig {
                input,
                mode: Mode::List { json },
            },
            ModeArgs::Split { input, out } => RunConfig {
                input,
                mode: Mode::Split { out_dir: out },
            },
            ModeArgs::Timestamp {
                input,
                begin,
                end,
                out,
                spacing,
                step,
            } => RunConfig {
                input,
                mode: Mode::Timestamp {
                    out_dir: out,
                    window: TimeWindow::parse(&begin, &end)?,
                    options: RedistributeOptions {
                        spacing: spacing.into(),
                        step_seconds: step,
                    },
                },
            },
        };
        Ok(config)
    }
}

fn main() -> Result<()> {
    let cmd = Command::parse();

    let level = if cmd.verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let config = RunConfig::try_from(cmd.mode)?;
    run(config)
}

fn run(config: RunConfig) -> Result<()> {
    let bytes = fs::read(&config.input)
        .with_context(|| format!("Failed to open {}", config.input.display()))?;
    let doc = parse_gpx(&bytes);
    log::info!(
        "read {} track(s) from {}",
        doc.track_count(),
        config.input.display()
    );

    let stem = output::file_stem(&config.input);
    let (out_dir, files) = match config.mode {
        Mode::List { json } => {
            let listing = output::list_tracks(&doc);
            if json {
                println!("{}", serde_json::to_string_pretty(&listing)?);
            } else {
                for line in listing.lines() {
                    println!("{line}");
                }
            }
            return Ok(());
        }
        Mode::Split { out_dir } => (out_dir, output::split_tracks(&doc, &stem)?),
        Mode::Timestamp {
            out_dir,
            window,
            options,
        } => (
            out_dir,
            output::redistribute_tracks(&doc, &stem, &window, &options)?,
        ),
    };

    write_out(&out_dir, &files)
}

fn write_out(out_dir: &Path, files: &[OutputFile]) -> Result<()> {
    fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create output directory {}", out_dir.display()))?;

    let summary = output::write_files(out_dir, files);
    log::info!(
        "wrote {} file(s) to {}",
        summary.written.len(),
        out_dir.display()
    );
    if !summary.failed.is_empty() {
        log::warn!("{} file(s) could not be written", summary.failed.len());
    }

    Ok(())
}
