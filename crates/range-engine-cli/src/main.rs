//! `range-engine` — resolve a date-range picker configuration from the command line.
//!
//! Reads picker options as JSON (from a file or stdin) and prints either the
//! resolved picker state or the full render model as JSON.

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::{NaiveDateTime, Utc};
use chrono_tz::Tz;
use clap::{Args, Parser, Subcommand};
use range_engine::{render, resolve, PickerOptions};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "range-engine", version, about = "Date-range picker state and view model")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the render model (classes, range list, calendars, buttons)
    Render(CommonArgs),
    /// Print the resolved state (selection, widened bounds, normalized ranges)
    Resolve(CommonArgs),
}

#[derive(Args)]
struct CommonArgs {
    /// Options file (JSON); "-" reads stdin
    #[arg(short, long, default_value = "-")]
    input: PathBuf,

    /// Anchor for the default selection, e.g. 2024-02-10T09:30:00
    #[arg(long)]
    now: Option<NaiveDateTime>,

    /// IANA timezone used for the wall-clock "now" when --now is not given
    #[arg(long, default_value = "UTC")]
    timezone: String,

    /// Single-line JSON output
    #[arg(long)]
    compact: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let (args, render_view) = match &cli.command {
        Command::Render(args) => (args, true),
        Command::Resolve(args) => (args, false),
    };

    let json = read_input(&args.input)?;
    let options = PickerOptions::from_json(&json).context("failed to read picker options")?;
    let now = match args.now {
        Some(now) => now,
        None => wall_clock(&args.timezone)?,
    };
    debug!(%now, input = %args.input.display(), "resolving picker");

    let output = if render_view {
        let view = render(&options, now).context("failed to render picker")?;
        to_json(&view, args.compact)?
    } else {
        let resolved = resolve(&options, now).context("failed to resolve picker")?;
        to_json(&resolved, args.compact)?
    };

    println!("{output}");
    Ok(())
}

fn read_input(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read stdin")?;
        Ok(buf)
    } else {
        fs::read_to_string(path).with_context(|| format!("failed to read '{}'", path.display()))
    }
}

/// Current local wall-clock time in `timezone`.
fn wall_clock(timezone: &str) -> Result<NaiveDateTime> {
    let tz: Tz = timezone
        .parse()
        .map_err(|_| anyhow::anyhow!("invalid timezone: '{timezone}'"))?;
    Ok(Utc::now().with_timezone(&tz).naive_local())
}

fn to_json<T: serde::Serialize>(value: &T, compact: bool) -> Result<String> {
    let out = if compact {
        serde_json::to_string(value)
    } else {
        serde_json::to_string_pretty(value)
    };
    out.context("failed to serialize output")
}
