//! what3chords CLI - Encode locations into chord triples
//!
//! This binary provides commands for encoding coordinates and hierarchical
//! cell ids, inspecting cells and configurations, and surveying catalog usage.

use clap::{Args, Parser, Subcommand};
use std::process::ExitCode;

use what3chords_cli::commands;
use what3chords_cli::commands::survey::SurveyOptions;

/// what3chords - Three chords for every place on the map
#[derive(Parser)]
#[command(name = "what3chords")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Encoder configuration selection, shared by every command.
#[derive(Args, Debug, Clone, Default)]
struct ConfigArgs {
    /// Path to an encoder config file (JSON)
    #[arg(long, conflicts_with = "preset")]
    config: Option<String>,

    /// Named config preset
    #[arg(long, value_parser = ["shuffle", "cell", "cell-exact"])]
    preset: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode a coordinate with the coordinate-shuffle strategy
    Encode {
        /// Longitude in degrees (-180 to 180)
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,

        /// Latitude in degrees (-85.051129 to 85.051129)
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,

        #[command(flatten)]
        config: ConfigArgs,

        /// Chord dataset (JSON) to look the index up in
        #[arg(long)]
        catalog: Option<String>,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Encode a hierarchical cell id with the hierarchical-cell strategy
    Cell {
        /// Cell id, up to 16 hex digits
        #[arg(long)]
        cell: String,

        #[command(flatten)]
        config: ConfigArgs,

        /// Chord dataset (JSON) to look the index up in
        #[arg(long)]
        catalog: Option<String>,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Reconstruct a cell id from an index (diagnostic, may be random)
    Decode {
        /// Index as a.b.c
        #[arg(long)]
        index: String,

        /// Cell id whose frame bits to reuse (default: canonical frame)
        #[arg(long)]
        frame: Option<String>,

        /// Seed for a replayable decode
        #[arg(long)]
        seed: Option<u32>,

        #[command(flatten)]
        config: ConfigArgs,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Split a cell id into its fields and check its validity
    Check {
        /// Cell id, up to 16 hex digits
        #[arg(long)]
        cell: String,

        /// Resolution to read at (default: from the config)
        #[arg(long)]
        resolution: Option<u8>,

        #[command(flatten)]
        config: ConfigArgs,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Count how often each catalog entry is addressed
    Survey {
        /// Lattice columns (coordinate shuffle)
        #[arg(long, default_value_t = 720)]
        cols: u32,

        /// Lattice rows (coordinate shuffle)
        #[arg(long, default_value_t = 340)]
        rows: u32,

        /// Random cells to draw (hierarchical cell)
        #[arg(long, default_value_t = 100_000)]
        samples: u64,

        /// Seed for the random cells
        #[arg(long, default_value_t = 0)]
        seed: u32,

        /// Number of most-used entries to list
        #[arg(long, default_value_t = 10)]
        top: usize,

        #[command(flatten)]
        config: ConfigArgs,

        /// Chord dataset (JSON); default assumes radix entries
        #[arg(long)]
        catalog: Option<String>,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Print the resolved config and its validation report
    Config {
        #[command(flatten)]
        config: ConfigArgs,

        /// Chord dataset (JSON) to validate the radix against
        #[arg(long)]
        catalog: Option<String>,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Encode {
            lon,
            lat,
            config,
            catalog,
            json,
        } => commands::encode::run(
            lon,
            lat,
            config.config.as_deref(),
            config.preset.as_deref(),
            catalog.as_deref(),
            json,
        ),
        Commands::Cell {
            cell,
            config,
            catalog,
            json,
        } => commands::cell::run(
            &cell,
            config.config.as_deref(),
            config.preset.as_deref(),
            catalog.as_deref(),
            json,
        ),
        Commands::Decode {
            index,
            frame,
            seed,
            config,
            json,
        } => commands::decode::run(
            &index,
            frame.as_deref(),
            seed,
            config.config.as_deref(),
            config.preset.as_deref(),
            json,
        ),
        Commands::Check {
            cell,
            resolution,
            config,
            json,
        } => commands::check::run(
            &cell,
            resolution,
            config.config.as_deref(),
            config.preset.as_deref(),
            json,
        ),
        Commands::Survey {
            cols,
            rows,
            samples,
            seed,
            top,
            config,
            catalog,
            json,
        } => commands::survey::run(
            SurveyOptions {
                cols,
                rows,
                samples,
                seed,
                top,
            },
            config.config.as_deref(),
            config.preset.as_deref(),
            catalog.as_deref(),
            json,
        ),
        Commands::Config {
            config,
            catalog,
            json,
        } => commands::config::run(
            config.config.as_deref(),
            config.preset.as_deref(),
            catalog.as_deref(),
            json,
        ),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", colored::Colorize::red("error"), e);
            ExitCode::from(1)
        }
    }
}
