//! Encode command implementation
//!
//! Encodes a coordinate (or, through [`super::cell`], a cell id) into an
//! index and optionally looks up its three chords.

use anyhow::Result;
use colored::Colorize;
use std::process::ExitCode;
use std::time::Instant;

use what3chords_core::{
    EncodeInput, Encoder, GeoPoint, HierarchicalCellId, Session, SessionError,
};

use super::json_output::{
    error_codes, input_error_to_json, report_to_json, ChordJson, CommandOutput, EncodeResult,
    JsonError,
};
use super::reporting;
use crate::input::{load_config, load_optional_catalog};

/// An encoder input as given on the command line.
#[derive(Debug, Clone, Copy)]
pub(crate) enum RawInput<'a> {
    Point { lon: f64, lat: f64 },
    Cell(&'a str),
}

impl RawInput<'_> {
    fn parse(&self) -> Result<EncodeInput, String> {
        match *self {
            RawInput::Point { lon, lat } => GeoPoint::new(lon, lat)
                .map(EncodeInput::Point)
                .map_err(|e| e.to_string()),
            RawInput::Cell(hex) => hex
                .parse::<HierarchicalCellId>()
                .map(EncodeInput::Cell)
                .map_err(|e| e.to_string()),
        }
    }

    fn describe(&self) -> String {
        match self {
            RawInput::Point { lon, lat } => format!("({}, {})", lon, lat),
            RawInput::Cell(hex) => hex.to_string(),
        }
    }

    fn default_preset(&self) -> &'static str {
        match self {
            RawInput::Point { .. } => "shuffle",
            RawInput::Cell(_) => "cell",
        }
    }
}

/// Run the encode command
///
/// # Arguments
/// * `lon`, `lat` - Coordinate in degrees
/// * `config_path` - Optional JSON config file
/// * `preset` - Optional preset name (default: shuffle)
/// * `catalog_path` - Optional chord dataset to look the index up in
/// * `json_output` - Whether to output machine-readable JSON
///
/// # Returns
/// Exit code: 0 if encoded (and looked up), 1 otherwise
pub fn run(
    lon: f64,
    lat: f64,
    config_path: Option<&str>,
    preset: Option<&str>,
    catalog_path: Option<&str>,
    json_output: bool,
) -> Result<ExitCode> {
    run_input(
        RawInput::Point { lon, lat },
        config_path,
        preset,
        catalog_path,
        json_output,
    )
}

pub(crate) fn run_input(
    raw: RawInput<'_>,
    config_path: Option<&str>,
    preset: Option<&str>,
    catalog_path: Option<&str>,
    json_output: bool,
) -> Result<ExitCode> {
    if json_output {
        reporting::print_json(&build(raw, config_path, preset, catalog_path))
    } else {
        run_human(raw, config_path, preset, catalog_path)
    }
}

fn run_human(
    raw: RawInput<'_>,
    config_path: Option<&str>,
    preset: Option<&str>,
    catalog_path: Option<&str>,
) -> Result<ExitCode> {
    let start = Instant::now();
    println!("{} {}", "Encoding:".cyan().bold(), raw.describe());

    let output = build(raw, config_path, preset, catalog_path);
    reporting::print_diagnostics(&output.errors, &output.warnings);

    let duration_ms = start.elapsed().as_millis();
    match &output.result {
        Some(result) => {
            println!(
                "\n{} {} {}",
                "Index:".green().bold(),
                result.index.bold(),
                format!("({}, radix {})", result.strategy, result.radix).dimmed()
            );
            reporting::print_chords(&result.chords);
            reporting::print_status(true, &format!("Encoded ({}ms)", duration_ms));
        }
        None => reporting::print_status(false, &format!("Not encoded ({}ms)", duration_ms)),
    }
    Ok(reporting::exit_code(output.success))
}

/// Loads inputs, encodes and looks up. Never prints.
pub(crate) fn build(
    raw: RawInput<'_>,
    config_path: Option<&str>,
    preset: Option<&str>,
    catalog_path: Option<&str>,
) -> CommandOutput<EncodeResult> {
    let loaded = match load_config(config_path, preset, raw.default_preset()) {
        Ok(loaded) => loaded,
        Err(e) => return CommandOutput::failure(vec![input_error_to_json(&e)], Vec::new()),
    };
    let catalog = match load_optional_catalog(catalog_path) {
        Ok(catalog) => catalog,
        Err(e) => return CommandOutput::failure(vec![input_error_to_json(&e)], Vec::new()),
    };

    let config = loaded.config;
    let report = match &catalog {
        Some(c) => config.validate_for_catalog(c.catalog.len()),
        None => config.validate(),
    };
    let (errors, warnings) = report_to_json(&report);
    if !errors.is_empty() {
        return CommandOutput::failure(errors, warnings);
    }

    let input = match raw.parse() {
        Ok(input) => input,
        Err(message) => {
            return CommandOutput::failure(
                vec![JsonError::new(error_codes::INVALID_INPUT, message)],
                warnings,
            )
        }
    };

    let strategy = config.strategy.as_str().to_string();
    let radix = config.radix;
    let (index, chords, catalog_hash) = match catalog {
        Some(loaded_catalog) => {
            let session = match Session::new(config, loaded_catalog.catalog) {
                Ok(session) => session,
                Err(e) => return session_failure(e, warnings),
            };
            match session.chords_for(&input) {
                Ok(selection) => {
                    let chords = selection
                        .index
                        .digits()
                        .iter()
                        .zip(&selection.chords)
                        .map(|(&digit, entry)| ChordJson::from_entry(digit, entry))
                        .collect();
                    (selection.index, chords, Some(loaded_catalog.source_hash))
                }
                Err(e) => return session_failure(e, warnings),
            }
        }
        None => {
            let encoded = Encoder::from_config(&config).and_then(|e| e.encode(&input));
            match encoded {
                Ok(index) => (index, Vec::new(), None),
                Err(e) => {
                    return CommandOutput::failure(
                        vec![JsonError::new(error_codes::ENCODE, e.to_string())],
                        warnings,
                    )
                }
            }
        }
    };

    CommandOutput::success(
        EncodeResult {
            strategy,
            input: raw.describe(),
            index: index.to_string(),
            digits: index.digits(),
            radix,
            chords,
            catalog_hash,
        },
        warnings,
    )
}

fn session_failure(
    err: SessionError,
    warnings: Vec<super::json_output::JsonWarning>,
) -> CommandOutput<EncodeResult> {
    let code = match err {
        SessionError::Catalog(_) => error_codes::LOOKUP,
        SessionError::Encode(_) | SessionError::InvalidConfig(_) => error_codes::ENCODE,
    };
    CommandOutput::failure(vec![JsonError::new(code, err.to_string())], warnings)
}
