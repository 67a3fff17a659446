//! Decode command implementation
//!
//! Diagnostic partial inverse of the hierarchical-cell encoder. Under the
//! binary finest level two bits of the finest digit are gone, so the printed
//! cell is one of several that share the index. With `--seed` the choice is
//! drawn from a BLAKE3-derived PCG32 stream and replays exactly.

use anyhow::Result;
use colored::Colorize;
use std::process::ExitCode;

use what3chords_core::rng::create_decode_rng;
use what3chords_core::{
    split_cell, CellEncoder, CellFrame, EncodedIndex, Encoder, FinestLevel, HierarchicalCellId,
};

use super::json_output::{
    error_codes, input_error_to_json, report_to_json, warning_codes, CommandOutput, DecodeResult,
    JsonError, JsonWarning,
};
use super::reporting;
use crate::input::load_config;

/// Run the decode command
///
/// # Arguments
/// * `index` - Index as `a.b.c`
/// * `frame` - Optional cell id whose prefix and suffix bits are reused
/// * `seed` - Optional base seed; without it the choice is random
/// * `config_path` - Optional JSON config file
/// * `preset` - Optional preset name (default: cell)
/// * `json_output` - Whether to output machine-readable JSON
///
/// # Returns
/// Exit code: 0 if decoded, 1 otherwise
pub fn run(
    index: &str,
    frame: Option<&str>,
    seed: Option<u32>,
    config_path: Option<&str>,
    preset: Option<&str>,
    json_output: bool,
) -> Result<ExitCode> {
    let output = build(index, frame, seed, config_path, preset);
    if json_output {
        return reporting::print_json(&output);
    }

    println!("{} {}", "Decoding:".cyan().bold(), index);
    reporting::print_diagnostics(&output.errors, &output.warnings);
    if let Some(result) = &output.result {
        println!("\n{} {}", "Cell:".green().bold(), result.cell.bold());
        if result.reencodes {
            println!("  {} re-encodes to {}", "✓".green(), result.index);
        } else {
            println!("  {} does not re-encode to {}", "✗".red(), result.index);
        }
    }
    let status = if output.success {
        "Decoded"
    } else {
        "Not decoded"
    };
    reporting::print_status(output.success, status);
    Ok(reporting::exit_code(output.success))
}

/// Parses, decodes and re-encodes. Never prints.
pub fn build(
    index: &str,
    frame: Option<&str>,
    seed: Option<u32>,
    config_path: Option<&str>,
    preset: Option<&str>,
) -> CommandOutput<DecodeResult> {
    let loaded = match load_config(config_path, preset, "cell") {
        Ok(loaded) => loaded,
        Err(e) => return CommandOutput::failure(vec![input_error_to_json(&e)], Vec::new()),
    };
    let (errors, mut warnings) = report_to_json(&loaded.config.validate());
    if !errors.is_empty() {
        return CommandOutput::failure(errors, warnings);
    }

    let encoder = match Encoder::from_config(&loaded.config) {
        Ok(Encoder::Cell(encoder)) => encoder,
        Ok(other) => {
            return CommandOutput::failure(
                vec![JsonError::new(
                    error_codes::WRONG_STRATEGY,
                    format!(
                        "decode needs the hierarchical_cell strategy, config selects {}",
                        other.strategy().as_str()
                    ),
                )],
                warnings,
            )
        }
        Err(e) => {
            return CommandOutput::failure(
                vec![JsonError::new(error_codes::ENCODE, e.to_string())],
                warnings,
            )
        }
    };

    let parsed = EncodedIndex::parse(index, encoder.radix())
        .map_err(|e| e.to_string())
        .and_then(|index| Ok((index, resolve_frame(&encoder, frame)?)));
    let (index, frame) = match parsed {
        Ok(parsed) => parsed,
        Err(message) => {
            return CommandOutput::failure(
                vec![JsonError::new(error_codes::INVALID_INPUT, message)],
                warnings,
            )
        }
    };

    let exact = loaded.config.cell.finest_level == FinestLevel::Septenary;
    let decoded = match seed {
        Some(seed) => {
            let mut rng = create_decode_rng(seed, &index);
            encoder.partial_decode(&index, &frame, &mut rng)
        }
        None => encoder.partial_decode(&index, &frame, &mut rand::thread_rng()),
    };
    let cell = match decoded {
        Ok(cell) => cell,
        Err(e) => {
            return CommandOutput::failure(
                vec![JsonError::new(error_codes::DECODE, e.to_string())],
                warnings,
            )
        }
    };

    if !exact && seed.is_none() {
        warnings.push(JsonWarning::new(
            warning_codes::RANDOM_DECODE,
            "binary finest level: the cell is one random choice among several; pass --seed to replay",
        ));
    }

    CommandOutput::success(
        DecodeResult {
            index: index.to_string(),
            cell: cell.to_string(),
            seed,
            deterministic: exact || seed.is_some(),
            reencodes: encoder.encode(cell).map(|i| i == index).unwrap_or(false),
        },
        warnings,
    )
}

fn resolve_frame(encoder: &CellEncoder, frame: Option<&str>) -> Result<CellFrame, String> {
    match frame {
        Some(hex) => {
            let cell = HierarchicalCellId::from_hex(hex).map_err(|e| e.to_string())?;
            split_cell(cell, encoder.resolution())
                .map(|(_, frame)| frame)
                .map_err(|e| e.to_string())
        }
        None => CellFrame::canonical(encoder.resolution()).map_err(|e| e.to_string()),
    }
}
