//! Check command implementation
//!
//! Splits a cell id into its fields and reports whether it lies inside the
//! valid index space at a given resolution.

use anyhow::Result;
use colored::Colorize;
use std::process::ExitCode;

use what3chords_core::{split_cell, HierarchicalCellId};

use super::json_output::{
    error_codes, input_error_to_json, CheckResult, CommandOutput, JsonError,
};
use super::reporting;
use crate::input::load_config;

/// Run the check command
///
/// # Arguments
/// * `cell` - Cell id, up to 16 hex digits
/// * `resolution` - Resolution to read at; defaults to the config's
/// * `config_path` - Optional JSON config file
/// * `preset` - Optional preset name (default: cell)
/// * `json_output` - Whether to output machine-readable JSON
///
/// # Returns
/// Exit code: 0 if the cell is valid, 1 otherwise
pub fn run(
    cell: &str,
    resolution: Option<u8>,
    config_path: Option<&str>,
    preset: Option<&str>,
    json_output: bool,
) -> Result<ExitCode> {
    let output = build(cell, resolution, config_path, preset);
    if json_output {
        return reporting::print_json(&output);
    }

    println!("{} {}", "Checking:".cyan().bold(), cell);
    if let Some(result) = &output.result {
        println!("{} {}", "Resolution:".dimmed(), result.resolution);
        println!("\n  {:<18}{}", "bits", result.bits.dimmed());
        println!("  {:<18}{}", "resolution field", result.resolution_field);
        println!("  {:<18}{}", "region", result.region);
        let digits: Vec<String> = result.digits.iter().map(|d| d.to_string()).collect();
        println!("  {:<18}{}", "digits", digits.join(" "));
    }
    reporting::print_diagnostics(&output.errors, &output.warnings);

    let message = match &output.result {
        Some(result) if result.valid => "Cell is valid".to_string(),
        Some(result) => format!(
            "Cell is invalid: {}",
            result.defect.as_deref().unwrap_or("unknown defect")
        ),
        None => "Cell could not be checked".to_string(),
    };
    reporting::print_status(output.success, &message);
    Ok(reporting::exit_code(output.success))
}

/// Splits and validates the cell. Never prints.
pub fn build(
    cell: &str,
    resolution: Option<u8>,
    config_path: Option<&str>,
    preset: Option<&str>,
) -> CommandOutput<CheckResult> {
    let resolution = match resolution {
        Some(resolution) => resolution,
        None => match load_config(config_path, preset, "cell") {
            Ok(loaded) => loaded.config.cell.resolution,
            Err(e) => return CommandOutput::failure(vec![input_error_to_json(&e)], Vec::new()),
        },
    };

    let parsed = HierarchicalCellId::from_hex(cell)
        .and_then(|id| split_cell(id, resolution).map(|split| (id, split)));
    let (id, (digits, _frame)) = match parsed {
        Ok(parsed) => parsed,
        Err(e) => return CommandOutput::error(error_codes::INVALID_INPUT, e.to_string()),
    };

    let defect = digits.defect();
    let result = CheckResult {
        cell: id.to_string(),
        resolution,
        valid: defect.is_none(),
        defect: defect.map(|d| d.to_string()),
        resolution_field: id.resolution_field(),
        region: digits.region,
        digits: digits.digits,
        bits: id.to_bit_string(),
    };
    match defect {
        None => CommandOutput::success(result, Vec::new()),
        Some(defect) => CommandOutput::failure_with(
            result,
            vec![JsonError::new(
                error_codes::INVALID_CELL,
                format!("{} is not a valid cell at resolution {}: {}", id, resolution, defect),
            )],
            Vec::new(),
        ),
    }
}
