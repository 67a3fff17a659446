//! Config command implementation
//!
//! Prints the resolved encoder configuration and its validation report.

use anyhow::Result;
use colored::Colorize;
use std::process::ExitCode;

use what3chords_core::{EncodedIndex, INDEX_DIGITS};

use super::json_output::{input_error_to_json, report_to_json, CommandOutput, ConfigResult};
use super::reporting;
use crate::input::{load_config, load_optional_catalog};

/// Run the config command
///
/// # Arguments
/// * `config_path` - Optional JSON config file
/// * `preset` - Optional preset name (default: shuffle)
/// * `catalog_path` - Optional chord dataset to validate the radix against
/// * `json_output` - Whether to output machine-readable JSON
///
/// # Returns
/// Exit code: 0 if the config is valid, 1 otherwise
pub fn run(
    config_path: Option<&str>,
    preset: Option<&str>,
    catalog_path: Option<&str>,
    json_output: bool,
) -> Result<ExitCode> {
    let output = build(config_path, preset, catalog_path);
    if json_output {
        return reporting::print_json(&output);
    }

    if let Some(result) = &output.result {
        println!("{} {}", "Config:".cyan().bold(), result.origin);
        if let Some(hash) = &result.source_hash {
            println!("{} {}", "Source:".dimmed(), &hash[..16]);
        }
        println!("{}", serde_json::to_string_pretty(&result.config)?);
        let domain = result
            .domain_size
            .map(|d| d.to_string())
            .unwrap_or_else(|| "overflow".to_string());
        let capacity = result
            .capacity
            .map(|c| c.to_string())
            .unwrap_or_else(|| "overflow".to_string());
        println!("\n  {:<14}{}", "input values", domain);
        println!("  {:<14}{} (radix^{})", "addresses", capacity, INDEX_DIGITS);
    }
    reporting::print_diagnostics(&output.errors, &output.warnings);

    let message = if output.success {
        "Config is valid".to_string()
    } else {
        format!("Config has {} error(s)", output.errors.len())
    };
    reporting::print_status(output.success, &message);
    Ok(reporting::exit_code(output.success))
}

/// Resolves and validates the config. Never prints.
pub fn build(
    config_path: Option<&str>,
    preset: Option<&str>,
    catalog_path: Option<&str>,
) -> CommandOutput<ConfigResult> {
    let loaded = match load_config(config_path, preset, "shuffle") {
        Ok(loaded) => loaded,
        Err(e) => return CommandOutput::failure(vec![input_error_to_json(&e)], Vec::new()),
    };
    let catalog = match load_optional_catalog(catalog_path) {
        Ok(catalog) => catalog,
        Err(e) => return CommandOutput::failure(vec![input_error_to_json(&e)], Vec::new()),
    };

    let report = match &catalog {
        Some(c) => loaded.config.validate_for_catalog(c.catalog.len()),
        None => loaded.config.validate(),
    };
    let (errors, warnings) = report_to_json(&report);
    let result = ConfigResult {
        origin: loaded.origin.to_string(),
        source_hash: loaded.source_hash,
        domain_size: loaded.config.domain_size(),
        capacity: EncodedIndex::capacity(loaded.config.radix).ok(),
        config: loaded.config,
    };
    if errors.is_empty() {
        CommandOutput::success(result, warnings)
    } else {
        CommandOutput::failure_with(result, errors, warnings)
    }
}
