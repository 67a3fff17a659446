//! Survey command implementation
//!
//! Reports how evenly a configuration spreads over the catalog: a lattice of
//! points for the coordinate-shuffle strategy, seeded random cells for the
//! hierarchical-cell strategy.

use anyhow::Result;
use colored::Colorize;
use std::process::ExitCode;

use what3chords_core::{survey_cells, survey_points, Encoder, Strategy, UsageHistogram};

use super::json_output::{
    error_codes, input_error_to_json, report_to_json, CommandOutput, JsonError, SurveyHit,
    SurveyResult,
};
use super::reporting;
use crate::input::{load_config, load_optional_catalog};

/// Sampling parameters for the survey command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurveyOptions {
    /// Lattice columns (coordinate shuffle)
    pub cols: u32,
    /// Lattice rows (coordinate shuffle)
    pub rows: u32,
    /// Random cells to draw (hierarchical cell)
    pub samples: u64,
    /// Seed for the random cells
    pub seed: u32,
    /// Length of the most-used list
    pub top: usize,
}

impl Default for SurveyOptions {
    fn default() -> Self {
        Self {
            cols: 720,
            rows: 340,
            samples: 100_000,
            seed: 0,
            top: 10,
        }
    }
}

/// Run the survey command
///
/// # Arguments
/// * `options` - Sampling parameters
/// * `config_path` - Optional JSON config file
/// * `preset` - Optional preset name (default: shuffle)
/// * `catalog_path` - Optional chord dataset; without it the catalog is
///   assumed to hold exactly `radix` entries
/// * `json_output` - Whether to output machine-readable JSON
///
/// # Returns
/// Exit code: 0 if the survey ran, 1 otherwise
pub fn run(
    options: SurveyOptions,
    config_path: Option<&str>,
    preset: Option<&str>,
    catalog_path: Option<&str>,
    json_output: bool,
) -> Result<ExitCode> {
    if !json_output {
        println!("{}", "Surveying catalog usage...".cyan().bold());
    }
    let output = build(options, config_path, preset, catalog_path);
    if json_output {
        return reporting::print_json(&output);
    }

    reporting::print_diagnostics(&output.errors, &output.warnings);
    if let Some(result) = &output.result {
        println!("\n{} {}", "Strategy:".dimmed(), result.strategy);
        println!("  {:<14}{}", "samples", result.samples);
        println!(
            "  {:<14}{} / {}",
            "distinct", result.distinct, result.catalog_len
        );
        println!("  {:<14}{}", "unused", result.unused);
        println!("  {:<14}{}", "max hits", result.max_hits);
        if result.out_of_range > 0 {
            println!(
                "  {:<14}{}",
                "out of range",
                result.out_of_range.to_string().yellow()
            );
        }
        if result.errors > 0 {
            println!("  {:<14}{}", "rejected", result.errors.to_string().yellow());
        }
        if !result.top.is_empty() {
            println!("\n{}", "Most used:".cyan().bold());
            for hit in &result.top {
                println!(
                    "  {:>5}  {:<16} {}",
                    hit.position.to_string().dimmed(),
                    hit.label.as_deref().unwrap_or("-"),
                    hit.hits
                );
            }
        }
    }
    let status = if output.success {
        "Survey complete"
    } else {
        "Survey failed"
    };
    reporting::print_status(output.success, status);
    Ok(reporting::exit_code(output.success))
}

/// Loads inputs and runs the survey. Never prints.
pub fn build(
    options: SurveyOptions,
    config_path: Option<&str>,
    preset: Option<&str>,
    catalog_path: Option<&str>,
) -> CommandOutput<SurveyResult> {
    let loaded = match load_config(config_path, preset, "shuffle") {
        Ok(loaded) => loaded,
        Err(e) => return CommandOutput::failure(vec![input_error_to_json(&e)], Vec::new()),
    };
    let catalog = match load_optional_catalog(catalog_path) {
        Ok(catalog) => catalog,
        Err(e) => return CommandOutput::failure(vec![input_error_to_json(&e)], Vec::new()),
    };

    let config = loaded.config;
    let catalog_len = catalog
        .as_ref()
        .map(|c| c.catalog.len())
        .unwrap_or(config.radix as usize);
    let (errors, warnings) = report_to_json(&config.validate_for_catalog(catalog_len));
    if !errors.is_empty() {
        return CommandOutput::failure(errors, warnings);
    }

    let histogram = Encoder::from_config(&config).and_then(|encoder| match encoder.strategy() {
        Strategy::CoordinateShuffle => {
            survey_points(&encoder, catalog_len, options.cols, options.rows)
        }
        Strategy::HierarchicalCell => {
            survey_cells(&encoder, catalog_len, options.samples, options.seed)
        }
    });
    let histogram = match histogram {
        Ok(histogram) => histogram,
        Err(e) => {
            return CommandOutput::failure(
                vec![JsonError::new(error_codes::ENCODE, e.to_string())],
                warnings,
            )
        }
    };

    let top = most_used(&histogram, options.top)
        .into_iter()
        .map(|(position, hits)| SurveyHit {
            position,
            label: catalog
                .as_ref()
                .and_then(|c| c.catalog.get(position))
                .map(|entry| entry.label.clone()),
            hits,
        })
        .collect();

    CommandOutput::success(
        SurveyResult {
            strategy: config.strategy.as_str().to_string(),
            samples: histogram.samples,
            catalog_len,
            distinct: histogram.distinct(),
            unused: histogram.unused(),
            max_hits: histogram.max_hits(),
            out_of_range: histogram.out_of_range,
            errors: histogram.errors,
            top,
        },
        warnings,
    )
}

/// The `n` most hit positions, ties broken by position.
fn most_used(histogram: &UsageHistogram, n: usize) -> Vec<(usize, u64)> {
    let mut hits: Vec<(usize, u64)> = histogram
        .counts
        .iter()
        .copied()
        .enumerate()
        .filter(|&(_, count)| count > 0)
        .collect();
    hits.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    hits.truncate(n);
    hits
}
