//! Cell command implementation
//!
//! Encodes a hierarchical cell id given in hex.

use anyhow::Result;
use std::process::ExitCode;

use super::encode::{run_input, RawInput};

/// Run the cell command
///
/// # Arguments
/// * `cell` - Cell id, up to 16 hex digits
/// * `config_path` - Optional JSON config file
/// * `preset` - Optional preset name (default: cell)
/// * `catalog_path` - Optional chord dataset to look the index up in
/// * `json_output` - Whether to output machine-readable JSON
///
/// # Returns
/// Exit code: 0 if encoded (and looked up), 1 otherwise
pub fn run(
    cell: &str,
    config_path: Option<&str>,
    preset: Option<&str>,
    catalog_path: Option<&str>,
    json_output: bool,
) -> Result<ExitCode> {
    run_input(
        RawInput::Cell(cell),
        config_path,
        preset,
        catalog_path,
        json_output,
    )
}
