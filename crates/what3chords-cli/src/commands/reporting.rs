//! Shared console and JSON rendering for command results.

use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;
use std::process::ExitCode;

use super::json_output::{ChordJson, CommandOutput, JsonError, JsonWarning};

/// Prints a JSON envelope and maps `success` to the exit code.
pub(super) fn print_json<T: Serialize>(output: &CommandOutput<T>) -> Result<ExitCode> {
    let json =
        serde_json::to_string_pretty(output).context("failed to serialize command output")?;
    println!("{}", json);
    Ok(exit_code(output.success))
}

pub(super) fn exit_code(success: bool) -> ExitCode {
    if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    }
}

/// Prints errors and warnings in the colored console format.
pub(super) fn print_diagnostics(errors: &[JsonError], warnings: &[JsonWarning]) {
    if !errors.is_empty() {
        println!("\n{}", "Errors:".red().bold());
        for error in errors {
            let path_info = error
                .path
                .as_ref()
                .map(|p| format!(" at {}", p))
                .unwrap_or_default();
            println!(
                "  {} [{}]{}: {}",
                "x".red(),
                error.code.red(),
                path_info.dimmed(),
                error.message
            );
        }
    }

    if !warnings.is_empty() {
        println!("\n{}", "Warnings:".yellow().bold());
        for warning in warnings {
            let path_info = warning
                .path
                .as_ref()
                .map(|p| format!(" at {}", p))
                .unwrap_or_default();
            println!(
                "  {} [{}]{}: {}",
                "!".yellow(),
                warning.code.yellow(),
                path_info.dimmed(),
                warning.message
            );
        }
    }
}

/// Prints the chord table: one row per index digit.
pub(super) fn print_chords(chords: &[ChordJson]) {
    if chords.is_empty() {
        return;
    }
    println!("\n{}", "Chords:".cyan().bold());
    for chord in chords {
        println!(
            "  {:>5}  {:<16} {}",
            chord.position.to_string().dimmed(),
            chord.label.bold(),
            format!("frets {}", chord.frets.join(" ")).dimmed()
        );
        let capo = if chord.capo > 0 {
            format!("  capo {}", chord.capo)
        } else {
            String::new()
        };
        println!(
            "         midi {:?}  fingers {}{}",
            chord.midi, chord.fingers, capo
        );
    }
}

/// Prints the closing status line.
pub(super) fn print_status(success: bool, message: &str) {
    if success {
        println!("\n{} {}", "SUCCESS".green().bold(), message);
    } else {
        println!("\n{} {}", "FAILED".red().bold(), message);
    }
}
