//! JSON output types for machine-readable CLI output.
//!
//! Every command accepts `--json` and then prints one [`CommandOutput`]
//! envelope instead of colored text. The `result` payload is command
//! specific; errors and warnings share one shape across commands.

use serde::{Deserialize, Serialize};
use what3chords_core::{ChordEntry, ConfigError, ConfigReport, ConfigWarning, EncoderConfig};

use crate::input::InputError;

/// Error codes for CLI operations.
///
/// These codes are stable and can be used for programmatic error handling.
/// Configuration validation codes (`C001`, `W001`, ...) pass through as is.
pub mod error_codes {
    /// File could not be read
    pub const FILE_READ: &str = "CLI_001";
    /// JSON parse error
    pub const JSON_PARSE: &str = "CLI_002";
    /// Unknown preset name
    pub const UNKNOWN_PRESET: &str = "CLI_003";
    /// Both --config and --preset given
    pub const CONFLICTING_CONFIG: &str = "CLI_004";
    /// Malformed command-line input (coordinate, cell id, index)
    pub const INVALID_INPUT: &str = "CLI_005";
    /// Encoder rejected the input
    pub const ENCODE: &str = "CLI_006";
    /// Catalog lookup failed
    pub const LOOKUP: &str = "CLI_007";
    /// Command does not support the configured strategy
    pub const WRONG_STRATEGY: &str = "CLI_008";
    /// Partial decode failed
    pub const DECODE: &str = "CLI_009";
    /// Cell id is outside the valid index space
    pub const INVALID_CELL: &str = "CLI_010";
}

/// Warning codes for CLI operations.
pub mod warning_codes {
    /// Unseeded decode under the binary finest level
    pub const RANDOM_DECODE: &str = "CLI_W001";
}

/// A structured error in JSON output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JsonError {
    /// Stable error code (e.g., "CLI_001", "C001")
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Config path of the problematic field (if applicable)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Source file path (if applicable)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

impl JsonError {
    /// Creates a new error with code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            path: None,
            file: None,
        }
    }

    /// Sets the config path for this error.
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Sets the file path for this error.
    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }
}

/// A structured warning in JSON output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JsonWarning {
    /// Stable warning code (e.g., "W001")
    pub code: String,
    /// Human-readable warning message
    pub message: String,
    /// Config path of the problematic field (if applicable)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl JsonWarning {
    /// Creates a new warning with code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            path: None,
        }
    }

    /// Sets the config path for this warning.
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }
}

/// Envelope printed by every command in `--json` mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandOutput<T> {
    /// Whether the command succeeded
    pub success: bool,
    /// Errors encountered
    pub errors: Vec<JsonError>,
    /// Warnings (configuration validation, non-determinism)
    pub warnings: Vec<JsonWarning>,
    /// Command result (on success, and for `check` also on an invalid cell)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<T>,
}

impl<T> CommandOutput<T> {
    /// Creates a successful output.
    pub fn success(result: T, warnings: Vec<JsonWarning>) -> Self {
        Self {
            success: true,
            errors: Vec::new(),
            warnings,
            result: Some(result),
        }
    }

    /// Creates a failed output.
    pub fn failure(errors: Vec<JsonError>, warnings: Vec<JsonWarning>) -> Self {
        Self {
            success: false,
            errors,
            warnings,
            result: None,
        }
    }

    /// Creates a failed output that still carries a result.
    pub fn failure_with(result: T, errors: Vec<JsonError>, warnings: Vec<JsonWarning>) -> Self {
        Self {
            success: false,
            errors,
            warnings,
            result: Some(result),
        }
    }

    /// Shorthand for a single-error failure.
    pub fn error(code: &str, message: impl Into<String>) -> Self {
        Self::failure(vec![JsonError::new(code, message)], Vec::new())
    }
}

/// Result of the `encode` and `cell` commands.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncodeResult {
    /// Active strategy
    pub strategy: String,
    /// The input as given
    pub input: String,
    /// Index as `a.b.c`
    pub index: String,
    /// Index digits
    pub digits: [u32; 3],
    /// Catalog radix
    pub radix: u32,
    /// Selected chords (when a catalog was given)
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub chords: Vec<ChordJson>,
    /// BLAKE3 hash of the chord dataset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog_hash: Option<String>,
}

/// A chord entry as printed by the CLI.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChordJson {
    /// Catalog position
    pub position: u32,
    /// Display label
    pub label: String,
    /// MIDI note numbers
    pub midi: Vec<u8>,
    /// Fret symbols, `x` for muted
    pub frets: Vec<String>,
    /// Capo fret, 0 without capo
    pub capo: u8,
    /// Finger string
    pub fingers: String,
}

impl ChordJson {
    /// Converts a catalog entry found at `position`.
    pub fn from_entry(position: u32, entry: &ChordEntry) -> Self {
        Self {
            position,
            label: entry.label.clone(),
            midi: entry.midi_notes.clone(),
            frets: entry.frets.iter().map(|f| f.to_string()).collect(),
            capo: entry.capo_fret,
            fingers: entry.fingers.clone(),
        }
    }
}

/// Result of the `decode` command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecodeResult {
    /// Index that was decoded
    pub index: String,
    /// Reconstructed cell id (lower hex)
    pub cell: String,
    /// Base seed, if the run was seeded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u32>,
    /// Whether the same invocation always prints the same cell
    pub deterministic: bool,
    /// Whether re-encoding the cell gives back the index
    pub reencodes: bool,
}

/// Result of the `check` command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckResult {
    /// Cell id (lower hex)
    pub cell: String,
    /// Resolution the cell was read at
    pub resolution: u8,
    /// Whether the cell is inside the valid index space
    pub valid: bool,
    /// First defect, if invalid
    #[serde(skip_serializing_if = "Option::is_none")]
    pub defect: Option<String>,
    /// Resolution field recorded in the id
    pub resolution_field: u8,
    /// Region selector
    pub region: u8,
    /// Digit groups, coarsest first
    pub digits: Vec<u8>,
    /// All 64 bits, most significant first
    pub bits: String,
}

/// Result of the `survey` command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurveyResult {
    /// Active strategy
    pub strategy: String,
    /// Inputs encoded
    pub samples: u64,
    /// Catalog length surveyed against
    pub catalog_len: usize,
    /// Entries hit at least once
    pub distinct: usize,
    /// Entries never hit
    pub unused: usize,
    /// Highest hit count
    pub max_hits: u64,
    /// Digits past the catalog end
    pub out_of_range: u64,
    /// Inputs the encoder rejected
    pub errors: u64,
    /// Most used entries
    pub top: Vec<SurveyHit>,
}

/// One entry of the survey's most-used list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SurveyHit {
    /// Catalog position
    pub position: usize,
    /// Chord label (when a catalog was given)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Hit count
    pub hits: u64,
}

/// Result of the `config` command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigResult {
    /// Where the config came from
    pub origin: String,
    /// BLAKE3 hash of the config file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_hash: Option<String>,
    /// The resolved configuration
    pub config: EncoderConfig,
    /// Input values of the active encoder (absent on overflow)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain_size: Option<u64>,
    /// `radix^3` (absent on overflow)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity: Option<u64>,
}

/// Converts an InputError to a JsonError.
pub fn input_error_to_json(err: &InputError) -> JsonError {
    let code = match err {
        InputError::FileRead { .. } => error_codes::FILE_READ,
        InputError::JsonParse { .. } => error_codes::JSON_PARSE,
        InputError::UnknownPreset { .. } => error_codes::UNKNOWN_PRESET,
        InputError::ConflictingConfig => error_codes::CONFLICTING_CONFIG,
    };
    let error = JsonError::new(code, err.to_string());
    match err {
        InputError::FileRead { path, .. } | InputError::JsonParse { path, .. } => {
            error.with_file(path.display().to_string())
        }
        _ => error,
    }
}

/// Converts a ConfigError to a JsonError.
pub fn config_error_to_json(err: &ConfigError) -> JsonError {
    let mut error = JsonError::new(err.code.to_string(), &err.message);
    if let Some(ref path) = err.path {
        error = error.with_path(path);
    }
    error
}

/// Converts a ConfigWarning to a JsonWarning.
pub fn config_warning_to_json(warn: &ConfigWarning) -> JsonWarning {
    let mut warning = JsonWarning::new(warn.code.to_string(), &warn.message);
    if let Some(ref path) = warn.path {
        warning = warning.with_path(path);
    }
    warning
}

/// Splits a validation report into JSON errors and warnings.
pub fn report_to_json(report: &ConfigReport) -> (Vec<JsonError>, Vec<JsonWarning>) {
    (
        report.errors.iter().map(config_error_to_json).collect(),
        report.warnings.iter().map(config_warning_to_json).collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use what3chords_core::{ConfigErrorCode, ConfigWarningCode};

    #[test]
    fn test_json_error_serialization() {
        let error = JsonError::new("CLI_001", "File not found").with_file("chords.json");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"code\":\"CLI_001\""));
        assert!(json.contains("\"file\":\"chords.json\""));
        assert!(!json.contains("\"path\""));
    }

    #[test]
    fn test_failure_omits_result() {
        let output: CommandOutput<EncodeResult> = CommandOutput::error(error_codes::ENCODE, "nope");
        let json = serde_json::to_value(&output).unwrap();
        assert_eq!(json["success"], false);
        assert!(json.get("result").is_none());
        assert_eq!(json["errors"][0]["code"], "CLI_006");
    }

    #[test]
    fn test_report_codes_pass_through() {
        let mut report = ConfigReport::default();
        report.add_error(ConfigError::with_path(
            ConfigErrorCode::InvalidRadix,
            "radix must be at least 2",
            "radix",
        ));
        report.add_warning(ConfigWarning::new(
            ConfigWarningCode::NoShuffle,
            "rounds is 0",
        ));

        let (errors, warnings) = report_to_json(&report);
        assert_eq!(errors[0].code, "C001");
        assert_eq!(errors[0].path.as_deref(), Some("radix"));
        assert_eq!(warnings[0].code, "W002");
        assert_eq!(warnings[0].path, None);
    }

    #[test]
    fn test_input_error_codes() {
        let err = InputError::UnknownPreset {
            name: "h3".to_string(),
        };
        assert_eq!(input_error_to_json(&err).code, "CLI_003");
        assert_eq!(
            input_error_to_json(&InputError::ConflictingConfig).code,
            "CLI_004"
        );
    }
}
