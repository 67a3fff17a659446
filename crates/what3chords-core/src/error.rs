//! Error types for encoding, catalog lookup and configuration validation.

use thiserror::Error;

/// Errors raised by the radix conversion utilities.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NumeralError {
    /// Radix below 2.
    #[error("Invalid radix: {0} (must be at least 2)")]
    InvalidRadix(u32),

    /// A digit is not smaller than the radix.
    #[error("Digit {digit} at position {position} is out of range for radix {radix}")]
    DigitOutOfRange {
        /// Offending digit value.
        digit: u32,
        /// Position of the digit, most significant first.
        position: usize,
        /// Radix the digit was checked against.
        radix: u32,
    },

    /// The value needs more digits than were requested.
    #[error("Value {value} needs {required} base-{radix} digits, only {digit_count} requested")]
    TooManyDigits {
        /// Value being converted.
        value: u64,
        /// Radix of the conversion.
        radix: u32,
        /// Requested digit count.
        digit_count: usize,
        /// Digits actually required.
        required: usize,
    },

    /// The digit sequence does not fit in 64 bits.
    #[error("Digit sequence overflows a 64-bit value in radix {0}")]
    Overflow(u32),
}

/// Errors raised when constructing a [`GeoPoint`](crate::geo::GeoPoint).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeoError {
    /// NaN or infinite coordinate.
    #[error("Coordinate is not finite: ({longitude}, {latitude})")]
    NonFinite {
        /// Longitude as given.
        longitude: f64,
        /// Latitude as given.
        latitude: f64,
    },

    /// Longitude outside [-180, 180].
    #[error("Longitude {0} is outside [-180, 180]")]
    LongitudeOutOfRange(f64),

    /// Latitude outside the Web-Mercator band.
    #[error("Latitude {latitude} is outside [-{limit}, {limit}]")]
    LatitudeOutOfRange {
        /// Latitude as given.
        latitude: f64,
        /// Projectable latitude bound.
        limit: f64,
    },
}

/// Why a hierarchical cell id was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellDefect {
    /// Region selector above the last base cell.
    RegionOutOfRange(u8),
    /// A 3-bit digit group holds 7, which is not a base-7 digit.
    InvalidDigit {
        /// Zero-based digit position (coarsest first).
        position: usize,
    },
}

impl std::fmt::Display for CellDefect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CellDefect::RegionOutOfRange(region) => {
                write!(f, "region selector {} is outside [0, 121]", region)
            }
            CellDefect::InvalidDigit { position } => {
                write!(f, "digit group {} decodes to 7", position)
            }
        }
    }
}

/// Error type for both encoders.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EncodeError {
    /// The cell id is outside the valid index space.
    #[error("Invalid cell identifier {cell}: {defect}")]
    InvalidCellIdentifier {
        /// Cell id in lower hex.
        cell: String,
        /// First defect found.
        defect: CellDefect,
    },

    /// Cell id text is not a 64-bit hex number.
    #[error("Invalid cell hex '{0}': expected 1-16 hex digits")]
    InvalidHex(String),

    /// The mixed-radix value does not fit in three catalog digits.
    #[error("Address overflow: value {value} does not fit below radix^3 = {capacity}")]
    AddressOverflow {
        /// Encoded value.
        value: u64,
        /// Number of addressable values (`radix^3`).
        capacity: u64,
    },

    /// The input kind does not match the configured strategy.
    #[error("Input mismatch: the {strategy} encoder cannot encode a {input}")]
    InputMismatch {
        /// Configured strategy name.
        strategy: &'static str,
        /// Input kind received.
        input: &'static str,
    },

    /// Invalid encoder parameter.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Radix conversion failure.
    #[error(transparent)]
    Numeral(#[from] NumeralError),

    /// Coordinate failure.
    #[error(transparent)]
    Geo(#[from] GeoError),
}

/// Error type for chord catalog construction and lookup.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// An index digit addresses past the end of the catalog.
    #[error("Index out of range: digit {digit} at position {position} but the catalog holds {len} chords")]
    IndexOutOfRange {
        /// Position in the encoded index (0..3).
        position: usize,
        /// Offending digit.
        digit: u32,
        /// Catalog length.
        len: usize,
    },

    /// Dataset JSON could not be parsed.
    #[error("Chord dataset parse error: {0}")]
    JsonParse(#[from] serde_json::Error),
}

/// Error type for the encode-then-lookup pipeline.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Configuration failed validation.
    #[error("Encoder configuration invalid with {0} error(s)")]
    InvalidConfig(usize),

    /// Encoding failed.
    #[error(transparent)]
    Encode(#[from] EncodeError),

    /// Catalog lookup failed.
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Error codes for encoder configuration validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigErrorCode {
    /// C001: Radix below 2
    InvalidRadix,
    /// C002: Grid dimension is zero
    EmptyGrid,
    /// C003: Resolution outside 1..=15
    InvalidResolution,
    /// C004: Scramble is not a permutation of the coarse digit groups
    InvalidScramble,
    /// C005: radix^3 does not fit in 64 bits
    RadixTooLarge,
}

impl ConfigErrorCode {
    /// Returns the error code string (e.g., "C001").
    pub fn code(&self) -> &'static str {
        match self {
            ConfigErrorCode::InvalidRadix => "C001",
            ConfigErrorCode::EmptyGrid => "C002",
            ConfigErrorCode::InvalidResolution => "C003",
            ConfigErrorCode::InvalidScramble => "C004",
            ConfigErrorCode::RadixTooLarge => "C005",
        }
    }
}

impl std::fmt::Display for ConfigErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Warning codes for encoder configuration validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigWarningCode {
    /// W001: The input domain is larger than radix^3
    AddressSpaceExceeded,
    /// W002: No shuffle rounds, neighbouring points map to neighbouring indices
    NoShuffle,
    /// W003: Radix larger than the catalog, some digits cannot be looked up
    RadixExceedsCatalog,
}

impl ConfigWarningCode {
    /// Returns the warning code string (e.g., "W001").
    pub fn code(&self) -> &'static str {
        match self {
            ConfigWarningCode::AddressSpaceExceeded => "W001",
            ConfigWarningCode::NoShuffle => "W002",
            ConfigWarningCode::RadixExceedsCatalog => "W003",
        }
    }
}

impl std::fmt::Display for ConfigWarningCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A configuration error with code, message, and the offending field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    /// The error code.
    pub code: ConfigErrorCode,
    /// Human-readable error message.
    pub message: String,
    /// Config field path (e.g., "cell.scramble").
    pub path: Option<String>,
}

impl ConfigError {
    /// Creates a new configuration error.
    pub fn new(code: ConfigErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            path: None,
        }
    }

    /// Creates a new configuration error pointing at a field.
    pub fn with_path(
        code: ConfigErrorCode,
        message: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        Self {
            code,
            message: message.into(),
            path: Some(path.into()),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(ref path) = self.path {
            write!(f, "{}: {} (at {})", self.code, self.message, path)
        } else {
            write!(f, "{}: {}", self.code, self.message)
        }
    }
}

impl std::error::Error for ConfigError {}

/// A configuration warning with code, message, and the field it concerns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    /// The warning code.
    pub code: ConfigWarningCode,
    /// Human-readable warning message.
    pub message: String,
    /// Config field path.
    pub path: Option<String>,
}

impl ConfigWarning {
    /// Creates a new configuration warning.
    pub fn new(code: ConfigWarningCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            path: None,
        }
    }

    /// Creates a new configuration warning pointing at a field.
    pub fn with_path(
        code: ConfigWarningCode,
        message: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        Self {
            code,
            message: message.into(),
            path: Some(path.into()),
        }
    }
}

impl std::fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(ref path) = self.path {
            write!(f, "{}: {} (at {})", self.code, self.message, path)
        } else {
            write!(f, "{}: {}", self.code, self.message)
        }
    }
}

/// Result of encoder configuration validation.
#[derive(Debug, Clone, Default)]
pub struct ConfigReport {
    /// Validation errors; any error makes the config unusable.
    pub errors: Vec<ConfigError>,
    /// Validation warnings.
    pub warnings: Vec<ConfigWarning>,
}

impl ConfigReport {
    /// Adds an error to the report.
    pub fn add_error(&mut self, error: ConfigError) {
        self.errors.push(error);
    }

    /// Adds a warning to the report.
    pub fn add_warning(&mut self, warning: ConfigWarning) {
        self.warnings.push(warning);
    }

    /// Returns true if there are no errors.
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// Converts to a Result, returning Err if there are errors.
    pub fn into_result(self) -> Result<Vec<ConfigWarning>, Vec<ConfigError>> {
        if self.errors.is_empty() {
            Ok(self.warnings)
        } else {
            Err(self.errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_codes() {
        assert_eq!(ConfigErrorCode::InvalidRadix.code(), "C001");
        assert_eq!(ConfigErrorCode::InvalidScramble.code(), "C004");
        assert_eq!(ConfigWarningCode::AddressSpaceExceeded.code(), "W001");
        assert_eq!(ConfigWarningCode::RadixExceedsCatalog.code(), "W003");
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::new(ConfigErrorCode::InvalidRadix, "radix must be at least 2");
        assert_eq!(err.to_string(), "C001: radix must be at least 2");

        let err = ConfigError::with_path(
            ConfigErrorCode::InvalidScramble,
            "duplicate group 3",
            "cell.scramble",
        );
        assert_eq!(err.to_string(), "C004: duplicate group 3 (at cell.scramble)");
    }

    #[test]
    fn test_config_report() {
        let mut report = ConfigReport::default();
        assert!(report.is_ok());

        report.add_warning(ConfigWarning::new(ConfigWarningCode::NoShuffle, "no rounds"));
        assert!(report.is_ok());

        report.add_error(ConfigError::new(ConfigErrorCode::EmptyGrid, "lon_steps is 0"));
        assert!(!report.is_ok());
        assert_eq!(report.into_result().unwrap_err().len(), 1);
    }

    #[test]
    fn test_cell_defect_display() {
        let err = EncodeError::InvalidCellIdentifier {
            cell: "85283473fffffff".to_string(),
            defect: CellDefect::InvalidDigit { position: 5 },
        };
        assert_eq!(
            err.to_string(),
            "Invalid cell identifier 85283473fffffff: digit group 5 decodes to 7"
        );
    }
}
