//! Strategy selection and the unified encoder configuration.
//!
//! One [`EncoderConfig`] carries the parameters of both encoders plus the
//! catalog radix; [`Strategy`] picks which one runs. Configs are plain serde
//! structs, every field defaulted, so a JSON file only needs the fields it
//! changes.

use serde::{Deserialize, Serialize};

use crate::cell::{
    scramble_faults, CellConfig, CellEncoder, FinestLevel, HierarchicalCellId, MAX_RESOLUTION,
};
use crate::error::{
    ConfigError, ConfigErrorCode, ConfigReport, ConfigWarning, ConfigWarningCode, EncodeError,
};
use crate::geo::GeoPoint;
use crate::index::{EncodedIndex, INDEX_DIGITS};
use crate::numeral::checked_pow;
use crate::shuffle::{ShuffleConfig, ShuffleEncoder};

/// Which encoder a configuration selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Discretize + cat-map shuffle of a coordinate.
    #[default]
    CoordinateShuffle,
    /// Mixed-radix reading of a hierarchical cell id.
    HierarchicalCell,
}

impl Strategy {
    /// Name used in config files and diagnostics.
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::CoordinateShuffle => "coordinate_shuffle",
            Strategy::HierarchicalCell => "hierarchical_cell",
        }
    }
}

/// Complete encoder configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncoderConfig {
    /// Active encoder.
    pub strategy: Strategy,
    /// Catalog radix; every index digit is below it.
    pub radix: u32,
    /// Coordinate-shuffle parameters.
    pub shuffle: ShuffleConfig,
    /// Hierarchical-cell parameters.
    pub cell: CellConfig,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::CoordinateShuffle,
            radix: 2041,
            shuffle: ShuffleConfig::default(),
            cell: CellConfig::default(),
        }
    }
}

impl EncoderConfig {
    /// Names accepted by [`by_name`](Self::by_name).
    pub const PRESETS: [&'static str; 3] = ["shuffle", "cell", "cell-exact"];

    /// Looks up a named preset.
    ///
    /// - `shuffle`: 130400x65200 grid, 15 rounds, radix 2041
    /// - `cell`: resolution 10, scrambled, binary finest level, radix 2141
    /// - `cell-exact`: resolution 9, unscrambled, septenary finest level,
    ///   radix 2141 (exactly invertible)
    pub fn by_name(name: &str) -> Option<Self> {
        match name {
            "shuffle" => Some(Self::default()),
            "cell" => Some(Self {
                strategy: Strategy::HierarchicalCell,
                radix: 2141,
                ..Self::default()
            }),
            "cell-exact" => Some(Self {
                strategy: Strategy::HierarchicalCell,
                radix: 2141,
                cell: CellConfig {
                    resolution: 9,
                    scramble: (0..8).collect(),
                    finest_level: FinestLevel::Septenary,
                },
                ..Self::default()
            }),
            _ => None,
        }
    }

    /// Parses a config from JSON text.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serializes the config as pretty JSON.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Number of values the active encoder can produce, `None` on overflow.
    pub fn domain_size(&self) -> Option<u64> {
        match self.strategy {
            Strategy::CoordinateShuffle => Some(self.shuffle.domain_size()),
            Strategy::HierarchicalCell => self.cell.domain_size(),
        }
    }

    /// Validates the config.
    ///
    /// Parameters of the inactive strategy are not checked.
    pub fn validate(&self) -> ConfigReport {
        let mut report = ConfigReport::default();

        validate_radix(self.radix, &mut report);
        match self.strategy {
            Strategy::CoordinateShuffle => validate_shuffle(&self.shuffle, &mut report),
            Strategy::HierarchicalCell => validate_cell(&self.cell, &mut report),
        }

        if report.is_ok() {
            check_address_space(self, &mut report);
        }
        report
    }

    /// Validates the config against a catalog of `catalog_len` entries.
    pub fn validate_for_catalog(&self, catalog_len: usize) -> ConfigReport {
        let mut report = self.validate();
        if (self.radix as u64) > catalog_len as u64 {
            report.add_warning(ConfigWarning::with_path(
                ConfigWarningCode::RadixExceedsCatalog,
                format!(
                    "radix {} exceeds the catalog size {}; digits from {} up cannot be looked up",
                    self.radix, catalog_len, catalog_len
                ),
                "radix",
            ));
        }
        report
    }
}

fn validate_radix(radix: u32, report: &mut ConfigReport) {
    if radix < 2 {
        report.add_error(ConfigError::with_path(
            ConfigErrorCode::InvalidRadix,
            format!("radix must be at least 2, got {}", radix),
            "radix",
        ));
    } else if checked_pow(radix, INDEX_DIGITS as u32).is_none() {
        report.add_error(ConfigError::with_path(
            ConfigErrorCode::RadixTooLarge,
            format!("radix {} cubed does not fit in 64 bits", radix),
            "radix",
        ));
    }
}

fn validate_shuffle(shuffle: &ShuffleConfig, report: &mut ConfigReport) {
    if shuffle.lon_steps == 0 {
        report.add_error(ConfigError::with_path(
            ConfigErrorCode::EmptyGrid,
            "lon_steps must be positive",
            "shuffle.lon_steps",
        ));
    }
    if shuffle.lat_steps == 0 {
        report.add_error(ConfigError::with_path(
            ConfigErrorCode::EmptyGrid,
            "lat_steps must be positive",
            "shuffle.lat_steps",
        ));
    }
    if shuffle.rounds == 0 {
        report.add_warning(ConfigWarning::with_path(
            ConfigWarningCode::NoShuffle,
            "rounds is 0; neighbouring points get neighbouring indices",
            "shuffle.rounds",
        ));
    }
}

fn validate_cell(cell: &CellConfig, report: &mut ConfigReport) {
    if cell.resolution == 0 || cell.resolution > MAX_RESOLUTION {
        report.add_error(ConfigError::with_path(
            ConfigErrorCode::InvalidResolution,
            format!(
                "resolution must be 1-{}, got {}",
                MAX_RESOLUTION, cell.resolution
            ),
            "cell.resolution",
        ));
        return;
    }

    let coarse = cell.resolution as usize - 1;
    if cell.scramble.len() != coarse {
        report.add_error(ConfigError::with_path(
            ConfigErrorCode::InvalidScramble,
            format!(
                "scramble must list {} groups at resolution {}, got {}",
                coarse,
                cell.resolution,
                cell.scramble.len()
            ),
            "cell.scramble",
        ));
        return;
    }
    for fault in scramble_faults(&cell.scramble) {
        report.add_error(ConfigError::with_path(
            ConfigErrorCode::InvalidScramble,
            fault.describe(coarse),
            format!("cell.scramble[{}]", fault.index),
        ));
    }
}

fn check_address_space(config: &EncoderConfig, report: &mut ConfigReport) {
    let Some(capacity) = checked_pow(config.radix, INDEX_DIGITS as u32) else {
        return;
    };
    match config.domain_size() {
        Some(domain) if domain <= capacity => {}
        Some(domain) => report.add_warning(ConfigWarning::new(
            ConfigWarningCode::AddressSpaceExceeded,
            format!(
                "{} input values exceed radix^3 = {}; {} of them fail with an address overflow",
                domain,
                capacity,
                domain - capacity
            ),
        )),
        None => report.add_warning(ConfigWarning::new(
            ConfigWarningCode::AddressSpaceExceeded,
            format!("input domain overflows 64 bits, far beyond radix^3 = {}", capacity),
        )),
    }
}

/// Input to an encoder.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EncodeInput {
    /// A coordinate, for the coordinate-shuffle strategy.
    Point(GeoPoint),
    /// A cell id, for the hierarchical-cell strategy.
    Cell(HierarchicalCellId),
}

impl EncodeInput {
    fn kind(&self) -> &'static str {
        match self {
            EncodeInput::Point(_) => "point",
            EncodeInput::Cell(_) => "cell",
        }
    }
}

/// External hierarchical indexer: resolves a coordinate to its cell id.
///
/// The core never computes cell ids itself; a caller that only has
/// coordinates plugs an indexer in here to drive the cell strategy.
pub trait CellSource {
    /// The cell containing `point` at `resolution`, if the indexer has one.
    fn cell_at(&self, point: &GeoPoint, resolution: u8) -> Option<HierarchicalCellId>;
}

impl<F> CellSource for F
where
    F: Fn(&GeoPoint, u8) -> Option<HierarchicalCellId>,
{
    fn cell_at(&self, point: &GeoPoint, resolution: u8) -> Option<HierarchicalCellId> {
        self(point, resolution)
    }
}

/// A configured encoder of either strategy.
#[derive(Debug, Clone)]
pub enum Encoder {
    /// Coordinate-shuffle encoder.
    Shuffle(ShuffleEncoder),
    /// Hierarchical-cell encoder.
    Cell(CellEncoder),
}

impl Encoder {
    /// Builds the encoder the config's strategy selects.
    pub fn from_config(config: &EncoderConfig) -> Result<Self, EncodeError> {
        match config.strategy {
            Strategy::CoordinateShuffle => Ok(Encoder::Shuffle(ShuffleEncoder::new(
                config.shuffle,
                config.radix,
            )?)),
            Strategy::HierarchicalCell => {
                Ok(Encoder::Cell(CellEncoder::new(&config.cell, config.radix)?))
            }
        }
    }

    /// The active strategy.
    pub fn strategy(&self) -> Strategy {
        match self {
            Encoder::Shuffle(_) => Strategy::CoordinateShuffle,
            Encoder::Cell(_) => Strategy::HierarchicalCell,
        }
    }

    /// The catalog radix.
    pub fn radix(&self) -> u32 {
        match self {
            Encoder::Shuffle(encoder) => encoder.radix(),
            Encoder::Cell(encoder) => encoder.radix(),
        }
    }

    /// Encodes an input; the input kind must match the strategy.
    pub fn encode(&self, input: &EncodeInput) -> Result<EncodedIndex, EncodeError> {
        match (self, input) {
            (Encoder::Shuffle(encoder), EncodeInput::Point(point)) => encoder.encode(point),
            (Encoder::Cell(encoder), EncodeInput::Cell(cell)) => encoder.encode(*cell),
            _ => Err(EncodeError::InputMismatch {
                strategy: self.strategy().as_str(),
                input: input.kind(),
            }),
        }
    }

    /// Encodes a coordinate under either strategy, asking `source` for the
    /// cell when the cell strategy is active.
    pub fn encode_point(
        &self,
        point: &GeoPoint,
        source: &dyn CellSource,
    ) -> Result<EncodedIndex, EncodeError> {
        match self {
            Encoder::Shuffle(encoder) => encoder.encode(point),
            Encoder::Cell(encoder) => {
                let cell = source.cell_at(point, encoder.resolution()).ok_or_else(|| {
                    EncodeError::InvalidParameter(format!(
                        "no cell at resolution {} for {}",
                        encoder.resolution(),
                        point
                    ))
                })?;
                encoder.encode(cell)
            }
        }
    }
}
