//! what3chords Core - Deterministic Geo-to-Chord Index Encoding
//!
//! This crate maps a geographic location to three entries of a flattened
//! guitar chord catalog. Two interchangeable encoders derive a fixed-length
//! [`EncodedIndex`] from their input:
//!
//! - **Coordinate shuffle**: discretizes a `(longitude, latitude)` pair onto a
//!   toroidal grid, mixes it with repeated discrete cat-map steps and writes the
//!   resulting linear cell index in the catalog radix.
//! - **Hierarchical cell**: takes a 64-bit hexagonal hierarchical cell id
//!   supplied by an external indexer, scrambles its base-7 digit groups and
//!   reads region + digits as a mixed-radix numeral.
//!
//! # Determinism
//!
//! Every encode and lookup path is a pure function of its input and the
//! [`EncoderConfig`]. The only randomized operation is the diagnostic
//! [`CellEncoder::partial_decode`], which draws from a caller-supplied RNG
//! (see [`rng`] for the seeded PCG32 helpers).
//!
//! # Example
//!
//! ```
//! use what3chords_core::{Encoder, EncoderConfig, EncodeInput, GeoPoint};
//!
//! let config = EncoderConfig::by_name("shuffle").unwrap();
//! let encoder = Encoder::from_config(&config).unwrap();
//!
//! let point = GeoPoint::new(0.0, 0.0).unwrap();
//! let index = encoder.encode(&EncodeInput::Point(point)).unwrap();
//! assert_eq!(index.digits(), [1020, 1034, 186]);
//! ```
//!
//! # Modules
//!
//! - [`geo`]: Geographic point type and linear rescaling
//! - [`numeral`]: Radix conversion utilities
//! - [`index`]: The three-digit catalog address
//! - [`shuffle`]: Coordinate-shuffle encoder
//! - [`cell`]: Hierarchical-cell encoder and its partial inverse
//! - [`catalog`]: Chord dataset flattening and lookup
//! - [`encoder`]: Strategy selection and unified configuration
//! - [`session`]: Encoder + catalog orchestration
//! - [`survey`]: Catalog usage histograms
//! - [`rng`]: Seeded RNG for diagnostic decoding

pub mod catalog;
pub mod cell;
pub mod encoder;
pub mod error;
pub mod geo;
pub mod index;
pub mod numeral;
pub mod rng;
pub mod session;
pub mod shuffle;
pub mod survey;

// Re-export commonly used types at the crate root
pub use catalog::{ChordCatalog, ChordDataset, ChordEntry, ChordPosition, ChordVariant, Fret};
pub use cell::{
    is_valid_cell_id, split_cell, CellConfig, CellDigits, CellEncoder, CellFrame, DigitScramble,
    FinestLevel, HierarchicalCellId, MAX_REGION, MAX_RESOLUTION,
};
pub use encoder::{CellSource, EncodeInput, Encoder, EncoderConfig, Strategy};
pub use error::{
    CatalogError, CellDefect, ConfigError, ConfigErrorCode, ConfigReport, ConfigWarning,
    ConfigWarningCode, EncodeError, GeoError, NumeralError, SessionError,
};
pub use geo::{rescale, GeoPoint, WEB_MERCATOR_LAT_LIMIT};
pub use index::{EncodedIndex, INDEX_DIGITS};
pub use numeral::{digit_count, from_base, to_base};
pub use session::{ChordSelection, Session};
pub use shuffle::{cat_map, ShuffleConfig, ShuffleEncoder};
pub use survey::{survey_cells, survey_points, UsageHistogram};

/// Crate version for diagnostics.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
