//! Encode-then-lookup orchestration.

use serde::Serialize;

use crate::catalog::{ChordCatalog, ChordEntry};
use crate::encoder::{CellSource, EncodeInput, Encoder, EncoderConfig};
use crate::error::{ConfigWarning, SessionError};
use crate::geo::GeoPoint;
use crate::index::EncodedIndex;

/// The three chords selected for one input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChordSelection {
    /// The encoded catalog address.
    pub index: EncodedIndex,
    /// One chord per index digit, in digit order.
    pub chords: [ChordEntry; 3],
}

/// An encoder bound to a catalog.
///
/// Immutable after construction, so one session can serve any number of
/// threads.
#[derive(Debug, Clone)]
pub struct Session {
    config: EncoderConfig,
    encoder: Encoder,
    catalog: ChordCatalog,
    warnings: Vec<ConfigWarning>,
}

impl Session {
    /// Validates `config` against `catalog` and builds the encoder.
    ///
    /// Validation warnings are kept and available through
    /// [`warnings`](Self::warnings); any validation error fails.
    pub fn new(config: EncoderConfig, catalog: ChordCatalog) -> Result<Self, SessionError> {
        let warnings = config
            .validate_for_catalog(catalog.len())
            .into_result()
            .map_err(|errors| SessionError::InvalidConfig(errors.len()))?;
        let encoder = Encoder::from_config(&config)?;
        Ok(Self {
            config,
            encoder,
            catalog,
            warnings,
        })
    }

    /// The configuration the session was built from.
    pub fn config(&self) -> &EncoderConfig {
        &self.config
    }

    /// The configured encoder.
    pub fn encoder(&self) -> &Encoder {
        &self.encoder
    }

    /// The bound catalog.
    pub fn catalog(&self) -> &ChordCatalog {
        &self.catalog
    }

    /// Warnings raised while validating the configuration.
    pub fn warnings(&self) -> &[ConfigWarning] {
        &self.warnings
    }

    /// Encodes `input` and looks up its three chords.
    pub fn chords_for(&self, input: &EncodeInput) -> Result<ChordSelection, SessionError> {
        let index = self.encoder.encode(input)?;
        self.select(index)
    }

    /// Like [`chords_for`](Self::chords_for) for a coordinate, resolving the
    /// cell through `source` under the cell strategy.
    pub fn chords_for_point(
        &self,
        point: &GeoPoint,
        source: &dyn CellSource,
    ) -> Result<ChordSelection, SessionError> {
        let index = self.encoder.encode_point(point, source)?;
        self.select(index)
    }

    fn select(&self, index: EncodedIndex) -> Result<ChordSelection, SessionError> {
        let [a, b, c] = self.catalog.lookup(&index)?;
        Ok(ChordSelection {
            index,
            chords: [a.clone(), b.clone(), c.clone()],
        })
    }
}
