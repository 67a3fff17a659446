//! Catalog usage surveys.
//!
//! Runs an encoder over a sample of inputs and counts how often each catalog
//! entry is addressed. Useful to check that a configuration spreads over the
//! whole catalog and to see how many digits fall past its end.

use rand::Rng;
use serde::Serialize;

use crate::cell::{CellDigits, CellFrame, MAX_REGION};
use crate::encoder::{EncodeInput, Encoder, Strategy};
use crate::error::EncodeError;
use crate::geo::{GeoPoint, LONGITUDE_LIMIT, WEB_MERCATOR_LAT_LIMIT};
use crate::index::EncodedIndex;
use crate::rng::create_rng;

/// Hit counts per catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UsageHistogram {
    /// Hits per catalog position.
    pub counts: Vec<u64>,
    /// Digits at or past the catalog length.
    pub out_of_range: u64,
    /// Inputs the encoder rejected (address overflow, invalid cells).
    pub errors: u64,
    /// Inputs fed to the encoder.
    pub samples: u64,
}

impl UsageHistogram {
    /// Empty histogram over `catalog_len` entries.
    pub fn new(catalog_len: usize) -> Self {
        Self {
            counts: vec![0; catalog_len],
            out_of_range: 0,
            errors: 0,
            samples: 0,
        }
    }

    /// Records the outcome of one encode.
    pub fn record(&mut self, outcome: Result<EncodedIndex, EncodeError>) {
        self.samples += 1;
        match outcome {
            Ok(index) => {
                for digit in index.digits() {
                    match self.counts.get_mut(digit as usize) {
                        Some(count) => *count += 1,
                        None => self.out_of_range += 1,
                    }
                }
            }
            Err(_) => self.errors += 1,
        }
    }

    /// Number of entries hit at least once.
    pub fn distinct(&self) -> usize {
        self.counts.iter().filter(|&&c| c > 0).count()
    }

    /// Number of entries never hit.
    pub fn unused(&self) -> usize {
        self.counts.len() - self.distinct()
    }

    /// Highest hit count of any entry, 0 for an empty histogram.
    pub fn max_hits(&self) -> u64 {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    /// Sum of in-range hits.
    pub fn total_hits(&self) -> u64 {
        self.counts.iter().sum()
    }
}

/// Surveys a `cols x rows` lattice of points spanning the map.
///
/// Lattice points start at the south-west corner (-180, -85.051129) and step
/// evenly; the east and north edges are not sampled. Requires the
/// coordinate-shuffle strategy.
pub fn survey_points(
    encoder: &Encoder,
    catalog_len: usize,
    cols: u32,
    rows: u32,
) -> Result<UsageHistogram, EncodeError> {
    if encoder.strategy() != Strategy::CoordinateShuffle {
        return Err(EncodeError::InputMismatch {
            strategy: encoder.strategy().as_str(),
            input: "point",
        });
    }

    let mut histogram = UsageHistogram::new(catalog_len);
    for row in 0..rows {
        let latitude = lattice(WEB_MERCATOR_LAT_LIMIT, row, rows);
        for col in 0..cols {
            let longitude = lattice(LONGITUDE_LIMIT, col, cols);
            let point = GeoPoint::new(longitude, latitude)?;
            histogram.record(encoder.encode(&EncodeInput::Point(point)));
        }
    }
    Ok(histogram)
}

/// Surveys `count` uniformly random well-formed cells drawn from a PCG32
/// stream seeded with `seed`. Requires the hierarchical-cell strategy.
pub fn survey_cells(
    encoder: &Encoder,
    catalog_len: usize,
    count: u64,
    seed: u32,
) -> Result<UsageHistogram, EncodeError> {
    let Encoder::Cell(cell_encoder) = encoder else {
        return Err(EncodeError::InputMismatch {
            strategy: encoder.strategy().as_str(),
            input: "cell",
        });
    };

    let resolution = cell_encoder.resolution();
    let frame = CellFrame::canonical(resolution)?;
    let mut rng = create_rng(seed);
    let mut histogram = UsageHistogram::new(catalog_len);
    for _ in 0..count {
        let digits = CellDigits {
            region: rng.gen_range(0..=MAX_REGION),
            digits: (0..resolution).map(|_| rng.gen_range(0..7)).collect(),
        };
        let cell = frame.join(&digits)?;
        histogram.record(encoder.encode(&EncodeInput::Cell(cell)));
    }
    Ok(histogram)
}

/// Point `step` of `steps` on `[-limit, limit)`.
fn lattice(limit: f64, step: u32, steps: u32) -> f64 {
    -limit + 2.0 * limit * step as f64 / steps as f64
}
