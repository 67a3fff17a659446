//! Coordinate-shuffle encoder.
//!
//! A point is snapped onto a `lon_steps x lat_steps` grid, moved into the unit
//! square, mixed by repeated discrete cat-map steps and snapped back. The
//! resulting grid cell is linearized and written in the catalog radix.
//!
//! The grid is a torus: column `lon_steps` wraps to column 0 and row
//! `lat_steps` to row 0. Longitude -180 and +180 therefore share a column, and
//! the unit-square image of the grid is closed under the cat map, which treats
//! 1.0 and 0.0 as the same coordinate anyway.

use serde::{Deserialize, Serialize};

use crate::error::EncodeError;
use crate::geo::{rescale, GeoPoint, LONGITUDE_LIMIT, WEB_MERCATOR_LAT_LIMIT};
use crate::index::EncodedIndex;

/// Grid resolution and mixing depth for the coordinate-shuffle encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShuffleConfig {
    /// Grid columns across 360 degrees of longitude.
    pub lon_steps: u32,
    /// Grid rows across the Web-Mercator latitude band.
    pub lat_steps: u32,
    /// Number of cat-map applications.
    pub rounds: u32,
}

impl Default for ShuffleConfig {
    fn default() -> Self {
        Self {
            lon_steps: 130_400,
            lat_steps: 65_200,
            rounds: 15,
        }
    }
}

impl ShuffleConfig {
    /// Number of grid cells, i.e. the size of the encoder's input domain.
    pub fn domain_size(&self) -> u64 {
        self.lon_steps as u64 * self.lat_steps as u64
    }
}

/// One step of Arnold's cat map on the unit torus.
///
/// ```
/// use what3chords_core::shuffle::cat_map;
///
/// assert_eq!(cat_map(0.5, 0.5), (0.5, 0.0));
/// ```
pub fn cat_map(x: f64, y: f64) -> (f64, f64) {
    ((2.0 * x + y) % 1.0, (x + y) % 1.0)
}

/// Encodes geographic points through the discretized cat map.
#[derive(Debug, Clone)]
pub struct ShuffleEncoder {
    config: ShuffleConfig,
    radix: u32,
}

impl ShuffleEncoder {
    /// Creates an encoder, rejecting an empty grid or a radix below 2.
    pub fn new(config: ShuffleConfig, radix: u32) -> Result<Self, EncodeError> {
        if config.lon_steps == 0 || config.lat_steps == 0 {
            return Err(EncodeError::InvalidParameter(format!(
                "grid must be non-empty, got {}x{}",
                config.lon_steps, config.lat_steps
            )));
        }
        EncodedIndex::capacity(radix)?;
        Ok(Self { config, radix })
    }

    /// The grid configuration.
    pub fn config(&self) -> &ShuffleConfig {
        &self.config
    }

    /// The catalog radix.
    pub fn radix(&self) -> u32 {
        self.radix
    }

    /// Snaps a point to its `(column, row)` grid cell.
    pub fn discretize(&self, point: &GeoPoint) -> (u64, u64) {
        let lon_steps = self.config.lon_steps as f64;
        let lat_steps = self.config.lat_steps as f64;
        let x = rescale(
            point.longitude(),
            (-LONGITUDE_LIMIT, LONGITUDE_LIMIT),
            (0.0, lon_steps),
        );
        let y = rescale(
            point.latitude(),
            (-WEB_MERCATOR_LAT_LIMIT, WEB_MERCATOR_LAT_LIMIT),
            (0.0, lat_steps),
        );
        self.wrap(x.round(), y.round())
    }

    /// Applies the configured number of cat-map rounds to a grid cell.
    pub fn shuffle(&self, cell: (u64, u64)) -> (u64, u64) {
        let lon_steps = self.config.lon_steps as f64;
        let lat_steps = self.config.lat_steps as f64;

        let mut x = cell.0 as f64 / lon_steps;
        let mut y = cell.1 as f64 / lat_steps;
        for _ in 0..self.config.rounds {
            (x, y) = cat_map(x, y);
        }

        self.wrap((x * lon_steps).round(), (y * lat_steps).round())
    }

    /// Row-major linear index of a grid cell.
    pub fn linear_index(&self, cell: (u64, u64)) -> u64 {
        cell.0 + cell.1 * self.config.lon_steps as u64
    }

    /// Encodes a point into a catalog index.
    ///
    /// # Example
    /// ```
    /// use what3chords_core::{GeoPoint, ShuffleConfig, ShuffleEncoder};
    ///
    /// let encoder = ShuffleEncoder::new(ShuffleConfig::default(), 2041).unwrap();
    /// let index = encoder.encode(&GeoPoint::new(0.0, 0.0).unwrap()).unwrap();
    /// assert_eq!(index.to_string(), "1020.1034.186");
    /// ```
    pub fn encode(&self, point: &GeoPoint) -> Result<EncodedIndex, EncodeError> {
        let cell = self.shuffle(self.discretize(point));
        EncodedIndex::from_value(self.linear_index(cell), self.radix)
    }

    fn wrap(&self, x: f64, y: f64) -> (u64, u64) {
        (
            x as u64 % self.config.lon_steps as u64,
            y as u64 % self.config.lat_steps as u64,
        )
    }
}
