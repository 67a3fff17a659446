//! Geographic points and linear rescaling.

use std::fmt;

use crate::error::GeoError;

/// Latitude bound of the Web-Mercator projection, in degrees.
pub const WEB_MERCATOR_LAT_LIMIT: f64 = 85.051129;

/// Longitude bound, in degrees.
pub const LONGITUDE_LIMIT: f64 = 180.0;

/// A `(longitude, latitude)` pair in degrees, inside the projectable band.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    longitude: f64,
    latitude: f64,
}

impl GeoPoint {
    /// Creates a point, rejecting non-finite values and anything outside
    /// `[-180, 180] x [-85.051129, 85.051129]`.
    pub fn new(longitude: f64, latitude: f64) -> Result<Self, GeoError> {
        if !longitude.is_finite() || !latitude.is_finite() {
            return Err(GeoError::NonFinite {
                longitude,
                latitude,
            });
        }
        if longitude.abs() > LONGITUDE_LIMIT {
            return Err(GeoError::LongitudeOutOfRange(longitude));
        }
        if latitude.abs() > WEB_MERCATOR_LAT_LIMIT {
            return Err(GeoError::LatitudeOutOfRange {
                latitude,
                limit: WEB_MERCATOR_LAT_LIMIT,
            });
        }
        Ok(Self {
            longitude,
            latitude,
        })
    }

    /// Longitude in degrees.
    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Latitude in degrees.
    pub fn latitude(&self) -> f64 {
        self.latitude
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.longitude, self.latitude)
    }
}

/// Maps `x` linearly from the interval `from` onto the interval `to`.
///
/// ```
/// use what3chords_core::geo::rescale;
///
/// assert_eq!(rescale(0.0, (-180.0, 180.0), (0.0, 1.0)), 0.5);
/// ```
pub fn rescale(x: f64, from: (f64, f64), to: (f64, f64)) -> f64 {
    to.0 + (to.1 - to.0) * (x - from.0) / (from.1 - from.0)
}
