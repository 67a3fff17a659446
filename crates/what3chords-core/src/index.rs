//! The three-digit catalog address produced by both encoders.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{EncodeError, NumeralError};
use crate::numeral::{checked_pow, from_base, to_base};

/// Number of digits in an [`EncodedIndex`]; one catalog lookup per digit.
pub const INDEX_DIGITS: usize = 3;

/// Three base-`radix` digits, most significant first.
///
/// Every digit is below `radix` by construction. Digits are not checked
/// against any catalog length; that happens at lookup time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawIndex")]
pub struct EncodedIndex {
    digits: [u32; INDEX_DIGITS],
    radix: u32,
}

/// Unchecked wire form; only reaches [`EncodedIndex`] through `new`.
#[derive(Deserialize)]
struct RawIndex {
    digits: [u32; INDEX_DIGITS],
    radix: u32,
}

impl TryFrom<RawIndex> for EncodedIndex {
    type Error = NumeralError;

    fn try_from(raw: RawIndex) -> Result<Self, Self::Error> {
        Self::new(raw.digits, raw.radix)
    }
}

impl EncodedIndex {
    /// Builds an index from explicit digits.
    pub fn new(digits: [u32; INDEX_DIGITS], radix: u32) -> Result<Self, NumeralError> {
        // from_base checks the radix and every digit
        from_base(&digits, radix)?;
        Ok(Self { digits, radix })
    }

    /// Writes `value` as three base-`radix` digits, zero padded.
    ///
    /// A value of `radix^3` or more has no three-digit form and is reported as
    /// [`EncodeError::AddressOverflow`].
    pub fn from_value(value: u64, radix: u32) -> Result<Self, EncodeError> {
        let capacity = Self::capacity(radix)?;
        if value >= capacity {
            return Err(EncodeError::AddressOverflow { value, capacity });
        }
        let digits = to_base(value, radix, Some(INDEX_DIGITS))?;
        let mut out = [0u32; INDEX_DIGITS];
        out.copy_from_slice(&digits);
        Ok(Self { digits: out, radix })
    }

    /// Number of distinct indices for `radix`, i.e. `radix^3`.
    pub fn capacity(radix: u32) -> Result<u64, EncodeError> {
        if radix < 2 {
            return Err(NumeralError::InvalidRadix(radix).into());
        }
        checked_pow(radix, INDEX_DIGITS as u32).ok_or_else(|| {
            EncodeError::InvalidParameter(format!("radix {} cubed overflows 64 bits", radix))
        })
    }

    /// Parses `a.b.c` (commas are accepted as separators too).
    pub fn parse(text: &str, radix: u32) -> Result<Self, EncodeError> {
        let parts: Vec<&str> = text
            .trim()
            .split(['.', ','])
            .map(str::trim)
            .collect();
        if parts.len() != INDEX_DIGITS {
            return Err(EncodeError::InvalidParameter(format!(
                "expected {} digits in '{}', got {}",
                INDEX_DIGITS,
                text,
                parts.len()
            )));
        }
        let mut digits = [0u32; INDEX_DIGITS];
        for (slot, part) in digits.iter_mut().zip(&parts) {
            *slot = part.parse().map_err(|_| {
                EncodeError::InvalidParameter(format!("'{}' is not a digit value", part))
            })?;
        }
        Ok(Self::new(digits, radix)?)
    }

    /// The digits, most significant first.
    pub fn digits(&self) -> [u32; INDEX_DIGITS] {
        self.digits
    }

    /// The radix the digits are written in.
    pub fn radix(&self) -> u32 {
        self.radix
    }

    /// The integer the digits spell.
    pub fn value(&self) -> u64 {
        let radix = self.radix as u64;
        self.digits
            .iter()
            .fold(0u64, |acc, &d| acc * radix + d as u64)
    }
}

impl fmt::Display for EncodedIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.digits[0], self.digits[1], self.digits[2])
    }
}
