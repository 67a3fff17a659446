//! Hierarchical-cell encoder.
//!
//! A cell id from an external hexagonal hierarchical index is a 64-bit word
//! with this layout (bit 0 is the most significant bit):
//!
//! ```text
//! | frame prefix | region | digit 0 | digit 1 | ... | digit R-1 | suffix   |
//! | bits 0..12   | 12..19 | 19..22  | 22..25  |     |           | ..64     |
//! ```
//!
//! The prefix carries reserved, mode and resolution fields, the suffix the
//! unused finer digit slots. Neither is semantic content here: they are split
//! off into a [`CellFrame`] and only needed again to reassemble an id.
//!
//! Encoding scrambles the first `R - 1` base-7 digits with a fixed
//! permutation (raw ids are spatially smooth, nearby cells share prefixes),
//! then reads region and digits as one mixed-radix numeral. With
//! [`FinestLevel::Binary`] only the low bit of the finest digit survives, so
//! [`CellEncoder::partial_decode`] has to guess the two missing bits.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{CellDefect, EncodeError};
use crate::index::EncodedIndex;

/// Finest supported resolution level.
pub const MAX_RESOLUTION: u8 = 15;

/// Largest valid region selector (122 base cells).
pub const MAX_REGION: u8 = 121;

const PREFIX_BITS: u32 = 12;
const REGION_BITS: u32 = 7;
const DIGIT_BITS: u32 = 3;
const DIGITS_START: u32 = PREFIX_BITS + REGION_BITS;
const WORD_BITS: u32 = 64;

/// Digit-group value that is not a base-7 digit.
const UNUSED_DIGIT: u8 = 7;

/// Cell mode value for the canonical frame.
const CELL_MODE: u16 = 1;

/// A 64-bit hierarchical cell identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HierarchicalCellId(u64);

impl HierarchicalCellId {
    /// Wraps a raw 64-bit id.
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw 64-bit id.
    pub fn raw(&self) -> u64 {
        self.0
    }

    /// Parses up to 16 hex digits; shorter input is implicitly zero-padded on
    /// the left. A leading `0x` is accepted.
    pub fn from_hex(text: &str) -> Result<Self, EncodeError> {
        let trimmed = text.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);
        if digits.is_empty()
            || digits.len() > 16
            || !digits.chars().all(|c| c.is_ascii_hexdigit())
        {
            return Err(EncodeError::InvalidHex(text.to_string()));
        }
        u64::from_str_radix(digits, 16)
            .map(Self)
            .map_err(|_| EncodeError::InvalidHex(text.to_string()))
    }

    /// The id as 64 `'0'`/`'1'` characters, most significant bit first.
    pub fn to_bit_string(&self) -> String {
        format!("{:064b}", self.0)
    }

    /// Bits `[start, end)` counted from the most significant bit.
    pub fn bits(&self, start: u32, end: u32) -> u64 {
        field(self.0, start, end)
    }

    /// The resolution recorded in the frame prefix.
    pub fn resolution_field(&self) -> u8 {
        (self.bits(0, PREFIX_BITS) & 0xF) as u8
    }
}

impl fmt::Display for HierarchicalCellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:x}", self.0)
    }
}

impl FromStr for HierarchicalCellId {
    type Err = EncodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl TryFrom<String> for HierarchicalCellId {
    type Error = EncodeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

impl From<HierarchicalCellId> for String {
    fn from(cell: HierarchicalCellId) -> Self {
        cell.to_string()
    }
}

/// The structural bits around a cell's region and digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellFrame {
    /// Bits `[0, 12)`.
    pub prefix: u16,
    /// The bits after the last used digit group, right-aligned.
    pub suffix: u64,
    /// Width of `suffix`.
    pub suffix_bits: u32,
}

impl CellFrame {
    /// The frame a well-formed cell at `resolution` carries: reserved bits
    /// clear, cell mode, the resolution field set and every unused digit slot
    /// filled with 7.
    pub fn canonical(resolution: u8) -> Result<Self, EncodeError> {
        check_resolution(resolution)?;
        let suffix_bits = suffix_bits(resolution);
        Ok(Self {
            prefix: (CELL_MODE << 7) | resolution as u16,
            suffix: mask(suffix_bits),
            suffix_bits,
        })
    }

    /// Resolution the frame was split at, derived from the suffix width.
    pub fn resolution(&self) -> u8 {
        ((WORD_BITS - DIGITS_START).saturating_sub(self.suffix_bits) / DIGIT_BITS) as u8
    }

    /// Reassembles a cell id from this frame and a set of digits.
    pub fn join(&self, digits: &CellDigits) -> Result<HierarchicalCellId, EncodeError> {
        let count = digits.digits.len();
        if count == 0
            || count > MAX_RESOLUTION as usize
            || self.resolution() as usize != count
            || suffix_bits(count as u8) != self.suffix_bits
        {
            return Err(EncodeError::InvalidParameter(format!(
                "frame for resolution {} cannot hold {} digits",
                self.resolution(),
                count
            )));
        }

        let mut raw = (self.prefix as u64 & mask(PREFIX_BITS)) << (WORD_BITS - PREFIX_BITS);
        raw |= (digits.region as u64 & mask(REGION_BITS)) << (WORD_BITS - DIGITS_START);
        for (i, &digit) in digits.digits.iter().enumerate() {
            let end = digit_end(i);
            raw |= (digit as u64 & mask(DIGIT_BITS)) << (WORD_BITS - end);
        }
        raw |= self.suffix & mask(self.suffix_bits);
        Ok(HierarchicalCellId(raw))
    }
}

/// Region selector and base-7 digits of a cell, coarsest digit first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellDigits {
    /// Base-cell region selector.
    pub region: u8,
    /// One 3-bit group per resolution level.
    pub digits: Vec<u8>,
}

impl CellDigits {
    /// The first reason these digits are outside the valid index space.
    pub fn defect(&self) -> Option<CellDefect> {
        if self.region > MAX_REGION {
            return Some(CellDefect::RegionOutOfRange(self.region));
        }
        self.digits
            .iter()
            .position(|&d| d >= UNUSED_DIGIT)
            .map(|position| CellDefect::InvalidDigit { position })
    }
}

/// Splits a cell id into digits and frame at `resolution`.
///
/// No validity check happens here; see [`is_valid_cell_id`].
pub fn split_cell(
    cell: HierarchicalCellId,
    resolution: u8,
) -> Result<(CellDigits, CellFrame), EncodeError> {
    check_resolution(resolution)?;
    let region = cell.bits(PREFIX_BITS, DIGITS_START) as u8;
    let digits = (0..resolution as usize)
        .map(|i| cell.bits(digit_end(i) - DIGIT_BITS, digit_end(i)) as u8)
        .collect();
    let suffix_bits = suffix_bits(resolution);
    let frame = CellFrame {
        prefix: cell.bits(0, PREFIX_BITS) as u16,
        suffix: cell.raw() & mask(suffix_bits),
        suffix_bits,
    };
    Ok((CellDigits { region, digits }, frame))
}

/// True when the region selector is in `[0, 121]` and none of the first
/// `resolution` digit groups holds 7.
///
/// ```
/// use what3chords_core::cell::{is_valid_cell_id, HierarchicalCellId};
///
/// let cell: HierarchicalCellId = "8a2a1072b59ffff".parse().unwrap();
/// assert!(is_valid_cell_id(cell, 10));
/// // resolution-5 cell read at resolution 10 runs into unused digit slots
/// let coarse: HierarchicalCellId = "85283473fffffff".parse().unwrap();
/// assert!(!is_valid_cell_id(coarse, 10));
/// ```
pub fn is_valid_cell_id(cell: HierarchicalCellId, resolution: u8) -> bool {
    split_cell(cell, resolution)
        .map(|(digits, _)| digits.defect().is_none())
        .unwrap_or(false)
}

/// How much of the finest digit group reaches the encoded value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinestLevel {
    /// Full base-7 digit; the encoding is exactly invertible.
    Septenary,
    /// Only the low bit; two bits per cell are lost.
    #[default]
    Binary,
}

impl FinestLevel {
    /// Number of values the finest group contributes.
    pub fn radix(&self) -> u64 {
        match self {
            FinestLevel::Septenary => 7,
            FinestLevel::Binary => 2,
        }
    }

    /// Name used in config files and diagnostics.
    pub fn as_str(&self) -> &'static str {
        match self {
            FinestLevel::Septenary => "septenary",
            FinestLevel::Binary => "binary",
        }
    }
}

/// Permutation over the coarse digit groups: `out[i] = in[perm[i]]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigitScramble {
    perm: Vec<usize>,
}

impl DigitScramble {
    /// The permutation that leaves every group in place.
    pub fn identity(len: usize) -> Self {
        Self {
            perm: (0..len).collect(),
        }
    }

    /// Checks that `perm` is a permutation of `0..perm.len()`.
    pub fn new(perm: Vec<usize>) -> Result<Self, EncodeError> {
        if let Some(fault) = scramble_faults(&perm).first() {
            return Err(EncodeError::InvalidParameter(fault.describe(perm.len())));
        }
        Ok(Self { perm })
    }

    /// Number of groups permuted.
    pub fn len(&self) -> usize {
        self.perm.len()
    }

    /// True for the empty permutation.
    pub fn is_empty(&self) -> bool {
        self.perm.is_empty()
    }

    /// The permutation entries.
    pub fn as_slice(&self) -> &[usize] {
        &self.perm
    }

    /// Reorders `groups`. Panics if the lengths differ.
    pub fn apply(&self, groups: &[u8]) -> Vec<u8> {
        assert_eq!(groups.len(), self.perm.len(), "scramble length mismatch");
        self.perm.iter().map(|&p| groups[p]).collect()
    }

    /// Undoes [`apply`](Self::apply). Panics if the lengths differ.
    pub fn invert(&self, groups: &[u8]) -> Vec<u8> {
        assert_eq!(groups.len(), self.perm.len(), "scramble length mismatch");
        let mut out = vec![0u8; groups.len()];
        for (&p, &g) in self.perm.iter().zip(groups) {
            out[p] = g;
        }
        out
    }
}

/// Hierarchical-cell encoder parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CellConfig {
    /// Resolution level R; the id carries R digit groups.
    pub resolution: u8,
    /// Permutation over the first R - 1 digit groups.
    pub scramble: Vec<usize>,
    /// Treatment of the finest (R-th) digit group.
    pub finest_level: FinestLevel,
}

impl Default for CellConfig {
    fn default() -> Self {
        Self {
            resolution: 10,
            scramble: vec![4, 7, 1, 8, 2, 5, 0, 6, 3],
            finest_level: FinestLevel::Binary,
        }
    }
}

impl CellConfig {
    /// Number of distinct encoded values, or `None` on overflow.
    pub fn domain_size(&self) -> Option<u64> {
        let coarse = 7u64.checked_pow(self.resolution.checked_sub(1)? as u32)?;
        (MAX_REGION as u64 + 1)
            .checked_mul(coarse)?
            .checked_mul(self.finest_level.radix())
    }
}

/// Encodes hierarchical cell ids into catalog indices.
#[derive(Debug, Clone)]
pub struct CellEncoder {
    resolution: u8,
    scramble: DigitScramble,
    finest_level: FinestLevel,
    radix: u32,
}

impl CellEncoder {
    /// Creates an encoder; the scramble must cover exactly `resolution - 1`
    /// groups.
    pub fn new(config: &CellConfig, radix: u32) -> Result<Self, EncodeError> {
        check_resolution(config.resolution)?;
        let coarse = config.resolution as usize - 1;
        if config.scramble.len() != coarse {
            return Err(EncodeError::InvalidParameter(format!(
                "scramble must cover {} groups at resolution {}, got {}",
                coarse,
                config.resolution,
                config.scramble.len()
            )));
        }
        let scramble = DigitScramble::new(config.scramble.clone())?;
        EncodedIndex::capacity(radix)?;
        Ok(Self {
            resolution: config.resolution,
            scramble,
            finest_level: config.finest_level,
            radix,
        })
    }

    /// The resolution level.
    pub fn resolution(&self) -> u8 {
        self.resolution
    }

    /// The catalog radix.
    pub fn radix(&self) -> u32 {
        self.radix
    }

    /// The coarse-group permutation.
    pub fn scramble(&self) -> &DigitScramble {
        &self.scramble
    }

    /// Reads region, scrambled coarse digits and finest digit in mixed radix
    /// `(122, 7, ..., 7, 7 | 2)`.
    ///
    /// The digits must hold exactly `resolution` valid groups.
    pub fn mixed_radix_value(&self, digits: &CellDigits) -> Result<u64, EncodeError> {
        if digits.digits.len() != self.resolution as usize {
            return Err(EncodeError::InvalidParameter(format!(
                "expected {} digit groups at resolution {}, got {}",
                self.resolution,
                self.resolution,
                digits.digits.len()
            )));
        }
        if let Some(defect) = digits.defect() {
            return Err(EncodeError::InvalidParameter(format!(
                "cell digits are not valid: {}",
                defect
            )));
        }

        let (coarse, finest) = digits.digits.split_at(self.resolution as usize - 1);
        let value = self
            .scramble
            .apply(coarse)
            .iter()
            .fold(digits.region as u64, |acc, &d| acc * 7 + d as u64);
        let finest = finest[0] as u64;
        Ok(match self.finest_level {
            FinestLevel::Septenary => value * 7 + finest,
            FinestLevel::Binary => value * 2 + (finest & 1),
        })
    }

    /// Encodes a cell id.
    pub fn encode(&self, cell: HierarchicalCellId) -> Result<EncodedIndex, EncodeError> {
        self.encode_framed(cell).map(|(index, _)| index)
    }

    /// Encodes a cell id and returns the frame split off along the way, for
    /// a later [`partial_decode`](Self::partial_decode).
    pub fn encode_framed(
        &self,
        cell: HierarchicalCellId,
    ) -> Result<(EncodedIndex, CellFrame), EncodeError> {
        let (digits, frame) = split_cell(cell, self.resolution)?;
        if let Some(defect) = digits.defect() {
            return Err(EncodeError::InvalidCellIdentifier {
                cell: cell.to_string(),
                defect,
            });
        }
        let index = EncodedIndex::from_value(self.mixed_radix_value(&digits)?, self.radix)?;
        Ok((index, frame))
    }

    /// Best-effort inverse of [`encode`](Self::encode), for diagnostics only.
    ///
    /// Under [`FinestLevel::Binary`] the finest digit is drawn uniformly from
    /// the digits whose low bit matches the encoded bit, so the result is
    /// non-deterministic unless `rng` is seeded; re-encoding it always gives
    /// back `index`. Under [`FinestLevel::Septenary`] the inverse is exact and
    /// `rng` is not used.
    pub fn partial_decode<R: Rng + ?Sized>(
        &self,
        index: &EncodedIndex,
        frame: &CellFrame,
        rng: &mut R,
    ) -> Result<HierarchicalCellId, EncodeError> {
        if index.radix() != self.radix {
            return Err(EncodeError::InvalidParameter(format!(
                "index radix {} does not match encoder radix {}",
                index.radix(),
                self.radix
            )));
        }

        let mut value = index.value();
        let finest = match self.finest_level {
            FinestLevel::Septenary => {
                let digit = (value % 7) as u8;
                value /= 7;
                digit
            }
            FinestLevel::Binary => {
                let bit = (value % 2) as u8;
                value /= 2;
                let candidates: Vec<u8> = (0..UNUSED_DIGIT).filter(|d| d & 1 == bit).collect();
                candidates[rng.gen_range(0..candidates.len())]
            }
        };

        let mut scrambled = vec![0u8; self.scramble.len()];
        for slot in scrambled.iter_mut().rev() {
            *slot = (value % 7) as u8;
            value /= 7;
        }
        if value > MAX_REGION as u64 {
            return Err(EncodeError::InvalidParameter(format!(
                "index {} decodes to region {} outside [0, {}]",
                index, value, MAX_REGION
            )));
        }

        let mut digits = self.scramble.invert(&scrambled);
        digits.push(finest);
        frame.join(&CellDigits {
            region: value as u8,
            digits,
        })
    }
}

/// An entry that keeps a scramble from being a permutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ScrambleFault {
    /// Index of the entry in the scramble list.
    pub index: usize,
    /// The entry itself.
    pub entry: usize,
    /// True when the entry is in range but already used.
    pub repeated: bool,
}

impl ScrambleFault {
    pub(crate) fn describe(&self, groups: usize) -> String {
        if self.repeated {
            format!("scramble entry {} appears twice", self.entry)
        } else {
            format!(
                "scramble entry {} is out of range for {} groups",
                self.entry, groups
            )
        }
    }
}

/// Every entry of `perm` that is out of range or repeats an earlier one.
pub(crate) fn scramble_faults(perm: &[usize]) -> Vec<ScrambleFault> {
    let mut seen = vec![false; perm.len()];
    perm.iter()
        .enumerate()
        .filter_map(|(index, &entry)| {
            let repeated = match seen.get_mut(entry) {
                Some(slot) => std::mem::replace(slot, true),
                None => false,
            };
            (entry >= perm.len() || repeated).then_some(ScrambleFault {
                index,
                entry,
                repeated,
            })
        })
        .collect()
}

fn check_resolution(resolution: u8) -> Result<(), EncodeError> {
    if resolution == 0 || resolution > MAX_RESOLUTION {
        return Err(EncodeError::InvalidParameter(format!(
            "resolution must be 1-{}, got {}",
            MAX_RESOLUTION, resolution
        )));
    }
    Ok(())
}

fn suffix_bits(resolution: u8) -> u32 {
    WORD_BITS - DIGITS_START - DIGIT_BITS * resolution as u32
}

/// Exclusive end bit of digit group `i`.
fn digit_end(i: usize) -> u32 {
    DIGITS_START + DIGIT_BITS * (i as u32 + 1)
}

fn mask(width: u32) -> u64 {
    if width >= WORD_BITS {
        u64::MAX
    } else {
        (1u64 << width) - 1
    }
}

fn field(raw: u64, start: u32, end: u32) -> u64 {
    if end <= start {
        return 0;
    }
    (raw >> (WORD_BITS - end)) & mask(end - start)
}

#[cfg(test)]
mod tests;
