//! Radix conversion utilities.
//!
//! Digit counts are computed with integer division only. The logarithmic
//! shortcut `floor(log(n) / log(radix)) + 1` is undefined at `n = 0` and
//! drifts for large `n` once floating point rounding kicks in.

use crate::error::NumeralError;

/// Number of base-`radix` digits needed to write `n` (at least 1).
///
/// # Examples
/// ```
/// use what3chords_core::numeral::digit_count;
///
/// assert_eq!(digit_count(0, 10).unwrap(), 1);
/// assert_eq!(digit_count(999, 10).unwrap(), 3);
/// assert_eq!(digit_count(2041, 2041).unwrap(), 2);
/// ```
pub fn digit_count(n: u64, radix: u32) -> Result<usize, NumeralError> {
    check_radix(radix)?;
    let radix = radix as u64;
    let mut count = 1;
    let mut rest = n / radix;
    while rest > 0 {
        count += 1;
        rest /= radix;
    }
    Ok(count)
}

/// Writes `n` in base `radix`, most significant digit first.
///
/// Without `digit_count` the result has exactly as many digits as `n` needs
/// (a single `0` for `n = 0`). With `digit_count` the result is left-padded
/// with zeros to that length; a value needing more digits is an error, never
/// truncated.
///
/// # Examples
/// ```
/// use what3chords_core::numeral::to_base;
///
/// assert_eq!(to_base(0, 2041, None).unwrap(), vec![0]);
/// assert_eq!(to_base(2041, 2041, None).unwrap(), vec![1, 0]);
/// assert_eq!(to_base(5, 2, Some(4)).unwrap(), vec![0, 1, 0, 1]);
/// ```
pub fn to_base(n: u64, radix: u32, digit_count: Option<usize>) -> Result<Vec<u32>, NumeralError> {
    let required = self::digit_count(n, radix)?;
    let width = match digit_count {
        Some(count) if count < required => {
            return Err(NumeralError::TooManyDigits {
                value: n,
                radix,
                digit_count: count,
                required,
            });
        }
        Some(count) => count,
        None => required,
    };

    let mut digits = vec![0u32; width];
    let mut rest = n;
    for slot in digits.iter_mut().rev() {
        if rest == 0 {
            break;
        }
        *slot = (rest % radix as u64) as u32;
        rest /= radix as u64;
    }
    Ok(digits)
}

/// Reads a most-significant-first digit sequence in base `radix`.
///
/// The exact inverse of [`to_base`]. An empty sequence reads as 0.
pub fn from_base(digits: &[u32], radix: u32) -> Result<u64, NumeralError> {
    check_radix(radix)?;
    digits
        .iter()
        .enumerate()
        .try_fold(0u64, |acc, (position, &digit)| {
            if digit >= radix {
                return Err(NumeralError::DigitOutOfRange {
                    digit,
                    position,
                    radix,
                });
            }
            acc.checked_mul(radix as u64)
                .and_then(|v| v.checked_add(digit as u64))
                .ok_or(NumeralError::Overflow(radix))
        })
}

/// `radix^exp`, or `None` on 64-bit overflow.
pub fn checked_pow(radix: u32, exp: u32) -> Option<u64> {
    (radix as u64).checked_pow(exp)
}

fn check_radix(radix: u32) -> Result<(), NumeralError> {
    if radix < 2 {
        return Err(NumeralError::InvalidRadix(radix));
    }
    Ok(())
}
