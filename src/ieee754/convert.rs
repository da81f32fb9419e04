//! Integer/float conversions performed on raw encodings.

/// Sign bit of a binary64 encoding.
pub const SIGN_BIT: u64 = 1 << 63;

/// Encoding of `2^52`: its mantissa holds integers below `2^32` exactly.
const TWO_POW_52_BITS: u64 = 0x4330_0000_0000_0000;
/// Encoding of `2^84`: its mantissa holds `k * 2^32` for `k < 2^32` exactly.
const TWO_POW_84_BITS: u64 = 0x4530_0000_0000_0000;

/// Converts `value` to the nearest `f64` without a native `u64` conversion.
///
/// The low and high 32-bit halves are OR'ed into the mantissas of `2^52` and
/// `2^84`; subtracting those constants leaves both halves as exact doubles, and
/// the final addition performs the single rounding step. The result equals
/// `value as f64` for every input.
pub fn u64_to_f64_split(value: u64) -> f64 {
    let two_pow_52 = f64::from_bits(TWO_POW_52_BITS);
    let two_pow_84 = f64::from_bits(TWO_POW_84_BITS);
    let low = f64::from_bits(TWO_POW_52_BITS | (value & 0xffff_ffff)) - two_pow_52;
    let high = f64::from_bits(TWO_POW_84_BITS | (value >> 32)) - two_pow_84;
    high + low
}
