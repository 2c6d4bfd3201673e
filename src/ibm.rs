//! IBM System/360 floating point and byte-order aware integer fields.
//!
//! IBM single precision floats are base-16, sign-magnitude:
//!
//! ```text
//! [S|EEEEEEE|FFFFFFFFFFFFFFFFFFFFFFFF]
//!  1    7              24 bits
//! ```
//!
//! value = (-1)^S * 0.F * 16^(E - 64)
//!
//! There are no NaN or infinity encodings, so every bit pattern decodes to
//! a finite value.

use crate::types::ByteOrder;

const FRACTION_SCALE: f64 = 16_777_216.0; // 16^6 = 2^24

/// Convert 4 big-endian IBM float bytes to an IEEE 754 `f32`.
///
/// The arithmetic is done in `f64` and narrowed on return.
pub fn ibm_to_ieee(bytes: [u8; 4]) -> f32 {
    if bytes == [0; 4] {
        return 0.0;
    }

    let sign = if bytes[0] >= 128 { -1.0 } else { 1.0 };
    let exponent = (bytes[0] & 0x7F) as i32 - 64;
    let fraction = ((bytes[1] as u32) << 16) | ((bytes[2] as u32) << 8) | (bytes[3] as u32);
    let mantissa = fraction as f64 / FRACTION_SCALE;

    (sign * 16f64.powi(exponent) * mantissa) as f32
}

/// Convert an IEEE 754 `f32` to 4 big-endian IBM float bytes.
///
/// The fraction is normalised so its leading hex digit is non-zero. NaN
/// encodes as zero and infinities saturate to the largest IBM magnitude.
pub fn ieee_to_ibm(value: f32) -> [u8; 4] {
    if value == 0.0 || value.is_nan() {
        return [0; 4];
    }
    let sign: u8 = if value.is_sign_negative() { 0x80 } else { 0 };
    if value.is_infinite() {
        return [sign | 0x7F, 0xFF, 0xFF, 0xFF];
    }

    // fraction * 16^exponent == |value|, 1/16 <= fraction < 1
    let mut fraction = (value as f64).abs();
    let mut exponent: i32 = 0;
    while fraction >= 1.0 {
        fraction /= 16.0;
        exponent += 1;
    }
    while fraction < 0.0625 {
        fraction *= 16.0;
        exponent -= 1;
    }

    let mut bits = (fraction * FRACTION_SCALE).round() as u32;
    if bits > 0x00FF_FFFF {
        // rounding carried into a new hex digit
        bits >>= 4;
        exponent += 1;
    }

    // Every finite f32 lies between 16^-38 and 16^32, well inside 16^-64..16^63.
    let biased = (exponent + 64) as u8;
    [
        sign | biased,
        (bits >> 16) as u8,
        (bits >> 8) as u8,
        bits as u8,
    ]
}

/// Read a 16-bit two's complement integer at `offset`.
pub fn read_i16(data: &[u8], offset: usize, byte_order: ByteOrder) -> i16 {
    let bytes = [data[offset], data[offset + 1]];
    match byte_order {
        ByteOrder::Big => i16::from_be_bytes(bytes),
        ByteOrder::Little => i16::from_le_bytes(bytes),
    }
}

/// Read a 16-bit unsigned integer at `offset`.
pub fn read_u16(data: &[u8], offset: usize, byte_order: ByteOrder) -> u16 {
    let bytes = [data[offset], data[offset + 1]];
    match byte_order {
        ByteOrder::Big => u16::from_be_bytes(bytes),
        ByteOrder::Little => u16::from_le_bytes(bytes),
    }
}

/// Read a 32-bit two's complement integer at `offset`.
pub fn read_i32(data: &[u8], offset: usize, byte_order: ByteOrder) -> i32 {
    let bytes = [
        data[offset],
        data[offset + 1],
        data[offset + 2],
        data[offset + 3],
    ];
    match byte_order {
        ByteOrder::Big => i32::from_be_bytes(bytes),
        ByteOrder::Little => i32::from_le_bytes(bytes),
    }
}
