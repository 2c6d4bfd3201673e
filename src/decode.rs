//! Decode raw trace sample arrays.
//!
//! Every supported [`SampleFormat`] is widened to `f32`. The IBM float
//! bytes of a little-endian file are stored byte-swapped, so they are put
//! back in big-endian order before conversion.

use crate::ibm::{ibm_to_ieee, read_i16, read_i32};
use crate::types::{ByteOrder, SampleFormat};

/// Decode whole samples from `raw` into `values`.
///
/// Decoding stops at whichever runs out first, whole samples in `raw` or
/// slots in `values`; a trailing partial sample is ignored. Slots past the
/// decoded ones are not touched. Returns the number of samples decoded.
pub fn decode_samples(
    raw: &[u8],
    format: SampleFormat,
    byte_order: ByteOrder,
    values: &mut [f32],
) -> usize {
    let chunks = raw.chunks_exact(format.sample_size());
    let mut decoded = 0;
    for (slot, chunk) in values.iter_mut().zip(chunks) {
        *slot = decode_sample(chunk, format, byte_order);
        decoded += 1;
    }
    decoded
}

fn decode_sample(bytes: &[u8], format: SampleFormat, byte_order: ByteOrder) -> f32 {
    match format {
        SampleFormat::IbmFloat4 => decode_ibm(bytes, byte_order),
        SampleFormat::IeeeFloat4 => decode_ieee(bytes, byte_order),
        SampleFormat::Int4 => read_i32(bytes, 0, byte_order) as f32,
        SampleFormat::Int2 => read_i16(bytes, 0, byte_order) as f32,
        SampleFormat::Int1 => bytes[0] as i8 as f32,
    }
}

fn decode_ibm(bytes: &[u8], byte_order: ByteOrder) -> f32 {
    let word = [bytes[0], bytes[1], bytes[2], bytes[3]];
    match byte_order {
        ByteOrder::Big => ibm_to_ieee(word),
        ByteOrder::Little => ibm_to_ieee([word[3], word[2], word[1], word[0]]),
    }
}

fn decode_ieee(bytes: &[u8], byte_order: ByteOrder) -> f32 {
    let word = [bytes[0], bytes[1], bytes[2], bytes[3]];
    match byte_order {
        ByteOrder::Big => f32::from_be_bytes(word),
        ByteOrder::Little => f32::from_le_bytes(word),
    }
}
