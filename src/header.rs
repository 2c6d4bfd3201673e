//! Layout of the three SEG-Y header records.
//!
//! - Text header: `columns * rows` bytes (3200 by default), EBCDIC or ASCII.
//! - Binary header: 400 bytes; the sample format code at bytes 3225-3226
//!   also tells the byte order of the file.
//! - Trace header: 240 bytes before every sample array.
//!
//! Byte positions in comments and options are 1-based as in the SEG-Y
//! standard; indices in code are 0-based.

use chrono::{NaiveDate, NaiveDateTime};

use crate::ebcdic;
use crate::ibm::{read_i16, read_i32, read_u16};
use crate::options::DecodeOptions;
use crate::record::{FileHeader, TraceHeader};
use crate::types::{ByteOrder, MeasurementSystem, SampleFormat};
use crate::{Result, SegyError};

/// Size of the binary file header.
pub const BINARY_HEADER_LEN: usize = 400;
/// Size of every trace header.
pub const TRACE_HEADER_LEN: usize = 240;

// Binary header (0-based within the 400-byte record)
const SAMPLE_INTERVAL_INDEX: usize = 16;
const SAMPLES_PER_TRACE_INDEX: usize = 20;
const FORMAT_CODE_INDEX: usize = 24;
const MEASUREMENT_SYSTEM_INDEX: usize = 54;
const REVISION_INDEX: usize = 300;

// Trace header (0-based within the 240-byte record)
const COORDINATE_SCALAR_INDEX: usize = 70;
const SAMPLE_COUNT_INDEX: usize = 114;
const TRACE_SAMPLE_INTERVAL_INDEX: usize = 116;
const YEAR_INDEX: usize = 156;
const CDP_X_INDEX: usize = 180;
const CDP_Y_INDEX: usize = 184;

/// Decode the textual file header.
///
/// At most `options.text_header_len()` bytes are used. A header whose first
/// byte is an ASCII `'C'` (the card prefix of every line) has already been
/// converted from EBCDIC and is taken as-is.
pub fn decode_text_header(bytes: &[u8], options: &DecodeOptions) -> String {
    let bytes = &bytes[..bytes.len().min(options.text_header_len())];
    let is_ascii = bytes.first() == Some(&b'C') || !options.is_ebcdic;
    let text = if is_ascii {
        ebcdic::decode_latin1(bytes)
    } else {
        ebcdic::decode(bytes)
    };

    if options.insert_newlines {
        insert_newlines(&text, options.text_header_columns)
    } else {
        text
    }
}

/// Break `text` into lines of `columns` characters, each ending in `'\n'`.
fn insert_newlines(text: &str, columns: usize) -> String {
    if columns == 0 {
        return text.to_string();
    }
    let chars: Vec<char> = text.chars().collect();
    let mut result = String::with_capacity(text.len() + chars.len() / columns + 1);
    for line in chars.chunks(columns) {
        result.extend(line);
        result.push('\n');
    }
    result
}

/// Decode the 400-byte binary file header.
///
/// The returned header has an empty `text`. The sample format code is a
/// small positive integer that fits in one byte, so whichever byte of the
/// pair holds it reveals the byte order: `[0, code]` is big-endian,
/// `[code, 0]` little-endian.
///
/// # Errors
///
/// Returns `SegyError::HeaderTooShort` if `bytes` ends before the format
/// code and `SegyError::UnsupportedFormat` for unknown codes.
pub fn decode_binary_header(bytes: &[u8]) -> Result<FileHeader> {
    if bytes.len() < FORMAT_CODE_INDEX + 2 {
        return Err(SegyError::HeaderTooShort {
            expected: BINARY_HEADER_LEN,
            actual: bytes.len(),
        });
    }

    let byte_order = infer_byte_order(bytes[FORMAT_CODE_INDEX], bytes[FORMAT_CODE_INDEX + 1]);
    let format_code = read_i16(bytes, FORMAT_CODE_INDEX, byte_order);
    let sample_format = SampleFormat::from_code(format_code)?;

    Ok(FileHeader {
        text: String::new(),
        sample_format,
        byte_order,
        measurement_system: MeasurementSystem::from_code(field_i16(
            bytes,
            MEASUREMENT_SYSTEM_INDEX,
            byte_order,
        )),
        sample_interval_us: field_u16(bytes, SAMPLE_INTERVAL_INDEX, byte_order),
        samples_per_trace: field_u16(bytes, SAMPLES_PER_TRACE_INDEX, byte_order),
        revision: field_u16(bytes, REVISION_INDEX, byte_order),
    })
}

fn infer_byte_order(high: u8, low: u8) -> ByteOrder {
    if high == 0 || low != 0 {
        ByteOrder::Big
    } else {
        ByteOrder::Little
    }
}

/// Decode a 240-byte trace header.
///
/// Fields whose bytes lie beyond the end of `bytes` are left at zero, so a
/// header cut short at the end of a file still yields what it has.
pub fn decode_trace_header(
    bytes: &[u8],
    byte_order: ByteOrder,
    options: &DecodeOptions,
) -> TraceHeader {
    let crossline_number = field_i32_at_byte(bytes, options.crossline_byte_offset, byte_order);
    let coordinate_scalar = field_i16(bytes, COORDINATE_SCALAR_INDEX, byte_order);

    TraceHeader {
        sample_count: field_u16(bytes, SAMPLE_COUNT_INDEX, byte_order) as i32,
        trace_number: crossline_number,
        inline_number: field_i32_at_byte(bytes, options.inline_byte_offset, byte_order),
        crossline_number,
        x: scale_coordinate(field_i32(bytes, CDP_X_INDEX, byte_order), coordinate_scalar),
        y: scale_coordinate(field_i32(bytes, CDP_Y_INDEX, byte_order), coordinate_scalar),
        timestamp: decode_timestamp(bytes, byte_order),
        sample_interval_us: field_u16(bytes, TRACE_SAMPLE_INTERVAL_INDEX, byte_order),
        coordinate_scalar,
    }
}

/// Apply a SEG-Y coordinate scalar: positive multiplies, negative divides.
fn scale_coordinate(value: i32, scalar: i16) -> f64 {
    let value = value as f64;
    match scalar {
        0 => value,
        s if s > 0 => value * s as f64,
        s => value / (s as f64).abs(),
    }
}

/// Year, day of year, hour, minute, second: five 16-bit fields from byte 157.
fn decode_timestamp(bytes: &[u8], byte_order: ByteOrder) -> Option<NaiveDateTime> {
    if bytes.len() < YEAR_INDEX + 10 {
        return None;
    }
    let field = |i: usize| u32::try_from(read_i16(bytes, YEAR_INDEX + 2 * i, byte_order)).ok();

    let year = i32::try_from(field(0)?).ok()?;
    NaiveDate::from_yo_opt(year, field(1)?)?.and_hms_opt(field(2)?, field(3)?, field(4)?)
}

fn field_i16(bytes: &[u8], index: usize, byte_order: ByteOrder) -> i16 {
    if index + 2 <= bytes.len() {
        read_i16(bytes, index, byte_order)
    } else {
        0
    }
}

fn field_u16(bytes: &[u8], index: usize, byte_order: ByteOrder) -> u16 {
    if index + 2 <= bytes.len() {
        read_u16(bytes, index, byte_order)
    } else {
        0
    }
}

fn field_i32(bytes: &[u8], index: usize, byte_order: ByteOrder) -> i32 {
    if index + 4 <= bytes.len() {
        read_i32(bytes, index, byte_order)
    } else {
        0
    }
}

/// Like [`field_i32`] but addressed by a 1-based byte number.
fn field_i32_at_byte(bytes: &[u8], byte_number: usize, byte_order: ByteOrder) -> i32 {
    match byte_number.checked_sub(1) {
        Some(index) => field_i32(bytes, index, byte_order),
        None => 0,
    }
}
