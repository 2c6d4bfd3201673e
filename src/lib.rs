//! Pure Rust SEG-Y decoder.
//!
//! Reads the 3200-byte textual header, the 400-byte binary header and the
//! trace header + sample array pairs of a SEG-Y stream. Samples in IBM
//! System/360 float, IEEE float or 8/16/32-bit integers are widened to
//! `f32`; EBCDIC text is decoded through IBM code page 037. Byte order is
//! inferred from the binary header.
//!
//! # Decoding IBM floats and EBCDIC
//!
//! ```
//! use segy_rs::{ebcdic, ibm};
//!
//! assert_eq!(ibm::ibm_to_ieee([0x41, 0x10, 0x00, 0x00]), 1.0);
//! assert_eq!(ibm::ibm_to_ieee([0xC1, 0x10, 0x00, 0x00]), -1.0);
//! assert_eq!(ebcdic::decode(&[0xC3, 0x40, 0xF1]), "C 1");
//! ```
//!
//! # Reading a stream
//!
//! ```
//! use std::io::Cursor;
//! use segy_rs::{SampleFormat, SegyReader};
//!
//! // Text header of EBCDIC spaces, binary header with format code 5
//! let mut bytes = vec![0x40u8; 3200];
//! let mut binary = [0u8; 400];
//! binary[25] = 5;
//! bytes.extend_from_slice(&binary);
//!
//! // One trace of two big-endian IEEE samples
//! let mut trace_header = [0u8; 240];
//! trace_header[115] = 2;
//! bytes.extend_from_slice(&trace_header);
//! bytes.extend_from_slice(&1.5f32.to_be_bytes());
//! bytes.extend_from_slice(&(-2.0f32).to_be_bytes());
//!
//! let file = SegyReader::new().read(Cursor::new(bytes))?;
//! assert_eq!(file.header.sample_format, SampleFormat::IeeeFloat4);
//! assert_eq!(file.traces.len(), 1);
//! assert_eq!(file.traces[0].values, vec![1.5, -2.0]);
//! # Ok::<(), segy_rs::SegyError>(())
//! ```
//!
//! # Progress and cancellation
//!
//! ```
//! use std::io::Cursor;
//! use segy_rs::{ReadingProgress, SegyReader};
//!
//! struct Log(Vec<i32>);
//!
//! impl ReadingProgress for Log {
//!     fn report_progress(&mut self, percent: i32) {
//!         self.0.push(percent);
//!     }
//!     fn cancellation_pending(&self) -> bool {
//!         false
//!     }
//! }
//!
//! let mut bytes = vec![0x40u8; 3200];
//! let mut binary = [0u8; 400];
//! binary[25] = 8;
//! bytes.extend_from_slice(&binary);
//!
//! let mut log = Log(Vec::new());
//! let file = SegyReader::new().read_with_progress(Cursor::new(bytes), None, &mut log)?;
//! assert!(file.traces.is_empty());
//! assert_eq!(log.0, vec![100]);
//! # Ok::<(), segy_rs::SegyError>(())
//! ```

pub mod decode;
pub mod ebcdic;
pub mod error;
pub mod header;
pub mod ibm;
pub mod options;
pub mod reader;
pub mod record;
pub mod render;
pub mod types;

pub use error::{Result, SegyError};
pub use options::DecodeOptions;
pub use reader::{ReadingProgress, SegyDecoder, SegyReader, TraceStream};
pub use record::{FileHeader, SegyFile, Trace, TraceHeader};
pub use render::{Raster, RenderOptions, SampleRange, render, render_file, render_inlines};
pub use types::{ByteOrder, MeasurementSystem, SampleFormat};

pub use decode::decode_samples;
pub use ibm::ibm_to_ieee;
