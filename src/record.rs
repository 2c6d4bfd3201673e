//! Decoded SEG-Y structures.
//!
//! A [`SegyFile`] holds one [`FileHeader`] and the [`Trace`]s in on-disk
//! order. Record order matters: inline/crossline grids are rebuilt from it.

use std::collections::HashSet;
use std::fmt;

use chrono::NaiveDateTime;

use crate::types::{ByteOrder, MeasurementSystem, SampleFormat};

/// Text and binary file header, read once per file.
#[derive(Debug, Clone, PartialEq)]
pub struct FileHeader {
    /// Decoded textual header, line-wrapped per the decode options.
    pub text: String,
    pub sample_format: SampleFormat,
    /// Inferred from the layout of the sample format code.
    pub byte_order: ByteOrder,
    pub measurement_system: MeasurementSystem,

    // --- Informational binary header fields ---
    /// Sample interval in microseconds (bytes 3217-3218).
    pub sample_interval_us: u16,
    /// Samples per trace as declared by the file (bytes 3221-3222).
    pub samples_per_trace: u16,
    /// Raw SEG-Y revision number (bytes 3501-3502), e.g. `0x0100` for Rev 1.
    pub revision: u16,
}

impl FileHeader {
    /// `true` for files written least-significant byte first.
    pub fn is_little_endian(&self) -> bool {
        self.byte_order == ByteOrder::Little
    }
}

impl fmt::Display for FileHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} samples | {} us | {} | {:?} endian | {}",
            self.samples_per_trace,
            self.sample_interval_us,
            self.sample_format,
            self.byte_order,
            self.measurement_system,
        )
    }
}

/// Header fields of one trace (240-byte record).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TraceHeader {
    pub sample_count: i32,
    /// Mirrors the crossline number, the "trace" of 2-D load sheets.
    pub trace_number: i32,
    pub inline_number: i32,
    pub crossline_number: i32,
    /// CDP X, scaled by `coordinate_scalar`.
    pub x: f64,
    /// CDP Y, scaled by `coordinate_scalar`.
    pub y: f64,
    /// Recording time, when the year/day/time fields form a valid date.
    pub timestamp: Option<NaiveDateTime>,
    pub sample_interval_us: u16,
    pub coordinate_scalar: i16,
}

/// One trace: its header and `sample_count` amplitude values.
#[derive(Debug, Clone, PartialEq)]
pub struct Trace {
    pub header: TraceHeader,
    pub values: Vec<f32>,
}

impl Trace {
    /// Pair a header with its decoded samples.
    pub fn new(header: TraceHeader, values: Vec<f32>) -> Self {
        Self { header, values }
    }
}

impl fmt::Display for Trace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "inline {} | crossline {} | ({}, {}) | {} samples",
            self.header.inline_number,
            self.header.crossline_number,
            self.header.x,
            self.header.y,
            self.values.len(),
        )
    }
}

/// A decoded SEG-Y file.
#[derive(Debug, Clone, PartialEq)]
pub struct SegyFile {
    pub header: FileHeader,
    pub traces: Vec<Trace>,
}

impl SegyFile {
    /// Distinct inline numbers in first-seen order.
    pub fn inline_numbers(&self) -> Vec<i32> {
        let mut seen = HashSet::new();
        self.traces
            .iter()
            .map(|trace| trace.header.inline_number)
            .filter(|&inline| seen.insert(inline))
            .collect()
    }
}

impl fmt::Display for SegyFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} | {} traces", self.header, self.traces.len())
    }
}
