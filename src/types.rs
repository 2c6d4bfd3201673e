//! Shared types: [`ByteOrder`], [`SampleFormat`], and [`MeasurementSystem`].

use std::fmt;

use crate::{Result, SegyError};

/// Byte order of the multi-byte fields in a SEG-Y file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ByteOrder {
    #[default]
    Big,
    Little,
}

/// Data sample format, from the binary file header (bytes 3225-3226).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleFormat {
    /// 4-byte IBM System/360 floating point (code 1).
    IbmFloat4,
    /// 4-byte two's complement integer (code 2).
    Int4,
    /// 2-byte two's complement integer (code 3).
    Int2,
    /// 4-byte IEEE 754 floating point (code 5).
    IeeeFloat4,
    /// 1-byte two's complement integer (code 8).
    Int1,
}

impl SampleFormat {
    /// Convert a raw format code to a `SampleFormat`.
    pub fn from_code(code: i16) -> Result<Self> {
        match code {
            1 => Ok(Self::IbmFloat4),
            2 => Ok(Self::Int4),
            3 => Ok(Self::Int2),
            5 => Ok(Self::IeeeFloat4),
            8 => Ok(Self::Int1),
            _ => Err(SegyError::UnsupportedFormat(code)),
        }
    }

    /// Convert to the raw format code.
    pub fn to_code(self) -> i16 {
        match self {
            Self::IbmFloat4 => 1,
            Self::Int4 => 2,
            Self::Int2 => 3,
            Self::IeeeFloat4 => 5,
            Self::Int1 => 8,
        }
    }

    /// Size of one sample in bytes.
    pub fn sample_size(self) -> usize {
        match self {
            Self::IbmFloat4 | Self::Int4 | Self::IeeeFloat4 => 4,
            Self::Int2 => 2,
            Self::Int1 => 1,
        }
    }
}

impl fmt::Display for SampleFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IbmFloat4 => write!(f, "IBM FLOAT32"),
            Self::Int4 => write!(f, "INT32"),
            Self::Int2 => write!(f, "INT16"),
            Self::IeeeFloat4 => write!(f, "IEEE FLOAT32"),
            Self::Int1 => write!(f, "INT8"),
        }
    }
}

/// Unit of the measurement system (binary header bytes 3255-3256).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MeasurementSystem {
    #[default]
    Meters,
    Feet,
}

impl MeasurementSystem {
    /// `2` means feet; every other code, including the unset `0`, is meters.
    pub fn from_code(code: i16) -> Self {
        match code {
            2 => Self::Feet,
            _ => Self::Meters,
        }
    }
}

impl fmt::Display for MeasurementSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Meters => write!(f, "meters"),
            Self::Feet => write!(f, "feet"),
        }
    }
}
