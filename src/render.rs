//! Greyscale rasters of trace amplitudes.
//!
//! One column per trace, one row per sample. Amplitudes are scaled linearly
//! from the smallest to the largest value in the traces being drawn.

use std::borrow::Borrow;
use std::collections::BTreeMap;

use log::debug;

use crate::record::{SegyFile, Trace};

/// Smallest and largest amplitude over a set of traces.
///
/// Held in `f64` so `delta` stays finite for any pair of `f32` values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleRange {
    pub min: f64,
    pub max: f64,
    pub delta: f64,
}

impl SampleRange {
    /// `None` if the traces hold no samples. NaN values are skipped.
    pub fn from_traces<T: Borrow<Trace>>(traces: &[T]) -> Option<Self> {
        let mut min = f64::MAX;
        let mut max = f64::MIN;
        let mut seen = false;
        for &value in traces.iter().flat_map(|t| &t.borrow().values) {
            let value = f64::from(value);
            if value < min {
                min = value;
            }
            if value > max {
                max = value;
            }
            seen |= !value.is_nan();
        }
        seen.then_some(Self {
            min,
            max,
            delta: max - min,
        })
    }
}

/// How amplitudes are turned into pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Draw samples that are exactly `0.0` fully transparent.
    pub null_transparent: bool,
}

impl RenderOptions {
    /// Create options with null samples drawn transparent.
    pub fn new() -> Self {
        Self {
            null_transparent: true,
        }
    }

    /// Choose whether exact `0.0` samples are transparent.
    pub fn with_null_transparent(mut self, null_transparent: bool) -> Self {
        self.null_transparent = null_transparent;
        self
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// RGBA pixels in row-major order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<[u8; 4]>,
}

impl Raster {
    /// A raster of transparent black pixels.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![[0; 4]; width * height],
        }
    }

    /// Pixel at column `x`, row `y`.
    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get(y * self.width + x).copied()
    }

    /// Flatten to `width * height * 4` bytes.
    pub fn to_rgba_bytes(&self) -> Vec<u8> {
        self.pixels.iter().flatten().copied().collect()
    }
}

/// Draw `traces` as one raster.
///
/// The height is the sample count of the first trace. Shorter traces are
/// padded with `0.0`, longer ones cut. With no traces the result is a single
/// transparent pixel; when every sample has the same value nothing is drawn.
/// Accepts owned traces or references, so groups can borrow from a file.
///
/// ```
/// use segy_rs::{RenderOptions, Trace, TraceHeader, render};
///
/// let traces = vec![
///     Trace::new(TraceHeader::default(), vec![-1.0, 1.0]),
///     Trace::new(TraceHeader::default(), vec![0.5, 0.0]),
/// ];
/// let raster = render(&traces, &RenderOptions::default());
/// assert_eq!((raster.width, raster.height), (2, 2));
/// assert_eq!(raster.pixel(0, 1), Some([255, 255, 255, 255]));
/// assert_eq!(raster.pixel(1, 1).map(|p| p[3]), Some(0));
/// ```
pub fn render<T: Borrow<Trace>>(traces: &[T], options: &RenderOptions) -> Raster {
    let Some(first) = traces.first() else {
        return Raster::new(1, 1);
    };
    let width = traces.len();
    let height = first.borrow().values.len();
    let mut raster = Raster::new(width, height);

    let Some(range) = SampleRange::from_traces(traces) else {
        return raster;
    };
    if range.delta == 0.0 || !range.delta.is_finite() {
        debug!("flat sample range {range:?}, leaving raster blank");
        return raster;
    }

    for (x, trace) in traces.iter().enumerate() {
        let values = &trace.borrow().values;
        for y in 0..height {
            let value = values.get(y).copied().unwrap_or(0.0);
            raster.pixels[y * width + x] = shade(value, &range, options);
        }
    }
    raster
}

/// Draw a whole file.
pub fn render_file(file: &SegyFile, options: &RenderOptions) -> Raster {
    render(&file.traces, options)
}

/// One raster per inline number, each drawn from that inline's traces in
/// record order and scaled to its own range.
pub fn render_inlines(traces: &[Trace], options: &RenderOptions) -> BTreeMap<i32, Raster> {
    let mut groups: BTreeMap<i32, Vec<&Trace>> = BTreeMap::new();
    for trace in traces {
        groups
            .entry(trace.header.inline_number)
            .or_default()
            .push(trace);
    }
    groups
        .into_iter()
        .map(|(inline, group)| (inline, render(&group, options)))
        .collect()
}

fn shade(value: f32, range: &SampleRange, options: &RenderOptions) -> [u8; 4] {
    let alpha = if options.null_transparent && value == 0.0 {
        0
    } else {
        u8::MAX
    };
    let grey = (255.0 * (f64::from(value) - range.min) / range.delta).clamp(0.0, 255.0) as u8;
    [grey, grey, grey, alpha]
}
