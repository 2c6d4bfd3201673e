//! Streaming SEG-Y reader.
//!
//! [`SegyReader`] reads the file header once, then trace header + sample
//! array pairs until the stream ends, a trace limit is reached, or a
//! [`ReadingProgress`] sink asks to cancel. Each of the three stops returns
//! every trace decoded so far.
//!
//! End of input is tolerated at trace boundaries and inside traces:
//!
//! - fewer than 240 bytes left for a trace header ends the read cleanly;
//! - a sample array cut short keeps the samples that arrived and zero-fills
//!   the rest.
//!
//! For files too large to hold in memory, [`SegyReader::traces`] yields one
//! trace at a time.

use std::fs::File;
use std::io::{self, BufReader, Read, Seek, SeekFrom};
use std::path::Path;

use log::{debug, info, warn};

use crate::Result;
use crate::decode::decode_samples;
use crate::header::{
    BINARY_HEADER_LEN, TRACE_HEADER_LEN, decode_binary_header, decode_text_header,
    decode_trace_header,
};
use crate::options::DecodeOptions;
use crate::record::{FileHeader, SegyFile, Trace, TraceHeader};
use crate::types::{ByteOrder, SampleFormat};

/// Receives progress updates and may request cancellation.
///
/// Polled once before every trace; a read already in progress is never
/// interrupted.
pub trait ReadingProgress {
    /// Called with `100 * position / length` of the stream.
    fn report_progress(&mut self, percent: i32);

    /// `true` stops the read after the current report.
    fn cancellation_pending(&self) -> bool;
}

/// Something that can decode a whole SEG-Y stream.
///
/// [`SegyReader`] is the real implementation; consumers take this trait so
/// tests can substitute canned files.
pub trait SegyDecoder {
    /// Decode `source`, keeping at most `max_traces` traces.
    fn read_segy(&self, source: &mut dyn Read, max_traces: Option<usize>) -> Result<SegyFile>;
}

/// SEG-Y stream decoder configured by [`DecodeOptions`].
///
/// # Example
///
/// ```
/// use segy_rs::{DecodeOptions, SegyReader};
///
/// let reader = SegyReader::with_options(DecodeOptions::new().with_inline_byte_offset(9));
/// assert_eq!(reader.options().inline_byte_offset, 9);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SegyReader {
    options: DecodeOptions,
}

impl SegyReader {
    /// Create a reader with SEG-Y Rev 1 defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a reader with custom header options.
    pub fn with_options(options: DecodeOptions) -> Self {
        Self { options }
    }

    /// The options headers are decoded with.
    pub fn options(&self) -> &DecodeOptions {
        &self.options
    }

    /// Read and decode the textual header.
    pub fn read_text_header<R: Read>(&self, reader: &mut R) -> Result<String> {
        let mut bytes = vec![0u8; self.options.text_header_len()];
        let filled = read_full(reader, &mut bytes)?;
        Ok(decode_text_header(&bytes[..filled], &self.options))
    }

    /// Read and decode the 400-byte binary header. The result has no text.
    pub fn read_binary_header<R: Read>(&self, reader: &mut R) -> Result<FileHeader> {
        let mut bytes = [0u8; BINARY_HEADER_LEN];
        let filled = read_full(reader, &mut bytes)?;
        decode_binary_header(&bytes[..filled])
    }

    /// Read the text header followed by the binary header.
    ///
    /// # Errors
    ///
    /// `SegyError::HeaderTooShort` if the stream ends before the sample
    /// format code, `SegyError::UnsupportedFormat` for unknown codes.
    pub fn read_file_header<R: Read>(&self, reader: &mut R) -> Result<FileHeader> {
        let text = self.read_text_header(reader)?;
        let mut header = self.read_binary_header(reader)?;
        header.text = text;
        debug!("file header: {header}");
        Ok(header)
    }

    /// Read one 240-byte trace header.
    ///
    /// Returns `Ok(None)` when fewer than 240 bytes remain: the last trace
    /// boundary of a file coincides with the end of the stream.
    pub fn read_trace_header<R: Read>(
        &self,
        reader: &mut R,
        byte_order: ByteOrder,
    ) -> Result<Option<TraceHeader>> {
        let mut bytes = [0u8; TRACE_HEADER_LEN];
        let filled = read_full(reader, &mut bytes)?;
        if filled < TRACE_HEADER_LEN {
            if filled > 0 {
                warn!("ignoring partial trace header: {filled} of {TRACE_HEADER_LEN} bytes");
            }
            return Ok(None);
        }
        Ok(Some(decode_trace_header(&bytes, byte_order, &self.options)))
    }

    /// Read `sample_count` samples.
    ///
    /// `scratch` holds the raw bytes and is reused between calls; the
    /// returned values are always a fresh vector. If the stream ends early
    /// the missing samples are `0.0`.
    pub fn read_trace_values<R: Read>(
        &self,
        reader: &mut R,
        format: SampleFormat,
        byte_order: ByteOrder,
        sample_count: usize,
        scratch: &mut Vec<u8>,
    ) -> Result<Vec<f32>> {
        scratch.resize(sample_count * format.sample_size(), 0);
        let filled = read_full(reader, scratch)?;

        let mut values = vec![0.0f32; sample_count];
        let decoded = decode_samples(&scratch[..filled], format, byte_order, &mut values);
        if decoded < sample_count {
            warn!("trace truncated: {decoded} of {sample_count} samples, zero-filling the rest");
        }
        Ok(values)
    }

    /// Read one trace header and its samples.
    ///
    /// Returns `Ok(None)` at the end of the stream.
    pub fn read_trace<R: Read>(
        &self,
        reader: &mut R,
        file_header: &FileHeader,
        scratch: &mut Vec<u8>,
    ) -> Result<Option<Trace>> {
        let Some(header) = self.read_trace_header(reader, file_header.byte_order)? else {
            return Ok(None);
        };
        let sample_count = usize::try_from(header.sample_count).unwrap_or(0);
        let values = self.read_trace_values(
            reader,
            file_header.sample_format,
            file_header.byte_order,
            sample_count,
            scratch,
        )?;
        Ok(Some(Trace::new(header, values)))
    }

    /// Read the file header and return an iterator over the traces.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use std::fs::File;
    /// use std::io::BufReader;
    /// use segy_rs::SegyReader;
    ///
    /// let file = BufReader::new(File::open("line.sgy")?);
    /// let mut traces = SegyReader::new().traces(file)?;
    /// println!("{}", traces.header().text);
    /// for trace in &mut traces {
    ///     let trace = trace?;
    ///     println!("{trace}");
    /// }
    /// # Ok::<(), segy_rs::SegyError>(())
    /// ```
    pub fn traces<R: Read>(&self, reader: R) -> Result<TraceStream<R>> {
        let mut reader = CountingReader::new(reader, 0);
        let header = self.read_file_header(&mut reader)?;
        Ok(TraceStream::new(self.clone(), reader, header))
    }

    /// Read a whole stream.
    pub fn read<R: Read>(&self, reader: R) -> Result<SegyFile> {
        self.read_with_limit(reader, None)
    }

    /// Read at most `max_traces` traces (`None` reads to the end).
    pub fn read_with_limit<R: Read>(
        &self,
        reader: R,
        max_traces: Option<usize>,
    ) -> Result<SegyFile> {
        let stream = self.traces(reader)?;
        collect_traces(stream, max_traces, None)
    }

    /// Read like [`read_with_limit`](Self::read_with_limit), reporting
    /// progress before each trace and stopping early on cancellation.
    ///
    /// Progress is measured against the stream length, found by seeking to
    /// the end and back.
    pub fn read_with_progress<R: Read + Seek>(
        &self,
        mut reader: R,
        max_traces: Option<usize>,
        progress: &mut dyn ReadingProgress,
    ) -> Result<SegyFile> {
        let start = reader.stream_position()?;
        let length = reader.seek(SeekFrom::End(0))?;
        reader.seek(SeekFrom::Start(start))?;

        let mut counting = CountingReader::new(reader, start);
        let header = self.read_file_header(&mut counting)?;
        let stream = TraceStream::new(self.clone(), counting, header);
        collect_traces(stream, max_traces, Some((progress, length)))
    }

    /// Open and read a file.
    pub fn read_path<P: AsRef<Path>>(&self, path: P) -> Result<SegyFile> {
        let path = path.as_ref();
        debug!("reading {}", path.display());
        let file = File::open(path)?;
        self.read(BufReader::new(file))
    }
}

impl SegyDecoder for SegyReader {
    fn read_segy(&self, source: &mut dyn Read, max_traces: Option<usize>) -> Result<SegyFile> {
        self.read_with_limit(source, max_traces)
    }
}

/// Iterator over the traces of a SEG-Y stream, created by
/// [`SegyReader::traces`].
///
/// Iteration ends at the end of the stream or after the first error.
pub struct TraceStream<R> {
    segy: SegyReader,
    reader: CountingReader<R>,
    header: FileHeader,
    scratch: Vec<u8>,
    finished: bool,
}

impl<R: Read> TraceStream<R> {
    fn new(segy: SegyReader, reader: CountingReader<R>, header: FileHeader) -> Self {
        Self {
            segy,
            reader,
            header,
            scratch: Vec::new(),
            finished: false,
        }
    }

    /// The file header read when the stream was opened.
    pub fn header(&self) -> &FileHeader {
        &self.header
    }

    /// Bytes consumed from the underlying reader, including the file header.
    pub fn position(&self) -> u64 {
        self.reader.position
    }

    /// Drop the stream, keeping the file header.
    pub fn into_header(self) -> FileHeader {
        self.header
    }
}

impl<R: Read> Iterator for TraceStream<R> {
    type Item = Result<Trace>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self
            .segy
            .read_trace(&mut self.reader, &self.header, &mut self.scratch)
        {
            Ok(Some(trace)) => Some(Ok(trace)),
            Ok(None) => {
                self.finished = true;
                None
            }
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}

fn collect_traces<R: Read>(
    mut stream: TraceStream<R>,
    max_traces: Option<usize>,
    mut progress: Option<(&mut dyn ReadingProgress, u64)>,
) -> Result<SegyFile> {
    let mut traces = Vec::new();
    while max_traces.is_none_or(|max| traces.len() < max) {
        if let Some((sink, length)) = progress.as_mut() {
            sink.report_progress(percent(stream.position(), *length));
            if sink.cancellation_pending() {
                info!("read cancelled after {} traces", traces.len());
                break;
            }
        }
        match stream.next() {
            Some(trace) => traces.push(trace?),
            None => break,
        }
    }

    info!(
        "decoded {} traces ({} bytes)",
        traces.len(),
        stream.position()
    );
    Ok(SegyFile {
        header: stream.into_header(),
        traces,
    })
}

fn percent(position: u64, length: u64) -> i32 {
    if length == 0 {
        return 100;
    }
    (position.saturating_mul(100) / length).min(100) as i32
}

/// Fill `buf` as far as the stream allows, returning the bytes read.
///
/// Unlike `read_exact`, running out of input is not an error.
fn read_full<R: Read + ?Sized>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

/// Tracks the absolute stream position for progress reports.
struct CountingReader<R> {
    inner: R,
    position: u64,
}

impl<R> CountingReader<R> {
    fn new(inner: R, position: u64) -> Self {
        Self { inner, position }
    }
}

impl<R: Read> Read for CountingReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.position += n as u64;
        Ok(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SegyError;
    use crate::ebcdic;
    use crate::ibm::ieee_to_ibm;
    use std::io::Cursor;

    const TEXT: &str = "C 1 CLIENT: TEST SURVEY";

    fn file_header_bytes(format_code: i16, byte_order: ByteOrder) -> Vec<u8> {
        let mut text = TEXT.to_string();
        text.push_str(&" ".repeat(3200 - TEXT.len()));
        let mut bytes = ebcdic::encode(&text).unwrap();

        let mut binary = [0u8; BINARY_HEADER_LEN];
        let code = match byte_order {
            ByteOrder::Big => format_code.to_be_bytes(),
            ByteOrder::Little => format_code.to_le_bytes(),
        };
        binary[24..26].copy_from_slice(&code);
        bytes.extend_from_slice(&binary);
        bytes
    }

    fn trace_bytes(format: SampleFormat, inline: i32, values: &[f32]) -> Vec<u8> {
        let mut header = [0u8; TRACE_HEADER_LEN];
        header[114..116].copy_from_slice(&(values.len() as u16).to_be_bytes());
        header[188..192].copy_from_slice(&inline.to_be_bytes());
        header[192..196].copy_from_slice(&(inline * 10).to_be_bytes());

        let mut bytes = header.to_vec();
        for &v in values {
            match format {
                SampleFormat::IbmFloat4 => bytes.extend_from_slice(&ieee_to_ibm(v)),
                SampleFormat::IeeeFloat4 => bytes.extend_from_slice(&v.to_be_bytes()),
                SampleFormat::Int4 => bytes.extend_from_slice(&(v as i32).to_be_bytes()),
                SampleFormat::Int2 => bytes.extend_from_slice(&(v as i16).to_be_bytes()),
                SampleFormat::Int1 => bytes.push(v as i8 as u8),
            }
        }
        bytes
    }

    fn build_segy(format: SampleFormat, traces: &[Vec<f32>]) -> Vec<u8> {
        let mut bytes = file_header_bytes(format.to_code(), ByteOrder::Big);
        for (i, values) in traces.iter().enumerate() {
            bytes.extend(trace_bytes(format, i as i32 + 1, values));
        }
        bytes
    }

    struct CancelAt {
        threshold: i32,
        reports: Vec<i32>,
        cancelled: bool,
    }

    impl CancelAt {
        fn new(threshold: i32) -> Self {
            Self {
                threshold,
                reports: Vec::new(),
                cancelled: false,
            }
        }
    }

    impl ReadingProgress for CancelAt {
        fn report_progress(&mut self, percent: i32) {
            self.reports.push(percent);
            if percent >= self.threshold {
                self.cancelled = true;
            }
        }

        fn cancellation_pending(&self) -> bool {
            self.cancelled
        }
    }

    #[test]
    fn test_read_file_header() {
        let bytes = file_header_bytes(1, ByteOrder::Big);
        let mut cursor = Cursor::new(&bytes);
        let header = SegyReader::new().read_file_header(&mut cursor).unwrap();

        assert!(header.text.starts_with(TEXT));
        assert_eq!(header.text.lines().count(), 40);
        assert_eq!(header.sample_format, SampleFormat::IbmFloat4);
        assert_eq!(cursor.position(), 3600);
    }

    #[test]
    fn test_binary_header_consumes_400_bytes() {
        let mut bytes = vec![0u8; 800];
        bytes[25] = 5;
        let mut cursor = Cursor::new(&bytes);
        SegyReader::new().read_binary_header(&mut cursor).unwrap();
        assert_eq!(cursor.position(), 400);
    }

    #[test]
    fn test_trace_header_consumes_240_bytes() {
        let bytes = vec![0u8; 480];
        let mut cursor = Cursor::new(&bytes);
        let header = SegyReader::new()
            .read_trace_header(&mut cursor, ByteOrder::Big)
            .unwrap();
        assert!(header.is_some());
        assert_eq!(cursor.position(), 240);
    }

    #[test]
    fn test_trace_values_consume_all_bytes() {
        let bytes = vec![0u8; 1600];
        let mut cursor = Cursor::new(&bytes);
        let mut scratch = Vec::new();
        let values = SegyReader::new()
            .read_trace_values(
                &mut cursor,
                SampleFormat::IeeeFloat4,
                ByteOrder::Big,
                200,
                &mut scratch,
            )
            .unwrap();
        assert_eq!(values.len(), 200);
        assert_eq!(cursor.position(), 800);
    }

    #[test]
    fn test_truncated_values_are_zero_filled() {
        let mut cursor = Cursor::new(vec![1u8, 0, 2, 0]);
        let mut scratch = Vec::new();
        let values = SegyReader::new()
            .read_trace_values(
                &mut cursor,
                SampleFormat::Int2,
                ByteOrder::Little,
                3,
                &mut scratch,
            )
            .unwrap();
        assert_eq!(values, vec![1.0, 2.0, 0.0]);
    }

    #[test]
    fn test_scratch_buffer_is_reused_not_aliased() {
        let reader = SegyReader::new();
        let mut scratch = Vec::new();
        let mut cursor = Cursor::new(vec![1u8, 2, 3, 4, 5]);

        let first = reader
            .read_trace_values(&mut cursor, SampleFormat::Int1, ByteOrder::Big, 4, &mut scratch)
            .unwrap();
        // stale bytes from the first read must not leak into the second
        let second = reader
            .read_trace_values(&mut cursor, SampleFormat::Int1, ByteOrder::Big, 3, &mut scratch)
            .unwrap();
        assert_eq!(first, vec![1.0, 2.0, 3.0, 4.0]);
        assert_eq!(second, vec![5.0, 0.0, 0.0]);
    }

    #[test]
    fn test_read_trace_header_and_values() {
        let bytes = trace_bytes(SampleFormat::IeeeFloat4, 3, &[11.0, 111.0]);
        let header = SegyReader::new()
            .read_file_header(&mut Cursor::new(file_header_bytes(5, ByteOrder::Big)))
            .unwrap();

        let mut scratch = Vec::new();
        let trace = SegyReader::new()
            .read_trace(&mut Cursor::new(bytes), &header, &mut scratch)
            .unwrap()
            .unwrap();
        assert_eq!(trace.header.sample_count, 2);
        assert_eq!(trace.header.inline_number, 3);
        assert_eq!(trace.header.crossline_number, 30);
        assert_eq!(trace.values, vec![11.0, 111.0]);
    }

    #[test]
    fn test_read_all_traces() {
        let traces: Vec<Vec<f32>> = (0..5).map(|i| vec![i as f32, -1.5, 0.25]).collect();
        let bytes = build_segy(SampleFormat::IbmFloat4, &traces);

        let file = SegyReader::new().read(Cursor::new(bytes)).unwrap();
        assert_eq!(file.header.sample_format, SampleFormat::IbmFloat4);
        assert_eq!(file.traces.len(), 5);
        for (i, trace) in file.traces.iter().enumerate() {
            assert_eq!(trace.header.inline_number, i as i32 + 1);
            assert_eq!(trace.values, traces[i]);
        }
    }

    #[test]
    fn test_trace_limit() {
        let traces = vec![vec![1.0, 2.0]; 10];
        let bytes = build_segy(SampleFormat::Int2, &traces);
        let reader = SegyReader::new();

        let file = reader
            .read_with_limit(Cursor::new(&bytes), Some(4))
            .unwrap();
        assert_eq!(file.traces.len(), 4);

        let file = reader
            .read_with_limit(Cursor::new(&bytes), Some(9999))
            .unwrap();
        assert_eq!(file.traces.len(), 10);

        let file = reader.read_with_limit(Cursor::new(&bytes), Some(0)).unwrap();
        assert!(file.traces.is_empty());
    }

    #[test]
    fn test_truncated_final_trace_is_kept() {
        let traces = vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]];
        let mut bytes = build_segy(SampleFormat::IeeeFloat4, &traces);
        // keep only 2 bytes of the last trace's samples
        bytes.truncate(bytes.len() - 12 + 2);

        let file = SegyReader::new().read(Cursor::new(bytes)).unwrap();
        assert_eq!(file.traces.len(), 2);
        assert_eq!(file.traces[0].values, vec![1.0, 2.0, 3.0]);
        assert_eq!(file.traces[1].header.sample_count, 3);
        assert_eq!(file.traces[1].values, vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_partial_trace_header_ends_read() {
        let traces = vec![vec![7.0]; 3];
        let mut bytes = build_segy(SampleFormat::Int4, &traces);
        bytes.extend_from_slice(&[0u8; 100]);

        let file = SegyReader::new().read(Cursor::new(bytes)).unwrap();
        assert_eq!(file.traces.len(), 3);
    }

    #[test]
    fn test_header_only_file_has_no_traces() {
        let bytes = file_header_bytes(8, ByteOrder::Big);
        let file = SegyReader::new().read(Cursor::new(bytes)).unwrap();
        assert_eq!(file.header.sample_format, SampleFormat::Int1);
        assert!(file.traces.is_empty());
    }

    #[test]
    fn test_unsupported_format_fails_whole_read() {
        let mut bytes = file_header_bytes(4, ByteOrder::Big);
        bytes.extend(trace_bytes(SampleFormat::Int4, 1, &[1.0]));
        let err = SegyReader::new().read(Cursor::new(bytes)).unwrap_err();
        assert!(matches!(err, SegyError::UnsupportedFormat(4)));
    }

    #[test]
    fn test_stream_ending_in_text_header() {
        let bytes = ebcdic::encode("C 1 SHORT").unwrap();
        let err = SegyReader::new().read(Cursor::new(bytes)).unwrap_err();
        assert!(matches!(err, SegyError::HeaderTooShort { .. }));
    }

    #[test]
    fn test_trace_stream_iterates_lazily() {
        let traces = vec![vec![1.0], vec![2.0], vec![3.0]];
        let bytes = build_segy(SampleFormat::Int1, &traces);

        let mut stream = SegyReader::new().traces(Cursor::new(bytes)).unwrap();
        assert_eq!(stream.position(), 3600);
        let first = stream.next().unwrap().unwrap();
        assert_eq!(first.values, vec![1.0]);
        assert_eq!(stream.position(), 3600 + 241);

        let rest = stream.by_ref().collect::<Result<Vec<Trace>>>().unwrap();
        assert_eq!(rest.len(), 2);
        assert!(stream.next().is_none());
    }

    #[test]
    fn test_progress_and_cancellation() {
        // 3600 header bytes + 100 traces of 240 + 40 * 4 bytes
        let traces = vec![vec![0.5f32; 40]; 100];
        let bytes = build_segy(SampleFormat::IeeeFloat4, &traces);
        let mut sink = CancelAt::new(30);

        let file = SegyReader::new()
            .read_with_progress(Cursor::new(bytes), None, &mut sink)
            .unwrap();

        assert!(sink.reports.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(sink.reports.last(), Some(&30));
        // 100 * (3600 + 400 * 24) / 43600 is the first report to reach 30
        assert_eq!(file.traces.len(), 24);
    }

    #[test]
    fn test_progress_reaches_end_without_cancel() {
        let traces = vec![vec![1.0f32; 8]; 4];
        let bytes = build_segy(SampleFormat::Int2, &traces);
        let mut sink = CancelAt::new(i32::MAX);

        let file = SegyReader::new()
            .read_with_progress(Cursor::new(bytes), None, &mut sink)
            .unwrap();
        assert_eq!(file.traces.len(), 4);
        // one report per trace plus the one that finds the end
        assert_eq!(sink.reports.len(), 5);
        assert_eq!(sink.reports.last(), Some(&100));
    }

    #[test]
    fn test_percent() {
        assert_eq!(percent(0, 200), 0);
        assert_eq!(percent(59, 200), 29);
        assert_eq!(percent(200, 200), 100);
        assert_eq!(percent(5, 0), 100);
    }

    #[test]
    fn test_segy_decoder_trait() {
        let bytes = build_segy(SampleFormat::Int4, &[vec![1.0], vec![2.0]]);
        let decoder: &dyn SegyDecoder = &SegyReader::new();
        let file = decoder
            .read_segy(&mut Cursor::new(bytes), Some(1))
            .unwrap();
        assert_eq!(file.traces.len(), 1);
    }
}
