//! Decoding options.
//!
//! [`DecodeOptions`] defaults follow SEG-Y Rev 1: an 80 × 40 EBCDIC text
//! header and 3-D inline/crossline numbers at trace header bytes 189 and 193.

/// Options controlling how headers are interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Decode the text header as EBCDIC unless it starts with an ASCII `'C'`.
    pub is_ebcdic: bool,
    /// Characters per text header line (80 in Rev 1).
    pub text_header_columns: usize,
    /// Lines in the text header (40 in Rev 1).
    pub text_header_rows: usize,
    /// Insert a `'\n'` after every `text_header_columns` characters.
    pub insert_newlines: bool,
    /// 1-based trace header byte of the 32-bit inline number.
    pub inline_byte_offset: usize,
    /// 1-based trace header byte of the 32-bit crossline number.
    pub crossline_byte_offset: usize,
}

impl DecodeOptions {
    /// Create options with SEG-Y Rev 1 defaults.
    pub fn new() -> Self {
        Self {
            is_ebcdic: true,
            text_header_columns: 80,
            text_header_rows: 40,
            insert_newlines: true,
            inline_byte_offset: 189,
            crossline_byte_offset: 193,
        }
    }

    /// Choose between EBCDIC and ASCII text headers.
    pub fn with_ebcdic(mut self, is_ebcdic: bool) -> Self {
        self.is_ebcdic = is_ebcdic;
        self
    }

    /// Set the text header shape in characters.
    pub fn with_text_header_size(mut self, columns: usize, rows: usize) -> Self {
        self.text_header_columns = columns;
        self.text_header_rows = rows;
        self
    }

    /// Turn line breaking of the text header on or off.
    pub fn with_newlines(mut self, insert_newlines: bool) -> Self {
        self.insert_newlines = insert_newlines;
        self
    }

    /// Set the 1-based inline number location.
    pub fn with_inline_byte_offset(mut self, offset: usize) -> Self {
        self.inline_byte_offset = offset;
        self
    }

    /// Set the 1-based crossline number location.
    pub fn with_crossline_byte_offset(mut self, offset: usize) -> Self {
        self.crossline_byte_offset = offset;
        self
    }

    /// Number of bytes occupied by the text header.
    pub fn text_header_len(&self) -> usize {
        self.text_header_columns * self.text_header_rows
    }
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self::new()
    }
}
