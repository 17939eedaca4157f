//! Byte codec for [`ScannerState`] checkpoints.
//!
//! # Layout
//!
//! ```text
//! offset  size  field
//! 0       1     heredoc_active          (0 = false, else true)
//! 1       1     strip_leading_tabs
//! 2       2     delimiter_length        (big-endian, bytes written below)
//! 4       n     delimiter bytes         (UTF-8)
//! 4+n     1     paren_depth
//! 5+n     1     brace_depth
//! 6+n     1     bracket_depth
//! 7+n     1     in_double_quote
//! 8+n     1     in_single_quote
//! 9+n     1     in_command_sub
//! ```
//!
//! Encoding never writes past the caller's buffer and decoding never reads
//! past the supplied slice. A short buffer is not an error in either
//! direction: encode truncates, decode leaves missing fields at default.

use crate::state::{Delimiter, ScannerState};

/// Checkpoint buffer size a tree-sitter host hands to the scanner.
pub const SERIALIZATION_BUFFER_SIZE: usize = 1024;

/// Bytes before the delimiter: two flags and the length field.
const HEADER_LEN: usize = 4;

/// Bytes after the delimiter: three depths and three flags.
const TRAILER_LEN: usize = 6;

/// Encode `state` into `buf`, returning the number of bytes written.
///
/// The delimiter is shortened (at a character boundary) when the buffer is
/// too small to hold it together with the trailer, and the length field
/// records what was actually written.
pub fn encode(state: &ScannerState, buf: &mut [u8]) -> usize {
    let room = buf.len().saturating_sub(HEADER_LEN + TRAILER_LEN);
    let delimiter = fit_delimiter(&state.delimiter, room);

    let mut out = Writer::new(buf);
    out.put_bool(state.heredoc_active);
    out.put_bool(state.strip_leading_tabs);
    // fit_delimiter keeps n <= DELIMITER_CAPACITY < u16::MAX
    out.put_u16_be(u16::try_from(delimiter.len()).unwrap_or(u16::MAX));
    out.put_bytes(delimiter);
    out.put_u8(state.paren_depth);
    out.put_u8(state.brace_depth);
    out.put_u8(state.bracket_depth);
    out.put_bool(state.in_double_quote);
    out.put_bool(state.in_single_quote);
    out.put_bool(state.in_command_sub);
    out.written()
}

/// Decode a state from `buf`.
///
/// An empty slice yields the default state. Fields past the end of a short
/// slice keep their defaults.
pub fn decode(buf: &[u8]) -> ScannerState {
    let mut state = ScannerState::default();
    let mut input = Reader::new(buf);

    if let Some(v) = input.take_bool() {
        state.heredoc_active = v;
    }
    if let Some(v) = input.take_bool() {
        state.strip_leading_tabs = v;
    }
    let len = input.take_u16_be().map_or(0, usize::from);
    state.delimiter = Delimiter::from_utf8_prefix(input.take_bytes(len));
    if let Some(v) = input.take_u8() {
        state.paren_depth = v;
    }
    if let Some(v) = input.take_u8() {
        state.brace_depth = v;
    }
    if let Some(v) = input.take_u8() {
        state.bracket_depth = v;
    }
    if let Some(v) = input.take_bool() {
        state.in_double_quote = v;
    }
    if let Some(v) = input.take_bool() {
        state.in_single_quote = v;
    }
    if let Some(v) = input.take_bool() {
        state.in_command_sub = v;
    }

    state.normalize();
    state
}

/// Longest prefix of `delimiter` that fits in `room` bytes without
/// splitting a character.
fn fit_delimiter(delimiter: &Delimiter, room: usize) -> &[u8] {
    let text = delimiter.as_str();
    let mut n = text.len().min(room);
    while !text.is_char_boundary(n) {
        n -= 1;
    }
    &text.as_bytes()[..n]
}

/// Bounds-checked cursor over the output buffer. Writes past the end are
/// dropped.
struct Writer<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl<'a> Writer<'a> {
    fn new(buf: &'a mut [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    fn put_u8(&mut self, byte: u8) {
        if let Some(slot) = self.buf.get_mut(self.pos) {
            *slot = byte;
            self.pos += 1;
        }
    }

    fn put_bool(&mut self, value: bool) {
        self.put_u8(u8::from(value));
    }

    fn put_u16_be(&mut self, value: u16) {
        for byte in value.to_be_bytes() {
            self.put_u8(byte);
        }
    }

    fn put_bytes(&mut self, bytes: &[u8]) {
        let n = bytes.len().min(self.buf.len() - self.pos);
        self.buf[self.pos..self.pos + n].copy_from_slice(&bytes[..n]);
        self.pos += n;
    }

    fn written(&self) -> usize {
        self.pos
    }
}

/// Bounds-checked cursor over the input slice.
struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    fn take_u8(&mut self) -> Option<u8> {
        let byte = self.buf.get(self.pos).copied()?;
        self.pos += 1;
        Some(byte)
    }

    fn take_bool(&mut self) -> Option<bool> {
        self.take_u8().map(|b| b != 0)
    }

    /// Both bytes or nothing. A lone trailing byte is consumed so it is
    /// never misread as a later field.
    fn take_u16_be(&mut self) -> Option<u16> {
        let Some(bytes) = self.buf.get(self.pos..self.pos + 2) else {
            self.pos = self.buf.len();
            return None;
        };
        self.pos += 2;
        Some(u16::from_be_bytes([bytes[0], bytes[1]]))
    }

    /// Up to `len` bytes; fewer when the slice ends first.
    fn take_bytes(&mut self, len: usize) -> &'a [u8] {
        let end = (self.pos + len).min(self.buf.len());
        let bytes = &self.buf[self.pos..end];
        self.pos = end;
        bytes
    }
}
