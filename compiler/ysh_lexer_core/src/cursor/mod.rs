//! In-memory host cursor over a `&str`.
//!
//! Reproduces the token-span bookkeeping a tree-sitter host performs for an
//! external scanner: uncaptured advances before the first capture move the
//! token start, [`mark_end`](Lexer::mark_end) pins the token end, and
//! [`finish_token`](TextCursor::finish_token) repositions the cursor at that
//! end so the next scan resumes there.
//!
//! # End-of-input
//!
//! `lookahead()` returns `'\0'` both at the end of the text and on an
//! interior NUL. Only `pos == text.len()` counts as end-of-input. The cursor
//! never indexes past the text: every read goes through `str::chars`.

use crate::{Lexer, Span};

/// In-memory [`Lexer`] implementation.
///
/// The cursor is [`Copy`], so a host can snapshot it before a speculative
/// scan and restore it after a decline.
#[derive(Clone, Copy, Debug)]
pub struct TextCursor<'a> {
    text: &'a str,
    /// Byte offset of `lookahead`.
    pos: usize,
    /// Byte offset where the current token starts.
    token_start: usize,
    /// Whether any character of the current token was captured.
    captured: bool,
    /// Byte offset pinned by `mark_end`.
    marked_end: Option<usize>,
}

impl<'a> TextCursor<'a> {
    /// Create a cursor at byte 0 with an empty pending token.
    pub fn new(text: &'a str) -> Self {
        Self::at(text, 0)
    }

    /// Create a cursor at `pos`, clamped to the text and moved back to the
    /// nearest character boundary.
    pub fn at(text: &'a str, pos: usize) -> Self {
        let mut pos = pos.min(text.len());
        while !text.is_char_boundary(pos) {
            pos -= 1;
        }
        Self {
            text,
            pos,
            token_start: pos,
            captured: false,
            marked_end: None,
        }
    }

    /// Current byte offset.
    #[inline]
    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn text(&self) -> &'a str {
        self.text
    }

    /// Discard the pending token and start a new one at the current position.
    pub fn begin_token(&mut self) {
        self.token_start = self.pos;
        self.captured = false;
        self.marked_end = None;
    }

    /// Span of the pending token.
    ///
    /// The end is the marked end, or the current position when unmarked.
    /// A mark that precedes the token start (possible when the scanner
    /// marks, then skips) yields an empty span at the token start.
    pub fn token_span(&self) -> Span {
        let end = self.marked_end.unwrap_or(self.pos).max(self.token_start);
        Span::new(self.token_start, end)
    }

    /// Close the pending token and resume at its end.
    ///
    /// This is what a host does after the scanner claims a token: the
    /// characters read past the marked end were lookahead and get re-read by
    /// the next scan.
    pub fn finish_token(&mut self) -> Span {
        let span = self.token_span();
        self.pos = span.end;
        self.begin_token();
        span
    }

    /// Text covered by `span`.
    ///
    /// Returns `""` for a span that is out of range or not on character
    /// boundaries.
    pub fn slice(&self, span: Span) -> &'a str {
        self.text.get(span.start..span.end).unwrap_or("")
    }

    /// Text from the current position to the end.
    pub fn rest(&self) -> &'a str {
        &self.text[self.pos..]
    }
}

impl Lexer for TextCursor<'_> {
    #[inline]
    fn lookahead(&self) -> char {
        self.rest().chars().next().unwrap_or('\0')
    }

    fn advance(&mut self, capture: bool) {
        let Some(c) = self.rest().chars().next() else {
            return;
        };
        self.pos += c.len_utf8();
        if capture {
            self.captured = true;
        } else if !self.captured {
            self.token_start = self.pos;
        }
    }

    fn mark_end(&mut self) {
        self.marked_end = Some(self.pos);
    }

    /// Counts code points back to the previous `\n`, located with a
    /// reverse `memchr` search. Saturates at `u32::MAX`.
    fn column(&self) -> u32 {
        let before = &self.text.as_bytes()[..self.pos];
        let line_start = memchr::memrchr(b'\n', before).map_or(0, |nl| nl + 1);
        let count = self.text[line_start..self.pos].chars().count();
        u32::try_from(count).unwrap_or(u32::MAX)
    }

    #[inline]
    fn is_eof(&self) -> bool {
        self.pos >= self.text.len()
    }
}
