//! The character-cursor contract between a host parser and the scanner.

/// Half-open byte range `[start, end)` into the source text.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub const fn len(self) -> usize {
        self.end - self.start
    }

    pub const fn is_empty(self) -> bool {
        self.start == self.end
    }
}

/// Cursor the host parser exposes to the scanner.
///
/// Mirrors the lexer handle a tree-sitter external scanner receives:
///
/// - Characters advanced with `capture = false` before the first captured
///   character are excluded from the token (they move the token start).
///   After the first capture every advanced character is part of the span.
/// - [`mark_end`](Lexer::mark_end) pins the token end. Characters advanced
///   after the mark are lookahead only; the host resumes at the mark.
///   Without a mark the token ends wherever the cursor stops.
/// - [`lookahead`](Lexer::lookahead) is `'\0'` at end-of-input. An interior
///   NUL also reads as `'\0'`; [`is_eof`](Lexer::is_eof) tells them apart.
pub trait Lexer {
    /// Current code point, `'\0'` at end-of-input.
    fn lookahead(&self) -> char;

    /// Move forward one code point. No-op at end-of-input.
    fn advance(&mut self, capture: bool);

    /// Pin the end of the token being produced at the current position.
    fn mark_end(&mut self);

    /// 0-based column of [`lookahead`](Lexer::lookahead), in code points.
    fn column(&self) -> u32;

    /// Returns `true` once every code point has been consumed.
    fn is_eof(&self) -> bool;

    /// Advance without capturing (whitespace skip).
    #[inline]
    fn skip(&mut self) {
        self.advance(false);
    }

    /// Advance and capture into the token.
    #[inline]
    fn consume(&mut self) {
        self.advance(true);
    }
}

impl<L: Lexer + ?Sized> Lexer for &mut L {
    fn lookahead(&self) -> char {
        (**self).lookahead()
    }

    fn advance(&mut self, capture: bool) {
        (**self).advance(capture);
    }

    fn mark_end(&mut self) {
        (**self).mark_end();
    }

    fn column(&self) -> u32 {
        (**self).column()
    }

    fn is_eof(&self) -> bool {
        (**self).is_eof()
    }
}
