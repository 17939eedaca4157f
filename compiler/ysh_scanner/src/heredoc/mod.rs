//! Here-document engine.
//!
//! ```text
//! IDLE --start--> BODY --body chunks--> BODY --end--> IDLE
//! ```
//!
//! The grammar consumes `<<`; [`scan_start`] reads the delimiter word that
//! follows and opens the heredoc. While it is open the dispatcher routes
//! every call to [`scan_body`], which emits the body line-by-line until a
//! line consists solely of the delimiter.

use tracing::debug;
use ysh_lexer_core::Lexer;

use crate::kind::TokenKind;
use crate::state::{Delimiter, ScannerState};

/// Read a heredoc delimiter and open the heredoc.
///
/// Accepted forms, after an optional `-` (strip leading tabs) and
/// horizontal whitespace:
/// - `'word'` / `"word"`: taken verbatim up to the matching quote, no
///   unescaping
/// - `\word`: the backslash is dropped
/// - `word`: ASCII letters, digits, underscore
///
/// Declines when no delimiter character was read, including `''`. A
/// decline leaves `state` untouched.
pub fn scan_start<L: Lexer + ?Sized>(
    state: &mut ScannerState,
    lexer: &mut L,
    max_len: usize,
) -> bool {
    let strip_leading_tabs = lexer.lookahead() == '-';
    if strip_leading_tabs {
        lexer.consume();
    }
    while is_space(lexer.lookahead()) {
        lexer.skip();
    }

    let mut staged = Staged::new(max_len);
    match lexer.lookahead() {
        quote @ ('\'' | '"') => {
            lexer.consume();
            while !lexer.is_eof() && lexer.lookahead() != quote {
                staged.push(lexer.lookahead());
                lexer.consume();
            }
            if !lexer.is_eof() {
                lexer.consume();
            }
        }
        '\\' => {
            lexer.consume();
            eat_word(lexer, &mut staged);
        }
        _ => eat_word(lexer, &mut staged),
    }

    let delimiter = staged.delimiter;
    if delimiter.is_empty() {
        return false;
    }
    debug!(
        delimiter = delimiter.as_str(),
        strip_leading_tabs, "heredoc opened"
    );
    state.open_heredoc(delimiter, strip_leading_tabs);
    true
}

/// Scan heredoc body text, or the closing delimiter line.
///
/// Every physical line start marks the token end before the line is
/// compared against the delimiter. On a full match followed by a line
/// terminator or end-of-input:
/// - with body text pending, that text is emitted as
///   [`HeredocBody`](TokenKind::HeredocBody) and the match is left for the
///   next call, which sees it at column 0;
/// - otherwise the delimiter line is emitted as
///   [`HeredocEnd`](TokenKind::HeredocEnd) and the heredoc closes.
///
/// Everything else, partial matches and line terminators included, is body
/// text. At end-of-input pending text is emitted; an unterminated heredoc
/// stays open.
pub fn scan_body<L: Lexer + ?Sized>(state: &mut ScannerState, lexer: &mut L) -> Option<TokenKind> {
    if !state.heredoc_active {
        return None;
    }

    let mut has_content = false;
    loop {
        if lexer.column() == 0 {
            lexer.mark_end();
            if state.strip_leading_tabs {
                while lexer.lookahead() == '\t' {
                    lexer.skip();
                }
            }
            match match_delimiter(lexer, &state.delimiter) {
                LineMatch::Delimiter if has_content => return Some(TokenKind::HeredocBody),
                LineMatch::Delimiter => {
                    lexer.mark_end();
                    state.close_heredoc();
                    debug!(delimiter = state.delimiter.as_str(), "heredoc closed");
                    return Some(TokenKind::HeredocEnd);
                }
                LineMatch::Partial => has_content = true,
                LineMatch::None => {}
            }
        }

        if lexer.is_eof() {
            break;
        }
        let c = lexer.lookahead();
        lexer.consume();
        if c == '\r' && lexer.lookahead() == '\n' {
            lexer.consume();
        }
        has_content = true;
    }

    lexer.mark_end();
    has_content.then_some(TokenKind::HeredocBody)
}

/// Outcome of comparing one line against the delimiter.
enum LineMatch {
    /// The whole delimiter, followed by a line terminator or end-of-input.
    Delimiter,
    /// Some delimiter characters were consumed but the line is not the
    /// terminator.
    Partial,
    /// Nothing consumed.
    None,
}

fn match_delimiter<L: Lexer + ?Sized>(lexer: &mut L, delimiter: &Delimiter) -> LineMatch {
    let mut consumed = false;
    for expected in delimiter.chars() {
        if lexer.is_eof() || lexer.lookahead() != expected {
            return if consumed {
                LineMatch::Partial
            } else {
                LineMatch::None
            };
        }
        lexer.consume();
        consumed = true;
    }
    if lexer.is_eof() || is_newline(lexer.lookahead()) {
        LineMatch::Delimiter
    } else if consumed {
        LineMatch::Partial
    } else {
        LineMatch::None
    }
}

/// Delimiter being read by [`scan_start`].
///
/// The first character that does not fit ends storage; the rest of the word
/// is still consumed by the caller but not kept, so the stored text is
/// always a prefix of the word.
struct Staged {
    delimiter: Delimiter,
    max_len: usize,
    full: bool,
}

impl Staged {
    fn new(max_len: usize) -> Self {
        Self {
            delimiter: Delimiter::new(),
            max_len,
            full: false,
        }
    }

    fn push(&mut self, c: char) {
        if !self.full {
            self.full = !self.delimiter.push(c, self.max_len);
        }
    }
}

fn eat_word<L: Lexer + ?Sized>(lexer: &mut L, staged: &mut Staged) {
    while is_word_char(lexer.lookahead()) {
        staged.push(lexer.lookahead());
        lexer.consume();
    }
}

#[inline]
pub(crate) fn is_space(c: char) -> bool {
    c == ' ' || c == '\t'
}

#[inline]
fn is_newline(c: char) -> bool {
    c == '\n' || c == '\r'
}

#[inline]
fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

#[cfg(test)]
mod tests;
