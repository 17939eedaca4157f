//! Accumulate-until-boundary scanning for string and regex interiors.
//!
//! Quoted strings, both triple-quoted variants, and regex literals share one
//! loop: consume characters until a boundary, treating escapes and character
//! classes as opaque runs. What differs between them is captured by a
//! [`ContentRule`] strategy value.
//!
//! Every routine emits only non-empty content. A boundary at position zero
//! is a decline so the grammar can tokenize the boundary itself.

use ysh_lexer_core::Lexer;

use crate::kind::TokenKind;

/// What ends a content token.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Boundary {
    /// A single unescaped character (`"` for strings, `/` for regexes).
    Char(char),
    /// Three consecutive copies of the quote character. Shorter runs are
    /// content.
    Fence(char),
}

/// How a backslash is treated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EscapePolicy {
    /// `\` consumes itself plus exactly one following character (or only
    /// itself at end-of-input), both as content.
    Backslash,
    /// `\` is an ordinary character.
    Literal,
}

/// Strategy for one content-token flavor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ContentRule {
    /// Kind reported when the rule claims input.
    pub kind: TokenKind,
    pub boundary: Boundary,
    pub escapes: EscapePolicy,
    /// Unescaped `$` or `` ` `` ends the token before it.
    pub interpolation: bool,
    /// Unescaped `\n` ends the token before it.
    pub single_line: bool,
    /// `[` opens a character class scanned through its `]`, suspending
    /// the other boundaries.
    pub char_classes: bool,
}

impl ContentRule {
    /// Double-quoted string interior.
    pub const QUOTED: ContentRule = ContentRule {
        kind: TokenKind::StringContent,
        boundary: Boundary::Char('"'),
        escapes: EscapePolicy::Backslash,
        interpolation: true,
        single_line: false,
        char_classes: false,
    };

    /// `"""` string interior: escapes and interpolation like [`QUOTED`](Self::QUOTED).
    pub const MULTILINE_DOUBLE: ContentRule = ContentRule {
        kind: TokenKind::MultilineStringContent,
        boundary: Boundary::Fence('"'),
        escapes: EscapePolicy::Backslash,
        interpolation: true,
        single_line: false,
        char_classes: false,
    };

    /// `'''` string interior: fully literal.
    pub const MULTILINE_SINGLE: ContentRule = ContentRule {
        kind: TokenKind::MultilineStringContent,
        boundary: Boundary::Fence('\''),
        escapes: EscapePolicy::Literal,
        interpolation: false,
        single_line: false,
        char_classes: false,
    };

    /// Regex literal interior between `/` delimiters.
    pub const REGEX: ContentRule = ContentRule {
        kind: TokenKind::RegexContent,
        boundary: Boundary::Char('/'),
        escapes: EscapePolicy::Backslash,
        interpolation: false,
        single_line: true,
        char_classes: true,
    };

    /// Multiline rule for the quote character under the cursor, if any.
    pub fn multiline(quote: char) -> Option<ContentRule> {
        match quote {
            '"' => Some(Self::MULTILINE_DOUBLE),
            '\'' => Some(Self::MULTILINE_SINGLE),
            _ => None,
        }
    }
}

/// Scan content under `rule`. Returns `true` when a non-empty token was
/// produced; the token end is marked on the lexer.
pub fn scan_content<L: Lexer + ?Sized>(lexer: &mut L, rule: &ContentRule) -> bool {
    let mut has_content = false;

    while !lexer.is_eof() {
        let c = lexer.lookahead();

        match rule.boundary {
            Boundary::Char(delim) if c == delim => break,
            Boundary::Fence(quote) if c == quote => {
                // The fence is excluded from the token: pin the end before
                // looking at the run.
                lexer.mark_end();
                if eat_run(lexer, quote, 3) == 3 {
                    return has_content;
                }
                has_content = true;
                continue;
            }
            _ => {}
        }

        if rule.interpolation && is_interpolation_trigger(c) {
            break;
        }
        if rule.single_line && c == '\n' {
            break;
        }

        if c == '\\' && rule.escapes == EscapePolicy::Backslash {
            eat_escape(lexer);
        } else if c == '[' && rule.char_classes {
            eat_char_class(lexer);
        } else {
            lexer.consume();
        }
        has_content = true;
    }

    lexer.mark_end();
    has_content
}

/// `$` starts a variable or `$(...)` substitution; a backtick starts a
/// legacy command substitution.
#[inline]
fn is_interpolation_trigger(c: char) -> bool {
    c == '$' || c == '`'
}

/// Consume up to `max` consecutive `c`, returning how many were consumed.
fn eat_run<L: Lexer + ?Sized>(lexer: &mut L, c: char, max: usize) -> usize {
    let mut n = 0;
    while n < max && !lexer.is_eof() && lexer.lookahead() == c {
        lexer.consume();
        n += 1;
    }
    n
}

/// Consume `\` and the character it escapes, if any.
fn eat_escape<L: Lexer + ?Sized>(lexer: &mut L) {
    lexer.consume();
    if !lexer.is_eof() {
        lexer.consume();
    }
}

/// Consume `[`, the class body, and the closing `]` if present.
///
/// Escapes inside the class are honored, so `[\]]` is one class. Reaching
/// end-of-input before `]` stops quietly; the grammar reports it.
fn eat_char_class<L: Lexer + ?Sized>(lexer: &mut L) {
    lexer.consume();
    while !lexer.is_eof() && lexer.lookahead() != ']' {
        if lexer.lookahead() == '\\' {
            eat_escape(lexer);
        } else {
            lexer.consume();
        }
    }
    if !lexer.is_eof() {
        lexer.consume();
    }
}
