//! Host cursor interface for the YSH external scanner.
//!
//! The scanner never owns the source text. A host parser positions a cursor
//! at a candidate token start and hands it to the scanner through the
//! [`Lexer`] trait. This crate defines that trait and ships an in-memory
//! implementation, [`TextCursor`], over a borrowed `&str`, so the scanner
//! can be driven by tests, fuzzers, and tooling without a real host.

mod cursor;
mod lexer;

pub use cursor::TextCursor;
pub use lexer::{Lexer, Span};
