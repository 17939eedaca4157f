//! Context-sensitive external scanner for the YSH grammar.
//!
//! The grammar handles context-free syntax. This crate handles the tokens
//! whose shape depends on state the grammar cannot express:
//!
//! - here-document bodies ([`heredoc`])
//! - double-quoted and triple-quoted string interiors ([`content`])
//! - regex literal interiors ([`content`])
//!
//! A host parser drives a [`Scanner`] through the
//! [`Lexer`](ysh_lexer_core::Lexer) cursor trait, passing the set of token
//! kinds the grammar accepts at each position, and checkpoints the scanner
//! state through [`Scanner::serialize`] / [`Scanner::deserialize`].

pub mod codec;
pub mod config;
pub mod content;
pub mod heredoc;
pub mod kind;
mod scanner;
pub mod state;

pub use codec::SERIALIZATION_BUFFER_SIZE;
pub use config::{ConfigError, ScannerConfig};
pub use kind::{KindSet, TokenKind, UnknownTokenKind};
pub use scanner::Scanner;
pub use state::{Delimiter, ScannerState, DELIMITER_CAPACITY};

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Safe to call multiple times. Only installs a subscriber when `RUST_LOG`
/// is set, e.g. `RUST_LOG=ysh_scanner=trace`.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        // Only initialize if RUST_LOG is set
        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}
