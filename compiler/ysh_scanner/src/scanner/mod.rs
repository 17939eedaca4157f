//! Scanner session and dispatch.
//!
//! # Dispatch order
//!
//! 1. Open heredoc and body accepted: body scan, no whitespace skipping,
//!    error recovery or not.
//! 2. Error recovery (the sentinel kind is accepted) with
//!    [`ScannerConfig::decline_in_error_recovery`] set: decline.
//! 3. Skip horizontal whitespace, then try heredoc start, quoted content,
//!    multiline content (only with a quote under the cursor), regex content.
//!
//! The first sub-scanner that claims input wins. A sub-scanner that
//! declines without moving the cursor hands over to the next candidate;
//! one that moved before declining ends the call, because the host only
//! rewinds between calls.

use tracing::{debug, trace};
use ysh_lexer_core::Lexer;

use crate::codec::{self, SERIALIZATION_BUFFER_SIZE};
use crate::config::ScannerConfig;
use crate::content::{scan_content, ContentRule};
use crate::heredoc;
use crate::kind::{KindSet, TokenKind};
use crate::state::ScannerState;

/// External scanner for one parse session.
///
/// Construct one per session (or per speculative branch); restore it from a
/// checkpoint with [`deserialize`](Self::deserialize) before resuming.
#[derive(Clone, Debug, Default)]
pub struct Scanner {
    state: ScannerState,
    config: ScannerConfig,
}

/// Outcome of one sub-scanner attempt.
enum Attempt {
    Claimed(TokenKind),
    /// Declined with the cursor where it started; the next candidate may run.
    Passed,
    /// Declined after consuming input; dispatch stops.
    Spent,
}

impl Scanner {
    /// Scanner with a zeroed state and default config.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ScannerConfig) -> Self {
        Self {
            state: ScannerState::default(),
            config,
        }
    }

    pub fn state(&self) -> &ScannerState {
        &self.state
    }

    pub fn config(&self) -> &ScannerConfig {
        &self.config
    }

    /// Whether a heredoc body is open.
    pub fn in_heredoc(&self) -> bool {
        self.state.heredoc_active
    }

    /// Try to produce one external token at the cursor.
    ///
    /// Returns the claimed kind with the token end marked on `lexer`, or
    /// `None` so the grammar falls back to its own rules here.
    pub fn scan<L: Lexer + ?Sized>(&mut self, lexer: &mut L, accepted: KindSet) -> Option<TokenKind> {
        trace!(?accepted, lookahead = ?lexer.lookahead(), "scan");

        if self.state.heredoc_active && accepted.accepts(TokenKind::HeredocBody) {
            let kind = heredoc::scan_body(&mut self.state, lexer);
            trace!(?kind, "heredoc body");
            return kind;
        }

        if accepted.is_error_recovery() && self.config.decline_in_error_recovery() {
            trace!("error recovery, declining");
            return None;
        }

        if !accepted.intersects(KindSet::SCANNABLE) {
            return None;
        }

        while heredoc::is_space(lexer.lookahead()) {
            lexer.skip();
        }

        let result = self.dispatch(lexer, accepted);
        trace!(?result, "scan result");
        result
    }

    fn dispatch<L: Lexer + ?Sized>(&mut self, lexer: &mut L, accepted: KindSet) -> Option<TokenKind> {
        if accepted.accepts(TokenKind::HeredocStart) {
            let max_len = self.config.max_delimiter_len();
            let state = &mut self.state;
            match attempt(lexer, TokenKind::HeredocStart, |lexer| {
                heredoc::scan_start(state, lexer, max_len)
            }) {
                Attempt::Claimed(kind) => return Some(kind),
                Attempt::Spent => return None,
                Attempt::Passed => {}
            }
        }

        let quote = lexer.lookahead();
        let candidates = [
            Some(ContentRule::QUOTED),
            ContentRule::multiline(quote),
            Some(ContentRule::REGEX),
        ];
        for rule in candidates.into_iter().flatten() {
            if !accepted.accepts(rule.kind) {
                continue;
            }
            match attempt(lexer, rule.kind, |lexer| scan_content(lexer, &rule)) {
                Attempt::Claimed(kind) => return Some(kind),
                Attempt::Spent => return None,
                Attempt::Passed => {}
            }
        }
        None
    }

    /// Write the state checkpoint into `buf`, returning the bytes written.
    pub fn serialize(&self, buf: &mut [u8]) -> usize {
        codec::encode(&self.state, buf)
    }

    /// Replace the state with the one encoded in `buf`. An empty buffer
    /// resets to the initial state.
    pub fn deserialize(&mut self, buf: &[u8]) {
        self.state = codec::decode(buf);
        debug!(
            len = buf.len(),
            heredoc_active = self.state.heredoc_active,
            "scanner state restored"
        );
    }

    /// Owned checkpoint sized like a host serialization buffer.
    pub fn checkpoint(&self) -> Vec<u8> {
        let mut buf = vec![0; SERIALIZATION_BUFFER_SIZE];
        let len = self.serialize(&mut buf);
        buf.truncate(len);
        buf
    }

    /// Restore from a [`checkpoint`](Self::checkpoint).
    pub fn restore(&mut self, checkpoint: &[u8]) {
        self.deserialize(checkpoint);
    }
}

/// Run one sub-scanner through a [`Tracked`] lexer and classify the result.
fn attempt<L, F>(lexer: &mut L, kind: TokenKind, scan: F) -> Attempt
where
    L: Lexer + ?Sized,
    F: FnOnce(&mut Tracked<'_, L>) -> bool,
{
    let mut tracked = Tracked {
        inner: lexer,
        moved: false,
    };
    if scan(&mut tracked) {
        Attempt::Claimed(kind)
    } else if tracked.moved {
        trace!(%kind, "declined after consuming input");
        Attempt::Spent
    } else {
        Attempt::Passed
    }
}

/// Lexer wrapper that records whether the cursor moved.
struct Tracked<'a, L: ?Sized> {
    inner: &'a mut L,
    moved: bool,
}

impl<L: Lexer + ?Sized> Lexer for Tracked<'_, L> {
    fn lookahead(&self) -> char {
        self.inner.lookahead()
    }

    fn advance(&mut self, capture: bool) {
        if !self.inner.is_eof() {
            self.moved = true;
        }
        self.inner.advance(capture);
    }

    fn mark_end(&mut self) {
        self.inner.mark_end();
    }

    fn column(&self) -> u32 {
        self.inner.column()
    }

    fn is_eof(&self) -> bool {
        self.inner.is_eof()
    }
}
