//! External token kinds and the accepted-kinds set.
//!
//! The discriminants are the grammar's external-symbol indices, in the
//! order the grammar declares its `externals`. Reordering breaks every
//! compiled grammar that links this scanner.

use bitflags::bitflags;

/// Token kinds the scanner can report to the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TokenKind {
    /// Heredoc delimiter word after `<<` / `<<-`.
    HeredocStart = 0,
    /// A chunk of heredoc body text.
    HeredocBody = 1,
    /// The terminator line of a heredoc.
    HeredocEnd = 2,
    /// Double-quoted string interior up to an escape boundary.
    StringContent = 3,
    /// Triple-quoted string interior.
    MultilineStringContent = 4,
    /// Regex literal interior between `/` delimiters.
    RegexContent = 5,
    /// Declared for the grammar; recognized context-free, never produced here.
    CommandSubstitutionStart = 6,
    /// Declared for the grammar; recognized context-free, never produced here.
    BraceExpansion = 7,
    /// Never a real token. Its presence in the accepted set means the host
    /// is in error recovery and marked every kind valid.
    ErrorSentinel = 8,
}

impl TokenKind {
    /// Number of external kinds the grammar declares.
    pub const COUNT: usize = 9;

    /// Every kind, in symbol-index order.
    pub const ALL: [TokenKind; Self::COUNT] = [
        TokenKind::HeredocStart,
        TokenKind::HeredocBody,
        TokenKind::HeredocEnd,
        TokenKind::StringContent,
        TokenKind::MultilineStringContent,
        TokenKind::RegexContent,
        TokenKind::CommandSubstitutionStart,
        TokenKind::BraceExpansion,
        TokenKind::ErrorSentinel,
    ];

    /// External-symbol index.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Grammar-facing name.
    pub const fn name(self) -> &'static str {
        match self {
            TokenKind::HeredocStart => "heredoc_start",
            TokenKind::HeredocBody => "heredoc_body",
            TokenKind::HeredocEnd => "heredoc_end",
            TokenKind::StringContent => "string_content",
            TokenKind::MultilineStringContent => "multiline_string_content",
            TokenKind::RegexContent => "regex_content",
            TokenKind::CommandSubstitutionStart => "command_substitution_start",
            TokenKind::BraceExpansion => "brace_expansion",
            TokenKind::ErrorSentinel => "error_sentinel",
        }
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Symbol index outside the external-symbol table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown external token kind {0} (grammar declares {count})", count = TokenKind::COUNT)]
pub struct UnknownTokenKind(pub u8);

impl TryFrom<u8> for TokenKind {
    type Error = UnknownTokenKind;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        TokenKind::ALL
            .get(usize::from(value))
            .copied()
            .ok_or(UnknownTokenKind(value))
    }
}

bitflags! {
    /// Token kinds the grammar accepts at the current position.
    ///
    /// Advisory: the scanner may still decline a kind that is present.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct KindSet: u16 {
        const HEREDOC_START = 1 << TokenKind::HeredocStart as u16;
        const HEREDOC_BODY = 1 << TokenKind::HeredocBody as u16;
        const HEREDOC_END = 1 << TokenKind::HeredocEnd as u16;
        const STRING_CONTENT = 1 << TokenKind::StringContent as u16;
        const MULTILINE_STRING_CONTENT = 1 << TokenKind::MultilineStringContent as u16;
        const REGEX_CONTENT = 1 << TokenKind::RegexContent as u16;
        const COMMAND_SUBSTITUTION_START = 1 << TokenKind::CommandSubstitutionStart as u16;
        const BRACE_EXPANSION = 1 << TokenKind::BraceExpansion as u16;
        const ERROR_SENTINEL = 1 << TokenKind::ErrorSentinel as u16;

        /// Kinds reachable through the generic (non-heredoc-body) path.
        const SCANNABLE = Self::HEREDOC_START.bits()
            | Self::STRING_CONTENT.bits()
            | Self::MULTILINE_STRING_CONTENT.bits()
            | Self::REGEX_CONTENT.bits();
    }
}

impl KindSet {
    /// Build from the host's per-symbol validity vector.
    ///
    /// Entry `i` corresponds to the kind with index `i`. Entries beyond the
    /// declared kinds are ignored; missing entries count as not accepted.
    pub fn from_valid_symbols(valid: &[bool]) -> Self {
        valid
            .iter()
            .zip(TokenKind::ALL)
            .filter(|(accepted, _)| **accepted)
            .fold(KindSet::empty(), |set, (_, kind)| set | KindSet::from(kind))
    }

    #[inline]
    pub fn accepts(self, kind: TokenKind) -> bool {
        self.contains(KindSet::from(kind))
    }

    /// The host is in error recovery: it marks every symbol valid,
    /// including the sentinel no grammar rule references.
    #[inline]
    pub fn is_error_recovery(self) -> bool {
        self.contains(KindSet::ERROR_SENTINEL)
    }
}

impl From<TokenKind> for KindSet {
    fn from(kind: TokenKind) -> Self {
        KindSet::from_bits_retain(1 << (kind as u16))
    }
}

impl FromIterator<TokenKind> for KindSet {
    fn from_iter<I: IntoIterator<Item = TokenKind>>(iter: I) -> Self {
        iter.into_iter()
            .fold(KindSet::empty(), |set, kind| set | KindSet::from(kind))
    }
}
