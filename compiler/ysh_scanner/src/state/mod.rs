//! Persistent scanner state.
//!
//! One [`ScannerState`] per parse session. Everything that influences a
//! later scan lives here and round-trips through the codec; nothing else
//! may carry information between calls.

/// Hard ceiling on heredoc delimiter length, in bytes.
pub const DELIMITER_CAPACITY: usize = 255;

/// Heredoc terminator text in a bounded inline buffer.
///
/// Stores UTF-8. A push that would exceed the limit is dropped whole, so
/// truncation never splits a character and [`as_str`](Self::as_str) never
/// fails. Equality and hashing look at the stored text only.
#[derive(Clone, Copy)]
pub struct Delimiter {
    bytes: [u8; DELIMITER_CAPACITY],
    len: u8,
}

/// Size assertion: inline buffer plus length byte, no heap.
const _: () = assert!(std::mem::size_of::<Delimiter>() == DELIMITER_CAPACITY + 1);

impl Delimiter {
    pub const fn new() -> Self {
        Self {
            bytes: [0; DELIMITER_CAPACITY],
            len: 0,
        }
    }

    /// Build from raw bytes, keeping the longest valid UTF-8 prefix that
    /// fits in the capacity.
    pub fn from_utf8_prefix(bytes: &[u8]) -> Self {
        let bytes = &bytes[..bytes.len().min(DELIMITER_CAPACITY)];
        let text = match std::str::from_utf8(bytes) {
            Ok(text) => text,
            Err(err) => std::str::from_utf8(&bytes[..err.valid_up_to()]).unwrap_or_default(),
        };
        let mut delimiter = Self::new();
        for c in text.chars() {
            delimiter.push(c, DELIMITER_CAPACITY);
        }
        delimiter
    }

    /// Append `c` if the result stays within `limit` bytes (itself capped at
    /// [`DELIMITER_CAPACITY`]). Returns `false` when the character was
    /// dropped.
    pub fn push(&mut self, c: char, limit: usize) -> bool {
        let limit = limit.min(DELIMITER_CAPACITY);
        let start = usize::from(self.len);
        let end = start + c.len_utf8();
        if end > limit {
            return false;
        }
        c.encode_utf8(&mut self.bytes[start..end]);
        // end <= DELIMITER_CAPACITY == u8::MAX
        self.len = u8::try_from(end).unwrap_or(u8::MAX);
        true
    }

    pub fn clear(&mut self) {
        self.len = 0;
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        usize::from(self.len)
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len()]
    }

    pub fn as_str(&self) -> &str {
        // Only whole characters are ever written.
        std::str::from_utf8(self.as_bytes()).unwrap_or_default()
    }

    pub fn chars(&self) -> std::str::Chars<'_> {
        self.as_str().chars()
    }
}

impl Default for Delimiter {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for Delimiter {
    fn eq(&self, other: &Self) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl Eq for Delimiter {}

impl std::hash::Hash for Delimiter {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.as_bytes().hash(state);
    }
}

impl std::fmt::Debug for Delimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Delimiter").field(&self.as_str()).finish()
    }
}

/// Mutable state of one scanner session.
///
/// Created zeroed, mutated only inside a scan, serialized on every host
/// checkpoint and restored before resuming.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct ScannerState {
    /// Inside an unterminated heredoc body. Implies a non-empty delimiter.
    pub heredoc_active: bool,
    /// `<<-` heredoc: leading tabs are dropped before delimiter comparison.
    pub strip_leading_tabs: bool,
    pub delimiter: Delimiter,
    // Reserved for nested-construct tracking. Persisted but not yet driven
    // by any sub-scanner.
    pub paren_depth: u8,
    pub brace_depth: u8,
    pub bracket_depth: u8,
    pub in_double_quote: bool,
    pub in_single_quote: bool,
    pub in_command_sub: bool,
}

impl ScannerState {
    /// Enter a heredoc body terminated by `delimiter`.
    ///
    /// An empty delimiter leaves the state untouched: a heredoc without a
    /// terminator could never close.
    pub fn open_heredoc(&mut self, delimiter: Delimiter, strip_leading_tabs: bool) {
        if delimiter.is_empty() {
            return;
        }
        self.delimiter = delimiter;
        self.strip_leading_tabs = strip_leading_tabs;
        self.heredoc_active = true;
    }

    /// Leave the heredoc body. The delimiter and strip flag stay as they are.
    pub fn close_heredoc(&mut self) {
        self.heredoc_active = false;
    }

    /// Restore the `heredoc_active => non-empty delimiter` invariant on
    /// state built from untrusted bytes.
    pub(crate) fn normalize(&mut self) {
        if self.delimiter.is_empty() {
            self.heredoc_active = false;
        }
    }
}
