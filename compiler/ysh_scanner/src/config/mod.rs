//! Construction-time scanner options.

use crate::state::DELIMITER_CAPACITY;

/// Invalid [`ScannerConfig`] value.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("heredoc delimiter capacity must be 1..={max} bytes, got {requested}", max = DELIMITER_CAPACITY)]
    DelimiterCapacity { requested: usize },
}

/// Options fixed for the lifetime of a [`Scanner`](crate::Scanner).
///
/// Not part of the checkpoint: a host restores a checkpoint into a scanner
/// built with the same config it was taken from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScannerConfig {
    max_delimiter_len: u8,
    decline_in_error_recovery: bool,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            max_delimiter_len: u8::MAX,
            decline_in_error_recovery: false,
        }
    }
}

impl ScannerConfig {
    /// Cap heredoc delimiters at `len` bytes; longer delimiters are
    /// truncated while their remaining characters are still consumed.
    pub fn with_max_delimiter_len(self, len: usize) -> Result<Self, ConfigError> {
        match u8::try_from(len) {
            Ok(max_delimiter_len) if max_delimiter_len > 0 => Ok(Self {
                max_delimiter_len,
                ..self
            }),
            _ => Err(ConfigError::DelimiterCapacity { requested: len }),
        }
    }

    /// Decline generic scans made while the host is in error recovery. An
    /// open heredoc body is scanned regardless. Off by default.
    #[must_use]
    pub fn with_decline_in_error_recovery(self, decline: bool) -> Self {
        Self {
            decline_in_error_recovery: decline,
            ..self
        }
    }

    pub fn max_delimiter_len(&self) -> usize {
        usize::from(self.max_delimiter_len)
    }

    pub fn decline_in_error_recovery(&self) -> bool {
        self.decline_in_error_recovery
    }
}
