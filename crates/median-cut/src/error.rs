//! Error types for color parsing
//!
//! Hex parsing is the only fallible operation in this crate; everything else
//! is total over its input domain.

use std::fmt;

/// Error type for parsing hex color strings.
///
/// Returned when a hex color string has the wrong length or contains a
/// character that is not a hexadecimal digit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseColorError {
    /// Hex string has invalid length (must be 3 or 6 characters after stripping '#')
    InvalidLength,
    /// A non-hexadecimal character was found
    InvalidDigit {
        /// Zero-based position of the offending character (after the '#')
        position: usize,
    },
}

impl fmt::Display for ParseColorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseColorError::InvalidLength => {
                write!(f, "invalid hex color length (expected 3 or 6 characters)")
            }
            ParseColorError::InvalidDigit { position } => {
                write!(f, "invalid hex digit at position {}", position)
            }
        }
    }
}

impl std::error::Error for ParseColorError {}
