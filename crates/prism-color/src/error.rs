//! Error types for color parsing.

/// Errors from parsing color values.
#[derive(Debug, thiserror::Error)]
pub enum ColorError {
    /// Returned when a hex color string is not `#RRGGBB` or `RRGGBB`.
    #[error("invalid hex color \"{input}\": expected #RRGGBB")]
    InvalidHex {
        /// The rejected input string.
        input: String,
    },
}
