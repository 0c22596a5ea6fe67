//! Error types for count-up animations.

/// Errors surfaced by the count-up core.
///
/// Most inputs are normalized rather than rejected (negative decimals clamp to
/// zero, bad durations fall back to the default), so the set is small.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum CountUpError {
    /// Start or end value is not a number. Detected when the run starts.
    #[error("countUp error: startVal or endVal is not a number (start={start}, end={end})")]
    InvalidBound { start: f64, end: f64 },

    /// Identifier lookup for the render target found nothing.
    #[error("Render target not found: {id}")]
    TargetNotFound { id: String },

    /// Options payload could not be parsed.
    #[error("Invalid options: {reason}")]
    InvalidOptions { reason: String },
}

impl From<serde_json::Error> for CountUpError {
    fn from(err: serde_json::Error) -> Self {
        CountUpError::InvalidOptions {
            reason: err.to_string(),
        }
    }
}

/// Result alias for count-up operations.
pub type Result<T> = std::result::Result<T, CountUpError>;
