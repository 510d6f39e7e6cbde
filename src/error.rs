//! Crate-level error types.

use std::fmt;

/// Errors produced by the morphe crate.
///
/// Every variant is a build-time failure. Per-frame updates never return
/// errors.
#[derive(Debug)]
pub enum MorphError {
    /// A volume description has out-of-range parameters.
    InvalidVolume(String),
    /// A curve needs at least two control points.
    InvalidCurve {
        /// Number of control points supplied.
        points: usize,
    },
    /// Family-level configuration (count, damping, strategy, palette).
    InvalidFamily(String),
    /// Generic I/O failure.
    Io(std::io::Error),
    /// TOML options parsing/serialization failure.
    OptionsParse(String),
}

impl fmt::Display for MorphError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidVolume(msg) => write!(f, "invalid volume: {msg}"),
            Self::InvalidCurve { points } => write!(
                f,
                "invalid curve: need at least 2 control points, got {points}"
            ),
            Self::InvalidFamily(msg) => write!(f, "invalid family: {msg}"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
        }
    }
}

impl std::error::Error for MorphError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for MorphError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

/// Fail with [`MorphError::InvalidVolume`] unless `value` is finite and
/// strictly positive.
pub(crate) fn require_positive(
    what: &str,
    value: f32,
) -> Result<(), MorphError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(MorphError::InvalidVolume(format!(
            "{what} must be finite and > 0, got {value}"
        )))
    }
}

/// Fail with [`MorphError::InvalidVolume`] unless `value` is finite and
/// not negative.
pub(crate) fn require_non_negative(
    what: &str,
    value: f32,
) -> Result<(), MorphError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(MorphError::InvalidVolume(format!(
            "{what} must be finite and >= 0, got {value}"
        )))
    }
}
