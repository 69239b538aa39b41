//! Error types for u-brownian.
//!
//! Every violated precondition surfaces as a [`WalkError`]. Degenerate but
//! valid inputs (zero walks, zero steps) are not errors.

use thiserror::Error;

/// Result type alias for u-brownian operations.
pub type WalkResult<T> = Result<T, WalkError>;

/// Unified error type for walk generation, statistics and experiments.
#[derive(Debug, Error)]
pub enum WalkError {
    /// A parameter is outside its valid domain.
    #[error("invalid argument `{name}`: {reason}")]
    InvalidArgument {
        /// Name of the offending parameter.
        name: &'static str,
        /// What is wrong with it.
        reason: String,
    },

    /// A statistic was requested over an empty collection.
    #[error("empty input: {what} requires at least one sample")]
    EmptyInput {
        /// The statistic or collection that was empty.
        what: &'static str,
    },

    /// Experiment configuration could not be parsed.
    #[error("configuration error: {0}")]
    Config(#[from] serde_yaml::Error),
}

impl WalkError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        WalkError::InvalidArgument {
            name,
            reason: reason.into(),
        }
    }

    pub(crate) fn empty(what: &'static str) -> Self {
        WalkError::EmptyInput { what }
    }
}

/// Converts a signed count into a `usize`, rejecting negative values.
///
/// # Examples
/// ```
/// use u_brownian::error::checked_count;
/// assert_eq!(checked_count("num_steps", 5).unwrap(), 5);
/// assert!(checked_count("num_steps", -1).is_err());
/// ```
pub fn checked_count(name: &'static str, value: i64) -> WalkResult<usize> {
    usize::try_from(value).map_err(|_| {
        WalkError::invalid(name, format!("must be non-negative, got {value}"))
    })
}

/// Validates a probability in `[0, 1]`.
pub(crate) fn checked_probability(name: &'static str, p: f64) -> WalkResult<f64> {
    if p.is_finite() && (0.0..=1.0).contains(&p) {
        Ok(p)
    } else {
        Err(WalkError::invalid(
            name,
            format!("must be a probability in [0, 1], got {p}"),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checked_count_accepts_zero() {
        assert_eq!(checked_count("num_walks", 0).unwrap(), 0);
    }

    #[test]
    fn test_checked_count_rejects_negative() {
        let err = checked_count("num_walks", -3).unwrap_err();
        assert!(matches!(
            err,
            WalkError::InvalidArgument { name: "num_walks", .. }
        ));
        assert_eq!(
            err.to_string(),
            "invalid argument `num_walks`: must be non-negative, got -3"
        );
    }

    #[test]
    fn test_checked_probability_bounds() {
        assert!(checked_probability("p_head", 0.0).is_ok());
        assert!(checked_probability("p_head", 1.0).is_ok());
        assert!(checked_probability("p_head", -0.1).is_err());
        assert!(checked_probability("p_head", 1.5).is_err());
        assert!(checked_probability("p_head", f64::NAN).is_err());
    }

    #[test]
    fn test_empty_input_message() {
        let err = WalkError::empty("displacement statistics");
        assert_eq!(
            err.to_string(),
            "empty input: displacement statistics requires at least one sample"
        );
    }
}
