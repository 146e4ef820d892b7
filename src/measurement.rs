//! Fail-soft outcome of a single statistic
//!
//! Every public statistic returns a [`Measurement`] instead of propagating
//! its error: a malformed image must never abort the caller, but the caller
//! still needs to tell a legitimately zero value from a fallback.

use crate::error::{AnalysisError, FailureKind, Result};
use tracing::warn;

/// Value of a statistic together with how it was obtained
#[derive(Debug)]
pub enum Measurement<T> {
    /// The statistic was computed from the image
    Computed(T),
    /// The computation failed; `value` is the documented default
    Defaulted { value: T, error: AnalysisError },
}

impl<T> Measurement<T> {
    /// Convert a fallible computation into a measurement, logging the fallback
    pub fn from_result(operation: &str, result: Result<T>, default: impl FnOnce() -> T) -> Self {
        match result {
            Ok(value) => Measurement::Computed(value),
            Err(error) => {
                warn!(operation, kind = error.kind().as_str(), %error, "statistic fell back to default");
                Measurement::Defaulted {
                    value: default(),
                    error,
                }
            }
        }
    }

    pub fn value(&self) -> &T {
        match self {
            Measurement::Computed(value) => value,
            Measurement::Defaulted { value, .. } => value,
        }
    }

    pub fn into_value(self) -> T {
        match self {
            Measurement::Computed(value) => value,
            Measurement::Defaulted { value, .. } => value,
        }
    }

    pub fn is_defaulted(&self) -> bool {
        matches!(self, Measurement::Defaulted { .. })
    }

    pub fn error(&self) -> Option<&AnalysisError> {
        match self {
            Measurement::Computed(_) => None,
            Measurement::Defaulted { error, .. } => Some(error),
        }
    }

    pub fn failure_kind(&self) -> Option<FailureKind> {
        self.error().map(AnalysisError::kind)
    }

    /// Transform the carried value, keeping the failure (if any)
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Measurement<U> {
        match self {
            Measurement::Computed(value) => Measurement::Computed(f(value)),
            Measurement::Defaulted { value, error } => Measurement::Defaulted {
                value: f(value),
                error,
            },
        }
    }
}
