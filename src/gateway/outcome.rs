// Result of a gateway operation.
// Failures are values here, never panics or propagated errors.

use crate::error::{FailureKind, GatewayError};

/// Why an operation produced no value. Safe to log; never contains credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub kind: FailureKind,
    pub message: String,
}

impl From<&GatewayError> for Failure {
    fn from(error: &GatewayError) -> Self {
        Self {
            kind: error.kind(),
            message: error.to_string(),
        }
    }
}

/// Either the requested value or the reason it is unavailable.
///
/// Fail-soft callers collapse a failure into absence with [`Outcome::ok`] or into
/// an empty collection with [`Outcome::unwrap_or_default`].
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub enum Outcome<T> {
    Value(T),
    Failed(Failure),
}

impl<T> Outcome<T> {
    pub fn ok(self) -> Option<T> {
        match self {
            Outcome::Value(value) => Some(value),
            Outcome::Failed(_) => None,
        }
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Outcome::Value(value) => Some(value),
            Outcome::Failed(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&Failure> {
        match self {
            Outcome::Value(_) => None,
            Outcome::Failed(failure) => Some(failure),
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Outcome::Failed(_))
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Outcome<U> {
        match self {
            Outcome::Value(value) => Outcome::Value(f(value)),
            Outcome::Failed(failure) => Outcome::Failed(failure),
        }
    }

    pub fn into_result(self) -> Result<T, Failure> {
        match self {
            Outcome::Value(value) => Ok(value),
            Outcome::Failed(failure) => Err(failure),
        }
    }
}

impl<T: Default> Outcome<T> {
    /// The value, or `T::default()` (an empty list for list reads) on failure.
    pub fn unwrap_or_default(self) -> T {
        self.ok().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_collapses_to_empty() {
        let failed: Outcome<Vec<u64>> =
            Outcome::Failed(Failure::from(&GatewayError::NotFound("/x".into())));
        assert_eq!(failed.failure().unwrap().kind, FailureKind::Status(404));
        assert!(failed.clone().unwrap_or_default().is_empty());
        assert_eq!(failed.ok(), None);
    }

    #[test]
    fn test_empty_value_is_not_a_failure() {
        let empty: Outcome<Vec<u64>> = Outcome::Value(Vec::new());
        assert!(!empty.is_failed());
        assert_eq!(empty.map(|v| v.len()).into_result(), Ok(0));
    }
}
