//! Independently failable page sections.
//!
//! A deferred fetch runs alongside the critical one but its failure only
//! affects its own section: the error is logged and kept as a message for
//! inline display instead of failing the request.

use std::fmt::Display;

/// Result of a deferred fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Deferred<T> {
    Ready(T),
    Failed(String),
}

impl<T> Deferred<T> {
    /// Capture a fetch result, logging failures under `section`.
    pub fn capture<E: Display>(section: &'static str, result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Self::Ready(value),
            Err(e) => {
                tracing::warn!(section, error = %e, "Deferred section failed");
                Self::Failed(format!("Couldn't load {section} right now."))
            }
        }
    }

    /// Transform the ready value, keeping a failure as is.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Deferred<U> {
        match self {
            Self::Ready(value) => Deferred::Ready(f(value)),
            Self::Failed(message) => Deferred::Failed(message),
        }
    }

    #[must_use]
    pub const fn ready(&self) -> Option<&T> {
        match self {
            Self::Ready(value) => Some(value),
            Self::Failed(_) => None,
        }
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Ready(_) => None,
            Self::Failed(message) => Some(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_ok() {
        let deferred = Deferred::capture("recommendations", Ok::<_, String>(vec![1, 2]));
        assert_eq!(deferred.ready(), Some(&vec![1, 2]));
        assert!(deferred.error().is_none());
    }

    #[test]
    fn test_capture_err_hides_details() {
        let deferred: Deferred<Vec<u8>> =
            Deferred::capture("recommendations", Err("HTTP 503: upstream timeout"));
        assert_eq!(deferred.error(), Some("Couldn't load recommendations right now."));
        assert!(deferred.ready().is_none());
        assert_eq!(deferred.map(|v| v.len()), Deferred::Failed("Couldn't load recommendations right now.".to_string()));
    }
}
