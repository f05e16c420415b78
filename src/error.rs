//! Error and outcome types for navigation.
//!
//! - [`NavigationResult`]: what happened to one navigation attempt
//!   (`Committed`, `NotFound`, `Aborted`, `Superseded`, `Error`).
//! - [`NavigationError`]: the failure taxonomy: configuration errors that
//!   abort startup or a redirect chain, `NoMatch` when nothing (not even a
//!   not-found handler) can render a path, and `Load` when lazy view code
//!   failed to arrive.
//!
//! Aborts and supersession are *not* errors: a middleware declining to
//! continue or a newer navigation overtaking an older one are ordinary
//! outcomes and never reach the outlet's error path.
//!
//! # Examples
//!
//! ```
//! use spa_navigator::{NavigationError, NavigationResult};
//!
//! let result = NavigationResult::Committed { path: "/about".into() };
//! assert!(result.is_committed());
//!
//! let err = NavigationError::DuplicateRouteName { name: "home".into() };
//! assert!(err.is_configuration());
//! assert_eq!(err.to_string(), "Duplicate route name: home");
//! ```

use std::fmt;

// ============================================================================
// Navigation Result Types
// ============================================================================

/// Outcome of a navigation attempt.
///
/// Every trigger on [`Router`](crate::Router) (`navigate`, `replace`,
/// `back`, `pop_state`, …) resolves to this enum.
#[derive(Debug, Clone, PartialEq)]
pub enum NavigationResult {
    /// A registered route was committed.
    Committed { path: String },
    /// No route matched and the not-found handler was committed instead.
    NotFound { path: String },
    /// A middleware declined to continue. History and outlet are untouched.
    Aborted { reason: String },
    /// A newer navigation started before this one could commit.
    Superseded,
    /// The attempt was rejected with an error.
    Error(NavigationError),
}

impl NavigationResult {
    /// Check if the attempt committed a registered route.
    pub fn is_committed(&self) -> bool {
        matches!(self, NavigationResult::Committed { .. })
    }

    /// Check if the attempt committed the not-found handler.
    pub fn is_not_found(&self) -> bool {
        matches!(self, NavigationResult::NotFound { .. })
    }

    /// Check if a middleware aborted the attempt.
    pub fn is_aborted(&self) -> bool {
        matches!(self, NavigationResult::Aborted { .. })
    }

    /// Check if the attempt was discarded in favour of a newer one.
    pub fn is_superseded(&self) -> bool {
        matches!(self, NavigationResult::Superseded)
    }

    /// Check if there was an error.
    pub fn is_error(&self) -> bool {
        matches!(self, NavigationResult::Error(_))
    }

    /// Path that ended up on screen, if anything was committed.
    pub fn committed_path(&self) -> Option<&str> {
        match self {
            NavigationResult::Committed { path } | NavigationResult::NotFound { path } => {
                Some(path)
            }
            _ => None,
        }
    }

    /// The error, if the attempt was rejected.
    pub fn error(&self) -> Option<&NavigationError> {
        match self {
            NavigationResult::Error(err) => Some(err),
            _ => None,
        }
    }
}

/// Failures that can occur while registering routes or navigating.
#[derive(Debug, Clone, PartialEq)]
pub enum NavigationError {
    /// Two route definitions share a name.
    DuplicateRouteName { name: String },

    /// A route pattern could not be compiled.
    InvalidPattern { pattern: String, message: String },

    /// A redirect chain grew past the configured limit.
    RedirectLimitExceeded { limit: usize, chain: Vec<String> },

    /// A redirect chain came back to a path it already visited.
    RedirectLoop { chain: Vec<String> },

    /// `navigate_named` / `url_for` was given a name nobody registered.
    UnknownRouteName { name: String },

    /// A parameter required to build a URL was not supplied.
    MissingParam { route: String, param: String },

    /// Nothing matched and no not-found handler is configured.
    NoMatch { path: String },

    /// Lazy view code failed to load.
    Load { route: String, message: String },
}

impl NavigationError {
    /// Configuration errors are programming mistakes, never transient.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            NavigationError::DuplicateRouteName { .. }
                | NavigationError::InvalidPattern { .. }
                | NavigationError::RedirectLimitExceeded { .. }
                | NavigationError::RedirectLoop { .. }
                | NavigationError::UnknownRouteName { .. }
                | NavigationError::MissingParam { .. }
        )
    }

    /// Check if this is a lazy load failure.
    pub fn is_load(&self) -> bool {
        matches!(self, NavigationError::Load { .. })
    }

    /// Check if this is a no-match failure.
    pub fn is_no_match(&self) -> bool {
        matches!(self, NavigationError::NoMatch { .. })
    }

    pub(crate) fn invalid_pattern(pattern: &str, message: impl Into<String>) -> Self {
        NavigationError::InvalidPattern {
            pattern: pattern.to_string(),
            message: message.into(),
        }
    }
}

impl fmt::Display for NavigationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NavigationError::DuplicateRouteName { name } => {
                write!(f, "Duplicate route name: {}", name)
            }
            NavigationError::InvalidPattern { pattern, message } => {
                write!(f, "Invalid route pattern '{}': {}", pattern, message)
            }
            NavigationError::RedirectLimitExceeded { limit, chain } => {
                write!(
                    f,
                    "Redirect limit of {} exceeded: {}",
                    limit,
                    chain.join(" -> ")
                )
            }
            NavigationError::RedirectLoop { chain } => {
                write!(f, "Redirect loop detected: {}", chain.join(" -> "))
            }
            NavigationError::UnknownRouteName { name } => {
                write!(f, "Unknown route name: {}", name)
            }
            NavigationError::MissingParam { route, param } => {
                write!(f, "Route '{}' requires parameter '{}'", route, param)
            }
            NavigationError::NoMatch { path } => {
                write!(f, "Route not found: {}", path)
            }
            NavigationError::Load { route, message } => {
                write!(f, "Failed to load route '{}': {}", route, message)
            }
        }
    }
}

impl std::error::Error for NavigationError {}

/// Error produced by a lazy loader.
///
/// Loaders only report a message; the controller attaches the route identity
/// when it turns this into [`NavigationError::Load`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadError {
    message: String,
}

impl LoadError {
    /// Create a load error from any displayable message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The loader's message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for LoadError {}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_navigation_result_committed() {
        let result = NavigationResult::Committed {
            path: "/home".to_string(),
        };
        assert!(result.is_committed());
        assert!(!result.is_not_found());
        assert!(!result.is_aborted());
        assert!(!result.is_error());
        assert_eq!(result.committed_path(), Some("/home"));
    }

    #[test]
    fn test_navigation_result_not_found_is_committed_path() {
        let result = NavigationResult::NotFound {
            path: "/missing".to_string(),
        };
        assert!(result.is_not_found());
        assert_eq!(result.committed_path(), Some("/missing"));
    }

    #[test]
    fn test_aborted_and_superseded_have_no_path() {
        let aborted = NavigationResult::Aborted {
            reason: "unsaved changes".to_string(),
        };
        assert!(aborted.is_aborted());
        assert_eq!(aborted.committed_path(), None);
        assert_eq!(NavigationResult::Superseded.committed_path(), None);
    }

    #[test]
    fn test_error_classification() {
        let loop_err = NavigationError::RedirectLoop {
            chain: vec!["/a".into(), "/b".into(), "/a".into()],
        };
        assert!(loop_err.is_configuration());
        assert_eq!(loop_err.to_string(), "Redirect loop detected: /a -> /b -> /a");

        let load = NavigationError::Load {
            route: "blog".into(),
            message: "network down".into(),
        };
        assert!(load.is_load());
        assert!(!load.is_configuration());

        let no_match = NavigationError::NoMatch {
            path: "/test".to_string(),
        };
        assert!(no_match.is_no_match());
        assert_eq!(no_match.to_string(), "Route not found: /test");
    }

    #[test]
    fn test_load_error_display() {
        let err = LoadError::new("chunk 3 timed out");
        assert_eq!(err.to_string(), "chunk 3 timed out");
        assert_eq!(err.message(), "chunk 3 timed out");
    }
}
