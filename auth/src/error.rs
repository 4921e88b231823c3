//! Error types for authentication and authorization.

use thiserror::Error;

/// Result type alias for authentication operations.
pub type Result<T> = std::result::Result<T, AuthError>;

/// Authentication and authorization failures.
///
/// A deny decision from the engine is not an error; these variants describe
/// why a request could not be resolved to an allowed principal, so the
/// boundary can pick the right rejection status.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    // ═══════════════════════════════════════════════════════════
    // Authentication Errors
    // ═══════════════════════════════════════════════════════════

    /// No credentials were supplied.
    #[error("Missing credentials")]
    MissingCredentials,

    /// The `Authorization` header could not be parsed.
    #[error("Malformed credentials: {reason}")]
    MalformedCredentials {
        /// What was wrong with the header
        reason: String,
    },

    /// Unknown user or wrong password.
    #[error("Invalid credentials")]
    InvalidCredentials,

    // ═══════════════════════════════════════════════════════════
    // Authorization Errors
    // ═══════════════════════════════════════════════════════════

    /// The principal lacks the role required for the path.
    #[error("Insufficient permissions: {required}")]
    InsufficientPermissions {
        /// Required role that was missing
        required: String,
    },
}

impl AuthError {
    /// Returns `true` if the caller never established an identity.
    ///
    /// These map to `401 Unauthorized`; everything else is `403 Forbidden`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use fluxflix_auth::AuthError;
    /// assert!(AuthError::InvalidCredentials.is_unauthenticated());
    /// assert!(!AuthError::InsufficientPermissions { required: "stream".into() }.is_unauthenticated());
    /// ```
    #[must_use]
    pub const fn is_unauthenticated(&self) -> bool {
        matches!(
            self,
            Self::MissingCredentials | Self::MalformedCredentials { .. } | Self::InvalidCredentials
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_credentials_display() {
        let err = AuthError::MalformedCredentials {
            reason: "not base64".to_string(),
        };
        assert_eq!(err.to_string(), "Malformed credentials: not base64");
        assert!(err.is_unauthenticated());
    }

    #[test]
    fn insufficient_permissions_is_forbidden() {
        let err = AuthError::InsufficientPermissions {
            required: "stream".to_string(),
        };
        assert!(!err.is_unauthenticated());
        assert_eq!(err.to_string(), "Insufficient permissions: stream");
    }
}
