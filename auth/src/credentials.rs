//! HTTP Basic credentials.

use crate::error::{AuthError, Result};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::fmt;

const BASIC_PREFIX: &str = "Basic ";

/// Username and password carried by an `Authorization: Basic …` header.
#[derive(Clone, PartialEq, Eq)]
pub struct BasicCredentials {
    /// Login name.
    pub username: String,
    /// Plain-text password as sent by the client.
    pub password: String,
}

impl BasicCredentials {
    /// Create credentials directly.
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Parse an `Authorization` header value.
    ///
    /// The scheme is matched case-insensitively; the payload must be
    /// `base64(username:password)` with a non-empty username.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::MalformedCredentials` if the scheme is not Basic,
    /// the payload is not valid base64/UTF-8, or it has no `:` separator.
    ///
    /// # Examples
    ///
    /// ```
    /// use fluxflix_auth::BasicCredentials;
    ///
    /// // "rwinch:password"
    /// let creds = BasicCredentials::from_authorization_header("Basic cndpbmNoOnBhc3N3b3Jk").unwrap();
    /// assert_eq!(creds.username, "rwinch");
    /// ```
    pub fn from_authorization_header(value: &str) -> Result<Self> {
        let value = value.trim();
        let has_scheme = value
            .get(..BASIC_PREFIX.len())
            .is_some_and(|scheme| scheme.eq_ignore_ascii_case(BASIC_PREFIX));
        if !has_scheme {
            return Err(malformed("expected 'Basic <credentials>'"));
        }

        let encoded = value[BASIC_PREFIX.len()..].trim();
        let decoded = STANDARD
            .decode(encoded)
            .map_err(|_| malformed("credentials are not valid base64"))?;
        let decoded = String::from_utf8(decoded).map_err(|_| malformed("credentials are not UTF-8"))?;

        let (username, password) = decoded
            .split_once(':')
            .ok_or_else(|| malformed("missing ':' separator"))?;
        if username.is_empty() {
            return Err(malformed("empty username"));
        }

        Ok(Self::new(username, password))
    }

    /// Encode as an `Authorization` header value.
    #[must_use]
    pub fn to_header_value(&self) -> String {
        let raw = format!("{}:{}", self.username, self.password);
        format!("{BASIC_PREFIX}{}", STANDARD.encode(raw))
    }
}

// Passwords stay out of logs.
impl fmt::Debug for BasicCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

fn malformed(reason: &str) -> AuthError {
    AuthError::MalformedCredentials {
        reason: reason.to_string(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn parses_valid_header() {
        let creds = BasicCredentials::from_authorization_header("Basic cndpbmNoOnBhc3N3b3Jk").unwrap();
        assert_eq!(creds, BasicCredentials::new("rwinch", "password"));
    }

    #[test]
    fn scheme_is_case_insensitive() {
        let creds = BasicCredentials::from_authorization_header("basic cndpbmNoOnBhc3N3b3Jk").unwrap();
        assert_eq!(creds.username, "rwinch");
    }

    #[test]
    fn password_may_contain_colons() {
        let header = BasicCredentials::new("jlong", "a:b:c").to_header_value();
        let creds = BasicCredentials::from_authorization_header(&header).unwrap();
        assert_eq!(creds.password, "a:b:c");
    }

    #[test]
    fn rejects_bearer_scheme() {
        let err = BasicCredentials::from_authorization_header("Bearer abc").unwrap_err();
        assert!(matches!(err, AuthError::MalformedCredentials { .. }));
    }

    #[test]
    fn rejects_invalid_base64() {
        assert!(BasicCredentials::from_authorization_header("Basic !!!").is_err());
    }

    #[test]
    fn rejects_missing_separator() {
        let header = format!("Basic {}", STANDARD.encode("rwinch"));
        assert!(BasicCredentials::from_authorization_header(&header).is_err());
    }

    #[test]
    fn rejects_empty_username() {
        let header = format!("Basic {}", STANDARD.encode(":password"));
        assert!(BasicCredentials::from_authorization_header(&header).is_err());
    }

    #[test]
    fn debug_redacts_password() {
        let rendered = format!("{:?}", BasicCredentials::new("rwinch", "secret"));
        assert!(!rendered.contains("secret"));
    }

    proptest! {
        #[test]
        fn header_value_parses_back(user in "[a-z]{1,12}", pass in "[ -~]{0,24}") {
            let creds = BasicCredentials::new(user, pass);
            let parsed = BasicCredentials::from_authorization_header(&creds.to_header_value()).unwrap();
            prop_assert_eq!(parsed, creds);
        }
    }
}
