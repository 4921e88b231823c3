//! Role-based authorization decisions.
//!
//! The engine maps a request path to the role it requires and checks the
//! principal's granted roles against it. It holds only immutable rules, so
//! one instance is shared by every request without locking.
//!
//! # Decision rule
//!
//! 1. Find the first [`AccessRule`] whose prefix matches the path.
//! 2. No rule → deny.
//! 3. No principal → deny.
//! 4. Allow iff the principal holds the rule's role (case-insensitive).

use crate::error::AuthError;
use fluxflix_core::principal::{Principal, Role};

/// Outcome of an authorization check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorizationDecision {
    /// The request may proceed.
    Allow,
    /// The request must be rejected.
    Deny,
}

impl AuthorizationDecision {
    /// Build from a boolean grant.
    #[must_use]
    pub const fn from_granted(granted: bool) -> Self {
        if granted { Self::Allow } else { Self::Deny }
    }

    /// Whether the request may proceed.
    #[must_use]
    pub const fn is_allowed(self) -> bool {
        matches!(self, Self::Allow)
    }
}

/// A path class and the role it requires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessRule {
    path_prefix: String,
    required_role: Role,
}

impl AccessRule {
    /// Create a rule. `path_prefix` is matched on whole path segments:
    /// `/movies` covers `/movies` and `/movies/m1` but not `/moviesx`.
    #[must_use]
    pub fn new(path_prefix: impl Into<String>, required_role: Role) -> Self {
        Self {
            path_prefix: path_prefix.into(),
            required_role,
        }
    }

    /// Role this rule requires.
    #[must_use]
    pub const fn required_role(&self) -> &Role {
        &self.required_role
    }

    /// Whether this rule covers `path`.
    #[must_use]
    pub fn matches(&self, path: &str) -> bool {
        let prefix = self.path_prefix.trim_end_matches('/');
        if prefix.is_empty() {
            return path.starts_with('/');
        }
        path.strip_prefix(prefix)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
    }
}

/// Evaluates `(principal, path)` into an allow/deny decision.
///
/// # Example
///
/// ```
/// use fluxflix_auth::{AuthorizationDecision, AuthorizationEngine};
/// use fluxflix_core::principal::{Principal, Role};
///
/// let engine = AuthorizationEngine::default();
/// let rwinch = Principal::new("rwinch", [Role::stream()]);
///
/// assert_eq!(engine.decide(Some(&rwinch), "/movies"), AuthorizationDecision::Allow);
/// assert_eq!(engine.decide(None, "/movies"), AuthorizationDecision::Deny);
/// ```
#[derive(Debug, Clone)]
pub struct AuthorizationEngine {
    rules: Vec<AccessRule>,
}

impl AuthorizationEngine {
    /// Create an engine from ordered rules. Earlier rules take precedence.
    #[must_use]
    pub const fn new(rules: Vec<AccessRule>) -> Self {
        Self { rules }
    }

    /// The rule that governs `path`, if any.
    #[must_use]
    pub fn rule_for(&self, path: &str) -> Option<&AccessRule> {
        self.rules.iter().find(|rule| rule.matches(path))
    }

    /// Decide whether `principal` may access `path`.
    #[must_use]
    pub fn decide(&self, principal: Option<&Principal>, path: &str) -> AuthorizationDecision {
        let (Some(rule), Some(principal)) = (self.rule_for(path), principal) else {
            return AuthorizationDecision::Deny;
        };
        AuthorizationDecision::from_granted(principal.has_role(rule.required_role()))
    }

    /// Like [`decide`](Self::decide), but explains a denial.
    ///
    /// # Errors
    ///
    /// - `AuthError::MissingCredentials` when there is no principal
    /// - `AuthError::InsufficientPermissions` when the role is missing or no
    ///   rule covers the path
    pub fn check(&self, principal: Option<&Principal>, path: &str) -> Result<(), AuthError> {
        if self.decide(principal, path).is_allowed() {
            return Ok(());
        }
        if principal.is_none() {
            return Err(AuthError::MissingCredentials);
        }
        let required = self
            .rule_for(path)
            .map_or_else(|| "<no rule>".to_string(), |rule| rule.required_role().to_string());
        Err(AuthError::InsufficientPermissions { required })
    }
}

impl Default for AuthorizationEngine {
    /// Every path requires `stream`.
    fn default() -> Self {
        Self::new(vec![AccessRule::new("/", Role::stream())])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn rwinch() -> Principal {
        Principal::new("rwinch", [Role::stream()])
    }

    #[test]
    fn stream_role_is_allowed_everywhere() {
        let engine = AuthorizationEngine::default();
        for path in ["/movies", "/movies/m1", "/movies/m1/events", "/anything"] {
            assert_eq!(engine.decide(Some(&rwinch()), path), AuthorizationDecision::Allow);
        }
    }

    #[test]
    fn role_match_ignores_case() {
        let engine = AuthorizationEngine::default();
        let shouty = Principal::new("jlong", [Role::new("STREAM")]);
        assert!(engine.decide(Some(&shouty), "/movies").is_allowed());
    }

    #[test]
    fn admin_alone_is_denied() {
        let engine = AuthorizationEngine::default();
        let admin = Principal::new("boss", [Role::admin()]);
        assert_eq!(engine.decide(Some(&admin), "/movies"), AuthorizationDecision::Deny);
    }

    #[test]
    fn missing_principal_is_denied() {
        let engine = AuthorizationEngine::default();
        assert_eq!(engine.decide(None, "/movies"), AuthorizationDecision::Deny);
        assert_eq!(engine.check(None, "/movies"), Err(AuthError::MissingCredentials));
    }

    #[test]
    fn check_reports_required_role() {
        let engine = AuthorizationEngine::default();
        let nobody = Principal::new("nobody", []);
        assert_eq!(
            engine.check(Some(&nobody), "/movies"),
            Err(AuthError::InsufficientPermissions {
                required: "stream".to_string()
            })
        );
    }

    #[test]
    fn unmatched_path_is_denied() {
        let engine = AuthorizationEngine::new(vec![AccessRule::new("/movies", Role::stream())]);
        assert!(engine.decide(Some(&rwinch()), "/movies/m1").is_allowed());
        assert!(!engine.decide(Some(&rwinch()), "/moviesx").is_allowed());
        assert!(!engine.decide(Some(&rwinch()), "/health").is_allowed());
    }

    #[test]
    fn first_matching_rule_wins() {
        let engine = AuthorizationEngine::new(vec![
            AccessRule::new("/admin", Role::admin()),
            AccessRule::new("/", Role::stream()),
        ]);
        assert!(!engine.decide(Some(&rwinch()), "/admin/reset").is_allowed());
        assert!(engine.decide(Some(&rwinch()), "/movies").is_allowed());
    }

    proptest! {
        #[test]
        fn principals_without_stream_are_always_denied(
            roles in proptest::collection::vec("[a-r]{1,8}", 0..4),
            path in "/[a-z0-9/]{0,24}",
        ) {
            let engine = AuthorizationEngine::default();
            let principal = Principal::new("user", roles.into_iter().map(Role::new));
            prop_assert_eq!(engine.decide(Some(&principal), &path), AuthorizationDecision::Deny);
        }

        #[test]
        fn principals_with_stream_are_always_allowed(path in "/[a-z0-9/]{0,24}") {
            let engine = AuthorizationEngine::default();
            prop_assert!(engine.decide(Some(&rwinch()), &path).is_allowed());
        }
    }
}
