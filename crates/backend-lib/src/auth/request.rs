// ============================
// crates/backend-lib/src/auth/request.rs
// ============================
//! Authorization request modes and their predicates.
use super::token::Claims;
use std::collections::HashSet;

/// What a protected endpoint requires of the caller's identity.
///
/// A closed sum type: handlers build the variant they need, so an
/// unrecognized mode cannot reach the evaluator and the predicate match
/// below is exhaustive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthRequest {
    /// Any authenticated identity suffices
    Simple,
    /// Caller must be exactly this user
    User { username: String },
    /// Caller must hold the Admin role
    Admin,
    /// Caller's email must belong to the target group
    Group { emails: HashSet<String> },
}

impl AuthRequest {
    /// Pure mode predicate, applied to validated claims.
    pub fn permits(&self, claims: &Claims) -> bool {
        match self {
            AuthRequest::Simple => true,
            AuthRequest::User { username } => claims.username == *username,
            AuthRequest::Admin => claims.is_admin(),
            AuthRequest::Group { emails } => emails.contains(&claims.email),
        }
    }

    /// Denial cause surfaced to the client. The fresh and renewal branches
    /// historically used different strings for User and Admin; both are
    /// kept verbatim for wire compatibility.
    pub fn denial_cause(&self, renewal: bool) -> &'static str {
        match (self, renewal) {
            (AuthRequest::User { .. }, false) => "Unauthorized access, not a User",
            (AuthRequest::Admin, false) => "Unauthorized access, not an Admin",
            (AuthRequest::User { .. } | AuthRequest::Admin, true) => "Unauthorized access",
            (AuthRequest::Group { .. }, _) => "Unauthorized access, not in a group",
            // Simple never denies; the string exists only so the match is total
            (AuthRequest::Simple, _) => "Unauthorized access",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(username: &str, email: &str, role: &str) -> Claims {
        Claims {
            id: "u-1".to_string(),
            username: username.to_string(),
            email: email.to_string(),
            role: role.to_string(),
            iat: 0,
            exp: 0,
        }
    }

    #[test]
    fn test_simple_always_passes() {
        let request = AuthRequest::Simple;
        assert!(request.permits(&claims("anyone", "a@b.io", "Regular")));
    }

    #[test]
    fn test_user_mode_matches_username() {
        let request = AuthRequest::User {
            username: "maria".to_string(),
        };
        assert!(request.permits(&claims("maria", "maria@example.com", "Regular")));
        assert!(!request.permits(&claims("john", "john@example.com", "Regular")));
        assert_eq!(request.denial_cause(false), "Unauthorized access, not a User");
        assert_eq!(request.denial_cause(true), "Unauthorized access");
    }

    #[test]
    fn test_admin_mode_requires_role() {
        let request = AuthRequest::Admin;
        assert!(request.permits(&claims("root", "root@example.com", "Admin")));
        assert!(!request.permits(&claims("maria", "maria@example.com", "Regular")));
        assert_eq!(
            request.denial_cause(false),
            "Unauthorized access, not an Admin"
        );
        assert_eq!(request.denial_cause(true), "Unauthorized access");
    }

    #[test]
    fn test_group_mode_checks_membership() {
        let request = AuthRequest::Group {
            emails: ["maria@example.com".to_string(), "john@example.com".to_string()]
                .into_iter()
                .collect(),
        };
        assert!(request.permits(&claims("maria", "maria@example.com", "Regular")));
        assert!(!request.permits(&claims("eve", "eve@example.com", "Regular")));
        // Group uses the same cause on both branches
        assert_eq!(
            request.denial_cause(false),
            "Unauthorized access, not in a group"
        );
        assert_eq!(
            request.denial_cause(true),
            "Unauthorized access, not in a group"
        );
    }
}
