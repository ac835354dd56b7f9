// ============================
// crates/backend-lib/src/auth/evaluator.rs
// ============================
//! Authorization evaluator: decides whether the caller of a protected
//! endpoint may proceed, silently renewing an expired access token when
//! the refresh token still vouches for the identity.
use super::request::AuthRequest;
use super::token::{Claims, DecodeError, TokenCodec};
use chrono::Duration;
use std::sync::Arc;

/// Success cause, fixed string
pub const AUTHORIZED: &str = "Authorized";
/// Cause for absent cookies (and for unrecognized modes, were one parseable)
pub const UNAUTHORIZED: &str = "Unauthorized";
/// Cause when the refresh token itself has expired
pub const PERFORM_LOGIN_AGAIN: &str = "Perform login again";
/// Cause when a decoded token lacks username, email or role
pub const MISSING_INFORMATION: &str = "Token is missing information";
/// Cause when the two tokens carry diverging identities
pub const MISMATCHED_USERS: &str = "Mismatched users";

/// The two auth cookie values as extracted from a request. `None` and empty
/// are treated alike: no credential presented.
#[derive(Debug, Clone, Default)]
pub struct CookiePair {
    pub access: Option<String>,
    pub refresh: Option<String>,
}

/// Outcome of an authorization check. `cause` is always populated;
/// `renewed_access` carries the replacement access token when an expired
/// one was silently renewed, and doubles as the refresh notice for the
/// client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub authorized: bool,
    pub cause: String,
    pub renewed_access: Option<String>,
}

impl Verdict {
    fn allow() -> Self {
        Self {
            authorized: true,
            cause: AUTHORIZED.to_string(),
            renewed_access: None,
        }
    }

    fn allow_renewed(token: String) -> Self {
        Self {
            authorized: true,
            cause: AUTHORIZED.to_string(),
            renewed_access: Some(token),
        }
    }

    fn deny(cause: impl Into<String>) -> Self {
        Self {
            authorized: false,
            cause: cause.into(),
            renewed_access: None,
        }
    }
}

/// Evaluates authorization requests against the caller's cookie pair.
///
/// Stateless per request; the only configuration is the token codec and
/// the TTL used when minting a replacement access token.
#[derive(Clone)]
pub struct Authorizer {
    codec: Arc<TokenCodec>,
    access_ttl: Duration,
}

impl Authorizer {
    pub fn new(codec: Arc<TokenCodec>, access_ttl: Duration) -> Self {
        Self { codec, access_ttl }
    }

    /// Run the full check. First failing step short-circuits.
    pub fn verify(&self, cookies: &CookiePair, request: &AuthRequest) -> Verdict {
        // Step 1: both cookies must be present and non-empty before any
        // decoding is attempted.
        let (access, refresh) = match (present(&cookies.access), present(&cookies.refresh)) {
            (Some(a), Some(r)) => (a, r),
            _ => return Verdict::deny(UNAUTHORIZED),
        };

        // Step 2, mode validation, is discharged statically: `AuthRequest`
        // is a closed enum.

        // Step 3: decode the access token and dispatch on the failure kind.
        match self.codec.decode(access) {
            Ok(access_claims) => self.check_fresh(access_claims, refresh, request),
            Err(DecodeError::Expired) => self.check_renewal(refresh, request),
            Err(DecodeError::Invalid(name)) => Verdict::deny(name),
        }
    }

    /// Fresh branch: both tokens decode; validate completeness and
    /// consistency, then apply the mode predicate.
    fn check_fresh(&self, access_claims: Claims, refresh: &str, request: &AuthRequest) -> Verdict {
        let refresh_claims = match self.codec.decode(refresh) {
            Ok(claims) => claims,
            Err(DecodeError::Expired) => return Verdict::deny(PERFORM_LOGIN_AGAIN),
            Err(DecodeError::Invalid(name)) => return Verdict::deny(name),
        };

        if !access_claims.is_complete() || !refresh_claims.is_complete() {
            return Verdict::deny(MISSING_INFORMATION);
        }
        if !access_claims.same_identity(&refresh_claims) {
            return Verdict::deny(MISMATCHED_USERS);
        }

        if request.permits(&access_claims) {
            Verdict::allow()
        } else {
            Verdict::deny(request.denial_cause(false))
        }
    }

    /// Renewal branch: the access token is expired; the refresh token
    /// alone vouches for the identity. A replacement access token is
    /// minted only after the predicate passes.
    fn check_renewal(&self, refresh: &str, request: &AuthRequest) -> Verdict {
        let refresh_claims = match self.codec.decode(refresh) {
            Ok(claims) => claims,
            Err(DecodeError::Expired) => return Verdict::deny(PERFORM_LOGIN_AGAIN),
            Err(DecodeError::Invalid(name)) => return Verdict::deny(name),
        };

        if !request.permits(&refresh_claims) {
            return Verdict::deny(request.denial_cause(true));
        }

        match self.codec.encode(&refresh_claims, self.access_ttl) {
            Ok(token) => Verdict::allow_renewed(token),
            Err(e) => Verdict::deny(e.to_string()),
        }
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::UserRecord;
    use ledgerly_common::Role;

    const TEST_SECRET: &[u8] = b"evaluator_test_secret_0123456789";

    fn codec() -> Arc<TokenCodec> {
        Arc::new(TokenCodec::new(TEST_SECRET))
    }

    fn authorizer() -> Authorizer {
        Authorizer::new(codec(), Duration::hours(1))
    }

    fn user(username: &str, email: &str, role: Role) -> UserRecord {
        UserRecord {
            id: format!("id-{username}"),
            username: username.to_string(),
            email: email.to_string(),
            password_hash: String::new(),
            role,
            refresh_token: None,
        }
    }

    fn cookie_pair_for(record: &UserRecord, access_ttl: Duration) -> CookiePair {
        let codec = codec();
        let claims = Claims::for_user(record);
        CookiePair {
            access: Some(codec.encode(&claims, access_ttl).unwrap()),
            refresh: Some(codec.encode(&claims, Duration::days(7)).unwrap()),
        }
    }

    #[test]
    fn test_missing_cookies_always_unauthorized() {
        let auth = authorizer();
        let record = user("maria", "maria@example.com", Role::Regular);
        let valid = cookie_pair_for(&record, Duration::hours(1));

        let cases = [
            CookiePair::default(),
            CookiePair {
                access: valid.access.clone(),
                refresh: None,
            },
            CookiePair {
                access: None,
                refresh: valid.refresh.clone(),
            },
            CookiePair {
                access: Some(String::new()),
                refresh: valid.refresh.clone(),
            },
        ];

        for cookies in cases {
            let verdict = auth.verify(&cookies, &AuthRequest::Simple);
            assert!(!verdict.authorized);
            assert_eq!(verdict.cause, UNAUTHORIZED);
        }
    }

    #[test]
    fn test_fresh_simple_authorized() {
        let auth = authorizer();
        let record = user("maria", "maria@example.com", Role::Regular);
        let cookies = cookie_pair_for(&record, Duration::hours(1));

        let verdict = auth.verify(&cookies, &AuthRequest::Simple);
        assert!(verdict.authorized);
        assert_eq!(verdict.cause, AUTHORIZED);
        assert!(verdict.renewed_access.is_none());
    }

    #[test]
    fn test_malformed_access_token_echoes_decoder_error() {
        let auth = authorizer();
        let record = user("maria", "maria@example.com", Role::Regular);
        let mut cookies = cookie_pair_for(&record, Duration::hours(1));
        cookies.access = Some("garbage.token.value".to_string());

        let verdict = auth.verify(&cookies, &AuthRequest::Simple);
        assert!(!verdict.authorized);
        // cause is the decoder's failure name, not a business string
        assert_ne!(verdict.cause, UNAUTHORIZED);
        assert_ne!(verdict.cause, PERFORM_LOGIN_AGAIN);
    }

    #[test]
    fn test_mismatched_users_rejected() {
        let auth = authorizer();
        let maria = user("maria", "maria@example.com", Role::Regular);
        let john = user("john", "john@example.com", Role::Regular);

        let cookies = CookiePair {
            access: cookie_pair_for(&maria, Duration::hours(1)).access,
            refresh: cookie_pair_for(&john, Duration::hours(1)).refresh,
        };

        let verdict = auth.verify(&cookies, &AuthRequest::Simple);
        assert!(!verdict.authorized);
        assert_eq!(verdict.cause, MISMATCHED_USERS);
    }

    #[test]
    fn test_incomplete_claims_rejected() {
        let auth = authorizer();
        let mut record = user("maria", "maria@example.com", Role::Regular);
        record.email = String::new();
        let cookies = cookie_pair_for(&record, Duration::hours(1));

        let verdict = auth.verify(&cookies, &AuthRequest::Simple);
        assert!(!verdict.authorized);
        assert_eq!(verdict.cause, MISSING_INFORMATION);
    }

    #[test]
    fn test_admin_gating_fresh_branch() {
        let auth = authorizer();

        let admin = user("root", "root@example.com", Role::Admin);
        let verdict = auth.verify(&cookie_pair_for(&admin, Duration::hours(1)), &AuthRequest::Admin);
        assert!(verdict.authorized);

        let regular = user("maria", "maria@example.com", Role::Regular);
        let verdict = auth.verify(
            &cookie_pair_for(&regular, Duration::hours(1)),
            &AuthRequest::Admin,
        );
        assert!(!verdict.authorized);
        assert_eq!(verdict.cause, "Unauthorized access, not an Admin");
    }

    #[test]
    fn test_user_gating_fresh_branch() {
        let auth = authorizer();
        let record = user("maria", "maria@example.com", Role::Regular);
        let cookies = cookie_pair_for(&record, Duration::hours(1));

        let own = AuthRequest::User {
            username: "maria".to_string(),
        };
        assert!(auth.verify(&cookies, &own).authorized);

        let other = AuthRequest::User {
            username: "john".to_string(),
        };
        let verdict = auth.verify(&cookies, &other);
        assert!(!verdict.authorized);
        assert_eq!(verdict.cause, "Unauthorized access, not a User");
    }

    #[test]
    fn test_group_gating_both_branches() {
        let auth = authorizer();
        let record = user("maria", "maria@example.com", Role::Regular);
        let in_group = AuthRequest::Group {
            emails: ["maria@example.com".to_string()].into_iter().collect(),
        };
        let not_in_group = AuthRequest::Group {
            emails: ["someone@example.com".to_string()].into_iter().collect(),
        };

        // fresh branch
        let fresh = cookie_pair_for(&record, Duration::hours(1));
        assert!(auth.verify(&fresh, &in_group).authorized);
        let verdict = auth.verify(&fresh, &not_in_group);
        assert!(!verdict.authorized);
        assert_eq!(verdict.cause, "Unauthorized access, not in a group");

        // renewal branch
        let expired = cookie_pair_for(&record, Duration::seconds(-5));
        assert!(auth.verify(&expired, &in_group).authorized);
        let verdict = auth.verify(&expired, &not_in_group);
        assert!(!verdict.authorized);
        assert_eq!(verdict.cause, "Unauthorized access, not in a group");
    }

    #[test]
    fn test_silent_renewal_mints_access_token() {
        let auth = authorizer();
        let record = user("maria", "maria@example.com", Role::Regular);
        let cookies = cookie_pair_for(&record, Duration::seconds(-5));

        let verdict = auth.verify(&cookies, &AuthRequest::Simple);
        assert!(verdict.authorized);
        assert_eq!(verdict.cause, AUTHORIZED);

        // the replacement token decodes to the refresh token's identity
        let renewed = verdict.renewed_access.expect("renewed token");
        let claims = codec().decode(&renewed).unwrap();
        assert_eq!(claims.username, "maria");
        assert_eq!(claims.email, "maria@example.com");
    }

    #[test]
    fn test_renewal_denied_mints_nothing() {
        let auth = authorizer();
        let record = user("maria", "maria@example.com", Role::Regular);
        let cookies = cookie_pair_for(&record, Duration::seconds(-5));

        let verdict = auth.verify(&cookies, &AuthRequest::Admin);
        assert!(!verdict.authorized);
        assert_eq!(verdict.cause, "Unauthorized access");
        assert!(verdict.renewed_access.is_none());
    }

    #[test]
    fn test_expired_refresh_requires_login() {
        let auth = authorizer();
        let record = user("maria", "maria@example.com", Role::Regular);
        let codec = codec();
        let claims = Claims::for_user(&record);

        // renewal branch: both expired
        let cookies = CookiePair {
            access: Some(codec.encode(&claims, Duration::seconds(-5)).unwrap()),
            refresh: Some(codec.encode(&claims, Duration::seconds(-5)).unwrap()),
        };
        let verdict = auth.verify(&cookies, &AuthRequest::Simple);
        assert!(!verdict.authorized);
        assert_eq!(verdict.cause, PERFORM_LOGIN_AGAIN);

        // fresh branch: valid access, expired refresh
        let cookies = CookiePair {
            access: Some(codec.encode(&claims, Duration::hours(1)).unwrap()),
            refresh: Some(codec.encode(&claims, Duration::seconds(-5)).unwrap()),
        };
        let verdict = auth.verify(&cookies, &AuthRequest::Simple);
        assert!(!verdict.authorized);
        assert_eq!(verdict.cause, PERFORM_LOGIN_AGAIN);
    }

    #[test]
    fn test_expired_access_malformed_refresh() {
        let auth = authorizer();
        let record = user("maria", "maria@example.com", Role::Regular);
        let codec = codec();
        let claims = Claims::for_user(&record);

        let cookies = CookiePair {
            access: Some(codec.encode(&claims, Duration::seconds(-5)).unwrap()),
            refresh: Some("mangled".to_string()),
        };
        let verdict = auth.verify(&cookies, &AuthRequest::Simple);
        assert!(!verdict.authorized);
        assert_ne!(verdict.cause, PERFORM_LOGIN_AGAIN);
        assert!(verdict.renewed_access.is_none());
    }
}
