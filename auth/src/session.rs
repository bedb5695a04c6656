use std::sync::Arc;

use chrono::Duration;

use crate::clock::Clock;
use crate::cookie::CookieDescriptor;
use crate::cookie::CookiePackager;
use crate::cookie::RequestCookies;
use crate::directory::UserDirectory;
use crate::issuer::IssueError;
use crate::issuer::TokenIssuer;
use crate::jwt::SigningKey;
use crate::jwt::TokenCodec;
use crate::refresh::InvalidRefreshToken;
use crate::refresh::RefreshCoordinator;
use crate::token::Principal;
use crate::validator::TokenValidator;

/// Session lifetimes and transport flags.
#[derive(Debug, Clone, Copy)]
pub struct SessionPolicy {
    pub access_ttl: Duration,
    pub refresh_ttl: Duration,
    pub secure_cookies: bool,
}

/// Cookie pair sent on login, register, refresh and logout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionCookies {
    pub access: CookieDescriptor,
    pub refresh: CookieDescriptor,
}

impl From<(CookieDescriptor, CookieDescriptor)> for SessionCookies {
    fn from((access, refresh): (CookieDescriptor, CookieDescriptor)) -> Self {
        Self { access, refresh }
    }
}

/// Outcome of authenticating a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Authentication {
    Authenticated(Principal),
    Anonymous,
}

impl Authentication {
    pub fn principal(&self) -> Option<&Principal> {
        match self {
            Authentication::Authenticated(principal) => Some(principal),
            Authentication::Anonymous => None,
        }
    }
}

/// Session coordinator combining token issuance, validation, rotation and
/// cookie packaging behind the three operations callers need.
///
/// Stateless apart from the immutable key material; safe to share across
/// requests behind an `Arc`.
pub struct SessionManager {
    issuer: Arc<TokenIssuer>,
    validator: TokenValidator,
    coordinator: RefreshCoordinator,
    packager: CookiePackager,
}

impl SessionManager {
    /// Create a new session manager.
    ///
    /// # Arguments
    /// * `key` - Signing key material, derived once at start-up
    /// * `directory` - Account role lookup
    /// * `clock` - Time source for issuance and expiry
    /// * `policy` - Token lifetimes and cookie flags
    pub fn new(
        key: SigningKey,
        directory: Arc<dyn UserDirectory>,
        clock: Arc<dyn Clock>,
        policy: SessionPolicy,
    ) -> Self {
        let codec = Arc::new(TokenCodec::new(key));
        let issuer = Arc::new(TokenIssuer::new(
            Arc::clone(&codec),
            Arc::clone(&directory),
            Arc::clone(&clock),
            policy.access_ttl,
            policy.refresh_ttl,
        ));
        let validator = TokenValidator::new(Arc::clone(&codec), directory, Arc::clone(&clock));
        let coordinator = RefreshCoordinator::new(codec, Arc::clone(&issuer), clock);

        Self {
            issuer,
            validator,
            coordinator,
            packager: CookiePackager::new(policy.secure_cookies),
        }
    }

    /// Issue both session cookies for an already-authenticated identity.
    ///
    /// # Errors
    /// * `IdentityNotFound` - Directory has no such account
    /// * `Directory` - Directory lookup failed
    /// * `Token` - Signing failed
    pub async fn issue_session_cookies(&self, identity: &str) -> Result<SessionCookies, IssueError> {
        let access = self.issuer.create_access_token(identity).await?;
        let refresh = self.issuer.create_refresh_token(identity)?;

        tracing::info!(identity, "Session issued");
        Ok(self.packager.wrap(&access, &refresh).into())
    }

    /// Resolve the request's principal from its access-token cookie.
    ///
    /// A missing cookie and an invalid token both yield `Anonymous`; the
    /// rejection reason is only logged.
    pub async fn authenticate(&self, cookies: &RequestCookies) -> Authentication {
        let Some(token) = cookies.access_token() else {
            return Authentication::Anonymous;
        };

        match self.validator.validate_access(token).await {
            Ok(principal) => Authentication::Authenticated(principal),
            Err(_) => Authentication::Anonymous,
        }
    }

    /// Exchange the refresh-token cookie for a rotated cookie pair.
    ///
    /// # Errors
    /// * `InvalidRefreshToken` - Cookie missing, token rejected, or account gone
    pub async fn refresh(&self, cookies: &RequestCookies) -> Result<SessionCookies, InvalidRefreshToken> {
        let refresh_token = cookies.refresh_token().ok_or(InvalidRefreshToken)?;
        let (access, refresh) = self.coordinator.rotate(refresh_token).await?;

        tracing::info!(identity = %access.token.issuer, "Session refreshed");
        Ok(self.packager.wrap(&access, &refresh).into())
    }

    /// Cookies that make the client forget its session.
    ///
    /// Tokens already handed out stay valid until they expire.
    pub fn logout_cookies(&self) -> SessionCookies {
        self.packager.clear().into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::cookie::ACCESS_COOKIE_NAME;
    use crate::cookie::REFRESH_COOKIE_NAME;
    use crate::directory::fake::InMemoryDirectory;
    use crate::token::Role;
    use crate::token::TokenType;

    const SECRET: &[u8] = b"session_test_secret_at_least_32_byte";

    struct Fixture {
        directory: Arc<InMemoryDirectory>,
        clock: Arc<ManualClock>,
        sessions: SessionManager,
        codec: TokenCodec,
    }

    fn fixture() -> Fixture {
        let directory = Arc::new(InMemoryDirectory::with_account(
            "user@example.com",
            Role::User,
        ));
        let clock = Arc::new(ManualClock::starting_now());
        let sessions = SessionManager::new(
            SigningKey::from_secret(SECRET).unwrap(),
            Arc::clone(&directory) as Arc<dyn UserDirectory>,
            Arc::clone(&clock) as Arc<dyn Clock>,
            SessionPolicy {
                access_ttl: Duration::minutes(30),
                refresh_ttl: Duration::days(7),
                secure_cookies: true,
            },
        );
        Fixture {
            directory,
            clock,
            sessions,
            codec: TokenCodec::new(SigningKey::from_secret(SECRET).unwrap()),
        }
    }

    fn request_cookies(cookies: &SessionCookies) -> RequestCookies {
        RequestCookies::parse(&format!(
            "{}={}; {}={}",
            cookies.access.name, cookies.access.value, cookies.refresh.name, cookies.refresh.value
        ))
    }

    #[tokio::test]
    async fn test_login_issues_both_cookies() {
        let f = fixture();
        let cookies = f
            .sessions
            .issue_session_cookies("user@example.com")
            .await
            .expect("Failed to issue cookies");

        assert_eq!(cookies.access.name, ACCESS_COOKIE_NAME);
        assert_eq!(cookies.refresh.name, REFRESH_COOKIE_NAME);

        let access = f.codec.decode(&cookies.access.value).unwrap();
        assert_eq!(access.token_type, TokenType::Access);
        assert_eq!(access.issuer, "user@example.com");
        assert_eq!(cookies.access.max_age, access.lifetime_secs());

        let refresh = f.codec.decode(&cookies.refresh.value).unwrap();
        assert_eq!(refresh.token_type, TokenType::Refresh);
        assert_eq!(refresh.issuer, "user@example.com");
        assert_eq!(cookies.refresh.max_age, refresh.lifetime_secs());
    }

    #[tokio::test]
    async fn test_issue_for_unknown_identity() {
        let f = fixture();
        let result = f.sessions.issue_session_cookies("ghost@example.com").await;
        assert!(matches!(result, Err(IssueError::IdentityNotFound(_))));
    }

    #[tokio::test]
    async fn test_authenticate() {
        let f = fixture();
        let cookies = f
            .sessions
            .issue_session_cookies("user@example.com")
            .await
            .unwrap();

        let authentication = f.sessions.authenticate(&request_cookies(&cookies)).await;
        assert_eq!(
            authentication,
            Authentication::Authenticated(Principal {
                identity: "user@example.com".to_string(),
                role: Role::User,
            })
        );
    }

    #[tokio::test]
    async fn test_authenticate_without_cookie_is_anonymous() {
        let f = fixture();
        let authentication = f.sessions.authenticate(&RequestCookies::default()).await;
        assert_eq!(authentication, Authentication::Anonymous);
        assert!(authentication.principal().is_none());
    }

    #[tokio::test]
    async fn test_authenticate_with_refresh_token_in_access_slot() {
        let f = fixture();
        let cookies = f
            .sessions
            .issue_session_cookies("user@example.com")
            .await
            .unwrap();

        let swapped = RequestCookies::parse(&format!("access_token={}", cookies.refresh.value));
        assert_eq!(
            f.sessions.authenticate(&swapped).await,
            Authentication::Anonymous
        );
    }

    #[tokio::test]
    async fn test_authenticate_after_expiry() {
        let f = fixture();
        let cookies = f
            .sessions
            .issue_session_cookies("user@example.com")
            .await
            .unwrap();

        f.clock.advance(Duration::minutes(30));
        assert_eq!(
            f.sessions.authenticate(&request_cookies(&cookies)).await,
            Authentication::Anonymous
        );
    }

    #[tokio::test]
    async fn test_refresh_rotates_both_cookies() {
        let f = fixture();
        let cookies = f
            .sessions
            .issue_session_cookies("user@example.com")
            .await
            .unwrap();

        f.clock.advance(Duration::minutes(45));
        let refreshed = f
            .sessions
            .refresh(&request_cookies(&cookies))
            .await
            .expect("Failed to refresh session");

        assert_ne!(refreshed.access.value, cookies.access.value);
        assert_ne!(refreshed.refresh.value, cookies.refresh.value);
        assert!(matches!(
            f.sessions.authenticate(&request_cookies(&refreshed)).await,
            Authentication::Authenticated(_)
        ));
    }

    #[tokio::test]
    async fn test_refresh_with_access_token_value() {
        let f = fixture();
        let cookies = f
            .sessions
            .issue_session_cookies("user@example.com")
            .await
            .unwrap();

        let confused = RequestCookies::parse(&format!("refresh_token={}", cookies.access.value));
        assert_eq!(
            f.sessions.refresh(&confused).await,
            Err(InvalidRefreshToken)
        );
    }

    #[tokio::test]
    async fn test_refresh_without_cookie() {
        let f = fixture();
        assert_eq!(
            f.sessions.refresh(&RequestCookies::default()).await,
            Err(InvalidRefreshToken)
        );
    }

    #[tokio::test]
    async fn test_refresh_after_account_deleted() {
        let f = fixture();
        let cookies = f
            .sessions
            .issue_session_cookies("user@example.com")
            .await
            .unwrap();

        f.directory.remove("user@example.com");
        assert_eq!(
            f.sessions.refresh(&request_cookies(&cookies)).await,
            Err(InvalidRefreshToken)
        );
    }

    #[test]
    fn test_logout_cookies() {
        let f = fixture();
        let cookies = f.sessions.logout_cookies();
        assert_eq!(cookies.access.max_age, 0);
        assert_eq!(cookies.refresh.max_age, 0);
        assert!(cookies.access.secure);
    }
}
