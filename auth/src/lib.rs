//! Session-token core.
//!
//! Issues, verifies and rotates cookie-borne session tokens:
//! - Short-lived access tokens (identity + role) and long-lived refresh tokens, HS256-signed
//! - Access validation that re-resolves the role through a [`UserDirectory`]
//! - Refresh rotation with type and expiry checks, failing closed
//! - Cookie packaging whose lifetime follows the issued token
//! - Argon2id password hashing for the login/registration path
//!
//! Every rejection collapses into an opaque error before leaving the crate,
//! so callers cannot tell an expired token from a forged one.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash).unwrap());
//! ```
//!
//! ## Token Codec
//! ```
//! use auth::{Role, SigningKey, Token, TokenCodec};
//!
//! let codec = TokenCodec::new(SigningKey::from_secret(b"secret_key_at_least_32_bytes_long!").unwrap());
//! let token = Token::access("user@example.com", Role::User, 1_700_000_000, 1_700_001_800);
//! let encoded = codec.encode(&token).unwrap();
//! assert_eq!(codec.decode(&encoded).unwrap(), token);
//! ```

pub mod clock;
pub mod cookie;
pub mod directory;
pub mod issuer;
pub mod jwt;
pub mod password;
pub mod refresh;
pub mod session;
pub mod token;
pub mod validator;

// Re-export commonly used items
pub use clock::Clock;
pub use clock::ManualClock;
pub use clock::SystemClock;
pub use cookie::CookieDescriptor;
pub use cookie::CookiePackager;
pub use cookie::RequestCookies;
pub use cookie::SameSite;
pub use cookie::ACCESS_COOKIE_NAME;
pub use cookie::REFRESH_COOKIE_NAME;
pub use directory::DirectoryError;
pub use directory::UserDirectory;
pub use issuer::IssueError;
pub use issuer::TokenIssuer;
pub use jwt::KeyError;
pub use jwt::SigningKey;
pub use jwt::TokenCodec;
pub use jwt::TokenError;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use refresh::InvalidRefreshToken;
pub use refresh::RefreshCoordinator;
pub use session::Authentication;
pub use session::SessionCookies;
pub use session::SessionManager;
pub use session::SessionPolicy;
pub use token::IssuedToken;
pub use token::Principal;
pub use token::Role;
pub use token::Token;
pub use token::TokenType;
pub use validator::AuthenticationFailed;
pub use validator::TokenValidator;
