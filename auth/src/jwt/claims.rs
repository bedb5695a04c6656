use serde::Deserialize;
use serde::Serialize;

use super::errors::TokenError;
use crate::token::Role;
use crate::token::Token;
use crate::token::TokenType;

/// JWT payload for session tokens.
///
/// The account email travels in `iss`; `typ` separates access from refresh
/// tokens and `role` is only written for access tokens.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    /// Issuer (account identity)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,

    /// Token type
    pub typ: TokenType,

    /// Role claim, access tokens only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl From<&Token> for Claims {
    fn from(token: &Token) -> Self {
        Self {
            iss: Some(token.issuer.clone()),
            typ: token.token_type,
            role: token.role,
            iat: token.issued_at,
            exp: token.expires_at,
        }
    }
}

impl TryFrom<Claims> for Token {
    type Error = TokenError;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        // An absent issuer is kept as empty so validation can report it precisely.
        let issuer = claims.iss.unwrap_or_default();

        match (claims.typ, claims.role) {
            (TokenType::Access, Some(role)) => {
                Ok(Token::access(issuer, role, claims.iat, claims.exp))
            }
            (TokenType::Refresh, None) => Ok(Token::refresh(issuer, claims.iat, claims.exp)),
            (TokenType::Access, None) => Err(TokenError::Malformed(
                "access token without role claim".to_string(),
            )),
            (TokenType::Refresh, Some(_)) => Err(TokenError::Malformed(
                "refresh token carrying role claim".to_string(),
            )),
        }
    }
}
