//! Cookie transport for session tokens.

use std::fmt;

use crate::token::IssuedToken;

/// Cookie name for the access token.
pub const ACCESS_COOKIE_NAME: &str = "access_token";

/// Cookie name for the refresh token.
pub const REFRESH_COOKIE_NAME: &str = "refresh_token";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SameSite {
    Strict,
    Lax,
    None,
}

impl fmt::Display for SameSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SameSite::Strict => f.write_str("Strict"),
            SameSite::Lax => f.write_str("Lax"),
            SameSite::None => f.write_str("None"),
        }
    }
}

/// Outbound cookie. `Display` renders a `Set-Cookie` header value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieDescriptor {
    pub name: String,
    pub value: String,
    pub http_only: bool,
    pub secure: bool,
    pub path: String,
    pub same_site: SameSite,
    /// Lifetime in seconds
    pub max_age: i64,
}

impl fmt::Display for CookieDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}={}; Max-Age={}; Path={}",
            self.name, self.value, self.max_age, self.path
        )?;
        if self.http_only {
            f.write_str("; HttpOnly")?;
        }
        if self.secure {
            f.write_str("; Secure")?;
        }
        write!(f, "; SameSite={}", self.same_site)
    }
}

/// Wraps issued tokens into cookies whose lifetime matches the token's own.
#[derive(Debug, Clone, Copy)]
pub struct CookiePackager {
    secure: bool,
}

impl CookiePackager {
    /// # Arguments
    /// * `secure` - Set the `Secure` flag; must be true for anything but plaintext local transport
    pub fn new(secure: bool) -> Self {
        Self { secure }
    }

    /// Package an access/refresh pair.
    ///
    /// Each cookie's `Max-Age` is the issued token's `exp - iat`.
    pub fn wrap(
        &self,
        access: &IssuedToken,
        refresh: &IssuedToken,
    ) -> (CookieDescriptor, CookieDescriptor) {
        (
            self.cookie(
                ACCESS_COOKIE_NAME,
                &access.encoded,
                access.token.lifetime_secs(),
            ),
            self.cookie(
                REFRESH_COOKIE_NAME,
                &refresh.encoded,
                refresh.token.lifetime_secs(),
            ),
        )
    }

    /// Cookies instructing the client to drop both tokens.
    pub fn clear(&self) -> (CookieDescriptor, CookieDescriptor) {
        (
            self.cookie(ACCESS_COOKIE_NAME, "", 0),
            self.cookie(REFRESH_COOKIE_NAME, "", 0),
        )
    }

    fn cookie(&self, name: &str, value: &str, max_age: i64) -> CookieDescriptor {
        CookieDescriptor {
            name: name.to_string(),
            value: value.to_string(),
            http_only: true,
            secure: self.secure,
            path: "/".to_string(),
            same_site: SameSite::Lax,
            max_age,
        }
    }
}

/// Inbound cookies parsed from one or more `Cookie` header values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestCookies {
    pairs: Vec<(String, String)>,
}

impl RequestCookies {
    /// Parse a single `Cookie` header value.
    pub fn parse(header: &str) -> Self {
        let mut cookies = Self::default();
        cookies.add_header(header);
        cookies
    }

    /// Parse every `Cookie` header value of a request.
    pub fn from_headers<'a>(headers: impl IntoIterator<Item = &'a str>) -> Self {
        let mut cookies = Self::default();
        for header in headers {
            cookies.add_header(header);
        }
        cookies
    }

    pub fn add_header(&mut self, header: &str) {
        for part in header.split(';') {
            if let Some((name, value)) = part.trim().split_once('=') {
                let name = name.trim();
                if !name.is_empty() {
                    self.pairs
                        .push((name.to_string(), value.trim().to_string()));
                }
            }
        }
    }

    /// First value sent under `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn access_token(&self) -> Option<&str> {
        self.get(ACCESS_COOKIE_NAME).filter(|v| !v.is_empty())
    }

    pub fn refresh_token(&self) -> Option<&str> {
        self.get(REFRESH_COOKIE_NAME).filter(|v| !v.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::Role;
    use crate::token::Token;

    fn issued(token: Token) -> IssuedToken {
        IssuedToken {
            encoded: format!("encoded-{}", token.token_type),
            token,
        }
    }

    #[test]
    fn test_wrap_derives_max_age_from_tokens() {
        let packager = CookiePackager::new(true);
        let access = issued(Token::access("a@b.c", Role::User, 1000, 1000 + 1800));
        let refresh = issued(Token::refresh("a@b.c", 1000, 1000 + 604_800));

        let (access_cookie, refresh_cookie) = packager.wrap(&access, &refresh);

        assert_eq!(access_cookie.name, "access_token");
        assert_eq!(access_cookie.value, "encoded-access");
        assert_eq!(access_cookie.max_age, 1800);
        assert_eq!(refresh_cookie.name, "refresh_token");
        assert_eq!(refresh_cookie.value, "encoded-refresh");
        assert_eq!(refresh_cookie.max_age, 604_800);

        for cookie in [&access_cookie, &refresh_cookie] {
            assert!(cookie.http_only);
            assert!(cookie.secure);
            assert_eq!(cookie.path, "/");
            assert_eq!(cookie.same_site, SameSite::Lax);
        }
    }

    #[test]
    fn test_set_cookie_rendering() {
        let packager = CookiePackager::new(true);
        let access = issued(Token::access("a@b.c", Role::User, 0, 60));
        let refresh = issued(Token::refresh("a@b.c", 0, 120));
        let (cookie, _) = packager.wrap(&access, &refresh);

        assert_eq!(
            cookie.to_string(),
            "access_token=encoded-access; Max-Age=60; Path=/; HttpOnly; Secure; SameSite=Lax"
        );
    }

    #[test]
    fn test_insecure_rendering_omits_secure() {
        let (cookie, _) = CookiePackager::new(false).clear();
        assert_eq!(
            cookie.to_string(),
            "access_token=; Max-Age=0; Path=/; HttpOnly; SameSite=Lax"
        );
    }

    #[test]
    fn test_clear() {
        let (access, refresh) = CookiePackager::new(false).clear();
        assert_eq!(access.max_age, 0);
        assert_eq!(refresh.max_age, 0);
        assert!(access.value.is_empty());
        assert_eq!(refresh.name, REFRESH_COOKIE_NAME);
    }

    #[test]
    fn test_parse_multiple() {
        let cookies = RequestCookies::parse("foo=bar; access_token=abc123; refresh_token=xyz789");

        assert_eq!(cookies.access_token(), Some("abc123"));
        assert_eq!(cookies.refresh_token(), Some("xyz789"));
        assert_eq!(cookies.get("foo"), Some("bar"));
    }

    #[test]
    fn test_parse_with_spaces() {
        let cookies = RequestCookies::parse("  access_token = abc123  ; foo=bar");
        assert_eq!(cookies.access_token(), Some("abc123"));
    }

    #[test]
    fn test_token_values_with_padding_survive() {
        let cookies = RequestCookies::parse("access_token=a.b=.c==");
        assert_eq!(cookies.access_token(), Some("a.b=.c=="));
    }

    #[test]
    fn test_missing_and_empty() {
        let cookies = RequestCookies::parse("foo=bar; access_token=");
        assert_eq!(cookies.access_token(), None);
        assert_eq!(cookies.refresh_token(), None);
        assert_eq!(RequestCookies::default().get("foo"), None);
    }

    #[test]
    fn test_from_headers_first_wins() {
        let cookies =
            RequestCookies::from_headers(["access_token=first", "access_token=second; x=y"]);
        assert_eq!(cookies.access_token(), Some("first"));
        assert_eq!(cookies.get("x"), Some("y"));
    }
}
