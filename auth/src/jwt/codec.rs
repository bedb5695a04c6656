use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;

use super::claims::Claims;
use super::errors::KeyError;
use super::errors::TokenError;
use crate::token::Token;

/// HMAC key material shared by every token component.
///
/// Built once during start-up and never mutated. Tokens signed under any
/// other key, including a previous run's, fail verification.
pub struct SigningKey {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl SigningKey {
    /// Minimum secret length for HS256.
    pub const MIN_SECRET_LEN: usize = 32;

    /// Derive key material from a configured secret.
    ///
    /// # Errors
    /// * `TooShort` - Secret is shorter than [`Self::MIN_SECRET_LEN`] bytes
    pub fn from_secret(secret: &[u8]) -> Result<Self, KeyError> {
        if secret.len() < Self::MIN_SECRET_LEN {
            return Err(KeyError::TooShort {
                min: Self::MIN_SECRET_LEN,
                actual: secret.len(),
            });
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
        })
    }
}

/// Encodes [`Token`] values as compact HS256 JWTs and decodes them back.
///
/// Decoding verifies structure and signature only. Expiry and type checks need
/// the injected clock and the caller's expectation, so they live with the
/// validator and the refresh coordinator.
pub struct TokenCodec {
    key: SigningKey,
    validation: Validation,
}

impl TokenCodec {
    const ALGORITHM: Algorithm = Algorithm::HS256;

    pub fn new(key: SigningKey) -> Self {
        let mut validation = Validation::new(Self::ALGORITHM);
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.leeway = 0;
        validation.required_spec_claims.clear();

        Self { key, validation }
    }

    /// Sign a token.
    ///
    /// # Errors
    /// * `Encoding` - Serialization or signing failed
    pub fn encode(&self, token: &Token) -> Result<String, TokenError> {
        let header = Header::new(Self::ALGORITHM);

        encode(&header, &Claims::from(token), &self.key.encoding_key)
            .map_err(|e| TokenError::Encoding(e.to_string()))
    }

    /// Verify and decode a compact token.
    ///
    /// # Errors
    /// * `BadSignature` - Signature does not match, or the header names another algorithm
    /// * `Malformed` - Anything that cannot be parsed as a session token
    pub fn decode(&self, token: &str) -> Result<Token, TokenError> {
        let token_data =
            decode::<Claims>(token, &self.key.decoding_key, &self.validation).map_err(|e| {
                match e.kind() {
                    ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                        TokenError::BadSignature
                    }
                    _ => TokenError::Malformed(e.to_string()),
                }
            })?;

        Token::try_from(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::Role;

    const SECRET: &[u8] = b"codec_test_secret_at_least_32_bytes!";

    fn codec(secret: &[u8]) -> TokenCodec {
        TokenCodec::new(SigningKey::from_secret(secret).unwrap())
    }

    /// Swap one character inside the payload segment for a different base64url character.
    fn tamper_payload(token: &str) -> String {
        let mut parts: Vec<String> = token.split('.').map(str::to_string).collect();
        let payload = &mut parts[1];
        let index = payload.len() / 2;
        let original = payload.as_bytes()[index];
        let replacement = if original == b'A' { 'B' } else { 'A' };
        payload.replace_range(index..index + 1, &replacement.to_string());
        parts.join(".")
    }

    #[test]
    fn test_round_trip_access() {
        let codec = codec(SECRET);
        let token = Token::access("user@example.com", Role::User, 1_700_000_000, 1_700_001_800);

        let encoded = codec.encode(&token).expect("Failed to encode token");
        assert_eq!(codec.decode(&encoded), Ok(token));
    }

    #[test]
    fn test_round_trip_refresh() {
        let codec = codec(SECRET);
        let token = Token::refresh("user@example.com", 1_700_000_000, 1_700_604_800);

        let encoded = codec.encode(&token).expect("Failed to encode token");
        assert_eq!(codec.decode(&encoded), Ok(token));
    }

    #[test]
    fn test_decode_ignores_expiry() {
        let codec = codec(SECRET);
        let token = Token::refresh("user@example.com", 10, 20);

        let encoded = codec.encode(&token).unwrap();
        assert_eq!(codec.decode(&encoded).unwrap().expires_at, 20);
    }

    #[test]
    fn test_decode_garbage_is_malformed() {
        let codec = codec(SECRET);

        assert!(matches!(
            codec.decode("invalid.token.here"),
            Err(TokenError::Malformed(_))
        ));
        assert!(matches!(codec.decode(""), Err(TokenError::Malformed(_))));
        assert!(matches!(
            codec.decode("no-dots-at-all"),
            Err(TokenError::Malformed(_))
        ));
    }

    #[test]
    fn test_decode_with_wrong_secret() {
        let codec1 = codec(b"secret1_at_least_32_bytes_long_key!");
        let codec2 = codec(b"secret2_at_least_32_bytes_long_key!");

        let token = Token::access("user@example.com", Role::Admin, 100, 200);
        let encoded = codec1.encode(&token).unwrap();

        assert_eq!(codec2.decode(&encoded), Err(TokenError::BadSignature));
    }

    #[test]
    fn test_tampered_payload_fails_signature() {
        let codec = codec(SECRET);
        let token = Token::access("user@example.com", Role::User, 100, 200);
        let encoded = codec.encode(&token).unwrap();

        let tampered = tamper_payload(&encoded);
        assert_ne!(tampered, encoded);
        assert_eq!(codec.decode(&tampered), Err(TokenError::BadSignature));
    }

    #[test]
    fn test_foreign_algorithm_rejected() {
        let codec = codec(SECRET);
        let token = Token::access("user@example.com", Role::Admin, 100, 200);
        let foreign = encode(
            &Header::new(Algorithm::HS512),
            &Claims::from(&token),
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap();

        assert_eq!(codec.decode(&foreign), Err(TokenError::BadSignature));
    }

    #[test]
    fn test_short_secret_rejected() {
        let result = SigningKey::from_secret(b"secret-key");
        assert!(matches!(
            result,
            Err(KeyError::TooShort {
                min: 32,
                actual: 10
            })
        ));
    }
}
