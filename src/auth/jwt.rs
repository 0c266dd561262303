//! JWT token generation and validation
//! Access and refresh tokens are RS256-signed with independent key pairs

use crate::config::SecurityConfig;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The only signature algorithm this service issues or accepts.
pub const TOKEN_ALGORITHM: Algorithm = Algorithm::RS256;

/// Token issuance and validation failures.
///
/// Every validation failure maps to the same 401 externally; the variants
/// stay distinct so logs and tests can tell them apart.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("could not decode key: {0}")]
    KeyDecode(String),

    #[error("could not sign token: {0}")]
    Signing(String),

    #[error("invalid token signature")]
    InvalidSignature,

    #[error("unexpected signing algorithm")]
    AlgorithmMismatch,

    #[error("token expired")]
    Expired,

    #[error("token not yet valid")]
    NotYetValid,

    #[error("malformed token: {0}")]
    Malformed(String),
}

impl TokenError {
    /// Whether this error came from rejecting a client-supplied token
    /// (as opposed to a server-side key or signing problem).
    pub fn is_rejection(&self) -> bool {
        !matches!(self, TokenError::KeyDecode(_) | TokenError::Signing(_))
    }
}

/// JWT claims
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Subject (user ID, decimal)
    pub sub: String,

    /// Issued at
    pub iat: i64,

    /// Not before
    pub nbf: i64,

    /// Expiration
    pub exp: i64,
}

/// Token pair returned on login
#[derive(Debug, Serialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: u64, // seconds until access token expires
}

/// Decode a base64-encoded PEM RSA private key.
pub fn decode_private_key(private_key_b64: &str) -> Result<EncodingKey, TokenError> {
    let pem = STANDARD
        .decode(private_key_b64.trim())
        .map_err(|e| TokenError::KeyDecode(format!("base64: {}", e)))?;
    EncodingKey::from_rsa_pem(&pem).map_err(|e| TokenError::KeyDecode(format!("pem: {}", e)))
}

/// Decode a base64-encoded PEM RSA public key.
pub fn decode_public_key(public_key_b64: &str) -> Result<DecodingKey, TokenError> {
    let pem = STANDARD
        .decode(public_key_b64.trim())
        .map_err(|e| TokenError::KeyDecode(format!("base64: {}", e)))?;
    DecodingKey::from_rsa_pem(&pem).map_err(|e| TokenError::KeyDecode(format!("pem: {}", e)))
}

/// Issue a token for `user_id`, decoding the private key first.
pub fn issue(user_id: i64, ttl: Duration, private_key_b64: &str) -> Result<String, TokenError> {
    let key = decode_private_key(private_key_b64)?;
    issue_with_key(user_id, ttl, &key)
}

/// Issue a token with an already decoded key.
pub fn issue_with_key(user_id: i64, ttl: Duration, key: &EncodingKey) -> Result<String, TokenError> {
    issue_at(user_id, Utc::now(), ttl, key)
}

/// Issue a token as if the current time were `now`.
pub fn issue_at(
    user_id: i64,
    now: DateTime<Utc>,
    ttl: Duration,
    key: &EncodingKey,
) -> Result<String, TokenError> {
    let claims = Claims {
        sub: user_id.to_string(),
        iat: now.timestamp(),
        nbf: now.timestamp(),
        exp: (now + ttl).timestamp(),
    };

    encode(&Header::new(TOKEN_ALGORITHM), &claims, key).map_err(|e| {
        tracing::error!("Failed to sign token: {:?}", e);
        TokenError::Signing(e.to_string())
    })
}

/// Validate a token against a base64-encoded PEM public key and return its subject.
pub fn validate(token: &str, public_key_b64: &str) -> Result<i64, TokenError> {
    let key = decode_public_key(public_key_b64)?;
    validate_with_key(token, &key)
}

/// Validate a token against an already decoded public key and return its subject.
pub fn validate_with_key(token: &str, key: &DecodingKey) -> Result<i64, TokenError> {
    let mut validation = Validation::new(TOKEN_ALGORITHM);
    validation.leeway = 0;
    validation.validate_nbf = true;
    validation.set_required_spec_claims(&["exp", "nbf", "sub"]);

    let data = decode::<Claims>(token, key, &validation).map_err(|e| {
        let err = match e.kind() {
            ErrorKind::InvalidSignature => TokenError::InvalidSignature,
            ErrorKind::InvalidAlgorithm => TokenError::AlgorithmMismatch,
            ErrorKind::ExpiredSignature => TokenError::Expired,
            ErrorKind::ImmatureSignature => TokenError::NotYetValid,
            _ => TokenError::Malformed(e.to_string()),
        };
        tracing::debug!(error = %err, "Token validation failed");
        err
    })?;

    data.claims
        .sub
        .parse::<i64>()
        .map_err(|_| TokenError::Malformed("subject is not a user id".to_string()))
}

/// Keys and lifetime for one kind of token.
pub struct TokenKeys {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl TokenKeys {
    pub fn from_base64_pem(
        private_key_b64: &str,
        public_key_b64: &str,
        ttl_secs: u64,
    ) -> Result<Self, TokenError> {
        Ok(Self {
            encoding_key: decode_private_key(private_key_b64)?,
            decoding_key: decode_public_key(public_key_b64)?,
            ttl: Duration::seconds(ttl_secs as i64),
        })
    }

    pub fn issue(&self, user_id: i64) -> Result<String, TokenError> {
        issue_with_key(user_id, self.ttl, &self.encoding_key)
    }

    pub fn validate(&self, token: &str) -> Result<i64, TokenError> {
        validate_with_key(token, &self.decoding_key)
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}

/// JWT service
pub struct JwtService {
    access: TokenKeys,
    refresh: TokenKeys,
}

impl JwtService {
    pub fn new(access: TokenKeys, refresh: TokenKeys) -> Self {
        Self { access, refresh }
    }

    /// Create JWT service from config
    pub fn from_config(config: &SecurityConfig) -> Result<Self, TokenError> {
        let access = TokenKeys::from_base64_pem(
            config.access_token_private_key.expose_secret(),
            &config.access_token_public_key,
            config.access_token_expires_in_secs,
        )?;
        let refresh = TokenKeys::from_base64_pem(
            config.refresh_token_private_key.expose_secret(),
            &config.refresh_token_public_key,
            config.refresh_token_expires_in_secs,
        )?;

        Ok(Self::new(access, refresh))
    }

    /// Generate access token
    pub fn generate_access_token(&self, user_id: i64) -> Result<String, TokenError> {
        self.access.issue(user_id)
    }

    /// Generate refresh token
    pub fn generate_refresh_token(&self, user_id: i64) -> Result<String, TokenError> {
        self.refresh.issue(user_id)
    }

    /// Generate token pair
    pub fn generate_token_pair(&self, user_id: i64) -> Result<TokenPair, TokenError> {
        Ok(TokenPair {
            access_token: self.generate_access_token(user_id)?,
            refresh_token: self.generate_refresh_token(user_id)?,
            expires_in: self.access.ttl().num_seconds().max(0) as u64,
        })
    }

    /// Validate access token specifically
    pub fn validate_access_token(&self, token: &str) -> Result<i64, TokenError> {
        self.access.validate(token)
    }

    /// Validate refresh token specifically
    pub fn validate_refresh_token(&self, token: &str) -> Result<i64, TokenError> {
        self.refresh.validate(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ACCESS_PRIVATE: &str = include_str!("../../tests/fixtures/access_private.pem");
    const ACCESS_PUBLIC: &str = include_str!("../../tests/fixtures/access_public.pem");
    const REFRESH_PRIVATE: &str = include_str!("../../tests/fixtures/refresh_private.pem");
    const REFRESH_PUBLIC: &str = include_str!("../../tests/fixtures/refresh_public.pem");

    fn b64(pem: &str) -> String {
        STANDARD.encode(pem)
    }

    fn service() -> JwtService {
        JwtService::new(
            TokenKeys::from_base64_pem(&b64(ACCESS_PRIVATE), &b64(ACCESS_PUBLIC), 900).unwrap(),
            TokenKeys::from_base64_pem(&b64(REFRESH_PRIVATE), &b64(REFRESH_PUBLIC), 3600).unwrap(),
        )
    }

    #[test]
    fn test_issue_and_validate() {
        let token = issue(42, Duration::minutes(5), &b64(ACCESS_PRIVATE)).unwrap();
        assert_eq!(validate(&token, &b64(ACCESS_PUBLIC)).unwrap(), 42);
    }

    #[test]
    fn test_claims_shape() {
        let key = decode_private_key(&b64(ACCESS_PRIVATE)).unwrap();
        let now = Utc::now();
        let token = issue_at(7, now, Duration::seconds(120), &key).unwrap();

        let mut validation = Validation::new(TOKEN_ALGORITHM);
        validation.insecure_disable_signature_validation();
        let claims = decode::<Claims>(&token, &DecodingKey::from_secret(&[]), &validation)
            .unwrap()
            .claims;

        assert_eq!(claims.sub, "7");
        assert_eq!(claims.iat, now.timestamp());
        assert_eq!(claims.nbf, now.timestamp());
        assert_eq!(claims.exp, now.timestamp() + 120);
    }

    #[test]
    fn test_expired_token() {
        let key = decode_private_key(&b64(ACCESS_PRIVATE)).unwrap();
        let issued = Utc::now() - Duration::hours(2);
        let token = issue_at(1, issued, Duration::hours(1), &key).unwrap();

        assert_eq!(validate(&token, &b64(ACCESS_PUBLIC)), Err(TokenError::Expired));
    }

    #[test]
    fn test_not_yet_valid_token() {
        let key = decode_private_key(&b64(ACCESS_PRIVATE)).unwrap();
        let issued = Utc::now() + Duration::hours(1);
        let token = issue_at(1, issued, Duration::hours(1), &key).unwrap();

        assert_eq!(validate(&token, &b64(ACCESS_PUBLIC)), Err(TokenError::NotYetValid));
    }

    #[test]
    fn test_keys_are_not_interchangeable() {
        let service = service();

        let access = service.generate_access_token(3).unwrap();
        let refresh = service.generate_refresh_token(3).unwrap();

        assert_eq!(service.validate_refresh_token(&access), Err(TokenError::InvalidSignature));
        assert_eq!(service.validate_access_token(&refresh), Err(TokenError::InvalidSignature));
        assert_eq!(service.validate_access_token(&access).unwrap(), 3);
        assert_eq!(service.validate_refresh_token(&refresh).unwrap(), 3);
    }

    #[test]
    fn test_hmac_token_is_rejected() {
        // HS256 signed with the public key bytes must not pass as RS256
        let now = Utc::now().timestamp();
        let claims = Claims { sub: "1".to_string(), iat: now, nbf: now, exp: now + 600 };
        let forged = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(ACCESS_PUBLIC.as_bytes()),
        )
        .unwrap();

        assert_eq!(validate(&forged, &b64(ACCESS_PUBLIC)), Err(TokenError::AlgorithmMismatch));
    }

    #[test]
    fn test_garbage_token_is_malformed() {
        let result = validate("not.a.token", &b64(ACCESS_PUBLIC));
        assert!(matches!(result, Err(TokenError::Malformed(_))));
    }

    #[test]
    fn test_bad_key_material() {
        assert!(matches!(
            issue(1, Duration::minutes(1), "%%% not base64"),
            Err(TokenError::KeyDecode(_))
        ));
        assert!(matches!(
            issue(1, Duration::minutes(1), &b64("-----BEGIN NOTHING-----")),
            Err(TokenError::KeyDecode(_))
        ));
        assert!(matches!(validate("a.b.c", "%%%"), Err(TokenError::KeyDecode(_))));
    }

    #[test]
    fn test_token_pair_expires_in() {
        let pair = service().generate_token_pair(9).unwrap();
        assert_eq!(pair.expires_in, 900);
        assert_ne!(pair.access_token, pair.refresh_token);
    }
}
