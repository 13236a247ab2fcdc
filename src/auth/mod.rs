pub mod jwks;

use std::sync::Arc;

use async_trait::async_trait;
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::SecurityConfig;

pub use jwks::JwksKeySource;

/// Claims read from a verified bearer token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Missing Authorization header")]
    MissingToken,
    #[error("Authorization header must use Bearer token format")]
    MalformedHeader,
    #[error("Token verification is not configured")]
    NotConfigured,
    #[error("No signing key matches the token")]
    UnknownKey,
    #[error("Token algorithm {0:?} does not match the signing key")]
    AlgorithmMismatch(Algorithm),
    #[error("Key set unavailable: {0}")]
    KeySet(String),
    #[error("Invalid JWT token: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),
}

/// Algorithm family a verification key belongs to. A token is only checked
/// against keys of the family its header names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyFamily {
    Hmac,
    Rsa,
    EllipticCurve,
    EdDsa,
}

impl KeyFamily {
    pub fn allows(self, alg: Algorithm) -> bool {
        use Algorithm::*;
        match self {
            KeyFamily::Hmac => matches!(alg, HS256 | HS384 | HS512),
            KeyFamily::Rsa => matches!(alg, RS256 | RS384 | RS512 | PS256 | PS384 | PS512),
            KeyFamily::EllipticCurve => matches!(alg, ES256 | ES384),
            KeyFamily::EdDsa => matches!(alg, EdDSA),
        }
    }
}

#[derive(Clone)]
pub struct VerificationKey {
    pub key: DecodingKey,
    pub family: KeyFamily,
}

/// Where verification keys come from
#[async_trait]
pub trait KeySource: Send + Sync {
    async fn resolve(&self, kid: Option<&str>) -> Result<VerificationKey, AuthError>;
}

/// Single HMAC secret shared with the token issuer
pub struct SharedSecret {
    key: DecodingKey,
}

impl SharedSecret {
    pub fn new(secret: &str) -> Self {
        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
        }
    }
}

#[async_trait]
impl KeySource for SharedSecret {
    async fn resolve(&self, _kid: Option<&str>) -> Result<VerificationKey, AuthError> {
        Ok(VerificationKey {
            key: self.key.clone(),
            family: KeyFamily::Hmac,
        })
    }
}

/// Bearer token verifier: signature, expiry, subject, issuer and optional audience
#[derive(Clone)]
pub struct JwtVerifier {
    keys: Option<Arc<dyn KeySource>>,
    issuer: Option<String>,
    audience: Option<String>,
}

impl JwtVerifier {
    pub fn new(keys: Arc<dyn KeySource>) -> Self {
        Self {
            keys: Some(keys),
            issuer: None,
            audience: None,
        }
    }

    /// Verifier that rejects every token
    pub fn disabled() -> Self {
        Self {
            keys: None,
            issuer: None,
            audience: None,
        }
    }

    pub fn with_issuer(mut self, issuer: Option<String>) -> Self {
        self.issuer = issuer;
        self
    }

    pub fn with_audience(mut self, audience: Option<String>) -> Self {
        self.audience = audience;
        self
    }

    /// Build from configuration. A key set URL takes precedence over a shared secret.
    pub fn from_config(security: &SecurityConfig) -> Result<Self, AuthError> {
        let keys: Arc<dyn KeySource> = if let Some(url) = &security.jwks_url {
            Arc::new(JwksKeySource::new(url.clone())?)
        } else if let Some(secret) = &security.jwt_secret {
            Arc::new(SharedSecret::new(secret))
        } else {
            warn!("Neither JWKS_URL nor JWT_SECRET is set; protected routes will reject every request");
            return Ok(Self::disabled());
        };

        Ok(Self::new(keys)
            .with_issuer(security.expected_issuer())
            .with_audience(security.jwt_audience.clone()))
    }

    pub async fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let keys = self.keys.as_ref().ok_or(AuthError::NotConfigured)?;

        let header = decode_header(token)?;
        let key = keys.resolve(header.kid.as_deref()).await?;
        if !key.family.allows(header.alg) {
            return Err(AuthError::AlgorithmMismatch(header.alg));
        }

        let mut validation = Validation::new(header.alg);
        validation.set_required_spec_claims(&["exp", "sub"]);
        if let Some(issuer) = &self.issuer {
            validation.set_issuer(&[issuer]);
        }
        match &self.audience {
            Some(audience) => validation.set_audience(&[audience]),
            None => validation.validate_aud = false,
        }

        let token_data = decode::<Claims>(token, &key.key, &validation)?;
        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde_json::json;

    const SECRET: &str = "unit-test-secret";
    const ISSUER: &str = "https://issuer.test/auth/v1";

    fn sign(claims: &serde_json::Value, secret: &str) -> String {
        encode(&Header::default(), claims, &EncodingKey::from_secret(secret.as_bytes())).unwrap()
    }

    fn verifier() -> JwtVerifier {
        JwtVerifier::new(Arc::new(SharedSecret::new(SECRET))).with_issuer(Some(ISSUER.to_string()))
    }

    fn claims(exp_offset: Duration) -> serde_json::Value {
        json!({
            "sub": "user-123",
            "iss": ISSUER,
            "aud": "authenticated",
            "exp": (Utc::now() + exp_offset).timestamp(),
        })
    }

    #[tokio::test]
    async fn accepts_valid_token() {
        let token = sign(&claims(Duration::hours(1)), SECRET);
        let verified = verifier().verify(&token).await.unwrap();
        assert_eq!(verified.sub, "user-123");
    }

    #[tokio::test]
    async fn rejects_expired_wrong_key_and_wrong_issuer() {
        let expired = sign(&claims(Duration::hours(-2)), SECRET);
        assert!(matches!(verifier().verify(&expired).await, Err(AuthError::InvalidToken(_))));

        let forged = sign(&claims(Duration::hours(1)), "another-secret");
        assert!(matches!(verifier().verify(&forged).await, Err(AuthError::InvalidToken(_))));

        let mut foreign = claims(Duration::hours(1));
        foreign["iss"] = json!("https://elsewhere.test");
        let foreign = sign(&foreign, SECRET);
        assert!(matches!(verifier().verify(&foreign).await, Err(AuthError::InvalidToken(_))));
    }

    #[tokio::test]
    async fn enforces_audience_when_configured() {
        let token = sign(&claims(Duration::hours(1)), SECRET);

        let strict = verifier().with_audience(Some("service_role".to_string()));
        assert!(strict.verify(&token).await.is_err());

        let matching = verifier().with_audience(Some("authenticated".to_string()));
        assert!(matching.verify(&token).await.is_ok());
    }

    #[tokio::test]
    async fn disabled_verifier_rejects_everything() {
        let token = sign(&claims(Duration::hours(1)), SECRET);
        assert!(matches!(
            JwtVerifier::disabled().verify(&token).await,
            Err(AuthError::NotConfigured)
        ));
    }

    #[test]
    fn key_families_gate_algorithms() {
        assert!(KeyFamily::Hmac.allows(Algorithm::HS256));
        assert!(!KeyFamily::Hmac.allows(Algorithm::RS256));
        assert!(KeyFamily::Rsa.allows(Algorithm::PS256));
        assert!(KeyFamily::EllipticCurve.allows(Algorithm::ES256));
        assert!(!KeyFamily::EdDsa.allows(Algorithm::ES256));
    }
}
