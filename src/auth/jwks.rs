use std::time::{Duration, Instant};

use async_trait::async_trait;
use jsonwebtoken::jwk::{AlgorithmParameters, Jwk, JwkSet};
use jsonwebtoken::DecodingKey;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};

use super::{AuthError, KeyFamily, KeySource, VerificationKey};

const FETCH_TIMEOUT: Duration = Duration::from_secs(10);
const MIN_REFRESH_INTERVAL: Duration = Duration::from_secs(30);

#[derive(Default)]
struct CachedKeys {
    set: Option<JwkSet>,
    /// Start of the last fetch, successful or not
    attempted_at: Option<Instant>,
}

impl CachedKeys {
    /// `Ok(None)` means a refetch is due. A miss inside the refresh interval
    /// is final, even when the last fetch failed.
    fn lookup(&self, kid: Option<&str>) -> Result<Option<VerificationKey>, AuthError> {
        if let Some(set) = &self.set {
            if let Some(key) = select(set, kid)? {
                return Ok(Some(key));
            }
        }
        if self
            .attempted_at
            .is_some_and(|at| at.elapsed() < MIN_REFRESH_INTERVAL)
        {
            debug!("Key {:?} not in recently fetched set", kid);
            return Err(AuthError::UnknownKey);
        }
        Ok(None)
    }
}

/// Keys published at a JWKS endpoint. The set is fetched lazily and refetched
/// when a token names a key id the cached set lacks.
pub struct JwksKeySource {
    url: String,
    client: reqwest::Client,
    cache: RwLock<CachedKeys>,
    refresh: Mutex<()>,
}

impl JwksKeySource {
    pub fn new(url: impl Into<String>) -> Result<Self, AuthError> {
        let client = reqwest::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()
            .map_err(|e| AuthError::KeySet(e.to_string()))?;

        Ok(Self {
            url: url.into(),
            client,
            cache: RwLock::new(CachedKeys::default()),
            refresh: Mutex::new(()),
        })
    }

    async fn fetch(&self) -> Result<JwkSet, AuthError> {
        let set = self
            .client
            .get(&self.url)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|e| AuthError::KeySet(e.to_string()))?
            .json::<JwkSet>()
            .await
            .map_err(|e| AuthError::KeySet(e.to_string()))?;

        info!("Fetched {} signing keys from {}", set.keys.len(), self.url);
        Ok(set)
    }
}

fn key_family(jwk: &Jwk) -> KeyFamily {
    match jwk.algorithm {
        AlgorithmParameters::RSA(_) => KeyFamily::Rsa,
        AlgorithmParameters::EllipticCurve(_) => KeyFamily::EllipticCurve,
        AlgorithmParameters::OctetKey(_) => KeyFamily::Hmac,
        AlgorithmParameters::OctetKeyPair(_) => KeyFamily::EdDsa,
    }
}

/// Pick the key for `kid`. Without a kid, only an unambiguous single-key set matches.
fn select(set: &JwkSet, kid: Option<&str>) -> Result<Option<VerificationKey>, AuthError> {
    let jwk = match kid {
        Some(kid) => set.find(kid),
        None if set.keys.len() == 1 => set.keys.first(),
        None => None,
    };

    jwk.map(|jwk| {
        let key = DecodingKey::from_jwk(jwk).map_err(|e| AuthError::KeySet(e.to_string()))?;
        Ok(VerificationKey {
            key,
            family: key_family(jwk),
        })
    })
    .transpose()
}

#[async_trait]
impl KeySource for JwksKeySource {
    async fn resolve(&self, kid: Option<&str>) -> Result<VerificationKey, AuthError> {
        if let Some(key) = self.cache.read().await.lookup(kid)? {
            return Ok(key);
        }

        // One fetch at a time; callers queued behind it re-check its outcome
        let _refresh = self.refresh.lock().await;
        if let Some(key) = self.cache.read().await.lookup(kid)? {
            return Ok(key);
        }

        self.cache.write().await.attempted_at = Some(Instant::now());
        let set = self.fetch().await?;
        let key = select(&set, kid)?;
        self.cache.write().await.set = Some(set);

        key.ok_or(AuthError::UnknownKey)
    }
}
