#![allow(dead_code)]

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::json;

use news_api::auth::{JwtVerifier, SharedSecret};
use news_api::config::AppConfig;
use news_api::database::MemoryNewsStore;
use news_api::services::NewsService;
use news_api::{app, AppState};

pub const SECRET: &str = "news-api-test-signing-secret-0001";
/// SECRET encoded for a JWK `k` member
pub const SECRET_B64: &str = "bmV3cy1hcGktdGVzdC1zaWduaW5nLXNlY3JldC0wMDAx";
pub const ISSUER: &str = "https://auth.news-api.test/auth/v1";

pub struct TestServer {
    pub base_url: String,
    pub client: reqwest::Client,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Request builder carrying a valid bearer token
    pub fn authed(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        self.client
            .request(method, self.url(path))
            .bearer_auth(token_for("user-123"))
    }
}

/// Serve `router` on a free local port for the lifetime of the test runtime
pub async fn serve(router: Router) -> Result<String> {
    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
        .await
        .context("failed to bind test listener")?;

    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });

    Ok(format!("http://127.0.0.1:{}", port))
}

pub async fn spawn_with_verifier(verifier: JwtVerifier) -> Result<TestServer> {
    let news = NewsService::new(Arc::new(MemoryNewsStore::new()));
    let origins = AppConfig::development().security.cors_origins;
    let base_url = serve(app(AppState::new(news, verifier), &origins)).await?;

    Ok(TestServer {
        base_url,
        client: reqwest::Client::new(),
    })
}

/// Fresh server with an empty in-memory store and shared-secret verification
pub async fn spawn_server() -> Result<TestServer> {
    let verifier = JwtVerifier::new(Arc::new(SharedSecret::new(SECRET)))
        .with_issuer(Some(ISSUER.to_string()));
    spawn_with_verifier(verifier).await
}

pub fn sign(header: &Header, claims: &serde_json::Value, secret: &str) -> String {
    encode(header, claims, &EncodingKey::from_secret(secret.as_bytes())).expect("token encodes")
}

pub fn claims_for(subject: &str, issuer: &str) -> serde_json::Value {
    json!({
        "sub": subject,
        "iss": issuer,
        "aud": "authenticated",
        "role": "authenticated",
        "iat": Utc::now().timestamp(),
        "exp": (Utc::now() + Duration::hours(1)).timestamp(),
    })
}

pub fn token_for(subject: &str) -> String {
    sign(&Header::default(), &claims_for(subject, ISSUER), SECRET)
}
