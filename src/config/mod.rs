use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// PostgreSQL URL. Without one the service keeps news in memory.
    pub url: Option<String>,
    pub max_connections: u32,
    pub connection_timeout: u64,
    pub seed_sample_data: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub cors_origins: Vec<String>,
    pub jwks_url: Option<String>,
    pub jwt_secret: Option<String>,
    pub jwt_issuer: Option<String>,
    pub jwt_audience: Option<String>,
}

const JWKS_WELL_KNOWN_SUFFIX: &str = "/.well-known/jwks.json";

impl SecurityConfig {
    /// Expected `iss` claim. Falls back to the key set URL without its
    /// well-known suffix, which is how Supabase lays out its auth endpoints.
    pub fn expected_issuer(&self) -> Option<String> {
        if let Some(issuer) = &self.jwt_issuer {
            return Some(issuer.clone());
        }
        let jwks_url = self.jwks_url.as_deref()?;
        let issuer = jwks_url
            .strip_suffix(JWKS_WELL_KNOWN_SUFFIX)
            .unwrap_or(jwks_url);
        Some(issuer.to_string())
    }
}

fn default_cors_origins() -> Vec<String> {
    [
        "http://localhost:8100",
        "http://localhost:4200",
        "capacitor://localhost",
        "ionic://localhost",
        "http://localhost",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Server overrides
        if let Some(port) = env::var("NEWS_API_PORT")
            .ok()
            .or_else(|| env::var("PORT").ok())
            .and_then(|s| s.parse::<u16>().ok())
        {
            self.server.port = port;
        }
        if let Ok(v) = env::var("NEWS_API_HOST") {
            self.server.host = v;
        }

        // Database overrides
        if let Ok(v) = env::var("DATABASE_URL") {
            self.database.url = non_empty(v);
        }
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = v.parse().unwrap_or(self.database.connection_timeout);
        }
        if let Ok(v) = env::var("NEWS_SEED_SAMPLE_DATA") {
            self.database.seed_sample_data = v.parse().unwrap_or(self.database.seed_sample_data);
        }

        // Security overrides
        if let Ok(v) = env::var("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }
        if let Ok(v) = env::var("JWKS_URL") {
            self.security.jwks_url = non_empty(v);
        }
        if let Ok(v) = env::var("JWT_SECRET") {
            self.security.jwt_secret = non_empty(v);
        }
        if let Ok(v) = env::var("JWT_ISSUER") {
            self.security.jwt_issuer = non_empty(v);
        }
        if let Ok(v) = env::var("JWT_AUDIENCE") {
            self.security.jwt_audience = non_empty(v);
        }

        self
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
            },
            database: DatabaseConfig {
                url: None,
                max_connections: 10,
                connection_timeout: 30,
                seed_sample_data: true,
            },
            security: SecurityConfig {
                cors_origins: default_cors_origins(),
                jwks_url: None,
                jwt_secret: None,
                jwt_issuer: None,
                jwt_audience: None,
            },
        }
    }

    fn staging() -> Self {
        let dev = Self::development();
        Self {
            environment: Environment::Staging,
            database: DatabaseConfig {
                max_connections: 20,
                connection_timeout: 10,
                seed_sample_data: false,
                ..dev.database
            },
            ..dev
        }
    }

    fn production() -> Self {
        let dev = Self::development();
        Self {
            environment: Environment::Production,
            database: DatabaseConfig {
                max_connections: 50,
                connection_timeout: 5,
                seed_sample_data: false,
                ..dev.database
            },
            security: SecurityConfig {
                cors_origins: Vec::new(),
                ..dev.security
            },
            ..dev
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}
