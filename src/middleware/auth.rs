use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, Method},
    middleware::Next,
    response::Response,
};
use tracing::debug;

use crate::auth::{AuthError, Claims};
use crate::error::ApiError;
use crate::AppState;

/// Routes reachable without a bearer token
pub const PUBLIC_PATHS: &[&str] = &["/api/health", "/api/test/public"];

/// Authenticated caller extracted from a verified JWT
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub subject: String,
    pub role: Option<String>,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            subject: claims.sub,
            role: claims.role,
        }
    }
}

fn is_public(method: &Method, path: &str) -> bool {
    method == Method::OPTIONS || PUBLIC_PATHS.contains(&path.trim_end_matches('/'))
}

/// JWT authentication middleware that validates tokens and extracts user context
pub async fn jwt_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if is_public(request.method(), request.uri().path()) {
        return Ok(next.run(request).await);
    }

    let token = extract_jwt_from_headers(request.headers())?;
    let claims = state.verifier.verify(token).await?;

    // Convert claims to AuthUser and inject into request
    let user = AuthUser::from(claims);
    debug!(
        "Authenticated {} (role {})",
        user.subject,
        user.role.as_deref().unwrap_or("none")
    );
    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}

/// Extract JWT token from Authorization header
fn extract_jwt_from_headers(headers: &HeaderMap) -> Result<&str, AuthError> {
    let auth_str = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingToken)?
        .to_str()
        .map_err(|_| AuthError::MalformedHeader)?;

    match auth_str.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(token.trim()),
        _ => Err(AuthError::MalformedHeader),
    }
}
