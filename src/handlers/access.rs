use axum::Extension;

use crate::middleware::auth::AuthUser;

/// GET /api/test/public
pub async fn public_endpoint() -> &'static str {
    "Public endpoint OK"
}

/// GET /api/test/protected - echoes the token subject
pub async fn protected_endpoint(Extension(user): Extension<AuthUser>) -> String {
    format!("Access granted. sub={}", user.subject)
}
