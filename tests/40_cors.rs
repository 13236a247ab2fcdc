mod common;

use anyhow::Result;
use reqwest::{header, Method, StatusCode};

#[tokio::test]
async fn preflight_from_allowed_origin_is_answered() -> Result<()> {
    let server = common::spawn_server().await?;

    let res = server
        .client
        .request(Method::OPTIONS, server.url("/api/news"))
        .header(header::ORIGIN, "http://localhost:8100")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "authorization,content-type")
        .send()
        .await?;

    assert!(res.status().is_success(), "preflight status {}", res.status());
    let headers = res.headers();
    assert_eq!(
        headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).and_then(|v| v.to_str().ok()),
        Some("http://localhost:8100")
    );
    assert_eq!(
        headers.get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS).and_then(|v| v.to_str().ok()),
        Some("true")
    );
    let allowed_methods = headers
        .get(header::ACCESS_CONTROL_ALLOW_METHODS)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    assert!(allowed_methods.contains("POST"));
    Ok(())
}

#[tokio::test]
async fn unknown_origin_gets_no_allow_header() -> Result<()> {
    let server = common::spawn_server().await?;

    let res = server
        .client
        .request(Method::OPTIONS, server.url("/api/news"))
        .header(header::ORIGIN, "https://evil.example")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
        .send()
        .await?;

    assert!(res.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
    Ok(())
}

#[tokio::test]
async fn simple_requests_carry_cors_headers() -> Result<()> {
    let server = common::spawn_server().await?;

    let res = server
        .authed(Method::GET, "/api/news")
        .header(header::ORIGIN, "capacitor://localhost")
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        res.headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .and_then(|v| v.to_str().ok()),
        Some("capacitor://localhost")
    );
    Ok(())
}
