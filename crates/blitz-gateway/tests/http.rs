//! End-to-end tests of the HTTP surface.

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use blitz_core::{AuthConfig, AuthUser, BlitzConfig, UserRole};
use blitz_gateway::routes::create_router;
use blitz_gateway::{AppState, StaticConfigStore};
use blitz_token::{SecretKey, TokenCodec};
use std::collections::HashMap;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

struct Harness {
    router: Router,
    codec: TokenCodec,
    uploads: TempDir,
}

fn user(name: &str, password: &str, role: UserRole) -> AuthUser {
    AuthUser {
        username: name.to_string(),
        password: Some(password.to_string()),
        password_env: None,
        role,
    }
}

fn harness() -> Harness {
    let uploads = tempfile::tempdir().unwrap();

    let mut config = BlitzConfig::default();
    config.uploads.base_dir = uploads.path().to_path_buf();
    config.uploads.max_size_bytes = 64;
    config.auth = AuthConfig {
        users: vec![
            user("admin", "s3cret", UserRole::Admin),
            user("alice", "wonderland", UserRole::User),
        ],
    };

    let store = StaticConfigStore::new(HashMap::from([(
        "flag".to_string(),
        "FLAG{padding_oracles_are_fun}".to_string(),
    )]));
    let state = AppState::with_parts(&config, SecretKey::development(), Arc::new(store));

    Harness {
        router: create_router(state),
        codec: TokenCodec::new(SecretKey::development()),
        uploads,
    }
}

async fn login(router: &Router, username: &str, password: &str) -> Option<String> {
    let request = Request::builder()
        .method("POST")
        .uri("/login")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(format!("username={username}&password={password}")))
        .unwrap();
    let response = router.clone().oneshot(request).await.unwrap();
    if response.status() != StatusCode::NO_CONTENT {
        return None;
    }

    let set_cookie = response.headers().get(header::SET_COOKIE)?.to_str().ok()?;
    set_cookie.split(';').next().map(str::to_string)
}

async fn get(router: &Router, uri: &str, cookie: Option<&str>) -> (StatusCode, Option<String>, Vec<u8>) {
    let mut builder = Request::builder().uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    let response = router
        .clone()
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, content_type, body.to_vec())
}

#[tokio::test]
async fn test_healthz() {
    let h = harness();
    let (status, _, body) = get(&h.router, "/healthz", None).await;
    assert_eq!(status, StatusCode::OK);

    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["ok"], true);
    assert_eq!(json["service"], "blitz-gateway");
}

#[tokio::test]
async fn test_view_forbidden_without_admin_session() {
    let h = harness();

    let (status, _, body) = get(&h.router, "/view?id=!!!not-base64!!!", None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body, b"Forbidden");

    let cookie = login(&h.router, "alice", "wonderland").await.unwrap();
    let (status, _, _) = get(&h.router, "/view?id=AAAA", Some(&cookie)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Forbidden even without an id at all.
    let (status, _, _) = get(&h.router, "/view", None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_login_rejects_bad_credentials() {
    let h = harness();
    assert!(login(&h.router, "admin", "wrong").await.is_none());
    assert!(login(&h.router, "nobody", "s3cret").await.is_none());
}

#[tokio::test]
async fn test_admin_views_files() {
    let h = harness();
    std::fs::write(h.uploads.path().join("invoice.PDF"), b"%PDF-1.4 fake").unwrap();
    std::fs::write(h.uploads.path().join("notes.txt"), "hello, world").unwrap();
    std::fs::write(h.uploads.path().join("blob.bin"), [0xffu8, 0xfe, 0x00]).unwrap();

    let cookie = login(&h.router, "admin", "s3cret").await.unwrap();
    assert!(cookie.starts_with("blitz_session="));

    let uri = format!("/view?id={}", h.codec.encode("invoice.PDF"));
    let (status, content_type, body) = get(&h.router, &uri, Some(&cookie)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("application/pdf"));
    assert_eq!(body, b"%PDF-1.4 fake");

    let uri = format!("/view?id={}", h.codec.encode("notes.txt"));
    let (status, content_type, body) = get(&h.router, &uri, Some(&cookie)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(content_type.unwrap().starts_with("text/plain"));
    assert_eq!(body, b"hello, world");

    let uri = format!("/view?id={}", h.codec.encode("blob.bin"));
    let (_, content_type, _) = get(&h.router, &uri, Some(&cookie)).await;
    assert_eq!(content_type.as_deref(), Some("application/octet-stream"));
}

#[tokio::test]
async fn test_decode_errors_are_returned_as_content() {
    let h = harness();
    let cookie = login(&h.router, "admin", "s3cret").await.unwrap();

    let (status, content_type, body) =
        get(&h.router, "/view?id=!!!not-base64!!!", Some(&cookie)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(content_type.unwrap().starts_with("text/plain"));
    assert_eq!(body, b"invalid encoding");

    let (status, _, body) = get(&h.router, "/view?id=AAAA", Some(&cookie)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"invalid ciphertext length");
}

#[tokio::test]
async fn test_decoy_reference_serves_configuration_value() {
    let h = harness();
    let cookie = login(&h.router, "admin", "s3cret").await.unwrap();

    let uri = format!("/view?id={}", h.codec.encode("../../flag.txt"));
    let (status, _, body) = get(&h.router, &uri, Some(&cookie)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"FLAG{padding_oracles_are_fun}");
}

#[tokio::test]
async fn test_missing_file_and_missing_id() {
    let h = harness();
    let cookie = login(&h.router, "admin", "s3cret").await.unwrap();

    let uri = format!("/view?id={}", h.codec.encode("nope.pdf"));
    let (status, _, body) = get(&h.router, &uri, Some(&cookie)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, b"File not found");

    let (status, _, _) = get(&h.router, "/view", Some(&cookie)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _, _) = get(&h.router, "/view?id=", Some(&cookie)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_upload_then_view() {
    let h = harness();

    let upload = |cookie: Option<String>| {
        let mut builder = Request::builder()
            .method("POST")
            .uri("/attachments?filename=My%20Resume.pdf");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder.body(Body::from("%PDF-1.7 resume")).unwrap()
    };

    let response = h.router.clone().oneshot(upload(None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let user_cookie = login(&h.router, "alice", "wonderland").await.unwrap();
    let response = h
        .router
        .clone()
        .oneshot(upload(Some(user_cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let receipt: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(receipt["original_name"], "My_Resume.pdf");
    assert_eq!(receipt["size"], 15);
    let view_url = receipt["view_url"].as_str().unwrap().to_string();
    assert!(h.uploads.path().join("My_Resume.pdf").exists());

    let admin_cookie = login(&h.router, "admin", "s3cret").await.unwrap();
    let (status, content_type, body) = get(&h.router, &view_url, Some(&admin_cookie)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("application/pdf"));
    assert_eq!(body, b"%PDF-1.7 resume");
}

#[tokio::test]
async fn test_upload_rejects_disallowed_type() {
    let h = harness();
    let cookie = login(&h.router, "admin", "s3cret").await.unwrap();

    let request = Request::builder()
        .method("POST")
        .uri("/attachments?filename=shell.php")
        .header(header::COOKIE, cookie)
        .body(Body::from("<?php"))
        .unwrap();
    let response = h.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_logout_ends_session() {
    let h = harness();
    std::fs::write(h.uploads.path().join("notes.txt"), "hi").unwrap();
    let cookie = login(&h.router, "admin", "s3cret").await.unwrap();
    let uri = format!("/view?id={}", h.codec.encode("notes.txt"));

    let (status, _, _) = get(&h.router, &uri, Some(&cookie)).await;
    assert_eq!(status, StatusCode::OK);

    let request = Request::builder()
        .method("POST")
        .uri("/logout")
        .header(header::COOKIE, &cookie)
        .body(Body::empty())
        .unwrap();
    let response = h.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let cleared = response.headers().get(header::SET_COOKIE).unwrap();
    assert!(cleared.to_str().unwrap().contains("Max-Age=0"));

    let (status, _, _) = get(&h.router, &uri, Some(&cookie)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_upload_checks_session_before_request_shape() {
    let h = harness();

    // No filename and an oversized body: still a 401 for anonymous callers.
    let request = Request::builder()
        .method("POST")
        .uri("/attachments")
        .body(Body::from(vec![b'x'; 1024]))
        .unwrap();
    let response = h.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let cookie = login(&h.router, "alice", "wonderland").await.unwrap();

    let request = Request::builder()
        .method("POST")
        .uri("/attachments?filename=big.pdf")
        .header(header::COOKIE, &cookie)
        .body(Body::from(vec![b'x'; 1024]))
        .unwrap();
    let response = h.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert!(!h.uploads.path().join("big.pdf").exists());

    let request = Request::builder()
        .method("POST")
        .uri("/attachments")
        .header(header::COOKIE, &cookie)
        .body(Body::from("%PDF"))
        .unwrap();
    let response = h.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
