//! Integration tests: build the router over a seeded store and a temporary
//! static root, drive it with `oneshot`, assert statuses, bodies and cookies.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE, COOKIE, SET_COOKIE};
use axum::http::{Request, Response, StatusCode};
use chrono::{Duration, Utc};
use portal_api::{AppState, config::ApiConfig};
use portal_core::auth::jwt::issue_session_token_at;
use portal_core::auth::password::hash_password_with_cost;
use portal_core::auth::store::MemoryUserStore;
use portal_core::models::auth::{Identity, User};
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;

const SECRET: &str = "integration-test-secret";

fn static_root() -> TempDir {
    let dir = tempfile::tempdir().expect("tempdir");
    let public = dir.path().join("public");
    let protected = dir.path().join("protected");
    std::fs::create_dir_all(public.join("pages")).unwrap();
    std::fs::create_dir_all(public.join("components")).unwrap();
    std::fs::create_dir_all(protected.join("pages")).unwrap();
    std::fs::write(public.join("index.html"), "<html><body>shell</body></html>").unwrap();
    std::fs::write(
        public.join("pages/home.html"),
        r#"<div class="page">home</div>"#,
    )
    .unwrap();
    std::fs::write(
        protected.join("pages/dashboard.html"),
        r#"<div class="page">secret dashboard</div>"#,
    )
    .unwrap();
    std::fs::write(public.join("components/header.html"), "<nav>public</nav>").unwrap();
    dir
}

fn state() -> (AppState, TempDir) {
    let dir = static_root();

    let mut store = MemoryUserStore::new();
    store
        .insert(
            User {
                id: 7,
                email: "a@b.com".into(),
                name: "Ada".into(),
            },
            hash_password_with_cost("correct horse", 4).unwrap(),
        )
        .unwrap();

    let mut config = ApiConfig::new(SECRET).unwrap();
    config.static_dir = dir.path().to_path_buf();

    let state = AppState {
        store: Arc::new(store),
        config,
    };
    (state, dir)
}

fn app() -> (Router, TempDir) {
    let (state, dir) = state();
    (portal_api::router(state), dir)
}

fn login_request(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/login")
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn get_with_cookie(uri: &str, cookie: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(COOKIE, cookie)
        .body(Body::empty())
        .unwrap()
}

async fn body_json(resp: Response<Body>) -> Value {
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("parse JSON")
}

async fn body_text(resp: Response<Body>) -> String {
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("read body");
    String::from_utf8(body.to_vec()).expect("utf-8 body")
}

fn set_cookie(resp: &Response<Body>) -> String {
    resp.headers()
        .get(SET_COOKIE)
        .expect("Set-Cookie header")
        .to_str()
        .unwrap()
        .to_string()
}

/// `name=value` part of a Set-Cookie header, usable as a Cookie header.
fn cookie_pair(set_cookie: &str) -> String {
    set_cookie.split(';').next().unwrap().trim().to_string()
}

async fn login_cookie(app: &Router, remember: bool) -> String {
    let resp = app
        .clone()
        .oneshot(login_request(json!({
            "email": "a@b.com",
            "password": "correct horse",
            "remember": remember
        })))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    cookie_pair(&set_cookie(&resp))
}

#[tokio::test]
async fn login_sets_session_cookie_and_returns_user() {
    let (app, _dir) = app();

    let resp = app
        .oneshot(login_request(json!({"email": "a@b.com", "password": "correct horse"})))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let cookie = set_cookie(&resp);
    assert!(cookie.starts_with("token="), "cookie: {cookie}");
    assert!(cookie.contains("HttpOnly"), "cookie: {cookie}");
    assert!(cookie.contains("SameSite=Strict"), "cookie: {cookie}");
    assert!(cookie.contains("Max-Age=3600"), "cookie: {cookie}");
    assert!(!cookie.contains("Secure"), "cookie: {cookie}");

    let json = body_json(resp).await;
    assert_eq!(
        json,
        json!({
            "success": true,
            "user": {"id": 7, "email": "a@b.com", "name": "Ada"},
            "redirect": "/dashboard"
        })
    );
}

#[tokio::test]
async fn remember_me_extends_cookie_lifetime() {
    let (app, _dir) = app();
    let resp = app
        .oneshot(login_request(json!({
            "email": "a@b.com",
            "password": "correct horse",
            "remember": true
        })))
        .await
        .unwrap();
    assert!(set_cookie(&resp).contains("Max-Age=604800"));
}

#[tokio::test]
async fn wrong_password_and_unknown_email_are_indistinguishable() {
    let (app, _dir) = app();

    let wrong = app
        .clone()
        .oneshot(login_request(json!({"email": "a@b.com", "password": "nope"})))
        .await
        .unwrap();
    let unknown = app
        .oneshot(login_request(json!({"email": "who@b.com", "password": "nope"})))
        .await
        .unwrap();

    assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(unknown.status(), StatusCode::UNAUTHORIZED);
    assert!(wrong.headers().get(SET_COOKIE).is_none());

    let wrong = body_json(wrong).await;
    let unknown = body_json(unknown).await;
    assert_eq!(wrong, unknown);
    assert_eq!(wrong["error"], "Invalid credentials");
    assert_eq!(wrong["success"], false);
}

#[tokio::test]
async fn malformed_login_body_is_rejected() {
    let (app, _dir) = app();

    let missing_field = app
        .clone()
        .oneshot(login_request(json!({"email": "a@b.com"})))
        .await
        .unwrap();
    assert_eq!(missing_field.status(), StatusCode::BAD_REQUEST);

    let bad_email = app
        .oneshot(login_request(json!({"email": "nope", "password": "x"})))
        .await
        .unwrap();
    assert_eq!(bad_email.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(bad_email).await["code"], "validation_error");
}

#[tokio::test]
async fn validate_token_distinguishes_missing_from_invalid() {
    let (app, _dir) = app();

    let missing = app
        .clone()
        .oneshot(get("/api/validate-token"))
        .await
        .unwrap();
    assert_eq!(missing.status(), StatusCode::UNAUTHORIZED);

    let invalid = app
        .oneshot(get_with_cookie("/api/validate-token", "token=garbage"))
        .await
        .unwrap();
    assert_eq!(invalid.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn validate_token_accepts_cookie_and_returns_identity() {
    let (app, _dir) = app();
    let cookie = login_cookie(&app, false).await;

    let resp = app
        .oneshot(get_with_cookie("/api/validate-token", &cookie))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        body_json(resp).await,
        json!({"valid": true, "user": {"id": 7, "email": "a@b.com"}})
    );
}

#[tokio::test]
async fn validate_token_accepts_bearer_header() {
    let (app, _dir) = app();
    let cookie = login_cookie(&app, false).await;
    let token = cookie.trim_start_matches("token=");

    let resp = app
        .oneshot(
            Request::builder()
                .uri("/api/validate-token")
                .header(AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn expired_token_is_forbidden() {
    let (app, _dir) = app();
    let identity = Identity {
        id: 7,
        email: "a@b.com".into(),
    };
    let token = issue_session_token_at(
        &identity,
        Duration::hours(1),
        SECRET.as_bytes(),
        Utc::now() - Duration::seconds(3601),
    )
    .unwrap();

    let resp = app
        .oneshot(get_with_cookie("/api/validate-token", &format!("token={token}")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(resp).await["code"], "forbidden");
}

#[tokio::test]
async fn logout_clears_cookie_so_validation_reports_missing() {
    let (app, _dir) = app();
    let session = login_cookie(&app, false).await;

    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/logout")
                .header(COOKIE, &session)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let cleared = set_cookie(&resp);
    assert!(cleared.starts_with("token=;"), "cookie: {cleared}");
    assert!(cleared.contains("Max-Age=0"), "cookie: {cleared}");
    assert_eq!(body_json(resp).await, json!({"success": true}));

    // The browser now holds the emptied cookie.
    let resp = app
        .oneshot(get_with_cookie("/api/validate-token", &cookie_pair(&cleared)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn logout_without_cookie_still_succeeds() {
    let (app, _dir) = app();
    let resp = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/logout")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn user_and_dashboard_require_session() {
    let (app, _dir) = app();

    let anonymous = app.clone().oneshot(get("/api/user")).await.unwrap();
    assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);

    let cookie = login_cookie(&app, false).await;

    let user = app
        .clone()
        .oneshot(get_with_cookie("/api/user", &cookie))
        .await
        .unwrap();
    assert_eq!(user.status(), StatusCode::OK);
    assert_eq!(
        body_json(user).await,
        json!({"id": 7, "email": "a@b.com", "name": "Ada"})
    );

    let dashboard = app
        .oneshot(get_with_cookie("/api/dashboard", &cookie))
        .await
        .unwrap();
    assert_eq!(dashboard.status(), StatusCode::OK);
    let json = body_json(dashboard).await;
    assert_eq!(json["user"], json!({"id": 7, "email": "a@b.com"}));
    assert!(json["message"].is_string());
}

#[tokio::test]
async fn protected_page_fragments_are_gated() {
    let (app, _dir) = app();

    let anonymous = app
        .clone()
        .oneshot(get("/pages/dashboard.html"))
        .await
        .unwrap();
    assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);

    let cookie = login_cookie(&app, false).await;
    let authed = app
        .oneshot(get_with_cookie("/pages/dashboard.html", &cookie))
        .await
        .unwrap();
    assert_eq!(authed.status(), StatusCode::OK);
    assert!(body_text(authed).await.contains("secret dashboard"));
}

#[tokio::test]
async fn protected_pages_are_not_reachable_through_path_variants() {
    let (app, _dir) = app();

    for uri in [
        "/pages/%64ashboard.html",
        "/pages/dashboard%2Ehtml",
        "/pages//dashboard.html",
        "/pages/./dashboard.html",
        "//pages/dashboard.html",
        "/protected/pages/dashboard.html",
        "/pages/../protected/pages/dashboard.html",
    ] {
        let resp = app.clone().oneshot(get(uri)).await.unwrap();
        let status = resp.status();
        let body = body_text(resp).await;
        assert!(
            !body.contains("secret dashboard"),
            "{uri} leaked the page with status {status}"
        );
    }
}

#[tokio::test]
async fn public_fragments_and_shell_fallback_are_served() {
    let (app, _dir) = app();

    let page = app.clone().oneshot(get("/pages/home.html")).await.unwrap();
    assert_eq!(page.status(), StatusCode::OK);
    assert!(body_text(page).await.contains(r#"class="page""#));

    let header = app
        .clone()
        .oneshot(get("/components/header.html"))
        .await
        .unwrap();
    assert_eq!(header.status(), StatusCode::OK);

    let deep_link = app.oneshot(get("/profile/settings")).await.unwrap();
    assert_eq!(deep_link.status(), StatusCode::OK);
    assert!(body_text(deep_link).await.contains("shell"));
}

async fn panicking_handler() -> &'static str {
    panic!("database password is hunter2")
}

async fn slow_handler() -> &'static str {
    tokio::time::sleep(std::time::Duration::from_secs(30)).await;
    "late"
}

#[tokio::test]
async fn handler_panic_becomes_generic_500() {
    let (state, _dir) = state();
    let app = portal_api::apply_layers(
        portal_api::app_routes(state).route("/boom", axum::routing::get(panicking_handler)),
        portal_api::REQUEST_TIMEOUT,
    );

    let resp = app.oneshot(get("/boom")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_text(resp).await;
    assert!(!body.contains("hunter2"));
    let json: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["success"], false);
    assert_eq!(json["code"], "internal_error");
}

#[tokio::test]
async fn slow_request_times_out_with_error_body() {
    let (state, _dir) = state();
    let app = portal_api::apply_layers(
        portal_api::app_routes(state).route("/slow", axum::routing::get(slow_handler)),
        std::time::Duration::from_millis(50),
    );

    let resp = app.oneshot(get("/slow")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::REQUEST_TIMEOUT);
    let json = body_json(resp).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["code"], "timeout");
}

#[tokio::test]
async fn unknown_api_path_is_json_404() {
    let (app, _dir) = app();
    let resp = app.oneshot(get("/api/nope")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(resp).await["code"], "not_found");
}

#[tokio::test]
async fn health_reports_version() {
    let (app, _dir) = app();
    let resp = app.oneshot(get("/api/health")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp).await;
    assert_eq!(json["name"], "portal_api");
    assert_eq!(json["version"], portal_core::version());
}
