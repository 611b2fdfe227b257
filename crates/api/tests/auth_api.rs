//! Integration tests for registration, login and account management.

mod common;

use axum::http::StatusCode;
use cinecritic_core::roles::Role;
use common::{
    body_json, delete_auth, expect_error, get, get_auth, post_json, send, TEST_PASSWORD,
};
use serde_json::json;
use sqlx::PgPool;

fn registration(username: &str, email: &str) -> serde_json::Value {
    json!({ "username": username, "email": email, "password": "secret12" })
}

// ---------------------------------------------------------------------------
// Register
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn register_creates_user_role_account(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = post_json(
        &app,
        "/api/v1/auth/register",
        registration("  matty ", "Matty@Example.com"),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["username"], "matty");
    assert_eq!(json["data"]["email"], "matty@example.com");
    assert_eq!(json["data"]["role"], "user");
    assert!(json["data"].get("password_hash").is_none());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn register_ignores_client_supplied_role(pool: PgPool) {
    let app = common::build_test_app(pool);

    let mut body = registration("sneaky", "sneaky@example.com");
    body["role"] = json!("admin");
    let response = post_json(&app, "/api/v1/auth/register", body).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(body_json(response).await["data"]["role"], "user");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn register_duplicate_email_conflicts(pool: PgPool) {
    let app = common::build_test_app(pool);
    post_json(&app, "/api/v1/auth/register", registration("matty", "m@example.com")).await;

    let response = post_json(
        &app,
        "/api/v1/auth/register",
        registration("other", "M@EXAMPLE.COM"),
    )
    .await;

    let json = expect_error(response, StatusCode::CONFLICT, "conflict").await;
    assert_eq!(json["detail"], "Email already registered");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn register_duplicate_username_conflicts(pool: PgPool) {
    let app = common::build_test_app(pool);
    post_json(&app, "/api/v1/auth/register", registration("matty", "a@example.com")).await;

    let response = post_json(
        &app,
        "/api/v1/auth/register",
        registration("matty", "b@example.com"),
    )
    .await;

    let json = expect_error(response, StatusCode::CONFLICT, "conflict").await;
    assert_eq!(json["detail"], "Username already taken");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn register_rejects_invalid_fields(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = post_json(
        &app,
        "/api/v1/auth/register",
        json!({ "username": "ab", "email": "not-an-email", "password": "123" }),
    )
    .await;

    let json = expect_error(response, StatusCode::BAD_REQUEST, "bad_request").await;
    let meta = &json["meta"];
    assert!(meta["username"].is_array());
    assert!(meta["email"].is_array());
    assert!(meta["password"].is_array());
}

// ---------------------------------------------------------------------------
// Login
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn login_returns_bearer_token_usable_on_me(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    common::create_user(&pool, "matty", Role::User).await;

    let response = post_json(
        &app,
        "/api/v1/auth/login",
        json!({ "email": " MATTY@example.com", "password": TEST_PASSWORD }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["token_type"], "Bearer");
    assert_eq!(json["expires_in"], 3600);
    let token = json["access_token"].as_str().unwrap();

    let me = get_auth(&app, "/api/v1/auth/me", token).await;
    assert_eq!(me.status(), StatusCode::OK);
    assert_eq!(body_json(me).await["data"]["username"], "matty");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn login_failures_are_indistinguishable(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    common::create_user(&pool, "matty", Role::User).await;

    let wrong_password = post_json(
        &app,
        "/api/v1/auth/login",
        json!({ "email": "matty@example.com", "password": "wrong-password" }),
    )
    .await;
    let unknown_email = post_json(
        &app,
        "/api/v1/auth/login",
        json!({ "email": "nobody@example.com", "password": TEST_PASSWORD }),
    )
    .await;

    let a = expect_error(wrong_password, StatusCode::UNAUTHORIZED, "unauthorised").await;
    let b = expect_error(unknown_email, StatusCode::UNAUTHORIZED, "unauthorised").await;
    assert_eq!(a["detail"], "Invalid email or password");
    assert_eq!(a, b);
}

// ---------------------------------------------------------------------------
// Me
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn me_requires_valid_token(pool: PgPool) {
    let app = common::build_test_app(pool);

    let missing = get(&app, "/api/v1/auth/me").await;
    expect_error(missing, StatusCode::UNAUTHORIZED, "unauthorised").await;

    let garbage = get_auth(&app, "/api/v1/auth/me", "not.a.jwt").await;
    let json = expect_error(garbage, StatusCode::UNAUTHORIZED, "unauthorised").await;
    assert_eq!(json["detail"], "Invalid or expired token");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn me_for_deleted_account_is_not_found(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (_, admin_token) = common::create_user(&pool, "admin", Role::Admin).await;
    let (user, token) = common::create_user(&pool, "matty", Role::User).await;

    let deleted = delete_auth(&app, &format!("/api/v1/auth/users/{}", user.id), &admin_token).await;
    assert_eq!(deleted.status(), StatusCode::NO_CONTENT);

    let me = get_auth(&app, "/api/v1/auth/me", &token).await;
    expect_error(me, StatusCode::NOT_FOUND, "not_found").await;
}

// ---------------------------------------------------------------------------
// Admin user management
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn list_users_is_admin_only(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (_, admin_token) = common::create_user(&pool, "admin", Role::Admin).await;
    let (_, user_token) = common::create_user(&pool, "matty", Role::User).await;

    let forbidden = get_auth(&app, "/api/v1/auth/users", &user_token).await;
    expect_error(forbidden, StatusCode::FORBIDDEN, "forbidden").await;

    let anonymous = get(&app, "/api/v1/auth/users").await;
    expect_error(anonymous, StatusCode::UNAUTHORIZED, "unauthorised").await;

    let response = get_auth(&app, "/api/v1/auth/users", &admin_token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let users = json["data"].as_array().unwrap();
    assert_eq!(users.len(), 2);
    assert!(users.iter().all(|u| u.get("password_hash").is_none()));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn delete_unknown_user_is_not_found(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (_, admin_token) = common::create_user(&pool, "admin", Role::Admin).await;

    let response = delete_auth(&app, "/api/v1/auth/users/999999", &admin_token).await;

    expect_error(response, StatusCode::NOT_FOUND, "not_found").await;
}

#[sqlx::test(migrations = "../db/migrations")]
async fn non_admin_cannot_delete_users(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (other, _) = common::create_user(&pool, "sol", Role::User).await;
    let (_, token) = common::create_user(&pool, "matty", Role::User).await;

    let response = send(
        &app,
        axum::http::Method::DELETE,
        &format!("/api/v1/auth/users/{}", other.id),
        Some(&token),
        None,
    )
    .await;

    expect_error(response, StatusCode::FORBIDDEN, "forbidden").await;
}
