//! Integration tests for genres and film-genre links.

mod common;

use axum::http::StatusCode;
use cinecritic_core::roles::Role;
use common::{body_json, create_film, delete_auth, expect_error, get, post_auth, post_json_auth};
use serde_json::{json, Value};
use sqlx::PgPool;

async fn create_genre(app: &axum::Router, admin: &str, name: &str) -> Value {
    let response = post_json_auth(app, "/api/v1/genres", json!({ "name": name }), admin).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"].clone()
}

fn names(json: &Value) -> Vec<String> {
    json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|g| g["name"].as_str().unwrap().to_string())
        .collect()
}

#[sqlx::test(migrations = "../db/migrations")]
async fn genres_are_listed_by_name(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (_, admin) = common::create_user(&pool, "admin", Role::Admin).await;
    create_genre(&app, &admin, "Sci-Fi").await;
    create_genre(&app, &admin, "  Animation ").await;
    create_genre(&app, &admin, "Drama").await;

    let json = body_json(get(&app, "/api/v1/genres").await).await;

    assert_eq!(names(&json), ["Animation", "Drama", "Sci-Fi"]);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn create_genre_validates_and_rejects_duplicates(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (_, admin) = common::create_user(&pool, "admin", Role::Admin).await;
    let (_, user) = common::create_user(&pool, "matty", Role::User).await;
    create_genre(&app, &admin, "Drama").await;

    let duplicate =
        post_json_auth(&app, "/api/v1/genres", json!({ "name": " Drama " }), &admin).await;
    let json = expect_error(duplicate, StatusCode::CONFLICT, "conflict").await;
    assert_eq!(json["detail"], "Genre already exists");

    let blank = post_json_auth(&app, "/api/v1/genres", json!({ "name": "  " }), &admin).await;
    let json = expect_error(blank, StatusCode::BAD_REQUEST, "bad_request").await;
    assert!(json["meta"]["name"].is_array());

    let too_long = post_json_auth(
        &app,
        "/api/v1/genres",
        json!({ "name": "g".repeat(51) }),
        &admin,
    )
    .await;
    expect_error(too_long, StatusCode::BAD_REQUEST, "bad_request").await;

    let not_admin = post_json_auth(&app, "/api/v1/genres", json!({ "name": "Horror" }), &user).await;
    expect_error(not_admin, StatusCode::FORBIDDEN, "forbidden").await;
}

#[sqlx::test(migrations = "../db/migrations")]
async fn attach_list_and_detach(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (_, admin) = common::create_user(&pool, "admin", Role::Admin).await;
    let film = create_film(&app, &admin, "Inception", 2010).await;
    let scifi = create_genre(&app, &admin, "Sci-Fi").await;
    let thriller = create_genre(&app, &admin, "Thriller").await;
    let base = format!("/api/v1/films/{}/genres", film["id"]);

    for genre in [&thriller, &scifi] {
        let response = post_auth(&app, &format!("{base}/{}", genre["id"]), &admin).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    let json = body_json(get(&app, &base).await).await;
    assert_eq!(names(&json), ["Sci-Fi", "Thriller"]);

    let again = post_auth(&app, &format!("{base}/{}", scifi["id"]), &admin).await;
    let json = expect_error(again, StatusCode::CONFLICT, "conflict").await;
    assert_eq!(json["detail"], "Genre already attached to this film");

    let detach = delete_auth(&app, &format!("{base}/{}", scifi["id"]), &admin).await;
    assert_eq!(detach.status(), StatusCode::NO_CONTENT);
    let json = body_json(get(&app, &base).await).await;
    assert_eq!(names(&json), ["Thriller"]);

    let missing = delete_auth(&app, &format!("{base}/{}", scifi["id"]), &admin).await;
    expect_error(missing, StatusCode::NOT_FOUND, "not_found").await;
}

#[sqlx::test(migrations = "../db/migrations")]
async fn attach_to_unknown_film_or_genre_is_not_found(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (_, admin) = common::create_user(&pool, "admin", Role::Admin).await;
    let film = create_film(&app, &admin, "Inception", 2010).await;
    let genre = create_genre(&app, &admin, "Sci-Fi").await;

    let response = post_auth(
        &app,
        &format!("/api/v1/films/999999/genres/{}", genre["id"]),
        &admin,
    )
    .await;
    let json = expect_error(response, StatusCode::NOT_FOUND, "not_found").await;
    assert_eq!(json["detail"], "Film with id 999999 not found");

    let response = post_auth(
        &app,
        &format!("/api/v1/films/{}/genres/999999", film["id"]),
        &admin,
    )
    .await;
    let json = expect_error(response, StatusCode::NOT_FOUND, "not_found").await;
    assert_eq!(json["detail"], "Genre with id 999999 not found");

    let response = get(&app, "/api/v1/films/999999/genres").await;
    expect_error(response, StatusCode::NOT_FOUND, "not_found").await;
}

#[sqlx::test(migrations = "../db/migrations")]
async fn deleting_genre_unlinks_films(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (_, admin) = common::create_user(&pool, "admin", Role::Admin).await;
    let film = create_film(&app, &admin, "Inception", 2010).await;
    let genre = create_genre(&app, &admin, "Sci-Fi").await;
    let link = format!("/api/v1/films/{}/genres/{}", film["id"], genre["id"]);
    post_auth(&app, &link, &admin).await;

    let response = delete_auth(&app, &format!("/api/v1/genres/{}", genre["id"]), &admin).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let json = body_json(get(&app, &format!("/api/v1/films/{}/genres", film["id"])).await).await;
    assert!(json["data"].as_array().unwrap().is_empty());

    // The film itself survives.
    let response = get(&app, &format!("/api/v1/films/{}", film["id"])).await;
    assert_eq!(response.status(), StatusCode::OK);

    let again = delete_auth(&app, &format!("/api/v1/genres/{}", genre["id"]), &admin).await;
    expect_error(again, StatusCode::NOT_FOUND, "not_found").await;
}
