//! `cinecritic-seed`: apply migrations and load sample data.
//!
//! Inserts users, films, genres, links, reviews and watchlist entries in a
//! single transaction. Does nothing if any user already exists.

use anyhow::{anyhow, Context};
use chrono::Utc;
use cinecritic_api::auth::password::hash_password;
use cinecritic_api::config::DatabaseConfig;
use cinecritic_api::telemetry;
use cinecritic_core::review::{Lifecycle, ReviewStatus};
use cinecritic_core::roles::Role;
use cinecritic_db::models::film::CreateFilm;
use cinecritic_db::models::review::CreateReview;
use cinecritic_db::models::user::CreateUser;
use cinecritic_db::repositories::{FilmRepo, GenreRepo, ReviewRepo, UserRepo, WatchlistRepo};
use sqlx::PgConnection;

const USERS: [(&str, &str, Role); 3] = [
    ("matty", "secret123", Role::User),
    ("sol", "secret123", Role::User),
    ("admin", "admin123", Role::Admin),
];

const FILMS: [(&str, i32, &str); 3] = [
    ("Inception", 2010, "Christopher Nolan"),
    ("Parasite", 2019, "Bong Joon-ho"),
    ("Spirited Away", 2001, "Hayao Miyazaki"),
];

const GENRES: [&str; 3] = ["Sci-Fi", "Drama", "Animation"];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    telemetry::init();

    let db_config = DatabaseConfig::from_env();
    let pool = cinecritic_db::create_pool(&db_config.url, db_config.max_connections)
        .await
        .context("connecting to database")?;
    cinecritic_db::run_migrations(&pool)
        .await
        .context("running migrations")?;

    let mut tx = pool.begin().await?;
    if UserRepo::any_exists(&mut tx).await? {
        tracing::info!("Seed skipped: data already present");
        return Ok(());
    }

    seed(&mut tx).await?;
    tx.commit().await?;

    tracing::info!("Sample data seeded");
    Ok(())
}

async fn seed(conn: &mut PgConnection) -> anyhow::Result<()> {
    let mut user_ids = Vec::with_capacity(USERS.len());
    for (username, password, role) in USERS {
        let password_hash =
            hash_password(password).map_err(|e| anyhow!("hashing password for {username}: {e}"))?;
        let user = UserRepo::create(
            conn,
            &CreateUser {
                username: username.to_string(),
                email: format!("{username}@example.com"),
                password_hash,
                role,
            },
        )
        .await?;
        user_ids.push(user.id);
    }
    let (matty, sol) = (user_ids[0], user_ids[1]);

    let mut film_ids = Vec::with_capacity(FILMS.len());
    for (title, year, director) in FILMS {
        let film = FilmRepo::create(
            conn,
            &CreateFilm {
                title: title.to_string(),
                release_year: Some(year),
                director: Some(director.to_string()),
                description: None,
            },
        )
        .await?;
        film_ids.push(film.id);
    }
    let (inception, parasite, spirited_away) = (film_ids[0], film_ids[1], film_ids[2]);

    // Each film gets the genre at the same position.
    for (film_id, name) in film_ids.iter().zip(GENRES) {
        let genre = GenreRepo::create(conn, name).await?;
        GenreRepo::attach(conn, *film_id, genre.id).await?;
    }

    let now = Utc::now();
    let reviews = [
        (inception, matty, 5.0, "A mind-bender.", ReviewStatus::Published),
        (parasite, sol, 4.5, "Tense and brilliant.", ReviewStatus::Draft),
        (inception, sol, 4.0, "Flag me please", ReviewStatus::Flagged),
    ];
    for (film_id, user_id, rating, body, status) in reviews {
        ReviewRepo::create(
            conn,
            &CreateReview {
                film_id,
                user_id,
                rating,
                body: Some(body.to_string()),
                lifecycle: Lifecycle::initial(status, Some(body), now)?,
            },
        )
        .await?;
    }

    WatchlistRepo::add(conn, sol, parasite).await?;
    WatchlistRepo::add(conn, matty, spirited_away).await?;

    Ok(())
}
