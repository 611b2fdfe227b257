//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&mut PgConnection` as the first argument.

pub mod film_repo;
pub mod genre_repo;
pub mod review_repo;
pub mod user_repo;
pub mod watchlist_repo;

pub use film_repo::FilmRepo;
pub use genre_repo::GenreRepo;
pub use review_repo::ReviewRepo;
pub use user_repo::UserRepo;
pub use watchlist_repo::WatchlistRepo;
