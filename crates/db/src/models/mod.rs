//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` entity struct matching the database row
//! - Create/update DTOs carrying already-validated values

pub mod film;
pub mod genre;
pub mod review;
pub mod user;
pub mod watchlist;
