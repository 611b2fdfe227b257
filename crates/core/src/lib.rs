//! Domain rules for the CineCritic review service.
//!
//! Everything here is pure: no database or HTTP types. The `db` and `api`
//! crates build on these rules.

pub mod catalog;
pub mod error;
pub mod identity;
pub mod pagination;
pub mod policy;
pub mod review;
pub mod roles;
pub mod types;
