//! # authgate-database
//!
//! The credential store: the [`UserStore`] trait, its PostgreSQL and
//! in-memory implementations, and migration bootstrap.

pub mod migration;
pub mod repositories;
pub mod store;

pub use repositories::{MemoryUserRepository, PgUserRepository};
pub use store::{UserStore, open_store};
