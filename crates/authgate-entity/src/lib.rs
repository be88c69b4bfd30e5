//! # authgate-entity
//!
//! Domain entity models for AuthGate. Database rows derive
//! `sqlx::FromRow`; secrets are never serialized.

pub mod user;
