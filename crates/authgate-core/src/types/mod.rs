//! Core type definitions used across the AuthGate workspace.

pub mod id;

pub use id::UserId;
