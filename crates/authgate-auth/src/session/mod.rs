//! Session lifecycle: signup, login, refresh-token rotation, logout.

pub mod manager;

pub use manager::{LoginResult, SessionManager};
