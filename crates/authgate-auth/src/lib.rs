//! # authgate-auth
//!
//! Authentication core for AuthGate.
//!
//! ## Modules
//!
//! - `jwt`: access/refresh token issuance and verification with two secrets
//! - `password`: Argon2id password hashing and policy enforcement
//! - `session`: signup, login, refresh-token rotation, logout
//! - `gate`: per-request bearer token authentication

pub mod gate;
pub mod jwt;
pub mod password;
pub mod session;

pub use gate::{AuthContext, AuthGate};
pub use jwt::{Claims, TokenPair, TokenPayload, TokenService};
pub use password::{PasswordHasher, PasswordValidator};
pub use session::{LoginResult, SessionManager};
