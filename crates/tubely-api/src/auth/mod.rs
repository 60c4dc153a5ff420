//! Bearer-token authentication
//!
//! Tokens are HS256 JWTs issued by the Tubely account service. The gate only
//! validates them and extracts the user id; issuing lives here too so tests
//! and local tooling can mint tokens with the shared secret.

pub mod jwt;
pub mod middleware;
pub mod models;

pub use jwt::JwtValidator;
pub use models::{AuthUser, JwtClaims};
