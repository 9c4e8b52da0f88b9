//! Authentication for the ShearBite backend.
//!
//! Stateless sessions: a short-lived access token and a longer-lived,
//! path-restricted refresh token, both HMAC-signed JWTs delivered as
//! http-only cookies. Nothing about a session is stored server-side.
//!
//! ## Tokens
//!
//! - [`Codec`] — JWT signing and verification against a [`Clock`]
//! - [`Claims`] — JWT payload structure
//! - [`Issuer`] — Token pairs and the cookies that carry them
//!
//! ## Identity
//!
//! - [`Member`] — Registered account
//! - [`Users`] — Account persistence seam
//! - [`credentials`] — Email/password verification and registration
//! - [`password`] — Argon2 hashing and verification
//! - [`Auth`] — Extractor resolving the calling member
mod claims;
mod clock;
mod codec;
pub mod credentials;
mod dto;
mod error;
mod handlers;
mod issuer;
mod member;
mod middleware;
pub mod password;
mod repository;

pub use claims::*;
pub use clock::*;
pub use codec::*;
pub use dto::*;
pub use error::*;
pub use handlers::*;
pub use issuer::*;
pub use member::*;
pub use middleware::*;
pub use repository::*;

#[cfg(any(test, feature = "memory"))]
mod memory;
#[cfg(any(test, feature = "memory"))]
pub use memory::*;
