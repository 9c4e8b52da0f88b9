//! Donation listings for the ShearBite marketplace.
//!
//! Every endpoint here sits behind [`sb_auth::Auth`]. Ownership is checked
//! per listing: only the donor may edit or withdraw it, and a donor may not
//! claim their own listing.
//!
//! - [`Donation`] — Listing record and its [`Status`] lifecycle
//! - [`Donations`] — Listing persistence seam
//! - [`ObjectStore`] — Image bucket seam, with [`LocalStore`] on disk
//! - [`Image`] — Accepted upload formats
mod donation;
mod dto;
mod error;
mod handlers;
mod image;
mod repository;
mod storage;

pub use donation::*;
pub use dto::*;
pub use error::*;
pub use handlers::*;
pub use image::*;
pub use repository::*;
pub use storage::*;

#[cfg(any(test, feature = "memory"))]
mod memory;
#[cfg(any(test, feature = "memory"))]
pub use memory::*;
