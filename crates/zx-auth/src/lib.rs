//! Sessions, guards, and credential handling.
//!
//! Cookie-carried sessions backed by a server-side session record, with
//! Argon2 password hashing.
//!
//! ## Guards
//!
//! - [`Auth`] — Extractor resolving the session's user, 401 otherwise
//! - [`Admin`] — Same, additionally 403 for non-administrators
//!
//! ## Security
//!
//! - [`Crypto`] — Session token signing, verification and cookies
//! - [`Claims`] — Signed token payload
//! - [`password`] — Argon2 hashing and verification
//!
//! ## Errors
//!
//! - [`Rejection`] — Every way a request can fail, rendered as JSON
//!
//! ## Handlers
//!
//! [`signup`], [`login`] and [`logout`] for the `/api` scope.
mod claims;
mod crypto;
mod dto;
mod guard;
mod handlers;
pub mod password;
mod rejection;

pub use claims::*;
pub use crypto::*;
pub use dto::*;
pub use guard::*;
pub use handlers::*;
pub use rejection::*;
