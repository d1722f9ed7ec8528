//! Persisted records and the stores that hold them.
//!
//! ## Records
//!
//! - [`User`] — Account with credentials, wallet, badges and inventory
//! - [`Game`] — Uploaded game, back-referencing its creator
//! - [`Listing`] — Game with the creator resolved to a username
//! - [`Item`] — Marketplace catalog entry
//! - [`Session`] — Server-side login session
//!
//! ## Stores
//!
//! - [`Users`], [`Games`], [`Items`], [`Sessions`] — Per-collection operations
//! - [`Store`] — Everything a request handler may touch
//! - [`Memory`] — In-process store
//!
//! With the `database` feature, [`Store`] is also implemented for
//! `tokio_postgres::Client`.
mod game;
mod item;
mod memory;
mod session;
mod store;
mod user;

pub use game::*;
pub use item::*;
pub use memory::*;
pub use session::*;
pub use store::*;
pub use user::*;

#[cfg(feature = "database")]
mod repository;
#[cfg(feature = "database")]
pub use repository::*;
