//! Users, posts and the follow graph of a Bord board.
//!
//! Everything operates on an explicit [`Store`]; open one per process (or per
//! test) with [`Store::open_in_memory`].

pub mod auth;
pub mod config;
pub mod core;
pub mod follow;
pub mod models;
pub mod posts;
pub mod users;

pub use crate::core::errors::{ModelError, Result};
pub use crate::core::pagination::Page;
pub use crate::core::store::Store;
pub use crate::models::models::{Post, User};
