//! Route handlers
//!
//! All HTTP request handlers organized by resource.

pub mod auth;
pub mod channels;
pub mod comments;
pub mod health;
pub mod playlists;
pub mod users;
pub mod videos;
