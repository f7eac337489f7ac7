//! Axum extractors for request handling
//!
//! Custom extractors for sessions, validation, path ids, pagination and search.

mod auth;
mod pagination;
mod path;
mod search;
mod validated;

pub use auth::{AuthSession, OptionalAuthSession};
pub use pagination::{Pagination, PaginationParams};
pub use path::IdPath;
pub use search::Search;
pub use validated::{OptionalValidatedJson, ValidatedJson};
