//! Integration test utilities for vidshare
//!
//! The full axum application (routes and middleware) runs in process over the
//! in-memory stores; requests are driven with `tower::ServiceExt::oneshot`.

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
