//! Session state shared between API instances.

mod revocations;

pub use revocations::{RedisSessionRevocations, REVOKED_SESSION_PREFIX};
