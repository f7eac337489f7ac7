//! # vidshare-cache
//!
//! Redis layer for engagement event fan-out.
//!
//! ## Features
//!
//! - **Connection Pool**: Managed Redis connection pool with deadpool
//! - **Pub/Sub**: Committed engagement changes published per object and per owner
//! - **Sessions**: Signed-out session ids with a TTL matching the token
//! - **Readiness**: `PING`-based health probe
//!
//! ## Example
//!
//! ```ignore
//! use vidshare_cache::{Publisher, RedisNotifier, RedisPool, RedisPoolConfig};
//!
//! let pool = RedisPool::new(RedisPoolConfig::default())?;
//! let notifier = RedisNotifier::new(Publisher::new(pool.clone()));
//!
//! // After a committed rating change
//! notifier.notify(&event).await?;
//! ```

pub mod pool;
pub mod pubsub;
pub mod session;

// Re-export pool types
pub use pool::{
    RedisHealthProbe, RedisPool, RedisPoolConfig, RedisPoolError, RedisResult,
};

// Re-export pubsub types
pub use pubsub::{
    engagement_channels, PubSubChannel, PubSubEvent, Publisher, RedisNotifier,
    ENGAGEMENT_CHANNEL_PREFIX, USER_CHANNEL_PREFIX,
};

pub use session::{RedisSessionRevocations, REVOKED_SESSION_PREFIX};
