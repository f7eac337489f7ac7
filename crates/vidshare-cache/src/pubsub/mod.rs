//! Redis Pub/Sub module.
//!
//! Publish side of real-time engagement distribution.

mod channels;
mod notifier;
mod publisher;

pub use channels::{PubSubChannel, ENGAGEMENT_CHANNEL_PREFIX, USER_CHANNEL_PREFIX};
pub use notifier::RedisNotifier;
pub use publisher::{engagement_channels, PubSubEvent, Publisher};
