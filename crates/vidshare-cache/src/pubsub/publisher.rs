//! Redis Pub/Sub publisher.
//!
//! Publishes committed engagement changes for live counters and uploader notifications.

use crate::pool::{RedisPool, RedisResult};
use crate::pubsub::PubSubChannel;
use redis::AsyncCommands;
use serde::{Deserialize, Serialize};
use vidshare_core::EngagementEvent;

/// Event wrapper for Pub/Sub messages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PubSubEvent {
    /// Event type name (e.g., "RATING_SET", "SUBSCRIBED")
    pub event_type: String,
    pub data: serde_json::Value,
}

impl PubSubEvent {
    #[must_use]
    pub fn new(event_type: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            event_type: event_type.into(),
            data,
        }
    }

    /// Wrap an engagement event
    pub fn from_engagement(event: &EngagementEvent) -> Result<Self, serde_json::Error> {
        Ok(Self::new(event.event_type(), serde_json::to_value(event)?))
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Channels an engagement event fans out to.
///
/// Always the object's engagement channel; the owner's user channel too,
/// unless the owner is the one acting.
#[must_use]
pub fn engagement_channels(event: &EngagementEvent) -> Vec<PubSubChannel> {
    let mut channels = vec![PubSubChannel::engagement(event.kind, event.object)];
    if let Some(owner) = event.owner.filter(|owner| *owner != event.subject) {
        channels.push(PubSubChannel::user(owner));
    }
    channels
}

/// Redis Pub/Sub publisher
#[derive(Clone)]
pub struct Publisher {
    pool: RedisPool,
}

impl Publisher {
    #[must_use]
    pub fn new(pool: RedisPool) -> Self {
        Self { pool }
    }

    /// Publish an event to a channel
    pub async fn publish(&self, channel: &PubSubChannel, event: &PubSubEvent) -> RedisResult<u32> {
        let mut conn = self.pool.get().await?;
        let channel_name = channel.name();
        let payload = event.to_json()?;

        let receivers: u32 = conn.publish(&channel_name, &payload).await?;

        tracing::debug!(
            channel = %channel_name,
            event_type = %event.event_type,
            receivers = receivers,
            "Published event"
        );

        Ok(receivers)
    }

    /// Publish to multiple channels
    pub async fn publish_many(
        &self,
        channels: &[PubSubChannel],
        event: &PubSubEvent,
    ) -> RedisResult<u32> {
        let payload = event.to_json()?;
        let mut total_receivers = 0;
        let mut conn = self.pool.get().await?;

        for channel in channels {
            let channel_name = channel.name();
            let receivers: u32 = conn.publish(&channel_name, &payload).await?;
            total_receivers += receivers;
        }

        tracing::debug!(
            channels = channels.len(),
            event_type = %event.event_type,
            total_receivers = total_receivers,
            "Published event to multiple channels"
        );

        Ok(total_receivers)
    }

    /// Publish a committed engagement change
    pub async fn publish_engagement(&self, event: &EngagementEvent) -> RedisResult<u32> {
        let wrapped = PubSubEvent::from_engagement(event)?;
        self.publish_many(&engagement_channels(event), &wrapped)
            .await
    }
}
