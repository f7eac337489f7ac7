//! `EngagementNotifier` backed by Redis Pub/Sub

use async_trait::async_trait;
use tracing::instrument;
use vidshare_core::{DomainError, EngagementEvent, EngagementNotifier, RepoResult};

use super::Publisher;

#[derive(Clone)]
pub struct RedisNotifier {
    publisher: Publisher,
}

impl RedisNotifier {
    #[must_use]
    pub fn new(publisher: Publisher) -> Self {
        Self { publisher }
    }
}

#[async_trait]
impl EngagementNotifier for RedisNotifier {
    #[instrument(skip(self, event), fields(kind = %event.kind, object = %event.object))]
    async fn notify(&self, event: &EngagementEvent) -> RepoResult<()> {
        self.publisher
            .publish_engagement(event)
            .await
            .map(|_| ())
            .map_err(|e| DomainError::CacheError(e.to_string()))
    }
}
