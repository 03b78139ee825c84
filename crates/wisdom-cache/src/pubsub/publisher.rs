//! Redis Pub/Sub publisher.
//!
//! Publishes table change events so every engine instance sees every write.

use crate::pool::{RedisPool, RedisResult};
use crate::pubsub::PubSubChannel;
use redis::AsyncCommands;
use serde::{Deserialize, Serialize};
use wisdom_core::events::TableChange;

/// Event wrapper for Pub/Sub messages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PubSubEvent {
    /// Event type name (e.g., "POSTS_UPDATE")
    pub event_type: String,
    /// Event payload
    pub data: serde_json::Value,
}

impl PubSubEvent {
    /// Create a new event
    #[must_use]
    pub fn new(event_type: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            event_type: event_type.into(),
            data,
        }
    }

    /// Wrap a table change
    pub fn from_change(change: &TableChange) -> Result<Self, serde_json::Error> {
        Ok(Self::new(change.event_type(), serde_json::to_value(change)?))
    }

    /// Decode the payload as a table change
    pub fn to_change(&self) -> Result<TableChange, serde_json::Error> {
        TableChange::deserialize(&self.data)
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Redis Pub/Sub publisher
#[derive(Clone)]
pub struct Publisher {
    pool: RedisPool,
}

impl Publisher {
    /// Create a new publisher
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

    /// Publish a table change on its table's channel
    pub async fn publish_change(&self, change: &TableChange) -> RedisResult<u32> {
        let event = PubSubEvent::from_change(change)?;
        self.publish(&PubSubChannel::table(change.table), &event)
            .await
    }
}
