//! Change feed backed by Redis Pub/Sub.

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tracing::instrument;

use wisdom_core::events::{Table, TableChange};
use wisdom_core::traits::{ChangeFeed, ChangeStream, RepoResult};

use crate::pool::RedisPool;
use crate::pubsub::{Publisher, Subscriber};

/// `ChangeFeed` over one publisher and one shared subscriber connection
#[derive(Clone)]
pub struct RedisChangeFeed {
    publisher: Publisher,
    subscriber: Arc<Subscriber>,
}

impl RedisChangeFeed {
    #[must_use]
    pub fn new(pool: RedisPool, subscriber: Subscriber) -> Self {
        Self {
            publisher: Publisher::new(pool),
            subscriber: Arc::new(subscriber),
        }
    }

    /// Stop the background listener
    pub async fn shutdown(&self) -> RepoResult<()> {
        self.subscriber.shutdown().await?;
        Ok(())
    }
}

#[async_trait]
impl ChangeFeed for RedisChangeFeed {
    #[instrument(skip(self, change), fields(event = %change.event_type()))]
    async fn publish(&self, change: &TableChange) -> RepoResult<()> {
        self.publisher.publish_change(change).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn subscribe(&self, table: Table) -> RepoResult<ChangeStream> {
        // Taken before the listen is acknowledged, so every change published
        // after this returns reaches the stream
        let receiver = self.subscriber.changes();
        self.subscriber.listen(&[table]).await?;

        let changes = stream::unfold(receiver, move |mut receiver| async move {
            loop {
                match receiver.recv().await {
                    Ok(change) if change.table == table => return Some((change, receiver)),
                    Ok(_) => {}
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(table = %table, skipped, "Change subscriber lagged");
                    }
                    Err(RecvError::Closed) => return None,
                }
            }
        });

        Ok(changes.boxed())
    }
}
