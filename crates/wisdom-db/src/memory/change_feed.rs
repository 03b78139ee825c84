//! In-process change feed over a tokio broadcast channel

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{debug, warn};

use wisdom_core::events::{Table, TableChange};
use wisdom_core::traits::{ChangeFeed, ChangeStream, RepoResult};

/// Broadcast-backed [`ChangeFeed`]; every subscriber sees every change
#[derive(Debug, Clone)]
pub struct InMemoryChangeFeed {
    sender: broadcast::Sender<TableChange>,
}

impl InMemoryChangeFeed {
    pub fn new(buffer: usize) -> Self {
        let (sender, _) = broadcast::channel(buffer.max(1));
        Self { sender }
    }

    /// Number of live subscriptions
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for InMemoryChangeFeed {
    fn default() -> Self {
        Self::new(256)
    }
}

#[async_trait]
impl ChangeFeed for InMemoryChangeFeed {
    async fn publish(&self, change: &TableChange) -> RepoResult<()> {
        // No receivers is not an error; nobody is listening yet
        if self.sender.send(change.clone()).is_err() {
            debug!(event = %change.event_type(), "No subscribers for change");
        }
        Ok(())
    }

    async fn subscribe(&self, table: Table) -> RepoResult<ChangeStream> {
        let receiver = self.sender.subscribe();
        let stream = stream::unfold(receiver, move |mut receiver| async move {
            loop {
                match receiver.recv().await {
                    Ok(change) if change.table == table => return Some((change, receiver)),
                    Ok(_) => {}
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(%table, skipped, "Change subscriber lagged");
                    }
                    Err(RecvError::Closed) => return None,
                }
            }
        });
        Ok(stream.boxed())
    }
}
