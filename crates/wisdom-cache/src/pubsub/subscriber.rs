//! Redis Pub/Sub subscriber.
//!
//! One background connection listens on the table channels and fans decoded
//! changes out to local receivers. A listen request resolves only after Redis
//! has confirmed the SUBSCRIBE, so a change published once it returns is
//! delivered.

use std::collections::HashSet;

use futures_util::StreamExt;
use redis::aio::PubSub;
use redis::{Client, Msg};
use tokio::sync::mpsc::error::TryRecvError;
use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::time::{sleep, Duration};
use tracing::{debug, error, info, trace, warn};
use wisdom_core::events::{Table, TableChange};
use wisdom_core::DomainError;

use crate::pubsub::{PubSubChannel, PubSubEvent};

/// Error type for subscriber operations
#[derive(Debug, thiserror::Error)]
pub enum SubscriberError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Subscriber disconnected: {0}")]
    Disconnected(String),

    #[error("Subscriber stopped")]
    ChannelClosed,
}

/// Result type for subscriber operations
pub type SubscriberResult<T> = Result<T, SubscriberError>;

impl From<SubscriberError> for DomainError {
    fn from(err: SubscriberError) -> Self {
        DomainError::NetworkFailure(err.to_string())
    }
}

/// Decode a message received on `channel`.
///
/// Anything other than a change of that channel's own table yields `None`.
fn decode(channel: &str, payload: &[u8]) -> Option<TableChange> {
    let PubSubChannel::Table(table) = PubSubChannel::parse(channel) else {
        return None;
    };
    let event: PubSubEvent = serde_json::from_slice(payload).ok()?;
    event.to_change().ok().filter(|change| change.table == table)
}

/// Subscriber configuration
#[derive(Debug, Clone)]
pub struct SubscriberConfig {
    /// Redis connection URL
    pub redis_url: String,
    /// Channel buffer size for broadcast
    pub broadcast_buffer: usize,
    /// Reconnection delay in milliseconds
    pub reconnect_delay_ms: u64,
}

impl Default for SubscriberConfig {
    fn default() -> Self {
        Self {
            redis_url: "redis://127.0.0.1:6379".to_string(),
            broadcast_buffer: 1024,
            reconnect_delay_ms: 1000,
        }
    }
}

/// Requests handled by the listener task
#[derive(Debug)]
enum Command {
    Listen {
        tables: Vec<Table>,
        ack: oneshot::Sender<SubscriberResult<()>>,
    },
    Shutdown,
}

/// Handle to the background listener
pub struct Subscriber {
    changes: broadcast::Sender<TableChange>,
    commands: mpsc::Sender<Command>,
}

impl Subscriber {
    /// Start the background listener with no tables
    #[must_use]
    pub fn spawn(config: SubscriberConfig) -> Self {
        let (changes, _) = broadcast::channel(config.broadcast_buffer);
        let (commands, command_rx) = mpsc::channel(32);

        let listener = Listener {
            config,
            tables: HashSet::new(),
            changes: changes.clone(),
            commands: command_rx,
        };
        tokio::spawn(listener.run());

        Self { changes, commands }
    }

    /// Listen on the given tables' channels.
    ///
    /// Returns once Redis has acknowledged every new channel. Tables already
    /// held succeed immediately.
    pub async fn listen(&self, tables: &[Table]) -> SubscriberResult<()> {
        let (ack, acked) = oneshot::channel();
        self.commands
            .send(Command::Listen {
                tables: tables.to_vec(),
                ack,
            })
            .await
            .map_err(|_| SubscriberError::ChannelClosed)?;

        acked.await.map_err(|_| SubscriberError::ChannelClosed)?
    }

    /// Receiver for every change decoded by the listener
    #[must_use]
    pub fn changes(&self) -> broadcast::Receiver<TableChange> {
        self.changes.subscribe()
    }

    /// Stop the background listener
    pub async fn shutdown(&self) -> SubscriberResult<()> {
        self.commands
            .send(Command::Shutdown)
            .await
            .map_err(|_| SubscriberError::ChannelClosed)
    }
}

/// Listener task state; survives reconnects
struct Listener {
    config: SubscriberConfig,
    tables: HashSet<Table>,
    changes: broadcast::Sender<TableChange>,
    commands: mpsc::Receiver<Command>,
}

impl Listener {
    async fn run(mut self) {
        loop {
            match self.connect_and_listen().await {
                Ok(()) => {
                    info!("Subscriber shutting down");
                    return;
                }
                Err(e) => {
                    error!(error = %e, tables = self.tables.len(), "Subscriber connection lost, reconnecting");
                    if self.reject_pending(&e) {
                        info!("Subscriber shutting down");
                        return;
                    }
                    sleep(Duration::from_millis(self.config.reconnect_delay_ms)).await;
                }
            }
        }
    }

    /// Serve one connection; `Ok` means shutdown was requested
    async fn connect_and_listen(&mut self) -> SubscriberResult<()> {
        let client = Client::open(self.config.redis_url.as_str())?;
        let mut pubsub = client.get_async_pubsub().await?;

        // Restore what was held before the reconnect
        for table in &self.tables {
            pubsub.subscribe(PubSubChannel::table(*table).name()).await?;
        }
        info!(tables = self.tables.len(), "Subscriber connected to Redis");

        loop {
            let command = {
                let mut messages = pubsub.on_message();
                loop {
                    tokio::select! {
                        msg = messages.next() => match msg {
                            Some(msg) => forward(&self.changes, &msg),
                            None => {
                                return Err(SubscriberError::Disconnected(
                                    "message stream ended".to_string(),
                                ))
                            }
                        },
                        command = self.commands.recv() => break command,
                    }
                }
            };

            match command {
                Some(Command::Listen { tables, ack }) => {
                    let result = self.add_tables(&mut pubsub, tables).await;
                    let failure = result.as_ref().err().map(ToString::to_string);
                    // The requester may have given up
                    let _ = ack.send(result);
                    if let Some(reason) = failure {
                        return Err(SubscriberError::Disconnected(reason));
                    }
                }
                Some(Command::Shutdown) | None => return Ok(()),
            }
        }
    }

    async fn add_tables(&mut self, pubsub: &mut PubSub, tables: Vec<Table>) -> SubscriberResult<()> {
        for table in tables {
            if self.tables.contains(&table) {
                continue;
            }
            let channel = PubSubChannel::table(table);
            pubsub.subscribe(channel.name()).await?;
            self.tables.insert(table);
            debug!(channel = %channel, "Subscribed to table channel");
        }
        Ok(())
    }

    /// Fail requests queued while disconnected; `true` if shutdown was among them
    fn reject_pending(&mut self, reason: &SubscriberError) -> bool {
        loop {
            match self.commands.try_recv() {
                Ok(Command::Listen { ack, .. }) => {
                    let _ = ack.send(Err(SubscriberError::Disconnected(reason.to_string())));
                }
                Ok(Command::Shutdown) | Err(TryRecvError::Disconnected) => return true,
                Err(TryRecvError::Empty) => return false,
            }
        }
    }
}

fn forward(changes: &broadcast::Sender<TableChange>, msg: &Msg) {
    let channel = msg.get_channel_name();
    match decode(channel, msg.get_payload_bytes()) {
        Some(change) => {
            trace!(channel, event = %change.event_type(), "Received table change");
            // No receivers is not an error
            let _ = changes.send(change);
        }
        None => warn!(channel, "Dropping malformed change payload"),
    }
}

/// Builder for subscriber
pub struct SubscriberBuilder {
    config: SubscriberConfig,
    tables: Vec<Table>,
}

impl SubscriberBuilder {
    /// Create a new builder
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: SubscriberConfig::default(),
            tables: Vec::new(),
        }
    }

    /// Set Redis URL
    #[must_use]
    pub fn redis_url(mut self, url: impl Into<String>) -> Self {
        self.config.redis_url = url.into();
        self
    }

    /// Set broadcast buffer size
    #[must_use]
    pub fn broadcast_buffer(mut self, size: usize) -> Self {
        self.config.broadcast_buffer = size;
        self
    }

    /// Set reconnection delay
    #[must_use]
    pub fn reconnect_delay_ms(mut self, delay: u64) -> Self {
        self.config.reconnect_delay_ms = delay;
        self
    }

    /// Apply the shared Redis configuration
    #[must_use]
    pub fn redis_config(self, config: &wisdom_common::RedisConfig) -> Self {
        self.redis_url(config.url.clone())
    }

    /// Listen on a table's channel from the start
    #[must_use]
    pub fn table(mut self, table: Table) -> Self {
        self.tables.push(table);
        self
    }

    /// Start the subscriber and wait until the initial tables are held
    pub async fn build(self) -> SubscriberResult<Subscriber> {
        let subscriber = Subscriber::spawn(self.config);

        if !self.tables.is_empty() {
            subscriber.listen(&self.tables).await?;
        }

        Ok(subscriber)
    }
}

impl Default for SubscriberBuilder {
    fn default() -> Self {
        Self::new()
    }
}
