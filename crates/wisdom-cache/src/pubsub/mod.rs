//! Redis Pub/Sub module.
//!
//! Carries table change notifications between engine instances.

mod channels;
mod publisher;
mod subscriber;

pub use channels::{PubSubChannel, TABLE_CHANNEL_PREFIX};
pub use publisher::{PubSubEvent, Publisher};
pub use subscriber::{
    Subscriber, SubscriberBuilder, SubscriberConfig, SubscriberError, SubscriberResult,
};
