//! Test helpers for integration tests

use std::time::Duration;

use futures::StreamExt;
use wisdom_core::events::TableChange;
use wisdom_core::traits::ChangeStream;
use wisdom_service::{ServiceError, ServiceResult};
use wisdom_core::ErrorKind;

/// Default wait for asynchronous notifications
pub const EVENT_TIMEOUT: Duration = Duration::from_secs(2);

/// Next change on a stream, or `None` after [`EVENT_TIMEOUT`]
pub async fn next_change(stream: &mut ChangeStream) -> Option<TableChange> {
    tokio::time::timeout(EVENT_TIMEOUT, stream.next())
        .await
        .ok()
        .flatten()
}

/// Poll `check` until it holds or [`EVENT_TIMEOUT`] elapses
pub async fn eventually<F>(mut check: F) -> bool
where
    F: FnMut() -> bool,
{
    let deadline = tokio::time::Instant::now() + EVENT_TIMEOUT;
    while tokio::time::Instant::now() < deadline {
        if check() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    check()
}

/// Assert that a result failed with the given error kind
pub fn assert_kind<T: std::fmt::Debug>(result: ServiceResult<T>, kind: ErrorKind) -> ServiceError {
    match result {
        Ok(value) => panic!("expected {kind:?}, got Ok({value:?})"),
        Err(err) => {
            assert_eq!(err.kind(), kind, "unexpected error: {err}");
            err
        }
    }
}

/// Whether REDIS_URL is configured for Redis-backed tests
pub fn redis_url() -> Option<String> {
    dotenvy::dotenv().ok();
    match std::env::var("REDIS_URL") {
        Ok(url) => Some(url),
        Err(_) => {
            eprintln!("Skipping test: REDIS_URL not set");
            None
        }
    }
}
