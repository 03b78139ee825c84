//! Subscription handle for change-driven background tasks

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use futures::StreamExt;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use wisdom_core::events::TableChange;
use wisdom_core::traits::ChangeStream;

/// Liveness flag shared between a handle and its task
#[derive(Debug, Clone)]
pub struct Liveness(Arc<AtomicBool>);

impl Liveness {
    fn new() -> Self {
        Self(Arc::new(AtomicBool::new(true)))
    }

    pub fn is_alive(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    fn close(&self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Handle to a running subscription; dropping it unsubscribes.
///
/// Unsubscribing stops new deliveries immediately. A handler already running
/// is allowed to finish, and it can consult [`Liveness`] before delivering.
#[derive(Debug)]
pub struct Subscription {
    liveness: Liveness,
    stop: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl Subscription {
    /// Drive `handler` with every event of `changes` on a background task
    pub fn spawn<H, Fut>(mut changes: ChangeStream, mut handler: H) -> Self
    where
        H: FnMut(TableChange, Liveness) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send,
    {
        let liveness = Liveness::new();
        let (stop, mut stopped) = oneshot::channel();
        let task_liveness = liveness.clone();

        let task = tokio::spawn(async move {
            loop {
                let change = tokio::select! {
                    _ = &mut stopped => break,
                    next = changes.next() => match next {
                        Some(change) => change,
                        None => break,
                    },
                };
                if !task_liveness.is_alive() {
                    break;
                }
                handler(change, task_liveness.clone()).await;
            }
            tracing::debug!("Subscription task finished");
        });

        Self {
            liveness,
            stop: Some(stop),
            task: Some(task),
        }
    }

    pub fn is_active(&self) -> bool {
        self.liveness.is_alive()
    }

    /// Stop delivering events
    pub fn unsubscribe(&mut self) {
        self.liveness.close();
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
    }

    /// Unsubscribe and wait for the background task to exit
    pub async fn close(mut self) {
        self.unsubscribe();
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}
