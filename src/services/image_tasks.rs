use std::collections::HashMap;
use std::future::Future;

use tokio::sync::Mutex;
use tokio::task::AbortHandle;

use crate::flow::SessionTicket;

/// In-flight image generations keyed by `(ticket, word index)`.
#[derive(Debug, Default)]
pub struct ImageTasks {
    running: Mutex<HashMap<(SessionTicket, usize), AbortHandle>>,
}

impl ImageTasks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawns `task` and records it. The map stays locked until the handle
    /// is stored, so a task that finishes instantly cannot be left behind.
    pub async fn spawn<F>(&self, ticket: SessionTicket, index: usize, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let mut running = self.running.lock().await;
        let handle = tokio::spawn(task);
        if let Some(previous) = running.insert((ticket, index), handle.abort_handle()) {
            previous.abort();
        }
    }

    pub async fn finish(&self, ticket: SessionTicket, index: usize) {
        self.running.lock().await.remove(&(ticket, index));
    }

    /// Aborts every task that does not belong to `current`.
    pub async fn abort_stale(&self, current: SessionTicket) -> usize {
        let mut running = self.running.lock().await;
        let before = running.len();
        running.retain(|(ticket, _), handle| {
            if *ticket == current {
                true
            } else {
                handle.abort();
                false
            }
        });
        let aborted = before - running.len();
        if aborted > 0 {
            tracing::debug!(aborted, current = %current, "Aborted stale image tasks");
        }
        aborted
    }

    pub async fn pending(&self) -> usize {
        self.running.lock().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn stale_tasks_are_aborted() {
        let tasks = Arc::new(ImageTasks::new());
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel::<usize>();

        for index in 0..2 {
            let tx = tx.clone();
            tasks
                .spawn(SessionTicket(1), index, async move {
                    tokio::time::sleep(Duration::from_secs(60)).await;
                    let _ = tx.send(index);
                })
                .await;
        }
        tasks
            .spawn(SessionTicket(2), 0, async {})
            .await;

        assert_eq!(tasks.abort_stale(SessionTicket(2)).await, 2);
        assert_eq!(tasks.pending().await, 1);
        drop(tx);
        assert_eq!(rx.recv().await, None);
    }

    #[tokio::test]
    async fn finish_forgets_the_task() {
        let tasks = ImageTasks::new();
        tasks.spawn(SessionTicket(3), 1, async {}).await;
        tasks.finish(SessionTicket(3), 1).await;
        assert_eq!(tasks.pending().await, 0);
    }
}
