//! Background tasks polled from the UI loop.
//!
//! Work is spawned on the tokio runtime and its result comes back through a
//! oneshot channel. The UI calls [`TaskHandle::try_recv`] on every tick, so it
//! never blocks while a request is in flight. Dropping the handle drops the
//! receiver, and a result that arrives afterwards is discarded.

use anyhow::Result;
use std::future::Future;
use tokio::runtime::Handle;
use tokio::sync::oneshot;

/// Handle for polling the result of a spawned task
pub struct TaskHandle<T> {
    receiver: oneshot::Receiver<Result<T>>,
}

impl<T> TaskHandle<T> {
    /// Try to receive the result without blocking
    pub fn try_recv(&mut self) -> Option<Result<T>> {
        match self.receiver.try_recv() {
            Ok(result) => Some(result),
            Err(oneshot::error::TryRecvError::Empty) => None,
            Err(oneshot::error::TryRecvError::Closed) => {
                Some(Err(anyhow::anyhow!("Task ended without a result")))
            }
        }
    }
}

/// Run `future` on the runtime and return a handle to its result.
pub fn spawn_task<T, F>(runtime: &Handle, future: F) -> TaskHandle<T>
where
    T: Send + 'static,
    F: Future<Output = Result<T>> + Send + 'static,
{
    let (sender, receiver) = oneshot::channel();
    runtime.spawn(async move {
        let _ = sender.send(future.await);
    });
    TaskHandle { receiver }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_result_arrives_after_completion() {
        let mut handle = spawn_task(&Handle::current(), async {
            tokio::time::sleep(Duration::from_millis(20)).await;
            Ok(42)
        });
        assert!(handle.try_recv().is_none());

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(handle.try_recv().unwrap().unwrap(), 42);
    }

    #[tokio::test]
    async fn test_errors_are_forwarded() {
        let mut handle: TaskHandle<()> =
            spawn_task(&Handle::current(), async { anyhow::bail!("boom") });
        tokio::time::sleep(Duration::from_millis(50)).await;
        let err = handle.try_recv().unwrap().unwrap_err();
        assert_eq!(err.to_string(), "boom");
    }
}
