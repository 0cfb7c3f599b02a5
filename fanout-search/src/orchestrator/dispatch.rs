//! Bounded fan-out shared by the search and suggestion engines.
//!
//! Every task is spawned immediately but must hold a permit from a
//! counting gate before its body runs, so at most `ceiling` bodies execute
//! at once. Outcomes are returned in task order regardless of completion
//! order. Tasks still running when the returned future is dropped are
//! aborted.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::{AbortHandle, JoinError};

/// Aborts every tracked task when dropped.
struct AbortOnDrop(Vec<AbortHandle>);

impl Drop for AbortOnDrop {
    fn drop(&mut self) {
        for handle in &self.0 {
            handle.abort();
        }
    }
}

/// Run `tasks` with at most `ceiling` executing concurrently.
///
/// Each task is built lazily by its closure once a permit is held; the
/// permit is released as soon as the task finishes. A panicking task
/// surfaces as an `Err(JoinError)` in its slot and does not disturb the
/// others.
pub(crate) async fn run_gated<T, F, Fut>(tasks: Vec<F>, ceiling: usize) -> Vec<Result<T, JoinError>>
where
    F: FnOnce() -> Fut + Send + 'static,
    Fut: Future<Output = T> + Send + 'static,
    T: Send + 'static,
{
    let gate = Arc::new(Semaphore::new(ceiling.max(1)));

    let handles: Vec<_> = tasks
        .into_iter()
        .map(|task| {
            let gate = Arc::clone(&gate);
            tokio::spawn(async move {
                // The gate is local to this call and never closed.
                let _permit = gate.acquire_owned().await.ok();
                task().await
            })
        })
        .collect();

    let _guard = AbortOnDrop(handles.iter().map(|h| h.abort_handle()).collect());

    futures::future::join_all(handles).await
}
