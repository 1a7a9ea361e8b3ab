//! Optimistic apply/rollback helper.
//!
//! Several client flows (read-state, likes, votes) share the same shape:
//! mutate local state immediately so the UI responds without latency, then
//! confirm asynchronously and replay the inverse mutation if confirmation
//! fails. This helper captures that shape once.

use std::future::Future;

use tokio::sync::Mutex;

/// Apply a local mutation, await confirmation, and roll back on failure.
///
/// `apply` runs under the lock and returns an undo token describing what
/// it changed; the lock is released while `confirm` is awaited. On `Err`,
/// `rollback` runs under the lock with that token and the error is
/// returned to the caller. Local state never stays in a shape the
/// confirmation rejected.
pub async fn apply_with_rollback<S, T, E, F>(
    state: &Mutex<S>,
    apply: impl FnOnce(&mut S) -> T,
    confirm: F,
    rollback: impl FnOnce(&mut S, T),
) -> Result<(), E>
where
    F: Future<Output = Result<(), E>>,
{
    let token = apply(&mut *state.lock().await);

    match confirm.await {
        Ok(()) => Ok(()),
        Err(e) => {
            rollback(&mut *state.lock().await, token);
            Err(e)
        }
    }
}
