use std::sync::Arc;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::types::Symbol;

/// Abstraction over a handle that can be queried for completion and aborted.
pub trait Abortable {
    /// Abort the underlying task if it is still running.
    fn abort(&mut self);
    /// Return `true` if the underlying task has completed.
    fn is_finished(&self) -> bool;
}

impl Abortable for JoinHandle<()> {
    fn abort(&mut self) {
        // JoinHandle::abort takes &self
        Self::abort(self);
    }

    fn is_finished(&self) -> bool {
        Self::is_finished(self)
    }
}

/// Abstraction over a one-shot stop signal.
pub trait Stoppable {
    /// Send a best-effort stop signal to request graceful shutdown.
    fn send(self);
}

impl Stoppable for oneshot::Sender<()> {
    fn send(self) {
        let _ = Self::send(self, ());
    }
}

/// Drop-time logic for stream sessions:
/// - send a best-effort stop signal if present
/// - abort the task if it hasn't finished yet
pub fn drop_impl<H, S>(inner: &mut Option<H>, stop_tx: &mut Option<S>)
where
    H: Abortable,
    S: Stoppable,
{
    if let Some(tx) = stop_tx.take() {
        tx.send();
    }
    if let Some(mut h) = inner.take()
        && !h.is_finished()
    {
        h.abort();
    }
}

/// One open streaming subscription: the subscribed symbol set, a transport
/// task, and a cooperative stop channel.
///
/// `close()` sends the stop signal (the transport sends its per-symbol
/// unsubscribe instructions and closes the connection) and awaits the task.
/// Closing is idempotent: the second call finds the channel and handle
/// already taken and does nothing. A session obtained from a failed connect
/// attempt (see [`StreamSession::inert`]) has neither, so its `close()` is a
/// no-op from the start.
///
/// Dropping an unclosed session sends the stop signal and aborts the task
/// rather than awaiting it.
#[derive(Debug)]
pub struct StreamSession {
    symbols: Arc<[Symbol]>,
    join: Option<JoinHandle<()>>,
    stop_tx: Option<oneshot::Sender<()>>,
}

impl StreamSession {
    /// Wrap a spawned transport task and its stop channel.
    #[must_use]
    pub fn new(symbols: Arc<[Symbol]>, join: JoinHandle<()>, stop_tx: oneshot::Sender<()>) -> Self {
        Self {
            symbols,
            join: Some(join),
            stop_tx: Some(stop_tx),
        }
    }

    /// A session with no live transport; never delivers and closes as a no-op.
    #[must_use]
    pub fn inert(symbols: Arc<[Symbol]>) -> Self {
        Self {
            symbols,
            join: None,
            stop_tx: None,
        }
    }

    /// The symbols this session subscribed to.
    #[must_use]
    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    /// Whether the transport task is still running.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.join.as_ref().is_some_and(|j| !j.is_finished())
    }

    /// Request graceful shutdown and wait for the transport task to finish.
    pub async fn close(&mut self) {
        if let Some(tx) = self.stop_tx.take() {
            let _ = tx.send(());
        }
        if let Some(join) = self.join.take() {
            let _ = join.await;
        }
    }
}

impl Drop for StreamSession {
    fn drop(&mut self) {
        drop_impl(&mut self.join, &mut self.stop_tx);
    }
}
