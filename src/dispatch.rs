//! Message passing between background tasks and the UI-owning loop.
//!
//! Background work never touches display state directly. It posts a closure
//! through a [`UiHandle`]; the loop that owns the state receives it through
//! the matching [`UiLoop`] and runs it against `&mut S`. This keeps every
//! mutation of `S` on a single task without any locking.
//!
//! ```text
//! worker task ──post(|s| ..)──▶ mpsc ──▶ UiLoop::pump_until / drain ──▶ &mut S
//! ```

use std::time::Duration;

use tokio::{
    sync::mpsc::{self, UnboundedReceiver, UnboundedSender},
    time::{Instant, timeout_at},
};

pub type UiTask<S> = Box<dyn FnOnce(&mut S) + Send + 'static>;

/// Creates a connected handle/loop pair for state of type `S`.
pub fn channel<S>() -> (UiHandle<S>, UiLoop<S>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (UiHandle { tx }, UiLoop { rx })
}

pub struct UiHandle<S> {
    tx: UnboundedSender<UiTask<S>>,
}

impl<S> Clone for UiHandle<S> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

impl<S> UiHandle<S> {
    /// Queues `task` for the UI loop. Returns `false` once the loop is gone,
    /// in which case the task is dropped unrun.
    pub fn post<F>(&self, task: F) -> bool
    where
        F: FnOnce(&mut S) + Send + 'static,
    {
        self.tx.send(Box::new(task)).is_ok()
    }
}

pub struct UiLoop<S> {
    rx: UnboundedReceiver<UiTask<S>>,
}

impl<S> UiLoop<S> {
    /// Runs every task that is already queued and returns how many ran.
    pub fn drain(&mut self, state: &mut S) -> usize {
        let mut ran = 0;
        while let Ok(task) = self.rx.try_recv() {
            task(state);
            ran += 1;
        }
        ran
    }

    /// Runs incoming tasks until `done(state)` holds or `limit` elapses.
    ///
    /// Returns whether `done` was satisfied.
    pub async fn pump_until<P>(&mut self, state: &mut S, limit: Duration, done: P) -> bool
    where
        P: Fn(&S) -> bool,
    {
        let deadline = Instant::now() + limit;
        while !done(state) {
            match timeout_at(deadline, self.rx.recv()).await {
                Ok(Some(task)) => task(state),
                Ok(None) | Err(_) => return done(state),
            }
        }
        true
    }
}
