//! The dispatch loop that executes effects and feeds their messages into
//! an update function.
use std::fmt;

use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, trace};

use crate::effect::Effect;

/// Runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeOptions {
    /// Return once no effect is in flight and no message is queued.
    /// Turn off for long-lived loops driven by [`RuntimeHandle::dispatch`].
    pub stop_when_idle: bool,
    /// Stop after this many messages have gone through `update`.
    pub max_messages: Option<u64>,
}

impl Default for RuntimeOptions {
    fn default() -> Self {
        Self {
            stop_when_idle: true,
            max_messages: None,
        }
    }
}

/// Why [`Runtime::run`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Nothing in flight and nothing queued.
    Idle,
    /// [`RuntimeHandle::shutdown`] was called. In-flight effects are aborted.
    Cancelled,
    /// `max_messages` was reached.
    Limit,
    /// Every handle was dropped and nothing is in flight.
    Closed,
}

#[derive(Debug)]
pub struct RunOutcome<Model> {
    pub model: Model,
    /// Messages passed to `update`.
    pub processed: u64,
    pub reason: StopReason,
}

/// A cloneable way to talk to a running [`Runtime`] from outside.
pub struct RuntimeHandle<M> {
    tx: mpsc::UnboundedSender<M>,
    cancel: CancellationToken,
}

impl<M> Clone for RuntimeHandle<M> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
            cancel: self.cancel.clone(),
        }
    }
}

impl<M> fmt::Debug for RuntimeHandle<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuntimeHandle")
            .field("cancelled", &self.cancel.is_cancelled())
            .finish()
    }
}

impl<M> RuntimeHandle<M> {
    /// Queue a message for `update`. Returns `false` once the runtime has
    /// stopped.
    pub fn dispatch(&self, msg: M) -> bool {
        self.tx.send(msg).is_ok()
    }

    /// Stop the runtime and abort in-flight effects.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }
}

/// Executes effects on the tokio runtime and routes each resulting message
/// through an update function, one message at a time.
pub struct Runtime<M> {
    opts: RuntimeOptions,
    tx: mpsc::UnboundedSender<M>,
    rx: mpsc::UnboundedReceiver<M>,
    cancel: CancellationToken,
}

impl<M> fmt::Debug for Runtime<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime").field("opts", &self.opts).finish()
    }
}

impl<M> Runtime<M>
where
    M: fmt::Debug + Send + 'static,
{
    pub fn new(opts: RuntimeOptions) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            opts,
            tx,
            rx,
            cancel: CancellationToken::new(),
        }
    }

    pub fn handle(&self) -> RuntimeHandle<M> {
        RuntimeHandle {
            tx: self.tx.clone(),
            cancel: self.cancel.clone(),
        }
    }

    /// Run `init`, then keep feeding messages into `update` and executing
    /// the effects it returns until a [`StopReason`] applies.
    pub async fn run<Model, U>(self, model: Model, init: Effect<M>, mut update: U) -> RunOutcome<Model>
    where
        U: FnMut(Model, M) -> (Model, Effect<M>),
    {
        let Runtime {
            opts,
            tx,
            mut rx,
            cancel,
        } = self;
        // Only external handles keep the inbox open.
        drop(tx);

        let mut tasks = JoinSet::new();
        spawn_effect(&mut tasks, init);

        let mut model = model;
        let mut processed = 0u64;
        let mut inbox_open = true;

        let reason = loop {
            if let Some(max) = opts.max_messages
                && processed >= max
            {
                break StopReason::Limit;
            }
            if cancel.is_cancelled() {
                break StopReason::Cancelled;
            }

            let msg = if tasks.is_empty() && opts.stop_when_idle {
                match rx.try_recv() {
                    Ok(msg) => msg,
                    Err(_) => break StopReason::Idle,
                }
            } else if tasks.is_empty() && !inbox_open {
                break StopReason::Closed;
            } else {
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => break StopReason::Cancelled,
                    Some(joined) = tasks.join_next(), if !tasks.is_empty() => match joined {
                        Ok(msg) => msg,
                        Err(e) => {
                            error!(error = %e, "effect task failed without a message");
                            continue;
                        }
                    },
                    received = rx.recv(), if inbox_open => match received {
                        Some(msg) => msg,
                        None => {
                            inbox_open = false;
                            continue;
                        }
                    },
                    else => break StopReason::Closed,
                }
            };

            trace!(?msg, "dispatch");
            let (next, effect) = update(model, msg);
            model = next;
            processed += 1;
            spawn_effect(&mut tasks, effect);
        };

        if !tasks.is_empty() {
            debug!(in_flight = tasks.len(), ?reason, "aborting in-flight effects");
            tasks.shutdown().await;
        }
        debug!(processed, ?reason, "runtime stopped");

        RunOutcome {
            model,
            processed,
            reason,
        }
    }
}

fn spawn_effect<M>(tasks: &mut JoinSet<M>, effect: Effect<M>)
where
    M: Send + 'static,
{
    for fut in effect.into_futures() {
        tasks.spawn(fut);
    }
}
