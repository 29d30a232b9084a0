use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures_util::FutureExt;
use futures_util::future;

/// A boxed, sendable future that owns everything it needs.
pub type BoxFuture<T> = future::BoxFuture<'static, T>;

// ---------------------------------------------------------------------------
// Task
// ---------------------------------------------------------------------------

/// A deferred fallible computation.
///
/// The future inside is not polled until the task is run, so building a
/// task has no side effects.
pub struct Task<T, E> {
    future: BoxFuture<Result<T, E>>,
}

impl<T, E> Task<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    pub fn new<F>(future: F) -> Self
    where
        F: Future<Output = Result<T, E>> + Send + 'static,
    {
        Self {
            future: future.boxed(),
        }
    }

    /// A task that succeeds with `value`.
    pub fn succeed(value: T) -> Self {
        Self::new(future::ready(Ok(value)))
    }

    /// A task that fails with `error`.
    pub fn fail(error: E) -> Self {
        Self::new(future::ready(Err(error)))
    }

    pub fn map<U, F>(self, f: F) -> Task<U, E>
    where
        U: Send + 'static,
        F: FnOnce(T) -> U + Send + 'static,
    {
        Task::new(self.future.map(|result| result.map(f)))
    }

    pub fn map_err<E2, F>(self, f: F) -> Task<T, E2>
    where
        E2: Send + 'static,
        F: FnOnce(E) -> E2 + Send + 'static,
    {
        Task::new(self.future.map(|result| result.map_err(f)))
    }

    /// Chain another task onto a successful result.
    pub fn and_then<U, F>(self, f: F) -> Task<U, E>
    where
        U: Send + 'static,
        F: FnOnce(T) -> Task<U, E> + Send + 'static,
    {
        Task::new(async move {
            let value = self.future.await?;
            f(value).future.await
        })
    }

    pub async fn run(self) -> Result<T, E> {
        self.future.await
    }
}

impl<T, E> fmt::Debug for Task<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Task(..)")
    }
}

// ---------------------------------------------------------------------------
// Effect
// ---------------------------------------------------------------------------

/// A description of pending work that yields messages of type `M`.
///
/// Effects are inert values: they are built by update functions and
/// handed to a runtime, which executes every leaf and routes each
/// resulting message back into the update loop. Every leaf yields exactly
/// one message.
#[must_use = "effects do nothing unless handed to a runtime"]
pub struct Effect<M> {
    inner: Inner<M>,
}

enum Inner<M> {
    None,
    Future(BoxFuture<M>),
    Batch(Vec<Effect<M>>),
}

impl<M> Effect<M>
where
    M: Send + 'static,
{
    /// An effect that does nothing.
    pub fn none() -> Self {
        Self { inner: Inner::None }
    }

    /// Run a task whose success and failure are both messages.
    pub fn task(task: Task<M, M>) -> Self {
        Self::future(task.future.map(|result| match result {
            Ok(msg) | Err(msg) => msg,
        }))
    }

    /// Run a task, turning its success and failure into messages.
    pub fn attempt<T, E, F, G>(task: Task<T, E>, on_ok: F, on_err: G) -> Self
    where
        T: Send + 'static,
        E: Send + 'static,
        F: FnOnce(T) -> M + Send + 'static,
        G: FnOnce(E) -> M + Send + 'static,
    {
        Self::task(task.map(on_ok).map_err(on_err))
    }

    /// An effect backed by any future yielding a message.
    pub fn future<F>(future: F) -> Self
    where
        F: Future<Output = M> + Send + 'static,
    {
        Self {
            inner: Inner::Future(future.boxed()),
        }
    }

    /// Yield `msg` as soon as the effect runs.
    pub fn receive(msg: M) -> Self {
        Self::future(future::ready(msg))
    }

    /// Combine several effects; all of them run concurrently.
    pub fn batch(effects: impl IntoIterator<Item = Effect<M>>) -> Self {
        let effects: Vec<_> = effects.into_iter().filter(|e| !e.is_none()).collect();
        if effects.is_empty() {
            Self::none()
        } else {
            Self {
                inner: Inner::Batch(effects),
            }
        }
    }

    /// Lift every message this effect yields into another message type.
    pub fn map<N, F>(self, f: F) -> Effect<N>
    where
        N: Send + 'static,
        F: Fn(M) -> N + Send + Sync + 'static,
    {
        self.map_shared(Arc::new(f))
    }

    fn map_shared<N>(self, f: Arc<dyn Fn(M) -> N + Send + Sync>) -> Effect<N>
    where
        N: Send + 'static,
    {
        match self.inner {
            Inner::None => Effect::none(),
            Inner::Future(fut) => Effect::future(fut.map(move |msg| f(msg))),
            Inner::Batch(effects) => Effect {
                inner: Inner::Batch(
                    effects
                        .into_iter()
                        .map(|e| e.map_shared(Arc::clone(&f)))
                        .collect(),
                ),
            },
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self.inner, Inner::None)
    }

    /// Number of leaf futures, i.e. the number of messages this effect
    /// will yield.
    pub fn len(&self) -> usize {
        match &self.inner {
            Inner::None => 0,
            Inner::Future(_) => 1,
            Inner::Batch(effects) => effects.iter().map(Effect::len).sum(),
        }
    }

    /// True when running this effect yields no messages.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Flatten into the leaf futures, in declaration order.
    pub fn into_futures(self) -> Vec<BoxFuture<M>> {
        let mut out = Vec::with_capacity(self.len());
        self.flatten_into(&mut out);
        out
    }

    fn flatten_into(self, out: &mut Vec<BoxFuture<M>>) {
        match self.inner {
            Inner::None => {}
            Inner::Future(fut) => out.push(fut),
            Inner::Batch(effects) => {
                for effect in effects {
                    effect.flatten_into(out);
                }
            }
        }
    }

    /// Run every leaf concurrently on the current task and return the
    /// messages in declaration order.
    pub async fn collect(self) -> Vec<M> {
        future::join_all(self.into_futures()).await
    }
}

impl<M> Default for Effect<M>
where
    M: Send + 'static,
{
    fn default() -> Self {
        Self::none()
    }
}

impl<M> fmt::Debug for Effect<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.inner {
            Inner::None => f.write_str("Effect::None"),
            Inner::Future(_) => f.write_str("Effect::Future(..)"),
            Inner::Batch(effects) => f.debug_tuple("Effect::Batch").field(effects).finish(),
        }
    }
}
