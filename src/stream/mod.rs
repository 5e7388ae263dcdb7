//! Push-based stream primitives.
//!
//! An [`Observable`] is a recipe: nothing runs until [`Observable::subscribe`] is
//! called, at which point every stage of the chain is wired to a single shared
//! [`Subscription`]. Producers push values through an [`Emitter`]; operators wrap the
//! downstream emitter and hand a new one to their upstream. Disposing the subscription
//! runs every registered teardown once and silences every emitter in the chain.

mod context;
mod debounce;
mod merge;
mod operators;
mod subscription;

use std::sync::Arc;

use crate::core::errors::{Error, Result};

pub use context::{
    interactive_pair, ExecutionContext, ImmediateContext, InteractiveContext, InteractiveLoop,
    Task, WorkerPool,
};
pub use subscription::Subscription;

/// A single signal travelling down a stream.
#[derive(Debug)]
pub enum Notification<T> {
    Next(T),
    Error(Error),
}

type Sink<T> = Arc<dyn Fn(Notification<T>) + Send + Sync>;
type OnSubscribe<T> = Arc<dyn Fn(Emitter<T>) -> Result<()> + Send + Sync>;

/// Producer-side handle for pushing into a subscribed stream.
pub struct Emitter<T> {
    sink: Sink<T>,
    subscription: Subscription,
}

impl<T> Clone for Emitter<T> {
    fn clone(&self) -> Self {
        Self {
            sink: Arc::clone(&self.sink),
            subscription: self.subscription.clone(),
        }
    }
}

impl<T> Emitter<T> {
    fn new(sink: Sink<T>, subscription: Subscription) -> Self {
        Self { sink, subscription }
    }

    pub fn next(&self, value: T) {
        self.deliver(Notification::Next(value));
    }

    pub fn error(&self, error: Error) {
        self.deliver(Notification::Error(error));
    }

    /// Forwards a notification unless the subscription has been disposed.
    pub fn deliver(&self, notification: Notification<T>) {
        if self.subscription.is_disposed() {
            return;
        }
        (self.sink)(notification);
    }

    pub fn is_disposed(&self) -> bool {
        self.subscription.is_disposed()
    }

    /// Registers cleanup for whatever this producer acquired.
    pub fn on_dispose(&self, teardown: impl FnOnce() + Send + 'static) {
        self.subscription.add_teardown(teardown);
    }

    /// Emitter for an upstream stage that shares this emitter's subscription.
    fn upstream<U>(&self, sink: impl Fn(Notification<U>) + Send + Sync + 'static) -> Emitter<U> {
        Emitter::new(Arc::new(sink), self.subscription.clone())
    }
}

/// Lazily evaluated, cloneable stream of `T` values.
pub struct Observable<T> {
    on_subscribe: OnSubscribe<T>,
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            on_subscribe: Arc::clone(&self.on_subscribe),
        }
    }
}

impl<T: Send + 'static> Observable<T> {
    /// Builds a stream from a producer that is started once per subscription.
    ///
    /// Returning an error aborts the subscription; teardowns the producer already
    /// registered are run before the error reaches the subscriber.
    pub fn create(on_subscribe: impl Fn(Emitter<T>) -> Result<()> + Send + Sync + 'static) -> Self {
        Self {
            on_subscribe: Arc::new(on_subscribe),
        }
    }

    fn attach(&self, emitter: Emitter<T>) -> Result<()> {
        (self.on_subscribe)(emitter)
    }

    /// Starts the stream. `on_next` sees every value that survives the chain;
    /// `on_error` sees the first failure, after which the subscription is disposed.
    pub fn subscribe(
        &self,
        on_next: impl Fn(T) + Send + Sync + 'static,
        on_error: impl Fn(Error) + Send + Sync + 'static,
    ) -> Result<Subscription> {
        let subscription = Subscription::new();
        let guard = subscription.clone();
        let sink = move |notification: Notification<T>| {
            if guard.is_disposed() {
                return;
            }
            match notification {
                Notification::Next(value) => on_next(value),
                Notification::Error(error) => {
                    guard.dispose();
                    on_error(error);
                }
            }
        };

        if let Err(error) = self.attach(Emitter::new(Arc::new(sink), subscription.clone())) {
            subscription.dispose();
            return Err(error);
        }
        Ok(subscription)
    }
}
