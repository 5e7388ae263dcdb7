use std::sync::Arc;

use super::{ExecutionContext, Notification, Observable};
use crate::core::errors::Result;

impl<T: Send + 'static> Observable<T> {
    /// Transforms every value. `f` runs in whichever context delivers the value.
    pub fn map<U: Send + 'static>(
        self,
        f: impl Fn(T) -> U + Send + Sync + 'static,
    ) -> Observable<U> {
        self.try_map(move |value| Ok(f(value)))
    }

    /// Like [`Observable::map`], but an `Err` from `f` terminates the stream and reaches
    /// the subscriber's error handler.
    pub fn try_map<U: Send + 'static>(
        self,
        f: impl Fn(T) -> Result<U> + Send + Sync + 'static,
    ) -> Observable<U> {
        let f = Arc::new(f);
        Observable::create(move |downstream| {
            let f = Arc::clone(&f);
            let forward = downstream.clone();
            self.attach(downstream.upstream(move |notification: Notification<T>| {
                match notification {
                    Notification::Next(value) => match f(value) {
                        Ok(mapped) => forward.next(mapped),
                        Err(error) => forward.error(error),
                    },
                    Notification::Error(error) => forward.error(error),
                }
            }))
        })
    }

    /// Drops values for which `predicate` is false.
    pub fn filter(self, predicate: impl Fn(&T) -> bool + Send + Sync + 'static) -> Observable<T> {
        let predicate = Arc::new(predicate);
        Observable::create(move |downstream| {
            let predicate = Arc::clone(&predicate);
            let forward = downstream.clone();
            self.attach(downstream.upstream(move |notification: Notification<T>| {
                match notification {
                    Notification::Next(value) if !predicate(&value) => {}
                    other => forward.deliver(other),
                }
            }))
        })
    }

    /// Calls `effect` for each value without changing the value or its timing (do-on-each).
    pub fn inspect(self, effect: impl Fn(&T) + Send + Sync + 'static) -> Observable<T> {
        let effect = Arc::new(effect);
        Observable::create(move |downstream| {
            let effect = Arc::clone(&effect);
            let forward = downstream.clone();
            self.attach(downstream.upstream(move |notification: Notification<T>| {
                if let Notification::Next(value) = &notification {
                    effect(value);
                }
                forward.deliver(notification);
            }))
        })
    }

    /// Moves every downstream stage onto `context`.
    ///
    /// The producing side only enqueues; it never waits for the consumer. A value that
    /// is still queued when the subscription is disposed is dropped when its task runs.
    pub fn observe_on(self, context: Arc<dyn ExecutionContext>) -> Observable<T> {
        Observable::create(move |downstream| {
            let context = Arc::clone(&context);
            let forward = downstream.clone();
            self.attach(downstream.upstream(move |notification: Notification<T>| {
                let forward = forward.clone();
                context.submit(Box::new(move || forward.deliver(notification)));
            }))
        })
    }
}
