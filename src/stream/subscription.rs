use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

type Teardown = Box<dyn FnOnce() + Send>;

struct Inner {
    disposed: AtomicBool,
    teardowns: Mutex<Vec<Teardown>>,
}

/// Handle on one live run of an [`Observable`](super::Observable).
///
/// Every stage of a composed stream shares the same subscription, so disposing it
/// stops timers, releases event sources and gates values still travelling between
/// contexts. Disposal is monotonic and idempotent: teardown callbacks run exactly once.
#[derive(Clone)]
pub struct Subscription {
    inner: Arc<Inner>,
}

impl Subscription {
    pub(crate) fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                disposed: AtomicBool::new(false),
                teardowns: Mutex::new(Vec::new()),
            }),
        }
    }

    pub fn is_disposed(&self) -> bool {
        self.inner.disposed.load(Ordering::Acquire)
    }

    pub fn dispose(&self) {
        if self.inner.disposed.swap(true, Ordering::AcqRel) {
            return;
        }
        let teardowns = std::mem::take(
            &mut *self
                .inner
                .teardowns
                .lock()
                .unwrap_or_else(PoisonError::into_inner),
        );
        for teardown in teardowns {
            teardown();
        }
    }

    /// Registers work to run on disposal. Runs immediately if already disposed.
    pub(crate) fn add_teardown(&self, teardown: impl FnOnce() + Send + 'static) {
        {
            let mut teardowns = self
                .inner
                .teardowns
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            if !self.is_disposed() {
                teardowns.push(Box::new(teardown));
                return;
            }
        }
        teardown();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("disposed", &self.is_disposed())
            .finish()
    }
}
