use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};

use super::{Emitter, Notification, Observable};

/// Funnels notifications from several producers into one emitter, one at a time.
///
/// Whoever arrives while another producer is emitting leaves its notification in the
/// queue; the emitting producer drains it before returning. Re-entrant pushes from
/// downstream take the same path instead of deadlocking.
struct Serializer<T> {
    state: Mutex<SerialState<T>>,
    downstream: Emitter<T>,
}

struct SerialState<T> {
    emitting: bool,
    queue: VecDeque<Notification<T>>,
}

impl<T> Serializer<T> {
    fn new(downstream: Emitter<T>) -> Self {
        Self {
            state: Mutex::new(SerialState {
                emitting: false,
                queue: VecDeque::new(),
            }),
            downstream,
        }
    }

    fn push(&self, notification: Notification<T>) {
        {
            let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            if state.emitting {
                state.queue.push_back(notification);
                return;
            }
            state.emitting = true;
        }

        let mut current = Some(notification);
        while let Some(notification) = current {
            self.downstream.deliver(notification);
            let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            current = state.queue.pop_front();
            if current.is_none() {
                state.emitting = false;
            }
        }
    }
}

impl<T: Send + 'static> Observable<T> {
    /// Emits every value from both streams in arrival order.
    ///
    /// Each stream keeps its own ordering; nothing is promised across the two. Both
    /// share the merged subscription, so disposing it cancels both.
    pub fn merge(first: Observable<T>, second: Observable<T>) -> Observable<T> {
        Observable::create(move |downstream| {
            let serializer = Arc::new(Serializer::new(downstream.clone()));
            for source in [&first, &second] {
                let serializer = Arc::clone(&serializer);
                source.attach(
                    downstream.upstream(move |notification: Notification<T>| {
                        serializer.push(notification)
                    }),
                )?;
            }
            Ok(())
        })
    }

    pub fn merge_with(self, other: Observable<T>) -> Observable<T> {
        Observable::merge(self, other)
    }
}
