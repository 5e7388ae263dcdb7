use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use super::{Notification, Observable};

#[derive(Default)]
struct DebounceState {
    generation: u64,
    timer: Option<JoinHandle<()>>,
}

impl DebounceState {
    fn cancel(&mut self) {
        self.generation += 1;
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}

impl<T: Send + 'static> Observable<T> {
    /// Emits a value only once `window` passes without another upstream value.
    ///
    /// Every new value restarts the window and discards the one it supersedes. The
    /// timer runs on `timer`; the surviving value is emitted from that runtime.
    pub fn debounce(self, window: Duration, timer: Handle) -> Observable<T> {
        Observable::create(move |downstream| {
            let state = Arc::new(Mutex::new(DebounceState::default()));

            let pending = Arc::clone(&state);
            downstream.on_dispose(move || {
                pending
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .cancel();
            });

            let timer = timer.clone();
            let forward = downstream.clone();
            self.attach(downstream.upstream(move |notification: Notification<T>| {
                let mut guard = state.lock().unwrap_or_else(PoisonError::into_inner);
                guard.cancel();
                match notification {
                    Notification::Next(value) => {
                        let generation = guard.generation;
                        let state = Arc::clone(&state);
                        let forward = forward.clone();
                        guard.timer = Some(timer.spawn(async move {
                            tokio::time::sleep(window).await;
                            {
                                let mut guard =
                                    state.lock().unwrap_or_else(PoisonError::into_inner);
                                if guard.generation != generation {
                                    return;
                                }
                                guard.timer = None;
                            }
                            tracing::trace!(?window, "debounce window elapsed");
                            forward.next(value);
                        }));
                    }
                    Notification::Error(error) => {
                        drop(guard);
                        forward.error(error);
                    }
                }
            }))
        })
    }
}
