use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::runtime::Handle;

use super::sources::{text_changes, trigger_queries};
use crate::core::config::DispatchConfig;
use crate::core::errors::{Error, Result};
use crate::models::{Query, SearchOutcome};
use crate::services::search::SearchEngine;
use crate::stream::{ExecutionContext, Observable, Subscription};
use crate::ui::surface::{Display, Surface};

/// Where each part of the pipeline runs.
#[derive(Clone)]
pub struct Contexts {
    /// Single-threaded context that owns the display.
    pub interactive: Arc<dyn ExecutionContext>,
    /// Context for search calls; may run several at once.
    pub worker: Arc<dyn ExecutionContext>,
    /// Runtime that drives the debounce timer.
    pub timer: Handle,
}

/// Turns a surface's button presses and edits into searches and shows the results.
///
/// Typed text is dropped below `min_query_len` characters and debounced; button
/// presses go straight through. The busy flag is raised on the interactive context
/// before a query leaves for the worker and cleared there once the last pending
/// query comes back, so it stays on across overlapping searches. Results are shown in
/// completion order, which under a concurrent worker may differ from query order.
pub struct QueryPipeline {
    engine: Arc<dyn SearchEngine>,
    contexts: Contexts,
    config: DispatchConfig,
}

impl QueryPipeline {
    pub fn new(engine: Arc<dyn SearchEngine>, contexts: Contexts, config: DispatchConfig) -> Self {
        Self {
            engine,
            contexts,
            config,
        }
    }

    /// Merged query stream before any context switch.
    pub fn queries(&self, surface: &Surface) -> Observable<Query> {
        let min_len = self.config.min_query_len;
        let typed = text_changes(Arc::clone(&surface.input))
            .filter(move |query: &Query| query.chars().count() >= min_len)
            .debounce(self.config.debounce_window(), self.contexts.timer.clone());
        let pressed = trigger_queries(Arc::clone(&surface.trigger), Arc::clone(&surface.input));
        Observable::merge(typed, pressed)
    }

    /// Attaches to `surface` and starts dispatching. Fails without side effects if
    /// either control refuses the listener.
    pub fn start(&self, surface: &Surface) -> Result<ActivePipeline> {
        let pending = Arc::new(AtomicUsize::new(0));
        let display: Arc<dyn Display> = Arc::clone(&surface.display);
        let engine = Arc::clone(&self.engine);

        let raise_busy = {
            let pending = Arc::clone(&pending);
            let display = Arc::clone(&display);
            move |query: &Query| {
                tracing::debug!(query = %query, "dispatching query");
                if pending.fetch_add(1, Ordering::SeqCst) == 0 {
                    display.set_busy(true);
                }
            }
        };

        let deliver = {
            let pending = Arc::clone(&pending);
            let display = Arc::clone(&display);
            move |outcome: SearchOutcome| {
                let before = pending.fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| {
                    n.checked_sub(1)
                });
                if before == Ok(1) {
                    display.set_busy(false);
                }
                if let SearchOutcome::Failed { query, message } = &outcome {
                    tracing::warn!("Search for {:?} failed: {}", query, message);
                    display.show_failure(&Error::search(query.as_str(), message));
                }
                display.show_results(outcome.into_results());
            }
        };

        // The subscription is already disposed here, so busy has been cleared.
        let abort = {
            let display = Arc::clone(&display);
            move |error: Error| {
                tracing::error!("Query pipeline stopped: {}", error);
                display.show_failure(&error);
            }
        };

        let subscription = self
            .queries(surface)
            .observe_on(Arc::clone(&self.contexts.interactive))
            .inspect(raise_busy)
            .observe_on(Arc::clone(&self.contexts.worker))
            .map(move |query| run_search(&*engine, query))
            .observe_on(Arc::clone(&self.contexts.interactive))
            .subscribe(deliver, abort)?;

        // Every way of disposing clears busy for searches that will never be delivered.
        {
            let pending = Arc::clone(&pending);
            subscription.add_teardown(move || {
                if pending.swap(0, Ordering::SeqCst) > 0 {
                    display.set_busy(false);
                }
            });
        }

        tracing::debug!(
            debounce_ms = self.config.debounce_ms,
            min_query_len = self.config.min_query_len,
            "query pipeline started"
        );
        Ok(ActivePipeline {
            subscription,
            pending,
        })
    }
}

/// One running pipeline. Dropping it disposes the pipeline.
pub struct ActivePipeline {
    subscription: Subscription,
    pending: Arc<AtomicUsize>,
}

impl ActivePipeline {
    pub fn subscription(&self) -> &Subscription {
        &self.subscription
    }

    pub fn is_disposed(&self) -> bool {
        self.subscription.is_disposed()
    }

    /// Queries that have raised the busy flag and not yet been delivered.
    pub fn pending(&self) -> usize {
        self.pending.load(Ordering::SeqCst)
    }

    /// Detaches both controls and stops delivery. Clears the busy flag if searches
    /// were still out; their results are discarded. Call from the interactive context.
    pub fn dispose(&self) {
        self.subscription.dispose();
    }
}

impl Drop for ActivePipeline {
    fn drop(&mut self) {
        self.dispose();
    }
}

fn run_search(engine: &dyn SearchEngine, query: Query) -> SearchOutcome {
    match panic::catch_unwind(AssertUnwindSafe(|| engine.search(&query))) {
        Ok(Ok(results)) => {
            tracing::debug!(query = %query, hits = results.len(), "search finished");
            SearchOutcome::Found { query, results }
        }
        Ok(Err(e)) => SearchOutcome::Failed {
            query,
            message: format!("{e:#}"),
        },
        Err(payload) => SearchOutcome::Failed {
            query,
            message: format!("search engine panicked: {}", panic_message(payload.as_ref())),
        },
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        *message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "unknown panic"
    }
}
