#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, ThreadId};
use std::time::Duration;

use anyhow::{anyhow, Result};
use livesearch::core::config::DispatchConfig;
use livesearch::core::errors::{Error, Result as DispatchResult};
use livesearch::dispatch::{Contexts, LifecycleController, QueryPipeline};
use livesearch::models::ResultSet;
use livesearch::services::search::{CatalogEngine, SearchEngine};
use livesearch::stream::{ExecutionContext, ImmediateContext, Task};
use livesearch::ui::{
    Button, Control, Display, Listener, ListenerId, Surface, TextField, TextInput,
};
use tokio::runtime::Handle;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shown {
    Busy(bool),
    Results(Vec<String>),
    Failure(String),
}

/// Display that records every call and the thread it arrived on.
#[derive(Default)]
pub struct RecordingDisplay {
    events: Mutex<Vec<(Shown, ThreadId)>>,
}

impl RecordingDisplay {
    fn record(&self, shown: Shown) {
        self.events
            .lock()
            .unwrap()
            .push((shown, thread::current().id()));
    }

    pub fn events(&self) -> Vec<Shown> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .map(|(shown, _)| shown.clone())
            .collect()
    }

    pub fn threads(&self) -> Vec<ThreadId> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .map(|(_, thread)| *thread)
            .collect()
    }

    pub fn results(&self) -> Vec<Vec<String>> {
        self.events()
            .into_iter()
            .filter_map(|shown| match shown {
                Shown::Results(results) => Some(results),
                _ => None,
            })
            .collect()
    }
}

impl Display for RecordingDisplay {
    fn set_busy(&self, busy: bool) {
        self.record(Shown::Busy(busy));
    }

    fn show_results(&self, results: ResultSet) {
        self.record(Shown::Results(results));
    }

    fn show_failure(&self, failure: &Error) {
        self.record(Shown::Failure(failure.to_string()));
    }
}

/// Button that counts how often a listener is detached from it.
#[derive(Default)]
pub struct CountingButton {
    pub inner: Button,
    pub deregistrations: AtomicUsize,
}

impl CountingButton {
    pub fn click(&self) {
        self.inner.click();
    }

    pub fn deregistrations(&self) -> usize {
        self.deregistrations.load(Ordering::SeqCst)
    }
}

impl Control<()> for CountingButton {
    fn name(&self) -> &'static str {
        self.inner.name()
    }

    fn register(&self, listener: Listener<()>) -> DispatchResult<ListenerId> {
        self.inner.register(listener)
    }

    fn deregister(&self, id: ListenerId) {
        self.deregistrations.fetch_add(1, Ordering::SeqCst);
        self.inner.deregister(id);
    }
}

/// Text field that counts how often a listener is detached from it.
#[derive(Default)]
pub struct CountingField {
    pub inner: TextField,
    pub deregistrations: AtomicUsize,
}

impl CountingField {
    pub fn set_text(&self, text: &str) {
        self.inner.set_text(text);
    }

    pub fn deregistrations(&self) -> usize {
        self.deregistrations.load(Ordering::SeqCst)
    }

    pub fn listener_count(&self) -> usize {
        self.inner.listener_count()
    }
}

impl Control<String> for CountingField {
    fn name(&self) -> &'static str {
        self.inner.name()
    }

    fn register(&self, listener: Listener<String>) -> DispatchResult<ListenerId> {
        self.inner.register(listener)
    }

    fn deregister(&self, id: ListenerId) {
        self.deregistrations.fetch_add(1, Ordering::SeqCst);
        self.inner.deregister(id);
    }
}

impl TextInput for CountingField {
    fn text(&self) -> String {
        self.inner.text()
    }
}

/// Catalog engine that logs each call, can be told to fail, panic or stall on given
/// queries.
pub struct ScriptedEngine {
    catalog: CatalogEngine,
    calls: Mutex<Vec<(String, ThreadId)>>,
    failing: Mutex<Vec<String>>,
    panicking: Mutex<Vec<String>>,
    delays: Mutex<HashMap<String, Duration>>,
}

impl ScriptedEngine {
    pub fn new() -> Self {
        Self {
            catalog: CatalogEngine::new(["Brie de Meaux", "Cheddar", "Edam", "Feta", "Gouda"]),
            calls: Mutex::new(Vec::new()),
            failing: Mutex::new(Vec::new()),
            panicking: Mutex::new(Vec::new()),
            delays: Mutex::new(HashMap::new()),
        }
    }

    pub fn fail_on(&self, query: &str) {
        self.failing.lock().unwrap().push(query.to_string());
    }

    pub fn panic_on(&self, query: &str) {
        self.panicking.lock().unwrap().push(query.to_string());
    }

    pub fn delay(&self, query: &str, delay: Duration) {
        self.delays.lock().unwrap().insert(query.to_string(), delay);
    }

    pub fn queries(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(query, _)| query.clone())
            .collect()
    }

    pub fn threads(&self) -> Vec<ThreadId> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(_, thread)| *thread)
            .collect()
    }
}

impl SearchEngine for ScriptedEngine {
    fn search(&self, query: &str) -> Result<ResultSet> {
        self.calls
            .lock()
            .unwrap()
            .push((query.to_string(), thread::current().id()));
        let delay = self.delays.lock().unwrap().get(query).copied();
        if let Some(delay) = delay {
            thread::sleep(delay);
        }
        if self.panicking.lock().unwrap().iter().any(|q| q == query) {
            panic!("cheese wheel jammed");
        }
        if self.failing.lock().unwrap().iter().any(|q| q == query) {
            return Err(anyhow!("backend unavailable"));
        }
        self.catalog.search(query)
    }
}

/// Worker context that holds tasks until the test releases them.
#[derive(Default)]
pub struct HeldContext {
    tasks: Mutex<VecDeque<Task>>,
}

impl HeldContext {
    pub fn len(&self) -> usize {
        self.tasks.lock().unwrap().len()
    }

    /// Runs the oldest held task. Returns false if nothing was held.
    pub fn release_next(&self) -> bool {
        let task = self.tasks.lock().unwrap().pop_front();
        match task {
            Some(task) => {
                task();
                true
            }
            None => false,
        }
    }
}

impl ExecutionContext for HeldContext {
    fn submit(&self, task: Task) {
        self.tasks.lock().unwrap().push_back(task);
    }
}

/// A search screen wired to recording doubles.
pub struct Screen {
    pub button: Arc<CountingButton>,
    pub field: Arc<CountingField>,
    pub display: Arc<RecordingDisplay>,
    pub engine: Arc<ScriptedEngine>,
}

impl Screen {
    pub fn new() -> Self {
        Self {
            button: Arc::new(CountingButton::default()),
            field: Arc::new(CountingField::default()),
            display: Arc::new(RecordingDisplay::default()),
            engine: Arc::new(ScriptedEngine::new()),
        }
    }

    pub fn surface(&self) -> Surface {
        Surface::new(self.button.clone(), self.field.clone(), self.display.clone())
    }

    /// Inline interactive and worker contexts, timer on the current runtime.
    pub fn inline_contexts() -> Contexts {
        Contexts {
            interactive: Arc::new(ImmediateContext),
            worker: Arc::new(ImmediateContext),
            timer: Handle::current(),
        }
    }

    pub fn pipeline(&self, contexts: Contexts) -> QueryPipeline {
        QueryPipeline::new(self.engine.clone(), contexts, DispatchConfig::default())
    }

    pub fn controller(&self, contexts: Contexts) -> LifecycleController {
        LifecycleController::new(self.pipeline(contexts), self.surface())
    }
}

/// Lets paused tokio time run forward and any woken timer tasks finish.
pub async fn settle(ms: u64) {
    tokio::time::sleep(Duration::from_millis(ms)).await;
    tokio::task::yield_now().await;
}
