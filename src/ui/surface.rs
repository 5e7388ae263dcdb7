use std::sync::Arc;

use crate::core::errors::{Error, Result};
use crate::models::ResultSet;

pub type ListenerId = u64;
pub type Listener<E> = Arc<dyn Fn(E) + Send + Sync>;

/// A widget that reports events of type `E` to registered listeners.
pub trait Control<E>: Send + Sync {
    /// Short label used in registration errors and logs.
    fn name(&self) -> &'static str;

    fn register(&self, listener: Listener<E>) -> Result<ListenerId>;

    /// Removes a listener. Unknown ids are ignored.
    fn deregister(&self, id: ListenerId);
}

/// Text entry that reports every change and can be read at any time.
pub trait TextInput: Control<String> {
    fn text(&self) -> String;
}

/// Output side of the search screen. Only ever called from the interactive context.
pub trait Display: Send + Sync {
    fn set_busy(&self, busy: bool);

    fn show_results(&self, results: ResultSet);

    fn show_failure(&self, _failure: &Error) {}
}

/// The controls and sinks one search screen exposes to the dispatcher.
#[derive(Clone)]
pub struct Surface {
    pub trigger: Arc<dyn Control<()>>,
    pub input: Arc<dyn TextInput>,
    pub display: Arc<dyn Display>,
}

impl Surface {
    pub fn new(
        trigger: Arc<dyn Control<()>>,
        input: Arc<dyn TextInput>,
        display: Arc<dyn Display>,
    ) -> Self {
        Self {
            trigger,
            input,
            display,
        }
    }
}
