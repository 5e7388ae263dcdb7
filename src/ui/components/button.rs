use super::listeners::ListenerTable;
use crate::core::errors::Result;
use crate::ui::surface::{Control, Listener, ListenerId};

/// Headless push button. Holds at most one click listener at a time.
pub struct Button {
    listeners: ListenerTable<()>,
}

impl Button {
    pub fn new() -> Self {
        Self {
            listeners: ListenerTable::single("search button"),
        }
    }

    pub fn click(&self) {
        self.listeners.fire(());
    }

    pub fn has_listener(&self) -> bool {
        !self.listeners.is_empty()
    }
}

impl Default for Button {
    fn default() -> Self {
        Self::new()
    }
}

impl Control<()> for Button {
    fn name(&self) -> &'static str {
        self.listeners.owner()
    }

    fn register(&self, listener: Listener<()>) -> Result<ListenerId> {
        self.listeners.register(listener)
    }

    fn deregister(&self, id: ListenerId) {
        self.listeners.deregister(id);
    }
}
