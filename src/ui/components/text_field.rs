use std::sync::{Mutex, PoisonError};

use super::listeners::ListenerTable;
use crate::core::errors::Result;
use crate::ui::surface::{Control, Listener, ListenerId, TextInput};

/// Headless single-line text field. Every edit is reported to all change listeners.
pub struct TextField {
    text: Mutex<String>,
    listeners: ListenerTable<String>,
}

impl TextField {
    pub fn new() -> Self {
        Self {
            text: Mutex::new(String::new()),
            listeners: ListenerTable::unbounded("query field"),
        }
    }

    /// Replaces the contents and notifies listeners with the new value.
    pub fn set_text(&self, text: impl Into<String>) {
        let text = text.into();
        *self.text.lock().unwrap_or_else(PoisonError::into_inner) = text.clone();
        self.listeners.fire(text);
    }

    /// Appends one character, the way a keystroke would.
    pub fn type_char(&self, ch: char) {
        let text = {
            let mut current = self.text.lock().unwrap_or_else(PoisonError::into_inner);
            current.push(ch);
            current.clone()
        };
        self.listeners.fire(text);
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl Default for TextField {
    fn default() -> Self {
        Self::new()
    }
}

impl Control<String> for TextField {
    fn name(&self) -> &'static str {
        self.listeners.owner()
    }

    fn register(&self, listener: Listener<String>) -> Result<ListenerId> {
        self.listeners.register(listener)
    }

    fn deregister(&self, id: ListenerId) {
        self.listeners.deregister(id);
    }
}

impl TextInput for TextField {
    fn text(&self) -> String {
        self.text
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn typing_reports_each_intermediate_value() {
        let field = TextField::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        field
            .register(Arc::new(move |text: String| sink.lock().unwrap().push(text)))
            .unwrap();

        for ch in "feta".chars() {
            field.type_char(ch);
        }

        assert_eq!(*seen.lock().unwrap(), vec!["f", "fe", "fet", "feta"]);
        assert_eq!(field.text(), "feta");
    }
}
