use std::io::{self, Write};
use std::sync::{Mutex, PoisonError};

use crate::core::errors::Error;
use crate::models::ResultSet;
use crate::ui::surface::Display;

/// Prints busy state and results as plain lines.
pub struct ConsoleDisplay {
    out: Mutex<Box<dyn Write + Send>>,
}

impl ConsoleDisplay {
    pub fn new(out: impl Write + Send + 'static) -> Self {
        Self {
            out: Mutex::new(Box::new(out)),
        }
    }

    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }

    fn write(&self, render: impl FnOnce(&mut dyn Write) -> io::Result<()>) {
        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(e) = render(&mut **out).and_then(|_| out.flush()) {
            tracing::warn!("Failed to write to console: {}", e);
        }
    }
}

impl Display for ConsoleDisplay {
    fn set_busy(&self, busy: bool) {
        if busy {
            self.write(|out| writeln!(out, "searching..."));
        }
    }

    fn show_results(&self, results: ResultSet) {
        self.write(|out| {
            if results.is_empty() {
                return writeln!(out, "  (no matches)");
            }
            for item in &results {
                writeln!(out, "  {item}")?;
            }
            Ok(())
        });
    }

    fn show_failure(&self, failure: &Error) {
        self.write(|out| writeln!(out, "  ! {failure}"));
    }
}
