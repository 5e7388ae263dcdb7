pub mod components;
pub mod surface;

pub use components::{Button, ConsoleDisplay, TextField};
pub use surface::{Control, Display, Listener, ListenerId, Surface, TextInput};
