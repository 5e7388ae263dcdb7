pub mod button;
pub mod console;
pub mod listeners;
pub mod text_field;

pub use button::Button;
pub use console::ConsoleDisplay;
pub use listeners::ListenerTable;
pub use text_field::TextField;
