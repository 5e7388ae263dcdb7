//! Interactive search dispatcher: turns button presses and live text edits into a
//! debounced stream of queries, runs them off the interactive thread and delivers
//! results back to it.

pub mod core;
pub mod dispatch;
pub mod models;
pub mod services;
pub mod stream;
pub mod ui;
