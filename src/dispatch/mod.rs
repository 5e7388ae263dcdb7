pub mod lifecycle;
pub mod pipeline;
pub mod sources;

pub use lifecycle::{LifecycleController, LifecycleState};
pub use pipeline::{ActivePipeline, Contexts, QueryPipeline};
pub use sources::{text_changes, trigger_queries, EventSource, Registration};
