pub mod query;

pub use query::{Query, ResultSet, SearchOutcome};
