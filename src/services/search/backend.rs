use crate::models::ResultSet;
use anyhow::Result;

/// Synchronous query-to-results lookup. Calls may block for as long as they need;
/// the dispatcher only ever invokes them from the worker context.
pub trait SearchEngine: Send + Sync {
    fn search(&self, query: &str) -> Result<ResultSet>;
}

impl<E: SearchEngine + ?Sized> SearchEngine for std::sync::Arc<E> {
    fn search(&self, query: &str) -> Result<ResultSet> {
        (**self).search(query)
    }
}
