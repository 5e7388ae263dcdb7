use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::core::errors::Result;

pub const DEFAULT_DEBOUNCE_MS: u64 = 1000;
pub const DEFAULT_MIN_QUERY_LEN: usize = 2;

/// Tuning knobs for the query pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DispatchConfig {
    /// Quiet period the live text stream must observe before a query is forwarded.
    pub debounce_ms: u64,
    /// Shortest typed query (in characters) that is forwarded. Button presses ignore it.
    pub min_query_len: usize,
    /// Size of the blocking pool used for search calls. `None` keeps the runtime default.
    pub worker_threads: Option<usize>,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            min_query_len: DEFAULT_MIN_QUERY_LEN,
            worker_threads: None,
        }
    }
}

impl DispatchConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = fs::read_to_string(path.as_ref())?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn debounce_window(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config = DispatchConfig::from_json(r#"{ "debounce_ms": 250 }"#).unwrap();
        assert_eq!(config.debounce_window(), Duration::from_millis(250));
        assert_eq!(config.min_query_len, DEFAULT_MIN_QUERY_LEN);
        assert_eq!(config.worker_threads, None);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = DispatchConfig::from_json(r#"{ "debounce": 250 }"#).unwrap_err();
        assert!(err.to_string().starts_with("invalid config"));
    }
}
