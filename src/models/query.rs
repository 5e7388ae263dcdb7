/// Raw text captured from an input source at the moment it fired.
pub type Query = String;

/// Ordered results of one search call.
pub type ResultSet = Vec<String>;

/// What the worker hands back to the interactive side for one query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    Found { query: Query, results: ResultSet },
    Failed { query: Query, message: String },
}

impl SearchOutcome {
    /// Results to show for this outcome; a failed search shows nothing.
    pub fn into_results(self) -> ResultSet {
        match self {
            SearchOutcome::Found { results, .. } => results,
            SearchOutcome::Failed { .. } => Vec::new(),
        }
    }
}
