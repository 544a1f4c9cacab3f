use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Question submitted to the AI assistant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantQuery {
    pub query: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantAnswer {
    pub query: String,
    pub answer: String,
    /// Cashtags mentioned in the query, e.g. `$TSLA` -> `TSLA`
    pub symbols: Vec<String>,
    /// The LLM call failed and the canned apology was returned instead
    pub degraded: bool,
    pub generated_at: DateTime<Utc>,
}
