use std::sync::OnceLock;

use chrono::Utc;
use regex::Regex;
use tracing::{error, info};

use crate::errors::AppError;
use crate::external::llm::LlmProvider;
use crate::models::{AssistantAnswer, AssistantQuery};

pub const FALLBACK_ANSWER: &str =
    "Sorry, I couldn't fetch an analysis at this time. Please try again later.";

pub const EXAMPLE_QUERIES: [&str; 3] = [
    "Why is $TSLA volatile recently?",
    "Explain the importance of P/E ratio for $GOOGL.",
    "Summarize the latest earnings report for $AAPL.",
];

fn cashtag_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\$([A-Za-z][A-Za-z.]{0,9})\b").expect("cashtag pattern is valid"))
}

/// Uppercase tickers mentioned as `$XYZ`, deduplicated, in order of appearance
pub fn extract_cashtags(text: &str) -> Vec<String> {
    let mut symbols: Vec<String> = Vec::new();
    for cap in cashtag_regex().captures_iter(text) {
        let symbol = cap[1].trim_end_matches('.').to_uppercase();
        if !symbol.is_empty() && !symbols.contains(&symbol) {
            symbols.push(symbol);
        }
    }
    symbols
}

fn build_prompt(query: &str) -> String {
    format!(
        "You are a financial analyst. Provide a concise, easy-to-understand analysis for the \
         following query. Do not give financial advice. Keep the response under 150 words. \
         Query: \"{}\"",
        query
    )
}

/// Answer a free-form market question.
///
/// A failing LLM never surfaces as an error: the canned apology is returned
/// and the answer is flagged as degraded.
pub async fn ask(llm: &dyn LlmProvider, input: AssistantQuery) -> Result<AssistantAnswer, AppError> {
    let query = input.query.trim();
    if query.is_empty() {
        return Err(AppError::Validation("Query cannot be empty".into()));
    }

    let symbols = extract_cashtags(query);
    info!("Assistant query via {} (symbols: {:?})", llm.model(), symbols);

    let (answer, degraded) = match llm.generate_completion(build_prompt(query)).await {
        Ok(text) => (text.trim().to_string(), false),
        Err(e) => {
            error!("Error fetching AI analysis: {}", e);
            (FALLBACK_ANSWER.to_string(), true)
        }
    };

    Ok(AssistantAnswer {
        query: query.to_string(),
        answer,
        symbols,
        degraded,
        generated_at: Utc::now(),
    })
}
