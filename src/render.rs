//! Output formatting for search results and suggestions.
//!
//! Markdown for terminals and JSON for scripts. Provider diagnostics are
//! rendered separately so they can go to stderr.

use fanout_search::{Aggregation, OutcomeStatus, ProviderOutcome, SearchResult};
use serde_json::json;

use crate::error::{AppError, Result};

/// Upper bound on rendered markdown output.
pub const DEFAULT_MAX_BYTES: usize = 100 * 1024;

/// Truncate `s` to at most `max_bytes` on a char boundary.
///
/// Returns the (possibly truncated) text and whether truncation happened.
pub fn truncate_output(s: &str, max_bytes: usize) -> (String, bool) {
    if s.len() <= max_bytes {
        return (s.to_string(), false);
    }

    let mut end = max_bytes;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }

    (
        format!("{}\n\n[output truncated at {max_bytes} bytes]", &s[..end]),
        true,
    )
}

/// Numbered markdown list of results.
pub fn results_markdown(query: &str, results: &[SearchResult]) -> String {
    if results.is_empty() {
        return format!("No results found for \"{query}\".\n");
    }

    let mut output = format!("## Search Results for \"{query}\"\n\n");
    for (i, result) in results.iter().enumerate() {
        output.push_str(&format!(
            "{}. **{}** [{}]\n   URL: {}\n",
            i + 1,
            result.title,
            result.engine,
            result.url,
        ));
        if !result.content.is_empty() {
            output.push_str(&format!("   {}\n", result.content));
        }
        output.push('\n');
    }

    truncate_output(&output, DEFAULT_MAX_BYTES).0
}

/// Results as a pretty-printed JSON array.
///
/// # Errors
///
/// Returns [`AppError::Render`] if serialization fails.
pub fn results_json(results: &[SearchResult]) -> Result<String> {
    serde_json::to_string_pretty(results).map_err(|e| AppError::Render(e.to_string()))
}

fn status_label(status: &OutcomeStatus) -> String {
    match status {
        OutcomeStatus::Succeeded { count } => format!("ok ({count} results)"),
        OutcomeStatus::Failed { reason } => format!("failed: {reason}"),
        OutcomeStatus::TimedOut => "timed out".to_string(),
    }
}

/// One line per provider: name, terminal state, elapsed time.
pub fn outcomes_text(outcomes: &[ProviderOutcome]) -> String {
    outcomes
        .iter()
        .map(|o| {
            format!(
                "{:<14} {:>6}ms  {}\n",
                o.engine,
                o.elapsed.as_millis(),
                status_label(&o.status)
            )
        })
        .collect()
}

/// Results plus provider diagnostics as one JSON document.
///
/// # Errors
///
/// Returns [`AppError::Render`] if serialization fails.
pub fn aggregation_json(aggregation: &Aggregation) -> Result<String> {
    let providers: Vec<_> = aggregation
        .outcomes
        .iter()
        .map(|o| {
            let (status, detail) = match &o.status {
                OutcomeStatus::Succeeded { count } => ("succeeded", json!({ "count": count })),
                OutcomeStatus::Failed { reason } => ("failed", json!({ "reason": reason })),
                OutcomeStatus::TimedOut => ("timed_out", json!({})),
            };
            json!({
                "engine": o.engine,
                "status": status,
                "detail": detail,
                "elapsed_ms": o.elapsed.as_millis() as u64,
            })
        })
        .collect();

    serde_json::to_string_pretty(&json!({
        "results": aggregation.results,
        "providers": providers,
    }))
    .map_err(|e| AppError::Render(e.to_string()))
}

/// One suggestion per line.
pub fn suggestions_text(suggestions: &[String]) -> String {
    suggestions.iter().map(|s| format!("{s}\n")).collect()
}

/// Suggestions as a JSON array of strings.
///
/// # Errors
///
/// Returns [`AppError::Render`] if serialization fails.
pub fn suggestions_json(suggestions: &[String]) -> Result<String> {
    serde_json::to_string_pretty(suggestions).map_err(|e| AppError::Render(e.to_string()))
}
