//! Deterministic local summarization used when the remote service is
//! unavailable or fails.
//!
//! This is the terminal fallback for every other failure path, so it is a
//! pure function of its input: no I/O, no configuration, no way to fail.

use super::remote::ChatClientError;

const MAX_KEY_POINTS: usize = 3;
const KEY_POINT_CHARS: usize = 50;
const SHORT_TEXT_CHARS: usize = 100;

/// Produce a deterministic extractive summary without any remote calls.
///
/// Documents with more than 5 lines get a line-count header and up to 3
/// numbered key points taken from the first non-blank lines, each truncated
/// to 50 characters. Shorter documents are returned as-is, or truncated to
/// their first 100 characters when longer than that.
pub fn fallback_summarize(text: &str) -> String {
    let lines: Vec<&str> = text.split('\n').collect();
    if lines.len() > 5 {
        let mut summary = format!("Summary of document with {} lines.\n", lines.len());
        summary.push_str("Key points:\n");
        for (number, line) in lines
            .iter()
            .filter(|line| !line.trim().is_empty())
            .take(MAX_KEY_POINTS)
            .enumerate()
        {
            summary.push_str(&format!(
                "{}. {}...\n",
                number + 1,
                truncate_chars(line, KEY_POINT_CHARS)
            ));
        }
        summary.push_str("\nDocument processed successfully.");
        return summary;
    }

    if text.chars().count() > SHORT_TEXT_CHARS {
        format!("{}...", truncate_chars(text, SHORT_TEXT_CHARS))
    } else {
        text.to_string()
    }
}

/// Map a remote call's outcome onto a usable summary string.
///
/// Any error, and any success whose body is blank, degrades to the local
/// fallback summary of the original text. Every remote call in the pipeline
/// is resolved through this one function, which is what keeps the public
/// summarization API infallible.
pub(crate) fn degrade(outcome: Result<String, ChatClientError>, source_text: &str) -> String {
    match outcome {
        Ok(body) if !body.trim().is_empty() => body,
        Ok(_) => {
            tracing::warn!("Remote summarizer returned an empty body; using local fallback");
            fallback_summarize(source_text)
        }
        Err(error) => {
            tracing::warn!(error = %error, "Remote summarization failed; using local fallback");
            fallback_summarize(source_text)
        }
    }
}

fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((offset, _)) => &text[..offset],
        None => text,
    }
}
