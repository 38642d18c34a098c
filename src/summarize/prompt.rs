//! Prompt rendering for the remote summarization calls.
//!
//! Kept as pure string-building functions so the templates can be tested
//! without touching the network.

/// Build the prompt for summarizing a whole document or a single chunk.
pub(crate) fn render_block_prompt(text: &str) -> String {
    format!(
        "Summarize the following document accurately and concisely, \
         preserving its structure and key facts. Do not invent details.\n\n{text}"
    )
}

/// Build the synthesis prompt that combines partial chunk summaries into one
/// final summary.
///
/// Partials are rendered as a bulleted list in document order; synthesis
/// quality depends on that order being preserved.
pub(crate) fn render_synthesis_prompt(partials: &[String]) -> String {
    let mut prompt = String::from(
        "The following bullet points are partial summaries of consecutive \
         sections of one document. Combine them into a single summary in \
         simple English, sized in proportion to the original document, and \
         finish with bullet-point key takeaways.\n\n",
    );
    for partial in partials {
        prompt.push_str("- ");
        prompt.push_str(partial.trim());
        prompt.push('\n');
    }
    prompt
}
