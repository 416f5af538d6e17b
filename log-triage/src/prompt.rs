//! Prompt builder for the external summarizer: short instruction block plus
//! the triaged excerpt.

/// Steering instructions for the summarizer.
///
/// Keep this short: it consistently improves steering without wasting tokens.
pub const SYSTEM_INSTRUCTION: &str = "\
You are an AI assistant helping Android developers analyze crash logs.
Identify common error types, summarize the cause in 3-5 bullet points,
and give a clear, developer-friendly explanation.";

/// Builds the final prompt: instruction, a labeled log section, and the
/// (already truncated) excerpt.
pub fn build_summary_prompt(excerpt: &str) -> String {
    let mut out = String::with_capacity(SYSTEM_INSTRUCTION.len() + excerpt.len() + 16);
    out.push_str(SYSTEM_INSTRUCTION);
    out.push_str("\n\nLog content:\n");
    out.push_str(excerpt.trim_end());
    out.push('\n');
    out
}
