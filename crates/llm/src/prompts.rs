//! Prompt templates for summarization

/// Instruction prepended to every chunk
pub const CHUNK_INSTRUCTION: &str =
    "Summarize this passage in 2-3 sentences, focusing on the main points:";

/// Instruction prepended to the joined chunk summaries
pub const COMBINE_INSTRUCTION: &str = "Combine the following short summaries into a single clear 4-6 sentence cohesive summary. Make it natural and remove repetition:";

/// Prompt for chunk summarization
pub fn chunk_prompt(chunk: &str) -> String {
    format!("{}\n\n{}", CHUNK_INSTRUCTION, chunk)
}

/// Prompt for the combination step
pub fn combine_prompt(summaries: &str) -> String {
    format!("{}\n\n{}", COMBINE_INSTRUCTION, summaries)
}

/// Placeholder recorded when a chunk's summary request fails
pub fn chunk_error_placeholder(index: usize, error: &impl std::fmt::Display) -> String {
    format!("[Error summarizing chunk {}: {}]", index, error)
}
