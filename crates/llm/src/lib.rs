//! hiersum LLM integration
//!
//! Sentence chunking, the Ollama generation client and the hierarchical
//! summarizer built on top of them.

mod chunking;
mod client;
mod extract;
mod llm_trait;
mod prompts;
mod summarize;
mod types;

pub use chunking::{chunk_text, split_sentences, TextChunk};
pub use client::OllamaClient;
pub use extract::{extract_response_text, ExtractedText, ExtractionRule};
pub use llm_trait::LlmClient;
pub use prompts::{
    chunk_error_placeholder, chunk_prompt, combine_prompt, CHUNK_INSTRUCTION, COMBINE_INSTRUCTION,
};
pub use summarize::Summarizer;
pub use types::{GenerateRequest, SummaryOutcome};
