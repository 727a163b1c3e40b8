//! LLM integration module

pub mod enhancer;
pub mod inference;
pub mod prompts;

pub use enhancer::{ChatContext, ChatMessage, ChatRole, LearningRoadmap, SuggestionEnhancer};
pub use inference::{CandleGenerator, GenerationConfig, TextGenerator};
