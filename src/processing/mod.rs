//! Skill-gap analysis engine

pub mod analyzer;
pub mod embeddings;
pub mod experience;
pub mod extractor;
pub mod matcher;
pub mod model_store;
pub mod similarity;
pub mod suggestions;
pub mod vocabulary;
