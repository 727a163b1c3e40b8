//! Report wrapper pairing an analysis result with generation metadata

use crate::processing::analyzer::{fit_band, AnalysisResult, Importance};
use crate::processing::suggestions::ImprovementSuggestion;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub result: AnalysisResult,
    pub metadata: ReportMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub generated_at: DateTime<Utc>,
    pub processing_time_ms: u64,
    /// Embedding backend used for semantic matching
    pub embedding_backend: String,
    /// LLM that produced the rewrite tips, if one ran
    pub llm_model: Option<String>,
    /// File path or "inline text"
    pub resume_source: String,
    pub job_source: String,
    pub version: String,
}

impl ReportMetadata {
    pub fn new(
        embedding_backend: impl Into<String>,
        resume_source: impl Into<String>,
        job_source: impl Into<String>,
    ) -> Self {
        Self {
            generated_at: Utc::now(),
            processing_time_ms: 0,
            embedding_backend: embedding_backend.into(),
            llm_model: None,
            resume_source: resume_source.into(),
            job_source: job_source.into(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    pub fn with_llm_model(mut self, llm_model: Option<String>) -> Self {
        self.llm_model = llm_model;
        self
    }

    pub fn with_processing_time(mut self, processing_time_ms: u64) -> Self {
        self.processing_time_ms = processing_time_ms;
        self
    }
}

impl AnalysisReport {
    pub fn new(result: AnalysisResult, metadata: ReportMetadata) -> Self {
        Self { result, metadata }
    }

    /// Fit band of the profile score, e.g. "good"
    pub fn fit_label(&self) -> &'static str {
        fit_band(self.result.profile_fit_score)
    }

    pub fn suggestions_with_priority(
        &self,
        priority: Importance,
    ) -> impl Iterator<Item = &ImprovementSuggestion> {
        self.result
            .improvement_suggestions
            .iter()
            .filter(move |s| s.priority == priority)
    }
}
