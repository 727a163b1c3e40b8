//! Resume vs job skill-set matching: exact first, semantic second

use crate::processing::similarity::SimilarityScorer;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

pub const DEFAULT_SEMANTIC_THRESHOLD: f32 = 0.8;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillMatch {
    /// 100 * matched / job skills, in [0, 100]
    pub match_percentage: f64,
    pub matched: Vec<String>,
    pub missing: Vec<String>,
}

pub struct SkillMatcher {
    scorer: SimilarityScorer,
    threshold: f32,
}

impl SkillMatcher {
    pub fn new(scorer: SimilarityScorer) -> Self {
        Self::with_threshold(scorer, DEFAULT_SEMANTIC_THRESHOLD)
    }

    pub fn with_threshold(scorer: SimilarityScorer, threshold: f32) -> Self {
        Self { scorer, threshold }
    }

    /// Classify every job skill as matched or missing.
    ///
    /// A job skill matches when a resume skill equals it case-insensitively,
    /// otherwise when the first resume skill (in input order) whose
    /// similarity exceeds the threshold is found. The scan stops at that
    /// first hit rather than searching for the best one.
    pub fn match_skills(&self, resume_skills: &[String], job_skills: &[String]) -> SkillMatch {
        if resume_skills.is_empty() || job_skills.is_empty() {
            return SkillMatch {
                match_percentage: 0.0,
                matched: Vec::new(),
                missing: job_skills.to_vec(),
            };
        }

        let resume_lower: HashSet<String> = resume_skills.iter().map(|s| s.to_lowercase()).collect();
        let mut matched = Vec::new();
        let mut missing = Vec::new();

        for job_skill in job_skills {
            if resume_lower.contains(&job_skill.to_lowercase()) {
                matched.push(job_skill.clone());
            } else if let Some(resume_skill) = self.semantic_match(job_skill, resume_skills) {
                log::debug!("Semantic match: '{}' ~ '{}'", job_skill, resume_skill);
                matched.push(job_skill.clone());
            } else {
                missing.push(job_skill.clone());
            }
        }

        let match_percentage = matched.len() as f64 / job_skills.len() as f64 * 100.0;

        SkillMatch {
            match_percentage,
            matched,
            missing,
        }
    }

    fn semantic_match<'a>(&self, job_skill: &str, resume_skills: &'a [String]) -> Option<&'a String> {
        let job_embedding = self.scorer.encode(job_skill)?;

        resume_skills
            .iter()
            .find(|resume_skill| self.scorer.similarity_to(&job_embedding, resume_skill) > self.threshold)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use crate::processing::embeddings::{EmbeddingProvider, HashingEmbedder};
    use std::sync::Arc;

    /// Maps a few known strings onto fixed axes so similarities are exact
    struct AxisProvider;

    impl EmbeddingProvider for AxisProvider {
        fn name(&self) -> &str {
            "axis"
        }

        fn encode(&self, text: &str) -> Result<Vec<f32>> {
            Ok(match text.to_lowercase().as_str() {
                "postgresql" => vec![1.0, 0.0, 0.0],
                "postgres" => vec![0.95, 0.05, 0.0],
                "pg" => vec![0.9, 0.1, 0.0],
                "mysql" => vec![0.5, 0.5, 0.0],
                _ => vec![0.0, 0.0, 1.0],
            })
        }
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn hashing_matcher() -> SkillMatcher {
        SkillMatcher::new(SimilarityScorer::new(Arc::new(HashingEmbedder::default())))
    }

    #[test]
    fn test_empty_inputs() {
        let matcher = hashing_matcher();
        let job = strings(&["Python", "Docker"]);

        let result = matcher.match_skills(&[], &job);
        assert_eq!(result.match_percentage, 0.0);
        assert!(result.matched.is_empty());
        assert_eq!(result.missing, job);

        let result = matcher.match_skills(&strings(&["Python"]), &[]);
        assert_eq!(result.match_percentage, 0.0);
        assert!(result.matched.is_empty());
        assert!(result.missing.is_empty());
    }

    #[test]
    fn test_exact_match_is_case_insensitive() {
        let matcher = hashing_matcher();
        let result = matcher.match_skills(&strings(&["python", "DOCKER"]), &strings(&["Python", "Kubernetes"]));

        assert_eq!(result.matched, strings(&["Python"]));
        assert_eq!(result.missing, strings(&["Kubernetes"]));
        assert_eq!(result.match_percentage, 50.0);
    }

    #[test]
    fn test_semantic_fallback_uses_threshold() {
        let matcher = SkillMatcher::new(SimilarityScorer::new(Arc::new(AxisProvider)));

        let result = matcher.match_skills(&strings(&["Postgres"]), &strings(&["PostgreSQL"]));
        assert_eq!(result.matched, strings(&["PostgreSQL"]));

        let result = matcher.match_skills(&strings(&["MySQL"]), &strings(&["PostgreSQL"]));
        assert_eq!(result.missing, strings(&["PostgreSQL"]));
    }

    #[test]
    fn test_matched_and_missing_are_disjoint() {
        let matcher = hashing_matcher();
        let resume = strings(&["Rust", "Go", "AWS"]);
        let job = strings(&["rust", "Terraform", "aws", "Kafka"]);
        let result = matcher.match_skills(&resume, &job);

        let matched: HashSet<String> = result.matched.iter().map(|s| s.to_lowercase()).collect();
        assert!(result.missing.iter().all(|m| !matched.contains(&m.to_lowercase())));
        assert_eq!(result.matched.len() + result.missing.len(), job.len());
        assert!((0.0..=100.0).contains(&result.match_percentage));
    }

    #[test]
    fn test_stricter_threshold_rejects_near_match() {
        let matcher = SkillMatcher::with_threshold(SimilarityScorer::new(Arc::new(AxisProvider)), 0.999);
        let result = matcher.match_skills(&strings(&["Postgres", "PG"]), &strings(&["PostgreSQL"]));
        assert!(result.matched.is_empty());
    }
}
