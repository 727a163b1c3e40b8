//! Gap analysis: orchestrates extraction, matching, experience comparison and scoring

use crate::config::Config;
use crate::processing::embeddings::EmbeddingProvider;
use crate::processing::experience::{extract_years, ExperienceMap};
use crate::processing::extractor::{ExtractedSkill, SkillExtractor};
use crate::processing::matcher::SkillMatcher;
use crate::processing::similarity::SimilarityScorer;
use crate::processing::suggestions::{ImprovementSuggestion, SuggestionRanker};
use crate::processing::vocabulary::{self, title_case, SkillCategory};
use aho_corasick::{AhoCorasick, AhoCorasickBuilder, MatchKind};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Required level assigned to a skill the job asks for and the resume lacks
pub const MISSING_REQUIRED_LEVEL: f64 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Importance {
    High,
    Medium,
    Low,
}

impl Importance {
    pub const ORDER: [Importance; 3] = [Importance::High, Importance::Medium, Importance::Low];

    pub fn as_str(&self) -> &'static str {
        match self {
            Importance::High => "high",
            Importance::Medium => "medium",
            Importance::Low => "low",
        }
    }
}

impl fmt::Display for Importance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A missing or under-experienced skill
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillGap {
    pub skill: String,
    /// 0.0 - 1.0
    pub required_level: f64,
    /// 0.0 - 1.0
    pub current_level: f64,
    pub importance: Importance,
}

impl SkillGap {
    pub fn missing(skill: impl Into<String>, importance: Importance) -> Self {
        Self {
            skill: skill.into(),
            required_level: MISSING_REQUIRED_LEVEL,
            current_level: 0.0,
            importance,
        }
    }
}

/// Outcome of one resume / job description comparison
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// 0 - 100, two decimals
    pub skill_match_percentage: f64,
    /// 0 - 100, two decimals
    pub profile_fit_score: f64,
    /// Whole-document similarity in [0, 1]
    pub document_similarity: f32,
    pub matched_skills: Vec<ExtractedSkill>,
    pub missing_skills: Vec<SkillGap>,
    pub weak_skills: Vec<SkillGap>,
    pub improvement_suggestions: Vec<ImprovementSuggestion>,
    pub analysis_summary: Option<String>,
    pub resume_rewrite_suggestions: Option<String>,
}

impl AnalysisResult {
    pub fn missing_skill_names(&self) -> Vec<String> {
        self.missing_skills.iter().map(|g| g.skill.clone()).collect()
    }
}

const IMPORTANCE_KEYWORDS: &[(Importance, &[&str])] = &[
    (
        Importance::High,
        &["required", "must have", "essential", "critical", "mandatory"],
    ),
    (
        Importance::Medium,
        &["preferred", "should have", "desired", "important"],
    ),
    (
        Importance::Low,
        &["nice to have", "plus", "bonus", "optional"],
    ),
];

/// Verb forms of "required"; only counted as whole words so that
/// "requirements" stays neutral.
const HIGH_VERB_FORMS: &[&str] = &["require", "requires"];

struct KeywordTable {
    automaton: AhoCorasick,
    tiers: Vec<Importance>,
    whole_word: Vec<bool>,
}

static IMPORTANCE_TABLE: Lazy<KeywordTable> = Lazy::new(|| {
    let mut keywords = Vec::new();
    let mut tiers = Vec::new();
    let mut whole_word = Vec::new();
    for (tier, words) in IMPORTANCE_KEYWORDS {
        for word in words.iter() {
            keywords.push(*word);
            tiers.push(*tier);
            whole_word.push(false);
        }
    }
    for word in HIGH_VERB_FORMS {
        keywords.push(*word);
        tiers.push(Importance::High);
        whole_word.push(true);
    }

    let automaton = AhoCorasickBuilder::new()
        .ascii_case_insensitive(true)
        .match_kind(MatchKind::Standard)
        .build(&keywords)
        .expect("importance keywords build");

    KeywordTable {
        automaton,
        tiers,
        whole_word,
    }
});

/// Tiers with a keyword contained anywhere in `text`
fn keyword_tiers(text: &str) -> [bool; 3] {
    let mut present = [false; 3];
    let bytes = text.as_bytes();

    for mat in IMPORTANCE_TABLE.automaton.find_overlapping_iter(text) {
        let index = mat.pattern().as_usize();
        if IMPORTANCE_TABLE.whole_word[index] {
            let before_ok = mat.start() == 0 || !is_word_byte(bytes[mat.start() - 1]);
            let after_ok = mat.end() == bytes.len() || !is_word_byte(bytes[mat.end()]);
            if !(before_ok && after_ok) {
                continue;
            }
        }
        present[tier_index(IMPORTANCE_TABLE.tiers[index])] = true;
    }

    present
}

fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

fn tier_index(tier: Importance) -> usize {
    match tier {
        Importance::High => 0,
        Importance::Medium => 1,
        Importance::Low => 2,
    }
}

/// Importance of `skill` for the given job description.
///
/// Mentions are counted by the skill's vocabulary term, so a display name
/// such as "Next.js" is found as "nextjs".
///
/// When the skill is mentioned and any tier keyword is present, the first
/// present tier in high, medium, low order wins. Otherwise the mention count
/// decides: three or more is high, two is medium, anything else low.
pub fn determine_importance(skill: &str, job_description: &str) -> Importance {
    let jd_lower = job_description.to_lowercase();
    let needle = match vocabulary::resolve(skill) {
        Some(term) => term.term.to_string(),
        None => skill.trim().to_lowercase(),
    };
    if needle.is_empty() {
        return Importance::Low;
    }

    let count = jd_lower.matches(needle.as_str()).count();

    if count > 0 {
        let tiers = keyword_tiers(&jd_lower);
        if let Some(tier) = Importance::ORDER.iter().find(|t| tiers[tier_index(**t)]) {
            return *tier;
        }
    }

    match count {
        n if n >= 3 => Importance::High,
        2 => Importance::Medium,
        _ => Importance::Low,
    }
}

/// Compare stated tenure per topic; topics pair up when either contains the
/// other, and every pairing where the resume falls short yields a gap.
pub fn identify_weak_skills(resume_experience: &ExperienceMap, job_experience: &ExperienceMap) -> Vec<SkillGap> {
    let mut weak = Vec::new();

    for (job_topic, required_years) in job_experience.iter() {
        let job_lower = job_topic.to_lowercase();
        for (resume_topic, actual_years) in resume_experience.iter() {
            let resume_lower = resume_topic.to_lowercase();
            let related = job_lower.contains(&resume_lower) || resume_lower.contains(&job_lower);

            if related && actual_years < required_years {
                weak.push(SkillGap {
                    skill: title_case(job_topic),
                    required_level: (required_years as f64 / 10.0).min(1.0),
                    current_level: (actual_years as f64 / 10.0).min(1.0),
                    importance: Importance::High,
                });
            }
        }
    }

    weak
}

pub fn fit_band(profile_fit_score: f64) -> &'static str {
    if profile_fit_score >= 80.0 {
        "excellent"
    } else if profile_fit_score >= 60.0 {
        "good"
    } else if profile_fit_score >= 40.0 {
        "moderate"
    } else {
        "weak"
    }
}

pub fn generate_summary(profile_fit_score: f64, matched_count: usize, missing_count: usize) -> String {
    let mut summary = format!(
        "Your profile shows a {} fit for this position. You match {} key skills required for the role. ",
        fit_band(profile_fit_score),
        matched_count
    );

    if missing_count > 0 {
        summary.push_str(&format!(
            "There are {} skills that could strengthen your application. \
             Focus on the high-priority skills in the improvement suggestions to increase your competitiveness.",
            missing_count
        ));
    } else {
        summary.push_str("You have all the key skills mentioned in the job description!");
    }

    summary
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Orchestrator over the extraction, matching and ranking components
pub struct GapAnalyzer {
    extractor: SkillExtractor,
    matcher: SkillMatcher,
    scorer: SimilarityScorer,
    ranker: SuggestionRanker,
    skill_weight: f64,
    similarity_weight: f64,
}

impl GapAnalyzer {
    pub fn new(provider: Arc<dyn EmbeddingProvider>) -> Self {
        let scorer = SimilarityScorer::new(provider);
        Self {
            extractor: SkillExtractor::new(),
            matcher: SkillMatcher::new(scorer.clone()),
            scorer,
            ranker: SuggestionRanker::default(),
            skill_weight: 0.7,
            similarity_weight: 0.3,
        }
    }

    pub fn from_config(provider: Arc<dyn EmbeddingProvider>, config: &Config) -> Self {
        let scorer = SimilarityScorer::new(provider);
        Self {
            extractor: SkillExtractor::new(),
            matcher: SkillMatcher::with_threshold(scorer.clone(), config.scoring.semantic_threshold),
            scorer,
            ranker: SuggestionRanker::from_config(&config.suggestions),
            skill_weight: config.scoring.skill_weight,
            similarity_weight: config.scoring.similarity_weight,
        }
    }

    pub fn backend_name(&self) -> &str {
        self.scorer.backend_name()
    }

    /// Analyze a pre-validated resume against a job description.
    ///
    /// Never fails: embedding errors degrade to zero similarity.
    pub fn analyze(&self, resume_text: &str, job_description: &str) -> AnalysisResult {
        let resume_skills = self.extractor.extract(resume_text);
        let job_skills = self.extractor.extract(job_description);
        log::debug!(
            "Extracted {} resume skills and {} job skills",
            resume_skills.len(),
            job_skills.len()
        );

        let resume_names: Vec<String> = resume_skills.iter().map(|s| s.name.clone()).collect();
        let job_names: Vec<String> = job_skills.iter().map(|s| s.name.clone()).collect();

        let skill_match = self.matcher.match_skills(&resume_names, &job_names);
        let document_similarity = self.scorer.similarity(resume_text, job_description);

        let profile_fit_score = skill_match.match_percentage * self.skill_weight
            + document_similarity as f64 * 100.0 * self.similarity_weight;

        let matched_skills: Vec<ExtractedSkill> = skill_match
            .matched
            .iter()
            .map(|name| ExtractedSkill {
                name: name.clone(),
                category: category_in(name, &job_skills),
            })
            .collect();

        let missing_skills: Vec<SkillGap> = skill_match
            .missing
            .iter()
            .map(|name| SkillGap::missing(name.clone(), determine_importance(name, job_description)))
            .collect();

        let weak_skills = identify_weak_skills(&extract_years(resume_text), &extract_years(job_description));

        let improvement_suggestions = self.ranker.rank(&missing_skills, &weak_skills);

        let analysis_summary = generate_summary(profile_fit_score, matched_skills.len(), missing_skills.len());

        log::info!(
            "Skill match {:.1}%, fit {:.1}, {} missing, {} weak",
            skill_match.match_percentage,
            profile_fit_score,
            missing_skills.len(),
            weak_skills.len()
        );

        AnalysisResult {
            skill_match_percentage: round2(skill_match.match_percentage),
            profile_fit_score: round2(profile_fit_score),
            document_similarity,
            matched_skills,
            missing_skills,
            weak_skills,
            improvement_suggestions,
            analysis_summary: Some(analysis_summary),
            resume_rewrite_suggestions: None,
        }
    }
}

fn category_in(name: &str, skills: &[ExtractedSkill]) -> SkillCategory {
    skills
        .iter()
        .find(|s| s.name.eq_ignore_ascii_case(name))
        .map(|s| s.category)
        .unwrap_or(SkillCategory::Other)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::embeddings::HashingEmbedder;

    fn analyzer() -> GapAnalyzer {
        GapAnalyzer::new(Arc::new(HashingEmbedder::default()))
    }

    #[test]
    fn test_importance_keywords() {
        assert_eq!(determine_importance("python", "Python is required for this role"), Importance::High);
        assert_eq!(determine_importance("react", "React experience is a nice to have"), Importance::Low);
        assert_eq!(determine_importance("docker", "Docker knowledge is preferred"), Importance::Medium);
        assert_eq!(determine_importance("Kubernetes", "We require Python and Kubernetes experience"), Importance::High);
    }

    #[test]
    fn test_importance_first_tier_wins() {
        let jd = "Go is a plus. Go is also essential.";
        assert_eq!(determine_importance("go", jd), Importance::High);
    }

    #[test]
    fn test_importance_keywords_match_as_substrings() {
        assert_eq!(determine_importance("react", "React skills, bonuses paid quarterly"), Importance::Low);
        assert_eq!(determine_importance("react", "Importantly, React"), Importance::Medium);
        assert_eq!(determine_importance("rust", "Rust teams with surplus budget"), Importance::Low);
        assert_eq!(determine_importance("rust", "Rust, Rust. Submit requirements by Friday"), Importance::Medium);
    }

    #[test]
    fn test_importance_uses_vocabulary_term() {
        assert_eq!(determine_importance("Next.js", "NextJS is required for this role"), Importance::High);
        assert_eq!(
            determine_importance("Power BI", "PowerBI dashboards, PowerBI reports and more PowerBI"),
            Importance::High
        );
    }

    #[test]
    fn test_importance_count_fallback() {
        assert_eq!(determine_importance("sql", "SQL, SQL and more SQL"), Importance::High);
        assert_eq!(determine_importance("sql", "SQL and SQL"), Importance::Medium);
        assert_eq!(determine_importance("sql", "Some SQL"), Importance::Low);
    }

    #[test]
    fn test_weak_skills_bidirectional_containment() {
        let resume = extract_years("2 years of experience in Python");
        let job = extract_years("Requires 5 years of Python development");
        let weak = identify_weak_skills(&resume, &job);

        assert_eq!(weak.len(), 1);
        assert_eq!(weak[0].skill, "Python Development");
        assert_eq!(weak[0].importance, Importance::High);
        assert!((weak[0].required_level - 0.5).abs() < 1e-9);
        assert!((weak[0].current_level - 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_weak_skills_levels_are_capped() {
        let resume = extract_years("12 years of rust");
        let job = extract_years("15 years of rust");
        let weak = identify_weak_skills(&resume, &job);
        assert_eq!(weak[0].required_level, 1.0);
        assert_eq!(weak[0].current_level, 1.0);
    }

    #[test]
    fn test_sufficient_experience_is_not_weak() {
        let resume = extract_years("6 years of go");
        let job = extract_years("5 years of go");
        assert!(identify_weak_skills(&resume, &job).is_empty());
    }

    #[test]
    fn test_summary_templates() {
        let summary = generate_summary(85.0, 4, 0);
        assert!(summary.starts_with("Your profile shows a excellent fit"));
        assert!(summary.ends_with("You have all the key skills mentioned in the job description!"));

        let summary = generate_summary(39.99, 1, 3);
        assert!(summary.contains("weak fit"));
        assert!(summary.contains("There are 3 skills"));

        assert_eq!(fit_band(60.0), "good");
        assert_eq!(fit_band(40.0), "moderate");
    }

    #[test]
    fn test_analyze_end_to_end() {
        let resume = "Python, Docker, 3 years of experience in Python. Built internal tooling for teams.";
        let job = "We require Python and Kubernetes experience";
        let result = analyzer().analyze(resume, job);

        assert_eq!(result.skill_match_percentage, 50.0);
        assert!(result.matched_skills.iter().any(|s| s.name == "Python"));
        assert_eq!(result.matched_skills[0].category, SkillCategory::ProgrammingLanguages);

        let kubernetes = result.missing_skills.iter().find(|g| g.skill == "Kubernetes").unwrap();
        assert_eq!(kubernetes.importance, Importance::High);
        assert_eq!(kubernetes.required_level, 0.8);
        assert_eq!(kubernetes.current_level, 0.0);

        let high: Vec<_> = result
            .improvement_suggestions
            .iter()
            .filter(|s| s.priority == Importance::High)
            .collect();
        assert_eq!(high.len(), 1);
        assert_eq!(high[0].skill, "Kubernetes");
        assert_eq!(high[0].estimated_time, "2-3 months");
    }

    #[test]
    fn test_scores_in_range_and_idempotent() {
        let resume = "Senior engineer with Rust, Go, AWS and Terraform. 4 years of experience in Rust, mostly backend.";
        let job = "Looking for Rust and Kafka skills, Terraform is a plus. Needs 6 years of Rust, ideally more.";
        let a = analyzer();

        let first = a.analyze(resume, job);
        let second = a.analyze(resume, job);

        assert!((0.0..=100.0).contains(&first.skill_match_percentage));
        assert!((0.0..=100.0).contains(&first.profile_fit_score));
        assert_eq!(first.skill_match_percentage, second.skill_match_percentage);
        assert_eq!(first.profile_fit_score, second.profile_fit_score);
        assert_eq!(first.matched_skills, second.matched_skills);
        assert_eq!(first.weak_skills.len(), 1);
    }

    #[test]
    fn test_no_job_skills() {
        let result = analyzer().analyze(
            "Python developer with a long history of shipping backend services.",
            "We need a friendly colleague",
        );
        assert_eq!(result.skill_match_percentage, 0.0);
        assert!(result.matched_skills.is_empty());
        assert!(result.missing_skills.is_empty());
        assert!(result.analysis_summary.unwrap().contains("You have all the key skills"));
    }
}
