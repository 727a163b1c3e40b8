//! Turns skill gaps into prioritized, time-estimated improvement items

use crate::config::SuggestionConfig;
use crate::processing::analyzer::{Importance, SkillGap};
use crate::processing::vocabulary::title_case;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceType {
    Course,
    Tutorial,
    Project,
    Book,
}

impl ResourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::Course => "course",
            ResourceType::Tutorial => "tutorial",
            ResourceType::Project => "project",
            ResourceType::Book => "book",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearningResource {
    pub title: String,
    #[serde(rename = "type")]
    pub resource_type: ResourceType,
    pub provider: String,
    pub duration: String,
    /// 0.0 - 1.0
    pub relevance_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImprovementSuggestion {
    pub skill: String,
    pub priority: Importance,
    pub learning_path: Vec<String>,
    pub resources: Vec<LearningResource>,
    pub estimated_time: String,
}

const LEARNING_PATHS: &[(&str, [&str; 4])] = &[
    (
        "python",
        [
            "Learn Python basics and syntax",
            "Practice with small projects and exercises",
            "Study Python libraries relevant to your field",
            "Build a portfolio project using Python",
        ],
    ),
    (
        "react",
        [
            "Learn JavaScript fundamentals",
            "Understand React basics: components, props, state",
            "Learn React hooks and modern patterns",
            "Build a full React application",
        ],
    ),
    (
        "machine learning",
        [
            "Learn Python and math fundamentals",
            "Study ML algorithms and concepts",
            "Practice with scikit-learn and datasets",
            "Work on ML projects and participate in competitions",
        ],
    ),
];

/// Caps the number of suggestions per priority tier
#[derive(Debug, Clone)]
pub struct SuggestionRanker {
    max_high: usize,
    max_medium: usize,
    max_low: usize,
}

impl Default for SuggestionRanker {
    fn default() -> Self {
        Self::from_config(&SuggestionConfig::default())
    }
}

impl SuggestionRanker {
    pub fn from_config(config: &SuggestionConfig) -> Self {
        Self {
            max_high: config.max_high,
            max_medium: config.max_medium,
            max_low: config.max_low,
        }
    }

    fn cap(&self, priority: Importance) -> usize {
        match priority {
            Importance::High => self.max_high,
            Importance::Medium => self.max_medium,
            Importance::Low => self.max_low,
        }
    }

    /// Missing gaps then weak gaps, partitioned by importance and emitted
    /// high tier first, each tier in input order and capped.
    pub fn rank(&self, missing: &[SkillGap], weak: &[SkillGap]) -> Vec<ImprovementSuggestion> {
        let mut suggestions = Vec::new();

        for priority in Importance::ORDER {
            suggestions.extend(
                missing
                    .iter()
                    .chain(weak.iter())
                    .filter(|gap| gap.importance == priority)
                    .take(self.cap(priority))
                    .map(|gap| create_suggestion(gap, priority)),
            );
        }

        suggestions
    }
}

pub fn create_suggestion(gap: &SkillGap, priority: Importance) -> ImprovementSuggestion {
    let skill_lower = gap.skill.to_lowercase();

    ImprovementSuggestion {
        skill: gap.skill.clone(),
        priority,
        learning_path: learning_path(&skill_lower),
        resources: sample_resources(&skill_lower),
        estimated_time: estimated_time(priority).to_string(),
    }
}

/// Bespoke path when a known keyword occurs in the skill, generic otherwise
pub fn learning_path(skill: &str) -> Vec<String> {
    let skill = skill.to_lowercase();

    if let Some((_, steps)) = LEARNING_PATHS.iter().find(|(key, _)| skill.contains(key)) {
        return steps.iter().map(|s| s.to_string()).collect();
    }

    vec![
        format!("Study {} fundamentals and core concepts", skill),
        "Practice with hands-on exercises and tutorials".to_string(),
        format!("Build small projects using {}", skill),
        format!("Create a portfolio piece demonstrating {} proficiency", skill),
    ]
}

pub fn sample_resources(skill: &str) -> Vec<LearningResource> {
    let title = title_case(skill);

    vec![
        LearningResource {
            title: format!("{} Complete Course", title),
            resource_type: ResourceType::Course,
            provider: "Coursera".to_string(),
            duration: "4-6 weeks".to_string(),
            relevance_score: 0.9,
        },
        LearningResource {
            title: format!("Learn {} - Interactive Tutorial", title),
            resource_type: ResourceType::Tutorial,
            provider: "freeCodeCamp".to_string(),
            duration: "2-3 weeks".to_string(),
            relevance_score: 0.85,
        },
        LearningResource {
            title: format!("{} Project Ideas", title),
            resource_type: ResourceType::Project,
            provider: "GitHub".to_string(),
            duration: "Varies".to_string(),
            relevance_score: 0.8,
        },
    ]
}

pub fn estimated_time(priority: Importance) -> &'static str {
    match priority {
        Importance::High => "2-3 months",
        Importance::Medium => "1-2 months",
        Importance::Low => "2-4 weeks",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gap(skill: &str, importance: Importance) -> SkillGap {
        SkillGap::missing(skill, importance)
    }

    #[test]
    fn test_caps_high_priority_at_five_in_order() {
        let missing: Vec<SkillGap> = (1..=8).map(|i| gap(&format!("Skill{}", i), Importance::High)).collect();
        let ranked = SuggestionRanker::default().rank(&missing, &[]);

        assert_eq!(ranked.len(), 5);
        let skills: Vec<&str> = ranked.iter().map(|s| s.skill.as_str()).collect();
        assert_eq!(skills, vec!["Skill1", "Skill2", "Skill3", "Skill4", "Skill5"]);
    }

    #[test]
    fn test_tier_order_and_total_cap() {
        let mut missing = Vec::new();
        for i in 0..4 {
            missing.push(gap(&format!("low{}", i), Importance::Low));
            missing.push(gap(&format!("medium{}", i), Importance::Medium));
        }
        let weak: Vec<SkillGap> = (0..7).map(|i| gap(&format!("high{}", i), Importance::High)).collect();

        let ranked = SuggestionRanker::default().rank(&missing, &weak);
        let priorities: Vec<Importance> = ranked.iter().map(|s| s.priority).collect();

        assert_eq!(ranked.len(), 10);
        assert_eq!(&priorities[..5], &[Importance::High; 5]);
        assert_eq!(&priorities[5..8], &[Importance::Medium; 3]);
        assert_eq!(&priorities[8..], &[Importance::Low; 2]);
        assert_eq!(ranked[5].skill, "medium0");
    }

    #[test]
    fn test_bespoke_and_generic_paths() {
        assert_eq!(learning_path("python")[0], "Learn Python basics and syntax");
        assert_eq!(learning_path("React")[3], "Build a full React application");
        assert_eq!(learning_path("applied machine learning")[1], "Study ML algorithms and concepts");

        let generic = learning_path("Kubernetes");
        assert_eq!(generic.len(), 4);
        assert_eq!(generic[0], "Study kubernetes fundamentals and core concepts");
        assert_eq!(generic[3], "Create a portfolio piece demonstrating kubernetes proficiency");
    }

    #[test]
    fn test_resources_and_time() {
        let suggestion = create_suggestion(&gap("Kubernetes", Importance::High), Importance::High);

        assert_eq!(suggestion.estimated_time, "2-3 months");
        assert_eq!(suggestion.resources.len(), 3);
        assert_eq!(suggestion.resources[0].title, "Kubernetes Complete Course");
        assert_eq!(suggestion.resources[1].title, "Learn Kubernetes - Interactive Tutorial");
        assert_eq!(suggestion.resources[2].resource_type, ResourceType::Project);
        let scores: Vec<f64> = suggestion.resources.iter().map(|r| r.relevance_score).collect();
        assert_eq!(scores, vec![0.9, 0.85, 0.8]);

        assert_eq!(estimated_time(Importance::Medium), "1-2 months");
        assert_eq!(estimated_time(Importance::Low), "2-4 weeks");
    }

    #[test]
    fn test_resource_type_serializes_lowercase() {
        let json = serde_json::to_value(&sample_resources("go")[0]).unwrap();
        assert_eq!(json["type"], "course");
    }

    #[test]
    fn test_empty_gaps() {
        assert!(SuggestionRanker::default().rank(&[], &[]).is_empty());
    }
}
