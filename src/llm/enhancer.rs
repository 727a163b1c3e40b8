//! Optional LLM layer over the analysis result with static fallbacks

use crate::llm::inference::TextGenerator;
use crate::llm::prompts::PromptTemplates;
use crate::processing::analyzer::AnalysisResult;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const FALLBACK_SKILL_LIMIT: usize = 5;
const FALLBACK_TIMEFRAME: &str = "8 weeks";
const CHAT_CONTEXT_SKILL_LIMIT: usize = 5;
const CHAT_HISTORY_LIMIT: usize = 5;

/// Canned coach answers, checked in order against the lower-cased message
const FALLBACK_CHAT_ANSWERS: &[(&str, &str)] = &[
    (
        "how",
        "To learn effectively, focus on hands-on practice and building projects. Start with fundamentals and gradually increase complexity.",
    ),
    (
        "what",
        "The most important skills depend on your career goals. Focus on in-demand skills in your target industry.",
    ),
    (
        "when",
        "The best time to start learning is now! Even 30 minutes a day can lead to significant progress.",
    ),
    (
        "where",
        "Great learning resources include Coursera, Udemy, freeCodeCamp, and official documentation.",
    ),
];

const FALLBACK_CHAT_DEFAULT: &str = "I'm here to help with your skill development! For personalized advice, download a local LLM (skill-gap models download phi-3-mini).";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearningRoadmap {
    pub skill: String,
    pub roadmap: String,
    pub timeframe: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

impl ChatRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatRole::User => "user",
            ChatRole::Assistant => "assistant",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// Profile facts the career coach conditions on
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatContext {
    pub skill_match_percentage: Option<f64>,
    pub missing_skills: Vec<String>,
    pub job_title: Option<String>,
}

impl ChatContext {
    pub fn from_result(result: &AnalysisResult, job_title: Option<String>) -> Self {
        Self {
            skill_match_percentage: Some(result.skill_match_percentage),
            missing_skills: result.missing_skill_names(),
            job_title,
        }
    }

    fn render(&self) -> String {
        let skill_match = self
            .skill_match_percentage
            .map(|p| p.to_string())
            .unwrap_or_else(|| "N/A".to_string());
        let missing = self
            .missing_skills
            .iter()
            .take(CHAT_CONTEXT_SKILL_LIMIT)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ");

        format!(
            "User's Profile Context:\n- Skill Match: {}%\n- Missing Skills: {}\n- Career Goal: {}",
            skill_match,
            missing,
            self.job_title.as_deref().unwrap_or("Not specified")
        )
    }
}

/// Embellishes analysis output. Generator failures are logged and replaced by
/// static text, so enhancement never fails an analysis.
pub struct SuggestionEnhancer {
    generator: Option<Arc<dyn TextGenerator>>,
    templates: PromptTemplates,
}

impl SuggestionEnhancer {
    pub fn new(generator: Option<Arc<dyn TextGenerator>>) -> Self {
        Self {
            generator,
            templates: PromptTemplates::default(),
        }
    }

    /// Enhancer that only ever returns the static fallbacks
    pub fn offline() -> Self {
        Self::new(None)
    }

    pub fn generator_name(&self) -> Option<&str> {
        self.generator.as_ref().map(|g| g.name())
    }

    fn generate(&self, prompt: &str) -> Option<String> {
        let generator = self.generator.as_ref()?;
        match generator.generate(prompt) {
            Ok(text) if !text.trim().is_empty() => Some(text),
            Ok(_) => {
                log::warn!("LLM '{}' returned an empty response", generator.name());
                None
            }
            Err(e) => {
                log::warn!("LLM '{}' generation failed: {}", generator.name(), e);
                None
            }
        }
    }

    pub fn rewrite_suggestions(&self, missing_skills: &[String]) -> String {
        let prompt = self.templates.render_resume_rewrite(missing_skills);
        self.generate(&prompt)
            .unwrap_or_else(|| fallback_resume_suggestions(missing_skills))
    }

    /// Rewrite each step through the LLM, keeping at most as many lines as
    /// there were base steps
    pub fn enhance_learning_path(&self, skill: &str, base_steps: &[String]) -> Vec<String> {
        if self.generator.is_none() || base_steps.is_empty() {
            return base_steps.to_vec();
        }

        let prompt = self.templates.render_enhance_suggestions(skill, base_steps);
        let Some(response) = self.generate(&prompt) else {
            return base_steps.to_vec();
        };

        let enhanced: Vec<String> = response
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.chars().all(|c| c.is_ascii_digit()))
            .take(base_steps.len())
            .map(str::to_string)
            .collect();

        if enhanced.is_empty() {
            base_steps.to_vec()
        } else {
            enhanced
        }
    }

    pub fn learning_roadmap(
        &self,
        skill: &str,
        current_level: &str,
        target_level: &str,
        timeframe: &str,
    ) -> LearningRoadmap {
        let prompt = self
            .templates
            .render_learning_roadmap(skill, current_level, target_level, timeframe);

        match self.generate(&prompt) {
            Some(roadmap) => LearningRoadmap {
                skill: skill.to_string(),
                roadmap,
                timeframe: timeframe.to_string(),
            },
            None => fallback_learning_roadmap(skill),
        }
    }

    /// Answer a career question, conditioned on the profile and the last few
    /// turns of history
    pub fn chat(&self, message: &str, context: Option<&ChatContext>, history: &[ChatMessage]) -> String {
        if self.generator.is_none() {
            return fallback_chat_response(message);
        }

        let context_block = context.map(ChatContext::render).unwrap_or_default();
        let recent = &history[history.len().saturating_sub(CHAT_HISTORY_LIMIT)..];
        let history_block = recent
            .iter()
            .map(|m| format!("{}: {}", m.role.as_str(), m.content))
            .collect::<Vec<_>>()
            .join("\n");

        let prompt = self
            .templates
            .render_career_chat(&context_block, &history_block, message);
        self.generate(&prompt)
            .unwrap_or_else(|| fallback_chat_response(message))
    }

    /// Fill in rewrite tips and enhance every suggestion's learning path
    pub fn enhance(&self, result: &mut AnalysisResult) {
        result.resume_rewrite_suggestions = Some(self.rewrite_suggestions(&result.missing_skill_names()));

        if self.generator.is_none() {
            return;
        }
        for suggestion in &mut result.improvement_suggestions {
            log::debug!("Enhancing learning path for {}", suggestion.skill);
            suggestion.learning_path = self.enhance_learning_path(&suggestion.skill, &suggestion.learning_path);
        }
    }
}

pub fn fallback_resume_suggestions(missing_skills: &[String]) -> String {
    let skills = missing_skills
        .iter()
        .take(FALLBACK_SKILL_LIMIT)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        r#"Resume Improvement Suggestions:

1. **Add Missing Skills**: Consider adding these skills to your resume if you have any experience with them:
   {}

2. **Optimize Keywords**: Ensure these keywords appear in relevant sections of your resume.

3. **Quantify Achievements**: Add metrics and numbers to demonstrate impact.

4. **Tailor Summary**: Update your professional summary to align with the job requirements.

5. **Highlight Relevant Projects**: Showcase projects that demonstrate skills needed for this role.

Note: Download a local LLM (skill-gap models download phi-3-mini) for personalized suggestions."#,
        skills
    )
}

pub fn fallback_chat_response(message: &str) -> String {
    let lower = message.to_lowercase();
    FALLBACK_CHAT_ANSWERS
        .iter()
        .find(|(keyword, _)| lower.contains(keyword))
        .map(|(_, answer)| answer.to_string())
        .unwrap_or_else(|| FALLBACK_CHAT_DEFAULT.to_string())
}

pub fn fallback_learning_roadmap(skill: &str) -> LearningRoadmap {
    let roadmap = format!(
        r#"Learning Roadmap for {}:

Week 1-2: Foundations
- Study core concepts and fundamentals
- Complete beginner tutorials

Week 3-4: Hands-on Practice
- Build small projects
- Practice with exercises

Week 5-6: Intermediate Level
- Explore advanced topics
- Work on larger projects

Week 7-8: Mastery
- Build portfolio project
- Contribute to open source

Note: Download a local LLM (skill-gap models download phi-3-mini) for personalized roadmaps."#,
        skill
    );

    LearningRoadmap {
        skill: skill.to_string(),
        roadmap,
        timeframe: FALLBACK_TIMEFRAME.to_string(),
    }
}
