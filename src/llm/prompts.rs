//! Prompt templates for the suggestion enhancer

/// Number of missing skills named in the rewrite prompt
const REWRITE_SKILL_LIMIT: usize = 3;

#[derive(Debug, Clone)]
pub struct PromptTemplates {
    pub resume_rewrite: String,
    pub enhance_suggestions: String,
    pub learning_roadmap: String,
    pub career_chat: String,
}

impl Default for PromptTemplates {
    fn default() -> Self {
        Self {
            resume_rewrite: RESUME_REWRITE_TEMPLATE.to_string(),
            enhance_suggestions: ENHANCE_SUGGESTIONS_TEMPLATE.to_string(),
            learning_roadmap: LEARNING_ROADMAP_TEMPLATE.to_string(),
            career_chat: CAREER_CHAT_TEMPLATE.to_string(),
        }
    }
}

impl PromptTemplates {
    pub fn render_resume_rewrite(&self, missing_skills: &[String]) -> String {
        let skills = missing_skills
            .iter()
            .take(REWRITE_SKILL_LIMIT)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        self.resume_rewrite.replace("{missing_skills}", &skills)
    }

    pub fn render_enhance_suggestions(&self, skill: &str, base_steps: &[String]) -> String {
        let steps = base_steps
            .iter()
            .enumerate()
            .map(|(i, step)| format!("{}. {}", i + 1, step))
            .collect::<Vec<_>>()
            .join("\n");
        self.enhance_suggestions
            .replace("{skill}", skill)
            .replace("{steps}", &steps)
    }

    pub fn render_learning_roadmap(
        &self,
        skill: &str,
        current_level: &str,
        target_level: &str,
        timeframe: &str,
    ) -> String {
        self.learning_roadmap
            .replace("{skill}", skill)
            .replace("{current_level}", current_level)
            .replace("{target_level}", target_level)
            .replace("{timeframe}", timeframe)
    }

    /// `context` and `history` are pre-rendered blocks; either may be empty
    pub fn render_career_chat(&self, context: &str, history: &str, message: &str) -> String {
        self.career_chat
            .replace("{context}", context)
            .replace("{history}", history)
            .replace("{message}", message)
    }
}

const RESUME_REWRITE_TEMPLATE: &str = r#"As a resume expert, provide 3 specific tips to improve this resume for the job.

Missing Skills: {missing_skills}

Tips:
1. How to highlight relevant experience
2. Keywords to add
3. Skills section improvements

Be brief and actionable."#;

const ENHANCE_SUGGESTIONS_TEMPLATE: &str = r#"Enhance these learning suggestions for {skill}:

{steps}

Make them more specific, actionable, and motivating. Add concrete examples and tips."#;

const LEARNING_ROADMAP_TEMPLATE: &str = r#"Create a detailed learning roadmap for someone who wants to learn {skill}.

Current Level: {current_level}
Target Level: {target_level}
Timeframe: {timeframe}

Provide a structured learning path with:
1. Week-by-week breakdown
2. Specific topics to cover
3. Practical projects to build
4. Resources and tools to use
5. Milestones to track progress

Format as a clear, actionable plan."#;

const CAREER_CHAT_TEMPLATE: &str = r#"You are an AI career coach specializing in skill development and career growth.
Help the user with personalized advice about upskilling, career transitions, and learning strategies.

{context}

{history}

User: {message}

Provide helpful, encouraging, and actionable advice. Be specific and practical."#;
