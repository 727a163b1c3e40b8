//! Output formatters: console, JSON, Markdown and HTML

use crate::config::OutputFormat;
use crate::error::{Result, SkillGapError};
use crate::output::report::AnalysisReport;
use crate::processing::analyzer::{Importance, SkillGap};
use crate::processing::suggestions::ImprovementSuggestion;
use askama::Template;
use colored::{Color, Colorize};
use std::path::Path;
use unicode_segmentation::UnicodeSegmentation;

/// Rewrite tips longer than this are cut in the compact console view
const COMPACT_TEXT_LIMIT: usize = 600;

pub trait OutputFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String>;
    fn supports_format(&self) -> OutputFormat;
}

/// Colored terminal output; `detailed` adds learning paths and resources
pub struct ConsoleFormatter {
    use_colors: bool,
    detailed: bool,
}

pub struct JsonFormatter {
    pretty: bool,
}

pub struct MarkdownFormatter {
    include_metadata: bool,
}

pub struct HtmlFormatter {
    include_styles: bool,
}

/// Report generator that coordinates different formatters
pub struct ReportGenerator {
    console_formatter: ConsoleFormatter,
    json_formatter: JsonFormatter,
    markdown_formatter: MarkdownFormatter,
    html_formatter: HtmlFormatter,
}

/// Cut `text` to at most `max` graphemes, marking the cut with an ellipsis
pub fn truncate_graphemes(text: &str, max: usize) -> String {
    let graphemes: Vec<&str> = text.graphemes(true).collect();
    if graphemes.len() <= max {
        return text.to_string();
    }
    let mut cut = graphemes[..max].concat();
    cut.push('…');
    cut
}

fn percent(value: f32) -> f64 {
    (value as f64 * 10000.0).round() / 100.0
}

/// Badge text for the report's fit band, kept in step with the summary sentence
fn score_label(report: &AnalysisReport) -> &'static str {
    match report.fit_label() {
        "excellent" => "EXCELLENT",
        "good" => "GOOD",
        "moderate" => "MODERATE",
        _ => "WEAK",
    }
}

fn source_name(source: &str) -> String {
    Path::new(source)
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| source.to_string())
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool, detailed: bool) -> Self {
        Self { use_colors, detailed }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn format_header(&self, title: &str, level: u8) -> String {
        let prefix = match level {
            1 => "█",
            2 => "▓",
            3 => "▒",
            _ => "░",
        };

        let color = match level {
            1 => Color::Blue,
            2 => Color::Green,
            3 => Color::Yellow,
            _ => Color::White,
        };

        if self.use_colors {
            format!("\n{} {}\n", prefix.color(color).bold(), title.color(color).bold())
        } else {
            format!("\n{} {}\n", prefix, title)
        }
    }

    fn format_score_badge(&self, report: &AnalysisReport) -> String {
        let badge = score_label(report);
        let color = match badge {
            "EXCELLENT" => Color::Green,
            "GOOD" => Color::BrightGreen,
            "MODERATE" => Color::Yellow,
            _ => Color::Red,
        };

        if self.use_colors {
            format!("[{}]", badge.color(color).bold())
        } else {
            format!("[{}]", badge)
        }
    }

    fn format_priority_icon(&self, priority: Importance) -> &'static str {
        match (priority, self.use_colors) {
            (Importance::High, true) => "🚨 ",
            (Importance::Medium, true) => "⚠️ ",
            (Importance::Low, true) => "💡 ",
            (Importance::High, false) => "[!] ",
            (Importance::Medium, false) => "[*] ",
            (Importance::Low, false) => "[-] ",
        }
    }

    fn priority_color(priority: Importance) -> Color {
        match priority {
            Importance::High => Color::Red,
            Importance::Medium => Color::Yellow,
            Importance::Low => Color::Green,
        }
    }

    fn format_weak_skill(&self, gap: &SkillGap) -> String {
        format!(
            "  • {} {}\n",
            self.colorize(&gap.skill, Color::Yellow),
            self.colorize(
                &format!(
                    "(current {:.0}% vs required {:.0}%)",
                    gap.current_level * 100.0,
                    gap.required_level * 100.0
                ),
                Color::BrightBlack
            )
        )
    }

    fn format_suggestion(&self, index: usize, suggestion: &ImprovementSuggestion) -> String {
        let mut output = format!(
            "{}. {}{} {}\n",
            index,
            self.format_priority_icon(suggestion.priority),
            self.colorize(&suggestion.skill, Self::priority_color(suggestion.priority)),
            self.colorize(
                &format!("({} priority, {})", suggestion.priority, suggestion.estimated_time),
                Color::BrightBlack
            )
        );

        if self.detailed {
            for (step, text) in suggestion.learning_path.iter().enumerate() {
                output.push_str(&format!("   {}. {}\n", step + 1, text));
            }
            for resource in &suggestion.resources {
                output.push_str(&format!(
                    "   📚 {} ({}, {}, {})\n",
                    resource.title,
                    resource.resource_type.as_str(),
                    resource.provider,
                    resource.duration
                ));
            }
        } else if let Some(first) = suggestion.learning_path.first() {
            output.push_str(&format!("   Start: {}\n", first));
        }

        output
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String> {
        let result = &report.result;
        let mut output = String::new();

        output.push_str(&self.format_header("📊 SKILL GAP ANALYSIS", 1));
        output.push_str(&format!(
            "Generated: {} | Processing time: {}ms\n",
            report.metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
            report.metadata.processing_time_ms
        ));
        output.push_str(&format!(
            "Resume: {} | Job: {}\n",
            source_name(&report.metadata.resume_source),
            source_name(&report.metadata.job_source)
        ));

        output.push_str(&self.format_header("Fit Summary", 2));
        output.push_str(&format!(
            "Profile Fit Score: {:.2}% {}\n",
            result.profile_fit_score,
            self.format_score_badge(report)
        ));
        output.push_str(&format!("🎯 Skill Match: {:.2}%\n", result.skill_match_percentage));
        output.push_str(&format!(
            "🔍 Document Similarity: {:.2}%\n",
            percent(result.document_similarity)
        ));
        if let Some(summary) = &result.analysis_summary {
            output.push_str(&format!("\n{}\n", self.colorize(summary, Color::Cyan)));
        }

        if !result.matched_skills.is_empty() {
            output.push_str(&self.format_header("✅ Matched Skills", 3));
            for skill in &result.matched_skills {
                if self.detailed {
                    output.push_str(&format!(
                        "  • {} {}\n",
                        self.colorize(&skill.name, Color::Green),
                        self.colorize(&format!("({})", skill.category), Color::BrightBlack)
                    ));
                } else {
                    output.push_str(&format!("  • {}\n", self.colorize(&skill.name, Color::Green)));
                }
            }
        }

        if !result.missing_skills.is_empty() {
            output.push_str(&self.format_header("❌ Missing Skills", 3));
            for gap in &result.missing_skills {
                output.push_str(&format!(
                    "  {}{}\n",
                    self.format_priority_icon(gap.importance),
                    self.colorize(&gap.skill, Self::priority_color(gap.importance))
                ));
            }
        }

        if !result.weak_skills.is_empty() {
            output.push_str(&self.format_header("⚠️  Weak Skills", 3));
            for gap in &result.weak_skills {
                output.push_str(&self.format_weak_skill(gap));
            }
        }

        if !result.improvement_suggestions.is_empty() {
            output.push_str(&self.format_header("📋 Improvement Suggestions", 2));
            output.push_str(&format!(
                "High: {} | Medium: {} | Low: {}\n",
                report.suggestions_with_priority(Importance::High).count(),
                report.suggestions_with_priority(Importance::Medium).count(),
                report.suggestions_with_priority(Importance::Low).count()
            ));
            for (i, suggestion) in result.improvement_suggestions.iter().enumerate() {
                output.push_str(&self.format_suggestion(i + 1, suggestion));
            }
        }

        if let Some(tips) = &result.resume_rewrite_suggestions {
            output.push_str(&self.format_header("📝 Resume Rewrite Suggestions", 2));
            if self.detailed {
                output.push_str(tips);
            } else {
                output.push_str(&truncate_graphemes(tips, COMPACT_TEXT_LIMIT));
            }
            output.push('\n');
        }

        output.push_str(&format!(
            "\n{} Generated by skill-gap v{} | Embeddings: {} | LLM: {}\n",
            self.colorize("ℹ️", Color::Blue),
            report.metadata.version,
            report.metadata.embedding_backend,
            report.metadata.llm_model.as_deref().unwrap_or("none")
        ));

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Console
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(report)?)
        } else {
            Ok(serde_json::to_string(report)?)
        }
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Json
    }
}

impl MarkdownFormatter {
    pub fn new(include_metadata: bool) -> Self {
        Self { include_metadata }
    }

    fn markdown_score_badge(report: &AnalysisReport) -> &'static str {
        match score_label(report) {
            "EXCELLENT" => "🟢 Excellent",
            "GOOD" => "🟡 Good",
            "MODERATE" => "🟠 Moderate",
            _ => "🔴 Weak",
        }
    }

    fn format_markdown_suggestion(index: usize, suggestion: &ImprovementSuggestion) -> String {
        let mut output = format!("### {}. {}\n\n", index, suggestion.skill);
        output.push_str(&format!(
            "**Priority:** {} | **Estimated time:** {}\n\n",
            suggestion.priority, suggestion.estimated_time
        ));

        for (step, text) in suggestion.learning_path.iter().enumerate() {
            output.push_str(&format!("{}. {}\n", step + 1, text));
        }
        output.push('\n');

        if !suggestion.resources.is_empty() {
            output.push_str("| Resource | Type | Provider | Duration |\n");
            output.push_str("|----------|------|----------|----------|\n");
            for resource in &suggestion.resources {
                output.push_str(&format!(
                    "| {} | {} | {} | {} |\n",
                    resource.title,
                    resource.resource_type.as_str(),
                    resource.provider,
                    resource.duration
                ));
            }
            output.push('\n');
        }

        output
    }
}

impl OutputFormatter for MarkdownFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String> {
        let result = &report.result;
        let mut output = String::new();

        output.push_str("# 📊 Skill Gap Analysis Report\n\n");

        if self.include_metadata {
            output.push_str(&format!(
                "**Generated:** {} | **Processing Time:** {}ms\n",
                report.metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
                report.metadata.processing_time_ms
            ));
            output.push_str(&format!(
                "**Resume:** `{}` | **Job:** `{}`\n\n",
                source_name(&report.metadata.resume_source),
                source_name(&report.metadata.job_source)
            ));
        }

        output.push_str("## Fit Summary\n\n");
        output.push_str(&format!(
            "**Profile Fit Score:** {:.2}% {}\n\n",
            result.profile_fit_score,
            Self::markdown_score_badge(report)
        ));
        output.push_str("| Metric | Value |\n");
        output.push_str("|--------|-------|\n");
        output.push_str(&format!("| 🎯 Skill Match | {:.2}% |\n", result.skill_match_percentage));
        output.push_str(&format!(
            "| 🔍 Document Similarity | {:.2}% |\n\n",
            percent(result.document_similarity)
        ));
        if let Some(summary) = &result.analysis_summary {
            output.push_str(&format!("> {}\n\n", summary));
        }

        output.push_str("## ✅ Matched Skills\n\n");
        if result.matched_skills.is_empty() {
            output.push_str("_None_\n\n");
        } else {
            for skill in &result.matched_skills {
                output.push_str(&format!("- {} ({})\n", skill.name, skill.category));
            }
            output.push('\n');
        }

        output.push_str("## ❌ Missing Skills\n\n");
        if result.missing_skills.is_empty() {
            output.push_str("_None_\n\n");
        } else {
            output.push_str("| Skill | Importance |\n");
            output.push_str("|-------|------------|\n");
            for gap in &result.missing_skills {
                output.push_str(&format!("| {} | {} |\n", gap.skill, gap.importance));
            }
            output.push('\n');
        }

        if !result.weak_skills.is_empty() {
            output.push_str("## ⚠️ Weak Skills\n\n");
            output.push_str("| Skill | Current | Required |\n");
            output.push_str("|-------|---------|----------|\n");
            for gap in &result.weak_skills {
                output.push_str(&format!(
                    "| {} | {:.0}% | {:.0}% |\n",
                    gap.skill,
                    gap.current_level * 100.0,
                    gap.required_level * 100.0
                ));
            }
            output.push('\n');
        }

        if !result.improvement_suggestions.is_empty() {
            output.push_str("## 📋 Improvement Suggestions\n\n");
            for (i, suggestion) in result.improvement_suggestions.iter().enumerate() {
                output.push_str(&Self::format_markdown_suggestion(i + 1, suggestion));
            }
        }

        if let Some(tips) = &result.resume_rewrite_suggestions {
            output.push_str("## 📝 Resume Rewrite Suggestions\n\n");
            output.push_str(tips);
            output.push_str("\n\n");
        }

        if self.include_metadata {
            output.push_str("---\n\n");
            output.push_str(&format!(
                "*Generated by skill-gap v{} | Embeddings: {} | LLM: {}*\n",
                report.metadata.version,
                report.metadata.embedding_backend,
                report.metadata.llm_model.as_deref().unwrap_or("none")
            ));
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Markdown
    }
}

/// Askama template for HTML output
#[derive(Template)]
#[template(source = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Skill Gap Analysis Report</title>
    {% if include_styles %}
    <style>
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            line-height: 1.6;
            color: #333;
            max-width: 900px;
            margin: 0 auto;
            padding: 20px;
            background: #f8f9fa;
        }
        .container {
            background: white;
            padding: 30px;
            border-radius: 8px;
            box-shadow: 0 2px 10px rgba(0,0,0,0.1);
        }
        .header {
            text-align: center;
            margin-bottom: 30px;
            border-bottom: 3px solid #007acc;
            padding-bottom: 20px;
        }
        .score-badge {
            display: inline-block;
            padding: 8px 16px;
            border-radius: 20px;
            font-weight: bold;
            color: white;
            margin-left: 10px;
        }
        .score-excellent { background: #28a745; }
        .score-good { background: #17a2b8; }
        .score-moderate { background: #ffc107; color: #000; }
        .score-weak { background: #dc3545; }
        .section h2 {
            color: #007acc;
            border-bottom: 2px solid #e9ecef;
            padding-bottom: 10px;
        }
        .suggestion {
            background: #f8f9fa;
            padding: 15px;
            margin: 10px 0;
            border-radius: 6px;
            border-left: 4px solid #17a2b8;
        }
        .priority-high { border-left-color: #dc3545; }
        .priority-medium { border-left-color: #ffc107; }
        .priority-low { border-left-color: #28a745; }
        .rewrite { white-space: pre-wrap; background: #f8f9fa; padding: 15px; border-radius: 6px; }
        .metadata {
            background: #e9ecef;
            padding: 15px;
            border-radius: 6px;
            margin-top: 30px;
            font-size: 0.9em;
            color: #6c757d;
        }
    </style>
    {% endif %}
</head>
<body>
    <div class="container">
        <div class="header">
            <h1>📊 Skill Gap Analysis Report</h1>
            <p>Generated: {{ generated_at }} | Processing time: {{ processing_time }}ms</p>
        </div>

        <div class="section">
            <h2>Fit Summary</h2>
            <h3>Profile Fit Score: {{ profile_fit_score }}% <span class="score-badge {{ score_class }}">{{ score_label }}</span></h3>
            <p><strong>Skill Match:</strong> {{ skill_match }}% | <strong>Document Similarity:</strong> {{ document_similarity }}%</p>
            {% if has_summary %}<p>{{ summary }}</p>{% endif %}
        </div>

        <div class="section">
            <h2>✅ Matched Skills</h2>
            <ul>
            {% for skill in matched_skills %}
                <li>{{ skill.name }} <small>({{ skill.category }})</small></li>
            {% endfor %}
            </ul>
        </div>

        <div class="section">
            <h2>❌ Missing Skills</h2>
            <ul>
            {% for gap in missing_skills %}
                <li>{{ gap.skill }} <small>({{ gap.importance }})</small></li>
            {% endfor %}
            </ul>
        </div>

        {% if has_weak_skills %}
        <div class="section">
            <h2>⚠️ Weak Skills</h2>
            <ul>
            {% for gap in weak_skills %}
                <li>{{ gap.skill }}: current {{ gap.current }}% vs required {{ gap.required }}%</li>
            {% endfor %}
            </ul>
        </div>
        {% endif %}

        <div class="section">
            <h2>📋 Improvement Suggestions</h2>
            {% for suggestion in suggestions %}
            <div class="suggestion priority-{{ suggestion.priority }}">
                <h3>{{ suggestion.skill }}</h3>
                <p><strong>Priority:</strong> {{ suggestion.priority }} | <strong>Estimated time:</strong> {{ suggestion.estimated_time }}</p>
                <ol>
                {% for step in suggestion.learning_path %}
                    <li>{{ step }}</li>
                {% endfor %}
                </ol>
                <ul>
                {% for resource in suggestion.resources %}
                    <li>{{ resource }}</li>
                {% endfor %}
                </ul>
            </div>
            {% endfor %}
        </div>

        {% if has_rewrite %}
        <div class="section">
            <h2>📝 Resume Rewrite Suggestions</h2>
            <div class="rewrite">{{ rewrite }}</div>
        </div>
        {% endif %}

        <div class="metadata">
            <p><strong>ℹ️ Generated by skill-gap v{{ version }}</strong></p>
            <p><strong>Embeddings:</strong> {{ embedding_backend }} | <strong>LLM:</strong> {{ llm_model }}</p>
            <p><strong>Resume:</strong> {{ resume_source }} | <strong>Job:</strong> {{ job_source }}</p>
        </div>
    </div>
</body>
</html>"#, ext = "html")]
struct HtmlTemplate {
    include_styles: bool,
    generated_at: String,
    processing_time: u64,
    profile_fit_score: String,
    score_class: String,
    score_label: String,
    skill_match: String,
    document_similarity: String,
    has_summary: bool,
    summary: String,
    matched_skills: Vec<HtmlSkill>,
    missing_skills: Vec<HtmlGap>,
    has_weak_skills: bool,
    weak_skills: Vec<HtmlWeakSkill>,
    suggestions: Vec<HtmlSuggestion>,
    has_rewrite: bool,
    rewrite: String,
    version: String,
    embedding_backend: String,
    llm_model: String,
    resume_source: String,
    job_source: String,
}

struct HtmlSkill {
    name: String,
    category: String,
}

struct HtmlGap {
    skill: String,
    importance: String,
}

struct HtmlWeakSkill {
    skill: String,
    current: String,
    required: String,
}

struct HtmlSuggestion {
    skill: String,
    priority: String,
    estimated_time: String,
    learning_path: Vec<String>,
    resources: Vec<String>,
}

impl HtmlFormatter {
    pub fn new(include_styles: bool) -> Self {
        Self { include_styles }
    }

    fn create_template_data(&self, report: &AnalysisReport) -> HtmlTemplate {
        let result = &report.result;
        let label = score_label(report);

        HtmlTemplate {
            include_styles: self.include_styles,
            generated_at: report.metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
            processing_time: report.metadata.processing_time_ms,
            profile_fit_score: format!("{:.2}", result.profile_fit_score),
            score_class: format!("score-{}", label.to_lowercase()),
            score_label: label.to_string(),
            skill_match: format!("{:.2}", result.skill_match_percentage),
            document_similarity: format!("{:.2}", percent(result.document_similarity)),
            has_summary: result.analysis_summary.is_some(),
            summary: result.analysis_summary.clone().unwrap_or_default(),
            matched_skills: result
                .matched_skills
                .iter()
                .map(|s| HtmlSkill {
                    name: s.name.clone(),
                    category: s.category.to_string(),
                })
                .collect(),
            missing_skills: result
                .missing_skills
                .iter()
                .map(|g| HtmlGap {
                    skill: g.skill.clone(),
                    importance: g.importance.to_string(),
                })
                .collect(),
            has_weak_skills: !result.weak_skills.is_empty(),
            weak_skills: result
                .weak_skills
                .iter()
                .map(|g| HtmlWeakSkill {
                    skill: g.skill.clone(),
                    current: format!("{:.0}", g.current_level * 100.0),
                    required: format!("{:.0}", g.required_level * 100.0),
                })
                .collect(),
            suggestions: result
                .improvement_suggestions
                .iter()
                .map(|s| HtmlSuggestion {
                    skill: s.skill.clone(),
                    priority: s.priority.to_string(),
                    estimated_time: s.estimated_time.clone(),
                    learning_path: s.learning_path.clone(),
                    resources: s
                        .resources
                        .iter()
                        .map(|r| format!("{} ({}, {})", r.title, r.resource_type.as_str(), r.provider))
                        .collect(),
                })
                .collect(),
            has_rewrite: result.resume_rewrite_suggestions.is_some(),
            rewrite: result.resume_rewrite_suggestions.clone().unwrap_or_default(),
            version: report.metadata.version.clone(),
            embedding_backend: report.metadata.embedding_backend.clone(),
            llm_model: report.metadata.llm_model.clone().unwrap_or_else(|| "none".to_string()),
            resume_source: source_name(&report.metadata.resume_source),
            job_source: source_name(&report.metadata.job_source),
        }
    }
}

impl OutputFormatter for HtmlFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String> {
        self.create_template_data(report)
            .render()
            .map_err(|e| SkillGapError::OutputFormatting(e.to_string()))
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Html
    }
}

impl ReportGenerator {
    pub fn new() -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(true, false),
            json_formatter: JsonFormatter::new(true),
            markdown_formatter: MarkdownFormatter::new(true),
            html_formatter: HtmlFormatter::new(true),
        }
    }

    pub fn with_options(use_colors: bool, detailed: bool, pretty_json: bool, include_metadata: bool) -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(use_colors, detailed),
            json_formatter: JsonFormatter::new(pretty_json),
            markdown_formatter: MarkdownFormatter::new(include_metadata),
            html_formatter: HtmlFormatter::new(true),
        }
    }

    pub fn generate_report(&self, report: &AnalysisReport, format: &OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Console => self.console_formatter.format_report(report),
            OutputFormat::Json => self.json_formatter.format_report(report),
            OutputFormat::Markdown => self.markdown_formatter.format_report(report),
            OutputFormat::Html => self.html_formatter.format_report(report),
        }
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

pub fn save_report_to_file(content: &str, file_path: &Path) -> Result<()> {
    use std::fs;
    if let Some(parent) = file_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(file_path, content)?;
    Ok(())
}

pub fn suggest_filename(format: &OutputFormat, resume_name: &str, timestamp: bool) -> String {
    let base_name = Path::new(resume_name)
        .file_stem()
        .map(|stem| stem.to_string_lossy().to_string())
        .filter(|stem| !stem.is_empty())
        .unwrap_or_else(|| "resume".to_string());

    let timestamp_suffix = if timestamp {
        format!("_{}", chrono::Utc::now().format("%Y%m%d_%H%M%S"))
    } else {
        String::new()
    };

    let extension = match format {
        OutputFormat::Console => "txt",
        OutputFormat::Json => "json",
        OutputFormat::Markdown => "md",
        OutputFormat::Html => "html",
    };

    format!("{}_skill_gap{}.{}", base_name, timestamp_suffix, extension)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::report::ReportMetadata;
    use crate::processing::analyzer::AnalysisResult;
    use crate::processing::extractor::ExtractedSkill;
    use crate::processing::suggestions::create_suggestion;
    use crate::processing::vocabulary::SkillCategory;
    use tempfile::TempDir;

    fn sample_report() -> AnalysisReport {
        let kubernetes = SkillGap::missing("Kubernetes", Importance::High);
        let result = AnalysisResult {
            skill_match_percentage: 50.0,
            profile_fit_score: 58.5,
            document_similarity: 0.45,
            matched_skills: vec![ExtractedSkill {
                name: "Python".to_string(),
                category: SkillCategory::ProgrammingLanguages,
            }],
            missing_skills: vec![kubernetes.clone()],
            weak_skills: vec![SkillGap {
                skill: "Python".to_string(),
                required_level: 0.5,
                current_level: 0.2,
                importance: Importance::High,
            }],
            improvement_suggestions: vec![create_suggestion(&kubernetes, Importance::High)],
            analysis_summary: Some("Your profile shows a moderate fit for this position.".to_string()),
            resume_rewrite_suggestions: Some("Mention <Kubernetes> & Helm".to_string()),
        };
        let metadata = ReportMetadata::new("hashing", "/tmp/jane_resume.pdf", "inline text")
            .with_processing_time(42);
        AnalysisReport::new(result, metadata)
    }

    #[test]
    fn test_console_plain_output() {
        let output = ConsoleFormatter::new(false, true).format_report(&sample_report()).unwrap();

        assert!(output.contains("█ 📊 SKILL GAP ANALYSIS"));
        assert!(output.contains("Profile Fit Score: 58.50% [MODERATE]"));
        assert!(output.contains("Document Similarity: 45.00%"));
        assert!(output.contains("Python (Programming Languages)"));
        assert!(output.contains("[!] Kubernetes"));
        assert!(output.contains("current 20% vs required 50%"));
        assert!(output.contains("(high priority, 2-3 months)"));
        assert!(output.contains("High: 1 | Medium: 0 | Low: 0"));
        assert!(output.contains("Resume: jane_resume.pdf | Job: inline text"));
        assert!(!output.contains('\u{1b}'));
    }

    #[test]
    fn test_json_round_trips_result() {
        let report = sample_report();
        let json = JsonFormatter::new(false).format_report(&report).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["result"]["skill_match_percentage"], 50.0);
        assert_eq!(value["result"]["missing_skills"][0]["importance"], "high");
        assert_eq!(value["result"]["improvement_suggestions"][0]["resources"][0]["type"], "course");
        assert_eq!(value["metadata"]["embedding_backend"], "hashing");

        let parsed: AnalysisReport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.result.missing_skills, report.result.missing_skills);
    }

    #[test]
    fn test_markdown_sections() {
        let output = MarkdownFormatter::new(true).format_report(&sample_report()).unwrap();

        assert!(output.starts_with("# 📊 Skill Gap Analysis Report"));
        assert!(output.contains("**Profile Fit Score:** 58.50% 🟠 Moderate"));
        assert!(output.contains("| Kubernetes | high |"));
        assert!(output.contains("### 1. Kubernetes"));
        assert!(output.contains("**Resume:** `jane_resume.pdf`"));
    }

    #[test]
    fn test_html_escapes_content() {
        let output = HtmlFormatter::new(false).format_report(&sample_report()).unwrap();

        assert!(output.contains("<title>Skill Gap Analysis Report</title>"));
        assert!(output.contains("score-moderate"));
        assert!(output.contains("&lt;Kubernetes&gt; &amp; Helm"));
        assert!(!output.contains("<style>"));
    }

    #[test]
    fn test_badge_follows_summary_band() {
        let mut report = sample_report();
        for (score, badge) in [(79.6, "[GOOD]"), (59.5, "[MODERATE]"), (80.0, "[EXCELLENT]"), (39.99, "[WEAK]")] {
            report.result.profile_fit_score = score;
            let output = ConsoleFormatter::new(false, false).format_report(&report).unwrap();
            assert!(output.contains(badge), "score {} should show {}", score, badge);
        }

        report.result.profile_fit_score = 79.6;
        let html = HtmlFormatter::new(false).format_report(&report).unwrap();
        assert!(html.contains("score-good"));
    }

    #[test]
    fn test_truncate_graphemes() {
        assert_eq!(truncate_graphemes("short", 10), "short");
        assert_eq!(truncate_graphemes("héllo wörld", 5), "héllo…");
        assert_eq!(truncate_graphemes("👩‍💻👩‍💻👩‍💻", 2), "👩‍💻👩‍💻…");
    }

    #[test]
    fn test_suggest_filename() {
        assert_eq!(
            suggest_filename(&OutputFormat::Markdown, "docs/jane_resume.pdf", false),
            "jane_resume_skill_gap.md"
        );
        assert_eq!(suggest_filename(&OutputFormat::Json, "", false), "resume_skill_gap.json");
        assert!(suggest_filename(&OutputFormat::Html, "cv.txt", true).ends_with(".html"));
    }

    #[test]
    fn test_save_report_creates_parents() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("reports/nested/out.md");
        save_report_to_file("# report", &path).unwrap();
        assert_eq!(std::fs::read_to_string(path).unwrap(), "# report");
    }

    #[test]
    fn test_generator_dispatch() {
        let generator = ReportGenerator::with_options(false, false, true, true);
        let report = sample_report();
        for format in [OutputFormat::Console, OutputFormat::Json, OutputFormat::Markdown, OutputFormat::Html] {
            assert!(!generator.generate_report(&report, &format).unwrap().is_empty());
        }
    }
}
