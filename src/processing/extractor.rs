//! Vocabulary-driven skill extraction from free text

use crate::processing::vocabulary::{self, SkillCategory, SkillTerm};
use once_cell::sync::Lazy;
use regex::{Regex, RegexSet};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A skill found in a source text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedSkill {
    pub name: String,
    pub category: SkillCategory,
}

impl From<&SkillTerm> for ExtractedSkill {
    fn from(term: &SkillTerm) -> Self {
        Self {
            name: term.name.clone(),
            category: term.category,
        }
    }
}

/// Title-Case runs of two or three words, e.g. "Machine Learning"
static CAPITALIZED_PHRASE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b([A-Z][a-z]+(?:\s+[A-Z][a-z]+){1,2})\b").expect("valid phrase pattern")
});

pub struct SkillExtractor {
    patterns: RegexSet,
    terms: &'static [SkillTerm],
}

impl SkillExtractor {
    pub fn new() -> Self {
        let terms = vocabulary::terms();
        let patterns = RegexSet::new(terms.iter().map(|t| term_pattern(t.term)))
            .expect("vocabulary patterns are valid");

        Self { patterns, terms }
    }

    /// Return every vocabulary skill mentioned in `text`, each at most once.
    ///
    /// Results follow vocabulary order, followed by any skill recovered only
    /// from a capitalized phrase.
    pub fn extract(&self, text: &str) -> Vec<ExtractedSkill> {
        if text.trim().is_empty() {
            return Vec::new();
        }

        let mut seen: HashSet<&'static str> = HashSet::new();
        let mut skills = Vec::new();

        for index in self.patterns.matches(text).iter() {
            let term = &self.terms[index];
            if seen.insert(term.term) {
                skills.push(ExtractedSkill::from(term));
            }
        }

        for phrase in CAPITALIZED_PHRASE.captures_iter(text) {
            let words: Vec<&str> = phrase[1].split_whitespace().collect();
            for term in phrase_candidates(&words).filter_map(|c| vocabulary::lookup(&c)) {
                if seen.insert(term.term) {
                    log::debug!("Recovered '{}' from capitalized phrase", term.name);
                    skills.push(ExtractedSkill::from(term));
                }
            }
        }

        skills
    }

    /// Display names of the extracted skills, in extraction order
    pub fn extract_names(&self, text: &str) -> Vec<String> {
        self.extract(text).into_iter().map(|s| s.name).collect()
    }
}

impl Default for SkillExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Case-insensitive pattern for one term with an optional plural "s".
/// Edges that are punctuation ("c++", "c#") need a non-word neighbour
/// instead of a `\b`, which never matches after a symbol.
fn term_pattern(term: &str) -> String {
    let escaped = regex::escape(term);
    let starts_word = term.chars().next().map_or(false, is_word_char);
    let ends_word = term.chars().last().map_or(false, is_word_char);

    let head = if starts_word { r"\b" } else { r"(?:^|\W)" };
    let tail = if ends_word { r"s?\b" } else { r"(?:s\b|\W|$)" };

    format!("(?i){}{}{}", head, escaped, tail)
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// The full phrase first, then its two-word windows
fn phrase_candidates<'a>(words: &'a [&'a str]) -> impl Iterator<Item = String> + 'a {
    let full = std::iter::once(words.join(" ").to_lowercase());
    let windows = words
        .windows(2)
        .filter(move |_| words.len() > 2)
        .map(|w| w.join(" ").to_lowercase());
    full.chain(windows)
}
