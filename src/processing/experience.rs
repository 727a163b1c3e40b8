//! "N years of X" experience extraction

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static EXPERIENCE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(\d+)[+]?\s*(?:years?|yrs?)(?:\s+of)?\s+(?:experience\s+)?(?:in\s+|with\s+)?([a-zA-Z\s.+\-]+)",
    )
    .expect("valid experience pattern")
});

/// Topic -> years, in first-seen order. Re-inserting a topic overwrites its
/// value but keeps its position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperienceMap {
    entries: Vec<(String, u32)>,
}

impl ExperienceMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, topic: String, years: u32) {
        match self.entries.iter_mut().find(|(t, _)| *t == topic) {
            Some(entry) => entry.1 = years,
            None => self.entries.push((topic, years)),
        }
    }

    pub fn get(&self, topic: &str) -> Option<u32> {
        self.entries.iter().find(|(t, _)| t == topic).map(|(_, y)| *y)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.entries.iter().map(|(t, y)| (t.as_str(), *y))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Parse every experience phrase in `text`.
///
/// Matching runs on the lower-cased text; the topic is the greedy run of
/// letters, whitespace, `.`, `+` and `-` after the phrase, trimmed.
pub fn extract_years(text: &str) -> ExperienceMap {
    let lowered = text.to_lowercase();
    let mut experience = ExperienceMap::new();

    for caps in EXPERIENCE_PATTERN.captures_iter(&lowered) {
        let years = match caps[1].parse::<u32>() {
            Ok(years) => years,
            Err(_) => {
                log::debug!("Skipping unparseable year count '{}'", &caps[1]);
                continue;
            }
        };

        let topic = caps[2].trim();
        if topic.is_empty() {
            continue;
        }

        experience.insert(topic.to_string(), years);
    }

    experience
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_years_of_experience_in_topic() {
        let exp = extract_years("5 years of experience in Python development");
        assert_eq!(exp.len(), 1);
        let (topic, years) = exp.iter().next().unwrap();
        assert!(topic.contains("python development"));
        assert_eq!(years, 5);
    }

    #[test]
    fn test_plus_and_abbreviations() {
        let exp = extract_years("3+ yrs with Kubernetes, 2 year of Go");
        assert_eq!(exp.get("kubernetes"), Some(3));
        assert_eq!(exp.get("go"), Some(2));
    }

    #[test]
    fn test_topic_stops_at_punctuation_and_digits() {
        let exp = extract_years("Needs 4 years experience with React; 1 yr Rust");
        assert_eq!(exp.get("react"), Some(4));
        assert_eq!(exp.get("rust"), Some(1));
    }

    #[test]
    fn test_duplicate_topic_overwrites_in_place() {
        let exp = extract_years("2 years of Java. 7 years of SQL. 6 years of Java.");
        let collected: Vec<(&str, u32)> = exp.iter().collect();
        assert_eq!(collected, vec![("java.", 6), ("sql.", 7)]);
    }

    #[test]
    fn test_no_mentions_is_empty() {
        assert!(extract_years("Seasoned engineer, no numbers here").is_empty());
        assert!(extract_years("").is_empty());
    }

    #[test]
    fn test_oversized_year_count_is_skipped() {
        let exp = extract_years("99999999999 years of python, 3 years of go");
        assert_eq!(exp.get("go"), Some(3));
        assert_eq!(exp.len(), 1);
    }
}
