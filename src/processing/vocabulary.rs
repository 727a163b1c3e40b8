//! Static skill vocabulary and category lookup
//!
//! The vocabulary is the only source of truth for what counts as a skill.
//! Every term is lower-case; display names and categories are derived once
//! and shared for the life of the process.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Broad grouping for a skill term
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SkillCategory {
    #[serde(rename = "Programming Languages")]
    ProgrammingLanguages,
    Frontend,
    Backend,
    Database,
    DevOps,
    #[serde(rename = "AI/ML")]
    AiMl,
    #[serde(rename = "Data Science")]
    DataScience,
    Tools,
    Other,
}

impl SkillCategory {
    pub const ALL: [SkillCategory; 9] = [
        SkillCategory::ProgrammingLanguages,
        SkillCategory::Frontend,
        SkillCategory::Backend,
        SkillCategory::Database,
        SkillCategory::DevOps,
        SkillCategory::AiMl,
        SkillCategory::DataScience,
        SkillCategory::Tools,
        SkillCategory::Other,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SkillCategory::ProgrammingLanguages => "Programming Languages",
            SkillCategory::Frontend => "Frontend",
            SkillCategory::Backend => "Backend",
            SkillCategory::Database => "Database",
            SkillCategory::DevOps => "DevOps",
            SkillCategory::AiMl => "AI/ML",
            SkillCategory::DataScience => "Data Science",
            SkillCategory::Tools => "Tools",
            SkillCategory::Other => "Other",
        }
    }

    /// Parse a category from its label, case-insensitively
    pub fn from_label(label: &str) -> Option<Self> {
        let wanted = label.trim().to_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.label().to_lowercase() == wanted)
    }
}

impl fmt::Display for SkillCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A known skill with its canonical display form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillTerm {
    /// Lower-case form used for matching
    pub term: &'static str,
    /// Canonical display form, e.g. "Machine Learning"
    pub name: String,
    pub category: SkillCategory,
}

const TERMS: &[&str] = &[
    // Languages
    "python", "java", "javascript", "typescript", "c++", "c#", "ruby", "go", "rust", "php",
    "swift", "kotlin", "r", "matlab", "scala",
    // Web frameworks
    "react", "angular", "vue", "node.js", "express", "django", "flask", "fastapi", "nextjs",
    "nuxt", "svelte",
    // Frameworks and ML libraries
    "spring", "hibernate", "tensorflow", "pytorch", "keras", "scikit-learn", "xgboost",
    "lightgbm",
    // Data and storage
    "pandas", "numpy", "sql", "mongodb", "postgresql", "mysql", "redis", "elasticsearch",
    "dynamodb", "cassandra", "neo4j",
    // Cloud and infrastructure
    "docker", "kubernetes", "aws", "azure", "gcp", "terraform", "jenkins", "gitlab",
    "circleci", "ansible", "chef", "puppet",
    // Process and tooling
    "git", "github", "jira", "agile", "scrum", "ci/cd", "rest api", "graphql", "soap",
    // Frontend tooling
    "html", "css", "tailwind", "bootstrap", "sass", "less", "webpack", "vite", "rollup",
    "babel",
    // AI fields
    "machine learning", "deep learning", "nlp", "computer vision", "data science",
    "artificial intelligence",
    // Protocols and architecture
    "api", "microservices", "oauth", "jwt", "websocket", "grpc", "rest", "rpc",
    // Big data and systems
    "hadoop", "spark", "kafka", "rabbitmq", "nginx", "apache", "linux", "unix", "bash",
    "powershell",
    // MLOps
    "mlops", "devops", "dataops", "airflow", "mlflow", "kubeflow", "sagemaker",
    // Model families
    "bert", "gpt", "transformer", "lstm", "cnn", "rnn", "gan",
    // BI
    "tableau", "powerbi", "looker", "metabase", "grafana",
    // Testing
    "selenium", "cypress", "jest", "pytest", "junit", "mocha", "chai",
];

const CATEGORY_KEYWORDS: &[(SkillCategory, &[&str])] = &[
    (
        SkillCategory::ProgrammingLanguages,
        &["python", "java", "javascript", "typescript", "c++", "c#", "ruby", "go", "rust", "php", "swift", "kotlin"],
    ),
    (
        SkillCategory::Frontend,
        &["react", "angular", "vue", "html", "css", "tailwind", "bootstrap", "sass", "webpack", "vite"],
    ),
    (
        SkillCategory::Backend,
        &["node.js", "express", "django", "flask", "fastapi", "spring", "hibernate", ".net"],
    ),
    (
        SkillCategory::Database,
        &["sql", "mongodb", "postgresql", "mysql", "redis", "elasticsearch", "dynamodb", "cassandra"],
    ),
    (
        SkillCategory::DevOps,
        &["docker", "kubernetes", "aws", "azure", "gcp", "terraform", "jenkins", "gitlab", "ci/cd"],
    ),
    (
        SkillCategory::AiMl,
        &["tensorflow", "pytorch", "keras", "scikit-learn", "machine learning", "deep learning", "nlp", "computer vision"],
    ),
    (
        SkillCategory::DataScience,
        &["pandas", "numpy", "spark", "hadoop", "data science", "analytics"],
    ),
    (
        SkillCategory::Tools,
        &["git", "github", "jira", "vscode", "postman"],
    ),
];

/// Display forms that plain title-casing gets wrong
const DISPLAY_OVERRIDES: &[(&str, &str)] = &[
    ("node.js", "Node.js"),
    ("nextjs", "Next.js"),
    ("fastapi", "FastAPI"),
    ("sql", "SQL"),
    ("mongodb", "MongoDB"),
    ("postgresql", "PostgreSQL"),
    ("mysql", "MySQL"),
    ("dynamodb", "DynamoDB"),
    ("aws", "AWS"),
    ("gcp", "GCP"),
    ("gitlab", "GitLab"),
    ("circleci", "CircleCI"),
    ("github", "GitHub"),
    ("ci/cd", "CI/CD"),
    ("rest api", "REST API"),
    ("graphql", "GraphQL"),
    ("soap", "SOAP"),
    ("html", "HTML"),
    ("css", "CSS"),
    ("nlp", "NLP"),
    ("api", "API"),
    ("oauth", "OAuth"),
    ("jwt", "JWT"),
    ("websocket", "WebSocket"),
    ("grpc", "gRPC"),
    ("rest", "REST"),
    ("rpc", "RPC"),
    ("rabbitmq", "RabbitMQ"),
    ("mlops", "MLOps"),
    ("devops", "DevOps"),
    ("dataops", "DataOps"),
    ("mlflow", "MLflow"),
    ("sagemaker", "SageMaker"),
    ("bert", "BERT"),
    ("gpt", "GPT"),
    ("lstm", "LSTM"),
    ("cnn", "CNN"),
    ("rnn", "RNN"),
    ("gan", "GAN"),
    ("powerbi", "Power BI"),
    ("pytorch", "PyTorch"),
    ("tensorflow", "TensorFlow"),
    ("xgboost", "XGBoost"),
    ("lightgbm", "LightGBM"),
    ("numpy", "NumPy"),
    ("javascript", "JavaScript"),
    ("typescript", "TypeScript"),
    ("php", "PHP"),
    ("matlab", "MATLAB"),
    ("pytest", "pytest"),
    ("junit", "JUnit"),
];

static VOCABULARY: Lazy<Vec<SkillTerm>> = Lazy::new(|| {
    TERMS
        .iter()
        .map(|&term| SkillTerm {
            term,
            name: display_name(term),
            category: categorize(term),
        })
        .collect()
});

static BY_TERM: Lazy<HashMap<&'static str, usize>> = Lazy::new(|| {
    VOCABULARY
        .iter()
        .enumerate()
        .map(|(i, t)| (t.term, i))
        .collect()
});

static BY_NAME: Lazy<HashMap<String, usize>> = Lazy::new(|| {
    VOCABULARY
        .iter()
        .enumerate()
        .map(|(i, t)| (t.name.to_lowercase(), i))
        .collect()
});

/// All vocabulary terms in declaration order
pub fn terms() -> &'static [SkillTerm] {
    &VOCABULARY
}

/// Case-insensitive lookup by term
pub fn lookup(name: &str) -> Option<&'static SkillTerm> {
    let key = name.trim().to_lowercase();
    BY_TERM.get(key.as_str()).map(|&i| &VOCABULARY[i])
}

/// Like [`lookup`], but also accepts display names that respell the term,
/// so "Next.js" resolves to `nextjs` and "Power BI" to `powerbi`.
pub fn resolve(name: &str) -> Option<&'static SkillTerm> {
    lookup(name).or_else(|| {
        let key = name.trim().to_lowercase();
        BY_NAME.get(key.as_str()).map(|&i| &VOCABULARY[i])
    })
}

pub fn terms_in(category: SkillCategory) -> impl Iterator<Item = &'static SkillTerm> {
    VOCABULARY.iter().filter(move |t| t.category == category)
}

/// Pick the category whose keyword is the longest substring of `skill`.
/// Ties keep the earlier group; nothing contained means `Other`.
pub fn categorize(skill: &str) -> SkillCategory {
    let skill = skill.to_lowercase();
    let mut best: Option<(usize, SkillCategory)> = None;

    for (category, keywords) in CATEGORY_KEYWORDS {
        for keyword in keywords.iter() {
            if skill.contains(keyword) {
                let len = keyword.len();
                if best.map_or(true, |(best_len, _)| len > best_len) {
                    best = Some((len, *category));
                }
            }
        }
    }

    best.map(|(_, category)| category).unwrap_or(SkillCategory::Other)
}

fn display_name(term: &str) -> String {
    DISPLAY_OVERRIDES
        .iter()
        .find(|(t, _)| *t == term)
        .map(|(_, display)| display.to_string())
        .unwrap_or_else(|| title_case(term))
}

/// Upper-case the first letter of every alphabetic run, lower-case the rest.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_is_alpha = false;

    for ch in text.chars() {
        if ch.is_alphabetic() {
            if prev_is_alpha {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            prev_is_alpha = true;
        } else {
            out.push(ch);
            prev_is_alpha = false;
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terms_are_unique_and_lowercase() {
        let mut seen = std::collections::HashSet::new();
        for term in terms() {
            assert_eq!(term.term, term.term.to_lowercase());
            assert!(seen.insert(term.term), "duplicate term {}", term.term);
        }
    }

    #[test]
    fn test_longest_keyword_wins() {
        assert_eq!(categorize("python"), SkillCategory::ProgrammingLanguages);
        assert_eq!(categorize("mongodb"), SkillCategory::Database);
        assert_eq!(categorize("gitlab"), SkillCategory::DevOps);
        assert_eq!(categorize("django"), SkillCategory::Backend);
        assert_eq!(categorize("javascript"), SkillCategory::ProgrammingLanguages);
        assert_eq!(categorize("machine learning"), SkillCategory::AiMl);
        assert_eq!(categorize("kubernetes"), SkillCategory::DevOps);
        assert_eq!(categorize("graphql"), SkillCategory::Other);
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let term = lookup("Machine Learning").unwrap();
        assert_eq!(term.name, "Machine Learning");
        assert_eq!(lookup("  DOCKER ").unwrap().name, "Docker");
        assert!(lookup("cobol").is_none());
    }

    #[test]
    fn test_resolve_respelled_display_names() {
        assert!(lookup("Next.js").is_none());
        assert_eq!(resolve("Next.js").unwrap().term, "nextjs");
        assert_eq!(resolve("power bi").unwrap().term, "powerbi");
        assert_eq!(resolve("Docker").unwrap().term, "docker");
        assert!(resolve("cobol").is_none());
    }

    #[test]
    fn test_display_names() {
        assert_eq!(lookup("aws").unwrap().name, "AWS");
        assert_eq!(lookup("scikit-learn").unwrap().name, "Scikit-Learn");
        assert_eq!(lookup("c++").unwrap().name, "C++");
        assert_eq!(title_case("python development"), "Python Development");
    }

    #[test]
    fn test_category_labels_round_trip() {
        for category in SkillCategory::ALL {
            assert_eq!(SkillCategory::from_label(category.label()), Some(category));
        }
        assert_eq!(
            serde_json::to_string(&SkillCategory::AiMl).unwrap(),
            "\"AI/ML\""
        );
    }
}
