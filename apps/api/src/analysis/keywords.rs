//! Keyword/context coverage — which job keywords the résumé already shows, and where.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::analysis::text::{contains_term, tokens};
use crate::analysis::{Analyzer, AnalyzerOutput};
use crate::errors::TailorError;
use crate::models::{JobData, ResumeContent};

const MAX_KEYWORDS: usize = 25;
/// Requirements this short are treated as a keyword phrase verbatim.
const SHORT_REQUIREMENT_WORDS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeywordImportance {
    Required,
    Preferred,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeywordLocation {
    Experience,
    Summary,
    Skills,
    Projects,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordCoverage {
    pub keyword: String,
    pub importance: KeywordImportance,
    pub found: bool,
    /// First section the keyword was found in (experience first).
    pub location: Option<KeywordLocation>,
    /// The variant that matched, when it was a synonym rather than the keyword itself.
    pub matched_as: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextAnalysis {
    pub keywords: Vec<KeywordCoverage>,
    /// 0.0 – 1.0, found / total. 0.0 when the job yields no keywords.
    pub coverage_ratio: f32,
    pub required_coverage_ratio: f32,
}

impl ContextAnalysis {
    pub fn missing(&self) -> impl Iterator<Item = &KeywordCoverage> {
        self.keywords.iter().filter(|k| !k.found)
    }

    /// Keywords present only in the skills list, with no evidence in experience.
    pub fn skills_only(&self) -> impl Iterator<Item = &KeywordCoverage> {
        self.keywords
            .iter()
            .filter(|k| k.location == Some(KeywordLocation::Skills))
    }

    pub fn found_count(&self) -> usize {
        self.keywords.iter().filter(|k| k.found).count()
    }
}

/// Equivalent spellings accepted as evidence for a keyword.
const SYNONYMS: &[(&str, &[&str])] = &[
    ("javascript", &["js", "ecmascript"]),
    ("typescript", &["ts"]),
    ("node.js", &["nodejs", "node"]),
    ("react", &["react.js", "reactjs"]),
    ("kubernetes", &["k8s"]),
    ("postgresql", &["postgres"]),
    ("golang", &["go"]),
    ("go", &["golang"]),
    ("aws", &["amazon web services"]),
    ("gcp", &["google cloud"]),
    ("ci/cd", &["continuous integration", "continuous delivery", "continuous deployment"]),
    ("machine learning", &["ml"]),
    ("scalability", &["scalable", "scale", "scaling"]),
    ("microservices", &["microservice", "service-oriented"]),
    ("testing", &["tests", "tested", "unit tests"]),
];

/// Domain concepts worth tracking even when written in lowercase prose.
const KNOWN_CONCEPTS: &[&str] = &[
    "scalability",
    "microservices",
    "distributed systems",
    "machine learning",
    "ci/cd",
    "devops",
    "observability",
    "security",
    "performance",
    "automation",
    "cloud",
    "agile",
    "testing",
    "data pipelines",
    "api design",
];

/// Pure keyword coverage analyzer. No model calls.
pub struct KeywordContextAnalyzer;

#[async_trait]
impl Analyzer<ContextAnalysis> for KeywordContextAnalyzer {
    fn name(&self) -> &'static str {
        "context"
    }

    async fn analyze(
        &self,
        resume: &ResumeContent,
        job: &JobData,
    ) -> Result<AnalyzerOutput<ContextAnalysis>, TailorError> {
        Ok(AnalyzerOutput::local(analyze_context(resume, job)))
    }
}

pub fn analyze_context(resume: &ResumeContent, job: &JobData) -> ContextAnalysis {
    let targets = extract_job_keywords(job);

    let sections = [
        (KeywordLocation::Experience, resume.experience_text()),
        (
            KeywordLocation::Summary,
            resume.summary_text().unwrap_or_default().to_lowercase(),
        ),
        (KeywordLocation::Skills, resume.skills_text()),
        (KeywordLocation::Projects, resume.projects_text()),
    ];

    let keywords: Vec<KeywordCoverage> = targets
        .into_iter()
        .map(|(keyword, importance)| {
            let variants = variants_of(&keyword);
            let hit = sections.iter().find_map(|(location, text)| {
                variants
                    .iter()
                    .find(|v| contains_term(text, v))
                    .map(|v| (*location, v.clone()))
            });
            let keyword_lower = keyword.to_lowercase();
            KeywordCoverage {
                found: hit.is_some(),
                location: hit.as_ref().map(|(l, _)| *l),
                matched_as: hit.and_then(|(_, v)| (v != keyword_lower).then_some(v)),
                keyword,
                importance,
            }
        })
        .collect();

    let coverage_ratio = ratio(keywords.iter());
    let required_coverage_ratio = ratio(
        keywords
            .iter()
            .filter(|k| k.importance == KeywordImportance::Required),
    );

    ContextAnalysis {
        keywords,
        coverage_ratio,
        required_coverage_ratio,
    }
}

fn ratio<'a>(keywords: impl Iterator<Item = &'a KeywordCoverage>) -> f32 {
    let (found, total) = keywords.fold((0usize, 0usize), |(f, t), k| {
        (f + usize::from(k.found), t + 1)
    });
    if total == 0 {
        0.0
    } else {
        found as f32 / total as f32
    }
}

/// Lowercase keyword plus any known synonyms.
pub fn variants_of(keyword: &str) -> Vec<String> {
    let lower = keyword.to_lowercase();
    let mut variants = vec![lower.clone()];
    if let Some((_, synonyms)) = SYNONYMS.iter().find(|(k, _)| *k == lower) {
        variants.extend(synonyms.iter().map(|s| s.to_string()));
    }
    variants
}

/// Derives the ordered, de-duplicated keyword targets for a job.
///
/// Job skills and requirements are `Required`; technical terms from the
/// free-text description are `Preferred`.
pub fn extract_job_keywords(job: &JobData) -> Vec<(String, KeywordImportance)> {
    let mut out: Vec<(String, KeywordImportance)> = Vec::new();
    let mut push = |keyword: &str, importance: KeywordImportance| {
        let keyword = keyword.trim().trim_end_matches(['.', ',', ';', ':']).trim();
        if keyword.is_empty()
            || out
                .iter()
                .any(|(k, _)| k.eq_ignore_ascii_case(keyword))
        {
            return;
        }
        out.push((keyword.to_string(), importance));
    };

    for skill in &job.skills {
        push(skill, KeywordImportance::Required);
    }
    for requirement in &job.requirements {
        if requirement.split_whitespace().count() <= SHORT_REQUIREMENT_WORDS {
            push(requirement, KeywordImportance::Required);
        } else {
            for term in technical_terms(requirement) {
                push(&term, KeywordImportance::Required);
            }
        }
    }
    for term in technical_terms(&job.description) {
        push(&term, KeywordImportance::Preferred);
    }

    out.truncate(MAX_KEYWORDS);
    out
}

/// Picks technology-looking tokens (Node.js, GraphQL, AWS, C++, EC2) and
/// known domain concepts out of free text.
pub fn technical_terms(text: &str) -> Vec<String> {
    let mut terms: Vec<String> = Vec::new();

    for raw in text.split(|c: char| c.is_whitespace() || matches!(c, ',' | ';' | '(' | ')' | '&')) {
        let word = raw.trim_matches(|c: char| matches!(c, '.' | ':' | '"' | '\'' | '!' | '?'));
        if word.chars().count() < 2 || !word.chars().any(char::is_alphabetic) {
            continue;
        }
        let has_symbol = word.contains(['.', '+', '#']);
        let all_caps = word.chars().filter(|c| c.is_alphabetic()).all(char::is_uppercase);
        let inner_caps = word.chars().skip(1).any(char::is_uppercase);
        let mixed_digits = word.chars().any(|c| c.is_ascii_digit());
        if has_symbol || all_caps || inner_caps || mixed_digits {
            if !terms.iter().any(|t| t.eq_ignore_ascii_case(word)) {
                terms.push(word.to_string());
            }
        }
    }

    let lower = text.to_lowercase();
    let word_set = tokens(&lower);
    for concept in KNOWN_CONCEPTS {
        let present = if concept.contains(' ') {
            contains_term(&lower, concept)
        } else {
            word_set.iter().any(|w| w == concept)
        };
        if present && !terms.iter().any(|t| t.eq_ignore_ascii_case(concept)) {
            terms.push(concept.to_string());
        }
    }

    terms
}
