//! Impact quantification — flags bullets without measurable outcomes.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::analysis::text::opening_phrase;
use crate::analysis::{Analyzer, AnalyzerOutput};
use crate::errors::TailorError;
use crate::models::{JobData, ResumeContent};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulletImpact {
    pub bullet_id: String,
    pub experience_id: String,
    pub quantified: bool,
    /// Weak opening phrase such as "worked on", if the bullet starts with one.
    pub weak_opening: Option<String>,
    pub vague_terms: Vec<String>,
    pub suggestions: Vec<String>,
}

impl BulletImpact {
    pub fn needs_metrics(&self) -> bool {
        !self.quantified
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImpactAnalysis {
    /// 0 – 100
    pub score: u32,
    pub bullets: Vec<BulletImpact>,
}

impl ImpactAnalysis {
    pub fn for_bullet(&self, bullet_id: &str) -> Option<&BulletImpact> {
        self.bullets.iter().find(|b| b.bullet_id == bullet_id)
    }
}

const WEAK_OPENINGS: &[&str] = &[
    "responsible for",
    "worked on",
    "worked with",
    "helped",
    "assisted",
    "participated in",
    "involved in",
    "tasked with",
    "duties included",
    "supported",
];

const VAGUE_VERBS: &[&str] = &[
    "improved",
    "enhanced",
    "helped",
    "worked on",
    "assisted",
    "supported",
    "participated",
    "involved",
];

const VAGUE_SCALE_WORDS: &[&str] = &[
    "significant",
    "major",
    "large",
    "huge",
    "massive",
    "substantial",
    "considerable",
    "great",
    "many",
    "numerous",
    "various",
    "several",
];

const QUANTIFIED_POINTS: u32 = 60;
const OPENING_POINTS: u32 = 25;
const PRECISION_POINTS: u32 = 15;

/// Pure keyword impact analyzer. No model calls.
pub struct KeywordImpactAnalyzer;

#[async_trait]
impl Analyzer<ImpactAnalysis> for KeywordImpactAnalyzer {
    fn name(&self) -> &'static str {
        "impact"
    }

    async fn analyze(
        &self,
        resume: &ResumeContent,
        _job: &JobData,
    ) -> Result<AnalyzerOutput<ImpactAnalysis>, TailorError> {
        Ok(AnalyzerOutput::local(analyze_impact(resume)))
    }
}

pub fn analyze_impact(resume: &ResumeContent) -> ImpactAnalysis {
    let bullets: Vec<BulletImpact> = resume
        .bullets()
        .map(|(exp, bullet)| assess_bullet(&exp.id, &bullet.id, &bullet.text))
        .collect();

    if bullets.is_empty() {
        return ImpactAnalysis {
            score: 0,
            bullets,
        };
    }

    let total: u32 = bullets
        .iter()
        .map(|b| {
            let mut points = 0;
            if b.quantified {
                points += QUANTIFIED_POINTS;
            }
            if b.weak_opening.is_none() {
                points += OPENING_POINTS;
            }
            if b.vague_terms.is_empty() {
                points += PRECISION_POINTS;
            }
            points
        })
        .sum();

    ImpactAnalysis {
        score: (total as f32 / bullets.len() as f32).round() as u32,
        bullets,
    }
}

/// Checks a single bullet for quantified impact.
///
/// Quantified when it contains a digit, `%`, a currency sign, or an `Nx`
/// multiplier. Vague verbs and scale words only count against unquantified
/// bullets.
pub fn assess_bullet(experience_id: &str, bullet_id: &str, text: &str) -> BulletImpact {
    let quantified = is_quantified(text);
    let weak_opening = opening_phrase(text, WEAK_OPENINGS).map(str::to_string);
    let text_lower = text.to_lowercase();

    let mut vague_terms = Vec::new();
    let mut suggestions = Vec::new();

    if !quantified {
        if let Some(&vague) = VAGUE_VERBS.iter().find(|v| text_lower.contains(*v)) {
            vague_terms.push(vague.to_string());
            suggestions.push(format!(
                "Quantify '{vague}': how much, how many, or how fast?"
            ));
        }
        if let Some(&scale) = VAGUE_SCALE_WORDS
            .iter()
            .find(|w| text_lower.split(|c: char| !c.is_alphanumeric()).any(|t| t == **w))
        {
            vague_terms.push(scale.to_string());
            suggestions.push(format!(
                "Replace '{scale}' with a specific number or percentage."
            ));
        }
        if suggestions.is_empty() {
            suggestions.push(
                "Add a measurable outcome: scale, percentage, time saved or cost.".to_string(),
            );
        }
    }

    if let Some(opening) = &weak_opening {
        suggestions.push(format!(
            "Replace the opening '{opening}' with a strong action verb."
        ));
    }

    BulletImpact {
        bullet_id: bullet_id.to_string(),
        experience_id: experience_id.to_string(),
        quantified,
        weak_opening,
        vague_terms,
        suggestions,
    }
}

pub fn is_quantified(text: &str) -> bool {
    text.chars().any(|c| c.is_ascii_digit())
        || text.contains('%')
        || text.contains('$')
        || text.contains('€')
        || text.contains('£')
}
