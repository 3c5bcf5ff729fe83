//! Differentiation — résumé attributes that set the candidate apart for this job.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::analysis::impact::is_quantified;
use crate::analysis::text::{contains_term, opening_phrase};
use crate::analysis::{Analyzer, AnalyzerOutput};
use crate::errors::TailorError;
use crate::models::{JobData, ResumeContent};

const MAX_DIFFERENTIATORS: usize = 8;

const LEADERSHIP_OPENINGS: &[&str] = &[
    "led",
    "managed",
    "mentored",
    "founded",
    "spearheaded",
    "directed",
    "headed",
    "owned",
    "launched",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DifferentiatorKind {
    QuantifiedAchievement,
    Leadership,
    Certification,
    Languages,
    Project,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Differentiator {
    pub label: String,
    pub evidence: String,
    pub kind: DifferentiatorKind,
    /// 0.0 – 1.0
    pub strength: f32,
    pub bullet_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UniquenessAnalysis {
    /// Ranked strongest first.
    pub differentiators: Vec<Differentiator>,
}

impl UniquenessAnalysis {
    pub fn top(&self, n: usize) -> &[Differentiator] {
        &self.differentiators[..n.min(self.differentiators.len())]
    }
}

/// Pure heuristic differentiation analyzer. No model calls.
pub struct HeuristicUniquenessAnalyzer;

#[async_trait]
impl Analyzer<UniquenessAnalysis> for HeuristicUniquenessAnalyzer {
    fn name(&self) -> &'static str {
        "uniqueness"
    }

    async fn analyze(
        &self,
        resume: &ResumeContent,
        job: &JobData,
    ) -> Result<AnalyzerOutput<UniquenessAnalysis>, TailorError> {
        Ok(AnalyzerOutput::local(analyze_uniqueness(resume, job)))
    }
}

pub fn analyze_uniqueness(resume: &ResumeContent, job: &JobData) -> UniquenessAnalysis {
    let job_text = job.searchable_text();
    let mentions_job_skill = |text: &str| {
        let lower = text.to_lowercase();
        job.skills
            .iter()
            .any(|s| contains_term(&lower, &s.to_lowercase()))
    };

    let mut found = Vec::new();

    for (exp, bullet) in resume.bullets() {
        let relevance = if mentions_job_skill(&bullet.text) { 0.2 } else { 0.0 };
        if is_quantified(&bullet.text) {
            found.push(Differentiator {
                label: format!("Measurable impact at {}", exp.company),
                evidence: bullet.text.clone(),
                kind: DifferentiatorKind::QuantifiedAchievement,
                strength: 0.6 + relevance,
                bullet_id: Some(bullet.id.clone()),
            });
        } else if opening_phrase(&bullet.text, LEADERSHIP_OPENINGS).is_some() {
            found.push(Differentiator {
                label: format!("Leadership at {}", exp.company),
                evidence: bullet.text.clone(),
                kind: DifferentiatorKind::Leadership,
                strength: 0.55 + relevance,
                bullet_id: Some(bullet.id.clone()),
            });
        }
    }

    for cert in resume.certifications() {
        let relevant = contains_term(&job_text, &cert.to_lowercase());
        found.push(Differentiator {
            label: format!("Certified: {cert}"),
            evidence: cert.clone(),
            kind: DifferentiatorKind::Certification,
            strength: if relevant { 0.8 } else { 0.5 },
            bullet_id: None,
        });
    }

    if resume.languages().len() > 1 {
        found.push(Differentiator {
            label: "Multilingual".to_string(),
            evidence: resume.languages().join(", "),
            kind: DifferentiatorKind::Languages,
            strength: 0.3,
            bullet_id: None,
        });
    }

    for project in resume.projects() {
        let overlaps = project
            .technologies
            .iter()
            .any(|t| contains_term(&job_text, &t.to_lowercase()));
        found.push(Differentiator {
            label: format!("Project: {}", project.name),
            evidence: project.description.clone(),
            kind: DifferentiatorKind::Project,
            strength: if overlaps { 0.6 } else { 0.4 },
            bullet_id: None,
        });
    }

    // Stable sort keeps document order among equal strengths.
    found.sort_by(|a, b| {
        b.strength
            .partial_cmp(&a.strength)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    found.truncate(MAX_DIFFERENTIATORS);

    UniquenessAnalysis {
        differentiators: found,
    }
}
