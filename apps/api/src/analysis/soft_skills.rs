//! Soft-skill detection — which soft skills the résumé evidences and which the job asks for.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::analysis::text::contains_term;
use crate::analysis::{Analyzer, AnalyzerOutput};
use crate::errors::TailorError;
use crate::models::{JobData, ResumeContent};

/// Soft skill name → indicator phrases (lowercase).
const SOFT_SKILLS: &[(&str, &[&str])] = &[
    (
        "Leadership",
        &["led", "lead", "mentored", "managed", "supervised", "spearheaded", "leadership"],
    ),
    (
        "Communication",
        &["presented", "communicated", "documented", "authored", "communication"],
    ),
    (
        "Collaboration",
        &["collaborated", "partnered", "cross-functional", "coordinated", "collaboration", "teamwork"],
    ),
    (
        "Problem Solving",
        &["resolved", "diagnosed", "debugged", "troubleshot", "problem solving", "problem-solving"],
    ),
    (
        "Ownership",
        &["owned", "ownership", "end-to-end", "accountable"],
    ),
    (
        "Adaptability",
        &["adapted", "pivoted", "fast-paced", "adaptable", "adaptability"],
    ),
    (
        "Time Management",
        &["deadline", "deadlines", "prioritized", "time management"],
    ),
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SoftSkillEvidence {
    pub skill: String,
    /// Bullet that demonstrates the skill; `None` when only listed under skills.
    pub bullet_id: Option<String>,
    pub evidence: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SoftSkillsAnalysis {
    pub detected: Vec<SoftSkillEvidence>,
    /// Soft skills the job description asks for, in lexicon order.
    pub demanded: Vec<String>,
    /// Demanded skills with no evidence anywhere in the résumé.
    pub missing: Vec<String>,
}

impl SoftSkillsAnalysis {
    pub fn evidence_for(&self, skill: &str) -> Option<&SoftSkillEvidence> {
        self.detected.iter().find(|d| d.skill == skill)
    }
}

/// Pure lexicon-based soft-skill analyzer. No model calls.
pub struct LexiconSoftSkillsAnalyzer;

#[async_trait]
impl Analyzer<SoftSkillsAnalysis> for LexiconSoftSkillsAnalyzer {
    fn name(&self) -> &'static str {
        "soft_skills"
    }

    async fn analyze(
        &self,
        resume: &ResumeContent,
        job: &JobData,
    ) -> Result<AnalyzerOutput<SoftSkillsAnalysis>, TailorError> {
        Ok(AnalyzerOutput::local(analyze_soft_skills(resume, job)))
    }
}

pub fn analyze_soft_skills(resume: &ResumeContent, job: &JobData) -> SoftSkillsAnalysis {
    let job_text = job.searchable_text();
    let listed: Vec<String> = resume.skills.soft.iter().map(|s| s.to_lowercase()).collect();

    let mut detected = Vec::new();
    let mut demanded = Vec::new();
    let mut missing = Vec::new();

    for (skill, indicators) in SOFT_SKILLS {
        let skill_lower = skill.to_lowercase();
        let mentions = |text: &str| {
            contains_term(text, &skill_lower) || indicators.iter().any(|i| contains_term(text, i))
        };

        let from_bullet = resume
            .bullets()
            .find(|(_, b)| mentions(&b.text.to_lowercase()))
            .map(|(_, b)| SoftSkillEvidence {
                skill: skill.to_string(),
                bullet_id: Some(b.id.clone()),
                evidence: b.text.clone(),
            });
        let evidence = from_bullet.or_else(|| {
            listed
                .iter()
                .any(|l| l.contains(&skill_lower))
                .then(|| SoftSkillEvidence {
                    skill: skill.to_string(),
                    bullet_id: None,
                    evidence: "Listed under soft skills".to_string(),
                })
        });

        let is_demanded = mentions(&job_text);
        if is_demanded {
            demanded.push(skill.to_string());
            if evidence.is_none() {
                missing.push(skill.to_string());
            }
        }
        if let Some(evidence) = evidence {
            detected.push(evidence);
        }
    }

    SoftSkillsAnalysis {
        detected,
        demanded,
        missing,
    }
}
