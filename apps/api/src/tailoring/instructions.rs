//! Transformation instructions — the Rule Engine's explicit, per-field output.
//!
//! The rewriter only ever acts on what these types say. A field whose
//! instruction is at level `none` with no flags set is never touched.

use serde::{Deserialize, Serialize};

use crate::models::WhyFitPoint;
use crate::tailoring::rules::RuleId;
use crate::tailoring::tone::Tone;

/// How much a field should change. Ordered: `None < Minor < Major < Transformed`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ImprovementLevel {
    #[default]
    None,
    Minor,
    Major,
    Transformed,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulletFlags {
    pub add_metrics: bool,
    pub add_keywords: bool,
    pub add_context: bool,
    pub highlight_soft_skills: bool,
}

impl BulletFlags {
    pub fn count(&self) -> usize {
        [
            self.add_metrics,
            self.add_keywords,
            self.add_context,
            self.highlight_soft_skills,
        ]
        .into_iter()
        .filter(|f| *f)
        .count()
    }

    pub fn any(&self) -> bool {
        self.count() > 0
    }
}

/// Classified kind of a bullet change, derived from the instruction flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeType {
    Metrics,
    Keywords,
    Context,
    SoftSkills,
    Combined,
}

impl ChangeType {
    /// One flag maps to its category, several to `Combined`. A rewrite with
    /// no flags (wording only) counts as `Context`.
    pub fn from_flags(flags: &BulletFlags) -> Self {
        if flags.count() > 1 {
            return ChangeType::Combined;
        }
        if flags.add_metrics {
            ChangeType::Metrics
        } else if flags.add_keywords {
            ChangeType::Keywords
        } else if flags.highlight_soft_skills {
            ChangeType::SoftSkills
        } else {
            ChangeType::Context
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulletInstruction {
    pub bullet_id: String,
    pub experience_id: String,
    pub original_text: String,
    pub directives: Vec<String>,
    /// Job keywords this bullet should surface, if truthful.
    pub keywords: Vec<String>,
    pub soft_skills: Vec<String>,
    pub flags: BulletFlags,
    pub tone: Tone,
    pub improvement_level: ImprovementLevel,
}

impl BulletInstruction {
    pub fn untouched(bullet_id: &str, experience_id: &str, text: &str, tone: Tone) -> Self {
        Self {
            bullet_id: bullet_id.to_string(),
            experience_id: experience_id.to_string(),
            original_text: text.to_string(),
            directives: Vec::new(),
            keywords: Vec::new(),
            soft_skills: Vec::new(),
            flags: BulletFlags::default(),
            tone,
            improvement_level: ImprovementLevel::None,
        }
    }

    pub fn needs_rewrite(&self) -> bool {
        self.improvement_level != ImprovementLevel::None || self.flags.any()
    }

    /// Adds a directive; rules augment, never replace.
    pub fn add_directive(&mut self, directive: String) {
        push_unique(&mut self.directives, directive);
    }

    pub fn add_keyword(&mut self, keyword: &str) {
        push_unique(&mut self.keywords, keyword.to_string());
    }

    pub fn raise(&mut self, level: ImprovementLevel) {
        self.improvement_level = self.improvement_level.max(level);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryInstruction {
    pub original: Option<String>,
    pub directives: Vec<String>,
    pub keywords: Vec<String>,
    /// "label: evidence" lines the summary should lead with.
    pub differentiators: Vec<String>,
    pub tone: Tone,
    pub improvement_level: ImprovementLevel,
}

impl SummaryInstruction {
    pub fn needs_rewrite(&self) -> bool {
        self.improvement_level != ImprovementLevel::None
    }

    pub fn add_directive(&mut self, directive: String) {
        push_unique(&mut self.directives, directive);
    }

    pub fn raise(&mut self, level: ImprovementLevel) {
        self.improvement_level = self.improvement_level.max(level);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillsInstruction {
    pub reorder: bool,
    /// Full technical skills list in its new order; a permutation of the original.
    pub prioritized: Vec<String>,
    pub directives: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WhyFitInstruction {
    pub enabled: bool,
    /// Draft points built from analysis evidence; the model only polishes wording.
    pub points: Vec<WhyFitPoint>,
    pub tone: Tone,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformationInstructions {
    pub bullets: Vec<BulletInstruction>,
    pub summary: SummaryInstruction,
    pub skills: SkillsInstruction,
    pub why_fit: WhyFitInstruction,
    pub tone: Tone,
    /// Rules that contributed at least one directive, in evaluation order.
    pub applied_rules: Vec<RuleId>,
}

impl TransformationInstructions {
    pub fn bullet_mut(&mut self, bullet_id: &str) -> Option<&mut BulletInstruction> {
        self.bullets.iter_mut().find(|b| b.bullet_id == bullet_id)
    }

    pub fn bullets_to_rewrite(&self) -> impl Iterator<Item = &BulletInstruction> {
        self.bullets.iter().filter(|b| b.needs_rewrite())
    }
}

fn push_unique(list: &mut Vec<String>, item: String) {
    if !list.contains(&item) {
        list.push(item);
    }
}
