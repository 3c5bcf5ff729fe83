//! Rule Engine — pure, deterministic mapping from
//! (résumé, pre-analysis, job, rule set) to transformation instructions.
//!
//! Rules run in the order the `RuleSet` lists them. Each rule may only add
//! to an instruction: directives accumulate as a union and the improvement
//! level is the maximum any rule asked for. Only `Vec`s are used so output
//! order never depends on hashing.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::analysis::keywords::{variants_of, KeywordImportance, KeywordLocation};
use crate::analysis::text::{contains_term, tokens};
use crate::analysis::PreAnalysisResult;
use crate::models::{JobData, ResumeContent, WhyFitPoint};
use crate::tailoring::instructions::{
    BulletInstruction, ImprovementLevel, SkillsInstruction, SummaryInstruction,
    TransformationInstructions, WhyFitInstruction,
};
use crate::tailoring::tone::{detect_tone, get_tone_examples, Tone};

const MAX_KEYWORDS_PER_BULLET: usize = 2;
/// A bullet with this many flags set is rewritten wholesale.
const TRANSFORMED_FLAG_COUNT: usize = 3;
const SUMMARY_DIFFERENTIATORS: usize = 3;
const SUMMARY_KEYWORDS: usize = 4;
const WHY_FIT_POINTS: usize = 3;
/// Below this keyword coverage the summary needs a major realignment.
const LOW_COVERAGE: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleId {
    QuantifyImpact,
    StrengthenOpening,
    SurfaceMissingKeywords,
    ContextualizeSkills,
    HighlightSoftSkills,
    AlignSummary,
    SummaryDifferentiators,
    PrioritizeMatchingSkills,
    WhyFitBlock,
}

impl RuleId {
    /// Standard priority order.
    pub const ALL: [RuleId; 9] = [
        RuleId::QuantifyImpact,
        RuleId::StrengthenOpening,
        RuleId::SurfaceMissingKeywords,
        RuleId::ContextualizeSkills,
        RuleId::HighlightSoftSkills,
        RuleId::AlignSummary,
        RuleId::SummaryDifferentiators,
        RuleId::PrioritizeMatchingSkills,
        RuleId::WhyFitBlock,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RuleId::QuantifyImpact => "quantify_impact",
            RuleId::StrengthenOpening => "strengthen_opening",
            RuleId::SurfaceMissingKeywords => "surface_missing_keywords",
            RuleId::ContextualizeSkills => "contextualize_skills",
            RuleId::HighlightSoftSkills => "highlight_soft_skills",
            RuleId::AlignSummary => "align_summary",
            RuleId::SummaryDifferentiators => "summary_differentiators",
            RuleId::PrioritizeMatchingSkills => "prioritize_matching_skills",
            RuleId::WhyFitBlock => "why_fit_block",
        }
    }

    /// Applies this rule; returns whether it contributed anything.
    fn apply(self, ctx: &RuleContext<'_>, out: &mut TransformationInstructions) -> bool {
        match self {
            RuleId::QuantifyImpact => quantify_impact(ctx, out),
            RuleId::StrengthenOpening => strengthen_opening(ctx, out),
            RuleId::SurfaceMissingKeywords => surface_missing_keywords(ctx, out),
            RuleId::ContextualizeSkills => contextualize_skills(ctx, out),
            RuleId::HighlightSoftSkills => highlight_soft_skills(ctx, out),
            RuleId::AlignSummary => align_summary(ctx, out),
            RuleId::SummaryDifferentiators => summary_differentiators(ctx, out),
            RuleId::PrioritizeMatchingSkills => prioritize_matching_skills(ctx, out),
            RuleId::WhyFitBlock => why_fit_block(ctx, out),
        }
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Explicit, ordered rule configuration passed into the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSet {
    rules: Vec<RuleId>,
}

impl RuleSet {
    pub fn standard() -> Self {
        Self {
            rules: RuleId::ALL.to_vec(),
        }
    }

    /// A custom ordered set. Repeated ids keep their first position.
    pub fn new(rules: Vec<RuleId>) -> Self {
        let mut unique = Vec::with_capacity(rules.len());
        for rule in rules {
            if !unique.contains(&rule) {
                unique.push(rule);
            }
        }
        Self { rules: unique }
    }

    pub fn rules(&self) -> &[RuleId] {
        &self.rules
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::standard()
    }
}

struct RuleContext<'a> {
    resume: &'a ResumeContent,
    pre: &'a PreAnalysisResult,
    job: &'a JobData,
    tone: Tone,
    /// Lowercase job text, computed once.
    job_text: String,
}

impl RuleContext<'_> {
    fn experience_title(&self, experience_id: &str) -> &str {
        self.resume
            .experience
            .iter()
            .find(|e| e.id == experience_id)
            .map_or("", |e| e.title.as_str())
    }

    fn verb_hint(&self) -> String {
        get_tone_examples(self.tone)
            .strong_verbs
            .iter()
            .take(3)
            .copied()
            .collect::<Vec<_>>()
            .join(", ")
    }
}

pub fn generate_instructions(
    resume: &ResumeContent,
    pre: &PreAnalysisResult,
    job: &JobData,
    rules: &RuleSet,
) -> TransformationInstructions {
    let tone = detect_tone(job);
    let ctx = RuleContext {
        resume,
        pre,
        job,
        tone,
        job_text: job.searchable_text(),
    };

    let mut out = TransformationInstructions {
        bullets: resume
            .bullets()
            .map(|(exp, b)| BulletInstruction::untouched(&b.id, &exp.id, &b.text, tone))
            .collect(),
        summary: SummaryInstruction {
            original: resume.summary_text().map(str::to_string),
            tone,
            ..Default::default()
        },
        skills: SkillsInstruction {
            reorder: false,
            prioritized: resume.skills.technical.clone(),
            directives: Vec::new(),
        },
        why_fit: WhyFitInstruction {
            enabled: false,
            points: Vec::new(),
            tone,
        },
        tone,
        applied_rules: Vec::new(),
    };

    for rule in rules.rules() {
        if rule.apply(&ctx, &mut out) {
            out.applied_rules.push(*rule);
        }
    }

    for bullet in &mut out.bullets {
        if bullet.flags.count() >= TRANSFORMED_FLAG_COUNT {
            bullet.raise(ImprovementLevel::Transformed);
        }
    }

    debug!(
        "Rules applied: [{}]; {}/{} bullets flagged, summary={:?}, skills_reorder={}, why_fit={}",
        out.applied_rules
            .iter()
            .map(RuleId::as_str)
            .collect::<Vec<_>>()
            .join(", "),
        out.bullets_to_rewrite().count(),
        out.bullets.len(),
        out.summary.improvement_level,
        out.skills.reorder,
        out.why_fit.enabled
    );

    out
}

// ────────────────────────────────────────────────────────────────────────────
// Bullet rules
// ────────────────────────────────────────────────────────────────────────────

fn quantify_impact(ctx: &RuleContext<'_>, out: &mut TransformationInstructions) -> bool {
    let mut fired = false;
    for impact in ctx.pre.impact.bullets.iter().filter(|b| b.needs_metrics()) {
        let Some(bullet) = out.bullet_mut(&impact.bullet_id) else {
            continue;
        };
        // The weak-opening suggestion, when present, is always last.
        let metric_hints = impact
            .suggestions
            .len()
            .saturating_sub(usize::from(impact.weak_opening.is_some()));
        bullet.flags.add_metrics = true;
        for hint in impact.suggestions.iter().take(metric_hints) {
            bullet.add_directive(hint.clone());
        }
        bullet.raise(ImprovementLevel::Major);
        fired = true;
    }
    fired
}

fn strengthen_opening(ctx: &RuleContext<'_>, out: &mut TransformationInstructions) -> bool {
    let verbs = ctx.verb_hint();
    let mut fired = false;
    for impact in &ctx.pre.impact.bullets {
        let Some(opening) = &impact.weak_opening else {
            continue;
        };
        let Some(bullet) = out.bullet_mut(&impact.bullet_id) else {
            continue;
        };
        bullet.add_directive(format!(
            "Replace the opening '{opening}' with a strong action verb (e.g. {verbs})."
        ));
        bullet.raise(ImprovementLevel::Minor);
        fired = true;
    }
    fired
}

fn surface_missing_keywords(ctx: &RuleContext<'_>, out: &mut TransformationInstructions) -> bool {
    let mut fired = false;
    for coverage in ctx.pre.context.missing() {
        let Some(idx) = pick_bullet(ctx, &out.bullets, &coverage.keyword) else {
            continue;
        };
        let bullet = &mut out.bullets[idx];
        bullet.flags.add_keywords = true;
        bullet.add_keyword(&coverage.keyword);
        bullet.add_directive(format!(
            "Surface '{}' only where it truthfully describes this work.",
            coverage.keyword
        ));
        let level = if bullet.keywords.len() >= MAX_KEYWORDS_PER_BULLET {
            ImprovementLevel::Major
        } else {
            ImprovementLevel::Minor
        };
        bullet.raise(level);
        fired = true;
    }
    fired
}

fn contextualize_skills(ctx: &RuleContext<'_>, out: &mut TransformationInstructions) -> bool {
    let mut fired = false;
    for coverage in ctx.pre.context.skills_only() {
        let Some(idx) = pick_bullet(ctx, &out.bullets, &coverage.keyword) else {
            continue;
        };
        let bullet = &mut out.bullets[idx];
        bullet.flags.add_context = true;
        bullet.add_keyword(&coverage.keyword);
        bullet.add_directive(format!(
            "Show how '{}' (listed under skills) was applied in this work.",
            coverage.keyword
        ));
        bullet.raise(ImprovementLevel::Minor);
        fired = true;
    }
    fired
}

fn highlight_soft_skills(ctx: &RuleContext<'_>, out: &mut TransformationInstructions) -> bool {
    let mut fired = false;
    for skill in &ctx.pre.soft_skills.demanded {
        // Only bullets that already evidence the skill may highlight it.
        let Some(bullet_id) = ctx
            .pre
            .soft_skills
            .evidence_for(skill)
            .and_then(|e| e.bullet_id.as_deref())
        else {
            continue;
        };
        let Some(bullet) = out.bullet_mut(bullet_id) else {
            continue;
        };
        bullet.flags.highlight_soft_skills = true;
        if !bullet.soft_skills.contains(skill) {
            bullet.soft_skills.push(skill.clone());
        }
        bullet.add_directive(format!(
            "Make the {} shown here explicit without overstating it.",
            skill.to_lowercase()
        ));
        bullet.raise(ImprovementLevel::Minor);
        fired = true;
    }
    fired
}

/// Chooses the bullet most related to `keyword` that still has keyword capacity.
///
/// Relatedness counts keyword tokens (synonyms included) appearing in the
/// bullet or its role title. Ties go to the bullet with fewer assigned
/// keywords, then to document order, so unrelated keywords land on the most
/// recent role first.
fn pick_bullet(
    ctx: &RuleContext<'_>,
    bullets: &[BulletInstruction],
    keyword: &str,
) -> Option<usize> {
    let keyword_tokens: Vec<String> = variants_of(keyword)
        .iter()
        .flat_map(|v| tokens(v))
        .collect();

    bullets
        .iter()
        .enumerate()
        .filter(|(_, b)| b.keywords.len() < MAX_KEYWORDS_PER_BULLET)
        .map(|(idx, b)| {
            let text = format!(
                "{}\n{}",
                b.original_text,
                ctx.experience_title(&b.experience_id)
            )
            .to_lowercase();
            let score = keyword_tokens
                .iter()
                .filter(|t| contains_term(&text, t))
                .count();
            (idx, score, b.keywords.len())
        })
        .max_by(|a, b| {
            a.1.cmp(&b.1)
                .then_with(|| b.2.cmp(&a.2))
                .then_with(|| b.0.cmp(&a.0))
        })
        .map(|(idx, _, _)| idx)
}

// ────────────────────────────────────────────────────────────────────────────
// Summary, skills and why-fit rules
// ────────────────────────────────────────────────────────────────────────────

fn align_summary(ctx: &RuleContext<'_>, out: &mut TransformationInstructions) -> bool {
    if out.summary.original.is_none() {
        return false;
    }

    let target = match (ctx.job.title.trim(), ctx.job.company_name.trim()) {
        ("", _) => "the target role".to_string(),
        (title, "") => format!("the {title} role"),
        (title, company) => format!("the {title} role at {company}"),
    };
    let demonstrated: Vec<String> = ctx
        .pre
        .context
        .keywords
        .iter()
        .filter(|k| k.found && k.importance == KeywordImportance::Required)
        .take(SUMMARY_KEYWORDS)
        .map(|k| k.keyword.clone())
        .collect();

    let summary = &mut out.summary;
    summary.add_directive(format!("Align the summary with {target}."));
    if !demonstrated.is_empty() {
        summary.add_directive(format!(
            "Reference demonstrated strengths that match the role: {}.",
            demonstrated.join(", ")
        ));
        for keyword in demonstrated {
            if !summary.keywords.contains(&keyword) {
                summary.keywords.push(keyword);
            }
        }
    }
    summary.raise(if ctx.pre.context.coverage_ratio < LOW_COVERAGE {
        ImprovementLevel::Major
    } else {
        ImprovementLevel::Minor
    });
    true
}

fn summary_differentiators(ctx: &RuleContext<'_>, out: &mut TransformationInstructions) -> bool {
    let top = ctx.pre.uniqueness.top(SUMMARY_DIFFERENTIATORS);
    if top.is_empty() {
        return false;
    }

    let summary = &mut out.summary;
    for d in top {
        let line = format!("{}: {}", d.label, d.evidence);
        if !summary.differentiators.contains(&line) {
            summary.differentiators.push(line);
        }
    }
    if summary.original.is_some() {
        summary.add_directive("Lead with the strongest differentiators listed.".to_string());
        summary.raise(ImprovementLevel::Minor);
    } else {
        summary.add_directive(
            "Write a two to three sentence summary built only from the differentiators listed."
                .to_string(),
        );
        summary.raise(ImprovementLevel::Major);
    }
    true
}

fn prioritize_matching_skills(ctx: &RuleContext<'_>, out: &mut TransformationInstructions) -> bool {
    let technical = &ctx.resume.skills.technical;
    let (mut reordered, rest): (Vec<String>, Vec<String>) = technical
        .iter()
        .cloned()
        .partition(|skill| {
            variants_of(skill)
                .iter()
                .any(|v| contains_term(&ctx.job_text, v))
        });
    if reordered.is_empty() {
        return false;
    }
    let leading = reordered.join(", ");
    reordered.extend(rest);
    if &reordered == technical {
        return false;
    }

    out.skills = SkillsInstruction {
        reorder: true,
        prioritized: reordered,
        directives: vec![format!("Lead with job-relevant skills: {leading}.")],
    };
    true
}

fn why_fit_block(ctx: &RuleContext<'_>, out: &mut TransformationInstructions) -> bool {
    let mut points: Vec<WhyFitPoint> = ctx
        .pre
        .uniqueness
        .top(WHY_FIT_POINTS)
        .iter()
        .map(|d| WhyFitPoint {
            label: d.label.clone(),
            text: d.evidence.clone(),
        })
        .collect();

    let evidenced = ctx.pre.context.keywords.iter().filter(|k| {
        k.found
            && k.importance == KeywordImportance::Required
            && k.location == Some(KeywordLocation::Experience)
    });
    for keyword in evidenced {
        if points.len() >= WHY_FIT_POINTS {
            break;
        }
        points.push(WhyFitPoint {
            label: format!("Hands-on {}", keyword.keyword),
            text: format!("Applied {} in professional experience.", keyword.keyword),
        });
    }

    if points.is_empty() {
        return false;
    }
    out.why_fit = WhyFitInstruction {
        enabled: true,
        points,
        tone: ctx.tone,
    };
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::impact::analyze_impact;
    use crate::analysis::keywords::analyze_context;
    use crate::analysis::soft_skills::analyze_soft_skills;
    use crate::analysis::uniqueness::analyze_uniqueness;
    use crate::models::{Bullet, Experience, Skills};

    fn pre_analysis(resume: &ResumeContent, job: &JobData) -> PreAnalysisResult {
        PreAnalysisResult {
            impact: analyze_impact(resume),
            uniqueness: analyze_uniqueness(resume, job),
            context: analyze_context(resume, job),
            soft_skills: analyze_soft_skills(resume, job),
            tokens_used: 0,
        }
    }

    fn resume_with(bullets: &[&str]) -> ResumeContent {
        ResumeContent {
            experience: vec![Experience {
                id: "e1".into(),
                company: "Acme".into(),
                title: "Software Engineer".into(),
                bullets: bullets
                    .iter()
                    .enumerate()
                    .map(|(i, t)| Bullet {
                        id: format!("b{}", i + 1),
                        text: t.to_string(),
                        is_modified: false,
                    })
                    .collect(),
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    fn backend_job() -> JobData {
        JobData {
            title: "Backend Engineer".into(),
            company_name: "Globex".into(),
            description: "Build reliable backend services.".into(),
            requirements: vec!["scalability".into(), "Node.js".into()],
            skills: vec![],
        }
    }

    fn run(resume: &ResumeContent, job: &JobData, rules: &RuleSet) -> TransformationInstructions {
        generate_instructions(resume, &pre_analysis(resume, job), job, rules)
    }

    #[test]
    fn test_same_inputs_produce_identical_output() {
        let resume = ResumeContent {
            summary: Some("Backend engineer.".into()),
            skills: Skills {
                technical: vec!["Python".into(), "Node.js".into()],
                ..Default::default()
            },
            ..resume_with(&[
                "Worked on backend features",
                "Led migration to Kubernetes, cutting deploy time by 40%",
                "Collaborated with product on onboarding",
            ])
        };
        let job = backend_job();
        let pre = pre_analysis(&resume, &job);

        let a = generate_instructions(&resume, &pre, &job, &RuleSet::standard());
        let b = generate_instructions(&resume, &pre, &job, &RuleSet::standard());
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }

    #[test]
    fn test_missing_keywords_flag_scenario_bullet() {
        let resume = resume_with(&["Worked on backend features"]);
        let out = run(
            &resume,
            &backend_job(),
            &RuleSet::new(vec![RuleId::SurfaceMissingKeywords]),
        );

        let b1 = &out.bullets[0];
        assert!(b1.flags.add_keywords);
        assert_eq!(b1.flags.count(), 1);
        assert_eq!(b1.keywords, vec!["scalability", "Node.js"]);
        assert_eq!(b1.improvement_level, ImprovementLevel::Major);
        assert_eq!(out.applied_rules, vec![RuleId::SurfaceMissingKeywords]);
    }

    #[test]
    fn test_later_rules_augment_earlier_directives() {
        let resume = resume_with(&["Worked on backend features"]);
        let out = run(&resume, &backend_job(), &RuleSet::standard());

        let b1 = &out.bullets[0];
        assert!(b1.flags.add_metrics);
        assert!(b1.flags.add_keywords);
        assert!(b1.directives.iter().any(|d| d.starts_with("Quantify 'worked on'")));
        assert!(b1
            .directives
            .iter()
            .any(|d| d.starts_with("Replace the opening 'worked on'")));
        assert!(b1.directives.iter().any(|d| d.contains("Node.js")));
        assert_eq!(b1.improvement_level, ImprovementLevel::Major);
        assert_eq!(
            &out.applied_rules[..3],
            &[
                RuleId::QuantifyImpact,
                RuleId::StrengthenOpening,
                RuleId::SurfaceMissingKeywords
            ]
        );
    }

    #[test]
    fn test_three_flags_promote_to_transformed() {
        let resume = resume_with(&["Collaborated with design on onboarding flows"]);
        let job = JobData {
            title: "Frontend Engineer".into(),
            description: "Strong collaboration skills".into(),
            requirements: vec!["Node.js".into()],
            ..Default::default()
        };
        let out = run(&resume, &job, &RuleSet::standard());

        let b1 = &out.bullets[0];
        assert!(b1.flags.add_metrics);
        assert!(b1.flags.add_keywords);
        assert!(b1.flags.highlight_soft_skills);
        assert_eq!(b1.soft_skills, vec!["Collaboration"]);
        assert_eq!(b1.improvement_level, ImprovementLevel::Transformed);
    }

    #[test]
    fn test_zero_bullets_yield_empty_bullet_list() {
        let out = run(&ResumeContent::default(), &backend_job(), &RuleSet::standard());
        assert!(out.bullets.is_empty());
        assert!(!out.summary.needs_rewrite());
    }

    #[test]
    fn test_job_without_keywords_fires_no_keyword_rules() {
        let resume = resume_with(&["Cut cloud spend by 30% with spot instances"]);
        let job = JobData {
            title: "Engineer".into(),
            description: "Join us.".into(),
            ..Default::default()
        };
        let out = run(&resume, &job, &RuleSet::standard());
        assert!(!out.applied_rules.contains(&RuleId::SurfaceMissingKeywords));
        assert!(!out.applied_rules.contains(&RuleId::ContextualizeSkills));
        assert!(out.bullets.iter().all(|b| !b.flags.add_keywords));
    }

    #[test]
    fn test_strong_bullets_stay_untouched() {
        let resume = resume_with(&["Cut cloud spend by 30% with spot instances"]);
        let out = run(&resume, &backend_job(), &RuleSet::new(vec![RuleId::QuantifyImpact]));
        assert!(!out.bullets[0].needs_rewrite());
        assert!(out.applied_rules.is_empty());
    }

    #[test]
    fn test_keywords_are_capped_per_bullet_and_spread() {
        let resume = resume_with(&["Worked on backend features", "Wrote internal tooling"]);
        let job = JobData {
            requirements: vec!["scalability".into(), "Node.js".into(), "GraphQL".into()],
            ..Default::default()
        };
        let out = run(
            &resume,
            &job,
            &RuleSet::new(vec![RuleId::SurfaceMissingKeywords]),
        );
        assert!(out.bullets.iter().all(|b| b.keywords.len() <= MAX_KEYWORDS_PER_BULLET));
        let assigned: usize = out.bullets.iter().map(|b| b.keywords.len()).sum();
        assert_eq!(assigned, 3);
    }

    #[test]
    fn test_related_bullet_receives_keyword() {
        let resume = resume_with(&["Wrote release notes", "Tuned the Postgres query planner"]);
        let job = JobData {
            skills: vec!["query optimization".into()],
            ..Default::default()
        };
        let out = run(
            &resume,
            &job,
            &RuleSet::new(vec![RuleId::SurfaceMissingKeywords]),
        );
        assert_eq!(out.bullets[1].keywords, vec!["query optimization"]);
        assert!(out.bullets[0].keywords.is_empty());
    }

    #[test]
    fn test_skills_reorder_is_a_permutation() {
        let resume = ResumeContent {
            skills: Skills {
                technical: vec!["Python".into(), "Go".into(), "Rust".into()],
                ..Default::default()
            },
            ..resume_with(&["Built services"])
        };
        let job = JobData {
            skills: vec!["Rust".into()],
            ..Default::default()
        };
        let out = run(
            &resume,
            &job,
            &RuleSet::new(vec![RuleId::PrioritizeMatchingSkills]),
        );
        assert!(out.skills.reorder);
        assert_eq!(out.skills.prioritized, vec!["Rust", "Python", "Go"]);

        let mut sorted = out.skills.prioritized.clone();
        sorted.sort();
        let mut original = resume.skills.technical.clone();
        original.sort();
        assert_eq!(sorted, original);
    }

    #[test]
    fn test_summary_without_original_or_differentiators_is_skipped() {
        let resume = resume_with(&["Wrote documentation"]);
        let out = run(&resume, &backend_job(), &RuleSet::standard());
        assert!(!out.summary.needs_rewrite());
        assert!(!out.applied_rules.contains(&RuleId::AlignSummary));
    }

    #[test]
    fn test_differentiators_seed_summary_and_why_fit() {
        let resume = resume_with(&["Cut Node.js API latency by 45%"]);
        let job = JobData {
            title: "Backend Engineer".into(),
            skills: vec!["Node.js".into()],
            ..Default::default()
        };
        let out = run(&resume, &job, &RuleSet::standard());

        assert_eq!(out.summary.improvement_level, ImprovementLevel::Major);
        assert_eq!(out.summary.differentiators.len(), 1);
        assert!(out.why_fit.enabled);
        assert_eq!(out.why_fit.points[0].label, "Measurable impact at Acme");
        assert_eq!(out.why_fit.points[1].label, "Hands-on Node.js");
    }

    #[test]
    fn test_rule_set_deduplicates() {
        let set = RuleSet::new(vec![
            RuleId::WhyFitBlock,
            RuleId::QuantifyImpact,
            RuleId::WhyFitBlock,
        ]);
        assert_eq!(set.rules(), &[RuleId::WhyFitBlock, RuleId::QuantifyImpact]);
        assert_eq!(RuleSet::default().rules().len(), 9);
    }
}
