//! Generative Rewriter — applies transformation instructions through
//! batched, constrained completion calls and diffs the result.
//!
//! At most three round-trips per run: one for every flagged bullet, one for
//! the summary, one for the why-fit block. Bullets not flagged for change
//! never reach the model and come back byte-identical.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, warn};

use crate::errors::TailorError;
use crate::llm_client::json_repair::parse_model_json;
use crate::llm_client::prompts::{GROUNDING_INSTRUCTION, SCOPE_INSTRUCTION};
use crate::llm_client::retry::{with_retry, RetryPolicy};
use crate::llm_client::{estimate_tokens, CompletionOptions, CompletionService};
use crate::models::{JobData, ResumeContent, WhyFitPoint};
use crate::tailoring::instructions::{
    BulletInstruction, ChangeType, SummaryInstruction, TransformationInstructions,
    WhyFitInstruction,
};
use crate::tailoring::prompts::{
    BULLETS_PROMPT_TEMPLATE, BULLETS_SYSTEM, SUMMARY_PROMPT_TEMPLATE, SUMMARY_SYSTEM,
    WHY_FIT_PROMPT_TEMPLATE, WHY_FIT_SYSTEM,
};

const BULLETS_MAX_TOKENS: u32 = 2048;
const BULLETS_TEMPERATURE: f32 = 0.3;
const SUMMARY_MAX_TOKENS: u32 = 512;
const SUMMARY_TEMPERATURE: f32 = 0.4;
const WHY_FIT_MAX_TOKENS: u32 = 768;
const WHY_FIT_TEMPERATURE: f32 = 0.4;

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

/// Estimated model usage for one or more calls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallUsage {
    pub calls: u32,
    pub tokens: u32,
}

impl CallUsage {
    pub fn add(self, other: CallUsage) -> CallUsage {
        CallUsage {
            calls: self.calls + other.calls,
            tokens: self.tokens + other.tokens,
        }
    }
}

/// A rewrite result together with what it cost.
#[derive(Debug, Clone, PartialEq)]
pub struct Rewritten<T> {
    pub value: T,
    pub usage: CallUsage,
}

impl<T> Rewritten<T> {
    fn free(value: T) -> Self {
        Self {
            value,
            usage: CallUsage::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulletDiff {
    pub bullet_id: String,
    pub experience_id: String,
    pub before: String,
    pub after: String,
    pub change_type: ChangeType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryDiff {
    pub before: Option<String>,
    pub after: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TailoringChanges {
    pub summary: Option<SummaryDiff>,
    pub bullet_diffs: Vec<BulletDiff>,
    pub skills_reordered: bool,
    pub why_fit_added: bool,
}

#[derive(Debug, Clone)]
pub struct RewriteOutcome {
    pub tailored: ResumeContent,
    pub changes: TailoringChanges,
    pub usage: CallUsage,
}

#[derive(Debug, Deserialize)]
struct BulletsResponse {
    #[serde(default)]
    bullets: Vec<RewrittenBullet>,
}

#[derive(Debug, Deserialize)]
struct RewrittenBullet {
    id: String,
    #[serde(default)]
    rewritten: String,
}

#[derive(Debug, Deserialize)]
struct SummaryResponse {
    #[serde(default)]
    summary: String,
}

#[derive(Debug, Deserialize)]
struct WhyFitResponse {
    #[serde(default)]
    points: Vec<PolishedPoint>,
}

#[derive(Debug, Deserialize)]
struct PolishedPoint {
    #[serde(default)]
    label: String,
    #[serde(default)]
    text: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Rewriter
// ────────────────────────────────────────────────────────────────────────────

pub struct Rewriter {
    llm: Arc<dyn CompletionService>,
    retry: RetryPolicy,
}

impl Rewriter {
    pub fn new(llm: Arc<dyn CompletionService>, retry: RetryPolicy) -> Self {
        Self { llm, retry }
    }

    /// Rewrites every flagged bullet in one call.
    ///
    /// The returned map holds an entry for every instruction: the rewrite when
    /// the model returned a usable one, the original text otherwise.
    pub async fn rewrite_bullets(
        &self,
        instructions: &[BulletInstruction],
        job: &JobData,
    ) -> Result<Rewritten<BTreeMap<String, String>>, TailorError> {
        let mut texts: BTreeMap<String, String> = instructions
            .iter()
            .map(|i| (i.bullet_id.clone(), i.original_text.clone()))
            .collect();

        let pending: Vec<&BulletInstruction> =
            instructions.iter().filter(|i| i.needs_rewrite()).collect();
        let Some(first) = pending.first() else {
            return Ok(Rewritten::free(texts));
        };

        let bullets_json = json!(pending
            .iter()
            .map(|i| json!({
                "id": i.bullet_id,
                "original": i.original_text,
                "directives": i.directives,
                "keywords": i.keywords,
                "softSkills": i.soft_skills,
                "improvementLevel": i.improvement_level,
            }))
            .collect::<Vec<_>>());
        let prompt = BULLETS_PROMPT_TEMPLATE
            .replace("{grounding_instruction}", GROUNDING_INSTRUCTION)
            .replace("{scope_instruction}", SCOPE_INSTRUCTION)
            .replace("{tone_guidance}", &first.tone.guidance())
            .replace("{job_summary}", &job_summary(job))
            .replace("{bullets_json}", &format!("{bullets_json:#}"));

        let options = CompletionOptions::default()
            .with_max_tokens(BULLETS_MAX_TOKENS)
            .with_temperature(BULLETS_TEMPERATURE);
        let (response, usage): (BulletsResponse, _) =
            self.complete_json(BULLETS_SYSTEM, &prompt, &options).await?;

        let mut applied = 0usize;
        for rewrite in response.bullets {
            if !pending.iter().any(|p| p.bullet_id == rewrite.id) {
                warn!("Model returned unrequested bullet id '{}', ignored", rewrite.id);
                continue;
            }
            let text = rewrite.rewritten.trim();
            if text.is_empty() {
                warn!("Model returned an empty rewrite for bullet '{}', keeping original", rewrite.id);
                continue;
            }
            texts.insert(rewrite.id, text.to_string());
            applied += 1;
        }
        if applied < pending.len() {
            warn!(
                "Model rewrote {}/{} requested bullets; the rest keep their original text",
                applied,
                pending.len()
            );
        }

        Ok(Rewritten {
            value: texts,
            usage,
        })
    }

    /// Rewrites the summary. Skipped (original or empty text returned, no call
    /// made) when the instruction asks for nothing or there is nothing to build on.
    pub async fn rewrite_summary(
        &self,
        instruction: &SummaryInstruction,
        job: &JobData,
    ) -> Result<Rewritten<String>, TailorError> {
        let original = instruction.original.clone().unwrap_or_default();
        if !instruction.needs_rewrite()
            || (instruction.original.is_none() && instruction.differentiators.is_empty())
        {
            return Ok(Rewritten::free(original));
        }

        let prompt = SUMMARY_PROMPT_TEMPLATE
            .replace("{grounding_instruction}", GROUNDING_INSTRUCTION)
            .replace("{tone_guidance}", &instruction.tone.guidance())
            .replace("{job_summary}", &job_summary(job))
            .replace(
                "{original_summary}",
                instruction.original.as_deref().unwrap_or("(none)"),
            )
            .replace("{directives}", &bullet_list(&instruction.directives))
            .replace("{keywords}", &instruction.keywords.join(", "))
            .replace("{differentiators}", &bullet_list(&instruction.differentiators));

        let options = CompletionOptions::default()
            .with_max_tokens(SUMMARY_MAX_TOKENS)
            .with_temperature(SUMMARY_TEMPERATURE);
        let (response, usage): (SummaryResponse, _) =
            self.complete_json(SUMMARY_SYSTEM, &prompt, &options).await?;

        let summary = response.summary.trim();
        let value = if summary.is_empty() {
            warn!("Model returned an empty summary, keeping original");
            original
        } else {
            summary.to_string()
        };
        Ok(Rewritten { value, usage })
    }

    /// Polishes the drafted why-fit points. Points the model drops or blanks
    /// keep their draft wording; extra points are discarded.
    pub async fn polish_why_fit(
        &self,
        instruction: &WhyFitInstruction,
        job: &JobData,
    ) -> Result<Rewritten<Vec<WhyFitPoint>>, TailorError> {
        if !instruction.enabled || instruction.points.is_empty() {
            return Ok(Rewritten::free(Vec::new()));
        }

        let points_json = json!(instruction.points);
        let prompt = WHY_FIT_PROMPT_TEMPLATE
            .replace("{grounding_instruction}", GROUNDING_INSTRUCTION)
            .replace("{tone_guidance}", &instruction.tone.guidance())
            .replace("{job_summary}", &job_summary(job))
            .replace("{points_json}", &format!("{points_json:#}"));

        let options = CompletionOptions::default()
            .with_max_tokens(WHY_FIT_MAX_TOKENS)
            .with_temperature(WHY_FIT_TEMPERATURE);
        let (response, usage): (WhyFitResponse, _) =
            self.complete_json(WHY_FIT_SYSTEM, &prompt, &options).await?;

        let mut polished = response.points.into_iter();
        let points = instruction
            .points
            .iter()
            .map(|draft| match polished.next() {
                Some(p) if !p.text.trim().is_empty() => WhyFitPoint {
                    label: non_empty_or(p.label.trim(), &draft.label),
                    text: p.text.trim().to_string(),
                },
                _ => draft.clone(),
            })
            .collect();

        Ok(Rewritten {
            value: points,
            usage,
        })
    }

    /// Runs the three rewrites concurrently and assembles the tailored résumé.
    ///
    /// Only bullet `text`/`isModified`, the summary, technical-skill order and
    /// the why-fit block may change; entries are never added, removed or moved.
    pub async fn apply_transformations(
        &self,
        resume: &ResumeContent,
        instructions: &TransformationInstructions,
        job: &JobData,
    ) -> Result<RewriteOutcome, TailorError> {
        let (bullets, summary, why_fit) = tokio::try_join!(
            self.rewrite_bullets(&instructions.bullets, job),
            self.rewrite_summary(&instructions.summary, job),
            self.polish_why_fit(&instructions.why_fit, job),
        )?;

        let mut tailored = resume.clone();
        let mut changes = TailoringChanges::default();

        for exp in &mut tailored.experience {
            for bullet in &mut exp.bullets {
                let Some(after) = bullets.value.get(&bullet.id) else {
                    continue;
                };
                if *after == bullet.text {
                    continue;
                }
                let change_type = instructions
                    .bullets
                    .iter()
                    .find(|i| i.bullet_id == bullet.id)
                    .map_or(ChangeType::Context, |i| ChangeType::from_flags(&i.flags));
                changes.bullet_diffs.push(BulletDiff {
                    bullet_id: bullet.id.clone(),
                    experience_id: exp.id.clone(),
                    before: bullet.text.clone(),
                    after: after.clone(),
                    change_type,
                });
                bullet.text = after.clone();
                bullet.is_modified = true;
            }
        }

        let after = summary.value.trim();
        if instructions.summary.needs_rewrite()
            && !after.is_empty()
            && Some(after) != resume.summary_text()
        {
            changes.summary = Some(SummaryDiff {
                before: resume.summary.clone(),
                after: after.to_string(),
            });
            tailored.summary = Some(after.to_string());
        }

        let skills = &instructions.skills;
        if skills.reorder
            && skills.prioritized != resume.skills.technical
            && is_permutation(&skills.prioritized, &resume.skills.technical)
        {
            tailored.skills.technical = skills.prioritized.clone();
            changes.skills_reordered = true;
        }

        if !why_fit.value.is_empty() {
            tailored.why_fit = Some(why_fit.value);
            changes.why_fit_added = true;
        }

        let usage = bullets.usage.add(summary.usage).add(why_fit.usage);
        debug!(
            "Rewriting complete: {} bullet diffs, summary_changed={}, skills_reordered={}, why_fit={}, calls={}, ~{} tokens",
            changes.bullet_diffs.len(),
            changes.summary.is_some(),
            changes.skills_reordered,
            changes.why_fit_added,
            usage.calls,
            usage.tokens
        );

        Ok(RewriteOutcome {
            tailored,
            changes,
            usage,
        })
    }

    /// One resilient completion call whose output is parsed as JSON.
    async fn complete_json<T: DeserializeOwned>(
        &self,
        system: &str,
        user: &str,
        options: &CompletionOptions,
    ) -> Result<(T, CallUsage), TailorError> {
        let raw = with_retry(&self.retry, || self.llm.complete(system, user, options)).await?;
        let usage = CallUsage {
            calls: 1,
            tokens: estimate_tokens(system) + estimate_tokens(user) + estimate_tokens(&raw),
        };
        debug!(
            "Completion: prompt {} chars, response {} chars, ~{} tokens",
            user.len(),
            raw.len(),
            usage.tokens
        );
        let parsed = parse_model_json(&raw)?;
        Ok((parsed, usage))
    }
}

fn job_summary(job: &JobData) -> String {
    let mut summary = match job.company_name.trim() {
        "" => job.title.clone(),
        company => format!("{} at {}", job.title, company),
    };
    if !job.requirements.is_empty() {
        summary.push_str("\nKey requirements: ");
        summary.push_str(
            &job.requirements
                .iter()
                .take(5)
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join("; "),
        );
    }
    summary
}

fn bullet_list(items: &[String]) -> String {
    if items.is_empty() {
        return "- (none)".to_string();
    }
    items
        .iter()
        .map(|i| format!("- {i}"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn non_empty_or(value: &str, fallback: &str) -> String {
    if value.is_empty() {
        fallback.to_string()
    } else {
        value.to_string()
    }
}

fn is_permutation(a: &[String], b: &[String]) -> bool {
    let mut a = a.to_vec();
    let mut b = b.to_vec();
    a.sort();
    b.sort();
    a == b
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::impact::analyze_impact;
    use crate::analysis::keywords::analyze_context;
    use crate::analysis::soft_skills::analyze_soft_skills;
    use crate::analysis::uniqueness::analyze_uniqueness;
    use crate::analysis::PreAnalysisResult;
    use crate::llm_client::mock::MockCompletion;
    use crate::models::{Bullet, Experience, Skills};
    use crate::tailoring::instructions::{ImprovementLevel, SkillsInstruction};
    use crate::tailoring::rules::{generate_instructions, RuleId, RuleSet};
    use crate::tailoring::tone::Tone;

    const BULLETS_MARKER: &str = "BULLETS TO REWRITE";
    const SUMMARY_MARKER: &str = "SUMMARY INSTRUCTION";
    const WHY_FIT_MARKER: &str = "WHY-FIT POINTS";

    fn rewriter(mock: Arc<MockCompletion>) -> Rewriter {
        Rewriter::new(mock, RetryPolicy::default())
    }

    fn flagged(id: &str, text: &str) -> BulletInstruction {
        let mut i = BulletInstruction::untouched(id, "e1", text, Tone::default());
        i.flags.add_metrics = true;
        i.add_directive("Add a measurable outcome.".into());
        i.raise(ImprovementLevel::Major);
        i
    }

    fn job() -> JobData {
        JobData {
            title: "Backend Engineer".into(),
            company_name: "Globex".into(),
            description: "Build reliable backend services.".into(),
            requirements: vec!["scalability".into(), "Node.js".into()],
            skills: vec![],
        }
    }

    fn resume(bullets: &[&str]) -> ResumeContent {
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

    fn pre_analysis(resume: &ResumeContent, job: &JobData) -> PreAnalysisResult {
        PreAnalysisResult {
            impact: analyze_impact(resume),
            uniqueness: analyze_uniqueness(resume, job),
            context: analyze_context(resume, job),
            soft_skills: analyze_soft_skills(resume, job),
            tokens_used: 0,
        }
    }

    #[tokio::test]
    async fn test_scenario_keyword_rewrite_is_applied_and_classified() {
        let resume = resume(&["Worked on backend features"]);
        let job = job();
        let instructions = generate_instructions(
            &resume,
            &pre_analysis(&resume, &job),
            &job,
            &RuleSet::new(vec![RuleId::SurfaceMissingKeywords]),
        );
        let mock = Arc::new(MockCompletion::new().on(
            BULLETS_MARKER,
            r#"{"bullets":[{"id":"b1","rewritten":"Built scalable Node.js backend services"}]}"#,
        ));

        let outcome = rewriter(mock.clone())
            .apply_transformations(&resume, &instructions, &job)
            .await
            .unwrap();

        let bullet = &outcome.tailored.experience[0].bullets[0];
        assert_eq!(bullet.text, "Built scalable Node.js backend services");
        assert!(bullet.is_modified);
        assert_eq!(outcome.changes.bullet_diffs.len(), 1);
        assert_eq!(outcome.changes.bullet_diffs[0].change_type, ChangeType::Keywords);
        let json = serde_json::to_value(&outcome.changes).unwrap();
        assert_eq!(json["bulletDiffs"][0]["changeType"], "keywords");
        assert_eq!(mock.call_count(), 1);
        assert_eq!(outcome.usage.calls, 1);
        assert!(outcome.usage.tokens > 0);
    }

    #[tokio::test]
    async fn test_untouched_bullets_are_never_sent_and_stay_identical() {
        let resume = resume(&["Cut p99 latency by 40%", "Worked on backend features"]);
        let instructions = TransformationInstructions {
            bullets: vec![
                BulletInstruction::untouched("b1", "e1", "Cut p99 latency by 40%", Tone::default()),
                flagged("b2", "Worked on backend features"),
            ],
            ..Default::default()
        };
        // The model also tries to rewrite the untouched bullet.
        let mock = Arc::new(MockCompletion::new().on(
            BULLETS_MARKER,
            r#"{"bullets":[
                {"id":"b1","rewritten":"Slashed latency dramatically"},
                {"id":"b2","rewritten":"Built backend features serving 2M users"}
            ]}"#,
        ));

        let outcome = rewriter(mock.clone())
            .apply_transformations(&resume, &instructions, &job())
            .await
            .unwrap();

        let bullets = &outcome.tailored.experience[0].bullets;
        assert_eq!(bullets[0], resume.experience[0].bullets[0]);
        assert_eq!(bullets[1].text, "Built backend features serving 2M users");
        assert_eq!(outcome.changes.bullet_diffs.len(), 1);

        let calls = mock.calls();
        assert_eq!(calls.len(), 1);
        assert!(!calls[0].user.contains("Cut p99 latency"));
        assert_eq!(calls[0].max_tokens, BULLETS_MAX_TOKENS);
    }

    #[tokio::test]
    async fn test_missing_ids_fall_back_to_original_text() {
        let instructions = vec![
            flagged("b1", "Worked on billing"),
            flagged("b2", "Helped with search"),
            flagged("b3", "Responsible for deploys"),
        ];
        let mock = Arc::new(MockCompletion::new().on(
            BULLETS_MARKER,
            r#"```json
            {"bullets":[{"id":"b1","rewritten":"Rebuilt billing"},{"id":"b2","rewritten":"   "},]}
            ```"#,
        ));

        let result = rewriter(mock)
            .rewrite_bullets(&instructions, &job())
            .await
            .unwrap();

        assert_eq!(result.value["b1"], "Rebuilt billing");
        assert_eq!(result.value["b2"], "Helped with search");
        assert_eq!(result.value["b3"], "Responsible for deploys");
    }

    #[tokio::test]
    async fn test_nothing_flagged_makes_no_call() {
        let instructions = vec![BulletInstruction::untouched("b1", "e1", "Shipped v2", Tone::default())];
        let mock = Arc::new(MockCompletion::new());
        let result = rewriter(mock.clone())
            .rewrite_bullets(&instructions, &job())
            .await
            .unwrap();
        assert_eq!(result.value["b1"], "Shipped v2");
        assert_eq!(result.usage, CallUsage::default());
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn test_summary_skipped_without_original_or_differentiators() {
        let instruction = SummaryInstruction {
            improvement_level: ImprovementLevel::Major,
            ..Default::default()
        };
        let mock = Arc::new(MockCompletion::new());
        let result = rewriter(mock.clone())
            .rewrite_summary(&instruction, &job())
            .await
            .unwrap();
        assert_eq!(result.value, "");
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn test_summary_rewrite_is_diffed() {
        let mut resume = resume(&["Shipped v2"]);
        resume.summary = Some("Engineer.".into());
        let instructions = TransformationInstructions {
            bullets: vec![BulletInstruction::untouched("b1", "e1", "Shipped v2", Tone::default())],
            summary: SummaryInstruction {
                original: Some("Engineer.".into()),
                directives: vec!["Align the summary with the Backend Engineer role.".into()],
                improvement_level: ImprovementLevel::Minor,
                ..Default::default()
            },
            ..Default::default()
        };
        let mock = Arc::new(
            MockCompletion::new().on(SUMMARY_MARKER, "{summary: 'Backend engineer who ships.'}"),
        );

        let outcome = rewriter(mock)
            .apply_transformations(&resume, &instructions, &job())
            .await
            .unwrap();

        assert_eq!(
            outcome.tailored.summary.as_deref(),
            Some("Backend engineer who ships.")
        );
        let diff = outcome.changes.summary.unwrap();
        assert_eq!(diff.before.as_deref(), Some("Engineer."));
        assert!(outcome.changes.bullet_diffs.is_empty());
    }

    #[tokio::test]
    async fn test_why_fit_keeps_drafts_the_model_drops() {
        let instruction = WhyFitInstruction {
            enabled: true,
            points: vec![
                WhyFitPoint {
                    label: "Measurable impact at Acme".into(),
                    text: "Cut latency by 40%".into(),
                },
                WhyFitPoint {
                    label: "Hands-on Rust".into(),
                    text: "Applied Rust in professional experience.".into(),
                },
            ],
            tone: Tone::default(),
        };
        let mock = Arc::new(MockCompletion::new().on(
            WHY_FIT_MARKER,
            r#"{"points":[{"label":"","text":"Cut API latency 40% at Acme."}]}"#,
        ));

        let result = rewriter(mock)
            .polish_why_fit(&instruction, &job())
            .await
            .unwrap();

        assert_eq!(result.value.len(), 2);
        assert_eq!(result.value[0].label, "Measurable impact at Acme");
        assert_eq!(result.value[0].text, "Cut API latency 40% at Acme.");
        assert_eq!(result.value[1], instruction.points[1]);
    }

    #[tokio::test]
    async fn test_skills_reorder_needs_no_model_call() {
        let mut resume = resume(&["Shipped v2"]);
        resume.skills = Skills {
            technical: vec!["Python".into(), "Rust".into()],
            ..Default::default()
        };
        let instructions = TransformationInstructions {
            bullets: vec![BulletInstruction::untouched("b1", "e1", "Shipped v2", Tone::default())],
            skills: SkillsInstruction {
                reorder: true,
                prioritized: vec!["Rust".into(), "Python".into()],
                directives: vec![],
            },
            ..Default::default()
        };
        let mock = Arc::new(MockCompletion::new());

        let outcome = rewriter(mock.clone())
            .apply_transformations(&resume, &instructions, &job())
            .await
            .unwrap();

        assert_eq!(outcome.tailored.skills.technical, vec!["Rust", "Python"]);
        assert!(outcome.changes.skills_reordered);
        assert!(!outcome.changes.why_fit_added);
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn test_unparseable_response_is_a_parse_error() {
        let mock = Arc::new(MockCompletion::new().on(BULLETS_MARKER, r#"{"bullets": "oops"}"#));
        let err = rewriter(mock)
            .rewrite_bullets(&[flagged("b1", "Worked on billing")], &job())
            .await
            .unwrap_err();
        assert_eq!(err.code(), "PARSE_ERROR");
    }

    #[tokio::test]
    async fn test_auth_failure_propagates_without_retry() {
        let mock = Arc::new(MockCompletion::new().on_error(
            BULLETS_MARKER,
            crate::llm_client::LlmError::Auth("bad key".into()),
        ));
        let err = rewriter(mock.clone())
            .rewrite_bullets(&[flagged("b1", "Worked on billing")], &job())
            .await
            .unwrap_err();
        assert_eq!(err.code(), "AUTH_ERROR");
        assert_eq!(mock.call_count(), 1);
    }
}
