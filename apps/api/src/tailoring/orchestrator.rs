//! Hybrid tailoring orchestrator.
//!
//! Flow: guard (AI configured, content present) → PRE_ANALYSIS (concurrent
//! analyzers) → RULES (pure) → REWRITING (≤ 3 model calls) → SCORING → DONE.
//!
//! Any phase failure ends in `FAILED(phase)`; the error is wrapped with the
//! phase so callers can tell an analyzer outage from a model outage.
//! Nothing is kept between runs.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::time::Instant;
use tracing::{error, info};
use uuid::Uuid;

use crate::analysis::{PreAnalysisAggregator, PreAnalysisResult};
use crate::errors::{Phase, TailorError};
use crate::llm_client::estimate_tokens;
use crate::llm_client::retry::RetryPolicy;
use crate::llm_client::CompletionService;
use crate::models::{JobData, ResumeContent};
use crate::tailoring::instructions::TransformationInstructions;
use crate::tailoring::rewriter::{Rewriter, TailoringChanges};
use crate::tailoring::rules::{generate_instructions, RuleId, RuleSet};
use crate::tailoring::scoring::{calculate_recruiter_readiness, RecruiterReadiness};

/// Instructions and framing a single "rewrite the whole résumé" prompt would carry.
const NAIVE_PROMPT_OVERHEAD_TOKENS: u32 = 600;

// ────────────────────────────────────────────────────────────────────────────
// State machine
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PipelineState {
    PreAnalysis,
    Rules,
    Rewriting,
    Scoring,
    Done,
    Failed(Phase),
}

impl PipelineState {
    /// The state after the current phase succeeds. Terminal states stay put.
    pub fn next(self) -> Self {
        match self {
            PipelineState::PreAnalysis => PipelineState::Rules,
            PipelineState::Rules => PipelineState::Rewriting,
            PipelineState::Rewriting => PipelineState::Scoring,
            PipelineState::Scoring => PipelineState::Done,
            terminal => terminal,
        }
    }

    /// The state after the current phase fails.
    pub fn fail(self) -> Self {
        match self.phase() {
            Some(phase) => PipelineState::Failed(phase),
            None => self,
        }
    }

    /// The phase this state runs, if it is not terminal.
    pub fn phase(self) -> Option<Phase> {
        match self {
            PipelineState::PreAnalysis => Some(Phase::PreAnalysis),
            PipelineState::Rules => Some(Phase::Rules),
            PipelineState::Rewriting => Some(Phase::Rewriting),
            PipelineState::Scoring => Some(Phase::Scoring),
            PipelineState::Done | PipelineState::Failed(_) => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        self.phase().is_none()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Result types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseTiming {
    pub phase: Phase,
    pub duration_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TailorTelemetry {
    pub run_id: Uuid,
    pub pre_analysis_tokens: u32,
    pub rewriting_tokens: u32,
    pub total_tokens: u32,
    pub model_calls: u32,
    /// Estimated cost of one call sending the whole résumé and job and
    /// receiving the whole résumé back.
    pub naive_estimated_tokens: u32,
    /// Negative when this run cost more than the naive estimate.
    pub estimated_savings_pct: f32,
    pub duration_ms: u64,
    pub phase_timings: Vec<PhaseTiming>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HybridTailorResult {
    pub resume_id: String,
    pub tailored_resume: ResumeContent,
    pub pre_analysis: PreAnalysisResult,
    pub applied_rules: Vec<RuleId>,
    pub changes: TailoringChanges,
    pub score: RecruiterReadiness,
    pub telemetry: TailorTelemetry,
    pub tailored_at: DateTime<Utc>,
}

/// Everything the pipeline decides before any model call.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TailorPreview {
    pub pre_analysis: PreAnalysisResult,
    pub instructions: TransformationInstructions,
    pub score: RecruiterReadiness,
}

// ────────────────────────────────────────────────────────────────────────────
// Pipeline
// ────────────────────────────────────────────────────────────────────────────

/// Carried in `AppState` as `Arc<TailoringPipeline>`.
#[derive(Clone)]
pub struct TailoringPipeline {
    llm: Option<Arc<dyn CompletionService>>,
    analyzers: PreAnalysisAggregator,
    rules: RuleSet,
    retry: RetryPolicy,
}

impl TailoringPipeline {
    /// `llm` is `None` when no completion credentials are configured; every
    /// tailoring run then fails fast with `AI_NOT_CONFIGURED`.
    pub fn new(llm: Option<Arc<dyn CompletionService>>) -> Self {
        Self {
            llm,
            analyzers: PreAnalysisAggregator::default(),
            rules: RuleSet::standard(),
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_analyzers(mut self, analyzers: PreAnalysisAggregator) -> Self {
        self.analyzers = analyzers;
        self
    }

    pub fn with_rules(mut self, rules: RuleSet) -> Self {
        self.rules = rules;
        self
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn is_configured(&self) -> bool {
        self.llm.is_some()
    }

    /// Runs the full four-phase pipeline.
    pub async fn tailor(
        &self,
        resume_id: &str,
        resume: &ResumeContent,
        job: &JobData,
    ) -> Result<HybridTailorResult, TailorError> {
        let llm = self.llm.clone().ok_or(TailorError::AiNotConfigured)?;
        ensure_content(resume)?;

        let run_id = Uuid::new_v4();
        let started = Instant::now();
        let mut timings = Vec::with_capacity(4);
        let mut state = PipelineState::PreAnalysis;
        info!(
            "Tailoring run {} started for resume {} ({} bullets) → {}",
            run_id,
            resume_id,
            resume.bullet_count(),
            job.title
        );

        // PRE_ANALYSIS
        let clock = Instant::now();
        let pre = self
            .analyzers
            .run_pre_analysis(resume, job)
            .await
            .map_err(|e| fail(run_id, state, e))?;
        timings.push(timing(Phase::PreAnalysis, clock));
        state = state.next();

        // RULES
        let clock = Instant::now();
        let instructions = generate_instructions(resume, &pre, job, &self.rules);
        timings.push(timing(Phase::Rules, clock));
        info!(
            "Run {}: {} rules applied, {}/{} bullets flagged",
            run_id,
            instructions.applied_rules.len(),
            instructions.bullets_to_rewrite().count(),
            instructions.bullets.len()
        );
        state = state.next();

        // REWRITING
        let clock = Instant::now();
        let rewriter = Rewriter::new(llm, self.retry.clone());
        let outcome = rewriter
            .apply_transformations(resume, &instructions, job)
            .await
            .map_err(|e| fail(run_id, state, e))?;
        timings.push(timing(Phase::Rewriting, clock));
        state = state.next();

        // SCORING
        let clock = Instant::now();
        let score = calculate_recruiter_readiness(&pre);
        timings.push(timing(Phase::Scoring, clock));
        state = state.next();

        let total_tokens = pre.tokens_used + outcome.usage.tokens;
        let naive_estimated_tokens = naive_token_estimate(resume, job);
        let telemetry = TailorTelemetry {
            run_id,
            pre_analysis_tokens: pre.tokens_used,
            rewriting_tokens: outcome.usage.tokens,
            total_tokens,
            model_calls: outcome.usage.calls,
            naive_estimated_tokens,
            estimated_savings_pct: savings_pct(naive_estimated_tokens, total_tokens),
            duration_ms: millis(started),
            phase_timings: timings,
        };

        info!(
            "Run {} {:?}: {} changes, readiness {}/100, {} model calls, ~{} tokens ({:.1}% vs naive) in {}ms",
            run_id,
            state,
            outcome.changes.bullet_diffs.len(),
            score.composite,
            telemetry.model_calls,
            telemetry.total_tokens,
            telemetry.estimated_savings_pct,
            telemetry.duration_ms
        );

        Ok(HybridTailorResult {
            resume_id: resume_id.to_string(),
            tailored_resume: outcome.tailored,
            pre_analysis: pre,
            applied_rules: instructions.applied_rules,
            changes: outcome.changes,
            score,
            telemetry,
            tailored_at: Utc::now(),
        })
    }

    /// Pre-analysis, instructions and readiness without any model call.
    /// Works whether or not completion credentials are configured.
    pub async fn preview(
        &self,
        resume: &ResumeContent,
        job: &JobData,
    ) -> Result<TailorPreview, TailorError> {
        ensure_content(resume)?;
        let pre = self
            .analyzers
            .run_pre_analysis(resume, job)
            .await
            .map_err(|e| e.in_phase(Phase::PreAnalysis))?;
        let instructions = generate_instructions(resume, &pre, job, &self.rules);
        let score = calculate_recruiter_readiness(&pre);
        Ok(TailorPreview {
            pre_analysis: pre,
            instructions,
            score,
        })
    }
}

fn ensure_content(resume: &ResumeContent) -> Result<(), TailorError> {
    if resume.bullet_count() == 0 {
        return Err(TailorError::InsufficientContent(
            "The résumé has no experience bullets to tailor. Add experience before tailoring."
                .to_string(),
        ));
    }
    if let Some(id) = resume.first_duplicate_id() {
        return Err(TailorError::InvalidResume(format!(
            "Id '{id}' is used more than once. Every experience, bullet and education entry needs its own id."
        )));
    }
    Ok(())
}

fn fail(run_id: Uuid, state: PipelineState, err: TailorError) -> TailorError {
    let Some(phase) = state.phase() else {
        return err;
    };
    error!(
        "Run {} → {:?}: {} (root cause {})",
        run_id,
        state.fail(),
        err,
        err.root_code()
    );
    err.in_phase(phase)
}

fn timing(phase: Phase, since: Instant) -> PhaseTiming {
    PhaseTiming {
        phase,
        duration_ms: millis(since),
    }
}

fn millis(since: Instant) -> u64 {
    u64::try_from(since.elapsed().as_millis()).unwrap_or(u64::MAX)
}

fn naive_token_estimate(resume: &ResumeContent, job: &JobData) -> u32 {
    let resume_tokens = serde_json::to_string(resume)
        .map(|s| estimate_tokens(&s))
        .unwrap_or_default();
    let job_tokens = serde_json::to_string(job)
        .map(|s| estimate_tokens(&s))
        .unwrap_or_default();
    // Whole résumé in, whole résumé out.
    NAIVE_PROMPT_OVERHEAD_TOKENS + job_tokens + resume_tokens * 2
}

fn savings_pct(naive: u32, actual: u32) -> f32 {
    if naive == 0 {
        return 0.0;
    }
    let pct = (1.0 - actual as f32 / naive as f32) * 100.0;
    (pct * 10.0).round() / 10.0
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
