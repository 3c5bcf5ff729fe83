//! Pre-analysis — independent analyzers run concurrently over (résumé, job).
//!
//! Each analyzer is pluggable behind `Analyzer<T>` and must be a pure function
//! of its inputs. The aggregator joins them fail-fast: the first analyzer
//! error aborts the phase with `ANALYSIS_FAILED`.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::TailorError;
use crate::models::{JobData, ResumeContent};

pub mod impact;
pub mod keywords;
pub mod soft_skills;
pub mod text;
pub mod uniqueness;

use impact::{ImpactAnalysis, KeywordImpactAnalyzer};
use keywords::{ContextAnalysis, KeywordContextAnalyzer};
use soft_skills::{LexiconSoftSkillsAnalyzer, SoftSkillsAnalysis};
use uniqueness::{HeuristicUniquenessAnalyzer, UniquenessAnalysis};

/// An analyzer's typed result plus the model tokens it consumed.
#[derive(Debug, Clone)]
pub struct AnalyzerOutput<T> {
    pub result: T,
    pub tokens_used: u32,
}

impl<T> AnalyzerOutput<T> {
    /// Output of an analyzer that made no model calls.
    pub fn local(result: T) -> Self {
        Self {
            result,
            tokens_used: 0,
        }
    }
}

#[async_trait]
pub trait Analyzer<T: Send>: Send + Sync {
    fn name(&self) -> &'static str;

    async fn analyze(
        &self,
        resume: &ResumeContent,
        job: &JobData,
    ) -> Result<AnalyzerOutput<T>, TailorError>;
}

/// Consolidated output of all analyzers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreAnalysisResult {
    pub impact: ImpactAnalysis,
    pub uniqueness: UniquenessAnalysis,
    pub context: ContextAnalysis,
    pub soft_skills: SoftSkillsAnalysis,
    pub tokens_used: u32,
}

/// Runs the four analyzers concurrently and merges their results.
#[derive(Clone)]
pub struct PreAnalysisAggregator {
    impact: Arc<dyn Analyzer<ImpactAnalysis>>,
    uniqueness: Arc<dyn Analyzer<UniquenessAnalysis>>,
    context: Arc<dyn Analyzer<ContextAnalysis>>,
    soft_skills: Arc<dyn Analyzer<SoftSkillsAnalysis>>,
}

impl Default for PreAnalysisAggregator {
    fn default() -> Self {
        Self {
            impact: Arc::new(KeywordImpactAnalyzer),
            uniqueness: Arc::new(HeuristicUniquenessAnalyzer),
            context: Arc::new(KeywordContextAnalyzer),
            soft_skills: Arc::new(LexiconSoftSkillsAnalyzer),
        }
    }
}

impl PreAnalysisAggregator {
    pub fn with_impact(mut self, analyzer: Arc<dyn Analyzer<ImpactAnalysis>>) -> Self {
        self.impact = analyzer;
        self
    }

    pub fn with_uniqueness(mut self, analyzer: Arc<dyn Analyzer<UniquenessAnalysis>>) -> Self {
        self.uniqueness = analyzer;
        self
    }

    pub fn with_context(mut self, analyzer: Arc<dyn Analyzer<ContextAnalysis>>) -> Self {
        self.context = analyzer;
        self
    }

    pub fn with_soft_skills(mut self, analyzer: Arc<dyn Analyzer<SoftSkillsAnalysis>>) -> Self {
        self.soft_skills = analyzer;
        self
    }

    pub async fn run_pre_analysis(
        &self,
        resume: &ResumeContent,
        job: &JobData,
    ) -> Result<PreAnalysisResult, TailorError> {
        let (impact, uniqueness, context, soft_skills) = tokio::try_join!(
            run_one(self.impact.as_ref(), resume, job),
            run_one(self.uniqueness.as_ref(), resume, job),
            run_one(self.context.as_ref(), resume, job),
            run_one(self.soft_skills.as_ref(), resume, job),
        )?;

        let tokens_used = impact.tokens_used
            + uniqueness.tokens_used
            + context.tokens_used
            + soft_skills.tokens_used;

        debug!(
            "Pre-analysis complete: impact={}, differentiators={}, keywords={}/{}, soft_skills={}",
            impact.result.score,
            uniqueness.result.differentiators.len(),
            context.result.found_count(),
            context.result.keywords.len(),
            soft_skills.result.detected.len()
        );

        Ok(PreAnalysisResult {
            impact: impact.result,
            uniqueness: uniqueness.result,
            context: context.result,
            soft_skills: soft_skills.result,
            tokens_used,
        })
    }
}

async fn run_one<T: Send>(
    analyzer: &dyn Analyzer<T>,
    resume: &ResumeContent,
    job: &JobData,
) -> Result<AnalyzerOutput<T>, TailorError> {
    analyzer
        .analyze(resume, job)
        .await
        .map_err(|e| TailorError::AnalysisFailed {
            analyzer: analyzer.name(),
            source: Box::new(e),
        })
}
