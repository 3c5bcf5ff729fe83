//! Quality Scorer — recruiter-readiness composite from the pre-analysis.
//!
//! Pure and deterministic. Weights are fixed constants:
//! composite = impact × 0.4 + keyword coverage × 0.4 + uniqueness × 0.2,
//! each sub-score on 0–100, the result clamped to [0, 100].

use serde::{Deserialize, Serialize};

use crate::analysis::PreAnalysisResult;

const IMPACT_WEIGHT: f32 = 0.4;
const KEYWORD_WEIGHT: f32 = 0.4;
const UNIQUENESS_WEIGHT: f32 = 0.2;
/// Differentiator count at which the uniqueness sub-score saturates.
const DIFFERENTIATOR_SATURATION: usize = 5;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubScores {
    pub impact: u32,
    pub keywords: u32,
    pub uniqueness: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecruiterReadiness {
    /// 0 – 100
    pub composite: u32,
    pub sub_scores: SubScores,
    pub recommendation: String,
}

pub fn calculate_recruiter_readiness(pre: &PreAnalysisResult) -> RecruiterReadiness {
    let impact = pre.impact.score.min(100) as f32;
    let keywords = unit(pre.context.coverage_ratio) * 100.0;
    let uniqueness = pre
        .uniqueness
        .differentiators
        .len()
        .min(DIFFERENTIATOR_SATURATION) as f32
        / DIFFERENTIATOR_SATURATION as f32
        * 100.0;

    let composite = (impact * IMPACT_WEIGHT + keywords * KEYWORD_WEIGHT + uniqueness * UNIQUENESS_WEIGHT)
        .round()
        .clamp(0.0, 100.0) as u32;

    let sub_scores = SubScores {
        impact: impact.round() as u32,
        keywords: keywords.round() as u32,
        uniqueness: uniqueness.round() as u32,
    };

    RecruiterReadiness {
        composite,
        recommendation: build_recommendation(composite, &sub_scores),
        sub_scores,
    }
}

/// Clamps a ratio to [0, 1]; NaN counts as 0.
fn unit(ratio: f32) -> f32 {
    if ratio.is_nan() {
        0.0
    } else {
        ratio.clamp(0.0, 1.0)
    }
}

/// Names the weakest sub-score so the caller knows where to focus.
fn build_recommendation(composite: u32, sub: &SubScores) -> String {
    let weakest = [
        (sub.impact, "quantify more achievements"),
        (sub.keywords, "cover more of the job's keywords"),
        (sub.uniqueness, "surface more distinctive strengths"),
    ]
    .into_iter()
    .min_by_key(|(score, _)| *score)
    .map_or("", |(_, hint)| hint);

    if composite >= 80 {
        "Recruiter-ready. The résumé covers the role's key signals.".to_string()
    } else if composite >= 60 {
        format!("Nearly there ({composite}/100). To improve further, {weakest}.")
    } else {
        format!("Needs work ({composite}/100). Start here: {weakest}.")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::impact::ImpactAnalysis;
    use crate::analysis::keywords::ContextAnalysis;
    use crate::analysis::uniqueness::{Differentiator, DifferentiatorKind, UniquenessAnalysis};

    fn differentiators(n: usize) -> UniquenessAnalysis {
        UniquenessAnalysis {
            differentiators: (0..n)
                .map(|i| Differentiator {
                    label: format!("d{i}"),
                    evidence: String::new(),
                    kind: DifferentiatorKind::Project,
                    strength: 0.5,
                    bullet_id: None,
                })
                .collect(),
        }
    }

    fn pre(impact: u32, coverage: f32, diffs: usize) -> PreAnalysisResult {
        PreAnalysisResult {
            impact: ImpactAnalysis {
                score: impact,
                bullets: vec![],
            },
            uniqueness: differentiators(diffs),
            context: ContextAnalysis {
                keywords: vec![],
                coverage_ratio: coverage,
                required_coverage_ratio: coverage,
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_all_zero_scores_zero() {
        let r = calculate_recruiter_readiness(&PreAnalysisResult::default());
        assert_eq!(r.composite, 0);
        assert_eq!(r.sub_scores, SubScores::default());
    }

    #[test]
    fn test_perfect_inputs_score_100() {
        let r = calculate_recruiter_readiness(&pre(100, 1.0, 5));
        assert_eq!(r.composite, 100);
        assert!(r.recommendation.starts_with("Recruiter-ready"));
    }

    #[test]
    fn test_out_of_range_inputs_are_clamped() {
        let r = calculate_recruiter_readiness(&pre(250, 1.7, 40));
        assert_eq!(r.composite, 100);
        assert_eq!(r.sub_scores.impact, 100);

        let r = calculate_recruiter_readiness(&pre(0, f32::NAN, 0));
        assert_eq!(r.composite, 0);

        let r = calculate_recruiter_readiness(&pre(0, -0.5, 0));
        assert_eq!(r.composite, 0);
    }

    #[test]
    fn test_composite_is_monotonic_in_each_input() {
        let base = calculate_recruiter_readiness(&pre(40, 0.3, 1)).composite;
        assert!(calculate_recruiter_readiness(&pre(70, 0.3, 1)).composite >= base);
        assert!(calculate_recruiter_readiness(&pre(40, 0.8, 1)).composite >= base);
        assert!(calculate_recruiter_readiness(&pre(40, 0.3, 4)).composite >= base);

        let mut last = 0;
        for impact in (0..=100).step_by(10) {
            let score = calculate_recruiter_readiness(&pre(impact, 0.5, 2)).composite;
            assert!(score >= last);
            last = score;
        }
    }

    #[test]
    fn test_composite_stays_in_bounds_across_grid() {
        for impact in [0, 25, 50, 75, 100, 150] {
            for coverage in [0.0, 0.25, 0.5, 1.0, 2.0] {
                for diffs in [0, 1, 3, 5, 9] {
                    let c = calculate_recruiter_readiness(&pre(impact, coverage, diffs)).composite;
                    assert!(c <= 100);
                }
            }
        }
    }

    #[test]
    fn test_recommendation_names_weakest_area() {
        let r = calculate_recruiter_readiness(&pre(90, 0.1, 5));
        assert!(r.recommendation.contains("keywords"));
    }
}
