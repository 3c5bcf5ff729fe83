//! Tone calibration — detects the job's tone and maps it to verb guidance.
//!
//! Detection is lexical and deterministic so the Rule Engine stays pure.

use serde::{Deserialize, Serialize};

use crate::analysis::text::contains_term;
use crate::models::JobData;

/// Detected tone of a job posting. Drives verb selection in rewrite prompts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    AggressiveStartup,
    #[default]
    CollaborativeEnterprise,
    ResearchOriented,
    ProductOriented,
}

/// Signal phrases per tone, in tie-break priority order.
const TONE_SIGNALS: &[(Tone, &[&str])] = &[
    (
        Tone::AggressiveStartup,
        &["move fast", "own", "drive", "spearhead", "disrupt", "startup", "hustle", "zero to one"],
    ),
    (
        Tone::ResearchOriented,
        &["research", "investigate", "publish", "publications", "evaluate", "propose", "phd"],
    ),
    (
        Tone::ProductOriented,
        &["ship", "launch", "deliver", "user experience", "customers", "product"],
    ),
    (
        Tone::CollaborativeEnterprise,
        &["partner", "collaborate", "collaborative", "contribute", "stakeholders", "cross-functional"],
    ),
];

/// Counts tone signals in the job text; ties and no-signal fall back to the default tone.
pub fn detect_tone(job: &JobData) -> Tone {
    let text = job.searchable_text();
    let mut best = (Tone::default(), 0usize);
    for (tone, signals) in TONE_SIGNALS {
        let hits = signals.iter().filter(|s| contains_term(&text, s)).count();
        if hits > best.1 {
            best = (*tone, hits);
        }
    }
    best.0
}

/// Verb sets and phrasing calibrated to a specific tone.
#[derive(Debug, Clone)]
pub struct ToneExamples {
    pub strong_verbs: Vec<&'static str>,
    pub avoid_verbs: Vec<&'static str>,
}

/// Returns tone-calibrated verb sets for the detected tone.
pub fn get_tone_examples(tone: Tone) -> ToneExamples {
    match tone {
        Tone::AggressiveStartup => ToneExamples {
            strong_verbs: vec!["Built", "Shipped", "Launched", "Drove", "Scaled", "Owned"],
            avoid_verbs: vec!["assisted", "helped", "supported", "participated in"],
        },
        Tone::CollaborativeEnterprise => ToneExamples {
            strong_verbs: vec![
                "Delivered",
                "Partnered with",
                "Implemented",
                "Enabled",
                "Collaborated on",
                "Streamlined",
            ],
            avoid_verbs: vec!["spearheaded", "disrupted", "single-handedly"],
        },
        Tone::ResearchOriented => ToneExamples {
            strong_verbs: vec![
                "Investigated",
                "Designed and evaluated",
                "Published",
                "Proposed",
                "Analyzed",
                "Validated",
            ],
            avoid_verbs: vec!["shipped", "moved fast", "disrupted"],
        },
        Tone::ProductOriented => ToneExamples {
            strong_verbs: vec![
                "Shipped",
                "Delivered",
                "Launched",
                "Improved",
                "Reduced friction for",
                "Grew",
            ],
            avoid_verbs: vec!["investigated", "researched", "proposed"],
        },
    }
}

impl Tone {
    /// One-line guidance embedded in instructions and prompts.
    pub fn guidance(&self) -> String {
        let examples = get_tone_examples(*self);
        format!(
            "Prefer verbs like {}; avoid {}.",
            examples.strong_verbs.join(", "),
            examples.avoid_verbs.join(", ")
        )
    }
}
