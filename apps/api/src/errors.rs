use std::fmt;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;

use crate::llm_client::LlmError;

/// Excerpt length kept from raw and repaired model text on parse failures.
pub const PARSE_EXCERPT_CHARS: usize = 500;

/// Pipeline phases, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    PreAnalysis,
    Rules,
    Rewriting,
    Scoring,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::PreAnalysis => "PRE_ANALYSIS",
            Phase::Rules => "RULES",
            Phase::Rewriting => "REWRITING",
            Phase::Scoring => "SCORING",
        }
    }

    /// Stable error code for a failure wrapped at this phase boundary.
    pub fn failure_code(&self) -> &'static str {
        match self {
            Phase::PreAnalysis => "PRE_ANALYSIS_FAILED",
            Phase::Rules => "RULES_FAILED",
            Phase::Rewriting => "REWRITING_FAILED",
            Phase::Scoring => "SCORING_FAILED",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Typed error for the tailoring pipeline. Every variant carries a stable code.
#[derive(Debug, Error)]
pub enum TailorError {
    #[error("AI completion service is not configured")]
    AiNotConfigured,

    #[error("Insufficient content: {0}")]
    InsufficientContent(String),

    /// Malformed résumé input, e.g. an id used twice.
    #[error("Invalid résumé: {0}")]
    InvalidResume(String),

    /// Model output that could not be coerced into JSON even after repair.
    /// Not retried: the same prompt tends to reproduce the same output.
    #[error("Could not parse model output: {message}")]
    Parse {
        message: String,
        raw_excerpt: String,
        repaired_excerpt: String,
    },

    #[error("Completion service rate limited: {0}")]
    RateLimit(String),

    #[error("Completion service rejected credentials: {0}")]
    Auth(String),

    #[error("Completion service error: {message}")]
    Api { status: Option<u16>, message: String },

    #[error("Analyzer '{analyzer}' failed: {source}")]
    AnalysisFailed {
        analyzer: &'static str,
        #[source]
        source: Box<TailorError>,
    },

    #[error("{phase} phase failed: {source}")]
    PhaseFailed {
        phase: Phase,
        #[source]
        source: Box<TailorError>,
    },
}

impl TailorError {
    pub fn code(&self) -> &'static str {
        match self {
            TailorError::AiNotConfigured => "AI_NOT_CONFIGURED",
            TailorError::InsufficientContent(_) => "INSUFFICIENT_CONTENT",
            TailorError::InvalidResume(_) => "INVALID_RESUME",
            TailorError::Parse { .. } => "PARSE_ERROR",
            TailorError::RateLimit(_) => "RATE_LIMIT",
            TailorError::Auth(_) => "AUTH_ERROR",
            TailorError::Api { .. } => "API_ERROR",
            TailorError::AnalysisFailed { .. } => "ANALYSIS_FAILED",
            TailorError::PhaseFailed { phase, .. } => phase.failure_code(),
        }
    }

    /// Code of the innermost cause.
    pub fn root_code(&self) -> &'static str {
        self.root().code()
    }

    /// Innermost cause, looking through phase and analyzer wrappers.
    pub fn root(&self) -> &TailorError {
        match self {
            TailorError::AnalysisFailed { source, .. } | TailorError::PhaseFailed { source, .. } => {
                source.root()
            }
            other => other,
        }
    }

    pub fn phase(&self) -> Option<Phase> {
        match self {
            TailorError::PhaseFailed { phase, .. } => Some(*phase),
            _ => None,
        }
    }

    /// Wraps this error at a phase boundary. Already-wrapped errors keep their phase.
    pub fn in_phase(self, phase: Phase) -> Self {
        match self {
            wrapped @ TailorError::PhaseFailed { .. } => wrapped,
            other => TailorError::PhaseFailed {
                phase,
                source: Box::new(other),
            },
        }
    }

    pub fn parse(message: impl Into<String>, raw: &str, repaired: &str) -> Self {
        TailorError::Parse {
            message: message.into(),
            raw_excerpt: excerpt(raw, PARSE_EXCERPT_CHARS),
            repaired_excerpt: excerpt(repaired, PARSE_EXCERPT_CHARS),
        }
    }

    /// Message safe to show to an end user: never includes raw model text.
    pub fn public_message(&self) -> String {
        match self {
            TailorError::AiNotConfigured => {
                "AI features are not configured. Add an API key to enable tailoring.".to_string()
            }
            TailorError::InsufficientContent(msg) | TailorError::InvalidResume(msg) => msg.clone(),
            TailorError::Parse { .. } => {
                "The AI returned a response that could not be understood. Please try again."
                    .to_string()
            }
            TailorError::RateLimit(_) => {
                "The AI service is busy right now. Please wait a moment and retry.".to_string()
            }
            TailorError::Auth(_) => "The AI service rejected the configured API key.".to_string(),
            TailorError::Api { .. } => "The AI service returned an error.".to_string(),
            TailorError::AnalysisFailed { analyzer, source } => {
                format!("The {analyzer} analysis failed. {}", source.public_message())
            }
            TailorError::PhaseFailed { source, .. } => source.public_message(),
        }
    }
}

impl From<LlmError> for TailorError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::NotConfigured => TailorError::AiNotConfigured,
            LlmError::RateLimited { message, .. } => TailorError::RateLimit(message),
            LlmError::Auth(message) => TailorError::Auth(message),
            LlmError::Api { status, message } => TailorError::Api {
                status: Some(status),
                message,
            },
            LlmError::Http(e) => TailorError::Api {
                status: e.status().map(|s| s.as_u16()),
                message: e.to_string(),
            },
            LlmError::EmptyContent => TailorError::Api {
                status: None,
                message: "completion returned no text".to_string(),
            },
            err @ (LlmError::Decode(_) | LlmError::Timeout(_)) => TailorError::Api {
                status: None,
                message: err.to_string(),
            },
        }
    }
}

/// First `max_chars` characters of `text`, on a char boundary.
pub fn excerpt(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Tailor(#[from] TailorError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, phase) = match &self {
            AppError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone(), None)
            }
            AppError::Tailor(err) => {
                if let TailorError::Parse {
                    raw_excerpt,
                    repaired_excerpt,
                    ..
                } = err.root()
                {
                    tracing::error!(
                        raw = %raw_excerpt,
                        repaired = %repaired_excerpt,
                        "Unparseable model output"
                    );
                }
                tracing::error!("Tailoring error [{}]: {err}", err.code());
                (
                    status_for(err),
                    err.code(),
                    err.public_message(),
                    err.phase().map(|p| p.as_str()),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "rootCode": match &self {
                    AppError::Tailor(err) => err.root_code(),
                    AppError::Validation(_) => code,
                },
                "phase": phase,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

fn status_for(err: &TailorError) -> StatusCode {
    match err.root_code() {
        "AI_NOT_CONFIGURED" => StatusCode::SERVICE_UNAVAILABLE,
        "INSUFFICIENT_CONTENT" => StatusCode::UNPROCESSABLE_ENTITY,
        "INVALID_RESUME" => StatusCode::BAD_REQUEST,
        "RATE_LIMIT" => StatusCode::TOO_MANY_REQUESTS,
        "PARSE_ERROR" | "AUTH_ERROR" | "API_ERROR" => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
