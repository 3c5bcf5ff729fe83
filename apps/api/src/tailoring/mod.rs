pub mod handlers;
pub mod instructions;
pub mod orchestrator;
pub mod prompts;
pub mod rewriter;
pub mod rules;
pub mod scoring;
pub mod tone;
