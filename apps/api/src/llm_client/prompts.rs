// Prompt fragments shared by every rewrite call.
// Per-call templates live in tailoring/prompts.rs.

/// Common instruction appended to all rewrite prompts.
pub const GROUNDING_INSTRUCTION: &str = "\
    CRITICAL: Every claim you write must be supported by the original text you are given. \
    Do NOT invent employers, technologies, numbers, team sizes or outcomes. \
    If an instruction asks for a metric the original does not support, describe scope or \
    frequency in words instead of making up a figure.";

/// Instruction that keeps rewrites within the original meaning.
pub const SCOPE_INSTRUCTION: &str = "\
    CRITICAL: Preserve the core meaning and the candidate's actual level of ownership. \
    NEVER upgrade a contribution (e.g. 'helped with' to 'led') unless the original says so. \
    Keep each bullet to one or two lines and start it with a strong action verb.";
