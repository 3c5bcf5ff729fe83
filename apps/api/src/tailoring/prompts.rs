// All LLM prompt constants for the Tailoring module.
// Reuses cross-cutting fragments from llm_client::prompts.

/// System prompt for bullet rewriting.
pub const BULLETS_SYSTEM: &str = "You are an expert resume writer tailoring existing \
    resume bullets to a target role. You rewrite ONLY the bullets you are given, \
    following each bullet's directives exactly. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences.";

/// Batched bullet rewrite prompt template.
/// Replace: {grounding_instruction}, {scope_instruction}, {tone_guidance},
///          {job_summary}, {bullets_json}
pub const BULLETS_PROMPT_TEMPLATE: &str = r#"{grounding_instruction}

{scope_instruction}

TONE: {tone_guidance}

TARGET ROLE:
{job_summary}

BULLETS TO REWRITE (each with its own directives; keep every id exactly as given):
{bullets_json}

Return a JSON object with this EXACT schema:
{
  "bullets": [
    {"id": "the-exact-bullet-id", "rewritten": "Rewritten bullet text"}
  ]
}

HARD RULES:
1. Return one entry per bullet id above, never invent ids
2. Follow ONLY the directives listed for that bullet
3. Surface a keyword only if the original work plausibly involved it
4. One or two lines per bullet, starting with an action verb"#;

/// System prompt for summary rewriting.
pub const SUMMARY_SYSTEM: &str = "You are an expert resume writer. You write concise, \
    factual professional summaries grounded only in the material provided. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences.";

/// Summary rewrite prompt template.
/// Replace: {grounding_instruction}, {tone_guidance}, {job_summary},
///          {original_summary}, {directives}, {keywords}, {differentiators}
pub const SUMMARY_PROMPT_TEMPLATE: &str = r#"{grounding_instruction}

TONE: {tone_guidance}

TARGET ROLE:
{job_summary}

SUMMARY INSTRUCTION
Original summary: {original_summary}
Directives:
{directives}
Demonstrated keywords to reference: {keywords}
Differentiators (the ONLY achievements you may cite):
{differentiators}

Return a JSON object:
{
  "summary": "Two to three sentence professional summary"
}"#;

/// System prompt for the why-fit block.
pub const WHY_FIT_SYSTEM: &str = "You are an expert resume writer polishing a short \
    'why I am the right fit' block. You improve wording only; you never add claims. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences.";

/// Why-fit polishing prompt template.
/// Replace: {grounding_instruction}, {tone_guidance}, {job_summary}, {points_json}
pub const WHY_FIT_PROMPT_TEMPLATE: &str = r#"{grounding_instruction}

TONE: {tone_guidance}

TARGET ROLE:
{job_summary}

WHY-FIT POINTS (draft, evidence-backed):
{points_json}

Polish each point into one crisp sentence tied to the target role. Keep the same number of points and their order.

Return a JSON object:
{
  "points": [
    {"label": "Short label", "text": "One sentence"}
  ]
}"#;
