// Shared prompt fragments. Each feature that calls the LLM keeps its own
// prompts.rs alongside it; this file holds what they all append.

/// System prompt fragment that enforces a bare JSON array of cards.
pub const JSON_ARRAY_ONLY: &str = "\
    You MUST respond with a single valid JSON array only. \
    Each element is an object with exactly two string fields: \"title\" and \"description\". \
    Do NOT include any text outside the JSON array. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";
