// Shared prompt fragments. Each feature that calls the model keeps its own
// prompts.rs alongside it and composes these in.

/// Output constraint for classifier calls that answer with a list of ids.
pub const JSON_ID_ARRAY_ONLY: &str = "Return ONLY a JSON array of the IDs of the matched skills, \
    for example [12, 40, 7]. Return [] if nothing matches. \
    Do not return any other text, explanations, or markdown code fences.";
