//! Validation boundary for classifier output.
//!
//! fence-strip → parse → taxonomy-filter → dedupe. Only the parse stage can
//! fail; unknown and repeated ids are dropped and counted.

use std::collections::HashSet;

use serde::Serialize;

use crate::models::skill::MatchedSkill;
use crate::taxonomy::TaxonomyIndex;

/// Removes every ```` ```json ```` / ```` ``` ```` marker and trims.
pub fn strip_code_fences(text: &str) -> String {
    text.replace("```json", "").replace("```", "").trim().to_string()
}

/// Parses a bare JSON array of integers.
pub fn parse_skill_ids(cleaned: &str) -> Result<Vec<i64>, serde_json::Error> {
    serde_json::from_str::<Vec<i64>>(cleaned)
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Reconciled {
    /// Distinct matches in order of first appearance in the model output.
    pub skills: Vec<MatchedSkill>,
    pub unknown_ids_dropped: usize,
    pub repeated_ids_dropped: usize,
}

/// Resolves ids against the taxonomy, dropping unknown ids and repeats.
pub fn reconcile(ids: &[i64], taxonomy: &TaxonomyIndex) -> Reconciled {
    let mut seen = HashSet::new();
    let mut out = Reconciled::default();

    for &id in ids {
        let Some(name) = taxonomy.name_for(id) else {
            out.unknown_ids_dropped += 1;
            continue;
        };
        if !seen.insert(id) {
            out.repeated_ids_dropped += 1;
            continue;
        }
        out.skills.push(MatchedSkill {
            id,
            name: name.to_string(),
        });
    }

    out
}
