// Skill Matcher: grounded prompt → single classifier call → validated ids.
// All model calls go through llm_client; this module never talks HTTP itself.

pub mod prompts;
pub mod reconcile;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::llm_client::{Classifier, LlmError};
use crate::taxonomy::TaxonomyIndex;
use prompts::{match_system_prompt, match_user_prompt};
use reconcile::{parse_skill_ids, reconcile, strip_code_fences, Reconciled};

#[derive(Debug, Error)]
pub enum MatchError {
    #[error(transparent)]
    Model(#[from] LlmError),

    #[error("Model output is not a JSON array of integers: {raw}")]
    ModelOutputUnparseable { raw: String },
}

/// Classifies `cv_text` against the whole taxonomy.
///
/// Fails on a failed model call or on output that is not a JSON integer
/// array. Ids outside the taxonomy and repeated ids are not errors; they are
/// dropped and counted in the returned [`Reconciled`].
pub async fn match_skills(
    cv_text: &str,
    taxonomy: &TaxonomyIndex,
    classifier: &dyn Classifier,
) -> Result<Reconciled, MatchError> {
    if taxonomy.is_empty() {
        warn!("Taxonomy is empty; skipping model call");
        return Ok(Reconciled::default());
    }

    let system = match_system_prompt();
    let user = match_user_prompt(taxonomy, cv_text);
    debug!(
        "Match prompt: {} skills, {} chars",
        taxonomy.len(),
        user.len()
    );

    let raw = classifier.complete(&system, &user).await?;
    let cleaned = strip_code_fences(&raw);

    let ids = parse_skill_ids(&cleaned).map_err(|e| {
        warn!("Failed to parse model response ({e}): {raw}");
        MatchError::ModelOutputUnparseable { raw: raw.clone() }
    })?;

    let reconciled = reconcile(&ids, taxonomy);
    info!(
        "Model returned {} ids: {} matched, {} unknown dropped, {} repeats dropped",
        ids.len(),
        reconciled.skills.len(),
        reconciled.unknown_ids_dropped,
        reconciled.repeated_ids_dropped
    );
    Ok(reconciled)
}
