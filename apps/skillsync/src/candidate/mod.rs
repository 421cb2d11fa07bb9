// Candidate Updater: persists CV text and skill links for one candidate.
//
// Two independent phases, no transaction: the CV-text overwrite and the
// per-skill upserts each succeed or fail on their own. Every write is
// idempotent, so re-running a partially failed update is safe.

pub mod handlers;

use futures::stream::{self, StreamExt};
use serde::Serialize;
use tracing::{error, info};

use crate::models::candidate::{CandidateDoc, CandidateSkillDoc};
use crate::models::skill::MatchedSkill;
use crate::store::{statements, QueryStore, StoreError};

#[derive(Debug, Clone, Serialize)]
pub struct SkillLinkFailure {
    pub skill: MatchedSkill,
    pub error: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateReport {
    /// `None` when the CV text was written, otherwise the store error.
    pub cv_text_error: Option<String>,
    pub linked: Vec<MatchedSkill>,
    pub failed: Vec<SkillLinkFailure>,
}

impl UpdateReport {
    pub fn cv_text_updated(&self) -> bool {
        self.cv_text_error.is_none()
    }

    /// True when every write in both phases succeeded.
    pub fn is_complete(&self) -> bool {
        self.cv_text_updated() && self.failed.is_empty()
    }
}

/// Writes the CV text, then upserts one link per matched skill.
///
/// Never fails as a whole: per-write failures are logged and collected in the
/// report. At most `concurrency` upserts are in flight at once.
pub async fn update_candidate(
    store: &dyn QueryStore,
    bucket: &str,
    candidate_id: i64,
    cv_text: &str,
    matches: &[MatchedSkill],
    concurrency: usize,
) -> UpdateReport {
    let mut report = UpdateReport::default();

    // Phase A
    match store
        .execute(&statements::update_cv_text(bucket, candidate_id, cv_text))
        .await
    {
        Ok(_) => info!("CVText updated for candidate {candidate_id}"),
        Err(e) => {
            error!("Error updating CVText for candidate {candidate_id}: {e}");
            report.cv_text_error = Some(e.to_string());
        }
    }

    // Phase B
    let results: Vec<(MatchedSkill, Result<(), StoreError>)> = stream::iter(matches.iter().cloned())
        .map(move |skill| async move {
            let link = CandidateSkillDoc::new(candidate_id, skill.id);
            let result = store
                .execute(&statements::upsert_candidate_skill(bucket, &link))
                .await
                .map(|_| ());
            (skill, result)
        })
        .buffered(concurrency.max(1))
        .collect()
        .await;

    for (skill, result) in results {
        match result {
            Ok(()) => {
                info!("Linked skill {} ({})", skill.name, skill.id);
                report.linked.push(skill);
            }
            Err(e) => {
                error!("Failed to link skill {} ({}): {e}", skill.name, skill.id);
                report.failed.push(SkillLinkFailure {
                    skill,
                    error: e.to_string(),
                });
            }
        }
    }

    report
}

/// Inserts a new candidate document. Fails if the key already exists.
pub async fn create_candidate(
    store: &dyn QueryStore,
    bucket: &str,
    candidate: &CandidateDoc,
) -> Result<(), StoreError> {
    store
        .execute(&statements::insert_candidate(bucket, candidate))
        .await?;
    info!("Inserted candidate {}", candidate.key());
    Ok(())
}
