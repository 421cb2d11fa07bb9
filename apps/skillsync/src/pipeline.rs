use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::candidate::{update_candidate, UpdateReport};
use crate::document::{DocumentSource, ExtractError};
use crate::llm_client::Classifier;
use crate::matching::{match_skills, MatchError};
use crate::models::skill::MatchedSkill;
use crate::store::{QueryStore, StoreError};
use crate::taxonomy::load_taxonomy;
use crate::text;

const PREVIEW_CHARS: usize = 100;

/// Fatal failures. Anything that happens after matching succeeded is reported
/// in [`UpdateReport`] instead.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Text extraction failed: {0}")]
    Extract(#[from] ExtractError),

    #[error("Taxonomy load failed: {0}")]
    Taxonomy(#[from] StoreError),

    #[error("Skill matching failed: {0}")]
    Match(#[from] MatchError),
}

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub candidate_id: i64,
    pub cv_chars: usize,
    pub taxonomy_size: usize,
    pub duplicate_names_dropped: usize,
    pub matched: Vec<MatchedSkill>,
    pub unknown_ids_dropped: usize,
    pub repeated_ids_dropped: usize,
    pub update: UpdateReport,
}

impl RunReport {
    pub fn is_complete(&self) -> bool {
        self.update.is_complete()
    }
}

/// One end-to-end run: extract → normalize → load taxonomy → match → update.
/// Holds no per-run state, so one instance can serve many runs.
#[derive(Clone)]
pub struct Pipeline {
    store: Arc<dyn QueryStore>,
    classifier: Arc<dyn Classifier>,
    bucket: String,
    upsert_concurrency: usize,
}

impl Pipeline {
    pub fn new(
        store: Arc<dyn QueryStore>,
        classifier: Arc<dyn Classifier>,
        bucket: String,
        upsert_concurrency: usize,
    ) -> Self {
        Self {
            store,
            classifier,
            bucket,
            upsert_concurrency,
        }
    }

    pub async fn run(
        &self,
        source: DocumentSource,
        candidate_id: i64,
    ) -> Result<RunReport, PipelineError> {
        let run_id = Uuid::new_v4();
        self.run_inner(run_id, source, candidate_id)
            .instrument(info_span!("pipeline", %run_id, candidate_id))
            .await
    }

    async fn run_inner(
        &self,
        run_id: Uuid,
        source: DocumentSource,
        candidate_id: i64,
    ) -> Result<RunReport, PipelineError> {
        let started_at = Utc::now();
        info!("Processing {}", source.describe());

        // pdf-extract is CPU-bound and may panic on hostile input.
        let raw = tokio::task::spawn_blocking(move || source.extract_text())
            .await
            .map_err(|e| ExtractError::Pdf(format!("extraction task failed: {e}")))??;

        let cv_text = text::normalize(&raw);
        if cv_text.is_empty() {
            warn!("No text extracted; continuing with an empty CV");
        } else {
            info!(
                "Extracted {} chars. Preview: {}...",
                cv_text.chars().count(),
                text::preview(&cv_text, PREVIEW_CHARS)
            );
        }

        let taxonomy = load_taxonomy(self.store.as_ref(), &self.bucket).await?;
        let matched = match_skills(&cv_text, &taxonomy, self.classifier.as_ref()).await?;
        info!("Found {} matching skills", matched.skills.len());

        let update = update_candidate(
            self.store.as_ref(),
            &self.bucket,
            candidate_id,
            &cv_text,
            &matched.skills,
            self.upsert_concurrency,
        )
        .await;

        Ok(RunReport {
            run_id,
            started_at,
            candidate_id,
            cv_chars: cv_text.chars().count(),
            taxonomy_size: taxonomy.len(),
            duplicate_names_dropped: taxonomy.duplicate_names_dropped(),
            matched: matched.skills,
            unknown_ids_dropped: matched.unknown_ids_dropped,
            repeated_ids_dropped: matched.repeated_ids_dropped,
            update,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::testing::ScriptedClassifier;
    use crate::store::memory::MemoryStore;

    fn pipeline(store: Arc<MemoryStore>, classifier: Arc<ScriptedClassifier>) -> Pipeline {
        Pipeline::new(store, classifier, "hackathon".to_string(), 1)
    }

    #[tokio::test]
    async fn test_end_to_end_python_and_sql() {
        let store = Arc::new(MemoryStore::with_skills(&[
            (10, "Python Programming"),
            (20, "SQL"),
            (30, "Java"),
        ]));
        let classifier = Arc::new(ScriptedClassifier::replying("[10, 20]"));

        let report = pipeline(store.clone(), classifier.clone())
            .run(
                DocumentSource::Text("I am skilled in\n Python and SQL.".to_string()),
                5,
            )
            .await
            .unwrap();

        assert_eq!(
            report.matched,
            vec![
                MatchedSkill { id: 10, name: "Python Programming".to_string() },
                MatchedSkill { id: 20, name: "SQL".to_string() },
            ]
        );
        assert!(report.is_complete());
        assert_eq!(
            store.cv_texts.lock().unwrap().get(&5).unwrap(),
            "I am skilled in Python and SQL."
        );
        assert_eq!(
            store.link_keys(),
            vec!["candidateskill::5::10", "candidateskill::5::20"]
        );

        let executed = store.executed();
        assert_eq!(executed.iter().filter(|s| s.starts_with("UPDATE")).count(), 1);
        assert_eq!(executed.iter().filter(|s| s.starts_with("UPSERT")).count(), 2);
        assert!(store.link_keys().iter().all(|k| !k.ends_with("::30")));
    }

    #[tokio::test]
    async fn test_taxonomy_failure_aborts_before_model_and_writes() {
        let store = Arc::new(MemoryStore {
            fail_select: Some(|| StoreError::Unavailable("status 503: down".to_string())),
            ..Default::default()
        });
        let classifier = Arc::new(ScriptedClassifier::replying("[1]"));

        let err = pipeline(store.clone(), classifier.clone())
            .run(DocumentSource::Text("cv".to_string()), 1)
            .await
            .unwrap_err();

        assert!(matches!(err, PipelineError::Taxonomy(StoreError::Unavailable(_))));
        assert_eq!(classifier.calls(), 0);
        assert_eq!(store.executed().len(), 1);
    }

    #[tokio::test]
    async fn test_unparseable_output_persists_nothing() {
        let store = Arc::new(MemoryStore::with_skills(&[(1, "Python")]));
        let classifier = Arc::new(ScriptedClassifier::replying("I think it's Python"));

        let err = pipeline(store.clone(), classifier)
            .run(DocumentSource::Text("cv".to_string()), 1)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            PipelineError::Match(MatchError::ModelOutputUnparseable { .. })
        ));
        assert!(store.cv_texts.lock().unwrap().is_empty());
        assert!(store.link_keys().is_empty());
    }

    #[tokio::test]
    async fn test_blank_cv_still_produces_record() {
        let store = Arc::new(MemoryStore::with_skills(&[(1, "Python")]));
        let classifier = Arc::new(ScriptedClassifier::replying("[]"));

        let report = pipeline(store.clone(), classifier)
            .run(DocumentSource::Text(" \n\t ".to_string()), 2)
            .await
            .unwrap();

        assert_eq!(report.cv_chars, 0);
        assert!(report.matched.is_empty());
        assert_eq!(store.cv_texts.lock().unwrap().get(&2).unwrap(), "");
    }

    #[tokio::test]
    async fn test_report_exposes_drop_counts() {
        let store = Arc::new(MemoryStore::with_skills(&[(1, "Python"), (2, "python"), (3, "Java")]));
        let classifier = Arc::new(ScriptedClassifier::replying("[1, 1, 3, 99]"));

        let report = pipeline(store, classifier)
            .run(DocumentSource::Text("Python, Java".to_string()), 3)
            .await
            .unwrap();

        assert_eq!(report.taxonomy_size, 2);
        assert_eq!(report.duplicate_names_dropped, 1);
        assert_eq!(report.unknown_ids_dropped, 1);
        assert_eq!(report.repeated_ids_dropped, 1);
        assert_eq!(report.matched.len(), 2);
    }
}
