//! Skill taxonomy loading and indexing.
//!
//! The index is built once per run and read-only afterwards. Its contents and
//! iteration order follow the row order the store returns: when two rows share
//! a name (case-insensitively) the first one wins. Several names may point at
//! the same id; the id keeps the name of its first row. The store does not
//! promise a stable row order, so neither does the index across runs.

use std::collections::HashMap;

use tracing::{debug, info};

use crate::models::skill::{SkillEntry, SkillRow};
use crate::store::{statements, QueryStore, StoreError};

#[derive(Debug, Clone, Default)]
pub struct TaxonomyIndex {
    entries: Vec<SkillEntry>,
    by_name: HashMap<String, i64>,
    by_id: HashMap<i64, String>,
    duplicate_names_dropped: usize,
}

impl TaxonomyIndex {
    pub fn from_entries(entries: impl IntoIterator<Item = SkillEntry>) -> Self {
        let mut index = TaxonomyIndex::default();
        for entry in entries {
            index.insert(entry);
        }
        index
    }

    fn insert(&mut self, entry: SkillEntry) {
        let key = entry.name.to_lowercase();
        if self.by_name.contains_key(&key) {
            debug!(
                "Dropping taxonomy row {} '{}': name already indexed",
                entry.id, entry.name
            );
            self.duplicate_names_dropped += 1;
            return;
        }
        self.by_name.insert(key, entry.id);
        self.by_id
            .entry(entry.id)
            .or_insert_with(|| entry.name.clone());
        self.entries.push(entry);
    }

    /// Case-insensitive name lookup.
    #[allow(dead_code)]
    pub fn id_for(&self, name: &str) -> Option<i64> {
        self.by_name.get(&name.to_lowercase()).copied()
    }

    pub fn name_for(&self, id: i64) -> Option<&str> {
        self.by_id.get(&id).map(String::as_str)
    }

    /// Indexed names in insertion order, synonyms of an earlier id included.
    pub fn entries(&self) -> &[SkillEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn duplicate_names_dropped(&self) -> usize {
        self.duplicate_names_dropped
    }

    /// Number of distinct skill ids behind the indexed names.
    pub fn distinct_ids(&self) -> usize {
        self.by_id.len()
    }
}

/// Fetches the full taxonomy and indexes it.
pub async fn load_taxonomy(
    store: &dyn QueryStore,
    bucket: &str,
) -> Result<TaxonomyIndex, StoreError> {
    let rows = store.execute(&statements::select_skills(bucket)).await?;

    let entries = rows
        .into_iter()
        .map(|row| {
            serde_json::from_value::<SkillRow>(row.clone())
                .map(SkillEntry::from)
                .map_err(|e| StoreError::ResponseMalformed(format!("skill row {row}: {e}")))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let total = entries.len();
    let index = TaxonomyIndex::from_entries(entries);
    info!(
        "Taxonomy loaded: {} rows, {} names over {} skill ids, {} duplicate names dropped",
        total,
        index.len(),
        index.distinct_ids(),
        index.duplicate_names_dropped()
    );
    Ok(index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;

    fn entry(id: i64, name: &str) -> SkillEntry {
        SkillEntry {
            id,
            name: name.to_string(),
        }
    }

    #[test]
    fn test_first_name_wins_case_insensitively() {
        let index = TaxonomyIndex::from_entries(vec![
            entry(1, "Python"),
            entry(2, "python"),
            entry(3, "Java"),
        ]);
        assert_eq!(index.len(), 2);
        assert_eq!(index.id_for("python"), Some(1));
        assert_eq!(index.id_for("PYTHON"), Some(1));
        assert_eq!(index.id_for("java"), Some(3));
        assert_eq!(index.name_for(2), None);
        assert_eq!(index.duplicate_names_dropped(), 1);
    }

    #[test]
    fn test_inverse_keeps_original_casing() {
        let index = TaxonomyIndex::from_entries(vec![entry(10, "Python Programming")]);
        assert_eq!(index.name_for(10), Some("Python Programming"));
    }

    #[test]
    fn test_iteration_follows_input_order() {
        let index =
            TaxonomyIndex::from_entries(vec![entry(30, "Java"), entry(10, "Python"), entry(20, "SQL")]);
        let ids: Vec<i64> = index.entries().iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![30, 10, 20]);
    }

    #[test]
    fn test_repeated_id_indexes_synonym_and_keeps_first_name() {
        let index = TaxonomyIndex::from_entries(vec![entry(1, "Python"), entry(1, "Py")]);
        assert_eq!(index.id_for("py"), Some(1));
        assert_eq!(index.id_for("python"), Some(1));
        assert_eq!(index.name_for(1), Some("Python"));
        assert_eq!(index.len(), 2);
        assert_eq!(index.distinct_ids(), 1);
        assert_eq!(index.duplicate_names_dropped(), 0);
    }

    #[test]
    fn test_build_is_deterministic_for_fixed_order() {
        let rows = vec![entry(1, "Rust"), entry(2, "rust"), entry(3, "Go")];
        let a = TaxonomyIndex::from_entries(rows.clone());
        let b = TaxonomyIndex::from_entries(rows);
        assert_eq!(a.entries(), b.entries());
    }

    #[tokio::test]
    async fn test_load_taxonomy_from_store() {
        let store = MemoryStore::with_skills(&[(1, "Python"), (2, "python"), (3, "Java")]);
        let index = load_taxonomy(&store, "hackathon").await.unwrap();
        assert_eq!(index.id_for("python"), Some(1));
        assert_eq!(index.id_for("java"), Some(3));
        assert_eq!(index.len(), 2);
    }

    #[tokio::test]
    async fn test_load_taxonomy_rejects_bad_rows() {
        let mut store = MemoryStore::default();
        store.skill_rows = vec![serde_json::json!({ "ID": "one", "SkillName": "Python" })];
        let err = load_taxonomy(&store, "hackathon").await.unwrap_err();
        assert!(matches!(err, StoreError::ResponseMalformed(_)));
    }

    #[tokio::test]
    async fn test_load_taxonomy_propagates_unavailable() {
        let store = MemoryStore {
            fail_select: Some(|| StoreError::Unavailable("status 503: down".to_string())),
            ..Default::default()
        };
        let err = load_taxonomy(&store, "hackathon").await.unwrap_err();
        assert!(matches!(err, StoreError::Unavailable(_)));
    }
}
