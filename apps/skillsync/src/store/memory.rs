//! In-memory `QueryStore` for tests. Understands just enough of the statements
//! in `statements.rs` to behave like the real store: keyed upserts overwrite,
//! selects return canned rows.

use std::collections::{BTreeMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use super::{Query, QueryStore, StoreError};

#[derive(Default)]
pub struct MemoryStore {
    pub skill_rows: Vec<Value>,
    /// Documents written by UPSERT/INSERT, keyed by document key.
    pub documents: Mutex<BTreeMap<String, Value>>,
    /// Candidate id → CVText written by UPDATE.
    pub cv_texts: Mutex<BTreeMap<i64, String>>,
    pub executed: Mutex<Vec<String>>,
    pub fail_cv_update: bool,
    pub fail_skill_ids: HashSet<i64>,
    pub fail_select: Option<fn() -> StoreError>,
}

impl MemoryStore {
    pub fn with_skills(rows: &[(i64, &str)]) -> Self {
        Self {
            skill_rows: rows
                .iter()
                .map(|(id, name)| serde_json::json!({ "ID": id, "SkillName": name }))
                .collect(),
            ..Default::default()
        }
    }

    pub fn link_keys(&self) -> Vec<String> {
        self.documents
            .lock()
            .unwrap()
            .keys()
            .filter(|k| k.starts_with("candidateskill::"))
            .cloned()
            .collect()
    }

    pub fn executed(&self) -> Vec<String> {
        self.executed.lock().unwrap().clone()
    }
}

#[async_trait]
impl QueryStore for MemoryStore {
    async fn execute(&self, query: &Query) -> Result<Vec<Value>, StoreError> {
        let statement = query.statement.clone();
        self.executed.lock().unwrap().push(statement.clone());

        if statement.starts_with("SELECT ID, SkillName") {
            if let Some(make_err) = self.fail_select {
                return Err(make_err());
            }
            return Ok(self.skill_rows.clone());
        }

        if statement.starts_with("SELECT VALUE") {
            let docs = self.documents.lock().unwrap();
            return Ok(docs.values().cloned().collect());
        }

        if statement.starts_with("UPDATE") {
            if self.fail_cv_update {
                return Err(StoreError::Unavailable("status 500: cv update".to_string()));
            }
            let id = query.params["cId"].as_i64().unwrap_or_default();
            let text = query.params["cvText"].as_str().unwrap_or_default().to_string();
            self.cv_texts.lock().unwrap().insert(id, text);
            return Ok(vec![]);
        }

        if statement.starts_with("UPSERT") {
            let skill_id = query.params["sId"].as_i64().unwrap_or_default();
            if self.fail_skill_ids.contains(&skill_id) {
                return Err(StoreError::Unavailable(format!(
                    "status 500: upsert {skill_id}"
                )));
            }
            let key = query.params["key"].as_str().unwrap_or_default().to_string();
            self.documents
                .lock()
                .unwrap()
                .insert(key, Value::Object(query.params.clone()));
            return Ok(vec![]);
        }

        if statement.starts_with("INSERT") {
            let key = query.params["key"].as_str().unwrap_or_default().to_string();
            let mut docs = self.documents.lock().unwrap();
            if docs.contains_key(&key) {
                return Err(StoreError::Unavailable(format!(
                    "status 409: duplicate key {key}"
                )));
            }
            docs.insert(key, query.params["doc"].clone());
            return Ok(vec![]);
        }

        Err(StoreError::Unavailable(format!(
            "unsupported statement in MemoryStore: {statement}"
        )))
    }
}
