use serde::{Deserialize, Serialize};

/// Link level written for every matched skill. Ranking is not modelled yet.
pub const DEFAULT_SKILL_LEVEL: i64 = 1;

/// Candidate document as stored in the `Candidate` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateDoc {
    #[serde(rename = "ID")]
    pub id: i64,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Email")]
    pub email: String,
    #[serde(rename = "CVText")]
    pub cv_text: String,
}

impl CandidateDoc {
    pub fn key(&self) -> String {
        candidate_key(self.id)
    }
}

/// Link document in the `CandidateSkill` collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateSkillDoc {
    #[serde(rename = "CandidateID")]
    pub candidate_id: i64,
    #[serde(rename = "SkillID")]
    pub skill_id: i64,
    #[serde(rename = "Level")]
    pub level: i64,
}

impl CandidateSkillDoc {
    pub fn new(candidate_id: i64, skill_id: i64) -> Self {
        CandidateSkillDoc {
            candidate_id,
            skill_id,
            level: DEFAULT_SKILL_LEVEL,
        }
    }

    /// Document key; identical pairs always produce the same key so upserts overwrite.
    pub fn key(&self) -> String {
        candidate_skill_key(self.candidate_id, self.skill_id)
    }
}

/// Request body accepted by `POST /api/v1/candidates`. Every field is required,
/// but they are optional here so a missing field yields a 400 instead of a 422.
#[derive(Debug, Clone, Deserialize)]
pub struct NewCandidate {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub email: Option<String>,
    #[serde(rename = "cvText")]
    pub cv_text: Option<String>,
}

pub fn candidate_key(candidate_id: i64) -> String {
    format!("candidate::{candidate_id}")
}

pub fn candidate_skill_key(candidate_id: i64, skill_id: i64) -> String {
    format!("candidateskill::{candidate_id}::{skill_id}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidate_skill_key_format() {
        assert_eq!(candidate_skill_key(7, 42), "candidateskill::7::42");
    }

    #[test]
    fn test_link_doc_serializes_store_field_names() {
        let doc = CandidateSkillDoc::new(7, 42);
        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(
            value,
            serde_json::json!({ "CandidateID": 7, "SkillID": 42, "Level": 1 })
        );
    }

    #[test]
    fn test_new_candidate_missing_fields_deserialize_as_none() {
        let c: NewCandidate = serde_json::from_str(r#"{"id": 3, "name": "Ada"}"#).unwrap();
        assert_eq!(c.id, Some(3));
        assert!(c.email.is_none());
        assert!(c.cv_text.is_none());
    }
}
