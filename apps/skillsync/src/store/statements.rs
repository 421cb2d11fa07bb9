// N1QL statements used against the store. Values always travel as named
// parameters; only the bucket and collection names are interpolated.

use serde_json::json;

use super::Query;
use crate::models::candidate::{CandidateDoc, CandidateSkillDoc};

/// Collections included in a full data dump, paired with their output field.
pub const DUMP_COLLECTIONS: &[(&str, &str)] = &[
    ("Skill", "skills"),
    ("Candidate", "candidates"),
    ("CandidateSkill", "candidate_skills"),
    ("Ad", "ads"),
    ("AdSkill", "ad_skills"),
];

fn keyspace(bucket: &str, collection: &str) -> String {
    format!("`{bucket}`._default.{collection}")
}

pub fn select_skills(bucket: &str) -> Query {
    Query::new(format!(
        "SELECT ID, SkillName FROM {}",
        keyspace(bucket, "Skill")
    ))
}

pub fn update_cv_text(bucket: &str, candidate_id: i64, cv_text: &str) -> Query {
    Query::new(format!(
        "UPDATE {} SET CVText = $cvText WHERE ID = $cId",
        keyspace(bucket, "Candidate")
    ))
    .param("cvText", cv_text)
    .param("cId", candidate_id)
}

pub fn upsert_candidate_skill(bucket: &str, link: &CandidateSkillDoc) -> Query {
    Query::new(format!(
        "UPSERT INTO {} (KEY, VALUE) VALUES ($key, {{ \"CandidateID\": $cId, \"SkillID\": $sId, \"Level\": $level }})",
        keyspace(bucket, "CandidateSkill")
    ))
    .param("key", link.key())
    .param("cId", link.candidate_id)
    .param("sId", link.skill_id)
    .param("level", link.level)
}

pub fn insert_candidate(bucket: &str, candidate: &CandidateDoc) -> Query {
    Query::new(format!(
        "INSERT INTO {} (KEY, VALUE) VALUES ($key, $doc)",
        keyspace(bucket, "Candidate")
    ))
    .param("key", candidate.key())
    .param("doc", json!(candidate))
}

pub fn select_all(bucket: &str, collection: &str) -> Query {
    Query::new(format!(
        "SELECT VALUE t FROM {} t",
        keyspace(bucket, collection)
    ))
}
