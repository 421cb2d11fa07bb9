use serde::{Deserialize, Serialize};

/// A single taxonomy row as returned by the query service.
#[derive(Debug, Clone, Deserialize)]
pub struct SkillRow {
    #[serde(rename = "ID")]
    pub id: i64,
    #[serde(rename = "SkillName")]
    pub name: String,
}

/// A taxonomy entry. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SkillEntry {
    pub id: i64,
    pub name: String,
}

impl From<SkillRow> for SkillEntry {
    fn from(row: SkillRow) -> Self {
        SkillEntry {
            id: row.id,
            name: row.name,
        }
    }
}

/// A taxonomy entry the classifier confirmed is present in a CV.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MatchedSkill {
    pub id: i64,
    pub name: String,
}
