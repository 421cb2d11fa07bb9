// Skill Matcher prompt templates.

use std::fmt::Write;

use crate::llm_client::prompts::JSON_ID_ARRAY_ONLY;
use crate::taxonomy::TaxonomyIndex;

pub const MATCH_SYSTEM_INTRO: &str = "You are an expert technical recruiter. \
You will receive a CV and a list of standardized skills (ID: Name). \
Your job is to identify which of the standardized skills are present in the CV. \
Use synonym matching (e.g. 'Python' -> 'Python Programming'). \
Only answer with IDs that appear in the list.";

/// The system instruction: task framing plus the output constraint.
pub fn match_system_prompt() -> String {
    format!("{MATCH_SYSTEM_INTRO} {JSON_ID_ARRAY_ONLY}")
}

/// One `id: name` line per indexed name, in index order.
pub fn render_skill_listing(taxonomy: &TaxonomyIndex) -> String {
    let mut listing = String::new();
    for entry in taxonomy.entries() {
        // Writing to a String cannot fail.
        let _ = writeln!(listing, "{}: {}", entry.id, entry.name);
    }
    listing
}

/// The user payload: full taxonomy listing followed by the full CV text.
pub fn match_user_prompt(taxonomy: &TaxonomyIndex, cv_text: &str) -> String {
    format!(
        "AVAILABLE SKILLS:\n{}\nCV TEXT:\n{}\n\nReturn JSON Array of IDs:",
        render_skill_listing(taxonomy),
        cv_text
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::skill::SkillEntry;

    fn taxonomy() -> TaxonomyIndex {
        TaxonomyIndex::from_entries(vec![
            SkillEntry { id: 10, name: "Python Programming".to_string() },
            SkillEntry { id: 20, name: "SQL".to_string() },
            SkillEntry { id: 21, name: "sql".to_string() },
        ])
    }

    #[test]
    fn test_listing_one_line_per_distinct_skill() {
        assert_eq!(
            render_skill_listing(&taxonomy()),
            "10: Python Programming\n20: SQL\n"
        );
    }

    #[test]
    fn test_listing_includes_synonyms_of_one_id() {
        let taxonomy = TaxonomyIndex::from_entries(vec![
            SkillEntry { id: 1, name: "Python".to_string() },
            SkillEntry { id: 1, name: "Py".to_string() },
        ]);
        assert_eq!(render_skill_listing(&taxonomy), "1: Python\n1: Py\n");
    }

    #[test]
    fn test_user_prompt_has_listing_then_cv() {
        let prompt = match_user_prompt(&taxonomy(), "I know Python.");
        let listing_at = prompt.find("10: Python Programming").unwrap();
        let cv_at = prompt.find("I know Python.").unwrap();
        assert!(listing_at < cv_at);
        assert!(prompt.ends_with("Return JSON Array of IDs:"));
    }

    #[test]
    fn test_system_prompt_constrains_output_and_allows_synonyms() {
        let system = match_system_prompt();
        assert!(system.contains("synonym"));
        assert!(system.contains("JSON array"));
    }

    #[test]
    fn test_prompt_is_deterministic() {
        let t = taxonomy();
        assert_eq!(match_user_prompt(&t, "cv"), match_user_prompt(&t, "cv"));
    }
}
