// Candidate summary prompt templates.

use std::fmt::Write;

use crate::summary::SystemInstruction;

pub const SUMMARY_CLOSING: &str = "Analyze the provided candidate data and generate a summary.";

/// Renders the configured role, task, tone and style guide into one system instruction.
pub fn summary_system_prompt(instruction: &SystemInstruction) -> String {
    let mut prompt = format!(
        "You are acting as an {}.\nTask: {}\nTone: {}\n\nStyle Guide:\n\
         - Follow this example structure: \"{}\"\n- Requirements:\n",
        instruction.role, instruction.task, instruction.tone, instruction.style_guide.example
    );
    for requirement in &instruction.style_guide.requirements {
        let _ = writeln!(prompt, "  * {requirement}");
    }
    prompt.push('\n');
    prompt.push_str(SUMMARY_CLOSING);
    prompt
}
