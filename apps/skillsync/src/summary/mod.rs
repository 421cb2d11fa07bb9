//! Candidate summaries: a free-text profile written by the chat model from
//! candidate data, steered by a JSON prompt config loaded at startup.

pub mod handlers;
pub mod prompts;

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::llm_client::{Classifier, LlmError};

#[derive(Debug, Error)]
pub enum SummaryConfigError {
    #[error("Failed to read prompt config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid prompt config {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Shape of the prompt config file (`prompt.json`).
#[derive(Debug, Clone, Deserialize)]
pub struct SummaryPromptConfig {
    pub system_instruction: SystemInstruction,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SystemInstruction {
    pub role: String,
    pub task: String,
    pub tone: String,
    pub style_guide: StyleGuide,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StyleGuide {
    pub example: String,
    #[serde(default)]
    pub requirements: Vec<String>,
}

pub fn load_prompt_config(path: &Path) -> Result<SummaryPromptConfig, SummaryConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|source| SummaryConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let config = serde_json::from_str(&raw).map_err(|source| SummaryConfigError::Parse {
        path: path.display().to_string(),
        source,
    })?;
    info!("Summary prompt config loaded from {}", path.display());
    Ok(config)
}

/// Asks the model for a summary of `candidate_data`. The reply is returned verbatim.
pub async fn generate_summary(
    classifier: &dyn Classifier,
    config: &SummaryPromptConfig,
    candidate_data: &str,
) -> Result<String, LlmError> {
    let system = prompts::summary_system_prompt(&config.system_instruction);
    let summary = classifier.complete(&system, candidate_data).await?;
    debug!("Summary generated ({} chars)", summary.chars().count());
    Ok(summary)
}

#[cfg(test)]
pub mod testing {
    use super::*;

    pub fn prompt_config() -> SummaryPromptConfig {
        SummaryPromptConfig {
            system_instruction: SystemInstruction {
                role: "experienced HR analyst".to_string(),
                task: "Summarize the candidate for a hiring manager".to_string(),
                tone: "Professional".to_string(),
                style_guide: StyleGuide {
                    example: "Seasoned engineer with 8 years in ...".to_string(),
                    requirements: vec![
                        "At most three sentences".to_string(),
                        "Mention the strongest skills".to_string(),
                    ],
                },
            },
        }
    }
}
