use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::Classifier;
use crate::pipeline::Pipeline;
use crate::store::QueryStore;
use crate::summary::SummaryPromptConfig;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn QueryStore>,
    /// `None` when no model API key is configured; processing routes then
    /// answer 503 while the data routes keep working.
    pub pipeline: Option<Pipeline>,
    /// Chat model for candidate summaries; `None` without an API key.
    pub summarizer: Option<Arc<dyn Classifier>>,
    /// `None` when the prompt config file was missing or invalid at startup.
    pub summary_prompt: Option<Arc<SummaryPromptConfig>>,
    pub config: Config,
}
