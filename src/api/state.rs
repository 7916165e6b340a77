use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::{
    config::Config,
    error::AppResult,
    services::{
        providers::{ChatCompletionsProvider, ReplyProvider, TemplateReplyProvider},
        CatalogSnapshot, MealPlanner, RankingOptions,
    },
};

/// Shared application state
///
/// The planner owns the catalog snapshot; handlers take their own `Arc` of it per
/// request, so nothing here needs a request-scoped lock.
#[derive(Clone)]
pub struct AppState {
    pub planner: MealPlanner,
    pub assistant: Arc<dyn ReplyProvider>,
    /// Source file for catalog reloads; `None` for in-memory catalogs
    pub catalog_path: Option<PathBuf>,
}

impl AppState {
    pub fn new(
        planner: MealPlanner,
        assistant: Arc<dyn ReplyProvider>,
        catalog_path: Option<PathBuf>,
    ) -> Self {
        Self {
            planner,
            assistant,
            catalog_path,
        }
    }

    /// Loads the catalog and wires providers from configuration
    pub fn from_config(config: &Config) -> AppResult<Self> {
        let snapshot = CatalogSnapshot::load(&config.catalog_path)?;
        let planner = MealPlanner::new(
            snapshot,
            RankingOptions {
                jitter: config.recommendation_jitter,
                per_category: config.meals_per_category,
            },
        );

        let assistant: Arc<dyn ReplyProvider> = match config.assistant_key() {
            Some(key) => Arc::new(ChatCompletionsProvider::new(
                config.assistant_api_url.clone(),
                key.to_string(),
                config.assistant_model.clone(),
                Duration::from_secs(config.assistant_timeout_secs),
            )?),
            None => Arc::new(TemplateReplyProvider::new()),
        };

        tracing::info!(
            provider = assistant.name(),
            jitter = config.recommendation_jitter,
            meals_per_category = config.meals_per_category,
            "Application state initialized"
        );

        Ok(Self::new(
            planner,
            assistant,
            Some(PathBuf::from(&config.catalog_path)),
        ))
    }
}
