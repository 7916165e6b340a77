use serde::Serialize;

use crate::{
    error::{AppError, AppResult},
    models::{PreferenceRequest, RecommendationResult},
    services::{
        meal_planner::MealPlanner,
        providers::{ReplyProvider, TemplateReplyProvider},
    },
};

/// Outcome of one chat turn
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ChatOutcome {
    pub response: String,
    pub preferences: PreferenceRequest,
    pub meal_plan: RecommendationResult,
}

/// Handles a chat message: extract preferences, build the plan, then phrase a reply.
///
/// The plan is computed before the provider is called and no lock is held while
/// waiting on it. A failing provider degrades to the local template reply.
pub async fn converse(
    planner: &MealPlanner,
    provider: &dyn ReplyProvider,
    message: &str,
) -> AppResult<ChatOutcome> {
    let message = message.trim();
    if message.is_empty() {
        return Err(AppError::InvalidInput("Message cannot be empty".to_string()));
    }

    let preferences = planner.extract_preferences(message);
    let meal_plan = planner.recommend(&preferences)?;

    let response = match provider.compose_reply(message, &preferences, &meal_plan).await {
        Ok(reply) => reply,
        Err(e) => {
            tracing::warn!(
                error = %e,
                provider = provider.name(),
                "Assistant reply failed, using template reply"
            );
            TemplateReplyProvider::new().render(&preferences, &meal_plan)
        }
    };

    Ok(ChatOutcome {
        response,
        preferences,
        meal_plan,
    })
}
