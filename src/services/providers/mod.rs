/// Conversational reply providers
///
/// The chat endpoint turns a user's message into preferences and a meal plan locally,
/// then asks a provider to phrase the reply. Providers are pluggable: a remote
/// chat-completions API, or the local template used when no API is configured or the
/// remote call fails.
use crate::{
    error::AppResult,
    models::{PreferenceRequest, RecommendationResult},
};

pub mod chat_completions;
pub mod template;

pub use chat_completions::ChatCompletionsProvider;
pub use template::TemplateReplyProvider;

/// Trait for assistant reply providers
///
/// Implementations may perform network I/O and may be slow or fail; callers must not
/// hold locks across `compose_reply`.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ReplyProvider: Send + Sync {
    /// Compose a natural-language reply for the user's message and the plan built for it
    async fn compose_reply(
        &self,
        message: &str,
        preferences: &PreferenceRequest,
        meal_plan: &RecommendationResult,
    ) -> AppResult<String>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
