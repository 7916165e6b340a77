/// OpenAI-compatible chat completions provider
///
/// Sends the user's message together with a compact summary of the locally computed
/// meal plan, and asks the model to phrase a short reply. The plan itself is never
/// produced by the model.
///
/// API Flow:
/// 1. POST {api_url}/chat/completions with a system prompt and the user message
/// 2. Read choices[0].message.content as the reply
use std::time::Duration;

use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};

use crate::{
    error::{AppError, AppResult},
    models::{MealCategory, PreferenceRequest, RecommendationResult},
    services::providers::ReplyProvider,
};

const SYSTEM_PROMPT: &str = "You are a friendly campus dining assistant. \
Explain the meal plan you are given in two or three sentences. \
Only mention menu items that appear in the plan.";

#[derive(Clone)]
pub struct ChatCompletionsProvider {
    http_client: HttpClient,
    api_url: String,
    api_key: String,
    model: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

impl ChatCompletionsProvider {
    /// Creates a provider whose requests give up after `timeout`
    pub fn new(api_url: String, api_key: String, model: String, timeout: Duration) -> AppResult<Self> {
        let http_client = HttpClient::builder().timeout(timeout).build()?;

        Ok(Self {
            http_client,
            api_url: api_url.trim_end_matches('/').to_string(),
            api_key,
            model,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.api_url)
    }

    /// Plain-text description of the preferences and plan for the model
    fn describe_plan(preferences: &PreferenceRequest, meal_plan: &RecommendationResult) -> String {
        let mut lines = vec![format!(
            "Preferences: vegan={}, vegetarian={}, gluten_free={}, halal={}, \
             daily calories={:.0}, daily protein={:.0}g",
            preferences.vegan,
            preferences.vegetarian,
            preferences.gluten_free,
            preferences.halal,
            preferences.target_calories,
            preferences.target_protein
        )];

        for category in MealCategory::ALL {
            let items = meal_plan.get(category);
            if items.is_empty() {
                lines.push(format!("{}: no matching items", category));
                continue;
            }
            let listed: Vec<String> = items
                .iter()
                .map(|item| {
                    format!(
                        "{} ({:.0} kcal, {:.0}g protein, {})",
                        item.name, item.calories, item.protein, item.dietary_restrictions
                    )
                })
                .collect();
            lines.push(format!("{}: {}", category, listed.join("; ")));
        }

        lines.join("\n")
    }

    fn parse_reply(response: ChatResponse) -> AppResult<String> {
        response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or_else(|| AppError::ExternalApi("Assistant returned an empty reply".to_string()))
    }
}

#[async_trait::async_trait]
impl ReplyProvider for ChatCompletionsProvider {
    async fn compose_reply(
        &self,
        message: &str,
        preferences: &PreferenceRequest,
        meal_plan: &RecommendationResult,
    ) -> AppResult<String> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: format!(
                        "{}\n\nMeal plan:\n{}",
                        message,
                        Self::describe_plan(preferences, meal_plan)
                    ),
                },
            ],
            temperature: 0.7,
        };

        let response = self
            .http_client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "Assistant API returned status {}: {}",
                status, body
            )));
        }

        let response_text = response.text().await?;
        let parsed: ChatResponse = serde_json::from_str(&response_text).map_err(|e| {
            tracing::error!(
                error = %e,
                response = %response_text,
                "Failed to deserialize assistant response"
            );
            AppError::ExternalApi(format!("Failed to parse assistant response: {}", e))
        })?;

        let reply = Self::parse_reply(parsed)?;

        tracing::info!(
            provider = "chat_completions",
            model = %self.model,
            reply_chars = reply.len(),
            "Assistant reply received"
        );

        Ok(reply)
    }

    fn name(&self) -> &'static str {
        "chat_completions"
    }
}
