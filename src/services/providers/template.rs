use crate::{
    error::AppResult,
    models::{MealCategory, PreferenceRequest, RecommendationResult},
    services::providers::ReplyProvider,
};

/// Local reply built from the extracted preferences and the plan; never fails
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateReplyProvider;

impl TemplateReplyProvider {
    pub fn new() -> Self {
        Self
    }

    /// Builds the reply text synchronously
    pub fn render(&self, preferences: &PreferenceRequest, meal_plan: &RecommendationResult) -> String {
        let restrictions = describe_restrictions(preferences);
        let mut reply = format!(
            "Here is a {}meal plan aiming for about {:.0} calories and {:.0}g of protein per day.",
            restrictions, preferences.target_calories, preferences.target_protein
        );

        if meal_plan.is_empty() {
            reply.push_str(
                " Unfortunately no menu items match all of those restrictions right now. \
                 Try relaxing one of them.",
            );
            return reply;
        }

        for category in MealCategory::ALL {
            let items = meal_plan.get(category);
            let listed = if items.is_empty() {
                "nothing available".to_string()
            } else {
                items
                    .iter()
                    .map(|item| item.name.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            };
            reply.push_str(&format!(" {}: {}.", capitalize(&category.to_string()), listed));
        }

        reply
    }
}

#[async_trait::async_trait]
impl ReplyProvider for TemplateReplyProvider {
    async fn compose_reply(
        &self,
        _message: &str,
        preferences: &PreferenceRequest,
        meal_plan: &RecommendationResult,
    ) -> AppResult<String> {
        Ok(self.render(preferences, meal_plan))
    }

    fn name(&self) -> &'static str {
        "template"
    }
}

fn describe_restrictions(preferences: &PreferenceRequest) -> String {
    let mut labels = Vec::new();
    if preferences.vegan {
        labels.push("vegan");
    } else if preferences.vegetarian {
        labels.push("vegetarian");
    }
    if preferences.gluten_free {
        labels.push("gluten-free");
    }
    if preferences.halal {
        labels.push("halal");
    }

    if labels.is_empty() {
        String::new()
    } else {
        format!("{} ", labels.join(", "))
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
