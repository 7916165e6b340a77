use serde::{Deserialize, Serialize};

use super::{CatalogItem, MealCategory};

/// A recommended catalog item as returned to the client
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MealRecommendation {
    pub name: String,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub dietary_restrictions: String,
}

impl From<&CatalogItem> for MealRecommendation {
    fn from(item: &CatalogItem) -> Self {
        Self {
            name: item.name.clone(),
            calories: item.nutrition.calories,
            protein: item.nutrition.protein,
            carbs: item.nutrition.total_carbs,
            fat: item.nutrition.total_fat,
            dietary_restrictions: item.tags.label(),
        }
    }
}

/// Ranked recommendations per meal category
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RecommendationResult {
    pub breakfast: Vec<MealRecommendation>,
    pub lunch: Vec<MealRecommendation>,
    pub dinner: Vec<MealRecommendation>,
}

impl RecommendationResult {
    pub fn get(&self, category: MealCategory) -> &[MealRecommendation] {
        match category {
            MealCategory::Breakfast => &self.breakfast,
            MealCategory::Lunch => &self.lunch,
            MealCategory::Dinner => &self.dinner,
        }
    }

    pub fn set(&mut self, category: MealCategory, items: Vec<MealRecommendation>) {
        match category {
            MealCategory::Breakfast => self.breakfast = items,
            MealCategory::Lunch => self.lunch = items,
            MealCategory::Dinner => self.dinner = items,
        }
    }

    /// Total number of items across all categories
    pub fn len(&self) -> usize {
        self.breakfast.len() + self.lunch.len() + self.dinner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
