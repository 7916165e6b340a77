use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Meal slot an item can be served in
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum MealCategory {
    Breakfast,
    Lunch,
    Dinner,
}

impl MealCategory {
    pub const ALL: [MealCategory; 3] = [
        MealCategory::Breakfast,
        MealCategory::Lunch,
        MealCategory::Dinner,
    ];

    /// Column header in the scraped catalog table
    pub fn column(&self) -> &'static str {
        match self {
            MealCategory::Breakfast => "Breakfast",
            MealCategory::Lunch => "Lunch",
            MealCategory::Dinner => "Dinner",
        }
    }
}

impl Display for MealCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MealCategory::Breakfast => write!(f, "breakfast"),
            MealCategory::Lunch => write!(f, "lunch"),
            MealCategory::Dinner => write!(f, "dinner"),
        }
    }
}

/// Dietary property a catalog item may carry
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DietaryTag {
    Vegan,
    GlutenFree,
    Vegetarian,
    Organic,
    Halal,
}

impl DietaryTag {
    /// Feature-space order of the dietary dimensions
    pub const FEATURE_ORDER: [DietaryTag; 5] = [
        DietaryTag::Vegan,
        DietaryTag::GlutenFree,
        DietaryTag::Vegetarian,
        DietaryTag::Organic,
        DietaryTag::Halal,
    ];

    /// Order used when rendering the restriction label
    pub const LABEL_ORDER: [DietaryTag; 5] = [
        DietaryTag::Vegan,
        DietaryTag::Vegetarian,
        DietaryTag::GlutenFree,
        DietaryTag::Halal,
        DietaryTag::Organic,
    ];

    /// Column header in the scraped catalog table
    pub fn column(&self) -> &'static str {
        match self {
            DietaryTag::Vegan => "Vegan",
            DietaryTag::GlutenFree => "Made Without Gluten",
            DietaryTag::Vegetarian => "Vegetarian",
            DietaryTag::Organic => "Organic",
            DietaryTag::Halal => "Halal",
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            DietaryTag::Vegan => "Vegan",
            DietaryTag::GlutenFree => "Gluten-Free",
            DietaryTag::Vegetarian => "Vegetarian",
            DietaryTag::Organic => "Organic",
            DietaryTag::Halal => "Halal",
        }
    }
}

/// Dietary tags attached to a catalog item
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DietaryTags {
    pub vegan: bool,
    pub gluten_free: bool,
    pub vegetarian: bool,
    pub organic: bool,
    pub halal: bool,
}

impl DietaryTags {
    pub fn has(&self, tag: DietaryTag) -> bool {
        match tag {
            DietaryTag::Vegan => self.vegan,
            DietaryTag::GlutenFree => self.gluten_free,
            DietaryTag::Vegetarian => self.vegetarian,
            DietaryTag::Organic => self.organic,
            DietaryTag::Halal => self.halal,
        }
    }

    pub fn set(&mut self, tag: DietaryTag, value: bool) {
        match tag {
            DietaryTag::Vegan => self.vegan = value,
            DietaryTag::GlutenFree => self.gluten_free = value,
            DietaryTag::Vegetarian => self.vegetarian = value,
            DietaryTag::Organic => self.organic = value,
            DietaryTag::Halal => self.halal = value,
        }
    }

    /// Comma-joined labels of the tags that are set, or "None"
    pub fn label(&self) -> String {
        let labels: Vec<&str> = DietaryTag::LABEL_ORDER
            .iter()
            .filter(|tag| self.has(**tag))
            .map(DietaryTag::label)
            .collect();

        if labels.is_empty() {
            "None".to_string()
        } else {
            labels.join(", ")
        }
    }
}

/// Meal categories an item belongs to
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct MealCategories {
    pub breakfast: bool,
    pub lunch: bool,
    pub dinner: bool,
}

impl MealCategories {
    pub fn contains(&self, category: MealCategory) -> bool {
        match category {
            MealCategory::Breakfast => self.breakfast,
            MealCategory::Lunch => self.lunch,
            MealCategory::Dinner => self.dinner,
        }
    }

    pub fn set(&mut self, category: MealCategory, value: bool) {
        match category {
            MealCategory::Breakfast => self.breakfast = value,
            MealCategory::Lunch => self.lunch = value,
            MealCategory::Dinner => self.dinner = value,
        }
    }
}

/// Per-serving nutrition facts
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Nutrition {
    pub calories: f64,
    pub total_fat: f64,
    pub total_carbs: f64,
    pub protein: f64,
}

/// One menu entry of the nutrition catalog
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogItem {
    pub name: String,
    pub meals: MealCategories,
    pub tags: DietaryTags,
    pub nutrition: Nutrition,
}
