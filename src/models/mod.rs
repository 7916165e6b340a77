pub mod catalog_item;
pub mod preferences;
pub mod recommendation;

pub use catalog_item::{CatalogItem, DietaryTag, DietaryTags, MealCategories, MealCategory, Nutrition};
pub use preferences::{
    MealPlanRequest, NumericField, PreferenceRequest, DEFAULT_TARGET_CALORIES,
    DEFAULT_TARGET_PROTEIN,
};
pub use recommendation::{MealRecommendation, RecommendationResult};
