pub mod assistant;
pub mod catalog;
pub mod extractor;
pub mod features;
pub mod meal_planner;
pub mod providers;
pub mod ranking;
pub mod snapshot;
pub mod synthesizer;

pub use catalog::Catalog;
pub use extractor::extract_preferences;
pub use meal_planner::MealPlanner;
pub use ranking::{RankingEngine, RankingOptions};
pub use snapshot::{CatalogSnapshot, SnapshotHandle};
