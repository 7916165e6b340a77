use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use rand::Rng;

use crate::{
    error::AppResult,
    models::{PreferenceRequest, RecommendationResult},
};

use super::extractor;
use super::ranking::{RankingEngine, RankingOptions};
use super::snapshot::{CatalogSnapshot, SnapshotHandle};
use super::synthesizer::synthesize;

/// Recommendation entry points over the active catalog snapshot
#[derive(Clone)]
pub struct MealPlanner {
    snapshots: SnapshotHandle,
    engine: RankingEngine,
}

impl MealPlanner {
    pub fn new(snapshot: CatalogSnapshot, options: RankingOptions) -> Self {
        Self {
            snapshots: SnapshotHandle::new(snapshot),
            engine: RankingEngine::new(options),
        }
    }

    /// The snapshot requests are currently served from
    pub fn snapshot(&self) -> Arc<CatalogSnapshot> {
        self.snapshots.current()
    }

    /// Recommends up to N items per meal category using the thread-local RNG for jitter
    pub fn recommend(&self, prefs: &PreferenceRequest) -> AppResult<RecommendationResult> {
        self.recommend_with_rng(prefs, &mut rand::rng())
    }

    /// Same as [`MealPlanner::recommend`] with a caller-supplied jitter source
    pub fn recommend_with_rng<R>(
        &self,
        prefs: &PreferenceRequest,
        rng: &mut R,
    ) -> AppResult<RecommendationResult>
    where
        R: Rng + ?Sized,
    {
        prefs.validate()?;

        let start = Instant::now();
        let snapshot = self.snapshots.current();
        let catalog = snapshot.catalog();

        let query = synthesize(prefs, catalog);
        let eligible = query.eligible_count();
        if eligible == 0 {
            tracing::info!("No catalog rows satisfy the dietary restrictions");
        }

        let result = self.engine.rank(catalog, snapshot.features(), &query, rng);

        tracing::info!(
            eligible,
            breakfast = result.breakfast.len(),
            lunch = result.lunch.len(),
            dinner = result.dinner.len(),
            processing_time_us = start.elapsed().as_micros() as u64,
            "Recommendations generated"
        );

        Ok(result)
    }

    /// Parses free text into structured preferences
    pub fn extract_preferences(&self, text: &str) -> PreferenceRequest {
        extractor::extract_preferences(text)
    }

    /// Rebuilds the snapshot from `path` and swaps it in.
    ///
    /// On failure the current snapshot keeps serving. Returns the new row count.
    pub fn reload(&self, path: impl AsRef<Path>) -> AppResult<usize> {
        let path = path.as_ref();
        let snapshot = CatalogSnapshot::load(path).map_err(|e| {
            tracing::error!(error = %e, path = %path.display(), "Catalog reload failed");
            e
        })?;

        let rows = snapshot.catalog().row_count();
        let previous = self.snapshots.replace(snapshot);

        tracing::info!(
            previous_rows = previous.catalog().row_count(),
            rows,
            "Catalog snapshot replaced"
        );

        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::models::{MealCategory, DEFAULT_TARGET_CALORIES};
    use crate::services::catalog::Catalog;
    use rand::{rngs::StdRng, SeedableRng};
    use std::collections::HashSet;

    const MENU: &str = "\
Food Name,Calories,Total Fat,Total Carbohydrates,Protein,Vegan,Made Without Gluten,Vegetarian,Organic,Halal,Breakfast,Lunch,Dinner
Tofu Scramble,320,15,14,22,T,T,T,F,F,T,F,F
Oatmeal Bar,210,5,36,6,T,F,T,T,F,T,F,F
Veggie Omelet,380,24,8,26,F,T,T,F,F,T,F,F
Bacon Biscuit,520,30,40,18,F,F,F,F,F,T,F,F
Lentil Soup,260,4,38,16,T,T,T,T,F,F,T,T
Falafel Wrap,610,24,72,20,T,F,T,F,T,F,T,T
Grilled Chicken,450,12,6,48,F,T,F,F,T,F,T,T
Cheese Pizza,700,28,80,30,F,F,T,F,F,F,T,T
Beef Burger,820,45,50,42,F,F,F,F,F,F,T,T
Quinoa Bowl,540,16,78,18,T,T,T,T,F,F,T,T
";

    fn planner(jitter: f64) -> MealPlanner {
        let catalog = Catalog::from_reader(MENU.as_bytes()).unwrap();
        MealPlanner::new(
            CatalogSnapshot::new(catalog),
            RankingOptions {
                jitter,
                per_category: 5,
            },
        )
    }

    fn names(result: &RecommendationResult, category: MealCategory) -> HashSet<String> {
        result.get(category).iter().map(|r| r.name.clone()).collect()
    }

    #[test]
    fn test_vegan_results_are_vegan_and_vegetarian() {
        let planner = planner(0.1);
        let prefs = PreferenceRequest {
            vegan: true,
            ..Default::default()
        };
        let result = planner.recommend(&prefs).unwrap();

        let catalog_snapshot = planner.snapshot();
        for category in MealCategory::ALL {
            for rec in result.get(category) {
                let item = catalog_snapshot
                    .catalog()
                    .rows()
                    .iter()
                    .find(|i| i.name == rec.name)
                    .unwrap();
                assert!(item.tags.vegan && item.tags.vegetarian, "{} is not vegan", rec.name);
                assert!(item.meals.contains(category));
            }
        }
        assert_eq!(
            names(&result, MealCategory::Breakfast),
            HashSet::from(["Tofu Scramble".to_string(), "Oatmeal Bar".to_string()])
        );
    }

    #[test]
    fn test_eligible_set_stable_across_calls() {
        let planner = planner(0.1);
        let prefs = PreferenceRequest {
            gluten_free: true,
            ..Default::default()
        };

        let first = planner.recommend(&prefs).unwrap();
        for _ in 0..20 {
            let next = planner.recommend(&prefs).unwrap();
            // fewer than five eligible rows per category, so every call returns all of them
            for category in MealCategory::ALL {
                assert_eq!(names(&first, category), names(&next, category));
            }
        }
    }

    #[test]
    fn test_halal_without_halal_breakfast_is_empty_not_error() {
        let planner = planner(0.1);
        let prefs = PreferenceRequest {
            halal: true,
            ..Default::default()
        };
        let result = planner.recommend(&prefs).unwrap();
        assert!(result.breakfast.is_empty());
        assert!(!result.lunch.is_empty());
    }

    #[test]
    fn test_output_bounded_to_five() {
        let planner = planner(0.1);
        let result = planner.recommend(&PreferenceRequest::default()).unwrap();
        assert_eq!(result.breakfast.len(), 4);
        assert_eq!(result.lunch.len(), 5);
        assert_eq!(result.dinner.len(), 5);
    }

    #[test]
    fn test_invalid_targets_rejected() {
        let planner = planner(0.1);
        let prefs = PreferenceRequest {
            target_calories: -1.0,
            ..Default::default()
        };
        let err = planner.recommend(&prefs).unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[test]
    fn test_seeded_jitter_is_reproducible() {
        let planner = planner(0.1);
        let prefs = PreferenceRequest {
            target_calories: DEFAULT_TARGET_CALORIES,
            ..Default::default()
        };
        let a = planner
            .recommend_with_rng(&prefs, &mut StdRng::seed_from_u64(2024))
            .unwrap();
        let b = planner
            .recommend_with_rng(&prefs, &mut StdRng::seed_from_u64(2024))
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_extract_then_recommend() {
        let planner = planner(0.0);
        let prefs = planner.extract_preferences("vegan please, 1500 calories, 60g protein");
        assert!(prefs.vegan && prefs.vegetarian);
        let result = planner.recommend(&prefs).unwrap();
        assert!(result
            .lunch
            .iter()
            .all(|r| r.dietary_restrictions.starts_with("Vegan, Vegetarian")));
    }

    #[test]
    fn test_reload_failure_keeps_current_snapshot() {
        let planner = planner(0.1);
        let before = planner.snapshot();
        assert!(planner.reload("/nonexistent/menu.csv").is_err());
        assert!(Arc::ptr_eq(&before, &planner.snapshot()));
    }
}
