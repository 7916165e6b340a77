//! Constrained nearest-neighbour ranking over the catalog feature space.
//!
//! Scores every row by cosine similarity to the scaled query, removes rows the
//! eligibility mask rejects, then for each meal category perturbs the surviving
//! scores with a small uniform jitter and keeps the best few. The jitter makes
//! repeated identical requests return varied plans; pass a seeded RNG or a zero
//! jitter to get a reproducible ordering.

use rand::Rng;

use crate::models::{MealCategory, MealRecommendation, RecommendationResult};

use super::catalog::Catalog;
use super::features::{cosine_similarity, FeatureSpace};
use super::synthesizer::SynthesizedQuery;

/// Score assigned to rows excluded by the eligibility mask
pub const INELIGIBLE: f64 = f64::NEG_INFINITY;

pub const DEFAULT_JITTER: f64 = 0.1;
pub const DEFAULT_MEALS_PER_CATEGORY: usize = 5;

/// Tunables for the ranking step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankingOptions {
    /// Half-width of the uniform jitter band
    pub jitter: f64,
    /// Maximum items returned per meal category
    pub per_category: usize,
}

impl Default for RankingOptions {
    fn default() -> Self {
        Self {
            jitter: DEFAULT_JITTER,
            per_category: DEFAULT_MEALS_PER_CATEGORY,
        }
    }
}

/// Ranks catalog rows against a synthesized query
#[derive(Debug, Clone, Copy, Default)]
pub struct RankingEngine {
    options: RankingOptions,
}

impl RankingEngine {
    pub fn new(options: RankingOptions) -> Self {
        Self { options }
    }

    /// Cosine similarity of the scaled query to every scaled catalog row,
    /// with ineligible rows set to [`INELIGIBLE`]
    pub fn score(&self, space: &FeatureSpace, query: &SynthesizedQuery) -> Vec<f64> {
        let target = space.scale(&query.target);

        space
            .scaled_rows()
            .iter()
            .zip(&query.eligible)
            .map(|(row, eligible)| {
                if *eligible {
                    cosine_similarity(&target, row)
                } else {
                    INELIGIBLE
                }
            })
            .collect()
    }

    /// Picks the highest jittered scores among rows accepted by `in_category`.
    ///
    /// Rows whose unperturbed score is [`INELIGIBLE`] are never returned, whatever
    /// the jitter draws. Equal jittered scores keep catalog order.
    pub fn select_top<R, F>(&self, scores: &[f64], in_category: F, rng: &mut R) -> Vec<usize>
    where
        R: Rng + ?Sized,
        F: Fn(usize) -> bool,
    {
        let jitter = self.options.jitter;

        let mut candidates: Vec<(usize, f64)> = scores
            .iter()
            .enumerate()
            .filter(|(index, score)| **score != INELIGIBLE && in_category(*index))
            .map(|(index, score)| {
                let noise = if jitter > 0.0 {
                    rng.random_range(-jitter..=jitter)
                } else {
                    0.0
                };
                (index, score + noise)
            })
            .collect();

        candidates.sort_by(|a, b| b.1.total_cmp(&a.1));
        candidates.truncate(self.options.per_category);

        candidates.into_iter().map(|(index, _)| index).collect()
    }

    /// Full ranking: score, then select and project per meal category
    pub fn rank<R>(
        &self,
        catalog: &Catalog,
        space: &FeatureSpace,
        query: &SynthesizedQuery,
        rng: &mut R,
    ) -> RecommendationResult
    where
        R: Rng + ?Sized,
    {
        let scores = self.score(space, query);
        let rows = catalog.rows();
        let mut result = RecommendationResult::default();

        for category in MealCategory::ALL {
            let selected = self.select_top(&scores, |index| rows[index].meals.contains(category), rng);

            tracing::debug!(
                category = %category,
                selected = selected.len(),
                "Category ranked"
            );

            let items = selected
                .into_iter()
                .map(|index| MealRecommendation::from(&rows[index]))
                .collect();
            result.set(category, items);
        }

        result
    }
}
