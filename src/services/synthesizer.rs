use crate::models::{DietaryTag, PreferenceRequest};

use super::catalog::Catalog;
use super::features::{Feature, FeatureVector, FEATURE_DIMS};

/// Daily targets are spread evenly over this many meals
pub const MEALS_PER_DAY: f64 = 3.0;

/// Unscaled query vector plus the hard eligibility mask over catalog rows
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesizedQuery {
    pub target: FeatureVector,
    pub eligible: Vec<bool>,
}

impl SynthesizedQuery {
    pub fn eligible_count(&self) -> usize {
        self.eligible.iter().filter(|e| **e).count()
    }
}

/// Dietary flags the user can request, with the tag and feature each one enforces
fn requested_restrictions(prefs: &PreferenceRequest) -> Vec<(DietaryTag, Feature)> {
    [
        (prefs.vegan, DietaryTag::Vegan, Feature::Vegan),
        (prefs.gluten_free, DietaryTag::GlutenFree, Feature::GlutenFree),
        (prefs.vegetarian, DietaryTag::Vegetarian, Feature::Vegetarian),
        (prefs.halal, DietaryTag::Halal, Feature::Halal),
    ]
    .into_iter()
    .filter(|(requested, _, _)| *requested)
    .map(|(_, tag, feature)| (tag, feature))
    .collect()
}

/// Converts preferences into a target feature vector and an eligibility mask
///
/// Every requested restriction is strict: rows lacking the tag are removed from the
/// mask. A vegan request additionally requires rows to be tagged vegetarian.
pub fn synthesize(prefs: &PreferenceRequest, catalog: &Catalog) -> SynthesizedQuery {
    let mut target = [0.0; FEATURE_DIMS];
    let mut eligible = vec![true; catalog.row_count()];

    let mut required: Vec<DietaryTag> = Vec::new();
    for (tag, feature) in requested_restrictions(prefs) {
        target[feature.index()] = 1.0;
        required.push(tag);
        if tag == DietaryTag::Vegan {
            required.push(DietaryTag::Vegetarian);
        }
    }

    for (slot, item) in eligible.iter_mut().zip(catalog.rows()) {
        *slot = required.iter().all(|tag| item.tags.has(*tag));
    }

    target[Feature::Calories.index()] = prefs.target_calories / MEALS_PER_DAY;
    target[Feature::Protein.index()] = prefs.target_protein / MEALS_PER_DAY;

    SynthesizedQuery { target, eligible }
}
