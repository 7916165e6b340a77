//! Shared feature space for catalog rows and preference queries.

use super::catalog::{Catalog, DIETARY_DIMS, NUMERIC_DIMS};

/// Total number of feature dimensions
pub const FEATURE_DIMS: usize = NUMERIC_DIMS + DIETARY_DIMS;

/// Fixed-order feature tuple; see [`Feature`] for the dimension layout
pub type FeatureVector = [f64; FEATURE_DIMS];

/// Feature dimensions, in vector order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feature {
    Calories = 0,
    TotalFat = 1,
    TotalCarbs = 2,
    Protein = 3,
    Vegan = 4,
    GlutenFree = 5,
    Vegetarian = 6,
    Organic = 7,
    Halal = 8,
}

impl Feature {
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Per-dimension standardization fitted on the catalog feature matrix
#[derive(Debug, Clone, PartialEq)]
pub struct ScalingTransform {
    mean: FeatureVector,
    scale: FeatureVector,
}

impl ScalingTransform {
    /// Fits mean and population standard deviation per dimension.
    /// Zero-variance dimensions get a scale of 1.
    pub fn fit(rows: &[FeatureVector]) -> Self {
        let mut mean = [0.0; FEATURE_DIMS];
        let mut scale = [1.0; FEATURE_DIMS];

        if rows.is_empty() {
            return Self { mean, scale };
        }

        let n = rows.len() as f64;
        for dim in 0..FEATURE_DIMS {
            let mu = rows.iter().map(|row| row[dim]).sum::<f64>() / n;
            let variance = rows.iter().map(|row| (row[dim] - mu).powi(2)).sum::<f64>() / n;
            let std = variance.sqrt();

            mean[dim] = mu;
            if std > 0.0 && std.is_finite() {
                scale[dim] = std;
            }
        }

        Self { mean, scale }
    }

    pub fn scale(&self, vector: &FeatureVector) -> FeatureVector {
        let mut out = [0.0; FEATURE_DIMS];
        for (dim, slot) in out.iter_mut().enumerate() {
            *slot = (vector[dim] - self.mean[dim]) / self.scale[dim];
        }
        out
    }

    pub(crate) fn mean(&self) -> &FeatureVector {
        &self.mean
    }

    pub(crate) fn scale_factors(&self) -> &FeatureVector {
        &self.scale
    }
}

/// Catalog feature matrix together with the transform fitted on it
#[derive(Debug, Clone)]
pub struct FeatureSpace {
    transform: ScalingTransform,
    raw: Vec<FeatureVector>,
    scaled: Vec<FeatureVector>,
}

impl FeatureSpace {
    pub fn build(catalog: &Catalog) -> Self {
        let raw: Vec<FeatureVector> = catalog
            .raw_numeric_matrix()
            .into_iter()
            .zip(catalog.raw_dietary_matrix())
            .map(|(numeric, dietary)| {
                let mut row = [0.0; FEATURE_DIMS];
                row[..NUMERIC_DIMS].copy_from_slice(&numeric);
                row[NUMERIC_DIMS..].copy_from_slice(&dietary);
                row
            })
            .collect();

        let transform = ScalingTransform::fit(&raw);
        let scaled = raw.iter().map(|row| transform.scale(row)).collect();

        Self {
            transform,
            raw,
            scaled,
        }
    }

    /// Applies the catalog-fitted transform to a query vector
    pub fn scale(&self, vector: &FeatureVector) -> FeatureVector {
        self.transform.scale(vector)
    }

    pub(crate) fn raw_rows(&self) -> &[FeatureVector] {
        &self.raw
    }

    pub fn scaled_rows(&self) -> &[FeatureVector] {
        &self.scaled
    }

    pub(crate) fn len(&self) -> usize {
        self.scaled.len()
    }
}

/// Cosine similarity; 0 when either vector has zero norm
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f64>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CatalogItem, DietaryTags, MealCategories, Nutrition};

    fn item(name: &str, calories: f64, protein: f64, vegan: bool) -> CatalogItem {
        CatalogItem {
            name: name.to_string(),
            meals: MealCategories {
                lunch: true,
                ..Default::default()
            },
            tags: DietaryTags {
                vegan,
                vegetarian: vegan,
                ..Default::default()
            },
            nutrition: Nutrition {
                calories,
                total_fat: 10.0,
                total_carbs: 20.0,
                protein,
            },
        }
    }

    #[test]
    fn test_fit_standardizes() {
        let rows = vec![[1.0; FEATURE_DIMS], [3.0; FEATURE_DIMS]];
        let transform = ScalingTransform::fit(&rows);
        assert_eq!(transform.mean()[0], 2.0);
        assert_eq!(transform.scale_factors()[0], 1.0);
        assert_eq!(transform.scale(&rows[0])[4], -1.0);
        assert_eq!(transform.scale(&rows[1])[8], 1.0);
    }

    #[test]
    fn test_zero_variance_dimension_is_centered_only() {
        let mut a = [0.0; FEATURE_DIMS];
        let mut b = [0.0; FEATURE_DIMS];
        a[Feature::Calories.index()] = 100.0;
        b[Feature::Calories.index()] = 300.0;
        a[Feature::TotalFat.index()] = 7.0;
        b[Feature::TotalFat.index()] = 7.0;

        let transform = ScalingTransform::fit(&[a, b]);
        assert_eq!(transform.scale_factors()[Feature::TotalFat.index()], 1.0);

        let scaled = transform.scale(&a);
        assert!(scaled.iter().all(|v| v.is_finite()));
        assert_eq!(scaled[Feature::TotalFat.index()], 0.0);
        assert_eq!(scaled[Feature::Calories.index()], -1.0);
    }

    #[test]
    fn test_feature_space_layout() {
        let catalog = Catalog::from_items(vec![
            item("Salad", 200.0, 8.0, true),
            item("Burger", 700.0, 35.0, false),
        ])
        .unwrap();
        let space = FeatureSpace::build(&catalog);

        assert_eq!(space.len(), 2);
        let salad = space.raw_rows()[0];
        assert_eq!(salad[Feature::Calories.index()], 200.0);
        assert_eq!(salad[Feature::Protein.index()], 8.0);
        assert_eq!(salad[Feature::Vegan.index()], 1.0);
        assert_eq!(salad[Feature::Vegetarian.index()], 1.0);
        assert_eq!(salad[Feature::Halal.index()], 0.0);
        assert_eq!(space.scaled_rows()[0], space.scale(&salad));
    }

    #[test]
    fn test_scaled_row_is_maximally_similar_to_itself() {
        let catalog = Catalog::from_items(vec![
            item("Salad", 200.0, 8.0, true),
            item("Burger", 700.0, 35.0, false),
            item("Wrap", 450.0, 20.0, false),
        ])
        .unwrap();
        let space = FeatureSpace::build(&catalog);

        for (raw, scaled) in space.raw_rows().iter().zip(space.scaled_rows()) {
            let query = space.scale(raw);
            let score = cosine_similarity(&query, scaled);
            assert!((score - 1.0).abs() < 1e-9, "score was {score}");
        }
    }

    #[test]
    fn test_cosine_zero_norm_is_zero() {
        let zero = [0.0; FEATURE_DIMS];
        let one = [1.0; FEATURE_DIMS];
        assert_eq!(cosine_similarity(&zero, &one), 0.0);
        assert_eq!(cosine_similarity(&one, &zero), 0.0);
    }

    #[test]
    fn test_cosine_opposite_vectors() {
        let a = [1.0, 2.0, 3.0];
        let b = [-1.0, -2.0, -3.0];
        assert!((cosine_similarity(&a, &b) + 1.0).abs() < 1e-12);
    }
}
