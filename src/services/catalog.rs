//! Nutrition catalog store.
//!
//! Reads the flat table produced by the menu scraper, coerces the dietary and meal
//! columns to flags and imputes missing nutrition values with the column mean. The
//! resulting [`Catalog`] is immutable; a new table means building a new catalog.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};

use crate::{
    error::{AppError, AppResult},
    models::{CatalogItem, DietaryTag, DietaryTags, MealCategories, MealCategory, Nutrition},
};

pub const NAME_COLUMN: &str = "Food Name";

/// Nutrition columns, in feature order
pub const NUMERIC_COLUMNS: [&str; 4] = ["Calories", "Total Fat", "Total Carbohydrates", "Protein"];

/// Number of nutrition dimensions
pub const NUMERIC_DIMS: usize = NUMERIC_COLUMNS.len();

/// Number of dietary dimensions
pub const DIETARY_DIMS: usize = DietaryTag::FEATURE_ORDER.len();

/// Immutable, fully-imputed nutrition catalog
#[derive(Debug, Clone)]
pub struct Catalog {
    items: Vec<CatalogItem>,
}

/// Header positions of the columns the catalog consumes
struct Columns {
    name: usize,
    numeric: [usize; NUMERIC_DIMS],
    tags: Vec<(DietaryTag, usize)>,
    meals: Vec<(MealCategory, usize)>,
}

impl Columns {
    fn locate(headers: &StringRecord) -> AppResult<Self> {
        let mut missing = Vec::new();
        let mut find = |column: &str| -> usize {
            match headers.iter().position(|h| h == column) {
                Some(index) => index,
                None => {
                    missing.push(column.to_string());
                    0
                }
            }
        };

        let name = find(NAME_COLUMN);
        let mut numeric = [0usize; NUMERIC_DIMS];
        for (slot, column) in numeric.iter_mut().zip(NUMERIC_COLUMNS) {
            *slot = find(column);
        }
        let tags = DietaryTag::FEATURE_ORDER
            .iter()
            .map(|tag| (*tag, find(tag.column())))
            .collect();
        let meals = MealCategory::ALL
            .iter()
            .map(|meal| (*meal, find(meal.column())))
            .collect();

        if !missing.is_empty() {
            return Err(AppError::Catalog(format!(
                "catalog table is missing required columns: {}",
                missing.join(", ")
            )));
        }

        Ok(Self {
            name,
            numeric,
            tags,
            meals,
        })
    }
}

/// A parsed row whose nutrition values may still be missing
struct RawRow {
    name: String,
    numeric: [Option<f64>; NUMERIC_DIMS],
    tags: DietaryTags,
    meals: MealCategories,
}

impl Catalog {
    /// Loads the catalog from a CSV file on disk
    pub fn load(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            AppError::Catalog(format!("cannot open catalog {}: {}", path.display(), e))
        })?;

        let catalog = Self::from_reader(file)?;

        tracing::info!(
            path = %path.display(),
            rows = catalog.row_count(),
            "Catalog loaded"
        );

        Ok(catalog)
    }

    /// Parses a CSV table with a header row
    pub fn from_reader<R: Read>(reader: R) -> AppResult<Self> {
        let mut reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .from_reader(reader);

        let headers = reader.headers()?.clone();
        if headers.is_empty() {
            return Err(AppError::Catalog("catalog table is empty".to_string()));
        }
        let columns = Columns::locate(&headers)?;

        let mut rows = Vec::new();
        for (line, record) in reader.records().enumerate() {
            let record = record?;
            match parse_row(&record, &columns) {
                Some(row) => rows.push(row),
                None => tracing::warn!(line = line + 2, "Skipping catalog row without a food name"),
            }
        }

        Self::from_raw_rows(rows)
    }

    /// Builds a catalog from already-typed items
    pub fn from_items(items: Vec<CatalogItem>) -> AppResult<Self> {
        if items.is_empty() {
            return Err(AppError::Catalog("catalog has no rows".to_string()));
        }
        Ok(Self { items })
    }

    fn from_raw_rows(rows: Vec<RawRow>) -> AppResult<Self> {
        if rows.is_empty() {
            return Err(AppError::Catalog("catalog has no rows".to_string()));
        }

        let means = column_means(&rows);

        let items = rows
            .into_iter()
            .map(|row| {
                let value = |dim: usize| row.numeric[dim].unwrap_or(means[dim]);
                CatalogItem {
                    name: row.name,
                    meals: row.meals,
                    tags: row.tags,
                    nutrition: Nutrition {
                        calories: value(0),
                        total_fat: value(1),
                        total_carbs: value(2),
                        protein: value(3),
                    },
                }
            })
            .collect();

        Self::from_items(items)
    }

    pub fn row_count(&self) -> usize {
        self.items.len()
    }

    pub fn rows(&self) -> &[CatalogItem] {
        &self.items
    }

    /// Nutrition values per row: calories, fat, carbohydrates, protein
    pub fn raw_numeric_matrix(&self) -> Vec<[f64; NUMERIC_DIMS]> {
        self.items
            .iter()
            .map(|item| {
                let n = &item.nutrition;
                [n.calories, n.total_fat, n.total_carbs, n.protein]
            })
            .collect()
    }

    /// Dietary flags per row as 0/1, in [`DietaryTag::FEATURE_ORDER`]
    pub fn raw_dietary_matrix(&self) -> Vec<[f64; DIETARY_DIMS]> {
        self.items
            .iter()
            .map(|item| {
                let mut row = [0.0; DIETARY_DIMS];
                for (slot, tag) in row.iter_mut().zip(DietaryTag::FEATURE_ORDER) {
                    if item.tags.has(tag) {
                        *slot = 1.0;
                    }
                }
                row
            })
            .collect()
    }
}

fn parse_row(record: &StringRecord, columns: &Columns) -> Option<RawRow> {
    let name = record.get(columns.name).unwrap_or_default().trim();
    if name.is_empty() {
        return None;
    }

    let mut numeric = [None; NUMERIC_DIMS];
    for (slot, index) in numeric.iter_mut().zip(columns.numeric) {
        *slot = record.get(index).and_then(parse_numeric);
    }

    let mut tags = DietaryTags::default();
    for (tag, index) in &columns.tags {
        tags.set(*tag, record.get(*index).is_some_and(parse_flag));
    }

    let mut meals = MealCategories::default();
    for (meal, index) in &columns.meals {
        meals.set(*meal, record.get(*index).is_some_and(parse_flag));
    }

    Some(RawRow {
        name: name.to_string(),
        numeric,
        tags,
        meals,
    })
}

/// Mean of the present values per nutrition column; 0 for an all-missing column
fn column_means(rows: &[RawRow]) -> [f64; NUMERIC_DIMS] {
    let mut means = [0.0; NUMERIC_DIMS];

    for (dim, mean) in means.iter_mut().enumerate() {
        let present: Vec<f64> = rows.iter().filter_map(|row| row.numeric[dim]).collect();
        let missing = rows.len() - present.len();

        if present.is_empty() {
            tracing::warn!(
                column = NUMERIC_COLUMNS[dim],
                "Column has no usable values, imputing 0"
            );
            continue;
        }

        *mean = present.iter().sum::<f64>() / present.len() as f64;

        if missing > 0 {
            tracing::warn!(
                column = NUMERIC_COLUMNS[dim],
                missing,
                imputed = *mean,
                "Imputed missing nutrition values with column mean"
            );
        }
    }

    means
}

/// Parses a nutrition cell; empty, malformed, non-finite or negative values are missing
fn parse_numeric(cell: &str) -> Option<f64> {
    let cell = cell.trim();
    if cell.is_empty() {
        return None;
    }
    cell.parse::<f64>()
        .ok()
        .filter(|value| value.is_finite() && *value >= 0.0)
}

/// Truthy cell values; anything else, including blanks, is false
fn parse_flag(cell: &str) -> bool {
    matches!(
        cell.trim().to_ascii_lowercase().as_str(),
        "t" | "true" | "1" | "1.0" | "yes" | "y"
    )
}
