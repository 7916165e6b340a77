use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

pub const DEFAULT_TARGET_CALORIES: f64 = 2000.0;
pub const DEFAULT_TARGET_PROTEIN: f64 = 50.0;

/// Structured dietary preferences for one recommendation request
///
/// Targets are whole-day totals; the synthesizer divides them across three meals.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PreferenceRequest {
    #[serde(default)]
    pub vegan: bool,
    #[serde(default)]
    pub vegetarian: bool,
    #[serde(default)]
    pub gluten_free: bool,
    #[serde(default)]
    pub halal: bool,
    #[serde(default = "default_target_calories")]
    pub target_calories: f64,
    #[serde(default = "default_target_protein")]
    pub target_protein: f64,
}

fn default_target_calories() -> f64 {
    DEFAULT_TARGET_CALORIES
}

fn default_target_protein() -> f64 {
    DEFAULT_TARGET_PROTEIN
}

impl Default for PreferenceRequest {
    fn default() -> Self {
        Self {
            vegan: false,
            vegetarian: false,
            gluten_free: false,
            halal: false,
            target_calories: DEFAULT_TARGET_CALORIES,
            target_protein: DEFAULT_TARGET_PROTEIN,
        }
    }
}

impl PreferenceRequest {
    /// Rejects targets that are negative or not finite
    pub fn validate(&self) -> AppResult<()> {
        validate_target("target_calories", self.target_calories)?;
        validate_target("target_protein", self.target_protein)?;
        Ok(())
    }
}

fn validate_target(field: &str, value: f64) -> AppResult<f64> {
    if !value.is_finite() {
        return Err(AppError::InvalidInput(format!(
            "{} must be a finite number",
            field
        )));
    }
    if value < 0.0 {
        return Err(AppError::InvalidInput(format!(
            "{} must not be negative, got {}",
            field, value
        )));
    }
    Ok(value)
}

/// A numeric field as it arrives over the wire: a JSON number or a numeric string.
/// Any other JSON value is kept so it can be rejected with the field name.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum NumericField {
    Number(f64),
    Text(String),
    Other(serde_json::Value),
}

impl NumericField {
    fn resolve(&self, field: &str) -> AppResult<f64> {
        let value = match self {
            NumericField::Number(n) => *n,
            NumericField::Text(s) => s.trim().parse::<f64>().map_err(|_| {
                AppError::InvalidInput(format!("{} must be a number, got {:?}", field, s))
            })?,
            NumericField::Other(value) => {
                return Err(AppError::InvalidInput(format!(
                    "{} must be a number, got {}",
                    field, value
                )))
            }
        };
        validate_target(field, value)
    }
}

/// Raw meal-plan request body; absent fields take their defaults
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MealPlanRequest {
    #[serde(default)]
    pub vegan: Option<bool>,
    #[serde(default)]
    pub vegetarian: Option<bool>,
    #[serde(default)]
    pub gluten_free: Option<bool>,
    #[serde(default)]
    pub halal: Option<bool>,
    #[serde(default)]
    pub target_calories: Option<NumericField>,
    #[serde(default)]
    pub target_protein: Option<NumericField>,
}

impl TryFrom<MealPlanRequest> for PreferenceRequest {
    type Error = AppError;

    fn try_from(request: MealPlanRequest) -> AppResult<Self> {
        let target_calories = match &request.target_calories {
            Some(field) => field.resolve("target_calories")?,
            None => DEFAULT_TARGET_CALORIES,
        };
        let target_protein = match &request.target_protein {
            Some(field) => field.resolve("target_protein")?,
            None => DEFAULT_TARGET_PROTEIN,
        };

        Ok(PreferenceRequest {
            vegan: request.vegan.unwrap_or(false),
            vegetarian: request.vegetarian.unwrap_or(false),
            gluten_free: request.gluten_free.unwrap_or(false),
            halal: request.halal.unwrap_or(false),
            target_calories,
            target_protein,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn convert(json: &str) -> AppResult<PreferenceRequest> {
        let raw: MealPlanRequest = serde_json::from_str(json).unwrap();
        PreferenceRequest::try_from(raw)
    }

    #[test]
    fn test_absent_fields_take_defaults() {
        let prefs = convert("{}").unwrap();
        assert_eq!(prefs, PreferenceRequest::default());
        assert_eq!(prefs.target_calories, 2000.0);
        assert_eq!(prefs.target_protein, 50.0);
    }

    #[test]
    fn test_null_targets_take_defaults() {
        let prefs = convert(r#"{"target_calories": null, "target_protein": null}"#).unwrap();
        assert_eq!(prefs.target_calories, DEFAULT_TARGET_CALORIES);
        assert_eq!(prefs.target_protein, DEFAULT_TARGET_PROTEIN);
    }

    #[test]
    fn test_numeric_strings_accepted() {
        let prefs = convert(r#"{"vegan": true, "target_calories": " 1800 ", "target_protein": 90}"#)
            .unwrap();
        assert!(prefs.vegan);
        assert_eq!(prefs.target_calories, 1800.0);
        assert_eq!(prefs.target_protein, 90.0);
    }

    #[test]
    fn test_non_numeric_target_rejected() {
        let err = convert(r#"{"target_calories": "lots"}"#).unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(msg) if msg.contains("target_calories")));
    }

    #[test]
    fn test_wrongly_typed_target_rejected() {
        for body in [
            r#"{"target_calories": true}"#,
            r#"{"target_calories": [1800]}"#,
            r#"{"target_calories": {"value": 1800}}"#,
        ] {
            let err = convert(body).unwrap_err();
            assert!(
                matches!(&err, AppError::InvalidInput(msg) if msg.contains("target_calories")),
                "unexpected error for {body}: {err}"
            );
        }
    }

    #[test]
    fn test_negative_target_rejected() {
        let err = convert(r#"{"target_protein": -5}"#).unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(msg) if msg.contains("target_protein")));
    }

    #[test]
    fn test_validate_rejects_nan() {
        let prefs = PreferenceRequest {
            target_calories: f64::NAN,
            ..PreferenceRequest::default()
        };
        assert!(prefs.validate().is_err());
    }

    #[test]
    fn test_serde_defaults_on_structured_request() {
        let prefs: PreferenceRequest = serde_json::from_str(r#"{"halal": true}"#).unwrap();
        assert!(prefs.halal);
        assert_eq!(prefs.target_calories, 2000.0);
    }
}
