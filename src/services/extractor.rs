//! Keyword-based preference extraction from free text.
//!
//! Matching is plain case-insensitive substring search, so negations are not
//! understood: "not vegan" still sets the vegan flag.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::PreferenceRequest;

const VEGAN_KEYWORDS: &[&str] = &["vegan", "plant-based", "no animal"];
const VEGETARIAN_KEYWORDS: &[&str] = &["vegetarian", "no meat"];
const GLUTEN_FREE_KEYWORDS: &[&str] = &["gluten-free", "gluten free", "no gluten", "celiac"];
const HALAL_KEYWORDS: &[&str] = &["halal"];

static CALORIES_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(\d+)\s*(?:kcal|calories|cal)").expect("calories regex")
});

static PROTEIN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(\d+)\s*(?:grams|g)?\s*(?:of\s+)?protein").expect("protein regex")
});

fn mentions_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|keyword| text.contains(keyword))
}

fn first_number(re: &Regex, text: &str) -> Option<f64> {
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
}

/// Maps free text onto a [`PreferenceRequest`]; unmatched fields keep their defaults
pub fn extract_preferences(text: &str) -> PreferenceRequest {
    let lowered = text.to_lowercase();
    let mut prefs = PreferenceRequest::default();

    if mentions_any(&lowered, VEGAN_KEYWORDS) {
        prefs.vegan = true;
        prefs.vegetarian = true;
    }
    if mentions_any(&lowered, VEGETARIAN_KEYWORDS) {
        prefs.vegetarian = true;
    }
    if mentions_any(&lowered, GLUTEN_FREE_KEYWORDS) {
        prefs.gluten_free = true;
    }
    if mentions_any(&lowered, HALAL_KEYWORDS) {
        prefs.halal = true;
    }

    if let Some(calories) = first_number(&CALORIES_RE, &lowered) {
        prefs.target_calories = calories;
    }
    if let Some(protein) = first_number(&PROTEIN_RE, &lowered) {
        prefs.target_protein = protein;
    }

    tracing::debug!(
        vegan = prefs.vegan,
        vegetarian = prefs.vegetarian,
        gluten_free = prefs.gluten_free,
        halal = prefs.halal,
        target_calories = prefs.target_calories,
        target_protein = prefs.target_protein,
        "Extracted preferences from text"
    );

    prefs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vegan_plan_with_targets() {
        let prefs = extract_preferences("I want a vegan meal plan with 600 calories and 40g protein");
        assert_eq!(
            prefs,
            PreferenceRequest {
                vegan: true,
                vegetarian: true,
                gluten_free: false,
                halal: false,
                target_calories: 600.0,
                target_protein: 40.0,
            }
        );
    }

    #[test]
    fn test_defaults_when_nothing_matches() {
        assert_eq!(extract_preferences("Surprise me!"), PreferenceRequest::default());
    }

    #[test]
    fn test_vegetarian_with_grams_of_protein() {
        let prefs = extract_preferences(
            "I want a vegetarian meal plan with 2000 calories and 70g of protein",
        );
        assert!(prefs.vegetarian);
        assert!(!prefs.vegan);
        assert_eq!(prefs.target_calories, 2000.0);
        assert_eq!(prefs.target_protein, 70.0);
    }

    #[test]
    fn test_keyword_variants() {
        assert!(extract_preferences("Something PLANT-BASED please").vegan);
        assert!(extract_preferences("no animal products").vegetarian);
        assert!(extract_preferences("No meat today").vegetarian);
        assert!(extract_preferences("I have celiac disease").gluten_free);
        assert!(extract_preferences("gluten free options").gluten_free);
        assert!(extract_preferences("Halal food only").halal);
    }

    #[test]
    fn test_calorie_units() {
        assert_eq!(extract_preferences("about 1800 kcal").target_calories, 1800.0);
        assert_eq!(extract_preferences("1500cal a day").target_calories, 1500.0);
        assert_eq!(extract_preferences("2200 Calories").target_calories, 2200.0);
    }

    #[test]
    fn test_calorie_unit_prefixes() {
        assert_eq!(extract_preferences("a 1500 calorie plan").target_calories, 1500.0);
        assert_eq!(extract_preferences("2100 cals a day").target_calories, 2100.0);
        assert_eq!(extract_preferences("1800 kcals").target_calories, 1800.0);
        assert_eq!(extract_preferences("1700 Calorie diet").target_calories, 1700.0);
    }

    #[test]
    fn test_protein_variants() {
        assert_eq!(extract_preferences("120 grams of protein").target_protein, 120.0);
        assert_eq!(extract_preferences("90 protein").target_protein, 90.0);
    }

    #[test]
    fn test_first_match_wins() {
        let prefs = extract_preferences("either 1200 calories or 1600 calories");
        assert_eq!(prefs.target_calories, 1200.0);
    }

    #[test]
    fn test_unrelated_units_ignored() {
        let prefs = extract_preferences("I take 200 mg of calcium");
        assert_eq!(prefs.target_calories, 2000.0);
        assert_eq!(prefs.target_protein, 50.0);
    }

    #[test]
    fn test_negation_is_not_understood() {
        let prefs = extract_preferences("I am not vegan");
        assert!(prefs.vegan);
    }
}
