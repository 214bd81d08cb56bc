//! Day/night, cloud and rain facts derived from the provider's condition text.

use serde::{Deserialize, Serialize};

use crate::types::CurrentConditions;

/// Condition texts treated as cloudy (exact match).
pub const CLOUDY_CONDITIONS: [&str; 4] = ["Cloudy", "Overcast", "Fog", "Freezing Fog"];

/// Condition texts treated as rainy (exact match).
pub const RAINY_CONDITIONS: [&str; 3] = ["Mist", "Patchy light drizzle", "Light drizzle"];

/// Any condition text containing this (case-sensitive) is rainy too.
pub const RAIN_MARKER: &str = "rain";

/// Independent booleans for theming. They are not mutually exclusive;
/// the presentation layer decides precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DerivedFacts {
    pub is_day: bool,
    pub is_cloudy: bool,
    pub is_rainy: bool,
}

impl DerivedFacts {
    pub fn from_current(current: &CurrentConditions) -> Self {
        classify(current.is_day, &current.condition.text)
    }
}

pub fn classify(is_day: bool, condition_text: &str) -> DerivedFacts {
    DerivedFacts {
        is_day,
        is_cloudy: CLOUDY_CONDITIONS.contains(&condition_text),
        is_rainy: RAINY_CONDITIONS.contains(&condition_text)
            || condition_text.contains(RAIN_MARKER),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cloudy_vocabulary() {
        for text in CLOUDY_CONDITIONS {
            let facts = classify(true, text);
            assert!(facts.is_cloudy, "{text} should be cloudy");
            assert!(!facts.is_rainy, "{text} should not be rainy");
        }
    }

    #[test]
    fn test_rainy_vocabulary() {
        for text in RAINY_CONDITIONS {
            let facts = classify(true, text);
            assert!(facts.is_rainy, "{text} should be rainy");
            assert!(!facts.is_cloudy, "{text} should not be cloudy");
        }
    }

    #[test]
    fn test_rain_substring() {
        assert!(classify(true, "Moderate rain").is_rainy);
        assert!(classify(true, "Patchy rain possible").is_rainy);
        assert!(classify(true, "Light freezing rain").is_rainy);
    }

    #[test]
    fn test_rain_substring_is_case_sensitive() {
        assert!(!classify(true, "Rain").is_rainy);
        assert!(!classify(true, "Torrential Rain Shower").is_rainy);
    }

    #[test]
    fn test_cloudy_requires_exact_match() {
        assert!(!classify(true, "Partly cloudy").is_cloudy);
        assert!(!classify(true, "cloudy").is_cloudy);
        assert!(!classify(true, "Freezing fog").is_cloudy);
    }

    #[test]
    fn test_clear_day() {
        assert_eq!(
            classify(true, "Sunny"),
            DerivedFacts {
                is_day: true,
                is_cloudy: false,
                is_rainy: false,
            }
        );
    }

    #[test]
    fn test_night_still_classifies_sky() {
        let facts = classify(false, "Overcast");
        assert!(!facts.is_day);
        assert!(facts.is_cloudy);
    }
}
