//! Plain-text rendering of the weather session.

use chrono_tz::Tz;
use weathernow_weather::{
    format_timestamp, resolve_timezone, DerivedFacts, FormatOptions, HourlyForecast, Locale,
    SessionOptions, SessionState, TemperatureUnit, WeatherSnapshot,
};

pub const LOADING: &str = "Loading...";
pub const IDLE_HINT: &str = "Enter a city or state with --city / --state.";
pub const FAILURE: &str = "Something went wrong...";

/// Page theme picked from derived facts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Day,
    Night,
    Cloudy,
    Rainy,
}

impl Theme {
    /// Night wins over everything, then cloudy, then rainy.
    pub fn resolve(facts: Option<DerivedFacts>) -> Option<Self> {
        let facts = facts?;
        Some(if !facts.is_day {
            Self::Night
        } else if facts.is_cloudy {
            Self::Cloudy
        } else if facts.is_rainy {
            Self::Rainy
        } else {
            Self::Day
        })
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Night => "night",
            Self::Cloudy => "cloudy",
            Self::Rainy => "rainy",
        }
    }
}

#[derive(Debug, Clone)]
pub struct DisplaySettings {
    pub locale: Locale,
    /// Overrides the location's own zone.
    pub timezone: Option<Tz>,
    pub include_theming: bool,
}

impl DisplaySettings {
    /// Theming follows the session's options.
    pub fn new(locale: Locale, timezone: Option<Tz>, options: SessionOptions) -> Self {
        Self {
            locale,
            timezone,
            include_theming: options.include_theming,
        }
    }

    fn zone_for(&self, snapshot: &WeatherSnapshot) -> Option<Tz> {
        self.timezone
            .or_else(|| resolve_timezone(&snapshot.location.tz_id))
    }
}

/// Render whatever the session currently holds.
pub fn render_state(
    state: &SessionState,
    unit: TemperatureUnit,
    settings: &DisplaySettings,
) -> String {
    match state {
        SessionState::Idle => IDLE_HINT.to_string(),
        SessionState::Loading { .. } => LOADING.to_string(),
        SessionState::Error => FAILURE.to_string(),
        SessionState::Success { snapshot, derived } => {
            let mut out = render_summary(snapshot, unit, settings);
            let hourly = snapshot.hourly();
            if !hourly.is_empty() {
                out.push('\n');
                let zone = settings.zone_for(snapshot);
                out.push_str(&render_forecast(hourly, unit, settings.locale, zone));
            }
            if settings.include_theming {
                if let Some(theme) = Theme::resolve(Some(*derived)) {
                    out.push_str(&format!("\nTheme: {}\n", theme.name()));
                }
            }
            out
        }
    }
}

pub fn render_summary(
    snapshot: &WeatherSnapshot,
    unit: TemperatureUnit,
    settings: &DisplaySettings,
) -> String {
    let current = &snapshot.current;
    let updated = format_timestamp(
        current.last_updated_epoch,
        &FormatOptions::header(settings.locale, settings.zone_for(snapshot)),
    );

    let mut out = String::new();
    out.push_str(&format!("{}, {}\n", snapshot.location.name, snapshot.location.region));
    out.push_str(&format!("{}\n", current.temperature().display(unit)));
    if let Some(icon) = icon_url(&current.condition.icon) {
        out.push_str(&format!("Icon: {}\n", icon));
    }
    out.push_str(&format!("Feels Like: {}\n", current.feels_like().display(unit)));
    out.push_str(&format!("Condition: {}\n", current.condition.text));
    out.push_str(&format!("Last updated: {}\n", updated));
    out.push_str(&format!("Switch to {}\n", unit.toggled().name()));
    out
}

/// The provider sends protocol-relative icon paths (`//cdn...`).
fn icon_url(icon: &str) -> Option<String> {
    if icon.is_empty() {
        None
    } else if icon.starts_with("//") {
        Some(format!("https:{}", icon))
    } else {
        Some(icon.to_string())
    }
}

pub fn render_forecast(
    hours: &[HourlyForecast],
    unit: TemperatureUnit,
    locale: Locale,
    timezone: Option<Tz>,
) -> String {
    let options = FormatOptions::hourly_row(locale, timezone);

    let mut out = String::from("Hourly Forecast\n");
    out.push_str(&format!("{:<10}{:<8}{:<12}{}\n", "Time", "Temp", "Feels Like", "Condition"));
    for hour in hours {
        out.push_str(&format!(
            "{:<10}{:<8}{:<12}{}\n",
            format_timestamp(hour.time_epoch, &options),
            hour.temperature().display(unit),
            hour.feels_like().display(unit),
            hour.condition.text
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use weathernow_weather::{classify, Condition, CurrentConditions, Forecast, ForecastDay, Location};

    use super::*;

    fn snapshot(hours: Vec<HourlyForecast>) -> WeatherSnapshot {
        WeatherSnapshot {
            location: Location {
                name: "Seattle".into(),
                region: "Washington".into(),
                country: "United States of America".into(),
                tz_id: "America/Los_Angeles".into(),
            },
            current: CurrentConditions {
                temp_f: 52.4,
                temp_c: 11.3,
                feelslike_f: 49.6,
                feelslike_c: 9.8,
                condition: Condition {
                    text: "Overcast".into(),
                    icon: String::new(),
                },
                is_day: true,
                last_updated_epoch: 1_700_000_000,
            },
            forecast: Some(Forecast {
                forecastday: vec![ForecastDay { hour: hours }],
            }),
        }
    }

    fn hour(time_epoch: i64, text: &str) -> HourlyForecast {
        HourlyForecast {
            time_epoch,
            temp_f: 50.0,
            temp_c: 10.0,
            feelslike_f: 47.5,
            feelslike_c: 8.6,
            condition: Condition {
                text: text.into(),
                icon: String::new(),
            },
        }
    }

    fn settings() -> DisplaySettings {
        DisplaySettings::new(Locale::EnUs, None, SessionOptions::default())
    }

    #[test]
    fn test_theme_precedence() {
        assert_eq!(Theme::resolve(None), None);
        assert_eq!(Theme::resolve(Some(classify(false, "Moderate rain"))), Some(Theme::Night));
        assert_eq!(Theme::resolve(Some(classify(true, "Fog"))), Some(Theme::Cloudy));
        assert_eq!(Theme::resolve(Some(classify(true, "Light drizzle"))), Some(Theme::Rainy));
        assert_eq!(Theme::resolve(Some(classify(true, "Sunny"))), Some(Theme::Day));
    }

    #[test]
    fn test_summary_in_location_zone() {
        let text = render_summary(&snapshot(Vec::new()), TemperatureUnit::Fahrenheit, &settings());

        assert!(text.starts_with("Seattle, Washington\n52°F\n"));
        assert!(text.contains("Feels Like: 50°F"));
        assert!(text.contains("Condition: Overcast"));
        assert!(text.contains("Last updated: 11/14/2023, 2:13 PM PST"));
        assert!(text.contains("Switch to Celsius"));
    }

    #[test]
    fn test_summary_in_celsius_with_zone_override() {
        let settings = DisplaySettings {
            timezone: Some(chrono_tz::UTC),
            ..settings()
        };
        let text = render_summary(&snapshot(Vec::new()), TemperatureUnit::Celsius, &settings);

        assert!(text.contains("11°C"));
        assert!(text.contains("Feels Like: 10°C"));
        assert!(text.contains("Last updated: 11/14/2023, 10:13 PM UTC"));
        assert!(text.contains("Switch to Fahrenheit"));
    }

    #[test]
    fn test_summary_shows_condition_icon() {
        let mut with_icon = snapshot(Vec::new());
        with_icon.current.condition.icon = "//cdn.weatherapi.com/weather/64x64/day/122.png".into();

        let text = render_summary(&with_icon, TemperatureUnit::Fahrenheit, &settings());
        assert!(text.contains("Icon: https://cdn.weatherapi.com/weather/64x64/day/122.png\n"));

        let text = render_summary(&snapshot(Vec::new()), TemperatureUnit::Fahrenheit, &settings());
        assert!(!text.contains("Icon:"));
    }

    #[test]
    fn test_forecast_rows() {
        let text = render_forecast(
            &[hour(1_699_948_800, "Clear"), hour(1_699_952_400, "Light rain")],
            TemperatureUnit::Fahrenheit,
            Locale::EnUs,
            Some(chrono_tz::UTC),
        );
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "Hourly Forecast");
        assert_eq!(lines.len(), 4);
        assert!(lines[2].starts_with("8:00 AM"));
        assert!(lines[2].contains("50°F"));
        assert!(lines[2].contains("48°F"));
        assert!(lines[3].ends_with("Light rain"));
    }

    #[test]
    fn test_render_state_phases() {
        assert_eq!(
            render_state(&SessionState::Loading { request_id: 1 }, TemperatureUnit::Fahrenheit, &settings()),
            LOADING
        );
        assert_eq!(
            render_state(&SessionState::Error, TemperatureUnit::Fahrenheit, &settings()),
            FAILURE
        );
        assert_eq!(
            render_state(&SessionState::Idle, TemperatureUnit::Fahrenheit, &settings()),
            IDLE_HINT
        );
    }

    #[test]
    fn test_render_success_with_theme() {
        let snapshot = snapshot(vec![hour(1_699_948_800, "Clear")]);
        let derived = DerivedFacts::from_current(&snapshot.current);
        let state = SessionState::Success {
            snapshot: Arc::new(snapshot),
            derived,
        };

        let text = render_state(&state, TemperatureUnit::Fahrenheit, &settings());
        assert!(text.contains("Hourly Forecast"));
        assert!(text.contains("Theme: cloudy"));

        let basic = DisplaySettings::new(Locale::EnUs, None, SessionOptions::basic());
        assert!(!basic.include_theming);
        assert!(!render_state(&state, TemperatureUnit::Fahrenheit, &basic).contains("Theme:"));
    }
}
