use serde::{Deserialize, Deserializer, Serialize};

/// Temperature unit preference, persisted as `"F"` / `"C"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum TemperatureUnit {
    #[default]
    #[serde(rename = "F")]
    Fahrenheit,
    #[serde(rename = "C")]
    Celsius,
}

impl TemperatureUnit {
    /// Stored code for this unit.
    pub fn code(self) -> &'static str {
        match self {
            Self::Fahrenheit => "F",
            Self::Celsius => "C",
        }
    }

    /// Parse a stored code. Anything other than `"C"` reads as Fahrenheit.
    pub fn from_code(code: &str) -> Self {
        match code.trim() {
            "C" | "c" => Self::Celsius,
            _ => Self::Fahrenheit,
        }
    }

    /// Get a human-readable name
    pub fn name(self) -> &'static str {
        match self {
            Self::Fahrenheit => "Fahrenheit",
            Self::Celsius => "Celsius",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Fahrenheit => Self::Celsius,
            Self::Celsius => Self::Fahrenheit,
        }
    }
}

impl std::fmt::Display for TemperatureUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Location confirmed by the user at submit time.
///
/// Distinct from the in-progress input fields: editing those never fetches.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct SubmittedQuery {
    pub city: String,
    pub state: String,
}

impl SubmittedQuery {
    pub fn new(city: impl Into<String>, state: impl Into<String>) -> Self {
        Self {
            city: city.into(),
            state: state.into(),
        }
    }

    /// True when neither field has any text.
    pub fn is_empty(&self) -> bool {
        self.city.is_empty() && self.state.is_empty()
    }

    /// The provider's `q` parameter: `"city,state"`.
    ///
    /// An empty state leaves a trailing comma, which the provider tolerates.
    pub fn location_param(&self) -> String {
        format!("{},{}", self.city, self.state)
    }
}

/// Location block of the provider payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub tz_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub text: String,
    #[serde(default)]
    pub icon: String,
}

/// Current conditions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub temp_f: f64,
    pub temp_c: f64,
    pub feelslike_f: f64,
    pub feelslike_c: f64,
    pub condition: Condition,
    #[serde(deserialize_with = "flag_from_int_or_bool")]
    pub is_day: bool,
    pub last_updated_epoch: i64,
}

/// One row of the hourly forecast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyForecast {
    pub time_epoch: i64,
    pub temp_f: f64,
    pub temp_c: f64,
    pub feelslike_f: f64,
    pub feelslike_c: f64,
    pub condition: Condition,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastDay {
    #[serde(default)]
    pub hour: Vec<HourlyForecast>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    #[serde(default)]
    pub forecastday: Vec<ForecastDay>,
}

/// Complete payload of one successful fetch. Read-only once received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub location: Location,
    pub current: CurrentConditions,
    #[serde(default)]
    pub forecast: Option<Forecast>,
}

impl WeatherSnapshot {
    /// Hourly rows for the first forecast day, empty for current-only payloads.
    pub fn hourly(&self) -> &[HourlyForecast] {
        self.forecast
            .as_ref()
            .and_then(|f| f.forecastday.first())
            .map(|day| day.hour.as_slice())
            .unwrap_or_default()
    }
}

/// The provider sends `is_day` as `0`/`1`.
fn flag_from_int_or_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
    }

    Ok(match Flag::deserialize(deserializer)? {
        Flag::Bool(b) => b,
        Flag::Int(i) => i == 1,
    })
}
