//! Temperature selection and rounding for display.

use crate::types::{CurrentConditions, HourlyForecast, TemperatureUnit};

/// Pick the value matching `unit` and round it half away from zero.
pub fn convert(value_f: f64, value_c: f64, unit: TemperatureUnit) -> i64 {
    let value = match unit {
        TemperatureUnit::Fahrenheit => value_f,
        TemperatureUnit::Celsius => value_c,
    };
    value.round() as i64
}

/// A measurement the provider reports in both units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemperaturePair {
    pub fahrenheit: f64,
    pub celsius: f64,
}

impl TemperaturePair {
    pub fn new(fahrenheit: f64, celsius: f64) -> Self {
        Self {
            fahrenheit,
            celsius,
        }
    }

    pub fn value(&self, unit: TemperatureUnit) -> i64 {
        convert(self.fahrenheit, self.celsius, unit)
    }

    /// Rounded value with its unit, e.g. `68°F`.
    pub fn display(&self, unit: TemperatureUnit) -> String {
        format!("{}°{}", self.value(unit), unit.code())
    }
}

impl CurrentConditions {
    pub fn temperature(&self) -> TemperaturePair {
        TemperaturePair::new(self.temp_f, self.temp_c)
    }

    pub fn feels_like(&self) -> TemperaturePair {
        TemperaturePair::new(self.feelslike_f, self.feelslike_c)
    }
}

impl HourlyForecast {
    pub fn temperature(&self) -> TemperaturePair {
        TemperaturePair::new(self.temp_f, self.temp_c)
    }

    pub fn feels_like(&self) -> TemperaturePair {
        TemperaturePair::new(self.feelslike_f, self.feelslike_c)
    }
}
