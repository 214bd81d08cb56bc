//! Localized, timezone-aware rendering of provider epoch timestamps.
//!
//! Every call is a pure function of `(epoch, options)`: timezone and locale
//! travel in [`FormatOptions`] and nothing process-wide is touched.

use std::fmt::Display;
use std::str::FromStr;

use chrono::{DateTime, Local, TimeZone, Utc};
use chrono_tz::Tz;

/// Rendered in place of a timestamp chrono cannot represent.
pub const INVALID_DATE: &str = "Invalid Date";

/// Locales with a known date/time layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locale {
    /// `11/14/2023, 2:13:20 PM`
    #[default]
    EnUs,
    /// `14/11/2023, 14:13:20`
    EnGb,
}

impl Locale {
    fn date_pattern(self) -> &'static str {
        match self {
            Self::EnUs => "%-m/%-d/%Y",
            Self::EnGb => "%d/%m/%Y",
        }
    }

    fn default_hour12(self) -> bool {
        matches!(self, Self::EnUs)
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Unsupported locale: {0}")]
pub struct UnsupportedLocale(pub String);

impl FromStr for Locale {
    type Err = UnsupportedLocale;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "en-US" | "en_US" => Ok(Self::EnUs),
            "en-GB" | "en_GB" => Ok(Self::EnGb),
            other => Err(UnsupportedLocale(other.to_string())),
        }
    }
}

/// Smallest time unit shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Granularity {
    Hour,
    Minute,
    #[default]
    Second,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatOptions {
    pub locale: Locale,
    /// `None` renders in the system's local zone.
    pub timezone: Option<Tz>,
    /// `None` follows the locale's convention.
    pub hour12: Option<bool>,
    pub include_date: bool,
    pub granularity: Granularity,
    /// Append the zone abbreviation (e.g. `PST`). Ignored for the local
    /// zone, which only knows its numeric offset.
    pub show_zone: bool,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            locale: Locale::EnUs,
            timezone: None,
            hour12: None,
            include_date: true,
            granularity: Granularity::Second,
            show_zone: false,
        }
    }
}

impl FormatOptions {
    /// "Last updated" line: numeric date, 12-hour time and zone.
    pub fn header(locale: Locale, timezone: Option<Tz>) -> Self {
        Self {
            locale,
            timezone,
            hour12: Some(true),
            include_date: true,
            granularity: Granularity::Minute,
            show_zone: true,
        }
    }

    /// Forecast rows: `hour:minute`, 12-hour.
    pub fn hourly_row(locale: Locale, timezone: Option<Tz>) -> Self {
        Self {
            locale,
            timezone,
            hour12: Some(true),
            include_date: false,
            granularity: Granularity::Minute,
            show_zone: false,
        }
    }

    fn pattern(&self) -> String {
        let hour12 = self.hour12.unwrap_or_else(|| self.locale.default_hour12());
        let time = match (hour12, self.granularity) {
            (true, Granularity::Hour) => "%-I %p",
            (true, Granularity::Minute) => "%-I:%M %p",
            (true, Granularity::Second) => "%-I:%M:%S %p",
            (false, Granularity::Hour) => "%H",
            (false, Granularity::Minute) => "%H:%M",
            (false, Granularity::Second) => "%H:%M:%S",
        };

        let mut pattern = if self.include_date {
            format!("{}, {}", self.locale.date_pattern(), time)
        } else {
            time.to_string()
        };
        if self.show_zone && self.timezone.is_some() {
            pattern.push_str(" %Z");
        }
        pattern
    }
}

/// Parse an IANA zone name such as the provider's `tz_id`.
pub fn resolve_timezone(name: &str) -> Option<Tz> {
    name.parse().ok()
}

/// Render `epoch_seconds` according to `options`.
pub fn format_timestamp(epoch_seconds: i64, options: &FormatOptions) -> String {
    let Some(utc) = DateTime::<Utc>::from_timestamp(epoch_seconds, 0) else {
        return INVALID_DATE.to_string();
    };

    let pattern = options.pattern();
    match options.timezone {
        Some(tz) => render(&utc.with_timezone(&tz), &pattern),
        None => render(&utc.with_timezone(&Local), &pattern),
    }
}

fn render<Z>(at: &DateTime<Z>, pattern: &str) -> String
where
    Z: TimeZone,
    Z::Offset: Display,
{
    at.format(pattern).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    // 2023-11-14T22:13:20Z
    const EPOCH: i64 = 1_700_000_000;

    #[test]
    fn test_hourly_row_in_fixed_zone() {
        let options = FormatOptions::hourly_row(Locale::EnUs, Some(chrono_tz::America::Los_Angeles));
        assert_eq!(format_timestamp(EPOCH, &options), "2:13 PM");
    }

    #[test]
    fn test_header_includes_date_and_zone() {
        let options = FormatOptions::header(Locale::EnUs, Some(chrono_tz::America::Los_Angeles));
        assert_eq!(format_timestamp(EPOCH, &options), "11/14/2023, 2:13 PM PST");

        let utc = FormatOptions::header(Locale::EnUs, Some(chrono_tz::UTC));
        assert_eq!(format_timestamp(EPOCH, &utc), "11/14/2023, 10:13 PM UTC");
    }

    #[test]
    fn test_default_options_match_full_locale_string() {
        let options = FormatOptions {
            timezone: Some(chrono_tz::UTC),
            ..FormatOptions::default()
        };
        assert_eq!(format_timestamp(EPOCH, &options), "11/14/2023, 10:13:20 PM");
    }

    #[test]
    fn test_en_gb_defaults_to_24_hour() {
        let options = FormatOptions {
            locale: Locale::EnGb,
            timezone: Some(chrono_tz::Europe::London),
            ..FormatOptions::default()
        };
        assert_eq!(format_timestamp(EPOCH, &options), "14/11/2023, 22:13:20");
    }

    #[test]
    fn test_hour_granularity() {
        let options = FormatOptions {
            timezone: Some(chrono_tz::Asia::Tokyo),
            include_date: false,
            granularity: Granularity::Hour,
            ..FormatOptions::default()
        };
        // 07:13 JST on the 15th
        assert_eq!(format_timestamp(EPOCH, &options), "7 AM");
    }

    #[test]
    fn test_local_zone_omits_offset() {
        let header = FormatOptions::header(Locale::EnUs, None);
        let without_zone = FormatOptions {
            show_zone: false,
            ..header.clone()
        };
        assert_eq!(
            format_timestamp(EPOCH, &header),
            format_timestamp(EPOCH, &without_zone)
        );
    }

    #[test]
    fn test_deterministic() {
        let options = FormatOptions::header(Locale::EnUs, Some(chrono_tz::Europe::Berlin));
        assert_eq!(
            format_timestamp(EPOCH, &options),
            format_timestamp(EPOCH, &options)
        );
    }

    #[test]
    fn test_out_of_range_epoch() {
        assert_eq!(format_timestamp(i64::MAX, &FormatOptions::default()), INVALID_DATE);
    }

    #[test]
    fn test_locale_parse() {
        assert_eq!("en-US".parse::<Locale>().unwrap(), Locale::EnUs);
        assert_eq!("en-GB".parse::<Locale>().unwrap(), Locale::EnGb);
        assert!("fr-FR".parse::<Locale>().is_err());
    }

    #[test]
    fn test_resolve_timezone() {
        assert_eq!(
            resolve_timezone("America/New_York"),
            Some(chrono_tz::America::New_York)
        );
        assert!(resolve_timezone("").is_none());
    }
}
