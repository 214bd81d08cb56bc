//! Weather session for WeatherNow
//!
//! Fetches current conditions and hourly forecast from weatherapi.com,
//! persists the user's location and unit, and derives theming facts from
//! each successful snapshot.

pub mod classify;
pub mod client;
pub mod convert;
pub mod error;
pub mod format;
pub mod preferences;
pub mod session;
pub mod types;

pub use classify::{classify, DerivedFacts};
pub use client::{ClientOptions, WeatherClient, WeatherFetcher};
pub use convert::{convert, TemperaturePair};
pub use error::{SessionError, StorageError, TransportError};
pub use format::{format_timestamp, resolve_timezone, FormatOptions, Granularity, Locale};
pub use preferences::{PreferenceStore, UserPreferences};
pub use session::{
    Applied, Phase, SessionOptions, SessionState, SubmitOutcome, WeatherSession,
};
pub use types::*;
