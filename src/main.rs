use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use weathernow_core::{AppError, Config, ConfigError, WeatherError};
use weathernow_weather::{
    resolve_timezone, ClientOptions, Locale, Phase, PreferenceStore, SessionOptions,
    SubmitOutcome, TemperatureUnit, WeatherClient, WeatherSession,
};

mod render;

use render::{DisplaySettings, FAILURE};

#[derive(Parser, Debug)]
#[command(name = "weathernow", version, about = "Current conditions and hourly forecast for a city")]
struct Cli {
    /// City to look up (saved for next time)
    #[arg(long)]
    city: Option<String>,

    /// State or region to look up (saved for next time)
    #[arg(long)]
    state: Option<String>,

    /// Temperature unit: F or C (saved for next time)
    #[arg(long, value_parser = parse_unit, conflicts_with = "toggle_unit")]
    unit: Option<TemperatureUnit>,

    /// Switch between Fahrenheit and Celsius
    #[arg(long)]
    toggle_unit: bool,

    /// Skip the hourly forecast
    #[arg(long)]
    current_only: bool,

    /// Config file to use instead of the default location
    #[arg(long)]
    config: Option<PathBuf>,
}

fn parse_unit(value: &str) -> Result<TemperatureUnit, String> {
    match value {
        "F" | "f" => Ok(TemperatureUnit::Fahrenheit),
        "C" | "c" => Ok(TemperatureUnit::Celsius),
        other => Err(format!("expected F or C, got '{}'", other)),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(e) = weathernow_core::init() {
        eprintln!("{}", e);
    }

    let cli = Cli::parse();

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{:#}", e);
            let message = e
                .downcast_ref::<AppError>()
                .map(AppError::user_message)
                .unwrap_or(FAILURE);
            eprintln!("{}", message);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let config = load_config(cli.config.as_deref())?;

    let api_key = config
        .api_key()
        .ok_or(AppError::Weather(WeatherError::MissingApiKey))?;

    let locale: Locale = config
        .display
        .locale
        .parse()
        .map_err(|e| AppError::Config(ConfigError::Invalid(format!("{}", e))))?;

    let store = match PreferenceStore::open(config.preferences_path()) {
        Ok(store) => store,
        Err(e) => {
            tracing::warn!("Preferences unavailable, using in-memory values: {}", e);
            PreferenceStore::in_memory()
        }
    };

    let client = WeatherClient::with_options(
        &api_key,
        ClientOptions {
            base_url: config.weather.base_url.clone(),
            timeout_ms: config.weather.timeout_ms,
        },
    )
    .map_err(AppError::from)?;

    let options = SessionOptions {
        include_forecast: config.weather.include_forecast && !cli.current_only,
        include_theming: config.weather.include_theming,
    };
    let mut session = WeatherSession::new(Arc::new(client), store, options);

    let timezone = config.display.timezone.as_deref().and_then(resolve_timezone);
    let settings = DisplaySettings::new(locale, timezone, session.options());

    if let Some(city) = cli.city.as_deref() {
        session.set_city(city.trim());
    }
    if let Some(state) = cli.state.as_deref() {
        session.set_state(state.trim());
    }
    if let Some(unit) = cli.unit {
        session.set_unit(unit);
    } else if cli.toggle_unit {
        let unit = session.toggle_unit();
        tracing::info!("Temperature unit switched to {}", unit.name());
    }

    let submitted = if cli.city.is_some() || cli.state.is_some() {
        session.submit_inputs()
    } else {
        session.resume()
    }
    .map_err(AppError::from)?;

    println!("{}", render::render_state(session.state(), session.unit(), &settings));
    if submitted == SubmitOutcome::Skipped {
        return Ok(ExitCode::SUCCESS);
    }

    session.settle().await.map_err(AppError::from)?;
    println!("{}", render::render_state(session.state(), session.unit(), &settings));

    Ok(match session.phase() {
        Phase::Error => ExitCode::FAILURE,
        _ => ExitCode::SUCCESS,
    })
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    let config = match path {
        Some(path) => {
            if !path.exists() {
                let missing = ConfigError::NotFound(path.display().to_string());
                return Err(AppError::Config(missing).into());
            }
            Config::load_from(path)
        }
        None => Config::load(),
    }
    .map_err(|e| AppError::Config(ConfigError::ParseError(format!("{:#}", e))))?;

    let validation = config.validate();
    if !validation.is_valid() {
        return Err(AppError::Config(ConfigError::Invalid(validation.error_summary())).into());
    }
    for warning in &validation.warnings {
        tracing::warn!("Config warning: {}", warning);
    }

    Ok(config)
}
