//! Weather session controller.
//!
//! Owns the request lifecycle (`Idle -> Loading -> Success | Error`), the
//! user's input fields and the derived theming facts. Fetches run on the
//! tokio runtime and report back over a channel tagged with a monotonic
//! request id; only the latest submission's result is applied.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::classify::DerivedFacts;
use crate::client::WeatherFetcher;
use crate::error::{SessionError, TransportError};
use crate::preferences::{PreferenceStore, UserPreferences, KEY_CITY, KEY_STATE, KEY_UNIT};
use crate::types::{SubmittedQuery, TemperatureUnit, WeatherSnapshot};

/// Identifies one submission. Strictly increasing per session.
pub type RequestId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading,
    Success,
    Error,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Phase::Idle => "Idle",
            Phase::Loading => "Loading",
            Phase::Success => "Success",
            Phase::Error => "Error",
        };
        f.write_str(name)
    }
}

/// Session state. A snapshot and derived facts exist only in `Success`.
#[derive(Debug, Clone, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Loading {
        request_id: RequestId,
    },
    Success {
        snapshot: Arc<WeatherSnapshot>,
        derived: DerivedFacts,
    },
    Error,
}

/// Inputs to the transition table.
#[derive(Debug)]
pub enum SessionEvent {
    Submit {
        request_id: RequestId,
    },
    FetchSucceeded {
        request_id: RequestId,
        snapshot: WeatherSnapshot,
    },
    FetchFailed {
        request_id: RequestId,
    },
}

impl SessionEvent {
    pub fn name(&self) -> &'static str {
        match self {
            SessionEvent::Submit { .. } => "SUBMIT",
            SessionEvent::FetchSucceeded { .. } => "FETCH_SUCCEEDED",
            SessionEvent::FetchFailed { .. } => "FETCH_FAILED",
        }
    }
}

impl SessionState {
    pub fn phase(&self) -> Phase {
        match self {
            SessionState::Idle => Phase::Idle,
            SessionState::Loading { .. } => Phase::Loading,
            SessionState::Success { .. } => Phase::Success,
            SessionState::Error => Phase::Error,
        }
    }

    pub fn snapshot(&self) -> Option<&WeatherSnapshot> {
        match self {
            SessionState::Success { snapshot, .. } => Some(snapshot),
            _ => None,
        }
    }

    pub fn derived(&self) -> Option<DerivedFacts> {
        match self {
            SessionState::Success { derived, .. } => Some(*derived),
            _ => None,
        }
    }

    /// Compute the next state. Events with no transition from the current
    /// phase are rejected with `InvalidTransition`.
    pub fn apply(&self, event: SessionEvent) -> Result<SessionState, SessionError> {
        let event_name = event.name();
        match (self, event) {
            (_, SessionEvent::Submit { request_id }) => Ok(SessionState::Loading { request_id }),
            (
                SessionState::Loading { request_id },
                SessionEvent::FetchSucceeded {
                    request_id: done,
                    snapshot,
                },
            ) if *request_id == done => {
                let derived = DerivedFacts::from_current(&snapshot.current);
                Ok(SessionState::Success {
                    snapshot: Arc::new(snapshot),
                    derived,
                })
            }
            (
                SessionState::Loading { request_id },
                SessionEvent::FetchFailed { request_id: done },
            ) if *request_id == done => Ok(SessionState::Error),
            (state, _) => Err(SessionError::InvalidTransition {
                phase: state.phase(),
                event: event_name,
            }),
        }
    }
}

/// Which parts of the session are enabled.
///
/// `SessionOptions::basic()` is the plain current-conditions client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOptions {
    /// Use the forecast endpoint so snapshots carry hourly rows.
    pub include_forecast: bool,
    /// Whether the presentation layer should apply derived facts as a theme.
    pub include_theming: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            include_forecast: true,
            include_theming: true,
        }
    }
}

impl SessionOptions {
    pub fn basic() -> Self {
        Self {
            include_forecast: false,
            include_theming: false,
        }
    }
}

/// Result of a fetch task, tagged with the submission it belongs to.
#[derive(Debug)]
pub struct FetchOutcome {
    pub request_id: RequestId,
    pub result: Result<WeatherSnapshot, TransportError>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Both fields were empty; nothing was fetched.
    Skipped,
    Started(RequestId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// The outcome belonged to the latest submission; the new phase.
    Current(Phase),
    /// The outcome was superseded by a newer submission and dropped.
    Stale,
}

pub struct WeatherSession {
    fetcher: Arc<dyn WeatherFetcher>,
    store: PreferenceStore,
    inputs: UserPreferences,
    options: SessionOptions,
    state: SessionState,
    last_submitted: Option<SubmittedQuery>,
    current_request: Option<RequestId>,
    next_request: RequestId,
    /// Fetches spawned whose outcome has not been received yet.
    in_flight: usize,
    outcome_tx: mpsc::UnboundedSender<FetchOutcome>,
    outcome_rx: mpsc::UnboundedReceiver<FetchOutcome>,
}

impl WeatherSession {
    /// Create an idle session with input fields restored from `store`.
    pub fn new(
        fetcher: Arc<dyn WeatherFetcher>,
        store: PreferenceStore,
        options: SessionOptions,
    ) -> Self {
        let inputs = UserPreferences::load(&store);
        let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();

        Self {
            fetcher,
            store,
            inputs,
            options,
            state: SessionState::Idle,
            last_submitted: None,
            current_request: None,
            next_request: 0,
            in_flight: 0,
            outcome_tx,
            outcome_rx,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    pub fn options(&self) -> SessionOptions {
        self.options
    }

    /// Current input fields (not necessarily submitted).
    pub fn inputs(&self) -> &UserPreferences {
        &self.inputs
    }

    pub fn unit(&self) -> TemperatureUnit {
        self.inputs.unit
    }

    pub fn last_submitted(&self) -> Option<&SubmittedQuery> {
        self.last_submitted.as_ref()
    }

    /// False when both input fields are empty.
    pub fn can_submit(&self) -> bool {
        !self.inputs.to_query().is_empty()
    }

    pub fn set_city(&mut self, city: impl Into<String>) {
        let city = city.into();
        if city != self.inputs.city {
            self.inputs.city = city;
            self.persist(KEY_CITY, &self.inputs.city);
        }
    }

    pub fn set_state(&mut self, state: impl Into<String>) {
        let state = state.into();
        if state != self.inputs.state {
            self.inputs.state = state;
            self.persist(KEY_STATE, &self.inputs.state);
        }
    }

    pub fn set_unit(&mut self, unit: TemperatureUnit) {
        if unit != self.inputs.unit {
            self.inputs.unit = unit;
            self.persist(KEY_UNIT, unit.code());
        }
    }

    /// Flip between Fahrenheit and Celsius; returns the new unit.
    pub fn toggle_unit(&mut self) -> TemperatureUnit {
        let unit = self.inputs.unit.toggled();
        self.set_unit(unit);
        unit
    }

    fn persist(&self, key: &str, value: &str) {
        if self.store.set(key, value).is_err() {
            tracing::debug!("Preference '{}' kept in memory only", key);
        }
    }

    /// Submit the current input fields.
    pub fn submit_inputs(&mut self) -> Result<SubmitOutcome, SessionError> {
        let query = self.inputs.to_query();
        self.submit(query)
    }

    /// Fetch the restored location once at startup, if there is one.
    pub fn resume(&mut self) -> Result<SubmitOutcome, SessionError> {
        if self.last_submitted.is_some() {
            return Ok(SubmitOutcome::Skipped);
        }
        self.submit_inputs()
    }

    /// Enter `Loading` and start a fetch for `query`.
    ///
    /// Empty queries are ignored. An unchanged query is fetched again.
    pub fn submit(&mut self, query: SubmittedQuery) -> Result<SubmitOutcome, SessionError> {
        if query.is_empty() {
            tracing::debug!("Ignoring submit with empty city and state");
            return Ok(SubmitOutcome::Skipped);
        }

        self.next_request += 1;
        let request_id = self.next_request;
        self.dispatch(SessionEvent::Submit { request_id })?;
        self.current_request = Some(request_id);

        let location = query.location_param();
        tracing::info!("Fetching weather for '{}' (request {})", location, request_id);
        self.spawn_fetch(request_id, location);
        self.last_submitted = Some(query);

        Ok(SubmitOutcome::Started(request_id))
    }

    fn spawn_fetch(&mut self, request_id: RequestId, location: String) {
        self.in_flight += 1;
        let tx = self.outcome_tx.clone();
        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(_) => {
                let _ = tx.send(FetchOutcome {
                    request_id,
                    result: Err(TransportError::Request(
                        "no async runtime available".to_string(),
                    )),
                });
                return;
            }
        };

        let fetcher = Arc::clone(&self.fetcher);
        let forecast = self.options.include_forecast;
        runtime.spawn(async move {
            let result = fetcher.fetch(&location, forecast).await;
            let _ = tx.send(FetchOutcome { request_id, result });
        });
    }

    /// Apply a finished fetch. Results for superseded submissions are dropped.
    pub fn apply_outcome(&mut self, outcome: FetchOutcome) -> Result<Applied, SessionError> {
        let request_id = outcome.request_id;
        if let Some(current) = self.current_request {
            if request_id != current {
                tracing::debug!(
                    "Discarding stale weather result for request {} (current {})",
                    request_id,
                    current
                );
                return Ok(Applied::Stale);
            }
        }

        let event = match outcome.result {
            Ok(snapshot) => {
                tracing::info!(
                    "Weather loaded for {}, {}",
                    snapshot.location.name,
                    snapshot.location.region
                );
                SessionEvent::FetchSucceeded {
                    request_id,
                    snapshot,
                }
            }
            Err(e) => {
                tracing::error!("Failed to fetch weather: {}", e);
                SessionEvent::FetchFailed { request_id }
            }
        };

        self.dispatch(event)?;
        Ok(Applied::Current(self.state.phase()))
    }

    /// Number of fetches still running, stale ones included.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Apply one finished fetch if any is waiting, without blocking.
    pub fn try_poll(&mut self) -> Result<Option<Applied>, SessionError> {
        match self.outcome_rx.try_recv() {
            Ok(outcome) => {
                self.in_flight = self.in_flight.saturating_sub(1);
                self.apply_outcome(outcome).map(Some)
            }
            Err(mpsc::error::TryRecvError::Empty) => Ok(None),
            Err(mpsc::error::TryRecvError::Disconnected) => Err(SessionError::ChannelClosed),
        }
    }

    /// Wait for the next finished fetch and apply it.
    ///
    /// Fails with `NothingPending` instead of waiting when no fetch is running.
    pub async fn next_outcome(&mut self) -> Result<Applied, SessionError> {
        if self.in_flight == 0 {
            return Err(SessionError::NothingPending);
        }
        let outcome = self
            .outcome_rx
            .recv()
            .await
            .ok_or(SessionError::ChannelClosed)?;
        self.in_flight -= 1;
        self.apply_outcome(outcome)
    }

    /// Wait until the latest submission has resolved.
    pub async fn settle(&mut self) -> Result<&SessionState, SessionError> {
        while self.state.phase() == Phase::Loading {
            self.next_outcome().await?;
        }
        Ok(&self.state)
    }

    fn dispatch(&mut self, event: SessionEvent) -> Result<(), SessionError> {
        match self.state.apply(event) {
            Ok(next) => {
                tracing::debug!("Weather session {} -> {}", self.state.phase(), next.phase());
                self.state = next;
                Ok(())
            }
            Err(e) => {
                tracing::error!("{}", e);
                Err(e)
            }
        }
    }
}

impl std::fmt::Debug for WeatherSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeatherSession")
            .field("inputs", &self.inputs)
            .field("options", &self.options)
            .field("phase", &self.state.phase())
            .field("current_request", &self.current_request)
            .finish_non_exhaustive()
    }
}
