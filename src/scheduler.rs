//! Periodic refresh and display-state management
//!
//! [`RefreshScheduler`] owns a single "current observation or error"
//! cell, published through a tokio `watch` channel. The cell is always
//! overwritten wholesale: a computation attempt ends in `Ready` or
//! `Failed`, never a mix of a stale observation and a new error.
//!
//! Three triggers feed one recompute path: the 60-second interval timer,
//! manual [`refresh`](RefreshScheduler::refresh) commands, and location
//! changes. Timer ticks reuse the cached coordinate rather than
//! re-resolving the device location, so consumers are not spammed with
//! permission prompts once a minute.

use crate::calculator::VisibilityCalculator;
use crate::ephemeris::Ephemeris;
use crate::error::{Error, Result};
use crate::types::{Coordinate, LocationSelection, MoonObservation, ResolvedLocation};
use chrono::Utc;
use log::{debug, warn};
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};

/// Cadence of the automatic recomputation
pub const REFRESH_INTERVAL: Duration = Duration::from_secs(60);

/// Source of the device's own position
///
/// Implementations wrap whatever geolocation capability the platform
/// offers; failures (denied, unsupported, timed out) map to
/// [`Error::LocationUnavailable`].
pub trait LocationProvider {
    fn device_location(&self) -> Result<Coordinate>;
}

/// A fixed coordinate standing in for device geolocation
///
/// Handy for tests and headless deployments.
#[derive(Debug, Clone, Copy)]
pub struct StaticLocation(pub Coordinate);

impl LocationProvider for StaticLocation {
    fn device_location(&self) -> Result<Coordinate> {
        Ok(self.0)
    }
}

/// Best-effort coordinate → place-name lookup
///
/// Failures map to [`Error::GeocodeUnavailable`] and are never fatal:
/// the scheduler logs them and leaves the place unset, so the display
/// falls back to raw coordinates.
pub trait ReverseGeocoder {
    fn place_name(&self, coordinate: &Coordinate) -> Result<String>;
}

/// A geocoder that never resolves anything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoGeocoder;

impl ReverseGeocoder for NoGeocoder {
    fn place_name(&self, _coordinate: &Coordinate) -> Result<String> {
        Err(Error::GeocodeUnavailable("geocoding disabled".into()))
    }
}

/// An observation paired with the location it was computed for
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct MoonSnapshot {
    pub observation: MoonObservation,
    pub location: ResolvedLocation,
}

/// What the display layer should currently show
///
/// `Idle -> Loading -> Ready | Failed`, re-entering `Loading` on any
/// trigger. Last write wins; no ordering is enforced between racing
/// triggers.
#[derive(Debug, Clone, PartialEq)]
pub enum DisplayState {
    Idle,
    Loading,
    Ready(MoonSnapshot),
    Failed(Error),
}

impl DisplayState {
    pub fn is_ready(&self) -> bool {
        matches!(self, DisplayState::Ready(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, DisplayState::Failed(_))
    }
}

enum Command {
    Refresh,
    SelectLocation(LocationSelection),
}

/// Handle to the background refresh task
///
/// Dropping the handle (or calling [`shutdown`](Self::shutdown)) closes
/// the command channel; the task observes the closure, cancels its
/// timer and exits, so nothing keeps publishing into a torn-down
/// display layer.
pub struct RefreshScheduler {
    commands: mpsc::Sender<Command>,
    state: watch::Receiver<DisplayState>,
    task: JoinHandle<()>,
}

impl RefreshScheduler {
    /// Spawn the refresh task on the current tokio runtime
    ///
    /// Performs one immediate resolution + computation for `initial`,
    /// then recomputes every [`REFRESH_INTERVAL`] and on every command.
    pub fn spawn<E, L, G>(
        ephemeris: E,
        locations: L,
        geocoder: G,
        initial: LocationSelection,
    ) -> Self
    where
        E: Ephemeris + Send + 'static,
        L: LocationProvider + Send + 'static,
        G: ReverseGeocoder + Send + 'static,
    {
        let (commands, command_rx) = mpsc::channel(8);
        let (state_tx, state) = watch::channel(DisplayState::Idle);

        let worker = Worker {
            calculator: VisibilityCalculator::new(ephemeris),
            locations,
            geocoder,
            state: state_tx,
        };
        let task = tokio::spawn(worker.run(initial, command_rx));

        Self {
            commands,
            state,
            task,
        }
    }

    /// A fresh receiver for the display-state cell
    ///
    /// The receiver coalesces: a consumer that falls behind sees only
    /// the most recent state, which is exactly the last-write-wins
    /// contract.
    pub fn subscribe(&self) -> watch::Receiver<DisplayState> {
        self.state.clone()
    }

    /// The most recently published state
    pub fn current_state(&self) -> DisplayState {
        self.state.borrow().clone()
    }

    /// Request an immediate recomputation
    ///
    /// Returns `false` if the background task has already exited.
    pub async fn refresh(&self) -> bool {
        self.commands.send(Command::Refresh).await.is_ok()
    }

    /// Switch the active location and recompute immediately
    pub async fn select_location(&self, selection: LocationSelection) -> bool {
        self.commands
            .send(Command::SelectLocation(selection))
            .await
            .is_ok()
    }

    /// Stop the background task and wait for it to exit
    pub async fn shutdown(self) {
        drop(self.commands);
        let _ = self.task.await;
    }
}

struct Worker<E, L, G> {
    calculator: VisibilityCalculator<E>,
    locations: L,
    geocoder: G,
    state: watch::Sender<DisplayState>,
}

impl<E, L, G> Worker<E, L, G>
where
    E: Ephemeris,
    L: LocationProvider,
    G: ReverseGeocoder,
{
    async fn run(self, initial: LocationSelection, mut commands: mpsc::Receiver<Command>) {
        let mut selection = initial;
        let mut cached = self.resolve_and_compute(&selection);

        // The immediate computation above replaces the usual
        // zero-delay first tick.
        let mut ticker = interval_at(Instant::now() + REFRESH_INTERVAL, REFRESH_INTERVAL);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                command = commands.recv() => match command {
                    None => break,
                    Some(Command::Refresh) => {
                        debug!("manual refresh requested");
                        if let Some(location) = &cached {
                            self.compute(location);
                        } else {
                            // Resolution failed earlier; a manual retry
                            // is the designated recovery path.
                            cached = self.resolve_and_compute(&selection);
                        }
                    }
                    Some(Command::SelectLocation(new_selection)) => {
                        debug!("location changed");
                        selection = new_selection;
                        cached = self.resolve_and_compute(&selection);
                    }
                },
                _ = ticker.tick() => {
                    if let Some(location) = &cached {
                        self.compute(location);
                    }
                }
            }
        }

        debug!("refresh task shutting down");
    }

    /// Resolve the selection, then compute; caches the resolution
    fn resolve_and_compute(&self, selection: &LocationSelection) -> Option<ResolvedLocation> {
        self.state.send_replace(DisplayState::Loading);

        let location = match self.resolve(selection) {
            Ok(location) => location,
            Err(err) => {
                warn!("location resolution failed: {err}");
                self.state.send_replace(DisplayState::Failed(err));
                return None;
            }
        };

        self.compute(&location);
        Some(location)
    }

    fn resolve(&self, selection: &LocationSelection) -> Result<ResolvedLocation> {
        match selection {
            LocationSelection::Preset(named) => Ok(ResolvedLocation {
                coordinate: named.coordinate,
                place: Some(named.name.clone()),
            }),
            LocationSelection::Device => {
                let coordinate = self.locations.device_location()?;
                let place = match self.geocoder.place_name(&coordinate) {
                    Ok(place) => Some(place),
                    Err(err) => {
                        // Best-effort only; the display falls back to
                        // raw coordinates.
                        debug!("reverse geocoding failed: {err}");
                        None
                    }
                };
                Ok(ResolvedLocation { coordinate, place })
            }
        }
    }

    /// One atomic computation attempt: publishes `Ready` or `Failed`
    fn compute(&self, location: &ResolvedLocation) {
        self.state.send_replace(DisplayState::Loading);

        let state = match self
            .calculator
            .compute_observation(Utc::now(), &location.coordinate)
        {
            Ok(observation) => DisplayState::Ready(MoonSnapshot {
                observation,
                location: location.clone(),
            }),
            Err(err) => {
                warn!("observation failed: {err}");
                DisplayState::Failed(err)
            }
        };

        self.state.send_replace(state);
    }
}
