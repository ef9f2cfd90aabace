// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Controller for one active session.
//!
//! Lifecycle: Idle → `start()`/`resume()` → Running → `end()` → Ended.
//! `dispose()` tears the tasks down without ending the session, leaving the
//! persisted state for a later `resume()`.

use crate::controller::sync::{refresh_friend_progress, submit_participation, submit_steps};
use crate::controller::{
    Alert, CaptureOutcome, ControllerEvent, ControllerSettings, ControllerSnapshot,
    ControllerStatus, GeofenceStatus, SensorStatus, SessionSummary,
};
use crate::error::{Result, TrackerError};
use crate::models::{Session, SessionKind};
use crate::sensors::{LocationFix, LocationSource, LocationWatch, StepSensor, StepSubscription};
use crate::services::geofence::Proximity;
use crate::services::{rank_participants, ProgressApi, SessionStore};
use crate::time_utils::format_elapsed;
use futures_util::StreamExt;
use std::sync::Arc;
use tokio::sync::{broadcast, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};
use tokio_util::sync::CancellationToken;

const EVENT_CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, Default)]
struct ControllerState {
    status: ControllerStatus,
    sensor: SensorStatus,
    geofence: GeofenceStatus,
    proximity: Proximity,
}

struct RunningTasks {
    cancel: CancellationToken,
    handles: Vec<JoinHandle<()>>,
}

/// Orchestrates timers, sensors, and geofencing for the active session.
#[derive(Clone)]
pub struct SessionController {
    store: Arc<SessionStore>,
    api: Arc<dyn ProgressApi>,
    pedometer: Arc<dyn StepSensor>,
    location: Arc<dyn LocationSource>,
    settings: ControllerSettings,
    state: Arc<Mutex<ControllerState>>,
    tasks: Arc<Mutex<Option<RunningTasks>>>,
    events: broadcast::Sender<ControllerEvent>,
}

impl SessionController {
    pub fn new(
        store: Arc<SessionStore>,
        api: Arc<dyn ProgressApi>,
        pedometer: Arc<dyn StepSensor>,
        location: Arc<dyn LocationSource>,
        settings: ControllerSettings,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            store,
            api,
            pedometer,
            location,
            settings,
            state: Arc::new(Mutex::new(ControllerState::default())),
            tasks: Arc::new(Mutex::new(None)),
            events,
        }
    }

    /// Receive UI notifications (alerts, proximity, captures, end).
    pub fn subscribe_events(&self) -> broadcast::Receiver<ControllerEvent> {
        self.events.subscribe()
    }

    pub fn store(&self) -> &Arc<SessionStore> {
        &self.store
    }

    pub async fn status(&self) -> ControllerStatus {
        self.state.lock().await.status
    }

    pub async fn snapshot(&self) -> ControllerSnapshot {
        let (status, sensor, geofence, proximity) = {
            let state = self.state.lock().await;
            (
                state.status,
                state.sensor,
                state.geofence,
                state.proximity.clone(),
            )
        };
        let stored = self.store.snapshot().await;

        ControllerSnapshot {
            status,
            sensor,
            geofence,
            proximity,
            session: stored.session,
            steps: stored.steps,
            points: stored.points,
            elapsed_secs: stored.elapsed_secs,
            elapsed_display: format_elapsed(stored.elapsed_secs),
        }
    }

    // ─── Lifecycle ───────────────────────────────────────────────

    /// Start a new session, replacing whatever the store held.
    pub async fn start(&self, session: Session) -> Result<()> {
        self.ensure_not_running().await?;

        self.store.start_session(session.clone()).await;
        submit_participation(self.api.clone(), &session);
        self.launch(session).await;
        Ok(())
    }

    /// Reconstruct a running session from the store's persisted state.
    pub async fn resume(&self) -> Result<Session> {
        self.ensure_not_running().await?;

        let session = self
            .store
            .session()
            .await
            .ok_or(TrackerError::NoActiveSession)?;
        tracing::info!(session_id = session.id(), "Resuming session");
        self.launch(session.clone()).await;
        Ok(session)
    }

    /// End the running session and produce its summary.
    pub async fn end(&self) -> Result<SessionSummary> {
        if self.status().await != ControllerStatus::Running {
            return Err(TrackerError::NotRunning);
        }

        self.stop_tasks().await;
        {
            let mut state = self.state.lock().await;
            state.status = ControllerStatus::Ended;
            state.sensor = SensorStatus::Inactive;
            state.proximity = Proximity::default();
        }

        let stored = self.store.snapshot().await;
        let session = stored.session.ok_or(TrackerError::NoActiveSession)?;

        let leaderboard = match &session {
            Session::FriendChallenge(challenge) => Some(rank_participants(
                &challenge.participants,
                challenge.target_steps,
            )),
            _ => None,
        };

        submit_steps(self.api.clone(), &session, stored.steps, true);
        self.store.end_session().await;

        let summary = SessionSummary {
            session,
            steps: stored.steps,
            points: stored.points,
            elapsed_secs: stored.elapsed_secs,
            leaderboard,
        };
        tracing::info!(
            session_id = summary.session.id(),
            steps = summary.steps,
            points = summary.points,
            elapsed_secs = summary.elapsed_secs,
            "Session ended"
        );
        self.emit(ControllerEvent::SessionEnded {
            summary: summary.clone(),
        });
        Ok(summary)
    }

    /// Tear down timers and subscriptions without ending the session.
    pub async fn dispose(&self) {
        self.stop_tasks().await;
        let mut state = self.state.lock().await;
        *state = ControllerState::default();
    }

    /// Award the points of the checkpoint currently within activation radius.
    ///
    /// Captures do not consume the checkpoint; capturing again awards again.
    pub async fn capture(&self) -> Result<CaptureOutcome> {
        let nearby = {
            let state = self.state.lock().await;
            if state.status != ControllerStatus::Running {
                return Err(TrackerError::NotRunning);
            }
            state.proximity.nearby.clone()
        };
        let checkpoint = nearby.ok_or(TrackerError::NoCheckpointInRange)?;

        let total_points = self.store.add_points(checkpoint.points).await;
        tracing::info!(
            checkpoint_id = %checkpoint.id,
            points = checkpoint.points,
            total_points,
            "Checkpoint captured"
        );
        self.emit(ControllerEvent::CheckpointCaptured {
            checkpoint: checkpoint.clone(),
            total_points,
        });

        Ok(CaptureOutcome {
            points_awarded: checkpoint.points,
            checkpoint,
            total_points,
        })
    }

    // ─── Internals ───────────────────────────────────────────────

    async fn ensure_not_running(&self) -> Result<()> {
        if self.status().await == ControllerStatus::Running {
            return Err(TrackerError::SessionAlreadyRunning);
        }
        Ok(())
    }

    fn emit(&self, event: ControllerEvent) {
        // No receivers is fine
        let _ = self.events.send(event);
    }

    fn alert(&self, title: &str, message: &str) {
        self.emit(ControllerEvent::Alert(Alert {
            title: title.to_string(),
            message: message.to_string(),
        }));
    }

    async fn launch(&self, session: Session) {
        let cancel = CancellationToken::new();
        let mut handles = Vec::new();

        let sensor = if !self.pedometer.is_available().await {
            tracing::warn!("Step sensor unavailable");
            self.emit(ControllerEvent::SensorUnavailable);
            SensorStatus::Unavailable
        } else if !self.pedometer.request_permission().await.is_granted() {
            tracing::warn!("Activity permission denied");
            self.alert(
                "Permission required",
                "Step counting needs motion & fitness access. Enable it in Settings to track steps.",
            );
            SensorStatus::PermissionDenied
        } else {
            let subscription = self.pedometer.subscribe().await;
            let base_steps = self.store.steps().await;
            handles.push(tokio::spawn(self.clone().run_steps(
                subscription,
                base_steps,
                cancel.clone(),
            )));
            SensorStatus::Active
        };

        let geofence = if session.kind() == SessionKind::Event {
            match self.open_location_watch().await {
                Some(watch) => {
                    handles.push(tokio::spawn(self.clone().run_location(watch, cancel.clone())));
                    GeofenceStatus::Active
                }
                None => GeofenceStatus::Disabled,
            }
        } else {
            GeofenceStatus::NotApplicable
        };

        handles.push(tokio::spawn(self.clone().run_clock(cancel.clone())));

        {
            let mut state = self.state.lock().await;
            *state = ControllerState {
                status: ControllerStatus::Running,
                sensor,
                geofence,
                proximity: Proximity::default(),
            };
        }
        *self.tasks.lock().await = Some(RunningTasks { cancel, handles });

        tracing::info!(
            session_id = session.id(),
            kind = %session.kind(),
            sensor = ?sensor,
            geofence = ?geofence,
            "Session running"
        );
    }

    /// Start the location watch, or `None` if permission is denied.
    async fn open_location_watch(&self) -> Option<LocationWatch> {
        if !self.location.request_permission().await.is_granted() {
            tracing::warn!("Location permission denied; checkpoint proximity disabled");
            self.alert(
                "Location disabled",
                "Checkpoints can't be detected without location access.",
            );
            return None;
        }
        Some(self.location.watch().await)
    }

    async fn stop_tasks(&self) {
        let Some(tasks) = self.tasks.lock().await.take() else {
            return;
        };
        tasks.cancel.cancel();
        for handle in tasks.handles {
            if let Err(e) = handle.await {
                tracing::warn!(error = %e, "Session task failed to join");
            }
        }
    }

    async fn run_clock(self, cancel: CancellationToken) {
        let period = self.settings.tick_interval;
        let mut interval = time::interval_at(Instant::now() + period, period);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = interval.tick() => {
                    let elapsed = self.store.tick().await;
                    let every = u64::from(self.settings.sync_every_ticks);
                    if every > 0 && elapsed % every == 0 {
                        self.sync_progress().await;
                    }
                }
            }
        }
    }

    async fn run_steps(
        self,
        mut subscription: StepSubscription,
        base_steps: u64,
        cancel: CancellationToken,
    ) {
        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                reading = subscription.next() => match reading {
                    Some(reading) => self.on_steps(base_steps + reading.cumulative_steps).await,
                    None => break,
                },
            }
        }
        subscription.cancel();
    }

    async fn on_steps(&self, steps: u64) {
        tracing::debug!(steps, "Step reading");
        self.store.update_steps(steps).await;

        if let Some(self_id) = &self.settings.self_participant_id {
            self.store.update_progress(self_id, steps).await;
        }
    }

    async fn run_location(self, mut watch: LocationWatch, cancel: CancellationToken) {
        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                fix = watch.next() => match fix {
                    Some(fix) => self.on_location(fix).await,
                    None => break,
                },
            }
        }
        watch.cancel();
    }

    async fn on_location(&self, fix: LocationFix) {
        self.store.place_fixed_checkpoints(fix.coordinate).await;

        let Some(session) = self.store.session().await else {
            return;
        };
        let proximity = self
            .settings
            .radii
            .evaluate(fix.coordinate, session.checkpoints());

        let newly_nearby = {
            let mut state = self.state.lock().await;
            let previous = state.proximity.nearby.as_ref().map(|c| c.id.clone());
            let current = proximity.nearby.clone();
            state.proximity = proximity;
            current.filter(|c| previous.as_deref() != Some(c.id.as_str()))
        };

        if let Some(checkpoint) = newly_nearby {
            tracing::info!(checkpoint_id = %checkpoint.id, "Checkpoint nearby");
            self.emit(ControllerEvent::CheckpointNearby { checkpoint });
        }
    }

    async fn sync_progress(&self) {
        let stored = self.store.snapshot().await;
        let Some(session) = stored.session else {
            return;
        };

        submit_steps(self.api.clone(), &session, stored.steps, false);

        if let Session::FriendChallenge(challenge) = &session {
            refresh_friend_progress(
                self.api.clone(),
                self.store.clone(),
                challenge.id.clone(),
                self.settings.self_participant_id.clone(),
            );
        }
    }
}
