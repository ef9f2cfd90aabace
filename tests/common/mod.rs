// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use stride_tracker::controller::{ControllerSettings, SessionController};
use stride_tracker::error::{Result, TrackerError};
use stride_tracker::models::{Checkpoint, SessionKind};
use stride_tracker::sensors::{SimulatedLocation, SimulatedPedometer};
use stride_tracker::services::api::{
    DailyStepUpdate, EventStepUpdate, FriendStepUpdate, ParticipantProgress, ProgressApi,
};
use stride_tracker::services::SessionStore;
use stride_tracker::storage::{KeyValueStore, MemoryStore};

/// A request the controller made against the API.
#[allow(dead_code)]
#[derive(Debug, Clone, PartialEq)]
pub enum ApiCall {
    DailySteps { id: String, steps: u64 },
    FriendSteps { id: String, update: FriendStepUpdate },
    EventSteps { id: String, update: EventStepUpdate },
    Participate { kind: SessionKind, id: String },
    FriendProgress { id: String },
}

/// In-process `ProgressApi` that records every call.
#[allow(dead_code)]
#[derive(Default)]
pub struct RecordingApi {
    calls: Mutex<Vec<ApiCall>>,
    failing: AtomicBool,
    progress: Mutex<Vec<ParticipantProgress>>,
}

#[allow(dead_code)]
impl RecordingApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every request fails with a server error (still recorded).
    pub fn failing() -> Self {
        let api = Self::default();
        api.failing.store(true, Ordering::SeqCst);
        api
    }

    /// Progress returned by `friend_progress`.
    pub fn set_progress(&self, progress: Vec<ParticipantProgress>) {
        *self.progress.lock().unwrap() = progress;
    }

    pub fn calls(&self) -> Vec<ApiCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: ApiCall) -> Result<()> {
        self.calls.lock().unwrap().push(call);
        if self.failing.load(Ordering::SeqCst) {
            return Err(TrackerError::Api("HTTP 503 Service Unavailable: down".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl ProgressApi for RecordingApi {
    async fn post_daily_steps(&self, challenge_id: &str, update: &DailyStepUpdate) -> Result<()> {
        self.record(ApiCall::DailySteps {
            id: challenge_id.to_string(),
            steps: update.steps,
        })
    }

    async fn post_friend_steps(
        &self,
        challenge_id: &str,
        update: &FriendStepUpdate,
    ) -> Result<()> {
        self.record(ApiCall::FriendSteps {
            id: challenge_id.to_string(),
            update: update.clone(),
        })
    }

    async fn post_event_steps(&self, event_id: &str, update: &EventStepUpdate) -> Result<()> {
        self.record(ApiCall::EventSteps {
            id: event_id.to_string(),
            update: update.clone(),
        })
    }

    async fn participate(&self, kind: SessionKind, id: &str) -> Result<()> {
        self.record(ApiCall::Participate {
            kind,
            id: id.to_string(),
        })
    }

    async fn friend_progress(&self, challenge_id: &str) -> Result<Vec<ParticipantProgress>> {
        self.record(ApiCall::FriendProgress {
            id: challenge_id.to_string(),
        })?;
        Ok(self.progress.lock().unwrap().clone())
    }
}

/// Controller wired to in-memory fakes.
#[allow(dead_code)]
pub struct Harness {
    pub raw: MemoryStore,
    pub store: Arc<SessionStore>,
    pub api: Arc<RecordingApi>,
    pub pedometer: Arc<SimulatedPedometer>,
    pub location: Arc<SimulatedLocation>,
    pub controller: SessionController,
}

#[allow(dead_code)]
pub fn settings() -> ControllerSettings {
    ControllerSettings {
        tick_interval: Duration::from_secs(1),
        sync_every_ticks: 0,
        self_participant_id: Some("me".to_string()),
        ..ControllerSettings::default()
    }
}

#[allow(dead_code)]
pub fn harness() -> Harness {
    harness_with(
        RecordingApi::new(),
        SimulatedPedometer::new(),
        SimulatedLocation::new(),
        settings(),
    )
}

#[allow(dead_code)]
pub fn harness_with(
    api: RecordingApi,
    pedometer: SimulatedPedometer,
    location: SimulatedLocation,
    settings: ControllerSettings,
) -> Harness {
    let raw = MemoryStore::new();
    let storage: Arc<dyn KeyValueStore> = Arc::new(raw.clone());
    let store = Arc::new(SessionStore::new(storage));
    let api = Arc::new(api);
    let pedometer = Arc::new(pedometer);
    let location = Arc::new(location);

    let controller = SessionController::new(
        store.clone(),
        api.clone(),
        pedometer.clone(),
        location.clone(),
        settings,
    );

    Harness {
        raw,
        store,
        api,
        pedometer,
        location,
        controller,
    }
}

/// Let spawned tasks drain their channels.
#[allow(dead_code)]
pub async fn settle() {
    for _ in 0..20 {
        tokio::task::yield_now().await;
    }
}

#[allow(dead_code)]
pub fn checkpoint(id: &str, latitude: f64, longitude: f64, points: u64) -> Checkpoint {
    Checkpoint {
        id: id.to_string(),
        name: format!("Checkpoint {}", id),
        latitude,
        longitude,
        points,
        steps: 0,
        approx_distance: 0.0,
    }
}
