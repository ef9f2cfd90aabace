// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Step counter adapter.

use crate::error::{Result, TrackerError};
use crate::sensors::{PermissionStatus, SensorHub, Subscription};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures_util::Stream;
use serde::Serialize;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::task::{Context, Poll};

/// Cumulative steps since the subscription started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SensorReading {
    pub cumulative_steps: u64,
    pub timestamp: DateTime<Utc>,
}

/// Raw device counter sample (steps since the counter was created).
#[derive(Debug, Clone, Copy)]
pub struct RawStepSample {
    pub device_total: u64,
    pub timestamp: DateTime<Utc>,
}

/// Device step counter.
#[async_trait]
pub trait StepSensor: Send + Sync {
    async fn is_available(&self) -> bool;

    /// Prompt for the activity-recognition permission.
    async fn request_permission(&self) -> PermissionStatus;

    /// Start delivering readings. When the sensor is unavailable the returned
    /// subscription never yields.
    async fn subscribe(&self) -> StepSubscription;

    /// Historical query: steps recorded in `[start, end)`.
    async fn steps_between(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<u64>;
}

/// Stream of [`SensorReading`]s rebased to the subscription start.
///
/// Counts never decrease, even if the device reports a lower total.
pub struct StepSubscription {
    inner: Subscription<RawStepSample>,
    baseline: u64,
    last: u64,
}

impl StepSubscription {
    pub fn new(inner: Subscription<RawStepSample>, baseline: u64) -> Self {
        Self {
            inner,
            baseline,
            last: 0,
        }
    }

    /// A subscription that never delivers a reading.
    pub fn inert() -> Self {
        Self::new(Subscription::closed(), 0)
    }

    pub fn cancel(&mut self) {
        self.inner.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.is_cancelled()
    }
}

impl Stream for StepSubscription {
    type Item = SensorReading;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<SensorReading>> {
        match Pin::new(&mut self.inner).poll_next(cx) {
            Poll::Ready(Some(raw)) => {
                let since_start = raw.device_total.saturating_sub(self.baseline);
                let cumulative_steps = since_start.max(self.last);
                self.last = cumulative_steps;
                Poll::Ready(Some(SensorReading {
                    cumulative_steps,
                    timestamp: raw.timestamp,
                }))
            }
            Poll::Ready(None) => Poll::Ready(None),
            Poll::Pending => Poll::Pending,
        }
    }
}

/// Software pedometer driven by test code or a replay script.
pub struct SimulatedPedometer {
    available: bool,
    permission: PermissionStatus,
    hub: SensorHub<RawStepSample>,
    device_total: AtomicU64,
    history: Mutex<Vec<(DateTime<Utc>, u64)>>,
}

impl Default for SimulatedPedometer {
    fn default() -> Self {
        Self {
            available: true,
            permission: PermissionStatus::Granted,
            hub: SensorHub::new(),
            device_total: AtomicU64::new(0),
            history: Mutex::new(Vec::new()),
        }
    }
}

impl SimulatedPedometer {
    pub fn new() -> Self {
        Self::default()
    }

    /// A device without a step counter.
    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::default()
        }
    }

    /// A device whose user answers the permission prompt with `permission`.
    pub fn with_permission(permission: PermissionStatus) -> Self {
        Self {
            permission,
            ..Self::default()
        }
    }

    /// Record `steps` taken now and notify subscribers.
    pub fn walk(&self, steps: u64) -> usize {
        self.walk_at(Utc::now(), steps)
    }

    /// Record `steps` taken at `timestamp` and notify subscribers.
    pub fn walk_at(&self, timestamp: DateTime<Utc>, steps: u64) -> usize {
        if !self.available {
            return 0;
        }
        let device_total = self.device_total.fetch_add(steps, Ordering::SeqCst) + steps;
        self.history
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((timestamp, steps));
        self.hub.publish(RawStepSample {
            device_total,
            timestamp,
        })
    }

    /// Number of live subscriptions holding the sensor.
    pub fn active_subscriptions(&self) -> usize {
        self.hub.active()
    }
}

#[async_trait]
impl StepSensor for SimulatedPedometer {
    async fn is_available(&self) -> bool {
        self.available
    }

    async fn request_permission(&self) -> PermissionStatus {
        self.permission
    }

    async fn subscribe(&self) -> StepSubscription {
        if !self.available {
            return StepSubscription::inert();
        }
        let inner = self.hub.subscribe();
        let baseline = self.device_total.load(Ordering::SeqCst);
        StepSubscription::new(inner, baseline)
    }

    async fn steps_between(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<u64> {
        if !self.available {
            return Err(TrackerError::SensorUnavailable);
        }
        let history = self.history.lock().unwrap_or_else(|e| e.into_inner());
        Ok(history
            .iter()
            .filter(|(ts, _)| *ts >= start && *ts < end)
            .map(|(_, steps)| steps)
            .sum())
    }
}
