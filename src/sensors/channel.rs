// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Fan-out from one sensor to any number of stream subscribers.

use dashmap::DashMap;
use futures_util::Stream;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::task::{Context, Poll};
use tokio::sync::mpsc;

/// Publishing side of a sensor.
pub struct SensorHub<T> {
    subscribers: DashMap<u64, mpsc::UnboundedSender<T>>,
    next_id: AtomicU64,
}

impl<T> Default for SensorHub<T> {
    fn default() -> Self {
        Self {
            subscribers: DashMap::new(),
            next_id: AtomicU64::new(0),
        }
    }
}

impl<T: Clone> SensorHub<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new subscriber.
    pub fn subscribe(&self) -> Subscription<T> {
        let (tx, rx) = mpsc::unbounded_channel();
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.subscribers.insert(id, tx);
        Subscription { rx: Some(rx) }
    }

    /// Deliver `value` to every live subscriber, dropping closed ones.
    ///
    /// Returns the number of subscribers that received it.
    pub fn publish(&self, value: T) -> usize {
        self.subscribers
            .retain(|_, tx| tx.send(value.clone()).is_ok());
        self.subscribers.len()
    }

    /// Number of subscribers that have not been cancelled or dropped.
    pub fn active(&self) -> usize {
        self.subscribers.retain(|_, tx| !tx.is_closed());
        self.subscribers.len()
    }
}

/// Receiving side: a stream of sensor values.
pub struct Subscription<T> {
    rx: Option<mpsc::UnboundedReceiver<T>>,
}

impl<T> Subscription<T> {
    /// A subscription that never yields (used when the sensor is unavailable).
    pub fn closed() -> Self {
        Self { rx: None }
    }

    /// Stop delivery and release the sensor handle. Idempotent.
    pub fn cancel(&mut self) {
        if let Some(mut rx) = self.rx.take() {
            rx.close();
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.rx.is_none()
    }
}

impl<T> Stream for Subscription<T> {
    type Item = T;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<T>> {
        match self.rx.as_mut() {
            Some(rx) => rx.poll_recv(cx),
            None => Poll::Ready(None),
        }
    }
}
