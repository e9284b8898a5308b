//! Notification sinks
//!
//! A sink receives rendered notifications. The binary prints them; tests
//! collect them in memory.

use std::collections::BTreeMap;
use std::io::Write;

use super::notification::RenderedNotification;
use crate::error::{PocketError, PocketResult};

/// Receiver of rendered notifications
pub trait NotificationSink {
    fn deliver(&mut self, notification: &RenderedNotification) -> PocketResult<()>;
}

/// Writes one line per notification
pub struct ConsoleSink<W: Write> {
    out: W,
}

impl<W: Write> ConsoleSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> NotificationSink for ConsoleSink<W> {
    fn deliver(&mut self, notification: &RenderedNotification) -> PocketResult<()> {
        writeln!(self.out, "{}", notification)
            .map_err(|e| PocketError::Notification(e.to_string()))
    }
}

/// Keeps the latest notification per key, like a notification tray
#[derive(Debug, Default)]
pub struct MemorySink {
    active: BTreeMap<i64, RenderedNotification>,
    delivered: usize,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Currently shown notifications, ordered by key
    pub fn active(&self) -> impl Iterator<Item = &RenderedNotification> {
        self.active.values()
    }

    pub fn get(&self, key: i64) -> Option<&RenderedNotification> {
        self.active.get(&key)
    }

    /// Total deliveries, including replaced ones
    pub fn delivered(&self) -> usize {
        self.delivered
    }
}

impl NotificationSink for MemorySink {
    fn deliver(&mut self, notification: &RenderedNotification) -> PocketResult<()> {
        self.active.insert(notification.key, notification.clone());
        self.delivered += 1;
        Ok(())
    }
}
