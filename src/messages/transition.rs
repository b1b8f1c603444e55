//! Region enter/leave events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::enums::{TransitionEvent, Trigger};
use super::epoch_to_utc;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MessageTransition {
    pub event: TransitionEvent,
    pub lat: f64,
    pub lon: f64,

    /// Event time, epoch seconds.
    pub tst: i64,

    /// Creation time of the waypoint that was crossed.
    pub wtst: i64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub acc: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub t: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tid: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub rid: Option<String>,
}

impl MessageTransition {
    pub fn new(event: TransitionEvent, lat: f64, lon: f64, tst: i64, wtst: i64) -> Self {
        Self {
            event,
            lat,
            lon,
            tst,
            wtst,
            acc: None,
            desc: None,
            t: None,
            tid: None,
            rid: None,
        }
    }

    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.desc = Some(desc.into());
        self
    }

    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        epoch_to_utc(self.tst)
    }

    pub fn trigger(&self) -> Option<Trigger> {
        self.t.as_deref().and_then(Trigger::from_code)
    }
}
