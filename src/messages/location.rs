//! Location report.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::enums::{BatteryStatus, Trigger};
use super::epoch_to_utc;

/// A device position fix (`_type: "location"`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct MessageLocation {
    pub lat: f64,
    pub lon: f64,

    /// Fix time, epoch seconds.
    pub tst: i64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub acc: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub alt: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub vac: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub vel: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub cog: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub batt: Option<i32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub bs: Option<u8>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub conn: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub t: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tid: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub inregions: Option<Vec<String>>,

    #[serde(rename = "SSID", skip_serializing_if = "Option::is_none")]
    pub ssid: Option<String>,

    #[serde(rename = "BSSID", skip_serializing_if = "Option::is_none")]
    pub bssid: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
}

impl MessageLocation {
    pub fn new(lat: f64, lon: f64, tst: i64) -> Self {
        Self {
            lat,
            lon,
            tst,
            ..Default::default()
        }
    }

    pub fn with_accuracy(mut self, acc: i64) -> Self {
        self.acc = Some(acc);
        self
    }

    pub fn with_tracker_id(mut self, tid: impl Into<String>) -> Self {
        self.tid = Some(tid.into());
        self
    }

    pub fn with_trigger(mut self, trigger: Trigger) -> Self {
        self.t = Some(trigger.code().to_string());
        self
    }

    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        epoch_to_utc(self.tst)
    }

    /// Parsed trigger; `None` when absent or not a known code.
    pub fn trigger(&self) -> Option<Trigger> {
        self.t.as_deref().and_then(Trigger::from_code)
    }

    pub fn battery_status(&self) -> Option<BatteryStatus> {
        self.bs.map(BatteryStatus::from_code)
    }
}
