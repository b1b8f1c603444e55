//! Monitored regions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::epoch_to_utc;

/// A circular geofence or beacon region (`_type: "waypoint"`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MessageWaypoint {
    pub desc: String,
    pub lat: f64,
    pub lon: f64,

    /// Radius in meters.
    pub rad: i64,

    /// Creation time, epoch seconds. Identifies the region together with `desc`.
    pub tst: i64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub rid: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub major: Option<u16>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub minor: Option<u16>,
}

impl MessageWaypoint {
    pub fn new(desc: impl Into<String>, lat: f64, lon: f64, rad: i64, tst: i64) -> Self {
        Self {
            desc: desc.into(),
            lat,
            lon,
            rad,
            tst,
            rid: None,
            uuid: None,
            major: None,
            minor: None,
        }
    }

    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        epoch_to_utc(self.tst)
    }

    pub fn is_beacon(&self) -> bool {
        self.uuid.is_some()
    }
}

/// A full region set (`_type: "waypoints"`). Entries inside may carry their
/// own `_type`, which is ignored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct MessageWaypoints {
    pub waypoints: Vec<MessageWaypoint>,
}
