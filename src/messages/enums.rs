//! Enumerations carried inside messages.
//!
//! Canonical definitions for the location-sharing wire protocol.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Value of the `_type` discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageType {
    Location,
    Transition,
    Waypoint,
    Waypoints,
    Card,
    Cmd,
    Configuration,
    Lwt,
    Clear,
    Encrypted,
    Unknown,
}

impl MessageType {
    pub fn as_str(self) -> &'static str {
        match self {
            MessageType::Location => "location",
            MessageType::Transition => "transition",
            MessageType::Waypoint => "waypoint",
            MessageType::Waypoints => "waypoints",
            MessageType::Card => "card",
            MessageType::Cmd => "cmd",
            MessageType::Configuration => "configuration",
            MessageType::Lwt => "lwt",
            MessageType::Clear => "clear",
            MessageType::Encrypted => "encrypted",
            MessageType::Unknown => "unknown",
        }
    }

    /// Known variant for a wire tag; `None` for tags this crate does not model.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "location" => Some(MessageType::Location),
            "transition" => Some(MessageType::Transition),
            "waypoint" => Some(MessageType::Waypoint),
            "waypoints" => Some(MessageType::Waypoints),
            "card" => Some(MessageType::Card),
            "cmd" => Some(MessageType::Cmd),
            "configuration" => Some(MessageType::Configuration),
            "lwt" => Some(MessageType::Lwt),
            "clear" => Some(MessageType::Clear),
            "encrypted" => Some(MessageType::Encrypted),
            _ => None,
        }
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Region transition direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransitionEvent {
    Enter,
    Leave,
}

/// What caused a location or transition report (`t` field).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trigger {
    Ping,
    Circular,
    Beacon,
    Response,
    Manual,
    Timer,
    Monitoring,
}

impl Trigger {
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "p" => Some(Trigger::Ping),
            "c" => Some(Trigger::Circular),
            "b" => Some(Trigger::Beacon),
            "r" => Some(Trigger::Response),
            "u" => Some(Trigger::Manual),
            "t" => Some(Trigger::Timer),
            "v" => Some(Trigger::Monitoring),
            _ => None,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Trigger::Ping => "p",
            Trigger::Circular => "c",
            Trigger::Beacon => "b",
            Trigger::Response => "r",
            Trigger::Manual => "u",
            Trigger::Timer => "t",
            Trigger::Monitoring => "v",
        }
    }
}

/// Device battery state (`bs` field).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BatteryStatus {
    Unknown,
    Unplugged,
    Charging,
    Full,
}

impl BatteryStatus {
    pub fn from_code(code: u8) -> Self {
        match code {
            1 => BatteryStatus::Unplugged,
            2 => BatteryStatus::Charging,
            3 => BatteryStatus::Full,
            _ => BatteryStatus::Unknown,
        }
    }
}

/// Remote command action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CommandAction {
    ReportLocation,
    SetWaypoints,
    SetConfiguration,
    Waypoints,
    ClearWaypoints,
    Action,
    Restart,
    Reconnect,
    Dump,
    Status,
}
