//! Remote commands and device configuration.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::enums::CommandAction;
use super::TYPE_FIELD;
use crate::types::{Error, Result};
use super::waypoint::MessageWaypoints;

/// A command sent to a device (`_type: "cmd"`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MessageCmd {
    pub action: CommandAction,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub waypoints: Option<MessageWaypoints>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub configuration: Option<Map<String, Value>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Notification text shown by the device.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notify: Option<String>,
}

impl MessageCmd {
    pub fn new(action: CommandAction) -> Self {
        Self {
            action,
            waypoints: None,
            configuration: None,
            content: None,
            url: None,
            notify: None,
        }
    }

    pub fn with_waypoints(mut self, waypoints: MessageWaypoints) -> Self {
        self.waypoints = Some(waypoints);
        self
    }

    pub fn with_configuration(mut self, configuration: Map<String, Value>) -> Self {
        self.configuration = Some(configuration);
        self
    }

    pub fn with_notify(mut self, notify: impl Into<String>) -> Self {
        self.notify = Some(notify.into());
        self
    }
}

/// Device preferences (`_type: "configuration"`). Keys are kept verbatim;
/// `_type` is reserved for the message tag.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct MessageConfiguration {
    #[serde(flatten)]
    pub settings: Map<String, Value>,
}

impl MessageConfiguration {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.settings.get(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Result<()> {
        let key = key.into();
        if key == TYPE_FIELD {
            return Err(Error::protocol(format!(
                "configuration key {:?} is reserved",
                TYPE_FIELD
            )));
        }
        self.settings.insert(key, value.into());
        Ok(())
    }
}

/// Contact card (`_type: "card"`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct MessageCard {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Base64-encoded avatar image.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub face: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tid: Option<String>,
}

/// Last-will message published by the broker on disconnect (`_type: "lwt"`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MessageLwt {
    pub tst: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::Message;
    use serde_json::json;

    #[test]
    fn cmd_keeps_notify() {
        let wire = json!({"_type": "cmd", "action": "action", "notify": "hello"});
        let msg: Message = serde_json::from_value(wire.clone()).unwrap();
        match &msg {
            Message::Cmd(cmd) => {
                assert_eq!(cmd.action, CommandAction::Action);
                assert_eq!(cmd.notify.as_deref(), Some("hello"));
            }
            other => panic!("unexpected variant {:?}", other),
        }
        assert_eq!(serde_json::to_value(&msg).unwrap(), wire);
    }

    #[test]
    fn cmd_omits_absent_notify() {
        let msg: Message = MessageCmd::new(CommandAction::Dump).into();
        assert_eq!(
            serde_json::to_value(&msg).unwrap(),
            json!({"_type": "cmd", "action": "dump"})
        );
        let msg: Message = MessageCmd::new(CommandAction::Action).with_notify("hi").into();
        assert_eq!(serde_json::to_value(&msg).unwrap()["notify"], "hi");
    }

    #[test]
    fn configuration_refuses_type_key() {
        let mut config = MessageConfiguration::default();
        config.set("mode", 0).unwrap();
        let err = config.set(TYPE_FIELD, "encrypted").unwrap_err();
        assert!(err.is_protocol());
        assert!(config.get(TYPE_FIELD).is_none());
        assert_eq!(config.get("mode"), Some(&json!(0)));
    }
}
