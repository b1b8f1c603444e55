//! Message - the unit the codec transcodes.
//!
//! Every wire message is a JSON object tagged by a `_type` field. Variants:
//! - **Plain messages**: location, transition, waypoint(s), card, cmd,
//!   configuration, lwt, clear
//! - **Encrypted**: an envelope carrying only opaque `data` ciphertext
//! - **Unknown**: any other `_type`, accepted for forward compatibility
//!
//! Fields not named by a variant are ignored on decode. Unknown messages keep
//! their tag and every field so they survive a decode/encode pass.

use chrono::{DateTime, Utc};
use serde::de::Error as _;
use serde::ser::Error as _;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

pub mod command;
pub mod enums;
pub mod location;
pub mod transition;
pub mod waypoint;

pub use command::{MessageCard, MessageCmd, MessageConfiguration, MessageLwt};
pub use enums::*;
pub use location::MessageLocation;
pub use transition::MessageTransition;
pub use waypoint::{MessageWaypoint, MessageWaypoints};

/// Name of the discriminator field.
pub const TYPE_FIELD: &str = "_type";

/// Tag value of the encrypted envelope variant.
pub const ENCRYPTED_TYPE: &str = "encrypted";

/// Encrypted envelope: `{"_type":"encrypted","data":"<base64>"}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EncryptedEnvelope {
    pub data: String,
}

impl EncryptedEnvelope {
    pub fn new(data: impl Into<String>) -> Self {
        Self { data: data.into() }
    }
}

/// Message with a `_type` this crate does not model.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UnknownMessage {
    /// Original `_type` value.
    pub message_type: String,

    /// Every other field, verbatim.
    pub fields: Map<String, Value>,
}

/// A decoded or to-be-encoded message.
#[allow(clippy::large_enum_variant)]
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    Location(MessageLocation),
    Transition(MessageTransition),
    Waypoint(MessageWaypoint),
    Waypoints(MessageWaypoints),
    Card(MessageCard),
    Cmd(MessageCmd),
    Configuration(MessageConfiguration),
    Lwt(MessageLwt),
    Clear,
    Encrypted(EncryptedEnvelope),
    Unknown(UnknownMessage),
}

impl Message {
    pub fn message_type(&self) -> MessageType {
        match self {
            Message::Location(_) => MessageType::Location,
            Message::Transition(_) => MessageType::Transition,
            Message::Waypoint(_) => MessageType::Waypoint,
            Message::Waypoints(_) => MessageType::Waypoints,
            Message::Card(_) => MessageType::Card,
            Message::Cmd(_) => MessageType::Cmd,
            Message::Configuration(_) => MessageType::Configuration,
            Message::Lwt(_) => MessageType::Lwt,
            Message::Clear => MessageType::Clear,
            Message::Encrypted(_) => MessageType::Encrypted,
            Message::Unknown(_) => MessageType::Unknown,
        }
    }

    /// The `_type` written on the wire.
    pub fn type_tag(&self) -> &str {
        match self {
            Message::Unknown(unknown) => &unknown.message_type,
            other => other.message_type().as_str(),
        }
    }

    pub fn is_encrypted(&self) -> bool {
        matches!(self, Message::Encrypted(_))
    }

    pub fn as_encrypted(&self) -> Option<&EncryptedEnvelope> {
        match self {
            Message::Encrypted(envelope) => Some(envelope),
            _ => None,
        }
    }
}

macro_rules! impl_from_payload {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        $(
            impl From<$ty> for Message {
                fn from(payload: $ty) -> Self {
                    Message::$variant(payload)
                }
            }
        )*
    };
}

impl_from_payload!(
    Location(MessageLocation),
    Transition(MessageTransition),
    Waypoint(MessageWaypoint),
    Waypoints(MessageWaypoints),
    Card(MessageCard),
    Cmd(MessageCmd),
    Configuration(MessageConfiguration),
    Lwt(MessageLwt),
    Encrypted(EncryptedEnvelope),
);

impl Serialize for Message {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let payload = match self {
            Message::Location(m) => to_object(m),
            Message::Transition(m) => to_object(m),
            Message::Waypoint(m) => to_object(m),
            Message::Waypoints(m) => to_object(m),
            Message::Card(m) => to_object(m),
            Message::Cmd(m) => to_object(m),
            Message::Configuration(m) => to_object(m),
            Message::Lwt(m) => to_object(m),
            Message::Clear => Ok(Map::new()),
            Message::Encrypted(m) => to_object(m),
            Message::Unknown(m) => Ok(m.fields.clone()),
        };
        let mut fields = payload.map_err(S::Error::custom)?;
        fields.insert(TYPE_FIELD.to_string(), Value::String(self.type_tag().to_string()));
        fields.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Message {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut fields = Map::<String, Value>::deserialize(deserializer)?;
        let tag = match fields.remove(TYPE_FIELD) {
            Some(Value::String(tag)) => tag,
            Some(_) => return Err(D::Error::custom("`_type` must be a string")),
            None => return Err(D::Error::missing_field("_type")),
        };

        let message = match MessageType::from_tag(&tag) {
            Some(MessageType::Location) => from_fields(fields).map(Message::Location),
            Some(MessageType::Transition) => from_fields(fields).map(Message::Transition),
            Some(MessageType::Waypoint) => from_fields(fields).map(Message::Waypoint),
            Some(MessageType::Waypoints) => from_fields(fields).map(Message::Waypoints),
            Some(MessageType::Card) => from_fields(fields).map(Message::Card),
            Some(MessageType::Cmd) => from_fields(fields).map(Message::Cmd),
            Some(MessageType::Configuration) => from_fields(fields).map(Message::Configuration),
            Some(MessageType::Lwt) => from_fields(fields).map(Message::Lwt),
            Some(MessageType::Clear) => Ok(Message::Clear),
            Some(MessageType::Encrypted) => from_fields(fields).map(Message::Encrypted),
            Some(MessageType::Unknown) | None => Ok(Message::Unknown(UnknownMessage {
                message_type: tag.clone(),
                fields,
            })),
        };
        message.map_err(|e| D::Error::custom(format!("invalid {} message: {}", tag, e)))
    }
}

fn from_fields<T: DeserializeOwned>(fields: Map<String, Value>) -> serde_json::Result<T> {
    serde_json::from_value(Value::Object(fields))
}

fn to_object<T: Serialize>(payload: &T) -> serde_json::Result<Map<String, Value>> {
    match serde_json::to_value(payload)? {
        Value::Object(map) => Ok(map),
        _ => Err(<serde_json::Error as serde::ser::Error>::custom(
            "message payload must be a JSON object",
        )),
    }
}

pub(crate) fn epoch_to_utc(secs: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(secs, 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn location_tag_and_optional_fields() {
        let msg: Message = MessageLocation::new(52.5, 13.4, 1_700_000_000)
            .with_accuracy(12)
            .into();
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(
            value,
            json!({"_type": "location", "lat": 52.5, "lon": 13.4, "tst": 1_700_000_000, "acc": 12})
        );
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let msg: Message = serde_json::from_value(json!({
            "_type": "lwt",
            "tst": 42,
            "future_field": {"nested": true}
        }))
        .unwrap();
        assert_eq!(msg, Message::Lwt(MessageLwt { tst: 42 }));
    }

    #[test]
    fn unknown_type_is_accepted() {
        let msg: Message = serde_json::from_value(json!({"_type": "steps", "steps": 10})).unwrap();
        assert_eq!(msg.message_type(), MessageType::Unknown);
        assert_eq!(msg.type_tag(), "steps");
    }

    #[test]
    fn unknown_type_keeps_tag_and_fields() {
        let wire = json!({"_type": "steps", "steps": 10, "from": 1, "to": {"tst": 2}});
        let msg: Message = serde_json::from_value(wire.clone()).unwrap();
        assert_eq!(serde_json::to_value(&msg).unwrap(), wire);
    }

    #[test]
    fn non_string_tag_is_rejected() {
        let result: Result<Message, _> = serde_json::from_value(json!({"_type": 7}));
        assert!(result.is_err());
    }

    #[test]
    fn missing_tag_is_rejected() {
        let result: Result<Message, _> = serde_json::from_value(json!({"lat": 1.0}));
        assert!(result.is_err());
    }

    #[test]
    fn envelope_is_distinguished() {
        let msg: Message =
            serde_json::from_value(json!({"_type": "encrypted", "data": "abc"})).unwrap();
        assert!(msg.is_encrypted());
        assert_eq!(msg.as_encrypted().unwrap().data, "abc");
        assert_eq!(msg.message_type().as_str(), ENCRYPTED_TYPE);
    }

    #[test]
    fn configuration_keeps_arbitrary_keys() {
        let msg: Message = serde_json::from_value(json!({
            "_type": "configuration",
            "mode": 0,
            "host": "broker.example"
        }))
        .unwrap();
        match msg {
            Message::Configuration(cfg) => {
                assert_eq!(cfg.get("host"), Some(&json!("broker.example")));
                assert!(cfg.get("_type").is_none());
            }
            other => panic!("unexpected variant {:?}", other),
        }
    }

    #[test]
    fn clear_serializes_as_bare_tag() {
        let json = serde_json::to_string(&Message::Clear).unwrap();
        assert_eq!(json, r#"{"_type":"clear"}"#);
    }

    #[test]
    fn location_timestamp_and_trigger() {
        let loc = MessageLocation::new(0.0, 0.0, 0).with_trigger(Trigger::Manual);
        assert_eq!(loc.timestamp().unwrap().timestamp(), 0);
        assert_eq!(loc.trigger(), Some(Trigger::Manual));
    }
}
