//! Patient-message record type.

use std::fmt;

use serde::Deserialize;
use serde::Deserializer;

use super::ResponseLatency;
use super::Timestamp;

/// Identifier of a record within one loaded snapshot.
///
/// The endpoint may transmit ids as integers or strings; both are accepted
/// and kept distinct (`1` is not `"1"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    /// Integer id.
    Int(i64),
    /// Text id.
    Text(String),
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(id) => write!(f, "{}", id),
            Self::Text(id) => f.write_str(id),
        }
    }
}

impl From<i64> for RecordId {
    fn from(id: i64) -> Self {
        Self::Int(id)
    }
}

impl From<&str> for RecordId {
    fn from(id: &str) -> Self {
        Self::Text(id.to_string())
    }
}

impl From<String> for RecordId {
    fn from(id: String) -> Self {
        Self::Text(id)
    }
}

/// One patient-message entry, as transmitted by the data endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Record {
    /// Stable identifier.
    pub id: RecordId,
    #[serde(default)]
    pub patient_name: Option<String>,
    #[serde(default, deserialize_with = "text_or_number")]
    pub room_number: Option<String>,
    #[serde(default)]
    pub attending_person_name: Option<String>,
    #[serde(default)]
    pub audio_id: Option<String>,
    #[serde(default)]
    pub audio_label: Option<String>,
    #[serde(default)]
    pub send_timestamp: Option<Timestamp>,
    /// Absent until the message has been answered.
    #[serde(default)]
    pub reply_timestamp: Option<Timestamp>,
    #[serde(default)]
    pub admin_comments: Option<String>,
    #[serde(default, alias = "avatar")]
    pub avatar_url: Option<String>,
}

impl Record {
    /// Creates a record with only an id set.
    pub fn new(id: impl Into<RecordId>) -> Self {
        Self {
            id: id.into(),
            patient_name: None,
            room_number: None,
            attending_person_name: None,
            audio_id: None,
            audio_label: None,
            send_timestamp: None,
            reply_timestamp: None,
            admin_comments: None,
            avatar_url: None,
        }
    }

    /// Sets the patient name.
    pub fn with_patient_name(mut self, name: impl Into<String>) -> Self {
        self.patient_name = Some(name.into());
        self
    }

    /// Sets the room number.
    pub fn with_room_number(mut self, room: impl Into<String>) -> Self {
        self.room_number = Some(room.into());
        self
    }

    /// Sets the send timestamp.
    pub fn with_send_timestamp(mut self, ts: Timestamp) -> Self {
        self.send_timestamp = Some(ts);
        self
    }

    /// Sets the reply timestamp.
    pub fn with_reply_timestamp(mut self, ts: Timestamp) -> Self {
        self.reply_timestamp = Some(ts);
        self
    }

    /// Time between the message and its reply.
    pub fn response_latency(&self) -> ResponseLatency {
        ResponseLatency::between(self.send_timestamp, self.reply_timestamp)
    }
}

/// Decodes a sequence of records from a JSON body.
pub fn decode_records(body: &str) -> Result<Vec<Record>, serde_json::Error> {
    serde_json::from_str(body)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TextOrNumber {
    Text(String),
    Int(i64),
    Float(f64),
}

fn text_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<TextOrNumber>::deserialize(deserializer)?.map(|v| match v {
        TextOrNumber::Text(s) => s,
        TextOrNumber::Int(n) => n.to_string(),
        TextOrNumber::Float(n) => n.to_string(),
    }))
}
