// Message records shared by ingestion, derivation and the cross-filter
//
// Every export format (HTML, JSON, demo) is normalized into `RawMessage` at
// the ingestion boundary. `derive::enrich` turns those into `Record`s, which
// are the only thing the filter index ever sees.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// Whether a message carried an attachment (photo, sticker, GIF, ...)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum Media {
    #[default]
    None,
    Media,
}

impl Media {
    pub fn as_str(&self) -> &'static str {
        match self {
            Media::None => "None",
            Media::Media => "Media",
        }
    }
}

/// One message as produced by an ingestion collaborator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawMessage {
    #[serde(alias = "senderName")]
    pub sender_name: String,
    /// Epoch seconds (fractional part allowed)
    pub timestamp: f64,
    pub thread: String,
    #[serde(alias = "nbParticipants", default)]
    pub nb_participants: u32,
    #[serde(default)]
    pub media: Media,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub length: u32,
}

impl RawMessage {
    /// Build a message, computing `length` from the text in characters
    pub fn new(
        sender_name: impl Into<String>,
        timestamp: f64,
        thread: impl Into<String>,
        nb_participants: u32,
        media: Media,
        message: impl Into<String>,
    ) -> Self {
        let message = message.into();
        let length = message.chars().count() as u32;
        Self {
            sender_name: sender_name.into(),
            timestamp,
            thread: thread.into(),
            nb_participants,
            media,
            message,
            length,
        }
    }
}

/// A message enriched with the fields every dimension projects from
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    pub sender_name: String,
    pub timestamp: f64,
    pub thread: String,
    pub nb_participants: u32,
    pub media: Media,
    pub message: String,
    pub length: u32,
    /// Sent by the inferred owner of the export
    pub sent: bool,
    /// Calendar day of the message in the configured time zone
    pub date: NaiveDate,
    /// Time of day truncated to the minute (density strip, time brush)
    pub time_minutes: NaiveTime,
    /// Time of day at second resolution (scatter placement)
    pub time_seconds: NaiveTime,
}
