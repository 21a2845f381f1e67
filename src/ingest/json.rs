// JSON export reader
//
// Accepts three shapes:
// - a Messenger thread export: `{threadName|thread_path|title, participants, messages}`
// - the demo format: `{"messages_array": [RawMessage, ...]}`
// - a bare `[RawMessage, ...]` array

use super::text::normalize;
use super::timestamp::now_seconds;
use crate::model::{Media, RawMessage};
use anyhow::{Context, Result};
use serde_json::{Map, Value};

const UNKNOWN_THREAD: &str = "Unknown Thread";
const UNKNOWN_SENDER: &str = "Unknown Sender";

/// Parse one JSON file's contents
pub fn parse(content: &str) -> Result<Vec<RawMessage>> {
    let value: Value = serde_json::from_str(content).context("Invalid JSON")?;
    match value {
        Value::Array(_) => flat_messages(value),
        Value::Object(mut obj) => match obj.remove("messages_array") {
            Some(array) => flat_messages(array),
            None => Ok(thread_messages(&obj)),
        },
        _ => anyhow::bail!("Expected a JSON object or array"),
    }
}

/// Already-normalized messages (demo data, re-exported sessions)
fn flat_messages(array: Value) -> Result<Vec<RawMessage>> {
    let mut messages: Vec<RawMessage> =
        serde_json::from_value(array).context("Malformed message array")?;
    for m in &mut messages {
        if m.length == 0 {
            m.length = m.message.chars().count() as u32;
        }
    }
    Ok(messages)
}

fn thread_messages(obj: &Map<String, Value>) -> Vec<RawMessage> {
    let thread = ["threadName", "thread_path", "title"]
        .iter()
        .find_map(|k| obj.get(*k).and_then(Value::as_str))
        .map(normalize)
        .unwrap_or_else(|| UNKNOWN_THREAD.to_string());
    let nb_participants = obj
        .get("participants")
        .and_then(Value::as_array)
        .map_or(0, |p| p.len() as u32);

    obj.get("messages")
        .and_then(Value::as_array)
        .map(|messages| {
            messages
                .iter()
                .filter_map(|m| m.as_object())
                .filter_map(|m| thread_message(m, &thread, nb_participants))
                .collect()
        })
        .unwrap_or_default()
}

fn thread_message(
    msg: &Map<String, Value>,
    thread: &str,
    nb_participants: u32,
) -> Option<RawMessage> {
    if msg.get("isUnsent").and_then(Value::as_bool) == Some(true) {
        return None;
    }

    let has_media = non_empty_array(msg.get("media"))
        || non_empty_array(msg.get("photos"))
        || non_empty_array(msg.get("videos"));
    let has_sticker = msg.get("sticker").is_some_and(|s| !s.is_null());
    let has_gif = non_empty_array(msg.get("gifs"));

    let text = ["text", "content"]
        .iter()
        .find_map(|k| msg.get(*k).and_then(Value::as_str))
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .or_else(|| has_media.then(|| "[Media file]".to_string()))
        .or_else(|| has_sticker.then(|| "[Sticker]".to_string()))
        .or_else(|| has_gif.then(|| "[GIF]".to_string()))?;

    let timestamp = ["timestamp", "timestamp_ms"]
        .iter()
        .find_map(|k| msg.get(*k).and_then(Value::as_f64))
        .map(|ms| ms / 1000.0)
        .unwrap_or_else(now_seconds);

    let sender = ["senderName", "sender_name"]
        .iter()
        .find_map(|k| msg.get(*k).and_then(Value::as_str))
        .unwrap_or(UNKNOWN_SENDER);

    let media = if has_media || has_sticker || has_gif {
        Media::Media
    } else {
        Media::None
    };

    Some(RawMessage::new(
        normalize(sender),
        timestamp,
        thread,
        nb_participants,
        media,
        normalize(&text),
    ))
}

fn non_empty_array(value: Option<&Value>) -> bool {
    value
        .and_then(Value::as_array)
        .is_some_and(|a| !a.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_thread_export() {
        let content = json!({
            "threadName": "Book &amp; Wine Club",
            "participants": ["Ana", "Ben", "Cy"],
            "messages": [
                {"senderName": "Ana", "timestamp": 1666692232000i64, "text": "  hello  "},
                {"senderName": "Ben", "timestamp": 1666692300000i64, "text": "gone", "isUnsent": true},
                {"sender_name": "Cy", "timestamp_ms": 1666692400000i64, "media": [{"uri": "a.jpg"}]},
                {"senderName": "Ben", "timestamp": 1666692500000i64, "sticker": {"uri": "s.png"}},
                {"senderName": "Ben", "timestamp": 1666692600000i64}
            ]
        })
        .to_string();

        let messages = parse(&content).unwrap();
        assert_eq!(messages.len(), 3);

        assert_eq!(messages[0].thread, "Book & Wine Club");
        assert_eq!(messages[0].nb_participants, 3);
        assert_eq!(messages[0].message, "hello");
        assert_eq!(messages[0].length, 5);
        assert_eq!(messages[0].timestamp, 1_666_692_232.0);
        assert_eq!(messages[0].media, Media::None);

        assert_eq!(messages[1].sender_name, "Cy");
        assert_eq!(messages[1].message, "[Media file]");
        assert_eq!(messages[1].media, Media::Media);

        assert_eq!(messages[2].message, "[Sticker]");
        assert_eq!(messages[2].media, Media::Media);
    }

    #[test]
    fn test_title_and_unknown_fallbacks() {
        let content = json!({
            "title": "Old style",
            "messages": [{"content": "hi", "timestamp_ms": 0}]
        })
        .to_string();
        let messages = parse(&content).unwrap();
        assert_eq!(messages[0].thread, "Old style");
        assert_eq!(messages[0].sender_name, "Unknown Sender");
        assert_eq!(messages[0].nb_participants, 0);
    }

    #[test]
    fn test_demo_format() {
        let content = json!({
            "messages_array": [{
                "sender_name": "Ana",
                "timestamp": 1666692232.5,
                "thread": "T",
                "nb_participants": 2,
                "media": "Media",
                "message": "photo"
            }]
        })
        .to_string();
        let messages = parse(&content).unwrap();
        assert_eq!(messages[0].media, Media::Media);
        assert_eq!(messages[0].length, 5);
        assert_eq!(messages[0].timestamp, 1_666_692_232.5);
    }

    #[test]
    fn test_bare_array() {
        let content = r#"[{"senderName": "Ana", "timestamp": 1.0, "thread": "T", "message": "x", "length": 1}]"#;
        let messages = parse(content).unwrap();
        assert_eq!(messages[0].sender_name, "Ana");
    }

    #[test]
    fn test_invalid_json() {
        assert!(parse("{not json").is_err());
        assert!(parse("42").is_err());
    }

    #[test]
    fn test_object_without_messages_is_empty() {
        assert!(parse(r#"{"threadName": "T"}"#).unwrap().is_empty());
    }
}
