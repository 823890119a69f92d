//! Event Normalization
//!
//! Parses a raw gateway payload into a typed `Event`. The gateway pushes
//! JSON objects discriminated by `post_type`; messages additionally carry a
//! `message_type` ("group" or "private") and a segment array. Everything
//! the normalizer does not map is preserved verbatim in the event's `raw`
//! payload. Pure function, no side effects.

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::event::error::{NormalizationError, NormalizationResult};
use crate::event::types::{
    Event, MessageEvent, MessageScope, MessageSegment, NoticeEvent, RawPayload, RequestEvent,
};

/// Normalize a raw gateway payload into a typed event.
///
/// `command_prefix` drives command extraction for message events: when the
/// first text segment starts with the prefix, the prefix-stripped first
/// whitespace-delimited token becomes the event's `command` (case
/// preserved; matching policy belongs to plugins).
pub fn normalize(raw: &Value, command_prefix: &str) -> NormalizationResult<Event> {
    let payload = raw
        .as_object()
        .ok_or_else(|| NormalizationError::MalformedContent {
            message: "event payload is not a JSON object".to_string(),
        })?;

    let post_type = payload
        .get("post_type")
        .and_then(Value::as_str)
        .ok_or(NormalizationError::MissingField { field: "post_type" })?;

    let time = payload
        .get("time")
        .and_then(Value::as_i64)
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .unwrap_or_else(Utc::now);
    let self_id = payload.get("self_id").and_then(Value::as_i64);
    let group_id = payload.get("group_id").and_then(Value::as_i64);
    let user_id = payload.get("user_id").and_then(Value::as_i64);

    match post_type {
        "message" => {
            let message_type = payload
                .get("message_type")
                .and_then(Value::as_str)
                .ok_or(NormalizationError::MissingField {
                    field: "message_type",
                })?;
            let scope = match message_type {
                "group" => MessageScope::Group {
                    group_id: group_id
                        .ok_or(NormalizationError::MissingField { field: "group_id" })?,
                },
                "private" => MessageScope::Private,
                other => {
                    return Err(NormalizationError::UnknownKind {
                        kind: format!("message_type '{}'", other),
                    })
                }
            };
            let user_id =
                user_id.ok_or(NormalizationError::MissingField { field: "user_id" })?;

            let segments = parse_segments(payload.get("message"))?;
            let raw_message = payload
                .get("raw_message")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();

            let command = extract_command(&segments, command_prefix);

            Ok(Event::Message(MessageEvent {
                time,
                self_id,
                scope,
                user_id,
                segments,
                raw_message,
                sub_type: string_field(payload, "sub_type"),
                command,
                raw: payload.clone(),
            }))
        }
        "notice" => {
            let notice_type = payload
                .get("notice_type")
                .and_then(Value::as_str)
                .ok_or(NormalizationError::MissingField {
                    field: "notice_type",
                })?
                .to_string();
            Ok(Event::Notice(NoticeEvent {
                time,
                self_id,
                notice_type,
                sub_type: string_field(payload, "sub_type"),
                group_id,
                user_id,
                raw: payload.clone(),
            }))
        }
        "request" => {
            let request_type = payload
                .get("request_type")
                .and_then(Value::as_str)
                .ok_or(NormalizationError::MissingField {
                    field: "request_type",
                })?
                .to_string();
            Ok(Event::Request(RequestEvent {
                time,
                self_id,
                request_type,
                flag: string_field(payload, "flag"),
                comment: string_field(payload, "comment"),
                group_id,
                user_id,
                raw: payload.clone(),
            }))
        }
        other => Err(NormalizationError::UnknownKind {
            kind: other.to_string(),
        }),
    }
}

fn string_field(payload: &RawPayload, key: &str) -> Option<String> {
    payload.get(key).and_then(Value::as_str).map(str::to_string)
}

/// The gateway sends content either as a segment array or, in its legacy
/// mode, as a bare string (which maps to a single text segment). A missing
/// field is an empty message, anything else is malformed.
fn parse_segments(content: Option<&Value>) -> NormalizationResult<Vec<MessageSegment>> {
    match content {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::String(text)) => Ok(vec![MessageSegment::Text { text: text.clone() }]),
        Some(Value::Array(items)) => items.iter().map(parse_segment).collect(),
        Some(other) => Err(NormalizationError::MalformedContent {
            message: format!("message content must be a string or array, got {}", other),
        }),
    }
}

fn parse_segment(value: &Value) -> NormalizationResult<MessageSegment> {
    let segment = value
        .as_object()
        .ok_or_else(|| NormalizationError::MalformedContent {
            message: "message segment is not a JSON object".to_string(),
        })?;
    let kind = segment
        .get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| NormalizationError::MalformedContent {
            message: "message segment has no type".to_string(),
        })?;
    let data = segment
        .get("data")
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default();

    Ok(match kind {
        "text" => MessageSegment::Text {
            text: data
                .get("text")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
        },
        "image" => MessageSegment::Image {
            file: data
                .get("file")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
        },
        "at" => MessageSegment::At {
            target: data
                .get("qq")
                .map(|v| match v {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .unwrap_or_default(),
        },
        other => MessageSegment::Other {
            kind: other.to_string(),
            data,
        },
    })
}

/// Prefix-stripped first token of the first text segment, when prefixed.
fn extract_command(segments: &[MessageSegment], prefix: &str) -> Option<String> {
    if prefix.is_empty() {
        return None;
    }
    let text = segments.iter().find_map(|segment| match segment {
        MessageSegment::Text { text } => Some(text.as_str()),
        _ => None,
    })?;
    let trimmed = text.trim_start();
    let stripped = trimmed.strip_prefix(prefix)?;
    let token = stripped.split_whitespace().next()?;
    Some(token.to_string())
}
