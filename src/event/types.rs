//! Type definitions for normalized inbound events

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

/// Raw payload fields preserved alongside the typed view, for plugins that
/// need fields the normalizer does not map
pub type RawPayload = Map<String, Value>;

/// Event kind discriminator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Message,
    Notice,
    Request,
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventKind::Message => write!(f, "message"),
            EventKind::Notice => write!(f, "notice"),
            EventKind::Request => write!(f, "request"),
        }
    }
}

/// Normalized inbound event
#[derive(Debug, Clone)]
pub enum Event {
    Message(MessageEvent),
    Notice(NoticeEvent),
    Request(RequestEvent),
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Event::Message(_) => EventKind::Message,
            Event::Notice(_) => EventKind::Notice,
            Event::Request(_) => EventKind::Request,
        }
    }

    pub fn time(&self) -> DateTime<Utc> {
        match self {
            Event::Message(e) => e.time,
            Event::Notice(e) => e.time,
            Event::Request(e) => e.time,
        }
    }

    pub fn group_id(&self) -> Option<i64> {
        match self {
            Event::Message(e) => e.group_id(),
            Event::Notice(e) => e.group_id,
            Event::Request(e) => e.group_id,
        }
    }

    pub fn user_id(&self) -> Option<i64> {
        match self {
            Event::Message(e) => Some(e.user_id),
            Event::Notice(e) => e.user_id,
            Event::Request(e) => e.user_id,
        }
    }
}

/// Where a message was sent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageScope {
    Group { group_id: i64 },
    Private,
}

/// One piece of message content, in wire order
#[derive(Debug, Clone, PartialEq)]
pub enum MessageSegment {
    Text { text: String },
    Image { file: String },
    At { target: String },
    Other { kind: String, data: RawPayload },
}

/// Coarse content classification used by activity aggregation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MessageKind {
    Text,
    Image,
    Mixed,
    Other,
}

impl std::fmt::Display for MessageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MessageKind::Text => write!(f, "text"),
            MessageKind::Image => write!(f, "image"),
            MessageKind::Mixed => write!(f, "mixed"),
            MessageKind::Other => write!(f, "other"),
        }
    }
}

/// Normalized message event
#[derive(Debug, Clone)]
pub struct MessageEvent {
    pub time: DateTime<Utc>,
    pub self_id: Option<i64>,
    pub scope: MessageScope,
    /// Sender identifier
    pub user_id: i64,
    pub segments: Vec<MessageSegment>,
    pub raw_message: String,
    pub sub_type: Option<String>,
    /// Prefix-stripped first token when the message starts with the
    /// configured command prefix
    pub command: Option<String>,
    pub raw: RawPayload,
}

impl MessageEvent {
    pub fn group_id(&self) -> Option<i64> {
        match self.scope {
            MessageScope::Group { group_id } => Some(group_id),
            MessageScope::Private => None,
        }
    }

    /// Concatenated text content of all text segments
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            if let MessageSegment::Text { text } = segment {
                out.push_str(text);
            }
        }
        out
    }

    /// Text following the command token, trimmed. Empty when the message
    /// carries no command or nothing follows it.
    pub fn command_args(&self) -> String {
        if self.command.is_none() {
            return String::new();
        }
        let text = self.plain_text();
        let trimmed = text.trim_start();
        match trimmed.split_whitespace().next() {
            Some(first) => trimmed[first.len()..].trim().to_string(),
            None => String::new(),
        }
    }

    /// Classify the message for aggregation: pure text, pure image, a mix
    /// of segment kinds, or something else entirely.
    pub fn content_kind(&self) -> MessageKind {
        let mut has_text = false;
        let mut has_image = false;
        let mut has_other = false;
        for segment in &self.segments {
            match segment {
                MessageSegment::Text { .. } => has_text = true,
                MessageSegment::Image { .. } => has_image = true,
                _ => has_other = true,
            }
        }
        match (has_text, has_image, has_other) {
            (true, false, false) => MessageKind::Text,
            (false, true, false) => MessageKind::Image,
            (true, true, _) | (true, false, true) | (false, true, true) => MessageKind::Mixed,
            _ => MessageKind::Other,
        }
    }
}

/// Normalized notice event (member joins, mutes, recalls, ...)
#[derive(Debug, Clone)]
pub struct NoticeEvent {
    pub time: DateTime<Utc>,
    pub self_id: Option<i64>,
    pub notice_type: String,
    pub sub_type: Option<String>,
    pub group_id: Option<i64>,
    pub user_id: Option<i64>,
    pub raw: RawPayload,
}

/// Normalized request event (friend / group-join requests)
#[derive(Debug, Clone)]
pub struct RequestEvent {
    pub time: DateTime<Utc>,
    pub self_id: Option<i64>,
    pub request_type: String,
    /// Opaque token echoed back when approving or rejecting
    pub flag: Option<String>,
    pub comment: Option<String>,
    pub group_id: Option<i64>,
    pub user_id: Option<i64>,
    pub raw: RawPayload,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message_with(segments: Vec<MessageSegment>) -> MessageEvent {
        MessageEvent {
            time: Utc::now(),
            self_id: None,
            scope: MessageScope::Private,
            user_id: 1,
            segments,
            raw_message: String::new(),
            sub_type: None,
            command: None,
            raw: RawPayload::new(),
        }
    }

    #[test]
    fn test_content_kind_classification() {
        let text_only = message_with(vec![MessageSegment::Text {
            text: "hello".to_string(),
        }]);
        assert_eq!(text_only.content_kind(), MessageKind::Text);

        let image_only = message_with(vec![MessageSegment::Image {
            file: "a.png".to_string(),
        }]);
        assert_eq!(image_only.content_kind(), MessageKind::Image);

        let mixed = message_with(vec![
            MessageSegment::Text {
                text: "look".to_string(),
            },
            MessageSegment::Image {
                file: "a.png".to_string(),
            },
        ]);
        assert_eq!(mixed.content_kind(), MessageKind::Mixed);

        let at_only = message_with(vec![MessageSegment::At {
            target: "42".to_string(),
        }]);
        assert_eq!(at_only.content_kind(), MessageKind::Other);

        let empty = message_with(vec![]);
        assert_eq!(empty.content_kind(), MessageKind::Other);
    }

    #[test]
    fn test_plain_text_skips_non_text_segments() {
        let event = message_with(vec![
            MessageSegment::At {
                target: "42".to_string(),
            },
            MessageSegment::Text {
                text: "/echo ".to_string(),
            },
            MessageSegment::Text {
                text: "hi".to_string(),
            },
        ]);
        assert_eq!(event.plain_text(), "/echo hi");
    }

    #[test]
    fn test_command_args() {
        let mut event = message_with(vec![MessageSegment::Text {
            text: "/echo hello world".to_string(),
        }]);
        event.command = Some("echo".to_string());
        assert_eq!(event.command_args(), "hello world");

        let mut bare = message_with(vec![MessageSegment::Text {
            text: "/ping".to_string(),
        }]);
        bare.command = Some("ping".to_string());
        assert_eq!(bare.command_args(), "");

        let no_command = message_with(vec![MessageSegment::Text {
            text: "just chatting".to_string(),
        }]);
        assert_eq!(no_command.command_args(), "");
    }

    #[test]
    fn test_event_accessors() {
        let event = Event::Message(MessageEvent {
            time: Utc::now(),
            self_id: Some(10001),
            scope: MessageScope::Group { group_id: 777 },
            user_id: 42,
            segments: vec![],
            raw_message: String::new(),
            sub_type: None,
            command: None,
            raw: RawPayload::new(),
        });

        assert_eq!(event.kind(), EventKind::Message);
        assert_eq!(event.group_id(), Some(777));
        assert_eq!(event.user_id(), Some(42));
    }
}
