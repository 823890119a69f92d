//! Public API for the event system
//!
//! External modules should import from here rather than directly from
//! internal modules.

pub use crate::event::error::{NormalizationError, NormalizationResult};
pub use crate::event::normalizer::normalize;
pub use crate::event::types::{
    Event, EventKind, MessageEvent, MessageKind, MessageScope, MessageSegment, NoticeEvent,
    RequestEvent,
};
