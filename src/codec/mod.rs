//! Structured event encoding for network sinks

pub mod event_type;
pub mod structured;

pub use event_type::EventType;
pub use structured::{additional_key, CodecKind, StructuredCodec};
