//! Intercom audio core: a real-time mixing engine between up to `T` tablets
//! and `C` channels, with level metering, push-to-talk tracking, and a
//! thread-safe control facade.
//!
//! The crate is the core only: transport (HTTP/WebSocket), audio I/O,
//! configuration-file parsing, and logging backends are external
//! collaborators. This crate exposes push/pull frame interfaces, a typed
//! [`CoreConfig`], and an [`events::EventSink`] trait for them to plug into.

pub mod buffer;
pub mod config;
pub mod convert;
pub mod engine;
pub mod error;
pub mod events;
pub mod facade;
pub mod ids;
pub mod math;
pub mod ptt;
pub mod records;
pub mod vu;

pub use config::CoreConfig;
pub use error::{CoreError, Result};
pub use events::{CoreEvent, EventSink, NullSink, TracingSink};
pub use facade::IntercomCore;
pub use ids::{ChannelId, TabletId};
pub use ptt::{PttAction, PttStatus};

/// Fixed default topology (`spec.md` §1): 4 channels, 16 tablets.
pub const DEFAULT_NUM_CHANNELS: u16 = 4;
pub const DEFAULT_NUM_TABLETS: u16 = 16;
pub const DEFAULT_FS: u32 = 44_100;
pub const DEFAULT_FRAME_SIZE: usize = 1024;
