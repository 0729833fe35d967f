//! Typed events emitted by the core to an external sink (§2, component H).
//!
//! The core never writes to stdout/stderr or a log file directly; transport
//! layers supply an [`EventSink`]. [`TracingSink`] is the default, practical
//! choice for running the crate standalone or in its own process.

use std::time::Duration;

use crate::ids::{ChannelId, TabletId};
use crate::ptt::PttAction;

#[derive(Clone, Debug)]
pub enum CoreEvent {
    ConfigUpdated,
    ValidationRejected { reason: String },
    TickCompleted { tick: u64, duration: Duration },
    PttChanged {
        tablet: TabletId,
        channel: ChannelId,
        action: PttAction,
    },
    ConfigMismatch {
        expected_fs: u32,
        got_fs: u32,
        expected_frame_size: usize,
        got_frame_size: usize,
    },
}

/// Sink for structured core events. Implementations must not block or
/// perform I/O that could stall a caller on the tick path; `TracingSink`
/// satisfies this since `tracing` events are buffered by the subscriber.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: CoreEvent);
}

/// Forwards every event to the `tracing` crate at an appropriate level.
#[derive(Default, Clone, Copy)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&self, event: CoreEvent) {
        match event {
            CoreEvent::ConfigUpdated => {
                tracing::debug!(target: "intercom_core", "mix configuration updated");
            }
            CoreEvent::ValidationRejected { reason } => {
                tracing::warn!(target: "intercom_core", %reason, "validation rejected");
            }
            CoreEvent::TickCompleted { tick, duration } => {
                tracing::debug!(
                    target: "intercom_core",
                    tick,
                    micros = duration.as_micros() as u64,
                    "tick completed"
                );
            }
            CoreEvent::PttChanged {
                tablet,
                channel,
                action,
            } => {
                tracing::debug!(
                    target: "intercom_core",
                    tablet = tablet.0,
                    channel = channel.0,
                    ?action,
                    "ptt state changed"
                );
            }
            CoreEvent::ConfigMismatch {
                expected_fs,
                got_fs,
                expected_frame_size,
                got_frame_size,
            } => {
                tracing::warn!(
                    target: "intercom_core",
                    expected_fs,
                    got_fs,
                    expected_frame_size,
                    got_frame_size,
                    "reloaded config does not match construction constants"
                );
            }
        }
    }
}

/// Discards every event. Used by tests and benchmarks that don't want a
/// `tracing` subscriber installed.
#[derive(Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&self, _event: CoreEvent) {}
}
