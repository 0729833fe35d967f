//! Dense small-integer identifiers for channels and tablets.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A channel id, 1-based. Valid range is `1..=num_channels`.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChannelId(pub u16);

/// A tablet id, 1-based. Valid range is `1..=num_tablets`.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TabletId(pub u16);

impl ChannelId {
    /// Zero-based array offset, valid only if `self` was validated against a bound.
    #[inline]
    pub fn index(self) -> usize {
        (self.0 - 1) as usize
    }

    #[inline]
    pub fn from_index(index: usize) -> Self {
        ChannelId((index + 1) as u16)
    }

    #[inline]
    pub fn is_valid(self, num_channels: u16) -> bool {
        self.0 >= 1 && self.0 <= num_channels
    }
}

impl TabletId {
    #[inline]
    pub fn index(self) -> usize {
        (self.0 - 1) as usize
    }

    #[inline]
    pub fn from_index(index: usize) -> Self {
        TabletId((index + 1) as u16)
    }

    #[inline]
    pub fn is_valid(self, num_tablets: u16) -> bool {
        self.0 >= 1 && self.0 <= num_tablets
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "channel {}", self.0)
    }
}

impl fmt::Display for TabletId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tablet {}", self.0)
    }
}

impl fmt::Debug for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChannelId({})", self.0)
    }
}

impl fmt::Debug for TabletId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TabletId({})", self.0)
    }
}
