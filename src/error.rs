//! Recoverable error kinds returned by the facade.

use thiserror::Error;

/// Every fallible facade operation returns one of these. All are recoverable:
/// state is left unchanged on error (§7 validate-before-mutate policy).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("id {id} out of range 1..={max}")]
    BadId { id: u16, max: u16 },

    #[error("gain {gain} is not a non-negative finite number")]
    BadGain { gain: f32 },

    #[error("headroom {headroom_db} dB out of range [0, 60]")]
    BadHeadroom { headroom_db: f32 },

    #[error("pushed frame has {got} samples, expected {expected}")]
    BadFrameLength { expected: usize, got: usize },

    #[error(
        "reloaded config fs/frame_size ({got_fs}/{got_frame_size}) differs from \
         construction constants ({expected_fs}/{expected_frame_size})"
    )]
    ConfigMismatch {
        expected_fs: u32,
        got_fs: u32,
        expected_frame_size: usize,
        got_frame_size: usize,
    },
}

pub type Result<T> = std::result::Result<T, CoreError>;
