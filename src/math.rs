//! Scalar math helpers shared by the converter, mixer and VU meter.

/// Clamps `x` between `x0` and `x1`.
#[inline]
pub fn clamp(x0: f32, x1: f32, x: f32) -> f32 {
    x.max(x0).min(x1)
}

/// Clamps `x` between -1 and 1.
#[inline]
pub fn clamp11(x: f32) -> f32 {
    x.max(-1.0).min(1.0)
}

/// Convert decibels to linear gain. 0 dB = 1.0.
#[inline]
pub fn db_amp(db: f32) -> f32 {
    10.0_f32.powf(db / 20.0)
}

/// Convert linear gain (`gain` > 0) to decibels. Unity gain = 0 dB.
#[inline]
pub fn amp_db(gain: f32) -> f32 {
    gain.max(1.0e-12).log10() * 20.0
}

/// Floor applied to reported dBFS values, per the "silence" convention.
pub const DBFS_FLOOR: f32 = -240.0;

/// RMS values below this are reported as [`DBFS_FLOOR`] rather than computed.
pub const RMS_FLOOR: f32 = 1.0e-12;

/// Linear RMS to dBFS, clamped at [`DBFS_FLOOR`].
#[inline]
pub fn rms_to_dbfs(rms: f32) -> f32 {
    amp_db(rms.max(RMS_FLOOR)).max(DBFS_FLOOR)
}
