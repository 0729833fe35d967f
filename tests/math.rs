//! Test the shared scalar math helpers.

use intercom_core::math::{amp_db, clamp11, db_amp, rms_to_dbfs, DBFS_FLOOR};

#[test]
fn db_amp_is_inverse_of_amp_db() {
    for db in [-60.0, -12.0, -6.0, 0.0, 6.0] {
        let gain = db_amp(db);
        assert!((amp_db(gain) - db).abs() < 1.0e-3);
    }
}

#[test]
fn dbfs_floor_applies_below_threshold() {
    assert_eq!(rms_to_dbfs(0.0), DBFS_FLOOR);
    assert_eq!(rms_to_dbfs(1.0e-20), DBFS_FLOOR);
}

#[test]
fn clamp11_bounds_values() {
    assert_eq!(clamp11(2.0), 1.0);
    assert_eq!(clamp11(-2.0), -1.0);
    assert_eq!(clamp11(0.5), 0.5);
}
