//! Test int16 PCM <-> normalized float conversion and saturation.

use intercom_core::convert::{from_pcm16, to_pcm16};

#[test]
fn negative_full_scale_is_exact() {
    let mut out = [0.0f32; 1];
    from_pcm16(&[i16::MIN], &mut out);
    assert_eq!(out[0], -1.0);
}

#[test]
fn positive_full_scale_is_just_under_one() {
    let mut out = [0.0f32; 1];
    from_pcm16(&[i16::MAX], &mut out);
    assert!(out[0] < 1.0);
    assert!(out[0] > 0.9999);
}

#[test]
fn round_trip_is_identity_except_negative_saturation() {
    for s in [-32768i16, -1000, -1, 0, 1, 1000, 32767] {
        let mut f = [0.0f32; 1];
        from_pcm16(&[s], &mut f);
        let mut back = [0i16; 1];
        to_pcm16(&f, &mut back);
        if s == i16::MIN {
            // -32768 saturates to -32767 on the way back (spec property 2).
            assert_eq!(back[0], -32767);
        } else {
            assert_eq!(back[0], s);
        }
    }
}

#[test]
fn out_of_range_floats_saturate() {
    let mut out = [0i16; 3];
    to_pcm16(&[2.0, -2.0, f32::NAN], &mut out);
    assert_eq!(out, [i16::MAX, i16::MIN, 0]);
}

#[test]
fn from_pcm16_within_one_ulp_of_clamped_float() {
    // Property 3: from_pcm16(to_pcm16(f)) within 1/32767 of clamp(f, -1, 1).
    for f in [-1.5f32, -0.75, -0.1, 0.0, 0.1, 0.75, 1.0, 1.5] {
        let mut pcm = [0i16; 1];
        to_pcm16(&[f], &mut pcm);
        let mut back = [0.0f32; 1];
        from_pcm16(&pcm, &mut back);
        let clamped = f.max(-1.0).min(1.0);
        assert!((back[0] - clamped).abs() <= 1.0 / 32767.0 + 1.0e-6);
    }
}
