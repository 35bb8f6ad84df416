/// Peak vertical offset of the text, in world units.
pub const TEXT_BOB_AMPLITUDE: f32 = 0.5;

/// Spin of the decorative group about Y, in radians per second.
pub const GROUP_SPIN_RATE: f32 = 0.04;

/// Text height at `t` seconds.
pub fn text_bob_offset(t: f64) -> f32 {
    (t.sin() as f32) * TEXT_BOB_AMPLITUDE
}

/// Decorative group rotation about Y at `t` seconds.
pub fn group_rotation(t: f64) -> f32 {
    (t * GROUP_SPIN_RATE as f64) as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn bob_follows_sine() {
        assert_eq!(text_bob_offset(0.0), 0.0);
        assert!((text_bob_offset(FRAC_PI_2) - 0.5).abs() < 1e-6);
        assert!((text_bob_offset(3.0 * FRAC_PI_2) + 0.5).abs() < 1e-6);
    }

    #[test]
    fn spin_is_linear() {
        assert_eq!(group_rotation(0.0), 0.0);
        assert!((group_rotation(10.0) - 0.4).abs() < 1e-6);
        assert!((group_rotation(100.0) - 4.0).abs() < 1e-5);
    }
}
