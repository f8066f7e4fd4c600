//! Tank mixing: directional intent in, signed per-side wheel powers out.
//!
//! Deterministic and side-effect free.

use std::f32::consts::FRAC_1_SQRT_2;

use drivelink_types::ControlIntent;

/// Mixed output, one signed power per robot side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WheelPowers {
    pub left: i16,
    pub right: i16,
}

/// Zero an analog axis whose magnitude sits below the dead-zone threshold.
pub fn apply_dead_zone(value: f32, dead_zone: f32) -> f32 {
    if value.abs() < dead_zone { 0.0 } else { value }
}

/// Convert intent plus throttle into per-side wheel powers.
///
/// Diagonal intent is scaled by `1/sqrt(2)` so its magnitude stays on the
/// unit circle, then tank-mixed (`left = y - x`, `right = y + x`).  If
/// either raw side exceeds unit magnitude both are divided by the peak,
/// preserving their ratio.  The result is scaled by `speed * max_power`
/// and truncated toward zero.
pub fn mix(intent: ControlIntent, speed: f32, max_power: i16) -> WheelPowers {
    let (mut x, mut y) = (intent.x, intent.y);
    if x != 0.0 && y != 0.0 {
        x *= FRAC_1_SQRT_2;
        y *= FRAC_1_SQRT_2;
    }

    let mut left = y - x;
    let mut right = y + x;

    let peak = left.abs().max(right.abs());
    if peak > 1.0 {
        left /= peak;
        right /= peak;
    }

    let scale = speed * f32::from(max_power);
    WheelPowers {
        left: (left * scale) as i16,
        right: (right * scale) as i16,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAX: i16 = 255;

    #[test]
    fn full_forward_drives_both_sides_at_max() {
        let powers = mix(ControlIntent::new(0.0, 1.0), 1.0, MAX);
        assert_eq!(powers, WheelPowers { left: 255, right: 255 });
    }

    #[test]
    fn full_reverse_drives_both_sides_at_negative_max() {
        let powers = mix(ControlIntent::new(0.0, -1.0), 1.0, MAX);
        assert_eq!(powers, WheelPowers { left: -255, right: -255 });
    }

    #[test]
    fn turn_in_place_is_equal_and_opposite() {
        let powers = mix(ControlIntent::new(1.0, 0.0), 1.0, MAX);
        assert_eq!(powers.left, -255);
        assert_eq!(powers.right, 255);
        assert_eq!(powers.left, -powers.right);
    }

    #[test]
    fn diagonal_intent_never_exceeds_max_power() {
        for (x, y) in [(1.0, 1.0), (-1.0, 1.0), (1.0, -1.0), (-1.0, -1.0)] {
            let powers = mix(ControlIntent::new(x, y), 1.0, MAX);
            assert!(powers.left.abs() <= MAX, "left clipped for ({x}, {y})");
            assert!(powers.right.abs() <= MAX, "right clipped for ({x}, {y})");
        }
    }

    #[test]
    fn forward_right_diagonal_keeps_the_ratio() {
        // (1, 1) scales to (0.7071, 0.7071): left = 0, right = 1.4142,
        // normalised back to (0, 1).
        let powers = mix(ControlIntent::new(1.0, 1.0), 1.0, MAX);
        assert_eq!(powers, WheelPowers { left: 0, right: 255 });
    }

    #[test]
    fn throttle_scales_and_truncates_toward_zero() {
        // 255 * 0.5 = 127.5 → 127 in both directions.
        let forward = mix(ControlIntent::new(0.0, 1.0), 0.5, MAX);
        assert_eq!(forward, WheelPowers { left: 127, right: 127 });

        let reverse = mix(ControlIntent::new(0.0, -1.0), 0.5, MAX);
        assert_eq!(reverse, WheelPowers { left: -127, right: -127 });
    }

    #[test]
    fn neutral_intent_yields_zero_power() {
        let powers = mix(ControlIntent::neutral(), 1.0, MAX);
        assert_eq!(powers, WheelPowers { left: 0, right: 0 });
    }

    #[test]
    fn zero_speed_yields_zero_power() {
        let powers = mix(ControlIntent::new(1.0, 1.0), 0.0, MAX);
        assert_eq!(powers, WheelPowers { left: 0, right: 0 });
    }

    #[test]
    fn mix_is_deterministic() {
        let intent = ControlIntent::new(0.3, -0.8);
        assert_eq!(mix(intent, 0.7, MAX), mix(intent, 0.7, MAX));
    }

    #[test]
    fn dead_zone_filters_small_magnitudes() {
        assert_eq!(apply_dead_zone(0.1, 0.18), 0.0);
        assert_eq!(apply_dead_zone(-0.17, 0.18), 0.0);
        assert_eq!(apply_dead_zone(0.18, 0.18), 0.18);
        assert_eq!(apply_dead_zone(-0.5, 0.18), -0.5);
    }
}
