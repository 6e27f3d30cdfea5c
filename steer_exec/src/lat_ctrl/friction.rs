//! Steering friction compensation
//!
//! Static friction in the steering column must be overcome before the wheel
//! moves at all. A bias in the direction of the error is added to the
//! command, ramping linearly to zero at zero error so the command does not
//! chatter around the setpoint.

use util::maths::interp;

/// Error beyond which the full friction bias is applied.
///
/// Units: meters/second^2
pub const FRICTION_THRESHOLD: f64 = 0.2;

/// Friction bias for the given error, in normalised torque.
pub fn friction_compensation(error: f64, friction: f64) -> f64 {
    interp(
        error,
        &[-FRICTION_THRESHOLD, FRICTION_THRESHOLD],
        &[-friction, friction]
    )
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_saturates_beyond_threshold() {
        assert_eq!(friction_compensation(0.2, 0.1), 0.1);
        assert_eq!(friction_compensation(3.0, 0.1), 0.1);
        assert_eq!(friction_compensation(-0.2, 0.1), -0.1);
        assert_eq!(friction_compensation(-42.0, 0.1), -0.1);
    }

    #[test]
    fn test_linear_inside_threshold() {
        let friction = 0.15;

        for k in -20..=20 {
            let error = 0.01 * k as f64;
            let expected = friction * error / FRICTION_THRESHOLD;
            let bias = friction_compensation(error, friction);
            assert!((bias - expected).abs() < 1e-12, "{} != {} at {}", bias, expected, error);
        }

        assert!(friction_compensation(0.0, friction).abs() < 1e-15);
    }

    #[test]
    fn test_zero_friction() {
        assert_eq!(friction_compensation(0.5, 0.0), 0.0);
        assert_eq!(friction_compensation(0.05, 0.0), 0.0);
    }
}
