//! Utility maths functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use num_traits::Float;

/// Map a value from one range into another.
pub fn lin_map<T>(source_range: (T, T), target_range: (T, T), value: T) -> T
where
    T: Float
{
    target_range.0
        + ((value - source_range.0)
        * (target_range.1 - target_range.0)
        / (source_range.1 - source_range.0))
}

/// Piecewise linear interpolation of `value` over the breakpoints `xp` with
/// values `fp`.
///
/// `xp` must be increasing. Outside of the breakpoints the end values are
/// held, and a value equal to a breakpoint returns that breakpoint's value
/// exactly. If `xp` and `fp` differ in length the extra points of the longer
/// one are ignored. With no breakpoints at all, or a `NaN` value, `NaN` is
/// returned.
pub fn interp<T>(value: T, xp: &[T], fp: &[T]) -> T
where
    T: Float
{
    let n = xp.len().min(fp.len());

    // NaN fails every comparison below
    if n == 0 || value.is_nan() {
        return T::nan();
    }

    if value <= xp[0] {
        return fp[0];
    }
    if value >= xp[n - 1] {
        return fp[n - 1];
    }

    // Find the first breakpoint above the value, this always exists since the
    // value is below the last one.
    let hi = xp[..n]
        .iter()
        .position(|x| value < *x)
        .unwrap_or(n - 1);
    let lo = hi - 1;

    if value == xp[lo] {
        return fp[lo];
    }

    lin_map((xp[lo], xp[hi]), (fp[lo], fp[hi]), value)
}

/// Clamp a value between `min` and `max`.
///
/// Unlike `f64::clamp` this does not panic if `min > max`, `min` wins.
pub fn clamp<T>(value: &T, min: &T, max: &T) -> T
where
    T: Float
{
    let mut ret = *value;

    if ret > *max {
        ret = *max
    }
    if ret < *min {
        ret = *min
    }

    ret
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_lin_map() {
        assert_eq!(lin_map((0f64, 10f64), (0f64, 1f64), 5f64), 0.5);
        assert_eq!(lin_map((0f64, 15f64), (500f64, 0f64), 15f64), 0.0);
    }

    #[test]
    fn test_interp() {
        let xp = [0.0, 15.0];
        let fp = [500.0, 0.0];

        // Held at the ends
        assert_eq!(interp(-3.0, &xp, &fp), 500.0);
        assert_eq!(interp(20.0, &xp, &fp), 0.0);

        // Exact at the breakpoints
        assert_eq!(interp(0.0, &xp, &fp), 500.0);
        assert_eq!(interp(15.0, &xp, &fp), 0.0);

        // Linear between
        assert!((interp(7.5, &xp, &fp) - 250.0).abs() < 1e-9);

        // Multiple segments
        let xp = [0.0, 1.0, 3.0];
        let fp = [0.0, 1.0, 0.0];
        assert_eq!(interp(1.0, &xp, &fp), 1.0);
        assert!((interp(2.0, &xp, &fp) - 0.5).abs() < 1e-12);
        assert!((interp(0.25, &xp, &fp) - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_interp_degenerate() {
        assert!(interp::<f64>(1.0, &[], &[]).is_nan());
        assert_eq!(interp(1.0, &[2.0], &[7.0]), 7.0);
        assert_eq!(interp(3.0, &[2.0], &[7.0]), 7.0);
    }

    #[test]
    fn test_interp_nan() {
        assert!(interp(f64::NAN, &[0.0], &[0.8]).is_nan());
        assert!(interp(f64::NAN, &[0.0, 15.0], &[500.0, 0.0]).is_nan());

        // Infinities are held at the ends
        assert_eq!(interp(f64::INFINITY, &[0.0], &[0.8]), 0.8);
        assert_eq!(interp(f64::NEG_INFINITY, &[0.0, 15.0], &[500.0, 0.0]), 500.0);
    }

    #[test]
    fn test_clamp() {
        assert_eq!(clamp(&1.5f64, &-1.0, &1.0), 1.0);
        assert_eq!(clamp(&-1.5f64, &-1.0, &1.0), -1.0);
        assert_eq!(clamp(&0.25f64, &-1.0, &1.0), 0.25);
    }
}
