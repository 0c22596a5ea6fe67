//! Interpolation curves used by the frame tick.
//!
//! Both use Penner's `(t, b, c, d)` convention: elapsed time, start value,
//! change in value, duration.

/// Penner's ease-out-expo, scaled by 1024/1023 so that `t == d` lands exactly
/// on `b + c` instead of stopping short by the 2^-10 residual.
#[inline]
pub fn ease_out_expo(t: f64, b: f64, c: f64, d: f64) -> f64 {
    if d <= 0.0 {
        return b + c;
    }
    c * (-(2f64.powf(-10.0 * t / d)) + 1.0) * 1024.0 / 1023.0 + b
}

#[inline]
pub fn linear(t: f64, b: f64, c: f64, d: f64) -> f64 {
    if d <= 0.0 {
        return b + c;
    }
    b + c * (t / d)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64, eps: f64) {
        assert!((a - b).abs() <= eps, "left={a} right={b} eps={eps}");
    }

    #[test]
    fn expo_hits_endpoints() {
        approx(ease_out_expo(0.0, 10.0, 90.0, 2000.0), 10.0, 1e-12);
        approx(ease_out_expo(2000.0, 10.0, 90.0, 2000.0), 100.0, 1e-9);
    }

    #[test]
    fn expo_front_loads_motion() {
        // Half way through time, ease-out has covered far more than half.
        let mid = ease_out_expo(1000.0, 0.0, 100.0, 2000.0);
        assert!(mid > 95.0, "mid={mid}");
        assert!(mid < 100.0);
    }

    #[test]
    fn linear_is_proportional() {
        approx(linear(500.0, 0.0, 100.0, 2000.0), 25.0, 1e-12);
        approx(linear(2000.0, 100.0, -100.0, 2000.0), 0.0, 1e-12);
    }

    #[test]
    fn zero_duration_snaps_to_end() {
        assert_eq!(ease_out_expo(0.0, 1.0, 4.0, 0.0), 5.0);
        assert_eq!(linear(0.0, 1.0, 4.0, -5.0), 5.0);
    }
}
