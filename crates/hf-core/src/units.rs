// hf-core/src/units.rs

use std::time::Duration;

use uom::si::f64::Time as UomTime;

pub type Time = UomTime;

#[inline]
pub fn s(v: f64) -> Time {
    use uom::si::time::second;
    Time::new::<second>(v)
}

/// Seconds as a bare float, the unit every loop equation is written in.
#[inline]
pub fn as_seconds(t: Time) -> f64 {
    use uom::si::time::second;
    t.get::<second>()
}

/// Wall-clock sleep length for a sample period. Negative or NaN periods
/// collapse to zero; periods past [`Duration::MAX`] saturate.
pub fn to_duration(t: Time) -> Duration {
    let secs = as_seconds(t);
    if secs.is_nan() || secs <= 0.0 {
        Duration::ZERO
    } else {
        Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_smoke() {
        let dt = s(0.1);
        assert!((as_seconds(dt) - 0.1).abs() < 1e-12);
    }

    #[test]
    fn duration_conversion() {
        assert_eq!(to_duration(s(0.1)), Duration::from_millis(100));
        assert_eq!(to_duration(s(-1.0)), Duration::ZERO);
        assert_eq!(to_duration(s(f64::NAN)), Duration::ZERO);
        assert_eq!(to_duration(s(1e20)), Duration::MAX);
        assert_eq!(to_duration(s(f64::INFINITY)), Duration::MAX);
    }
}
