//! Scalar helpers for layout and animation code

use std::f64::consts::PI;

use crate::errors::{range_error, type_error, UtilError};

/// Largest integer an `f64` represents exactly (2^53 - 1)
pub const MAX_SAFE_INTEGER: i64 = (1 << 53) - 1;

const MAX_POWER_OF_TWO_INPUT: i64 = 1 << 30;

/// -1, 0 or 1; NaN counts as 0
pub fn sign(x: f64) -> i8 {
    if x < 0.0 {
        -1
    } else if x > 0.0 {
        1
    } else {
        0
    }
}

/// Restrict `x` to `[min, max]`
///
/// Unlike `f64::clamp` this never panics; with `min > max` the result is `max`.
pub fn clamp(x: f64, min: f64, max: f64) -> f64 {
    x.max(min).min(max)
}

pub fn clamp01(x: f64) -> f64 {
    clamp(x, 0.0, 1.0)
}

pub fn deg_to_rad(degrees: f64) -> f64 {
    degrees * PI / 180.0
}

pub fn rad_to_deg(radians: f64) -> f64 {
    radians * 180.0 / PI
}

/// Triangle wave between 0 and `length`
pub fn ping_pong(x: f64, length: f64) -> f64 {
    let double_length = length * 2.0;
    let modulo = x % double_length;
    length - (modulo - length).abs()
}

/// Wrap `value` into `[from, to)`
///
/// Inverted bounds are swapped. A zero-width range always yields `to`.
///
/// ```
/// use common::math::wrap;
///
/// assert_eq!(wrap(5.0, 0.0, 3.0), 2.0);
/// assert_eq!(wrap(-1.0, 0.0, 3.0), 2.0);
/// assert_eq!(wrap(370.0, 0.0, 360.0), 10.0);
/// ```
pub fn wrap(value: f64, from: f64, to: f64) -> f64 {
    let (min, max) = if from > to { (to, from) } else { (from, to) };
    let cycle = max - min;
    if cycle == 0.0 {
        return max;
    }
    value - cycle * ((value - min) / cycle).floor()
}

/// Signed shortest rotation from `current` to `target`, in [-180, 180)
pub fn angle_difference_degrees(current: f64, target: f64) -> f64 {
    wrap(target - current, -180.0, 180.0)
}

/// Signed shortest rotation from `current` to `target`, in [-π, π)
pub fn angle_difference_radians(current: f64, target: f64) -> f64 {
    wrap(target - current, -PI, PI)
}

/// Position of `value` within `[from, to]`, clamped to [0, 1]
pub fn normalize(value: f64, from: f64, to: f64) -> f64 {
    clamp((value - from) / (to - from), 0.0, 1.0)
}

/// Smallest power of two not below `input`
///
/// Inputs outside the safe integer range are a `TypeError`; non-positive
/// inputs and inputs above 2^30 are a `RangeError`.
pub fn next_power_of_two(input: i64) -> Result<i64, UtilError> {
    if !(-MAX_SAFE_INTEGER..=MAX_SAFE_INTEGER).contains(&input) {
        return Err(type_error("Input must be a safe integer.", None));
    }
    if input <= 0 {
        return Err(range_error("Input must be positive", None));
    }
    if input > MAX_POWER_OF_TWO_INPUT {
        return Err(range_error(
            format!("Input too large: {input} exceeds maximum safe power of 2"),
            None,
        ));
    }
    // 0 < input <= 2^30, so the conversions are lossless
    Ok((input as u64).next_power_of_two() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_sign_and_clamp() {
        assert_eq!(sign(-3.5), -1);
        assert_eq!(sign(0.0), 0);
        assert_eq!(sign(2.0), 1);
        assert_eq!(sign(f64::NAN), 0);

        assert_eq!(clamp(5.0, 0.0, 3.0), 3.0);
        assert_eq!(clamp(-1.0, 0.0, 3.0), 0.0);
        assert_eq!(clamp(2.0, 0.0, 3.0), 2.0);
        assert_eq!(clamp(2.0, 5.0, 1.0), 1.0);
        assert_eq!(clamp01(1.5), 1.0);
    }

    #[test]
    fn test_angle_conversion() {
        assert!(approx(deg_to_rad(180.0), PI));
        assert!(approx(rad_to_deg(PI / 2.0), 90.0));
    }

    #[test]
    fn test_ping_pong() {
        assert_eq!(ping_pong(0.0, 3.0), 0.0);
        assert_eq!(ping_pong(2.0, 3.0), 2.0);
        assert_eq!(ping_pong(3.0, 3.0), 3.0);
        assert_eq!(ping_pong(4.0, 3.0), 2.0);
        assert_eq!(ping_pong(6.0, 3.0), 0.0);
    }

    #[test]
    fn test_wrap() {
        assert_eq!(wrap(5.0, 0.0, 3.0), 2.0);
        assert_eq!(wrap(-1.0, 0.0, 3.0), 2.0);
        assert_eq!(wrap(7.0, 2.0, 5.0), 4.0);
        assert_eq!(wrap(7.0, 5.0, 2.0), 4.0);
        assert_eq!(wrap(370.0, 0.0, 360.0), 10.0);
        assert_eq!(wrap(3.0, 0.0, 3.0), 0.0);
        assert_eq!(wrap(1.0, 4.0, 4.0), 4.0);
    }

    #[test]
    fn test_angle_difference() {
        assert_eq!(angle_difference_degrees(0.0, 90.0), 90.0);
        assert_eq!(angle_difference_degrees(0.0, 450.0), 90.0);
        assert_eq!(angle_difference_degrees(350.0, 10.0), 20.0);
        assert_eq!(angle_difference_degrees(0.0, 180.0), -180.0);

        assert!(approx(angle_difference_radians(0.0, PI), -PI));
        assert!(approx(angle_difference_radians(0.0, 3.0 * PI), -PI));
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize(5.0, 0.0, 10.0), 0.5);
        assert_eq!(normalize(-5.0, 0.0, 10.0), 0.0);
        assert_eq!(normalize(15.0, 0.0, 10.0), 1.0);
    }

    #[test]
    fn test_next_power_of_two() {
        assert_eq!(next_power_of_two(1).unwrap(), 1);
        assert_eq!(next_power_of_two(3).unwrap(), 4);
        assert_eq!(next_power_of_two(8).unwrap(), 8);
        assert_eq!(next_power_of_two(15).unwrap(), 16);
        assert_eq!(next_power_of_two(1 << 30).unwrap(), 1 << 30);

        assert_eq!(next_power_of_two(0).unwrap_err().kind, ErrorKind::RangeError);
        assert_eq!(next_power_of_two(-4).unwrap_err().kind, ErrorKind::RangeError);
        assert_eq!(
            next_power_of_two((1 << 30) + 1).unwrap_err().kind,
            ErrorKind::RangeError
        );
        assert_eq!(
            next_power_of_two(MAX_SAFE_INTEGER + 1).unwrap_err().kind,
            ErrorKind::TypeError
        );
        assert_eq!(
            next_power_of_two(i64::MIN).unwrap_err().kind,
            ErrorKind::TypeError
        );
    }
}
