// Zpid: A discrete-time PID controller library written in Rust
// Copyright (c) 2025 Security Union LLC
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::fmt::{Debug, Display};
use std::ops::{Add, Div, Mul, Neg, Sub};

/// Numeric representation a [`Controller`](crate::Controller) can run on.
///
/// The controller only needs ordering and the four arithmetic operators plus
/// negation. Conversion from `f64` is required once per re-tune, to turn the
/// sample period into the numeric type; it is never used on the step path.
///
/// Implemented for [`f32`] and [`f64`], and for `fixed::FixedI32<Frac>` /
/// `fixed::FixedI64<Frac>` when the `fixed` feature is enabled.
pub trait Number:
    Copy
    + PartialOrd
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
    + Debug
    + Display
{
    /// Additive identity.
    const ZERO: Self;
    /// Smallest representable value.
    const MIN: Self;
    /// Largest representable value.
    const MAX: Self;

    /// Convert from `f64`. Out-of-range values saturate.
    fn from_f64(value: f64) -> Self;

    /// Lossy conversion to `f64`, used for reporting.
    fn to_f64(self) -> f64;

    /// `false` for NaN and infinities. Fixed point is always finite.
    #[inline]
    fn is_finite(self) -> bool {
        true
    }
}

impl Number for f64 {
    const ZERO: Self = 0.0;
    const MIN: Self = f64::MIN;
    const MAX: Self = f64::MAX;

    #[inline]
    fn from_f64(value: f64) -> Self {
        value
    }

    #[inline]
    fn to_f64(self) -> f64 {
        self
    }

    #[inline]
    fn is_finite(self) -> bool {
        f64::is_finite(self)
    }
}

impl Number for f32 {
    const ZERO: Self = 0.0;
    const MIN: Self = f32::MIN;
    const MAX: Self = f32::MAX;

    #[inline]
    fn from_f64(value: f64) -> Self {
        value as f32
    }

    #[inline]
    fn to_f64(self) -> f64 {
        self as f64
    }

    #[inline]
    fn is_finite(self) -> bool {
        f32::is_finite(self)
    }
}

#[cfg(feature = "fixed")]
mod fixed_impls {
    use super::Number;
    use fixed::types::extra::{LeEqU32, LeEqU64};
    use fixed::{FixedI32, FixedI64};

    impl<Frac: LeEqU32> Number for FixedI32<Frac> {
        const ZERO: Self = FixedI32::<Frac>::ZERO;
        const MIN: Self = FixedI32::<Frac>::MIN;
        const MAX: Self = FixedI32::<Frac>::MAX;

        #[inline]
        fn from_f64(value: f64) -> Self {
            FixedI32::<Frac>::saturating_from_num(value)
        }

        #[inline]
        fn to_f64(self) -> f64 {
            self.to_num::<f64>()
        }
    }

    impl<Frac: LeEqU64> Number for FixedI64<Frac> {
        const ZERO: Self = FixedI64::<Frac>::ZERO;
        const MIN: Self = FixedI64::<Frac>::MIN;
        const MAX: Self = FixedI64::<Frac>::MAX;

        #[inline]
        fn from_f64(value: f64) -> Self {
            FixedI64::<Frac>::saturating_from_num(value)
        }

        #[inline]
        fn to_f64(self) -> f64 {
            self.to_num::<f64>()
        }
    }
}

/// Clamp `value` into `[min, max]`.
///
/// Works on `PartialOrd` so it also accepts floating point values. A NaN
/// `value` compares false against both bounds and passes through unchanged.
#[inline]
pub fn clamp<N: Number>(value: N, min: N, max: N) -> N {
    if value > max {
        max
    } else if value < min {
        min
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_bounds() {
        assert_eq!(clamp(5.0, -1.0, 1.0), 1.0);
        assert_eq!(clamp(-5.0, -1.0, 1.0), -1.0);
        assert_eq!(clamp(0.25, -1.0, 1.0), 0.25);
        assert_eq!(clamp(1.0_f32, -1.0, 1.0), 1.0);
    }

    #[test]
    fn test_float_conversions() {
        assert_eq!(<f64 as Number>::from_f64(0.5), 0.5);
        assert_eq!(<f32 as Number>::from_f64(0.25), 0.25_f32);
        assert_eq!(Number::to_f64(0.75_f32), 0.75);
        assert_eq!(<f64 as Number>::ZERO, 0.0);
    }

    #[test]
    fn test_is_finite() {
        assert!(Number::is_finite(1.5_f64));
        assert!(!Number::is_finite(f64::NAN));
        assert!(!Number::is_finite(f32::INFINITY));
        assert!(!Number::is_finite(f64::NEG_INFINITY));
    }

    #[cfg(feature = "fixed")]
    #[test]
    fn test_fixed_conversions_saturate() {
        use fixed::types::I16F16;

        assert_eq!(<I16F16 as Number>::from_f64(1.5), I16F16::from_num(1.5));
        assert_eq!(<I16F16 as Number>::from_f64(1.0e12), I16F16::MAX);
        assert_eq!(<I16F16 as Number>::from_f64(-1.0e12), I16F16::MIN);
        assert_eq!(Number::to_f64(I16F16::from_num(-2.25)), -2.25);
        assert_eq!(
            clamp(I16F16::from_num(9), I16F16::ZERO, I16F16::from_num(4)),
            I16F16::from_num(4)
        );
    }
}
