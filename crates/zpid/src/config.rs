// Zpid: A discrete-time PID controller library written in Rust
// Copyright (c) 2025 Security Union LLC
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::number::Number;

/// Sign convention linking the error to the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Direction {
    /// Positive error gives positive output (e.g. a heater).
    #[default]
    Direct,
    /// Positive error gives negative output (e.g. a cooler). All working
    /// gains are negated.
    Reverse,
}

/// How each step's result is turned into the controller output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum OutputMode {
    /// The output is recomputed from scratch on every step (position form).
    #[default]
    #[cfg_attr(feature = "serde", serde(alias = "distance"))]
    NonAccumulating,
    /// Each step adds to the previous output (velocity form).
    #[cfg_attr(feature = "serde", serde(alias = "velocity"))]
    Accumulating,
}

impl OutputMode {
    /// Distance control, i.e. [`OutputMode::NonAccumulating`].
    pub const DISTANCE: Self = OutputMode::NonAccumulating;
    /// Velocity control, i.e. [`OutputMode::Accumulating`].
    pub const VELOCITY: Self = OutputMode::Accumulating;
}

/// Configuration for a PID controller.
///
/// Uses a builder pattern to configure the controller parameters. Nothing is
/// validated here; [`Controller::new`](crate::Controller::new) rejects an
/// inconsistent configuration.
///
/// With the `serde` feature the configuration can be loaded from any serde
/// format. The sample period is stored in milliseconds under the key
/// `sample_period_ms` (fractional for sub-millisecond periods), and missing
/// keys fall back to [`Default`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(default, bound(deserialize = "N: Number + Deserialize<'de>"))
)]
pub struct ControllerConfig<N> {
    pub(crate) kp: N,
    pub(crate) ki: N,
    pub(crate) kd: N,
    pub(crate) direction: Direction,
    pub(crate) output_mode: OutputMode,
    #[cfg_attr(feature = "serde", serde(rename = "sample_period_ms", with = "period_ms"))]
    pub(crate) sample_period: Duration,
    pub(crate) min_output: N,
    pub(crate) max_output: N,
    pub(crate) setpoint: N,
}

impl<N: Number> Default for ControllerConfig<N> {
    fn default() -> Self {
        ControllerConfig {
            kp: N::from_f64(1.0),
            ki: N::ZERO,
            kd: N::ZERO,
            direction: Direction::Direct,
            output_mode: OutputMode::NonAccumulating,
            sample_period: Duration::from_millis(1000),
            min_output: N::MIN,
            max_output: N::MAX,
            setpoint: N::ZERO,
        }
    }
}

impl<N: Number> ControllerConfig<N> {
    /// Create a new PID controller configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the proportional gain (Kp). Must be non-negative.
    pub fn with_kp(mut self, kp: N) -> Self {
        self.kp = kp;
        self
    }

    /// Set the integral gain (Ki), in output units per error unit per second.
    pub fn with_ki(mut self, ki: N) -> Self {
        self.ki = ki;
        self
    }

    /// Set the derivative gain (Kd), in output units per error unit per
    /// second of rate.
    pub fn with_kd(mut self, kd: N) -> Self {
        self.kd = kd;
        self
    }

    /// Set all three gains at once.
    pub fn with_tunings(self, kp: N, ki: N, kd: N) -> Self {
        self.with_kp(kp).with_ki(ki).with_kd(kd)
    }

    /// Set the controller direction.
    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// Set the output mode.
    pub fn with_output_mode(mut self, output_mode: OutputMode) -> Self {
        self.output_mode = output_mode;
        self
    }

    /// Set the interval between successive calls to
    /// [`Controller::step`](crate::Controller::step).
    ///
    /// The integral and derivative gains are scaled by this period, so it
    /// must match the cadence the caller actually runs the loop at.
    pub fn with_sample_period(mut self, sample_period: Duration) -> Self {
        self.sample_period = sample_period;
        self
    }

    /// Set the output limits (min, max).
    pub fn with_output_limits(mut self, min: N, max: N) -> Self {
        self.min_output = min;
        self.max_output = max;
        self
    }

    /// Set the initial setpoint (target value).
    pub fn with_setpoint(mut self, setpoint: N) -> Self {
        self.setpoint = setpoint;
        self
    }

    pub fn kp(&self) -> N {
        self.kp
    }

    pub fn ki(&self) -> N {
        self.ki
    }

    pub fn kd(&self) -> N {
        self.kd
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn output_mode(&self) -> OutputMode {
        self.output_mode
    }

    pub fn sample_period(&self) -> Duration {
        self.sample_period
    }

    pub fn output_limits(&self) -> (N, N) {
        (self.min_output, self.max_output)
    }

    pub fn setpoint(&self) -> N {
        self.setpoint
    }
}

#[cfg(feature = "serde")]
mod period_ms {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    // Whole milliseconds stay integers; sub-millisecond periods are written
    // as fractional milliseconds.
    pub fn serialize<S: Serializer>(period: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        if period.subsec_nanos() % 1_000_000 == 0 {
            serializer.serialize_u64(period.as_millis() as u64)
        } else {
            serializer.serialize_f64(period.as_nanos() as f64 / 1_000_000.0)
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let millis = f64::deserialize(deserializer)?;
        if !millis.is_finite() || millis < 0.0 {
            return Err(D::Error::custom(format!(
                "invalid sample_period_ms: {}",
                millis
            )));
        }
        Ok(Duration::from_nanos((millis * 1_000_000.0).round() as u64))
    }
}
