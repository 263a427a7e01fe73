// Zpid: A discrete-time PID controller library written in Rust
// Copyright (c) 2025 Security Union LLC
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! A discrete-time PID controller for embedded and real-time control loops.
//!
//! The integral and derivative gains are scaled by the sample period when the
//! controller is tuned, not on every step, so [`Controller::step`] costs three
//! multiplies and two clamps. The controller is generic over its numeric type
//! (`f32`, `f64`, or fixed point with the `fixed` feature).
//!
//! ```
//! use std::time::Duration;
//! use zpid::{Controller, ControllerConfig, Direction, OutputMode};
//!
//! let config = ControllerConfig::new()
//!     .with_tunings(2.0, 0.5, 0.1)
//!     .with_direction(Direction::Direct)
//!     .with_output_mode(OutputMode::NonAccumulating)
//!     .with_sample_period(Duration::from_millis(100))
//!     .with_output_limits(-100.0, 100.0)
//!     .with_setpoint(22.0);
//!
//! let mut controller = Controller::new(config).unwrap();
//! let output = controller.step(18.0);
//! assert!(output > 0.0);
//! ```

use std::fmt;
use std::time::Duration;

mod config;
mod debug;
mod error;
mod number;

pub use config::{ControllerConfig, Direction, OutputMode};
pub use debug::{DebugSink, TracingSink, TuningReport};
pub use error::PidError;
pub use number::{clamp, Number};

#[cfg(feature = "debugging")]
pub use debug::{ControllerDebugData, ControllerDebugger, DebugConfig};

/// A discrete-time PID controller.
///
/// This implementation follows the standard PID algorithm in its discrete
/// form, with derivative on measurement:
///
/// ```text
/// u[k] = Zp * e[k] + Σ Zi * e[j] - Zd * (y[k] - y[k-1])
/// ```
///
/// Where:
/// - `e[k]` is the error (setpoint - measurement)
/// - `Zp = Kp`, `Zi = Ki * T`, `Zd = Kd / T` with `T` the sample period in
///   seconds, all negated for [`Direction::Reverse`]
///
/// The integral sum is clamped to the output limits on every step
/// (anti-windup). In [`OutputMode::Accumulating`] the result is added to the
/// previous output instead of replacing it.
///
/// The controller is not thread-safe. Each control loop owns its own
/// instance; it can be moved into the thread that drives it.
pub struct Controller<N> {
    setpoint: N,
    direction: Direction,
    output_mode: OutputMode,

    // User-facing gains, always >= 0
    kp: N,
    ki: N,
    kd: N,

    // Working gains, scaled by the sample period and signed by direction
    zp: N,
    zi: N,
    zd: N,

    sample_period: Duration,
    min_output: N,
    max_output: N,

    prev_input: N,
    prev_output: N,
    integral: N,
    output: N,
    step_count: u32,

    debug_sink: Option<Box<dyn DebugSink + Send>>,
}

impl<N: Number> Controller<N> {
    /// Create a new PID controller with the given configuration.
    ///
    /// # Errors
    ///
    /// - [`PidError::InvalidRange`] if the minimum output is not below the
    ///   maximum output
    /// - [`PidError::InvalidGain`] if any gain is negative
    /// - [`PidError::InvalidPeriod`] if the sample period is zero, or rounds
    ///   to zero seconds in `N`
    pub fn new(config: ControllerConfig<N>) -> Result<Self, PidError> {
        check_output_limits(config.min_output, config.max_output)?;
        check_gains(config.kp, config.ki, config.kd)?;
        if config.sample_period.is_zero()
            || N::from_f64(config.sample_period.as_secs_f64()) == N::ZERO
        {
            return Err(PidError::InvalidPeriod);
        }

        let mut controller = Controller {
            setpoint: config.setpoint,
            direction: config.direction,
            output_mode: config.output_mode,
            kp: N::ZERO,
            ki: N::ZERO,
            kd: N::ZERO,
            zp: N::ZERO,
            zi: N::ZERO,
            zd: N::ZERO,
            sample_period: config.sample_period,
            min_output: config.min_output,
            max_output: config.max_output,
            prev_input: N::ZERO,
            prev_output: N::ZERO,
            integral: N::ZERO,
            output: N::ZERO,
            step_count: 0,
            debug_sink: None,
        };
        controller.apply_tunings(config.kp, config.ki, config.kd);

        tracing::debug!(
            kp = %controller.kp,
            ki = %controller.ki,
            kd = %controller.kd,
            direction = ?controller.direction,
            output_mode = ?controller.output_mode,
            sample_period_ms = controller.sample_period.as_secs_f64() * 1000.0,
            "PID controller created"
        );

        Ok(controller)
    }

    /// Compute the control output for a new measurement.
    ///
    /// Call once per sample period. The error is `setpoint - measurement`.
    /// The derivative term is suppressed on the first call after construction
    /// or [`reset`](Self::reset), since there is no previous measurement yet.
    ///
    /// The returned value is also available from [`output`](Self::output).
    ///
    /// A non-finite measurement (NaN or infinity) is dropped: no state
    /// changes, the step is not counted, and the previous output is returned.
    pub fn step(&mut self, measurement: N) -> N {
        if !measurement.is_finite() {
            return self.output;
        }

        let error = self.setpoint - measurement;

        let p_term = self.zp * error;

        self.integral = clamp(
            self.integral + self.zi * error,
            self.min_output,
            self.max_output,
        );

        let d_term = if self.step_count > 0 {
            -(self.zd * (measurement - self.prev_input))
        } else {
            N::ZERO
        };

        let unclamped = match self.output_mode {
            OutputMode::NonAccumulating => p_term + self.integral + d_term,
            OutputMode::Accumulating => self.prev_output + p_term + self.integral + d_term,
        };
        let output = clamp(unclamped, self.min_output, self.max_output);

        self.prev_input = measurement;
        self.prev_output = output;
        self.step_count = self.step_count.saturating_add(1);
        self.output = output;

        output
    }

    /// Reset the controller to its initial state.
    ///
    /// Clears the integral, the remembered input and output and the step
    /// count. Tunings, limits and the setpoint are kept.
    pub fn reset(&mut self) {
        self.prev_input = N::ZERO;
        self.prev_output = N::ZERO;
        self.integral = N::ZERO;
        self.output = N::ZERO;
        self.step_count = 0;
    }

    /// Re-tune the controller.
    ///
    /// The gains are scaled by the current sample period and signed by the
    /// current direction.
    ///
    /// # Errors
    ///
    /// [`PidError::InvalidGain`] if any gain is negative (or NaN). No gain is
    /// changed in that case.
    pub fn set_tunings(&mut self, kp: N, ki: N, kd: N) -> Result<(), PidError> {
        if let Err(e) = check_gains(kp, ki, kd) {
            tracing::warn!(kp = %kp, ki = %ki, kd = %kd, "Rejected negative tuning");
            return Err(e);
        }

        self.apply_tunings(kp, ki, kd);
        tracing::debug!(kp = %kp, ki = %ki, kd = %kd, "Tunings updated");
        Ok(())
    }

    /// Change the sample period, rescaling the working gains in place.
    ///
    /// The result is the same as calling [`set_tunings`](Self::set_tunings)
    /// with the raw gains after the period changed, up to rounding.
    ///
    /// # Errors
    ///
    /// [`PidError::InvalidPeriod`] for a zero period, or one too short to
    /// represent in `N`. The request is ignored and the controller keeps
    /// running with its previous period.
    pub fn set_sample_period(&mut self, sample_period: Duration) -> Result<(), PidError> {
        if sample_period.is_zero() {
            tracing::warn!("Ignored zero sample period");
            return Err(PidError::InvalidPeriod);
        }

        let ratio = N::from_f64(sample_period.as_secs_f64() / self.sample_period.as_secs_f64());
        if ratio == N::ZERO || N::from_f64(sample_period.as_secs_f64()) == N::ZERO {
            tracing::warn!(
                sample_period_ms = sample_period.as_secs_f64() * 1000.0,
                "Ignored sample period below the numeric resolution"
            );
            return Err(PidError::InvalidPeriod);
        }

        self.zi = self.zi * ratio;
        self.zd = self.zd / ratio;
        self.sample_period = sample_period;

        tracing::debug!(
            sample_period_ms = sample_period.as_secs_f64() * 1000.0,
            "Sample period updated"
        );
        self.emit_report();
        Ok(())
    }

    /// Set the controller direction.
    ///
    /// Changing direction flips the sign of all working gains. Setting the
    /// current direction again is a no-op.
    pub fn set_controller_direction(&mut self, direction: Direction) {
        if direction == self.direction {
            return;
        }

        self.zp = -self.zp;
        self.zi = -self.zi;
        self.zd = -self.zd;
        self.direction = direction;

        tracing::debug!(direction = ?direction, "Controller direction changed");
        self.emit_report();
    }

    /// Set the output limits.
    ///
    /// The integral and the previous output are not re-clamped here; the next
    /// [`step`](Self::step) brings them back inside the new limits.
    ///
    /// # Errors
    ///
    /// [`PidError::InvalidRange`] if `min >= max`. The previous limits are
    /// kept.
    pub fn set_output_limits(&mut self, min: N, max: N) -> Result<(), PidError> {
        if let Err(e) = check_output_limits(min, max) {
            tracing::warn!(min = %min, max = %max, "Rejected output limits");
            return Err(e);
        }

        self.min_output = min;
        self.max_output = max;
        Ok(())
    }

    /// Switch between distance (non-accumulating) and velocity
    /// (accumulating) output.
    pub fn set_output_mode(&mut self, output_mode: OutputMode) {
        self.output_mode = output_mode;
    }

    /// Set the setpoint (target value).
    pub fn set_setpoint(&mut self, setpoint: N) {
        self.setpoint = setpoint;
    }

    /// Attach a sink that receives a [`TuningReport`] now and after every
    /// accepted tuning change.
    pub fn with_debug_sink(mut self, sink: impl DebugSink + Send + 'static) -> Self {
        self.set_debug_sink(sink);
        self
    }

    /// Replace the debug sink. The new sink immediately receives the current
    /// tuning.
    pub fn set_debug_sink(&mut self, sink: impl DebugSink + Send + 'static) {
        self.debug_sink = Some(Box::new(sink));
        self.emit_report();
    }

    /// Detach the debug sink, if any.
    pub fn clear_debug_sink(&mut self) {
        self.debug_sink = None;
    }

    /// Get the setpoint (target value).
    pub fn setpoint(&self) -> N {
        self.setpoint
    }

    /// The output computed by the last call to [`step`](Self::step).
    pub fn output(&self) -> N {
        self.output
    }

    /// Raw proportional gain.
    pub fn kp(&self) -> N {
        self.kp
    }

    /// Raw integral gain.
    pub fn ki(&self) -> N {
        self.ki
    }

    /// Raw derivative gain.
    pub fn kd(&self) -> N {
        self.kd
    }

    /// Working proportional gain.
    pub fn zp(&self) -> N {
        self.zp
    }

    /// Working integral gain, `Ki * T`.
    pub fn zi(&self) -> N {
        self.zi
    }

    /// Working derivative gain, `Kd / T`.
    pub fn zd(&self) -> N {
        self.zd
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

    /// Current `(min, max)` output limits.
    pub fn output_limits(&self) -> (N, N) {
        (self.min_output, self.max_output)
    }

    /// Current value of the integral accumulator.
    pub fn integral(&self) -> N {
        self.integral
    }

    /// Number of calls to [`step`](Self::step), saturating at `u32::MAX`.
    pub fn step_count(&self) -> u32 {
        self.step_count
    }

    /// Snapshot of the current configuration.
    ///
    /// Building a new controller from it reproduces the tuning, limits and
    /// setpoint, but not the accumulated state.
    pub fn config(&self) -> ControllerConfig<N> {
        ControllerConfig::new()
            .with_tunings(self.kp, self.ki, self.kd)
            .with_direction(self.direction)
            .with_output_mode(self.output_mode)
            .with_sample_period(self.sample_period)
            .with_output_limits(self.min_output, self.max_output)
            .with_setpoint(self.setpoint)
    }

    /// Current tuning as a [`TuningReport`].
    pub fn tuning_report(&self) -> TuningReport {
        TuningReport {
            kp: self.kp.to_f64(),
            ki: self.ki.to_f64(),
            kd: self.kd.to_f64(),
            zp: self.zp.to_f64(),
            zi: self.zi.to_f64(),
            zd: self.zd.to_f64(),
            sample_period_ms: self.sample_period.as_secs_f64() * 1000.0,
            direction: self.direction,
            min_output: self.min_output.to_f64(),
            max_output: self.max_output.to_f64(),
        }
    }

    // Gains must already be validated
    fn apply_tunings(&mut self, kp: N, ki: N, kd: N) {
        self.kp = kp;
        self.ki = ki;
        self.kd = kd;

        let sample_time = N::from_f64(self.sample_period.as_secs_f64());
        self.zp = kp;
        self.zi = ki * sample_time;
        self.zd = kd / sample_time;

        if self.direction == Direction::Reverse {
            self.zp = -self.zp;
            self.zi = -self.zi;
            self.zd = -self.zd;
        }

        self.emit_report();
    }

    fn emit_report(&mut self) {
        if self.debug_sink.is_none() {
            return;
        }
        let report = self.tuning_report();
        if let Some(sink) = self.debug_sink.as_mut() {
            sink.emit(&report);
        }
    }
}

impl<N: Number> fmt::Debug for Controller<N> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Controller")
            .field("setpoint", &self.setpoint)
            .field("direction", &self.direction)
            .field("output_mode", &self.output_mode)
            .field("kp", &self.kp)
            .field("ki", &self.ki)
            .field("kd", &self.kd)
            .field("zp", &self.zp)
            .field("zi", &self.zi)
            .field("zd", &self.zd)
            .field("sample_period", &self.sample_period)
            .field("min_output", &self.min_output)
            .field("max_output", &self.max_output)
            .field("integral", &self.integral)
            .field("output", &self.output)
            .field("step_count", &self.step_count)
            .field("debug_sink", &self.debug_sink.is_some())
            .finish_non_exhaustive()
    }
}

// Written as negated comparisons so NaN is rejected too.
#[allow(clippy::neg_cmp_op_on_partial_ord)]
fn check_gains<N: Number>(kp: N, ki: N, kd: N) -> Result<(), PidError> {
    if !(kp >= N::ZERO) || !(ki >= N::ZERO) || !(kd >= N::ZERO) {
        return Err(PidError::InvalidGain);
    }
    Ok(())
}

#[allow(clippy::neg_cmp_op_on_partial_ord)]
fn check_output_limits<N: Number>(min: N, max: N) -> Result<(), PidError> {
    if !(min < max) {
        return Err(PidError::InvalidRange);
    }
    Ok(())
}
