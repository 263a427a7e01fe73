// Zpid: A discrete-time PID controller library written in Rust
// Copyright (c) 2025 Security Union LLC
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use thiserror::Error;

/// Error type for PID controller validation.
///
/// Every rejected request leaves the controller exactly as it was before the
/// call, so callers can log the error and keep the loop running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PidError {
    /// Output limits where `min >= max`.
    #[error("output limits are inverted or empty (min >= max)")]
    InvalidRange,
    /// One of kp, ki or kd is negative.
    #[error("gains must be non-negative")]
    InvalidGain,
    /// Sample period of zero.
    #[error("sample period must be greater than zero")]
    InvalidPeriod,
}

#[cfg(test)]
mod tests {
    use super::PidError;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            PidError::InvalidRange.to_string(),
            "output limits are inverted or empty (min >= max)"
        );
        assert_eq!(PidError::InvalidGain.to_string(), "gains must be non-negative");
        assert_eq!(
            PidError::InvalidPeriod.to_string(),
            "sample period must be greater than zero"
        );
    }
}
