// Zpid: A discrete-time PID controller library written in Rust
// Copyright (c) 2025 Security Union LLC
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "debugging")]
use std::fs::OpenOptions;
#[cfg(feature = "debugging")]
use std::io::Write;
#[cfg(feature = "debugging")]
use std::path::PathBuf;
#[cfg(feature = "debugging")]
use std::sync::mpsc::{channel, Sender};
#[cfg(feature = "debugging")]
use std::thread;

#[cfg(all(feature = "debugging", feature = "wasm"))]
use web_time::{SystemTime, UNIX_EPOCH};

#[cfg(all(feature = "debugging", not(feature = "wasm")))]
use std::time::{SystemTime, UNIX_EPOCH};

use crate::config::Direction;

/// Snapshot of a controller's tuning, taken after every accepted change.
///
/// Values are converted to `f64` so one report type serves every numeric
/// representation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TuningReport {
    pub kp: f64,
    pub ki: f64,
    pub kd: f64,
    pub zp: f64,
    pub zi: f64,
    pub zd: f64,
    /// Sample period in milliseconds
    pub sample_period_ms: f64,
    pub direction: Direction,
    pub min_output: f64,
    pub max_output: f64,
}

impl fmt::Display for TuningReport {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "PID: Tuning parameters set. Kp = {:.1}, Ki = {:.1}, Kd = {:.1}, \
             Zp = {:.1}, Zi = {:.1}, Zd = {:.1}, with sample period = {:.1}ms",
            self.kp, self.ki, self.kd, self.zp, self.zi, self.zd, self.sample_period_ms
        )
    }
}

/// Receiver for tuning reports.
///
/// A sink is injected into a [`Controller`](crate::Controller) and is invoked
/// after construction and after every accepted tuning, sample period or
/// direction change. It is never called from the step path.
pub trait DebugSink {
    fn emit(&mut self, report: &TuningReport);
}

impl<F> DebugSink for F
where
    F: FnMut(&TuningReport),
{
    fn emit(&mut self, report: &TuningReport) {
        self(report)
    }
}

/// Sink forwarding the formatted status line to `tracing` at debug level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DebugSink for TracingSink {
    fn emit(&mut self, report: &TuningReport) {
        tracing::debug!(target: "zpid::tuning", "{}", report);
    }
}

/// Configuration for PID controller debugging
#[cfg(feature = "debugging")]
#[derive(Debug, Clone)]
pub struct DebugConfig {
    /// Unique ID for this controller instance
    pub controller_id: String,
    /// File the JSON lines are appended to
    pub log_path: PathBuf,
}

#[cfg(feature = "debugging")]
impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            controller_id: "pid_controller".to_string(),
            log_path: PathBuf::from("pid_controller_debug.log"),
        }
    }
}

#[cfg(feature = "debugging")]
impl DebugConfig {
    /// Debug configuration for `controller_id`, logging to
    /// `<controller_id>_debug.log` in the working directory.
    pub fn for_controller(controller_id: impl Into<String>) -> Self {
        let controller_id = controller_id.into();
        let log_path = PathBuf::from(format!("{}_debug.log", controller_id));
        Self {
            controller_id,
            log_path,
        }
    }
}

/// One line of the debug log
#[cfg(feature = "debugging")]
#[derive(Serialize, Deserialize)]
pub struct ControllerDebugData {
    /// Timestamp in milliseconds since UNIX epoch
    pub timestamp: u128,
    /// Controller ID
    pub controller_id: String,
    #[serde(flatten)]
    pub report: TuningReport,
}

/// Sink writing tuning reports as JSON lines from a background thread.
///
/// [`DebugSink::emit`] only pushes onto a channel, so a slow disk never
/// stalls the control loop. The writer thread exits once the debugger is
/// dropped.
#[cfg(feature = "debugging")]
pub struct ControllerDebugger {
    config: DebugConfig,
    tx: Sender<ControllerDebugData>,
}

#[cfg(feature = "debugging")]
impl ControllerDebugger {
    /// Create a new controller debugger with the given configuration
    pub fn new(config: DebugConfig) -> Self {
        let (tx, rx) = channel::<ControllerDebugData>();

        let thread_config = config.clone();

        thread::spawn(move || {
            tracing::info!(
                controller_id = %thread_config.controller_id,
                path = %thread_config.log_path.display(),
                "PID controller debugging started"
            );

            while let Ok(debug_data) = rx.recv() {
                let json = match serde_json::to_string(&debug_data) {
                    Ok(json) => json,
                    Err(e) => {
                        tracing::error!(error = %e, "Failed to serialize debug data");
                        continue;
                    }
                };

                match OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(&thread_config.log_path)
                {
                    Ok(mut file) => {
                        if let Err(e) = writeln!(file, "{}", json) {
                            tracing::error!(error = %e, "Error writing to debug log file");
                        }
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Error opening debug log file");
                    }
                }
            }
        });

        Self { config, tx }
    }

    pub fn config(&self) -> &DebugConfig {
        &self.config
    }
}

#[cfg(feature = "debugging")]
impl DebugSink for ControllerDebugger {
    fn emit(&mut self, report: &TuningReport) {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_millis())
            .unwrap_or_default();

        let debug_data = ControllerDebugData {
            timestamp,
            controller_id: self.config.controller_id.clone(),
            report: report.clone(),
        };

        if let Err(e) = self.tx.send(debug_data) {
            tracing::warn!(error = %e, "Failed to send debug data to channel");
        }
    }
}
