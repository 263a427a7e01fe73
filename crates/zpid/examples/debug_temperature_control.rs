use std::thread::sleep;
use std::time::Duration;
use zpid::{Controller, ControllerConfig, ControllerDebugger, DebugConfig};

/// This example demonstrates using the zpid controller with debugging
/// enabled.
///
/// It's a modified version of the temperature_control.rs example that records
/// every tuning change as a JSON line in `temperature_controller_debug.log`.
/// The controller is re-tuned twice during the run.
fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    println!("HVAC Temperature Control Simulation with Debugging");
    println!("================================================");
    println!("Target temperature: {:.1}°C", TARGET_TEMP);
    println!("Starting temperature: {:.1}°C", STARTING_TEMP);
    println!("Ambient temperature: {:.1}°C", AMBIENT_TEMP);
    println!();

    let config = ControllerConfig::new()
        .with_tunings(2.0, 0.1, 0.5)
        .with_sample_period(Duration::from_secs(1))
        .with_output_limits(-100.0, 100.0)
        .with_setpoint(TARGET_TEMP);

    let debugger = ControllerDebugger::new(DebugConfig::for_controller("temperature_controller"));
    let mut controller = Controller::new(config)
        .expect("Invalid controller configuration")
        .with_debug_sink(debugger);

    let mut temperature = STARTING_TEMP;
    let thermal_mass = 5.0; // higher = slower changes

    println!("Time(s) | Temperature(°C) | Control Signal(%) | HVAC Mode");
    println!("--------|-----------------|-------------------|----------");

    for t in 0..SIMULATION_DURATION {
        let control_signal = controller.step(temperature);

        let hvac_mode = if control_signal > 1.0 {
            "Heating"
        } else if control_signal < -1.0 {
            "Cooling"
        } else {
            "Idle"
        };

        let heat_transfer = control_signal * HVAC_POWER / thermal_mass / 100.0;
        let ambient_effect = (AMBIENT_TEMP - temperature) * 0.01; // Natural heat loss/gain
        temperature += heat_transfer + ambient_effect;
        println!(
            "{:6} | {:15.2} | {:17.1} | {}",
            t, temperature, control_signal, hvac_mode
        );

        // Window opens
        if t == 60 {
            println!(">>> Window opened! Temperature dropped 2°C");
            temperature -= 2.0;
        }

        // Operator softens the derivative action after the initial rise
        if t == 30 {
            controller
                .set_tunings(2.0, 0.1, 0.1)
                .expect("Gains must be non-negative");
        }

        // Loop slowed to 2s; Zi and Zd are rescaled and logged
        if t == 90 {
            controller
                .set_sample_period(Duration::from_secs(2))
                .expect("Sample period must be non-zero");
        }

        sleep(Duration::from_millis(50));
    }

    println!("\nTuning history written to temperature_controller_debug.log");
}

// Temperature control parameters
const TARGET_TEMP: f64 = 22.0;
const AMBIENT_TEMP: f64 = 15.0;
const STARTING_TEMP: f64 = 5.0;
const HVAC_POWER: f64 = 10.0;
const SIMULATION_DURATION: u64 = 120; // in seconds
