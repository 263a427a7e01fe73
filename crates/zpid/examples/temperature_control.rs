use std::thread;
use std::time::Duration;
use zpid::{Controller, ControllerConfig, Direction, OutputMode};

/// This example demonstrates using the zpid controller to regulate
/// temperature in a simulated HVAC system.
///
/// The simulation models a room with:
/// - A thermal mass (how quickly the room temperature changes)
/// - Heat loss to the outside environment
/// - An HVAC system that can heat or cool based on the controller output
/// - An external disturbance (window opening) to test controller response
fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let setpoint = 22.0; // Target temperature in Celsius
    let simulation_duration = 120; // Simulation duration in seconds
    let sample_period = Duration::from_secs(1);

    let config = ControllerConfig::new()
        .with_tunings(2.0, 0.1, 0.5)
        .with_direction(Direction::Direct)
        .with_output_mode(OutputMode::NonAccumulating)
        .with_sample_period(sample_period)
        .with_output_limits(-100.0, 100.0) // Control signal in %
        .with_setpoint(setpoint);

    let mut controller = Controller::new(config).expect("Invalid controller configuration");

    // Initial conditions
    let mut current_temp = 18.0; // Starting room temperature
    let ambient_temp = 15.0; // Outside temperature
    let room_thermal_mass = 5000.0; // J/°C
    let hvac_power = 2000.0; // W
    let dt = sample_period.as_secs_f64();

    println!("HVAC Temperature Control Simulation");
    println!("===================================");
    println!("Target temperature: {:.1}°C", setpoint);
    println!("Starting temperature: {:.1}°C", current_temp);
    println!("Ambient temperature: {:.1}°C", ambient_temp);
    println!();
    println!("Time(s) | Temperature(°C) | Control Signal(%) | HVAC Mode");
    println!("--------|-----------------|-------------------|----------");

    for time in 0..simulation_duration {
        let control_signal = controller.step(current_temp);

        let hvac_mode = if control_signal > 5.0 {
            "Heating"
        } else if control_signal < -5.0 {
            "Cooling"
        } else {
            "Idle"
        };

        // Positive = heating, Negative = cooling
        let power_applied = hvac_power * control_signal / 100.0;
        let thermal_loss = 0.1 * (current_temp - ambient_temp);
        current_temp += (power_applied - thermal_loss) * dt / room_thermal_mass;

        println!(
            "{:6} | {:15.2} | {:17.1} | {}",
            time, current_temp, control_signal, hvac_mode
        );

        // Someone opens a window
        if time == 60 {
            current_temp -= 2.0;
            println!(">>> Window opened! Temperature dropped 2°C");
        }

        thread::sleep(Duration::from_millis(50));
    }

    println!("\nFinal temperature: {:.2}°C", current_temp);
    println!("Integral term: {:.2}", controller.integral());
}
