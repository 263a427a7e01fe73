use rand::{thread_rng, Rng};
use std::{thread, time::Duration};
use zpid::{Controller, ControllerConfig, OutputMode};

// Simulation constants - easy to adjust
const SIMULATION_DURATION_SECONDS: f64 = 90.0;
const CONTROL_RATE_HZ: u64 = 20;
const SETPOINT_ALTITUDE: f64 = 10.0; // meters

// Wind gust simulation constants
const NUM_RANDOM_GUSTS: usize = 5;
const MIN_GUST_VELOCITY: f64 = -4.0; // negative = downward
const MAX_GUST_VELOCITY: f64 = 3.0; // positive = upward

/// # Drone Altitude Control Simulation
///
/// Regulates the altitude of a quadcopter with a fixed-rate control loop.
///
/// ## Physics Modeled:
/// - Drone mass and gravity
/// - Motor response delay
/// - Quadratic aerodynamic drag
/// - Random wind gusts
/// - A payload drop half way through
///
/// Half way through the flight the loop rate is halved; `set_sample_period`
/// rescales the integral and derivative gains so the tuning keeps its meaning.
fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let mut sample_period = Duration::from_millis(1000 / CONTROL_RATE_HZ);

    let config = ControllerConfig::new()
        .with_tunings(10.0, 5.0, 8.0)
        .with_output_mode(OutputMode::NonAccumulating)
        .with_sample_period(sample_period)
        .with_output_limits(0.0, 100.0) // Thrust percentage
        .with_setpoint(SETPOINT_ALTITUDE);

    let mut controller = Controller::new(config).expect("Invalid controller configuration");

    // Drone physical properties
    let mut drone_mass = 1.2; // kg
    let gravity = 9.81; // m/s²
    let max_thrust = 30.0; // Newtons (total from all motors)
    let drag_coefficient = 0.3;
    let motor_response_delay = 0.1; // seconds

    // Initial conditions
    let mut altitude: f64 = 0.0;
    let mut velocity: f64 = 0.0;
    let mut commanded_thrust = 0.0;

    let mut rng = thread_rng();
    let mut wind_gusts: Vec<(f64, f64)> = (0..NUM_RANDOM_GUSTS)
        .map(|_| {
            (
                rng.gen_range(10.0..(SIMULATION_DURATION_SECONDS - 10.0)),
                rng.gen_range(MIN_GUST_VELOCITY..MAX_GUST_VELOCITY),
            )
        })
        .collect();
    wind_gusts.sort_by(|a, b| a.0.total_cmp(&b.0));

    println!("Drone Altitude Control Simulation");
    println!("=================================");
    println!("Target altitude: {:.1} meters", SETPOINT_ALTITUDE);
    println!("Drone mass: {:.1} kg", drone_mass);
    println!("Max thrust: {:.1} N", max_thrust);
    println!("\nPlanned wind gusts:");
    for (i, (time, velocity)) in wind_gusts.iter().enumerate() {
        println!(
            "  Gust {}: at {:.1}s with velocity {:.1} m/s",
            i + 1,
            time,
            velocity
        );
    }
    println!();
    println!("Time(s) | Altitude(m) | Velocity(m/s) | Thrust(%) | Error(m)");
    println!("--------|-------------|---------------|-----------|---------");

    let mut time = 0.0;
    let mut last_print = -1.0;
    let mut rate_reduced = false;
    let mut payload_dropped = false;

    while time < SIMULATION_DURATION_SECONDS {
        let dt = sample_period.as_secs_f64();
        let control_signal = controller.step(altitude);

        // Motors can't change thrust instantly
        commanded_thrust += (control_signal - commanded_thrust) * dt / motor_response_delay;
        let thrust = commanded_thrust * max_thrust / 100.0;

        let weight_force = drone_mass * gravity;
        let drag_force = drag_coefficient * velocity.abs() * velocity;
        let acceleration = (thrust - weight_force - drag_force) / drone_mass;

        velocity += acceleration * dt;
        altitude += velocity * dt;

        // Can't go below ground
        if altitude < 0.0 {
            altitude = 0.0;
            velocity = 0.0;
        }

        if time - last_print >= 0.5 {
            last_print = time;
            println!(
                "{:6.1} | {:11.2} | {:13.2} | {:9.1} | {:8.2}",
                time,
                altitude,
                velocity,
                commanded_thrust,
                SETPOINT_ALTITUDE - altitude
            );
        }

        for (gust_time, gust_velocity) in &wind_gusts {
            if (time - gust_time).abs() < dt / 2.0 {
                velocity += gust_velocity;
                println!(
                    ">>> Wind gust at {:.1}s! Velocity changed by {:+.1} m/s",
                    time, gust_velocity
                );
            }
        }

        if !payload_dropped && time >= 45.0 {
            payload_dropped = true;
            drone_mass *= 0.8;
            println!(
                ">>> Payload dropped at {:.1}s! Drone mass reduced to {:.1} kg",
                time, drone_mass
            );
        }

        if !rate_reduced && time >= 30.0 {
            rate_reduced = true;
            sample_period *= 2;
            controller
                .set_sample_period(sample_period)
                .expect("Sample period must be non-zero");
            println!(
                ">>> Control rate halved at {:.1}s (Zi = {:.3}, Zd = {:.3})",
                time,
                controller.zi(),
                controller.zd()
            );
        }

        time += dt;
        thread::sleep(Duration::from_millis(2));
    }

    println!(
        "\nSimulation complete! Final altitude {:.3} m (error {:.3} m)",
        altitude,
        (SETPOINT_ALTITUDE - altitude).abs()
    );
}
