use std::sync::mpsc::channel;
use std::thread;
use std::time::Duration;
use zpid::{Controller, ControllerConfig, Direction, OutputMode, TracingSink};

/// This example runs two independent control loops, one per thread.
///
/// Controllers are not shared: each loop builds its own instance and moves it
/// into the thread that drives it. The threads only exchange plain readings
/// over a channel for display.
///
/// - A heater loop: more power raises the temperature (direct acting)
/// - A chiller loop: more power lowers the temperature (reverse acting),
///   driven in velocity form so the valve position accumulates
fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,zpid=debug".into()),
        )
        .init();

    let sample_period = Duration::from_millis(100);
    let steps = 300;

    let (tx, rx) = channel::<(&'static str, usize, f64, f64)>();

    let heater_tx = tx.clone();
    let heater = thread::spawn(move || {
        let config = ControllerConfig::new()
            .with_tunings(4.0, 1.0, 0.2)
            .with_direction(Direction::Direct)
            .with_output_mode(OutputMode::NonAccumulating)
            .with_sample_period(sample_period)
            .with_output_limits(0.0, 100.0)
            .with_setpoint(60.0);
        let mut controller = Controller::new(config)
            .expect("Invalid heater configuration")
            .with_debug_sink(TracingSink);

        let mut temperature = 20.0;
        for step in 0..steps {
            let power = controller.step(temperature);
            temperature += (power * 0.05 - (temperature - 20.0) * 0.02) * 0.1;
            let _ = heater_tx.send(("heater", step, temperature, power));
            thread::sleep(sample_period / 10);
        }
    });

    let chiller_tx = tx;
    let chiller = thread::spawn(move || {
        let config = ControllerConfig::new()
            .with_tunings(0.5, 0.2, 0.0)
            .with_direction(Direction::Reverse)
            .with_output_mode(OutputMode::Accumulating)
            .with_sample_period(sample_period)
            .with_output_limits(0.0, 100.0)
            .with_setpoint(4.0);
        let mut controller = Controller::new(config)
            .expect("Invalid chiller configuration")
            .with_debug_sink(TracingSink);

        let mut temperature = 12.0;
        for step in 0..steps {
            let valve = controller.step(temperature);
            temperature += (-(valve * 0.04) + (25.0 - temperature) * 0.01) * 0.1;
            let _ = chiller_tx.send(("chiller", step, temperature, valve));

            // Retune on the fly after the first half
            if step == steps / 2 {
                controller
                    .set_tunings(0.8, 0.2, 0.0)
                    .expect("Gains must be non-negative");
            }
            thread::sleep(sample_period / 10);
        }
    });

    println!("Loop    | Step | Temperature(°C) | Output(%)");
    println!("--------|------|-----------------|----------");
    for (name, step, temperature, output) in rx {
        if step % 20 == 0 {
            println!(
                "{:7} | {:4} | {:15.2} | {:9.1}",
                name, step, temperature, output
            );
        }
    }

    heater.join().unwrap();
    chiller.join().unwrap();
}
