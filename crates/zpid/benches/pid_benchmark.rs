use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::time::Duration;
use zpid::{Controller, ControllerConfig, OutputMode};

fn benchmark_pid_controller(c: &mut Criterion) {
    let config = ControllerConfig::new()
        .with_tunings(1.0, 0.1, 0.05)
        .with_sample_period(Duration::from_millis(10))
        .with_output_limits(-100.0, 100.0)
        .with_setpoint(10.0);

    let mut controller = Controller::new(config.clone()).unwrap();

    c.bench_function("pid_step_f64", |b| {
        b.iter(|| {
            for i in 0..100 {
                let measurement = black_box(i as f64 * 0.1);
                black_box(controller.step(measurement));
            }
        })
    });

    let mut velocity_controller =
        Controller::new(config.with_output_mode(OutputMode::Accumulating)).unwrap();

    c.bench_function("pid_step_f64_accumulating", |b| {
        b.iter(|| {
            for i in 0..100 {
                let measurement = black_box(i as f64 * 0.1);
                black_box(velocity_controller.step(measurement));
            }
        })
    });

    let config_f32 = ControllerConfig::<f32>::new()
        .with_tunings(1.0, 0.1, 0.05)
        .with_sample_period(Duration::from_millis(10))
        .with_output_limits(-100.0, 100.0)
        .with_setpoint(10.0);
    let mut controller_f32 = Controller::new(config_f32).unwrap();

    c.bench_function("pid_step_f32", |b| {
        b.iter(|| {
            for i in 0..100 {
                let measurement = black_box(i as f32 * 0.1);
                black_box(controller_f32.step(measurement));
            }
        })
    });

    #[cfg(feature = "fixed")]
    {
        use fixed::types::I16F16;

        let config_fixed = ControllerConfig::<I16F16>::new()
            .with_tunings(
                I16F16::from_num(1),
                I16F16::from_num(0.1),
                I16F16::from_num(0.05),
            )
            .with_sample_period(Duration::from_millis(10))
            .with_output_limits(I16F16::from_num(-100), I16F16::from_num(100))
            .with_setpoint(I16F16::from_num(10));
        let mut controller_fixed = Controller::new(config_fixed).unwrap();

        c.bench_function("pid_step_i16f16", |b| {
            b.iter(|| {
                for i in 0..100 {
                    let measurement = black_box(I16F16::from_num(i) / 10);
                    black_box(controller_fixed.step(measurement));
                }
            })
        });
    }

    c.bench_function("pid_retune", |b| {
        b.iter(|| {
            controller
                .set_sample_period(black_box(Duration::from_millis(20)))
                .unwrap();
            controller
                .set_sample_period(black_box(Duration::from_millis(10)))
                .unwrap();
        })
    });
}

criterion_group!(benches, benchmark_pid_controller);
criterion_main!(benches);
