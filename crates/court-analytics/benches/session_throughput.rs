use court_analytics::{
    AnalyticsConfig, CalibrationConfig, FrameInput, MatchSession, TrackedDetection,
};
use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use std::hint::black_box;

fn synthetic_frames(n: u64) -> Vec<FrameInput> {
    (0..n)
        .map(|i| {
            let t = i as f64;
            let shuttle = [640.0 + (t * 0.3).sin() * 300.0, 200.0 + (t * 0.2).cos() * 150.0];
            FrameInput {
                frame_idx: i,
                detections: vec![
                    TrackedDetection {
                        track_id: 1,
                        bbox: [500.0 + (t * 0.1).sin() * 80.0, 420.0, 560.0, 600.0],
                        class_id: 0,
                    },
                    TrackedDetection {
                        track_id: 2,
                        bbox: [640.0, 150.0, 680.0 + (t * 0.07).cos() * 60.0, 260.0],
                        class_id: 0,
                    },
                ],
                // drop the shuttle for a few frames every 8 seconds
                shuttle: (i % 240 > 5).then_some(shuttle),
            }
        })
        .collect()
}

fn bench_session(c: &mut Criterion) {
    let config = AnalyticsConfig {
        calibration: Some(CalibrationConfig {
            image_points: [
                [420.0, 180.0],
                [860.0, 180.0],
                [1100.0, 650.0],
                [180.0, 650.0],
            ],
        }),
        ..AnalyticsConfig::default()
    };
    let frames = synthetic_frames(9_000);

    c.bench_function("session_5min_30fps", |b| {
        b.iter_batched(
            || MatchSession::new(&config).expect("session"),
            |mut session| {
                session.process_all(&frames).expect("frames");
                black_box(session.report())
            },
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, bench_session);
criterion_main!(benches);
