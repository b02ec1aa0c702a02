use approx::assert_abs_diff_eq;
use court_analytics::core::CourtModel;
use court_analytics::events::{RallyState, ShotFeatures};
use court_analytics::{
    AnalyticsConfig, CalibrationConfig, FrameInput, MatchSession, ShotType, TrackedDetection,
};
use nalgebra::Point2;
use std::path::Path;

/// Rear elevated camera, 1280x720.
const COURT_PIXELS: [[f64; 2]; 4] = [
    [420.0, 180.0],
    [860.0, 180.0],
    [1100.0, 650.0],
    [180.0, 650.0],
];

fn calibrated_config() -> AnalyticsConfig {
    AnalyticsConfig {
        calibration: Some(CalibrationConfig {
            image_points: COURT_PIXELS,
        }),
        ..AnalyticsConfig::default()
    }
}

fn player(track_id: u64, foot: Point2<f64>) -> TrackedDetection {
    TrackedDetection {
        track_id,
        bbox: [foot.x - 25.0, foot.y - 140.0, foot.x + 25.0, foot.y],
        class_id: 0,
    }
}

fn demo_path(name: &str) -> std::path::PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("demos")
        .join(name)
}

#[test]
fn demo_config_builds_a_calibrated_session() {
    let cfg = AnalyticsConfig::load_json(demo_path("config.json")).expect("demo config");
    assert_eq!(cfg.calibration, calibrated_config().calibration);
    let session = MatchSession::new(&cfg).expect("session");
    assert!(session.is_calibrated());
}

#[test]
fn configured_corners_map_onto_court_corners() {
    let session = MatchSession::new(&calibrated_config()).expect("session");
    let cal = session.metrics().calibrator();
    let corners = CourtModel::DOUBLES.corners_world();
    for (&[x, y], world) in COURT_PIXELS.iter().zip(corners) {
        let c = cal.pixel_to_court(Point2::new(x, y)).expect("court point");
        assert_abs_diff_eq!(c.x, world.x, epsilon = 0.1);
        assert_abs_diff_eq!(c.y, world.y, epsilon = 0.1);
    }
}

#[test]
fn rally_of_five_seconds_is_committed_once() {
    let mut session = MatchSession::new(&calibrated_config()).expect("session");

    for i in 0..150u64 {
        let x = 500.0 + (i % 30) as f64 * 10.0;
        let out = session
            .process_frame(&FrameInput {
                frame_idx: i,
                detections: vec![],
                shuttle: Some([x, 300.0]),
            })
            .expect("frame");
        assert!(out.rally.is_none());
    }
    assert_eq!(session.events().rally_state(), RallyState::InRally);

    let out = session
        .process_frame(&FrameInput {
            frame_idx: 150,
            ..FrameInput::default()
        })
        .expect("frame");
    let rally = out.rally.expect("rally committed");
    assert_eq!((rally.start_frame, rally.end_frame), (0, 149));
    assert_abs_diff_eq!(rally.duration_seconds, 4.97, epsilon = 0.01);
    assert_eq!(session.rallies().len(), 1);
    assert!(session.summary().shuttle_max_speed_kmh > 0.0);
}

#[test]
fn short_shuttle_runs_commit_nothing() {
    let mut session = MatchSession::new(&calibrated_config()).expect("session");
    let mut frame_idx = 0;
    for _ in 0..4 {
        for _ in 0..45 {
            session
                .process_frame(&FrameInput {
                    frame_idx,
                    shuttle: Some([640.0, 300.0]),
                    ..FrameInput::default()
                })
                .expect("frame");
            frame_idx += 1;
        }
        session
            .process_frame(&FrameInput {
                frame_idx,
                ..FrameInput::default()
            })
            .expect("frame");
        frame_idx += 1;
    }
    assert!(session.rallies().is_empty());
}

#[test]
fn grace_window_keeps_rally_through_missed_detection() {
    let mut cfg = calibrated_config();
    cfg.events.absent_frames_to_close = 3;
    let mut session = MatchSession::new(&cfg).expect("session");

    let frames: Vec<FrameInput> = (0..130u64)
        .map(|i| FrameInput {
            frame_idx: i,
            // one dropped detection mid-rally, then the rally ends at 120
            shuttle: (i != 60 && i < 120).then_some([640.0, 300.0]),
            ..FrameInput::default()
        })
        .collect();
    session.process_all(&frames).expect("frames");

    assert_eq!(session.rallies().len(), 1);
    assert_eq!(session.rallies()[0].start_frame, 0);
    assert_eq!(session.rallies()[0].end_frame, 119);
}

#[test]
fn player_distance_follows_court_geometry() {
    let mut session = MatchSession::new(&calibrated_config()).expect("session");
    let cal = session.metrics().calibrator().clone();

    // walk 1 m along the court width per frame, 3 steps
    let path: Vec<Point2<f64>> = (0..4)
        .map(|k| {
            cal.court_to_pixel(Point2::new(1.0 + k as f64, 3.0))
                .expect("pixel")
        })
        .collect();
    for (i, foot) in path.iter().enumerate() {
        session
            .process_frame(&FrameInput {
                frame_idx: i as u64,
                detections: vec![player(4, *foot)],
                shuttle: None,
            })
            .expect("frame");
    }

    let summary = session.summary();
    assert_abs_diff_eq!(summary.players[&4].total_distance_m, 3.0, epsilon = 1e-6);
    assert_eq!(summary.players[&4].coverage_points, 4);
}

#[test]
fn identity_swap_jump_is_not_counted() {
    let mut session = MatchSession::new(&calibrated_config()).expect("session");
    let cal = session.metrics().calibrator().clone();
    let near = cal.court_to_pixel(Point2::new(3.0, 1.0)).expect("pixel");
    let near2 = cal.court_to_pixel(Point2::new(3.0, 2.0)).expect("pixel");
    let far = cal.court_to_pixel(Point2::new(3.0, 12.5)).expect("pixel");

    for (i, foot) in [near, near2, far].iter().enumerate() {
        session
            .process_frame(&FrameInput {
                frame_idx: i as u64,
                detections: vec![player(2, *foot)],
                shuttle: None,
            })
            .expect("frame");
    }

    let track = session.metrics().track(2).expect("track");
    assert_abs_diff_eq!(track.distance_m(), 1.0, epsilon = 1e-6);
    assert_eq!(track.rejected_steps(), 1);
    assert_eq!(track.last_frame(), Some(2));
}

#[test]
fn uncalibrated_session_completes_with_zero_court_stats() {
    let mut session = MatchSession::new(&AnalyticsConfig::default()).expect("session");
    for i in 0..60u64 {
        session
            .process_frame(&FrameInput {
                frame_idx: i,
                detections: vec![
                    player(1, Point2::new(300.0 + i as f64 * 4.0, 600.0)),
                    player(2, Point2::new(700.0, 250.0 - i as f64)),
                ],
                shuttle: Some([600.0 + i as f64 * 15.0, 200.0]),
            })
            .expect("frame");
    }

    let report = session.report();
    assert!(!report.calibrated);
    assert_eq!(report.frames_processed, 60);
    assert_eq!(report.metrics.shuttle_max_speed_kmh, 0.0);
    assert_eq!(report.metrics.players.len(), 2);
    for p in report.metrics.players.values() {
        assert_eq!(p.total_distance_m, 0.0);
        assert_eq!(p.coverage_points, 60);
    }
}

#[test]
fn recalibration_mid_session_takes_effect() {
    let mut session = MatchSession::new(&AnalyticsConfig::default()).expect("session");
    session
        .process_frame(&FrameInput {
            frame_idx: 0,
            detections: vec![player(1, Point2::new(10.0, 10.0))],
            shuttle: None,
        })
        .expect("frame");

    // 10 px per meter
    session
        .calibrate([
            Point2::new(0.0, 134.0),
            Point2::new(61.0, 134.0),
            Point2::new(61.0, 0.0),
            Point2::new(0.0, 0.0),
        ])
        .expect("calibrate");

    session
        .process_frame(&FrameInput {
            frame_idx: 1,
            detections: vec![player(1, Point2::new(10.0, 30.0))],
            shuttle: None,
        })
        .expect("frame");

    let walked = session.summary().players[&1].total_distance_m;
    assert_abs_diff_eq!(walked, 2.0, epsilon = 1e-6);
}

#[test]
fn report_is_available_mid_stream() {
    let mut session = MatchSession::new(&calibrated_config()).expect("session");
    session
        .process_frame(&FrameInput {
            frame_idx: 0,
            detections: vec![player(1, Point2::new(640.0, 500.0))],
            shuttle: None,
        })
        .expect("frame");
    let first = session.report();
    let again = session.report();
    assert_eq!(first, again);
    assert_eq!(first.frames_processed, 1);
}

#[test]
fn events_classify_through_the_session() {
    let session = MatchSession::new(&calibrated_config()).expect("session");
    let smash = ShotFeatures {
        max_speed: 250.0,
        max_height: 2.5,
        descent_angle: 45.0,
    };
    assert_eq!(session.events().classify(&smash), ShotType::Smash);
}
