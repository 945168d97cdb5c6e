// End-to-end scenarios for the activity engine.

use std::time::Duration;

use glam::Vec2;
use orbit_core::{
    ActivityEngine, ActivityIngress, ConfigError, EigenBranch, EngineConfig, HistoryPolicy,
    MotionModel, Preset, Shaping, SpreadMatrix, VirtualCenter, DOT_BASE_SIZE, OSC_ADDRESS,
};
use rosc::{OscMessage, OscPacket, OscType};

const FRAME: Duration = Duration::from_micros(16_667);

fn talk_packet(addr: &str, args: Vec<OscType>) -> OscPacket {
    OscPacket::Message(OscMessage {
        addr: addr.to_string(),
        args,
    })
}

fn bits(values: &[f32]) -> Vec<u32> {
    values.iter().map(|v| v.to_bits()).collect()
}

fn position_bits(positions: &[Vec2]) -> Vec<[u32; 2]> {
    positions
        .iter()
        .map(|p| [p.x.to_bits(), p.y.to_bits()])
        .collect()
}

#[test]
fn single_talker_dominates_with_exponential_history() {
    let mut engine = ActivityEngine::new(EngineConfig::preset(Preset::Dots)).unwrap();
    assert_eq!(engine.config.history, HistoryPolicy::Exponential { gain: 0.99 });
    assert_eq!(engine.positions().len(), 4);

    for _ in 0..500 {
        assert!(engine.set_talking(&[false, false, true, false]));
        engine.tick(FRAME);
    }

    let w2 = engine.speaker_weight(2).unwrap();
    assert!(w2 > 0.95, "speaker 2 weight {w2}");
    for i in [0, 1, 3] {
        assert!(engine.speaker_weight(i).unwrap() < 1e-6);
    }

    let snapshot = engine.snapshot();
    assert!((snapshot.speakers[2].radius() - DOT_BASE_SIZE * w2).abs() < 1e-5);
    assert!(snapshot.speakers[2].talking);
    for i in [0, 1, 3] {
        assert!(snapshot.speakers[i].radius() < snapshot.speakers[2].radius());
    }
    // Only speaker 2 carries weight, so the centroid sits on it.
    assert!((engine.centroid() - engine.positions()[2]).length() < 1e-3);
}

#[test]
fn silent_room_collapses_onto_virtual_center() {
    let mut engine = ActivityEngine::new(EngineConfig::preset(Preset::Ellipse)).unwrap();
    assert_eq!(engine.config.speakers, 5);
    assert_eq!(engine.positions().len(), 6);
    assert!(matches!(
        engine.config.history,
        HistoryPolicy::Windowed { capacity: 300, .. }
    ));

    for _ in 0..400 {
        engine.tick(FRAME);
        assert_eq!(engine.centroid(), Vec2::ZERO);
    }
    assert_eq!(engine.spread(), SpreadMatrix::ZERO);
    assert_eq!(engine.eigen().branch, EigenBranch::Isotropic);
    let e = engine.ellipse();
    assert!(e.a < 1e-6 && e.b < 1e-6, "ellipse {e:?}");
    assert_eq!(engine.motion().point, Vec2::ZERO);
    let snapshot = engine.snapshot();
    assert!(snapshot.speakers[0].is_virtual);
    assert!(snapshot.ellipse.is_some());
}

#[test]
fn virtual_center_off_origin_is_reproduced_exactly() {
    let config = EngineConfig {
        virtual_center: Some(VirtualCenter {
            weight: 0.5,
            position: [10.0, -5.0],
        }),
        ..EngineConfig::preset(Preset::Ellipse)
    };
    let mut engine = ActivityEngine::new(config).unwrap();
    for _ in 0..10 {
        engine.tick(FRAME);
    }
    assert_eq!(engine.centroid(), Vec2::new(10.0, -5.0));
}

#[test]
fn windowed_engine_weights_follow_talk_fraction() {
    let config = EngineConfig {
        history: HistoryPolicy::Windowed {
            capacity: 10,
            min_weight: 0.0,
            shaping: Shaping::Floor,
        },
        ..EngineConfig::preset(Preset::Ball)
    };
    let mut engine = ActivityEngine::new(config).unwrap();
    for _ in 0..3 {
        engine.set_talking(&[true, false, false, false]);
        engine.tick(FRAME);
    }
    engine.set_talking(&[false; 4]);
    engine.tick(FRAME);
    assert_eq!(engine.speaker_weight(0), Some(0.3));
    assert_eq!(engine.history().raw_fraction(0), 0.3);
    assert_eq!(engine.history().cursor(), Some(4));
    assert_eq!(engine.speaker_weight(1), Some(0.0));
}

#[test]
fn nobody_talking_without_virtual_center_keeps_previous_centroid() {
    let mut engine = ActivityEngine::new(EngineConfig::preset(Preset::Dots)).unwrap();
    for _ in 0..60 {
        engine.tick(FRAME);
        assert_eq!(engine.centroid(), Vec2::ZERO);
        assert!(engine.motion().point.is_finite());
    }

    for _ in 0..30 {
        engine.set_talking(&[true, false, false, false]);
        engine.tick(FRAME);
    }
    let held = engine.centroid();
    assert!(held.x > 0.0);
    // Weights decay toward zero but stay positive, so the centroid holds.
    engine.set_talking(&[false; 4]);
    for _ in 0..30 {
        engine.tick(FRAME);
        assert!((engine.centroid() - held).length() < 1e-2);
        assert!(engine.motion().point.is_finite());
    }
}

#[test]
fn malformed_events_leave_state_untouched() {
    let config = EngineConfig::preset(Preset::Ball);
    let mut engine = ActivityEngine::new(config.clone()).unwrap();
    let mut control = ActivityEngine::new(config).unwrap();
    let ingress = ActivityIngress::new(OSC_ADDRESS, engine.config.speakers);

    let good = talk_packet(
        OSC_ADDRESS,
        vec![
            OscType::Int(1),
            OscType::Int(0),
            OscType::Int(1),
            OscType::Int(0),
        ],
    );
    assert!(ingress.apply_packet(&good, engine.talking_mut()));
    assert!(control.set_talking(&[true, false, true, false]));
    for _ in 0..20 {
        engine.tick(FRAME);
        control.tick(FRAME);
    }

    let weights = bits(engine.weights());
    let positions = position_bits(engine.positions());
    let talking = engine.talking().to_vec();

    let wrong_address = talk_packet("/talking", vec![OscType::Int(0); 4]);
    let wrong_arity = talk_packet(OSC_ADDRESS, vec![OscType::Int(0); 3]);
    let wrong_type = talk_packet(
        OSC_ADDRESS,
        vec![
            OscType::Int(0),
            OscType::Float(0.0),
            OscType::Int(0),
            OscType::Int(0),
        ],
    );
    for bad in [&wrong_address, &wrong_arity, &wrong_type] {
        assert!(!ingress.apply_packet(bad, engine.talking_mut()));
        assert_eq!(engine.talking(), talking.as_slice());
        assert_eq!(bits(engine.weights()), weights);
        assert_eq!(position_bits(engine.positions()), positions);
    }

    for _ in 0..20 {
        engine.tick(FRAME);
        control.tick(FRAME);
    }
    assert_eq!(bits(engine.weights()), bits(control.weights()));
    assert_eq!(engine.motion(), control.motion());
}

#[test]
fn wrong_flag_count_is_rejected() {
    let mut engine = ActivityEngine::new(EngineConfig::preset(Preset::Dots)).unwrap();
    assert!(engine.set_talking(&[true, true, true, true]));
    assert!(!engine.set_talking(&[false, false]));
    assert_eq!(engine.talking(), &[true, true, true, true]);
}

#[test]
fn snapshot_exposes_shape_for_the_motion_model() {
    for preset in Preset::ALL {
        let mut engine = ActivityEngine::new(EngineConfig::preset(preset)).unwrap();
        let speakers = engine.config.speakers;
        let mut flags = vec![false; speakers];
        flags[0] = true;
        flags[1] = true;
        for _ in 0..120 {
            engine.set_talking(&flags);
            engine.tick(FRAME);
        }
        let snapshot = engine.snapshot();
        assert_eq!(snapshot.speakers.len(), engine.positions().len());
        assert!(snapshot.point.is_finite() && snapshot.previous_point.is_finite());
        match engine.config.motion {
            MotionModel::Orbit { .. } => {
                assert!(snapshot.ellipse.is_none() && snapshot.transform.is_none())
            }
            MotionModel::EllipseLocked => {
                assert!(snapshot.ellipse.is_some() && snapshot.transform.is_none())
            }
            MotionModel::TransformProjected => {
                assert!(snapshot.ellipse.is_none() && snapshot.transform.is_some())
            }
        }
        assert_eq!(engine.ticks(), 120);
    }
}

#[test]
fn invalid_configuration_is_fatal_at_construction() {
    let config = EngineConfig {
        speakers: 3,
        positions: Some(vec![[0.0, 0.0]; 2]),
        ..EngineConfig::default()
    };
    assert!(matches!(
        ActivityEngine::new(config),
        Err(ConfigError::PositionCount {
            expected: 3,
            got: 2
        })
    ));
}
