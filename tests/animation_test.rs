mod common;

use std::f32::consts::TAU;

use common::hero_composer;
use hero_scene::{
    SceneComposer,
    data_structures::motion::{Motion, TrainLoop, TrainPhase},
    hero,
};
use instant::Duration;

const FRAME: Duration = Duration::from_millis(10);

fn motion_of(composer: &SceneComposer, node: &str, part: usize) -> Motion {
    composer.node(node).unwrap().parts()[part].motion.unwrap()
}

fn train(composer: &SceneComposer) -> TrainLoop {
    match motion_of(composer, "bridge", 1) {
        Motion::Train(train) => train,
        other => panic!("expected the train, got {other:?}"),
    }
}

#[test]
fn water_breathes_within_its_amplitude() {
    let mut composer = hero_composer(1920, 1080);
    let (mut lowest, mut highest) = (f32::MAX, f32::MIN);
    for _ in 0..10_000 {
        composer.frame_tick(Duration::from_millis(16));
        let scale = composer.node("water").unwrap().parts()[0]
            .local_transform()
            .scale
            .y;
        lowest = lowest.min(scale);
        highest = highest.max(scale);
    }
    assert!(lowest >= 0.96 - 1e-5 && highest <= 1.04 + 1e-5);
    // and it actually swings through most of the range
    assert!(lowest < 0.965 && highest > 1.035);
}

#[test]
fn mill_blades_turn_steadily_and_complete_a_period() {
    let mut composer = hero_composer(1920, 1080);
    let angle = |composer: &SceneComposer| match motion_of(composer, "mill", 1) {
        Motion::Spin(spin) => spin.angle,
        other => panic!("expected a spin, got {other:?}"),
    };

    let mut previous = angle(&composer);
    let mut wraps = 0;
    for _ in 0..2_000 {
        composer.frame_tick(FRAME);
        let current = angle(&composer);
        assert!((0.0..TAU).contains(&current));
        if current < previous {
            wraps += 1;
        } else {
            assert!(current - previous > 0.0);
        }
        previous = current;
    }
    // 20 s at 0.6 rad/s is just under two turns
    assert_eq!(wraps, 1);

    let mut composer = hero_composer(1920, 1080);
    composer.frame_tick(Duration::from_secs_f32(TAU / 0.6));
    let after_period = angle(&composer);
    assert!(after_period.min(TAU - after_period) < 1e-3);
}

#[test]
fn train_crosses_parks_for_eight_seconds_and_returns() {
    let mut composer = hero_composer(1920, 1080);
    let start = train(&composer);
    assert_eq!(start.phase, TrainPhase::Moving);
    assert_eq!(start.x, 1920.0);
    assert_eq!(start.node_width, 1100.0);

    // 1920 + 1100 logical units at 160 per second, roughly 18.9 s
    let mut frames = 0;
    while train(&composer).phase == TrainPhase::Moving {
        let before = train(&composer).x;
        composer.frame_tick(FRAME);
        frames += 1;
        if train(&composer).phase == TrainPhase::Moving {
            assert!(train(&composer).x < before);
        }
        assert!(frames < 2_000, "train never left the screen");
    }
    assert!((1_880..=1_895).contains(&frames), "crossing took {frames} frames");

    let parked = train(&composer);
    assert_eq!(parked.x, 1920.0);
    assert_eq!(parked.waited, Duration::ZERO);

    for _ in 0..799 {
        composer.frame_tick(FRAME);
        assert_eq!(train(&composer).phase, TrainPhase::Waiting);
        assert_eq!(train(&composer).x, 1920.0);
    }
    composer.frame_tick(FRAME);
    assert_eq!(train(&composer).phase, TrainPhase::Moving);
    assert_eq!(train(&composer).x, 1920.0);

    composer.frame_tick(FRAME);
    assert!(train(&composer).x < 1920.0);
}

#[test]
fn train_is_drawn_at_its_loop_offset() {
    let mut composer = hero_composer(960, 540);
    composer.frame_tick(Duration::from_secs(2));
    let offset = train(&composer).x;
    let bridge = composer.node("bridge").unwrap();
    let transforms = bridge.get_world_transforms(composer.world());
    // half scale: the train part sits `offset` logical units right of the deck
    let dx = transforms[1].z.x - transforms[0].z.x;
    assert!((dx - offset * 0.5).abs() < 1e-3);
    assert_eq!(hero::TRAIN_WAIT, Duration::from_millis(8000));
}
