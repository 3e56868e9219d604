//! The festival hero illustration.
//!
//! Crop rectangles and layout constants are hand-composed artwork; they are not
//! derived from anything. Nodes are listed back to front: backdrop and landscape
//! first, then the props, the second and third screen of scroll content and finally
//! the pillars framing the whole page. This order is also the update order.
//!
//! Layout coordinates use `L` for one screen height in logical units:
//! `Coord::screens(2.0, -80.0)` reads "two screens down, 80 units up".

use instant::Duration;

use crate::{
    data_structures::{
        layout::{Coord, LayoutRule},
        motion::MotionKind,
        scene_graph::{Crop, NodeDescriptor, PartDescriptor},
    },
    resources::AtlasSource,
};

pub const LANDSCAPE: &str = "hero-landscape";
pub const PROPS: &str = "hero-props";
pub const TRAIN: &str = "hero-train";
pub const TITLE: &str = "hero-title";

/// How long the train stays parked off-screen between two runs.
pub const TRAIN_WAIT: Duration = Duration::from_millis(8000);
/// Train speed in logical units per second.
pub const TRAIN_SPEED: f32 = 160.0;

const TOP_LEFT: [f32; 2] = [0.0, 0.0];
const TOP_RIGHT: [f32; 2] = [1.0, 0.0];
const BOTTOM_LEFT: [f32; 2] = [0.0, 1.0];
const BOTTOM_CENTER: [f32; 2] = [0.5, 1.0];
const CENTER: [f32; 2] = [0.5, 0.5];
const TOP_CENTER: [f32; 2] = [0.5, 0.0];

pub fn manifest() -> Vec<AtlasSource> {
    vec![
        AtlasSource::new(LANDSCAPE, "atlas/hero-landscape.png"),
        AtlasSource::new(PROPS, "atlas/hero-props.png"),
        AtlasSource::new(TRAIN, "atlas/hero-train.png"),
        AtlasSource::new(TITLE, "atlas/hero-title.png"),
    ]
}

fn fixed(x: f32, y: f32) -> LayoutRule {
    LayoutRule::at(Coord::Fixed(x), Coord::Fixed(y))
}

/// `x` fixed, `y` relative to `screens` screen heights.
fn below(x: f32, screens: f32, offset: f32) -> LayoutRule {
    LayoutRule::at(Coord::Fixed(x), Coord::screens(screens, offset))
}

pub fn nodes() -> Vec<NodeDescriptor> {
    vec![
        // first screen: landscape
        NodeDescriptor::sprite(
            "sky",
            fixed(0.0, 0.0).with_z(-10),
            Crop::new(LANDSCAPE, 0, 0, 1920, 1080),
            TOP_LEFT,
        ),
        NodeDescriptor::sprite(
            "clouds_far",
            below(0.0, 0.12, 0.0).with_z(-9),
            Crop::new(TITLE, 0, 528, 1920, 240),
            TOP_LEFT,
        ),
        NodeDescriptor::sprite(
            "hills_far",
            below(0.0, 1.0, -140.0).with_z(-8),
            Crop::new(LANDSCAPE, 0, 1088, 1920, 420),
            BOTTOM_LEFT,
        ),
        NodeDescriptor::sprite(
            "hills_near",
            below(0.0, 1.0, 0.0).with_z(-7),
            Crop::new(LANDSCAPE, 0, 1512, 1920, 300),
            BOTTOM_LEFT,
        ),
        NodeDescriptor::new(
            "water",
            below(960.0, 1.0, -120.0).with_z(-6),
            vec![
                PartDescriptor::new(Crop::new(LANDSCAPE, 0, 1816, 1920, 160), TOP_CENTER)
                    .with_motion(MotionKind::Breathe {
                        base_scale: 1.0,
                        amplitude: 0.04,
                        rate: 1.6,
                    }),
            ],
        ),
        NodeDescriptor::new(
            "mill",
            below(300.0, 1.0, -220.0),
            vec![
                PartDescriptor::new(Crop::new(PROPS, 376, 0, 260, 420), BOTTOM_CENTER),
                PartDescriptor::new(Crop::new(PROPS, 644, 0, 360, 360), CENTER)
                    .offset(0.0, -360.0)
                    .with_motion(MotionKind::Spin {
                        angular_velocity: 0.6,
                    }),
            ],
        ),
        NodeDescriptor::sprite(
            "houses",
            below(620.0, 1.0, -160.0),
            Crop::new(PROPS, 1012, 0, 420, 300),
            BOTTOM_CENTER,
        ),
        NodeDescriptor::sprite(
            "tree_left",
            below(120.0, 1.0, -90.0).with_z(1),
            Crop::new(PROPS, 1440, 0, 220, 380),
            BOTTOM_CENTER,
        ),
        NodeDescriptor::sprite(
            "tree_right",
            below(1780.0, 1.0, -100.0).with_z(1),
            Crop::new(PROPS, 1668, 0, 240, 400),
            BOTTOM_CENTER,
        ),
        NodeDescriptor::new(
            "title",
            below(960.0, 0.42, 0.0).with_z(10),
            vec![
                PartDescriptor::new(Crop::new(TITLE, 0, 0, 1400, 520), CENTER),
                PartDescriptor::new(Crop::new(TITLE, 1408, 0, 420, 200), CENTER)
                    .offset(-720.0, 140.0),
                PartDescriptor::new(Crop::new(TITLE, 1408, 208, 420, 200), CENTER)
                    .offset(720.0, 90.0),
            ],
        ),
        // second screen: festival grounds
        NodeDescriptor::sprite(
            "stage",
            below(960.0, 2.0, -80.0),
            Crop::new(PROPS, 0, 1408, 640, 360),
            BOTTOM_CENTER,
        ),
        NodeDescriptor::sprite(
            "tent_left",
            below(420.0, 2.0, -120.0),
            Crop::new(PROPS, 648, 1408, 300, 260),
            BOTTOM_CENTER,
        ),
        NodeDescriptor::sprite(
            "tent_right",
            below(1500.0, 2.0, -120.0),
            Crop::new(PROPS, 648, 1408, 300, 260),
            BOTTOM_CENTER,
        ),
        NodeDescriptor::new(
            "ferris_wheel",
            below(1660.0, 2.0, -60.0).with_z(-1),
            vec![
                PartDescriptor::new(Crop::new(PROPS, 376, 428, 300, 380), BOTTOM_CENTER),
                PartDescriptor::new(Crop::new(PROPS, 1432, 1408, 420, 420), CENTER)
                    .offset(0.0, -330.0)
                    .with_motion(MotionKind::Spin {
                        angular_velocity: 0.35,
                    }),
            ],
        ),
        NodeDescriptor::new(
            "gears",
            below(260.0, 2.0, -240.0),
            vec![
                PartDescriptor::new(Crop::new(PROPS, 956, 1408, 300, 300), CENTER).with_motion(
                    MotionKind::Spin {
                        angular_velocity: 0.8,
                    },
                ),
                PartDescriptor::new(Crop::new(PROPS, 1264, 1408, 160, 160), CENTER)
                    .offset(200.0, -60.0)
                    .with_motion(MotionKind::Spin {
                        angular_velocity: 1.5,
                    }),
            ],
        ),
        // third screen: bridge and train
        NodeDescriptor::new(
            "bridge",
            below(0.0, 3.0, -200.0).with_z(5),
            vec![
                PartDescriptor::new(Crop::new(PROPS, 0, 1836, 1920, 140), BOTTOM_LEFT),
                PartDescriptor::new(Crop::new(TRAIN, 0, 0, 1100, 180), BOTTOM_LEFT)
                    .offset(0.0, -110.0)
                    .with_motion(MotionKind::Train {
                        speed: TRAIN_SPEED,
                        wait: TRAIN_WAIT,
                    }),
            ],
        ),
        NodeDescriptor::sprite(
            "grass",
            below(0.0, 3.0, 0.0).with_z(20),
            Crop::new(TRAIN, 0, 188, 1920, 200),
            BOTTOM_LEFT,
        ),
        // frame: full-bleed pillars, three screens tall at any width
        NodeDescriptor::sprite(
            "pillar_left",
            fixed(0.0, 0.0)
                .with_z(30)
                .with_fit_height(Coord::screens(3.0, 0.0)),
            Crop::new(PROPS, 0, 0, 180, 1400),
            TOP_LEFT,
        ),
        NodeDescriptor::sprite(
            "pillar_right",
            fixed(1920.0, 0.0)
                .with_z(30)
                .with_fit_height(Coord::screens(3.0, 0.0)),
            Crop::new(PROPS, 188, 0, 180, 1400),
            TOP_RIGHT,
        ),
    ]
}
