//! Scene nodes and their sprite parts.
//!
//! Every decorative element of the scene is one [`SceneNode`] built from a
//! [`NodeDescriptor`]: a list of atlas crops (parts), the node's layout rule and the
//! optional motion of each part. Simple elements have a single part, composites (a
//! mill with a turning blade, a title with clouds beside it) have several.
//!
//! Transforms nest as `root * node * part`. The root is owned by the composer and
//! carries the logical→viewport scale; nodes and parts are authored in logical units.

use cgmath::{Matrix3, Rad, Vector2};
use instant::Duration;

use crate::data_structures::{
    atlas::{AtlasSet, SubTexture},
    instance::{Instance, apply},
    layout::{LOGICAL_WIDTH, LayoutRule, Placement, SceneMetrics},
    motion::{Motion, MotionKind},
};

/// Crop of a named atlas, `(alias, x, y, width, height)` in atlas pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Crop {
    pub alias: &'static str,
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Crop {
    pub const fn new(alias: &'static str, x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            alias,
            x,
            y,
            width,
            height,
        }
    }
}

/// One sprite of a node as authored.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PartDescriptor {
    pub crop: Crop,
    /// Normalized origin of the sprite, `(0.5, 1.0)` is bottom-center.
    pub anchor: [f32; 2],
    /// Offset from the node origin in logical units.
    pub offset: [f32; 2],
    pub motion: Option<MotionKind>,
}

impl PartDescriptor {
    pub const fn new(crop: Crop, anchor: [f32; 2]) -> Self {
        Self {
            crop,
            anchor,
            offset: [0.0, 0.0],
            motion: None,
        }
    }

    pub const fn offset(mut self, x: f32, y: f32) -> Self {
        self.offset = [x, y];
        self
    }

    pub const fn with_motion(mut self, motion: MotionKind) -> Self {
        self.motion = Some(motion);
        self
    }
}

/// Declarative description of one node.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeDescriptor {
    pub name: &'static str,
    pub parts: Vec<PartDescriptor>,
    pub layout: LayoutRule,
}

impl NodeDescriptor {
    pub fn new(name: &'static str, layout: LayoutRule, parts: Vec<PartDescriptor>) -> Self {
        Self {
            name,
            parts,
            layout,
        }
    }

    /// A node made of a single sprite.
    pub fn sprite(name: &'static str, layout: LayoutRule, crop: Crop, anchor: [f32; 2]) -> Self {
        Self::new(name, layout, vec![PartDescriptor::new(crop, anchor)])
    }
}

/// A sprite inside a node.
#[derive(Clone, Debug, PartialEq)]
pub struct Part {
    pub texture: SubTexture,
    pub anchor: Vector2<f32>,
    pub offset: Vector2<f32>,
    pub motion: Option<Motion>,
}

impl Part {
    fn size(&self) -> Vector2<f32> {
        Vector2::new(self.texture.width() as f32, self.texture.height() as f32)
    }

    /// Transform relative to the node origin, including the current motion state.
    pub fn local_transform(&self) -> Instance {
        let mut local = Instance::from(self.offset);
        match &self.motion {
            Some(Motion::Spin(spin)) => local.rotation = Rad(spin.angle),
            Some(Motion::Breathe(breathe)) => local.scale.y = breathe.scale_y(),
            Some(Motion::Train(train)) => local.position.x += train.x,
            None => (),
        }
        local
    }

    /// Axis aligned bounds `(min, max)` at rest, relative to the node origin.
    fn rest_bounds(&self) -> (Vector2<f32>, Vector2<f32>) {
        let size = self.size();
        let min = self.offset - Vector2::new(self.anchor.x * size.x, self.anchor.y * size.y);
        (min, min + size)
    }
}

/// One sprite ready to be drawn: crop, anchor and world transform in viewport pixels.
///
/// Borrows its crop from the node, so building the frame's draw list allocates no
/// strings.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpriteDraw<'a> {
    pub texture: &'a SubTexture,
    pub anchor: Vector2<f32>,
    pub transform: Matrix3<f32>,
    pub z: i32,
}

impl SpriteDraw<'_> {
    /// Corners in viewport pixels: top-left, top-right, bottom-right, bottom-left.
    pub fn corners(&self) -> [[f32; 2]; 4] {
        let w = self.texture.width() as f32;
        let h = self.texture.height() as f32;
        let left = -self.anchor.x * w;
        let top = -self.anchor.y * h;
        [
            Vector2::new(left, top),
            Vector2::new(left + w, top),
            Vector2::new(left + w, top + h),
            Vector2::new(left, top + h),
        ]
        .map(|corner| apply(&self.transform, corner).into())
    }
}

/// A positioned, optionally animated decorative element.
#[derive(Clone, Debug)]
pub struct SceneNode {
    name: &'static str,
    parts: Vec<Part>,
    layout: LayoutRule,
    placement: Placement,
    local: Instance,
    size: Vector2<f32>,
}

impl SceneNode {
    pub fn new(descriptor: &NodeDescriptor, atlases: &AtlasSet) -> Self {
        let parts: Vec<Part> = descriptor
            .parts
            .iter()
            .map(|part| {
                let crop = part.crop;
                let texture =
                    atlases.get_sub_texture(crop.alias, crop.x, crop.y, crop.width, crop.height);
                let motion = part
                    .motion
                    .map(|kind| Motion::from_kind(kind, crop.width as f32, LOGICAL_WIDTH));
                Part {
                    texture,
                    anchor: part.anchor.into(),
                    offset: part.offset.into(),
                    motion,
                }
            })
            .collect();
        let size = bounding_size(&parts);
        Self {
            name: descriptor.name,
            parts,
            layout: descriptor.layout,
            placement: Placement::default(),
            local: Instance::new(),
            size,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    pub fn placement(&self) -> Placement {
        self.placement
    }

    /// Unscaled size of the node's bounding box in logical units.
    pub fn size(&self) -> Vector2<f32> {
        self.size
    }

    pub fn is_animated(&self) -> bool {
        self.parts.iter().any(|part| part.motion.is_some())
    }

    pub fn get_local_transform(&self) -> Instance {
        self.local
    }

    /// Applies the node's own layout rule for `metrics`.
    pub fn relayout(&mut self, metrics: &SceneMetrics) {
        let placement = self.layout.place(metrics, self.size.y);
        self.set_layout(placement);
    }

    pub fn set_layout(&mut self, placement: Placement) {
        self.placement = placement;
        self.local = Instance {
            position: placement.position,
            rotation: Rad(0.0),
            scale: placement.scale,
        };
    }

    pub fn update(&mut self, dt: Duration) {
        self.parts
            .iter_mut()
            .filter_map(|part| part.motion.as_mut())
            .for_each(|motion| motion.update(dt));
    }

    /// World transform of every part below `root`, in part order.
    pub fn get_world_transforms(&self, root: &Instance) -> Vec<Matrix3<f32>> {
        let node_world = root.to_matrix() * self.get_local_transform().to_matrix();
        self.parts
            .iter()
            .map(|part| node_world * part.local_transform().to_matrix())
            .collect()
    }

    pub fn sprites(&self, root: &Instance) -> Vec<SpriteDraw<'_>> {
        self.get_world_transforms(root)
            .into_iter()
            .zip(self.parts.iter())
            .map(|(transform, part)| SpriteDraw {
                texture: &part.texture,
                anchor: part.anchor,
                transform,
                z: self.placement.z,
            })
            .collect()
    }
}

fn bounding_size(parts: &[Part]) -> Vector2<f32> {
    let mut bounds = parts.iter().map(Part::rest_bounds);
    let Some(first) = bounds.next() else {
        return Vector2::new(0.0, 0.0);
    };
    let (min, max) = bounds.fold(first, |(min, max), (lo, hi)| {
        (
            Vector2::new(min.x.min(lo.x), min.y.min(lo.y)),
            Vector2::new(max.x.max(hi.x), max.y.max(hi.y)),
        )
    });
    max - min
}

#[cfg(test)]
mod tests {
    use instant::Duration;

    use super::*;
    use crate::data_structures::{
        atlas::Atlas,
        layout::Coord,
        motion::TrainPhase,
    };

    fn atlases() -> AtlasSet {
        let mut set = AtlasSet::new();
        set.insert(Atlas::from_image("props", image::RgbaImage::new(1024, 1024)));
        set
    }

    fn mill() -> NodeDescriptor {
        NodeDescriptor::new(
            "mill",
            LayoutRule::at(Coord::Fixed(300.0), Coord::screens(1.0, -220.0)),
            vec![
                PartDescriptor::new(Crop::new("props", 0, 0, 200, 400), [0.5, 1.0]),
                PartDescriptor::new(Crop::new("props", 200, 0, 300, 300), [0.5, 0.5])
                    .offset(0.0, -350.0)
                    .with_motion(MotionKind::Spin {
                        angular_velocity: 1.0,
                    }),
            ],
        )
    }

    #[test]
    fn composite_bounds_cover_all_parts() {
        let node = SceneNode::new(&mill(), &atlases());
        // blade spans y -500..-200, base -400..0, widths 300 and 200
        assert_eq!(node.size(), Vector2::new(300.0, 500.0));
        assert!(node.is_animated());
    }

    #[test]
    fn bad_crop_becomes_placeholder_part() {
        let descriptor = NodeDescriptor::sprite(
            "ghost",
            LayoutRule::at(Coord::Fixed(0.0), Coord::Fixed(0.0)),
            Crop::new("missing", 0, 0, 64, 64),
            [0.0, 0.0],
        );
        let node = SceneNode::new(&descriptor, &atlases());
        assert!(node.parts()[0].texture.is_placeholder());
    }

    #[test]
    fn relayout_places_node_in_logical_space() {
        let mut node = SceneNode::new(&mill(), &atlases());
        let metrics = SceneMetrics::from_viewport(1920.0, 1000.0).unwrap();
        node.relayout(&metrics);
        assert_eq!(node.placement().position, Vector2::new(300.0, 780.0));
    }

    #[test]
    fn update_only_moves_animated_parts() {
        let mut node = SceneNode::new(&mill(), &atlases());
        node.update(Duration::from_millis(500));
        assert_eq!(node.parts()[0].local_transform().rotation, Rad(0.0));
        match node.parts()[1].motion {
            Some(Motion::Spin(spin)) => assert!((spin.angle - 0.5).abs() < 1e-6),
            ref other => panic!("unexpected motion {other:?}"),
        }
    }

    #[test]
    fn world_transform_nests_root_node_and_part() {
        let mut node = SceneNode::new(&mill(), &atlases());
        let metrics = SceneMetrics::from_viewport(960.0, 540.0).unwrap();
        node.relayout(&metrics);
        let root = Instance::from_scale(metrics.scale);
        let world = node.get_world_transforms(&root);
        let origin = Vector2::new(0.0, 0.0);
        // base at (300, 1080 - 220) logical, halved
        assert_eq!(apply(&world[0], origin), Vector2::new(150.0, 430.0));
        // blade 350 logical units above the base
        assert_eq!(apply(&world[1], origin), Vector2::new(150.0, 255.0));
    }

    #[test]
    fn sprite_corners_honour_the_anchor() {
        let node = SceneNode::new(&mill(), &atlases());
        let sprites = node.sprites(&Instance::new());
        let corners = sprites[0].corners();
        assert_eq!(corners[0], [-100.0, -400.0]);
        assert_eq!(corners[2], [100.0, 0.0]);
    }

    #[test]
    fn train_part_offset_follows_the_loop() {
        let descriptor = NodeDescriptor::new(
            "bridge",
            LayoutRule::at(Coord::Fixed(0.0), Coord::Fixed(0.0)),
            vec![
                PartDescriptor::new(Crop::new("props", 0, 0, 100, 20), [0.0, 1.0]).with_motion(
                    MotionKind::Train {
                        speed: 100.0,
                        wait: Duration::from_secs(1),
                    },
                ),
            ],
        );
        let mut node = SceneNode::new(&descriptor, &atlases());
        assert_eq!(node.parts()[0].local_transform().position.x, LOGICAL_WIDTH);
        node.update(Duration::from_secs(1));
        assert!((node.parts()[0].local_transform().position.x - (LOGICAL_WIDTH - 100.0)).abs() < 1e-3);
        match node.parts()[0].motion {
            Some(Motion::Train(train)) => assert_eq!(train.phase, TrainPhase::Moving),
            ref other => panic!("unexpected motion {other:?}"),
        }
    }

    #[test]
    fn spinning_part_of_a_stretched_node_stays_a_true_rotation() {
        let descriptor = NodeDescriptor::new(
            "pillar_wheel",
            LayoutRule::at(Coord::Fixed(0.0), Coord::Fixed(0.0))
                .with_fit_height(Coord::Fixed(200.0)),
            vec![
                PartDescriptor::new(Crop::new("props", 0, 0, 100, 100), [0.5, 0.5]).with_motion(
                    MotionKind::Spin {
                        angular_velocity: std::f32::consts::FRAC_PI_2,
                    },
                ),
            ],
        );
        let mut node = SceneNode::new(&descriptor, &atlases());
        node.relayout(&SceneMetrics::from_viewport(1920.0, 1080.0).unwrap());
        assert_eq!(node.get_local_transform().scale, Vector2::new(1.0, 2.0));
        node.update(Duration::from_secs(1));

        // a quarter turn first, then the node's vertical stretch
        let world = node.get_world_transforms(&Instance::new());
        let p = apply(&world[0], Vector2::new(1.0, 0.0));
        assert!((p.x - 0.0).abs() < 1e-4 && (p.y - 2.0).abs() < 1e-4, "{p:?}");
    }
}
