//! Scene composition: world root, resize handling and the frame clock.
//!
//! The [`SceneComposer`] owns every node in construction order. A resize turns the
//! viewport size into [`SceneMetrics`] in a single step, stores the uniform scale on
//! the world root and then re-applies every node's layout rule, so no node ever sees
//! a half-updated scale. [`SceneComposer::frame_tick`] advances animations in
//! construction order; z-order only matters for painting.

use instant::Duration;
use log::{debug, info};

use crate::data_structures::{
    atlas::AtlasSet,
    instance::Instance,
    layout::SceneMetrics,
    scene_graph::{NodeDescriptor, SceneNode, SpriteDraw},
};

#[derive(Debug)]
pub struct SceneComposer {
    world: Instance,
    nodes: Vec<SceneNode>,
    metrics: Option<SceneMetrics>,
}

impl SceneComposer {
    pub fn new(atlases: &AtlasSet, descriptors: &[NodeDescriptor]) -> Self {
        let nodes: Vec<SceneNode> = descriptors
            .iter()
            .map(|descriptor| SceneNode::new(descriptor, atlases))
            .collect();
        info!(
            "composed scene with {} nodes ({} animated)",
            nodes.len(),
            nodes.iter().filter(|node| node.is_animated()).count()
        );
        Self {
            world: Instance::new(),
            nodes,
            metrics: None,
        }
    }

    /// Recomputes scale, logical height and every node's placement.
    ///
    /// Zero-sized viewports (minimised windows, hidden containers) are ignored and
    /// keep the previous layout.
    pub fn resize(&mut self, width: u32, height: u32) -> Option<SceneMetrics> {
        let Some(metrics) = SceneMetrics::from_viewport(width as f32, height as f32) else {
            debug!("ignoring resize to {width}x{height}");
            return None;
        };
        self.world = Instance::from_scale(metrics.scale);
        self.metrics = Some(metrics);
        self.nodes
            .iter_mut()
            .for_each(|node| node.relayout(&metrics));
        debug!(
            "resized to {}x{}: scale {:.4}, logical height {:.1}",
            width, height, metrics.scale, metrics.logical_height
        );
        Some(metrics)
    }

    pub fn frame_tick(&mut self, dt: Duration) {
        self.nodes.iter_mut().for_each(|node| node.update(dt));
    }

    pub fn metrics(&self) -> Option<SceneMetrics> {
        self.metrics
    }

    pub fn world(&self) -> &Instance {
        &self.world
    }

    pub fn nodes(&self) -> &[SceneNode] {
        &self.nodes
    }

    pub fn node(&self, name: &str) -> Option<&SceneNode> {
        self.nodes.iter().find(|node| node.name() == name)
    }

    /// Every part of every node in painter's order (z ascending, construction order on ties).
    pub fn draw_list(&self) -> Vec<SpriteDraw<'_>> {
        let mut sprites: Vec<SpriteDraw<'_>> = self
            .nodes
            .iter()
            .flat_map(|node| node.sprites(&self.world))
            .collect();
        sprites.sort_by_key(|sprite| sprite.z);
        sprites
    }
}
