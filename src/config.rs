//! Start-up configuration.
//!
//! Everything the scene needs to know before it mounts: where to attach, where the
//! atlases live, what to load and which nodes to build. The defaults describe the
//! festival hero illustration.

use crate::{data_structures::scene_graph::NodeDescriptor, hero, resources::AtlasSource};

pub const DEFAULT_MOUNT_ID: &str = "hero-scene";
pub const DEFAULT_ASSET_ROOT: &str = "assets";

#[derive(Clone, Debug)]
pub struct SceneConfig {
    /// Id of the container element the canvas is attached to (web only).
    pub mount_id: String,
    /// Directory (native) or URL path (web) the manifest sources are relative to.
    pub asset_root: String,
    pub clear_colour: wgpu::Color,
    pub manifest: Vec<AtlasSource>,
    pub nodes: Vec<NodeDescriptor>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            mount_id: DEFAULT_MOUNT_ID.to_string(),
            asset_root: DEFAULT_ASSET_ROOT.to_string(),
            clear_colour: wgpu::Color::TRANSPARENT,
            manifest: hero::manifest(),
            nodes: hero::nodes(),
        }
    }
}

impl SceneConfig {
    pub fn with_mount_id(mut self, mount_id: impl Into<String>) -> Self {
        self.mount_id = mount_id.into();
        self
    }

    pub fn with_asset_root(mut self, asset_root: impl Into<String>) -> Self {
        self.asset_root = asset_root.into();
        self
    }

    pub fn with_clear_colour(mut self, clear_colour: wgpu::Color) -> Self {
        self.clear_colour = clear_colour;
        self
    }

    pub fn with_scene(mut self, manifest: Vec<AtlasSource>, nodes: Vec<NodeDescriptor>) -> Self {
        self.manifest = manifest;
        self.nodes = nodes;
        self
    }
}
