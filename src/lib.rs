//! hero-scene
//!
//! A sprite-atlas scene engine for a single responsive hero illustration. Named
//! rectangles are cropped out of a handful of texture atlases, assembled into scene
//! nodes, laid out against a fixed 1920 px logical width and animated with
//! independent frame-driven motions. The crate runs natively in a window and on the
//! web inside a container element.
//!
//! High-level modules
//! - `composer`: world root, resize handling, frame clock and painter's order
//! - `config`: start-up configuration (mount point, asset root, manifest, nodes)
//! - `context`: window, GPU device and surface
//! - `data_structures`: atlases, transforms, layout rules, motions and scene nodes
//! - `error`: typed failures of the mount sequence
//! - `flow`: the event loop that mounts the scene and drives the frames
//! - `hero`: the festival hero illustration, described as data
//! - `pipelines`: the textured-quad sprite pipeline
//! - `resources`: atlas loading and GPU upload
//! - `render`: sprite batching and the render pass
//!

pub mod composer;
pub mod config;
pub mod context;
pub mod data_structures;
pub mod error;
pub mod flow;
pub mod hero;
pub mod pipelines;
pub mod render;
pub mod resources;

// Re-exports commonly used types for convenience in downstream code.
pub use composer::SceneComposer;
pub use config::SceneConfig;
pub use data_structures::atlas::{Atlas, AtlasSet, Rect, SubTexture};
pub use error::SceneError;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

/// Web entry point: mounts the default hero scene into `#hero-scene`.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() {
    if let Err(err) = flow::run(SceneConfig::default()) {
        log::error!("hero scene stopped: {err:#}");
    }
}
