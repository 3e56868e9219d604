//! Scene data structures: atlases, transforms, layout and animation state.
//!
//! - `atlas` holds decoded atlas images, crop rectangles and the atlas registry
//! - `instance` is the 2D transform (position, rotation, scale) and its composition
//! - `layout` turns a viewport size into scene metrics and node placements
//! - `motion` contains the frame-driven animations (spin, breathe, train loop)
//! - `scene_graph` builds nodes from descriptors and flattens them into sprites
//! - `texture` wraps GPU textures created from atlas images

pub mod atlas;
pub mod instance;
pub mod layout;
pub mod motion;
pub mod scene_graph;
pub mod texture;
