//! Fatal start-up errors.
//!
//! Everything listed here aborts scene construction: the scene either starts
//! completely or not at all. Lookup problems (unknown atlas alias, bad crop) are not
//! errors; they resolve to the placeholder texture, see
//! [`AtlasSet::get_sub_texture`](crate::data_structures::atlas::AtlasSet::get_sub_texture).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SceneError {
    /// The container element the canvas should be attached to does not exist.
    #[error("mount element `#{0}` not found")]
    MissingMount(String),

    /// An atlas of the manifest could not be fetched or decoded.
    #[error("atlas `{alias}` could not be loaded from `{src}`: {reason}")]
    AtlasLoad {
        alias: String,
        src: String,
        reason: String,
    },

    #[error("no compatible GPU adapter found")]
    NoAdapter,
}
