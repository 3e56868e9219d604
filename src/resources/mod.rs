use anyhow::Context;
use log::info;

use crate::{
    data_structures::atlas::{Atlas, AtlasSet},
    error::SceneError,
};

/**
 * This module contains all logic for loading atlas bitmaps from external files and
 * turning them into GPU textures.
 */
pub mod texture;

/// One entry of the atlas manifest: which bitmap to load under which alias.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AtlasSource {
    pub alias: String,
    /// Path relative to the asset root.
    pub src: String,
}

impl AtlasSource {
    pub fn new(alias: impl Into<String>, src: impl Into<String>) -> Self {
        Self {
            alias: alias.into(),
            src: src.into(),
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn format_url(asset_root: &str, file_name: &str) -> anyhow::Result<reqwest::Url> {
    let window = web_sys::window().context("no global window")?;
    let origin = window
        .location()
        .origin()
        .map_err(|_| anyhow::anyhow!("page origin is not readable"))?;
    let base = reqwest::Url::parse(&format!("{}/{}/", origin, asset_root.trim_matches('/')))?;
    Ok(base.join(file_name)?)
}

pub async fn load_binary(asset_root: &str, file_name: &str) -> anyhow::Result<Vec<u8>> {
    #[cfg(target_arch = "wasm32")]
    let data = {
        let url = format_url(asset_root, file_name)?;
        reqwest::get(url)
            .await?
            .error_for_status()?
            .bytes()
            .await?
            .to_vec()
    };
    #[cfg(not(target_arch = "wasm32"))]
    let data = {
        let path = std::path::Path::new(asset_root).join(file_name);
        tokio::fs::read(&path)
            .await
            .with_context(|| format!("reading {}", path.display()))?
    };

    Ok(data)
}

async fn load_atlas(source: &AtlasSource, asset_root: &str) -> anyhow::Result<Atlas> {
    let atlas_error = |reason: anyhow::Error| SceneError::AtlasLoad {
        alias: source.alias.clone(),
        src: source.src.clone(),
        reason: format!("{reason:#}"),
    };
    let bytes = load_binary(asset_root, &source.src)
        .await
        .map_err(atlas_error)?;
    let atlas = Atlas::from_bytes(source.alias.clone(), &bytes).map_err(atlas_error)?;
    info!(
        "loaded atlas `{}` ({}x{})",
        atlas.alias(),
        atlas.width(),
        atlas.height()
    );
    Ok(atlas)
}

/// Fetches and decodes every atlas of `manifest` concurrently.
///
/// Fails as a whole if any single atlas fails: the scene cannot be drawn with
/// missing atlases, so no partial set is ever returned.
pub async fn load_all(manifest: &[AtlasSource], asset_root: &str) -> anyhow::Result<AtlasSet> {
    let atlases = futures::future::try_join_all(
        manifest
            .iter()
            .map(|source| load_atlas(source, asset_root)),
    )
    .await?;
    let mut set = AtlasSet::new();
    atlases.into_iter().for_each(|atlas| set.insert(atlas));
    Ok(set)
}
