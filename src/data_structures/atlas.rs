//! Texture atlases and sub-texture crops.
//!
//! An [`Atlas`] is one decoded bitmap identified by an alias. The [`AtlasSet`] owns
//! every atlas of the manifest for the lifetime of the scene and hands out
//! [`SubTexture`]s: rectangular crops that refer to their atlas by alias only.
//!
//! Crop coordinates are hand-authored constants. A bad constant must not take the
//! whole scene down, so lookups never fail: an unknown alias or a crop outside the
//! atlas resolves to [`SubTexture::placeholder`] and logs a warning.

use std::collections::HashMap;

use anyhow::Context;
use log::warn;

/// Alias used by the placeholder texture. No manifest entry may use it.
pub const PLACEHOLDER_ALIAS: &str = "__placeholder";

/// A rectangle in atlas pixel space.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Whether the rectangle is non-empty and lies completely inside `width` x `height`.
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        self.width > 0
            && self.height > 0
            && self
                .x
                .checked_add(self.width)
                .is_some_and(|right| right <= width)
            && self
                .y
                .checked_add(self.height)
                .is_some_and(|bottom| bottom <= height)
    }
}

/// A decoded atlas bitmap.
#[derive(Clone, Debug)]
pub struct Atlas {
    alias: String,
    image: image::RgbaImage,
}

impl Atlas {
    pub fn from_image(alias: impl Into<String>, image: image::RgbaImage) -> Self {
        Self {
            alias: alias.into(),
            image,
        }
    }

    /// Decode an atlas from encoded image bytes (PNG, JPEG, WebP).
    pub fn from_bytes(alias: impl Into<String>, bytes: &[u8]) -> anyhow::Result<Self> {
        let alias = alias.into();
        let image = image::load_from_memory(bytes)
            .with_context(|| format!("decoding atlas `{alias}`"))?
            .to_rgba8();
        Ok(Self { alias, image })
    }

    pub fn alias(&self) -> &str {
        &self.alias
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn image(&self) -> &image::RgbaImage {
        &self.image
    }
}

/// A read-only crop of an atlas.
///
/// The crop does not own its atlas; it only remembers the alias so the renderer can
/// look the bitmap up again when batching draws.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SubTexture {
    pub alias: String,
    pub rect: Rect,
}

impl SubTexture {
    /// The well-defined empty texture returned for unresolvable crops.
    pub fn placeholder() -> Self {
        Self {
            alias: PLACEHOLDER_ALIAS.to_string(),
            rect: Rect::new(0, 0, 1, 1),
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.alias == PLACEHOLDER_ALIAS
    }

    pub fn width(&self) -> u32 {
        self.rect.width
    }

    pub fn height(&self) -> u32 {
        self.rect.height
    }

    /// Normalized UV corners in the order top-left, top-right, bottom-right, bottom-left.
    pub fn uv_coords(&self, atlas_width: u32, atlas_height: u32) -> [[f32; 2]; 4] {
        let aw = atlas_width as f32;
        let ah = atlas_height as f32;
        let u0 = self.rect.x as f32 / aw;
        let v0 = self.rect.y as f32 / ah;
        let u1 = (self.rect.x + self.rect.width) as f32 / aw;
        let v1 = (self.rect.y + self.rect.height) as f32 / ah;
        [[u0, v0], [u1, v0], [u1, v1], [u0, v1]]
    }
}

/// Every atlas of the scene, keyed by alias.
///
/// Built once at start-up (see [`crate::resources::load_all`]) and passed by
/// reference to everything that needs texture data.
#[derive(Clone, Debug, Default)]
pub struct AtlasSet {
    atlases: HashMap<String, Atlas>,
}

impl AtlasSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an atlas, replacing a previous one with the same alias.
    pub fn insert(&mut self, atlas: Atlas) {
        if atlas.alias() == PLACEHOLDER_ALIAS {
            warn!("refusing to register an atlas under the reserved alias `{PLACEHOLDER_ALIAS}`");
            return;
        }
        self.atlases.insert(atlas.alias.clone(), atlas);
    }

    pub fn get(&self, alias: &str) -> Option<&Atlas> {
        self.atlases.get(alias)
    }

    pub fn contains(&self, alias: &str) -> bool {
        self.atlases.contains_key(alias)
    }

    pub fn len(&self) -> usize {
        self.atlases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atlases.is_empty()
    }

    /// Aliases in sorted order.
    pub fn aliases(&self) -> Vec<&str> {
        let mut aliases: Vec<&str> = self.atlases.keys().map(String::as_str).collect();
        aliases.sort_unstable();
        aliases
    }

    pub fn iter(&self) -> impl Iterator<Item = &Atlas> {
        self.atlases.values()
    }

    /// Crops `(x, y, width, height)` out of the atlas `alias`.
    ///
    /// Falls back to [`SubTexture::placeholder`] with a warning if the alias is
    /// unknown or the crop does not fit the atlas.
    pub fn get_sub_texture(&self, alias: &str, x: u32, y: u32, width: u32, height: u32) -> SubTexture {
        let rect = Rect::new(x, y, width, height);
        let Some(atlas) = self.atlases.get(alias) else {
            warn!("unknown atlas `{alias}`, using placeholder for crop {rect:?}");
            return SubTexture::placeholder();
        };
        if !rect.fits_within(atlas.width(), atlas.height()) {
            warn!(
                "crop {:?} does not fit atlas `{}` ({}x{}), using placeholder",
                rect,
                alias,
                atlas.width(),
                atlas.height()
            );
            return SubTexture::placeholder();
        }
        SubTexture {
            alias: alias.to_string(),
            rect,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set_with(alias: &str, width: u32, height: u32) -> AtlasSet {
        let mut set = AtlasSet::new();
        set.insert(Atlas::from_image(alias, image::RgbaImage::new(width, height)));
        set
    }

    #[test]
    fn crop_keeps_exact_bounds() {
        let set = set_with("props", 512, 256);
        let sub = set.get_sub_texture("props", 10, 20, 100, 50);
        assert_eq!(sub.alias, "props");
        assert_eq!(sub.rect, Rect::new(10, 20, 100, 50));
        assert!(!sub.is_placeholder());
    }

    #[test]
    fn crop_touching_the_edge_is_valid() {
        let set = set_with("props", 512, 256);
        let sub = set.get_sub_texture("props", 412, 206, 100, 50);
        assert_eq!(sub.rect, Rect::new(412, 206, 100, 50));
    }

    #[test]
    fn unknown_alias_gives_placeholder() {
        let set = set_with("props", 512, 256);
        let sub = set.get_sub_texture("nonexistent", 0, 0, 10, 10);
        assert!(sub.is_placeholder());
        assert_eq!(sub, SubTexture::placeholder());
    }

    #[test]
    fn out_of_bounds_crop_gives_placeholder() {
        let set = set_with("props", 512, 256);
        assert!(set.get_sub_texture("props", 500, 0, 13, 10).is_placeholder());
        assert!(set.get_sub_texture("props", 0, 250, 10, 7).is_placeholder());
        assert!(set.get_sub_texture("props", u32::MAX, 0, 2, 2).is_placeholder());
        assert!(set.get_sub_texture("props", 0, 0, 0, 10).is_placeholder());
    }

    #[test]
    fn reserved_alias_is_rejected() {
        let set = set_with(PLACEHOLDER_ALIAS, 4, 4);
        assert!(set.is_empty());
    }

    #[test]
    fn uv_coords_are_normalized() {
        let sub = SubTexture {
            alias: "a".into(),
            rect: Rect::new(256, 0, 256, 128),
        };
        let uv = sub.uv_coords(1024, 512);
        assert_eq!(uv[0], [0.25, 0.0]);
        assert_eq!(uv[2], [0.5, 0.25]);
    }

    #[test]
    fn decodes_png_bytes() {
        let mut bytes = Vec::new();
        image::DynamicImage::ImageRgba8(image::RgbaImage::new(8, 4))
            .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        let atlas = Atlas::from_bytes("tiny", &bytes).unwrap();
        assert_eq!((atlas.width(), atlas.height()), (8, 4));
        assert!(Atlas::from_bytes("broken", b"not an image").is_err());
    }
}
