#![allow(dead_code)]

use hero_scene::{
    Atlas, AtlasSet, Rect, SceneComposer,
    hero::{self, LANDSCAPE, PROPS, TITLE, TRAIN},
};

/// Pixel sizes of the production atlases.
pub const ATLAS_SIZES: [(&str, u32, u32); 4] = [
    (LANDSCAPE, 2048, 2048),
    (PROPS, 2048, 2048),
    (TRAIN, 2048, 512),
    (TITLE, 2048, 1024),
];

/// Blank atlases with the production sizes, optionally leaving some out.
pub fn hero_atlases_without(missing: &[&str]) -> AtlasSet {
    let mut set = AtlasSet::new();
    for (alias, width, height) in ATLAS_SIZES {
        if !missing.contains(&alias) {
            set.insert(Atlas::from_image(alias, image::RgbaImage::new(width, height)));
        }
    }
    set
}

pub fn hero_atlases() -> AtlasSet {
    hero_atlases_without(&[])
}

/// The hero scene laid out for a `width` x `height` viewport.
pub fn hero_composer(width: u32, height: u32) -> SceneComposer {
    let mut composer = SceneComposer::new(&hero_atlases(), &hero::nodes());
    composer.resize(width, height);
    composer
}

pub fn approx_eq(a: f32, b: f32, tolerance: f32) -> bool {
    (a - b).abs() <= tolerance * a.abs().max(b.abs()).max(1.0)
}

/// Owned copy of the draw list: crop, corners in viewport pixels and z.
pub fn snapshot(composer: &SceneComposer) -> Vec<(Rect, [[f32; 2]; 4], i32)> {
    composer
        .draw_list()
        .iter()
        .map(|sprite| (sprite.texture.rect, sprite.corners(), sprite.z))
        .collect()
}
