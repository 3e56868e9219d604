use hero_scene::{SceneConfig, flow};

fn main() -> anyhow::Result<()> {
    let asset_root = std::env::args()
        .nth(1)
        .unwrap_or_else(|| concat!(env!("OUT_DIR"), "/assets").to_string());
    flow::run(SceneConfig::default().with_asset_root(asset_root))
}
