//! Render composition for the sprite scene.
//!
//! The composer's draw list is turned into a [`SpriteBatch`]: one vertex/index
//! stream for the whole frame plus a list of [`DrawCommand`]s. Consecutive sprites
//! from the same atlas share a command, so painter's order is kept while bind group
//! switches only happen where the atlas actually changes.
//!
//! # Key types
//!
//! - [`SpriteBatch`] is the CPU side: quads and draw commands
//! - [`SceneRenderer`] owns the GPU side: pipeline, projection and atlas textures

use std::iter;

use log::warn;

use crate::{
    composer::SceneComposer,
    context::Context,
    data_structures::{atlas::AtlasSet, scene_graph::SpriteDraw},
    pipelines::sprite::{ProjectionResources, Vertex, mk_sprite_pipeline},
    resources::texture::{AtlasTextures, atlas_bind_group_layout},
};

/// A run of indices drawn with one atlas bound.
#[derive(Clone, Debug, PartialEq)]
pub struct DrawCommand {
    pub alias: String,
    pub index_start: u32,
    pub index_count: u32,
}

#[derive(Debug, Default)]
pub struct SpriteBatch {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
    pub commands: Vec<DrawCommand>,
}

impl SpriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
        self.indices.clear();
        self.commands.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Appends one sprite. `atlas_size` is the pixel size of the sprite's atlas.
    pub fn push(&mut self, sprite: &SpriteDraw, atlas_size: (u32, u32)) {
        let uvs = sprite.texture.uv_coords(atlas_size.0, atlas_size.1);
        let corners = sprite.corners();

        let base = self.vertices.len() as u32;
        self.vertices.extend(
            corners
                .into_iter()
                .zip(uvs)
                .map(|(position, tex_coords)| Vertex {
                    position,
                    tex_coords,
                }),
        );
        let index_start = self.indices.len() as u32;
        self.indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);

        if let Some(last) = self.commands.last_mut()
            && last.alias == sprite.texture.alias
        {
            last.index_count += 6;
            return;
        }
        self.commands.push(DrawCommand {
            alias: sprite.texture.alias.clone(),
            index_start,
            index_count: 6,
        });
    }

    /// Rebuilds the batch from a painter-ordered draw list.
    ///
    /// Placeholder sprites draw nothing. Sprites whose atlas is unknown to
    /// `atlas_size` are skipped as well.
    pub fn rebuild(
        &mut self,
        sprites: &[SpriteDraw],
        atlas_size: impl Fn(&str) -> Option<(u32, u32)>,
    ) {
        self.clear();
        for sprite in sprites.iter().filter(|sprite| !sprite.texture.is_placeholder()) {
            match atlas_size(&sprite.texture.alias) {
                Some(size) => self.push(sprite, size),
                None => warn!("atlas `{}` is not available for drawing", sprite.texture.alias),
            }
        }
    }

    /// Builds the batch against the CPU-side atlas sizes.
    pub fn from_atlases(sprites: &[SpriteDraw], atlases: &AtlasSet) -> Self {
        let mut batch = Self::new();
        batch.rebuild(sprites, |alias| {
            atlases
                .get(alias)
                .map(|atlas| (atlas.width(), atlas.height()))
        });
        batch
    }
}

/// Size in bytes a stream buffer grows to so that `needed` bytes fit.
///
/// Doubles from `current` to keep reallocations rare; results stay multiples of
/// [`wgpu::COPY_BUFFER_ALIGNMENT`].
pub fn grown_capacity(
    current: wgpu::BufferAddress,
    needed: wgpu::BufferAddress,
) -> wgpu::BufferAddress {
    if needed <= current {
        return current;
    }
    let mut capacity = current.max(wgpu::COPY_BUFFER_ALIGNMENT);
    while capacity < needed {
        capacity *= 2;
    }
    capacity
}

/// A vertex or index buffer rewritten every frame, reallocated only when it must grow.
#[derive(Debug)]
struct StreamBuffer {
    label: &'static str,
    usage: wgpu::BufferUsages,
    buffer: wgpu::Buffer,
}

impl StreamBuffer {
    fn new(
        device: &wgpu::Device,
        label: &'static str,
        usage: wgpu::BufferUsages,
        capacity: wgpu::BufferAddress,
    ) -> Self {
        let usage = usage | wgpu::BufferUsages::COPY_DST;
        Self {
            label,
            usage,
            buffer: Self::allocate(device, label, usage, capacity),
        }
    }

    fn allocate(
        device: &wgpu::Device,
        label: &'static str,
        usage: wgpu::BufferUsages,
        size: wgpu::BufferAddress,
    ) -> wgpu::Buffer {
        device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size,
            usage,
            mapped_at_creation: false,
        })
    }

    fn write(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, data: &[u8]) {
        let needed = data.len() as wgpu::BufferAddress;
        let capacity = grown_capacity(self.buffer.size(), needed);
        if capacity != self.buffer.size() {
            log::debug!("growing {} to {} bytes", self.label, capacity);
            self.buffer = Self::allocate(device, self.label, self.usage, capacity);
        }
        queue.write_buffer(&self.buffer, 0, data);
    }
}

// room for the hero scene without growing
const INITIAL_SPRITES: wgpu::BufferAddress = 64;

/// GPU side of the scene: pipeline, projection uniform and the uploaded atlases.
#[derive(Debug)]
pub struct SceneRenderer {
    pipeline: wgpu::RenderPipeline,
    projection: ProjectionResources,
    atlases: AtlasTextures,
    batch: SpriteBatch,
    vertices: StreamBuffer,
    indices: StreamBuffer,
}

impl SceneRenderer {
    pub fn new(ctx: &Context, atlases: &AtlasSet) -> anyhow::Result<Self> {
        let atlas_layout = atlas_bind_group_layout(&ctx.device);
        let projection = ProjectionResources::new(&ctx.device, ctx.config.width, ctx.config.height);
        let pipeline = mk_sprite_pipeline(
            &ctx.device,
            ctx.config.format,
            &projection.bind_group_layout,
            &atlas_layout,
        );
        let atlases = AtlasTextures::upload(&ctx.device, &ctx.queue, &atlas_layout, atlases)?;
        let vertices = StreamBuffer::new(
            &ctx.device,
            "Sprite Vertex Buffer",
            wgpu::BufferUsages::VERTEX,
            INITIAL_SPRITES * 4 * std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
        );
        let indices = StreamBuffer::new(
            &ctx.device,
            "Sprite Index Buffer",
            wgpu::BufferUsages::INDEX,
            INITIAL_SPRITES * 6 * std::mem::size_of::<u32>() as wgpu::BufferAddress,
        );
        Ok(Self {
            pipeline,
            projection,
            atlases,
            batch: SpriteBatch::new(),
            vertices,
            indices,
        })
    }

    pub fn resize(&self, ctx: &Context, width: u32, height: u32) {
        self.projection.resize(&ctx.queue, width, height);
    }

    pub fn render(
        &mut self,
        ctx: &Context,
        composer: &SceneComposer,
    ) -> Result<(), wgpu::SurfaceError> {
        let output = ctx.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let atlases = &self.atlases;
        self.batch.rebuild(&composer.draw_list(), |alias| {
            atlases.get(alias).map(|atlas| (atlas.width, atlas.height))
        });
        if !self.batch.is_empty() {
            self.vertices.write(
                &ctx.device,
                &ctx.queue,
                bytemuck::cast_slice(&self.batch.vertices),
            );
            self.indices
                .write(&ctx.device, &ctx.queue, bytemuck::cast_slice(&self.batch.indices));
        }

        let mut encoder = ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(ctx.clear_colour),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                ..Default::default()
            });

            if !self.batch.is_empty() {
                let vertex_bytes = std::mem::size_of_val(self.batch.vertices.as_slice());
                let index_bytes = std::mem::size_of_val(self.batch.indices.as_slice());

                render_pass.set_pipeline(&self.pipeline);
                render_pass.set_bind_group(0, &self.projection.bind_group, &[]);
                render_pass
                    .set_vertex_buffer(0, self.vertices.buffer.slice(..vertex_bytes as u64));
                render_pass.set_index_buffer(
                    self.indices.buffer.slice(..index_bytes as u64),
                    wgpu::IndexFormat::Uint32,
                );
                for command in &self.batch.commands {
                    if let Some(atlas) = self.atlases.get(&command.alias) {
                        render_pass.set_bind_group(1, &atlas.bind_group, &[]);
                        render_pass.draw_indexed(
                            command.index_start..command.index_start + command.index_count,
                            0,
                            0..1,
                        );
                    }
                }
            }
        }

        ctx.queue.submit(iter::once(encoder.finish()));
        output.present();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use cgmath::{Matrix3, SquareMatrix, Vector2};

    use super::*;
    use crate::data_structures::atlas::{Atlas, Rect, SubTexture};

    fn crop(alias: &str, x: u32) -> SubTexture {
        SubTexture {
            alias: alias.to_string(),
            rect: Rect::new(x, 0, 32, 16),
        }
    }

    fn sprite(texture: &SubTexture, z: i32) -> SpriteDraw<'_> {
        SpriteDraw {
            texture,
            anchor: Vector2::new(0.0, 0.0),
            transform: Matrix3::identity(),
            z,
        }
    }

    fn atlases() -> AtlasSet {
        let mut set = AtlasSet::new();
        set.insert(Atlas::from_image("a", image::RgbaImage::new(128, 64)));
        set.insert(Atlas::from_image("b", image::RgbaImage::new(64, 64)));
        set
    }

    #[test]
    fn consecutive_sprites_of_one_atlas_share_a_command() {
        let crops = [crop("a", 0), crop("a", 32), crop("b", 0), crop("a", 64)];
        let sprites: Vec<SpriteDraw> = crops
            .iter()
            .enumerate()
            .map(|(z, texture)| sprite(texture, z as i32))
            .collect();
        let batch = SpriteBatch::from_atlases(&sprites, &atlases());
        assert_eq!(batch.vertices.len(), 16);
        assert_eq!(batch.indices.len(), 24);
        let runs: Vec<(&str, u32, u32)> = batch
            .commands
            .iter()
            .map(|c| (c.alias.as_str(), c.index_start, c.index_count))
            .collect();
        assert_eq!(runs, vec![("a", 0, 12), ("b", 12, 6), ("a", 18, 6)]);
    }

    #[test]
    fn placeholders_and_unknown_atlases_draw_nothing() {
        let placeholder = SubTexture::placeholder();
        let unknown = crop("unknown", 0);
        let sprites = vec![sprite(&placeholder, 0), sprite(&unknown, 0)];
        let batch = SpriteBatch::from_atlases(&sprites, &atlases());
        assert!(batch.is_empty());
        assert!(batch.vertices.is_empty());
    }

    #[test]
    fn quad_vertices_carry_crop_uvs() {
        let texture = crop("a", 32);
        let batch = SpriteBatch::from_atlases(&[sprite(&texture, 0)], &atlases());
        assert_eq!(batch.vertices[0].position, [0.0, 0.0]);
        assert_eq!(batch.vertices[0].tex_coords, [0.25, 0.0]);
        assert_eq!(batch.vertices[2].position, [32.0, 16.0]);
        assert_eq!(batch.vertices[2].tex_coords, [0.5, 0.25]);
    }

    #[test]
    fn stream_buffers_only_grow_when_the_frame_does_not_fit() {
        assert_eq!(grown_capacity(4096, 1000), 4096);
        assert_eq!(grown_capacity(4096, 4096), 4096);
        assert_eq!(grown_capacity(4096, 4097), 8192);
        assert_eq!(grown_capacity(4096, 20_000), 32_768);
        assert_eq!(grown_capacity(0, 6), 8);
        assert_eq!(grown_capacity(0, 6) % wgpu::COPY_BUFFER_ALIGNMENT, 0);
    }
}
