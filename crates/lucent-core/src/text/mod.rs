// Copyright 2025 the lucent authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The text subsystem: fonts, glyph atlases, layout, and the [`Text`]
//! entity tying them to the renderer.

pub mod atlas;
pub mod font;
pub mod layout;

pub use atlas::{BakedGlyph, GlyphAtlas};
pub use font::{Font, GlyphBitmap, GlyphMetrics};
pub use layout::{layout_text, TextAlign, TextGeometry, TextVertex};

use crate::gpu::{
    DeviceError, FilterMode, Mesh, RenderDevice, SamplerDescriptor, SamplerId, TextureDescriptor,
    TextureFormat, TextureId, TextureUsage,
};
use crate::math::{Aabb, Extent2D, LinearRgba, Origin2D, Vec2, Vec3};
use crate::render::flavors::{TextFlavor, TextHandle};
use crate::render::Pipeline;

/// A drawable text: a glyph atlas texture, a vertex/index mesh, and the
/// per-instance state registered in its pipeline's [`TextFlavor`].
///
/// The `Text` owns the atlas texture and sampler; the mesh and bindings
/// live in the flavor's instance table so a frames-in-flight change can
/// fix every live text up in one pass.
#[derive(Debug)]
pub struct Text {
    handle: TextHandle,
    atlas: GlyphAtlas,
    atlas_texture: TextureId,
    sampler: SamplerId,
    geometry: TextGeometry,
    content: String,
    font_size: f32,
    align: TextAlign,
}

impl Text {
    /// Creates a text, baking its atlas and uploading its mesh.
    pub fn new(
        pipeline: &mut Pipeline<TextFlavor>,
        font: &dyn Font,
        content: &str,
        font_size: f32,
        align: TextAlign,
        color: LinearRgba,
    ) -> Result<Self, DeviceError> {
        let device = pipeline.device().clone();
        let atlas = GlyphAtlas::bake(font, font_size, content);
        let atlas_texture = upload_atlas(device.as_ref(), &atlas)?;

        let sampler = match device.create_sampler(&SamplerDescriptor {
            label: Some("text atlas sampler"),
            filter: FilterMode::Linear,
            ..SamplerDescriptor::default()
        }) {
            Ok(sampler) => sampler,
            Err(err) => {
                release_texture(device.as_ref(), atlas_texture);
                return Err(err);
            }
        };

        let handle = match pipeline
            .flavor_mut()
            .register(device.as_ref(), atlas_texture, sampler, color)
        {
            Ok(handle) => handle,
            Err(err) => {
                release_sampler(device.as_ref(), sampler);
                release_texture(device.as_ref(), atlas_texture);
                return Err(err);
            }
        };

        let mut text = Self {
            handle,
            atlas,
            atlas_texture,
            sampler,
            geometry: TextGeometry::default(),
            content: String::new(),
            font_size,
            align,
        };
        if let Err(err) = text.upload_geometry(pipeline, font, content) {
            pipeline.flavor_mut().unregister(device.as_ref(), handle);
            release_sampler(device.as_ref(), sampler);
            release_texture(device.as_ref(), atlas_texture);
            return Err(err);
        }
        Ok(text)
    }

    /// The renderer payload for this text.
    pub fn handle(&self) -> TextHandle {
        self.handle
    }

    /// The current content.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// The laid-out geometry of the current content.
    pub fn geometry(&self) -> &TextGeometry {
        &self.geometry
    }

    /// A local-space bounding box enclosing the laid-out glyphs, for
    /// culling. The box is flat in z.
    pub fn local_bounds(&self) -> Aabb {
        let half = Vec3::new(self.geometry.width / 2.0, self.geometry.height / 2.0, 0.0);
        Aabb::from_center_half_extents(Vec3::ZERO, half)
    }

    /// Changes the displayed text.
    ///
    /// When the new content needs glyphs the current atlas does not hold,
    /// the atlas is re-baked (into a larger grid when needed) and the
    /// instance's bindings are re-pointed at the new texture before the old
    /// one is destroyed. The mesh is replaced the same way: the new buffers
    /// are uploaded before the previous mesh is released.
    pub fn set_text(
        &mut self,
        pipeline: &mut Pipeline<TextFlavor>,
        font: &dyn Font,
        content: &str,
    ) -> Result<(), DeviceError> {
        let device = pipeline.device().clone();
        if !self.atlas.covers(content) {
            let mut combined = String::with_capacity(self.content.len() + content.len());
            combined.push_str(&self.content);
            combined.push_str(content);
            let atlas = GlyphAtlas::bake(font, self.font_size, &combined);
            let texture = upload_atlas(device.as_ref(), &atlas)?;
            if let Err(err) = pipeline
                .flavor_mut()
                .set_atlas(device.as_ref(), self.handle, texture)
            {
                release_texture(device.as_ref(), texture);
                return Err(err);
            }
            release_texture(device.as_ref(), self.atlas_texture);
            self.atlas = atlas;
            self.atlas_texture = texture;
        }
        self.upload_geometry(pipeline, font, content)
    }

    /// Changes the text color.
    pub fn set_color(&self, pipeline: &mut Pipeline<TextFlavor>, color: LinearRgba) {
        pipeline.flavor_mut().set_color(self.handle, color);
    }

    /// Destroys the text's GPU state and unregisters it from the pipeline.
    pub fn destroy(self, pipeline: &mut Pipeline<TextFlavor>) {
        let device = pipeline.device().clone();
        if let Some(mesh) = pipeline
            .flavor_mut()
            .unregister(device.as_ref(), self.handle)
        {
            mesh.destroy(device.as_ref());
        }
        release_sampler(device.as_ref(), self.sampler);
        release_texture(device.as_ref(), self.atlas_texture);
    }

    fn upload_geometry(
        &mut self,
        pipeline: &mut Pipeline<TextFlavor>,
        font: &dyn Font,
        content: &str,
    ) -> Result<(), DeviceError> {
        let device = pipeline.device().clone();
        let geometry = layout_text(font, &self.atlas, content, self.font_size, self.align);

        let mesh = if geometry.is_empty() {
            None
        } else {
            Some(Mesh::upload(
                device.as_ref(),
                "text mesh",
                bytemuck::cast_slice(&geometry.vertices),
                &geometry.indices,
            )?)
        };

        let previous = pipeline.flavor_mut().replace_mesh(self.handle, mesh);
        if let Some(old) = previous {
            old.destroy(device.as_ref());
        }
        self.geometry = geometry;
        self.content = content.to_string();
        Ok(())
    }
}

fn upload_atlas(device: &dyn RenderDevice, atlas: &GlyphAtlas) -> Result<TextureId, DeviceError> {
    let size = Extent2D::new(atlas.dimension(), atlas.dimension());
    let texture = device.create_texture(&TextureDescriptor {
        label: Some("text atlas"),
        size,
        format: TextureFormat::R8Unorm,
        usage: TextureUsage::SAMPLED | TextureUsage::COPY_DST,
    })?;
    if let Err(err) = device.write_texture(
        texture,
        atlas.pixels(),
        atlas.dimension(),
        Origin2D::ZERO,
        size,
    ) {
        release_texture(device, texture);
        return Err(err);
    }
    Ok(texture)
}

fn release_texture(device: &dyn RenderDevice, texture: TextureId) {
    if let Err(e) = device.destroy_texture(texture) {
        log::warn!("Text: failed to destroy atlas texture: {e:?}");
    }
}

fn release_sampler(device: &dyn RenderDevice, sampler: SamplerId) {
    if let Err(e) = device.destroy_sampler(sampler) {
        log::warn!("Text: failed to destroy sampler: {e:?}");
    }
}

/// The vertex layout of text meshes ([`TextVertex`]).
pub fn vertex_layout() -> crate::gpu::VertexLayout {
    use crate::gpu::{VertexAttribute, VertexFormat};
    crate::gpu::VertexLayout {
        stride: std::mem::size_of::<TextVertex>() as u32,
        attributes: vec![
            VertexAttribute {
                shader_location: 0,
                format: VertexFormat::Float32x2,
                offset: 0,
            },
            VertexAttribute {
                shader_location: 1,
                format: VertexFormat::Float32x2,
                offset: std::mem::size_of::<Vec2>() as u32,
            },
        ],
    }
}
