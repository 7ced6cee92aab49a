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

//! Text rendering.
//!
//! Unlike the other flavors, text carries per-*instance* GPU state: each
//! live [`Text`](crate::text::Text) registers an instance (atlas binding +
//! uniform ring + mesh) in its pipeline's flavor. Keeping the instance
//! table inside the flavor lets one `resize` fix up every live text's
//! bindings in a single pass when the frames-in-flight count changes.

use crate::gpu::{
    BindingEntry, BindingResource, DeviceError, Mesh, PipelineId, RenderDevice, SamplerId,
    TextureId, UniformRing,
};
use crate::math::{Extent2D, LinearRgba, Mat4};
use crate::render::pipeline::Flavor;
use bytemuck::{Pod, Zeroable};

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
struct TextUniforms {
    mvp: Mat4,
    color: LinearRgba,
}

/// The renderer payload of a text entity: an index into the flavor's
/// instance table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextHandle(pub(crate) usize);

#[derive(Debug)]
struct TextInstance {
    ring: UniformRing,
    atlas_texture: TextureId,
    atlas_sampler: SamplerId,
    /// `None` while the text is empty; drawing it renders nothing.
    mesh: Option<Mesh>,
    color: LinearRgba,
}

fn atlas_entries(texture: TextureId, sampler: SamplerId) -> [BindingEntry; 2] {
    [
        BindingEntry {
            binding: 1,
            resource: BindingResource::Texture(texture),
        },
        BindingEntry {
            binding: 2,
            resource: BindingResource::Sampler(sampler),
        },
    ]
}

/// Draws glyph-atlas text meshes.
#[derive(Debug, Default)]
pub struct TextFlavor {
    instances: Vec<Option<TextInstance>>,
}

impl TextFlavor {
    /// Creates an empty flavor; texts register themselves on creation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live text instances.
    pub fn live_count(&self) -> usize {
        self.instances.iter().filter(|slot| slot.is_some()).count()
    }

    /// Registers a new text instance and builds its per-frame GPU state.
    pub(crate) fn register(
        &mut self,
        device: &dyn RenderDevice,
        atlas_texture: TextureId,
        atlas_sampler: SamplerId,
        color: LinearRgba,
    ) -> Result<TextHandle, DeviceError> {
        let ring = UniformRing::new(
            device,
            0,
            std::mem::size_of::<TextUniforms>() as u64,
            &atlas_entries(atlas_texture, atlas_sampler),
            "text uniforms",
        )?;
        let instance = TextInstance {
            ring,
            atlas_texture,
            atlas_sampler,
            mesh: None,
            color,
        };

        let slot = self.instances.iter().position(|entry| entry.is_none());
        match slot {
            Some(index) => {
                self.instances[index] = Some(instance);
                Ok(TextHandle(index))
            }
            None => {
                self.instances.push(Some(instance));
                Ok(TextHandle(self.instances.len() - 1))
            }
        }
    }

    /// Swaps in a new mesh for an instance, returning the previous one so
    /// the caller can destroy it after the replacement is in place.
    pub(crate) fn replace_mesh(&mut self, handle: TextHandle, mesh: Option<Mesh>) -> Option<Mesh> {
        match self.instances.get_mut(handle.0) {
            Some(Some(instance)) => std::mem::replace(&mut instance.mesh, mesh),
            _ => None,
        }
    }

    /// Points an instance at a new atlas texture, rebuilding its bindings
    /// (new bindings are built before the old ones are destroyed).
    pub(crate) fn set_atlas(
        &mut self,
        device: &dyn RenderDevice,
        handle: TextHandle,
        texture: TextureId,
    ) -> Result<(), DeviceError> {
        let frame_count = device.frame_count();
        let Some(Some(instance)) = self.instances.get_mut(handle.0) else {
            return Err(DeviceError::InvalidHandle { what: "text" });
        };
        let entries = atlas_entries(texture, instance.atlas_sampler);
        instance.ring.resize(device, frame_count, &entries)?;
        instance.atlas_texture = texture;
        Ok(())
    }

    /// The instance's current atlas texture.
    pub(crate) fn atlas_texture(&self, handle: TextHandle) -> Option<TextureId> {
        match self.instances.get(handle.0) {
            Some(Some(instance)) => Some(instance.atlas_texture),
            _ => None,
        }
    }

    /// Sets an instance's color.
    pub fn set_color(&mut self, handle: TextHandle, color: LinearRgba) {
        if let Some(Some(instance)) = self.instances.get_mut(handle.0) {
            instance.color = color;
        }
    }

    /// Removes an instance, destroying its ring. Returns the instance's
    /// mesh (if any) for the owning text to destroy.
    pub(crate) fn unregister(
        &mut self,
        device: &dyn RenderDevice,
        handle: TextHandle,
    ) -> Option<Mesh> {
        let slot = self.instances.get_mut(handle.0)?;
        let mut instance = slot.take()?;
        instance.ring.destroy(device);
        instance.mesh
    }
}

impl Flavor for TextFlavor {
    type Payload = TextHandle;

    fn on_bind(&mut self, _device: &dyn RenderDevice) -> Result<(), DeviceError> {
        for instance in self.instances.iter_mut().flatten() {
            instance.ring.advance();
        }
        Ok(())
    }

    fn draw(
        &mut self,
        device: &dyn RenderDevice,
        pipeline: PipelineId,
        payload: &TextHandle,
        model: &Mat4,
        view_projection: &Mat4,
    ) -> u32 {
        let Some(Some(instance)) = self.instances.get_mut(payload.0) else {
            return 0;
        };
        // An empty text has no mesh and renders nothing.
        let Some(mesh) = instance.mesh else {
            return 0;
        };
        let uniforms = TextUniforms {
            mvp: *view_projection * *model,
            color: instance.color,
        };
        if instance
            .ring
            .write(device, bytemuck::bytes_of(&uniforms))
            .is_err()
        {
            return 0;
        }
        if device
            .bind_uniforms(pipeline, 0, instance.ring.current_binding())
            .is_err()
        {
            return 0;
        }
        device.draw_mesh(pipeline, &mesh)
    }

    fn on_resize(
        &mut self,
        device: &dyn RenderDevice,
        _size: Extent2D,
        frame_count: usize,
    ) -> Result<(), DeviceError> {
        for instance in self.instances.iter_mut().flatten() {
            let entries = atlas_entries(instance.atlas_texture, instance.atlas_sampler);
            instance.ring.resize(device, frame_count, &entries)?;
        }
        Ok(())
    }

    fn on_destroy(&mut self, device: &dyn RenderDevice) {
        for slot in &mut self.instances {
            if let Some(mut instance) = slot.take() {
                log::warn!("TextFlavor: destroying pipeline with a live text instance");
                instance.ring.destroy(device);
                if let Some(mesh) = instance.mesh {
                    mesh.destroy(device);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gpu::testing::MockDevice;
    use crate::gpu::BufferId;

    #[test]
    fn test_uniform_block_layout() {
        assert_eq!(std::mem::size_of::<TextUniforms>(), 80);
        assert_eq!(std::mem::size_of::<TextUniforms>() % 16, 0);
    }

    fn mesh(count: u32) -> Mesh {
        Mesh {
            vertex_buffer: BufferId(700),
            index_buffer: BufferId(701),
            index_count: count,
        }
    }

    #[test]
    fn test_empty_text_draws_nothing() {
        let device = MockDevice::new(2);
        let mut flavor = TextFlavor::new();
        let handle = flavor
            .register(
                &device,
                TextureId(1),
                SamplerId(2),
                LinearRgba::WHITE,
            )
            .unwrap();

        let drawn = flavor.draw(
            &device,
            PipelineId(1),
            &handle,
            &Mat4::IDENTITY,
            &Mat4::IDENTITY,
        );
        assert_eq!(drawn, 0);
        assert_eq!(device.stats().draw_calls, 0);
    }

    #[test]
    fn test_mesh_replacement_returns_previous() {
        let device = MockDevice::new(2);
        let mut flavor = TextFlavor::new();
        let handle = flavor
            .register(&device, TextureId(1), SamplerId(2), LinearRgba::WHITE)
            .unwrap();

        assert!(flavor.replace_mesh(handle, Some(mesh(6))).is_none());
        let old = flavor.replace_mesh(handle, Some(mesh(12)));
        assert_eq!(old.unwrap().index_count, 6);

        let drawn = flavor.draw(
            &device,
            PipelineId(1),
            &handle,
            &Mat4::IDENTITY,
            &Mat4::IDENTITY,
        );
        assert_eq!(drawn, 12);
    }

    #[test]
    fn test_resize_fixes_up_every_live_instance() {
        let device = MockDevice::new(2);
        let mut flavor = TextFlavor::new();
        let a = flavor
            .register(&device, TextureId(1), SamplerId(2), LinearRgba::WHITE)
            .unwrap();
        let b = flavor
            .register(&device, TextureId(3), SamplerId(4), LinearRgba::WHITE)
            .unwrap();
        let _ = (a, b);

        device.set_frame_count(3).unwrap();
        device.clear_ops();
        flavor
            .on_resize(&device, Extent2D::new(800, 600), 3)
            .unwrap();

        // Two instances, each rebuilt to three slots (buffer + binding).
        let creates = device
            .ops()
            .iter()
            .filter(|op| op.starts_with("create_"))
            .count();
        assert_eq!(creates, 2 * 3 * 2);
    }

    #[test]
    fn test_unregister_reuses_slots() {
        let device = MockDevice::new(2);
        let mut flavor = TextFlavor::new();
        let a = flavor
            .register(&device, TextureId(1), SamplerId(2), LinearRgba::WHITE)
            .unwrap();
        flavor.replace_mesh(a, Some(mesh(6)));
        let returned = flavor.unregister(&device, a);
        assert_eq!(returned.unwrap().index_count, 6);
        assert_eq!(flavor.live_count(), 0);

        let b = flavor
            .register(&device, TextureId(5), SamplerId(6), LinearRgba::WHITE)
            .unwrap();
        assert_eq!(a.0, b.0, "freed slot should be reused");
    }
}
