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

//! Textured-sprite rendering.

use crate::gpu::{
    BindingDescriptor, BindingEntry, BindingId, BindingResource, DeviceError, Mesh, PipelineId,
    RenderDevice, SamplerId, TextureId, UniformRing,
};
use crate::math::{Extent2D, LinearRgba, Mat4};
use crate::render::pipeline::Flavor;
use bytemuck::{Pod, Zeroable};

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
struct SpriteUniforms {
    mvp: Mat4,
    tint: LinearRgba,
}

/// A textured quad entity: a mesh plus the binding of its texture and
/// sampler.
#[derive(Debug, Clone, Copy)]
pub struct Sprite {
    /// The quad mesh.
    pub mesh: Mesh,
    /// Per-sprite tint, multiplied over the sampled texel.
    pub tint: LinearRgba,
    binding: BindingId,
}

impl Sprite {
    /// Builds the sprite's texture binding on `device`.
    pub fn new(
        device: &dyn RenderDevice,
        mesh: Mesh,
        texture: TextureId,
        sampler: SamplerId,
        tint: LinearRgba,
    ) -> Result<Self, DeviceError> {
        let binding = device.create_binding(&BindingDescriptor {
            label: Some("sprite texture"),
            entries: &[
                BindingEntry {
                    binding: 0,
                    resource: BindingResource::Texture(texture),
                },
                BindingEntry {
                    binding: 1,
                    resource: BindingResource::Sampler(sampler),
                },
            ],
        })?;
        Ok(Self {
            mesh,
            tint,
            binding,
        })
    }

    /// Releases the texture binding. The texture, sampler and mesh stay
    /// with their owners.
    pub fn destroy(self, device: &dyn RenderDevice) -> Result<(), DeviceError> {
        device.destroy_binding(self.binding)
    }
}

/// Draws textured quads with a per-sprite tint.
#[derive(Debug)]
pub struct SpriteFlavor {
    ring: UniformRing,
}

impl SpriteFlavor {
    /// Creates the flavor's per-frame uniform storage on `device`.
    pub fn new(device: &dyn RenderDevice) -> Result<Self, DeviceError> {
        Ok(Self {
            ring: UniformRing::new(
                device,
                0,
                std::mem::size_of::<SpriteUniforms>() as u64,
                &[],
                "sprite uniforms",
            )?,
        })
    }
}

impl Flavor for SpriteFlavor {
    type Payload = Sprite;

    fn on_bind(&mut self, _device: &dyn RenderDevice) -> Result<(), DeviceError> {
        self.ring.advance();
        Ok(())
    }

    fn draw(
        &mut self,
        device: &dyn RenderDevice,
        pipeline: PipelineId,
        payload: &Sprite,
        model: &Mat4,
        view_projection: &Mat4,
    ) -> u32 {
        let uniforms = SpriteUniforms {
            mvp: *view_projection * *model,
            tint: payload.tint,
        };
        if self
            .ring
            .write(device, bytemuck::bytes_of(&uniforms))
            .is_err()
        {
            return 0;
        }
        if device
            .bind_uniforms(pipeline, 0, self.ring.current_binding())
            .is_err()
        {
            return 0;
        }
        if device.bind_uniforms(pipeline, 1, payload.binding).is_err() {
            return 0;
        }
        device.draw_mesh(pipeline, &payload.mesh)
    }

    fn on_resize(
        &mut self,
        device: &dyn RenderDevice,
        _size: Extent2D,
        frame_count: usize,
    ) -> Result<(), DeviceError> {
        self.ring.resize(device, frame_count, &[])
    }

    fn on_destroy(&mut self, device: &dyn RenderDevice) {
        self.ring.destroy(device);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_block_layout() {
        assert_eq!(std::mem::size_of::<SpriteUniforms>(), 80);
        assert_eq!(std::mem::size_of::<SpriteUniforms>() % 16, 0);
    }
}
