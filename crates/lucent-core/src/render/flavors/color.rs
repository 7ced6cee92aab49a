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

//! Flat-color rendering.

use crate::gpu::{DeviceError, Mesh, PipelineId, RenderDevice, UniformRing};
use crate::math::{Extent2D, LinearRgba, Mat4};
use crate::render::pipeline::Flavor;
use bytemuck::{Pod, Zeroable};

/// Shader-side uniform block of the color flavor.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
struct ColorUniforms {
    /// `view_projection * model`.
    mvp: Mat4,
    /// Flat surface color.
    color: LinearRgba,
}

/// A flat-colored drawable.
#[derive(Debug, Clone, Copy)]
pub struct ColorSurface {
    /// The mesh to draw.
    pub mesh: Mesh,
    /// The surface color.
    pub color: LinearRgba,
}

/// Draws meshes in a single flat color per entity.
#[derive(Debug)]
pub struct ColorFlavor {
    ring: UniformRing,
}

impl ColorFlavor {
    /// Creates the flavor's per-frame uniform storage on `device`.
    pub fn new(device: &dyn RenderDevice) -> Result<Self, DeviceError> {
        Ok(Self {
            ring: UniformRing::new(
                device,
                0,
                std::mem::size_of::<ColorUniforms>() as u64,
                &[],
                "color uniforms",
            )?,
        })
    }
}

impl Flavor for ColorFlavor {
    type Payload = ColorSurface;

    fn on_bind(&mut self, _device: &dyn RenderDevice) -> Result<(), DeviceError> {
        self.ring.advance();
        Ok(())
    }

    fn draw(
        &mut self,
        device: &dyn RenderDevice,
        pipeline: PipelineId,
        payload: &ColorSurface,
        model: &Mat4,
        view_projection: &Mat4,
    ) -> u32 {
        let uniforms = ColorUniforms {
            mvp: *view_projection * *model,
            color: payload.color,
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
    use crate::gpu::testing::MockDevice;
    use crate::gpu::BufferId;

    #[test]
    fn test_uniform_block_layout() {
        // Mat4 + vec4, 16-byte aligned.
        assert_eq!(std::mem::size_of::<ColorUniforms>(), 80);
        assert_eq!(std::mem::size_of::<ColorUniforms>() % 16, 0);
    }

    #[test]
    fn test_draw_writes_then_binds_then_draws() {
        let device = MockDevice::new(2);
        let mut flavor = ColorFlavor::new(&device).unwrap();
        device.clear_ops();

        let surface = ColorSurface {
            mesh: Mesh {
                vertex_buffer: BufferId(10),
                index_buffer: BufferId(11),
                index_count: 36,
            },
            color: LinearRgba::WHITE,
        };
        let drawn = flavor.draw(
            &device,
            PipelineId(1),
            &surface,
            &Mat4::IDENTITY,
            &Mat4::IDENTITY,
        );
        assert_eq!(drawn, 36);

        let ops = device.ops();
        assert!(ops[0].starts_with("write_buffer"));
        assert!(ops[1].starts_with("bind_uniforms"));
        assert!(ops[2].starts_with("draw_mesh"));
    }

    #[test]
    fn test_resize_rebuilds_ring_to_new_frame_count() {
        let device = MockDevice::new(2);
        let mut flavor = ColorFlavor::new(&device).unwrap();
        device.set_frame_count(3).unwrap();
        flavor
            .on_resize(&device, Extent2D::new(800, 600), 3)
            .unwrap();
        assert_eq!(flavor.ring.slot_count(), 3);
    }
}
