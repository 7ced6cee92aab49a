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

//! Ray-traced flat-color rendering.
//!
//! The only flavor whose shader set uses the ray-tracing stages
//! (generation/miss/closest-hit). Creating those shaders on the immediate
//! backend fails with an unsupported-stage error at creation time, so a
//! ray-traced pipeline can only ever exist on the explicit backend.

use crate::gpu::{DeviceError, Mesh, PipelineId, RenderDevice, UniformRing};
use crate::math::{Extent2D, LinearRgba, Mat4};
use crate::render::pipeline::Flavor;
use bytemuck::{Pod, Zeroable};

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
struct RayUniforms {
    /// World-to-clip of the geometry fed to the acceleration structure.
    mvp: Mat4,
    tint: LinearRgba,
}

/// A ray-traced drawable.
#[derive(Debug, Clone, Copy)]
pub struct RaySurface {
    /// The mesh providing the traced geometry.
    pub mesh: Mesh,
    /// Surface tint.
    pub tint: LinearRgba,
}

/// Draws flat-colored geometry through the ray-tracing stages.
#[derive(Debug)]
pub struct RaytraceFlavor {
    ring: UniformRing,
}

impl RaytraceFlavor {
    /// Creates the flavor's per-frame uniform storage on `device`.
    pub fn new(device: &dyn RenderDevice) -> Result<Self, DeviceError> {
        Ok(Self {
            ring: UniformRing::new(
                device,
                0,
                std::mem::size_of::<RayUniforms>() as u64,
                &[],
                "raytrace uniforms",
            )?,
        })
    }
}

impl Flavor for RaytraceFlavor {
    type Payload = RaySurface;

    fn on_bind(&mut self, _device: &dyn RenderDevice) -> Result<(), DeviceError> {
        self.ring.advance();
        Ok(())
    }

    fn draw(
        &mut self,
        device: &dyn RenderDevice,
        pipeline: PipelineId,
        payload: &RaySurface,
        model: &Mat4,
        view_projection: &Mat4,
    ) -> u32 {
        let uniforms = RayUniforms {
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
        assert_eq!(std::mem::size_of::<RayUniforms>(), 80);
        assert_eq!(std::mem::size_of::<RayUniforms>() % 16, 0);
    }
}
