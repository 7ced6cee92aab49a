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

//! Diffuse-lit rendering with one directional light.

use crate::gpu::{DeviceError, Mesh, PipelineId, RenderDevice, UniformRing};
use crate::math::{Extent2D, LinearRgba, Mat4, Vec3, Vec4};
use crate::render::pipeline::Flavor;
use bytemuck::{Pod, Zeroable};

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
struct DiffuseUniforms {
    /// Model matrix, kept separate so the shader can transform normals.
    model: Mat4,
    view_projection: Mat4,
    /// Direction towards the light, `w` unused.
    light_direction: Vec4,
    light_color: LinearRgba,
    base_color: LinearRgba,
}

/// The directional light shared by all entities of a diffuse pipeline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiffuseLight {
    /// Direction towards the light (normalized at upload).
    pub direction: Vec3,
    /// Light color and intensity.
    pub color: LinearRgba,
}

impl Default for DiffuseLight {
    fn default() -> Self {
        Self {
            direction: Vec3::new(0.3, 1.0, 0.2),
            color: LinearRgba::WHITE,
        }
    }
}

/// A diffuse-lit drawable.
#[derive(Debug, Clone, Copy)]
pub struct DiffuseSurface {
    /// The mesh to draw.
    pub mesh: Mesh,
    /// Material base color.
    pub base_color: LinearRgba,
}

/// Draws meshes with Lambertian shading under one directional light.
#[derive(Debug)]
pub struct DiffuseFlavor {
    ring: UniformRing,
    light: DiffuseLight,
}

impl DiffuseFlavor {
    /// Creates the flavor's per-frame uniform storage on `device`.
    pub fn new(device: &dyn RenderDevice, light: DiffuseLight) -> Result<Self, DeviceError> {
        Ok(Self {
            ring: UniformRing::new(
                device,
                0,
                std::mem::size_of::<DiffuseUniforms>() as u64,
                &[],
                "diffuse uniforms",
            )?,
            light,
        })
    }

    /// The current light parameters.
    pub fn light(&self) -> DiffuseLight {
        self.light
    }

    /// Replaces the light parameters; takes effect from the next draw.
    pub fn set_light(&mut self, light: DiffuseLight) {
        self.light = light;
    }
}

impl Flavor for DiffuseFlavor {
    type Payload = DiffuseSurface;

    fn on_bind(&mut self, _device: &dyn RenderDevice) -> Result<(), DeviceError> {
        self.ring.advance();
        Ok(())
    }

    fn draw(
        &mut self,
        device: &dyn RenderDevice,
        pipeline: PipelineId,
        payload: &DiffuseSurface,
        model: &Mat4,
        view_projection: &Mat4,
    ) -> u32 {
        let uniforms = DiffuseUniforms {
            model: *model,
            view_projection: *view_projection,
            light_direction: Vec4::from_vec3(self.light.direction.normalize(), 0.0),
            light_color: self.light.color,
            base_color: payload.base_color,
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
        // Two matrices plus three vec4s.
        assert_eq!(std::mem::size_of::<DiffuseUniforms>(), 176);
        assert_eq!(std::mem::size_of::<DiffuseUniforms>() % 16, 0);
    }

    #[test]
    fn test_default_light_points_mostly_up() {
        let light = DiffuseLight::default();
        assert!(light.direction.y > light.direction.x.abs());
    }
}
