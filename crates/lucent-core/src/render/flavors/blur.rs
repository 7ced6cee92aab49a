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

//! Separable gaussian-blur post effect.

use super::PostSurface;
use crate::gpu::{DeviceError, PipelineId, RenderDevice, UniformRing};
use crate::math::{Extent2D, Mat4, Vec2};
use crate::render::pipeline::Flavor;
use bytemuck::{Pod, Zeroable};

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
struct BlurUniforms {
    /// The pass direction: `(1, 0)` horizontal, `(0, 1)` vertical.
    direction: Vec2,
    /// Reciprocal surface size, kept in step with resizes.
    texel_size: Vec2,
    sigma: f32,
    _pad: [f32; 3],
}

/// Tunable blur parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlurSettings {
    /// The pass direction: `(1, 0)` horizontal, `(0, 1)` vertical.
    pub direction: Vec2,
    /// Gaussian standard deviation in texels.
    pub sigma: f32,
}

impl Default for BlurSettings {
    fn default() -> Self {
        Self {
            direction: Vec2::new(1.0, 0.0),
            sigma: 2.0,
        }
    }
}

/// One direction of a separable gaussian blur over a source texture.
#[derive(Debug)]
pub struct BlurFlavor {
    ring: UniformRing,
    /// Current parameters, uploaded on every draw.
    pub settings: BlurSettings,
    texel_size: Vec2,
}

impl BlurFlavor {
    /// Creates the flavor's per-frame uniform storage on `device`,
    /// initialized for a surface of `size` pixels.
    pub fn new(
        device: &dyn RenderDevice,
        settings: BlurSettings,
        size: Extent2D,
    ) -> Result<Self, DeviceError> {
        Ok(Self {
            ring: UniformRing::new(
                device,
                0,
                std::mem::size_of::<BlurUniforms>() as u64,
                &[],
                "blur uniforms",
            )?,
            settings,
            texel_size: reciprocal(size),
        })
    }
}

fn reciprocal(size: Extent2D) -> Vec2 {
    if size.is_empty() {
        Vec2::ZERO
    } else {
        Vec2::new(1.0 / size.width as f32, 1.0 / size.height as f32)
    }
}

impl Flavor for BlurFlavor {
    type Payload = PostSurface;

    fn on_bind(&mut self, _device: &dyn RenderDevice) -> Result<(), DeviceError> {
        self.ring.advance();
        Ok(())
    }

    fn draw(
        &mut self,
        device: &dyn RenderDevice,
        pipeline: PipelineId,
        payload: &PostSurface,
        _model: &Mat4,
        _view_projection: &Mat4,
    ) -> u32 {
        let uniforms = BlurUniforms {
            direction: self.settings.direction,
            texel_size: self.texel_size,
            sigma: self.settings.sigma,
            _pad: [0.0; 3],
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
        if device.bind_uniforms(pipeline, 1, payload.source).is_err() {
            return 0;
        }
        device.draw_mesh(pipeline, &payload.mesh)
    }

    fn on_resize(
        &mut self,
        device: &dyn RenderDevice,
        size: Extent2D,
        frame_count: usize,
    ) -> Result<(), DeviceError> {
        self.texel_size = reciprocal(size);
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

    #[test]
    fn test_uniform_block_layout() {
        assert_eq!(std::mem::size_of::<BlurUniforms>(), 32);
        assert_eq!(std::mem::size_of::<BlurUniforms>() % 16, 0);
    }

    #[test]
    fn test_resize_updates_texel_size() {
        let device = MockDevice::new(2);
        let mut flavor =
            BlurFlavor::new(&device, BlurSettings::default(), Extent2D::new(100, 50)).unwrap();
        assert_eq!(flavor.texel_size, Vec2::new(0.01, 0.02));

        flavor
            .on_resize(&device, Extent2D::new(200, 100), 2)
            .unwrap();
        assert_eq!(flavor.texel_size, Vec2::new(0.005, 0.01));
    }
}
