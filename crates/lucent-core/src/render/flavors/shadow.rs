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

//! Depth-only shadow-map rendering.

use crate::gpu::{
    ColorWrites, CullMode, DepthBias, DepthState, DeviceError, Mesh, PipelineId, PipelineState,
    RenderDevice, UniformRing,
};
use crate::math::{Extent2D, Mat4};
use crate::render::pipeline::Flavor;
use bytemuck::{Pod, Zeroable};

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
struct ShadowUniforms {
    /// `light_view_projection * model`.
    light_mvp: Mat4,
}

/// A shadow-casting drawable.
#[derive(Debug, Clone, Copy)]
pub struct ShadowCaster {
    /// The mesh to render into the shadow map.
    pub mesh: Mesh,
}

/// Renders casters into a shadow map from the light's point of view.
///
/// The camera passed to the render pass is the *light's* camera; the
/// flavor only forwards the combined matrix per caster.
#[derive(Debug)]
pub struct ShadowFlavor {
    ring: UniformRing,
}

impl ShadowFlavor {
    /// Creates the flavor's per-frame uniform storage on `device`.
    pub fn new(device: &dyn RenderDevice) -> Result<Self, DeviceError> {
        Ok(Self {
            ring: UniformRing::new(
                device,
                0,
                std::mem::size_of::<ShadowUniforms>() as u64,
                &[],
                "shadow uniforms",
            )?,
        })
    }

    /// The pipeline state of a shadow pass: depth-only (no color writes),
    /// front-face culling and a slope-scaled bias against acne.
    pub fn pipeline_state() -> PipelineState {
        PipelineState {
            cull_mode: Some(CullMode::Front),
            color_writes: ColorWrites::EMPTY,
            depth: DepthState {
                bias: DepthBias {
                    constant: 1.25,
                    slope_scale: 1.75,
                    clamp: 0.0,
                },
                ..DepthState::default()
            },
            ..PipelineState::default()
        }
    }
}

impl Flavor for ShadowFlavor {
    type Payload = ShadowCaster;

    fn on_bind(&mut self, _device: &dyn RenderDevice) -> Result<(), DeviceError> {
        self.ring.advance();
        Ok(())
    }

    fn draw(
        &mut self,
        device: &dyn RenderDevice,
        pipeline: PipelineId,
        payload: &ShadowCaster,
        model: &Mat4,
        view_projection: &Mat4,
    ) -> u32 {
        let uniforms = ShadowUniforms {
            light_mvp: *view_projection * *model,
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
        assert_eq!(std::mem::size_of::<ShadowUniforms>(), 64);
    }

    #[test]
    fn test_shadow_state_writes_no_color() {
        let state = ShadowFlavor::pipeline_state();
        assert_eq!(state.color_writes, ColorWrites::EMPTY);
        assert_eq!(state.cull_mode, Some(CullMode::Front));
        assert!(state.depth.bias.is_enabled());
    }
}
