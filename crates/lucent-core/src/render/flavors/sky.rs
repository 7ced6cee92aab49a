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

//! Gradient-sky rendering.

use crate::gpu::{
    CompareFunction, DepthState, DeviceError, Mesh, PipelineId, PipelineState, RenderDevice,
    UniformRing,
};
use crate::math::{Extent2D, LinearRgba, Mat4};
use crate::render::pipeline::Flavor;
use bytemuck::{Pod, Zeroable};

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
struct SkyUniforms {
    mvp: Mat4,
    zenith_color: LinearRgba,
    horizon_color: LinearRgba,
}

/// The sky dome payload.
#[derive(Debug, Clone, Copy)]
pub struct SkyDome {
    /// The dome (or full-screen) mesh.
    pub mesh: Mesh,
}

/// Draws a vertical gradient sky between a zenith and a horizon color.
#[derive(Debug)]
pub struct SkyFlavor {
    ring: UniformRing,
    /// Color straight up.
    pub zenith_color: LinearRgba,
    /// Color at the horizon.
    pub horizon_color: LinearRgba,
}

impl SkyFlavor {
    /// Creates the flavor's per-frame uniform storage on `device`.
    pub fn new(
        device: &dyn RenderDevice,
        zenith_color: LinearRgba,
        horizon_color: LinearRgba,
    ) -> Result<Self, DeviceError> {
        Ok(Self {
            ring: UniformRing::new(
                device,
                0,
                std::mem::size_of::<SkyUniforms>() as u64,
                &[],
                "sky uniforms",
            )?,
            zenith_color,
            horizon_color,
        })
    }

    /// The pipeline state a sky pass wants: drawn at the far plane behind
    /// everything, without writing depth and without face culling.
    pub fn pipeline_state() -> PipelineState {
        PipelineState {
            cull_mode: None,
            depth: DepthState {
                test_enabled: true,
                write_enabled: false,
                compare: CompareFunction::LessEqual,
                ..DepthState::default()
            },
            ..PipelineState::default()
        }
    }
}

impl Flavor for SkyFlavor {
    type Payload = SkyDome;

    fn on_bind(&mut self, _device: &dyn RenderDevice) -> Result<(), DeviceError> {
        self.ring.advance();
        Ok(())
    }

    fn draw(
        &mut self,
        device: &dyn RenderDevice,
        pipeline: PipelineId,
        payload: &SkyDome,
        model: &Mat4,
        view_projection: &Mat4,
    ) -> u32 {
        let uniforms = SkyUniforms {
            mvp: *view_projection * *model,
            zenith_color: self.zenith_color,
            horizon_color: self.horizon_color,
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
        assert_eq!(std::mem::size_of::<SkyUniforms>(), 96);
        assert_eq!(std::mem::size_of::<SkyUniforms>() % 16, 0);
    }

    #[test]
    fn test_sky_state_does_not_write_depth() {
        let state = SkyFlavor::pipeline_state();
        assert!(!state.depth.write_enabled);
        assert_eq!(state.depth.compare, CompareFunction::LessEqual);
        assert_eq!(state.cull_mode, None);
    }
}
