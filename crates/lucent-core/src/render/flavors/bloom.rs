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

//! Bloom bright-pass post effect.

use super::PostSurface;
use crate::gpu::{DepthState, DeviceError, PipelineId, PipelineState, RenderDevice, UniformRing};
use crate::math::{Extent2D, Mat4};
use crate::render::pipeline::Flavor;
use bytemuck::{Pod, Zeroable};

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
struct BloomUniforms {
    threshold: f32,
    intensity: f32,
    _pad: [f32; 2],
}

/// Tunable bloom parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BloomSettings {
    /// Luminance below this contributes nothing.
    pub threshold: f32,
    /// Multiplier over the surviving luminance.
    pub intensity: f32,
}

impl Default for BloomSettings {
    fn default() -> Self {
        Self {
            threshold: 1.0,
            intensity: 0.8,
        }
    }
}

/// Extracts bright regions of a source texture onto a full-surface quad.
#[derive(Debug)]
pub struct BloomFlavor {
    ring: UniformRing,
    /// Current parameters, uploaded on every draw.
    pub settings: BloomSettings,
}

impl BloomFlavor {
    /// Creates the flavor's per-frame uniform storage on `device`.
    pub fn new(device: &dyn RenderDevice, settings: BloomSettings) -> Result<Self, DeviceError> {
        Ok(Self {
            ring: UniformRing::new(
                device,
                0,
                std::mem::size_of::<BloomUniforms>() as u64,
                &[],
                "bloom uniforms",
            )?,
            settings,
        })
    }

    /// The pipeline state for a post pass: no depth interaction at all.
    pub fn pipeline_state() -> PipelineState {
        PipelineState {
            cull_mode: None,
            depth: DepthState {
                test_enabled: false,
                write_enabled: false,
                ..DepthState::default()
            },
            ..PipelineState::default()
        }
    }
}

impl Flavor for BloomFlavor {
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
        let uniforms = BloomUniforms {
            threshold: self.settings.threshold,
            intensity: self.settings.intensity,
            _pad: [0.0; 2],
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
        _size: Extent2D,
        frame_count: usize,
    ) -> Result<(), DeviceError> {
        self.ring.resize(device, frame_count, &[])
    }

    fn on_destroy(&mut self, device: &dyn RenderDevice) {
        self.ring.destroy(device);
    }
}
