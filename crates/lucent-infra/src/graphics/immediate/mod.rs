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

//! The immediate global-state-machine device.
//!
//! One program and one fixed-function state are bound at a time; binding a
//! pipeline diffs its translated state against the machine's bound state
//! and applies only what changed (redundant changes are elided and
//! counted). Draws execute immediately on the calling thread; there is a
//! single frame in flight, so the frames-in-flight count is fixed at 1 and
//! image-count changes are accepted and ignored.

mod conversions;

use conversions::NativeProgramState;

use super::Registry;
use lucent_core::gpu::{
    BackendKind, BindingDescriptor, BindingEntry, BindingId, BindingResource, BufferDescriptor,
    BufferId, DepthConvention, DeviceError, FrameStats, Mesh, PipelineDescriptor, PipelineId,
    RenderDevice, SamplerDescriptor, SamplerId, Scissor, ShaderDescriptor, ShaderId,
    TextureDescriptor, TextureFormat, TextureId, Viewport,
};
use lucent_core::math::{Extent2D, Origin2D};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

#[derive(Debug)]
struct GlShaderRecord {
    shader_type: u32,
    label: String,
}

#[derive(Debug)]
struct ProgramRecord {
    label: String,
    state: NativeProgramState,
}

#[derive(Debug)]
struct BufferRecord {
    size: u64,
    data: Vec<u8>,
}

#[derive(Debug)]
struct TextureRecord {
    size: Extent2D,
    format: TextureFormat,
    data: Vec<u8>,
}

#[derive(Debug)]
struct SamplerRecord;

#[derive(Debug)]
struct BindingRecord {
    entries: Vec<BindingEntry>,
}

/// The machine's currently bound state.
#[derive(Debug, Default)]
struct BoundState {
    program: Option<usize>,
    fixed: Option<NativeProgramState>,
    viewport: Option<Viewport>,
    scissor: Option<Scissor>,
}

#[derive(Debug)]
struct MachineState {
    shaders: Registry<GlShaderRecord>,
    programs: Registry<ProgramRecord>,
    buffers: Registry<BufferRecord>,
    textures: Registry<TextureRecord>,
    samplers: Registry<SamplerRecord>,
    bindings: Registry<BindingRecord>,
    bound: BoundState,
    changes_applied: u64,
    changes_elided: u64,
}

/// The immediate state-machine device.
#[derive(Debug)]
pub struct ImmediateDevice {
    state: Mutex<MachineState>,
    binds: AtomicU64,
    draws: AtomicU64,
    indices: AtomicU64,
    frames: AtomicU64,
}

impl Default for ImmediateDevice {
    fn default() -> Self {
        Self::new()
    }
}

impl ImmediateDevice {
    /// Creates a device with nothing bound.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MachineState {
                shaders: Registry::new(),
                programs: Registry::new(),
                buffers: Registry::new(),
                textures: Registry::new(),
                samplers: Registry::new(),
                bindings: Registry::new(),
                bound: BoundState::default(),
                changes_applied: 0,
                changes_elided: 0,
            }),
            binds: AtomicU64::new(0),
            draws: AtomicU64::new(0),
            indices: AtomicU64::new(0),
            frames: AtomicU64::new(0),
        }
    }

    /// Counters of applied vs. elided bound-state changes, for diagnostics
    /// and tests of the redundant-change elision.
    pub fn state_change_counters(&self) -> (u64, u64) {
        let state = self.lock();
        (state.changes_applied, state.changes_elided)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MachineState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Diffs `next` against the bound `fixed` state, counting applied and
/// elided individual state changes.
fn apply_fixed_state(bound: &mut BoundState, next: &NativeProgramState) -> (u64, u64) {
    let Some(current) = &bound.fixed else {
        bound.fixed = Some(*next);
        // Everything is applied on the first bind.
        return (FIXED_STATE_FIELDS, 0);
    };

    let mut applied = 0u64;
    let mut elided = 0u64;
    let mut track = |changed: bool| {
        if changed {
            applied += 1;
        } else {
            elided += 1;
        }
    };

    track(current.topology != next.topology);
    track(current.polygon_mode != next.polygon_mode);
    track(current.cull_face != next.cull_face);
    track(current.front_face != next.front_face);
    track(current.depth_test != next.depth_test);
    track(current.depth_mask != next.depth_mask);
    track(current.depth_func != next.depth_func);
    track(current.depth_clamp != next.depth_clamp);
    track(current.polygon_offset != next.polygon_offset);
    track(current.blend != next.blend);
    track(
        (
            current.blend_src_rgb,
            current.blend_dst_rgb,
            current.blend_src_alpha,
            current.blend_dst_alpha,
        ) != (
            next.blend_src_rgb,
            next.blend_dst_rgb,
            next.blend_src_alpha,
            next.blend_dst_alpha,
        ),
    );
    track(
        (current.blend_equation_rgb, current.blend_equation_alpha)
            != (next.blend_equation_rgb, next.blend_equation_alpha),
    );
    track(current.blend_color != next.blend_color);
    track(current.color_mask != next.color_mask);
    track(current.line_width != next.line_width);
    track(current.depth_range != next.depth_range);

    bound.fixed = Some(*next);
    (applied, elided)
}

/// Number of individually tracked fixed-state groups.
const FIXED_STATE_FIELDS: u64 = 16;

impl RenderDevice for ImmediateDevice {
    fn kind(&self) -> BackendKind {
        BackendKind::Immediate
    }

    fn depth_convention(&self) -> DepthConvention {
        DepthConvention::NegativeOneToOne
    }

    fn frame_count(&self) -> usize {
        1
    }

    fn set_frame_count(&self, count: usize) -> Result<(), DeviceError> {
        // The state machine renders one frame at a time; the request is
        // accepted and ignored.
        log::debug!("ImmediateDevice: ignoring frames-in-flight request of {count}");
        Ok(())
    }

    fn create_shader(&self, descriptor: &ShaderDescriptor) -> Result<ShaderId, DeviceError> {
        let label = descriptor.label.unwrap_or("unnamed").to_string();
        let shader_type = conversions::shader_type(descriptor.stage)?;
        if descriptor.source.trim().is_empty() {
            return Err(DeviceError::BadShaderCode {
                label,
                details: "empty shader source".to_string(),
            });
        }
        let mut state = self.lock();
        let id = state.shaders.insert(GlShaderRecord { shader_type, label });
        Ok(ShaderId(id))
    }

    fn destroy_shader(&self, id: ShaderId) -> Result<(), DeviceError> {
        let record = self
            .lock()
            .shaders
            .remove(id.0)
            .ok_or(DeviceError::InvalidHandle { what: "shader" })?;
        log::trace!(
            "ImmediateDevice: destroyed shader '{}' (type {:#x})",
            record.label,
            record.shader_type
        );
        Ok(())
    }

    fn create_pipeline(&self, descriptor: &PipelineDescriptor) -> Result<PipelineId, DeviceError> {
        let native = conversions::program_state(descriptor.state)?;
        let mut state = self.lock();
        for shader in descriptor.shaders {
            if state.shaders.get(shader.0).is_none() {
                return Err(DeviceError::InvalidHandle { what: "shader" });
            }
        }
        let id = state.programs.insert(ProgramRecord {
            label: descriptor.label.to_string(),
            state: native,
        });
        Ok(PipelineId(id))
    }

    fn destroy_pipeline(&self, id: PipelineId) -> Result<(), DeviceError> {
        let mut state = self.lock();
        if state.bound.program == Some(id.0) {
            state.bound.program = None;
        }
        let record = state
            .programs
            .remove(id.0)
            .ok_or(DeviceError::InvalidHandle { what: "pipeline" })?;
        log::trace!("ImmediateDevice: destroyed program '{}'", record.label);
        Ok(())
    }

    fn bind_pipeline(
        &self,
        id: PipelineId,
        viewport: Viewport,
        scissor: Scissor,
    ) -> Result<(), DeviceError> {
        let mut state = self.lock();
        let native = state
            .programs
            .get(id.0)
            .ok_or(DeviceError::InvalidHandle { what: "pipeline" })?
            .state;

        if state.bound.program != Some(id.0) {
            state.bound.program = Some(id.0);
            state.changes_applied += 1;
        } else {
            state.changes_elided += 1;
        }

        let (applied, elided) = apply_fixed_state(&mut state.bound, &native);
        state.changes_applied += applied;
        state.changes_elided += elided;

        if state.bound.viewport != Some(viewport) {
            state.bound.viewport = Some(viewport);
            state.changes_applied += 1;
        } else {
            state.changes_elided += 1;
        }
        if state.bound.scissor != Some(scissor) {
            state.bound.scissor = Some(scissor);
            state.changes_applied += 1;
        } else {
            state.changes_elided += 1;
        }

        self.binds.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    fn create_buffer(&self, descriptor: &BufferDescriptor) -> Result<BufferId, DeviceError> {
        let mut data = Vec::new();
        data.try_reserve_exact(descriptor.size as usize)
            .map_err(|_| DeviceError::OutOfDeviceMemory)?;
        data.resize(descriptor.size as usize, 0);
        let mut state = self.lock();
        let id = state.buffers.insert(BufferRecord {
            size: descriptor.size,
            data,
        });
        Ok(BufferId(id))
    }

    fn create_buffer_with_data(
        &self,
        descriptor: &BufferDescriptor,
        data: &[u8],
    ) -> Result<BufferId, DeviceError> {
        let id = self.create_buffer(descriptor)?;
        self.write_buffer(id, 0, data)?;
        Ok(id)
    }

    fn write_buffer(&self, id: BufferId, offset: u64, data: &[u8]) -> Result<(), DeviceError> {
        let mut state = self.lock();
        let record = state
            .buffers
            .get_mut(id.0)
            .ok_or(DeviceError::InvalidHandle { what: "buffer" })?;
        let end = offset as usize + data.len();
        if end > record.data.len() {
            return Err(DeviceError::InvalidHandle { what: "buffer range" });
        }
        record.data[offset as usize..end].copy_from_slice(data);
        Ok(())
    }

    fn destroy_buffer(&self, id: BufferId) -> Result<(), DeviceError> {
        self.lock()
            .buffers
            .remove(id.0)
            .map(|_| ())
            .ok_or(DeviceError::InvalidHandle { what: "buffer" })
    }

    fn create_texture(&self, descriptor: &TextureDescriptor) -> Result<TextureId, DeviceError> {
        let texel = descriptor.format.texel_size() as usize;
        let len = descriptor.size.width as usize * descriptor.size.height as usize * texel;
        let mut data = Vec::new();
        data.try_reserve_exact(len)
            .map_err(|_| DeviceError::OutOfDeviceMemory)?;
        data.resize(len, 0);
        let mut state = self.lock();
        let id = state.textures.insert(TextureRecord {
            size: descriptor.size,
            format: descriptor.format,
            data,
        });
        Ok(TextureId(id))
    }

    fn write_texture(
        &self,
        id: TextureId,
        data: &[u8],
        bytes_per_row: u32,
        origin: Origin2D,
        size: Extent2D,
    ) -> Result<(), DeviceError> {
        let mut state = self.lock();
        let record = state
            .textures
            .get_mut(id.0)
            .ok_or(DeviceError::InvalidHandle { what: "texture" })?;
        if origin.x + size.width > record.size.width || origin.y + size.height > record.size.height
        {
            return Err(DeviceError::InvalidHandle { what: "texture region" });
        }
        let texel = record.format.texel_size() as usize;
        let row_bytes = size.width as usize * texel;
        let dst_stride = record.size.width as usize * texel;
        if size.height > 0 {
            let needed = (size.height as usize - 1) * bytes_per_row as usize + row_bytes;
            if needed > data.len() {
                return Err(DeviceError::InvalidHandle { what: "texture data" });
            }
        }
        for row in 0..size.height as usize {
            let src = row * bytes_per_row as usize;
            let dst = (origin.y as usize + row) * dst_stride + origin.x as usize * texel;
            record.data[dst..dst + row_bytes].copy_from_slice(&data[src..src + row_bytes]);
        }
        Ok(())
    }

    fn destroy_texture(&self, id: TextureId) -> Result<(), DeviceError> {
        self.lock()
            .textures
            .remove(id.0)
            .map(|_| ())
            .ok_or(DeviceError::InvalidHandle { what: "texture" })
    }

    fn create_sampler(&self, _descriptor: &SamplerDescriptor) -> Result<SamplerId, DeviceError> {
        let mut state = self.lock();
        let id = state.samplers.insert(SamplerRecord);
        Ok(SamplerId(id))
    }

    fn destroy_sampler(&self, id: SamplerId) -> Result<(), DeviceError> {
        self.lock()
            .samplers
            .remove(id.0)
            .map(|_| ())
            .ok_or(DeviceError::InvalidHandle { what: "sampler" })
    }

    fn create_binding(&self, descriptor: &BindingDescriptor) -> Result<BindingId, DeviceError> {
        let mut state = self.lock();
        for entry in descriptor.entries {
            match entry.resource {
                BindingResource::UniformBuffer { buffer, offset, size } => {
                    let record = state
                        .buffers
                        .get(buffer.0)
                        .ok_or(DeviceError::InvalidHandle { what: "buffer" })?;
                    if offset + size > record.size {
                        return Err(DeviceError::InvalidHandle { what: "buffer range" });
                    }
                }
                BindingResource::Texture(texture) => {
                    if state.textures.get(texture.0).is_none() {
                        return Err(DeviceError::InvalidHandle { what: "texture" });
                    }
                }
                BindingResource::Sampler(sampler) => {
                    if state.samplers.get(sampler.0).is_none() {
                        return Err(DeviceError::InvalidHandle { what: "sampler" });
                    }
                }
            }
        }
        let id = state.bindings.insert(BindingRecord {
            entries: descriptor.entries.to_vec(),
        });
        Ok(BindingId(id))
    }

    fn destroy_binding(&self, id: BindingId) -> Result<(), DeviceError> {
        self.lock()
            .bindings
            .remove(id.0)
            .map(|_| ())
            .ok_or(DeviceError::InvalidHandle { what: "binding" })
    }

    fn bind_uniforms(
        &self,
        pipeline: PipelineId,
        _group: u32,
        binding: BindingId,
    ) -> Result<(), DeviceError> {
        let state = self.lock();
        if state.programs.get(pipeline.0).is_none() {
            return Err(DeviceError::InvalidHandle { what: "pipeline" });
        }
        let record = state
            .bindings
            .get(binding.0)
            .ok_or(DeviceError::InvalidHandle { what: "binding" })?;
        // Uniform-location and texture-unit writes happen immediately, so
        // every referenced resource must still be alive right now.
        for entry in &record.entries {
            let alive = match entry.resource {
                BindingResource::UniformBuffer { buffer, .. } => {
                    state.buffers.get(buffer.0).is_some()
                }
                BindingResource::Texture(texture) => state.textures.get(texture.0).is_some(),
                BindingResource::Sampler(sampler) => state.samplers.get(sampler.0).is_some(),
            };
            if !alive {
                return Err(DeviceError::InvalidHandle { what: "binding resource" });
            }
        }
        Ok(())
    }

    fn draw_mesh(&self, pipeline: PipelineId, mesh: &Mesh) -> u32 {
        let state = self.lock();
        if state.bound.program != Some(pipeline.0) {
            return 0;
        }
        if state.buffers.get(mesh.vertex_buffer.0).is_none()
            || state.buffers.get(mesh.index_buffer.0).is_none()
        {
            return 0;
        }
        drop(state);
        self.draws.fetch_add(1, Ordering::Relaxed);
        self.indices
            .fetch_add(mesh.index_count as u64, Ordering::Relaxed);
        mesh.index_count
    }

    fn begin_frame(&self) -> Result<(), DeviceError> {
        Ok(())
    }

    fn end_frame(&self) -> Result<(), DeviceError> {
        self.frames.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    fn stats(&self) -> FrameStats {
        FrameStats {
            pipeline_binds: self.binds.load(Ordering::Relaxed),
            draw_calls: self.draws.load(Ordering::Relaxed),
            indices_drawn: self.indices.load(Ordering::Relaxed),
            frames_submitted: self.frames.load(Ordering::Relaxed),
        }
    }
}
