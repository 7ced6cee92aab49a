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

//! The explicit command-buffer-model device.
//!
//! Pipelines carry a pipeline object plus a layout and cache handle;
//! binding groups are descriptor sets allocated from a pool sized by the
//! frames-in-flight count; draws are recorded into the current frame's
//! command list. A swapchain image-count change rebuilds the pool and
//! re-homes every live descriptor set — the new pool exists before the old
//! one is dropped, so an in-flight frame never observes a freed set.

mod conversions;

use conversions::NativePipelineState;

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

/// Frames in flight a fresh device starts with.
pub const DEFAULT_FRAME_COUNT: usize = 2;
/// Upper bound accepted by [`RenderDevice::set_frame_count`].
pub const MAX_FRAME_COUNT: usize = 8;

const SETS_PER_FRAME: usize = 256;

/// One recorded command of the current frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// A pipeline bind with its backend handle.
    BindPipeline(usize),
    /// A descriptor-set attachment.
    BindUniforms {
        /// Set index.
        group: u32,
        /// Descriptor-set handle.
        binding: usize,
    },
    /// An indexed draw.
    DrawIndexed {
        /// Indices emitted.
        indices: u32,
    },
}

#[derive(Debug)]
struct ShaderRecord {
    stage_bit: u32,
    label: String,
}

#[derive(Debug)]
struct PipelineRecord {
    label: String,
    native: NativePipelineState,
    layout_handle: u64,
    cache_handle: u64,
    stage_mask: u32,
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
    /// The pool generation the set was allocated from; a stale generation
    /// means the set was not re-homed after a pool rebuild.
    pool_generation: u64,
}

#[derive(Debug)]
struct DescriptorPool {
    generation: u64,
    frame_count: usize,
    capacity: usize,
}

#[derive(Debug, Default)]
struct FrameRing {
    index: usize,
    current_pipeline: Option<usize>,
    commands: Vec<Command>,
}

#[derive(Debug)]
struct DeviceState {
    shaders: Registry<ShaderRecord>,
    pipelines: Registry<PipelineRecord>,
    buffers: Registry<BufferRecord>,
    textures: Registry<TextureRecord>,
    samplers: Registry<SamplerRecord>,
    bindings: Registry<BindingRecord>,
    pool: DescriptorPool,
    frame: FrameRing,
    next_backend_handle: u64,
}

/// The explicit command-buffer-model device.
#[derive(Debug)]
pub struct ExplicitDevice {
    state: Mutex<DeviceState>,
    binds: AtomicU64,
    draws: AtomicU64,
    primitives: AtomicU64,
    indices: AtomicU64,
    frames: AtomicU64,
}

impl Default for ExplicitDevice {
    fn default() -> Self {
        Self::new()
    }
}

impl ExplicitDevice {
    /// Creates a device with [`DEFAULT_FRAME_COUNT`] frames in flight.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(DeviceState {
                shaders: Registry::new(),
                pipelines: Registry::new(),
                buffers: Registry::new(),
                textures: Registry::new(),
                samplers: Registry::new(),
                bindings: Registry::new(),
                pool: DescriptorPool {
                    generation: 1,
                    frame_count: DEFAULT_FRAME_COUNT,
                    capacity: SETS_PER_FRAME * DEFAULT_FRAME_COUNT,
                },
                frame: FrameRing::default(),
                next_backend_handle: 1,
            }),
            binds: AtomicU64::new(0),
            draws: AtomicU64::new(0),
            primitives: AtomicU64::new(0),
            indices: AtomicU64::new(0),
            frames: AtomicU64::new(0),
        }
    }

    /// The commands recorded since the last `begin_frame`/`end_frame`.
    pub fn recorded_commands(&self) -> Vec<Command> {
        self.lock().frame.commands.clone()
    }

    /// The frame slot currently being recorded.
    pub fn current_frame_index(&self) -> usize {
        self.lock().frame.index
    }

    /// The descriptor-pool generation (bumped on every image-count change).
    pub fn pool_generation(&self) -> u64 {
        self.lock().pool.generation
    }

    /// The descriptor-pool capacity in sets.
    pub fn descriptor_pool_capacity(&self) -> usize {
        self.lock().pool.capacity
    }

    /// Primitives assembled by all draws so far, derived from each
    /// pipeline's translated topology.
    pub fn primitives_drawn(&self) -> u64 {
        self.primitives.load(Ordering::Relaxed)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, DeviceState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Primitives one indexed draw assembles under a native topology.
fn primitive_count(topology: i32, indices: u32) -> u32 {
    use conversions::native::*;
    match topology {
        PRIMITIVE_TOPOLOGY_POINT_LIST => indices,
        PRIMITIVE_TOPOLOGY_LINE_LIST => indices / 2,
        PRIMITIVE_TOPOLOGY_LINE_STRIP => indices.saturating_sub(1),
        PRIMITIVE_TOPOLOGY_TRIANGLE_LIST => indices / 3,
        PRIMITIVE_TOPOLOGY_TRIANGLE_STRIP => indices.saturating_sub(2),
        _ => 0,
    }
}

fn validate_entries(
    state: &DeviceState,
    entries: &[BindingEntry],
) -> Result<(), DeviceError> {
    for entry in entries {
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
    Ok(())
}

impl RenderDevice for ExplicitDevice {
    fn kind(&self) -> BackendKind {
        BackendKind::Explicit
    }

    fn depth_convention(&self) -> DepthConvention {
        DepthConvention::ZeroToOne
    }

    fn frame_count(&self) -> usize {
        self.lock().pool.frame_count
    }

    fn set_frame_count(&self, count: usize) -> Result<(), DeviceError> {
        if count == 0 || count > MAX_FRAME_COUNT {
            return Err(DeviceError::Unsupported {
                what: format!("{count} frames in flight"),
                backend: BackendKind::Explicit,
            });
        }
        let mut state = self.lock();
        if count == state.pool.frame_count {
            return Ok(());
        }

        // Build the replacement pool first, re-home every live descriptor
        // set into it, and only then let the old pool go.
        let live_sets = state.bindings.len();
        let new_pool = DescriptorPool {
            generation: state.pool.generation + 1,
            frame_count: count,
            capacity: live_sets.max(SETS_PER_FRAME) * count,
        };
        let generation = new_pool.generation;
        for (_, binding) in state.bindings.iter_mut() {
            binding.pool_generation = generation;
        }
        let old_pool = std::mem::replace(&mut state.pool, new_pool);
        log::debug!(
            "ExplicitDevice: frames-in-flight {} -> {count} (pool generation {generation})",
            old_pool.frame_count
        );

        // The ring index may now be out of range.
        if state.frame.index >= count {
            state.frame.index = 0;
        }
        Ok(())
    }

    fn create_shader(&self, descriptor: &ShaderDescriptor) -> Result<ShaderId, DeviceError> {
        let label = descriptor.label.unwrap_or("unnamed").to_string();
        if descriptor.source.trim().is_empty() {
            return Err(DeviceError::BadShaderCode {
                label,
                details: "empty shader source".to_string(),
            });
        }
        let stage_bit = conversions::shader_stage(descriptor.stage);
        let mut state = self.lock();
        let id = state.shaders.insert(ShaderRecord { stage_bit, label });
        Ok(ShaderId(id))
    }

    fn destroy_shader(&self, id: ShaderId) -> Result<(), DeviceError> {
        let record = self
            .lock()
            .shaders
            .remove(id.0)
            .ok_or(DeviceError::InvalidHandle { what: "shader" })?;
        log::trace!(
            "ExplicitDevice: destroyed shader '{}' (stage bit {:#x})",
            record.label,
            record.stage_bit
        );
        Ok(())
    }

    fn create_pipeline(&self, descriptor: &PipelineDescriptor) -> Result<PipelineId, DeviceError> {
        let native = conversions::pipeline_state(descriptor.state)?;
        let mut state = self.lock();

        let mut stage_mask = 0u32;
        for shader in descriptor.shaders {
            let record = state
                .shaders
                .get(shader.0)
                .ok_or(DeviceError::InvalidHandle { what: "shader" })?;
            stage_mask |= record.stage_bit;
        }

        let layout_handle = state.next_backend_handle;
        let cache_handle = state.next_backend_handle + 1;
        state.next_backend_handle += 2;

        log::debug!(
            "ExplicitDevice: creating pipeline '{}': {}",
            descriptor.label,
            native.describe()
        );
        let id = state.pipelines.insert(PipelineRecord {
            label: descriptor.label.to_string(),
            native,
            layout_handle,
            cache_handle,
            stage_mask,
        });
        Ok(PipelineId(id))
    }

    fn destroy_pipeline(&self, id: PipelineId) -> Result<(), DeviceError> {
        let mut state = self.lock();
        if state.frame.current_pipeline == Some(id.0) {
            state.frame.current_pipeline = None;
        }
        let record = state
            .pipelines
            .remove(id.0)
            .ok_or(DeviceError::InvalidHandle { what: "pipeline" })?;
        log::trace!(
            "ExplicitDevice: destroyed pipeline '{}' (layout #{}, cache #{})",
            record.label,
            record.layout_handle,
            record.cache_handle
        );
        Ok(())
    }

    fn bind_pipeline(
        &self,
        id: PipelineId,
        _viewport: Viewport,
        _scissor: Scissor,
    ) -> Result<(), DeviceError> {
        let mut state = self.lock();
        let record = state
            .pipelines
            .get(id.0)
            .ok_or(DeviceError::InvalidHandle { what: "pipeline" })?;
        log::trace!(
            "ExplicitDevice: bound pipeline '{}' (stages {:#x})",
            record.label,
            record.stage_mask
        );
        state.frame.current_pipeline = Some(id.0);
        state.frame.commands.push(Command::BindPipeline(id.0));
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
        validate_entries(&state, descriptor.entries)?;
        let generation = state.pool.generation;
        let id = state.bindings.insert(BindingRecord {
            entries: descriptor.entries.to_vec(),
            pool_generation: generation,
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
        group: u32,
        binding: BindingId,
    ) -> Result<(), DeviceError> {
        let mut state = self.lock();
        if state.pipelines.get(pipeline.0).is_none() {
            return Err(DeviceError::InvalidHandle { what: "pipeline" });
        }
        let record = state
            .bindings
            .get(binding.0)
            .ok_or(DeviceError::InvalidHandle { what: "binding" })?;
        if record.pool_generation != state.pool.generation {
            return Err(DeviceError::InvalidHandle { what: "descriptor set" });
        }
        // The set's resources must still be alive at attach time.
        let entries = record.entries.clone();
        validate_entries(&state, &entries)?;
        state.frame.commands.push(Command::BindUniforms {
            group,
            binding: binding.0,
        });
        Ok(())
    }

    fn draw_mesh(&self, pipeline: PipelineId, mesh: &Mesh) -> u32 {
        let mut state = self.lock();
        if state.frame.current_pipeline != Some(pipeline.0) {
            return 0;
        }
        if state.buffers.get(mesh.vertex_buffer.0).is_none()
            || state.buffers.get(mesh.index_buffer.0).is_none()
        {
            return 0;
        }
        let primitives = match state.pipelines.get(pipeline.0) {
            Some(record) => primitive_count(record.native.topology, mesh.index_count),
            None => return 0,
        };
        state.frame.commands.push(Command::DrawIndexed {
            indices: mesh.index_count,
        });
        self.draws.fetch_add(1, Ordering::Relaxed);
        self.indices
            .fetch_add(mesh.index_count as u64, Ordering::Relaxed);
        self.primitives
            .fetch_add(primitives as u64, Ordering::Relaxed);
        mesh.index_count
    }

    fn begin_frame(&self) -> Result<(), DeviceError> {
        let mut state = self.lock();
        state.frame.commands.clear();
        state.frame.current_pipeline = None;
        Ok(())
    }

    fn end_frame(&self) -> Result<(), DeviceError> {
        let mut state = self.lock();
        let frame_count = state.pool.frame_count;
        state.frame.index = (state.frame.index + 1) % frame_count;
        state.frame.commands.clear();
        state.frame.current_pipeline = None;
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

#[cfg(test)]
mod tests {
    use super::*;
    use lucent_core::gpu::{BufferUsage, PipelineState, PrimitiveTopology, ShaderStage};
    use lucent_core::gpu::{TextureUsage, VertexLayout};
    use std::borrow::Cow;

    fn shader(device: &ExplicitDevice, stage: ShaderStage) -> ShaderId {
        device
            .create_shader(&ShaderDescriptor {
                label: Some("test"),
                stage,
                source: Cow::Borrowed("void main() {}"),
                entry_point: "main",
            })
            .unwrap()
    }

    fn pipeline(device: &ExplicitDevice, state: &PipelineState) -> Result<PipelineId, DeviceError> {
        let shaders = [
            shader(device, ShaderStage::Vertex),
            shader(device, ShaderStage::Fragment),
        ];
        device.create_pipeline(&PipelineDescriptor {
            label: "test pipeline",
            shaders: &shaders,
            state,
            vertex_layout: &VertexLayout::default(),
        })
    }

    fn buffer(device: &ExplicitDevice, size: u64) -> BufferId {
        device
            .create_buffer(&BufferDescriptor {
                label: None,
                size,
                usage: BufferUsage::UNIFORM | BufferUsage::COPY_DST,
            })
            .unwrap()
    }

    #[test]
    fn test_all_shader_stages_are_supported() {
        let device = ExplicitDevice::new();
        for stage in [
            ShaderStage::Vertex,
            ShaderStage::Fragment,
            ShaderStage::RayGeneration,
            ShaderStage::RayMiss,
            ShaderStage::RayClosestHit,
        ] {
            shader(&device, stage);
        }
    }

    #[test]
    fn test_empty_shader_source_is_bad_shader_code() {
        let device = ExplicitDevice::new();
        let err = device
            .create_shader(&ShaderDescriptor {
                label: Some("broken"),
                stage: ShaderStage::Vertex,
                source: Cow::Borrowed("  "),
                entry_point: "main",
            })
            .unwrap_err();
        assert!(matches!(err, DeviceError::BadShaderCode { .. }));
    }

    #[test]
    fn test_triangle_fan_pipeline_is_rejected_at_creation() {
        let device = ExplicitDevice::new();
        let state = PipelineState {
            topology: PrimitiveTopology::TriangleFan,
            ..PipelineState::default()
        };
        assert!(matches!(
            pipeline(&device, &state),
            Err(DeviceError::Unsupported { .. })
        ));
    }

    #[test]
    fn test_draw_requires_a_bound_pipeline() {
        let device = ExplicitDevice::new();
        let id = pipeline(&device, &PipelineState::default()).unwrap();
        let mesh = Mesh {
            vertex_buffer: buffer(&device, 64),
            index_buffer: buffer(&device, 64),
            index_count: 6,
        };

        device.begin_frame().unwrap();
        assert_eq!(device.draw_mesh(id, &mesh), 0);

        device
            .bind_pipeline(id, Viewport::new(0.0, 0.0, 64.0, 64.0), Scissor::new(0, 0, 64, 64))
            .unwrap();
        assert_eq!(device.draw_mesh(id, &mesh), 6);

        let commands = device.recorded_commands();
        assert_eq!(
            commands,
            vec![
                Command::BindPipeline(id.0),
                Command::DrawIndexed { indices: 6 }
            ]
        );
    }

    #[test]
    fn test_end_frame_advances_the_ring() {
        let device = ExplicitDevice::new();
        assert_eq!(device.current_frame_index(), 0);
        device.begin_frame().unwrap();
        device.end_frame().unwrap();
        assert_eq!(device.current_frame_index(), 1);
        device.begin_frame().unwrap();
        device.end_frame().unwrap();
        assert_eq!(device.current_frame_index(), 0);
        assert_eq!(device.stats().frames_submitted, 2);
    }

    #[test]
    fn test_set_frame_count_rebuilds_pool_and_rehomes_sets() {
        let device = ExplicitDevice::new();
        let ubo = buffer(&device, 128);
        let binding = device
            .create_binding(&BindingDescriptor {
                label: None,
                entries: &[BindingEntry {
                    binding: 0,
                    resource: BindingResource::UniformBuffer {
                        buffer: ubo,
                        offset: 0,
                        size: 128,
                    },
                }],
            })
            .unwrap();
        let generation = device.pool_generation();

        device.set_frame_count(3).unwrap();
        assert_eq!(device.frame_count(), 3);
        assert_eq!(device.pool_generation(), generation + 1);

        // The set survived the pool rebuild and still binds.
        let id = pipeline(&device, &PipelineState::default()).unwrap();
        device
            .bind_pipeline(id, Viewport::new(0.0, 0.0, 1.0, 1.0), Scissor::new(0, 0, 1, 1))
            .unwrap();
        device.bind_uniforms(id, 0, binding).unwrap();
    }

    #[test]
    fn test_zero_frames_in_flight_is_rejected() {
        let device = ExplicitDevice::new();
        assert!(device.set_frame_count(0).is_err());
        assert!(device.set_frame_count(MAX_FRAME_COUNT + 1).is_err());
        assert_eq!(device.frame_count(), DEFAULT_FRAME_COUNT);
    }

    #[test]
    fn test_binding_validates_referenced_resources() {
        let device = ExplicitDevice::new();
        let err = device
            .create_binding(&BindingDescriptor {
                label: None,
                entries: &[BindingEntry {
                    binding: 0,
                    resource: BindingResource::UniformBuffer {
                        buffer: BufferId(999),
                        offset: 0,
                        size: 16,
                    },
                }],
            })
            .unwrap_err();
        assert_eq!(err, DeviceError::InvalidHandle { what: "buffer" });

        let ubo = buffer(&device, 16);
        let err = device
            .create_binding(&BindingDescriptor {
                label: None,
                entries: &[BindingEntry {
                    binding: 0,
                    resource: BindingResource::UniformBuffer {
                        buffer: ubo,
                        offset: 8,
                        size: 16,
                    },
                }],
            })
            .unwrap_err();
        assert_eq!(err, DeviceError::InvalidHandle { what: "buffer range" });
    }

    #[test]
    fn test_buffer_write_bounds() {
        let device = ExplicitDevice::new();
        let id = buffer(&device, 8);
        assert!(device.write_buffer(id, 0, &[0u8; 8]).is_ok());
        assert!(device.write_buffer(id, 4, &[0u8; 8]).is_err());
        assert!(device.write_buffer(BufferId(12345), 0, &[0u8; 1]).is_err());
    }

    #[test]
    fn test_texture_region_write() {
        let device = ExplicitDevice::new();
        let id = device
            .create_texture(&TextureDescriptor {
                label: None,
                size: Extent2D::new(4, 4),
                format: TextureFormat::R8Unorm,
                usage: TextureUsage::SAMPLED | TextureUsage::COPY_DST,
            })
            .unwrap();
        let data = [1u8, 2, 3, 4];
        device
            .write_texture(id, &data, 2, Origin2D::new(1, 1), Extent2D::new(2, 2))
            .unwrap();
        assert!(device
            .write_texture(id, &data, 2, Origin2D::new(3, 3), Extent2D::new(2, 2))
            .is_err());
    }

    #[test]
    fn test_primitive_assembly_follows_the_translated_topology() {
        let device = ExplicitDevice::new();
        let triangles = pipeline(&device, &PipelineState::default()).unwrap();
        let lines = pipeline(
            &device,
            &PipelineState {
                topology: PrimitiveTopology::LineList,
                ..PipelineState::default()
            },
        )
        .unwrap();
        let mesh = Mesh {
            vertex_buffer: buffer(&device, 64),
            index_buffer: buffer(&device, 64),
            index_count: 12,
        };
        let viewport = Viewport::new(0.0, 0.0, 64.0, 64.0);
        let scissor = Scissor::new(0, 0, 64, 64);

        device.begin_frame().unwrap();
        device.bind_pipeline(triangles, viewport, scissor).unwrap();
        device.draw_mesh(triangles, &mesh);
        assert_eq!(device.primitives_drawn(), 4); // 12 indices / 3

        device.bind_pipeline(lines, viewport, scissor).unwrap();
        device.draw_mesh(lines, &mesh);
        assert_eq!(device.primitives_drawn(), 4 + 6); // + 12 indices / 2
        device.end_frame().unwrap();
    }

    #[test]
    fn test_pool_capacity_scales_with_frame_count() {
        let device = ExplicitDevice::new();
        let base = device.descriptor_pool_capacity();
        device.set_frame_count(4).unwrap();
        assert_eq!(
            device.descriptor_pool_capacity(),
            base / DEFAULT_FRAME_COUNT * 4
        );
    }

    #[test]
    fn test_destroyed_pipeline_handles_go_stale() {
        let device = ExplicitDevice::new();
        let id = pipeline(&device, &PipelineState::default()).unwrap();
        device.destroy_pipeline(id).unwrap();
        assert_eq!(
            device.destroy_pipeline(id),
            Err(DeviceError::InvalidHandle { what: "pipeline" })
        );
        assert!(device
            .bind_pipeline(id, Viewport::new(0.0, 0.0, 1.0, 1.0), Scissor::new(0, 0, 1, 1))
            .is_err());
    }
}
