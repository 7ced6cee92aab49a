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

//! A mock device shared by the crate's unit tests.
//!
//! Produces unique resource IDs, keeps an ordered operation log (so tests
//! can assert things like "new resources were built before old ones were
//! destroyed"), and honors a programmable failure countdown to exercise
//! unwind paths.

use super::binding::{BindingDescriptor, BindingId};
use super::buffer::{BufferDescriptor, BufferId};
use super::device::{FrameStats, PipelineDescriptor, PipelineId, RenderDevice};
use super::enums::{BackendKind, DepthConvention};
use super::error::DeviceError;
use super::mesh::Mesh;
use super::shader::{ShaderDescriptor, ShaderId};
use super::state::{Scissor, Viewport};
use super::texture::{SamplerDescriptor, SamplerId, TextureDescriptor, TextureId};
use crate::math::{Extent2D, Origin2D};
use std::sync::atomic::{AtomicI64, AtomicU64, AtomicUsize, Ordering};
use std::sync::Mutex;

/// A mock graphics device for tests.
#[derive(Debug)]
pub(crate) struct MockDevice {
    next_id: AtomicUsize,
    frame_count: AtomicUsize,
    /// When >= 0, decremented on each creation call; the call that reaches
    /// -1 fails with `OutOfDeviceMemory`. Negative means "never fail".
    fail_countdown: AtomicI64,
    ops: Mutex<Vec<String>>,
    binds: AtomicU64,
    draws: AtomicU64,
    indices: AtomicU64,
    frames: AtomicU64,
}

impl MockDevice {
    pub(crate) fn new(frame_count: usize) -> Self {
        Self {
            next_id: AtomicUsize::new(1),
            frame_count: AtomicUsize::new(frame_count),
            fail_countdown: AtomicI64::new(-1),
            ops: Mutex::new(Vec::new()),
            binds: AtomicU64::new(0),
            draws: AtomicU64::new(0),
            indices: AtomicU64::new(0),
            frames: AtomicU64::new(0),
        }
    }

    /// Makes the `n`-th creation call from now fail (0 = the next one).
    pub(crate) fn fail_creation_after(&self, n: i64) {
        self.fail_countdown.store(n, Ordering::SeqCst);
    }

    pub(crate) fn ops(&self) -> Vec<String> {
        self.ops.lock().unwrap().clone()
    }

    pub(crate) fn clear_ops(&self) {
        self.ops.lock().unwrap().clear();
    }

    fn record(&self, op: String) {
        self.ops.lock().unwrap().push(op);
    }

    fn next(&self) -> usize {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    fn creation_gate(&self) -> Result<(), DeviceError> {
        let before = self.fail_countdown.load(Ordering::SeqCst);
        if before < 0 {
            return Ok(());
        }
        let now = self.fail_countdown.fetch_sub(1, Ordering::SeqCst);
        if now == 0 {
            Err(DeviceError::OutOfDeviceMemory)
        } else {
            Ok(())
        }
    }
}

impl RenderDevice for MockDevice {
    fn kind(&self) -> BackendKind {
        BackendKind::Explicit
    }

    fn depth_convention(&self) -> DepthConvention {
        DepthConvention::ZeroToOne
    }

    fn frame_count(&self) -> usize {
        self.frame_count.load(Ordering::Relaxed)
    }

    fn set_frame_count(&self, count: usize) -> Result<(), DeviceError> {
        self.frame_count.store(count, Ordering::Relaxed);
        self.record(format!("set_frame_count:{count}"));
        Ok(())
    }

    fn create_shader(&self, d: &ShaderDescriptor) -> Result<ShaderId, DeviceError> {
        self.creation_gate()?;
        let id = self.next();
        self.record(format!("create_shader:{id}:{:?}", d.stage));
        Ok(ShaderId(id))
    }

    fn destroy_shader(&self, id: ShaderId) -> Result<(), DeviceError> {
        self.record(format!("destroy_shader:{}", id.0));
        Ok(())
    }

    fn create_pipeline(&self, d: &PipelineDescriptor) -> Result<PipelineId, DeviceError> {
        self.creation_gate()?;
        let id = self.next();
        self.record(format!("create_pipeline:{id}:{}", d.label));
        Ok(PipelineId(id))
    }

    fn destroy_pipeline(&self, id: PipelineId) -> Result<(), DeviceError> {
        self.record(format!("destroy_pipeline:{}", id.0));
        Ok(())
    }

    fn bind_pipeline(
        &self,
        id: PipelineId,
        _viewport: Viewport,
        _scissor: Scissor,
    ) -> Result<(), DeviceError> {
        self.binds.fetch_add(1, Ordering::Relaxed);
        self.record(format!("bind_pipeline:{}", id.0));
        Ok(())
    }

    fn create_buffer(&self, _d: &BufferDescriptor) -> Result<BufferId, DeviceError> {
        self.creation_gate()?;
        let id = self.next();
        self.record(format!("create_buffer:{id}"));
        Ok(BufferId(id))
    }

    fn create_buffer_with_data(
        &self,
        d: &BufferDescriptor,
        _data: &[u8],
    ) -> Result<BufferId, DeviceError> {
        self.create_buffer(d)
    }

    fn write_buffer(&self, id: BufferId, _offset: u64, _data: &[u8]) -> Result<(), DeviceError> {
        self.record(format!("write_buffer:{}", id.0));
        Ok(())
    }

    fn destroy_buffer(&self, id: BufferId) -> Result<(), DeviceError> {
        self.record(format!("destroy_buffer:{}", id.0));
        Ok(())
    }

    fn create_texture(&self, _d: &TextureDescriptor) -> Result<TextureId, DeviceError> {
        self.creation_gate()?;
        let id = self.next();
        self.record(format!("create_texture:{id}"));
        Ok(TextureId(id))
    }

    fn write_texture(
        &self,
        id: TextureId,
        _data: &[u8],
        _bytes_per_row: u32,
        _origin: Origin2D,
        _size: Extent2D,
    ) -> Result<(), DeviceError> {
        self.record(format!("write_texture:{}", id.0));
        Ok(())
    }

    fn destroy_texture(&self, id: TextureId) -> Result<(), DeviceError> {
        self.record(format!("destroy_texture:{}", id.0));
        Ok(())
    }

    fn create_sampler(&self, _d: &SamplerDescriptor) -> Result<SamplerId, DeviceError> {
        self.creation_gate()?;
        let id = self.next();
        self.record(format!("create_sampler:{id}"));
        Ok(SamplerId(id))
    }

    fn destroy_sampler(&self, id: SamplerId) -> Result<(), DeviceError> {
        self.record(format!("destroy_sampler:{}", id.0));
        Ok(())
    }

    fn create_binding(&self, _d: &BindingDescriptor) -> Result<BindingId, DeviceError> {
        self.creation_gate()?;
        let id = self.next();
        self.record(format!("create_binding:{id}"));
        Ok(BindingId(id))
    }

    fn destroy_binding(&self, id: BindingId) -> Result<(), DeviceError> {
        self.record(format!("destroy_binding:{}", id.0));
        Ok(())
    }

    fn bind_uniforms(
        &self,
        _pipeline: PipelineId,
        group: u32,
        binding: BindingId,
    ) -> Result<(), DeviceError> {
        self.record(format!("bind_uniforms:{group}:{}", binding.0));
        Ok(())
    }

    fn draw_mesh(&self, _pipeline: PipelineId, mesh: &Mesh) -> u32 {
        self.draws.fetch_add(1, Ordering::Relaxed);
        self.indices
            .fetch_add(mesh.index_count as u64, Ordering::Relaxed);
        self.record(format!("draw_mesh:{}", mesh.index_count));
        mesh.index_count
    }

    fn begin_frame(&self) -> Result<(), DeviceError> {
        self.record("begin_frame".to_string());
        Ok(())
    }

    fn end_frame(&self) -> Result<(), DeviceError> {
        self.frames.fetch_add(1, Ordering::Relaxed);
        self.record("end_frame".to_string());
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
