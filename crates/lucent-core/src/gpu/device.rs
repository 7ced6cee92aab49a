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

//! The device trait: one vocabulary over both backend models.

use super::binding::{BindingDescriptor, BindingId};
use super::buffer::{BufferDescriptor, BufferId};
use super::enums::{BackendKind, DepthConvention};
use super::error::DeviceError;
use super::mesh::Mesh;
use super::shader::{ShaderDescriptor, ShaderId};
use super::state::{PipelineState, Scissor, VertexLayout, Viewport};
use super::texture::{SamplerDescriptor, SamplerId, TextureDescriptor, TextureId};
use crate::math::{Extent2D, Origin2D};
use std::fmt::Debug;

/// An opaque handle to a compiled pipeline object (program + fixed-function
/// state on the immediate backend; pipeline object + layout + cache on the
/// explicit backend).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PipelineId(pub usize);

/// Describes a complete pipeline to be created by the device.
#[derive(Debug, Clone)]
pub struct PipelineDescriptor<'a> {
    /// A display name for the pipeline, used in diagnostics.
    pub label: &'a str,
    /// The compiled shader modules the pipeline links together.
    /// At least one is required.
    pub shaders: &'a [ShaderId],
    /// The declarative fixed-function state.
    pub state: &'a PipelineState,
    /// The vertex buffer layout the pipeline consumes.
    pub vertex_layout: &'a VertexLayout,
}

/// Per-frame operation counters, used for diagnostics and by tests to
/// observe device behavior (e.g. that an empty render pass binds nothing).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Pipeline bind calls issued since device creation.
    pub pipeline_binds: u64,
    /// Draw calls issued since device creation.
    pub draw_calls: u64,
    /// Indices drawn since device creation.
    pub indices_drawn: u64,
    /// Frames submitted since device creation.
    pub frames_submitted: u64,
}

/// The one abstraction both graphics backends implement.
///
/// A device is selected once at context creation, held as
/// `Arc<dyn RenderDevice>`, and shared by every pipeline and renderer. All
/// methods take `&self`; devices guard their internal registries.
///
/// Creation methods return typed errors and release every sub-resource they
/// allocated themselves before reporting a failure.
pub trait RenderDevice: Send + Sync + Debug {
    /// Which backend programming model this device implements.
    fn kind(&self) -> BackendKind;

    /// The normalized-device-coordinate depth convention of the backend's
    /// clip space. Frustum extraction keys off this value.
    fn depth_convention(&self) -> DepthConvention;

    /// The number of frames in flight. The immediate backend always
    /// reports 1; the explicit backend reports the current swapchain image
    /// count.
    fn frame_count(&self) -> usize;

    /// Updates the frames-in-flight count after the platform reports a
    /// swapchain change. Image-count-dependent device resources are
    /// rebuilt with build-new → swap → destroy-old ordering; resources
    /// owned above the device (uniform rings, per-text bindings) must be
    /// reconciled by calling `Pipeline::resize` afterwards.
    ///
    /// The immediate backend accepts and ignores this call.
    fn set_frame_count(&self, count: usize) -> Result<(), DeviceError>;

    /// Creates a shader module.
    ///
    /// ## Errors
    /// * [`DeviceError::BadShaderCode`] with the backend diagnostic when
    ///   compilation fails.
    /// * [`DeviceError::Unsupported`] when the stage has no mapping on this
    ///   backend (ray-tracing stages on the immediate backend).
    fn create_shader(&self, descriptor: &ShaderDescriptor) -> Result<ShaderId, DeviceError>;

    /// Destroys a shader module.
    fn destroy_shader(&self, id: ShaderId) -> Result<(), DeviceError>;

    /// Creates a pipeline, translating the declarative state into the
    /// backend's native enumerations.
    ///
    /// This is the point where "backend does not support this feature"
    /// errors originate; a pipeline that was successfully created is valid
    /// on this backend for its whole lifetime.
    fn create_pipeline(&self, descriptor: &PipelineDescriptor) -> Result<PipelineId, DeviceError>;

    /// Destroys a pipeline and its backend-side objects (layout, cache).
    fn destroy_pipeline(&self, id: PipelineId) -> Result<(), DeviceError>;

    /// Binds a pipeline for the subsequent draws of one batch, with the
    /// effective viewport and scissor rectangles resolved by the caller.
    fn bind_pipeline(
        &self,
        id: PipelineId,
        viewport: Viewport,
        scissor: Scissor,
    ) -> Result<(), DeviceError>;

    /// Creates an uninitialized GPU buffer.
    fn create_buffer(&self, descriptor: &BufferDescriptor) -> Result<BufferId, DeviceError>;

    /// Creates a GPU buffer initialized with `data`.
    fn create_buffer_with_data(
        &self,
        descriptor: &BufferDescriptor,
        data: &[u8],
    ) -> Result<BufferId, DeviceError>;

    /// Writes `data` into a buffer at `offset`.
    fn write_buffer(&self, id: BufferId, offset: u64, data: &[u8]) -> Result<(), DeviceError>;

    /// Destroys a GPU buffer.
    fn destroy_buffer(&self, id: BufferId) -> Result<(), DeviceError>;

    /// Creates a 2D texture.
    fn create_texture(&self, descriptor: &TextureDescriptor) -> Result<TextureId, DeviceError>;

    /// Writes pixel data into a texture region.
    fn write_texture(
        &self,
        id: TextureId,
        data: &[u8],
        bytes_per_row: u32,
        origin: Origin2D,
        size: Extent2D,
    ) -> Result<(), DeviceError>;

    /// Destroys a texture.
    fn destroy_texture(&self, id: TextureId) -> Result<(), DeviceError>;

    /// Creates a sampler.
    fn create_sampler(&self, descriptor: &SamplerDescriptor) -> Result<SamplerId, DeviceError>;

    /// Destroys a sampler.
    fn destroy_sampler(&self, id: SamplerId) -> Result<(), DeviceError>;

    /// Creates a binding group (descriptor set / uniform-location bundle).
    fn create_binding(&self, descriptor: &BindingDescriptor) -> Result<BindingId, DeviceError>;

    /// Destroys a binding group.
    fn destroy_binding(&self, id: BindingId) -> Result<(), DeviceError>;

    /// Attaches a binding group to a numbered group slot for the next draw.
    fn bind_uniforms(
        &self,
        pipeline: PipelineId,
        group: u32,
        binding: BindingId,
    ) -> Result<(), DeviceError>;

    /// Draws an indexed mesh with the bound pipeline and bindings.
    ///
    /// Returns the number of indices the draw emitted, or 0 when the draw
    /// was dropped (stale handles, no open frame).
    fn draw_mesh(&self, pipeline: PipelineId, mesh: &Mesh) -> u32;

    /// Marks the beginning of a frame's command recording.
    fn begin_frame(&self) -> Result<(), DeviceError>;

    /// Submits the frame and advances the frame-in-flight cursor.
    fn end_frame(&self) -> Result<(), DeviceError>;

    /// Returns the device operation counters.
    fn stats(&self) -> FrameStats;
}
