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

//! The graphics-API-agnostic rendering vocabulary.
//!
//! Everything above this module (pipelines, renderers, flavors, text) speaks
//! only in terms of the descriptors, opaque IDs and the [`RenderDevice`]
//! trait defined here. The two concrete devices — the explicit
//! command-buffer model and the immediate state-machine model — live in
//! `lucent-infra` and are selected once at context creation; afterwards the
//! engine holds an `Arc<dyn RenderDevice>` and never re-derives the choice.

pub mod binding;
pub mod buffer;
pub mod device;
#[cfg(test)]
pub(crate) mod testing;
pub mod enums;
pub mod error;
pub mod mesh;
pub mod shader;
pub mod state;
pub mod texture;
pub mod uniforms;

pub use binding::{BindingDescriptor, BindingEntry, BindingId, BindingResource};
pub use buffer::{BufferDescriptor, BufferId, BufferUsage};
pub use device::{FrameStats, PipelineDescriptor, PipelineId, RenderDevice};
pub use enums::{
    BackendKind, BlendFactor, BlendOperation, CompareFunction, CullMode, DepthConvention,
    FrontFace, PolygonMode, PrimitiveTopology,
};
pub use error::DeviceError;
pub use mesh::Mesh;
pub use shader::{ShaderDescriptor, ShaderId, ShaderStage};
pub use state::{
    BlendComponent, BlendState, ColorWrites, DepthBias, DepthRange, DepthState, PipelineState,
    Scissor, VertexAttribute, VertexFormat, VertexLayout, Viewport,
};
pub use texture::{
    AddressMode, FilterMode, SamplerDescriptor, SamplerId, TextureDescriptor, TextureFormat,
    TextureId, TextureUsage,
};
pub use uniforms::UniformRing;
