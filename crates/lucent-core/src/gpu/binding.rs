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

//! Resource binding groups.
//!
//! A binding is the abstract equivalent of a descriptor set on the explicit
//! backend and of a bundle of uniform-location/texture-unit assignments on
//! the immediate backend. Flavors create bindings through the device and
//! attach them per draw with
//! [`RenderDevice::bind_uniforms`](super::RenderDevice::bind_uniforms).

use super::buffer::BufferId;
use super::texture::{SamplerId, TextureId};

/// A single resource bound at a numbered slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingResource {
    /// A range of a uniform buffer.
    UniformBuffer {
        /// The backing buffer.
        buffer: BufferId,
        /// Byte offset of the bound range.
        offset: u64,
        /// Byte size of the bound range.
        size: u64,
    },
    /// A sampled texture.
    Texture(TextureId),
    /// A sampler.
    Sampler(SamplerId),
}

/// One entry of a binding group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BindingEntry {
    /// The slot index within the group.
    pub binding: u32,
    /// The resource bound at the slot.
    pub resource: BindingResource,
}

/// Describes a binding group to be created by the device.
#[derive(Debug, Clone)]
pub struct BindingDescriptor<'a> {
    /// An optional debug label.
    pub label: Option<&'a str>,
    /// The entries of the group.
    pub entries: &'a [BindingEntry],
}

/// An opaque handle representing a binding group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BindingId(pub usize);
