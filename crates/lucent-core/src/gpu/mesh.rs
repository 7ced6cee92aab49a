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

//! Mesh handles: an uploaded vertex/index buffer pair.

use super::buffer::{BufferDescriptor, BufferId, BufferUsage};
use super::device::RenderDevice;
use super::error::DeviceError;
use std::borrow::Cow;

/// An uploaded mesh: opaque vertex/index buffer handles plus the index
/// count one draw of the mesh emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mesh {
    /// The vertex buffer handle.
    pub vertex_buffer: BufferId,
    /// The index buffer handle.
    pub index_buffer: BufferId,
    /// Number of indices drawn per draw call.
    pub index_count: u32,
}

impl Mesh {
    /// Uploads vertex and index data and returns the mesh handle.
    ///
    /// If the index buffer creation fails, the already-created vertex
    /// buffer is released before the error is returned.
    pub fn upload(
        device: &dyn RenderDevice,
        label: &str,
        vertex_data: &[u8],
        indices: &[u32],
    ) -> Result<Self, DeviceError> {
        let vertex_buffer = device.create_buffer_with_data(
            &BufferDescriptor {
                label: Some(Cow::Owned(format!("{label} [vertices]"))),
                size: vertex_data.len() as u64,
                usage: BufferUsage::VERTEX | BufferUsage::COPY_DST,
            },
            vertex_data,
        )?;

        let index_buffer = device.create_buffer_with_data(
            &BufferDescriptor {
                label: Some(Cow::Owned(format!("{label} [indices]"))),
                size: (indices.len() * std::mem::size_of::<u32>()) as u64,
                usage: BufferUsage::INDEX | BufferUsage::COPY_DST,
            },
            bytemuck::cast_slice(indices),
        );

        let index_buffer = match index_buffer {
            Ok(id) => id,
            Err(err) => {
                if let Err(destroy_err) = device.destroy_buffer(vertex_buffer) {
                    log::warn!(
                        "Mesh({label}): failed to release vertex buffer on unwind: {destroy_err:?}"
                    );
                }
                return Err(err);
            }
        };

        Ok(Self {
            vertex_buffer,
            index_buffer,
            index_count: indices.len() as u32,
        })
    }

    /// Destroys both underlying buffers.
    pub fn destroy(self, device: &dyn RenderDevice) {
        if let Err(e) = device.destroy_buffer(self.vertex_buffer) {
            log::warn!("Mesh: failed to destroy vertex buffer: {e:?}");
        }
        if let Err(e) = device.destroy_buffer(self.index_buffer) {
            log::warn!("Mesh: failed to destroy index buffer: {e:?}");
        }
    }
}
