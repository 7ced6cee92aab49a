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

//! GPU buffer descriptors and handles.

use crate::lucent_bitflags;
use std::borrow::Cow;

lucent_bitflags! {
    /// How a buffer may be used by the device.
    pub struct BufferUsage: u8 {
        /// Vertex data source.
        const VERTEX = 0b0001;
        /// Index data source.
        const INDEX = 0b0010;
        /// Uniform data source.
        const UNIFORM = 0b0100;
        /// Destination of CPU writes.
        const COPY_DST = 0b1000;
    }
}

/// Describes a GPU buffer to be created by the device.
#[derive(Debug, Clone)]
pub struct BufferDescriptor<'a> {
    /// An optional debug label.
    pub label: Option<Cow<'a, str>>,
    /// The size of the buffer in bytes.
    pub size: u64,
    /// How the buffer will be used.
    pub usage: BufferUsage,
}

/// An opaque handle representing a GPU buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BufferId(pub usize);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usage_combination() {
        let u = BufferUsage::UNIFORM | BufferUsage::COPY_DST;
        assert!(u.contains(BufferUsage::UNIFORM));
        assert!(u.contains(BufferUsage::COPY_DST));
        assert!(!u.contains(BufferUsage::VERTEX));
    }
}
