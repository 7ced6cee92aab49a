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

//! Shader stage descriptors and handles.

use std::borrow::Cow;

/// The pipeline stage a compiled shader module is tagged with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    /// Vertex processing stage.
    Vertex,
    /// Fragment (pixel) stage.
    Fragment,
    /// Ray generation stage. Explicit backend only.
    RayGeneration,
    /// Ray miss stage. Explicit backend only.
    RayMiss,
    /// Ray closest-hit stage. Explicit backend only.
    RayClosestHit,
}

impl ShaderStage {
    /// Returns `true` for the ray-tracing stages.
    #[inline]
    pub const fn is_ray_tracing(&self) -> bool {
        matches!(
            self,
            ShaderStage::RayGeneration | ShaderStage::RayMiss | ShaderStage::RayClosestHit
        )
    }
}

/// Describes a shader module to be created by the device.
///
/// Shader compilation itself is a backend concern; the engine only carries
/// the source text through and surfaces the backend's diagnostics as
/// [`DeviceError::BadShaderCode`](super::DeviceError::BadShaderCode).
#[derive(Debug, Clone)]
pub struct ShaderDescriptor<'a> {
    /// An optional debug label.
    pub label: Option<&'a str>,
    /// The stage this module is compiled for.
    pub stage: ShaderStage,
    /// The shader source text.
    pub source: Cow<'a, str>,
    /// The name of the entry point function.
    pub entry_point: &'a str,
}

/// An opaque handle representing a compiled shader module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShaderId(pub usize);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ray_stage_classification() {
        assert!(ShaderStage::RayGeneration.is_ray_tracing());
        assert!(ShaderStage::RayMiss.is_ray_tracing());
        assert!(ShaderStage::RayClosestHit.is_ray_tracing());
        assert!(!ShaderStage::Vertex.is_ray_tracing());
        assert!(!ShaderStage::Fragment.is_ray_tracing());
    }

    #[test]
    fn test_shader_id_equality() {
        assert_eq!(ShaderId(3), ShaderId(3));
        assert_ne!(ShaderId(3), ShaderId(4));
    }
}
