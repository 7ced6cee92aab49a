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

//! Texture and sampler descriptors and handles.

use crate::lucent_bitflags;
use crate::math::Extent2D;

/// The pixel format of a texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureFormat {
    /// Single 8-bit channel (glyph atlas coverage).
    R8Unorm,
    /// 8-bit RGBA, linear.
    Rgba8Unorm,
    /// 8-bit RGBA, sRGB-encoded.
    Rgba8UnormSrgb,
    /// 32-bit float depth (shadow maps).
    Depth32Float,
}

impl TextureFormat {
    /// Returns the size in bytes of one texel.
    pub const fn texel_size(&self) -> u32 {
        match self {
            TextureFormat::R8Unorm => 1,
            TextureFormat::Rgba8Unorm | TextureFormat::Rgba8UnormSrgb => 4,
            TextureFormat::Depth32Float => 4,
        }
    }
}

lucent_bitflags! {
    /// How a texture may be used by the device.
    pub struct TextureUsage: u8 {
        /// Sampled from shaders.
        const SAMPLED = 0b001;
        /// Destination of CPU writes.
        const COPY_DST = 0b010;
        /// Rendered to as a color or depth attachment.
        const RENDER_ATTACHMENT = 0b100;
    }
}

/// Describes a 2D texture to be created by the device.
#[derive(Debug, Clone)]
pub struct TextureDescriptor<'a> {
    /// An optional debug label.
    pub label: Option<&'a str>,
    /// Texture dimensions in pixels.
    pub size: Extent2D,
    /// The pixel format.
    pub format: TextureFormat,
    /// How the texture will be used.
    pub usage: TextureUsage,
}

/// An opaque handle representing a GPU texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureId(pub usize);

/// Texel filtering mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FilterMode {
    /// Nearest-neighbor sampling.
    Nearest,
    /// Linear interpolation.
    #[default]
    Linear,
}

/// How texture coordinates outside `[0, 1]` are resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AddressMode {
    /// Coordinates are clamped to the edge texel.
    #[default]
    ClampToEdge,
    /// Coordinates wrap around.
    Repeat,
}

/// Describes a sampler to be created by the device.
#[derive(Debug, Clone, Default)]
pub struct SamplerDescriptor<'a> {
    /// An optional debug label.
    pub label: Option<&'a str>,
    /// Filtering for magnification and minification.
    pub filter: FilterMode,
    /// Addressing for out-of-range coordinates.
    pub address: AddressMode,
}

/// An opaque handle representing a sampler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SamplerId(pub usize);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_texel_sizes() {
        assert_eq!(TextureFormat::R8Unorm.texel_size(), 1);
        assert_eq!(TextureFormat::Rgba8UnormSrgb.texel_size(), 4);
        assert_eq!(TextureFormat::Depth32Float.texel_size(), 4);
    }
}
