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

//! The declarative fixed-function pipeline state.
//!
//! A [`PipelineState`] is a plain value copied into every pipeline instance
//! at creation. Validation against the active backend happens at pipeline
//! creation time — that is where "backend does not support this feature"
//! errors originate, never later.

use serde::{Deserialize, Serialize};

use super::enums::*;
use crate::lucent_bitflags;
use crate::math::LinearRgba;

/// Describes a single vertex attribute within the vertex buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VertexAttribute {
    /// The input location of this attribute in the vertex shader.
    pub shader_location: u32,
    /// The format of the attribute's data.
    pub format: VertexFormat,
    /// The byte offset of this attribute from the start of the vertex.
    pub offset: u32,
}

/// The memory format of a single vertex attribute's data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VertexFormat {
    /// Two 32-bit float components.
    Float32x2,
    /// Three 32-bit float components.
    Float32x3,
    /// Four 32-bit float components.
    Float32x4,
    /// Four 8-bit unsigned components normalized to `[0.0, 1.0]`.
    Unorm8x4,
}

impl VertexFormat {
    /// Returns the size in bytes of this vertex format.
    pub const fn size(&self) -> u32 {
        match self {
            VertexFormat::Float32x2 => 8,
            VertexFormat::Float32x3 => 12,
            VertexFormat::Float32x4 => 16,
            VertexFormat::Unorm8x4 => 4,
        }
    }
}

/// Describes the memory layout of the vertex buffer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct VertexLayout {
    /// The byte distance between consecutive vertices.
    pub stride: u32,
    /// The attributes contained within each vertex.
    pub attributes: Vec<VertexAttribute>,
}

/// A viewport rectangle in framebuffer coordinates.
///
/// A zero-area viewport means "dynamic": the effective rectangle is derived
/// from the surface size at bind time and tracks surface resizes. A
/// non-zero-area viewport is fixed at creation and is never auto-updated.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Viewport {
    /// Left edge in pixels.
    pub x: f32,
    /// Top edge in pixels.
    pub y: f32,
    /// Width in pixels.
    pub width: f32,
    /// Height in pixels.
    pub height: f32,
}

impl Viewport {
    /// A zero-area viewport, declaring the rectangle dynamic.
    pub const DYNAMIC: Self = Self {
        x: 0.0,
        y: 0.0,
        width: 0.0,
        height: 0.0,
    };

    /// Creates a fixed viewport rectangle.
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Returns `true` when the rectangle has zero area and is therefore
    /// resolved dynamically at bind time.
    #[inline]
    pub fn is_dynamic(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// A scissor rectangle in framebuffer coordinates.
///
/// The zero-area-means-dynamic convention matches [`Viewport`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Scissor {
    /// Left edge in pixels.
    pub x: i32,
    /// Top edge in pixels.
    pub y: i32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Scissor {
    /// A zero-area scissor, declaring the rectangle dynamic.
    pub const DYNAMIC: Self = Self {
        x: 0,
        y: 0,
        width: 0,
        height: 0,
    };

    /// Creates a fixed scissor rectangle.
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Returns `true` when the rectangle has zero area and is therefore
    /// resolved dynamically at bind time.
    #[inline]
    pub const fn is_dynamic(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// The depth range written by the viewport transform.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DepthRange {
    /// The minimum depth value.
    pub min: f32,
    /// The maximum depth value.
    pub max: f32,
}

impl Default for DepthRange {
    fn default() -> Self {
        Self { min: 0.0, max: 1.0 }
    }
}

/// Describes depth biasing, used to prevent z-fighting (e.g. on shadow
/// casters).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DepthBias {
    /// A constant value added to the depth of each fragment.
    pub constant: f32,
    /// A factor that scales with the fragment's depth slope.
    pub slope_scale: f32,
    /// The maximum bias that can be applied.
    pub clamp: f32,
}

impl DepthBias {
    /// Returns `true` if any bias component is non-zero.
    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.constant != 0.0 || self.slope_scale != 0.0
    }
}

/// Describes the state for depth testing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DepthState {
    /// If `true`, fragments are depth-tested.
    pub test_enabled: bool,
    /// If `true`, depth values will be written to the depth buffer.
    pub write_enabled: bool,
    /// The comparison function used for the depth test.
    pub compare: CompareFunction,
    /// If `true`, fragment depths are clamped instead of clipped.
    pub clamp_enabled: bool,
    /// The depth bias state.
    pub bias: DepthBias,
}

impl Default for DepthState {
    fn default() -> Self {
        Self {
            test_enabled: true,
            write_enabled: true,
            compare: CompareFunction::Less,
            clamp_enabled: false,
            bias: DepthBias::default(),
        }
    }
}

/// Describes a complete blend equation for one component group (RGB or A).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlendComponent {
    /// The blend factor for the source color (from the fragment shader).
    pub src_factor: BlendFactor,
    /// The blend factor for the destination color (in the framebuffer).
    pub dst_factor: BlendFactor,
    /// The operation combining the two weighted terms.
    pub operation: BlendOperation,
}

impl BlendComponent {
    /// Source replaces destination.
    pub const REPLACE: Self = Self {
        src_factor: BlendFactor::One,
        dst_factor: BlendFactor::Zero,
        operation: BlendOperation::Add,
    };

    /// Standard non-premultiplied alpha blending.
    pub const ALPHA: Self = Self {
        src_factor: BlendFactor::SrcAlpha,
        dst_factor: BlendFactor::OneMinusSrcAlpha,
        operation: BlendOperation::Add,
    };
}

impl Default for BlendComponent {
    fn default() -> Self {
        Self::REPLACE
    }
}

/// Describes the blend state, with separate color and alpha equations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlendState {
    /// If `false`, source fragments replace the framebuffer contents.
    pub enabled: bool,
    /// The blend equation for the RGB color components.
    pub color: BlendComponent,
    /// The blend equation for the alpha component.
    pub alpha: BlendComponent,
    /// The constant blend color referenced by the `Constant*` factors.
    pub constant: LinearRgba,
}

impl BlendState {
    /// Standard alpha blending on both component groups.
    pub const ALPHA: Self = Self {
        enabled: true,
        color: BlendComponent::ALPHA,
        alpha: BlendComponent::ALPHA,
        constant: LinearRgba::TRANSPARENT,
    };
}

impl Default for BlendState {
    fn default() -> Self {
        Self {
            enabled: false,
            color: BlendComponent::REPLACE,
            alpha: BlendComponent::REPLACE,
            constant: LinearRgba::TRANSPARENT,
        }
    }
}

lucent_bitflags! {
    /// A bitmask to enable or disable writes to individual color channels.
    pub struct ColorWrites: u8 {
        /// Enable writes to the Red channel.
        const R = 0b0001;
        /// Enable writes to the Green channel.
        const G = 0b0010;
        /// Enable writes to the Blue channel.
        const B = 0b0100;
        /// Enable writes to the Alpha channel.
        const A = 0b1000;
        /// Enable writes to all channels.
        const ALL = Self::R.bits() | Self::G.bits() | Self::B.bits() | Self::A.bits();
    }
}

impl Serialize for ColorWrites {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.bits())
    }
}

impl<'de> Deserialize<'de> for ColorWrites {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        u8::deserialize(deserializer).map(Self::from_bits_truncate)
    }
}

/// The complete declarative fixed-function state of a pipeline.
///
/// Copied by value into every pipeline instance. All enum fields must map
/// to a valid native value for the active backend; this is validated when
/// the pipeline is created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineState {
    /// The topology of the primitives.
    pub topology: PrimitiveTopology,
    /// The rasterization mode for polygons.
    pub polygon_mode: PolygonMode,
    /// The face culling mode. `None` disables face culling.
    pub cull_mode: Option<CullMode>,
    /// The vertex winding order that determines the "front" face.
    pub front_face: FrontFace,
    /// Depth test/write/bias/clamp state.
    pub depth: DepthState,
    /// A bitmask controlling which color channels are written to.
    pub color_writes: ColorWrites,
    /// Blending state.
    pub blend: BlendState,
    /// Rasterized line width in pixels. Values above `1.0` are only
    /// supported by the immediate backend.
    pub line_width: f32,
    /// Viewport rectangle; zero-area means dynamic.
    pub viewport: Viewport,
    /// Scissor rectangle; zero-area means dynamic.
    pub scissor: Scissor,
    /// Depth range written by the viewport transform.
    pub depth_range: DepthRange,
}

impl Default for PipelineState {
    fn default() -> Self {
        Self {
            topology: PrimitiveTopology::TriangleList,
            polygon_mode: PolygonMode::Fill,
            cull_mode: Some(CullMode::Back),
            front_face: FrontFace::Ccw,
            depth: DepthState::default(),
            color_writes: ColorWrites::ALL,
            blend: BlendState::default(),
            line_width: 1.0,
            viewport: Viewport::DYNAMIC,
            scissor: Scissor::DYNAMIC,
            depth_range: DepthRange::default(),
        }
    }
}
