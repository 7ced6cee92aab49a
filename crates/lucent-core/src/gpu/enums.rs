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

//! Enums for declarative pipeline configuration.
//!
//! Every variant here is abstract; each backend owns a translation table
//! into its native enumeration space, and pipeline creation is where a
//! variant with no native mapping surfaces as
//! [`DeviceError::Unsupported`](super::DeviceError::Unsupported).

use serde::{Deserialize, Serialize};

/// Identifies which of the two backend programming models a device
/// implements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BackendKind {
    /// The explicit model: command buffers, descriptor sets, pipeline
    /// layouts, multiple frames in flight.
    Explicit,
    /// The immediate model: a global bound-state machine, one frame at a
    /// time.
    Immediate,
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendKind::Explicit => write!(f, "explicit"),
            BackendKind::Immediate => write!(f, "immediate"),
        }
    }
}

/// The normalized-device-coordinate depth range a backend's clip space uses.
///
/// Frustum-plane extraction must match this convention exactly; using the
/// wrong one silently produces an incorrect culling frustum rather than an
/// error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DepthConvention {
    /// Depth maps to `[0, 1]` (the explicit backend).
    ZeroToOne,
    /// Depth maps to `[-1, 1]` (the immediate backend).
    NegativeOneToOne,
}

/// Defines how vertices are connected to form a geometric primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrimitiveTopology {
    /// Vertices are rendered as a list of isolated points.
    PointList,
    /// Vertices are rendered as a list of isolated lines.
    LineList,
    /// Vertices are rendered as a connected line strip.
    LineStrip,
    /// Every three vertices form an isolated triangle.
    TriangleList,
    /// Vertices are rendered as a connected triangle strip.
    TriangleStrip,
    /// A fan of triangles sharing the first vertex. Only the immediate
    /// backend supports this topology.
    TriangleFan,
}

/// Defines which face of a triangle to cull (not render).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CullMode {
    /// Cull front-facing triangles.
    Front,
    /// Cull back-facing triangles.
    Back,
}

/// Defines which vertex winding order considers a triangle "front-facing".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FrontFace {
    /// Counter-clockwise winding order is the front face.
    Ccw,
    /// Clockwise winding order is the front face.
    Cw,
}

/// Defines how polygons are rasterized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PolygonMode {
    /// Polygons are filled. This is the normal rendering mode.
    Fill,
    /// Polygons are rendered as outlines (wireframe).
    Line,
    /// Polygon vertices are rendered as points.
    Point,
}

/// The comparison function used for depth testing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CompareFunction {
    /// The test never passes.
    Never,
    /// The test passes if the new value is less than the existing value.
    #[default]
    Less,
    /// The test passes if the new value is equal to the existing value.
    Equal,
    /// The test passes if the new value is less than or equal.
    LessEqual,
    /// The test passes if the new value is greater.
    Greater,
    /// The test passes if the new value is not equal.
    NotEqual,
    /// The test passes if the new value is greater than or equal.
    GreaterEqual,
    /// The test always passes.
    Always,
}

/// A factor in a blend equation, determining how much a source or
/// destination color contributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlendFactor {
    /// The factor is `0.0`.
    Zero,
    /// The factor is `1.0`.
    One,
    /// The factor is the source color.
    SrcColor,
    /// The factor is `1.0 - src`.
    OneMinusSrcColor,
    /// The factor is the source alpha component.
    SrcAlpha,
    /// The factor is `1.0 - src.a`.
    OneMinusSrcAlpha,
    /// The factor is the destination color.
    DstColor,
    /// The factor is `1.0 - dst`.
    OneMinusDstColor,
    /// The factor is the destination alpha component.
    DstAlpha,
    /// The factor is `1.0 - dst.a`.
    OneMinusDstAlpha,
    /// The factor is the constant blend color.
    ConstantColor,
    /// The factor is `1.0 - constant`.
    OneMinusConstantColor,
}

/// The operation used to combine source and destination colors in a blend
/// equation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BlendOperation {
    /// The result is `source + destination`.
    #[default]
    Add,
    /// The result is `source - destination`.
    Subtract,
    /// The result is `destination - source`.
    ReverseSubtract,
    /// The result is `min(source, destination)`.
    Min,
    /// The result is `max(source, destination)`.
    Max,
}
