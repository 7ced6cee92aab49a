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

//! Translation of the declarative state into the explicit backend's
//! native enumeration space (Vulkan-style numeric values).
//!
//! Every conversion that can fail returns
//! [`DeviceError::Unsupported`]; pipeline creation is the only caller, so
//! unsupported state never survives past creation.

use lucent_core::gpu::{
    BackendKind, BlendFactor, BlendOperation, ColorWrites, CompareFunction, CullMode, DeviceError,
    FrontFace, PipelineState, PolygonMode, PrimitiveTopology, ShaderStage,
};

/// Native enumeration values of the explicit API.
pub(crate) mod native {
    pub const PRIMITIVE_TOPOLOGY_POINT_LIST: i32 = 0;
    pub const PRIMITIVE_TOPOLOGY_LINE_LIST: i32 = 1;
    pub const PRIMITIVE_TOPOLOGY_LINE_STRIP: i32 = 2;
    pub const PRIMITIVE_TOPOLOGY_TRIANGLE_LIST: i32 = 3;
    pub const PRIMITIVE_TOPOLOGY_TRIANGLE_STRIP: i32 = 4;

    pub const POLYGON_MODE_FILL: i32 = 0;
    pub const POLYGON_MODE_LINE: i32 = 1;
    pub const POLYGON_MODE_POINT: i32 = 2;

    pub const CULL_MODE_NONE: u32 = 0;
    pub const CULL_MODE_FRONT_BIT: u32 = 0x1;
    pub const CULL_MODE_BACK_BIT: u32 = 0x2;

    pub const FRONT_FACE_COUNTER_CLOCKWISE: i32 = 0;
    pub const FRONT_FACE_CLOCKWISE: i32 = 1;

    pub const COMPARE_OP_NEVER: i32 = 0;
    pub const COMPARE_OP_LESS: i32 = 1;
    pub const COMPARE_OP_EQUAL: i32 = 2;
    pub const COMPARE_OP_LESS_OR_EQUAL: i32 = 3;
    pub const COMPARE_OP_GREATER: i32 = 4;
    pub const COMPARE_OP_NOT_EQUAL: i32 = 5;
    pub const COMPARE_OP_GREATER_OR_EQUAL: i32 = 6;
    pub const COMPARE_OP_ALWAYS: i32 = 7;

    pub const BLEND_FACTOR_ZERO: i32 = 0;
    pub const BLEND_FACTOR_ONE: i32 = 1;
    pub const BLEND_FACTOR_SRC_COLOR: i32 = 2;
    pub const BLEND_FACTOR_ONE_MINUS_SRC_COLOR: i32 = 3;
    pub const BLEND_FACTOR_DST_COLOR: i32 = 4;
    pub const BLEND_FACTOR_ONE_MINUS_DST_COLOR: i32 = 5;
    pub const BLEND_FACTOR_SRC_ALPHA: i32 = 6;
    pub const BLEND_FACTOR_ONE_MINUS_SRC_ALPHA: i32 = 7;
    pub const BLEND_FACTOR_DST_ALPHA: i32 = 8;
    pub const BLEND_FACTOR_ONE_MINUS_DST_ALPHA: i32 = 9;
    pub const BLEND_FACTOR_CONSTANT_COLOR: i32 = 10;
    pub const BLEND_FACTOR_ONE_MINUS_CONSTANT_COLOR: i32 = 11;

    pub const BLEND_OP_ADD: i32 = 0;
    pub const BLEND_OP_SUBTRACT: i32 = 1;
    pub const BLEND_OP_REVERSE_SUBTRACT: i32 = 2;
    pub const BLEND_OP_MIN: i32 = 3;
    pub const BLEND_OP_MAX: i32 = 4;

    pub const SHADER_STAGE_VERTEX_BIT: u32 = 0x0000_0001;
    pub const SHADER_STAGE_FRAGMENT_BIT: u32 = 0x0000_0010;
    pub const SHADER_STAGE_RAYGEN_BIT: u32 = 0x0000_0100;
    pub const SHADER_STAGE_CLOSEST_HIT_BIT: u32 = 0x0000_0400;
    pub const SHADER_STAGE_MISS_BIT: u32 = 0x0000_0800;
}

fn unsupported(what: &str) -> DeviceError {
    DeviceError::Unsupported {
        what: what.to_string(),
        backend: BackendKind::Explicit,
    }
}

pub(crate) fn topology(value: PrimitiveTopology) -> Result<i32, DeviceError> {
    match value {
        PrimitiveTopology::PointList => Ok(native::PRIMITIVE_TOPOLOGY_POINT_LIST),
        PrimitiveTopology::LineList => Ok(native::PRIMITIVE_TOPOLOGY_LINE_LIST),
        PrimitiveTopology::LineStrip => Ok(native::PRIMITIVE_TOPOLOGY_LINE_STRIP),
        PrimitiveTopology::TriangleList => Ok(native::PRIMITIVE_TOPOLOGY_TRIANGLE_LIST),
        PrimitiveTopology::TriangleStrip => Ok(native::PRIMITIVE_TOPOLOGY_TRIANGLE_STRIP),
        PrimitiveTopology::TriangleFan => Err(unsupported("triangle-fan topology")),
    }
}

pub(crate) fn polygon_mode(value: PolygonMode) -> i32 {
    match value {
        PolygonMode::Fill => native::POLYGON_MODE_FILL,
        PolygonMode::Line => native::POLYGON_MODE_LINE,
        PolygonMode::Point => native::POLYGON_MODE_POINT,
    }
}

pub(crate) fn cull_mode(value: Option<CullMode>) -> u32 {
    match value {
        None => native::CULL_MODE_NONE,
        Some(CullMode::Front) => native::CULL_MODE_FRONT_BIT,
        Some(CullMode::Back) => native::CULL_MODE_BACK_BIT,
    }
}

pub(crate) fn front_face(value: FrontFace) -> i32 {
    match value {
        FrontFace::Ccw => native::FRONT_FACE_COUNTER_CLOCKWISE,
        FrontFace::Cw => native::FRONT_FACE_CLOCKWISE,
    }
}

pub(crate) fn compare_op(value: CompareFunction) -> i32 {
    match value {
        CompareFunction::Never => native::COMPARE_OP_NEVER,
        CompareFunction::Less => native::COMPARE_OP_LESS,
        CompareFunction::Equal => native::COMPARE_OP_EQUAL,
        CompareFunction::LessEqual => native::COMPARE_OP_LESS_OR_EQUAL,
        CompareFunction::Greater => native::COMPARE_OP_GREATER,
        CompareFunction::NotEqual => native::COMPARE_OP_NOT_EQUAL,
        CompareFunction::GreaterEqual => native::COMPARE_OP_GREATER_OR_EQUAL,
        CompareFunction::Always => native::COMPARE_OP_ALWAYS,
    }
}

pub(crate) fn blend_factor(value: BlendFactor) -> i32 {
    match value {
        BlendFactor::Zero => native::BLEND_FACTOR_ZERO,
        BlendFactor::One => native::BLEND_FACTOR_ONE,
        BlendFactor::SrcColor => native::BLEND_FACTOR_SRC_COLOR,
        BlendFactor::OneMinusSrcColor => native::BLEND_FACTOR_ONE_MINUS_SRC_COLOR,
        BlendFactor::DstColor => native::BLEND_FACTOR_DST_COLOR,
        BlendFactor::OneMinusDstColor => native::BLEND_FACTOR_ONE_MINUS_DST_COLOR,
        BlendFactor::SrcAlpha => native::BLEND_FACTOR_SRC_ALPHA,
        BlendFactor::OneMinusSrcAlpha => native::BLEND_FACTOR_ONE_MINUS_SRC_ALPHA,
        BlendFactor::DstAlpha => native::BLEND_FACTOR_DST_ALPHA,
        BlendFactor::OneMinusDstAlpha => native::BLEND_FACTOR_ONE_MINUS_DST_ALPHA,
        BlendFactor::ConstantColor => native::BLEND_FACTOR_CONSTANT_COLOR,
        BlendFactor::OneMinusConstantColor => native::BLEND_FACTOR_ONE_MINUS_CONSTANT_COLOR,
    }
}

pub(crate) fn blend_op(value: BlendOperation) -> i32 {
    match value {
        BlendOperation::Add => native::BLEND_OP_ADD,
        BlendOperation::Subtract => native::BLEND_OP_SUBTRACT,
        BlendOperation::ReverseSubtract => native::BLEND_OP_REVERSE_SUBTRACT,
        BlendOperation::Min => native::BLEND_OP_MIN,
        BlendOperation::Max => native::BLEND_OP_MAX,
    }
}

pub(crate) fn shader_stage(value: ShaderStage) -> u32 {
    match value {
        ShaderStage::Vertex => native::SHADER_STAGE_VERTEX_BIT,
        ShaderStage::Fragment => native::SHADER_STAGE_FRAGMENT_BIT,
        ShaderStage::RayGeneration => native::SHADER_STAGE_RAYGEN_BIT,
        ShaderStage::RayMiss => native::SHADER_STAGE_MISS_BIT,
        ShaderStage::RayClosestHit => native::SHADER_STAGE_CLOSEST_HIT_BIT,
    }
}

/// The color-write mask uses the same bit layout natively.
pub(crate) fn color_write_mask(value: ColorWrites) -> u32 {
    value.bits() as u32
}

/// The fully translated fixed-function state of one pipeline.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct NativePipelineState {
    pub topology: i32,
    pub polygon_mode: i32,
    pub cull_mode: u32,
    pub front_face: i32,
    pub depth_test: bool,
    pub depth_write: bool,
    pub depth_compare: i32,
    pub depth_clamp: bool,
    pub depth_bias: (f32, f32, f32),
    pub color_write_mask: u32,
    pub blend_enabled: bool,
    pub color_blend: (i32, i32, i32),
    pub alpha_blend: (i32, i32, i32),
    pub blend_constant: [f32; 4],
    pub line_width: f32,
}

impl NativePipelineState {
    /// One-line summary of the translated values, for creation logs.
    pub(crate) fn describe(&self) -> String {
        format!(
            "topology {} polygon {} cull {:#x} front {} \
             depth(test:{} write:{} op:{} clamp:{} bias:{:?}) \
             mask {:#x} blend(enabled:{} rgb:{:?} alpha:{:?} constant:{:?}) \
             line-width {}",
            self.topology,
            self.polygon_mode,
            self.cull_mode,
            self.front_face,
            self.depth_test,
            self.depth_write,
            self.depth_compare,
            self.depth_clamp,
            self.depth_bias,
            self.color_write_mask,
            self.blend_enabled,
            self.color_blend,
            self.alpha_blend,
            self.blend_constant,
            self.line_width,
        )
    }
}

/// Validates and translates a whole [`PipelineState`].
pub(crate) fn pipeline_state(state: &PipelineState) -> Result<NativePipelineState, DeviceError> {
    if state.line_width > 1.0 {
        // Wide rasterized lines are an optional feature the explicit
        // backend does not enable.
        return Err(unsupported("line widths above 1.0"));
    }

    Ok(NativePipelineState {
        topology: topology(state.topology)?,
        polygon_mode: polygon_mode(state.polygon_mode),
        cull_mode: cull_mode(state.cull_mode),
        front_face: front_face(state.front_face),
        depth_test: state.depth.test_enabled,
        depth_write: state.depth.write_enabled,
        depth_compare: compare_op(state.depth.compare),
        depth_clamp: state.depth.clamp_enabled,
        depth_bias: (
            state.depth.bias.constant,
            state.depth.bias.slope_scale,
            state.depth.bias.clamp,
        ),
        color_write_mask: color_write_mask(state.color_writes),
        blend_enabled: state.blend.enabled,
        color_blend: (
            blend_factor(state.blend.color.src_factor),
            blend_factor(state.blend.color.dst_factor),
            blend_op(state.blend.color.operation),
        ),
        alpha_blend: (
            blend_factor(state.blend.alpha.src_factor),
            blend_factor(state.blend.alpha.dst_factor),
            blend_op(state.blend.alpha.operation),
        ),
        blend_constant: [
            state.blend.constant.r,
            state.blend.constant.g,
            state.blend.constant.b,
            state.blend.constant.a,
        ],
        line_width: state.line_width,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_state_translates() {
        let native = pipeline_state(&PipelineState::default()).unwrap();
        assert_eq!(native.topology, native::PRIMITIVE_TOPOLOGY_TRIANGLE_LIST);
        assert_eq!(native.cull_mode, native::CULL_MODE_BACK_BIT);
        assert_eq!(native.depth_compare, native::COMPARE_OP_LESS);
        assert_eq!(native.color_write_mask, 0xF);
    }

    #[test]
    fn test_triangle_fan_is_rejected() {
        let state = PipelineState {
            topology: PrimitiveTopology::TriangleFan,
            ..PipelineState::default()
        };
        let err = pipeline_state(&state).unwrap_err();
        assert!(matches!(
            err,
            DeviceError::Unsupported {
                backend: BackendKind::Explicit,
                ..
            }
        ));
    }

    #[test]
    fn test_wide_lines_are_rejected() {
        let state = PipelineState {
            line_width: 2.0,
            ..PipelineState::default()
        };
        assert!(pipeline_state(&state).is_err());
    }

    #[test]
    fn test_stage_bits_are_distinct() {
        let stages = [
            ShaderStage::Vertex,
            ShaderStage::Fragment,
            ShaderStage::RayGeneration,
            ShaderStage::RayMiss,
            ShaderStage::RayClosestHit,
        ];
        let mut seen = 0u32;
        for stage in stages {
            let bit = shader_stage(stage);
            assert_eq!(seen & bit, 0);
            seen |= bit;
        }
    }
}
