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

//! Translation of the declarative state into the immediate backend's
//! native enumeration space (GLenum-style numeric values).

use lucent_core::gpu::{
    BackendKind, BlendFactor, BlendOperation, CompareFunction, CullMode, DeviceError, FrontFace,
    PipelineState, PolygonMode, PrimitiveTopology, ShaderStage,
};

/// Native enumeration values of the immediate API.
pub(crate) mod native {
    pub const POINTS: u32 = 0x0000;
    pub const LINES: u32 = 0x0001;
    pub const LINE_STRIP: u32 = 0x0003;
    pub const TRIANGLES: u32 = 0x0004;
    pub const TRIANGLE_STRIP: u32 = 0x0005;
    pub const TRIANGLE_FAN: u32 = 0x0006;

    pub const POINT: u32 = 0x1B00;
    pub const LINE: u32 = 0x1B01;
    pub const FILL: u32 = 0x1B02;

    pub const FRONT: u32 = 0x0404;
    pub const BACK: u32 = 0x0405;

    pub const CW: u32 = 0x0900;
    pub const CCW: u32 = 0x0901;

    pub const NEVER: u32 = 0x0200;
    pub const LESS: u32 = 0x0201;
    pub const EQUAL: u32 = 0x0202;
    pub const LEQUAL: u32 = 0x0203;
    pub const GREATER: u32 = 0x0204;
    pub const NOTEQUAL: u32 = 0x0205;
    pub const GEQUAL: u32 = 0x0206;
    pub const ALWAYS: u32 = 0x0207;

    pub const ZERO: u32 = 0;
    pub const ONE: u32 = 1;
    pub const SRC_COLOR: u32 = 0x0300;
    pub const ONE_MINUS_SRC_COLOR: u32 = 0x0301;
    pub const SRC_ALPHA: u32 = 0x0302;
    pub const ONE_MINUS_SRC_ALPHA: u32 = 0x0303;
    pub const DST_ALPHA: u32 = 0x0304;
    pub const ONE_MINUS_DST_ALPHA: u32 = 0x0305;
    pub const DST_COLOR: u32 = 0x0306;
    pub const ONE_MINUS_DST_COLOR: u32 = 0x0307;
    pub const CONSTANT_COLOR: u32 = 0x8001;
    pub const ONE_MINUS_CONSTANT_COLOR: u32 = 0x8002;

    pub const FUNC_ADD: u32 = 0x8006;
    pub const MIN: u32 = 0x8007;
    pub const MAX: u32 = 0x8008;
    pub const FUNC_SUBTRACT: u32 = 0x800A;
    pub const FUNC_REVERSE_SUBTRACT: u32 = 0x800B;

    pub const FRAGMENT_SHADER: u32 = 0x8B30;
    pub const VERTEX_SHADER: u32 = 0x8B31;
}

fn unsupported(what: &str) -> DeviceError {
    DeviceError::Unsupported {
        what: what.to_string(),
        backend: BackendKind::Immediate,
    }
}

pub(crate) fn topology(value: PrimitiveTopology) -> u32 {
    match value {
        PrimitiveTopology::PointList => native::POINTS,
        PrimitiveTopology::LineList => native::LINES,
        PrimitiveTopology::LineStrip => native::LINE_STRIP,
        PrimitiveTopology::TriangleList => native::TRIANGLES,
        PrimitiveTopology::TriangleStrip => native::TRIANGLE_STRIP,
        PrimitiveTopology::TriangleFan => native::TRIANGLE_FAN,
    }
}

pub(crate) fn polygon_mode(value: PolygonMode) -> u32 {
    match value {
        PolygonMode::Fill => native::FILL,
        PolygonMode::Line => native::LINE,
        PolygonMode::Point => native::POINT,
    }
}

pub(crate) fn cull_face(value: CullMode) -> u32 {
    match value {
        CullMode::Front => native::FRONT,
        CullMode::Back => native::BACK,
    }
}

pub(crate) fn front_face(value: FrontFace) -> u32 {
    match value {
        FrontFace::Ccw => native::CCW,
        FrontFace::Cw => native::CW,
    }
}

pub(crate) fn depth_func(value: CompareFunction) -> u32 {
    match value {
        CompareFunction::Never => native::NEVER,
        CompareFunction::Less => native::LESS,
        CompareFunction::Equal => native::EQUAL,
        CompareFunction::LessEqual => native::LEQUAL,
        CompareFunction::Greater => native::GREATER,
        CompareFunction::NotEqual => native::NOTEQUAL,
        CompareFunction::GreaterEqual => native::GEQUAL,
        CompareFunction::Always => native::ALWAYS,
    }
}

pub(crate) fn blend_factor(value: BlendFactor) -> u32 {
    match value {
        BlendFactor::Zero => native::ZERO,
        BlendFactor::One => native::ONE,
        BlendFactor::SrcColor => native::SRC_COLOR,
        BlendFactor::OneMinusSrcColor => native::ONE_MINUS_SRC_COLOR,
        BlendFactor::SrcAlpha => native::SRC_ALPHA,
        BlendFactor::OneMinusSrcAlpha => native::ONE_MINUS_SRC_ALPHA,
        BlendFactor::DstColor => native::DST_COLOR,
        BlendFactor::OneMinusDstColor => native::ONE_MINUS_DST_COLOR,
        BlendFactor::DstAlpha => native::DST_ALPHA,
        BlendFactor::OneMinusDstAlpha => native::ONE_MINUS_DST_ALPHA,
        BlendFactor::ConstantColor => native::CONSTANT_COLOR,
        BlendFactor::OneMinusConstantColor => native::ONE_MINUS_CONSTANT_COLOR,
    }
}

pub(crate) fn blend_equation(value: BlendOperation) -> u32 {
    match value {
        BlendOperation::Add => native::FUNC_ADD,
        BlendOperation::Subtract => native::FUNC_SUBTRACT,
        BlendOperation::ReverseSubtract => native::FUNC_REVERSE_SUBTRACT,
        BlendOperation::Min => native::MIN,
        BlendOperation::Max => native::MAX,
    }
}

pub(crate) fn shader_type(value: ShaderStage) -> Result<u32, DeviceError> {
    match value {
        ShaderStage::Vertex => Ok(native::VERTEX_SHADER),
        ShaderStage::Fragment => Ok(native::FRAGMENT_SHADER),
        ShaderStage::RayGeneration | ShaderStage::RayMiss | ShaderStage::RayClosestHit => {
            Err(unsupported("ray-tracing shader stages"))
        }
    }
}

/// The complete bound-state values a program applies when bound.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct NativeProgramState {
    pub topology: u32,
    pub polygon_mode: u32,
    /// `None` leaves face culling disabled.
    pub cull_face: Option<u32>,
    pub front_face: u32,
    pub depth_test: bool,
    pub depth_mask: bool,
    pub depth_func: u32,
    pub depth_clamp: bool,
    /// `glPolygonOffset(factor, units)` when biasing is on.
    pub polygon_offset: Option<(f32, f32)>,
    pub blend: bool,
    pub blend_src_rgb: u32,
    pub blend_dst_rgb: u32,
    pub blend_equation_rgb: u32,
    pub blend_src_alpha: u32,
    pub blend_dst_alpha: u32,
    pub blend_equation_alpha: u32,
    pub blend_color: [f32; 4],
    pub color_mask: [bool; 4],
    pub line_width: f32,
    pub depth_range: (f32, f32),
}

/// Validates and translates a whole [`PipelineState`].
pub(crate) fn program_state(state: &PipelineState) -> Result<NativeProgramState, DeviceError> {
    if state.depth.bias.clamp != 0.0 {
        // Polygon-offset clamping needs an extension the immediate
        // backend does not require.
        return Err(unsupported("depth bias clamping"));
    }

    Ok(NativeProgramState {
        topology: topology(state.topology),
        polygon_mode: polygon_mode(state.polygon_mode),
        cull_face: state.cull_mode.map(cull_face),
        front_face: front_face(state.front_face),
        depth_test: state.depth.test_enabled,
        depth_mask: state.depth.write_enabled,
        depth_func: depth_func(state.depth.compare),
        depth_clamp: state.depth.clamp_enabled,
        polygon_offset: state
            .depth
            .bias
            .is_enabled()
            .then(|| (state.depth.bias.slope_scale, state.depth.bias.constant)),
        blend: state.blend.enabled,
        blend_src_rgb: blend_factor(state.blend.color.src_factor),
        blend_dst_rgb: blend_factor(state.blend.color.dst_factor),
        blend_equation_rgb: blend_equation(state.blend.color.operation),
        blend_src_alpha: blend_factor(state.blend.alpha.src_factor),
        blend_dst_alpha: blend_factor(state.blend.alpha.dst_factor),
        blend_equation_alpha: blend_equation(state.blend.alpha.operation),
        blend_color: [
            state.blend.constant.r,
            state.blend.constant.g,
            state.blend.constant.b,
            state.blend.constant.a,
        ],
        color_mask: [
            state.color_writes.contains(lucent_core::gpu::ColorWrites::R),
            state.color_writes.contains(lucent_core::gpu::ColorWrites::G),
            state.color_writes.contains(lucent_core::gpu::ColorWrites::B),
            state.color_writes.contains(lucent_core::gpu::ColorWrites::A),
        ],
        line_width: state.line_width,
        depth_range: (state.depth_range.min, state.depth_range.max),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use lucent_core::gpu::DepthBias;

    #[test]
    fn test_triangle_fan_is_native_here() {
        assert_eq!(
            topology(PrimitiveTopology::TriangleFan),
            native::TRIANGLE_FAN
        );
    }

    #[test]
    fn test_ray_stages_are_rejected() {
        assert!(shader_type(ShaderStage::Vertex).is_ok());
        assert!(shader_type(ShaderStage::Fragment).is_ok());
        for stage in [
            ShaderStage::RayGeneration,
            ShaderStage::RayMiss,
            ShaderStage::RayClosestHit,
        ] {
            assert!(matches!(
                shader_type(stage),
                Err(DeviceError::Unsupported {
                    backend: BackendKind::Immediate,
                    ..
                })
            ));
        }
    }

    #[test]
    fn test_bias_clamp_is_rejected() {
        let mut state = PipelineState::default();
        state.depth.bias = DepthBias {
            constant: 1.0,
            slope_scale: 1.0,
            clamp: 0.5,
        };
        assert!(program_state(&state).is_err());
    }

    #[test]
    fn test_wide_lines_are_native_here() {
        let state = PipelineState {
            line_width: 4.0,
            ..PipelineState::default()
        };
        assert_eq!(program_state(&state).unwrap().line_width, 4.0);
    }

    #[test]
    fn test_default_state_translates() {
        let native_state = program_state(&PipelineState::default()).unwrap();
        assert_eq!(native_state.topology, native::TRIANGLES);
        assert_eq!(native_state.cull_face, Some(native::BACK));
        assert_eq!(native_state.depth_func, native::LESS);
        assert_eq!(native_state.color_mask, [true; 4]);
        assert!(native_state.polygon_offset.is_none());
    }
}
