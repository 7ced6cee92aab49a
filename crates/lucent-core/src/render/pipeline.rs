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

//! The pipeline abstraction: one creation/bind/resize/destroy contract
//! regardless of backend.
//!
//! A pipeline's *flavor* — its uniform layout, per-entity payload type and
//! draw logic — is a static type parameter, so the flavor in effect at a
//! call site is known at compile time. There is no runtime tag to compare
//! and no opaque-handle downcast.
//!
//! Lifecycle: created once per visual style, resized whenever the output
//! surface or the frames-in-flight count changes, and destroyed exactly
//! once. `destroy` consumes the pipeline by value, so a second destroy does
//! not typecheck; no operation is reachable after it.

use crate::gpu::{
    DeviceError, PipelineDescriptor, PipelineId, PipelineState, RenderDevice, Scissor, ShaderId,
    VertexLayout, Viewport,
};
use crate::math::{Extent2D, Mat4};
use std::sync::Arc;

/// A concrete pipeline specialization.
///
/// `on_bind` is optional (the default is a no-op); `on_resize` and
/// `on_destroy` are deliberately not defaulted — every flavor owns
/// per-frame GPU resources that must react to a resize and must be freed.
pub trait Flavor: Send {
    /// The per-entity payload carried by each [`Render`](super::Render) of
    /// a renderer using this flavor.
    type Payload: Send + Sync;

    /// Called once per draw batch right after the backend bind, giving the
    /// flavor a chance to attach frame-level bindings.
    fn on_bind(&mut self, device: &dyn RenderDevice) -> Result<(), DeviceError> {
        let _ = device;
        Ok(())
    }

    /// Sets per-object uniforms and issues the payload's draw.
    ///
    /// Returns the number of indices drawn; 0 means nothing was actually
    /// rendered (e.g. empty text).
    fn draw(
        &mut self,
        device: &dyn RenderDevice,
        pipeline: PipelineId,
        payload: &Self::Payload,
        model: &Mat4,
        view_projection: &Mat4,
    ) -> u32;

    /// Reconciles the flavor's per-frame resources after the surface size
    /// or the frames-in-flight count changed.
    fn on_resize(
        &mut self,
        device: &dyn RenderDevice,
        size: Extent2D,
        frame_count: usize,
    ) -> Result<(), DeviceError>;

    /// Frees every GPU resource the flavor owns.
    fn on_destroy(&mut self, device: &dyn RenderDevice);
}

/// A pipeline: the backend handle, the shaders it links, its declarative
/// state, and its flavor.
///
/// Pipelines are exclusively owned by the subsystem that created them
/// (typically application code). Renderers borrow the pipeline for the
/// duration of one render pass.
#[derive(Debug)]
pub struct Pipeline<F: Flavor> {
    device: Arc<dyn RenderDevice>,
    id: PipelineId,
    shaders: Vec<ShaderId>,
    state: PipelineState,
    label: String,
    /// Effective rectangles, tracking the surface when declared dynamic.
    viewport: Viewport,
    scissor: Scissor,
    flavor: F,
}

impl<F: Flavor> Pipeline<F> {
    /// Creates a pipeline on `device`.
    ///
    /// The declarative `state` is validated against the backend here; this
    /// is where unsupported-feature errors originate. On failure the device
    /// unwinds everything it allocated and no pipeline exists.
    ///
    /// # Panics
    ///
    /// Panics if `shaders` is empty; a pipeline with no shader stages is a
    /// programming error, not a runtime condition.
    pub fn new(
        device: Arc<dyn RenderDevice>,
        label: impl Into<String>,
        state: PipelineState,
        vertex_layout: VertexLayout,
        shaders: Vec<ShaderId>,
        surface: Extent2D,
        flavor: F,
    ) -> Result<Self, DeviceError> {
        assert!(
            !shaders.is_empty(),
            "a pipeline requires at least one shader stage"
        );
        let label = label.into();

        let id = device.create_pipeline(&PipelineDescriptor {
            label: &label,
            shaders: &shaders,
            state: &state,
            vertex_layout: &vertex_layout,
        })?;

        let viewport = if state.viewport.is_dynamic() {
            full_surface_viewport(surface)
        } else {
            state.viewport
        };
        let scissor = if state.scissor.is_dynamic() {
            full_surface_scissor(surface)
        } else {
            state.scissor
        };

        Ok(Self {
            device,
            id,
            shaders,
            state,
            label,
            viewport,
            scissor,
            flavor,
        })
    }

    /// Binds the pipeline for one draw batch.
    ///
    /// The render pass calls this at most once per batch, before issuing
    /// all of the batch's draws.
    pub fn bind(&mut self) -> Result<(), DeviceError> {
        self.device
            .bind_pipeline(self.id, self.viewport, self.scissor)?;
        self.flavor.on_bind(self.device.as_ref())
    }

    /// Reacts to an output-surface change (size and/or frames-in-flight
    /// count).
    ///
    /// Rectangles declared dynamic (zero-area) at creation track the new
    /// surface; rectangles declared fixed are never auto-updated. The
    /// flavor then reconciles its per-frame resource arrays against the
    /// device's current frame count.
    pub fn resize(&mut self, size: Extent2D) -> Result<(), DeviceError> {
        if self.state.viewport.is_dynamic() {
            self.viewport = full_surface_viewport(size);
        }
        if self.state.scissor.is_dynamic() {
            self.scissor = full_surface_scissor(size);
        }
        self.flavor
            .on_resize(self.device.as_ref(), size, self.device.frame_count())
    }

    /// Sets per-object uniforms and draws one payload through the flavor.
    ///
    /// Returns the number of indices drawn (0 when nothing was rendered).
    pub fn draw_payload(&mut self, payload: &F::Payload, model: &Mat4, view_projection: &Mat4) -> u32 {
        self.flavor
            .draw(self.device.as_ref(), self.id, payload, model, view_projection)
    }

    /// Destroys the pipeline, consuming it.
    ///
    /// The flavor frees its opaque per-flavor resources first, then the
    /// backend objects are released. When `destroy_shaders` is set the
    /// owned shader modules are destroyed as well.
    pub fn destroy(mut self, destroy_shaders: bool) {
        self.flavor.on_destroy(self.device.as_ref());
        if let Err(e) = self.device.destroy_pipeline(self.id) {
            log::warn!("Pipeline({}): failed to destroy pipeline: {e:?}", self.label);
        }
        if destroy_shaders {
            for shader in &self.shaders {
                if let Err(e) = self.device.destroy_shader(*shader) {
                    log::warn!("Pipeline({}): failed to destroy shader: {e:?}", self.label);
                }
            }
        }
    }

    /// The device this pipeline was created on.
    pub fn device(&self) -> &Arc<dyn RenderDevice> {
        &self.device
    }

    /// The backend pipeline handle.
    pub fn id(&self) -> PipelineId {
        self.id
    }

    /// The display name.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The declarative state the pipeline was created with.
    pub fn state(&self) -> &PipelineState {
        &self.state
    }

    /// The effective viewport rectangle for the next bind.
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// The effective scissor rectangle for the next bind.
    pub fn scissor(&self) -> Scissor {
        self.scissor
    }

    /// Shared access to the flavor.
    pub fn flavor(&self) -> &F {
        &self.flavor
    }

    /// Exclusive access to the flavor (e.g. to update flavor-level
    /// uniforms such as light parameters).
    pub fn flavor_mut(&mut self) -> &mut F {
        &mut self.flavor
    }
}

fn full_surface_viewport(size: Extent2D) -> Viewport {
    Viewport::new(0.0, 0.0, size.width as f32, size.height as f32)
}

fn full_surface_scissor(size: Extent2D) -> Scissor {
    Scissor::new(0, 0, size.width, size.height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gpu::testing::MockDevice;
    use crate::gpu::{Mesh, ShaderId};

    /// A flavor with no GPU state of its own.
    struct NullFlavor;

    impl Flavor for NullFlavor {
        type Payload = Mesh;

        fn draw(
            &mut self,
            device: &dyn RenderDevice,
            pipeline: PipelineId,
            payload: &Mesh,
            _model: &Mat4,
            _view_projection: &Mat4,
        ) -> u32 {
            device.draw_mesh(pipeline, payload)
        }

        fn on_resize(
            &mut self,
            _device: &dyn RenderDevice,
            _size: Extent2D,
            _frame_count: usize,
        ) -> Result<(), DeviceError> {
            Ok(())
        }

        fn on_destroy(&mut self, _device: &dyn RenderDevice) {}
    }

    fn surface() -> Extent2D {
        Extent2D::new(800, 600)
    }

    fn make_pipeline(device: Arc<MockDevice>, state: PipelineState) -> Pipeline<NullFlavor> {
        Pipeline::new(
            device,
            "test",
            state,
            VertexLayout::default(),
            vec![ShaderId(1)],
            surface(),
            NullFlavor,
        )
        .unwrap()
    }

    #[test]
    fn test_dynamic_viewport_tracks_resize() {
        let device = Arc::new(MockDevice::new(2));
        let mut pipeline = make_pipeline(device, PipelineState::default());
        assert_eq!(pipeline.viewport(), Viewport::new(0.0, 0.0, 800.0, 600.0));

        pipeline.resize(Extent2D::new(1024, 768)).unwrap();
        assert_eq!(pipeline.viewport(), Viewport::new(0.0, 0.0, 1024.0, 768.0));
        assert_eq!(pipeline.scissor(), Scissor::new(0, 0, 1024, 768));
    }

    #[test]
    fn test_fixed_viewport_is_never_auto_updated() {
        let device = Arc::new(MockDevice::new(2));
        let fixed = Viewport::new(10.0, 10.0, 320.0, 200.0);
        let state = PipelineState {
            viewport: fixed,
            scissor: Scissor::new(10, 10, 320, 200),
            ..PipelineState::default()
        };
        let mut pipeline = make_pipeline(device, state);

        pipeline.resize(Extent2D::new(1920, 1080)).unwrap();
        assert_eq!(pipeline.viewport(), fixed);
        assert_eq!(pipeline.scissor(), Scissor::new(10, 10, 320, 200));
    }

    #[test]
    fn test_bind_reaches_the_device_once() {
        let device = Arc::new(MockDevice::new(2));
        let mut pipeline = make_pipeline(device.clone(), PipelineState::default());
        pipeline.bind().unwrap();
        assert_eq!(device.stats().pipeline_binds, 1);
    }

    #[test]
    fn test_destroy_releases_backend_objects_and_optionally_shaders() {
        let device = Arc::new(MockDevice::new(2));
        let pipeline = make_pipeline(device.clone(), PipelineState::default());
        device.clear_ops();
        pipeline.destroy(true);

        let ops = device.ops();
        assert!(ops.iter().any(|op| op.starts_with("destroy_pipeline")));
        assert!(ops.iter().any(|op| op.starts_with("destroy_shader")));
    }

    #[test]
    #[should_panic(expected = "at least one shader")]
    fn test_creating_with_no_shaders_is_a_programming_error() {
        let device: Arc<dyn RenderDevice> = Arc::new(MockDevice::new(2));
        let _ = Pipeline::new(
            device,
            "empty",
            PipelineState::default(),
            VertexLayout::default(),
            Vec::new(),
            surface(),
            NullFlavor,
        );
    }
}
