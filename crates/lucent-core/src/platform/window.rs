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

//! The window/surface collaborator boundary.
//!
//! Window creation, input and the update-loop driver live outside the
//! engine; the renderer only needs the surface size, which backend the
//! surface was created for, and the frame record boundaries.

use crate::gpu::BackendKind;
use crate::math::Extent2D;

/// The surface the engine renders into.
pub trait RenderWindow {
    /// Current framebuffer size in pixels.
    fn framebuffer_size(&self) -> Extent2D;

    /// Which backend the surface was created for. Resolved once at
    /// context creation to pick the device; never re-derived per call.
    fn backend_kind(&self) -> BackendKind;

    /// Marks the beginning of a frame's record window.
    fn begin_frame(&mut self);

    /// Marks the end of a frame's record window (present).
    fn end_frame(&mut self);
}
