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

//! The concrete pipeline flavors.
//!
//! Each flavor pairs a uniform layout (a `#[repr(C)]` Pod struct mirroring
//! the shader-side block), a per-entity payload type, and the draw wiring
//! over the abstract device vocabulary. Flavors own their per-frame uniform
//! rings and reconcile them on resize.

pub mod bloom;
pub mod blur;
pub mod color;
pub mod diffuse;
pub mod raytrace;
pub mod shadow;
pub mod sky;
pub mod sprite;
pub mod text;

pub use bloom::{BloomFlavor, BloomSettings};
pub use blur::{BlurFlavor, BlurSettings};
pub use color::{ColorFlavor, ColorSurface};
pub use diffuse::{DiffuseFlavor, DiffuseLight, DiffuseSurface};
pub use raytrace::{RaytraceFlavor, RaySurface};
pub use shadow::{ShadowCaster, ShadowFlavor};
pub use sky::{SkyDome, SkyFlavor};
pub use sprite::{Sprite, SpriteFlavor};
pub use text::{TextFlavor, TextHandle};

use crate::gpu::{BindingId, DeviceError, Mesh, RenderDevice};

/// The payload of the post-effect flavors: a full-surface quad plus the
/// binding of the texture being post-processed.
#[derive(Debug, Clone, Copy)]
pub struct PostSurface {
    /// The full-surface quad mesh.
    pub mesh: Mesh,
    /// Binding of the source texture + sampler being read.
    pub source: BindingId,
}

impl PostSurface {
    /// Releases the source binding (the mesh is typically shared between
    /// post passes and destroyed by its owner).
    pub fn destroy(self, device: &dyn RenderDevice) -> Result<(), DeviceError> {
        device.destroy_binding(self.source)
    }
}
