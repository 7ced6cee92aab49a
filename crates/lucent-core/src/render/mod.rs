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

//! The renderer: pipelines, flavors, cameras, and the scene render pass.

pub mod camera;
pub mod flavors;
pub mod pass;
pub mod pipeline;

pub use camera::{frustum_planes, Camera, FrameData, Projection};
pub use pass::{Render, RenderStats, Renderer, SortMode};
pub use pipeline::{Flavor, Pipeline};
