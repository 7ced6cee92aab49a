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

//! # Lucent Core
//!
//! Foundational crate of the lucent rendering engine: math primitives, the
//! graphics-API-agnostic rendering vocabulary, the scene renderer
//! (cull/sort/draw), the pipeline abstraction with its concrete flavors,
//! and the text layout subsystem.
//!
//! Backend implementations of the [`gpu::RenderDevice`] trait live in the
//! `lucent-infra` crate; everything in this crate speaks only the abstract
//! vocabulary.

#![warn(missing_docs)]

pub mod gpu;
pub mod math;
pub mod platform;
pub mod render;
pub mod scene;
pub mod text;
pub mod utils;

pub use gpu::{DeviceError, RenderDevice};
pub use render::{Pipeline, RenderStats, Renderer, SortMode};
