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

//! # Lucent Infra
//!
//! Concrete implementations of the engine's external dependencies: the two
//! graphics devices behind [`lucent_core::gpu::RenderDevice`] (the explicit
//! command-buffer model and the immediate state-machine model), the
//! `rusttype`-backed font rasterizer, and a headless window for tests and
//! tools.

#![warn(missing_docs)]

pub mod graphics;
pub mod platform;
pub mod text;

pub use graphics::{create_device, ExplicitDevice, ImmediateDevice};
pub use platform::HeadlessWindow;
pub use text::RusttypeFont;

/// Initializes `env_logger` for binaries and tests. Safe to call more
/// than once; later calls are ignored.
pub fn init_logging() {
    let _ = env_logger::Builder::from_default_env()
        .format_timestamp_millis()
        .try_init();
}
