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

//! A headless window for tests and tools.

use lucent_core::gpu::BackendKind;
use lucent_core::math::Extent2D;
use lucent_core::platform::RenderWindow;

/// A surface that exists only in memory. Useful for driving the renderer
/// in tests and offscreen tools where no real windowing system is wanted.
#[derive(Debug)]
pub struct HeadlessWindow {
    size: Extent2D,
    kind: BackendKind,
    frame_open: bool,
    frames_presented: u64,
}

impl HeadlessWindow {
    /// Creates a headless surface of the given size for the given backend.
    pub fn new(size: Extent2D, kind: BackendKind) -> Self {
        Self {
            size,
            kind,
            frame_open: false,
            frames_presented: 0,
        }
    }

    /// Simulates a platform resize.
    pub fn resize(&mut self, size: Extent2D) {
        self.size = size;
    }

    /// Number of frames presented so far.
    pub fn frames_presented(&self) -> u64 {
        self.frames_presented
    }

    /// Whether a frame record window is currently open.
    pub fn is_frame_open(&self) -> bool {
        self.frame_open
    }
}

impl RenderWindow for HeadlessWindow {
    fn framebuffer_size(&self) -> Extent2D {
        self.size
    }

    fn backend_kind(&self) -> BackendKind {
        self.kind
    }

    fn begin_frame(&mut self) {
        self.frame_open = true;
    }

    fn end_frame(&mut self) {
        if self.frame_open {
            self.frame_open = false;
            self.frames_presented += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_boundaries() {
        let mut window = HeadlessWindow::new(Extent2D::new(640, 480), BackendKind::Immediate);
        assert!(!window.is_frame_open());
        window.begin_frame();
        assert!(window.is_frame_open());
        window.end_frame();
        assert_eq!(window.frames_presented(), 1);

        // An end without a begin presents nothing.
        window.end_frame();
        assert_eq!(window.frames_presented(), 1);
    }

    #[test]
    fn test_resize_updates_framebuffer_size() {
        let mut window = HeadlessWindow::new(Extent2D::new(640, 480), BackendKind::Explicit);
        window.resize(Extent2D::new(1920, 1080));
        assert_eq!(window.framebuffer_size(), Extent2D::new(1920, 1080));
        assert_eq!(window.backend_kind(), BackendKind::Explicit);
    }
}
