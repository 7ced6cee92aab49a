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

//! The font-rasterization collaborator boundary.
//!
//! Glyph rasterization and metric extraction are delegated to an external
//! font library; `lucent-infra` provides a `rusttype`-backed
//! implementation. Everything the atlas and layout code needs is behind
//! this trait, so tests run against synthetic fonts with exact metrics.

/// Metrics of one glyph at a given pixel size.
///
/// `bearing_y` is measured upwards from the baseline to the glyph's top
/// edge; `bearing_x` from the pen position to its left edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphMetrics {
    /// Horizontal pen advance after this glyph.
    pub advance: f32,
    /// Rasterized width in pixels (0 for blank glyphs such as space).
    pub width: u32,
    /// Rasterized height in pixels.
    pub height: u32,
    /// Left side bearing.
    pub bearing_x: f32,
    /// Distance from the baseline up to the glyph's top edge.
    pub bearing_y: f32,
}

/// A rasterized glyph: a tightly-sized coverage bitmap, one byte per
/// pixel, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphBitmap {
    /// Bitmap width in pixels.
    pub width: u32,
    /// Bitmap height in pixels.
    pub height: u32,
    /// `width * height` coverage values.
    pub coverage: Vec<u8>,
}

impl GlyphBitmap {
    /// An empty bitmap for blank glyphs.
    pub fn empty() -> Self {
        Self {
            width: 0,
            height: 0,
            coverage: Vec::new(),
        }
    }
}

/// A font face able to measure and rasterize individual code points at an
/// arbitrary pixel size.
pub trait Font: Send + Sync {
    /// Distance from the baseline to the top of the tallest glyph.
    fn ascent(&self, px: f32) -> f32;

    /// Vertical distance between consecutive baselines.
    fn line_height(&self, px: f32) -> f32;

    /// Metrics for one code point.
    fn metrics(&self, codepoint: char, px: f32) -> GlyphMetrics;

    /// Rasterizes one code point into a coverage bitmap.
    fn rasterize(&self, codepoint: char, px: f32) -> GlyphBitmap;
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    /// A synthetic monospace font with exact, size-proportional metrics:
    /// advance 0.6×, glyph box 0.5×/0.7×, ascent 0.8×, line height 1.2×.
    /// Every visible glyph rasterizes as a full-coverage block.
    pub(crate) struct BlockFont;

    impl Font for BlockFont {
        fn ascent(&self, px: f32) -> f32 {
            0.8 * px
        }

        fn line_height(&self, px: f32) -> f32 {
            1.2 * px
        }

        fn metrics(&self, codepoint: char, px: f32) -> GlyphMetrics {
            let blank = codepoint == ' ';
            GlyphMetrics {
                advance: 0.6 * px,
                width: if blank { 0 } else { (0.5 * px) as u32 },
                height: if blank { 0 } else { (0.7 * px) as u32 },
                bearing_x: 0.0,
                bearing_y: if blank { 0.0 } else { 0.7 * px },
            }
        }

        fn rasterize(&self, codepoint: char, px: f32) -> GlyphBitmap {
            let metrics = self.metrics(codepoint, px);
            if metrics.width == 0 || metrics.height == 0 {
                return GlyphBitmap::empty();
            }
            GlyphBitmap {
                width: metrics.width,
                height: metrics.height,
                coverage: vec![255; (metrics.width * metrics.height) as usize],
            }
        }
    }
}
