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

//! Glyph atlas baking.
//!
//! The unique code points of a text are packed into a roughly square grid
//! of `ceil(sqrt(n))` cells per side, each cell `font_size × font_size`
//! pixels. The baked glyph table is sorted by code point; layout looks
//! glyphs up by binary search, which is only correct because the table
//! stays sorted.

use super::font::{Font, GlyphMetrics};
use crate::math::Vec2;

/// One baked glyph: its metrics and its texel rectangle in the atlas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BakedGlyph {
    /// The code point this glyph renders.
    pub codepoint: char,
    /// Metrics at the atlas' font size.
    pub metrics: GlyphMetrics,
    /// Top-left UV of the glyph's pixels.
    pub uv_min: Vec2,
    /// Bottom-right UV of the glyph's pixels.
    pub uv_max: Vec2,
}

/// A single-channel glyph atlas image plus its sorted glyph table.
#[derive(Debug, Clone)]
pub struct GlyphAtlas {
    /// Sorted by `codepoint`.
    glyphs: Vec<BakedGlyph>,
    font_size: f32,
    cell_size: u32,
    cells_per_side: u32,
    dimension: u32,
    pixels: Vec<u8>,
}

impl GlyphAtlas {
    /// Bakes an atlas covering every non-control code point of `text`.
    pub fn bake(font: &dyn Font, font_size: f32, text: &str) -> Self {
        let mut codepoints: Vec<char> = text.chars().filter(|c| !c.is_control()).collect();
        codepoints.sort_unstable();
        codepoints.dedup();

        let cell_size = (font_size.ceil() as u32).max(1);
        let cells_per_side = (codepoints.len().max(1) as f32).sqrt().ceil() as u32;
        let dimension = cells_per_side * cell_size;
        let mut pixels = vec![0u8; (dimension * dimension) as usize];
        let mut glyphs = Vec::with_capacity(codepoints.len());

        // `codepoints` is sorted and deduplicated, so pushing in iteration
        // order keeps the glyph table sorted.
        for (slot, &codepoint) in codepoints.iter().enumerate() {
            let cell_x = (slot as u32 % cells_per_side) * cell_size;
            let cell_y = (slot as u32 / cells_per_side) * cell_size;

            let metrics = font.metrics(codepoint, font_size);
            let bitmap = font.rasterize(codepoint, font_size);
            let width = bitmap.width.min(cell_size);
            let height = bitmap.height.min(cell_size);

            for row in 0..height {
                let src_start = (row * bitmap.width) as usize;
                let dst_start = ((cell_y + row) * dimension + cell_x) as usize;
                pixels[dst_start..dst_start + width as usize]
                    .copy_from_slice(&bitmap.coverage[src_start..src_start + width as usize]);
            }

            let inv = 1.0 / dimension as f32;
            glyphs.push(BakedGlyph {
                codepoint,
                metrics,
                uv_min: Vec2::new(cell_x as f32 * inv, cell_y as f32 * inv),
                uv_max: Vec2::new(
                    (cell_x + width) as f32 * inv,
                    (cell_y + height) as f32 * inv,
                ),
            });
        }

        Self {
            glyphs,
            font_size,
            cell_size,
            cells_per_side,
            dimension,
            pixels,
        }
    }

    /// Looks up a baked glyph by code point (binary search over the sorted
    /// table).
    pub fn lookup(&self, codepoint: char) -> Option<&BakedGlyph> {
        self.glyphs
            .binary_search_by(|glyph| glyph.codepoint.cmp(&codepoint))
            .ok()
            .map(|index| &self.glyphs[index])
    }

    /// Returns `true` when every non-control code point of `text` is
    /// already baked. When this fails, the text needs a re-bake (possibly
    /// into a larger atlas).
    pub fn covers(&self, text: &str) -> bool {
        text.chars()
            .filter(|c| !c.is_control())
            .all(|c| self.lookup(c).is_some())
    }

    /// Number of baked glyphs.
    pub fn glyph_count(&self) -> usize {
        self.glyphs.len()
    }

    /// The font size the atlas was baked at.
    pub fn font_size(&self) -> f32 {
        self.font_size
    }

    /// Cell edge length in pixels.
    pub fn cell_size(&self) -> u32 {
        self.cell_size
    }

    /// Grid cells per side.
    pub fn cells_per_side(&self) -> u32 {
        self.cells_per_side
    }

    /// Atlas edge length in pixels.
    pub fn dimension(&self) -> u32 {
        self.dimension
    }

    /// The single-channel atlas image, row-major.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }
}
