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

//! A [`Font`] implementation over `rusttype`.

use lucent_core::text::{Font, GlyphBitmap, GlyphMetrics};
use rusttype::{point, Scale};

/// A TrueType/OpenType font face rasterized through `rusttype`.
pub struct RusttypeFont {
    font: rusttype::Font<'static>,
}

impl std::fmt::Debug for RusttypeFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RusttypeFont")
            .field("glyph_count", &self.font.glyph_count())
            .finish()
    }
}

impl RusttypeFont {
    /// Parses a font from its raw file bytes. Returns `None` when the data
    /// is not a parseable font.
    pub fn from_bytes(bytes: Vec<u8>) -> Option<Self> {
        rusttype::Font::try_from_vec(bytes).map(|font| Self { font })
    }

    fn scale(px: f32) -> Scale {
        Scale::uniform(px)
    }
}

impl Font for RusttypeFont {
    fn ascent(&self, px: f32) -> f32 {
        self.font.v_metrics(Self::scale(px)).ascent
    }

    fn line_height(&self, px: f32) -> f32 {
        let v = self.font.v_metrics(Self::scale(px));
        v.ascent - v.descent + v.line_gap
    }

    fn metrics(&self, codepoint: char, px: f32) -> GlyphMetrics {
        let scale = Self::scale(px);
        let glyph = self.font.glyph(codepoint).scaled(scale);
        let h_metrics = glyph.h_metrics();
        let positioned = glyph.positioned(point(0.0, 0.0));

        match positioned.pixel_bounding_box() {
            Some(bb) => GlyphMetrics {
                advance: h_metrics.advance_width,
                width: (bb.max.x - bb.min.x) as u32,
                height: (bb.max.y - bb.min.y) as u32,
                bearing_x: bb.min.x as f32,
                // The bounding box is y-down around the baseline; a glyph
                // top above the baseline has a negative min.y.
                bearing_y: -bb.min.y as f32,
            },
            None => GlyphMetrics {
                advance: h_metrics.advance_width,
                width: 0,
                height: 0,
                bearing_x: h_metrics.left_side_bearing,
                bearing_y: 0.0,
            },
        }
    }

    fn rasterize(&self, codepoint: char, px: f32) -> GlyphBitmap {
        let scale = Self::scale(px);
        let positioned = self
            .font
            .glyph(codepoint)
            .scaled(scale)
            .positioned(point(0.0, 0.0));

        let Some(bb) = positioned.pixel_bounding_box() else {
            return GlyphBitmap::empty();
        };
        let width = (bb.max.x - bb.min.x) as u32;
        let height = (bb.max.y - bb.min.y) as u32;
        let mut coverage = vec![0u8; (width * height) as usize];
        positioned.draw(|x, y, v| {
            coverage[(y * width + x) as usize] = (v * 255.0).min(255.0) as u8;
        });
        GlyphBitmap {
            width,
            height,
            coverage,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_garbage_bytes_are_not_a_font() {
        assert!(RusttypeFont::from_bytes(vec![0, 1, 2, 3]).is_none());
        assert!(RusttypeFont::from_bytes(Vec::new()).is_none());
    }
}
