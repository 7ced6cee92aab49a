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

//! Multi-line text layout.
//!
//! Layout runs in a y-down local space (the model transform orients the
//! result in the world). Horizontal alignment offsets are applied
//! retroactively: a line's vertices are shifted in bulk once `\n` or the
//! end of the text closes the line and its full width is known. The
//! vertical offset is applied to all vertices once the total height is
//! known.
//!
//! `\t` advances by 4× the space glyph's advance; `\n` starts a new line
//! and resets the horizontal advance. Code points missing from the atlas
//! are skipped.

use super::atlas::GlyphAtlas;
use super::font::Font;
use crate::math::Vec2;
use bytemuck::{Pod, Zeroable};

/// The nine alignment modes. The single-axis modes center the other axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    /// Centered on both axes.
    #[default]
    Center,
    /// Left-aligned, vertically centered.
    Left,
    /// Right-aligned, vertically centered.
    Right,
    /// Horizontally centered, top-aligned.
    Top,
    /// Horizontally centered, bottom-aligned.
    Bottom,
    /// Top-left corner.
    TopLeft,
    /// Top-right corner.
    TopRight,
    /// Bottom-left corner.
    BottomLeft,
    /// Bottom-right corner.
    BottomRight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HorizontalAlign {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VerticalAlign {
    Top,
    Center,
    Bottom,
}

impl TextAlign {
    fn horizontal(self) -> HorizontalAlign {
        match self {
            TextAlign::Left | TextAlign::TopLeft | TextAlign::BottomLeft => HorizontalAlign::Left,
            TextAlign::Right | TextAlign::TopRight | TextAlign::BottomRight => {
                HorizontalAlign::Right
            }
            TextAlign::Center | TextAlign::Top | TextAlign::Bottom => HorizontalAlign::Center,
        }
    }

    fn vertical(self) -> VerticalAlign {
        match self {
            TextAlign::Top | TextAlign::TopLeft | TextAlign::TopRight => VerticalAlign::Top,
            TextAlign::Bottom | TextAlign::BottomLeft | TextAlign::BottomRight => {
                VerticalAlign::Bottom
            }
            TextAlign::Center | TextAlign::Left | TextAlign::Right => VerticalAlign::Center,
        }
    }
}

/// One vertex of a text mesh: 2D position plus atlas UV.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct TextVertex {
    /// Position in the text's local space.
    pub position: Vec2,
    /// Atlas texture coordinate.
    pub uv: Vec2,
}

/// The geometry of one laid-out text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextGeometry {
    /// Four vertices per visible glyph.
    pub vertices: Vec<TextVertex>,
    /// Six indices per visible glyph.
    pub indices: Vec<u32>,
    /// Width of the widest line.
    pub width: f32,
    /// Total height over all lines.
    pub height: f32,
}

impl TextGeometry {
    /// Returns `true` when the layout produced no visible glyphs.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

fn horizontal_offset(align: HorizontalAlign, line_width: f32) -> f32 {
    match align {
        HorizontalAlign::Left => 0.0,
        HorizontalAlign::Center => -line_width / 2.0,
        HorizontalAlign::Right => -line_width,
    }
}

fn vertical_offset(align: VerticalAlign, total_height: f32) -> f32 {
    match align {
        VerticalAlign::Top => 0.0,
        VerticalAlign::Center => -total_height / 2.0,
        VerticalAlign::Bottom => -total_height,
    }
}

/// Lays `text` out and returns its geometry.
pub fn layout_text(
    font: &dyn Font,
    atlas: &GlyphAtlas,
    text: &str,
    font_size: f32,
    align: TextAlign,
) -> TextGeometry {
    let space_advance = font.metrics(' ', font_size).advance;
    let line_height = font.line_height(font_size);
    let ascent = font.ascent(font_size);

    let mut geometry = TextGeometry::default();
    let mut pen_x = 0.0f32;
    let mut line_top = 0.0f32;
    let mut line_start_vertex = 0usize;
    let mut line_count = 0u32;

    let mut close_line = |vertices: &mut Vec<TextVertex>,
                          line_start_vertex: &mut usize,
                          pen_x: &mut f32,
                          max_width: &mut f32| {
        let line_width = *pen_x;
        let shift = horizontal_offset(align.horizontal(), line_width);
        if shift != 0.0 {
            for vertex in &mut vertices[*line_start_vertex..] {
                vertex.position.x += shift;
            }
        }
        *max_width = max_width.max(line_width);
        *pen_x = 0.0;
        *line_start_vertex = vertices.len();
    };

    for ch in text.chars() {
        match ch {
            '\n' => {
                close_line(
                    &mut geometry.vertices,
                    &mut line_start_vertex,
                    &mut pen_x,
                    &mut geometry.width,
                );
                line_count += 1;
                line_top += line_height;
            }
            '\t' => {
                pen_x += 4.0 * space_advance;
            }
            _ => {
                let Some(glyph) = atlas.lookup(ch) else {
                    continue;
                };
                if glyph.metrics.width > 0 && glyph.metrics.height > 0 {
                    let x0 = pen_x + glyph.metrics.bearing_x;
                    let y0 = line_top + ascent - glyph.metrics.bearing_y;
                    let x1 = x0 + glyph.metrics.width as f32;
                    let y1 = y0 + glyph.metrics.height as f32;

                    let base = geometry.vertices.len() as u32;
                    geometry.vertices.extend_from_slice(&[
                        TextVertex {
                            position: Vec2::new(x0, y0),
                            uv: glyph.uv_min,
                        },
                        TextVertex {
                            position: Vec2::new(x1, y0),
                            uv: Vec2::new(glyph.uv_max.x, glyph.uv_min.y),
                        },
                        TextVertex {
                            position: Vec2::new(x1, y1),
                            uv: glyph.uv_max,
                        },
                        TextVertex {
                            position: Vec2::new(x0, y1),
                            uv: Vec2::new(glyph.uv_min.x, glyph.uv_max.y),
                        },
                    ]);
                    geometry
                        .indices
                        .extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 3, base]);
                }
                pen_x += glyph.metrics.advance;
            }
        }
    }
    close_line(
        &mut geometry.vertices,
        &mut line_start_vertex,
        &mut pen_x,
        &mut geometry.width,
    );
    line_count += 1;

    geometry.height = line_count as f32 * line_height;
    let vertical_shift = vertical_offset(align.vertical(), geometry.height);
    if vertical_shift != 0.0 {
        for vertex in &mut geometry.vertices {
            vertex.position.y += vertical_shift;
        }
    }
    geometry
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::font::testing::BlockFont;

    // BlockFont at size 10: advance 6, glyph box 5x7, ascent 8,
    // line height 12.
    const SIZE: f32 = 10.0;

    fn atlas_for(text: &str) -> GlyphAtlas {
        GlyphAtlas::bake(&BlockFont, SIZE, text)
    }

    fn glyph_left(geometry: &TextGeometry, glyph: usize) -> f32 {
        geometry.vertices[glyph * 4].position.x
    }

    fn glyph_top(geometry: &TextGeometry, glyph: usize) -> f32 {
        geometry.vertices[glyph * 4].position.y
    }

    #[test]
    fn test_left_top_layout_advances_monotonically() {
        let atlas = atlas_for("abc");
        let geometry = layout_text(&BlockFont, &atlas, "abc", SIZE, TextAlign::TopLeft);
        assert_eq!(geometry.vertices.len(), 12);
        assert_eq!(geometry.indices.len(), 18);
        assert_eq!(glyph_left(&geometry, 0), 0.0);
        assert_eq!(glyph_left(&geometry, 1), 6.0);
        assert_eq!(glyph_left(&geometry, 2), 12.0);
        // ascent 8, glyph top bearing 7: glyph tops sit 1px under the line top.
        assert_eq!(glyph_top(&geometry, 0), 1.0);
        assert_eq!(geometry.width, 18.0);
        assert_eq!(geometry.height, 12.0);
    }

    #[test]
    fn test_tab_advances_four_spaces() {
        let atlas = atlas_for("ab");
        let geometry = layout_text(&BlockFont, &atlas, "a\tb", SIZE, TextAlign::TopLeft);
        // 'b' starts at advance(6) + 4 * space(6) = 30.
        assert_eq!(glyph_left(&geometry, 1), 30.0);
    }

    #[test]
    fn test_newline_resets_advance_and_descends() {
        let atlas = atlas_for("ab");
        let geometry = layout_text(&BlockFont, &atlas, "a\nb", SIZE, TextAlign::TopLeft);
        assert_eq!(glyph_left(&geometry, 1), 0.0);
        assert_eq!(glyph_top(&geometry, 1), glyph_top(&geometry, 0) + 12.0);
        assert_eq!(geometry.height, 24.0);
    }

    #[test]
    fn test_right_alignment_shifts_each_line_by_its_own_width() {
        let atlas = atlas_for("aab");
        // First line "aa" (width 12), second line "b" (width 6).
        let geometry = layout_text(&BlockFont, &atlas, "aa\nb", SIZE, TextAlign::TopRight);
        assert_eq!(glyph_left(&geometry, 0), -12.0);
        assert_eq!(glyph_left(&geometry, 2), -6.0);
    }

    #[test]
    fn test_center_alignment_halves_the_shift() {
        let atlas = atlas_for("ab");
        let geometry = layout_text(&BlockFont, &atlas, "ab", SIZE, TextAlign::Top);
        // Line width 12, centered: starts at -6.
        assert_eq!(glyph_left(&geometry, 0), -6.0);
    }

    #[test]
    fn test_vertical_alignment_shifts_all_lines() {
        let atlas = atlas_for("a");
        let top = layout_text(&BlockFont, &atlas, "a", SIZE, TextAlign::TopLeft);
        let center = layout_text(&BlockFont, &atlas, "a", SIZE, TextAlign::Left);
        let bottom = layout_text(&BlockFont, &atlas, "a", SIZE, TextAlign::BottomLeft);
        // One line of height 12.
        assert_eq!(glyph_top(&center, 0), glyph_top(&top, 0) - 6.0);
        assert_eq!(glyph_top(&bottom, 0), glyph_top(&top, 0) - 12.0);
    }

    #[test]
    fn test_all_nine_alignments_decompose() {
        use HorizontalAlign as H;
        use VerticalAlign as V;
        let cases = [
            (TextAlign::Center, H::Center, V::Center),
            (TextAlign::Left, H::Left, V::Center),
            (TextAlign::Right, H::Right, V::Center),
            (TextAlign::Top, H::Center, V::Top),
            (TextAlign::Bottom, H::Center, V::Bottom),
            (TextAlign::TopLeft, H::Left, V::Top),
            (TextAlign::TopRight, H::Right, V::Top),
            (TextAlign::BottomLeft, H::Left, V::Bottom),
            (TextAlign::BottomRight, H::Right, V::Bottom),
        ];
        for (align, horizontal, vertical) in cases {
            assert_eq!(align.horizontal(), horizontal);
            assert_eq!(align.vertical(), vertical);
        }
    }

    #[test]
    fn test_spaces_advance_without_emitting_quads() {
        let atlas = atlas_for("a b");
        let geometry = layout_text(&BlockFont, &atlas, "a b", SIZE, TextAlign::TopLeft);
        // Two quads only; 'b' starts after two advances.
        assert_eq!(geometry.vertices.len(), 8);
        assert_eq!(glyph_left(&geometry, 1), 12.0);
        // The trailing space still contributes to the line width.
        assert_eq!(geometry.width, 18.0);
    }

    #[test]
    fn test_missing_glyphs_are_skipped() {
        let atlas = atlas_for("a");
        let geometry = layout_text(&BlockFont, &atlas, "axa", SIZE, TextAlign::TopLeft);
        // 'x' is not in the atlas: no quad, no advance.
        assert_eq!(geometry.vertices.len(), 8);
        assert_eq!(glyph_left(&geometry, 1), 6.0);
    }

    #[test]
    fn test_empty_text_is_empty_geometry() {
        let atlas = atlas_for("a");
        let geometry = layout_text(&BlockFont, &atlas, "", SIZE, TextAlign::Center);
        assert!(geometry.is_empty());
        assert_eq!(geometry.width, 0.0);
        // An empty text still occupies one line.
        assert_eq!(geometry.height, 12.0);
    }
}
