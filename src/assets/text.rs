use std::{collections::HashMap, sync::Arc};

use crate::{
    assets::store::PreparedFont,
    foundation::error::{ReelError, ReelResult},
};

/// RGBA8 brush carried through Parley layouts. Colors are applied at draw time, so layouts are
/// shaped with the default brush and shared across colors.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TextBrushRgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

/// Parley contexts with the presentation font registered once.
pub struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    family: String,
}

impl TextLayoutEngine {
    pub fn new(font: &PreparedFont) -> ReelResult<Self> {
        let mut font_ctx = parley::FontContext::default();
        let families = font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font.bytes.as_ref().clone()), None);
        // A collection registers one family per face; shape with the face the raster draws.
        let family_id = families
            .iter()
            .find(|(_, faces)| faces.iter().any(|f| f.index() == font.index))
            .map(|(id, _)| *id)
            .ok_or_else(|| {
                ReelError::asset(format!(
                    "no font family for face {} in '{}'",
                    font.index, font.source
                ))
            })?;
        let family = font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| ReelError::asset("registered font family has no name"))?
            .to_string();

        Ok(Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            family,
        })
    }

    pub fn family(&self) -> &str {
        &self.family
    }

    /// Shape one unwrapped line of text.
    pub fn layout_line(
        &mut self,
        text: &str,
        size_px: f32,
    ) -> ReelResult<parley::Layout<TextBrushRgba8>> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(ReelError::validation("text size must be finite and > 0"));
        }

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(self.family.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(
            TextBrushRgba8::default(),
        ));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);
        Ok(layout)
    }
}

/// A shaped line with its pixel extent.
pub struct ShapedText {
    pub layout: parley::Layout<TextBrushRgba8>,
    pub glyph_count: usize,
    pub width_px: f64,
    pub height_px: f64,
}

impl std::fmt::Debug for ShapedText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShapedText")
            .field("glyph_count", &self.glyph_count)
            .field("width_px", &self.width_px)
            .field("height_px", &self.height_px)
            .finish()
    }
}

/// Shaped lines keyed by text and pixel size. Shared by layout measurement and plan compilation
/// so both see identical extents.
pub struct TextCache {
    engine: TextLayoutEngine,
    entries: HashMap<(String, u32), Arc<ShapedText>>,
}

impl TextCache {
    pub fn new(font: &PreparedFont) -> ReelResult<Self> {
        Ok(Self {
            engine: TextLayoutEngine::new(font)?,
            entries: HashMap::new(),
        })
    }

    pub fn family(&self) -> &str {
        self.engine.family()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn shape(&mut self, text: &str, size_px: f32) -> ReelResult<Arc<ShapedText>> {
        let key = (text.to_string(), size_px.to_bits());
        if let Some(hit) = self.entries.get(&key) {
            return Ok(hit.clone());
        }

        let layout = self.engine.layout_line(text, size_px)?;
        let glyph_count = layout
            .lines()
            .flat_map(|line| line.items())
            .map(|item| match item {
                parley::layout::PositionedLayoutItem::GlyphRun(run) => run.glyphs().count(),
                parley::layout::PositionedLayoutItem::InlineBox(_) => 0,
            })
            .sum();
        let shaped = Arc::new(ShapedText {
            width_px: f64::from(layout.width()),
            height_px: f64::from(layout.height()),
            glyph_count,
            layout,
        });
        tracing::debug!(text, size_px, glyph_count, "shaped text");
        self.entries.insert(key, shaped.clone());
        Ok(shaped)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/text.rs"]
mod tests;
