use std::{collections::HashMap, sync::Arc};

use crate::{
    assets::{
        AssetId, PreparedAssetStore, ShapedText,
        svg_raster::{SvgRasterKey, rasterize_svg_to_premul_rgba8, svg_raster_params},
    },
    compile::{DrawOp, RenderPlan},
    foundation::core::{Affine, BezPath, Color, Point},
    foundation::error::{ReelError, ReelResult},
    render::backend::{FrameRGBA, RenderBackend},
};

/// CPU raster backend on `vello_cpu`.
///
/// Keeps one pixmap per canvas size, the presentation font and every SVG raster it has drawn.
#[derive(Default)]
pub struct CpuBackend {
    pixmap: Option<vello_cpu::Pixmap>,
    font: Option<(usize, vello_cpu::peniko::FontData)>,
    svg_cache: HashMap<SvgRasterKey, vello_cpu::Image>,
}

impl CpuBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn font_for(&mut self, assets: &PreparedAssetStore) -> vello_cpu::peniko::FontData {
        let bytes = &assets.font().bytes;
        let key = Arc::as_ptr(bytes) as usize;
        match &self.font {
            Some((k, font)) if *k == key => font.clone(),
            _ => {
                let font = vello_cpu::peniko::FontData::new(
                    vello_cpu::peniko::Blob::from(bytes.as_ref().clone()),
                    assets.font().index,
                );
                self.font = Some((key, font.clone()));
                font
            }
        }
    }

    fn svg_paint_for(
        &mut self,
        id: AssetId,
        transform: Affine,
        assets: &PreparedAssetStore,
    ) -> ReelResult<(vello_cpu::Image, f64, f64, Affine)> {
        let svg = assets.svg(id)?;
        let (w, h, adjust) = svg_raster_params(&svg.tree, transform)?;
        let key = SvgRasterKey {
            asset: id,
            width: w,
            height: h,
        };
        if let Some(paint) = self.svg_cache.get(&key) {
            return Ok((paint.clone(), f64::from(w), f64::from(h), adjust));
        }

        let rgba8_premul = rasterize_svg_to_premul_rgba8(&svg.tree, w, h)?;
        let pixmap = premul_bytes_to_pixmap(&rgba8_premul, w, h)?;
        let paint = vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        };
        tracing::debug!(asset = id.as_u64(), w, h, "rasterized svg");
        self.svg_cache.insert(key, paint.clone());
        Ok((paint, f64::from(w), f64::from(h), adjust))
    }
}

impl RenderBackend for CpuBackend {
    fn render_plan(
        &mut self,
        plan: &RenderPlan,
        assets: &PreparedAssetStore,
    ) -> ReelResult<FrameRGBA> {
        let width: u16 = plan
            .canvas
            .width
            .try_into()
            .map_err(|_| ReelError::evaluation("canvas width exceeds u16"))?;
        let height: u16 = plan
            .canvas
            .height
            .try_into()
            .map_err(|_| ReelError::evaluation("canvas height exceeds u16"))?;

        let mut pixmap = match self.pixmap.take() {
            Some(p) if p.width() == width && p.height() == height => p,
            _ => vello_cpu::Pixmap::new(width, height),
        };
        let mut ctx = vello_cpu::RenderContext::new(width, height);
        ctx.set_paint(paint_color(plan.clear));
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(width),
            f64::from(height),
        ));
        for op in &plan.ops {
            self.draw_op(&mut ctx, op, assets)?;
        }
        ctx.flush();
        ctx.render_to_pixmap(&mut pixmap);

        let frame = FrameRGBA {
            width: plan.canvas.width,
            height: plan.canvas.height,
            data: pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        };
        self.pixmap = Some(pixmap);
        Ok(frame)
    }
}

impl CpuBackend {
    fn draw_op(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        op: &DrawOp,
        assets: &PreparedAssetStore,
    ) -> ReelResult<()> {
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);

        match op {
            DrawOp::FillPath {
                path,
                color,
                opacity,
            } => {
                ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
                ctx.set_paint(paint_color(*color));
                with_opacity(ctx, *opacity, |ctx| ctx.fill_path(&bezpath_to_cpu(path)));
            }
            DrawOp::Text {
                text,
                transform,
                color,
                opacity,
                visible_glyphs,
            } => {
                let font = self.font_for(assets);
                ctx.set_transform(affine_to_cpu(*transform));
                ctx.set_paint(paint_color(*color));
                with_opacity(ctx, *opacity, |ctx| {
                    draw_glyphs(ctx, &font, text, *visible_glyphs)
                });
            }
            DrawOp::Svg {
                asset,
                transform,
                opacity,
            } => {
                let (paint, w, h, adjust) = self.svg_paint_for(*asset, *transform, assets)?;
                ctx.set_transform(affine_to_cpu(adjust));
                ctx.set_paint(paint);
                with_opacity(ctx, *opacity, |ctx| {
                    ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, w, h))
                });
            }
        }
        Ok(())
    }
}

fn with_opacity(
    ctx: &mut vello_cpu::RenderContext,
    opacity: f32,
    draw: impl FnOnce(&mut vello_cpu::RenderContext),
) {
    if opacity < 1.0 {
        ctx.push_opacity_layer(opacity);
        draw(ctx);
        ctx.pop_layer();
    } else {
        draw(ctx);
    }
}

/// Draws whole glyphs up to `visible`, then the next one faded by the fractional remainder.
fn draw_glyphs(
    ctx: &mut vello_cpu::RenderContext,
    font: &vello_cpu::peniko::FontData,
    text: &ShapedText,
    visible: f64,
) {
    let whole = visible.floor() as usize;
    let partial = (visible - visible.floor()) as f32;
    let mut seen = 0usize;

    for line in text.layout.lines() {
        for item in line.items() {
            let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                continue;
            };
            let font_size = run.run().font_size();
            let glyphs: Vec<vello_cpu::Glyph> = run
                .positioned_glyphs()
                .map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                })
                .collect();

            let full = whole.saturating_sub(seen).min(glyphs.len());
            if full > 0 {
                ctx.glyph_run(font)
                    .font_size(font_size)
                    .fill_glyphs(glyphs[..full].iter().copied());
            }
            if full < glyphs.len() && seen + full == whole && partial > 0.0 {
                ctx.push_opacity_layer(partial);
                ctx.glyph_run(font)
                    .font_size(font_size)
                    .fill_glyphs(std::iter::once(glyphs[full]));
                ctx.pop_layer();
            }
            seen += glyphs.len();
            if seen > whole {
                return;
            }
        }
    }
}

fn paint_color(c: Color) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn point_to_cpu(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point_to_cpu(p1), point_to_cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(point_to_cpu(p1), point_to_cpu(p2), point_to_cpu(p3));
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

fn premul_bytes_to_pixmap(rgba8_premul: &[u8], width: u32, height: u32) -> ReelResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| ReelError::evaluation("svg raster width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| ReelError::evaluation("svg raster height exceeds u16"))?;
    if rgba8_premul.len() != width as usize * height as usize * 4 {
        return Err(ReelError::evaluation("svg raster byte length mismatch"));
    }

    let mut may_have_opacities = false;
    let pixels = rgba8_premul
        .chunks_exact(4)
        .map(|px| {
            may_have_opacities |= px[3] != 255;
            vello_cpu::peniko::color::PremulRgba8 {
                r: px[0],
                g: px[1],
                b: px[2],
                a: px[3],
            }
        })
        .collect();

    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
