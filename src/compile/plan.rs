//! Evaluated frame → backend-agnostic draw plan in pixel space.

use std::sync::Arc;

use kurbo::{Cap, Circle, Join, Shape as _, Stroke, StrokeOpts};

use crate::{
    assets::{AssetId, PreparedAssetStore, ShapedText, TextCache},
    eval::{EvaluatedFrame, ObjectState},
    foundation::core::{Affine, BezPath, Canvas, Color, Point, Vec2},
    foundation::error::ReelResult,
    layout::{Measure, SceneFrame, resolve_placements},
    scene::model::{FONT_SIZE_PER_UNIT, FRAME_HEIGHT, Mobject, PathSpec, Shape, TextSpec},
};

/// Stroke widths are authored for a 1080-pixel-high canvas.
const REFERENCE_HEIGHT_PX: f64 = 1080.0;
const CURVE_TOLERANCE: f64 = 0.1;
/// Content smaller than this many pixels is not drawn.
const MIN_VISIBLE_PX: f64 = 0.01;

/// Mapping from scene units (origin at center, y up) to canvas pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub canvas: Canvas,
    pub frame: SceneFrame,
    /// Pixels per scene unit.
    pub ppu: f64,
}

impl Viewport {
    pub fn new(canvas: Canvas) -> Self {
        Self {
            canvas,
            frame: SceneFrame::for_canvas(canvas),
            ppu: f64::from(canvas.height) / FRAME_HEIGHT,
        }
    }

    pub fn to_pixels(&self) -> Affine {
        Affine::new([
            self.ppu,
            0.0,
            0.0,
            -self.ppu,
            self.frame.width / 2.0 * self.ppu,
            self.frame.height / 2.0 * self.ppu,
        ])
    }

    pub fn point_px(&self, p: Point) -> Point {
        self.to_pixels() * p
    }

    pub fn stroke_px(&self, width: f64) -> f64 {
        width * f64::from(self.canvas.height) / REFERENCE_HEIGHT_PX
    }

    pub fn text_px(&self, font_size: f64) -> f32 {
        (font_size / FONT_SIZE_PER_UNIT * self.ppu) as f32
    }
}

#[derive(Clone, Debug)]
pub enum DrawOp {
    FillPath {
        path: BezPath,
        color: Color,
        opacity: f32,
    },
    /// A shaped line drawn with `transform` (top-left origin, pixel space).
    Text {
        text: Arc<ShapedText>,
        transform: Affine,
        color: Color,
        opacity: f32,
        /// Glyphs to draw; a fractional part draws the next glyph partially transparent.
        visible_glyphs: f64,
    },
    /// The SVG in its own coordinate space mapped by `transform`.
    Svg {
        asset: AssetId,
        transform: Affine,
        opacity: f32,
    },
}

#[derive(Clone, Debug)]
pub struct RenderPlan {
    pub canvas: Canvas,
    pub clear: Color,
    pub ops: Vec<DrawOp>,
}

/// [`Measure`] backed by the shared text cache and the prepared SVGs.
pub struct SceneMeasure<'a> {
    pub viewport: Viewport,
    pub text: &'a mut TextCache,
    pub assets: &'a PreparedAssetStore,
}

impl Measure for SceneMeasure<'_> {
    fn text_size(&mut self, t: &TextSpec) -> ReelResult<Vec2> {
        let size_px = self.viewport.text_px(t.font_size);
        let mut w = 0.0_f64;
        let mut h = 0.0_f64;
        for part in &t.parts {
            let shaped = self.text.shape(part, size_px)?;
            w += shaped.width_px;
            h = h.max(shaped.height_px);
        }
        Ok(Vec2::new(w, h) * (t.scale / self.viewport.ppu))
    }

    fn svg_size(&mut self, asset: &str, height: f64) -> ReelResult<Vec2> {
        let svg = self.assets.svg(self.assets.id_for(asset)?)?;
        let size = svg.tree.size();
        let aspect = f64::from(size.width()) / f64::from(size.height());
        Ok(Vec2::new(height * aspect, height))
    }
}

/// Lay out and flatten every visible object of `frame` into draw ops, in declaration order.
#[tracing::instrument(skip_all, fields(frame = frame.frame.0))]
pub fn compile_frame(
    frame: &EvaluatedFrame,
    viewport: Viewport,
    clear: Color,
    assets: &PreparedAssetStore,
    text: &mut TextCache,
) -> ReelResult<RenderPlan> {
    let items: Vec<_> = frame
        .objects
        .iter()
        .map(|o| (o.id, &o.mobject, o.placement))
        .collect();
    let placed = {
        let mut measure = SceneMeasure {
            viewport,
            text: &mut *text,
            assets,
        };
        resolve_placements(viewport.frame, &items, &mut measure)?
    };

    let mut emitter = Emitter {
        viewport,
        assets,
        text,
        ops: Vec::new(),
    };
    for object in &frame.objects {
        let state = &object.state;
        if !state.visible || state.opacity <= 0.0 {
            continue;
        }
        let translation = placed
            .get(&object.id)
            .map(|p| p.translation)
            .unwrap_or(Vec2::ZERO)
            + state.shift;
        emitter.emit(&object.mobject, translation, state, &state.colors, None)?;
    }

    Ok(RenderPlan {
        canvas: viewport.canvas,
        clear,
        ops: emitter.ops,
    })
}

struct Emitter<'a> {
    viewport: Viewport,
    assets: &'a PreparedAssetStore,
    text: &'a mut TextCache,
    ops: Vec<DrawOp>,
}

impl Emitter<'_> {
    fn emit(
        &mut self,
        m: &Mobject,
        translation: Vec2,
        state: &ObjectState,
        colors: &[Color],
        tint: Option<Color>,
    ) -> ReelResult<()> {
        let delta = translation + m.offset;
        let base = tint.or_else(|| colors.first().copied()).unwrap_or(m.color);
        let opacity = state.opacity.clamp(0.0, 1.0);

        match &m.shape {
            Shape::Text(t) => self.text_op(t, delta, state, colors, tint, m.color),
            Shape::Dot { center, radius } => {
                let circle = Circle::new(*center + delta, *radius);
                let path = self.viewport.to_pixels() * circle.to_path(CURVE_TOLERANCE / self.viewport.ppu);
                self.fill(path, base, opacity * state.reveal);
                Ok(())
            }
            Shape::Path(p) => {
                self.path_op(p, delta, base, opacity, state.reveal);
                Ok(())
            }
            Shape::Svg { asset, height } => {
                self.svg_op(asset, *height, delta, opacity * state.reveal)
            }
            Shape::Group(children) => {
                // Recoloring a group overrides every child's own color.
                let tint = tint.or_else(|| colors.first().copied().filter(|c| *c != m.color));
                for child in children {
                    self.emit(child, delta, state, &[], tint)?;
                }
                Ok(())
            }
        }
    }

    fn fill(&mut self, path: BezPath, color: Color, opacity: f64) {
        if opacity <= 0.0 {
            return;
        }
        self.ops.push(DrawOp::FillPath {
            path,
            color,
            opacity: opacity as f32,
        });
    }

    fn path_op(&mut self, p: &PathSpec, delta: Vec2, color: Color, opacity: f64, reveal: f64) {
        let to_px = self.viewport.to_pixels();
        let points: Vec<Point> = p.points.iter().map(|pt| to_px * (*pt + delta)).collect();

        if p.filled {
            let Some(path) = polyline(&points, true) else {
                return;
            };
            self.fill(path, color, opacity * reveal);
            return;
        }

        let points = if reveal < 1.0 {
            partial_polyline(&points, reveal)
        } else {
            points
        };
        let Some(path) = polyline(&points, p.closed) else {
            return;
        };
        let style = Stroke::new(self.viewport.stroke_px(p.stroke_width))
            .with_join(Join::Round)
            .with_caps(Cap::Butt);
        let outline = kurbo::stroke(path, &style, &StrokeOpts::default(), CURVE_TOLERANCE);
        self.fill(outline, color, opacity);
    }

    fn text_op(
        &mut self,
        t: &TextSpec,
        delta: Vec2,
        state: &ObjectState,
        colors: &[Color],
        tint: Option<Color>,
        own: Color,
    ) -> ReelResult<()> {
        let size_px = self.viewport.text_px(t.font_size);
        let shaped = t
            .parts
            .iter()
            .map(|part| self.text.shape(part, size_px))
            .collect::<ReelResult<Vec<_>>>()?;

        let width: f64 = shaped.iter().map(|s| s.width_px).sum::<f64>() * t.scale;
        let height = shaped.iter().map(|s| s.height_px).fold(0.0, f64::max) * t.scale;
        if width < MIN_VISIBLE_PX || height < MIN_VISIBLE_PX {
            return Ok(());
        }

        let center = self.viewport.point_px(delta.to_point());
        let top = center.y - height / 2.0;
        let mut left = center.x - width / 2.0;
        let total: usize = shaped.iter().map(|s| s.glyph_count).sum();
        let mut remaining = state.reveal.clamp(0.0, 1.0) * total as f64;
        let opacity = state.opacity.clamp(0.0, 1.0) as f32;

        for (i, s) in shaped.into_iter().enumerate() {
            let visible = remaining.min(s.glyph_count as f64);
            remaining -= visible;
            let advance = s.width_px * t.scale;
            let color = tint.or_else(|| colors.get(i).copied()).unwrap_or(own);
            if visible > 0.0 {
                self.ops.push(DrawOp::Text {
                    transform: Affine::translate((left, top)) * Affine::scale(t.scale),
                    text: s,
                    color,
                    opacity,
                    visible_glyphs: visible,
                });
            }
            left += advance;
        }
        Ok(())
    }

    fn svg_op(&mut self, asset: &str, height: f64, delta: Vec2, opacity: f64) -> ReelResult<()> {
        if opacity <= 0.0 {
            return Ok(());
        }
        let id = self.assets.id_for(asset)?;
        let size = self.assets.svg(id)?.tree.size();
        let height_px = height * self.viewport.ppu;
        let scale = height_px / f64::from(size.height());
        let width_px = f64::from(size.width()) * scale;
        if height_px < MIN_VISIBLE_PX {
            return Ok(());
        }

        let center = self.viewport.point_px(delta.to_point());
        self.ops.push(DrawOp::Svg {
            asset: id,
            transform: Affine::translate((center.x - width_px / 2.0, center.y - height_px / 2.0))
                * Affine::scale(scale),
            opacity: opacity as f32,
        });
        Ok(())
    }
}

fn polyline(points: &[Point], closed: bool) -> Option<BezPath> {
    let (first, rest) = points.split_first()?;
    if rest.is_empty() {
        return None;
    }
    let mut path = BezPath::new();
    path.move_to(*first);
    for p in rest {
        path.line_to(*p);
    }
    if closed {
        path.close_path();
    }
    Some(path)
}

/// Leading `fraction` of a polyline by arc length.
pub fn partial_polyline(points: &[Point], fraction: f64) -> Vec<Point> {
    let fraction = fraction.clamp(0.0, 1.0);
    let total: f64 = points.windows(2).map(|w| (w[1] - w[0]).hypot()).sum();
    let Some(first) = points.first() else {
        return Vec::new();
    };
    if total <= 0.0 || fraction <= 0.0 {
        return vec![*first];
    }

    let mut budget = total * fraction;
    let mut out = vec![*first];
    for w in points.windows(2) {
        let seg = (w[1] - w[0]).hypot();
        if seg >= budget {
            let t = if seg > 0.0 { budget / seg } else { 0.0 };
            out.push(w[0].lerp(w[1], t));
            break;
        }
        budget -= seg;
        out.push(w[1]);
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/compile/plan.rs"]
mod tests;
