use std::collections::BTreeMap;

use crate::{
    foundation::core::{Canvas, Point, Rect, Vec2},
    foundation::error::{ReelError, ReelResult},
    scene::model::{FRAME_HEIGHT, Mobject, ObjectId, Placement, Shape, TextSpec},
};

/// Size oracle for content whose extent is only known once shaped or parsed.
pub trait Measure {
    /// Width and height in scene units, including the text's own scale.
    fn text_size(&mut self, text: &TextSpec) -> ReelResult<Vec2>;
    fn svg_size(&mut self, asset: &str, height: f64) -> ReelResult<Vec2>;
}

/// Visible frame in scene units, centered on the origin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneFrame {
    pub width: f64,
    pub height: f64,
}

impl SceneFrame {
    pub fn for_canvas(canvas: Canvas) -> Self {
        Self {
            width: FRAME_HEIGHT * f64::from(canvas.width) / f64::from(canvas.height),
            height: FRAME_HEIGHT,
        }
    }

    fn half(self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placed {
    /// Added to the object's own offset.
    pub translation: Vec2,
    /// Final bounds, translation applied.
    pub bounds: Rect,
}

/// Bounds of `m` before placement. Text and SVG are centered on their offset.
pub fn natural_bounds(m: &Mobject, measure: &mut dyn Measure) -> ReelResult<Rect> {
    let centered = |size: Vec2, center: Point| {
        Rect::from_center_size(center, (size.x, size.y))
    };
    match &m.shape {
        Shape::Text(t) => Ok(centered(measure.text_size(t)?, m.offset.to_point())),
        Shape::Svg { asset, height } => {
            Ok(centered(measure.svg_size(asset, *height)?, m.offset.to_point()))
        }
        Shape::Group(children) => {
            let mut out: Option<Rect> = None;
            for child in children {
                let r = natural_bounds(child, measure)?;
                out = Some(match out {
                    Some(acc) => acc.union(r),
                    None => r,
                });
            }
            Ok(out.unwrap_or_else(|| Rect::from_center_size(Point::ORIGIN, (0.0, 0.0))) + m.offset)
        }
        Shape::Dot { .. } | Shape::Path(_) => m
            .geometric_bounds()
            .ok_or_else(|| ReelError::validation("path without points")),
    }
}

/// Resolve every placement in declaration order. `NextTo` targets must be declared earlier.
pub fn resolve_placements(
    frame: SceneFrame,
    items: &[(ObjectId, &Mobject, Placement)],
    measure: &mut dyn Measure,
) -> ReelResult<BTreeMap<ObjectId, Placed>> {
    let mut placed: BTreeMap<ObjectId, Placed> = BTreeMap::new();
    for (id, mobject, placement) in items {
        let bounds = natural_bounds(mobject, measure)?;
        let translation = match *placement {
            Placement::Natural => Vec2::ZERO,
            Placement::ToEdge { edge, buff } | Placement::ToCorner { corner: edge, buff } => {
                align_to_frame(frame, bounds, edge, buff)
            }
            Placement::NextTo {
                target,
                direction,
                buff,
            } => {
                let anchor = placed.get(&target).ok_or_else(|| {
                    ReelError::validation(format!(
                        "object {} is placed next to {} which is not laid out yet",
                        id.0, target.0
                    ))
                })?;
                beside(anchor.bounds, bounds, direction, buff)
            }
        };
        placed.insert(
            *id,
            Placed {
                translation,
                bounds: bounds + translation,
            },
        );
    }
    Ok(placed)
}

// Per axis: push against the frame edge when the direction has a component, otherwise keep.
fn align_to_frame(frame: SceneFrame, b: Rect, dir: Vec2, buff: f64) -> Vec2 {
    let half = frame.half();
    let axis = |d: f64, lo: f64, hi: f64, limit: f64| {
        if d > 0.0 {
            (limit - buff) - hi
        } else if d < 0.0 {
            (-limit + buff) - lo
        } else {
            0.0
        }
    };
    Vec2::new(
        axis(dir.x, b.x0, b.x1, half.x),
        axis(dir.y, b.y0, b.y1, half.y),
    )
}

// Per axis: abut the anchor when the direction has a component, otherwise center on it.
fn beside(anchor: Rect, b: Rect, dir: Vec2, buff: f64) -> Vec2 {
    let axis = |d: f64, lo: f64, hi: f64, a_lo: f64, a_hi: f64| {
        if d > 0.0 {
            (a_hi + buff) - lo
        } else if d < 0.0 {
            (a_lo - buff) - hi
        } else {
            (a_lo + a_hi) / 2.0 - (lo + hi) / 2.0
        }
    };
    Vec2::new(
        axis(dir.x, b.x0, b.x1, anchor.x0, anchor.x1),
        axis(dir.y, b.y0, b.y1, anchor.y0, anchor.y1),
    )
}

#[cfg(test)]
#[path = "../../tests/unit/layout/solver.rs"]
mod tests;
