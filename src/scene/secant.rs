use crate::{
    calculus::curve::Secant,
    foundation::core::{Color, Point, Vec2},
    foundation::error::ReelResult,
    scene::{
        axes::Axes,
        model::{FONT_SIZE_PER_UNIT, Mobject},
    },
};

const LABEL_FONT_SIZE: f64 = 48.0;
// Label extent estimates in em units; the exact shaped size is only known at render time.
const LABEL_ADVANCE_EM: f64 = 0.55;
const LABEL_HEIGHT_EM: f64 = 0.75;
/// Labels may cover at most this fraction of their line.
const LABEL_FIT: f64 = 0.8;

const DX_LABEL: &str = "Δx";
const DY_LABEL: &str = "Δy";
const DX_LINE_COLOR: Color = Color::YELLOW;
const SECANT_LINE_COLOR: Color = Color::YELLOW;
/// Scene units.
const SECANT_LINE_LENGTH: f64 = 10.0;

/// Builds the dx/dy legs, their labels and the extended secant line for `f` at `secant`.
///
/// Children are ordered: dx line, dy line, Δx label, Δy label, secant line. The dy leg and its
/// label take the graph color.
pub fn secant_slope_group(
    axes: &Axes,
    f: impl Fn(f64) -> f64,
    secant: Secant,
    graph_color: Color,
) -> Mobject {
    let ((x1, y1), (x2, y2)) = secant.endpoints(&f);
    let p1 = axes.c2p(x1, y1);
    let p2 = axes.c2p(x2, y2);
    let interim = Point::new(p2.x, p1.y);
    let sign = secant.dx.signum();

    // One scale for both labels.
    let natural = {
        let (a, b) = (label_extent(DX_LABEL), label_extent(DY_LABEL));
        Vec2::new(a.x.max(b.x), a.y.max(b.y))
    };
    let max_w = LABEL_FIT * (interim.x - p1.x).abs();
    let max_h = LABEL_FIT * (p2.y - interim.y).abs();
    let scale = 1.0_f64.min(max_w / natural.x).min(max_h / natural.y);

    let dx_size = label_extent(DX_LABEL) * scale;
    let dx_center = Point::new((p1.x + interim.x) / 2.0, interim.y - sign * dx_size.y);
    let dy_size = label_extent(DY_LABEL) * scale;
    let dy_center = Point::new(
        interim.x + sign * (dy_size.y / 2.0 + dy_size.x / 2.0),
        (interim.y + p2.y) / 2.0,
    );

    Mobject::group(vec![
        Mobject::line(p1, interim, DX_LINE_COLOR),
        Mobject::line(interim, p2, graph_color),
        label(DX_LABEL, scale, DX_LINE_COLOR, dx_center),
        label(DY_LABEL, scale, graph_color, dy_center),
        secant_line(axes, p1, p2, secant.slope(&f)),
    ])
}

/// The line through `p1` and `p2` stretched to `SECANT_LINE_LENGTH` about their midpoint.
///
/// Direction comes from the slope rather than `p2 - p1` so near-zero `dx` stays well conditioned.
fn secant_line(axes: &Axes, p1: Point, p2: Point, slope: f64) -> Mobject {
    let unit = axes.unit_size();
    let dir = Vec2::new(unit.x, unit.y * slope);
    let half = if dir.hypot() > 0.0 && dir.hypot().is_finite() {
        dir.normalize() * (SECANT_LINE_LENGTH / 2.0)
    } else {
        Vec2::ZERO
    };
    let mid = p1.midpoint(p2);
    Mobject::line(mid - half, mid + half, SECANT_LINE_COLOR)
}

fn label(text: &str, scale: f64, color: Color, center: Point) -> Mobject {
    let scale = if scale.is_finite() { scale.max(0.0) } else { 0.0 };
    Mobject::text(text, LABEL_FONT_SIZE, color)
        .scaled(scale)
        .moved_to(center)
}

fn label_extent(text: &str) -> Vec2 {
    let em = LABEL_FONT_SIZE / FONT_SIZE_PER_UNIT;
    Vec2::new(
        text.chars().count() as f64 * LABEL_ADVANCE_EM * em,
        LABEL_HEIGHT_EM * em,
    )
}

/// Secant group for the illustrated curve as drawn in the final segment.
pub fn curve_secant_group(
    axes: &Axes,
    f: impl Fn(f64) -> f64,
    x: f64,
    dx: f64,
    graph_color: Color,
) -> ReelResult<Mobject> {
    let secant = Secant::new(x, dx)?;
    Ok(secant_slope_group(axes, f, secant, graph_color))
}

#[cfg(test)]
#[path = "../../tests/unit/scene/secant.rs"]
mod tests;
