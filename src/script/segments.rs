//! The five slides of the derivative presentation.

use crate::{
    calculus::curve::{CURVE_DOMAIN, curve},
    foundation::core::{Color, Point},
    foundation::error::ReelResult,
    scene::{
        axes::{AxisRange, Axes},
        dsl::{
            PartSelection, Segment, SegmentBuilder, SegmentKind, create, fade_in, fade_in_shift,
            fade_out, set_color, set_part_color, set_value, shift, write,
        },
        model::{DOWN, LEFT, Mobject, Placement, RIGHT, UP, UR},
        secant::curve_secant_group,
    },
};

/// Asset key of the car drawing, relative to the asset root.
pub const CAR_ASSET: &str = "car.svg";

const TITLE_SIZE: f64 = 48.0;
/// Initial secant base point and width in the final slide.
pub const SECANT_X0: f64 = 7.3;
pub const SECANT_DX0: f64 = 2.0;
/// Dots on the curve are drawn slightly smaller than the default.
const CURVE_DOT_SCALE: f64 = 0.8;

pub fn build(kind: SegmentKind) -> ReelResult<Segment> {
    match kind {
        SegmentKind::Title => title_slide(),
        SegmentKind::Definition => definition_slide(),
        SegmentKind::CarSpeed => car_speed_slide(),
        SegmentKind::LimitDefinition => limit_definition_slide(),
        SegmentKind::DerivativeAnimation => derivative_animation_slide(),
    }
}

fn title_slide() -> ReelResult<Segment> {
    let mut s = SegmentBuilder::new(SegmentKind::Title);
    let title = s.add(
        "title",
        Mobject::text("Understanding Derivatives", 72.0, Color::BLUE),
        Placement::Natural,
    );
    let subtitle = s.add(
        "subtitle",
        Mobject::text("Parsa Niavand", 48.0, Color::WHITE),
        Placement::next_to(title, DOWN),
    );

    s.play_for(vec![write(title)], 2.0)?;
    s.play_for(vec![fade_in_shift(subtitle, UP)], 2.0)?;
    s.wait(3.0)?;
    s.play(vec![fade_out(title), fade_out(subtitle)])?;
    s.finish()
}

fn definition_slide() -> ReelResult<Segment> {
    let mut s = SegmentBuilder::new(SegmentKind::Definition);
    let axes = Axes::new(AxisRange::new(0.0, 10.0, 1.0)?, AxisRange::new(0.0, 10.0, 1.0)?)
        .with_numbers(true);
    let p1 = axes.c2p(2.0, 3.0);
    let p2 = axes.c2p(6.0, 7.0);

    let title = s.add(
        "title",
        Mobject::text("", TITLE_SIZE, Color::WHITE),
        Placement::to_edge(UP),
    );
    let graph = s.add("axes", axes.mobject(), Placement::Natural);
    let point1 = s.add("point1", Mobject::dot(p1, Color::RED), Placement::Natural);
    let point2 = s.add("point2", Mobject::dot(p2, Color::BLUE), Placement::Natural);
    let line = s.add("line", Mobject::line(p1, p2, Color::YELLOW), Placement::Natural);
    let formula = s.add(
        "formula",
        Mobject::formula(&["Slope = (y₂ − y₁) / (x₂ − x₁)"], 48.0, Color::WHITE),
        Placement::to_corner(UR),
    );

    s.play(vec![write(title)])?;
    s.play(vec![create(graph)])?;
    s.play(vec![fade_in(point1), fade_in(point2)])?;
    s.play(vec![create(line)])?;
    s.play(vec![write(formula)])?;
    s.wait(2.0)?;
    s.play(vec![set_color(formula, Color::YELLOW)])?;
    s.wait(2.0)?;
    s.play(vec![
        fade_out(title),
        fade_out(graph),
        fade_out(formula),
        fade_out(line),
        fade_out(point1),
        fade_out(point2),
    ])?;
    s.finish()
}

fn car_speed_slide() -> ReelResult<Segment> {
    let mut s = SegmentBuilder::new(SegmentKind::CarSpeed);
    let title = s.add(
        "title",
        Mobject::text("Real-World Example: Car Speed", TITLE_SIZE, Color::BLUE),
        Placement::to_edge(UP),
    );
    let car = s.add(
        "car",
        Mobject::svg(CAR_ASSET, 2.0).scaled(0.5),
        Placement::to_edge(LEFT),
    );

    s.play(vec![write(title)])?;
    s.play(vec![fade_in_shift(car, RIGHT)])?;
    s.play_for(vec![shift(car, RIGHT * 10.0)], 5.0)?;
    s.wait(2.0)?;
    s.play(vec![fade_out(title), fade_out(car)])?;
    s.finish()
}

fn limit_definition_slide() -> ReelResult<Segment> {
    let mut s = SegmentBuilder::new(SegmentKind::LimitDefinition);
    let title = s.add(
        "title",
        Mobject::text("Limits for derivative", TITLE_SIZE, Color::BLUE),
        Placement::to_edge(UP),
    );
    let definition = s.add(
        "definition",
        Mobject::formula(&["f′(x) = lim h→0 (f(x+h) − f(x)) / h"], 48.0, Color::WHITE)
            .scaled(1.5),
        Placement::Natural,
    );

    s.play(vec![write(title)])?;
    s.play(vec![write(definition)])?;
    s.wait(3.0)?;
    s.play_for(
        vec![set_part_color(definition, PartSelection::Index(0), Color::YELLOW)],
        1.0,
    )?;
    // The formula is a single part, so this recolors nothing but still takes its second.
    s.play_for(
        vec![set_part_color(definition, PartSelection::From(1), Color::WHITE)],
        1.0,
    )?;
    s.wait(2.0)?;
    s.play(vec![fade_out(title), fade_out(definition)])?;
    s.finish()
}

fn derivative_animation_slide() -> ReelResult<Segment> {
    let mut s = SegmentBuilder::new(SegmentKind::DerivativeAnimation);
    let axes = Axes::new(AxisRange::new(0.0, 10.0, 1.0)?, AxisRange::new(0.0, 20.0, 5.0)?)
        .with_tips(false)
        .with_numbers(true);

    let title = s.add(
        "title",
        Mobject::text("Visualizing the Derivative", TITLE_SIZE, Color::BLUE),
        Placement::to_edge(UP),
    );
    let ax = s.add("axes", axes.mobject(), Placement::Natural);
    let graph = s.add(
        "graph",
        axes.plot(curve, CURVE_DOMAIN, Color::BLUE)?,
        Placement::Natural,
    );

    s.play(vec![write(title)])?;
    s.play_for(vec![create(ax), create(graph)], 2.0)?;
    s.wait(2.0)?;

    let x = s.tracker("x", SECANT_X0)?;
    let dx = s.tracker("dx", SECANT_DX0)?;

    let dot1 = s.always_redraw("dot1", vec![x], move |v| {
        let x = v.get(x)?;
        Ok(curve_dot(axes.c2p(x, curve(x)), Color::GREEN))
    })?;
    let dot2 = s.always_redraw("dot2", vec![x, dx], move |v| {
        let x2 = v.get(x)? + v.get(dx)?;
        Ok(curve_dot(axes.c2p(x2, curve(x2)), Color::ORANGE))
    })?;
    let secant = s.always_redraw("secant", vec![x, dx], move |v| {
        curve_secant_group(&axes, curve, v.get(x)?, v.get(dx)?, Color::BLUE)
    })?;

    s.play(vec![fade_in(dot1), fade_in(dot2), create(secant)])?;
    s.wait(2.0)?;

    s.play_for(vec![set_value(dx, 0.1)], 4.0)?;
    s.wait(2.0)?;
    s.play_for(vec![set_value(dx, 1e-9)], 4.0)?;
    s.wait(2.0)?;

    s.play_for(vec![set_value(x, 1.0)], 4.0)?;
    s.wait(1.0)?;
    s.play_for(vec![set_value(x, 8.0)], 7.0)?;
    s.wait(1.0)?;

    s.play(vec![
        fade_out(dot1),
        fade_out(dot2),
        fade_out(secant),
        fade_out(graph),
        fade_out(ax),
        fade_out(title),
    ])?;
    s.finish()
}

fn curve_dot(center: Point, color: Color) -> Mobject {
    Mobject::dot(center, color).scaled(CURVE_DOT_SCALE)
}

#[cfg(test)]
#[path = "../../tests/unit/script/segments.rs"]
mod tests;
