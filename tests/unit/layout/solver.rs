use super::*;
use crate::{
    foundation::core::Color,
    scene::model::{DOWN, LEFT, UP, UR},
};

/// Every glyph is 0.5 wide and 1.0 tall at scale 1; SVGs are twice as wide as tall.
struct Fixed;

impl Measure for Fixed {
    fn text_size(&mut self, text: &TextSpec) -> ReelResult<Vec2> {
        let chars: usize = text.parts.iter().map(|p| p.chars().count()).sum();
        Ok(Vec2::new(chars as f64 * 0.5, 1.0) * text.scale)
    }

    fn svg_size(&mut self, _asset: &str, height: f64) -> ReelResult<Vec2> {
        Ok(Vec2::new(2.0 * height, height))
    }
}

fn frame() -> SceneFrame {
    SceneFrame::for_canvas(Canvas::new(1920, 1080).unwrap())
}

#[test]
fn frame_width_follows_aspect() {
    let f = frame();
    assert_eq!(f.height, 8.0);
    assert!((f.width - 14.222_222_222_222_221).abs() < 1e-12);
}

#[test]
fn to_edge_keeps_the_other_axis() {
    let title = Mobject::text("abcd", 48.0, Color::BLUE);
    let placed = resolve_placements(
        frame(),
        &[(ObjectId(0), &title, Placement::to_edge(UP))],
        &mut Fixed,
    )
    .unwrap();
    let p = placed[&ObjectId(0)];
    assert_eq!(p.bounds.y1, 3.5);
    assert_eq!(p.bounds.center().x, 0.0);
}

#[test]
fn to_corner_and_left_edge() {
    let formula = Mobject::text("xy", 48.0, Color::WHITE);
    let car = Mobject::svg("car.svg", 1.0);
    let placed = resolve_placements(
        frame(),
        &[
            (ObjectId(0), &formula, Placement::to_corner(UR)),
            (ObjectId(1), &car, Placement::to_edge(LEFT)),
        ],
        &mut Fixed,
    )
    .unwrap();
    let f = placed[&ObjectId(0)].bounds;
    assert!((f.x1 - (frame().width / 2.0 - 0.5)).abs() < 1e-12);
    assert_eq!(f.y1, 3.5);

    let c = placed[&ObjectId(1)].bounds;
    assert!((c.x0 - (-frame().width / 2.0 + 0.5)).abs() < 1e-12);
    assert_eq!(c.center().y, 0.0);
}

#[test]
fn next_to_sits_below_and_centers() {
    let title = Mobject::text("abcdef", 72.0, Color::BLUE).moved_to(Point::new(1.0, 0.0));
    let subtitle = Mobject::text("ab", 48.0, Color::WHITE);
    let placed = resolve_placements(
        frame(),
        &[
            (ObjectId(0), &title, Placement::Natural),
            (ObjectId(1), &subtitle, Placement::next_to(ObjectId(0), DOWN)),
        ],
        &mut Fixed,
    )
    .unwrap();
    let t = placed[&ObjectId(0)].bounds;
    let s = placed[&ObjectId(1)].bounds;
    assert_eq!(s.y1, t.y0 - 0.25);
    assert_eq!(s.center().x, t.center().x);
}

#[test]
fn next_to_needs_an_earlier_anchor() {
    let a = Mobject::text("a", 48.0, Color::WHITE);
    let err = resolve_placements(
        frame(),
        &[(ObjectId(0), &a, Placement::next_to(ObjectId(3), DOWN))],
        &mut Fixed,
    );
    assert!(err.is_err());
}

#[test]
fn group_bounds_mix_measured_and_geometric_children() {
    let g = Mobject::group(vec![
        Mobject::line(Point::new(-3.0, 0.0), Point::new(3.0, 0.0), Color::WHITE),
        Mobject::text("ab", 48.0, Color::WHITE).moved_to(Point::new(0.0, 2.0)),
    ]);
    let r = natural_bounds(&g, &mut Fixed).unwrap();
    assert_eq!(r.x0, -3.0);
    assert_eq!(r.y1, 2.5);
}
