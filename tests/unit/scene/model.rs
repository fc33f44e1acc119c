use super::*;

#[test]
fn visible_chars_ignore_whitespace() {
    let t = TextSpec::plain("Understanding Derivatives", 72.0);
    assert_eq!(t.visible_chars(), 24);
    assert_eq!(TextSpec::plain("", 48.0).visible_chars(), 0);
}

#[test]
fn dot_scales_about_its_center() {
    let dot = Mobject::dot(Point::new(1.0, 2.0), Color::GREEN).scaled(0.8);
    let Shape::Dot { center, radius } = dot.shape else {
        panic!("expected dot");
    };
    assert_eq!(center, Point::new(1.0, 2.0));
    assert!((radius - 0.064).abs() < 1e-12);
}

#[test]
fn path_scales_about_bounds_center() {
    let line = Mobject::line(Point::new(-1.0, 0.0), Point::new(1.0, 0.0), Color::YELLOW).scaled(5.0);
    let Shape::Path(p) = &line.shape else {
        panic!("expected path");
    };
    assert_eq!(p.points, vec![Point::new(-5.0, 0.0), Point::new(5.0, 0.0)]);
    assert!((p.length() - 10.0).abs() < 1e-12);
}

#[test]
fn text_scale_and_offset() {
    let label = Mobject::text("Δx", 48.0, Color::YELLOW)
        .moved_to(Point::new(2.0, -1.0))
        .scaled(0.5);
    assert_eq!(label.offset, Vec2::new(2.0, -1.0));
    let Shape::Text(t) = &label.shape else {
        panic!("expected text");
    };
    assert_eq!(t.scale, 0.5);
    assert!(label.geometric_bounds().is_none());
}

#[test]
fn group_bounds_union_children() {
    let g = Mobject::group(vec![
        Mobject::line(Point::new(0.0, 0.0), Point::new(2.0, 0.0), Color::YELLOW),
        Mobject::dot(Point::new(2.0, 3.0), Color::RED),
        Mobject::text("label", 48.0, Color::WHITE),
    ]);
    let r = g.geometric_bounds().unwrap();
    assert_eq!(r.x0, 0.0);
    assert!((r.y1 - 3.08).abs() < 1e-12);
    assert!((r.x1 - 2.08).abs() < 1e-12);
}

#[test]
fn part_counts() {
    assert_eq!(Mobject::formula(&["a", "b", "c"], 48.0, Color::WHITE).part_count(), 3);
    assert_eq!(Mobject::dot(Point::ORIGIN, Color::RED).part_count(), 1);
}
