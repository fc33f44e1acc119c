use super::*;
use crate::scene::model::Shape;

fn unit_axes() -> Axes {
    Axes::new(
        AxisRange::new(0.0, 10.0, 1.0).unwrap(),
        AxisRange::new(0.0, 20.0, 5.0).unwrap(),
    )
}

#[test]
fn ranges_reject_bad_bounds() {
    assert!(AxisRange::new(1.0, 1.0, 1.0).is_err());
    assert!(AxisRange::new(0.0, 1.0, 0.0).is_err());
    assert!(AxisRange::new(0.0, f64::NAN, 1.0).is_err());
}

#[test]
fn ticks_are_inclusive() {
    let r = AxisRange::new(0.0, 20.0, 5.0).unwrap();
    assert_eq!(r.ticks(), vec![0.0, 5.0, 10.0, 15.0, 20.0]);
}

#[test]
fn c2p_maps_corners_to_the_axes_box() {
    let axes = unit_axes();
    assert_eq!(axes.c2p(0.0, 0.0), Point::new(-6.0, -3.0));
    assert_eq!(axes.c2p(10.0, 20.0), Point::new(6.0, 3.0));
    assert_eq!(axes.c2p(5.0, 10.0), Point::new(0.0, 0.0));
    assert_eq!(axes.unit_size(), Vec2::new(1.2, 0.3));
}

#[test]
fn mobject_counts_lines_ticks_tips_and_numbers() {
    let axes = unit_axes();
    let Shape::Group(bare) = axes.with_tips(false).mobject().shape else {
        panic!("expected group");
    };
    // 2 axis lines, 10 x ticks, 4 y ticks (origin skipped).
    assert_eq!(bare.len(), 16);

    let Shape::Group(full) = axes.with_numbers(true).mobject().shape else {
        panic!("expected group");
    };
    // + 2 tips + 14 labels.
    assert_eq!(full.len(), 32);
    let labels: Vec<_> = full
        .iter()
        .filter_map(|m| match &m.shape {
            Shape::Text(t) => Some(t.parts[0].clone()),
            _ => None,
        })
        .collect();
    assert!(labels.contains(&"10".to_string()));
    assert!(labels.contains(&"15".to_string()));
    assert!(!labels.contains(&"0".to_string()));
}

#[test]
fn plot_samples_cover_the_range() {
    let axes = unit_axes();
    let graph = axes.plot(|x| 2.0 * x, (0.0, 10.0), Color::BLUE).unwrap();
    let Shape::Path(p) = &graph.shape else {
        panic!("expected path");
    };
    assert_eq!(p.points.len(), 1001);
    assert_eq!(p.points[0], axes.c2p(0.0, 0.0));
    assert_eq!(*p.points.last().unwrap(), axes.c2p(10.0, 20.0));
    assert_eq!(graph.color, Color::BLUE);
}
