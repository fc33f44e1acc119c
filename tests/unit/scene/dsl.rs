use super::*;
use crate::foundation::core::Point;

fn text(s: &str) -> Mobject {
    Mobject::text(s, 48.0, Color::WHITE)
}

#[test]
fn write_default_run_time_depends_on_glyph_count() {
    let mut b = SegmentBuilder::new(SegmentKind::Title);
    let short = b.add("short", text("Limits"), Placement::Natural);
    let long = b.add("long", text("Understanding Derivatives"), Placement::Natural);
    b.play(vec![write(short)]).unwrap();
    b.play(vec![write(long)]).unwrap();
    b.play(vec![fade_out(short), fade_out(long)]).unwrap();
    let seg = b.finish().unwrap();

    let run_times: Vec<f64> = seg
        .steps()
        .iter()
        .filter_map(|s| match s {
            Step::Play(p) => Some(p.run_time),
            Step::Wait { .. } => None,
        })
        .collect();
    assert_eq!(run_times, vec![1.0, 2.0, 1.0]);
    assert_eq!(seg.duration_secs(), 4.0);
}

#[test]
fn finish_requires_a_closing_fade_out() {
    let mut b = SegmentBuilder::new(SegmentKind::Title);
    let t = b.add("title", text("Hello"), Placement::Natural);
    b.play(vec![write(t)]).unwrap();
    b.wait(1.0).unwrap();
    assert!(b.finish().is_err());
}

#[test]
fn finish_rejects_objects_left_on_screen() {
    let mut b = SegmentBuilder::new(SegmentKind::Definition);
    let a = b.add("a", text("A"), Placement::Natural);
    let c = b.add("c", Mobject::dot(Point::ORIGIN, Color::RED), Placement::Natural);
    b.play(vec![write(a), fade_in(c)]).unwrap();
    b.play(vec![fade_out(a)]).unwrap();
    let err = b.finish().unwrap_err();
    assert!(err.to_string().contains("'c'"));
}

#[test]
fn play_validation() {
    let mut b = SegmentBuilder::new(SegmentKind::CarSpeed);
    let a = b.add("a", text("A"), Placement::Natural);
    assert!(b.play(vec![]).is_err());
    assert!(b.play_for(vec![write(a)], 0.0).is_err());
    assert!(b.play(vec![fade_out(a)]).is_err(), "not on screen yet");
    assert!(b.play(vec![write(ObjectId(9))]).is_err());
    assert!(b.play(vec![write(a), shift(a, Vec2::new(1.0, 0.0))]).is_err());
    assert!(b.play(vec![set_value(TrackerId(0), 1.0)]).is_err());
    assert!(b.wait(-1.0).is_err());
}

#[test]
fn tracker_tweens_are_validated() {
    let mut b = SegmentBuilder::new(SegmentKind::DerivativeAnimation);
    let x = b.tracker("x", 7.3).unwrap();
    assert!(b.tracker("bad", f64::NAN).is_err());
    assert!(b.play_for(vec![set_value(x, f64::INFINITY)], 4.0).is_err());
    b.play_for(vec![set_value(x, 1.0)], 4.0).unwrap();
}

#[test]
fn derived_objects_resolve_from_tracker_values() {
    let mut b = SegmentBuilder::new(SegmentKind::DerivativeAnimation);
    let x = b.tracker("x", 2.0).unwrap();
    assert!(
        b.always_redraw("bad", vec![TrackerId(5)], |_| Ok(text("?")))
            .is_err()
    );
    let dot = b
        .always_redraw("dot", vec![x], move |v| {
            Ok(Mobject::dot(Point::new(v.get(x)?, 0.0), Color::GREEN))
        })
        .unwrap();
    b.play(vec![fade_in(dot)]).unwrap();
    b.play(vec![fade_out(dot)]).unwrap();
    let seg = b.finish().unwrap();

    let mut values = seg.initial_values();
    values.set(x, 4.5).unwrap();
    let m = seg.object(dot).unwrap().resolve(&values).unwrap();
    assert_eq!(
        m.shape,
        Shape::Dot {
            center: Point::new(4.5, 0.0),
            radius: 0.08
        }
    );
}

#[test]
fn part_selection_membership() {
    assert!(PartSelection::All.contains(7));
    assert!(PartSelection::Index(0).contains(0));
    assert!(!PartSelection::Index(0).contains(1));
    assert!(!PartSelection::From(1).contains(0));
    assert!(PartSelection::From(1).contains(3));
}

#[test]
fn write_uses_linear_rate() {
    assert_eq!(write(ObjectId(0)).ease(), Ease::Linear);
    assert_eq!(fade_in(ObjectId(0)).ease(), Ease::Smooth);
    assert_eq!(set_value(TrackerId(0), 1.0).ease(), Ease::Smooth);
}

#[test]
fn segment_order_names() {
    let names: Vec<_> = SegmentKind::ORDER.iter().map(|k| k.name()).collect();
    assert_eq!(
        names,
        vec![
            "title",
            "definition",
            "car_speed",
            "limit_definition",
            "derivative_animation"
        ]
    );
}
