use super::*;
use crate::{
    animation::tracker::TrackerId,
    scene::dsl::{Animation, Step},
    scene::model::Shape,
};

fn plays(segment: &Segment) -> Vec<&crate::scene::dsl::Play> {
    segment
        .steps()
        .iter()
        .filter_map(|s| match s {
            Step::Play(p) => Some(p),
            Step::Wait { .. } => None,
        })
        .collect()
}

#[test]
fn every_segment_builds_and_closes() {
    for kind in SegmentKind::ORDER {
        let segment = build(kind).unwrap();
        assert_eq!(segment.kind, kind);
        let last = plays(&segment).last().copied().unwrap();
        assert!(last.is_fade_out_only());
    }
}

#[test]
fn final_fade_outs_cover_every_object() {
    let expected = [2usize, 6, 2, 2, 6];
    for (kind, count) in SegmentKind::ORDER.into_iter().zip(expected) {
        let segment = build(kind).unwrap();
        assert_eq!(segment.objects().len(), count, "{kind:?}");
        let last = plays(&segment).last().copied().unwrap();
        assert_eq!(last.animations.len(), count, "{kind:?}");
    }
}

#[test]
fn car_slide_references_the_svg_asset() {
    let segment = build(SegmentKind::CarSpeed).unwrap();
    let car = &segment.objects()[1];
    let crate::scene::dsl::ObjectSource::Static(m) = &car.source else {
        panic!("car is static");
    };
    assert_eq!(
        m.shape,
        Shape::Svg {
            asset: CAR_ASSET.to_string(),
            height: 1.0
        }
    );
}

#[test]
fn derivative_slide_tracker_waypoints() {
    let segment = build(SegmentKind::DerivativeAnimation).unwrap();
    assert_eq!(segment.trackers().len(), 2);
    assert_eq!(segment.trackers()[0].initial, SECANT_X0);
    assert_eq!(segment.trackers()[1].initial, SECANT_DX0);

    let tweens: Vec<(TrackerId, f64, f64)> = plays(&segment)
        .iter()
        .filter_map(|p| match p.animations.as_slice() {
            [Animation::SetValue(t)] => Some((t.tracker, t.target, p.run_time)),
            _ => None,
        })
        .collect();
    assert_eq!(
        tweens,
        vec![
            (TrackerId(1), 0.1, 4.0),
            (TrackerId(1), 1e-9, 4.0),
            (TrackerId(0), 1.0, 4.0),
            (TrackerId(0), 8.0, 7.0),
        ]
    );
}

#[test]
fn derived_objects_follow_the_trackers() {
    let segment = build(SegmentKind::DerivativeAnimation).unwrap();
    let mut values = segment.initial_values();
    values.set(TrackerId(1), 1e-9).unwrap();
    for object in &segment.objects()[3..] {
        let m = object.resolve(&values).unwrap();
        assert!(m.geometric_bounds().is_some(), "{}", object.name);
    }
}
