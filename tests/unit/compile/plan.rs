use super::*;
use crate::{
    assets::FontChoice,
    eval::Evaluator,
    foundation::core::{FrameIndex, Fps},
    scene::dsl::SegmentKind,
    script::Presentation,
};

fn hd() -> Viewport {
    Viewport::new(Canvas::new(1920, 1080).unwrap())
}

fn store(presentation: &Presentation) -> Option<PreparedAssetStore> {
    let root = std::env::temp_dir().join(format!(
        "derivative_reel_plan_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ));
    std::fs::create_dir_all(&root).unwrap();
    std::fs::write(
        root.join("car.svg"),
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="40" height="20"><rect width="40" height="20" fill="#fff"/></svg>"##,
    )
    .unwrap();
    PreparedAssetStore::prepare(presentation, &root, &FontChoice::Auto).ok()
}

#[test]
fn viewport_maps_scene_to_pixels() {
    let v = hd();
    assert_eq!(v.ppu, 135.0);
    assert_eq!(v.point_px(Point::ORIGIN), Point::new(960.0, 540.0));
    let top_left = v.point_px(Point::new(-v.frame.width / 2.0, 4.0));
    assert!(top_left.x.abs() < 1e-9);
    assert!(top_left.y.abs() < 1e-9);
    assert_eq!(v.stroke_px(4.0), 4.0);
    assert_eq!(v.text_px(48.0), 67.5);
}

#[test]
fn partial_polyline_cuts_by_arc_length() {
    let pts = [
        Point::new(0.0, 0.0),
        Point::new(3.0, 0.0),
        Point::new(3.0, 1.0),
    ];
    assert_eq!(partial_polyline(&pts, 0.5), vec![Point::new(0.0, 0.0), Point::new(2.0, 0.0)]);
    assert_eq!(
        partial_polyline(&pts, 0.875),
        vec![Point::new(0.0, 0.0), Point::new(3.0, 0.0), Point::new(3.0, 0.5)]
    );
    assert_eq!(partial_polyline(&pts, 0.0), vec![Point::new(0.0, 0.0)]);
    assert_eq!(partial_polyline(&pts, 1.0).len(), 3);
    assert!(partial_polyline(&[], 0.5).is_empty());
}

#[test]
fn hidden_objects_emit_nothing() {
    let presentation = Presentation::build().unwrap();
    let Some(assets) = store(&presentation) else {
        return;
    };
    let mut text = TextCache::new(assets.font()).unwrap();
    let mut ev = Evaluator::new(&presentation, Fps::new(60, 1).unwrap());

    // First frame: the title write has not revealed any glyph yet.
    let f = ev.eval_frame(FrameIndex(0)).unwrap();
    let plan = compile_frame(&f, hd(), Color::BLACK, &assets, &mut text).unwrap();
    assert!(plan.ops.is_empty());

    let f = ev.eval_frame(FrameIndex(60)).unwrap();
    let plan = compile_frame(&f, hd(), Color::BLACK, &assets, &mut text).unwrap();
    let [DrawOp::Text { text: shaped, visible_glyphs, color, .. }] = plan.ops.as_slice() else {
        panic!("expected a single text op, got {:?}", plan.ops);
    };
    // Linear write, halfway through.
    assert!((*visible_glyphs - shaped.glyph_count as f64 / 2.0).abs() < 1e-9);
    assert_eq!(*color, Color::BLUE);
}

#[test]
fn derivative_slide_draws_geometry_and_labels() {
    let presentation = Presentation::build().unwrap();
    let Some(assets) = store(&presentation) else {
        return;
    };
    let mut text = TextCache::new(assets.font()).unwrap();
    let mut ev = Evaluator::new(&presentation, Fps::new(60, 1).unwrap());
    let start = ev
        .timeline()
        .segments
        .iter()
        .find(|s| s.kind == SegmentKind::DerivativeAnimation)
        .unwrap()
        .range
        .start
        .0;

    // Secant group fully visible, dx = 2.
    let f = ev.eval_frame(FrameIndex(start + 450)).unwrap();
    let plan = compile_frame(&f, hd(), Color::BLACK, &assets, &mut text).unwrap();
    let fills = plan
        .ops
        .iter()
        .filter(|op| matches!(op, DrawOp::FillPath { .. }))
        .count();
    let labels: Vec<Color> = plan
        .ops
        .iter()
        .filter_map(|op| match op {
            DrawOp::Text { color, .. } if *color != Color::WHITE && *color != Color::BLUE => {
                Some(*color)
            }
            _ => None,
        })
        .collect();
    assert!(fills > 20);
    assert!(labels.contains(&Color::YELLOW));
}

#[test]
fn car_is_drawn_as_svg_at_the_left_edge() {
    let presentation = Presentation::build().unwrap();
    let Some(assets) = store(&presentation) else {
        return;
    };
    let mut text = TextCache::new(assets.font()).unwrap();
    let mut ev = Evaluator::new(&presentation, Fps::new(60, 1).unwrap());
    let start = ev
        .timeline()
        .segments
        .iter()
        .find(|s| s.kind == SegmentKind::CarSpeed)
        .unwrap()
        .range
        .start
        .0;

    // Between the fade-in and the drive.
    let f = ev.eval_frame(FrameIndex(start + 180)).unwrap();
    let plan = compile_frame(&f, hd(), Color::BLACK, &assets, &mut text).unwrap();
    let Some(DrawOp::Svg { transform, opacity, .. }) =
        plan.ops.iter().find(|op| matches!(op, DrawOp::Svg { .. }))
    else {
        panic!("expected the car");
    };
    assert_eq!(*opacity, 1.0);
    let c = transform.as_coeffs();
    // 0.5 scene units of edge buffer at 135 px per unit.
    assert!((c[4] - 67.5).abs() < 1e-6);
    // 1 scene unit tall: 135 px for a 20 px tall drawing.
    assert!((c[3] - 6.75).abs() < 1e-9);
}
