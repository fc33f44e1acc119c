use super::*;

#[test]
fn frame_range_contains_boundaries() {
    let r = FrameRange::new(FrameIndex(2), FrameIndex(5)).unwrap();
    assert!(!r.contains(FrameIndex(1)));
    assert!(r.contains(FrameIndex(2)));
    assert!(r.contains(FrameIndex(4)));
    assert!(!r.contains(FrameIndex(5)));
    assert_eq!(r.len_frames(), 3);
}

#[test]
fn frame_range_rejects_inverted_bounds() {
    assert!(FrameRange::new(FrameIndex(5), FrameIndex(2)).is_err());
    assert!(
        FrameRange::new(FrameIndex(3), FrameIndex(3))
            .unwrap()
            .is_empty()
    );
}

#[test]
fn fps_rounds_run_times_to_whole_frames() {
    let fps = Fps::new(60, 1).unwrap();
    assert_eq!(fps.secs_to_frames_round(2.0), 120);
    assert_eq!(fps.secs_to_frames_round(0.5), 30);
    assert_eq!(fps.secs_to_frames_round(-1.0), 0);

    let ntsc = Fps::new(30000, 1001).unwrap();
    let secs = ntsc.frames_to_secs(123);
    assert_eq!(ntsc.secs_to_frames_round(secs), 123);
}

#[test]
fn fps_and_canvas_reject_zero() {
    assert!(Fps::new(0, 1).is_err());
    assert!(Fps::new(60, 0).is_err());
    assert!(Canvas::new(0, 1080).is_err());
    assert!(Canvas::new(1920, 1080).is_ok());
}

#[test]
fn color_lerp_hits_endpoints() {
    assert_eq!(Color::WHITE.lerp(Color::YELLOW, 0.0), Color::WHITE);
    assert_eq!(Color::WHITE.lerp(Color::YELLOW, 1.0), Color::YELLOW);
    let mid = Color::BLACK.lerp(Color::WHITE, 0.5);
    assert_eq!(mid.r, 128);
    assert_eq!(mid.a, 255);
}
