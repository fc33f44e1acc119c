use super::*;
use crate::{assets::FontChoice, encode::sink::InMemorySink, render::backend::create_backend};

fn store(presentation: &Presentation) -> Option<PreparedAssetStore> {
    let root = std::env::temp_dir().join(format!(
        "derivative_reel_pipeline_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ));
    std::fs::create_dir_all(&root).unwrap();
    std::fs::write(
        root.join("car.svg"),
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="40" height="20"><rect width="40" height="20" fill="#fc6255"/></svg>"##,
    )
    .unwrap();
    PreparedAssetStore::prepare(presentation, &root, &FontChoice::Auto).ok()
}

fn renderer<'a>(presentation: &'a Presentation, assets: &'a PreparedAssetStore) -> Renderer<'a> {
    Renderer::new(
        presentation,
        Fps::new(60, 1).unwrap(),
        Canvas::new(192, 108).unwrap(),
        Color::BLACK,
        assets,
        create_backend(crate::render::backend::BackendKind::Cpu),
    )
    .unwrap()
}

fn range(start: u64, end: u64) -> FrameRange {
    FrameRange::new(FrameIndex(start), FrameIndex(end)).unwrap()
}

#[test]
fn waits_are_elided_after_the_first_frame() {
    let presentation = Presentation::build().unwrap();
    let Some(assets) = store(&presentation) else {
        return;
    };
    let mut r = renderer(&presentation, &assets);
    let mut sink = InMemorySink::new();

    // Inside the title slide's three second wait.
    let stats = r.render_range(range(250, 260), &mut sink).unwrap();
    assert_eq!(stats.frames_total, 10);
    assert_eq!(stats.frames_rendered, 1);
    assert_eq!(stats.frames_elided, 9);

    assert!(sink.is_finished());
    let frames = sink.frames();
    assert_eq!(frames.first().map(|(i, _)| i.0), Some(250));
    assert_eq!(frames.last().map(|(i, _)| i.0), Some(259));
    assert!(frames.iter().all(|(_, f)| f == &frames[0].1));
}

#[test]
fn animated_frames_are_all_rendered() {
    let presentation = Presentation::build().unwrap();
    let Some(assets) = store(&presentation) else {
        return;
    };
    let mut r = renderer(&presentation, &assets);
    let mut sink = InMemorySink::new();
    let stats = r.render_range(range(10, 20), &mut sink).unwrap();
    assert_eq!(stats.frames_rendered, 10);
    assert_eq!(stats.frames_elided, 0);

    let first = &sink.frames()[0].1;
    assert_eq!((first.width, first.height), (192, 108));
    assert_eq!(first.pixel(0, 0), Some([0, 0, 0, 255]));
}

#[test]
fn elision_can_be_turned_off() {
    let presentation = Presentation::build().unwrap();
    let Some(assets) = store(&presentation) else {
        return;
    };
    let mut r = renderer(&presentation, &assets);
    r.static_frame_elision = false;
    let stats = r.render_range(range(250, 255), &mut InMemorySink::new()).unwrap();
    assert_eq!(stats.frames_rendered, 5);
}

#[test]
fn ranges_past_the_end_are_rejected() {
    let presentation = Presentation::build().unwrap();
    let Some(assets) = store(&presentation) else {
        return;
    };
    let mut r = renderer(&presentation, &assets);
    let total = r.timeline().total_frames;
    assert_eq!(total, 78 * 60);
    let err = r
        .render_range(range(total - 1, total + 1), &mut InMemorySink::new())
        .unwrap_err();
    assert!(matches!(err, ReelError::Validation(_)), "{err}");
}

#[test]
fn last_frame_is_empty_after_the_final_fade_out() {
    let presentation = Presentation::build().unwrap();
    let Some(assets) = store(&presentation) else {
        return;
    };
    let mut r = renderer(&presentation, &assets);
    let last = r.timeline().total_frames - 1;
    // The last frame of a play samples just short of completion.
    let plan = r.plan_frame(FrameIndex(last)).unwrap();
    assert!(plan.ops.iter().all(|op| match op {
        crate::compile::DrawOp::FillPath { opacity, .. }
        | crate::compile::DrawOp::Text { opacity, .. }
        | crate::compile::DrawOp::Svg { opacity, .. } => *opacity < 0.01,
    }));
}

struct RejectAfter {
    inner: InMemorySink,
    limit: usize,
}

impl FrameSink for RejectAfter {
    fn begin(&mut self, cfg: SinkConfig) -> ReelResult<()> {
        self.inner.begin(cfg)
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> ReelResult<()> {
        if self.inner.frames().len() == self.limit {
            return Err(ReelError::encode("disk full"));
        }
        self.inner.push_frame(idx, frame)
    }

    fn end(&mut self) -> ReelResult<()> {
        self.inner.end()
    }

    fn abort(&mut self) -> ReelResult<()> {
        self.inner.abort()
    }
}

#[test]
fn failed_push_aborts_the_sink_instead_of_ending_it() {
    let presentation = Presentation::build().unwrap();
    let Some(assets) = store(&presentation) else {
        return;
    };
    let mut r = renderer(&presentation, &assets);
    let mut sink = RejectAfter {
        inner: InMemorySink::new(),
        limit: 3,
    };

    let err = r.render_range(range(0, 10), &mut sink).unwrap_err();
    assert!(matches!(err, ReelError::Encode(_)), "{err}");
    assert_eq!(sink.inner.frames().len(), 3);
    assert!(sink.inner.is_aborted());
    assert!(!sink.inner.is_finished());
}
