use std::path::PathBuf;

use crate::{
    assets::{PreparedAssetStore, TextCache},
    compile::{RenderPlan, Viewport, compile_frame},
    encode::{
        ffmpeg::{FfmpegSink, FfmpegSinkOpts},
        sink::{FrameSink, SinkConfig},
    },
    eval::{EvaluatedFrame, Evaluator},
    foundation::core::{Canvas, Color, Fps, FrameIndex, FrameRange},
    foundation::error::{ReelError, ReelResult},
    render::backend::{FrameRGBA, RenderBackend},
    script::Presentation,
    timeline::Timeline,
};

/// Counters for one range render.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct RenderStats {
    /// Frames pushed to the sink.
    pub frames_total: u64,
    /// Frames that went through compile and raster.
    pub frames_rendered: u64,
    /// Frames reused because they draw the same picture as the previous one.
    pub frames_elided: u64,
}

/// Evaluate → compile → render session over one presentation.
///
/// Owns the evaluator (and with it the reactive cache), the shaping cache and the backend, so
/// rendering a range in order reuses all of them.
pub struct Renderer<'a> {
    evaluator: Evaluator<'a>,
    assets: &'a PreparedAssetStore,
    text: TextCache,
    backend: Box<dyn RenderBackend>,
    viewport: Viewport,
    background: Color,
    /// Skip compile and raster when a frame repeats the previous picture.
    pub static_frame_elision: bool,
}

impl<'a> Renderer<'a> {
    pub fn new(
        presentation: &'a Presentation,
        fps: Fps,
        canvas: Canvas,
        background: Color,
        assets: &'a PreparedAssetStore,
        backend: Box<dyn RenderBackend>,
    ) -> ReelResult<Self> {
        Ok(Self {
            evaluator: Evaluator::new(presentation, fps),
            text: TextCache::new(assets.font())?,
            assets,
            backend,
            viewport: Viewport::new(canvas),
            background,
            static_frame_elision: true,
        })
    }

    pub fn timeline(&self) -> &Timeline {
        self.evaluator.timeline()
    }

    pub fn fps(&self) -> Fps {
        self.timeline().fps
    }

    pub fn canvas(&self) -> Canvas {
        self.viewport.canvas
    }

    /// Evaluate and compile one frame without rasterizing it.
    pub fn plan_frame(&mut self, frame: FrameIndex) -> ReelResult<RenderPlan> {
        let eval = self.evaluator.eval_frame(frame)?;
        self.compile(&eval)
    }

    pub fn render_frame(&mut self, frame: FrameIndex) -> ReelResult<FrameRGBA> {
        let plan = self.plan_frame(frame)?;
        self.backend.render_plan(&plan, self.assets)
    }

    /// Render `range` in order into `sink`, bracketed by `begin` / `end`. A failure after `begin`
    /// aborts the sink so no partial output is left behind.
    #[tracing::instrument(skip_all, fields(start = range.start.0, end = range.end.0))]
    pub fn render_range(
        &mut self,
        range: FrameRange,
        sink: &mut dyn FrameSink,
    ) -> ReelResult<RenderStats> {
        if range.is_empty() {
            return Err(ReelError::validation("render range must be non-empty"));
        }
        let total = self.timeline().total_frames;
        if range.end.0 > total {
            return Err(ReelError::validation(format!(
                "render range end {} exceeds the presentation length {total}",
                range.end.0
            )));
        }

        let canvas = self.canvas();
        sink.begin(SinkConfig {
            width: canvas.width,
            height: canvas.height,
            fps: self.fps(),
            background: self.background,
        })?;

        let stats = match self.push_range(range, sink) {
            Ok(stats) => stats,
            Err(e) => {
                if let Err(abort_err) = sink.abort() {
                    tracing::warn!(error = %abort_err, "sink abort failed");
                }
                return Err(e);
            }
        };
        sink.end()?;

        tracing::info!(
            frames_total = stats.frames_total,
            frames_rendered = stats.frames_rendered,
            frames_elided = stats.frames_elided,
            "render finished"
        );
        Ok(stats)
    }

    fn push_range(
        &mut self,
        range: FrameRange,
        sink: &mut dyn FrameSink,
    ) -> ReelResult<RenderStats> {
        let mut stats = RenderStats::default();
        let mut previous: Option<(EvaluatedFrame, FrameRGBA)> = None;
        let mut segment = None;
        for f in range.start.0..range.end.0 {
            let eval = self.evaluator.eval_frame(FrameIndex(f))?;
            if segment != Some(eval.segment) {
                segment = Some(eval.segment);
                tracing::info!(segment = %eval.kind.name(), frame = f, "rendering segment");
            }

            let reuse = self.static_frame_elision
                && previous
                    .as_ref()
                    .is_some_and(|(prev, _)| prev.same_picture(&eval));
            let pixels = match previous.take() {
                Some((_, pixels)) if reuse => {
                    stats.frames_elided += 1;
                    pixels
                }
                _ => {
                    let plan = self.compile(&eval)?;
                    stats.frames_rendered += 1;
                    self.backend.render_plan(&plan, self.assets)?
                }
            };
            sink.push_frame(FrameIndex(f), &pixels)?;
            stats.frames_total += 1;
            previous = Some((eval, pixels));
        }
        Ok(stats)
    }

    /// Render the whole presentation into `sink`.
    pub fn render_all(&mut self, sink: &mut dyn FrameSink) -> ReelResult<RenderStats> {
        let range = self.timeline().full_range();
        self.render_range(range, sink)
    }

    fn compile(&mut self, eval: &EvaluatedFrame) -> ReelResult<RenderPlan> {
        compile_frame(eval, self.viewport, self.background, self.assets, &mut self.text)
    }
}

/// Render the whole presentation to an MP4 through the system `ffmpeg`.
pub fn render_to_mp4(
    renderer: &mut Renderer<'_>,
    out_path: impl Into<PathBuf>,
) -> ReelResult<RenderStats> {
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new(out_path));
    renderer.render_all(&mut sink)
}

#[cfg(test)]
#[path = "../../tests/unit/render/pipeline.rs"]
mod tests;
