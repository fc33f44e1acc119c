//! The presentation: five closed segments played back to back.

pub mod segments;

use crate::{
    foundation::core::Fps,
    foundation::error::ReelResult,
    scene::dsl::{Segment, SegmentKind, Step},
    timeline::{
        frames_for,
        instructions::{Instruction, InstructionSink},
    },
};

#[derive(Clone, Debug)]
pub struct Presentation {
    segments: Vec<Segment>,
}

impl Presentation {
    /// Build every segment in playback order.
    #[tracing::instrument]
    pub fn build() -> ReelResult<Self> {
        let segments = SegmentKind::ORDER
            .into_iter()
            .map(segments::build)
            .collect::<ReelResult<Vec<_>>>()?;
        for s in &segments {
            tracing::debug!(
                segment = s.kind.name(),
                objects = s.objects().len(),
                secs = s.duration_secs(),
                "segment built"
            );
        }
        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn duration_secs(&self) -> f64 {
        self.segments.iter().map(Segment::duration_secs).sum()
    }

    /// Emit every segment's instructions, in order, to `sink`. The first sink error aborts.
    pub fn drive(&self, fps: Fps, sink: &mut dyn InstructionSink) -> ReelResult<()> {
        for (index, segment) in self.segments.iter().enumerate() {
            tracing::info!(segment = segment.kind.name(), index, "segment begin");
            sink.accept(Instruction::SegmentBegin {
                index,
                kind: segment.kind,
            })?;
            for step in segment.steps() {
                let instruction = match step {
                    Step::Play(play) => Instruction::Play {
                        targets: play
                            .animations
                            .iter()
                            .filter_map(|a| a.target())
                            .map(|id| segment.object(id).map(|o| o.name.clone()))
                            .collect::<ReelResult<Vec<_>>>()?,
                        play: play.clone(),
                        frames: frames_for(fps, play.run_time),
                    },
                    Step::Wait { secs } => Instruction::Wait {
                        secs: *secs,
                        frames: frames_for(fps, *secs),
                    },
                };
                sink.accept(instruction)?;
            }
            sink.accept(Instruction::SegmentEnd {
                index,
                kind: segment.kind,
            })?;
        }
        Ok(())
    }
}
