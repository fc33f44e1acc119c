//! Frame timing of the presentation: where every segment and step sits on the output timeline.

pub mod instructions;

use crate::{
    foundation::core::{FrameIndex, FrameRange, Fps},
    foundation::error::{ReelError, ReelResult},
    scene::dsl::{SegmentKind, Step},
    script::Presentation,
};

/// Frames occupied by `secs` seconds; never zero so every step is visible.
pub fn frames_for(fps: Fps, secs: f64) -> u64 {
    fps.secs_to_frames_round(secs).max(1)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct StepTiming {
    pub step: usize,
    pub range: FrameRange,
    pub is_play: bool,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct SegmentTiming {
    pub kind: SegmentKind,
    pub range: FrameRange,
    pub steps: Vec<StepTiming>,
}

/// Resolved position of a global frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameLocation {
    pub segment: usize,
    /// Frame relative to the segment start.
    pub local: u64,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Timeline {
    pub fps: Fps,
    pub segments: Vec<SegmentTiming>,
    pub total_frames: u64,
}

impl Timeline {
    pub fn build(presentation: &Presentation, fps: Fps) -> Self {
        let mut cursor = 0u64;
        let segments = presentation
            .segments()
            .iter()
            .map(|segment| {
                let seg_start = cursor;
                let steps = segment
                    .steps()
                    .iter()
                    .enumerate()
                    .map(|(i, step)| {
                        let (secs, is_play) = match step {
                            Step::Play(p) => (p.run_time, true),
                            Step::Wait { secs } => (*secs, false),
                        };
                        let start = cursor;
                        cursor += frames_for(fps, secs);
                        StepTiming {
                            step: i,
                            range: FrameRange {
                                start: FrameIndex(start - seg_start),
                                end: FrameIndex(cursor - seg_start),
                            },
                            is_play,
                        }
                    })
                    .collect();
                SegmentTiming {
                    kind: segment.kind,
                    range: FrameRange {
                        start: FrameIndex(seg_start),
                        end: FrameIndex(cursor),
                    },
                    steps,
                }
            })
            .collect();

        Self {
            fps,
            segments,
            total_frames: cursor,
        }
    }

    pub fn duration_secs(&self) -> f64 {
        self.fps.frames_to_secs(self.total_frames)
    }

    pub fn full_range(&self) -> FrameRange {
        FrameRange {
            start: FrameIndex(0),
            end: FrameIndex(self.total_frames),
        }
    }

    pub fn locate(&self, frame: FrameIndex) -> ReelResult<FrameLocation> {
        let segment = self
            .segments
            .iter()
            .position(|s| s.range.contains(frame))
            .ok_or_else(|| {
                ReelError::evaluation(format!(
                    "frame {} is outside the timeline (0..{})",
                    frame.0, self.total_frames
                ))
            })?;
        Ok(FrameLocation {
            segment,
            local: frame.0 - self.segments[segment].range.start.0,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/mod.rs"]
mod tests;
