use crate::{
    animation::{
        reactive::{NodeId, ReactiveGraph},
        tracker::TrackerValues,
    },
    foundation::core::{Color, FrameIndex, Fps, Vec2},
    foundation::error::{ReelError, ReelResult},
    scene::{
        dsl::{Animation, ObjectSource, Segment, SegmentKind, Step},
        model::{Mobject, ObjectId, Placement},
    },
    script::Presentation,
    timeline::{StepTiming, Timeline},
};

/// Per-object animation state at one frame.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct ObjectState {
    pub visible: bool,
    pub opacity: f64,
    /// Fraction of the object drawn by `Write` / `Create`.
    pub reveal: f64,
    /// Temporary or accumulated translation from `FadeIn` shifts and `Shift`.
    pub shift: Vec2,
    /// Per-part colors. Empty for tracker-driven objects, which keep their own colors.
    pub colors: Vec<Color>,
}

impl ObjectState {
    fn hidden(colors: Vec<Color>) -> Self {
        Self {
            visible: false,
            opacity: 1.0,
            reveal: 1.0,
            shift: Vec2::ZERO,
            colors,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct EvaluatedObject {
    pub id: ObjectId,
    pub mobject: Mobject,
    pub placement: Placement,
    pub state: ObjectState,
}

#[derive(Clone, Debug, PartialEq)]
pub struct EvaluatedFrame {
    pub frame: FrameIndex,
    pub segment: usize,
    pub kind: SegmentKind,
    pub trackers: TrackerValues,
    /// Every object of the segment in declaration order, hidden ones included.
    pub objects: Vec<EvaluatedObject>,
}

impl EvaluatedFrame {
    /// True when both frames would draw the same picture.
    pub fn same_picture(&self, other: &Self) -> bool {
        self.segment == other.segment && self.objects == other.objects
    }
}

struct ActiveSegment {
    index: usize,
    graph: ReactiveGraph<Mobject>,
    nodes: Vec<Option<NodeId>>,
}

/// Frame evaluator. States are replayed from the segment start for every frame, so frames can be
/// evaluated in any order; only the reactive cache of the current segment persists.
pub struct Evaluator<'a> {
    presentation: &'a Presentation,
    timeline: Timeline,
    active: Option<ActiveSegment>,
}

impl<'a> Evaluator<'a> {
    pub fn new(presentation: &'a Presentation, fps: Fps) -> Self {
        Self {
            timeline: Timeline::build(presentation, fps),
            presentation,
            active: None,
        }
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    #[tracing::instrument(skip_all, fields(frame = frame.0))]
    pub fn eval_frame(&mut self, frame: FrameIndex) -> ReelResult<EvaluatedFrame> {
        let loc = self.timeline.locate(frame)?;
        let segment = self
            .presentation
            .segments()
            .get(loc.segment)
            .ok_or_else(|| ReelError::evaluation(format!("missing segment {}", loc.segment)))?;
        let steps = &self.timeline.segments[loc.segment].steps;

        let (states, trackers) = replay(segment, steps, loc.local)?;

        let active = match self.active.take() {
            Some(a) if a.index == loc.segment => a,
            _ => {
                tracing::debug!(segment = segment.kind.name(), "reactive graph reset");
                activate(loc.segment, segment)?
            }
        };
        let active = self.active.insert(active);
        active.graph.refresh(&trackers)?;

        let mut objects = Vec::with_capacity(segment.objects().len());
        for ((object, state), node) in segment.objects().iter().zip(states).zip(&active.nodes) {
            let mobject = match (&object.source, node) {
                (ObjectSource::Static(m), _) => m.clone(),
                (ObjectSource::Derived(_), Some(node)) => active.graph.value(*node)?.clone(),
                (ObjectSource::Derived(_), None) => {
                    return Err(ReelError::evaluation(format!(
                        "derived object '{}' has no reactive node",
                        object.name
                    )));
                }
            };
            objects.push(EvaluatedObject {
                id: object.id,
                mobject,
                placement: object.placement,
                state,
            });
        }

        Ok(EvaluatedFrame {
            frame,
            segment: loc.segment,
            kind: segment.kind,
            trackers,
            objects,
        })
    }

    /// Recomputations of a tracker-driven object within the current segment.
    pub fn recompute_count(&self, object: ObjectId) -> Option<u64> {
        let active = self.active.as_ref()?;
        let node = (*active.nodes.get(object.0 as usize)?)?;
        Some(active.graph.recompute_count(node))
    }
}

fn activate(index: usize, segment: &Segment) -> ReelResult<ActiveSegment> {
    let mut graph = ReactiveGraph::new(segment.initial_values());
    let nodes = segment
        .objects()
        .iter()
        .map(|o| match &o.source {
            ObjectSource::Static(_) => Ok(None),
            ObjectSource::Derived(d) => graph.add(d.clone()).map(Some),
        })
        .collect::<ReelResult<Vec<_>>>()?;
    Ok(ActiveSegment {
        index,
        graph,
        nodes,
    })
}

/// Object states and tracker values at `local` frames into `segment`.
pub fn replay(
    segment: &Segment,
    timings: &[StepTiming],
    local: u64,
) -> ReelResult<(Vec<ObjectState>, TrackerValues)> {
    let mut states: Vec<ObjectState> = segment
        .objects()
        .iter()
        .map(|o| match &o.source {
            ObjectSource::Static(m) => ObjectState::hidden(vec![m.color; m.part_count()]),
            ObjectSource::Derived(_) => ObjectState::hidden(Vec::new()),
        })
        .collect();
    let mut values = segment.initial_values();

    for (step, timing) in segment.steps().iter().zip(timings) {
        if timing.range.start.0 > local {
            break;
        }
        let Step::Play(play) = step else {
            continue;
        };
        let n = timing.range.len_frames();
        let alpha = if local >= timing.range.end.0 || n == 0 {
            1.0
        } else {
            (local - timing.range.start.0) as f64 / n as f64
        };
        let from_values = values.clone();
        for anim in &play.animations {
            apply(anim, alpha, &mut states, &mut values, &from_values)?;
        }
    }
    Ok((states, values))
}

fn apply(
    anim: &Animation,
    alpha: f64,
    states: &mut [ObjectState],
    values: &mut TrackerValues,
    from_values: &TrackerValues,
) -> ReelResult<()> {
    if let Animation::SetValue(tween) = anim {
        let from = from_values.get(tween.tracker)?;
        return values.set(tween.tracker, tween.sample(from, alpha));
    }

    let target = anim
        .target()
        .ok_or_else(|| ReelError::evaluation("animation without a target"))?;
    let state = states
        .get_mut(target.0 as usize)
        .ok_or_else(|| ReelError::evaluation(format!("unknown object {}", target.0)))?;
    let done = alpha >= 1.0;
    let a = anim.ease().apply(alpha);

    match anim {
        Animation::Write { .. } | Animation::Create { .. } => {
            state.visible = true;
            state.reveal = if done { 1.0 } else { a };
        }
        Animation::FadeIn { shift, .. } => {
            state.visible = true;
            if !done {
                state.opacity *= a;
                state.shift -= *shift * (1.0 - a);
            }
        }
        Animation::FadeOut { .. } => {
            if done {
                *state = ObjectState::hidden(std::mem::take(&mut state.colors));
            } else {
                state.opacity *= 1.0 - a;
            }
        }
        Animation::SetColor { parts, color, .. } => {
            for (i, c) in state.colors.iter_mut().enumerate() {
                if parts.contains(i) {
                    *c = if done { *color } else { c.lerp(*color, a) };
                }
            }
        }
        Animation::Shift { by, .. } => {
            state.shift += if done { *by } else { *by * a };
        }
        Animation::SetValue(_) => {}
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/eval/evaluator.rs"]
mod tests;
