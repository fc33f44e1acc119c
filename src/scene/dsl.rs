//! Segment builder: declare objects and trackers, then script plays and waits against them.
//!
//! A [`SegmentBuilder`] mirrors how a presentation slide is written: objects are registered once,
//! animations reference them by [`ObjectId`], and [`SegmentBuilder::finish`] checks that the
//! segment closes by fading out everything it introduced.

use std::collections::BTreeSet;

use crate::{
    animation::{
        ease::Ease,
        reactive::Derived,
        tracker::{TrackerId, TrackerTween, TrackerValues, ValueTracker},
    },
    foundation::core::{Color, Vec2},
    foundation::error::{ReelError, ReelResult},
    scene::model::{Mobject, ObjectId, Placement, Shape},
};

/// Default run time of a play, seconds.
pub const DEFAULT_RUN_TIME: f64 = 1.0;
/// Default wait, seconds.
pub const DEFAULT_WAIT: f64 = 1.0;
/// Texts with at least this many glyphs write in 2 s instead of 1 s.
const LONG_WRITE_GLYPHS: usize = 15;

/// The five slides of the presentation, in playback order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentKind {
    Title,
    Definition,
    CarSpeed,
    LimitDefinition,
    DerivativeAnimation,
}

impl SegmentKind {
    pub const ORDER: [Self; 5] = [
        Self::Title,
        Self::Definition,
        Self::CarSpeed,
        Self::LimitDefinition,
        Self::DerivativeAnimation,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Definition => "definition",
            Self::CarSpeed => "car_speed",
            Self::LimitDefinition => "limit_definition",
            Self::DerivativeAnimation => "derivative_animation",
        }
    }
}

/// Which parts of a multi-part text an animation touches.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "kind", content = "index", rename_all = "snake_case")]
pub enum PartSelection {
    All,
    Index(usize),
    /// This part and every later one.
    From(usize),
}

impl PartSelection {
    pub fn contains(self, part: usize) -> bool {
        match self {
            Self::All => true,
            Self::Index(i) => part == i,
            Self::From(i) => part >= i,
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Animation {
    /// Reveal text glyph by glyph (linear rate).
    Write { target: ObjectId },
    /// Reveal geometry along its length.
    Create { target: ObjectId },
    /// Fade in while moving by `shift` into the final position.
    FadeIn { target: ObjectId, shift: Vec2 },
    FadeOut { target: ObjectId },
    SetColor {
        target: ObjectId,
        parts: PartSelection,
        color: Color,
    },
    Shift { target: ObjectId, by: Vec2 },
    SetValue(TrackerTween),
}

impl Animation {
    pub fn target(&self) -> Option<ObjectId> {
        match self {
            Self::Write { target }
            | Self::Create { target }
            | Self::FadeIn { target, .. }
            | Self::FadeOut { target }
            | Self::SetColor { target, .. }
            | Self::Shift { target, .. } => Some(*target),
            Self::SetValue(_) => None,
        }
    }

    pub fn ease(&self) -> Ease {
        match self {
            Self::Write { .. } => Ease::Linear,
            Self::SetValue(t) => t.ease,
            _ => Ease::Smooth,
        }
    }

    pub fn is_fade_out(&self) -> bool {
        matches!(self, Self::FadeOut { .. })
    }

    fn default_run_time(&self, objects: &[SceneObject]) -> f64 {
        let Self::Write { target } = self else {
            return DEFAULT_RUN_TIME;
        };
        let glyphs = objects
            .get(target.0 as usize)
            .and_then(|o| match &o.source {
                ObjectSource::Static(m) => Some(glyph_count(m)),
                ObjectSource::Derived(_) => None,
            })
            .unwrap_or(0);
        if glyphs < LONG_WRITE_GLYPHS {
            DEFAULT_RUN_TIME
        } else {
            2.0 * DEFAULT_RUN_TIME
        }
    }
}

fn glyph_count(m: &Mobject) -> usize {
    match &m.shape {
        Shape::Text(t) => t.visible_chars(),
        Shape::Group(children) => children.iter().map(glyph_count).sum(),
        _ => 0,
    }
}

pub fn write(target: ObjectId) -> Animation {
    Animation::Write { target }
}

pub fn create(target: ObjectId) -> Animation {
    Animation::Create { target }
}

pub fn fade_in(target: ObjectId) -> Animation {
    Animation::FadeIn {
        target,
        shift: Vec2::ZERO,
    }
}

pub fn fade_in_shift(target: ObjectId, shift: Vec2) -> Animation {
    Animation::FadeIn { target, shift }
}

pub fn fade_out(target: ObjectId) -> Animation {
    Animation::FadeOut { target }
}

pub fn set_color(target: ObjectId, color: Color) -> Animation {
    Animation::SetColor {
        target,
        parts: PartSelection::All,
        color,
    }
}

pub fn set_part_color(target: ObjectId, parts: PartSelection, color: Color) -> Animation {
    Animation::SetColor {
        target,
        parts,
        color,
    }
}

pub fn shift(target: ObjectId, by: Vec2) -> Animation {
    Animation::Shift { target, by }
}

pub fn set_value(tracker: TrackerId, target: f64) -> Animation {
    Animation::SetValue(TrackerTween {
        tracker,
        target,
        ease: Ease::Smooth,
    })
}

/// Animations played together for `run_time` seconds.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Play {
    pub animations: Vec<Animation>,
    pub run_time: f64,
}

impl Play {
    pub fn is_fade_out_only(&self) -> bool {
        !self.animations.is_empty() && self.animations.iter().all(Animation::is_fade_out)
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum Step {
    Play(Play),
    Wait { secs: f64 },
}

#[derive(Clone, Debug)]
pub enum ObjectSource {
    Static(Mobject),
    /// Rebuilt from tracker values whenever a dependency changes.
    Derived(Derived<Mobject>),
}

#[derive(Clone, Debug)]
pub struct SceneObject {
    pub id: ObjectId,
    pub name: String,
    pub source: ObjectSource,
    pub placement: Placement,
}

impl SceneObject {
    /// Geometry at the given tracker values. Static objects ignore them.
    pub fn resolve(&self, values: &TrackerValues) -> ReelResult<Mobject> {
        match &self.source {
            ObjectSource::Static(m) => Ok(m.clone()),
            ObjectSource::Derived(d) => d.compute(values),
        }
    }
}

/// A closed, validated slide.
#[derive(Clone, Debug)]
pub struct Segment {
    pub kind: SegmentKind,
    objects: Vec<SceneObject>,
    trackers: Vec<ValueTracker>,
    steps: Vec<Step>,
}

impl Segment {
    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    pub fn object(&self, id: ObjectId) -> ReelResult<&SceneObject> {
        self.objects
            .get(id.0 as usize)
            .ok_or_else(|| ReelError::validation(format!("unknown object {}", id.0)))
    }

    pub fn trackers(&self) -> &[ValueTracker] {
        &self.trackers
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn initial_values(&self) -> TrackerValues {
        TrackerValues::from_initial(&self.trackers)
    }

    /// Scripted duration in seconds, before frame rounding.
    pub fn duration_secs(&self) -> f64 {
        self.steps
            .iter()
            .map(|s| match s {
                Step::Play(p) => p.run_time,
                Step::Wait { secs } => *secs,
            })
            .sum()
    }
}

#[derive(Debug)]
pub struct SegmentBuilder {
    kind: SegmentKind,
    objects: Vec<SceneObject>,
    trackers: Vec<ValueTracker>,
    steps: Vec<Step>,
    live: BTreeSet<ObjectId>,
}

impl SegmentBuilder {
    pub fn new(kind: SegmentKind) -> Self {
        Self {
            kind,
            objects: Vec::new(),
            trackers: Vec::new(),
            steps: Vec::new(),
            live: BTreeSet::new(),
        }
    }

    pub fn add(&mut self, name: impl Into<String>, mobject: Mobject, placement: Placement) -> ObjectId {
        self.push_object(name.into(), ObjectSource::Static(mobject), placement)
    }

    /// Register an object rebuilt from `deps` whenever one of them changes.
    pub fn always_redraw(
        &mut self,
        name: impl Into<String>,
        deps: Vec<TrackerId>,
        build: impl Fn(&TrackerValues) -> ReelResult<Mobject> + Send + Sync + 'static,
    ) -> ReelResult<ObjectId> {
        for dep in &deps {
            if dep.0 as usize >= self.trackers.len() {
                return Err(ReelError::validation(format!(
                    "derived object depends on unknown tracker {}",
                    dep.0
                )));
            }
        }
        Ok(self.push_object(
            name.into(),
            ObjectSource::Derived(Derived::new(deps, build)),
            Placement::Natural,
        ))
    }

    pub fn tracker(&mut self, name: impl Into<String>, initial: f64) -> ReelResult<TrackerId> {
        if !initial.is_finite() {
            return Err(ReelError::validation("tracker initial value must be finite"));
        }
        let id = TrackerId(self.trackers.len() as u32);
        self.trackers.push(ValueTracker {
            id,
            name: name.into(),
            initial,
        });
        Ok(id)
    }

    /// Play with the default run time: the longest default of its animations.
    pub fn play(&mut self, animations: Vec<Animation>) -> ReelResult<()> {
        let run_time = animations
            .iter()
            .map(|a| a.default_run_time(&self.objects))
            .fold(DEFAULT_RUN_TIME, f64::max);
        self.play_for(animations, run_time)
    }

    pub fn play_for(&mut self, animations: Vec<Animation>, run_time: f64) -> ReelResult<()> {
        if animations.is_empty() {
            return Err(ReelError::animation("play needs at least one animation"));
        }
        if !run_time.is_finite() || run_time <= 0.0 {
            return Err(ReelError::animation(format!(
                "play run time must be > 0, got {run_time}"
            )));
        }

        let mut touched = BTreeSet::new();
        for anim in &animations {
            match anim {
                Animation::SetValue(tween) => {
                    if tween.tracker.0 as usize >= self.trackers.len() {
                        return Err(ReelError::animation(format!(
                            "unknown tracker {}",
                            tween.tracker.0
                        )));
                    }
                    tween.validate()?;
                }
                other => {
                    let Some(target) = other.target() else {
                        continue;
                    };
                    if target.0 as usize >= self.objects.len() {
                        return Err(ReelError::animation(format!("unknown object {}", target.0)));
                    }
                    if !touched.insert(target) {
                        return Err(ReelError::animation(format!(
                            "object '{}' animated twice in one play",
                            self.objects[target.0 as usize].name
                        )));
                    }
                    let object = &self.objects[target.0 as usize];
                    if matches!(other, Animation::SetColor { .. })
                        && matches!(object.source, ObjectSource::Derived(_))
                    {
                        return Err(ReelError::animation(format!(
                            "'{}' is redrawn from trackers and cannot be recolored",
                            object.name
                        )));
                    }
                    if other.is_fade_out() && !self.live.contains(&target) {
                        return Err(ReelError::animation(format!(
                            "fade out of '{}' which is not on screen",
                            self.objects[target.0 as usize].name
                        )));
                    }
                }
            }
        }

        for anim in &animations {
            match anim {
                Animation::Write { target }
                | Animation::Create { target }
                | Animation::FadeIn { target, .. } => {
                    self.live.insert(*target);
                }
                Animation::FadeOut { target } => {
                    self.live.remove(target);
                }
                _ => {}
            }
        }

        self.steps.push(Step::Play(Play {
            animations,
            run_time,
        }));
        Ok(())
    }

    pub fn wait(&mut self, secs: f64) -> ReelResult<()> {
        if !secs.is_finite() || secs <= 0.0 {
            return Err(ReelError::animation(format!("wait must be > 0, got {secs}")));
        }
        self.steps.push(Step::Wait { secs });
        Ok(())
    }

    /// Validate that the segment ends with one fade-out play covering every live object.
    pub fn finish(self) -> ReelResult<Segment> {
        let closes = matches!(self.steps.last(), Some(Step::Play(p)) if p.is_fade_out_only());
        if !closes {
            return Err(ReelError::validation(format!(
                "segment '{}' must end with a fade-out play",
                self.kind.name()
            )));
        }
        if let Some(left) = self.live.iter().next() {
            return Err(ReelError::validation(format!(
                "segment '{}' leaves '{}' on screen",
                self.kind.name(),
                self.objects[left.0 as usize].name
            )));
        }

        Ok(Segment {
            kind: self.kind,
            objects: self.objects,
            trackers: self.trackers,
            steps: self.steps,
        })
    }

    fn push_object(&mut self, name: String, source: ObjectSource, placement: Placement) -> ObjectId {
        let id = ObjectId(self.objects.len() as u32);
        self.objects.push(SceneObject {
            id,
            name,
            source,
            placement,
        });
        id
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/dsl.rs"]
mod tests;
