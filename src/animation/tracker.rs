use crate::{
    animation::ease::Ease,
    foundation::error::{ReelError, ReelResult},
    foundation::math::lerp,
};

/// Identifier of a tracked scalar within one segment.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct TrackerId(pub u32);

/// A named scalar whose changes drive dependent recomputation.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct ValueTracker {
    pub id: TrackerId,
    pub name: String,
    pub initial: f64,
}

/// Snapshot of every tracker value of a segment, indexed by [`TrackerId`].
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
pub struct TrackerValues {
    values: Vec<f64>,
}

impl TrackerValues {
    pub fn from_initial(trackers: &[ValueTracker]) -> Self {
        Self {
            values: trackers.iter().map(|t| t.initial).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, id: TrackerId) -> ReelResult<f64> {
        self.values
            .get(id.0 as usize)
            .copied()
            .ok_or_else(|| ReelError::animation(format!("unknown tracker {}", id.0)))
    }

    pub fn set(&mut self, id: TrackerId, value: f64) -> ReelResult<()> {
        let slot = self
            .values
            .get_mut(id.0 as usize)
            .ok_or_else(|| ReelError::animation(format!("unknown tracker {}", id.0)))?;
        *slot = value;
        Ok(())
    }

    pub(crate) fn raw(&self) -> &[f64] {
        &self.values
    }
}

/// Smooth transition of a tracker from its value at play start toward `target`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct TrackerTween {
    pub tracker: TrackerId,
    pub target: f64,
    pub ease: Ease,
}

impl TrackerTween {
    pub fn validate(&self) -> ReelResult<()> {
        if !self.target.is_finite() {
            return Err(ReelError::animation(format!(
                "tracker {} target must be finite",
                self.tracker.0
            )));
        }
        Ok(())
    }

    /// Value at linear progress `alpha`; the target is returned exactly once complete.
    pub fn sample(&self, from: f64, alpha: f64) -> f64 {
        if alpha >= 1.0 {
            return self.target;
        }
        lerp(from, self.target, self.ease.apply(alpha))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/tracker.rs"]
mod tests;
