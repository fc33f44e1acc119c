//! Reactive redraw: derived values that recompute when their declared trackers change.
//!
//! A [`ReactiveGraph`] owns the current tracker values, a revision counter per tracker, and a set
//! of [`Derived`] nodes. [`ReactiveGraph::refresh`] is called once per rendered frame with the
//! frame's tracker values; a node recomputes only if one of its dependencies was bumped since the
//! node last ran.

use std::sync::Arc;

use crate::{
    animation::tracker::{TrackerId, TrackerValues},
    foundation::error::{ReelError, ReelResult},
};

/// Pure function from tracker values to a derived value.
pub type DeriveFn<T> = Arc<dyn Fn(&TrackerValues) -> ReelResult<T> + Send + Sync>;

/// A derived value with its declared tracker dependencies.
#[derive(Clone)]
pub struct Derived<T> {
    deps: Vec<TrackerId>,
    compute: DeriveFn<T>,
}

impl<T> Derived<T> {
    pub fn new(
        deps: impl Into<Vec<TrackerId>>,
        compute: impl Fn(&TrackerValues) -> ReelResult<T> + Send + Sync + 'static,
    ) -> Self {
        Self {
            deps: deps.into(),
            compute: Arc::new(compute),
        }
    }

    pub fn deps(&self) -> &[TrackerId] {
        &self.deps
    }

    pub fn compute(&self, values: &TrackerValues) -> ReelResult<T> {
        (self.compute)(values)
    }
}

impl<T> std::fmt::Debug for Derived<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Derived")
            .field("deps", &self.deps)
            .finish_non_exhaustive()
    }
}

/// Handle of a node registered in a [`ReactiveGraph`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(pub usize);

struct NodeSlot<T> {
    derived: Derived<T>,
    seen: Vec<u64>,
    cached: Option<T>,
    recomputes: u64,
}

pub struct ReactiveGraph<T> {
    values: TrackerValues,
    revisions: Vec<u64>,
    nodes: Vec<NodeSlot<T>>,
}

impl<T> ReactiveGraph<T> {
    pub fn new(initial: TrackerValues) -> Self {
        Self {
            revisions: vec![0; initial.len()],
            values: initial,
            nodes: Vec::new(),
        }
    }

    pub fn add(&mut self, derived: Derived<T>) -> ReelResult<NodeId> {
        for dep in derived.deps() {
            if dep.0 as usize >= self.revisions.len() {
                return Err(ReelError::animation(format!(
                    "derived value depends on unknown tracker {}",
                    dep.0
                )));
            }
        }
        self.nodes.push(NodeSlot {
            seen: Vec::new(),
            derived,
            cached: None,
            recomputes: 0,
        });
        Ok(NodeId(self.nodes.len() - 1))
    }

    pub fn values(&self) -> &TrackerValues {
        &self.values
    }

    /// Apply this frame's tracker values and recompute every stale node.
    pub fn refresh(&mut self, next: &TrackerValues) -> ReelResult<()> {
        if next.len() != self.revisions.len() {
            return Err(ReelError::animation(format!(
                "tracker count mismatch: graph has {}, frame has {}",
                self.revisions.len(),
                next.len()
            )));
        }

        for (idx, (old, new)) in self.values.raw().iter().zip(next.raw()).enumerate() {
            if old.to_bits() != new.to_bits() {
                self.revisions[idx] += 1;
            }
        }
        self.values = next.clone();

        for (node_idx, node) in self.nodes.iter_mut().enumerate() {
            let current: Vec<u64> = node
                .derived
                .deps()
                .iter()
                .map(|d| self.revisions[d.0 as usize])
                .collect();
            if node.cached.is_some() && node.seen == current {
                continue;
            }
            node.cached = Some(node.derived.compute(&self.values)?);
            node.seen = current;
            node.recomputes += 1;
            tracing::debug!(node = node_idx, recomputes = node.recomputes, "derived value recomputed");
        }
        Ok(())
    }

    pub fn value(&self, id: NodeId) -> ReelResult<&T> {
        self.nodes
            .get(id.0)
            .and_then(|n| n.cached.as_ref())
            .ok_or_else(|| {
                ReelError::evaluation(format!("derived node {} has not been computed", id.0))
            })
    }

    pub fn recompute_count(&self, id: NodeId) -> u64 {
        self.nodes.get(id.0).map(|n| n.recomputes).unwrap_or(0)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/reactive.rs"]
mod tests;
