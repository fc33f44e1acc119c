use super::*;
use crate::animation::tracker::ValueTracker;

fn initial() -> TrackerValues {
    TrackerValues::from_initial(&[
        ValueTracker {
            id: TrackerId(0),
            name: "x".to_string(),
            initial: 7.3,
        },
        ValueTracker {
            id: TrackerId(1),
            name: "dx".to_string(),
            initial: 2.0,
        },
    ])
}

#[test]
fn nodes_recompute_only_when_dependencies_change() {
    let mut graph = ReactiveGraph::new(initial());
    let x_only = graph
        .add(Derived::new(vec![TrackerId(0)], |v| v.get(TrackerId(0))))
        .unwrap();
    let sum = graph
        .add(Derived::new(vec![TrackerId(0), TrackerId(1)], |v| {
            Ok(v.get(TrackerId(0))? + v.get(TrackerId(1))?)
        }))
        .unwrap();

    let mut frame = initial();
    graph.refresh(&frame).unwrap();
    assert_eq!(*graph.value(x_only).unwrap(), 7.3);
    assert_eq!(*graph.value(sum).unwrap(), 9.3);
    assert_eq!(graph.recompute_count(x_only), 1);
    assert_eq!(graph.recompute_count(sum), 1);

    // Unchanged values: nothing recomputes.
    graph.refresh(&frame).unwrap();
    assert_eq!(graph.recompute_count(x_only), 1);
    assert_eq!(graph.recompute_count(sum), 1);

    // Only dx moves: the x-only node keeps its cache.
    frame.set(TrackerId(1), 0.1).unwrap();
    graph.refresh(&frame).unwrap();
    assert_eq!(graph.recompute_count(x_only), 1);
    assert_eq!(graph.recompute_count(sum), 2);
    assert!((*graph.value(sum).unwrap() - 7.4).abs() < 1e-12);

    frame.set(TrackerId(0), 1.0).unwrap();
    graph.refresh(&frame).unwrap();
    assert_eq!(graph.recompute_count(x_only), 2);
    assert_eq!(*graph.value(x_only).unwrap(), 1.0);
}

#[test]
fn unknown_dependencies_and_mismatched_frames_are_rejected() {
    let mut graph: ReactiveGraph<f64> = ReactiveGraph::new(initial());
    assert!(
        graph
            .add(Derived::new(vec![TrackerId(5)], |_| Ok(0.0)))
            .is_err()
    );
    assert!(graph.refresh(&TrackerValues::default()).is_err());
}

#[test]
fn value_before_first_refresh_is_an_error() {
    let mut graph = ReactiveGraph::new(initial());
    let id = graph
        .add(Derived::new(vec![TrackerId(0)], |v| v.get(TrackerId(0))))
        .unwrap();
    assert!(graph.value(id).is_err());
}

#[test]
fn compute_errors_propagate() {
    let mut graph: ReactiveGraph<f64> = ReactiveGraph::new(initial());
    graph
        .add(Derived::new(vec![TrackerId(0)], |_| {
            Err(ReelError::animation("boom"))
        }))
        .unwrap();
    assert!(graph.refresh(&initial()).is_err());
}
