use super::*;

const ALL: [Ease; 2] = [Ease::Linear, Ease::Smooth];

#[test]
fn every_ease_pins_endpoints() {
    for ease in ALL {
        assert_eq!(ease.apply(0.0), 0.0, "{ease:?} at 0");
        assert_eq!(ease.apply(1.0), 1.0, "{ease:?} at 1");
        assert_eq!(ease.apply(-3.0), 0.0, "{ease:?} below range");
        assert_eq!(ease.apply(7.0), 1.0, "{ease:?} above range");
    }
}

#[test]
fn smooth_is_symmetric_and_monotonic() {
    assert!((Ease::Smooth.apply(0.5) - 0.5).abs() < 1e-12);
    assert!((Ease::Smooth.apply(0.25) - 0.070_103_716_545_108).abs() < 1e-9);
    let mut prev = 0.0;
    for i in 1..=100 {
        let v = Ease::Smooth.apply(f64::from(i) / 100.0);
        assert!(v >= prev);
        prev = v;
    }
}

#[test]
fn default_is_smooth() {
    assert_eq!(Ease::default(), Ease::Smooth);
}
