use super::*;

#[test]
fn curve_matches_direct_substitution() {
    assert!((curve(2.0) - 11.214_851_883_119_59).abs() < 1e-9);
    assert!((curve(6.0) - (-1.575_851_443_550_618_6)).abs() < 1e-9);
    assert_eq!(curve(0.0), 8.0);
}

#[test]
fn curve_is_finite_over_the_plot_domain() {
    let samples = sample(curve, CURVE_DOMAIN, 10_001).unwrap();
    assert_eq!(samples.len(), 10_001);
    assert_eq!(samples[0].0, 0.0);
    assert_eq!(samples[10_000].0, 10.0);
    assert!(samples.iter().all(|(_, y)| y.is_finite()));
}

#[test]
fn secant_requires_nonzero_finite_dx() {
    assert!(Secant::new(7.3, 0.0).is_err());
    assert!(Secant::new(7.3, f64::INFINITY).is_err());
    assert!(Secant::new(f64::NAN, 1.0).is_err());
    assert!(Secant::new(7.3, 1e-9).is_ok());
}

#[test]
fn secant_slope_of_a_line_is_exact() {
    let s = Secant::new(1.0, 0.5).unwrap();
    assert_eq!(s.slope(|x| 3.0 * x + 1.0), 3.0);
    let ((x1, y1), (x2, y2)) = s.endpoints(|x| 3.0 * x + 1.0);
    assert_eq!((x1, y1), (1.0, 4.0));
    assert_eq!((x2, y2), (1.5, 5.5));
}

#[test]
fn central_difference_of_a_parabola_is_exact() {
    let d = central_difference(|x| x * x, 3.0, 0.5);
    assert!((d - 6.0).abs() < 1e-12);
}

#[test]
fn sampling_rejects_degenerate_requests() {
    assert!(sample(curve, (0.0, 10.0), 1).is_err());
    assert!(sample(curve, (10.0, 0.0), 10).is_err());
    assert!(sample(curve, (0.0, f64::NAN), 10).is_err());
}
