use crate::foundation::error::{ReelError, ReelResult};

/// Plot domain of the illustrated curve.
pub const CURVE_DOMAIN: (f64, f64) = (0.0, 10.0);

/// The curve used to illustrate the derivative:
/// `f(x) = -( sin(x-4)·√(x/4)·(x+3) + 0.1·(x-2)²·sin(x) + 7 - 15 )`.
///
/// No domain checks; `x/4` must be non-negative for a real result.
pub fn curve(x: f64) -> f64 {
    -(((x - 4.0).sin() * (x / 4.0).sqrt() * (x + 3.0))
        + (0.1 * (x - 2.0).powi(2) * x.sin() + 7.0)
        - 15.0)
}

/// Base point and horizontal offset of a secant line.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct Secant {
    pub x: f64,
    pub dx: f64,
}

impl Secant {
    pub fn new(x: f64, dx: f64) -> ReelResult<Self> {
        if !x.is_finite() {
            return Err(ReelError::validation("secant x must be finite"));
        }
        if !dx.is_finite() || dx == 0.0 {
            return Err(ReelError::validation(
                "secant dx must be finite and non-zero",
            ));
        }
        Ok(Self { x, dx })
    }

    /// `(f(x+dx) - f(x)) / dx`
    pub fn slope(self, f: impl Fn(f64) -> f64) -> f64 {
        (f(self.x + self.dx) - f(self.x)) / self.dx
    }

    /// The two curve points `(x, f(x))` and `(x+dx, f(x+dx))`.
    pub fn endpoints(self, f: impl Fn(f64) -> f64) -> ((f64, f64), (f64, f64)) {
        let x2 = self.x + self.dx;
        ((self.x, f(self.x)), (x2, f(x2)))
    }
}

/// Symmetric difference quotient `(f(x+h) - f(x-h)) / 2h`.
pub fn central_difference(f: impl Fn(f64) -> f64, x: f64, h: f64) -> f64 {
    (f(x + h) - f(x - h)) / (2.0 * h)
}

/// Evenly spaced samples of `f` over `[start, end]`, endpoints included.
pub fn sample(f: impl Fn(f64) -> f64, range: (f64, f64), samples: usize) -> ReelResult<Vec<(f64, f64)>> {
    let (start, end) = range;
    if samples < 2 {
        return Err(ReelError::validation("curve sampling needs at least 2 samples"));
    }
    if !start.is_finite() || !end.is_finite() || start >= end {
        return Err(ReelError::validation(format!(
            "invalid sampling range [{start}, {end}]"
        )));
    }

    let step = (end - start) / (samples - 1) as f64;
    Ok((0..samples)
        .map(|i| {
            let x = if i == samples - 1 {
                end
            } else {
                start + step * i as f64
            };
            (x, f(x))
        })
        .collect())
}

#[cfg(test)]
#[path = "../../tests/unit/calculus/curve.rs"]
mod tests;
