use crate::{
    calculus::curve::sample,
    foundation::core::{Color, Point, Vec2},
    foundation::error::{ReelError, ReelResult},
    scene::model::{DEFAULT_BUFF, FONT_SIZE_PER_UNIT, Mobject, PathSpec},
};

const AXIS_STROKE_WIDTH: f64 = 2.0;
const TICK_HALF: f64 = 0.1;
const TIP_LENGTH: f64 = 0.25;
const NUMBER_FONT_SIZE: f64 = 36.0;
// Rough glyph advance used to keep y-axis numbers clear of their ticks.
const DIGIT_ADVANCE_EM: f64 = 0.55;
/// Samples per unit of x used when plotting.
const PLOT_SAMPLES_PER_UNIT: f64 = 100.0;

/// Inclusive numeric range with tick spacing.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct AxisRange {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl AxisRange {
    pub fn new(min: f64, max: f64, step: f64) -> ReelResult<Self> {
        if !(min.is_finite() && max.is_finite() && step.is_finite()) {
            return Err(ReelError::validation("axis range values must be finite"));
        }
        if min >= max {
            return Err(ReelError::validation(format!(
                "axis range min ({min}) must be < max ({max})"
            )));
        }
        if step <= 0.0 {
            return Err(ReelError::validation("axis range step must be > 0"));
        }
        Ok(Self { min, max, step })
    }

    pub fn span(self) -> f64 {
        self.max - self.min
    }

    /// Tick values from `min` to `max` inclusive.
    pub fn ticks(self) -> Vec<f64> {
        let count = (self.span() / self.step + 1e-9).floor() as usize;
        (0..=count)
            .map(|i| self.min + self.step * i as f64)
            .collect()
    }
}

/// A pair of number lines centered on the scene origin.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct Axes {
    pub x_range: AxisRange,
    pub y_range: AxisRange,
    pub x_length: f64,
    pub y_length: f64,
    pub tips: bool,
    pub include_numbers: bool,
    pub color: Color,
}

impl Axes {
    pub fn new(x_range: AxisRange, y_range: AxisRange) -> Self {
        Self {
            x_range,
            y_range,
            x_length: 12.0,
            y_length: 6.0,
            tips: true,
            include_numbers: false,
            color: Color::WHITE,
        }
    }

    pub fn with_tips(mut self, tips: bool) -> Self {
        self.tips = tips;
        self
    }

    pub fn with_numbers(mut self, include_numbers: bool) -> Self {
        self.include_numbers = include_numbers;
        self
    }

    /// Coordinates to scene point.
    pub fn c2p(&self, x: f64, y: f64) -> Point {
        Point::new(
            -self.x_length / 2.0 + (x - self.x_range.min) / self.x_range.span() * self.x_length,
            -self.y_length / 2.0 + (y - self.y_range.min) / self.y_range.span() * self.y_length,
        )
    }

    /// Scene units per unit of x and y.
    pub fn unit_size(&self) -> Vec2 {
        Vec2::new(
            self.x_length / self.x_range.span(),
            self.y_length / self.y_range.span(),
        )
    }

    fn origin(&self) -> (f64, f64) {
        (
            0.0_f64.clamp(self.x_range.min, self.x_range.max),
            0.0_f64.clamp(self.y_range.min, self.y_range.max),
        )
    }

    /// Axis lines, ticks, optional tips and optional numbers as one group.
    pub fn mobject(&self) -> Mobject {
        let (ox, oy) = self.origin();
        let mut parts = Vec::new();

        let x_start = self.c2p(self.x_range.min, oy);
        let x_end = self.c2p(self.x_range.max, oy);
        let y_start = self.c2p(ox, self.y_range.min);
        let y_end = self.c2p(ox, self.y_range.max);
        parts.push(self.stroke(vec![x_start, x_end]));
        parts.push(self.stroke(vec![y_start, y_end]));

        for x in self.x_range.ticks() {
            if x == ox {
                continue;
            }
            let p = self.c2p(x, oy);
            parts.push(self.stroke(vec![
                p - Vec2::new(0.0, TICK_HALF),
                p + Vec2::new(0.0, TICK_HALF),
            ]));
        }
        for y in self.y_range.ticks() {
            if y == oy {
                continue;
            }
            let p = self.c2p(ox, y);
            parts.push(self.stroke(vec![
                p - Vec2::new(TICK_HALF, 0.0),
                p + Vec2::new(TICK_HALF, 0.0),
            ]));
        }

        if self.tips {
            parts.push(self.tip(x_end, Vec2::new(1.0, 0.0)));
            parts.push(self.tip(y_end, Vec2::new(0.0, 1.0)));
        }

        if self.include_numbers {
            let em = NUMBER_FONT_SIZE / FONT_SIZE_PER_UNIT;
            for x in self.x_range.ticks() {
                if x == ox {
                    continue;
                }
                let center = self.c2p(x, oy) - Vec2::new(0.0, TICK_HALF + DEFAULT_BUFF + em / 2.0);
                parts.push(self.number(x, center));
            }
            for y in self.y_range.ticks() {
                if y == oy {
                    continue;
                }
                let label = format_tick(y);
                let half_width = label.chars().count() as f64 * DIGIT_ADVANCE_EM * em / 2.0;
                let center = self.c2p(ox, y) - Vec2::new(TICK_HALF + DEFAULT_BUFF + half_width, 0.0);
                parts.push(self.number(y, center));
            }
        }

        Mobject::group(parts)
    }

    /// Plot `f` over `x_range` as a sampled polyline.
    pub fn plot(
        &self,
        f: impl Fn(f64) -> f64,
        x_range: (f64, f64),
        color: Color,
    ) -> ReelResult<Mobject> {
        let samples = ((x_range.1 - x_range.0) * PLOT_SAMPLES_PER_UNIT).ceil() as usize + 1;
        let points = sample(f, x_range, samples)?
            .into_iter()
            .map(|(x, y)| self.c2p(x, y))
            .collect();
        Ok(Mobject::path(PathSpec::polyline(points), color))
    }

    fn stroke(&self, points: Vec<Point>) -> Mobject {
        Mobject::path(
            PathSpec::polyline(points).with_stroke_width(AXIS_STROKE_WIDTH),
            self.color,
        )
    }

    fn tip(&self, base: Point, dir: Vec2) -> Mobject {
        let normal = Vec2::new(-dir.y, dir.x) * (TIP_LENGTH / 2.0);
        Mobject::path(
            PathSpec::polygon(vec![base + normal, base + dir * TIP_LENGTH, base - normal]),
            self.color,
        )
    }

    fn number(&self, value: f64, center: Point) -> Mobject {
        Mobject::text(format_tick(value), NUMBER_FONT_SIZE, self.color).moved_to(center)
    }
}

fn format_tick(v: f64) -> String {
    if v.fract() == 0.0 {
        format!("{v:.0}")
    } else {
        format!("{v}")
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/axes.rs"]
mod tests;
