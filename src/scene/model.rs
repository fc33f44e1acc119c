use crate::foundation::core::{Color, Point, Rect, Vec2};

/// Height of the visible frame in scene units. Width follows the canvas aspect ratio.
pub const FRAME_HEIGHT: f64 = 8.0;
/// Font-size units per scene unit of em size (`font_size` 48 gives a half-unit em).
pub const FONT_SIZE_PER_UNIT: f64 = 96.0;
/// Stroke width (pixels at 1080p) used for lines and plotted graphs.
pub const DEFAULT_STROKE_WIDTH: f64 = 4.0;
pub const DEFAULT_DOT_RADIUS: f64 = 0.08;
/// Spacing used by `next_to`.
pub const DEFAULT_BUFF: f64 = 0.25;
/// Spacing used by `to_edge` / `to_corner`.
pub const EDGE_BUFF: f64 = 0.5;

pub const UP: Vec2 = Vec2::new(0.0, 1.0);
pub const DOWN: Vec2 = Vec2::new(0.0, -1.0);
pub const LEFT: Vec2 = Vec2::new(-1.0, 0.0);
pub const RIGHT: Vec2 = Vec2::new(1.0, 0.0);
pub const UR: Vec2 = Vec2::new(1.0, 1.0);

/// Index of an object inside its segment.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct ObjectId(pub u32);

/// Text made of one or more independently colorable parts laid out on one line.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct TextSpec {
    pub parts: Vec<String>,
    pub font_size: f64,
    pub scale: f64,
}

impl TextSpec {
    pub fn plain(text: impl Into<String>, font_size: f64) -> Self {
        Self {
            parts: vec![text.into()],
            font_size,
            scale: 1.0,
        }
    }

    pub fn formula(parts: Vec<String>, font_size: f64) -> Self {
        Self {
            parts,
            font_size,
            scale: 1.0,
        }
    }

    pub fn scaled(mut self, factor: f64) -> Self {
        self.scale *= factor;
        self
    }

    /// Glyph-bearing characters, used to pick the default `Write` run time.
    pub fn visible_chars(&self) -> usize {
        self.parts
            .iter()
            .flat_map(|p| p.chars())
            .filter(|c| !c.is_whitespace())
            .count()
    }
}

/// A stroked (or filled) polyline in scene units.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct PathSpec {
    pub points: Vec<Point>,
    pub closed: bool,
    pub filled: bool,
    pub stroke_width: f64,
}

impl PathSpec {
    pub fn line(from: Point, to: Point) -> Self {
        Self {
            points: vec![from, to],
            closed: false,
            filled: false,
            stroke_width: DEFAULT_STROKE_WIDTH,
        }
    }

    pub fn polyline(points: Vec<Point>) -> Self {
        Self {
            points,
            closed: false,
            filled: false,
            stroke_width: DEFAULT_STROKE_WIDTH,
        }
    }

    pub fn polygon(points: Vec<Point>) -> Self {
        Self {
            points,
            closed: true,
            filled: true,
            stroke_width: 0.0,
        }
    }

    pub fn with_stroke_width(mut self, width: f64) -> Self {
        self.stroke_width = width;
        self
    }

    pub fn length(&self) -> f64 {
        self.points.windows(2).map(|w| (w[1] - w[0]).hypot()).sum()
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub enum Shape {
    Text(TextSpec),
    Dot { center: Point, radius: f64 },
    Path(PathSpec),
    /// External vector graphic scaled to `height` scene units.
    Svg { asset: String, height: f64 },
    Group(Vec<Mobject>),
}

/// Where a text or SVG object sits; geometric shapes carry absolute coordinates and use `Natural`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub enum Placement {
    /// Keep the shape's own coordinates (text and SVG are centered on the origin).
    Natural,
    ToEdge { edge: Vec2, buff: f64 },
    ToCorner { corner: Vec2, buff: f64 },
    NextTo {
        target: ObjectId,
        direction: Vec2,
        buff: f64,
    },
}

impl Placement {
    pub fn to_edge(edge: Vec2) -> Self {
        Self::ToEdge {
            edge,
            buff: EDGE_BUFF,
        }
    }

    pub fn to_corner(corner: Vec2) -> Self {
        Self::ToCorner {
            corner,
            buff: EDGE_BUFF,
        }
    }

    pub fn next_to(target: ObjectId, direction: Vec2) -> Self {
        Self::NextTo {
            target,
            direction,
            buff: DEFAULT_BUFF,
        }
    }
}

/// A drawable with its base color, translated by `offset` scene units.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Mobject {
    pub shape: Shape,
    pub color: Color,
    pub offset: Vec2,
}

impl Mobject {
    pub fn new(shape: Shape, color: Color) -> Self {
        Self {
            shape,
            color,
            offset: Vec2::ZERO,
        }
    }

    pub fn text(text: impl Into<String>, font_size: f64, color: Color) -> Self {
        Self::new(Shape::Text(TextSpec::plain(text, font_size)), color)
    }

    pub fn formula(parts: &[&str], font_size: f64, color: Color) -> Self {
        Self::new(
            Shape::Text(TextSpec::formula(
                parts.iter().map(|p| (*p).to_string()).collect(),
                font_size,
            )),
            color,
        )
    }

    pub fn dot(center: Point, color: Color) -> Self {
        Self::new(
            Shape::Dot {
                center,
                radius: DEFAULT_DOT_RADIUS,
            },
            color,
        )
    }

    pub fn line(from: Point, to: Point, color: Color) -> Self {
        Self::new(Shape::Path(PathSpec::line(from, to)), color)
    }

    pub fn path(path: PathSpec, color: Color) -> Self {
        Self::new(Shape::Path(path), color)
    }

    pub fn svg(asset: impl Into<String>, height: f64) -> Self {
        Self::new(
            Shape::Svg {
                asset: asset.into(),
                height,
            },
            Color::WHITE,
        )
    }

    pub fn group(children: Vec<Mobject>) -> Self {
        Self::new(Shape::Group(children), Color::WHITE)
    }

    /// Center text or SVG content on `center`.
    pub fn moved_to(mut self, center: Point) -> Self {
        self.offset = center.to_vec2();
        self
    }

    /// Uniform scale about the shape's reference point: the center of text, SVG, and dots, and
    /// the bounding-box center of paths and groups.
    pub fn scaled(mut self, factor: f64) -> Self {
        let about = match &self.shape {
            Shape::Text(_) | Shape::Svg { .. } => self.offset.to_point(),
            Shape::Dot { center, .. } => *center + self.offset,
            Shape::Path(_) | Shape::Group(_) => self
                .geometric_bounds()
                .map(|r| r.center())
                .unwrap_or(Point::ORIGIN),
        };
        self.scale_about(about - self.offset, factor);
        self
    }

    // `about` is expressed in the shape's own coordinates (before `offset`).
    fn scale_about(&mut self, about: Point, factor: f64) {
        let map = |p: Point| about + (p - about) * factor;
        match &mut self.shape {
            Shape::Text(t) => t.scale *= factor,
            Shape::Svg { height, .. } => *height *= factor,
            Shape::Dot { center, radius } => {
                *center = map(*center);
                *radius *= factor;
            }
            Shape::Path(p) => {
                for pt in &mut p.points {
                    *pt = map(*pt);
                }
            }
            Shape::Group(children) => {
                for child in children {
                    match child.shape {
                        Shape::Text(_) | Shape::Svg { .. } => {
                            child.offset = map(child.offset.to_point()).to_vec2();
                            child.scale_about(Point::ORIGIN, factor);
                        }
                        _ => child.scale_about(about - child.offset, factor),
                    }
                }
            }
        }
    }

    /// Number of independently colorable parts (1 for non-text shapes).
    pub fn part_count(&self) -> usize {
        match &self.shape {
            Shape::Text(t) => t.parts.len().max(1),
            _ => 1,
        }
    }

    /// Bounds of absolutely positioned geometry, offset included. Text and SVG report `None`;
    /// their size comes from the layout pass.
    pub fn geometric_bounds(&self) -> Option<Rect> {
        let local = match &self.shape {
            Shape::Text(_) | Shape::Svg { .. } => None,
            Shape::Dot { center, radius } => Some(Rect::new(
                center.x - radius,
                center.y - radius,
                center.x + radius,
                center.y + radius,
            )),
            Shape::Path(p) => {
                let first = p.points.first()?;
                let mut r = Rect::from_points(*first, *first);
                for pt in &p.points[1..] {
                    r = r.union_pt(*pt);
                }
                Some(r)
            }
            Shape::Group(children) => children
                .iter()
                .filter_map(Mobject::geometric_bounds)
                .reduce(|a, b| a.union(b)),
        };
        local.map(|r| r + self.offset)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/model.rs"]
mod tests;
