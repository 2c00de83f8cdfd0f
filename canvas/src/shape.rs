//! Shape model: the four drawable variants, their colors, and their
//! single-line text form.
//!
//! A shape serializes to one space-separated line: a keyword, the
//! variant's coordinates, then the color as a signed 32-bit ARGB integer.
//!
//! ```text
//! ellipse   x1 y1 x2 y2 <argb>
//! rectangle x1 y1 x2 y2 <argb>
//! segment   x1 y1 x2 y2 <argb>
//! polyline  x;y x;y ... <argb>
//! ```
//!
//! [`Shape::parse`] is the inverse of the `Display` impl.

#[cfg(test)]
#[path = "shape_test.rs"]
mod shape_test;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::consts::{OPAQUE_ALPHA, RGB_MASK};
use crate::hit;

// =============================================================================
// ERRORS
// =============================================================================

/// Error returned when a token sequence does not describe a valid shape.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("missing shape keyword")]
    Empty,
    #[error("unknown shape kind: {0}")]
    UnknownKind(String),
    #[error("{kind} expects {expected} fields, found {found}")]
    WrongArity { kind: ShapeKind, expected: usize, found: usize },
    #[error("invalid number: {0:?}")]
    InvalidNumber(String),
    #[error("invalid point (expected x;y): {0:?}")]
    InvalidPoint(String),
    #[error("polyline has no points")]
    EmptyPolyline,
}

// =============================================================================
// PRIMITIVES
// =============================================================================

/// Integer pixel position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    #[must_use]
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self { x: self.x.saturating_add(dx), y: self.y.saturating_add(dy) }
    }
}

/// An opaque RGB color.
///
/// On the wire a color is the signed 32-bit ARGB value with alpha forced to
/// `0xFF`, so black is `-16777216`. Any alpha bits received are discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Color(u32);

impl Color {
    pub const BLACK: Self = Self(0x00_0000);
    pub const WHITE: Self = Self(0xFF_FFFF);
    pub const RED: Self = Self(0xFF_0000);
    pub const GREEN: Self = Self(0x00_FF00);
    pub const BLUE: Self = Self(0x00_00FF);

    #[must_use]
    pub fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self((u32::from(r) << 16) | (u32::from(g) << 8) | u32::from(b))
    }

    /// Build from a packed ARGB integer, ignoring the alpha byte.
    #[must_use]
    pub fn from_argb(argb: i32) -> Self {
        Self(argb.cast_unsigned() & RGB_MASK)
    }

    /// Packed ARGB integer with full opacity.
    #[must_use]
    pub fn to_argb(self) -> i32 {
        (self.0 | OPAQUE_ALPHA).cast_signed()
    }

    /// The 24-bit `0xRRGGBB` value.
    #[must_use]
    pub fn rgb(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_argb())
    }
}

impl FromStr for Color {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_int(s).map(Self::from_argb)
    }
}

/// Two opposite corners of an axis-aligned box, kept normalized so that
/// `x1 <= x2` and `y1 <= y2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Corners {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl Corners {
    /// Normalize any two corners into upper-left / lower-right order.
    #[must_use]
    pub fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self { x1: x1.min(x2), y1: y1.min(y2), x2: x1.max(x2), y2: y1.max(y2) }
    }

    /// A zero-size box with both corners at `p`.
    #[must_use]
    pub fn anchored(p: Point) -> Self {
        Self { x1: p.x, y1: p.y, x2: p.x, y2: p.y }
    }

    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.x1 == self.x2 || self.y1 == self.y2
    }

    fn translate(&mut self, dx: i32, dy: i32) {
        self.x1 = self.x1.saturating_add(dx);
        self.x2 = self.x2.saturating_add(dx);
        self.y1 = self.y1.saturating_add(dy);
        self.y2 = self.y2.saturating_add(dy);
    }
}

// =============================================================================
// SHAPE
// =============================================================================

/// Discriminant of a [`Shape`], also the keyword that starts its line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Ellipse,
    Rectangle,
    Segment,
    Polyline,
}

impl ShapeKind {
    #[must_use]
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Ellipse => "ellipse",
            Self::Rectangle => "rectangle",
            Self::Segment => "segment",
            Self::Polyline => "polyline",
        }
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

impl FromStr for ShapeKind {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ellipse" => Ok(Self::Ellipse),
            "rectangle" => Ok(Self::Rectangle),
            "segment" => Ok(Self::Segment),
            "polyline" => Ok(Self::Polyline),
            other => Err(ParseError::UnknownKind(other.to_owned())),
        }
    }
}

/// A drawable entity on the sketch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Shape {
    /// Ellipse inscribed in the bounding box.
    Ellipse { corners: Corners, color: Color },
    /// Filled axis-aligned rectangle.
    Rectangle { corners: Corners, color: Color },
    /// Straight line between two endpoints.
    Segment { start: Point, end: Point, color: Color },
    /// Freehand stroke through an ordered, non-empty list of points.
    Polyline { points: Vec<Point>, color: Color },
}

impl Shape {
    #[must_use]
    pub fn ellipse(x1: i32, y1: i32, x2: i32, y2: i32, color: Color) -> Self {
        Self::Ellipse { corners: Corners::new(x1, y1, x2, y2), color }
    }

    #[must_use]
    pub fn rectangle(x1: i32, y1: i32, x2: i32, y2: i32, color: Color) -> Self {
        Self::Rectangle { corners: Corners::new(x1, y1, x2, y2), color }
    }

    #[must_use]
    pub fn segment(x1: i32, y1: i32, x2: i32, y2: i32, color: Color) -> Self {
        Self::Segment { start: Point::new(x1, y1), end: Point::new(x2, y2), color }
    }

    /// A one-point polyline; extend it with [`Shape::push_point`].
    #[must_use]
    pub fn polyline(start: Point, color: Color) -> Self {
        Self::Polyline { points: vec![start], color }
    }

    /// A shape of `kind` anchored at a single point, as created on the first
    /// press of a drawing gesture.
    #[must_use]
    pub fn anchored(kind: ShapeKind, at: Point, color: Color) -> Self {
        match kind {
            ShapeKind::Ellipse => Self::Ellipse { corners: Corners::anchored(at), color },
            ShapeKind::Rectangle => Self::Rectangle { corners: Corners::anchored(at), color },
            ShapeKind::Segment => Self::Segment { start: at, end: at, color },
            ShapeKind::Polyline => Self::polyline(at, color),
        }
    }

    #[must_use]
    pub fn kind(&self) -> ShapeKind {
        match self {
            Self::Ellipse { .. } => ShapeKind::Ellipse,
            Self::Rectangle { .. } => ShapeKind::Rectangle,
            Self::Segment { .. } => ShapeKind::Segment,
            Self::Polyline { .. } => ShapeKind::Polyline,
        }
    }

    #[must_use]
    pub fn color(&self) -> Color {
        match self {
            Self::Ellipse { color, .. }
            | Self::Rectangle { color, .. }
            | Self::Segment { color, .. }
            | Self::Polyline { color, .. } => *color,
        }
    }

    pub fn set_color(&mut self, new: Color) {
        match self {
            Self::Ellipse { color, .. }
            | Self::Rectangle { color, .. }
            | Self::Segment { color, .. }
            | Self::Polyline { color, .. } => *color = new,
        }
    }

    /// Whether `(x, y)` hits this shape.
    #[must_use]
    pub fn contains(&self, x: i32, y: i32) -> bool {
        let p = Point::new(x, y);
        match self {
            Self::Ellipse { corners, .. } => hit::ellipse_contains(corners, p),
            Self::Rectangle { corners, .. } => hit::box_contains(corners, p),
            Self::Segment { start, end, .. } => hit::near_segment(p, *start, *end),
            Self::Polyline { points, .. } => hit::near_polyline(points, p),
        }
    }

    /// Shift every defining coordinate by `(dx, dy)`.
    pub fn translate(&mut self, dx: i32, dy: i32) {
        match self {
            Self::Ellipse { corners, .. } | Self::Rectangle { corners, .. } => corners.translate(dx, dy),
            Self::Segment { start, end, .. } => {
                *start = start.offset(dx, dy);
                *end = end.offset(dx, dy);
            }
            Self::Polyline { points, .. } => {
                for p in points.iter_mut() {
                    *p = p.offset(dx, dy);
                }
            }
        }
    }

    /// Redefine an ellipse or rectangle from two arbitrary corners.
    /// Returns `false` for other variants.
    pub fn set_corners(&mut self, a: Point, b: Point) -> bool {
        match self {
            Self::Ellipse { corners, .. } | Self::Rectangle { corners, .. } => {
                *corners = Corners::new(a.x, a.y, b.x, b.y);
                true
            }
            _ => false,
        }
    }

    /// Move the free end of a segment. Returns `false` for other variants.
    pub fn set_end(&mut self, p: Point) -> bool {
        match self {
            Self::Segment { end, .. } => {
                *end = p;
                true
            }
            _ => false,
        }
    }

    /// Append a point to a polyline. Returns `false` for other variants.
    pub fn push_point(&mut self, p: Point) -> bool {
        match self {
            Self::Polyline { points, .. } => {
                points.push(p);
                true
            }
            _ => false,
        }
    }

    /// Parse a shape from its tokens, keyword first.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] for an unknown keyword, a wrong field count,
    /// a non-numeric field, or a polyline without points.
    pub fn parse(tokens: &[&str]) -> Result<Self, ParseError> {
        let Some((keyword, fields)) = tokens.split_first() else {
            return Err(ParseError::Empty);
        };
        let kind: ShapeKind = keyword.parse()?;

        if kind == ShapeKind::Polyline {
            let Some((color, points)) = fields.split_last() else {
                return Err(ParseError::WrongArity { kind, expected: 2, found: 0 });
            };
            if points.is_empty() {
                return Err(ParseError::EmptyPolyline);
            }
            let points = points
                .iter()
                .map(|t| parse_point(t))
                .collect::<Result<Vec<_>, _>>()?;
            return Ok(Self::Polyline { points, color: color.parse()? });
        }

        let [x1, y1, x2, y2, color] = fields else {
            return Err(ParseError::WrongArity { kind, expected: 5, found: fields.len() });
        };
        let (x1, y1, x2, y2) = (parse_int(x1)?, parse_int(y1)?, parse_int(x2)?, parse_int(y2)?);
        let color: Color = color.parse()?;

        Ok(match kind {
            ShapeKind::Ellipse => Self::ellipse(x1, y1, x2, y2, color),
            ShapeKind::Rectangle => Self::rectangle(x1, y1, x2, y2, color),
            ShapeKind::Segment | ShapeKind::Polyline => Self::segment(x1, y1, x2, y2, color),
        })
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind())?;
        match self {
            Self::Ellipse { corners, .. } | Self::Rectangle { corners, .. } => {
                write!(f, " {} {} {} {}", corners.x1, corners.y1, corners.x2, corners.y2)?;
            }
            Self::Segment { start, end, .. } => {
                write!(f, " {} {} {} {}", start.x, start.y, end.x, end.y)?;
            }
            Self::Polyline { points, .. } => {
                for p in points {
                    write!(f, " {};{}", p.x, p.y)?;
                }
            }
        }
        write!(f, " {}", self.color())
    }
}

impl FromStr for Shape {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tokens: Vec<&str> = s.split_ascii_whitespace().collect();
        Self::parse(&tokens)
    }
}

// =============================================================================
// HELPERS
// =============================================================================

fn parse_int(token: &str) -> Result<i32, ParseError> {
    token
        .parse::<i32>()
        .map_err(|_| ParseError::InvalidNumber(token.to_owned()))
}

fn parse_point(token: &str) -> Result<Point, ParseError> {
    let Some((x, y)) = token.split_once(';') else {
        return Err(ParseError::InvalidPoint(token.to_owned()));
    };
    let (Ok(x), Ok(y)) = (x.parse(), y.parse()) else {
        return Err(ParseError::InvalidPoint(token.to_owned()));
    };
    Ok(Point::new(x, y))
}
