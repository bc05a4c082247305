//! Facial landmark geometry (68-point convention)

use serde::{Deserialize, Serialize};
use std::ops::Range;

use crate::DmsError;

/// Number of points produced by the upstream landmark model
pub const LANDMARK_COUNT: usize = 68;

/// Right eye points (subject's right, image left)
pub const RIGHT_EYE: Range<usize> = 36..42;

/// Left eye points (subject's left, image right)
pub const LEFT_EYE: Range<usize> = 42..48;

/// Number of points outlining one eye
pub const EYE_POINTS: usize = 6;

/// 2D image point, serialized as `[x, y]`
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "(f32, f32)", into = "(f32, f32)")]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    pub fn distance(&self, other: &Point) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

impl From<(f32, f32)> for Point {
    fn from((x, y): (f32, f32)) -> Self {
        Self { x, y }
    }
}

impl From<Point> for (f32, f32) {
    fn from(p: Point) -> Self {
        (p.x, p.y)
    }
}

/// Which eye to extract
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Eye {
    Left,
    Right,
}

impl Eye {
    /// Index range of this eye within a [`LandmarkSet`]
    pub fn range(self) -> Range<usize> {
        match self {
            Eye::Left => LEFT_EYE,
            Eye::Right => RIGHT_EYE,
        }
    }
}

/// The six points outlining one eye.
///
/// Order: outer corner, two upper-lid points, inner corner, two lower-lid
/// points. `p1`/`p5` and `p2`/`p4` are vertically opposed pairs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EyeRegion {
    points: [Point; EYE_POINTS],
}

impl EyeRegion {
    pub fn new(points: [Point; EYE_POINTS]) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[Point; EYE_POINTS] {
        &self.points
    }
}

/// One frame of landmark points from the upstream detector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Point>", into = "Vec<Point>")]
pub struct LandmarkSet {
    points: Vec<Point>,
}

impl LandmarkSet {
    /// Wrap detector output, rejecting sets of the wrong cardinality
    pub fn new(points: Vec<Point>) -> Result<Self, DmsError> {
        if points.len() != LANDMARK_COUNT {
            return Err(DmsError::LandmarkCount {
                expected: LANDMARK_COUNT,
                actual: points.len(),
            });
        }
        Ok(Self { points })
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Extract one eye's region
    pub fn eye(&self, eye: Eye) -> EyeRegion {
        let range = eye.range();
        let mut points = [Point::default(); EYE_POINTS];
        points.copy_from_slice(&self.points[range]);
        EyeRegion::new(points)
    }

    pub fn left_eye(&self) -> EyeRegion {
        self.eye(Eye::Left)
    }

    pub fn right_eye(&self) -> EyeRegion {
        self.eye(Eye::Right)
    }

    /// Mean of all points
    pub fn centroid(&self) -> Point {
        let n = self.points.len() as f32;
        let (sx, sy) = self
            .points
            .iter()
            .fold((0.0f32, 0.0f32), |(sx, sy), p| (sx + p.x, sy + p.y));
        Point::new(sx / n, sy / n)
    }
}

impl TryFrom<Vec<Point>> for LandmarkSet {
    type Error = DmsError;

    fn try_from(points: Vec<Point>) -> Result<Self, Self::Error> {
        Self::new(points)
    }
}

impl From<LandmarkSet> for Vec<Point> {
    fn from(set: LandmarkSet) -> Self {
        set.points
    }
}
