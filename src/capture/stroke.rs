//! Stroke geometry.

use serde::{Deserialize, Serialize};

/// One pointer sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrokePoint {
    /// Horizontal position in canvas pixels
    pub x: f32,
    /// Vertical position in canvas pixels (origin top-left)
    pub y: f32,
    /// Sample time in milliseconds, if the input device reports it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub t: Option<u64>,
}

impl StrokePoint {
    /// Create a point without a timestamp.
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y, t: None }
    }

    /// Create a timestamped point.
    pub fn timed(x: f32, y: f32, t: u64) -> Self {
        Self { x, y, t: Some(t) }
    }

    /// Whether both coordinates are finite.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Euclidean distance to another point.
    pub fn distance_to(&self, other: &StrokePoint) -> f32 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    pub(crate) fn midpoint(&self, other: &StrokePoint) -> (f32, f32) {
        ((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }
}

/// Samples from one pointer-down to the matching pointer-up, in arrival order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    points: Vec<StrokePoint>,
}

impl Stroke {
    /// Start a stroke at `point`.
    pub fn starting_at(point: StrokePoint) -> Self {
        Self {
            points: vec![point],
        }
    }

    /// Build a stroke from existing samples.
    pub fn from_points(points: Vec<StrokePoint>) -> Self {
        Self { points }
    }

    /// Append a sample.
    pub fn push(&mut self, point: StrokePoint) {
        self.points.push(point);
    }

    /// Samples in arrival order.
    pub fn points(&self) -> &[StrokePoint] {
        &self.points
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the stroke has no samples.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Total length of the polyline through all samples.
    pub fn path_length(&self) -> f32 {
        self.points
            .windows(2)
            .map(|pair| pair[0].distance_to(&pair[1]))
            .sum()
    }

    /// Whether the stroke covers no distance (a tap, or no samples at all).
    pub fn is_zero_length(&self) -> bool {
        self.path_length() <= f32::EPSILON
    }

    /// Bounding box as `(min_x, min_y, max_x, max_y)`.
    pub fn bounds(&self) -> Option<(f32, f32, f32, f32)> {
        let first = self.points.first()?;
        Some(self.points.iter().fold(
            (first.x, first.y, first.x, first.y),
            |(min_x, min_y, max_x, max_y), p| {
                (min_x.min(p.x), min_y.min(p.y), max_x.max(p.x), max_y.max(p.y))
            },
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_length() {
        let stroke = Stroke::from_points(vec![
            StrokePoint::new(0.0, 0.0),
            StrokePoint::new(3.0, 4.0),
            StrokePoint::new(3.0, 10.0),
        ]);
        assert!((stroke.path_length() - 11.0).abs() < 1e-5);
        assert!(!stroke.is_zero_length());
    }

    #[test]
    fn test_tap_is_zero_length() {
        let mut stroke = Stroke::starting_at(StrokePoint::new(5.0, 5.0));
        assert!(stroke.is_zero_length());
        stroke.push(StrokePoint::new(5.0, 5.0));
        assert!(stroke.is_zero_length());
        assert_eq!(stroke.len(), 2);
    }

    #[test]
    fn test_bounds() {
        let stroke = Stroke::from_points(vec![
            StrokePoint::new(10.0, 2.0),
            StrokePoint::new(-1.0, 8.0),
            StrokePoint::new(4.0, 20.0),
        ]);
        assert_eq!(stroke.bounds(), Some((-1.0, 2.0, 10.0, 20.0)));
        assert_eq!(Stroke::default().bounds(), None);
    }

    #[test]
    fn test_point_finiteness() {
        assert!(StrokePoint::new(1.0, 2.0).is_finite());
        assert!(!StrokePoint::new(f32::NAN, 2.0).is_finite());
        assert!(!StrokePoint::timed(1.0, f32::INFINITY, 10).is_finite());
    }

    #[test]
    fn test_stroke_serde_omits_missing_time() {
        let stroke = Stroke::from_points(vec![StrokePoint::new(1.0, 2.0), StrokePoint::timed(3.0, 4.0, 16)]);
        let json = serde_json::to_string(&stroke).unwrap();
        assert_eq!(json, r#"{"points":[{"x":1.0,"y":2.0},{"x":3.0,"y":4.0,"t":16}]}"#);
        assert_eq!(serde_json::from_str::<Stroke>(&json).unwrap(), stroke);
    }
}
