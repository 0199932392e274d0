use serde::Deserialize;

use super::geometry::{Display, Point};

/// Recorded brush strokes in display coordinates, as read by `pigment mask`.
///
/// ```json
/// {"brush_size": 30, "strokes": [[{"x": 10, "y": 12}, {"x": 40, "y": 12}]]}
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StrokeFile {
    /// Overrides the configured brush size; clamped when replayed
    #[serde(default)]
    pub brush_size: Option<u32>,
    pub strokes: Vec<Vec<StrokePoint>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct StrokePoint {
    pub x: f32,
    pub y: f32,
}

impl From<StrokePoint> for Point<Display> {
    fn from(p: StrokePoint) -> Self {
        Point::new(p.x, p.y)
    }
}

impl StrokeFile {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
