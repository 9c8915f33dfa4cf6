//! Axis-aligned domain bounds.

use serde::{Deserialize, Serialize};

use super::point::WorldPoint;
use crate::error::{KshetraError, Result};

/// Rectangular survey domain, `[min, max)` on both axes.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DomainBounds {
    pub min: WorldPoint,
    pub max: WorldPoint,
}

impl DomainBounds {
    /// Create bounds, rejecting empty or inverted extents.
    pub fn new(min: WorldPoint, max: WorldPoint) -> Result<Self> {
        let bounds = Self { min, max };
        let (w, h) = (bounds.width(), bounds.height());
        if w.is_nan() || h.is_nan() || w <= 0.0 || h <= 0.0 {
            return Err(KshetraError::Config(format!(
                "empty domain bounds: ({:.2}, {:.2}) .. ({:.2}, {:.2})",
                min.x, min.y, max.x, max.y
            )));
        }
        Ok(bounds)
    }

    /// Bounds anchored at the origin.
    pub fn from_size(width: f32, height: f32) -> Result<Self> {
        Self::new(WorldPoint::ZERO, WorldPoint::new(width, height))
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    #[inline]
    pub fn contains(&self, point: WorldPoint) -> bool {
        point.x >= self.min.x
            && point.x < self.max.x
            && point.y >= self.min.y
            && point.y < self.max.y
    }

    /// Clamp a point into the domain. The upper edge is exclusive, so the
    /// result is nudged just inside it.
    pub fn clamp(&self, point: WorldPoint) -> WorldPoint {
        let hi_x = self.max.x - self.width() * f32::EPSILON * 4.0;
        let hi_y = self.max.y - self.height() * f32::EPSILON * 4.0;
        WorldPoint::new(
            point.x.clamp(self.min.x, hi_x),
            point.y.clamp(self.min.y, hi_y),
        )
    }

    /// Validate a requested waypoint.
    pub fn check(&self, point: WorldPoint) -> Result<WorldPoint> {
        if self.contains(point) {
            Ok(point)
        } else {
            Err(KshetraError::InvalidWaypoint(point))
        }
    }

    pub fn center(&self) -> WorldPoint {
        WorldPoint::new(
            (self.min.x + self.max.x) / 2.0,
            (self.min.y + self.max.y) / 2.0,
        )
    }
}
