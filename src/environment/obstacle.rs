//! Rectangular obstacles.

use serde::{Deserialize, Serialize};

use crate::core::WorldPoint;

/// Axis-aligned rectangle covering `[origin, origin + size)`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    /// Lower-left corner
    pub origin: WorldPoint,
    pub width: f32,
    pub height: f32,
}

impl Obstacle {
    pub fn new(origin: WorldPoint, width: f32, height: f32) -> Self {
        Self {
            origin,
            width,
            height,
        }
    }

    #[inline]
    pub fn contains(&self, point: WorldPoint) -> bool {
        point.x >= self.origin.x
            && point.x < self.origin.x + self.width
            && point.y >= self.origin.y
            && point.y < self.origin.y + self.height
    }

    pub fn center(&self) -> WorldPoint {
        WorldPoint::new(
            self.origin.x + self.width / 2.0,
            self.origin.y + self.height / 2.0,
        )
    }

    pub fn area(&self) -> f32 {
        self.width * self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_half_open() {
        let o = Obstacle::new(WorldPoint::new(10.0, 10.0), 5.0, 2.0);
        assert!(o.contains(WorldPoint::new(10.0, 10.0)));
        assert!(o.contains(WorldPoint::new(14.9, 11.9)));
        assert!(!o.contains(WorldPoint::new(15.0, 11.0)));
        assert!(!o.contains(WorldPoint::new(12.0, 12.0)));
        assert_eq!(o.area(), 10.0);
    }
}
