//! Axis-Aligned Bounding Boxes
//!
//! Bodies, attack hitboxes and block hitboxes are all plain rectangles
//! owned by the fighter. Renderers read them by value each frame.

use serde::{Serialize, Deserialize};
use super::vec2::Vec2;

/// Axis-aligned rectangle stored as min/max corners.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Aabb {
    /// Top-left corner
    pub min: Vec2,
    /// Bottom-right corner
    pub max: Vec2,
}

impl Aabb {
    /// Create from corners.
    #[inline]
    pub const fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Create a box centered on `center`.
    #[inline]
    pub fn from_center(center: Vec2, width: f32, height: f32) -> Self {
        let half = Vec2::new(width * 0.5, height * 0.5);
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Create a box whose bottom edge is centered on `feet`.
    ///
    /// Fighters and block hitboxes are anchored this way.
    #[inline]
    pub fn from_bottom_center(feet: Vec2, width: f32, height: f32) -> Self {
        Self {
            min: Vec2::new(feet.x - width * 0.5, feet.y - height),
            max: Vec2::new(feet.x + width * 0.5, feet.y),
        }
    }

    /// Width of the box.
    #[inline]
    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    /// Height of the box.
    #[inline]
    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    /// Center point.
    #[inline]
    pub fn center(&self) -> Vec2 {
        self.min.lerp(self.max, 0.5)
    }

    /// Check if two boxes overlap.
    ///
    /// Touching edges do not count as overlap.
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }

    /// Horizontal penetration depth between two boxes (0 if disjoint).
    #[inline]
    pub fn horizontal_overlap(&self, other: &Aabb) -> f32 {
        if !self.overlaps(other) {
            return 0.0;
        }
        self.max.x.min(other.max.x) - self.min.x.max(other.min.x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_bottom_center() {
        let body = Aabb::from_bottom_center(Vec2::new(100.0, 600.0), 40.0, 60.0);
        assert_eq!(body.min, Vec2::new(80.0, 540.0));
        assert_eq!(body.max, Vec2::new(120.0, 600.0));
        assert_eq!(body.width(), 40.0);
        assert_eq!(body.height(), 60.0);
    }

    #[test]
    fn test_overlap() {
        let a = Aabb::from_center(Vec2::new(0.0, 0.0), 10.0, 10.0);
        let b = Aabb::from_center(Vec2::new(8.0, 0.0), 10.0, 10.0);
        let c = Aabb::from_center(Vec2::new(10.0, 0.0), 10.0, 10.0);

        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
        // Edges touch exactly
        assert!(!a.overlaps(&c));
    }

    #[test]
    fn test_vertical_separation_blocks_overlap() {
        let a = Aabb::from_center(Vec2::new(0.0, 0.0), 10.0, 10.0);
        let b = Aabb::from_center(Vec2::new(0.0, 20.0), 10.0, 10.0);
        assert!(!a.overlaps(&b));
    }

    #[test]
    fn test_horizontal_overlap_depth() {
        let a = Aabb::from_center(Vec2::new(0.0, 0.0), 10.0, 10.0);
        let b = Aabb::from_center(Vec2::new(8.0, 0.0), 10.0, 10.0);
        assert!((a.horizontal_overlap(&b) - 2.0).abs() < 1e-6);

        let far = Aabb::from_center(Vec2::new(50.0, 0.0), 10.0, 10.0);
        assert_eq!(a.horizontal_overlap(&far), 0.0);
    }
}
