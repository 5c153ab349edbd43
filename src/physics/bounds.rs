use bevy::math::DVec2;

use crate::error::{Result, SandboxError};

/// Axis-aligned simulation rectangle, y pointing up.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Bounds {
    pub left: f64,
    pub bottom: f64,
    pub right: f64,
    pub top: f64,
}

impl Bounds {
    pub fn new(left: f64, bottom: f64, right: f64, top: f64) -> Self {
        Self {
            left,
            bottom,
            right,
            top,
        }
    }

    /// A `width` x `height` rectangle centered on the origin.
    pub fn centered(width: f64, height: f64) -> Self {
        Self::new(-width / 2.0, -height / 2.0, width / 2.0, height / 2.0)
    }

    /// The simulation area visible in a `width` x `height` viewport at zoom `scale`.
    pub fn from_viewport(width: f64, height: f64, scale: f64) -> Self {
        Self::centered(width / scale, height / scale)
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.top - self.bottom
    }

    pub fn center(&self) -> DVec2 {
        DVec2::new(
            (self.left + self.right) / 2.0,
            (self.bottom + self.top) / 2.0,
        )
    }

    /// True when a circle of `radius` at `center` lies fully inside.
    pub fn contains_circle(&self, center: DVec2, radius: f64) -> bool {
        center.x - radius >= self.left
            && center.x + radius <= self.right
            && center.y - radius >= self.bottom
            && center.y + radius <= self.top
    }

    pub fn validate(&self) -> Result<()> {
        let (width, height) = (self.width(), self.height());
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(SandboxError::InvalidBounds { width, height });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viewport_bounds_shrink_when_zoomed_in() {
        let b = Bounds::from_viewport(800.0, 600.0, 2.0);
        assert_eq!(b, Bounds::new(-200.0, -150.0, 200.0, 150.0));
        let b = Bounds::from_viewport(800.0, 600.0, 0.5);
        assert_eq!(b.width(), 1600.0);
        assert_eq!(b.center(), DVec2::ZERO);
    }

    #[test]
    fn contains_circle_respects_radius() {
        let b = Bounds::centered(100.0, 100.0);
        assert!(b.contains_circle(DVec2::new(40.0, 0.0), 10.0));
        assert!(!b.contains_circle(DVec2::new(41.0, 0.0), 10.0));
    }

    #[test]
    fn degenerate_bounds_are_rejected() {
        assert!(Bounds::centered(0.0, 10.0).validate().is_err());
        assert!(Bounds::centered(10.0, 10.0).validate().is_ok());
    }
}
