//! Viewport-derived layout values
//!
//! Everything that places bodies (anchor, ground, formation base) derives
//! from one `GeometryProfile`. The profile is recomputed wholesale on each
//! viewport change, never mutated in place.

use glam::Vec2;

use crate::consts::*;

/// Normalized layout for one viewport size. Pure function of `(w, h)`; no
/// hidden state. Degenerate inputs are a caller error - the viewport adapter
/// filters them out before ever calling `compute`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeometryProfile {
    pub viewport_width: f32,
    pub viewport_height: f32,
    /// Uniform body-size scale so formations stay proportionate across
    /// devices
    pub scale: f32,
    /// Center height of the static ground strip
    pub ground_y: f32,
    pub ground_width: f32,
    /// Fixed slingshot pull point
    pub anchor: Vec2,
    /// Where the formation's bottom-left block rests (on the ground top)
    pub formation_base: Vec2,
}

impl GeometryProfile {
    pub fn compute(viewport_width: f32, viewport_height: f32) -> Self {
        let scale = (viewport_width / REFERENCE_WIDTH).min(viewport_height / REFERENCE_HEIGHT);
        let ground_y = viewport_height - GROUND_THICKNESS / 2.0;
        Self {
            viewport_width,
            viewport_height,
            scale,
            ground_y,
            ground_width: viewport_width,
            anchor: Vec2::new(
                viewport_width * ANCHOR_FRACTION_X,
                viewport_height * ANCHOR_FRACTION_Y,
            ),
            formation_base: Vec2::new(
                viewport_width * FORMATION_FRACTION_X,
                viewport_height - GROUND_THICKNESS,
            ),
        }
    }

    /// Top edge of the ground strip
    #[inline]
    pub fn ground_top(&self) -> f32 {
        self.ground_y - GROUND_THICKNESS / 2.0
    }

    /// Projectile radius at this profile's scale
    #[inline]
    pub fn projectile_radius(&self) -> f32 {
        PROJECTILE_RADIUS * self.scale
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_is_deterministic() {
        let a = GeometryProfile::compute(1024.0, 768.0);
        let b = GeometryProfile::compute(1024.0, 768.0);
        // Bit-for-bit: all derived fractions must match exactly
        assert_eq!(a, b);
    }

    #[test]
    fn test_scale_is_min_axis_ratio() {
        let p = GeometryProfile::compute(1600.0, 600.0);
        assert_eq!(p.scale, 1.0); // height-limited: 600/600

        let p = GeometryProfile::compute(400.0, 1200.0);
        assert_eq!(p.scale, 0.5); // width-limited: 400/800
    }

    #[test]
    fn test_anchor_fractions() {
        let p = GeometryProfile::compute(800.0, 600.0);
        assert!((p.anchor.x - 160.0).abs() < 1e-6);
        assert!((p.anchor.y - 480.0).abs() < 1e-6);
        assert!((p.formation_base.x - 560.0).abs() < 1e-6);
    }

    #[test]
    fn test_ground_spans_full_width_near_bottom() {
        let p = GeometryProfile::compute(1000.0, 700.0);
        assert_eq!(p.ground_width, 1000.0);
        assert!(p.ground_y > 600.0 && p.ground_y < 700.0);
        assert_eq!(p.formation_base.y, p.ground_top());
    }
}
