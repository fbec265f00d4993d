//! Sling Smash - a slingshot block-smashing puzzle
//!
//! Core modules:
//! - `sim`: Launch detection, layout, and session logic (engine-agnostic)
//! - `world`: Rigid-body engine interface and the rapier2d implementation
//! - `input`: Pointer-to-world coordinate mapping and gesture events
//! - `render`: Canvas2D frame drawing (wasm)
//! - `settings`: Persisted catalog preferences

pub mod input;
pub mod settings;
pub mod sim;
pub mod world;

#[cfg(target_arch = "wasm32")]
pub mod render;

pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Reference viewport the layout fractions were tuned against
    pub const REFERENCE_WIDTH: f32 = 800.0;
    pub const REFERENCE_HEIGHT: f32 = 600.0;

    /// Slingshot anchor as fractions of the viewport
    pub const ANCHOR_FRACTION_X: f32 = 0.2;
    pub const ANCHOR_FRACTION_Y: f32 = 0.8;

    /// Horizontal fraction where the formation's bottom-left block rests
    pub const FORMATION_FRACTION_X: f32 = 0.7;

    /// Ground strip thickness (unscaled; the strip always spans full width)
    pub const GROUND_THICKNESS: f32 = 40.0;

    /// Projectile radius at reference scale
    pub const PROJECTILE_RADIUS: f32 = 18.0;
    /// Pointer pick radius multiplier for grabbing the held projectile
    pub const GRAB_SLOP: f32 = 2.0;

    /// Pyramid rows in the default formation
    pub const FORMATION_ROWS: usize = 4;
    /// Horizontal spacing between blocks, as a multiple of block width
    pub const BLOCK_SPACING_FACTOR: f32 = 1.25;

    /// Launch velocity law: factor = min(stretch * PULL_SCALE, PULL_CAP)
    pub const PULL_SCALE: f32 = 0.002;
    pub const PULL_CAP: f32 = 0.3;

    /// Tether spring parameters (pixel/tick units)
    pub const TETHER_STIFFNESS: f32 = 0.05;
    pub const TETHER_DAMPING: f32 = 0.1;

    /// Gravity in pixels per tick squared. Velocities throughout the sim are
    /// pixels per 60 Hz tick, matching the launch velocity law constants.
    pub const GRAVITY: f32 = 0.55;
    /// One simulation step advances one tick
    pub const SIM_DT: f32 = 1.0;
    /// Maximum ticks per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Resize coalescing window (milliseconds)
    pub const RESIZE_DEBOUNCE_MS: f64 = 150.0;
    /// Re-apply delay after orientation change; device-reported dimensions
    /// can be transiently stale right after rotation
    pub const ORIENTATION_SETTLE_MS: f64 = 400.0;
}

/// Tri-state sign: -1, 0, or 1. The zero case matters for the release
/// gesture (a purely vertical pull must never overshoot-fire), so this is an
/// explicit comparison rather than `f32::signum`, which maps 0.0 to 1.0.
#[inline]
pub fn tri_sign(v: f32) -> i8 {
    if v > 0.0 {
        1
    } else if v < 0.0 {
        -1
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::tri_sign;

    #[test]
    fn test_tri_sign_zero_is_zero() {
        assert_eq!(tri_sign(0.0), 0);
        assert_eq!(tri_sign(-0.0), 0);
        assert_eq!(tri_sign(3.5), 1);
        assert_eq!(tri_sign(-0.001), -1);
    }
}
