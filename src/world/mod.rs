//! Rigid-body engine interface
//!
//! The simulation core never talks to rapier directly; it goes through the
//! `PhysicsWorld` trait so the launch/layout logic stays engine-agnostic and
//! testable. `rapier.rs` is the real engine, `mock.rs` a recording double
//! for tests.

pub mod rapier;

#[cfg(test)]
pub mod mock;

pub use rapier::RapierWorld;

use glam::Vec2;

/// Opaque handle to a rigid body owned by a `PhysicsWorld`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BodyId(pub u32);

/// Opaque handle to a tether (fixed-point-to-body spring constraint)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TetherId(pub u32);

/// Surface/mass properties for spawned bodies
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub density: f32,
    pub friction: f32,
    pub restitution: f32,
}

impl Material {
    /// Held/launched projectile
    pub const PROJECTILE: Material = Material {
        density: 1.5,
        friction: 0.4,
        restitution: 0.35,
    };

    /// Destructible formation block
    pub const BLOCK: Material = Material {
        density: 1.0,
        friction: 0.6,
        restitution: 0.1,
    };

    /// Static ground strip
    pub const GROUND: Material = Material {
        density: 1.0,
        friction: 0.8,
        restitution: 0.0,
    };
}

/// The interface the core needs from a conforming rigid-body engine.
///
/// World coordinates are canvas pixels; velocities are pixels per 60 Hz
/// tick. Calls with handles of removed bodies are silently ignored -
/// stale-reference events are expected after a reset.
pub trait PhysicsWorld {
    /// Spawn a static box (half extents) centered at `center`
    fn spawn_static_box(&mut self, center: Vec2, half_extents: Vec2, material: Material) -> BodyId;

    /// Spawn a dynamic box centered at `center`
    fn spawn_dynamic_box(&mut self, center: Vec2, half_extents: Vec2, material: Material)
    -> BodyId;

    /// Spawn a dynamic ball centered at `center`
    fn spawn_dynamic_ball(&mut self, center: Vec2, radius: f32, material: Material) -> BodyId;

    /// Remove a body and anything attached to it
    fn remove_body(&mut self, body: BodyId);

    /// Attach a spring tether between a fixed world point and a body
    fn attach_tether(&mut self, anchor: Vec2, body: BodyId) -> TetherId;

    /// Remove a tether
    fn release_tether(&mut self, tether: TetherId);

    /// Move a tether's fixed endpoint
    fn move_tether_anchor(&mut self, tether: TetherId, anchor: Vec2);

    /// Current body center, or `Vec2::ZERO` for a removed body
    fn position(&self, body: BodyId) -> Vec2;

    /// Current body rotation in radians
    fn rotation(&self, body: BodyId) -> f32;

    /// Teleport a body (zeroes its velocity; used only for layout, never on
    /// anything in flight)
    fn set_position(&mut self, body: BodyId, center: Vec2);

    /// Set a body's linear velocity directly
    fn set_velocity(&mut self, body: BodyId, velocity: Vec2);

    /// Replace a box body's collider half extents (ground/block resize)
    fn set_box_half_extents(&mut self, body: BodyId, half_extents: Vec2);

    /// Advance the simulation by `dt` ticks
    fn step(&mut self, dt: f32);
}
