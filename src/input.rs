//! Pointer coordinate mapping and gesture events
//!
//! Raw browser events carry client coordinates; the sim wants canvas/world
//! pixels. `PointerMap` owns that translation (element bounds + device
//! pixel ratio) and is refreshed on every viewport change so gestures stay
//! accurate after resize or rotation.

use glam::Vec2;

/// Client-to-world coordinate mapping
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerMap {
    /// Device pixel ratio (world units are device pixels)
    pub dpr: f32,
    /// Canvas element's top-left corner in client coordinates
    pub origin: Vec2,
    /// Drawable size in world pixels
    pub viewport: Vec2,
}

impl PointerMap {
    pub fn new() -> Self {
        Self {
            dpr: 1.0,
            origin: Vec2::ZERO,
            viewport: Vec2::ZERO,
        }
    }

    /// Update element bounds and pixel ratio (platform glue, on layout
    /// change)
    pub fn set_frame(&mut self, dpr: f32, origin: Vec2) {
        self.dpr = dpr;
        self.origin = origin;
    }

    /// Update the drawable size (viewport adapter, step 5)
    pub fn set_viewport(&mut self, width: f32, height: f32) {
        self.viewport = Vec2::new(width, height);
    }

    /// Translate a client-coordinate pointer position into world pixels
    #[inline]
    pub fn to_world(&self, client: Vec2) -> Vec2 {
        (client - self.origin) * self.dpr
    }
}

impl Default for PointerMap {
    fn default() -> Self {
        Self::new()
    }
}

/// A resolved gesture notification from the input collaborator. `Start`
/// optionally carries the body under the pointer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureEvent {
    Start {
        pos: Vec2,
        hit: Option<crate::world::BodyId>,
    },
    Move {
        pos: Vec2,
    },
    End {
        pos: Vec2,
    },
}
