//! Responsive layout: viewport change handling
//!
//! Repositions *existing* bodies when the drawable area changes instead of
//! rebuilding the world, so anything already in flight keeps simulating
//! undisturbed. Pairs with `ResizeDebouncer`, the policy object that
//! coalesces resize bursts and re-applies after orientation settles.

use glam::Vec2;

use super::formation;
use super::geometry::GeometryProfile;
use super::session::Session;
use crate::consts::GROUND_THICKNESS;
use crate::world::PhysicsWorld;

/// Apply a viewport change to a live session.
///
/// Non-positive dimensions are a transient browser state during rotation,
/// not an error: no-op. Repeated identical dimensions change nothing.
pub fn apply_viewport(
    session: &mut Session,
    world: &mut dyn PhysicsWorld,
    width: f32,
    height: f32,
) {
    if width <= 0.0 || height <= 0.0 {
        log::debug!("ignoring degenerate viewport {width}x{height}");
        return;
    }

    let profile = GeometryProfile::compute(width, height);
    if profile == session.profile {
        return;
    }
    log::info!(
        "viewport {}x{} -> {}x{} (scale {:.2})",
        session.profile.viewport_width,
        session.profile.viewport_height,
        width,
        height,
        profile.scale
    );
    session.profile = profile;

    // Ground: both position and collision extents, or a resized viewport
    // leaves gaps or overhang at the strip's ends
    world.set_position(
        session.ground,
        Vec2::new(profile.viewport_width / 2.0, profile.ground_y),
    );
    world.set_box_half_extents(
        session.ground,
        Vec2::new(profile.ground_width / 2.0, GROUND_THICKNESS / 2.0),
    );

    // An unlaunched projectile follows the anchor; teleporting one in
    // flight would be a visible correctness bug, so it is left alone
    if !session.launch.launched() {
        if let Some(projectile) = session.projectile {
            world.set_position(projectile, profile.anchor);
        }
        if let Some(tether) = session.tether {
            world.move_tether_anchor(tether, profile.anchor);
        }
    }

    // Re-form an undisturbed formation at the new scale, deriving each
    // block's slot from its index exactly as the builder placed it. Once
    // play has scattered blocks there is nothing sensible to restore, so
    // the whole pass is skipped; hand-placed blocks keep their spots too.
    if !session.launch.launched() {
        let shape = session.shape.dimensions();
        let half = formation::block_half_extents(&profile, shape);
        let rows = session.rows;
        for (index, entity) in session.formation.iter_mut().enumerate() {
            if entity.authored {
                continue;
            }
            let (row, col) = formation::row_col(index, rows);
            let center = formation::block_center(&profile, shape, row, col);
            world.set_position(entity.body, center);
            world.set_box_half_extents(entity.body, half);
            entity.spec.center = center;
            entity.spec.half_extents = half;
        }
    }

    // Keep pointer translation in sync with the new drawable area
    session.pointer.set_viewport(width, height);
}

/// Coalesces bursts of resize notifications and carries the orientation
/// settle delay. Pure timestamp bookkeeping; the platform glue feeds it
/// `now` and applies whatever `poll` hands back.
#[derive(Debug)]
pub struct ResizeDebouncer {
    window_ms: f64,
    pending: Option<(f32, f32)>,
    deadline_ms: f64,
}

impl ResizeDebouncer {
    pub fn new(window_ms: f64) -> Self {
        Self {
            window_ms,
            pending: None,
            deadline_ms: 0.0,
        }
    }

    /// Record a resize notification; restarts the coalescing window
    pub fn note(&mut self, width: f32, height: f32, now_ms: f64) {
        self.pending = Some((width, height));
        self.deadline_ms = now_ms + self.window_ms;
    }

    /// Take the settled dimensions once the window has elapsed
    pub fn poll(&mut self, now_ms: f64) -> Option<(f32, f32)> {
        if now_ms >= self.deadline_ms {
            self.pending.take()
        } else {
            None
        }
    }
}
