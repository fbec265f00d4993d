//! Launch detection state machine
//!
//! Decides when the held projectile has been released by the player and
//! computes its launch velocity from the pull gesture. Two ways to fire:
//!
//! - **Overshoot**: the player lets go mid-drag and the tether whips the
//!   projectile back past the anchor along the original horizontal pull
//!   axis. Detected by a tri-state sign flip of `proj.x - anchor.x`.
//! - **Explicit release**: the gesture ends (pointer up) while still held.
//!
//! Only the horizontal sign is checked for overshoot. That is intentional
//! (a horizontal slingshot release gesture): a purely vertical pull has
//! `initial.sx == 0` and can only fire via explicit release.

use glam::Vec2;

use crate::consts::{PULL_CAP, PULL_SCALE};
use crate::tri_sign;
use crate::world::{BodyId, PhysicsWorld, TetherId};

/// Lifecycle of one projectile instance. `Launched` is terminal; a reset
/// builds a fresh controller in `Held`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchPhase {
    /// No projectile held
    Idle,
    /// Tether intact, gesture not yet started
    Held,
    /// Gesture active, tether intact
    Pulling,
    /// Tether removed, velocity applied
    Launched,
}

/// Tri-state pull direction relative to the anchor, per axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PullSign {
    pub sx: i8,
    pub sy: i8,
}

impl PullSign {
    #[inline]
    pub fn of(delta: Vec2) -> Self {
        Self {
            sx: tri_sign(delta.x),
            sy: tri_sign(delta.y),
        }
    }
}

#[derive(Debug)]
pub struct LaunchController {
    phase: LaunchPhase,
    projectile: Option<BodyId>,
    tether: Option<TetherId>,
    /// Direction the player first pulled away from the anchor; captured on
    /// the first move tick of a gesture, cleared on gesture start and reset
    initial_pull_sign: Option<PullSign>,
}

impl LaunchController {
    pub fn new() -> Self {
        Self {
            phase: LaunchPhase::Idle,
            projectile: None,
            tether: None,
            initial_pull_sign: None,
        }
    }

    #[inline]
    pub fn phase(&self) -> LaunchPhase {
        self.phase
    }

    #[inline]
    pub fn launched(&self) -> bool {
        self.phase == LaunchPhase::Launched
    }

    #[inline]
    pub fn projectile(&self) -> Option<BodyId> {
        self.projectile
    }

    #[inline]
    pub fn tether(&self) -> Option<TetherId> {
        self.tether
    }

    /// Take ownership of a fresh projectile/tether pair (session reset)
    pub fn hold(&mut self, projectile: BodyId, tether: TetherId) {
        self.phase = LaunchPhase::Held;
        self.projectile = Some(projectile);
        self.tether = Some(tether);
        self.initial_pull_sign = None;
    }

    /// Drop all references without firing (edit-mode entry)
    pub fn clear(&mut self) {
        self.phase = LaunchPhase::Idle;
        self.projectile = None;
        self.tether = None;
        self.initial_pull_sign = None;
    }

    /// Gesture start. Only a hit on the *current* projectile begins a pull;
    /// stale body ids from before a reset are discarded by identity, not by
    /// flag. Returns whether a pull began.
    pub fn gesture_start(&mut self, hit: Option<BodyId>) -> bool {
        if self.phase != LaunchPhase::Held {
            return false;
        }
        if hit.is_none() || hit != self.projectile {
            return false;
        }
        self.phase = LaunchPhase::Pulling;
        self.initial_pull_sign = None;
        true
    }

    /// Gesture move tick. Reads the projectile's *current* position against
    /// the current anchor; fires the overshoot path when the horizontal pull
    /// sign flips. The whole check runs synchronously in this call - no
    /// intermediate state is observable.
    pub fn gesture_move(&mut self, world: &mut dyn PhysicsWorld, anchor: Vec2) {
        if self.phase != LaunchPhase::Pulling {
            return;
        }
        let Some(projectile) = self.projectile else {
            return;
        };

        let current = PullSign::of(world.position(projectile) - anchor);
        match self.initial_pull_sign {
            None => self.initial_pull_sign = Some(current),
            Some(initial) => {
                // Horizontal-only release condition; sx == 0 (vertical pull)
                // never fires here
                if initial.sx != 0 && initial.sx != current.sx {
                    self.fire(world, anchor);
                }
            }
        }
    }

    /// Gesture end (pointer/touch up). Fires the explicit-release path if
    /// the projectile was still held.
    pub fn gesture_end(&mut self, world: &mut dyn PhysicsWorld, anchor: Vec2) {
        if self.phase == LaunchPhase::Pulling {
            self.fire(world, anchor);
        }
    }

    /// The launch transition. Velocity assignment and tether removal happen
    /// inside this one call, so any later tick observes them as one atomic
    /// step - the tether never outlives the velocity command.
    fn fire(&mut self, world: &mut dyn PhysicsWorld, anchor: Vec2) {
        let Some(projectile) = self.projectile else {
            return;
        };

        let pull = world.position(projectile) - anchor;
        let stretch = pull.length();
        let factor = (stretch * PULL_SCALE).min(PULL_CAP);
        let mut velocity = -pull * factor;

        // Saturate: speed never exceeds what a full pull (stretch = CAP/K)
        // produces, so extreme drags cannot launch unboundedly fast
        let max_speed = PULL_CAP / PULL_SCALE * PULL_CAP;
        let speed = velocity.length();
        if speed > max_speed {
            velocity *= max_speed / speed;
        }

        if let Some(tether) = self.tether.take() {
            world.release_tether(tether);
        }
        world.set_velocity(projectile, velocity);

        self.phase = LaunchPhase::Launched;
        self.initial_pull_sign = None;
        log::info!(
            "launched: stretch {:.1}, velocity ({:.2}, {:.2})",
            stretch,
            velocity.x,
            velocity.y
        );
    }
}

impl Default for LaunchController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::Material;
    use crate::world::mock::{MockWorld, WorldEvent};
    use proptest::prelude::*;

    const ANCHOR: Vec2 = Vec2::new(100.0, 100.0);

    fn held(world: &mut MockWorld) -> LaunchController {
        let projectile = world.spawn_dynamic_ball(ANCHOR, 18.0, Material::PROJECTILE);
        let tether = world.attach_tether(ANCHOR, projectile);
        let mut controller = LaunchController::new();
        controller.hold(projectile, tether);
        controller
    }

    #[test]
    fn test_overshoot_release_fires_once_with_current_displacement() {
        let mut world = MockWorld::new();
        let mut controller = held(&mut world);
        let projectile = controller.projectile().unwrap();

        assert!(controller.gesture_start(Some(projectile)));

        // Pull down-left of the anchor: initial sign (-1, 1)
        world.drift(projectile, Vec2::new(50.0, 150.0));
        controller.gesture_move(&mut world, ANCHOR);
        assert_eq!(controller.phase(), LaunchPhase::Pulling);

        // Tether whips it back past the anchor: sign flips to (1, -1)
        world.drift(projectile, Vec2::new(130.0, 90.0));
        controller.gesture_move(&mut world, ANCHOR);
        assert_eq!(controller.phase(), LaunchPhase::Launched);

        // Velocity comes from the displacement at the crossing point, not
        // the peak pull
        let pull = Vec2::new(30.0, -10.0);
        let factor = (pull.length() * PULL_SCALE).min(PULL_CAP);
        let vel = world.bodies[&projectile].vel;
        assert!((vel.x - (-30.0 * factor)).abs() < 1e-5);
        assert!((vel.y - (10.0 * factor)).abs() < 1e-5);

        // Exactly one release: further moves and the gesture end are no-ops
        world.drift(projectile, Vec2::new(300.0, 80.0));
        controller.gesture_move(&mut world, ANCHOR);
        controller.gesture_end(&mut world, ANCHOR);
        assert_eq!(world.bodies[&projectile].vel, vel);
        let releases = world
            .events
            .iter()
            .filter(|e| matches!(e, WorldEvent::TetherReleased(_)))
            .count();
        assert_eq!(releases, 1);
    }

    #[test]
    fn test_vertical_pull_never_overshoot_fires() {
        let mut world = MockWorld::new();
        let mut controller = held(&mut world);
        let projectile = controller.projectile().unwrap();

        controller.gesture_start(Some(projectile));
        world.drift(projectile, Vec2::new(100.0, 150.0));
        controller.gesture_move(&mut world, ANCHOR); // initial (0, 1)
        world.drift(projectile, Vec2::new(100.0, 50.0));
        controller.gesture_move(&mut world, ANCHOR); // sy flipped, sx still 0
        assert_eq!(controller.phase(), LaunchPhase::Pulling);

        // Only the explicit release fires, from displacement at that moment
        controller.gesture_end(&mut world, ANCHOR);
        assert_eq!(controller.phase(), LaunchPhase::Launched);
        let vel = world.bodies[&projectile].vel;
        let factor = (50.0 * PULL_SCALE).min(PULL_CAP);
        assert!((vel.x).abs() < 1e-6);
        assert!((vel.y - 50.0 * factor).abs() < 1e-5);
    }

    #[test]
    fn test_release_and_velocity_are_atomic() {
        let mut world = MockWorld::new();
        let mut controller = held(&mut world);
        let projectile = controller.projectile().unwrap();

        controller.gesture_start(Some(projectile));
        world.drift(projectile, Vec2::new(40.0, 160.0));
        controller.gesture_move(&mut world, ANCHOR);
        controller.gesture_end(&mut world, ANCHOR);

        // The release/velocity pair must be adjacent in the command stream
        let idx = world
            .events
            .iter()
            .position(|e| matches!(e, WorldEvent::TetherReleased(_)))
            .unwrap();
        assert!(matches!(
            world.events[idx + 1],
            WorldEvent::VelocitySet(b, _) if b == projectile
        ));
    }

    #[test]
    fn test_stale_projectile_identity_is_discarded() {
        let mut world = MockWorld::new();
        let mut controller = held(&mut world);
        let stale = controller.projectile().unwrap();

        // Session reset: new projectile/tether pair, same controller slot
        let fresh = world.spawn_dynamic_ball(ANCHOR, 18.0, Material::PROJECTILE);
        let tether = world.attach_tether(ANCHOR, fresh);
        controller.hold(fresh, tether);

        // A late gesture-start addressed to the old projectile must be a
        // no-op even though the held flag says a pull could begin
        assert!(!controller.gesture_start(Some(stale)));
        assert_eq!(controller.phase(), LaunchPhase::Held);
        assert!(controller.gesture_start(Some(fresh)));
    }

    #[test]
    fn test_gesture_events_before_hold_are_no_ops() {
        let mut world = MockWorld::new();
        let body = world.spawn_dynamic_ball(ANCHOR, 18.0, Material::PROJECTILE);
        let mut controller = LaunchController::new();

        assert!(!controller.gesture_start(Some(body)));
        controller.gesture_move(&mut world, ANCHOR);
        controller.gesture_end(&mut world, ANCHOR);
        assert_eq!(controller.phase(), LaunchPhase::Idle);
        assert!(world.bodies[&body].vel == Vec2::ZERO);
    }

    proptest! {
        #[test]
        fn prop_launch_speed_saturates(stretch in 0.0f32..5000.0, angle in 0.0f32..std::f32::consts::TAU) {
            let mut world = MockWorld::new();
            let mut controller = held(&mut world);
            let projectile = controller.projectile().unwrap();

            controller.gesture_start(Some(projectile));
            let pos = ANCHOR + Vec2::new(angle.cos(), angle.sin()) * stretch;
            world.drift(projectile, pos);
            controller.gesture_end(&mut world, ANCHOR);

            let full_pull = PULL_CAP / PULL_SCALE; // stretch where the factor caps
            let max_speed = full_pull * PULL_CAP;
            let speed = world.bodies[&projectile].vel.length();
            prop_assert!(speed <= max_speed * (1.0 + 1e-4));
        }
    }
}
