//! Session ownership and orchestration
//!
//! One `Session` owns everything swapped on reset: the live projectile and
//! tether, the formation collection, the launch controller, and the current
//! geometry profile. All state is one explicit value - no module globals -
//! and `reset` replaces the swappable parts wholesale.

use glam::Vec2;

use super::formation::{self, BlockColor, BlockSpec, ShapeKind};
use super::geometry::GeometryProfile;
use super::launch::{LaunchController, LaunchPhase};
use crate::consts::{FORMATION_ROWS, GRAB_SLOP, GROUND_THICKNESS};
use crate::input::{GestureEvent, PointerMap};
use crate::settings::Settings;
use crate::world::{BodyId, Material, PhysicsWorld, TetherId};

/// A live block: its rigid body plus the placement it was spawned from
#[derive(Debug, Clone)]
pub struct BlockEntity {
    pub body: BodyId,
    pub spec: BlockSpec,
    /// Placed by hand in edit mode; never re-derived from a pyramid index
    pub authored: bool,
}

pub struct Session {
    pub profile: GeometryProfile,
    pub launch: LaunchController,
    pub projectile: Option<BodyId>,
    pub tether: Option<TetherId>,
    pub ground: BodyId,
    pub formation: Vec<BlockEntity>,
    pub pointer: PointerMap,
    pub rows: usize,
    pub shape: ShapeKind,
    pub palette: Vec<BlockColor>,
    edit_mode: bool,
    /// Block following the pointer during edit-mode placement
    drag_block: Option<BodyId>,
}

impl Session {
    /// Build a session for the given viewport: static ground, then a fresh
    /// projectile/tether/formation via `reset`.
    pub fn new(
        world: &mut dyn PhysicsWorld,
        viewport_width: f32,
        viewport_height: f32,
        settings: &Settings,
    ) -> Self {
        let profile = GeometryProfile::compute(viewport_width, viewport_height);
        let ground = world.spawn_static_box(
            Vec2::new(profile.viewport_width / 2.0, profile.ground_y),
            Vec2::new(profile.ground_width / 2.0, GROUND_THICKNESS / 2.0),
            Material::GROUND,
        );

        let mut pointer = PointerMap::new();
        pointer.set_viewport(viewport_width, viewport_height);

        let mut session = Self {
            profile,
            launch: LaunchController::new(),
            projectile: None,
            tether: None,
            ground,
            formation: Vec::new(),
            pointer,
            rows: FORMATION_ROWS,
            shape: settings.shape,
            palette: settings.palette.clone(),
            edit_mode: false,
            drag_block: None,
        };
        session.reset(world);
        session
    }

    #[inline]
    pub fn edit_mode(&self) -> bool {
        self.edit_mode
    }

    #[inline]
    pub fn launched(&self) -> bool {
        self.launch.launched()
    }

    /// Advance the engine by one fixed step. While edit mode has the canvas
    /// frozen for authoring, nothing integrates: hand-placed blocks stay
    /// exactly where the pointer left them.
    pub fn tick(&self, world: &mut dyn PhysicsWorld, dt: f32) {
        if self.edit_mode {
            return;
        }
        world.step(dt);
    }

    /// Body under the pointer, if any, for gesture-start resolution. Only
    /// the held projectile is grabbable; blocks are the engine's business.
    pub fn pick(&self, world: &dyn PhysicsWorld, pos: Vec2) -> Option<BodyId> {
        let projectile = self.projectile?;
        let grab_radius = self.profile.projectile_radius() * GRAB_SLOP;
        ((world.position(projectile) - pos).length() <= grab_radius).then_some(projectile)
    }

    /// The single gesture dispatcher: edit mode routes to block placement,
    /// play mode to the launch controller. Called synchronously from the
    /// platform glue, always before the next physics step.
    pub fn handle_gesture(&mut self, world: &mut dyn PhysicsWorld, event: GestureEvent) {
        if self.edit_mode {
            self.handle_edit_gesture(world, event);
            return;
        }

        match event {
            GestureEvent::Start { hit, .. } => {
                self.launch.gesture_start(hit);
            }
            GestureEvent::Move { pos } => {
                // The pointer drag stands in for the engine's grip on the
                // held projectile; the controller then reads the dragged
                // position against the current anchor
                if self.launch.phase() == LaunchPhase::Pulling {
                    if let Some(projectile) = self.projectile {
                        world.set_position(projectile, pos);
                    }
                }
                self.launch.gesture_move(world, self.profile.anchor);
            }
            GestureEvent::End { .. } => {
                self.launch.gesture_end(world, self.profile.anchor);
            }
        }
    }

    fn handle_edit_gesture(&mut self, world: &mut dyn PhysicsWorld, event: GestureEvent) {
        match event {
            GestureEvent::Start { pos, .. } => {
                let color = self
                    .palette
                    .get(self.formation.len() % self.palette.len().max(1))
                    .copied()
                    .unwrap_or(BlockColor::Crimson);
                let spec = BlockSpec {
                    row: 0,
                    col: 0,
                    center: pos,
                    half_extents: formation::block_half_extents(
                        &self.profile,
                        self.shape.dimensions(),
                    ),
                    color,
                };
                let body = world.spawn_dynamic_box(pos, spec.half_extents, Material::BLOCK);
                self.formation.push(BlockEntity {
                    body,
                    spec,
                    authored: true,
                });
                self.drag_block = Some(body);
            }
            GestureEvent::Move { pos } => {
                if let Some(body) = self.drag_block {
                    world.set_position(body, pos);
                    if let Some(entity) = self.formation.iter_mut().find(|e| e.body == body) {
                        entity.spec.center = pos;
                    }
                }
            }
            GestureEvent::End { .. } => {
                self.drag_block = None;
            }
        }
    }

    /// Tear down the current projectile/tether, rebuild the formation
    /// (unless edit mode is protecting a user-authored layout), and hold a
    /// fresh projectile at the anchor. Calling this any number of times
    /// yields the same observable state.
    pub fn reset(&mut self, world: &mut dyn PhysicsWorld) {
        self.drag_block = None;

        if let Some(tether) = self.tether.take() {
            world.release_tether(tether);
        }
        if let Some(projectile) = self.projectile.take() {
            world.remove_body(projectile);
        }

        let keep_formation = self.edit_mode && !self.formation.is_empty();
        if !keep_formation {
            self.rebuild_formation(world);
        }

        let projectile = world.spawn_dynamic_ball(
            self.profile.anchor,
            self.profile.projectile_radius(),
            Material::PROJECTILE,
        );
        let tether = world.attach_tether(self.profile.anchor, projectile);
        self.projectile = Some(projectile);
        self.tether = Some(tether);
        self.launch.hold(projectile, tether);

        log::info!(
            "session reset: {} blocks, projectile at ({:.0}, {:.0})",
            self.formation.len(),
            self.profile.anchor.x,
            self.profile.anchor.y
        );
    }

    fn rebuild_formation(&mut self, world: &mut dyn PhysicsWorld) {
        for entity in self.formation.drain(..) {
            world.remove_body(entity.body);
        }
        let specs = formation::build(
            &self.profile,
            self.rows,
            self.shape.dimensions(),
            &self.palette,
        );
        self.formation = specs
            .into_iter()
            .map(|spec| BlockEntity {
                body: world.spawn_dynamic_box(spec.center, spec.half_extents, Material::BLOCK),
                spec,
                authored: false,
            })
            .collect();
    }

    /// Freeze the canvas for authoring: the projectile and tether leave the
    /// simulation entirely.
    pub fn enter_edit_mode(&mut self, world: &mut dyn PhysicsWorld) {
        if self.edit_mode {
            return;
        }
        if let Some(tether) = self.tether.take() {
            world.release_tether(tether);
        }
        if let Some(projectile) = self.projectile.take() {
            world.remove_body(projectile);
        }
        self.launch.clear();
        self.edit_mode = true;
        log::info!("edit mode entered");
    }

    /// Leave authoring and restart play. The reset runs while the edit flag
    /// is still up so a hand-built formation survives it.
    pub fn exit_edit_mode(&mut self, world: &mut dyn PhysicsWorld) {
        if !self.edit_mode {
            return;
        }
        self.reset(world);
        self.edit_mode = false;
        log::info!("edit mode exited");
    }
}
