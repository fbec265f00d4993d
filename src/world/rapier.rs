//! rapier2d-backed `PhysicsWorld`
//!
//! Thin adapter over the rapier pipeline. Tethers are modeled as a spring
//! joint between the projectile and a fixed, collider-less anchor body, so
//! moving the slingshot anchor on resize is just a body teleport.

use std::collections::HashMap;

use glam::Vec2;
use rapier2d::prelude::*;

use super::{BodyId, Material, PhysicsWorld, TetherId};
use crate::consts::{GRAVITY, TETHER_DAMPING, TETHER_STIFFNESS};

pub struct RapierWorld {
    pipeline: PhysicsPipeline,
    islands: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    params: IntegrationParameters,
    gravity: Vector<Real>,

    handles: HashMap<BodyId, RigidBodyHandle>,
    tethers: HashMap<TetherId, Tether>,
    next_body: u32,
    next_tether: u32,
}

struct Tether {
    joint: ImpulseJointHandle,
    anchor_body: RigidBodyHandle,
}

impl RapierWorld {
    pub fn new() -> Self {
        Self {
            pipeline: PhysicsPipeline::new(),
            islands: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            params: IntegrationParameters::default(),
            gravity: vector![0.0, GRAVITY],
            handles: HashMap::new(),
            tethers: HashMap::new(),
            next_body: 0,
            next_tether: 0,
        }
    }

    fn register(&mut self, handle: RigidBodyHandle) -> BodyId {
        let id = BodyId(self.next_body);
        self.next_body += 1;
        self.handles.insert(id, handle);
        id
    }

    fn spawn_box(
        &mut self,
        center: Vec2,
        half_extents: Vec2,
        material: Material,
        fixed: bool,
    ) -> BodyId {
        let builder = if fixed {
            RigidBodyBuilder::fixed()
        } else {
            RigidBodyBuilder::dynamic()
        };
        let body = self
            .bodies
            .insert(builder.translation(vector![center.x, center.y]).build());
        let collider = ColliderBuilder::cuboid(half_extents.x, half_extents.y)
            .density(material.density)
            .friction(material.friction)
            .restitution(material.restitution)
            .build();
        self.colliders
            .insert_with_parent(collider, body, &mut self.bodies);
        self.register(body)
    }
}

impl Default for RapierWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl PhysicsWorld for RapierWorld {
    fn spawn_static_box(&mut self, center: Vec2, half_extents: Vec2, material: Material) -> BodyId {
        self.spawn_box(center, half_extents, material, true)
    }

    fn spawn_dynamic_box(
        &mut self,
        center: Vec2,
        half_extents: Vec2,
        material: Material,
    ) -> BodyId {
        self.spawn_box(center, half_extents, material, false)
    }

    fn spawn_dynamic_ball(&mut self, center: Vec2, radius: f32, material: Material) -> BodyId {
        let body = self.bodies.insert(
            RigidBodyBuilder::dynamic()
                .translation(vector![center.x, center.y])
                .ccd_enabled(true)
                .build(),
        );
        let collider = ColliderBuilder::ball(radius)
            .density(material.density)
            .friction(material.friction)
            .restitution(material.restitution)
            .build();
        self.colliders
            .insert_with_parent(collider, body, &mut self.bodies);
        self.register(body)
    }

    fn remove_body(&mut self, body: BodyId) {
        let Some(handle) = self.handles.remove(&body) else {
            return;
        };
        self.bodies.remove(
            handle,
            &mut self.islands,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            true,
        );
    }

    fn attach_tether(&mut self, anchor: Vec2, body: BodyId) -> TetherId {
        let target = self.handles[&body];
        let anchor_body = self.bodies.insert(
            RigidBodyBuilder::fixed()
                .translation(vector![anchor.x, anchor.y])
                .build(),
        );
        let joint = SpringJointBuilder::new(0.0, TETHER_STIFFNESS, TETHER_DAMPING)
            .local_anchor1(point![0.0, 0.0])
            .local_anchor2(point![0.0, 0.0])
            .build();
        let joint = self
            .impulse_joints
            .insert(anchor_body, target, joint, true);

        let id = TetherId(self.next_tether);
        self.next_tether += 1;
        self.tethers.insert(id, Tether { joint, anchor_body });
        id
    }

    fn release_tether(&mut self, tether: TetherId) {
        let Some(t) = self.tethers.remove(&tether) else {
            return;
        };
        self.impulse_joints.remove(t.joint, true);
        self.bodies.remove(
            t.anchor_body,
            &mut self.islands,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            true,
        );
    }

    fn move_tether_anchor(&mut self, tether: TetherId, anchor: Vec2) {
        let Some(t) = self.tethers.get(&tether) else {
            return;
        };
        if let Some(rb) = self.bodies.get_mut(t.anchor_body) {
            rb.set_translation(vector![anchor.x, anchor.y], true);
        }
    }

    fn position(&self, body: BodyId) -> Vec2 {
        self.handles
            .get(&body)
            .and_then(|h| self.bodies.get(*h))
            .map(|rb| {
                let t = rb.translation();
                Vec2::new(t.x, t.y)
            })
            .unwrap_or(Vec2::ZERO)
    }

    fn rotation(&self, body: BodyId) -> f32 {
        self.handles
            .get(&body)
            .and_then(|h| self.bodies.get(*h))
            .map(|rb| rb.rotation().angle())
            .unwrap_or(0.0)
    }

    fn set_position(&mut self, body: BodyId, center: Vec2) {
        let Some(handle) = self.handles.get(&body) else {
            return;
        };
        if let Some(rb) = self.bodies.get_mut(*handle) {
            rb.set_translation(vector![center.x, center.y], true);
            rb.set_linvel(vector![0.0, 0.0], true);
            rb.set_angvel(0.0, true);
        }
    }

    fn set_velocity(&mut self, body: BodyId, velocity: Vec2) {
        let Some(handle) = self.handles.get(&body) else {
            return;
        };
        if let Some(rb) = self.bodies.get_mut(*handle) {
            rb.set_linvel(vector![velocity.x, velocity.y], true);
        }
    }

    fn set_box_half_extents(&mut self, body: BodyId, half_extents: Vec2) {
        let Some(handle) = self.handles.get(&body) else {
            return;
        };
        let Some(rb) = self.bodies.get(*handle) else {
            return;
        };
        if let Some(collider) = rb.colliders().first().copied() {
            if let Some(c) = self.colliders.get_mut(collider) {
                c.set_shape(SharedShape::cuboid(half_extents.x, half_extents.y));
            }
        }
    }

    fn step(&mut self, dt: f32) {
        self.params.dt = dt;
        self.pipeline.step(
            &self.gravity,
            &self.params,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            None,
            &(),
            &(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_and_query_position() {
        let mut world = RapierWorld::new();
        let body = world.spawn_dynamic_ball(Vec2::new(50.0, 60.0), 10.0, Material::PROJECTILE);
        let pos = world.position(body);
        assert!((pos.x - 50.0).abs() < 1e-4);
        assert!((pos.y - 60.0).abs() < 1e-4);
    }

    #[test]
    fn test_gravity_pulls_down() {
        let mut world = RapierWorld::new();
        let body = world.spawn_dynamic_ball(Vec2::new(100.0, 100.0), 10.0, Material::PROJECTILE);
        for _ in 0..30 {
            world.step(1.0);
        }
        assert!(world.position(body).y > 100.0);
    }

    #[test]
    fn test_removed_body_is_ignored() {
        let mut world = RapierWorld::new();
        let body = world.spawn_dynamic_ball(Vec2::new(0.0, 0.0), 10.0, Material::PROJECTILE);
        world.remove_body(body);
        // Stale handle: all of these must be silent no-ops
        world.set_velocity(body, Vec2::new(5.0, 5.0));
        world.set_position(body, Vec2::new(1.0, 1.0));
        assert_eq!(world.position(body), Vec2::ZERO);
    }

    #[test]
    fn test_tether_release_is_idempotent() {
        let mut world = RapierWorld::new();
        let body = world.spawn_dynamic_ball(Vec2::new(10.0, 10.0), 10.0, Material::PROJECTILE);
        let tether = world.attach_tether(Vec2::new(10.0, 10.0), body);
        world.release_tether(tether);
        world.release_tether(tether);
        world.move_tether_anchor(tether, Vec2::new(0.0, 0.0));
    }

    #[test]
    fn test_ground_resize() {
        let mut world = RapierWorld::new();
        let ground = world.spawn_static_box(
            Vec2::new(400.0, 580.0),
            Vec2::new(400.0, 20.0),
            Material::GROUND,
        );
        world.set_box_half_extents(ground, Vec2::new(600.0, 20.0));
        world.set_position(ground, Vec2::new(600.0, 780.0));
        let pos = world.position(ground);
        assert!((pos.x - 600.0).abs() < 1e-4);
    }
}
