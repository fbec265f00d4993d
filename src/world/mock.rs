//! Recording `PhysicsWorld` double for sim tests
//!
//! Bodies are plain position/velocity records; nothing integrates unless a
//! test moves it. Every mutating call is appended to `events` so tests can
//! assert ordering (the tether-release/velocity pair must be contiguous).

use std::collections::HashMap;

use glam::Vec2;

use super::{BodyId, Material, PhysicsWorld, TetherId};

#[derive(Debug, Clone, PartialEq)]
pub enum WorldEvent {
    Spawned(BodyId),
    Removed(BodyId),
    TetherAttached(TetherId, BodyId),
    TetherReleased(TetherId),
    TetherAnchorMoved(TetherId, Vec2),
    PositionSet(BodyId, Vec2),
    VelocitySet(BodyId, Vec2),
    ExtentsSet(BodyId, Vec2),
}

#[derive(Debug, Clone)]
pub struct MockBody {
    pub pos: Vec2,
    pub vel: Vec2,
    pub half_extents: Option<Vec2>,
    pub radius: Option<f32>,
    pub dynamic: bool,
    pub material: Material,
}

#[derive(Default)]
pub struct MockWorld {
    pub bodies: HashMap<BodyId, MockBody>,
    pub tethers: HashMap<TetherId, (Vec2, BodyId)>,
    pub events: Vec<WorldEvent>,
    next_body: u32,
    next_tether: u32,
    pub steps: u32,
}

impl MockWorld {
    pub fn new() -> Self {
        Self::default()
    }

    fn spawn(&mut self, body: MockBody) -> BodyId {
        let id = BodyId(self.next_body);
        self.next_body += 1;
        self.bodies.insert(id, body);
        self.events.push(WorldEvent::Spawned(id));
        id
    }

    /// Move a body as if the engine integrated it (not logged as a command)
    pub fn drift(&mut self, body: BodyId, pos: Vec2) {
        if let Some(b) = self.bodies.get_mut(&body) {
            b.pos = pos;
        }
    }

    pub fn tether_anchor(&self, tether: TetherId) -> Option<Vec2> {
        self.tethers.get(&tether).map(|(a, _)| *a)
    }
}

impl PhysicsWorld for MockWorld {
    fn spawn_static_box(&mut self, center: Vec2, half_extents: Vec2, material: Material) -> BodyId {
        self.spawn(MockBody {
            pos: center,
            vel: Vec2::ZERO,
            half_extents: Some(half_extents),
            radius: None,
            dynamic: false,
            material,
        })
    }

    fn spawn_dynamic_box(
        &mut self,
        center: Vec2,
        half_extents: Vec2,
        material: Material,
    ) -> BodyId {
        self.spawn(MockBody {
            pos: center,
            vel: Vec2::ZERO,
            half_extents: Some(half_extents),
            radius: None,
            dynamic: true,
            material,
        })
    }

    fn spawn_dynamic_ball(&mut self, center: Vec2, radius: f32, material: Material) -> BodyId {
        self.spawn(MockBody {
            pos: center,
            vel: Vec2::ZERO,
            half_extents: None,
            radius: Some(radius),
            dynamic: true,
            material,
        })
    }

    fn remove_body(&mut self, body: BodyId) {
        if self.bodies.remove(&body).is_some() {
            self.events.push(WorldEvent::Removed(body));
        }
    }

    fn attach_tether(&mut self, anchor: Vec2, body: BodyId) -> TetherId {
        let id = TetherId(self.next_tether);
        self.next_tether += 1;
        self.tethers.insert(id, (anchor, body));
        self.events.push(WorldEvent::TetherAttached(id, body));
        id
    }

    fn release_tether(&mut self, tether: TetherId) {
        if self.tethers.remove(&tether).is_some() {
            self.events.push(WorldEvent::TetherReleased(tether));
        }
    }

    fn move_tether_anchor(&mut self, tether: TetherId, anchor: Vec2) {
        if let Some(t) = self.tethers.get_mut(&tether) {
            t.0 = anchor;
            self.events.push(WorldEvent::TetherAnchorMoved(tether, anchor));
        }
    }

    fn position(&self, body: BodyId) -> Vec2 {
        self.bodies.get(&body).map(|b| b.pos).unwrap_or(Vec2::ZERO)
    }

    fn rotation(&self, _body: BodyId) -> f32 {
        0.0
    }

    fn set_position(&mut self, body: BodyId, center: Vec2) {
        if let Some(b) = self.bodies.get_mut(&body) {
            b.pos = center;
            b.vel = Vec2::ZERO;
            self.events.push(WorldEvent::PositionSet(body, center));
        }
    }

    fn set_velocity(&mut self, body: BodyId, velocity: Vec2) {
        if let Some(b) = self.bodies.get_mut(&body) {
            b.vel = velocity;
            self.events.push(WorldEvent::VelocitySet(body, velocity));
        }
    }

    fn set_box_half_extents(&mut self, body: BodyId, half_extents: Vec2) {
        if let Some(b) = self.bodies.get_mut(&body) {
            b.half_extents = Some(half_extents);
            self.events.push(WorldEvent::ExtentsSet(body, half_extents));
        }
    }

    fn step(&mut self, _dt: f32) {
        self.steps += 1;
    }
}
