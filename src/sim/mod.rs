//! Launch and layout core
//!
//! Everything here is engine-agnostic and synchronous:
//! - Pure layout from viewport size (`geometry`, `formation`)
//! - The release-detection state machine (`launch`)
//! - Session ownership and reset/edit orchestration (`session`)
//! - In-place body repositioning on viewport change (`viewport`)
//!
//! The rigid-body engine is reached only through `crate::world::PhysicsWorld`.

pub mod formation;
pub mod geometry;
pub mod launch;
pub mod session;
pub mod viewport;

pub use formation::{BlockColor, BlockShape, BlockSpec, ShapeKind};
pub use geometry::GeometryProfile;
pub use launch::{LaunchController, LaunchPhase, PullSign};
pub use session::{BlockEntity, Session};
pub use viewport::{ResizeDebouncer, apply_viewport};
