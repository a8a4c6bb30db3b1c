//! Rigid-body physics: point-mass kinematics and flat world stepping.
//!
//! # Invariants
//! - Integration is semi-implicit Euler: velocity first, then position from
//!   the new velocity.
//! - Forces never outlive the tick they were applied in.
//! - Stepping is deterministic: the same inputs reproduce bit-identical state.

pub mod body;
pub mod world;

pub use body::RigidBody;
pub use world::{GRAVITY, PhysicsWorld};

pub fn crate_info() -> &'static str {
    concat!("omelette-physics v", env!("CARGO_PKG_VERSION"))
}
