use omelette_common::Vector3;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::body::RigidBody;

/// Standard gravitational acceleration, in world units per second squared.
pub const GRAVITY: Vector3 = Vector3::new(0.0, -9.81, 0.0);

/// A flat collection of rigid bodies stepped under a uniform gravity field.
///
/// There is no entity indirection: bodies are owned directly and addressed by
/// the index returned from [`add_rigid_body`](Self::add_rigid_body).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhysicsWorld {
    bodies: Vec<RigidBody>,
    gravity: Vector3,
    tick: u64,
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::with_gravity(GRAVITY)
    }
}

impl PhysicsWorld {
    /// Create an empty world under standard gravity.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty world with a custom gravitational acceleration.
    pub fn with_gravity(gravity: Vector3) -> Self {
        Self {
            bodies: Vec::new(),
            gravity,
            tick: 0,
        }
    }

    pub fn gravity(&self) -> Vector3 {
        self.gravity
    }

    /// Number of completed steps.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Take ownership of a body. Returns its index.
    pub fn add_rigid_body(&mut self, body: RigidBody) -> usize {
        let index = self.bodies.len();
        self.bodies.push(body);
        debug!(index, mass = body.mass, "rigid body added");
        index
    }

    /// All bodies in insertion order.
    pub fn rigid_bodies(&self) -> &[RigidBody] {
        &self.bodies
    }

    pub fn rigid_body(&self, index: usize) -> Option<&RigidBody> {
        self.bodies.get(index)
    }

    /// Mutable access, e.g. to apply a one-shot impulse before the next step.
    pub fn rigid_body_mut(&mut self, index: usize) -> Option<&mut RigidBody> {
        self.bodies.get_mut(index)
    }

    /// Advance every body by `delta_time`.
    ///
    /// Gravity is accumulated on all bodies before any body integrates, so
    /// every force contribution observes the same pre-step state.
    pub fn step(&mut self, delta_time: f32) {
        for body in &mut self.bodies {
            body.apply_force(self.gravity * body.mass);
        }
        for body in &mut self.bodies {
            body.update(delta_time);
        }
        self.tick += 1;
        trace!(tick = self.tick, delta_time, bodies = self.bodies.len(), "physics step");
    }

    /// FNV-1a hash over the tick and the bit patterns of every body.
    ///
    /// Two worlds driven by the same inputs hash identically.
    pub fn state_hash(&self) -> u64 {
        let mut h: u64 = 0xcbf2_9ce4_8422_2325;
        let mix = |h: &mut u64, bytes: &[u8]| {
            for &b in bytes {
                *h ^= b as u64;
                *h = h.wrapping_mul(0x0100_0000_01b3);
            }
        };
        mix(&mut h, &self.tick.to_le_bytes());
        for body in &self.bodies {
            for v in [body.position, body.velocity, body.acceleration] {
                for c in v.to_array() {
                    mix(&mut h, &c.to_le_bytes());
                }
            }
            mix(&mut h, &body.mass.to_le_bytes());
        }
        h
    }
}
