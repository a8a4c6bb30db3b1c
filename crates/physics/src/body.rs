use omelette_common::Vector3;
use serde::{Deserialize, Serialize};

/// A point mass integrated with semi-implicit Euler.
///
/// One tick is: zero or more [`apply_force`](Self::apply_force) calls, then a
/// single [`update`](Self::update), which leaves `acceleration` at zero again.
/// Persistent fields such as gravity must be re-applied every tick.
///
/// `mass` is not validated. A zero or negative mass turns every applied force
/// into an infinite or NaN acceleration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RigidBody {
    pub position: Vector3,
    pub velocity: Vector3,
    pub acceleration: Vector3,
    pub mass: f32,
}

impl Default for RigidBody {
    fn default() -> Self {
        Self {
            position: Vector3::ZERO,
            velocity: Vector3::ZERO,
            acceleration: Vector3::ZERO,
            mass: 1.0,
        }
    }
}

impl RigidBody {
    pub fn new(position: Vector3, velocity: Vector3, acceleration: Vector3, mass: f32) -> Self {
        Self {
            position,
            velocity,
            acceleration,
            mass,
        }
    }

    /// A body with the given mass resting at `position`.
    pub fn at_rest(position: Vector3, mass: f32) -> Self {
        Self {
            position,
            mass,
            ..Self::default()
        }
    }

    /// Accumulate `force / mass` into this tick's acceleration.
    pub fn apply_force(&mut self, force: Vector3) {
        self.acceleration += force / self.mass;
    }

    /// Integrate one tick and return the displacement applied to `position`.
    ///
    /// A negative `delta_time` is a plain multiplier and runs motion backwards.
    pub fn update(&mut self, delta_time: f32) -> Vector3 {
        self.velocity += self.acceleration * delta_time;
        let displacement = self.velocity * delta_time;
        self.position += displacement;
        self.acceleration = Vector3::ZERO;
        displacement
    }
}
