//! Shared value types: the `Vector3` math type and the `Entity` identity.
//!
//! # Invariants
//! - Every type here is plain data with no ownership concerns.
//! - Float operations follow IEEE-754; nothing in this crate returns an error.

mod types;
mod vector;

pub use types::Entity;
pub use vector::Vector3;

pub fn crate_info() -> &'static str {
    concat!("omelette-common v", env!("CARGO_PKG_VERSION"))
}
