use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identity that components attach to.
///
/// Entities carry no data of their own. Two entities are the same entity iff
/// their ids are equal; handing out unique ids is the caller's job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Entity {
    id: u32,
}

impl Entity {
    pub const fn new(id: u32) -> Self {
        Self { id }
    }

    pub const fn id(self) -> u32 {
        self.id
    }
}

impl From<u32> for Entity {
    fn from(id: u32) -> Self {
        Self::new(id)
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "entity#{}", self.id)
    }
}
