//! Identifier newtypes
//!
//! Every entity in the impact graph is addressed by a UUID-backed newtype.
//! Random v4 identifiers are used so that rapid back-to-back creation within
//! the same clock tick can never collide.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

macro_rules! entity_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Create a new random identifier
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Wrap an existing UUID
            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// The underlying UUID
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

entity_id! {
    /// Identifier of an impact tree
    TreeId
}

entity_id! {
    /// Identifier of a node
    NodeId
}

entity_id! {
    /// Identifier of a relationship between two nodes
    RelationshipId
}

entity_id! {
    /// Identifier of a measurement attached to a node
    MeasurementId
}
