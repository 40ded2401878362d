//! Branded ID newtypes.
//!
//! IDs are stored and transmitted as prefixed strings (`ev_<uuidv7>`,
//! `conn_<uuidv7>`) so a raw value is recognizable in logs and in the
//! database. [`UserId`] carries no prefix — it is an opaque identifier
//! assigned by the external identity provider and is never generated here.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! branded_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap an existing identifier string.
            pub fn new(raw: impl Into<String>) -> Self {
                Self(raw.into())
            }

            /// Borrow the identifier as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(raw: &str) -> Self {
                Self(raw.to_string())
            }
        }

        impl From<String> for $name {
            fn from(raw: String) -> Self {
                Self(raw)
            }
        }
    };
}

branded_id! {
    /// Identifier of a persisted event. Assigned by the store at insert time.
    EventId
}

branded_id! {
    /// Opaque caller identity returned by the identity provider.
    UserId
}

branded_id! {
    /// Identifier of one live WebSocket connection.
    ConnectionId
}

impl EventId {
    /// Generate a fresh `ev_<uuidv7>` identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(format!("ev_{}", Uuid::now_v7()))
    }
}

impl ConnectionId {
    /// Generate a fresh `conn_<uuidv7>` identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(format!("conn_{}", Uuid::now_v7()))
    }
}
