//! Type-safe identifier wrappers.
//!
//! Agents and societies are addressed by human-chosen string keys (an
//! agent's unique, case-sensitive name; a society's slug such as `rome`).
//! Events use UUID v7 so that ids sort in creation order; digests carry a
//! readable `digest_{society}_{millis}` key.

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// Generates a newtype wrapper around [`Uuid`] with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
        #[ts(export, export_to = "bindings/")]
        pub struct $name(pub Uuid);

        impl $name {
            /// Create a new identifier using UUID v7 (time-ordered).
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Return the inner [`Uuid`] value.
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }
    };
}

/// Generates a newtype wrapper around a [`String`] key.
///
/// Keys compare byte-for-byte, so `Marcus` and `marcus` are distinct.
macro_rules! define_key {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
        #[serde(transparent)]
        #[ts(export, export_to = "bindings/")]
        pub struct $name(String);

        impl $name {
            /// Wrap a string as a key.
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Borrow the key as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Whether the key is empty or whitespace only.
            pub fn is_blank(&self) -> bool {
                self.0.trim().is_empty()
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id! {
    /// Unique identifier for an event in a society's log.
    EventId
}

define_key! {
    /// Identifier of a generated digest, `digest_{society}_{millis}`.
    DigestId
}

define_key! {
    /// Unique, case-sensitive name of an agent (human or scripted).
    AgentName
}

define_key! {
    /// Slug identifying a society (e.g. `rome`, `cybertron`).
    SocietyId
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_ids_are_unique() {
        let first = EventId::new();
        let second = EventId::new();
        assert_ne!(first, second);
        assert_ne!(first.into_inner(), Uuid::nil());
    }

    #[test]
    fn agent_names_are_case_sensitive() {
        assert_ne!(AgentName::from("Marcus"), AgentName::from("marcus"));
    }

    #[test]
    fn keys_serialize_as_plain_strings() {
        let json = serde_json::to_string(&SocietyId::from("rome")).ok();
        assert_eq!(json.as_deref(), Some("\"rome\""));
    }

    #[test]
    fn blank_detection_ignores_whitespace() {
        assert!(AgentName::from("   ").is_blank());
        assert!(!AgentName::from(" x ").is_blank());
    }
}
