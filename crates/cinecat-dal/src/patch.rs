//! Helpers for partial updates.
//!
//! Update payloads distinguish a missing field (leave the column unchanged) from an explicit
//! `null` (clear the column). Nullable columns are therefore modelled as `Option<Option<T>>`
//! with `#[serde(default, deserialize_with = "crate::patch::some")]`: missing gives `None`,
//! `null` gives `Some(None)` and a value gives `Some(Some(value))`.
//!
//! Required columns are plain `Option<T>` with `crate::patch::not_null`, so an explicit `null`
//! is a deserialization error instead of being taken as "unchanged".

use serde::{Deserialize, Deserializer};

pub fn some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

pub fn not_null<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}
