//! Map entities: the sellers returned by the viewport query.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geo::GeoPoint;

/// Presence of a seller as reported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PresenceStatus {
    Online,
    Offline,
    Streaming,
}

impl PresenceStatus {
    /// Get a short description for display.
    pub fn as_str(&self) -> &'static str {
        match self {
            PresenceStatus::Online => "online",
            PresenceStatus::Offline => "offline",
            PresenceStatus::Streaming => "streaming",
        }
    }
}

impl fmt::Display for PresenceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A seller shown on the map.
///
/// `location` is nullable on the wire; sellers without one are kept in the
/// result set but never rendered as markers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    /// Identifier, unique within one result set.
    pub id: u64,
    pub user_id: u64,
    /// Display name.
    pub username: String,
    /// Average review score; absent or null for unrated sellers.
    #[serde(default)]
    pub rating_avg: Option<f64>,
    pub presence_status: PresenceStatus,
    #[serde(default)]
    pub location: Option<GeoPoint>,
}

impl Entity {
    /// Whether this entity can be placed on the map.
    pub fn is_renderable(&self) -> bool {
        self.location.is_some()
    }
}

/// Response envelope of the seller endpoint: `{ "data": [...] }`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct EntityEnvelope {
    pub data: Vec<Entity>,
}
