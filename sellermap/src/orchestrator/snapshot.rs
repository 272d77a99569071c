//! Renderer-facing view of the orchestrator state.

use std::sync::Arc;

use chrono::{DateTime, Local};

use super::state::OrchestratorPhase;
use crate::entity::Entity;
use crate::geo::Viewport;

/// Point-in-time copy of what the map should show.
///
/// Cheap to clone: the entity list is shared and replaced wholesale on every
/// successful fetch.
#[derive(Debug, Clone)]
pub struct MapSnapshot {
    pub phase: OrchestratorPhase,
    /// Last issued viewport.
    pub viewport: Option<Viewport>,
    /// Viewport chosen at startup (device location or fallback).
    pub initial_viewport: Option<Viewport>,
    /// Last successfully fetched entities, including unplaceable ones.
    pub entities: Arc<Vec<Entity>>,
    /// When the entity list was last replaced.
    pub last_updated: Option<DateTime<Local>>,
    /// The fetch for `viewport` has completed, whether applied or failed.
    pub latest_resolved: bool,
}

impl Default for MapSnapshot {
    fn default() -> Self {
        Self {
            phase: OrchestratorPhase::Idle,
            viewport: None,
            initial_viewport: None,
            entities: Arc::new(Vec::new()),
            last_updated: None,
            latest_resolved: false,
        }
    }
}

impl MapSnapshot {
    /// Entities that can be drawn: those with a location.
    pub fn markers(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter().filter(|e| e.is_renderable())
    }

    pub fn marker_count(&self) -> usize {
        self.markers().count()
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::PresenceStatus;
    use crate::geo::GeoPoint;

    #[test]
    fn test_markers_exclude_null_location() {
        let placed = Entity {
            id: 1,
            user_id: 1,
            username: "placed".to_string(),
            rating_avg: Some(5.0),
            presence_status: PresenceStatus::Online,
            location: Some(GeoPoint::new(37.78, -122.43).unwrap()),
        };
        let unplaced = Entity {
            id: 2,
            location: None,
            username: "unplaced".to_string(),
            ..placed.clone()
        };

        let snapshot = MapSnapshot {
            entities: Arc::new(vec![placed, unplaced]),
            ..Default::default()
        };

        assert_eq!(snapshot.entity_count(), 2);
        assert_eq!(snapshot.marker_count(), 1);
        assert_eq!(snapshot.markers().next().unwrap().id, 1);
    }
}
