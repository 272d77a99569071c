//! Orchestrator-owned fetch state.
//!
//! `FetchState` is only ever touched by the orchestrator's event loop, so it
//! carries no synchronization of its own.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Local};

use super::snapshot::MapSnapshot;
use crate::api::ApiError;
use crate::entity::Entity;
use crate::geo::Viewport;

/// Lifecycle of the map screen.
///
/// ```text
/// Idle → AwaitingLocation → (InitialFetch | DefaultFetch) → Ready
/// Ready ⇄ DebouncePending ⇄ Fetching ⇄ Ready
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrchestratorPhase {
    /// Renderer not ready yet.
    Idle,
    /// Waiting for permission and a location fix.
    AwaitingLocation,
    /// First fetch for the viewport derived from the device location.
    InitialFetch,
    /// First fetch for the fallback viewport.
    DefaultFetch,
    Ready,
    /// A viewport change is waiting out the debounce window.
    DebouncePending,
    /// At least one fetch is in flight.
    Fetching,
}

impl OrchestratorPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrchestratorPhase::Idle => "Idle",
            OrchestratorPhase::AwaitingLocation => "AwaitingLocation",
            OrchestratorPhase::InitialFetch => "InitialFetch",
            OrchestratorPhase::DefaultFetch => "DefaultFetch",
            OrchestratorPhase::Ready => "Ready",
            OrchestratorPhase::DebouncePending => "DebouncePending",
            OrchestratorPhase::Fetching => "Fetching",
        }
    }

    /// Whether the startup fetch is the one being waited for.
    pub fn is_startup_fetch(&self) -> bool {
        matches!(
            self,
            OrchestratorPhase::InitialFetch | OrchestratorPhase::DefaultFetch
        )
    }

    /// Whether the startup sequence has not finished yet.
    pub fn is_starting(&self) -> bool {
        matches!(
            self,
            OrchestratorPhase::Idle
                | OrchestratorPhase::AwaitingLocation
                | OrchestratorPhase::InitialFetch
                | OrchestratorPhase::DefaultFetch
        )
    }
}

impl fmt::Display for OrchestratorPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A viewport together with the issue sequence number it received.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IssuedViewport {
    pub viewport: Viewport,
    pub seq: u64,
}

/// Tag attached to every outgoing fetch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FetchTicket {
    pub issued: IssuedViewport,
    /// Set for the startup fetch (location or fallback viewport).
    pub initial: bool,
}

/// How a completed fetch was handled.
#[derive(Debug)]
pub enum FetchOutcome {
    /// Entity list replaced; carries the new entity count.
    Applied(usize),
    /// A newer viewport was issued while the fetch was in flight.
    Stale { latest_seq: u64 },
    /// The fetch failed; the previous list is kept.
    Failed(ApiError),
}

/// Mutable state of one orchestrator instance.
#[derive(Debug)]
pub struct FetchState {
    phase: OrchestratorPhase,
    last_issued: Option<Viewport>,
    initial_viewport: Option<Viewport>,
    issue_seq: u64,
    /// Sequence number of the last fetch resolved while it was still current.
    resolved_seq: u64,
    entities: Arc<Vec<Entity>>,
    in_flight: usize,
    last_updated: Option<DateTime<Local>>,
}

impl Default for FetchState {
    fn default() -> Self {
        Self::new()
    }
}

impl FetchState {
    pub fn new() -> Self {
        Self {
            phase: OrchestratorPhase::Idle,
            last_issued: None,
            initial_viewport: None,
            issue_seq: 0,
            resolved_seq: 0,
            entities: Arc::new(Vec::new()),
            in_flight: 0,
            last_updated: None,
        }
    }

    pub fn phase(&self) -> OrchestratorPhase {
        self.phase
    }

    pub fn set_phase(&mut self, phase: OrchestratorPhase) {
        self.phase = phase;
    }

    pub fn last_issued(&self) -> Option<Viewport> {
        self.last_issued
    }

    pub fn issue_seq(&self) -> u64 {
        self.issue_seq
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn entities(&self) -> &Arc<Vec<Entity>> {
        &self.entities
    }

    /// Record `viewport` as the latest one and return its sequence number.
    pub fn issue(&mut self, viewport: Viewport) -> IssuedViewport {
        self.issue_seq += 1;
        self.last_issued = Some(viewport);
        IssuedViewport {
            viewport,
            seq: self.issue_seq,
        }
    }

    /// Record the startup viewport and issue it.
    pub fn issue_initial(&mut self, viewport: Viewport) -> IssuedViewport {
        self.initial_viewport = Some(viewport);
        self.issue(viewport)
    }

    /// Count a fetch as in flight and build its ticket.
    pub fn begin_fetch(&mut self, issued: IssuedViewport, initial: bool) -> FetchTicket {
        self.in_flight += 1;
        FetchTicket { issued, initial }
    }

    /// Apply a completed fetch, guarding against stale results.
    ///
    /// A successful result replaces the entity list only when its ticket
    /// still carries the latest issue sequence number.
    pub fn resolve(
        &mut self,
        ticket: &FetchTicket,
        result: Result<Vec<Entity>, ApiError>,
    ) -> FetchOutcome {
        self.in_flight = self.in_flight.saturating_sub(1);
        if ticket.issued.seq == self.issue_seq {
            self.resolved_seq = self.issue_seq;
        }

        match result {
            Ok(entities) if ticket.issued.seq == self.issue_seq => {
                let count = entities.len();
                self.entities = Arc::new(entities);
                self.last_updated = Some(Local::now());
                FetchOutcome::Applied(count)
            }
            Ok(_) => FetchOutcome::Stale {
                latest_seq: self.issue_seq,
            },
            Err(e) => FetchOutcome::Failed(e),
        }
    }

    /// Recompute the steady-state phase once startup has finished.
    pub fn settle(&mut self, debounce_pending: bool) {
        if self.phase.is_starting() {
            return;
        }
        self.phase = if debounce_pending {
            OrchestratorPhase::DebouncePending
        } else if self.in_flight > 0 {
            OrchestratorPhase::Fetching
        } else {
            OrchestratorPhase::Ready
        };
    }

    /// Renderer-facing copy of the current state.
    pub fn snapshot(&self) -> MapSnapshot {
        MapSnapshot {
            phase: self.phase,
            viewport: self.last_issued,
            initial_viewport: self.initial_viewport,
            entities: Arc::clone(&self.entities),
            last_updated: self.last_updated,
            latest_resolved: self.is_latest_resolved(),
        }
    }

    /// Whether the last issued viewport has been fetched, successfully or not.
    pub fn is_latest_resolved(&self) -> bool {
        self.issue_seq > 0 && self.resolved_seq == self.issue_seq
    }
}
