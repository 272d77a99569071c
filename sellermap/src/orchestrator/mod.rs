//! Viewport fetch orchestration.
//!
//! Turns renderer events into nearby-entity fetches:
//!
//! ```text
//! on_ready ──► permission ──► location fix ──┬─► initial viewport ──┐
//!                                            └─► fallback viewport ─┤ immediate fetch
//!                                                                   ▼
//! on_viewport_changed ──► Debouncer (1 s quiescence) ──► fetch ──► staleness guard
//!                                                                   │
//!                                            MapSnapshot (watch) ◄──┘
//! ```
//!
//! Every fetch is tagged with the issue sequence number of its viewport.
//! A result is applied only if no newer viewport has been issued since, so a
//! slow response can never overwrite the data for a newer viewport. Failed
//! fetches keep the previous entity list.

mod config;
mod debounce;
mod error;
mod metrics;
mod service;
mod snapshot;
mod state;

pub use config::OrchestratorConfig;
pub use debounce::{DebounceToken, Debouncer, DEFAULT_DEBOUNCE_WINDOW};
pub use error::OrchestratorError;
pub use metrics::{FetchMetrics, FetchMetricsSnapshot};
pub use service::{OrchestratorHandle, ViewportFetchOrchestrator};
pub use snapshot::MapSnapshot;
pub use state::{FetchOutcome, FetchState, FetchTicket, IssuedViewport, OrchestratorPhase};
