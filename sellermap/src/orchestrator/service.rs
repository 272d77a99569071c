//! The orchestrator event loop and its handle.
//!
//! All [`FetchState`] mutation happens inside one spawned task. Renderer
//! callbacks, location results, debounce timers and fetch completions all
//! arrive as events on a single channel, so state changes apply in arrival
//! order without locks. Location lookups, timers and fetches run as their
//! own tasks and post their results back.

use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

use super::config::OrchestratorConfig;
use super::debounce::{DebounceToken, Debouncer};
use super::error::OrchestratorError;
use super::metrics::{FetchMetrics, FetchMetricsSnapshot};
use super::snapshot::MapSnapshot;
use super::state::{FetchOutcome, FetchState, FetchTicket, IssuedViewport, OrchestratorPhase};
use crate::api::{ApiError, EntityFetchService};
use crate::entity::Entity;
use crate::geo::{Viewport, ViewportQuery};
use crate::location::{FixOptions, LocationError, LocationFix, LocationProvider};

enum Event {
    Ready,
    ViewportChanged(Viewport),
    LocationResolved(Result<LocationFix, LocationError>),
    DebounceElapsed(DebounceToken),
    FetchCompleted {
        ticket: FetchTicket,
        result: Result<Vec<Entity>, ApiError>,
    },
}

/// Drives nearby-entity fetches from viewport changes.
///
/// # Example
///
/// ```ignore
/// use std::sync::Arc;
/// use sellermap::api::{ApiClient, ApiConfig};
/// use sellermap::orchestrator::{OrchestratorConfig, ViewportFetchOrchestrator};
///
/// let api = Arc::new(ApiClient::new(&ApiConfig::default())?);
/// let handle = ViewportFetchOrchestrator::new(OrchestratorConfig::default(), location, api)
///     .start();
///
/// handle.on_ready()?;
/// handle.on_viewport_changed(viewport)?;
///
/// let mut snapshots = handle.subscribe();
/// snapshots.changed().await?;
/// for marker in snapshots.borrow().markers() { /* draw */ }
/// ```
pub struct ViewportFetchOrchestrator {
    config: OrchestratorConfig,
    location: Arc<dyn LocationProvider>,
    service: Arc<dyn EntityFetchService>,
}

impl ViewportFetchOrchestrator {
    pub fn new(
        config: OrchestratorConfig,
        location: Arc<dyn LocationProvider>,
        service: Arc<dyn EntityFetchService>,
    ) -> Self {
        Self {
            config,
            location,
            service,
        }
    }

    /// Spawn the event loop on the current Tokio runtime.
    pub fn start(self) -> OrchestratorHandle {
        self.start_with_cancellation(CancellationToken::new())
    }

    /// Spawn the event loop, stopping when `cancellation` fires.
    pub fn start_with_cancellation(self, cancellation: CancellationToken) -> OrchestratorHandle {
        let (tx, rx) = mpsc::unbounded_channel();
        let (snapshot_tx, snapshot_rx) = watch::channel(MapSnapshot::default());
        let metrics = Arc::new(FetchMetrics::new());

        let event_loop = EventLoop {
            debouncer: Debouncer::new(self.config.debounce_window),
            state: FetchState::new(),
            config: self.config,
            location: self.location,
            service: self.service,
            tx: tx.clone(),
            snapshot_tx,
            metrics: Arc::clone(&metrics),
            cancellation: cancellation.clone(),
        };

        let task = tokio::spawn(event_loop.run(rx));

        OrchestratorHandle {
            tx,
            snapshot_rx,
            metrics,
            cancellation,
            task: Some(task),
        }
    }
}

/// Renderer-side handle to a running orchestrator.
///
/// Dropping the handle stops the event loop.
pub struct OrchestratorHandle {
    tx: mpsc::UnboundedSender<Event>,
    snapshot_rx: watch::Receiver<MapSnapshot>,
    metrics: Arc<FetchMetrics>,
    cancellation: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl OrchestratorHandle {
    /// The renderer is ready: acquire a location and fetch once.
    pub fn on_ready(&self) -> Result<(), OrchestratorError> {
        self.send(Event::Ready)
    }

    /// A pan or zoom completed.
    pub fn on_viewport_changed(&self, viewport: Viewport) -> Result<(), OrchestratorError> {
        self.send(Event::ViewportChanged(viewport))
    }

    /// Current renderer-facing state.
    pub fn snapshot(&self) -> MapSnapshot {
        self.snapshot_rx.borrow().clone()
    }

    /// Receiver notified on every state change.
    pub fn subscribe(&self) -> watch::Receiver<MapSnapshot> {
        self.snapshot_rx.clone()
    }

    pub fn metrics(&self) -> FetchMetricsSnapshot {
        self.metrics.snapshot()
    }

    pub fn is_running(&self) -> bool {
        !self.tx.is_closed()
    }

    /// Stop the event loop and wait for it to exit.
    ///
    /// In-flight fetches are not aborted; their results are dropped.
    pub async fn shutdown(mut self) {
        self.cancellation.cancel();
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                warn!(error = %e, "Orchestrator task ended abnormally");
            }
        }
    }

    fn send(&self, event: Event) -> Result<(), OrchestratorError> {
        self.tx.send(event).map_err(|_| OrchestratorError::Stopped)
    }
}

impl Drop for OrchestratorHandle {
    fn drop(&mut self) {
        self.cancellation.cancel();
    }
}

struct EventLoop {
    config: OrchestratorConfig,
    location: Arc<dyn LocationProvider>,
    service: Arc<dyn EntityFetchService>,
    state: FetchState,
    debouncer: Debouncer<IssuedViewport>,
    tx: mpsc::UnboundedSender<Event>,
    snapshot_tx: watch::Sender<MapSnapshot>,
    metrics: Arc<FetchMetrics>,
    cancellation: CancellationToken,
}

impl EventLoop {
    async fn run(mut self, mut rx: mpsc::UnboundedReceiver<Event>) {
        info!(
            debounce_ms = self.config.debounce_window.as_millis() as u64,
            "Viewport fetch orchestrator started"
        );

        let cancellation = self.cancellation.clone();
        loop {
            tokio::select! {
                biased;

                _ = cancellation.cancelled() => {
                    debug!("Viewport fetch orchestrator cancelled");
                    break;
                }

                event = rx.recv() => match event {
                    Some(event) => self.handle(event),
                    None => break,
                },
            }
        }

        self.debouncer.cancel();
        info!(metrics = %self.metrics.snapshot(), "Viewport fetch orchestrator stopped");
    }

    fn handle(&mut self, event: Event) {
        match event {
            Event::Ready => self.on_ready(),
            Event::ViewportChanged(viewport) => self.on_viewport_changed(viewport),
            Event::LocationResolved(result) => self.on_location_resolved(result),
            Event::DebounceElapsed(token) => self.on_debounce_elapsed(token),
            Event::FetchCompleted { ticket, result } => self.on_fetch_completed(ticket, result),
        }

        self.state.settle(self.debouncer.is_pending());
        self.snapshot_tx.send_replace(self.state.snapshot());
    }

    fn on_ready(&mut self) {
        if self.state.phase() != OrchestratorPhase::Idle {
            warn!(phase = %self.state.phase(), "Renderer reported ready again, ignoring");
            return;
        }

        info!("Renderer ready, requesting location");
        self.state.set_phase(OrchestratorPhase::AwaitingLocation);

        let location = Arc::clone(&self.location);
        let options = self.config.fix_options;
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = acquire_fix(location.as_ref(), options).await;
            let _ = tx.send(Event::LocationResolved(result));
        });
    }

    fn on_location_resolved(&mut self, result: Result<LocationFix, LocationError>) {
        if self.state.phase() != OrchestratorPhase::AwaitingLocation {
            debug!(phase = %self.state.phase(), "Unexpected location result, ignoring");
            return;
        }

        if self.state.last_issued().is_some() {
            info!("Viewport already set by the renderer, skipping initial fetch");
            self.state.set_phase(OrchestratorPhase::Ready);
            return;
        }

        let (viewport, phase) = match result {
            Ok(fix) => {
                info!(
                    lat = fix.position.latitude,
                    lon = fix.position.longitude,
                    "Location fix acquired"
                );
                (
                    self.config.fallback_viewport.centered_on(fix.position),
                    OrchestratorPhase::InitialFetch,
                )
            }
            Err(e) => {
                warn!(error = %e, "Location unavailable, using default viewport");
                (self.config.fallback_viewport, OrchestratorPhase::DefaultFetch)
            }
        };

        self.state.set_phase(phase);
        let issued = self.state.issue_initial(viewport);
        self.start_fetch(issued, true);
    }

    fn on_viewport_changed(&mut self, viewport: Viewport) {
        self.metrics.viewport_changed();

        let issued = self.state.issue(viewport);
        if self.state.phase().is_startup_fetch() {
            debug!(seq = issued.seq, "Startup fetch superseded by the renderer");
            self.state.set_phase(OrchestratorPhase::Ready);
        }

        let (token, replaced) = self.debouncer.schedule(issued);
        if replaced {
            self.metrics.debounce_collapsed();
        }

        debug!(seq = issued.seq, %viewport, "Viewport changed, fetch debounced");
        self.arm_timer(token);
    }

    fn on_debounce_elapsed(&mut self, token: DebounceToken) {
        match self.debouncer.take_if_current(token) {
            Some(issued) => self.start_fetch(issued, false),
            None => trace!(token = token.value(), "Debounce timer superseded"),
        }
    }

    fn on_fetch_completed(&mut self, ticket: FetchTicket, result: Result<Vec<Entity>, ApiError>) {
        let seq = ticket.issued.seq;

        let outcome = self.state.resolve(&ticket, result);
        let applied = matches!(outcome, FetchOutcome::Applied(_));

        match outcome {
            FetchOutcome::Applied(count) => {
                self.metrics.fetch_applied();
                info!(seq, count, "Entities updated");
            }
            FetchOutcome::Stale { latest_seq } => {
                self.metrics.fetch_stale();
                debug!(seq, latest_seq, "Discarding stale fetch result");
            }
            FetchOutcome::Failed(e) => {
                self.metrics.fetch_failed();
                warn!(seq, error = %e, "Entity fetch failed, keeping previous results");
            }
        }

        if self.state.phase().is_startup_fetch() && (ticket.initial || applied) {
            self.state.set_phase(OrchestratorPhase::Ready);
        }
    }

    fn arm_timer(&self, token: DebounceToken) {
        let window = self.debouncer.window();
        let tx = self.tx.clone();
        let cancellation = self.cancellation.clone();

        tokio::spawn(async move {
            tokio::select! {
                _ = cancellation.cancelled() => {}
                _ = tokio::time::sleep(window) => {
                    let _ = tx.send(Event::DebounceElapsed(token));
                }
            }
        });
    }

    fn start_fetch(&mut self, issued: IssuedViewport, initial: bool) {
        let ticket = self.state.begin_fetch(issued, initial);
        self.metrics.fetch_issued();

        let query = ViewportQuery::from_viewport(&issued.viewport);
        debug!(
            seq = issued.seq,
            lat = query.lat,
            lon = query.lon,
            radius = query.radius,
            initial,
            "Fetching entities"
        );

        let service = Arc::clone(&self.service);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = service.fetch_entities(query).await;
            let _ = tx.send(Event::FetchCompleted { ticket, result });
        });
    }
}

/// Request permission, then one fix bounded by `options.timeout`.
async fn acquire_fix(
    location: &dyn LocationProvider,
    options: FixOptions,
) -> Result<LocationFix, LocationError> {
    if !location.request_permission().await.is_granted() {
        return Err(LocationError::PermissionDenied);
    }

    match tokio::time::timeout(options.timeout, location.current_fix(options)).await {
        Ok(result) => result,
        Err(_) => Err(LocationError::Timeout(options.timeout)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::GeoPoint;
    use crate::location::FixedLocationProvider;
    use std::time::Duration;

    fn fix() -> LocationFix {
        LocationFix::new(GeoPoint::new(52.52, 13.405).unwrap())
    }

    #[tokio::test]
    async fn test_acquire_fix_granted() {
        let provider = FixedLocationProvider::granted(fix());
        assert_eq!(acquire_fix(&provider, FixOptions::default()).await, Ok(fix()));
    }

    #[tokio::test]
    async fn test_acquire_fix_denied() {
        let provider = FixedLocationProvider::denied();
        assert_eq!(
            acquire_fix(&provider, FixOptions::default()).await,
            Err(LocationError::PermissionDenied)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_acquire_fix_times_out() {
        let provider = FixedLocationProvider::granted(fix()).with_delay(Duration::from_secs(60));
        let options = FixOptions::default();

        let start = tokio::time::Instant::now();
        let result = acquire_fix(&provider, options).await;

        assert_eq!(result, Err(LocationError::Timeout(Duration::from_secs(15))));
        assert_eq!(start.elapsed(), Duration::from_secs(15));
    }

    #[tokio::test]
    async fn test_send_after_shutdown_fails() {
        struct NoEntities;
        impl EntityFetchService for NoEntities {
            fn fetch_entities(
                &self,
                _query: ViewportQuery,
            ) -> crate::BoxFuture<'_, Result<Vec<Entity>, ApiError>> {
                Box::pin(async { Ok(Vec::new()) })
            }
        }

        let handle = ViewportFetchOrchestrator::new(
            OrchestratorConfig::default(),
            Arc::new(FixedLocationProvider::denied()),
            Arc::new(NoEntities),
        )
        .start();

        let tx = handle.tx.clone();
        handle.shutdown().await;

        assert!(tx.is_closed());
        assert!(tx.send(Event::Ready).is_err());
    }
}
