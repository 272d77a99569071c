//! Watch command - drive the viewport orchestrator from stdin.
//!
//! Each stdin line is a viewport, `lat lon lat_delta lon_delta`, or just
//! `lat lon` for the default spans. Blank lines and `#` comments are skipped.
//! Snapshot changes are printed as they arrive. On end of input the command
//! waits for the last viewport to settle, then exits; Ctrl+C exits at once.

use std::sync::Arc;
use std::time::Duration;

use sellermap::geo::{GeoPoint, Viewport};
use sellermap::location::{FixedLocationProvider, LocationFix, LocationProvider};
use sellermap::orchestrator::{
    MapSnapshot, OrchestratorConfig, OrchestratorHandle, ViewportFetchOrchestrator,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::output;
use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the watch command.
pub struct WatchArgs {
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub deny_location: bool,
    pub debounce_ms: Option<u64>,
    pub api_url: Option<String>,
    pub verbose: bool,
}

/// Run the watch command.
pub fn run(args: WatchArgs) -> Result<(), CliError> {
    let runner = CliRunner::new(args.verbose)?;
    runner.log_startup("watch");

    let mut config = OrchestratorConfig::from_config_file(runner.config())?;
    if let Some(ms) = args.debounce_ms {
        if ms == 0 {
            return Err(CliError::InvalidInput(
                "debounce must be at least 1 ms".to_string(),
            ));
        }
        config = config.with_debounce_window(Duration::from_millis(ms));
    }

    let location = location_provider(args.lat, args.lon, args.deny_location)?;
    let api = Arc::new(runner.api_client(args.api_url)?);

    println!("SellerMap watch v{}", env!("CARGO_PKG_VERSION"));
    println!("=====================");
    println!();
    println!("Backend:  {}", api.base_url());
    println!("Debounce: {} ms", config.debounce_window.as_millis());
    println!();
    println!("Enter viewports as: lat lon [lat_delta lon_delta]");
    println!("Press Ctrl+C to exit");
    println!();

    let shutdown = CancellationToken::new();
    let signal = shutdown.clone();
    ctrlc::set_handler(move || {
        eprintln!();
        eprintln!("Received shutdown signal, stopping...");
        signal.cancel();
    })
    .map_err(|e| CliError::Config(format!("Failed to set signal handler: {}", e)))?;

    runner.block_on(async move {
        let handle = ViewportFetchOrchestrator::new(config, location, api)
            .start_with_cancellation(shutdown.child_token());
        let result = drive(&handle, &shutdown).await;

        let metrics = handle.metrics();
        handle.shutdown().await;
        println!();
        println!("{}", metrics);
        result
    })
}

fn location_provider(
    lat: Option<f64>,
    lon: Option<f64>,
    deny: bool,
) -> Result<Arc<dyn LocationProvider>, CliError> {
    if deny {
        return Ok(Arc::new(FixedLocationProvider::denied()));
    }

    match (lat, lon) {
        (Some(lat), Some(lon)) => {
            let fix = LocationFix::new(GeoPoint::new(lat, lon)?);
            Ok(Arc::new(FixedLocationProvider::granted(fix)))
        }
        (None, None) => Ok(Arc::new(FixedLocationProvider::denied())),
        _ => Err(CliError::InvalidInput(
            "--lat and --lon must be given together".to_string(),
        )),
    }
}

/// Parse one stdin line into a viewport.
fn parse_viewport(line: &str) -> Result<Option<Viewport>, CliError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let values = line
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<f64>()
                .map_err(|_| CliError::InvalidInput(format!("'{}' is not a number", s)))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let viewport = match values.as_slice() {
        [lat, lon] => Viewport::around(GeoPoint::new(*lat, *lon)?),
        [lat, lon, lat_delta, lon_delta] => Viewport::new(*lat, *lon, *lat_delta, *lon_delta)?,
        _ => {
            return Err(CliError::InvalidInput(format!(
                "expected 2 or 4 numbers, got {}",
                values.len()
            )))
        }
    };
    Ok(Some(viewport))
}

async fn drive(handle: &OrchestratorHandle, shutdown: &CancellationToken) -> Result<(), CliError> {
    handle.on_ready()?;

    let mut snapshots = handle.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut printed = MapSnapshot::default();
    let mut last_sent: Option<Viewport> = None;

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => return Ok(()),

            changed = snapshots.changed() => {
                if changed.is_err() {
                    return Ok(());
                }
                let snapshot = snapshots.borrow_and_update().clone();
                report(&snapshot, &mut printed);
            }

            line = lines.next_line() => match line? {
                Some(line) => match parse_viewport(&line) {
                    Ok(Some(viewport)) => {
                        handle.on_viewport_changed(viewport)?;
                        last_sent = Some(viewport);
                    }
                    Ok(None) => {}
                    Err(e) => eprintln!("{}", e),
                },
                None => break,
            },
        }
    }

    debug!("End of input, waiting for the map to settle");
    settle(&mut snapshots, last_sent, shutdown, &mut printed).await;
    Ok(())
}

/// Print snapshots until the last sent viewport has been fetched.
async fn settle(
    snapshots: &mut watch::Receiver<MapSnapshot>,
    last_sent: Option<Viewport>,
    shutdown: &CancellationToken,
    printed: &mut MapSnapshot,
) {
    loop {
        {
            let snapshot = snapshots.borrow_and_update().clone();
            report(&snapshot, printed);
            if is_settled(&snapshot, last_sent) {
                return;
            }
        }

        tokio::select! {
            _ = shutdown.cancelled() => return,
            changed = snapshots.changed() => {
                if changed.is_err() {
                    return;
                }
            }
        }
    }
}

fn is_settled(snapshot: &MapSnapshot, last_sent: Option<Viewport>) -> bool {
    snapshot.latest_resolved && (last_sent.is_none() || snapshot.viewport == last_sent)
}

/// Print `snapshot` if it differs from the last printed one.
fn report(snapshot: &MapSnapshot, printed: &mut MapSnapshot) {
    let entities_changed = !Arc::ptr_eq(&snapshot.entities, &printed.entities);
    if !entities_changed
        && snapshot.phase == printed.phase
        && snapshot.viewport == printed.viewport
    {
        return;
    }

    output::print_snapshot(snapshot, entities_changed);
    *printed = snapshot.clone();
}
