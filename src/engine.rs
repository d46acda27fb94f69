//! Two-wave concurrent fetch pipeline: resolve every configured station's
//! outlet list, then fetch and classify every discovered outlet.

use std::sync::Arc;

use anyhow::{Result, bail};
use tracing::{Instrument, error, info, warn};

use crate::classify::classify;
use crate::model::{OutletState, StationRef};
use crate::portal::Portal;

/// Runs both fetch waves and returns the full classified set.
///
/// Wave 1 resolves all stations concurrently and joins before wave 2
/// starts, because the outlet fan-out is not known until every listing has
/// answered. Failures stay local to their station or outlet; only a run
/// where no station resolves at all is fatal.
pub async fn collect_states<P>(portal: Arc<P>, stations: &[StationRef]) -> Result<Vec<OutletState>>
where
    P: Portal + Send + Sync + 'static,
{
    let mut listing_tasks = Vec::with_capacity(stations.len());
    for station in stations {
        let portal = Arc::clone(&portal);
        let station = station.clone();
        let span = tracing::info_span!("resolve_station", station = %station.name);

        listing_tasks.push(tokio::spawn(
            async move {
                match portal.outlets(&station).await {
                    Ok(outlets) => {
                        info!(outlet_count = outlets.len(), "Station listing resolved");
                        Some(outlets)
                    }
                    Err(e) => {
                        error!(error = %e, "Station listing failed");
                        None
                    }
                }
            }
            .instrument(span),
        ));
    }

    let mut outlets = Vec::new();
    let mut failed_stations = 0usize;
    for task in listing_tasks {
        match task.await {
            Ok(Some(mut found)) => outlets.append(&mut found),
            Ok(None) => failed_stations += 1,
            Err(e) => {
                failed_stations += 1;
                error!(error = %e, "Station resolver task panicked");
            }
        }
    }

    if failed_stations == stations.len() && !stations.is_empty() {
        bail!("no station listing could be resolved");
    }
    info!(
        outlet_count = outlets.len(),
        failed_stations, "Outlet discovery complete"
    );

    let mut detail_tasks = Vec::with_capacity(outlets.len());
    for outlet in outlets {
        let portal = Arc::clone(&portal);
        let span = tracing::info_span!(
            "fetch_outlet",
            station = %outlet.station.name,
            outlet = %outlet.name,
        );

        detail_tasks.push(tokio::spawn(
            async move {
                match portal.outlet_page(&outlet).await {
                    Ok(body) => Some(classify(&outlet, &body)),
                    Err(e) => {
                        warn!(error = %e, "Outlet detail fetch failed, outlet dropped");
                        None
                    }
                }
            }
            .instrument(span),
        ));
    }

    // Join order, not completion order, fixes the encounter order of the
    // result set; the reporter's stable sort relies on it for ties.
    let mut states = Vec::with_capacity(detail_tasks.len());
    for task in detail_tasks {
        match task.await {
            Ok(Some(state)) => states.push(state),
            Ok(None) => {}
            Err(e) => error!(error = %e, "Outlet fetch task panicked"),
        }
    }

    info!(state_count = states.len(), "Classification complete");
    Ok(states)
}
