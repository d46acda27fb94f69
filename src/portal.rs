//! Typed access to the campus charging portal: the per-station outlet
//! listing, the per-outlet detail page, and the session liveness probe.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;

use crate::fetch::{self, HttpClient};
use crate::model::{OutletRef, StationRef};

/// Map probe point for the liveness check. Any coordinate the portal
/// recognizes works; the campus center keeps the response small.
const PROBE_MAP_X: f64 = 118.958406;
const PROBE_MAP_Y: f64 = 32.119560;

#[derive(Debug, Deserialize)]
struct OutletEntry {
    #[serde(rename = "vOutletNo")]
    outlet_no: String,
    #[serde(rename = "vOutletName")]
    outlet_name: String,
    #[serde(rename = "iStatus", default)]
    status_flag: i64,
}

#[derive(Debug, Deserialize)]
struct OutletListing {
    #[serde(default)]
    list: Vec<OutletEntry>,
}

/// Portal operations the fetch engine needs. Production code talks to the
/// live portal through [`PortalClient`]; tests substitute a stub.
#[async_trait]
pub trait Portal {
    /// Fetches the ordered outlet list for one station.
    async fn outlets(&self, station: &StationRef) -> Result<Vec<OutletRef>>;

    /// Fetches the raw detail page for one outlet.
    async fn outlet_page(&self, outlet: &OutletRef) -> Result<String>;
}

pub struct PortalClient<C> {
    http: C,
    base_url: String,
}

impl<C: HttpClient> PortalClient<C> {
    pub fn new(http: C, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    /// Cheap authenticated probe. An expired session bounces to a login
    /// page instead of the station-list JSON.
    pub async fn check_alive(&self) -> bool {
        let url = format!(
            "{}/issksapi/V2/ec/stationList/json.shtml?mapX={PROBE_MAP_X}&mapY={PROBE_MAP_Y}",
            self.base_url
        );
        fetch::fetch_json::<_, serde_json::Value>(&self.http, &url)
            .await
            .is_ok()
    }
}

#[async_trait]
impl<C: HttpClient> Portal for PortalClient<C> {
    async fn outlets(&self, station: &StationRef) -> Result<Vec<OutletRef>> {
        let url = format!(
            "{}/issksapi/V2/ec/chargingList.shtml?stationId={}",
            self.base_url, station.id
        );
        let listing: OutletListing = fetch::fetch_json(&self.http, &url)
            .await
            .with_context(|| format!("listing outlets of station {}", station.name))?;

        Ok(listing
            .list
            .into_iter()
            .map(|entry| OutletRef {
                no: entry.outlet_no,
                name: entry.outlet_name,
                status_flag: entry.status_flag,
                station: station.clone(),
            })
            .collect())
    }

    async fn outlet_page(&self, outlet: &OutletRef) -> Result<String> {
        let url = format!(
            "{}/issksapi/V2/ec/charging/{}.shtml",
            self.base_url, outlet.no
        );
        fetch::fetch_text(&self.http, &url)
            .await
            .with_context(|| format!("fetching detail page of outlet {}", outlet.no))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_deserialization() {
        let body = r#"{
            "list": [
                {"vOutletNo": "200627", "vOutletName": "插座1", "iStatus": 1},
                {"vOutletNo": "200628", "vOutletName": "插座2"}
            ]
        }"#;
        let listing: OutletListing = serde_json::from_str(body).unwrap();
        assert_eq!(listing.list.len(), 2);
        assert_eq!(listing.list[0].outlet_no, "200627");
        assert_eq!(listing.list[0].status_flag, 1);
        // The flag is optional in the wire format.
        assert_eq!(listing.list[1].status_flag, 0);
    }

    #[test]
    fn test_listing_without_list_field() {
        let listing: OutletListing = serde_json::from_str("{}").unwrap();
        assert!(listing.list.is_empty());
    }
}
