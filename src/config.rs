//! Run configuration: the ordered station list from a JSON file and the
//! portal session identity from the process environment.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, ensure};

use crate::model::StationRef;

pub const DEFAULT_BASE_URL: &str = "https://api.issks.com";

/// Reads the ordered station list. File order is contractual: the report
/// groups areas by their first appearance here.
pub fn load_stations(path: &Path) -> Result<Vec<StationRef>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading station list {}", path.display()))?;
    let stations: Vec<StationRef> = serde_json::from_str(&raw)
        .with_context(|| format!("parsing station list {}", path.display()))?;
    ensure!(
        !stations.is_empty(),
        "station list {} is empty",
        path.display()
    );
    Ok(stations)
}

/// Session identity shared read-only by every request in a run.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub base_url: String,
    pub session_id: String,
}

impl SessionConfig {
    pub fn from_env() -> Result<Self> {
        let session_id = std::env::var("PORTAL_SESSION_ID")
            .context("PORTAL_SESSION_ID must be set (the portal JSESSIONID cookie value)")?;
        let base_url =
            std::env::var("PORTAL_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Ok(Self {
            base_url,
            session_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    fn temp_path(name: &str) -> std::path::PathBuf {
        env::temp_dir().join(name)
    }

    #[test]
    fn test_load_stations_preserves_order() {
        let path = temp_path("outlet_watch_test_stations.json");
        fs::write(
            &path,
            r#"[
                {"id": 117379, "name": "第十餐厅1号机", "area": "第十餐厅"},
                {"id": 117377, "name": "游泳馆2号机", "area": "游泳馆"}
            ]"#,
        )
        .unwrap();

        let stations = load_stations(&path).unwrap();
        assert_eq!(stations.len(), 2);
        assert_eq!(stations[0].id, 117379);
        assert_eq!(stations[0].area, "第十餐厅");
        assert_eq!(stations[1].area, "游泳馆");

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_load_stations_rejects_empty_list() {
        let path = temp_path("outlet_watch_test_stations_empty.json");
        fs::write(&path, "[]").unwrap();

        assert!(load_stations(&path).is_err());

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_load_stations_rejects_malformed_file() {
        let path = temp_path("outlet_watch_test_stations_bad.json");
        fs::write(&path, "not json").unwrap();

        assert!(load_stations(&path).is_err());

        fs::remove_file(&path).unwrap();
    }
}
