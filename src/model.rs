//! Core entities: configured stations, outlets discovered from station
//! listings, and the classified per-outlet state the report is built from.

use chrono::{DateTime, Duration, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

/// Sort key substituted for outlets that are not charging, so idle and
/// out-of-service sockets land after every actively charging one.
pub const IDLE_SORT_SENTINEL: i64 = 999;

/// Display timezone offset for all rendered timestamps (campus local time).
pub const DISPLAY_UTC_OFFSET_HOURS: i32 = 8;

/// One configured charging station.
///
/// Read from `stations.json`; the file order is contractual, it drives the
/// area grouping order of the report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StationRef {
    pub id: u64,
    pub name: String,
    pub area: String,
}

/// One socket discovered in a station's listing response.
#[derive(Debug, Clone)]
pub struct OutletRef {
    pub no: String,
    pub name: String,
    /// Raw status flag from the listing call, forwarded to the classifier.
    pub status_flag: i64,
    pub station: StationRef,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OutletStatus {
    Using,
    Available,
    Unavailable,
}

impl OutletStatus {
    pub fn label(self) -> &'static str {
        match self {
            OutletStatus::Using => "使用中",
            OutletStatus::Available => "空闲中",
            OutletStatus::Unavailable => "维护中",
        }
    }
}

/// Classified state of one outlet.
///
/// Created exactly once per discovered outlet and never mutated afterwards.
/// Display text is derived on read, never stored.
#[derive(Debug, Clone, Serialize)]
pub struct OutletState {
    pub station_name: String,
    pub outlet_name: String,
    pub area: String,
    pub status: OutletStatus,
    pub power_watts: u32,
    pub used_minutes: u32,
    pub total_minutes: u32,
}

impl OutletState {
    /// Minutes of charge left. Outlets that are not charging get the sort
    /// sentinel so they rank after every active one.
    pub fn remaining_minutes(&self) -> i64 {
        if self.status == OutletStatus::Using {
            i64::from(self.total_minutes) - i64::from(self.used_minutes)
        } else {
            IDLE_SORT_SENTINEL
        }
    }

    pub fn used_and_total_desc(&self) -> String {
        if self.status == OutletStatus::Using {
            format!("{}/{}分钟", self.used_minutes, self.total_minutes)
        } else {
            String::new()
        }
    }

    pub fn remaining_time_desc(&self) -> String {
        if self.status == OutletStatus::Using {
            let remaining = self.remaining_minutes();
            format!("{}小时{}分钟", remaining / 60, remaining % 60)
        } else {
            String::new()
        }
    }

    /// Projected end of the charge, in campus local time.
    pub fn end_time_desc(&self, now: DateTime<Utc>) -> String {
        if self.status == OutletStatus::Using {
            (campus_time(now) + Duration::minutes(self.remaining_minutes()))
                .format("%Y-%m-%d %H:%M")
                .to_string()
        } else {
            String::new()
        }
    }

    pub fn note(&self) -> &'static str {
        if self.status == OutletStatus::Unavailable {
            self.status.label()
        } else {
            ""
        }
    }
}

/// Shifts a UTC instant into the campus display timezone.
pub fn campus_time(now: DateTime<Utc>) -> DateTime<FixedOffset> {
    let offset = FixedOffset::east_opt(DISPLAY_UTC_OFFSET_HOURS * 3600).unwrap();
    now.with_timezone(&offset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn state(status: OutletStatus, used: u32, total: u32) -> OutletState {
        OutletState {
            station_name: "第十餐厅1号机".to_string(),
            outlet_name: "插座3".to_string(),
            area: "第十餐厅".to_string(),
            status,
            power_watts: 320,
            used_minutes: used,
            total_minutes: total,
        }
    }

    #[test]
    fn test_remaining_minutes_while_using() {
        let s = state(OutletStatus::Using, 45, 180);
        assert_eq!(s.remaining_minutes(), 135);
    }

    #[test]
    fn test_remaining_minutes_sentinel_when_idle() {
        assert_eq!(
            state(OutletStatus::Available, 0, 0).remaining_minutes(),
            IDLE_SORT_SENTINEL
        );
        // Leftover numeric fields must not leak into the sort key.
        assert_eq!(
            state(OutletStatus::Unavailable, 45, 180).remaining_minutes(),
            IDLE_SORT_SENTINEL
        );
    }

    #[test]
    fn test_used_and_total_desc() {
        assert_eq!(
            state(OutletStatus::Using, 45, 180).used_and_total_desc(),
            "45/180分钟"
        );
        assert_eq!(state(OutletStatus::Available, 0, 0).used_and_total_desc(), "");
        assert_eq!(
            state(OutletStatus::Unavailable, 45, 180).used_and_total_desc(),
            ""
        );
    }

    #[test]
    fn test_remaining_time_desc() {
        assert_eq!(
            state(OutletStatus::Using, 45, 180).remaining_time_desc(),
            "2小时15分钟"
        );
        assert_eq!(state(OutletStatus::Available, 0, 0).remaining_time_desc(), "");
    }

    #[test]
    fn test_end_time_desc_is_campus_local() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        // 12:00 UTC is 20:00 campus time; 135 minutes later is 22:15.
        let s = state(OutletStatus::Using, 45, 180);
        assert_eq!(s.end_time_desc(now), "2024-03-01 22:15");
        assert_eq!(state(OutletStatus::Available, 0, 0).end_time_desc(now), "");
    }

    #[test]
    fn test_note_only_for_unavailable() {
        assert_eq!(state(OutletStatus::Unavailable, 0, 0).note(), "维护中");
        assert_eq!(state(OutletStatus::Using, 45, 180).note(), "");
        assert_eq!(state(OutletStatus::Available, 0, 0).note(), "");
    }
}
