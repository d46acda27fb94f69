//! Aggregation and rendering: global remaining-time sort, area grouping in
//! configured station order, and the HTML page the run publishes.

use chrono::{DateTime, Utc};

use crate::model::{OutletState, StationRef, campus_time};

/// Display strings for one table row. Cells beyond the identity pair stay
/// blank unless the outlet's status warrants them.
#[derive(Debug)]
pub struct ReportRow {
    pub station_name: String,
    pub outlet_name: String,
    pub used_and_total: String,
    pub remaining: String,
    pub end_time: String,
    pub note: String,
}

#[derive(Debug)]
pub struct AreaSection {
    pub area: String,
    pub rows: Vec<ReportRow>,
}

/// The grouped, ordered report. Sections follow the configured station
/// order; rows within each section follow the global remaining-time sort.
#[derive(Debug)]
pub struct Report {
    pub generated_at: String,
    pub up: bool,
    pub sections: Vec<AreaSection>,
}

pub fn build_report(
    stations: &[StationRef],
    mut states: Vec<OutletState>,
    now: DateTime<Utc>,
) -> Report {
    // Stable sort: outlets with equal remaining time keep encounter order.
    states.sort_by_key(OutletState::remaining_minutes);

    let mut areas: Vec<&str> = Vec::new();
    for station in stations {
        if !areas.contains(&station.area.as_str()) {
            areas.push(&station.area);
        }
    }

    let up = !states.is_empty();
    let sections = areas
        .into_iter()
        .map(|area| AreaSection {
            area: area.to_string(),
            rows: states
                .iter()
                .filter(|s| s.area == area)
                .map(|s| ReportRow {
                    station_name: s.station_name.clone(),
                    outlet_name: s.outlet_name.clone(),
                    used_and_total: s.used_and_total_desc(),
                    remaining: s.remaining_time_desc(),
                    end_time: s.end_time_desc(now),
                    note: s.note().to_string(),
                })
                .collect(),
        })
        .collect();

    Report {
        generated_at: campus_time(now).format("%Y-%m-%d %H:%M:%S").to_string(),
        up,
        sections,
    }
}

impl Report {
    /// Renders the grouped table as a standalone HTML page.
    pub fn to_html(&self) -> String {
        let mut html = String::new();
        html.push_str("<!DOCTYPE html>\n<html>\n<head>\n");
        html.push_str("<meta charset=\"utf-8\">\n<title>充电插座实况</title>\n");
        html.push_str("<style>table, th, td { border: 1px solid; }</style>\n");
        html.push_str("</head>\n<body>\n");
        html.push_str(&format!("<h1>更新时间：{}</h1>\n", escape(&self.generated_at)));
        html.push_str(&format!(
            "<p>status:{}</p>\n",
            if self.up { "up" } else { "down" }
        ));

        for section in &self.sections {
            html.push_str(&format!("<h3>{}</h3>\n", escape(&section.area)));
            html.push_str("<table>\n<thead>\n<tr>");
            html.push_str("<th>充电桩</th><th>插座号</th><th>充电时长</th>");
            html.push_str("<th>剩余时长</th><th>结束时间</th><th>备注</th>");
            html.push_str("</tr>\n</thead>\n<tbody>\n");
            for row in &section.rows {
                html.push_str(&format!(
                    "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
                    escape(&row.station_name),
                    escape(&row.outlet_name),
                    escape(&row.used_and_total),
                    escape(&row.remaining),
                    escape(&row.end_time),
                    escape(&row.note),
                ));
            }
            html.push_str("</tbody>\n</table>\n");
        }

        html.push_str("</body>\n</html>\n");
        html
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
