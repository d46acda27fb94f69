//! Pure classifier for one outlet's rendered status page.
//!
//! A page for an actively charging outlet carries a pair of `.state_item`
//! blocks, one per metric group:
//!
//! ```html
//! <div>
//!   <div class="state_item"><p>320W</p><span>当前功率</span></div>
//!   <div class="state_item">
//!     <p>45分钟</p><span>已充</span><span>/</span><span>10</span>
//!   </div>
//! </div>
//! ```
//!
//! Idle pages render no `.state_item` at all, and pages for sockets the
//! campus has pulled out of service carry a maintenance banner instead.
//! Markup drift breaks only this module; fallbacks below keep the numbers
//! from ever turning into errors.

use scraper::{ElementRef, Html, Selector};

use crate::model::{OutletRef, OutletState, OutletStatus};

/// Banner text the portal renders while a socket is locked out.
pub const MAINTENANCE_MARKER: &str = "设备维护中";

/// Listing status flag for sockets the portal has disabled.
pub const STATUS_FLAG_DISABLED: i64 = 9;

/// One raw duration unit on the page equals this many minutes. The portal
/// has shipped markup where a unit meant half an hour; keep this revisable.
pub const MINUTES_PER_DURATION_UNIT: u32 = 60;

/// Substituted total when the page carries no readable duration, so the
/// remaining-time math never sees a zero total.
pub const DEFAULT_TOTAL_MINUTES: u32 = 600;

/// Classifies one outlet from its detail-page body and listing status flag.
///
/// The maintenance check runs first and short-circuits: a locked-out page
/// is Unavailable even if it still renders a `.state_item` block.
pub fn classify(outlet: &OutletRef, body: &str) -> OutletState {
    let unavailable =
        outlet.status_flag == STATUS_FLAG_DISABLED || body.contains(MAINTENANCE_MARKER);

    let (status, power_watts, used_minutes, total_minutes) = if unavailable {
        (OutletStatus::Unavailable, 0, 0, 0)
    } else if let Some(m) = extract_metrics(body) {
        (OutletStatus::Using, m.power_watts, m.used_minutes, m.total_minutes)
    } else {
        (OutletStatus::Available, 0, 0, 0)
    };

    OutletState {
        station_name: outlet.station.name.clone(),
        outlet_name: outlet.name.clone(),
        area: outlet.station.area.clone(),
        status,
        power_watts,
        used_minutes,
        total_minutes,
    }
}

struct ChargeMetrics {
    power_watts: u32,
    used_minutes: u32,
    total_minutes: u32,
}

/// Pulls the three numbers out of the `.state_item` blocks, or `None` when
/// the page renders none (the outlet is idle).
fn extract_metrics(body: &str) -> Option<ChargeMetrics> {
    let page = Html::parse_document(body);

    let any_state_item = Selector::parse(".state_item").unwrap();
    page.select(&any_state_item).next()?;

    let power_sel = Selector::parse(".state_item:nth-child(1) p").unwrap();
    let used_sel = Selector::parse(".state_item:nth-child(2) p").unwrap();
    let duration_sel = Selector::parse(".state_item:nth-child(2) span").unwrap();

    let power_watts = extract_digits(&inner_text(page.select(&power_sel).next()));
    let used_minutes = extract_digits(&inner_text(page.select(&used_sel).next()));
    // The total duration sits in the third span of the second block, as a
    // raw unit count rather than minutes.
    let duration_units = extract_digits(&inner_text(page.select(&duration_sel).nth(2)));

    let mut total_minutes = duration_units.saturating_mul(MINUTES_PER_DURATION_UNIT);
    if total_minutes == 0 {
        total_minutes = DEFAULT_TOTAL_MINUTES;
    }

    Some(ChargeMetrics {
        power_watts,
        used_minutes,
        total_minutes,
    })
}

fn inner_text(element: Option<ElementRef<'_>>) -> String {
    element.map(|e| e.text().collect()).unwrap_or_default()
}

/// Keeps only ASCII digits and parses the rest. Unit suffixes, whitespace,
/// and empty or garbled text all fall back to 0 rather than an error.
pub fn extract_digits(s: &str) -> u32 {
    let digits: String = s.chars().filter(|c| c.is_ascii_digit()).collect();
    digits.parse().unwrap_or(0)
}
