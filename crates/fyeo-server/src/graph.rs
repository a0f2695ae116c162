// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Per-day severity histogram for the incidents graph.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use fyeo_server_db::Incident;
use std::collections::BTreeMap;

pub const MIN_SEVERITY: u8 = 1;
pub const MAX_SEVERITY: u8 = 5;

/// Day (`YYYY-MM-DD`) to severity to count.
pub type SeverityHistogram = BTreeMap<String, BTreeMap<u8, u64>>;

/// First day of a window of `days` days ending on `today` (inclusive).
pub fn window_start_day(today: NaiveDate, days: u32) -> NaiveDate {
	today - Duration::days(i64::from(days.saturating_sub(1)))
}

/// Midnight UTC of the first day of the window.
pub fn window_start(now: DateTime<Utc>, days: u32) -> DateTime<Utc> {
	window_start_day(now.date_naive(), days)
		.and_time(NaiveTime::MIN)
		.and_utc()
}

fn empty_day() -> BTreeMap<u8, u64> {
	(MIN_SEVERITY..=MAX_SEVERITY).map(|s| (s, 0)).collect()
}

/// Counts incidents per day and severity.
///
/// Every day of the window is present with all severities zeroed. Incidents
/// outside the window, without a severity, or with a severity outside
/// `1..=5` are not counted.
pub fn severity_histogram<'a>(
	incidents: impl IntoIterator<Item = &'a Incident>,
	today: NaiveDate,
	days: u32,
) -> SeverityHistogram {
	let start = window_start_day(today, days);
	let mut histogram: SeverityHistogram = start
		.iter_days()
		.take_while(|d| *d <= today)
		.map(|d| (d.format("%Y-%m-%d").to_string(), empty_day()))
		.collect();

	for incident in incidents {
		let Some(severity) = incident.severity else {
			continue;
		};
		let day = incident.occurred_at.date_naive().format("%Y-%m-%d").to_string();
		if let Some(count) = histogram
			.get_mut(&day)
			.and_then(|counts| counts.get_mut(&severity))
		{
			*count += 1;
		}
	}

	histogram
}
