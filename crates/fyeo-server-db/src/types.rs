// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Persisted entities and the inputs used to create or change them.
//!
//! Archived rows never leave the repositories, so none of these types carry
//! an `archived` flag.

use chrono::{DateTime, Utc};
use fyeo_server_auth::{AssetId, CaseId, EventId, IncidentId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DbError;

// =============================================================================
// Enums
// =============================================================================

/// How urgently a case wants to hear about new incidents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertLevel {
	Low,
	#[default]
	Medium,
	High,
	Critical,
}

impl AlertLevel {
	pub fn as_str(&self) -> &'static str {
		match self {
			AlertLevel::Low => "low",
			AlertLevel::Medium => "medium",
			AlertLevel::High => "high",
			AlertLevel::Critical => "critical",
		}
	}
}

impl fmt::Display for AlertLevel {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for AlertLevel {
	type Err = DbError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"low" => Ok(AlertLevel::Low),
			"medium" => Ok(AlertLevel::Medium),
			"high" => Ok(AlertLevel::High),
			"critical" => Ok(AlertLevel::Critical),
			other => Err(DbError::Internal(format!("Invalid alert level: {other}"))),
		}
	}
}

/// What kind of thing an asset describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetType {
	Domain,
	Person,
	Organization,
	Brand,
	Ip,
}

impl AssetType {
	pub fn as_str(&self) -> &'static str {
		match self {
			AssetType::Domain => "domain",
			AssetType::Person => "person",
			AssetType::Organization => "organization",
			AssetType::Brand => "brand",
			AssetType::Ip => "ip",
		}
	}
}

impl fmt::Display for AssetType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for AssetType {
	type Err = DbError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"domain" => Ok(AssetType::Domain),
			"person" => Ok(AssetType::Person),
			"organization" => Ok(AssetType::Organization),
			"brand" => Ok(AssetType::Brand),
			"ip" => Ok(AssetType::Ip),
			other => Err(DbError::Internal(format!("Invalid asset type: {other}"))),
		}
	}
}

// =============================================================================
// Cases
// =============================================================================

/// A monitoring engagement owned by exactly one group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Case {
	pub id: CaseId,
	pub name: String,
	pub case_type: String,
	pub group: String,
	pub emails: Vec<String>,
	pub alert_level: AlertLevel,
	pub should_notify: bool,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewCase {
	pub name: String,
	pub case_type: String,
	pub group: String,
	#[serde(default)]
	pub emails: Vec<String>,
	#[serde(default)]
	pub alert_level: AlertLevel,
	#[serde(default)]
	pub should_notify: bool,
}

/// Partial update. `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CaseUpdate {
	pub name: Option<String>,
	pub emails: Option<Vec<String>>,
	pub alert_level: Option<AlertLevel>,
	pub should_notify: Option<bool>,
	pub group: Option<String>,
}

// =============================================================================
// Assets
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetName {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub common: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub first: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub middle: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub last: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub nick: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetWhois {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub domain: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub registrar: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub registrant: Option<String>,
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub nameservers: Vec<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub status: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub created: Option<DateTime<Utc>>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub expires: Option<DateTime<Utc>>,
}

/// Something a case monitors: a domain, a person, a brand.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Asset {
	pub id: AssetId,
	pub case_id: Option<CaseId>,
	pub asset_type: AssetType,
	pub name: AssetName,
	pub urls: Vec<String>,
	pub ips: Vec<String>,
	pub is_threat_actor: bool,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub whois: Option<AssetWhois>,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

/// An asset joined with its case name and live incident count.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssetSummary {
	#[serde(flatten)]
	pub asset: Asset,
	pub case_name: String,
	pub incident_count: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewAsset {
	pub case_id: CaseId,
	pub asset_type: AssetType,
	#[serde(default)]
	pub name: AssetName,
	#[serde(default)]
	pub urls: Vec<String>,
	#[serde(default)]
	pub ips: Vec<String>,
	#[serde(default)]
	pub is_threat_actor: bool,
	#[serde(default)]
	pub whois: Option<AssetWhois>,
}

/// Partial update. Setting `case_id` moves the asset to another case.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AssetUpdate {
	pub case_id: Option<CaseId>,
	pub name: Option<AssetName>,
	pub urls: Option<Vec<String>>,
	pub ips: Option<Vec<String>>,
	pub is_threat_actor: Option<bool>,
	pub whois: Option<AssetWhois>,
}

// =============================================================================
// Incidents
// =============================================================================

/// A finding reported against a case.
///
/// `group` is the owning case's group as it was when the incident was
/// created. It is informational only.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Incident {
	pub id: IncidentId,
	pub case_id: Option<CaseId>,
	pub asset_id: Option<AssetId>,
	pub group: Option<String>,
	pub title: String,
	pub incident_type: String,
	pub description: String,
	pub recommendations: String,
	pub source: String,
	pub severity: Option<u8>,
	pub target_ids: Vec<AssetId>,
	pub threat_actor_ids: Vec<AssetId>,
	pub event_ids: Vec<EventId>,
	pub is_active: bool,
	pub is_reported: bool,
	pub occurred_at: DateTime<Utc>,
	pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IncidentSummary {
	#[serde(flatten)]
	pub incident: Incident,
	pub case_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewIncident {
	pub case_id: CaseId,
	#[serde(default)]
	pub asset_id: Option<AssetId>,
	pub title: String,
	pub incident_type: String,
	#[serde(default)]
	pub description: String,
	#[serde(default)]
	pub recommendations: String,
	#[serde(default)]
	pub source: String,
	#[serde(default)]
	pub severity: Option<u8>,
	#[serde(default)]
	pub target_ids: Vec<AssetId>,
	#[serde(default)]
	pub threat_actor_ids: Vec<AssetId>,
	#[serde(default)]
	pub event_ids: Vec<EventId>,
	#[serde(default)]
	pub occurred_at: Option<DateTime<Utc>>,
}

// =============================================================================
// Events
// =============================================================================

/// A raw sighting (a page, a post, a dump entry) attached to a case.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Event {
	pub id: EventId,
	pub case_id: Option<CaseId>,
	pub asset_id: Option<AssetId>,
	pub incident_id: Option<IncidentId>,
	pub url: String,
	pub title: String,
	pub source_type: String,
	pub site: String,
	pub threat_level: Option<i64>,
	pub confidence_score: Option<f64>,
	pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewEvent {
	pub case_id: CaseId,
	#[serde(default)]
	pub asset_id: Option<AssetId>,
	#[serde(default)]
	pub incident_id: Option<IncidentId>,
	pub url: String,
	#[serde(default)]
	pub title: String,
	#[serde(default)]
	pub source_type: String,
	#[serde(default)]
	pub site: String,
	#[serde(default)]
	pub threat_level: Option<i64>,
	#[serde(default)]
	pub confidence_score: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventUpdate {
	pub case_id: Option<CaseId>,
	pub asset_id: Option<AssetId>,
	pub incident_id: Option<IncidentId>,
	pub title: Option<String>,
	pub threat_level: Option<i64>,
	pub confidence_score: Option<f64>,
}

// =============================================================================
// Incident types
// =============================================================================

/// Catalog entry describing a class of incident. Not group-scoped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IncidentType {
	pub id: String,
	pub class: String,
	pub description: String,
	pub severity: i64,
	pub business_impact: String,
}
