//! Protocol numbers and the records kept for each submission.
//!
//! Format: `DF-YYYYMMDD-NNNNNN`, where the date is the local generation date
//! and `NNNNNN` is a zero-padded random number. Numbers are illustrative, not
//! globally unique: two submissions on the same day can collide.

use std::sync::LazyLock;

use chrono::{DateTime, Local, NaiveDate, SecondsFormat, Utc};
use rand::Rng;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::manifestation::Channel;

static PROTOCOL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^DF-\d{8}-\d{6}$").expect("valid protocol regex"));

/// Upper bound (exclusive) of the random suffix.
const SUFFIX_RANGE: u32 = 1_000_000;

/// Generate a new protocol number for today.
pub fn generate_protocol() -> String {
    let suffix = rand::rng().random_range(0..SUFFIX_RANGE);
    format_protocol(Local::now().date_naive(), suffix)
}

/// Build a protocol number from its parts. `suffix` is taken modulo 10^6.
pub fn format_protocol(date: NaiveDate, suffix: u32) -> String {
    format!("DF-{}-{:06}", date.format("%Y%m%d"), suffix % SUFFIX_RANGE)
}

/// Whether `s` has the exact `DF-YYYYMMDD-NNNNNN` shape.
pub fn is_valid_protocol(s: &str) -> bool {
    PROTOCOL_RE.is_match(s)
}

/// Lifecycle status of a recorded protocol. Only one exists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProtocolStatus {
    #[default]
    #[serde(rename = "Recebido")]
    Received,
}

impl ProtocolStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Received => "Recebido",
        }
    }
}

/// A submitted manifestation as shown in the protocols panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProtocolRecord {
    pub protocol: String,
    pub subject_label: String,
    pub suggested_agency: String,
    pub channel: Channel,
    /// ISO 8601 timestamp string.
    pub created_at: String,
    pub status: ProtocolStatus,
}

impl ProtocolRecord {
    /// Stamp a new record with the current time and status "Recebido".
    pub fn new(
        protocol: impl Into<String>,
        subject_label: impl Into<String>,
        suggested_agency: impl Into<String>,
        channel: Channel,
    ) -> Self {
        Self {
            protocol: protocol.into(),
            subject_label: subject_label.into(),
            suggested_agency: suggested_agency.into(),
            channel,
            created_at: now_iso(),
            status: ProtocolStatus::Received,
        }
    }
}

/// Current UTC time as `2026-01-31T12:00:00.000Z`.
pub fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Format an ISO timestamp as `dd/mm/yyyy HH:MM` in local time.
///
/// Unparseable input is returned unchanged.
pub fn format_date(iso: &str) -> String {
    match DateTime::parse_from_rfc3339(iso) {
        Ok(dt) => dt.with_timezone(&Local).format("%d/%m/%Y %H:%M").to_string(),
        Err(_) => iso.to_string(),
    }
}

// ── Panel filtering ──

/// Records whose subject label equals `subject_label` exactly.
///
/// An empty label or `"all"` keeps everything.
pub fn filter_by_subject<'a>(records: &'a [ProtocolRecord], subject_label: &str) -> Vec<&'a ProtocolRecord> {
    if subject_label.is_empty() || subject_label == "all" {
        return records.iter().collect();
    }
    records
        .iter()
        .filter(|r| r.subject_label == subject_label)
        .collect()
}

/// Case-insensitive search over protocol number, subject and agency.
///
/// A blank query keeps everything.
pub fn search_records<'a, I>(records: I, query: &str) -> Vec<&'a ProtocolRecord>
where
    I: IntoIterator<Item = &'a ProtocolRecord>,
{
    let query = query.trim().to_lowercase();
    records
        .into_iter()
        .filter(|r| {
            query.is_empty()
                || r.protocol.to_lowercase().contains(&query)
                || r.subject_label.to_lowercase().contains(&query)
                || r.suggested_agency.to_lowercase().contains(&query)
        })
        .collect()
}

/// Distinct subject labels in first-seen order.
pub fn unique_subjects(records: &[ProtocolRecord]) -> Vec<&str> {
    let mut seen: Vec<&str> = Vec::new();
    for r in records {
        if !seen.contains(&r.subject_label.as_str()) {
            seen.push(&r.subject_label);
        }
    }
    seen
}
