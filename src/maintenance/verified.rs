//! Bulk `verified_date` updates

use super::{rewrite_collections, PassOutcome};
use crate::collection::{Collection, Record};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

const VERIFIED_DATE: &str = "verified_date";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a `YYYY-MM-DD` date
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
        .with_context(|| format!("Invalid date '{}' (expected YYYY-MM-DD)", s))
}

/// Today's local date
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ResultEntry {
    Id(String),
    Detailed {
        id: String,
        #[serde(default)]
        verified_date: Option<String>,
    },
}

/// Identifiers confirmed by an external verification run, with optional
/// per-record dates
#[derive(Debug, Clone, Default)]
pub struct VerificationList {
    dates: HashMap<String, Option<NaiveDate>>,
    order: Vec<String>,
}

impl VerificationList {
    /// Load a YAML or JSON list of identifiers or `{id, verified_date}` entries
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read verification results: {}", path.display()))?;
        Self::parse(&content)
            .with_context(|| format!("Invalid verification results: {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        let entries: Vec<ResultEntry> = serde_yaml::from_str(content)?;
        let mut list = Self::default();
        for entry in entries {
            let (id, date) = match entry {
                ResultEntry::Id(id) => (id, None),
                ResultEntry::Detailed { id, verified_date } => {
                    let date = verified_date.as_deref().map(parse_date).transpose()?;
                    (id, date)
                }
            };
            list.insert(id, date);
        }
        Ok(list)
    }

    pub fn insert(&mut self, id: String, date: Option<NaiveDate>) {
        if !self.dates.contains_key(&id) {
            self.order.push(id.clone());
        }
        self.dates.insert(id, date);
    }

    /// None if the identifier is not listed; Some(None) if listed without a date
    fn lookup(&self, id: &str) -> Option<Option<NaiveDate>> {
        self.dates.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StampedRecord {
    pub collection: String,
    pub name: String,
    pub verified_date: String,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StampSummary {
    /// Records whose `verified_date` was added or changed
    pub stamped: Vec<StampedRecord>,
    /// Records that already carried the target date
    pub already_current: usize,
    /// Listed identifiers that matched no record
    pub unmatched: Vec<String>,
    pub files: PassOutcome,
}

/// Stamp the records of one collection. Without a list, every record is stamped.
/// Returns true if any record changed.
pub fn stamp_collection(
    collection: &mut Collection,
    date: NaiveDate,
    list: Option<&VerificationList>,
    matched: &mut HashSet<String>,
    summary: &mut StampSummary,
) -> bool {
    let collection_name = collection.name.clone();
    let mut changed = false;

    for fields in collection.records_mut() {
        let record = Record::new(fields);
        let name = record.name().unwrap_or("Unknown").to_string();

        let target = match list {
            None => date,
            Some(list) => {
                let Some(id) = record.identifier() else {
                    continue;
                };
                let Some(listed) = list.lookup(id) else {
                    continue;
                };
                matched.insert(id.to_string());
                listed.unwrap_or(date)
            }
        };

        let formatted = target.format(DATE_FORMAT).to_string();
        if record.get(VERIFIED_DATE).and_then(Value::as_str) == Some(formatted.as_str()) {
            summary.already_current += 1;
            continue;
        }

        fields.insert(Value::from(VERIFIED_DATE), Value::from(formatted.clone()));
        changed = true;
        summary.stamped.push(StampedRecord {
            collection: collection_name.clone(),
            name,
            verified_date: formatted,
        });
    }

    changed
}

/// Stamp `verified_date` across every collection under `dirs`
pub fn stamp_verified(
    dirs: &[PathBuf],
    date: NaiveDate,
    list: Option<&VerificationList>,
    dry_run: bool,
) -> Result<StampSummary> {
    let mut summary = StampSummary::default();
    let mut matched = HashSet::new();

    let files = rewrite_collections(dirs, dry_run, |collection| {
        stamp_collection(collection, date, list, &mut matched, &mut summary)
    })?;
    summary.files = files;

    if let Some(list) = list {
        summary.unmatched = list
            .order
            .iter()
            .filter(|id| !matched.contains(*id))
            .cloned()
            .collect();
    }
    Ok(summary)
}
