//! One-time migration of legacy `map_link` URLs to latitude/longitude fields

use super::{rewrite_collections, PassOutcome};
use crate::collection::{Collection, Record};
use crate::config::BoundingBox;
use anyhow::Result;
use regex::Regex;
use serde::Serialize;
use serde_yaml::{Mapping, Value};
use std::path::PathBuf;
use std::sync::OnceLock;

const MAP_LINK: &str = "map_link";
const LATITUDE: &str = "latitude";
const LONGITUDE: &str = "longitude";

fn query_pair() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)[?&]q=(-?\d+(?:\.\d+)?)(?:,|%2C)\s*(-?\d+(?:\.\d+)?)").unwrap()
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Pull the `q=<lat>,<lng>` pair out of a map URL, without range checks
pub fn parse_query_pair(link: &str) -> Option<Coordinates> {
    let caps = query_pair().captures(link)?;
    let latitude = caps.get(1)?.as_str().parse().ok()?;
    let longitude = caps.get(2)?.as_str().parse().ok()?;
    Some(Coordinates {
        latitude,
        longitude,
    })
}

/// Coordinates from a map URL, only if they fall inside `bbox`
pub fn extract_coordinates(link: &str, bbox: &BoundingBox) -> Option<Coordinates> {
    parse_query_pair(link).filter(|c| bbox.contains(c.latitude, c.longitude))
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case", tag = "kind")]
pub enum UnresolvedReason {
    /// `map_link` is not a string
    NotText,
    /// No `q=<lat>,<lng>` pair in the link
    NoCoordinates,
    /// The pair lies outside the bounding box
    OutOfBounds { latitude: f64, longitude: f64 },
}

impl std::fmt::Display for UnresolvedReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnresolvedReason::NotText => write!(f, "map_link is not text"),
            UnresolvedReason::NoCoordinates => write!(f, "no q=<lat>,<lng> pair"),
            UnresolvedReason::OutOfBounds {
                latitude,
                longitude,
            } => write!(f, "{}, {} is outside the bounding box", latitude, longitude),
        }
    }
}

/// What happened to one record
#[derive(Debug, Clone, PartialEq)]
pub enum RecordMigration {
    NoLink,
    Migrated(Coordinates),
    Unresolved(UnresolvedReason),
}

/// Replace `map_link` with `latitude`/`longitude` when the link yields in-box
/// coordinates. Unresolved records are left untouched.
pub fn migrate_record(fields: &mut Mapping, bbox: &BoundingBox) -> RecordMigration {
    let Some(link) = fields.get(MAP_LINK) else {
        return RecordMigration::NoLink;
    };
    let Some(link) = link.as_str() else {
        return RecordMigration::Unresolved(UnresolvedReason::NotText);
    };
    let Some(coords) = parse_query_pair(link) else {
        return RecordMigration::Unresolved(UnresolvedReason::NoCoordinates);
    };
    if !bbox.contains(coords.latitude, coords.longitude) {
        return RecordMigration::Unresolved(UnresolvedReason::OutOfBounds {
            latitude: coords.latitude,
            longitude: coords.longitude,
        });
    }

    // Rebuild so the coordinates take the link's position in the record
    for (key, value) in std::mem::take(fields) {
        match key.as_str() {
            Some(MAP_LINK) => {
                fields.insert(Value::from(LATITUDE), Value::from(coords.latitude));
                fields.insert(Value::from(LONGITUDE), Value::from(coords.longitude));
            }
            Some(LATITUDE) | Some(LONGITUDE) => {}
            _ => {
                fields.insert(key, value);
            }
        }
    }
    RecordMigration::Migrated(coords)
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MigratedRecord {
    pub collection: String,
    pub name: String,
    pub coordinates: Coordinates,
}

/// A record left for manual review
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnresolvedRecord {
    pub collection: String,
    pub name: String,
    pub map_link: Option<String>,
    pub reason: UnresolvedReason,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoordinateMigration {
    pub migrated: Vec<MigratedRecord>,
    pub unresolved: Vec<UnresolvedRecord>,
    pub files: PassOutcome,
}

/// Migrate every record of one collection. Returns true if anything changed.
pub fn migrate_collection(
    collection: &mut Collection,
    bbox: &BoundingBox,
    summary: &mut CoordinateMigration,
) -> bool {
    let collection_name = collection.name.clone();
    let mut changed = false;

    for fields in collection.records_mut() {
        let record = Record::new(fields);
        let name = record.name().unwrap_or("(unnamed)").to_string();
        let link = record.get(MAP_LINK).and_then(Value::as_str).map(str::to_string);

        match migrate_record(fields, bbox) {
            RecordMigration::NoLink => {}
            RecordMigration::Migrated(coordinates) => {
                changed = true;
                summary.migrated.push(MigratedRecord {
                    collection: collection_name.clone(),
                    name,
                    coordinates,
                });
            }
            RecordMigration::Unresolved(reason) => summary.unresolved.push(UnresolvedRecord {
                collection: collection_name.clone(),
                name,
                map_link: link,
                reason,
            }),
        }
    }

    changed
}

/// Run the migration over every collection under `dirs`
pub fn migrate_coordinates(
    dirs: &[PathBuf],
    bbox: &BoundingBox,
    dry_run: bool,
) -> Result<CoordinateMigration> {
    let mut summary = CoordinateMigration::default();
    let files = rewrite_collections(dirs, dry_run, |collection| {
        migrate_collection(collection, bbox, &mut summary)
    })?;
    summary.files = files;
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn record(yaml: &str) -> Mapping {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn test_extract_in_box() {
        let bbox = BoundingBox::default();
        assert_eq!(
            extract_coordinates("https://maps.google.com/?q=37.5,-122.3", &bbox),
            Some(Coordinates {
                latitude: 37.5,
                longitude: -122.3
            })
        );
    }

    #[test]
    fn test_extract_out_of_box() {
        let bbox = BoundingBox::default();
        assert_eq!(extract_coordinates("https://maps.google.com/?q=10,10", &bbox), None);
        assert_eq!(
            parse_query_pair("https://maps.google.com/?q=10,10"),
            Some(Coordinates {
                latitude: 10.0,
                longitude: 10.0
            })
        );
    }

    #[test]
    fn test_parse_variants() {
        assert!(
            parse_query_pair("https://maps.google.com/maps?hl=en&q=37.8,-122.27&z=14").is_some()
        );
        assert!(parse_query_pair("https://maps.google.com/?q=37.8%2C-122.27").is_some());
        assert!(parse_query_pair("https://maps.google.com/?q=37.8, -122.27").is_some());
        assert_eq!(parse_query_pair("https://maps.google.com/?q=City+Hall"), None);
        assert_eq!(parse_query_pair("https://example.org/?lq=37.8,-122.27"), None);
        assert_eq!(parse_query_pair(""), None);
    }

    #[test]
    fn test_migrate_record_moves_fields() {
        let mut fields =
            record("name: Pass\nmap_link: https://maps.google.com/?q=37.8719,-122.2585\n");
        let outcome = migrate_record(&mut fields, &BoundingBox::default());
        assert!(matches!(outcome, RecordMigration::Migrated(_)));
        assert!(fields.get("map_link").is_none());
        assert_eq!(fields.get("latitude").and_then(Value::as_f64), Some(37.8719));
        assert_eq!(fields.get("longitude").and_then(Value::as_f64), Some(-122.2585));
    }

    #[test]
    fn test_migrated_coordinates_take_link_position() {
        let mut fields = record(
            "name: Pass\nlatitude: 1.0\nmap_link: https://maps.google.com/?q=37.8,-122.2\nphone: 555-1212\n",
        );
        migrate_record(&mut fields, &BoundingBox::default());
        let keys: Vec<_> = fields.iter().filter_map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["name", "latitude", "longitude", "phone"]);
        assert_eq!(fields.get("latitude").and_then(Value::as_f64), Some(37.8));
    }

    #[test]
    fn test_migrate_record_unresolved_leaves_link() {
        let bbox = BoundingBox::default();

        let mut fields = record("name: Far\nmap_link: https://maps.google.com/?q=10,10\n");
        assert_eq!(
            migrate_record(&mut fields, &bbox),
            RecordMigration::Unresolved(UnresolvedReason::OutOfBounds {
                latitude: 10.0,
                longitude: 10.0
            })
        );
        assert!(fields.get("map_link").is_some());
        assert!(fields.get("latitude").is_none());

        let mut fields = record("name: Vague\nmap_link: https://maps.google.com/?q=Library\n");
        assert_eq!(
            migrate_record(&mut fields, &bbox),
            RecordMigration::Unresolved(UnresolvedReason::NoCoordinates)
        );

        let mut fields = record("name: Odd\nmap_link: 42\n");
        assert_eq!(
            migrate_record(&mut fields, &bbox),
            RecordMigration::Unresolved(UnresolvedReason::NotText)
        );

        let mut fields = record("name: None\n");
        assert_eq!(migrate_record(&mut fields, &bbox), RecordMigration::NoLink);
    }

    #[test]
    fn test_migrate_coordinates_writes_only_changed_files() {
        let dir = TempDir::new().unwrap();
        let campus = dir.path().join("campus.yml");
        let plain = dir.path().join("plain.yml");
        fs::write(
            &campus,
            "- name: Pass\n  map_link: https://maps.google.com/?q=37.8719,-122.2585\n- name: Far\n  map_link: https://maps.google.com/?q=10,10\n",
        )
        .unwrap();
        fs::write(&plain, "- name: Nothing\n").unwrap();
        let before_plain = fs::read_to_string(&plain).unwrap();

        let summary = migrate_coordinates(
            &[dir.path().to_path_buf()],
            &BoundingBox::default(),
            false,
        )
        .unwrap();

        assert_eq!(summary.migrated.len(), 1);
        assert_eq!(summary.unresolved.len(), 1);
        assert_eq!(summary.unresolved[0].name, "Far");
        assert_eq!(summary.files.files_changed, vec![campus.clone()]);

        let written = Collection::load(&campus).unwrap();
        let records: Vec<_> = written.records().collect();
        assert!(records[0].get("map_link").is_none());
        assert!(records[0].get("latitude").is_some());
        assert!(records[1].get("map_link").is_some());
        assert_eq!(fs::read_to_string(&plain).unwrap(), before_plain);
    }

    #[test]
    fn test_dry_run_does_not_write() {
        let dir = TempDir::new().unwrap();
        let campus = dir.path().join("campus.yml");
        let content = "- name: Pass\n  map_link: https://maps.google.com/?q=37.8719,-122.2585\n";
        fs::write(&campus, content).unwrap();

        let summary = migrate_coordinates(
            &[dir.path().to_path_buf()],
            &BoundingBox::default(),
            true,
        )
        .unwrap();
        assert_eq!(summary.migrated.len(), 1);
        assert_eq!(summary.files.files_changed.len(), 1);
        assert_eq!(fs::read_to_string(&campus).unwrap(), content);
    }
}
