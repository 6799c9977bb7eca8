//! Mission folder conventions.
//!
//! The console owns no persistence format. It derives the mission id from
//! the mission start time and reads POI imagery dropped into the mission
//! folder by the capture pipeline.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use gcs_core::models::PoiId;

/// Timestamp-derived mission identifier, e.g. `2026-08-07_14-02-33`.
pub fn mission_id(started_at: DateTime<Utc>) -> String {
    started_at.format("%Y-%m-%d_%H-%M-%S").to_string()
}

/// Create the mission folder if it does not exist yet.
pub fn ensure_mission_dir(root: &Path, mission_id: &str) -> io::Result<PathBuf> {
    let dir = root.join(mission_id);
    fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Images captured for a POI, by convention under
/// `{root}/{mission}/POIs/{poi}/`. Read-only; a missing folder is an empty
/// gallery, not an error.
pub fn poi_images(root: &Path, mission_id: &str, poi: PoiId) -> Vec<PathBuf> {
    let dir = root.join(mission_id).join("POIs").join(poi.to_string());
    let Ok(entries) = fs::read_dir(&dir) else {
        return Vec::new();
    };
    let mut images: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            matches!(
                path.extension().and_then(|ext| ext.to_str()),
                Some("jpg") | Some("png")
            )
        })
        .collect();
    images.sort();
    images
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn mission_id_uses_the_folder_convention() {
        let started = Utc.with_ymd_and_hms(2026, 8, 7, 14, 2, 33).unwrap();
        assert_eq!(mission_id(started), "2026-08-07_14-02-33");
    }

    #[test]
    fn ensure_mission_dir_creates_and_tolerates_existing() {
        let root = tempfile::tempdir().unwrap();
        let dir = ensure_mission_dir(root.path(), "2026-08-07_14-02-33").unwrap();
        assert!(dir.is_dir());
        // Second call is a no-op, not an error.
        ensure_mission_dir(root.path(), "2026-08-07_14-02-33").unwrap();
    }

    #[test]
    fn poi_images_filters_to_imagery_and_sorts() {
        let root = tempfile::tempdir().unwrap();
        let poi_dir = root.path().join("m1").join("POIs").join("3");
        fs::create_dir_all(&poi_dir).unwrap();
        fs::write(poi_dir.join("b.png"), b"png").unwrap();
        fs::write(poi_dir.join("a.jpg"), b"jpg").unwrap();
        fs::write(poi_dir.join("notes.txt"), b"text").unwrap();

        let images = poi_images(root.path(), "m1", 3);
        let names: Vec<_> = images
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap())
            .collect();
        assert_eq!(names, vec!["a.jpg", "b.png"]);
    }

    #[test]
    fn poi_images_on_a_missing_folder_is_empty() {
        let root = tempfile::tempdir().unwrap();
        assert!(poi_images(root.path(), "nope", 1).is_empty());
    }
}
