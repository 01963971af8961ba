//! Simulated-flight fixture loading (§4.8).
//!
//! Fixtures are a JSON array of [`Mission`] records read from disk at
//! startup. A missing file is not fatal — the server starts with an
//! empty fixture set and logs a warning, since `/api/simulated-flights`
//! degrading to "no flights" is preferable to refusing to start.

use std::path::Path;

use crate::mission::Mission;

/// Load the fixture set at `path`. Entries that fail `Mission`
/// validation are dropped individually with a logged warning rather
/// than failing the whole load — one bad fixture should not take down
/// every other flight in the set.
pub fn load_fixtures(path: &Path) -> Vec<Mission> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "fixture file unreadable, starting with no simulated flights");
            return Vec::new();
        }
    };

    let records: Vec<serde_json::Value> = match serde_json::from_str(&raw) {
        Ok(records) => records,
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "fixture file is not a JSON array, starting with no simulated flights");
            return Vec::new();
        }
    };

    records
        .into_iter()
        .filter_map(|record| match serde_json::from_value::<Mission>(record) {
            Ok(mission) => Some(mission),
            Err(err) => {
                tracing::warn!(error = %err, "dropping fixture that failed to parse");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_yields_empty_list() {
        let fixtures = load_fixtures(Path::new("/nonexistent/path/fixtures.json"));
        assert!(fixtures.is_empty());
    }

    #[test]
    fn malformed_json_yields_empty_list() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        let fixtures = load_fixtures(file.path());
        assert!(fixtures.is_empty());
    }

    #[test]
    fn invalid_entries_are_dropped_valid_ones_kept() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[
                {{"drone_id": "d1", "waypoints": [{{"x": 0.0, "y": 0.0, "z": 0.0}}], "start_time": 0.0, "end_time": 10.0}},
                {{"drone_id": "", "waypoints": [{{"x": 0.0, "y": 0.0, "z": 0.0}}], "start_time": 0.0, "end_time": 10.0}}
            ]"#
        )
        .unwrap();
        let fixtures = load_fixtures(file.path());
        assert_eq!(fixtures.len(), 1);
        assert_eq!(fixtures[0].drone_id, "d1");
    }
}
