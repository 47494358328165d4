//! Marker file naming and owner records

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::fmt;
use std::fs::File;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

const MARKER_SUFFIX: &str = ".lock";

/// Owner records are tiny; anything longer is not ours
const MAX_OWNER_RECORD_BYTES: u64 = 4096;

/// Returns the marker path guarding `resource_path`.
///
/// The suffix is appended to the whole file name, so `settings.json`
/// becomes `settings.json.lock` rather than `settings.lock`.
pub fn marker_path_for(resource_path: &Path) -> PathBuf {
    let mut name = OsString::from(resource_path.as_os_str());
    name.push(MARKER_SUFFIX);
    PathBuf::from(name)
}

/// Who created a marker, written into it for diagnostics only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkerInfo {
    pub pid: u32,
    pub acquired_at: DateTime<Utc>,
}

impl MarkerInfo {
    pub fn current() -> Self {
        Self {
            pid: std::process::id(),
            acquired_at: Utc::now(),
        }
    }

    pub(crate) fn write_to(&self, file: &mut File) -> io::Result<()> {
        serde_json::to_writer(&mut *file, self)?;
        file.flush()
    }
}

impl fmt::Display for MarkerInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "pid {} since {}",
            self.pid,
            self.acquired_at.to_rfc3339_opts(SecondsFormat::Secs, true)
        )
    }
}

/// Reads the owner record of a marker.
///
/// Returns `None` when the marker is missing, still empty, or holds
/// content this crate did not write.
pub fn read_marker_owner(marker_path: &Path) -> Option<MarkerInfo> {
    let mut content = Vec::new();
    File::open(marker_path)
        .ok()?
        .take(MAX_OWNER_RECORD_BYTES)
        .read_to_end(&mut content)
        .ok()?;
    serde_json::from_slice(&content).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, OpenOptions};
    use tempfile::TempDir;

    #[test]
    fn test_marker_path_appends_suffix() {
        assert_eq!(
            marker_path_for(Path::new("/cfg/settings.json")),
            PathBuf::from("/cfg/settings.json.lock")
        );
        assert_eq!(
            marker_path_for(Path::new("pipeline.yml")),
            PathBuf::from("pipeline.yml.lock")
        );
        assert_eq!(marker_path_for(Path::new("noext")), PathBuf::from("noext.lock"));
    }

    #[test]
    fn test_owner_written_and_read_back() {
        let temp = TempDir::new().unwrap();
        let marker = temp.path().join("a.cfg.lock");
        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&marker)
            .unwrap();

        let info = MarkerInfo::current();
        info.write_to(&mut file).unwrap();

        let read = read_marker_owner(&marker).expect("owner should be readable");
        assert_eq!(read.pid, std::process::id());
        assert_eq!(read, info);
    }

    #[test]
    fn test_owner_unreadable_content() {
        let temp = TempDir::new().unwrap();

        let empty = temp.path().join("empty.lock");
        fs::write(&empty, "").unwrap();
        assert!(read_marker_owner(&empty).is_none());

        let foreign = temp.path().join("foreign.lock");
        fs::write(&foreign, "locked by someone else").unwrap();
        assert!(read_marker_owner(&foreign).is_none());

        assert!(read_marker_owner(&temp.path().join("missing.lock")).is_none());
    }

    #[test]
    fn test_owner_read_is_bounded() {
        let temp = TempDir::new().unwrap();

        // Valid record padded with whitespace: the bounded prefix still parses
        let padded = temp.path().join("padded.lock");
        let mut record = serde_json::to_string(&MarkerInfo::current()).unwrap();
        record.push_str(&" ".repeat(16 * 1024));
        fs::write(&padded, &record).unwrap();
        assert!(read_marker_owner(&padded).is_some());

        // Record that only completes past the limit is not read to the end
        let oversized = temp.path().join("oversized.lock");
        let mut record = " ".repeat(16 * 1024);
        record.push_str(&serde_json::to_string(&MarkerInfo::current()).unwrap());
        fs::write(&oversized, &record).unwrap();
        assert!(read_marker_owner(&oversized).is_none());
    }

    #[test]
    fn test_owner_display() {
        let info = MarkerInfo {
            pid: 4242,
            acquired_at: DateTime::parse_from_rfc3339("2026-01-16T09:30:00Z")
                .unwrap()
                .with_timezone(&Utc),
        };
        assert_eq!(info.to_string(), "pid 4242 since 2026-01-16T09:30:00Z");
    }
}
