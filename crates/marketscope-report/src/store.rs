//! On-disk report storage.
//!
//! Reports are written under unique timestamped names through a hidden
//! `.partial` file renamed into place, so a reader never sees a half-written
//! report.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::document::ReportDocument;
use crate::error::{ReportError, ReportResult};

/// File name prefix of every report.
pub const REPORT_PREFIX: &str = "market_study_";

const PARTIAL_SUFFIX: &str = ".partial";

/// A stored report, as listed to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportInfo {
    pub filename: String,
    pub size: u64,
    pub created: String,
    pub download_url: String,
}

/// Download route for a report file.
pub fn download_url(filename: &str) -> String {
    format!("/api/download/{}", filename)
}

/// Unique report file name: timestamp with microseconds plus a random suffix.
pub fn report_filename(now: DateTime<Local>) -> String {
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    format!(
        "{}{}_{}.{}",
        REPORT_PREFIX,
        now.format("%Y%m%d_%H%M%S_%6f"),
        &suffix[..8],
        ReportDocument::EXTENSION
    )
}

fn is_report_name(name: &str) -> bool {
    name.starts_with(REPORT_PREFIX) && name.ends_with(&format!(".{}", ReportDocument::EXTENSION))
}

/// Creation time of a file, or its modification time where the platform
/// does not record creation.
fn created_at(metadata: &fs::Metadata) -> DateTime<Local> {
    metadata
        .created()
        .or_else(|_| metadata.modified())
        .map(DateTime::from)
        .unwrap_or_else(|_| Local::now())
}

/// Directory holding generated reports.
#[derive(Debug, Clone)]
pub struct ReportStore {
    dir: PathBuf,
}

impl ReportStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write a document under a fresh name and return its final path.
    pub fn save(&self, document: &ReportDocument) -> ReportResult<PathBuf> {
        fs::create_dir_all(&self.dir).map_err(|e| ReportError::io(&self.dir, e))?;

        let filename = report_filename(Local::now());
        let path = self.dir.join(&filename);
        let partial = self.dir.join(format!(".{}{}", filename, PARTIAL_SUFFIX));

        if let Err(e) = write_file(&partial, document.as_bytes()) {
            remove_partial(&partial);
            return Err(ReportError::io(&partial, e));
        }
        if let Err(e) = fs::rename(&partial, &path) {
            remove_partial(&partial);
            return Err(ReportError::io(&path, e));
        }

        info!(path = %path.display(), bytes = document.len(), "Report saved");
        Ok(path)
    }

    /// Every stored report, newest first.
    pub fn list(&self) -> ReportResult<Vec<ReportInfo>> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(ReportError::io(&self.dir, e)),
        };

        let mut reports = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| ReportError::io(&self.dir, e))?;
            let name = entry.file_name().to_string_lossy().to_string();
            if !is_report_name(&name) {
                continue;
            }
            let metadata = match entry.metadata() {
                Ok(m) if m.is_file() => m,
                Ok(_) => continue,
                Err(e) => {
                    warn!(file = %name, error = %e, "Cannot read report metadata");
                    continue;
                }
            };
            let created = created_at(&metadata);

            let info = ReportInfo {
                download_url: download_url(&name),
                filename: name,
                size: metadata.len(),
                created: created.to_rfc3339(),
            };
            reports.push((created, info));
        }

        reports.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| b.1.filename.cmp(&a.1.filename)));
        debug!(count = reports.len(), "Listed reports");

        Ok(reports.into_iter().map(|(_, info)| info).collect())
    }

    /// Path of a stored report, refusing anything outside the store.
    pub fn resolve(&self, filename: &str) -> ReportResult<PathBuf> {
        let valid = !filename.is_empty()
            && !filename.contains(['/', '\\'])
            && !filename.contains("..")
            && !filename.starts_with('.')
            && filename.ends_with(&format!(".{}", ReportDocument::EXTENSION));
        if !valid {
            return Err(ReportError::InvalidName(filename.to_string()));
        }

        let path = self.dir.join(filename);
        if path.is_file() {
            Ok(path)
        } else {
            Err(ReportError::NotFound(filename.to_string()))
        }
    }

    /// Contents of a stored report.
    pub fn read(&self, filename: &str) -> ReportResult<Vec<u8>> {
        let path = self.resolve(filename)?;
        fs::read(&path).map_err(|e| ReportError::io(&path, e))
    }
}

fn write_file(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = fs::File::create(path)?;
    file.write_all(bytes)?;
    file.sync_all()
}

fn remove_partial(path: &Path) {
    if let Err(e) = fs::remove_file(path) {
        if e.kind() != std::io::ErrorKind::NotFound {
            warn!(path = %path.display(), error = %e, "Cannot remove partial report");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, SystemTime};

    use chrono::TimeZone;

    use super::*;

    fn document(body: &str) -> ReportDocument {
        ReportDocument::new(body.to_string())
    }

    #[test]
    fn test_filename_format() {
        let now = Local.with_ymd_and_hms(2025, 11, 5, 14, 3, 9).unwrap();
        let name = report_filename(now);
        assert!(name.starts_with("market_study_20251105_140309_000000_"));
        assert!(name.ends_with(".html"));
        let suffix = &name["market_study_20251105_140309_000000_".len()..name.len() - 5];
        assert_eq!(suffix.len(), 8);
        assert!(suffix.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(report_filename(now), report_filename(now));
    }

    #[test]
    fn test_save_and_list() {
        let dir = tempfile::tempdir().unwrap();
        let store = ReportStore::new(dir.path().join("reports"));
        assert!(store.list().unwrap().is_empty());

        let first = store.save(&document("first")).unwrap();
        std::thread::sleep(std::time::Duration::from_millis(20));
        let second = store.save(&document("second report")).unwrap();
        fs::write(dir.path().join("reports/notes.txt"), "ignored").unwrap();

        let reports = store.list().unwrap();
        assert_eq!(reports.len(), 2);
        let second_name = second.file_name().unwrap().to_string_lossy().to_string();
        assert_eq!(reports[0].filename, second_name);
        assert_eq!(reports[0].size, "second report".len() as u64);
        assert_eq!(reports[0].download_url, format!("/api/download/{}", second_name));
        assert_eq!(
            reports[1].filename,
            first.file_name().unwrap().to_string_lossy()
        );

        let leftovers = fs::read_dir(store.dir())
            .unwrap()
            .filter(|e| e.as_ref().unwrap().file_name().to_string_lossy().ends_with(".partial"))
            .count();
        assert_eq!(leftovers, 0);
    }

    #[test]
    fn test_listed_time_is_creation_time() {
        let dir = tempfile::tempdir().unwrap();
        let store = ReportStore::new(dir.path());
        let path = store.save(&document("body")).unwrap();

        let touched = SystemTime::UNIX_EPOCH + Duration::from_secs(1_000_000_000);
        fs::File::options()
            .write(true)
            .open(&path)
            .unwrap()
            .set_modified(touched)
            .unwrap();

        let metadata = fs::metadata(&path).unwrap();
        let listed = store.list().unwrap();
        assert_eq!(listed[0].created, created_at(&metadata).to_rfc3339());
        match metadata.created() {
            Ok(created) => {
                assert_eq!(listed[0].created, DateTime::<Local>::from(created).to_rfc3339());
                assert!(!listed[0].created.starts_with("2001"));
            }
            Err(_) => {
                assert_eq!(listed[0].created, DateTime::<Local>::from(touched).to_rfc3339());
            }
        }
    }

    #[test]
    fn test_resolve_rejects_unsafe_names() {
        let dir = tempfile::tempdir().unwrap();
        let store = ReportStore::new(dir.path());
        for name in ["../secret.html", "a/b.html", "..html", ".hidden.html", "report.pdf", ""] {
            assert!(
                matches!(store.resolve(name), Err(ReportError::InvalidName(_))),
                "{} accepted",
                name
            );
        }
        assert!(matches!(
            store.resolve("market_study_missing.html"),
            Err(ReportError::NotFound(_))
        ));

        let path = store.save(&document("body")).unwrap();
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert_eq!(store.read(&name).unwrap(), b"body");
    }

    #[test]
    fn test_failed_write_leaves_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not_a_dir");
        fs::write(&blocker, "file").unwrap();

        let store = ReportStore::new(&blocker);
        assert!(matches!(store.save(&document("x")), Err(ReportError::Io { .. })));
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }
}
