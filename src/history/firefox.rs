use rusqlite::{params, Connection};
use std::path::PathBuf;
use tracing::debug;

use super::{open_copied, HistoryError, HistoryStore, PageEntry, RawVisit};

/// History store for Firefox. Reads a temp copy of the default profile's
/// `places.sqlite` (`moz_places` + `moz_historyvisits`, microseconds since
/// the Unix epoch).
pub struct FirefoxStore {
    conn: Connection,
    temp_path: PathBuf,
}

impl FirefoxStore {
    /// Locate the default profile and open its places database
    pub fn open() -> Result<Self, HistoryError> {
        let places_path = Self::default_places_path().ok_or(HistoryError::NoStoreFound)?;
        let (conn, temp_path) = open_copied(&places_path, "firefox")?;
        Ok(Self { conn, temp_path })
    }

    fn default_places_path() -> Option<PathBuf> {
        let firefox_dir = dirs::home_dir()?.join(".mozilla/firefox");
        if !firefox_dir.exists() {
            debug!("Firefox directory not found");
            return None;
        }

        // Prefer the default-release profile, fall back to any ".default"
        let profile = std::fs::read_dir(&firefox_dir)
            .ok()?
            .filter_map(Result::ok)
            .find(|entry| {
                let name = entry.file_name().to_string_lossy().to_string();
                name.contains(".default-release") || name.contains(".default")
            })?;

        let places = profile.path().join("places.sqlite");
        places.exists().then_some(places)
    }
}

impl HistoryStore for FirefoxStore {
    fn search_entries(&self, start_ms: i64, end_ms: i64) -> Result<Vec<PageEntry>, HistoryError> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT p.url, p.title, MAX(h.visit_date)
             FROM moz_places p JOIN moz_historyvisits h ON h.place_id = p.id
             WHERE h.visit_date BETWEEN ?1 AND ?2
             GROUP BY p.id
             ORDER BY 3 DESC",
        )?;

        let rows = stmt.query_map(params![start_ms * 1000, end_ms * 1000], |row| {
            let url: String = row.get(0)?;
            let title: Option<String> = row.get(1)?;
            let visit_date: i64 = row.get(2)?;
            Ok(PageEntry {
                url,
                title: title.filter(|t| !t.is_empty()),
                last_visit_time: visit_date / 1000,
            })
        })?;

        let entries: Vec<PageEntry> = rows.collect::<Result<_, _>>()?;
        debug!("Firefox: {} entries in range", entries.len());
        Ok(entries)
    }

    fn visit_timestamps(&self, url: &str) -> Result<Vec<RawVisit>, HistoryError> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT h.id, h.visit_date
             FROM moz_historyvisits h JOIN moz_places p ON h.place_id = p.id
             WHERE p.url = ?1
             ORDER BY h.visit_date ASC",
        )?;

        let rows = stmt.query_map(params![url], |row| {
            let visit_id: i64 = row.get(0)?;
            let visit_date: i64 = row.get(1)?;
            Ok(RawVisit {
                visit_id,
                timestamp: visit_date / 1000,
            })
        })?;

        Ok(rows.collect::<Result<_, _>>()?)
    }

    fn label(&self) -> &str {
        "Firefox"
    }
}

impl Drop for FirefoxStore {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.temp_path);
    }
}
