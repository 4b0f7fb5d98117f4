use rusqlite::{params, Connection};
use std::path::PathBuf;
use tracing::{debug, warn};

use super::{open_copied, Backend, HistoryError, HistoryStore, PageEntry, RawVisit};

const CHROME_EPOCH: i64 = 11644473600; // Seconds between 1601-01-01 and 1970-01-01

/// History store for Chromium-family browsers. Reads a temp copy of the
/// profile's `History` database (`urls` + `visits` tables).
pub struct ChromiumStore {
    conn: Connection,
    temp_path: PathBuf,
    label: &'static str,
}

impl ChromiumStore {
    /// Open the history database of one Chromium-family browser
    pub fn open(backend: Backend) -> Result<Self, HistoryError> {
        let (label, relative) = match backend {
            Backend::Chrome => ("Chrome", ".config/google-chrome/Default/History"),
            Backend::Chromium => ("Chromium", ".config/chromium/Default/History"),
            Backend::Brave => (
                "Brave",
                ".config/BraveSoftware/Brave-Browser/Default/History",
            ),
            Backend::Edge => ("Edge", ".config/microsoft-edge/Default/History"),
            Backend::Vivaldi => ("Vivaldi", ".config/vivaldi/Default/History"),
            // Opera uses a flat profile layout
            Backend::Opera => ("Opera", ".config/opera/History"),
            other => {
                warn!("Backend {} is not a Chromium-family browser", other);
                return Err(HistoryError::NoStoreFound);
            }
        };

        let home = dirs::home_dir().ok_or(HistoryError::NoStoreFound)?;
        let history_path = home.join(relative);
        let (conn, temp_path) = open_copied(&history_path, label)?;

        Ok(Self {
            conn,
            temp_path,
            label,
        })
    }

    /// Chromium stores microseconds since 1601-01-01
    fn to_chromium_time(unix_ms: i64) -> i64 {
        (unix_ms + CHROME_EPOCH * 1000) * 1000
    }

    fn from_chromium_time(chromium_us: i64) -> i64 {
        chromium_us / 1000 - CHROME_EPOCH * 1000
    }
}

impl HistoryStore for ChromiumStore {
    fn search_entries(&self, start_ms: i64, end_ms: i64) -> Result<Vec<PageEntry>, HistoryError> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT u.url, u.title, MAX(v.visit_time)
             FROM urls u JOIN visits v ON v.url = u.id
             WHERE v.visit_time BETWEEN ?1 AND ?2
             GROUP BY u.id
             ORDER BY 3 DESC",
        )?;

        let rows = stmt.query_map(
            params![
                Self::to_chromium_time(start_ms),
                Self::to_chromium_time(end_ms)
            ],
            |row| {
                let url: String = row.get(0)?;
                let title: Option<String> = row.get(1)?;
                let visit_time: i64 = row.get(2)?;
                Ok(PageEntry {
                    url,
                    title: title.filter(|t| !t.is_empty()),
                    last_visit_time: Self::from_chromium_time(visit_time),
                })
            },
        )?;

        let entries: Vec<PageEntry> = rows.collect::<Result<_, _>>()?;
        debug!("{}: {} entries in range", self.label, entries.len());
        Ok(entries)
    }

    fn visit_timestamps(&self, url: &str) -> Result<Vec<RawVisit>, HistoryError> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT v.id, v.visit_time
             FROM visits v JOIN urls u ON v.url = u.id
             WHERE u.url = ?1
             ORDER BY v.visit_time ASC",
        )?;

        let rows = stmt.query_map(params![url], |row| {
            let visit_id: i64 = row.get(0)?;
            let visit_time: i64 = row.get(1)?;
            Ok(RawVisit {
                visit_id,
                timestamp: Self::from_chromium_time(visit_time),
            })
        })?;

        Ok(rows.collect::<Result<_, _>>()?)
    }

    fn label(&self) -> &str {
        self.label
    }
}

impl Drop for ChromiumStore {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.temp_path);
    }
}
