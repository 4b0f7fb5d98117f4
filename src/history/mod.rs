//! History store backends.
//!
//! The aggregation core consumes the `HistoryStore` trait; concrete
//! implementations read the SQLite stores of locally installed browsers.
//! Live databases are locked by a running browser, so backends copy them
//! to a temp path and open the copy read-only.

mod chromium;
mod firefox;
mod memory;

pub use chromium::ChromiumStore;
pub use firefox::FirefoxStore;
pub use memory::MemoryStore;

use rusqlite::{Connection, OpenFlags};
use scopeguard::ScopeGuard;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

/// One navigation entry per distinct URL, as returned by a range search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageEntry {
    pub url: String,
    pub title: Option<String>,
    /// Most recent visit time inside the searched range, ms since epoch
    pub last_visit_time: i64,
}

/// A single physical visit to a URL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawVisit {
    pub visit_id: i64,
    /// Milliseconds since the Unix epoch
    pub timestamp: i64,
}

/// Minimal contract the aggregation core needs from a history store
pub trait HistoryStore {
    /// Entries with any visit in `[start_ms, end_ms]`, one per distinct URL
    fn search_entries(&self, start_ms: i64, end_ms: i64) -> Result<Vec<PageEntry>, HistoryError>;

    /// All physical visit timestamps ever recorded for a URL, ascending.
    /// Not range-limited; the aggregator filters to its padded range.
    fn visit_timestamps(&self, url: &str) -> Result<Vec<RawVisit>, HistoryError>;

    /// Short label for logging
    fn label(&self) -> &str;
}

/// Failures scoped to a single store open or query, never fatal
#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("no browser history database found")]
    NoStoreFound,
    #[error("history database missing at {0}")]
    StoreMissing(PathBuf),
    #[error("failed to copy history database: {0}")]
    CopyFailed(#[source] std::io::Error),
    #[error("history query failed: {0}")]
    Query(#[from] rusqlite::Error),
}

/// Selectable history backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Auto,
    Chrome,
    Chromium,
    Brave,
    Edge,
    Vivaldi,
    Opera,
    Firefox,
    Demo,
}

impl FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "auto" => Ok(Backend::Auto),
            "chrome" => Ok(Backend::Chrome),
            "chromium" => Ok(Backend::Chromium),
            "brave" => Ok(Backend::Brave),
            "edge" => Ok(Backend::Edge),
            "vivaldi" => Ok(Backend::Vivaldi),
            "opera" => Ok(Backend::Opera),
            "firefox" => Ok(Backend::Firefox),
            "demo" => Ok(Backend::Demo),
            other => Err(format!("unknown browser backend: {}", other)),
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Backend::Auto => "auto",
            Backend::Chrome => "chrome",
            Backend::Chromium => "chromium",
            Backend::Brave => "brave",
            Backend::Edge => "edge",
            Backend::Vivaldi => "vivaldi",
            Backend::Opera => "opera",
            Backend::Firefox => "firefox",
            Backend::Demo => "demo",
        };
        write!(f, "{}", name)
    }
}

/// Open the requested backend. `Auto` probes every known browser location
/// and takes the first one with a history database on disk.
pub fn open_store(backend: Backend) -> Result<Box<dyn HistoryStore>, HistoryError> {
    match backend {
        Backend::Auto => {
            for candidate in [
                Backend::Chrome,
                Backend::Chromium,
                Backend::Brave,
                Backend::Edge,
                Backend::Vivaldi,
                Backend::Opera,
                Backend::Firefox,
            ] {
                match open_store(candidate) {
                    Ok(store) => {
                        debug!("Auto-selected {} history store", store.label());
                        return Ok(store);
                    }
                    Err(e) => debug!("Skipping {} backend: {}", candidate, e),
                }
            }
            Err(HistoryError::NoStoreFound)
        }
        Backend::Firefox => Ok(Box::new(FirefoxStore::open()?)),
        Backend::Demo => Ok(Box::new(MemoryStore::demo())),
        chromium_family => Ok(Box::new(ChromiumStore::open(chromium_family)?)),
    }
}

/// Copy a live SQLite database to a temp path and open the copy read-only.
/// Returns the connection and the temp path the caller must remove when done.
pub(crate) fn open_copied(path: &Path, tag: &str) -> Result<(Connection, PathBuf), HistoryError> {
    if !path.exists() {
        return Err(HistoryError::StoreMissing(path.to_path_buf()));
    }

    let temp_path = std::env::temp_dir().join(format!("hindsight-{}-{}.db", tag, std::process::id()));
    std::fs::copy(path, &temp_path).map_err(HistoryError::CopyFailed)?;

    // Remove the copy if opening fails; on success ownership of the path
    // moves to the caller.
    let guard = scopeguard::guard(temp_path, |p| {
        let _ = std::fs::remove_file(p);
    });

    let conn = Connection::open_with_flags(&*guard, OpenFlags::SQLITE_OPEN_READ_ONLY)?;
    debug!("Opened {} history copy at {:?}", tag, *guard);
    Ok((conn, ScopeGuard::into_inner(guard)))
}
