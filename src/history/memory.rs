use chrono::{Duration, Local};
use std::collections::BTreeMap;

use super::{HistoryError, HistoryStore, PageEntry, RawVisit};

/// Deterministic in-memory history store. Backs the `demo` backend and the
/// test suites; behaves like a browser store over a fixed visit list.
#[derive(Debug, Default)]
pub struct MemoryStore {
    // URL -> (title, visits ascending); BTreeMap keeps search results stable
    pages: BTreeMap<String, (Option<String>, Vec<RawVisit>)>,
    next_visit_id: i64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one visit to `url` at `timestamp_ms`, keeping visits ascending
    pub fn add_visit(&mut self, url: &str, title: Option<&str>, timestamp_ms: i64) -> &mut Self {
        self.next_visit_id += 1;
        let entry = self
            .pages
            .entry(url.to_string())
            .or_insert_with(|| (title.map(str::to_string), Vec::new()));
        if entry.0.is_none() {
            entry.0 = title.map(str::to_string);
        }
        entry.1.push(RawVisit {
            visit_id: self.next_visit_id,
            timestamp: timestamp_ms,
        });
        entry.1.sort_by_key(|v| v.timestamp);
        self
    }

    /// Register a page with no visits at all
    pub fn add_page(&mut self, url: &str, title: Option<&str>) -> &mut Self {
        self.pages
            .entry(url.to_string())
            .or_insert_with(|| (title.map(str::to_string), Vec::new()));
        self
    }

    /// A small browsing week ending today, for the `demo` backend
    pub fn demo() -> Self {
        let mut store = Self::new();
        let now = Local::now();

        let sites: [(&str, &str); 5] = [
            ("https://news.ycombinator.com/", "Hacker News"),
            ("https://github.com/rust-lang/rust", "rust-lang/rust"),
            ("https://docs.rs/chrono", "chrono - Rust"),
            ("https://en.wikipedia.org/wiki/Calendar", "Calendar - Wikipedia"),
            ("https://www.example.com/shop", "Example Shop"),
        ];

        for day_back in 0..14 {
            let day = now - Duration::days(day_back);
            for (i, (url, title)) in sites.iter().enumerate() {
                // Stagger visits so every day and site looks different
                if (day_back + i as i64) % 3 == 0 {
                    let morning = day - Duration::hours(14) + Duration::minutes(7 * i as i64);
                    let evening = day - Duration::hours(3) + Duration::minutes(11 * i as i64);
                    store.add_visit(url, Some(title), morning.timestamp_millis());
                    store.add_visit(url, Some(title), evening.timestamp_millis());
                }
            }
        }

        store
    }
}

impl HistoryStore for MemoryStore {
    fn search_entries(&self, start_ms: i64, end_ms: i64) -> Result<Vec<PageEntry>, HistoryError> {
        let entries = self
            .pages
            .iter()
            .filter_map(|(url, (title, visits))| {
                let last_in_range = visits
                    .iter()
                    .filter(|v| v.timestamp >= start_ms && v.timestamp <= end_ms)
                    .map(|v| v.timestamp)
                    .max()?;
                Some(PageEntry {
                    url: url.clone(),
                    title: title.clone(),
                    last_visit_time: last_in_range,
                })
            })
            .collect();
        Ok(entries)
    }

    fn visit_timestamps(&self, url: &str) -> Result<Vec<RawVisit>, HistoryError> {
        Ok(self
            .pages
            .get(url)
            .map(|(_, visits)| visits.clone())
            .unwrap_or_default())
    }

    fn label(&self) -> &str {
        "Demo"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_reports_last_visit_in_range_only() {
        let mut store = MemoryStore::new();
        store.add_visit("https://a.com", Some("A"), 1_000);
        store.add_visit("https://a.com", Some("A"), 5_000);
        store.add_visit("https://a.com", Some("A"), 9_000);

        let entries = store.search_entries(0, 6_000).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].last_visit_time, 5_000);

        assert!(store.search_entries(10_000, 20_000).unwrap().is_empty());
    }

    #[test]
    fn visit_timestamps_are_ascending_and_complete() {
        let mut store = MemoryStore::new();
        store.add_visit("https://a.com", None, 9_000);
        store.add_visit("https://a.com", None, 1_000);

        let visits = store.visit_timestamps("https://a.com").unwrap();
        assert_eq!(visits.len(), 2);
        assert!(visits[0].timestamp < visits[1].timestamp);

        assert!(store.visit_timestamps("https://unknown.com").unwrap().is_empty());
    }

    #[test]
    fn page_without_visits_never_appears_in_search() {
        let mut store = MemoryStore::new();
        store.add_page("https://a.com", Some("A"));
        assert!(store.search_entries(0, i64::MAX).unwrap().is_empty());
    }
}
