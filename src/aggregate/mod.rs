//! Visit aggregation: turns raw history entries and per-URL visit lists
//! into a calendar-bucketed `BucketSet` under one of two modes.

use chrono::NaiveDate;
use std::collections::BTreeMap;
use tracing::debug;

use crate::calendar::{day_of_timestamp, BucketSet, Granularity, PaddedRange, VisitRecord};
use crate::history::{HistoryError, HistoryStore, PageEntry, RawVisit};

/// How a page's physical visits map to records
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregationMode {
    /// At most one record per (page, day): the day's latest visit
    LatestPerDay,
    /// One record per physical visit inside the padded range
    EveryVisit,
}

impl AggregationMode {
    pub fn from_repeated(repeated_visits: bool) -> Self {
        if repeated_visits {
            AggregationMode::EveryVisit
        } else {
            AggregationMode::LatestPerDay
        }
    }
}

/// Builds bucket sets from a history store. Stateless between calls; every
/// view rebuild runs a full pass.
pub struct VisitAggregator<'a> {
    store: &'a dyn HistoryStore,
}

impl<'a> VisitAggregator<'a> {
    pub fn new(store: &'a dyn HistoryStore) -> Self {
        Self { store }
    }

    /// Aggregate all visits for the view anchored at `date`.
    ///
    /// Any store failure aborts the pass; no partial bucket set is returned.
    pub fn collect(
        &self,
        date: NaiveDate,
        granularity: Granularity,
        mode: AggregationMode,
    ) -> Result<BucketSet, HistoryError> {
        let range = PaddedRange::for_view(date, granularity);
        let mut buckets = BucketSet::empty(range.first_day, range.count);

        let entries = self.store.search_entries(range.start_ms, range.end_ms)?;
        debug!(
            "{}: aggregating {} entries into {} buckets from {}",
            self.store.label(),
            entries.len(),
            range.count,
            range.first_day
        );

        for entry in &entries {
            // The browser history API can surface entries with no URL;
            // they carry nothing to show.
            if entry.url.is_empty() {
                continue;
            }

            let visits = self.store.visit_timestamps(&entry.url)?;
            if visits.is_empty() {
                continue;
            }

            match mode {
                AggregationMode::LatestPerDay => {
                    add_latest_per_day(&mut buckets, entry, &visits)
                }
                AggregationMode::EveryVisit => {
                    add_every_visit(&mut buckets, entry, &visits, &range)
                }
            }
        }

        buckets.finalize();
        debug!("Aggregated {} records", buckets.total_records());
        Ok(buckets)
    }
}

/// Latest-visit mode: group the page's visits by local day and keep only
/// the latest timestamp of each day. Days without a bucket drop out in
/// `assign`.
fn add_latest_per_day(buckets: &mut BucketSet, entry: &PageEntry, visits: &[RawVisit]) {
    let mut latest_per_day: BTreeMap<NaiveDate, RawVisit> = BTreeMap::new();
    for visit in visits {
        let Some(day) = day_of_timestamp(visit.timestamp) else {
            continue;
        };
        latest_per_day
            .entry(day)
            .and_modify(|current| {
                if visit.timestamp > current.timestamp {
                    *current = *visit;
                }
            })
            .or_insert(*visit);
    }

    for visit in latest_per_day.into_values() {
        buckets.assign(record_for(entry, visit));
    }
}

/// Repeated-visits mode: one record per physical visit inside the range,
/// each placed by its own day.
fn add_every_visit(
    buckets: &mut BucketSet,
    entry: &PageEntry,
    visits: &[RawVisit],
    range: &PaddedRange,
) {
    for visit in visits {
        if range.contains(visit.timestamp) {
            buckets.assign(record_for(entry, *visit));
        }
    }
}

fn record_for(entry: &PageEntry, visit: RawVisit) -> VisitRecord {
    VisitRecord {
        url: entry.url.clone(),
        title: entry.title.clone(),
        last_visit_time: visit.timestamp,
        id: visit.visit_id.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::day_start_ms;
    use crate::history::MemoryStore;

    #[test]
    fn latest_mode_keeps_one_record_per_day() {
        let day = NaiveDate::from_ymd_opt(2026, 8, 5).unwrap();
        let base = day_start_ms(day);

        let mut store = MemoryStore::new();
        store.add_visit("https://a.com", Some("A"), base + 1_000);
        store.add_visit("https://a.com", Some("A"), base + 9_000);
        store.add_visit("https://a.com", Some("A"), base + 5_000);

        let buckets = VisitAggregator::new(&store)
            .collect(day, Granularity::Day, AggregationMode::LatestPerDay)
            .unwrap();

        assert_eq!(buckets.total_records(), 1);
        assert_eq!(buckets.buckets()[0].records[0].last_visit_time, base + 9_000);
    }

    #[test]
    fn every_visit_mode_emits_each_timestamp() {
        let day = NaiveDate::from_ymd_opt(2026, 8, 5).unwrap();
        let base = day_start_ms(day);

        let mut store = MemoryStore::new();
        store.add_visit("https://a.com", Some("A"), base + 1_000);
        store.add_visit("https://a.com", Some("A"), base + 9_000);

        let buckets = VisitAggregator::new(&store)
            .collect(day, Granularity::Day, AggregationMode::EveryVisit)
            .unwrap();

        assert_eq!(buckets.total_records(), 2);
    }

    #[test]
    fn entries_without_url_are_skipped() {
        let day = NaiveDate::from_ymd_opt(2026, 8, 5).unwrap();
        let base = day_start_ms(day);

        let mut store = MemoryStore::new();
        store.add_visit("", Some("ghost"), base + 1_000);

        let buckets = VisitAggregator::new(&store)
            .collect(day, Granularity::Day, AggregationMode::EveryVisit)
            .unwrap();
        assert_eq!(buckets.total_records(), 0);
    }
}
