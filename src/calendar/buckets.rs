use chrono::{Duration, NaiveDate};
use serde::Serialize;

use super::range::day_of_timestamp;

/// One browsing visit, normalized for display. Immutable once produced by
/// aggregation; a single page may yield many records in repeated-visits mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VisitRecord {
    pub url: String,
    pub title: Option<String>,
    /// Milliseconds since the Unix epoch
    pub last_visit_time: i64,
    /// Opaque visit identifier from the history store
    pub id: String,
}

/// The visit records attributed to one calendar day
#[derive(Debug, Clone, Serialize)]
pub struct DayBucket {
    pub day: NaiveDate,
    pub records: Vec<VisitRecord>,
}

/// An ordered run of day buckets covering a contiguous date range.
/// Keys are consecutive calendar days with no duplicates or gaps.
#[derive(Debug, Clone, Serialize)]
pub struct BucketSet {
    buckets: Vec<DayBucket>,
}

impl BucketSet {
    /// `count` empty buckets keyed by consecutive days starting at `first_day`
    pub fn empty(first_day: NaiveDate, count: usize) -> Self {
        let buckets = (0..count)
            .map(|i| DayBucket {
                day: first_day + Duration::days(i as i64),
                records: Vec::new(),
            })
            .collect();
        Self { buckets }
    }

    /// Insert a record into the bucket for its local calendar day.
    /// Records whose day has no bucket are silently dropped (expected for
    /// raw visits just outside the padding window). Returns whether the
    /// record was placed.
    pub fn assign(&mut self, record: VisitRecord) -> bool {
        let Some(day) = day_of_timestamp(record.last_visit_time) else {
            return false;
        };
        match self.bucket_for_day_mut(day) {
            Some(bucket) => {
                bucket.records.push(record);
                true
            }
            None => false,
        }
    }

    /// Sort every bucket's records descending by visit time. Idempotent.
    pub fn finalize(&mut self) {
        for bucket in &mut self.buckets {
            bucket
                .records
                .sort_by(|a, b| b.last_visit_time.cmp(&a.last_visit_time));
        }
    }

    pub fn buckets(&self) -> &[DayBucket] {
        &self.buckets
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Total records across all buckets
    pub fn total_records(&self) -> usize {
        self.buckets.iter().map(|b| b.records.len()).sum()
    }

    /// Buckets are consecutive days, so the day maps directly to an index
    fn bucket_for_day_mut(&mut self, day: NaiveDate) -> Option<&mut DayBucket> {
        let first = self.buckets.first()?.day;
        let offset = (day - first).num_days();
        if offset < 0 {
            return None;
        }
        self.buckets.get_mut(offset as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::day_start_ms;

    fn record(url: &str, ts: i64) -> VisitRecord {
        VisitRecord {
            url: url.to_string(),
            title: None,
            last_visit_time: ts,
            id: format!("v-{}", ts),
        }
    }

    #[test]
    fn empty_set_has_consecutive_days() {
        let first = NaiveDate::from_ymd_opt(2026, 8, 2).unwrap();
        let set = BucketSet::empty(first, 7);
        assert_eq!(set.len(), 7);
        for (i, bucket) in set.buckets().iter().enumerate() {
            assert_eq!(bucket.day, first + Duration::days(i as i64));
            assert!(bucket.records.is_empty());
        }
    }

    #[test]
    fn zero_count_yields_empty_set() {
        let first = NaiveDate::from_ymd_opt(2026, 8, 2).unwrap();
        let set = BucketSet::empty(first, 0);
        assert!(set.is_empty());
        assert_eq!(set.total_records(), 0);
    }

    #[test]
    fn assign_places_record_by_local_day() {
        let first = NaiveDate::from_ymd_opt(2026, 8, 2).unwrap();
        let mut set = BucketSet::empty(first, 7);

        let wednesday = NaiveDate::from_ymd_opt(2026, 8, 5).unwrap();
        assert!(set.assign(record("https://a.com", day_start_ms(wednesday) + 1000)));
        assert_eq!(set.buckets()[3].records.len(), 1);
        assert_eq!(set.total_records(), 1);
    }

    #[test]
    fn assign_drops_out_of_range_records() {
        let first = NaiveDate::from_ymd_opt(2026, 8, 2).unwrap();
        let mut set = BucketSet::empty(first, 7);

        let before = day_start_ms(first) - 1;
        let after = day_start_ms(first + Duration::days(7));
        assert!(!set.assign(record("https://a.com", before)));
        assert!(!set.assign(record("https://a.com", after)));
        assert_eq!(set.total_records(), 0);
    }

    #[test]
    fn adjacent_midnight_visits_never_share_a_bucket() {
        let first = NaiveDate::from_ymd_opt(2026, 8, 2).unwrap();
        let mut set = BucketSet::empty(first, 7);

        let monday = NaiveDate::from_ymd_opt(2026, 8, 3).unwrap();
        let midnight = day_start_ms(monday);
        set.assign(record("https://late.com", midnight - 60_000)); // 23:59 Sunday
        set.assign(record("https://early.com", midnight + 60_000)); // 00:01 Monday
        assert_eq!(set.buckets()[0].records.len(), 1);
        assert_eq!(set.buckets()[1].records.len(), 1);
    }

    #[test]
    fn finalize_sorts_descending_and_is_idempotent() {
        let first = NaiveDate::from_ymd_opt(2026, 8, 2).unwrap();
        let mut set = BucketSet::empty(first, 1);
        let base = day_start_ms(first);
        set.assign(record("https://a.com", base + 10));
        set.assign(record("https://b.com", base + 30));
        set.assign(record("https://c.com", base + 20));

        set.finalize();
        let once: Vec<i64> = set.buckets()[0]
            .records
            .iter()
            .map(|r| r.last_visit_time)
            .collect();
        assert_eq!(once, vec![base + 30, base + 20, base + 10]);

        set.finalize();
        let twice: Vec<i64> = set.buckets()[0]
            .records
            .iter()
            .map(|r| r.last_visit_time)
            .collect();
        assert_eq!(once, twice);
    }
}
