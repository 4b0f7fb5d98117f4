//! View state and the request/apply cycle around aggregation.
//!
//! Every change to the view parameters (date, granularity, mode) starts a
//! new generation; an aggregation result is applied only if its request
//! generation is still current, so a late result from an abandoned view can
//! never overwrite newer data. The visit collection is replaced whole on
//! apply, never mutated in place.

use chrono::{Duration, Local, Months, NaiveDate};
use tracing::debug;

use crate::aggregate::{AggregationMode, VisitAggregator};
use crate::calendar::{
    format_day_header, format_month_header, format_week_header, BucketSet, Granularity,
};
use crate::filter::{filter, parse_search_input, FilteredBucketSet, SearchTerm};
use crate::history::{HistoryError, HistoryStore};

/// Snapshot of the parameters an aggregation request was issued for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewRequest {
    pub generation: u64,
    pub date: NaiveDate,
    pub granularity: Granularity,
    pub mode: AggregationMode,
}

/// UI-facing state: current date, granularity, aggregation mode, and search
/// terms, plus the most recently applied bucket set.
pub struct ViewController {
    date: NaiveDate,
    granularity: Granularity,
    mode: AggregationMode,
    terms: Vec<SearchTerm>,
    generation: u64,
    visits: Option<BucketSet>,
}

impl ViewController {
    pub fn new(date: NaiveDate, granularity: Granularity, mode: AggregationMode) -> Self {
        Self {
            date,
            granularity,
            mode,
            terms: Vec::new(),
            generation: 0,
            visits: None,
        }
    }

    pub fn today(granularity: Granularity, mode: AggregationMode) -> Self {
        Self::new(Local::now().date_naive(), granularity, mode)
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    pub fn mode(&self) -> AggregationMode {
        self.mode
    }

    pub fn terms(&self) -> &[SearchTerm] {
        &self.terms
    }

    pub fn set_date(&mut self, date: NaiveDate) {
        self.date = date;
        self.invalidate();
    }

    pub fn set_granularity(&mut self, granularity: Granularity) {
        self.granularity = granularity;
        self.invalidate();
    }

    pub fn toggle_repeated_visits(&mut self) {
        self.mode = match self.mode {
            AggregationMode::LatestPerDay => AggregationMode::EveryVisit,
            AggregationMode::EveryVisit => AggregationMode::LatestPerDay,
        };
        self.invalidate();
    }

    /// Step one day/week/month forward
    pub fn next_period(&mut self) {
        self.set_date(self.step(1));
    }

    /// Step one day/week/month back
    pub fn previous_period(&mut self) {
        self.set_date(self.step(-1));
    }

    /// Replace the search terms. Terms apply to the already-built bucket
    /// set; they never invalidate it or trigger a rebuild.
    pub fn set_search(&mut self, input: &str) {
        self.terms = parse_search_input(input);
    }

    pub fn clear_search(&mut self) {
        self.terms.clear();
    }

    /// Tag an aggregation request with the current generation
    pub fn begin_request(&self) -> ViewRequest {
        ViewRequest {
            generation: self.generation,
            date: self.date,
            granularity: self.granularity,
            mode: self.mode,
        }
    }

    /// Apply an aggregation result. Returns false (and discards the result)
    /// if the view parameters changed since the request was issued.
    pub fn apply(&mut self, request: &ViewRequest, buckets: BucketSet) -> bool {
        if request.generation != self.generation {
            debug!(
                "Discarding stale aggregation result (generation {} != {})",
                request.generation, self.generation
            );
            return false;
        }
        self.visits = Some(buckets);
        true
    }

    /// Synchronous rebuild: request, aggregate, apply
    pub fn refresh(&mut self, store: &dyn HistoryStore) -> Result<(), HistoryError> {
        let request = self.begin_request();
        let buckets = VisitAggregator::new(store).collect(
            request.date,
            request.granularity,
            request.mode,
        )?;
        self.apply(&request, buckets);
        Ok(())
    }

    /// The current bucket set, if one has been applied
    pub fn visits(&self) -> Option<&BucketSet> {
        self.visits.as_ref()
    }

    /// Run the filter over the current bucket set
    pub fn filtered(&self) -> Option<FilteredBucketSet> {
        self.visits.as_ref().map(|set| filter(set, &self.terms))
    }

    /// Header for the current view
    pub fn header(&self) -> String {
        match self.granularity {
            Granularity::Day => format_day_header(self.date),
            Granularity::Week => format_week_header(self.date),
            Granularity::Month => format_month_header(self.date),
        }
    }

    fn step(&self, direction: i64) -> NaiveDate {
        match self.granularity {
            Granularity::Day => self.date + Duration::days(direction),
            Granularity::Week => self.date + Duration::days(7 * direction),
            Granularity::Month => {
                if direction >= 0 {
                    self.date
                        .checked_add_months(Months::new(direction as u32))
                        .unwrap_or(self.date)
                } else {
                    self.date
                        .checked_sub_months(Months::new((-direction) as u32))
                        .unwrap_or(self.date)
                }
            }
        }
    }

    fn invalidate(&mut self) {
        self.generation += 1;
        self.visits = None;
    }
}
