#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use hindsight::aggregate::AggregationMode;
    use hindsight::calendar::{day_start_ms, BucketSet, Granularity};
    use hindsight::history::MemoryStore;
    use hindsight::view::ViewController;

    fn store_with_week_of_visits(anchor: NaiveDate) -> MemoryStore {
        let mut store = MemoryStore::new();
        let base = day_start_ms(anchor);
        store.add_visit("https://github.com/rust-lang/rust", Some("rust-lang"), base + 9 * 3_600_000);
        store.add_visit("https://news.ycombinator.com/", Some("Hacker News"), base + 12 * 3_600_000);
        store.add_visit("https://github.com/rust-lang/rust", Some("rust-lang"), base + 20 * 3_600_000);
        store
    }

    #[test]
    fn refresh_builds_and_filter_narrows() {
        let anchor = NaiveDate::from_ymd_opt(2026, 8, 5).unwrap();
        let store = store_with_week_of_visits(anchor);

        let mut view =
            ViewController::new(anchor, Granularity::Week, AggregationMode::LatestPerDay);
        view.refresh(&store).unwrap();

        let all = view.filtered().unwrap();
        assert_eq!(all.len(), 7);
        assert_eq!(all.total_visits(), 2); // one per page in latest mode

        view.set_search("site:github.com");
        let narrowed = view.filtered().unwrap();
        assert_eq!(narrowed.total_visits(), 1);

        view.clear_search();
        assert_eq!(view.filtered().unwrap().total_visits(), 2);
    }

    #[test]
    fn toggling_repeated_visits_rebuilds_with_every_visit() {
        let anchor = NaiveDate::from_ymd_opt(2026, 8, 5).unwrap();
        let store = store_with_week_of_visits(anchor);

        let mut view =
            ViewController::new(anchor, Granularity::Week, AggregationMode::LatestPerDay);
        view.refresh(&store).unwrap();
        assert_eq!(view.filtered().unwrap().total_visits(), 2);

        view.toggle_repeated_visits();
        assert!(view.visits().is_none(), "toggle invalidates the collection");
        view.refresh(&store).unwrap();
        assert_eq!(view.filtered().unwrap().total_visits(), 3);
    }

    #[test]
    fn stale_aggregation_results_never_overwrite_newer_views() {
        let anchor = NaiveDate::from_ymd_opt(2026, 8, 5).unwrap();
        let store = store_with_week_of_visits(anchor);

        let mut view =
            ViewController::new(anchor, Granularity::Week, AggregationMode::LatestPerDay);

        // A request is issued, then the user navigates away before it lands
        let stale = view.begin_request();
        view.next_period();
        view.refresh(&store).unwrap();
        let current_total = view.filtered().unwrap().total_visits();

        let stale_buckets = BucketSet::empty(stale.date, 7);
        assert!(!view.apply(&stale, stale_buckets));
        assert_eq!(view.filtered().unwrap().total_visits(), current_total);
    }

    #[test]
    fn demo_store_fills_a_month_view() {
        let store = MemoryStore::demo();
        let mut view = ViewController::today(Granularity::Month, AggregationMode::EveryVisit);
        view.refresh(&store).unwrap();

        let filtered = view.filtered().unwrap();
        assert_eq!(filtered.len(), 35);
        assert!(filtered.total_visits() > 0);
    }

    #[test]
    fn header_matches_current_granularity() {
        let anchor = NaiveDate::from_ymd_opt(2026, 8, 5).unwrap();
        let mut view =
            ViewController::new(anchor, Granularity::Day, AggregationMode::LatestPerDay);
        assert_eq!(view.header(), "5th August 2026");

        view.set_granularity(Granularity::Month);
        assert_eq!(view.header(), "August 2026");

        view.set_granularity(Granularity::Week);
        assert!(view.header().starts_with("Week "));
    }
}
