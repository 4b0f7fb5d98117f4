//! Calendar bucketing: day-keyed buckets of visit records and the
//! padded date ranges backing the day/week/month views.

mod buckets;
mod headers;
mod range;

pub use buckets::{BucketSet, DayBucket, VisitRecord};
pub use headers::{format_day_header, format_day_label, format_month_header, format_week_header};
pub use range::{day_of_timestamp, day_start_ms, sunday_on_or_before, Granularity, PaddedRange};
