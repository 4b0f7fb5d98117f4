//! Search filtering over a bucketed visit collection.
//!
//! A pure, synchronous pass: partition the terms, evaluate every record
//! against exclude, then include, then site groups, and return a new
//! collection of the same bucket shape with per-record match annotations.

mod terms;

pub use terms::{parse_search_input, partition, SearchTerm, TermColor, TermPartition};

use chrono::NaiveDate;
use rayon::prelude::*;
use serde::Serialize;

use crate::calendar::{BucketSet, DayBucket, VisitRecord};

/// The include terms that matched one record. Recomputed every pass,
/// never attached to the underlying bucket set.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MatchAnnotation {
    pub matched: Vec<SearchTerm>,
}

/// A surviving record plus its annotation
#[derive(Debug, Clone, Serialize)]
pub struct FilteredVisit {
    pub record: VisitRecord,
    pub matches: MatchAnnotation,
}

#[derive(Debug, Clone, Serialize)]
pub struct FilteredBucket {
    pub day: NaiveDate,
    pub visits: Vec<FilteredVisit>,
}

/// Filter output: same bucket count, keys, and order as the input,
/// containing only matching records in their original per-bucket order.
#[derive(Debug, Clone, Serialize)]
pub struct FilteredBucketSet {
    buckets: Vec<FilteredBucket>,
}

impl FilteredBucketSet {
    pub fn buckets(&self) -> &[FilteredBucket] {
        &self.buckets
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn total_visits(&self) -> usize {
        self.buckets.iter().map(|b| b.visits.len()).sum()
    }
}

/// Apply an ordered term list to a bucket set.
///
/// With no terms every record survives unannotated. Buckets are independent,
/// so the pass fans out across them; per-record evaluation is pure.
pub fn filter(set: &BucketSet, terms: &[SearchTerm]) -> FilteredBucketSet {
    let parts = partition(terms);
    let buckets = set
        .buckets()
        .par_iter()
        .map(|bucket| filter_bucket(bucket, &parts))
        .collect();
    FilteredBucketSet { buckets }
}

fn filter_bucket(bucket: &DayBucket, parts: &TermPartition<'_>) -> FilteredBucket {
    FilteredBucket {
        day: bucket.day,
        visits: bucket
            .records
            .iter()
            .filter_map(|record| evaluate(record, parts))
            .collect(),
    }
}

/// Evaluate one record: exclusion is an absolute veto, then include terms
/// must produce at least one match when present, then the hostname must end
/// with one of the site filters when present.
fn evaluate(record: &VisitRecord, parts: &TermPartition<'_>) -> Option<FilteredVisit> {
    let url = record.url.to_lowercase();
    let title = record.title.as_deref().map(str::to_lowercase);
    let contains = |needle: &str| {
        url.contains(needle) || title.as_deref().is_some_and(|t| t.contains(needle))
    };

    if parts.exclude.iter().any(|term| contains(&term.text)) {
        return None;
    }

    let matched: Vec<SearchTerm> = parts
        .include
        .iter()
        .filter(|term| contains(&term.text))
        .map(|term| (*term).clone())
        .collect();
    if !parts.include.is_empty() && matched.is_empty() {
        return None;
    }

    if !parts.site.is_empty() {
        let host = hostname(&record.url);
        if !parts.site.iter().any(|term| host.ends_with(&term.text)) {
            return None;
        }
    }

    Some(FilteredVisit {
        record: record.clone(),
        matches: MatchAnnotation { matched },
    })
}

/// Lowercased host part of a URL: scheme, userinfo, path, query, and port
/// are stripped. URLs without a scheme are treated as starting at the host.
pub fn hostname(url: &str) -> String {
    let rest = url
        .split_once("://")
        .map(|(_, rest)| rest)
        .unwrap_or(url);
    let end = rest.find(['/', '?', '#']).unwrap_or(rest.len());
    let mut host = &rest[..end];
    if let Some((_, after_userinfo)) = host.rsplit_once('@') {
        host = after_userinfo;
    }
    if let Some((bare, port)) = host.rsplit_once(':') {
        if port.chars().all(|c| c.is_ascii_digit()) {
            host = bare;
        }
    }
    host.to_lowercase()
}
