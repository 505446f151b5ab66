//! Derived-query helpers over in-memory collections.
//!
//! # Responsibility
//! - Pure read-only projections the facades compose into domain queries.
//!
//! # Invariants
//! - No I/O, no mutation, no loads triggered; input order is preserved for
//!   equal-ranked records.

use crate::model::record::DomainRecord;
use once_cell::sync::Lazy;
use regex::Regex;
use std::cmp::Reverse;

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

/// Normalizes a user-typed search query: trims, collapses whitespace runs,
/// lowercases. An all-whitespace query normalizes to the empty string.
pub fn normalize_query(query: &str) -> String {
    WHITESPACE_RE
        .replace_all(query.trim(), " ")
        .to_lowercase()
}

/// Case-insensitive substring search across caller-selected text fields.
///
/// `haystack` concatenates the searchable fields of one record. An empty
/// normalized query matches nothing.
pub fn search_text<R, F>(records: &[R], query: &str, haystack: F) -> Vec<R>
where
    R: Clone,
    F: Fn(&R) -> String,
{
    let needle = normalize_query(query);
    if needle.is_empty() {
        return Vec::new();
    }
    records
        .iter()
        .filter(|record| haystack(record).to_lowercase().contains(&needle))
        .cloned()
        .collect()
}

/// Top-N records by a numeric ranking field, highest first. Ties keep the
/// input order.
pub fn top_by_rank<R, F>(records: &[R], limit: usize, rank: F) -> Vec<R>
where
    R: Clone,
    F: Fn(&R) -> i64,
{
    let mut ranked = records.to_vec();
    ranked.sort_by_key(|record| Reverse(rank(record)));
    ranked.truncate(limit);
    ranked
}

/// N most-recently-touched records by `updated_at`, newest first.
pub fn most_recently_touched<R: DomainRecord>(records: &[R], limit: usize) -> Vec<R> {
    let mut ordered = records.to_vec();
    ordered.sort_by_key(|record| Reverse(record.updated_at()));
    ordered.truncate(limit);
    ordered
}

#[cfg(test)]
mod tests {
    use super::{most_recently_touched, normalize_query, search_text, top_by_rank};
    use crate::model::record::DomainRecord;
    use crate::model::resource::Resource;
    use chrono::{Duration, Utc};

    fn resource(name: &str, rating: i32) -> Resource {
        Resource::new("u1", name, "general", rating)
    }

    #[test]
    fn normalize_collapses_whitespace_and_lowercases() {
        assert_eq!(normalize_query("  Deep   Work \n"), "deep work");
        assert_eq!(normalize_query("   "), "");
    }

    #[test]
    fn search_is_case_insensitive() {
        let records = vec![resource("Morning Meditation", 5), resource("Jogging", 3)];
        let hits = search_text(&records, "MEDIT", |r| r.name.clone());
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Morning Meditation");
    }

    #[test]
    fn empty_query_matches_nothing() {
        let records = vec![resource("Anything", 1)];
        assert!(search_text(&records, "  ", |r| r.name.clone()).is_empty());
    }

    #[test]
    fn top_by_rank_orders_and_truncates() {
        let records = vec![resource("low", 1), resource("high", 5), resource("mid", 3)];
        let top = top_by_rank(&records, 2, |r| i64::from(r.rating));
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].name, "high");
        assert_eq!(top[1].name, "mid");
    }

    #[test]
    fn top_by_rank_keeps_input_order_on_ties() {
        let records = vec![resource("first", 4), resource("second", 4)];
        let top = top_by_rank(&records, 2, |r| i64::from(r.rating));
        assert_eq!(top[0].name, "first");
        assert_eq!(top[1].name, "second");
    }

    #[test]
    fn most_recently_touched_orders_by_updated_at() {
        let now = Utc::now();
        let mut old = resource("old", 1);
        old.stamp_updated(now - Duration::hours(2));
        let mut fresh = resource("fresh", 1);
        fresh.stamp_updated(now);

        let recent = most_recently_touched(&[old, fresh], 1);
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].name, "fresh");
    }
}
