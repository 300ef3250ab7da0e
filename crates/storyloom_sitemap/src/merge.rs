//! Merge logic over URL → last-modified maps.

use chrono::NaiveDate;
use std::collections::HashMap;

/// One `<url>` element of the output document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SitemapEntry {
    /// Page URL
    pub loc: String,
    /// Last-modified date, `YYYY-MM-DD`
    pub lastmod: String,
}

/// Canonical URL for one publication date (`YYYY-MM-DD` in, compact out).
fn date_url(base_url: &str, date: &str) -> String {
    format!("{}/date/{}", base_url, date.replace('-', ""))
}

/// The date embedded in a URL's final path segment, if it has one.
fn embedded_date(url: &str) -> Option<NaiveDate> {
    let segment = url.trim_end_matches('/').rsplit('/').next()?;
    if segment.len() != 8 || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    NaiveDate::parse_from_str(segment, "%Y%m%d").ok()
}

/// Later of two last-modified values.
///
/// Both ISO dates compare chronologically; if either side does not parse,
/// the existing document's value is kept untouched.
fn later(existing: &str, candidate: &str) -> String {
    match (
        NaiveDate::parse_from_str(existing, "%Y-%m-%d"),
        NaiveDate::parse_from_str(candidate, "%Y-%m-%d"),
    ) {
        (Ok(a), Ok(b)) if b > a => candidate.to_string(),
        (Ok(_), Ok(_)) => existing.to_string(),
        _ => existing.to_string(),
    }
}

/// Merge the existing document's entries with the store's narrative dates.
///
/// - URLs in both keep the chronologically later last-modified date.
/// - Dates only the store knows become new entries.
/// - URLs only the document knows are preserved unchanged.
/// - The homepage is always first and always stamped `today`.
///
/// Output is sorted ascending by the date embedded in the URL; URLs bearing
/// no date sort last, ordered by URL for determinism.
pub fn merge_entries(
    existing: &HashMap<String, String>,
    db_dates: &[String],
    base_url: &str,
    today: &str,
) -> Vec<SitemapEntry> {
    let homepage = format!("{}/", base_url);

    let mut merged: HashMap<String, String> = existing
        .iter()
        .filter(|(url, _)| url.as_str() != base_url && **url != homepage)
        .map(|(url, lastmod)| (url.clone(), lastmod.clone()))
        .collect();

    for date in db_dates {
        let url = date_url(base_url, date);
        match merged.get(&url) {
            Some(prior) => {
                let winner = later(prior, date);
                merged.insert(url, winner);
            }
            None => {
                merged.insert(url, date.clone());
            }
        }
    }

    let mut entries: Vec<SitemapEntry> = merged
        .into_iter()
        .map(|(loc, lastmod)| SitemapEntry { loc, lastmod })
        .collect();

    entries.sort_by(|a, b| match (embedded_date(&a.loc), embedded_date(&b.loc)) {
        (Some(da), Some(db)) => da.cmp(&db),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => a.loc.cmp(&b.loc),
    });

    entries.insert(
        0,
        SitemapEntry {
            loc: homepage,
            lastmod: today.to_string(),
        },
    );

    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://example.com";
    const TODAY: &str = "2026-08-07";

    fn existing(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(u, d)| (u.to_string(), d.to_string()))
            .collect()
    }

    #[test]
    fn test_fresh_merge_from_store_only() {
        let entries = merge_entries(
            &HashMap::new(),
            &["2026-08-06".to_string(), "2026-08-05".to_string()],
            BASE,
            TODAY,
        );
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].loc, "https://example.com/");
        assert_eq!(entries[0].lastmod, TODAY);
        assert_eq!(entries[1].loc, "https://example.com/date/20260805");
        assert_eq!(entries[2].loc, "https://example.com/date/20260806");
    }

    #[test]
    fn test_document_only_entry_preserved() {
        // The store knows nothing about this date; publication must not
        // lose it.
        let prior = existing(&[("https://example.com/date/20250101", "2025-01-01")]);
        let entries = merge_entries(&prior, &[], BASE, TODAY);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].loc, "https://example.com/date/20250101");
        assert_eq!(entries[1].lastmod, "2025-01-01");
    }

    #[test]
    fn test_later_lastmod_wins_both_directions() {
        let prior = existing(&[
            ("https://example.com/date/20260801", "2026-08-03"),
            ("https://example.com/date/20260802", "2026-08-01"),
        ]);
        let dates = vec!["2026-08-01".to_string(), "2026-08-02".to_string()];
        let entries = merge_entries(&prior, &dates, BASE, TODAY);

        let lastmod_of = |url: &str| {
            entries
                .iter()
                .find(|e| e.loc == url)
                .map(|e| e.lastmod.clone())
                .unwrap()
        };
        // Document is newer for the first URL, the store for the second.
        assert_eq!(lastmod_of("https://example.com/date/20260801"), "2026-08-03");
        assert_eq!(lastmod_of("https://example.com/date/20260802"), "2026-08-02");
    }

    #[test]
    fn test_merge_is_idempotent() {
        let prior = existing(&[("https://example.com/date/20250101", "2025-01-01")]);
        let dates = vec!["2026-08-06".to_string()];

        let once = merge_entries(&prior, &dates, BASE, TODAY);
        let as_map: HashMap<String, String> = once
            .iter()
            .map(|e| (e.loc.clone(), e.lastmod.clone()))
            .collect();
        let twice = merge_entries(&as_map, &dates, BASE, TODAY);

        assert_eq!(once, twice);
    }

    #[test]
    fn test_merge_ignores_entry_order() {
        let dates_a = vec!["2026-08-05".to_string(), "2026-08-06".to_string()];
        let dates_b = vec!["2026-08-06".to_string(), "2026-08-05".to_string()];
        assert_eq!(
            merge_entries(&HashMap::new(), &dates_a, BASE, TODAY),
            merge_entries(&HashMap::new(), &dates_b, BASE, TODAY)
        );
    }

    #[test]
    fn test_undated_urls_sort_last() {
        let prior = existing(&[
            ("https://example.com/about", "2024-01-01"),
            ("https://example.com/date/20260801", "2026-08-01"),
        ]);
        let entries = merge_entries(&prior, &[], BASE, TODAY);
        assert_eq!(entries[1].loc, "https://example.com/date/20260801");
        assert_eq!(entries[2].loc, "https://example.com/about");
    }

    #[test]
    fn test_homepage_never_duplicated() {
        let prior = existing(&[
            ("https://example.com/", "2020-01-01"),
            ("https://example.com", "2020-01-01"),
        ]);
        let entries = merge_entries(&prior, &[], BASE, TODAY);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].lastmod, TODAY);
    }
}
