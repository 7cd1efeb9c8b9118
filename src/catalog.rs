// In-memory catalog of collected pages: listing, lookup, search, stats.
//
// Backs the read-only blog API. Everything here is pure so it can be tested
// without a server; the web handlers only parse queries and shape JSON.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::pipeline::collect::BlogRecord;

/// Default page size when `limit` is absent or zero.
pub const DEFAULT_LIMIT: usize = 10;
/// Largest page size for the main listing.
pub const MAX_LIST_LIMIT: usize = 100;
/// Largest page size for search results.
pub const MAX_SEARCH_LIMIT: usize = 50;
/// Shortest accepted search query, in characters after trimming.
pub const MIN_SEARCH_CHARS: usize = 2;

/// Field the listing is ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Title,
    CreatedAt,
}

impl SortField {
    /// Parse a `sortBy` value. Unknown or missing values fall back to `CreatedAt`.
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some("title") => SortField::Title,
            _ => SortField::CreatedAt,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    /// Parse a `sortOrder` value. Anything but "asc" is descending.
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some("asc") => SortOrder::Asc,
            _ => SortOrder::Desc,
        }
    }
}

/// A clamped page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// 1-based page number.
    pub page: usize,
    pub limit: usize,
}

impl PageRequest {
    /// Build from raw query values.
    ///
    /// Missing, unparsable or zero values take the defaults (page 1,
    /// [`DEFAULT_LIMIT`]); the page is at least 1 and the limit is clamped
    /// to `1..=max_limit`.
    pub fn parse(page: Option<&str>, limit: Option<&str>, max_limit: usize) -> Self {
        let parse = |raw: Option<&str>| {
            raw.and_then(|s| s.trim().parse::<i64>().ok())
                .filter(|n| *n != 0)
        };
        let page = parse(page).unwrap_or(1).max(1) as usize;
        let limit = parse(limit)
            .unwrap_or(DEFAULT_LIMIT as i64)
            .clamp(1, max_limit.max(1) as i64) as usize;
        Self { page, limit }
    }

    fn offset(&self) -> usize {
        (self.page - 1).saturating_mul(self.limit)
    }
}

/// One page of results plus the numbers a client needs to paginate.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<'a> {
    pub items: Vec<&'a BlogRecord>,
    pub current_page: usize,
    pub total_pages: usize,
    pub total_blogs: usize,
    pub blogs_per_page: usize,
    pub has_next_page: bool,
    pub has_prev_page: bool,
}

impl<'a> Page<'a> {
    fn slice(sorted: Vec<&'a BlogRecord>, request: PageRequest) -> Self {
        let total = sorted.len();
        let total_pages = total.div_ceil(request.limit);
        let items = sorted
            .into_iter()
            .skip(request.offset())
            .take(request.limit)
            .collect();
        Self {
            items,
            current_page: request.page,
            total_pages,
            total_blogs: total,
            blogs_per_page: request.limit,
            has_next_page: request.page < total_pages,
            has_prev_page: request.page > 1,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SearchError {
    #[error("Search query must be at least 2 characters long")]
    QueryTooShort,
}

/// Title and date only, for compact listings.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TitleEntry {
    pub title: String,
    pub created_at: DateTime<Utc>,
}

impl From<&BlogRecord> for TitleEntry {
    fn from(record: &BlogRecord) -> Self {
        Self {
            title: record.title.clone(),
            created_at: record.created_at,
        }
    }
}

/// Content length summary, in characters.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentStats {
    pub average_length: usize,
    pub minimum_length: usize,
    pub maximum_length: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogStats {
    pub total_blogs: usize,
    pub content_stats: ContentStats,
    /// Five newest pages.
    pub recent_blogs: Vec<TitleEntry>,
    /// Three oldest pages.
    pub oldest_blogs: Vec<TitleEntry>,
}

/// Read-only set of pages loaded at startup.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    records: Vec<BlogRecord>,
}

impl Catalog {
    pub fn new(records: Vec<BlogRecord>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All pages sorted by `field` in `order`, then paginated.
    pub fn list(&self, field: SortField, order: SortOrder, request: PageRequest) -> Page<'_> {
        let mut sorted: Vec<&BlogRecord> = self.records.iter().collect();
        sorted.sort_by(|a, b| {
            let ord = compare(a, b, field);
            match order {
                SortOrder::Asc => ord,
                SortOrder::Desc => ord.reverse(),
            }
        });
        Page::slice(sorted, request)
    }

    /// Exact title match.
    pub fn find_by_title(&self, title: &str) -> Option<&BlogRecord> {
        self.records.iter().find(|r| r.title == title)
    }

    /// Case-insensitive substring match on title or content, newest first.
    pub fn search(&self, query: &str, request: PageRequest) -> Result<Page<'_>, SearchError> {
        let query = query.trim();
        if query.chars().count() < MIN_SEARCH_CHARS {
            return Err(SearchError::QueryTooShort);
        }

        let needle = query.to_lowercase();
        let mut matches: Vec<&BlogRecord> = self
            .records
            .iter()
            .filter(|r| {
                r.title.to_lowercase().contains(&needle)
                    || r.content.to_lowercase().contains(&needle)
            })
            .collect();
        matches.sort_by(|a, b| compare(b, a, SortField::CreatedAt));
        Ok(Page::slice(matches, request))
    }

    /// Every title, alphabetically.
    pub fn titles(&self) -> Vec<TitleEntry> {
        let mut titles: Vec<TitleEntry> = self.records.iter().map(TitleEntry::from).collect();
        titles.sort_by(|a, b| a.title.cmp(&b.title));
        titles
    }

    pub fn stats(&self) -> CatalogStats {
        let lengths: Vec<usize> = self.records.iter().map(|r| r.content.chars().count()).collect();
        let content_stats = ContentStats {
            average_length: if lengths.is_empty() {
                0
            } else {
                (lengths.iter().sum::<usize>() as f64 / lengths.len() as f64).round() as usize
            },
            minimum_length: lengths.iter().copied().min().unwrap_or(0),
            maximum_length: lengths.iter().copied().max().unwrap_or(0),
        };

        let mut by_date: Vec<&BlogRecord> = self.records.iter().collect();
        by_date.sort_by(|a, b| compare(a, b, SortField::CreatedAt));

        CatalogStats {
            total_blogs: self.records.len(),
            content_stats,
            recent_blogs: by_date.iter().rev().take(5).map(|r| TitleEntry::from(*r)).collect(),
            oldest_blogs: by_date.iter().take(3).map(|r| TitleEntry::from(*r)).collect(),
        }
    }
}

/// Ascending comparison on `field`, with title as the tie-breaker so
/// results are stable when many pages share a timestamp.
fn compare(a: &BlogRecord, b: &BlogRecord, field: SortField) -> Ordering {
    match field {
        SortField::Title => a.title.cmp(&b.title),
        SortField::CreatedAt => a
            .created_at
            .cmp(&b.created_at)
            .then_with(|| a.title.cmp(&b.title)),
    }
}
