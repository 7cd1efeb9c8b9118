// Catalog tests: listing, lookup, search and stats over collected pages.

use chrono::{DateTime, Duration, TimeZone, Utc};
use whatis::catalog::{
    Catalog, PageRequest, SearchError, SortField, SortOrder, MAX_LIST_LIMIT, MAX_SEARCH_LIMIT,
};
use whatis::pipeline::collect::BlogRecord;

fn day(n: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::days(n)
}

fn record(title: &str, content: &str, created: i64) -> BlogRecord {
    BlogRecord {
        title: title.to_string(),
        content: content.to_string(),
        created_at: day(created),
    }
}

fn sample() -> Catalog {
    Catalog::new(vec![
        record("What is Recursion", "<p>A function calling itself.</p>", 3),
        record("What is Big O Notation", "<p>Growth rates.</p>", 1),
        record("What is Rust", "<p>A systems language with RECURSION-free loops.</p>", 5),
        record("What is TCPIP", "<p>Networking.</p>", 2),
        record("What is Docker", "<p>Containers.</p>", 4),
        record("What is Git", "<p>Version control.</p>", 6),
    ])
}

fn titles<'a>(items: &[&'a BlogRecord]) -> Vec<&'a str> {
    items.iter().map(|r| r.title.as_str()).collect()
}

fn page(page: usize, limit: usize) -> PageRequest {
    PageRequest { page, limit }
}

// ============================================================
// Listing
// ============================================================

#[test]
fn default_listing_is_newest_first() {
    let catalog = sample();
    let request = PageRequest::parse(None, None, MAX_LIST_LIMIT);

    let result = catalog.list(SortField::parse(None), SortOrder::parse(None), request);

    assert_eq!(result.total_blogs, 6);
    assert_eq!(result.items[0].title, "What is Git");
    assert_eq!(result.items[5].title, "What is Big O Notation");
}

#[test]
fn title_ascending_listing() {
    let catalog = sample();
    let result = catalog.list(SortField::Title, SortOrder::Asc, page(1, 3));

    assert_eq!(
        titles(&result.items),
        vec!["What is Big O Notation", "What is Docker", "What is Git"]
    );
}

#[test]
fn pagination_reports_neighbours() {
    let catalog = sample();

    let first = catalog.list(SortField::Title, SortOrder::Asc, page(1, 4));
    assert_eq!(first.items.len(), 4);
    assert_eq!(first.total_pages, 2);
    assert!(first.has_next_page);
    assert!(!first.has_prev_page);

    let second = catalog.list(SortField::Title, SortOrder::Asc, page(2, 4));
    assert_eq!(titles(&second.items), vec!["What is Rust", "What is TCPIP"]);
    assert!(!second.has_next_page);
    assert!(second.has_prev_page);

    let beyond = catalog.list(SortField::Title, SortOrder::Asc, page(9, 4));
    assert!(beyond.items.is_empty());
    assert_eq!(beyond.current_page, 9);
}

#[test]
fn oversized_limit_is_capped() {
    let request = PageRequest::parse(Some("1"), Some("1000"), MAX_LIST_LIMIT);
    assert_eq!(request.limit, 100);

    let request = PageRequest::parse(Some("1"), Some("1000"), MAX_SEARCH_LIMIT);
    assert_eq!(request.limit, 50);
}

#[test]
fn empty_catalog_lists_nothing() {
    let catalog = Catalog::default();
    let result = catalog.list(SortField::CreatedAt, SortOrder::Desc, page(1, 10));
    assert!(result.items.is_empty());
    assert_eq!(result.total_pages, 0);
    assert!(!result.has_next_page);
}

// ============================================================
// Lookup and search
// ============================================================

#[test]
fn find_by_title_is_exact() {
    let catalog = sample();
    assert!(catalog.find_by_title("What is Rust").is_some());
    assert!(catalog.find_by_title("what is rust").is_none());
    assert!(catalog.find_by_title("Rust").is_none());
}

#[test]
fn search_matches_title_or_content_ignoring_case() {
    let catalog = sample();
    let result = catalog.search("recursion", page(1, 10)).unwrap();

    // Rust mentions it in the body and is newer, so it comes first.
    assert_eq!(titles(&result.items), vec!["What is Rust", "What is Recursion"]);
    assert_eq!(result.total_blogs, 2);
}

#[test]
fn search_query_is_trimmed_and_needs_two_chars() {
    let catalog = sample();
    assert_eq!(
        catalog.search(" g ", page(1, 10)).unwrap_err(),
        SearchError::QueryTooShort
    );
    assert_eq!(catalog.search("", page(1, 10)).unwrap_err(), SearchError::QueryTooShort);

    let result = catalog.search("  git  ", page(1, 10)).unwrap();
    assert_eq!(titles(&result.items), vec!["What is Git"]);
}

#[test]
fn search_without_matches_is_empty_not_an_error() {
    let catalog = sample();
    let result = catalog.search("kubernetes", page(1, 10)).unwrap();
    assert!(result.items.is_empty());
    assert_eq!(result.total_blogs, 0);
}

// ============================================================
// Stats and titles
// ============================================================

#[test]
fn stats_summarise_lengths_and_dates() {
    let catalog = Catalog::new(vec![
        record("A", "aaaa", 1),
        record("B", "bb", 2),
        record("C", "ccccccc", 3),
    ]);

    let stats = catalog.stats();

    assert_eq!(stats.total_blogs, 3);
    // (4 + 2 + 7) / 3 = 4.33
    assert_eq!(stats.content_stats.average_length, 4);
    assert_eq!(stats.content_stats.minimum_length, 2);
    assert_eq!(stats.content_stats.maximum_length, 7);

    let recent: Vec<&str> = stats.recent_blogs.iter().map(|t| t.title.as_str()).collect();
    assert_eq!(recent, vec!["C", "B", "A"]);
    let oldest: Vec<&str> = stats.oldest_blogs.iter().map(|t| t.title.as_str()).collect();
    assert_eq!(oldest, vec!["A", "B", "C"]);
}

#[test]
fn stats_cap_recent_and_oldest() {
    let stats = sample().stats();
    assert_eq!(stats.recent_blogs.len(), 5);
    assert_eq!(stats.oldest_blogs.len(), 3);
    assert_eq!(stats.recent_blogs[0].title, "What is Git");
    assert_eq!(stats.oldest_blogs[0].title, "What is Big O Notation");
}

#[test]
fn stats_on_empty_catalog_are_zero() {
    let stats = Catalog::default().stats();
    assert_eq!(stats.total_blogs, 0);
    assert_eq!(stats.content_stats.average_length, 0);
    assert!(stats.recent_blogs.is_empty());
}

#[test]
fn titles_are_alphabetical() {
    let all = sample().titles();
    let names: Vec<&str> = all.iter().map(|t| t.title.as_str()).collect();
    let mut sorted = names.clone();
    sorted.sort();
    assert_eq!(names, sorted);
    assert_eq!(all.len(), 6);
}
