//! Paging parameters for collection endpoints.
//!
//! Raw `page` / `size` query values are clamped here, once, at the HTTP
//! boundary. Everything downstream (the API client included) can assume a
//! [`PageQuery`] is already valid.

use crate::Request;

pub const DEFAULT_PAGE: u32 = 0;
pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 100;

/// Missing, non-numeric or negative page indexes become `0`.
pub fn normalize_page(raw: &str) -> u32 {
    raw.parse::<i64>()
        .ok()
        .and_then(|page| u32::try_from(page).ok())
        .unwrap_or(DEFAULT_PAGE)
}

/// Missing, non-numeric or out-of-range (`< 1`, `> 100`) sizes become `20`.
pub fn normalize_size(raw: &str) -> u32 {
    raw.parse::<i64>()
        .ok()
        .filter(|size| (1..=i64::from(MAX_PAGE_SIZE)).contains(size))
        .and_then(|size| u32::try_from(size).ok())
        .unwrap_or(DEFAULT_PAGE_SIZE)
}

/// One validated page request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageQuery {
    pub page: u32,
    pub size: u32,
    pub search: Option<String>,
    pub sort: Option<String>,
}

impl PageQuery {
    /// The first page of `size` items, unfiltered and in upstream order.
    pub fn first(size: u32) -> Self {
        Self { page: DEFAULT_PAGE, size, search: None, sort: None }
    }

    pub fn sorted(mut self, sort: impl Into<String>) -> Self {
        self.sort = non_blank(sort.into());
        self
    }

    /// Reads `page`, `size`, `search` and `sort` from the request's query string.
    pub fn from_request(req: &Request) -> Self {
        Self {
            page: normalize_page(req.query("page").as_deref().unwrap_or("")),
            size: normalize_size(req.query("size").as_deref().unwrap_or("")),
            search: req.query("search").and_then(non_blank),
            sort: req.query("sort").and_then(non_blank),
        }
    }

    /// Query pairs for the upstream request. `page` and `size` are always
    /// present; `search` and `sort` only when set.
    pub(crate) fn to_pairs(&self, with_search: bool) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("page", self.page.to_string()), ("size", self.size.to_string())];
        if with_search {
            if let Some(search) = &self.search {
                pairs.push(("search", search.clone()));
            }
        }
        if let Some(sort) = &self.sort {
            pairs.push(("sort", sort.clone()));
        }
        pairs
    }
}

fn non_blank(s: String) -> Option<String> {
    if s.trim().is_empty() { None } else { Some(s) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::test_support::get;

    #[test]
    fn page_index_clamps_to_zero() {
        assert_eq!(normalize_page(""), 0);
        assert_eq!(normalize_page("-5"), 0);
        assert_eq!(normalize_page("abc"), 0);
        assert_eq!(normalize_page("1.5"), 0);
        assert_eq!(normalize_page("99999999999"), 0);
        assert_eq!(normalize_page("3"), 3);
    }

    #[test]
    fn page_size_falls_back_to_default() {
        assert_eq!(normalize_size(""), 20);
        assert_eq!(normalize_size("0"), 20);
        assert_eq!(normalize_size("500"), 20);
        assert_eq!(normalize_size("-1"), 20);
        assert_eq!(normalize_size("ten"), 20);
        assert_eq!(normalize_size("1"), 1);
        assert_eq!(normalize_size("50"), 50);
        assert_eq!(normalize_size("100"), 100);
    }

    #[test]
    fn normalisation_is_idempotent() {
        for raw in ["-5", "abc", "0", "7", "500"] {
            let page = normalize_page(raw);
            assert_eq!(normalize_page(&page.to_string()), page);
            let size = normalize_size(raw);
            assert_eq!(normalize_size(&size.to_string()), size);
        }
    }

    #[test]
    fn query_string_is_read_and_blanks_dropped() {
        let req = get("/api/alice/crates?page=2&size=500&search=%20&sort=name,asc", "ua", &[]);
        let query = PageQuery::from_request(&req);
        assert_eq!(query, PageQuery {
            page: 2,
            size: 20,
            search: None,
            sort: Some("name,asc".into()),
        });
    }

    #[test]
    fn pairs_omit_unset_filters() {
        let query = PageQuery::first(12);
        assert_eq!(query.to_pairs(true), vec![("page", "0".to_owned()), ("size", "12".to_owned())]);

        let query = PageQuery { search: Some("jazz".into()), ..PageQuery::first(3) }.sorted("createdAt,desc");
        assert_eq!(query.to_pairs(false), vec![
            ("page", "0".to_owned()),
            ("size", "3".to_owned()),
            ("sort", "createdAt,desc".to_owned()),
        ]);
        assert_eq!(query.to_pairs(true).len(), 4);
    }
}
