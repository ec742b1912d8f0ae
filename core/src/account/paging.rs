//! Paging parameters and paged results.
//!
//! Query values arrive as raw strings so that malformed input falls back to
//! the defaults instead of failing the request.

use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_SIZE: u64 = 20;
pub const DEFAULT_MAX_PAGE_SIZE: u64 = 100;

/// Raw `?page=&size=&sort=&dir=` query parameters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
    pub size: Option<String>,
    pub sort: Option<String>,
    pub dir: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    /// `ASC` sorts ascending; any other value sorts descending.
    fn parse(dir: &str) -> Self {
        if dir == "ASC" {
            SortDirection::Asc
        } else {
            SortDirection::Desc
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sort {
    pub field: String,
    pub direction: SortDirection,
}

/// A validated page request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    page: u64,
    size: u64,
    sort: Option<Sort>,
}

impl Default for PageRequest {
    fn default() -> Self {
        PageRequest {
            page: 0,
            size: DEFAULT_PAGE_SIZE,
            sort: None,
        }
    }
}

fn parse_number(value: Option<&str>) -> Option<f64> {
    value
        .and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

impl PageRequest {
    /// Builds a request from query parameters.
    ///
    /// `page` is at least 0. `size` defaults to 20 and is clamped to
    /// `[1, max_size]`. A `sort` without `dir` sorts ascending.
    pub fn from_query(query: &PageQuery, max_size: u64) -> Self {
        let page = parse_number(query.page.as_deref())
            .map(|p| p.max(0.0).floor() as u64)
            .unwrap_or(0);

        let size = parse_number(query.size.as_deref())
            .map(|s| (s.floor().max(1.0) as u64).min(max_size.max(1)))
            .unwrap_or(DEFAULT_PAGE_SIZE);

        let sort = query
            .sort
            .as_deref()
            .filter(|field| !field.is_empty())
            .map(|field| Sort {
                field: field.to_string(),
                direction: query
                    .dir
                    .as_deref()
                    .filter(|d| !d.is_empty())
                    .map_or(SortDirection::Asc, SortDirection::parse),
            });

        PageRequest { page, size, sort }
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn sort(&self) -> Option<&Sort> {
        self.sort.as_ref()
    }

    /// Number of elements before this page.
    pub fn skip(&self) -> u64 {
        self.page.saturating_mul(self.size)
    }
}

/// One page of results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub total_size: u64,
    pub page_number: u64,
    pub page_size: u64,
    pub total_pages: u64,
    pub elements: Vec<T>,
}

impl<T> Page<T> {
    pub fn new(total_size: u64, request: &PageRequest, elements: Vec<T>) -> Self {
        Page {
            total_size,
            page_number: request.page,
            page_size: request.size,
            total_pages: total_size.div_ceil(request.size),
            elements,
        }
    }
}
