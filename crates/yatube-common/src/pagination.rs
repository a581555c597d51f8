//! Page-number pagination shared by every feed.
//!
//! [`Paginator`] owns the window arithmetic (page count, clamping, offsets).
//! The in-memory [`compose_feed`] and the store-backed feed composer both go
//! through it, so all feeds page the same way.

use serde::Serialize;

/// Number of posts on one feed page.
pub const PAGE_SIZE: usize = 10;

/// A page number as supplied by the client, before it is checked against the feed length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageRequest {
    /// No page was asked for.
    Missing,
    /// Something was supplied but it is not an integer.
    Invalid,
    Number(i64),
}

impl PageRequest {
    /// Parse the raw `page` query value.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            None => Self::Missing,
            Some(s) => s.trim().parse().map_or(Self::Invalid, Self::Number),
        }
    }
}

impl From<Option<&str>> for PageRequest {
    fn from(raw: Option<&str>) -> Self {
        Self::parse(raw)
    }
}

impl From<i64> for PageRequest {
    fn from(n: i64) -> Self {
        Self::Number(n)
    }
}

/// Window arithmetic over a feed of `count` items.
#[derive(Debug, Clone, Copy)]
pub struct Paginator {
    count: usize,
    per_page: usize,
}

/// The resolved slice of a feed: which page, and where it starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub number: usize,
    pub num_pages: usize,
    pub count: usize,
    pub offset: usize,
    pub limit: usize,
}

impl Paginator {
    pub fn new(count: usize) -> Self {
        Self::with_page_size(count, PAGE_SIZE)
    }

    pub fn with_page_size(count: usize, per_page: usize) -> Self {
        Self {
            count,
            per_page: per_page.max(1),
        }
    }

    /// Total pages. An empty feed still has one (empty) page.
    pub fn num_pages(&self) -> usize {
        self.count.div_ceil(self.per_page).max(1)
    }

    /// Resolve a request to a page that exists.
    ///
    /// Missing or non-integer requests get page 1. Numbers past the end, and
    /// numbers below 1, get the last page.
    pub fn resolve(&self, request: PageRequest) -> usize {
        let last = self.num_pages();
        match request {
            PageRequest::Missing | PageRequest::Invalid => 1,
            PageRequest::Number(n) => match usize::try_from(n) {
                Ok(n) if (1..=last).contains(&n) => n,
                _ => last,
            },
        }
    }

    pub fn window(&self, request: PageRequest) -> PageWindow {
        let number = self.resolve(request);
        let offset = (number - 1) * self.per_page;
        PageWindow {
            number,
            num_pages: self.num_pages(),
            count: self.count,
            offset,
            limit: self.per_page.min(self.count.saturating_sub(offset)),
        }
    }
}

impl PageWindow {
    /// Attach the items fetched for this window.
    pub fn into_page<T>(self, items: Vec<T>) -> Page<T> {
        Page {
            items,
            number: self.number,
            num_pages: self.num_pages,
            count: self.count,
            has_previous: self.number > 1,
            has_next: self.number < self.num_pages,
            previous_page_number: (self.number > 1).then(|| self.number - 1),
            next_page_number: (self.number < self.num_pages).then(|| self.number + 1),
        }
    }
}

/// One page of an ordered feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub number: usize,
    pub num_pages: usize,
    pub count: usize,
    pub has_previous: bool,
    pub has_next: bool,
    pub previous_page_number: Option<usize>,
    pub next_page_number: Option<usize>,
}

/// Page an already ordered, in-memory sequence.
pub fn compose_feed<T>(items: Vec<T>, request: impl Into<PageRequest>) -> Page<T> {
    let window = Paginator::new(items.len()).window(request.into());
    let page_items = items
        .into_iter()
        .skip(window.offset)
        .take(window.limit)
        .collect();
    window.into_page(page_items)
}
