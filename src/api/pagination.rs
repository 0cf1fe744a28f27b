use serde::Serialize;

/// A validated page window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub limit: u64,
}

impl PageRequest {
    /// Page defaults to 1; limit defaults to `default_limit` and is capped at `max_limit`.
    /// Zero values fall back to the defaults. Page is clamped so the skip fits a SQL `OFFSET`.
    pub fn new(page: Option<u64>, limit: Option<u64>, default_limit: u64, max_limit: u64) -> Self {
        let limit = limit
            .filter(|l| *l > 0)
            .unwrap_or(default_limit)
            .clamp(1, max_limit.max(1));
        let last_page = i64::MAX as u64 / limit + 1;
        let page = page.filter(|p| *p > 0).unwrap_or(1).min(last_page);
        Self { page, limit }
    }

    pub fn skip(&self) -> u64 {
        (self.page - 1).saturating_mul(self.limit)
    }

    pub fn total_pages(&self, total: u64) -> u64 {
        total.div_ceil(self.limit)
    }
}

/// Paginated result in the shape web clients already consume
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub docs: Vec<T>,
    pub total_docs: u64,
    pub limit: u64,
    pub total_pages: u64,
    pub page: u64,
    pub paging_counter: u64,
    pub has_prev_page: bool,
    pub has_next_page: bool,
    pub prev_page: Option<u64>,
    pub next_page: Option<u64>,
}

impl<T> Page<T> {
    pub fn new(docs: Vec<T>, total_docs: u64, request: PageRequest) -> Self {
        let PageRequest { page, limit } = request;
        let total_pages = request.total_pages(total_docs).max(1);
        let has_prev_page = page > 1;
        let has_next_page = page < total_pages;
        Self {
            docs,
            total_docs,
            limit,
            total_pages,
            page,
            paging_counter: page.saturating_sub(1).saturating_mul(limit).saturating_add(1),
            has_prev_page,
            has_next_page,
            prev_page: has_prev_page.then(|| page - 1),
            next_page: has_next_page.then(|| page + 1),
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            docs: self.docs.into_iter().map(f).collect(),
            total_docs: self.total_docs,
            limit: self.limit,
            total_pages: self.total_pages,
            page: self.page,
            paging_counter: self.paging_counter,
            has_prev_page: self.has_prev_page,
            has_next_page: self.has_next_page,
            prev_page: self.prev_page,
            next_page: self.next_page,
        }
    }
}

/// Pagination block of the admin overview endpoints
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminPagination {
    pub current_page: u64,
    pub total_pages: u64,
    pub page_size: u64,
    pub total: u64,
    pub has_prev_page: bool,
    pub has_next_page: bool,
}

impl AdminPagination {
    pub fn new(total: u64, request: PageRequest) -> Self {
        let total_pages = request.total_pages(total);
        Self {
            current_page: request.page,
            total_pages,
            page_size: request.limit,
            total,
            has_prev_page: request.page > 1,
            has_next_page: request.page < total_pages,
        }
    }
}
