/// Fixed-size pagination for post listings.
///
/// Reproduces the forgiving contract of the classic paginator: an invalid or
/// missing `page` query value falls back to the first page, a value past the
/// end falls back to the last page. A page request is never an error.
use serde::{Deserialize, Serialize};

/// Posts per page on every listing
pub const PAGE_SIZE: i64 = 10;

/// Query parameters accepted by the listing handlers
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Paginator {
    pub count: i64,
    pub per_page: i64,
    pub num_pages: i64,
}

/// The slice of a listing handed to the template, together with its
/// navigation state.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T: Serialize> {
    pub number: i64,
    pub has_previous: bool,
    pub has_next: bool,
    pub previous_page_number: i64,
    pub next_page_number: i64,
    pub object_list: Vec<T>,
}

impl Paginator {
    pub fn new(count: i64, per_page: i64) -> Self {
        // An empty listing still has one (empty) page
        let num_pages = ((count.max(0) + per_page - 1) / per_page).max(1);
        Paginator {
            count: count.max(0),
            per_page,
            num_pages,
        }
    }

    /// Clamp a raw `page` query value to a valid page number.
    pub fn resolve_page(&self, raw: Option<&str>) -> i64 {
        let requested = raw.and_then(|v| v.trim().parse::<i64>().ok()).unwrap_or(1);
        requested.clamp(1, self.num_pages)
    }

    /// Offset of the first item on `number` (a valid page number).
    pub fn offset(&self, number: i64) -> i64 {
        (number - 1) * self.per_page
    }

    pub fn page<T: Serialize>(&self, number: i64, object_list: Vec<T>) -> Page<T> {
        Page {
            number,
            has_previous: number > 1,
            has_next: number < self.num_pages,
            previous_page_number: (number - 1).max(1),
            next_page_number: (number + 1).min(self.num_pages),
            object_list,
        }
    }
}
