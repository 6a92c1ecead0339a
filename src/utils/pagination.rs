//! Fixed-size page slicing over an already ordered result set.

use serde::Deserialize;

/// Number of records per page.
pub const PAGE_SIZE: usize = 8;

/// One page of a larger result set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Size of the full result set, not of this page.
    pub total: usize,
}

impl<T> Page<T> {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// `?page=N` query parameter.
///
/// Values that do not parse as an integer fall back to the first page.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    page: Option<String>,
}

impl PageQuery {
    pub fn page(&self) -> i64 {
        self.page
            .as_deref()
            .and_then(|raw| raw.trim().parse().ok())
            .unwrap_or(1)
    }
}

/// Slice `[(page-1)*PAGE_SIZE, page*PAGE_SIZE)` out of `items`.
///
/// Pages are 1-based; page 0, negative pages, and pages past the end yield an
/// empty slice.
pub fn paginate<T: Clone>(items: &[T], page: i64) -> Page<T> {
    let total = items.len();

    let start = usize::try_from(page - 1)
        .ok()
        .and_then(|index| index.checked_mul(PAGE_SIZE))
        .filter(|start| *start < total);

    let items = match start {
        Some(start) => {
            let end = start.saturating_add(PAGE_SIZE).min(total);
            items[start..end].to_vec()
        }
        None => Vec::new(),
    };

    Page { items, total }
}
