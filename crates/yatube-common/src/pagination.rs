//! Page-number pagination shared by every listing.
//!
//! Requests never fail: a missing or non-numeric page number means the first
//! page, numbers below 1 clamp to the first page and numbers past the end clamp
//! to the last one. An empty listing still has one (empty) page.

use serde::Serialize;

/// Resolved position of one page inside a listing of `count` items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageWindow {
    /// 1-based page number after clamping.
    pub number: usize,
    pub num_pages: usize,
    /// Total items across all pages.
    pub count: usize,
    #[serde(skip)]
    pub page_size: usize,
}

impl PageWindow {
    /// Clamp `requested` (raw `?page=` value) into `[1, num_pages]`.
    pub fn resolve(count: usize, page_size: usize, requested: Option<&str>) -> Self {
        let page_size = page_size.max(1);
        let num_pages = count.div_ceil(page_size).max(1);
        let requested = requested.map(str::trim);
        let number = match requested.map(|raw| (raw, raw.parse::<i64>())) {
            Some((_, Ok(n))) if n < 1 => 1,
            Some((_, Ok(n))) => usize::try_from(n).unwrap_or(usize::MAX).min(num_pages),
            // Too large for i64 but still a number: past the end.
            Some((raw, Err(_))) if is_positive_integer(raw) => num_pages,
            Some(_) | None => 1,
        };
        Self {
            number,
            num_pages,
            count,
            page_size,
        }
    }

    /// Index of the first item on this page.
    pub fn offset(&self) -> usize {
        (self.number - 1) * self.page_size
    }

    pub fn limit(&self) -> usize {
        self.page_size
    }

    pub fn has_next(&self) -> bool {
        self.number < self.num_pages
    }

    pub fn has_previous(&self) -> bool {
        self.number > 1
    }
}

fn is_positive_integer(raw: &str) -> bool {
    let digits = raw.strip_prefix('+').unwrap_or(raw);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

/// One page of items plus pager metadata, serialized as `page_obj`.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub object_list: Vec<T>,
    pub number: usize,
    pub num_pages: usize,
    pub count: usize,
    pub has_next: bool,
    pub has_previous: bool,
}

impl<T> Page<T> {
    /// Attach already-windowed items to their window.
    pub fn new(object_list: Vec<T>, window: PageWindow) -> Self {
        Self {
            object_list,
            number: window.number,
            num_pages: window.num_pages,
            count: window.count,
            has_next: window.has_next(),
            has_previous: window.has_previous(),
        }
    }

    pub fn len(&self) -> usize {
        self.object_list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.object_list.is_empty()
    }
}

/// Slice an already ordered sequence into the requested page.
pub fn paginate<T>(items: Vec<T>, page_size: usize, requested: Option<&str>) -> Page<T> {
    let window = PageWindow::resolve(items.len(), page_size, requested);
    let object_list = items
        .into_iter()
        .skip(window.offset())
        .take(window.limit())
        .collect();
    Page::new(object_list, window)
}
