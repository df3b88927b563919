//! Paginated result sets returned by the listing endpoint.

use serde::{Deserialize, Serialize};

/// One page of results plus the totals needed to render pagination.
///
/// The backend never clamps the requested page; `page` echoes what was asked
/// for. Clamping to `[1, max(1, pages)]` is the caller's responsibility (see
/// [`ResultPage::clamp_page`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultPage<T> {
    pub items: Vec<T>,
    #[serde(default)]
    pub total: u64,
    #[serde(default = "first_page")]
    pub page: u32,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

const fn first_page() -> u32 {
    1
}

const fn default_page_size() -> u32 {
    12
}

impl<T> ResultPage<T> {
    /// Creates a page from its parts.
    #[must_use]
    pub const fn new(items: Vec<T>, total: u64, page: u32, page_size: u32) -> Self {
        Self {
            items,
            total,
            page,
            page_size,
        }
    }

    /// Number of pages, `ceil(total / page_size)`.
    ///
    /// A zero page size yields zero pages instead of dividing by zero.
    #[must_use]
    pub fn pages(&self) -> u64 {
        if self.page_size == 0 {
            return 0;
        }
        self.total.div_ceil(u64::from(self.page_size))
    }

    /// Clamps `requested` into `[1, max(1, pages)]`.
    ///
    /// # Examples
    ///
    /// ```
    /// use campus_discovery::domain::ResultPage;
    ///
    /// let page: ResultPage<u64> = ResultPage::new(vec![], 25, 9, 12);
    /// assert_eq!(page.pages(), 3);
    /// assert_eq!(page.clamp_page(9), 3);
    /// assert_eq!(page.clamp_page(0), 1);
    /// ```
    #[must_use]
    pub fn clamp_page(&self, requested: u32) -> u32 {
        let last = u32::try_from(self.pages().max(1)).unwrap_or(u32::MAX);
        requested.clamp(1, last)
    }
}
