//! Page/limit handling shared by paginated listings.

use crate::config::SiteConfig;

/// Normalized `page` and `limit` request parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// 1-based.
    pub page: usize,
    pub limit: usize,
}

impl PageRequest {
    /// Builds a page from raw parameters.
    ///
    /// - Missing or unparsable `page`, or `page < 1`, means page 1.
    /// - Missing or unparsable `limit` means the configured default.
    /// - `limit` is clamped to `1..=max_items_per_page`.
    pub fn from_params(page: Option<&str>, limit: Option<&str>, config: &SiteConfig) -> Self {
        let page = page
            .and_then(|value| value.trim().parse::<i64>().ok())
            .filter(|value| *value >= 1)
            .and_then(|value| usize::try_from(value).ok())
            .unwrap_or(1);
        let max = to_usize(config.max_items_per_page).max(1);
        let limit = limit
            .and_then(|value| value.trim().parse::<i64>().ok())
            .map(|value| usize::try_from(value.max(1)).unwrap_or(max))
            .unwrap_or_else(|| to_usize(config.default_items_per_page))
            .clamp(1, max);
        Self { page, limit }
    }

    pub fn offset(&self) -> usize {
        (self.page - 1).saturating_mul(self.limit)
    }

    /// Returns the items on this page, preserving order.
    pub fn slice<T>(&self, items: Vec<T>) -> Vec<T> {
        items
            .into_iter()
            .skip(self.offset())
            .take(self.limit)
            .collect()
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::from_params(None, None, &SiteConfig::default())
    }
}

/// Parses a plain top-N `limit` (popular posts, top authors).
pub fn top_limit(raw: Option<&str>, default: usize, config: &SiteConfig) -> usize {
    let max = to_usize(config.max_items_per_page).max(1);
    raw.and_then(|value| value.trim().parse::<i64>().ok())
        .map(|value| usize::try_from(value.max(1)).unwrap_or(max))
        .unwrap_or(default)
        .clamp(1, max)
}

fn to_usize(value: u32) -> usize {
    usize::try_from(value).unwrap_or(usize::MAX)
}
