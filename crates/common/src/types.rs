//! 通用类型定义

use serde::{Deserialize, Serialize};

/// 默认每页条数
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// 分页参数
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub page_size: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Pagination {
    pub fn new(page: u32, page_size: u32) -> Self {
        Self { page, page_size }
    }

    /// 把页码和页大小收敛到合法区间
    ///
    /// 页码至少为 1；页大小为 0 时取默认值，否则截断到 `max_page_size`。
    pub fn clamped(self, max_page_size: u32) -> Self {
        let max_page_size = max_page_size.max(1);
        let page_size = match self.page_size {
            0 => DEFAULT_PAGE_SIZE.min(max_page_size),
            n => n.min(max_page_size),
        };

        Self {
            page: self.page.max(1),
            page_size,
        }
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.page_size)
    }

    pub fn limit(&self) -> u64 {
        u64::from(self.page_size)
    }
}

/// 分页结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PagedResult<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
}

impl<T> PagedResult<T> {
    pub fn new(items: Vec<T>, total: u64, pagination: &Pagination) -> Self {
        Self {
            items,
            total,
            page: pagination.page,
            page_size: pagination.page_size,
        }
    }

    pub fn total_pages(&self) -> u32 {
        if self.page_size == 0 {
            return 0;
        }
        self.total.div_ceil(u64::from(self.page_size)) as u32
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PagedResult<U> {
        PagedResult {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            page_size: self.page_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_bounds_page_size() {
        assert_eq!(Pagination::new(3, 500).clamped(100), Pagination::new(3, 100));
        assert_eq!(Pagination::new(0, 10).clamped(100), Pagination::new(1, 10));
        assert_eq!(Pagination::new(1, 0).clamped(100), Pagination::new(1, DEFAULT_PAGE_SIZE));
        assert_eq!(Pagination::new(1, 0).clamped(5), Pagination::new(1, 5));
    }

    #[test]
    fn test_offset() {
        assert_eq!(Pagination::new(1, 10).offset(), 0);
        assert_eq!(Pagination::new(3, 10).offset(), 20);
        assert_eq!(Pagination::new(0, 10).offset(), 0);
    }

    #[test]
    fn test_total_pages() {
        let result = PagedResult::new(vec![1, 2], 21, &Pagination::new(1, 10));
        assert_eq!(result.total_pages(), 3);

        let empty: PagedResult<i32> = PagedResult::new(vec![], 0, &Pagination::new(1, 10));
        assert_eq!(empty.total_pages(), 0);
    }
}
