use serde::Serialize;

/// Page metadata returned next to every list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    pub total: usize,
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
}

impl PageInfo {
    pub fn new(total: usize, page: usize, page_size: usize) -> Self {
        let page_size = page_size.max(1);
        Self {
            total,
            page: page.max(1),
            page_size,
            total_pages: total.div_ceil(page_size),
        }
    }

    pub fn offset(&self) -> usize {
        (self.page - 1).saturating_mul(self.page_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_pages_round_up() {
        assert_eq!(PageInfo::new(41, 1, 20).total_pages, 3);
        assert_eq!(PageInfo::new(40, 1, 20).total_pages, 2);
        assert_eq!(PageInfo::new(0, 1, 20).total_pages, 0);
    }

    #[test]
    fn page_zero_is_first_page() {
        let info = PageInfo::new(5, 0, 2);
        assert_eq!(info.page, 1);
        assert_eq!(info.offset(), 0);
    }
}
