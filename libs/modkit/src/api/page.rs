use serde::{Deserialize, Serialize};

/// One page of a larger ordered result set. `page` is zero-based.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u64,
    pub size: u64,
    pub total_elements: u64,
    pub total_pages: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, page: u64, size: u64, total_elements: u64) -> Self {
        Self {
            items,
            page,
            size,
            total_elements,
            total_pages: total_pages(total_elements, size),
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            size: self.size,
            total_elements: self.total_elements,
            total_pages: self.total_pages,
        }
    }
}

/// `ceil(total / size)`; zero when `size` is zero.
pub fn total_pages(total_elements: u64, size: u64) -> u64 {
    if size == 0 {
        0
    } else {
        total_elements.div_ceil(size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(total_pages(0, 10), 0);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
        assert_eq!(total_pages(5, 0), 0);
    }

    #[test]
    fn map_keeps_paging_metadata() {
        let page = Page::new(vec![1, 2, 3], 2, 3, 9).map(|n| n * 10);
        assert_eq!(page.items, vec![10, 20, 30]);
        assert_eq!(page.page, 2);
        assert_eq!(page.total_pages, 3);
    }
}
