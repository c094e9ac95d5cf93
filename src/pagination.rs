//! Page-button layout for paginated lists.

use serde::Serialize;

/// Number of page buttons shown around the current page.
pub const PAGE_WINDOW: usize = 5;

/// Clamps a requested page into `[1, max(total_pages, 1)]`.
pub fn clamp_page(page: usize, total_pages: usize) -> usize {
    page.clamp(1, total_pages.max(1))
}

/// Computes the page buttons to render. `None` marks an ellipsis.
///
/// The first and last pages are always present; a window of `window` pages
/// is centred on the current page and shifted inwards near either end.
fn get_pages(total_pages: usize, current_page: usize, window: usize) -> Vec<Option<usize>> {
    let last_page = total_pages;

    if last_page == 0 || window == 0 {
        return vec![];
    }

    let current_page = clamp_page(current_page, last_page);

    let mut start = current_page.saturating_sub(window / 2).max(1);
    let end = (start + window - 1).min(last_page);
    if end + 1 - start < window {
        start = (end + 1).saturating_sub(window).max(1);
    }

    let mut pages = Vec::new();

    if start > 1 {
        pages.push(Some(1));
        if start > 2 {
            pages.push(None);
        }
    }

    pages.extend((start..=end).map(Some));

    if end < last_page {
        if end + 1 < last_page {
            pages.push(None);
        }
        pages.push(Some(last_page));
    }

    pages
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub pages: Vec<Option<usize>>,
    pub page: usize,
    pub total_pages: usize,
    pub total_count: usize,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, current_page: usize, total_pages: usize, total_count: usize) -> Self {
        let current_page = clamp_page(current_page, total_pages);

        let pages = get_pages(total_pages, current_page, PAGE_WINDOW);

        Self {
            items,
            pages,
            page: current_page,
            total_pages,
            total_count,
        }
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

/// Page buttons for `current_page` out of `total_pages` with the default window.
pub fn page_links(total_pages: usize, current_page: usize) -> Vec<Option<usize>> {
    get_pages(total_pages, current_page, PAGE_WINDOW)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centres_window_with_ellipses_on_both_sides() {
        assert_eq!(
            page_links(12, 6),
            vec![
                Some(1),
                None,
                Some(4),
                Some(5),
                Some(6),
                Some(7),
                Some(8),
                None,
                Some(12)
            ]
        );
    }

    #[test]
    fn window_shifts_inwards_at_the_start() {
        assert_eq!(
            page_links(12, 1),
            vec![Some(1), Some(2), Some(3), Some(4), Some(5), None, Some(12)]
        );
    }

    #[test]
    fn window_shifts_inwards_at_the_end() {
        assert_eq!(
            page_links(12, 12),
            vec![Some(1), None, Some(8), Some(9), Some(10), Some(11), Some(12)]
        );
    }

    #[test]
    fn no_ellipsis_when_window_abuts_an_end() {
        assert_eq!(
            page_links(7, 4),
            vec![Some(1), Some(2), Some(3), Some(4), Some(5), Some(6), Some(7)]
        );
    }

    #[test]
    fn short_ranges_are_listed_in_full() {
        assert_eq!(page_links(3, 2), vec![Some(1), Some(2), Some(3)]);
        assert_eq!(page_links(1, 1), vec![Some(1)]);
        assert!(page_links(0, 1).is_empty());
    }

    #[test]
    fn out_of_range_page_is_clamped() {
        let paginated = Paginated::new(vec![1, 2], 9, 3, 20);
        assert_eq!(paginated.page, 3);
        assert!(!paginated.has_next());
        assert!(paginated.has_previous());

        let paginated: Paginated<u8> = Paginated::new(vec![], 0, 0, 0);
        assert_eq!(paginated.page, 1);
    }
}
