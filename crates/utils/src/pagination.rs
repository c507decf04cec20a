//! Windowed page-number sequence for list navigation.

use std::{collections::BTreeSet, fmt};

/// Below this many pages every page number is shown.
const FULL_RANGE_LIMIT: u64 = 5;
/// Pages shown starting at the current page.
const WINDOW: u64 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageItem {
    Page(u64),
    Ellipsis,
}

impl fmt::Display for PageItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageItem::Page(n) => write!(f, "{n}"),
            PageItem::Ellipsis => f.write_str("…"),
        }
    }
}

pub fn total_pages(count: u64, page_size: u64) -> u64 {
    if page_size == 0 {
        return 0;
    }
    count.div_ceil(page_size)
}

/// Page links to render for `current`: pages 1 and 2, the last two pages and a
/// three-page window starting at the current page, with gaps collapsed.
pub fn page_window(count: u64, page_size: u64, current: u64) -> Vec<PageItem> {
    let total = total_pages(count, page_size);
    if total <= FULL_RANGE_LIMIT {
        return (1..=total).map(PageItem::Page).collect();
    }

    let current = current.clamp(1, total);
    let start = current.min(total - (WINDOW - 1));

    let mut pages: BTreeSet<u64> = [1, 2, total - 1, total].into_iter().collect();
    pages.extend(start..start + WINDOW);

    let mut items = Vec::with_capacity(pages.len() + 2);
    let mut previous = None;
    for page in pages {
        if let Some(prev) = previous
            && page > prev + 1
        {
            items.push(PageItem::Ellipsis);
        }
        items.push(PageItem::Page(page));
        previous = Some(page);
    }
    items
}

/// Render a window as a single line, bracketing the current page.
pub fn render_window(items: &[PageItem], current: u64) -> String {
    items
        .iter()
        .map(|item| match item {
            PageItem::Page(n) if *n == current => format!("[{n}]"),
            other => other.to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::{PageItem::*, *};

    fn pages(items: &[PageItem]) -> Vec<u64> {
        items
            .iter()
            .filter_map(|item| match item {
                Page(n) => Some(*n),
                Ellipsis => None,
            })
            .collect()
    }

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(100, 20), 5);
        assert_eq!(total_pages(101, 20), 6);
        assert_eq!(total_pages(0, 20), 0);
        assert_eq!(total_pages(10, 0), 0);
    }

    #[test]
    fn test_five_pages_shows_everything() {
        let items = page_window(100, 20, 3);
        assert_eq!(items, vec![Page(1), Page(2), Page(3), Page(4), Page(5)]);
    }

    #[test]
    fn test_middle_page_collapses_gaps() {
        let items = page_window(400, 20, 10);
        assert_eq!(
            items,
            vec![
                Page(1),
                Page(2),
                Ellipsis,
                Page(10),
                Page(11),
                Page(12),
                Ellipsis,
                Page(19),
                Page(20)
            ]
        );
    }

    #[test]
    fn test_first_page() {
        let items = page_window(400, 20, 1);
        assert_eq!(pages(&items), vec![1, 2, 3, 19, 20]);
        assert_eq!(items.iter().filter(|i| **i == Ellipsis).count(), 1);
    }

    #[test]
    fn test_last_page_window_shifts_left() {
        let items = page_window(400, 20, 20);
        assert_eq!(pages(&items), vec![1, 2, 18, 19, 20]);
    }

    #[test]
    fn test_out_of_range_current_is_clamped() {
        assert_eq!(page_window(400, 20, 0), page_window(400, 20, 1));
        assert_eq!(page_window(400, 20, 99), page_window(400, 20, 20));
    }

    #[test]
    fn test_empty_list_has_no_links() {
        assert!(page_window(0, 20, 1).is_empty());
    }

    #[test]
    fn test_render_window() {
        let items = page_window(400, 20, 10);
        assert_eq!(render_window(&items, 10), "1 2 … [10] 11 12 … 19 20");
    }
}
