use std::ops::Range;

/// Window of a 1-based `page` over `total` items. Never reaches outside
/// `0..total`; a `page` of 0 is treated like page 1.
pub fn page_window(total: usize, page: usize, page_size: usize) -> Range<usize> {
    let start = page
        .saturating_sub(1)
        .saturating_mul(page_size)
        .min(total);
    let end = start.saturating_add(page_size).min(total);
    start..end
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_stays_in_bounds() {
        for total in 0..8 {
            for page in 0..6 {
                for page_size in 0..5 {
                    let window = page_window(total, page, page_size);
                    assert!(window.start <= window.end);
                    assert!(window.end <= total);
                    assert!(window.len() <= page_size);
                }
            }
        }
    }

    #[test]
    fn pages_are_consecutive() {
        assert_eq!(page_window(10, 1, 3), 0..3);
        assert_eq!(page_window(10, 2, 3), 3..6);
        assert_eq!(page_window(10, 4, 3), 9..10);
        assert_eq!(page_window(10, 5, 3), 10..10);
    }

    #[test]
    fn huge_page_does_not_overflow() {
        assert_eq!(page_window(4, usize::MAX, usize::MAX), 4..4);
    }
}
