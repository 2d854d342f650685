/// Fixed-size paging over a flat line sequence.
///
/// The pager only slices and tracks position; the interactive loop that
/// reacts to cursor keys lives outside the core.
#[derive(Debug, Clone, Default)]
pub struct Pager {
    lines: Vec<String>,
    rows: usize,
    current: usize,
}

impl Pager {
    pub fn new(lines: Vec<String>, rows: usize) -> Self {
        Self {
            lines,
            rows: rows.max(1),
            current: 0,
        }
    }

    /// Replace the content, resetting to the first page
    pub fn set_lines(&mut self, lines: Vec<String>) {
        self.lines = lines;
        self.current = 0;
    }

    pub fn page_count(&self) -> usize {
        self.lines.len().div_ceil(self.rows)
    }

    pub fn current_page(&self) -> usize {
        self.current
    }

    pub fn set_page(&mut self, page: usize) {
        if page < self.page_count() {
            self.current = page;
        }
    }

    /// Lines of the given 0-based page
    pub fn page(&self, page: usize) -> &[String] {
        let beg = page * self.rows;
        let end = (beg + self.rows).min(self.lines.len());
        if beg >= self.lines.len() {
            &[]
        } else {
            &self.lines[beg..end]
        }
    }

    pub fn current_lines(&self) -> &[String] {
        self.page(self.current)
    }

    pub fn scroll_up(&mut self) -> bool {
        if self.current > 0 {
            self.current -= 1;
            true
        } else {
            false
        }
    }

    pub fn scroll_down(&mut self) -> bool {
        if self.current + 1 < self.page_count() {
            self.current += 1;
            true
        } else {
            false
        }
    }

    /// Underscore rule, plus a page indicator when there is more than one page
    pub fn footer(&self, width: usize) -> Vec<String> {
        let rule = "_".repeat(width);
        if self.page_count() < 2 {
            vec![rule]
        } else {
            vec![
                rule,
                format!(
                    "Page {}/{}. Use up and down cursor keys to change pages.",
                    self.current + 1,
                    self.page_count()
                ),
            ]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("line {}", i)).collect()
    }

    #[test]
    fn test_paging_covers_all_lines_once() {
        let pager = Pager::new(lines(25), 10);
        assert_eq!(pager.page_count(), 3);
        assert_eq!(pager.page(0).len(), 10);
        assert_eq!(pager.page(2).len(), 5);
        assert!(pager.page(3).is_empty());
        let total: usize = (0..pager.page_count()).map(|p| pager.page(p).len()).sum();
        assert_eq!(total, 25);
    }

    #[test]
    fn test_scrolling_clamps_at_ends() {
        let mut pager = Pager::new(lines(25), 10);
        assert!(!pager.scroll_up());
        assert!(pager.scroll_down());
        assert!(pager.scroll_down());
        assert!(!pager.scroll_down());
        assert_eq!(pager.current_page(), 2);
    }

    #[test]
    fn test_footer_shows_page_indicator_only_when_paged() {
        let pager = Pager::new(lines(3), 10);
        assert_eq!(pager.footer(5), vec!["_____".to_string()]);
        let pager = Pager::new(lines(30), 10);
        assert_eq!(pager.footer(5).len(), 2);
        assert!(pager.footer(5)[1].starts_with("Page 1/3"));
    }
}
