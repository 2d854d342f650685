use terminal_size::{terminal_size, Width};

const FALLBACK_WIDTH: usize = 80;

/// Current terminal width in columns, with a fallback for pipes
pub fn display_width() -> usize {
    terminal_size()
        .map(|(Width(w), _)| w as usize)
        .unwrap_or(FALLBACK_WIDTH)
}

/// Truncate `text` to at most `max` characters, ending in an ellipsis when
/// anything was cut
pub fn shorten(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    if max == 0 {
        return String::new();
    }
    let kept: String = text.chars().take(max - 1).collect();
    format!("{}…", kept.trim_end())
}

/// Greedy word-wrap of one line to `width` columns with a hanging indent.
/// Blank input yields one empty line so paragraph breaks survive.
pub fn wrap(line: &str, width: usize, indent: &str) -> Vec<String> {
    let line = line.trim_end();
    if line.is_empty() {
        return vec![String::new()];
    }
    let avail = width.saturating_sub(indent.chars().count()).max(1);
    let mut out = Vec::new();
    let mut current = String::new();
    for word in line.split_whitespace() {
        let sep = if current.is_empty() { 0 } else { 1 };
        if !current.is_empty() && current.chars().count() + sep + word.chars().count() > avail {
            out.push(format!("{}{}", indent, current));
            current.clear();
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        out.push(format!("{}{}", indent, current));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shorten_keeps_short_text() {
        assert_eq!(shorten("short", 10), "short");
        assert_eq!(shorten("exact", 5), "exact");
    }

    #[test]
    fn test_shorten_truncates_with_ellipsis() {
        let out = shorten("a moderately long title", 10);
        assert!(out.chars().count() <= 10);
        assert!(out.ends_with('…'));
    }

    #[test]
    fn test_wrap_preserves_blank_lines() {
        assert_eq!(wrap("", 20, "  "), vec!["".to_string()]);
    }

    #[test]
    fn test_wrap_respects_width_and_indent() {
        let lines = wrap("one two three four five six seven", 12, "  ");
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(line.starts_with("  "));
            assert!(line.chars().count() <= 12, "line too wide: {:?}", line);
        }
    }
}
