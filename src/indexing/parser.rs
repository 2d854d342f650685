use regex::Regex;
use std::sync::LazyLock;

/// A note header is `+` or `#`, whitespace, a title, and an optional
/// parenthesized comma-separated tag list.
static NOTE_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+#]\s+([^(]+?)\s*(?:\(([^)]*)\))?\s*$").unwrap());

/// A titled, optionally tagged block of text extracted from a note file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    pub title: String,
    /// Tags in the order they appear in the header
    pub tags: Vec<String>,
    /// 0-based line index of the header within the file
    pub line_offset: usize,
    pub body: Vec<String>,
}

impl Note {
    /// The header line as it would appear in a file, `+ title (a, b)`
    pub fn header(&self) -> String {
        format_header(&self.title, &self.tags)
    }

    /// Parenthesized tag list with a leading space, empty for untagged notes
    pub fn tag_suffix(&self) -> String {
        if self.tags.is_empty() {
            String::new()
        } else {
            format!(" ({})", self.tags.join(", "))
        }
    }
}

/// Format a note header line from a title and tag list. Round-trips with
/// [`parse_notes`] for titles that contain no parentheses.
pub fn format_header(title: &str, tags: &[String]) -> String {
    if tags.is_empty() {
        format!("+ {}", title)
    } else {
        format!("+ {} ({})", title, tags.join(", "))
    }
}

/// Split file content into a sequence of notes.
///
/// Lines matching the header pattern open a new note; every other line is
/// body text of the currently open note (lines before the first header are
/// ignored). One trailing blank body line is stripped per note. A line that
/// starts with `+` but fails the full header pattern is reported and kept as
/// body text.
pub fn parse_notes(content: &str) -> Vec<Note> {
    let mut notes = Vec::new();
    let mut open: Option<Note> = None;

    for (linenum, line) in content.lines().enumerate() {
        if let Some(caps) = NOTE_HEADER.captures(line) {
            if let Some(note) = open.take() {
                notes.push(close_note(note));
            }
            let title = caps.get(1).map(|m| m.as_str().trim()).unwrap_or_default();
            let tags = caps
                .get(2)
                .map(|m| {
                    m.as_str()
                        .split(',')
                        .map(str::trim)
                        .filter(|t| !t.is_empty())
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default();
            open = Some(Note {
                title: title.to_string(),
                tags,
                line_offset: linenum,
                body: Vec::new(),
            });
        } else {
            if line.starts_with('+') {
                tracing::warn!("malformed note header treated as body: '{}'", line);
            }
            if let Some(note) = open.as_mut() {
                note.body.push(line.trim_end().to_string());
            }
        }
    }
    if let Some(note) = open.take() {
        notes.push(close_note(note));
    }
    notes
}

fn close_note(mut note: Note) -> Note {
    if note.body.last().is_some_and(|l| l.is_empty()) {
        note.body.pop();
    }
    note
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_note() {
        let notes = parse_notes("+ shopping list (errands, home)\nmilk\neggs\n");
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].title, "shopping list");
        assert_eq!(notes[0].tags, vec!["errands", "home"]);
        assert_eq!(notes[0].line_offset, 0);
        assert_eq!(notes[0].body, vec!["milk", "eggs"]);
    }

    #[test]
    fn test_parse_untagged_and_hash_headers() {
        let notes = parse_notes("# plain title\nbody\n");
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].title, "plain title");
        assert!(notes[0].tags.is_empty());
        assert_eq!(notes[0].tag_suffix(), "");
    }

    #[test]
    fn test_trailing_blank_body_line_stripped() {
        let notes = parse_notes("+ a\nbody\n\n+ b\nmore");
        assert_eq!(notes[0].body, vec!["body"]);
        assert_eq!(notes[1].line_offset, 3);
        assert_eq!(notes[1].body, vec!["more"]);
    }

    #[test]
    fn test_consecutive_headers_have_empty_bodies() {
        let notes = parse_notes("+ a\n+ b\n+ c (x)\n");
        assert_eq!(notes.len(), 3);
        assert!(notes.iter().take(2).all(|n| n.body.is_empty()));
        assert_eq!(notes[2].tags, vec!["x"]);
    }

    #[test]
    fn test_malformed_plus_line_is_body() {
        // no whitespace after '+', so not a header
        let notes = parse_notes("+ real\n+not-a-header\n");
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].body, vec!["+not-a-header"]);
    }

    #[test]
    fn test_no_headers_yields_no_notes() {
        assert!(parse_notes("just\nprose\n").is_empty());
    }

    #[test]
    fn test_parse_is_idempotent() {
        let content = "+ a (x, y)\nbody one\n\n+ b\nbody two\n";
        assert_eq!(parse_notes(content), parse_notes(content));
    }

    #[test]
    fn test_header_round_trip() {
        let tags = vec!["alpha".to_string(), "beta".to_string()];
        let header = format_header("a title", &tags);
        let notes = parse_notes(&header);
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].title, "a title");
        assert_eq!(notes[0].tags, tags);
        assert_eq!(notes[0].header(), header);
    }

    #[test]
    fn test_empty_parenthetical_means_no_tags() {
        let notes = parse_notes("+ title ()\n");
        assert_eq!(notes.len(), 1);
        assert!(notes[0].tags.is_empty());
    }
}
