use crate::core::error::Result;
use crate::tree::index::{NoteIndex, NoteKey, Target};
use crate::tree::render::{IdMap, JoinMode, TagJoin};
use crate::ui::format::wrap;
use regex::{Regex, RegexBuilder};
use std::collections::HashSet;

/// Full-text search argument: `[!]regex`, where a leading `!` suppresses the
/// match-marker glyphs in the output
#[derive(Debug, Clone)]
pub struct FindQuery {
    pub regex: Regex,
    pub mark: bool,
}

fn case_insensitive(pattern: &str) -> Result<Regex> {
    Ok(RegexBuilder::new(pattern).case_insensitive(true).build()?)
}

/// Parse a find argument
pub fn parse_find(arg: &str) -> Result<FindQuery> {
    let (mark, pattern) = match arg.strip_prefix('!') {
        Some(rest) => (false, rest),
        None => (true, arg),
    };
    Ok(FindQuery {
        regex: case_insensitive(pattern.trim())?,
        mark,
    })
}

/// Parse a branch filter argument: a bare regex matched against the joined
/// ancestor-name path string
pub fn parse_get(arg: &str) -> Result<Regex> {
    case_insensitive(arg.trim())
}

/// Parse a join argument: `[&|]regex[, regex]*`. `&` selects AND, `|` OR;
/// with no sigil the whole argument is a single pattern.
pub fn parse_join(arg: &str) -> Result<TagJoin> {
    let arg = arg.trim();
    let (mode, rest) = match arg.chars().next() {
        Some('&') => (JoinMode::All, &arg[1..]),
        Some('|') => (JoinMode::Any, &arg[1..]),
        _ => {
            return Ok(TagJoin {
                mode: JoinMode::Any,
                patterns: vec![case_insensitive(arg)?],
            })
        }
    };
    let patterns = rest
        .split(',')
        .map(|p| case_insensitive(p.trim()))
        .collect::<Result<Vec<_>>>()?;
    Ok(TagJoin { mode, patterns })
}

/// Display full notes whose text (title, tags or body) contains a match.
///
/// Notes are reconstructed from the index's note-details map in the order of
/// the given render, each headed by its `N-M` identifier, bodies word-wrapped
/// to `width`. When `query.mark` is set, lines containing a match carry a
/// trailing `marker` glyph.
pub fn find(
    index: &NoteIndex,
    idmap: &IdMap,
    query: &FindQuery,
    width: usize,
    marker: &str,
) -> Vec<String> {
    let matching: HashSet<&NoteKey> = index
        .note_details
        .iter()
        .filter(|(_, lines)| lines.iter().any(|l| query.regex.is_match(l)))
        .map(|(key, _)| key)
        .collect();
    if matching.is_empty() {
        return Vec::new();
    }

    let mut output = Vec::new();
    for (ident, target) in idmap.iter() {
        let Target::Note(key) = target else { continue };
        if !matching.contains(key) {
            continue;
        }
        let Some(lines) = index.note_details.get(key) else { continue };
        let mut note_lines = vec![format!("{} {}", lines[0], ident)];
        for line in &lines[1..] {
            note_lines.extend(wrap(line, width.saturating_sub(4), "  "));
        }
        if query.mark {
            for line in &mut note_lines {
                if query.regex.is_match(line) {
                    line.push(' ');
                    line.push_str(marker);
                }
            }
        }
        output.extend(note_lines);
        output.push(String::new());
    }
    if output.last().is_some_and(|l| l.is_empty()) {
        output.pop();
    }
    output
}
