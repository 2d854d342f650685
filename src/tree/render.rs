use crate::core::error::{Error, Result};
use crate::tree::index::{NodeId, NodeKind, NoteSummary, Target, Tree, ROOT_KEY};
use crate::ui::format::shorten;
use regex::Regex;
use std::collections::HashMap;
use std::fmt;
use std::path::Path;

/// A displayed identifier: `N` for a node, `N-M` for a note
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Ident {
    Node(usize),
    Note(usize, usize),
}

impl Ident {
    /// Parse the `N` / `N-M` text form
    pub fn parse(s: &str) -> Result<Ident> {
        let s = s.trim();
        let mut parts = s.split('-');
        let node = parts
            .next()
            .and_then(|p| p.trim().parse::<usize>().ok())
            .ok_or_else(|| Error::BadIdentifier(s.to_string()))?;
        match parts.next() {
            None => Ok(Ident::Node(node)),
            Some(sub) => {
                let sub = sub
                    .trim()
                    .parse::<usize>()
                    .map_err(|_| Error::BadIdentifier(s.to_string()))?;
                if parts.next().is_some() {
                    return Err(Error::BadIdentifier(s.to_string()));
                }
                Ok(Ident::Note(node, sub))
            }
        }
    }
}

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ident::Node(n) => write!(f, "{}", n),
            Ident::Note(n, m) => write!(f, "{}-{}", n, m),
        }
    }
}

/// Identifier lookup for one rendering.
///
/// Identifiers are compact and reassigned on every render, so a map is only
/// trustworthy while the index and options it was rendered under are
/// unchanged. The generation counter lets callers reject stale maps loudly
/// instead of resolving an identifier against the wrong entity.
#[derive(Debug, Clone, Default)]
pub struct IdMap {
    entries: HashMap<Ident, Target>,
    order: Vec<(Ident, Target)>,
    pub generation: u64,
}

impl IdMap {
    pub fn resolve(&self, ident: Ident) -> Option<&Target> {
        self.entries.get(&ident)
    }

    /// Entries in the order they were emitted by the render
    pub fn iter(&self) -> impl Iterator<Item = &(Ident, Target)> {
        self.order.iter()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub(crate) fn insert(&mut self, ident: Ident, target: Target) {
        self.entries.insert(ident, target.clone());
        self.order.push((ident, target));
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinMode {
    /// Every pattern must match at least one tag
    All,
    /// At least one pattern must match at least one tag
    Any,
}

/// Boolean tag filter applied to notes during rendering
#[derive(Debug, Clone)]
pub struct TagJoin {
    pub mode: JoinMode,
    pub patterns: Vec<Regex>,
}

impl TagJoin {
    pub fn matches(&self, tags: &[String]) -> bool {
        let hit = |p: &Regex| tags.iter().any(|t| p.is_match(t));
        match self.mode {
            JoinMode::All => self.patterns.iter().all(hit),
            JoinMode::Any => self.patterns.iter().any(hit),
        }
    }
}

/// Options for one render
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Levels below the start node to traverse; 0 means unlimited
    pub max_depth: usize,
    /// Render branch/file node lines
    pub show_nodes: bool,
    /// Render note lines
    pub show_notes: bool,
    /// Only render nodes whose display path matches
    pub path_filter: Option<Regex>,
    /// Only render notes whose tags pass the join
    pub tag_join: Option<TagJoin>,
    /// Display width in columns
    pub width: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            max_depth: 0,
            show_nodes: true,
            show_notes: true,
            path_filter: None,
            tag_join: None,
            width: 80,
        }
    }
}

/// Child ordering policy. Path-view children sort by name; tag-view children
/// sort by an override table so tags like "now" can be pinned to the front
/// and "completed" to the back.
#[derive(Debug, Clone, Default)]
pub struct SortPolicy {
    pub overrides: HashMap<String, String>,
}

impl SortPolicy {
    pub fn by_name() -> Self {
        Self::default()
    }

    pub fn with_overrides(overrides: HashMap<String, String>) -> Self {
        Self { overrides }
    }

    fn key<'a>(&'a self, name: &'a str) -> &'a str {
        self.overrides.get(name).map(String::as_str).unwrap_or(name)
    }
}

// Outline drawing pieces, one child prefix per level
const PRE_MID: &str = "├── ";
const PRE_LAST: &str = "└── ";
const FILL_MID: &str = "│   ";
const FILL_LAST: &str = "    ";

/// Render `tree` from `start`, producing display lines and the identifier
/// map valid for exactly this rendering.
pub fn render(
    tree: &Tree,
    start: NodeId,
    rootdir: &Path,
    options: &RenderOptions,
    sort: &SortPolicy,
    generation: u64,
) -> (Vec<String>, IdMap) {
    let mut renderer = Renderer {
        tree,
        rootdir,
        options,
        sort,
        next_id: 0,
        lines: Vec::new(),
        idmap: IdMap {
            generation,
            ..IdMap::default()
        },
    };
    renderer.visit(start, start, "", "", 0);
    (renderer.lines, renderer.idmap)
}

struct Renderer<'a> {
    tree: &'a Tree,
    rootdir: &'a Path,
    options: &'a RenderOptions,
    sort: &'a SortPolicy,
    next_id: usize,
    lines: Vec<String>,
    idmap: IdMap,
}

impl Renderer<'_> {
    fn visit(&mut self, id: NodeId, start: NodeId, pre: &str, fill: &str, depth: usize) {
        let node = self.tree.node(id);
        match &node.kind {
            NodeKind::NotesLeaf { notes } => {
                let path = self.tree.path_string(id);
                let suppressed = self
                    .options
                    .path_filter
                    .as_ref()
                    .is_some_and(|f| !f.is_match(&path));
                if self.options.show_notes && !suppressed {
                    self.emit_notes(notes, fill);
                }
            }
            NodeKind::Branch { children } => {
                if id != start {
                    self.next_id += 1;
                }
                let node_id = self.next_id;
                let path = self.tree.path_string(id);
                let suppressed = self
                    .options
                    .path_filter
                    .as_ref()
                    .is_some_and(|f| !f.is_match(&path));

                self.idmap.insert(Ident::Node(node_id), self.target_for(id, &path));
                if node_id > 0 && self.options.show_nodes && !suppressed {
                    self.lines.push(format!("{}{} {}", pre, node.name, node_id));
                }

                let child_depth = depth + 1;
                if self.options.max_depth > 0 && child_depth > self.options.max_depth {
                    return;
                }
                let mut ordered: Vec<NodeId> = children.clone();
                ordered.sort_by(|a, b| {
                    self.sort
                        .key(&self.tree.node(*a).name)
                        .cmp(self.sort.key(&self.tree.node(*b).name))
                });
                // An active path filter flattens the outline: suppressed
                // ancestors would leave dangling indentation otherwise.
                let flat = self.options.path_filter.is_some();
                let last = ordered.len().saturating_sub(1);
                for (i, child) in ordered.into_iter().enumerate() {
                    let (child_pre, child_fill) = if flat {
                        (String::new(), String::new())
                    } else if i == last {
                        (format!("{}{}", fill, PRE_LAST), format!("{}{}", fill, FILL_LAST))
                    } else {
                        (format!("{}{}", fill, PRE_MID), format!("{}{}", fill, FILL_MID))
                    };
                    self.visit(child, start, &child_pre, &child_fill, child_depth);
                }
            }
        }
    }

    fn emit_notes(&mut self, notes: &[NoteSummary], fill: &str) {
        let node_id = self.next_id;
        let fill = if self.options.show_nodes { fill } else { "" };
        let mut sub = 0;
        for note in notes {
            if let Some(join) = &self.options.tag_join {
                if !join.matches(&note.tags) {
                    continue;
                }
            }
            sub += 1;
            let ident = Ident::Note(node_id, sub);
            let idstr = format!(" {}", ident);
            let mut title = note.title.clone();
            let fixed = fill.chars().count()
                + note.tag_suffix.chars().count()
                + idstr.chars().count();
            let full = fixed + title.chars().count();
            if full > self.options.width {
                title = shorten(&title, self.options.width.saturating_sub(fixed));
            }
            self.lines
                .push(format!("{}{}{}{}", fill, title, note.tag_suffix, idstr));
            self.idmap.insert(ident, Target::Note(note.key.clone()));
        }
    }

    fn target_for(&self, id: NodeId, path: &str) -> Target {
        if self.tree.node(id).name.ends_with(".txt") {
            let rel = path.strip_prefix("./").unwrap_or(path);
            Target::File(self.rootdir.join(rel))
        } else {
            let key = if id == self.tree.root {
                ROOT_KEY.to_string()
            } else {
                path.to_string()
            };
            Target::Node(key)
        }
    }
}
