use crate::core::config::Config;
use crate::core::error::Result;
use crate::indexing::discovery::discover;
use crate::indexing::parser::{parse_notes, Note};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

/// Stable key of one note: its source file and 0-based header line
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NoteKey {
    pub file: PathBuf,
    pub line: usize,
}

/// One note as displayed in an outline: pre-formatted header pieces plus the
/// tags used by join filtering and the key back to the source
#[derive(Debug, Clone)]
pub struct NoteSummary {
    /// `+ title`, without the tag suffix
    pub title: String,
    /// ` (a, b)` or empty
    pub tag_suffix: String,
    pub tags: Vec<String>,
    pub key: NoteKey,
}

pub type NodeId = usize;

/// What a tree node holds: child nodes, or the notes of one file/tag.
/// A node never carries both.
#[derive(Debug, Clone)]
pub enum NodeKind {
    Branch { children: Vec<NodeId> },
    NotesLeaf { notes: Vec<NoteSummary> },
}

#[derive(Debug, Clone)]
pub struct Node {
    pub name: String,
    pub parent: Option<NodeId>,
    pub kind: NodeKind,
}

impl Node {
    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::NotesLeaf { .. })
    }
}

/// What a displayed identifier resolves to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// A directory or tag node, named by its tree key (e.g. `./parent/child`)
    Node(String),
    /// A note file node, named by its on-disk path
    File(PathBuf),
    /// A single note
    Note(NoteKey),
}

/// An arena-backed tree with a key index for re-rooting renders.
/// Keys are `.` for the root and `./a/b`-style joined names below it.
#[derive(Debug, Clone)]
pub struct Tree {
    nodes: Vec<Node>,
    pub root: NodeId,
    keys: HashMap<String, NodeId>,
}

pub const ROOT_KEY: &str = ".";

impl Tree {
    pub fn new() -> Self {
        let root = Node {
            name: ROOT_KEY.to_string(),
            parent: None,
            kind: NodeKind::Branch {
                children: Vec::new(),
            },
        };
        let mut keys = HashMap::new();
        keys.insert(ROOT_KEY.to_string(), 0);
        Self {
            nodes: vec![root],
            root: 0,
            keys,
        }
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    pub fn get(&self, key: &str) -> Option<NodeId> {
        self.keys.get(key).copied()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.keys.contains_key(key)
    }

    /// Add a branch node under `parent`, registered under `key`
    pub fn add_branch(&mut self, parent: NodeId, name: &str, key: &str) -> NodeId {
        let id = self.push(Node {
            name: name.to_string(),
            parent: Some(parent),
            kind: NodeKind::Branch {
                children: Vec::new(),
            },
        });
        self.keys.insert(key.to_string(), id);
        id
    }

    /// Attach the synthetic notes child of a file or tag node
    pub fn add_notes_leaf(&mut self, parent: NodeId, notes: Vec<NoteSummary>) -> NodeId {
        self.push(Node {
            name: "notes".to_string(),
            parent: Some(parent),
            kind: NodeKind::NotesLeaf { notes },
        })
    }

    fn push(&mut self, node: Node) -> NodeId {
        let id = self.nodes.len();
        let parent = node.parent;
        self.nodes.push(node);
        if let Some(parent) = parent {
            if let NodeKind::Branch { children } = &mut self.nodes[parent].kind {
                children.push(id);
            }
        }
        id
    }

    /// Names of the ancestors of `id`, root first, joined with `/`
    pub fn path_string(&self, id: NodeId) -> String {
        let mut names = Vec::new();
        let mut cur = Some(id);
        while let Some(n) = cur {
            names.push(self.nodes[n].name.as_str());
            cur = self.nodes[n].parent;
        }
        names.reverse();
        names.join("/")
    }

    /// Depth of `id` below the root
    pub fn depth(&self, id: NodeId) -> usize {
        let mut depth = 0;
        let mut cur = self.nodes[id].parent;
        while let Some(n) = cur {
            depth += 1;
            cur = self.nodes[n].parent;
        }
        depth
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

/// The full in-memory index: both trees plus the note text lookup.
/// Rebuilt wholesale from disk; never updated incrementally.
#[derive(Debug, Clone)]
pub struct NoteIndex {
    pub rootdir: PathBuf,
    pub path_tree: Tree,
    pub tag_tree: Tree,
    /// Full text of every note (header line first), keyed by source
    pub note_details: HashMap<NoteKey, Vec<String>>,
}

impl NoteIndex {
    /// Scan `rootdir` and build both trees and the note-details map.
    ///
    /// Unreadable note files are skipped with a warning; a missing or
    /// unreadable root is fatal.
    pub fn build(rootdir: &Path, config: &Config) -> Result<NoteIndex> {
        let mut path_tree = Tree::new();
        let mut note_details = HashMap::new();
        // Tag accumulation is ordered so the tag tree layout is deterministic
        let mut taghash: BTreeMap<String, Vec<NoteSummary>> = BTreeMap::new();

        for entry in discover(rootdir)? {
            if entry.relative_path.as_os_str().is_empty() {
                continue; // the root itself
            }
            if entry.is_dir {
                ensure_dir_node(&mut path_tree, &entry.relative_path);
                continue;
            }
            let content = match std::fs::read_to_string(&entry.path) {
                Ok(content) => content,
                Err(e) => {
                    tracing::warn!("skipping unreadable file {}: {}", entry.path.display(), e);
                    continue;
                }
            };
            let parent = match entry.relative_path.parent() {
                Some(p) => ensure_dir_node(&mut path_tree, p),
                None => path_tree.root,
            };
            let name = entry
                .relative_path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let key = tree_key(&entry.relative_path);
            let file_node = path_tree.add_branch(parent, &name, &key);

            let notes = parse_notes(&content);
            tracing::debug!("{}: {} notes", entry.path.display(), notes.len());
            let summaries: Vec<NoteSummary> = notes
                .iter()
                .map(|note| summarize(note, &entry.path))
                .collect();
            for (note, summary) in notes.iter().zip(&summaries) {
                let mut detail = vec![note.header()];
                detail.extend(note.body.iter().cloned());
                note_details.insert(summary.key.clone(), detail);
                if note.tags.is_empty() {
                    if config.no_tag_bucket {
                        taghash
                            .entry(config.no_tag_name.clone())
                            .or_default()
                            .push(summary.clone());
                    }
                } else {
                    for tag in &note.tags {
                        taghash.entry(tag.clone()).or_default().push(summary.clone());
                    }
                }
            }
            path_tree.add_notes_leaf(file_node, summaries);
        }

        let mut tag_tree = Tree::new();
        for (tag, summaries) in taghash {
            let key = format!("{}/{}", ROOT_KEY, tag);
            let tag_node = tag_tree.add_branch(tag_tree.root, &tag, &key);
            tag_tree.add_notes_leaf(tag_node, summaries);
        }

        Ok(NoteIndex {
            rootdir: rootdir.to_path_buf(),
            path_tree,
            tag_tree,
            note_details,
        })
    }

    /// Resolve a path-tree key (`./a/b`) back to an on-disk path
    pub fn dir_path(&self, key: &str) -> PathBuf {
        let rel = key.strip_prefix("./").unwrap_or("");
        self.rootdir.join(rel)
    }
}

fn summarize(note: &Note, path: &Path) -> NoteSummary {
    NoteSummary {
        title: format!("+ {}", note.title),
        tag_suffix: note.tag_suffix(),
        tags: note.tags.clone(),
        key: NoteKey {
            file: path.to_path_buf(),
            line: note.line_offset,
        },
    }
}

/// Tree key of a relative path: `.` joined with its components
fn tree_key(relative: &Path) -> String {
    let mut key = ROOT_KEY.to_string();
    for part in relative.components() {
        key.push('/');
        key.push_str(&part.as_os_str().to_string_lossy());
    }
    key
}

/// Create (or reuse) the chain of branch nodes for a relative directory path
fn ensure_dir_node(tree: &mut Tree, relative: &Path) -> NodeId {
    let mut current = tree.root;
    let mut key = ROOT_KEY.to_string();
    for part in relative.components() {
        let name = part.as_os_str().to_string_lossy().into_owned();
        key.push('/');
        key.push_str(&name);
        current = match tree.get(&key) {
            Some(id) => id,
            None => tree.add_branch(current, &name, &key),
        };
    }
    current
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_path_tree_mirrors_filesystem() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a/b/one.txt", "+ first (x)\nbody\n");
        write(dir.path(), "a/two.txt", "+ second\n");
        write(dir.path(), "a/README.md", "not a note file");

        let index = NoteIndex::build(dir.path(), &Config::default()).unwrap();
        let tree = &index.path_tree;

        let file = tree.get("./a/b/one.txt").unwrap();
        assert_eq!(tree.path_string(file), "./a/b/one.txt");
        assert_eq!(tree.node(file).parent, tree.get("./a/b"));
        assert!(tree.get("./a/README.md").is_none());

        // every file node owns exactly one notes leaf
        match &tree.node(file).kind {
            NodeKind::Branch { children } => {
                assert_eq!(children.len(), 1);
                assert!(tree.node(children[0]).is_leaf());
            }
            NodeKind::NotesLeaf { .. } => panic!("file node must be a branch"),
        }
    }

    #[test]
    fn test_tag_tree_depth_is_two() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "deep/er/still/notes.txt",
            "+ a (red)\n+ b (red, blue)\n",
        );

        let index = NoteIndex::build(dir.path(), &Config::default()).unwrap();
        let tree = &index.tag_tree;
        for id in 0..tree.len() {
            let depth = tree.depth(id);
            assert!(depth <= 2);
            if tree.node(id).is_leaf() {
                assert_eq!(depth, 2);
            }
        }
        let red = tree.get("./red").unwrap();
        match &tree.node(red).kind {
            NodeKind::Branch { children } => match &tree.node(children[0]).kind {
                NodeKind::NotesLeaf { notes } => assert_eq!(notes.len(), 2),
                _ => panic!("tag node child must be a notes leaf"),
            },
            _ => panic!("tag node must be a branch"),
        }
    }

    #[test]
    fn test_no_tag_bucket_policy() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "notes.txt", "+ untagged\n+ tagged (t)\n");

        let config = Config::default();
        let index = NoteIndex::build(dir.path(), &config).unwrap();
        assert!(index.tag_tree.contains_key("./~"));

        let mut no_bucket = config.clone();
        no_bucket.no_tag_bucket = false;
        let index = NoteIndex::build(dir.path(), &no_bucket).unwrap();
        assert!(!index.tag_tree.contains_key("./~"));
        assert!(index.tag_tree.contains_key("./t"));
    }

    #[test]
    fn test_note_details_holds_full_text() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "n.txt", "+ title (x)\nline one\nline two\n");

        let index = NoteIndex::build(dir.path(), &Config::default()).unwrap();
        let key = NoteKey {
            file: dir.path().join("n.txt"),
            line: 0,
        };
        assert_eq!(
            index.note_details.get(&key).unwrap(),
            &vec![
                "+ title (x)".to_string(),
                "line one".to_string(),
                "line two".to_string()
            ]
        );
    }

    #[test]
    fn test_file_with_no_headers_still_gets_a_node() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "empty.txt", "prose only\n");

        let index = NoteIndex::build(dir.path(), &Config::default()).unwrap();
        let file = index.path_tree.get("./empty.txt").unwrap();
        match &index.path_tree.node(file).kind {
            NodeKind::Branch { children } => {
                match &index.path_tree.node(children[0]).kind {
                    NodeKind::NotesLeaf { notes } => assert!(notes.is_empty()),
                    _ => panic!(),
                }
            }
            _ => panic!(),
        }
    }
}
