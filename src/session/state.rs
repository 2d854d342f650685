use crate::core::config::Config;
use crate::core::error::{Error, Result};
use crate::search::engine::{self, FindQuery};
use crate::session::edit;
use crate::tree::index::{NoteIndex, Target, Tree, ROOT_KEY};
use crate::tree::render::{render, IdMap, Ident, RenderOptions, SortPolicy, TagJoin};
use crate::ui::format::wrap;
use regex::Regex;

/// Which tree the outline is generated from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    Path,
    Tags,
}

/// One browsing session: the index, the active view settings and the
/// identifier map of the latest render.
///
/// Every mutating operation (edit/add) is followed by a full rebuild, which
/// bumps the generation and throws away the old identifier map, so a stale
/// identifier can never resolve against a reshuffled display.
#[derive(Debug)]
pub struct BrowserSession {
    config: Config,
    index: NoteIndex,
    mode: ViewMode,
    start: String,
    options: RenderOptions,
    idmap: IdMap,
    generation: u64,
    session_mode: bool,
}

impl BrowserSession {
    /// Build the index under the configured root and open a session on it
    pub fn open(config: Config) -> Result<Self> {
        let index = NoteIndex::build(&config.rootdir, &config)?;
        Ok(Self {
            config,
            index,
            mode: ViewMode::Path,
            start: ROOT_KEY.to_string(),
            options: RenderOptions::default(),
            idmap: IdMap::default(),
            generation: 0,
            session_mode: false,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn index(&self) -> &NoteIndex {
        &self.index
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Wait for spawned editors (interactive sessions) instead of detaching
    pub fn set_session_mode(&mut self, on: bool) {
        self.session_mode = on;
    }

    pub fn set_mode(&mut self, mode: ViewMode) {
        if self.mode != mode {
            self.mode = mode;
            self.start = ROOT_KEY.to_string();
        }
    }

    /// Hide or show note lines; hiding both sides at once is not allowed
    pub fn toggle_show_notes(&mut self) {
        self.options.show_notes = !self.options.show_notes;
        if !self.options.show_notes {
            self.options.show_nodes = true;
        }
    }

    /// Hide or show branch lines; hiding both sides at once is not allowed
    pub fn toggle_show_nodes(&mut self) {
        self.options.show_nodes = !self.options.show_nodes;
        if !self.options.show_nodes {
            self.options.show_notes = true;
        }
    }

    pub fn set_max_depth(&mut self, levels: usize) {
        self.options.max_depth = levels;
    }

    pub fn set_width(&mut self, width: usize) {
        self.options.width = width;
    }

    pub fn set_path_filter(&mut self, filter: Option<Regex>) {
        self.options.path_filter = filter;
    }

    pub fn set_tag_join(&mut self, join: Option<TagJoin>) {
        self.options.tag_join = join;
    }

    fn tree(&self) -> &Tree {
        match self.mode {
            ViewMode::Path => &self.index.path_tree,
            ViewMode::Tags => &self.index.tag_tree,
        }
    }

    fn sort_policy(&self) -> SortPolicy {
        match self.mode {
            ViewMode::Path => SortPolicy::by_name(),
            ViewMode::Tags => SortPolicy::with_overrides(self.config.tag_sort.clone()),
        }
    }

    /// Render the active view, replacing the identifier map
    pub fn render(&mut self) -> Vec<String> {
        let tree = self.tree();
        let start = tree.get(&self.start).unwrap_or(tree.root);
        let (lines, idmap) = render(
            tree,
            start,
            &self.index.rootdir,
            &self.options,
            &self.sort_policy(),
            self.generation,
        );
        self.idmap = idmap;
        lines
    }

    /// Resolve an identifier against the latest render: a node re-roots the
    /// outline, a file shows its wrapped contents, a note shows its text.
    pub fn inspect(&mut self, ident: &str) -> Result<Vec<String>> {
        let ident = Ident::parse(ident)?;
        let target = self
            .idmap
            .resolve(ident)
            .ok_or_else(|| {
                Error::BadIdentifier(format!("{} is not in the current display", ident))
            })?
            .clone();
        match target {
            Target::Node(key) => {
                self.start = key;
                Ok(self.render())
            }
            Target::File(path) => {
                let content = std::fs::read_to_string(&path)?;
                let width = self.options.width.saturating_sub(4);
                Ok(content.lines().flat_map(|l| wrap(l, width, "  ")).collect())
            }
            Target::Note(key) => {
                let lines = self
                    .index
                    .note_details
                    .get(&key)
                    .ok_or_else(|| {
                        Error::BadIdentifier(format!("{} refers to a vanished note", ident))
                    })?;
                let width = self.options.width.saturating_sub(4);
                let mut out = vec![lines[0].clone()];
                out.extend(lines[1..].iter().flat_map(|l| wrap(l, width, "  ")));
                Ok(out)
            }
        }
    }

    /// Full-text search over the indexed notes, in latest-render order
    pub fn find(&mut self, query: &FindQuery) -> Vec<String> {
        if self.idmap.is_empty() {
            self.render();
        }
        engine::find(
            &self.index,
            &self.idmap,
            query,
            self.options.width,
            &self.config.find_marker,
        )
    }

    /// Open the note or file behind `ident` in the editor, then rebuild
    pub fn edit(&mut self, ident: &str) -> Result<String> {
        let ident = Ident::parse(ident)?;
        let message = edit::edit(&self.config, &self.idmap, ident, self.session_mode)?;
        self.rebuild()?;
        Ok(message)
    }

    /// Add a child or append a note under `ident`, then rebuild
    pub fn add(&mut self, ident: &str, child: Option<&str>) -> Result<String> {
        let ident = Ident::parse(ident)?;
        let message = edit::add(
            &self.config,
            &self.index,
            &self.idmap,
            ident,
            child,
            self.mode == ViewMode::Path,
            self.session_mode,
        )?;
        self.rebuild()?;
        Ok(message)
    }

    /// Rescan the root from disk. Both trees and the note-details map are
    /// replaced together; the old identifier map is invalidated.
    pub fn rebuild(&mut self) -> Result<()> {
        self.index = NoteIndex::build(&self.config.rootdir, &self.config)?;
        self.generation += 1;
        self.idmap = IdMap::default();
        if self.tree().get(&self.start).is_none() {
            self.start = ROOT_KEY.to_string();
        }
        Ok(())
    }
}
