// Core functionality
pub mod core {
    pub mod config;
    pub mod error;
}

// Indexing pipeline
pub mod indexing {
    pub mod discovery;
    pub mod parser;
}

// Tree indices & view generation
pub mod tree {
    pub mod index;
    pub mod render;
}

// Search predicates
pub mod search {
    pub mod engine;
}

// Browser session & mutating operations
pub mod session {
    pub mod edit;
    pub mod state;
}

// User interface plumbing
pub mod ui {
    pub mod cli;
    pub mod format;
    pub mod pager;
}

// Re-export commonly used types
pub use crate::core::config::Config;
pub use crate::core::error::{Error, Result};
pub use indexing::discovery::{discover, DiscoveredEntry};
pub use indexing::parser::{parse_notes, Note};
pub use search::engine::{parse_find, parse_get, parse_join, FindQuery};
pub use session::state::{BrowserSession, ViewMode};
pub use tree::index::{NoteIndex, NoteKey, NoteSummary, Target, Tree};
pub use tree::render::{render, IdMap, Ident, JoinMode, RenderOptions, SortPolicy, TagJoin};
pub use ui::cli::Cli;
pub use ui::pager::Pager;
