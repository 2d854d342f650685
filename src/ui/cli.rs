use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// notetree - browse tagged plain-text notes as an outline
#[derive(Parser, Debug)]
#[command(name = "notetree")]
#[command(about = "A terminal outline browser for tagged plain-text notes", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Root of the note file hierarchy (overrides the configuration)
    #[arg(short, long)]
    pub root: Option<PathBuf>,

    /// Configuration file (default: ~/.notetree/config.yaml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// View to display
    #[arg(short, long, value_enum, default_value_t = View::Path)]
    pub view: View,

    /// Display at most MAX levels of the outline (0 shows all levels)
    #[arg(short, long, value_name = "MAX", default_value_t = 0)]
    pub max: usize,

    /// Suppress notes in the outline
    #[arg(short = 'n', long)]
    pub hide_notes: bool,

    /// Suppress nodes in the outline, i.e. display only the notes
    #[arg(short = 'N', long)]
    pub hide_nodes: bool,

    /// Show notes containing a match for REGEX ('!' prefix hides markers)
    #[arg(short, long, value_name = "REGEX")]
    pub find: Option<String>,

    /// Limit the outline to branches whose path matches REGEX
    #[arg(short, long, value_name = "REGEX")]
    pub get: Option<String>,

    /// Limit notes to those whose tags satisfy the join ('&' all, '|' any)
    #[arg(short, long, value_name = "JOIN")]
    pub join: Option<String>,

    /// Inspect the node or note corresponding to IDENT
    #[arg(short, long, value_name = "IDENT")]
    pub id: Option<String>,

    /// Open the note or file corresponding to IDENT in the editor
    #[arg(short, long, value_name = "IDENT")]
    pub edit: Option<String>,

    /// Add under IDENT; for directories give "IDENT NAME"
    #[arg(short, long, value_name = "IDENT [NAME]")]
    pub add: Option<String>,

    /// Display width in columns (default: terminal width)
    #[arg(short, long)]
    pub width: Option<usize>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Outline mirroring the directory hierarchy
    #[value(alias = "p")]
    Path,
    /// Two-level outline grouping notes by tag
    #[value(alias = "t")]
    Tags,
}
