use super::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Configuration for notetree, loaded from a YAML file.
///
/// The editor commands are templates with `{filepath}` and (for edit)
/// `{linenum}` placeholders. Session variants run while the browser waits
/// for them; command variants are spawned and left to run on their own.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Root of the note file hierarchy
    pub rootdir: PathBuf,
    /// Edit command used in session mode
    pub session_edit: String,
    /// Edit command used in command mode
    pub command_edit: String,
    /// Append command used in session mode
    pub session_add: String,
    /// Append command used in command mode
    pub command_add: String,
    /// Overrides for tag ordering in the tags view: tag name -> sort key.
    /// Tags without an entry sort by their own name.
    pub tag_sort: HashMap<String, String>,
    /// Collect notes without tags under a reserved bucket in the tags view
    pub no_tag_bucket: bool,
    /// Name of the no-tag bucket ("~" sorts after every letter)
    pub no_tag_name: String,
    /// Glyph appended to matching lines in find output
    pub find_marker: String,
}

impl Default for Config {
    fn default() -> Self {
        let base = Self::default_base_dir().unwrap_or_else(|_| PathBuf::from(".notetree"));
        Self {
            rootdir: base.join("data"),
            session_edit: "vim -f +{linenum} {filepath}".to_string(),
            command_edit: "vim +{linenum} {filepath}".to_string(),
            session_add: "vim -f + {filepath}".to_string(),
            command_add: "vim + {filepath}".to_string(),
            tag_sort: HashMap::new(),
            no_tag_bucket: true,
            no_tag_name: "~".to_string(),
            find_marker: "▶".to_string(),
        }
    }
}

impl Config {
    /// Get the default configuration directory
    pub fn default_base_dir() -> Result<PathBuf> {
        dirs::home_dir()
            .ok_or_else(|| Error::Config("Could not determine home directory".to_string()))
            .map(|home| home.join(".notetree"))
    }

    /// Path of the default configuration file
    pub fn default_path() -> Result<PathBuf> {
        Self::default_base_dir().map(|base| base.join("config.yaml"))
    }

    /// Load the configuration from `path`, or from the default location when
    /// `path` is `None`. A missing file yields the default configuration; a
    /// present but unparseable file is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::default_path()?,
        };
        if !path.exists() {
            tracing::debug!("no config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(&path)?;
        serde_yaml::from_str(&content)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(Some(&dir.path().join("nope.yaml"))).unwrap();
        assert!(config.no_tag_bucket);
        assert_eq!(config.no_tag_name, "~");
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(
            &path,
            "rootdir: /tmp/notes\ntag_sort:\n  now: '!'\n  completed: '~~'\n",
        )
        .unwrap();
        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.rootdir, PathBuf::from("/tmp/notes"));
        assert_eq!(config.tag_sort.get("now").map(String::as_str), Some("!"));
        assert!(config.command_edit.contains("{filepath}"));
    }

    #[test]
    fn test_bad_yaml_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "rootdir: [not, a, path").unwrap();
        assert!(Config::load(Some(&path)).is_err());
    }
}
