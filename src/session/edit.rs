use crate::core::config::Config;
use crate::core::error::{Error, Result};
use crate::tree::index::{NoteIndex, Target};
use crate::tree::render::{IdMap, Ident};
use std::path::Path;
use std::process::Command;

/// Expand an editor command template, substituting `{filepath}` and
/// `{linenum}`, and split it into argv words. Whitespace in the path is
/// backslash-escaped before substitution.
pub fn editor_command(template: &str, filepath: &Path, linenum: usize) -> Result<Vec<String>> {
    let escaped = escape_path(filepath);
    let expanded = template
        .replace("{filepath}", &escaped)
        .replace("{linenum}", &linenum.to_string());
    let argv: Vec<String> = expanded
        .split_whitespace()
        .map(str::to_string)
        .collect();
    if argv.is_empty() {
        return Err(Error::Editor(format!("empty editor command: '{}'", template)));
    }
    Ok(argv)
}

fn escape_path(path: &Path) -> String {
    let mut out = String::new();
    for ch in path.to_string_lossy().chars() {
        if ch.is_whitespace() {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

/// Run an expanded editor command. Session mode waits for the editor to
/// exit; command mode spawns it and returns immediately.
fn invoke(argv: &[String], wait: bool) -> Result<()> {
    tracing::debug!("editor command: {:?}", argv);
    let mut command = Command::new(&argv[0]);
    command.args(&argv[1..]);
    if wait {
        let status = command
            .status()
            .map_err(|e| Error::Editor(format!("failed to run {}: {}", argv[0], e)))?;
        if !status.success() {
            return Err(Error::Editor(format!("{} exited with {}", argv[0], status)));
        }
    } else {
        command
            .spawn()
            .map_err(|e| Error::Editor(format!("failed to spawn {}: {}", argv[0], e)))?;
    }
    Ok(())
}

/// Open the file behind `ident` for editing; notes are opened at their
/// header line. Only file and note identifiers can be edited.
pub fn edit(config: &Config, idmap: &IdMap, ident: Ident, session_mode: bool) -> Result<String> {
    let target = idmap
        .resolve(ident)
        .ok_or_else(|| Error::BadIdentifier(format!("{} is not in the current display", ident)))?;
    let (filepath, linenum) = match target {
        Target::File(path) => (path.clone(), 0),
        // 1-based editor line of the note header
        Target::Note(key) => (key.file.clone(), key.line + 1),
        Target::Node(key) => {
            return Err(Error::BadIdentifier(format!(
                "{} ({}) is not a file or note",
                ident, key
            )))
        }
    };
    if !filepath.is_file() {
        return Err(Error::Editor(format!(
            "file no longer exists: {}",
            filepath.display()
        )));
    }
    let template = if session_mode {
        &config.session_edit
    } else {
        &config.command_edit
    };
    let argv = editor_command(template, &filepath, linenum)?;
    invoke(&argv, session_mode)?;
    Ok(format!("editing {}", filepath.display()))
}

/// Add under `ident`: append to the file behind a file/note identifier, or
/// create a child (subdirectory, or `.txt` file opened for editing) under a
/// directory identifier. Directory adds require the path view and a child
/// name. Callers must rebuild the index afterwards.
pub fn add(
    config: &Config,
    index: &NoteIndex,
    idmap: &IdMap,
    ident: Ident,
    child: Option<&str>,
    in_path_view: bool,
    session_mode: bool,
) -> Result<String> {
    let target = idmap
        .resolve(ident)
        .ok_or_else(|| Error::BadIdentifier(format!("{} is not in the current display", ident)))?;
    let template = if session_mode {
        &config.session_add
    } else {
        &config.command_add
    };
    match target {
        Target::File(path) => {
            if !path.is_file() {
                return Err(Error::Editor(format!(
                    "file no longer exists: {}",
                    path.display()
                )));
            }
            invoke(&editor_command(template, path, 0)?, session_mode)?;
            Ok(format!("appending to {}", path.display()))
        }
        Target::Note(key) => {
            if !key.file.is_file() {
                return Err(Error::Editor(format!(
                    "file no longer exists: {}",
                    key.file.display()
                )));
            }
            invoke(&editor_command(template, &key.file, 0)?, session_mode)?;
            Ok(format!("appending to {}", key.file.display()))
        }
        Target::Node(key) => {
            if !in_path_view {
                return Err(Error::AddRejected(
                    "adding under a node requires the path view".to_string(),
                ));
            }
            let dir = index.dir_path(key);
            if !dir.is_dir() {
                return Err(Error::AddRejected(format!(
                    "not a directory: {}",
                    dir.display()
                )));
            }
            let name = child
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .ok_or_else(|| Error::AddRejected("no child name given".to_string()))?;
            let child_path = dir.join(name);
            match child_path.extension().and_then(|e| e.to_str()) {
                Some("txt") => {
                    invoke(&editor_command(template, &child_path, 0)?, session_mode)?;
                    Ok(format!("created note file {}", child_path.display()))
                }
                Some(ext) => Err(Error::AddRejected(format!(
                    "bad file extension '.{}'; '.txt' is required",
                    ext
                ))),
                None => {
                    if child_path.exists() {
                        return Err(Error::AddRejected(format!(
                            "'{}' already exists",
                            child_path.display()
                        )));
                    }
                    std::fs::create_dir(&child_path)?;
                    Ok(format!("created directory {}", child_path.display()))
                }
            }
        }
    }
}
