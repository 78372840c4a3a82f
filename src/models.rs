//! Model directory resolution.
//!
//! voxnote does not download models; it resolves a model identifier against
//! directories the user has already installed. The identifier may be a path
//! to a model directory, the exact name of a directory under the models
//! root, or a substring that matches exactly one installed model (so
//! `en-us` finds `vosk-model-small-en-us-0.15`).

use crate::error::{Result, VoxnoteError};
use std::path::{Path, PathBuf};

/// Root directory searched for installed models.
///
/// `$VOXNOTE_MODEL_DIR` when set, else `<data_dir>/voxnote/models`
/// (`~/.local/share/voxnote/models` on Linux).
pub fn models_root() -> PathBuf {
    if let Ok(dir) = std::env::var("VOXNOTE_MODEL_DIR")
        && !dir.is_empty()
    {
        return PathBuf::from(dir);
    }
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("voxnote")
        .join("models")
}

/// Names of model directories installed under the given root, sorted.
pub fn list_installed_models(root: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(root)
        .map(|entries| {
            entries
                .filter_map(|entry| entry.ok())
                .filter(|entry| entry.path().is_dir())
                .filter_map(|entry| entry.file_name().into_string().ok())
                .collect()
        })
        .unwrap_or_default();
    names.sort();
    names
}

/// Resolve a model identifier to an on-disk model directory.
///
/// # Errors
/// `ModelLoad` when nothing matches, or when a substring matches more than
/// one installed model.
pub fn resolve_model_dir(model: &str) -> Result<PathBuf> {
    // An existing directory path is used as-is.
    let direct = Path::new(model);
    if direct.is_dir() {
        return Ok(direct.to_path_buf());
    }

    let root = models_root();
    let exact = root.join(model);
    if exact.is_dir() {
        return Ok(exact);
    }

    let installed = list_installed_models(&root);
    let matches: Vec<&String> = installed.iter().filter(|name| name.contains(model)).collect();

    match matches.as_slice() {
        [single] => Ok(root.join(single.as_str())),
        [] => Err(VoxnoteError::ModelLoad {
            model: model.to_string(),
            message: format!("no model directory found under {}", root.display()),
        }),
        several => Err(VoxnoteError::ModelLoad {
            model: model.to_string(),
            message: format!(
                "ambiguous model name, matches: {}",
                several
                    .iter()
                    .map(|s| s.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        }),
    }
}
