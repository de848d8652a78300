use std::path::{Path, PathBuf};

use tracing::info;

use crate::extraction::DocumentFormat;

/// Resume files directly inside `dir`: `.pdf` / `.docx` (any case), no
/// dotfiles, sorted by path so batch order is stable.
pub fn discover_resumes(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        if name.starts_with('.') || DocumentFormat::from_path(&path).is_none() {
            info!("Skipping unsupported or hidden file: {name}");
            continue;
        }
        files.push(path);
    }
    files.sort();
    Ok(files)
}
