//! Search paths and look file discovery.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::config::{Preferences, SearchPath};
use crate::util::{Error, Result};

/// File name of the per-project search path template.
pub const TEMPLATE_FILE: &str = "look_assigner_paths.json";

/// Default extension of published look files.
pub const LOOK_FILE_EXTENSION: &str = "json";

/// Project root from the pipeline environment, if configured.
///
/// Uses `OPENPYPE_PROJECT_ROOT_WORK`/`AVALON_PROJECT` when both are set.
pub fn project_root() -> Option<PathBuf> {
    let root = std::env::var_os("OPENPYPE_PROJECT_ROOT_WORK")?;
    let project = std::env::var_os("AVALON_PROJECT")?;
    Some(PathBuf::from(root).join(project))
}

/// Template location for a project root.
pub fn template_path(project_root: &Path) -> PathBuf {
    project_root.join(TEMPLATE_FILE)
}

/// Merge a `{ "name": "path", ... }` template into `prefs.paths`.
///
/// Paths already configured are skipped. A name that collides with an
/// existing one gets a `_01`, `_02`, ... suffix. A missing template file is
/// not an error. Returns how many entries were added.
pub fn load_template(prefs: &mut Preferences, path: &Path) -> Result<usize> {
    if !path.exists() {
        return Ok(0);
    }

    let text = std::fs::read_to_string(path)?;
    let value: serde_json::Value = serde_json::from_str(&text)?;
    let entries = value
        .as_object()
        .ok_or_else(|| Error::invalid(format!("{}: expected an object of name/path pairs", path.display())))?;

    let mut existing_paths: HashSet<PathBuf> = prefs.paths.iter().map(|p| p.file_path.clone()).collect();
    let mut existing_names: HashSet<String> = prefs.paths.iter().map(|p| p.name.clone()).collect();
    let mut added = 0;

    for (key, value) in entries {
        let Some(file_path) = value.as_str().map(PathBuf::from) else {
            return Err(Error::invalid(format!("{}: path for '{}' is not a string", path.display(), key)));
        };
        if existing_paths.contains(&file_path) {
            continue;
        }

        let name = unique_name(key, &existing_names);
        existing_names.insert(name.clone());
        existing_paths.insert(file_path.clone());
        prefs.paths.push(SearchPath {
            name,
            file_path,
            from_template: true,
        });
        added += 1;
    }

    Ok(added)
}

fn unique_name(base: &str, taken: &HashSet<String>) -> String {
    if !taken.contains(base) {
        return base.to_string();
    }
    (1..)
        .map(|n| format!("{}_{:02}", base, n))
        .find(|candidate| !taken.contains(candidate))
        .unwrap_or_else(|| base.to_string())
}

/// Recursively find files with `extension` under `dir`, sorted by path.
///
/// Hidden files and directories are skipped.
pub fn scan_shader_files(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let walker = WalkDir::new(dir).into_iter().filter_entry(|e| {
        e.depth() == 0 || !e.file_name().to_string_lossy().starts_with('.')
    });

    let mut files = Vec::new();
    for entry in walker {
        let entry = entry.map_err(std::io::Error::from)?;
        let path = entry.path();
        if entry.file_type().is_file()
            && path.extension().and_then(|e| e.to_str()) == Some(extension)
        {
            files.push(path.to_path_buf());
        }
    }

    files.sort();
    Ok(files)
}
