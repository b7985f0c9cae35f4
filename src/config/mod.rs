//! Persistent preferences

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::core::PIPELINE_ATTRIBUTE;
use crate::util::Result;

/// A named root folder searched for published look files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchPath {
    pub name: String,
    pub file_path: PathBuf,
    /// Added from a project path template rather than by hand.
    #[serde(default)]
    pub from_template: bool,
}

impl SearchPath {
    pub fn new(name: &str, file_path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.to_string(),
            file_path: file_path.into(),
            from_template: false,
        }
    }
}

/// Preferences that persist between sessions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    // Metadata
    pub pipeline_attribute_name: String,

    // Library filters
    pub material_filter: String,
    pub task_filter: String,
    pub ignore_filter: String,

    // Look file search roots
    pub paths: Vec<SearchPath>,

    // Logging
    pub debug_mode: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            pipeline_attribute_name: PIPELINE_ATTRIBUTE.to_string(),
            material_filter: String::new(),
            task_filter: "3d_look".to_string(),
            ignore_filter: "Dots Stroke".to_string(),
            paths: Vec::new(),
            debug_mode: false,
        }
    }
}

impl Preferences {
    /// Get preferences file path
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|mut p| {
            p.push("look-assigner");
            p.push("preferences.json");
            p
        })
    }

    /// Load preferences, falling back to defaults
    pub fn load() -> Self {
        Self::path()
            .and_then(|p| Self::load_from(&p).ok())
            .unwrap_or_default()
    }

    /// Load preferences from a specific file
    pub fn load_from(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let mut prefs: Self = serde_json::from_str(&text)?;

        // An emptied attribute name would make every shader look standard.
        if prefs.pipeline_attribute_name.trim().is_empty() {
            prefs.pipeline_attribute_name = PIPELINE_ATTRIBUTE.to_string();
        }

        Ok(prefs)
    }

    /// Save preferences to the default location
    pub fn save(&self) -> Result<()> {
        match Self::path() {
            Some(path) => self.save_to(&path),
            None => Ok(()),
        }
    }

    /// Save preferences to a specific file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Ignore filter split into lower-cased, trimmed names
    pub fn ignore_list(&self) -> Vec<String> {
        self.ignore_filter
            .to_lowercase()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }

    /// Look up a search path by name
    pub fn search_path(&self, name: &str) -> Option<&SearchPath> {
        self.paths.iter().find(|p| p.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let prefs = Preferences::default();
        assert_eq!(prefs.pipeline_attribute_name, "LOOK_ASSIGNER_NODE_LIST");
        assert_eq!(prefs.task_filter, "3d_look");
        assert_eq!(prefs.ignore_list(), ["dots stroke"]);
        assert!(!prefs.debug_mode);
    }

    #[test]
    fn test_ignore_list_split() {
        let prefs = Preferences {
            ignore_filter: " Dots Stroke, Preview_MAT ,,".to_string(),
            ..Default::default()
        };
        assert_eq!(prefs.ignore_list(), ["dots stroke", "preview_mat"]);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preferences.json");
        std::fs::write(&path, r#"{ "material_filter": "skin", "pipeline_attribute_name": "" }"#).unwrap();

        let prefs = Preferences::load_from(&path).unwrap();
        assert_eq!(prefs.material_filter, "skin");
        assert_eq!(prefs.pipeline_attribute_name, PIPELINE_ATTRIBUTE);
        assert_eq!(prefs.task_filter, "3d_look");
    }

    #[test]
    fn test_save_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("preferences.json");

        let mut prefs = Preferences::default();
        prefs.paths.push(SearchPath::new("assets", "/projects/show/assets"));
        prefs.debug_mode = true;
        prefs.save_to(&path).unwrap();

        assert_eq!(Preferences::load_from(&path).unwrap(), prefs);
    }
}
