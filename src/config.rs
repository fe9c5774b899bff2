//! Figure defaults loaded from JSON.
//!
//! Every field is optional in the file; missing fields take the built-in
//! defaults, so an empty object `{}` is a valid configuration.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

// ============================================================================
// Publication preset
// ============================================================================

/// Settings applied by `Figure::set_publication`
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct PublicationConfig {
    #[serde(default = "default_publication_dpi")]
    pub dpi: u32,
    #[serde(default = "default_publication_label_size")]
    pub label_size: u32,
    /// Appended to the file name
    #[serde(default = "default_publication_suffix")]
    pub suffix: String,
}

fn default_publication_dpi() -> u32 { 300 }
fn default_publication_label_size() -> u32 { 18 }
fn default_publication_suffix() -> String { "_pub".to_string() }

impl Default for PublicationConfig {
    fn default() -> Self {
        Self {
            dpi: default_publication_dpi(),
            label_size: default_publication_label_size(),
            suffix: default_publication_suffix(),
        }
    }
}

// ============================================================================
// Plot configuration
// ============================================================================

/// Defaults for new figures
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct PlotConfig {
    #[serde(default = "default_dpi")]
    pub dpi: u32,
    #[serde(default = "default_save_dir")]
    pub save_dir: String,
    #[serde(default = "default_file_name")]
    pub file_name: String,
    /// `.png` or `.tif`
    #[serde(default = "default_file_type")]
    pub file_type: String,
    /// Font size of axis labels, in points
    #[serde(default = "default_label_size")]
    pub label_size: u32,
    /// Marker codes assigned to isolation values in order
    #[serde(default = "default_markers")]
    pub markers: Vec<String>,
    /// `tab10` or `coolwarm`
    #[serde(default = "default_colormap")]
    pub colormap: String,
    /// TrueType font used for text; system fonts are searched when unset
    #[serde(default)]
    pub font_path: Option<PathBuf>,
    #[serde(default)]
    pub publication: PublicationConfig,
}

fn default_dpi() -> u32 { 200 }
fn default_save_dir() -> String { "./".to_string() }
fn default_file_name() -> String { "figure".to_string() }
fn default_file_type() -> String { ".png".to_string() }
fn default_label_size() -> u32 { 12 }
fn default_colormap() -> String { "tab10".to_string() }

fn default_markers() -> Vec<String> {
    ["D", "^", "v", "<", "o", "s", "p", "*"]
        .iter()
        .map(|m| m.to_string())
        .collect()
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            dpi: default_dpi(),
            save_dir: default_save_dir(),
            file_name: default_file_name(),
            file_type: default_file_type(),
            label_size: default_label_size(),
            markers: default_markers(),
            colormap: default_colormap(),
            font_path: None,
            publication: PublicationConfig::default(),
        }
    }
}

impl PlotConfig {
    /// Load plot configuration from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Failed to open plot config {}", path.display()))?;
        let reader = BufReader::new(file);
        let config: PlotConfig = serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse plot config {}", path.display()))?;
        Ok(config)
    }

    /// Parse plot configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse plot config")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_uses_defaults() {
        let config = PlotConfig::from_json("{}").unwrap();
        assert_eq!(config, PlotConfig::default());
        assert_eq!(config.dpi, 200);
        assert_eq!(config.markers.len(), 8);
        assert_eq!(config.publication.dpi, 300);
    }

    #[test]
    fn test_partial_override() {
        let config = PlotConfig::from_json(
            r#"{"dpi": 150, "colormap": "coolwarm", "publication": {"label_size": 20}}"#,
        )
        .unwrap();
        assert_eq!(config.dpi, 150);
        assert_eq!(config.colormap, "coolwarm");
        assert_eq!(config.publication.label_size, 20);
        assert_eq!(config.publication.dpi, 300);
        assert_eq!(config.file_name, "figure");
    }

    #[test]
    fn test_load_missing_file_has_context() {
        let err = PlotConfig::load("/nonexistent/plotfig.json").unwrap_err();
        assert!(err.to_string().contains("Failed to open plot config"));
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("plotfig-config-{}.json", std::process::id()));
        std::fs::write(&path, r#"{"file_type": ".tif", "save_dir": "out/"}"#).unwrap();
        let config = PlotConfig::load(&path).unwrap();
        assert_eq!(config.file_type, ".tif");
        assert_eq!(config.save_dir, "out/");
        let _ = std::fs::remove_file(&path);
    }
}
