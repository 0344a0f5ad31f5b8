//! Persisted settings
//!
//! Editor interaction tunables and export defaults, persisted together as a
//! single JSON file in the host's app data directory.

use crate::Result;
use diagram_model::{Paint, ShapeColor};
use edit_engine::EditorSettings;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Everything stored in the settings file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct AppSettings {
    /// Pointer and keyboard interaction
    pub editor: EditorSettings,
    /// Export defaults
    pub export: ExportSettings,
}

/// Export defaults
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct ExportSettings {
    /// Margin around the drawing in SVG output, in canvas units
    pub svg_padding: f64,
    /// Slide width in EMU (16:9 widescreen by default)
    pub slide_width_emu: i64,
    /// Slide height in EMU
    pub slide_height_emu: i64,
    /// Raster pixel ratio, 1 or 2
    pub pixel_ratio: f64,
    /// JPEG quality, 1-100
    pub jpeg_quality: u8,
    /// Pixel ratio of the stored thumbnail
    pub thumbnail_ratio: f64,
    /// Used to flatten JPEG output when the canvas background is transparent
    pub jpeg_background: Paint,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            svg_padding: 20.0,
            slide_width_emu: 12_192_000,
            slide_height_emu: 6_858_000,
            pixel_ratio: 1.0,
            jpeg_quality: 90,
            thumbnail_ratio: 0.25,
            jpeg_background: Paint::from_color(ShapeColor::WHITE),
        }
    }
}

impl ExportSettings {
    /// Pixel ratio snapped to the supported 1x/2x
    pub fn raster_ratio(&self) -> f64 {
        if self.pixel_ratio >= 1.5 {
            2.0
        } else {
            1.0
        }
    }

    pub fn jpeg_quality(&self) -> u8 {
        self.jpeg_quality.clamp(1, 100)
    }
}

/// File name of the persisted settings inside the app data directory
pub const SETTINGS_FILE: &str = "settings.json";

/// Owns the cached [`AppSettings`] and the JSON file behind them
#[derive(Debug)]
pub struct SettingsManager {
    path: PathBuf,
    current: AppSettings,
}

impl SettingsManager {
    pub fn new(app_data_dir: impl AsRef<Path>) -> Self {
        Self {
            path: app_data_dir.as_ref().join(SETTINGS_FILE),
            current: AppSettings::default(),
        }
    }

    pub fn settings_path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self) -> &AppSettings {
        &self.current
    }

    pub fn export_settings(&self) -> &ExportSettings {
        &self.current.export
    }

    /// Read the file if present. A missing file leaves defaults in place and
    /// is not written back.
    pub async fn load(&mut self) -> Result<&AppSettings> {
        let content = match tokio::fs::try_exists(&self.path).await? {
            true => Some(tokio::fs::read_to_string(&self.path).await?),
            false => None,
        };
        Ok(self.replace_from(content))
    }

    pub fn load_sync(&mut self) -> Result<&AppSettings> {
        let content = match self.path.exists() {
            true => Some(std::fs::read_to_string(&self.path)?),
            false => None,
        };
        Ok(self.replace_from(content))
    }

    pub async fn save(&self) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            tokio::fs::create_dir_all(dir).await?;
        }
        tokio::fs::write(&self.path, self.to_json()?).await?;
        tracing::debug!("Saved settings to {}", self.path.display());
        Ok(())
    }

    pub fn save_sync(&self) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        std::fs::write(&self.path, self.to_json()?)?;
        tracing::debug!("Saved settings to {}", self.path.display());
        Ok(())
    }

    pub async fn update(&mut self, settings: AppSettings) -> Result<()> {
        self.current = settings;
        self.save().await
    }

    pub fn update_sync(&mut self, settings: AppSettings) -> Result<()> {
        self.current = settings;
        self.save_sync()
    }

    /// Replace only the export section and persist
    pub fn set_export_sync(&mut self, export: ExportSettings) -> Result<()> {
        self.current.export = export;
        self.save_sync()
    }

    pub fn reset_sync(&mut self) -> Result<&AppSettings> {
        self.current = AppSettings::default();
        self.save_sync()?;
        Ok(&self.current)
    }

    fn replace_from(&mut self, content: Option<String>) -> &AppSettings {
        self.current = content.as_deref().map(parse_or_default).unwrap_or_default();
        &self.current
    }

    fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.current)?)
    }
}

fn parse_or_default(content: &str) -> AppSettings {
    serde_json::from_str(content).unwrap_or_else(|e| {
        tracing::warn!("Unreadable settings file, falling back to defaults: {}", e);
        AppSettings::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let settings = AppSettings::default();
        assert_eq!(settings.editor.nudge_step, 1.0);
        assert_eq!(settings.editor.nudge_step_large, 10.0);
        assert_eq!(settings.export.svg_padding, 20.0);
        assert_eq!(settings.export.slide_width_emu, 12_192_000);
        assert_eq!(settings.export.slide_height_emu, 6_858_000);
        assert_eq!(settings.export.jpeg_quality, 90);
        assert_eq!(settings.export.thumbnail_ratio, 0.25);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let settings: AppSettings =
            serde_json::from_str(r#"{"export":{"svgPadding":5}}"#).unwrap();
        assert_eq!(settings.export.svg_padding, 5.0);
        assert_eq!(settings.export.jpeg_quality, 90);
        assert_eq!(settings.editor, EditorSettings::default());
    }

    #[test]
    fn test_raster_ratio_snaps() {
        let mut export = ExportSettings::default();
        assert_eq!(export.raster_ratio(), 1.0);
        export.pixel_ratio = 2.0;
        assert_eq!(export.raster_ratio(), 2.0);
        export.pixel_ratio = 7.0;
        assert_eq!(export.raster_ratio(), 2.0);
        export.jpeg_quality = 0;
        assert_eq!(export.jpeg_quality(), 1);
    }

    #[test]
    fn test_missing_file_is_not_created() {
        let dir = TempDir::new().unwrap();
        let mut manager = SettingsManager::new(dir.path());
        assert_eq!(manager.load_sync().unwrap(), &AppSettings::default());
        assert!(!manager.settings_path().exists());
    }

    #[test]
    fn test_round_trip_through_disk() {
        let dir = TempDir::new().unwrap();
        let mut manager = SettingsManager::new(dir.path());
        let mut changed = AppSettings::default();
        changed.editor.nudge_step_large = 25.0;
        changed.export.pixel_ratio = 2.0;
        manager.update_sync(changed.clone()).unwrap();

        let mut reopened = SettingsManager::new(dir.path());
        assert_eq!(reopened.load_sync().unwrap(), &changed);
    }

    #[test]
    fn test_set_export_keeps_editor_section() {
        let dir = TempDir::new().unwrap();
        let mut manager = SettingsManager::new(dir.path());
        let mut settings = AppSettings::default();
        settings.editor.drag_guard_ms = 40;
        manager.update_sync(settings).unwrap();

        let export = ExportSettings { svg_padding: 4.0, ..Default::default() };
        manager.set_export_sync(export).unwrap();

        let mut reopened = SettingsManager::new(dir.path());
        let loaded = reopened.load_sync().unwrap();
        assert_eq!(loaded.editor.drag_guard_ms, 40);
        assert_eq!(loaded.export.svg_padding, 4.0);
    }

    #[test]
    fn test_corrupt_file_falls_back_to_defaults() {
        let dir = TempDir::new().unwrap();
        let mut manager = SettingsManager::new(dir.path());
        std::fs::write(manager.settings_path(), "{ not json").unwrap();
        assert_eq!(manager.load_sync().unwrap(), &AppSettings::default());
    }

    #[test]
    fn test_reset_overwrites_file() {
        let dir = TempDir::new().unwrap();
        let mut manager = SettingsManager::new(dir.path());
        let mut settings = AppSettings::default();
        settings.export.svg_padding = 0.0;
        manager.update_sync(settings).unwrap();

        assert_eq!(manager.reset_sync().unwrap().export.svg_padding, 20.0);
        let mut reopened = SettingsManager::new(dir.path());
        assert_eq!(reopened.load_sync().unwrap().export.svg_padding, 20.0);
    }

    #[tokio::test]
    async fn test_async_load_and_update() {
        let dir = TempDir::new().unwrap();
        let mut manager = SettingsManager::new(dir.path().join("nested"));
        manager.load().await.unwrap();

        let mut settings = AppSettings::default();
        settings.export.jpeg_quality = 70;
        manager.update(settings).await.unwrap();

        let mut reopened = SettingsManager::new(dir.path().join("nested"));
        assert_eq!(reopened.load().await.unwrap().export.jpeg_quality, 70);
        assert_eq!(reopened.export_settings().jpeg_quality, 70);
    }
}
