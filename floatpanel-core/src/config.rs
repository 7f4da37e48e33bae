//! # Configuration management for Floatpanel Core
//!
//! This module handles loading, saving and validating floatpanel settings.
//! Settings live in a TOML file, by default
//! `<config dir>/floatpanel/config.toml`; every section and field is optional
//! and falls back to its default.
//!
//! ```toml
//! [panel]
//! identity = "inspector"
//! title = "Inspector"
//! draggable = true
//! resizable = true
//!
//! [logging]
//! level = "debug"
//! ```
//!
//! Hosts that configure panels through string attributes (markup, CLI flags)
//! go through [`PanelOption`], an explicit list of the recognised options with
//! typed values.

use crate::drag::DragSizing;
use crate::resize::{MIN_HEIGHT, MIN_WIDTH};
use crate::store::Length;
use crate::{Error, Result};
use floatpanel_api::Size;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Log levels accepted by [`LoggingConfig::level`].
pub const LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

/// Main configuration structure for Floatpanel.
///
/// # Example
///
/// ```rust
/// use floatpanel_core::Config;
///
/// let config = Config::default();
/// assert_eq!(config.panel.width, 400.0);
/// assert_eq!(config.panel.height, 300.0);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Panel behaviour and initial geometry
    pub panel: PanelConfig,
    /// Where geometry is persisted
    pub storage: StorageConfig,
    /// Logging settings
    pub logging: LoggingConfig,
}

/// Per-panel settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelConfig {
    /// Explicit identity used to namespace persisted geometry
    pub identity: Option<String>,
    /// Title shown in the panel header
    pub title: String,
    /// Initial width when nothing is persisted
    pub width: f32,
    /// Initial height when nothing is persisted
    pub height: f32,
    /// Resize floor for the width
    pub min_width: f32,
    /// Resize floor for the height
    pub min_height: f32,
    /// Whether the header starts drag gestures
    pub draggable: bool,
    /// Whether the resize handle is active
    pub resizable: bool,
    /// Whether the header shows a close button
    pub show_close: bool,
    /// Opacity applied while the visual drag cue is on
    pub drag_opacity: f32,
    /// Element size used when clamping a drag
    pub drag_sizing: DragSizing,
}

/// Storage settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// State file path; `None` uses the platform data directory
    pub path: Option<PathBuf>,
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    pub level: String,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            identity: None,
            title: "Panel Component".to_string(),
            width: 400.0,
            height: 300.0,
            min_width: MIN_WIDTH,
            min_height: MIN_HEIGHT,
            draggable: false,
            resizable: false,
            show_close: false,
            drag_opacity: 0.7,
            drag_sizing: DragSizing::Live,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl PanelConfig {
    /// Initial size used when no size was persisted.
    pub fn default_size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn min_size(&self) -> Size {
        Size::new(self.min_width, self.min_height)
    }

    /// Apply a typed option.
    ///
    /// # Example
    ///
    /// ```rust
    /// use floatpanel_core::config::{PanelConfig, PanelOption};
    ///
    /// let mut panel = PanelConfig::default();
    /// panel.apply(PanelOption::Draggable(true));
    /// panel.apply(PanelOption::Title("Layers".to_string()));
    /// assert!(panel.draggable);
    /// assert_eq!(panel.title, "Layers");
    /// ```
    pub fn apply(&mut self, option: PanelOption) {
        match option {
            PanelOption::Title(title) => self.title = title,
            PanelOption::ShowClose(show) => self.show_close = show,
            PanelOption::Resizable(resizable) => self.resizable = resizable,
            PanelOption::Draggable(draggable) => self.draggable = draggable,
            PanelOption::Width(width) => self.width = width.max(self.min_width),
            PanelOption::Height(height) => self.height = height.max(self.min_height),
            PanelOption::Identity(identity) => self.identity = identity,
        }
    }
}

/// A recognised panel option with its typed value.
#[derive(Debug, Clone, PartialEq)]
pub enum PanelOption {
    Title(String),
    ShowClose(bool),
    Resizable(bool),
    Draggable(bool),
    Width(f32),
    Height(f32),
    Identity(Option<String>),
}

impl PanelOption {
    /// Attribute names understood by [`parse`](Self::parse).
    pub const ATTRIBUTES: [&'static str; 7] = [
        "title",
        "show-close",
        "resizable",
        "draggable",
        "width",
        "height",
        "id",
    ];

    /// Map an attribute name and raw value to a typed option.
    ///
    /// `value` is `None` when the attribute was removed. Returns `None` for
    /// unknown names and for sizes that are not valid pixel lengths.
    ///
    /// # Example
    ///
    /// ```rust
    /// use floatpanel_core::config::PanelOption;
    ///
    /// assert_eq!(PanelOption::parse("show-close", Some("")), Some(PanelOption::ShowClose(true)));
    /// assert_eq!(PanelOption::parse("draggable", Some("false")), Some(PanelOption::Draggable(false)));
    /// assert_eq!(PanelOption::parse("width", Some("520px")), Some(PanelOption::Width(520.0)));
    /// assert_eq!(PanelOption::parse("colour", Some("red")), None);
    /// ```
    pub fn parse(name: &str, value: Option<&str>) -> Option<Self> {
        let defaults = PanelConfig::default();
        let option = match name {
            "title" => Self::Title(value.map_or(defaults.title, str::to_string)),
            "show-close" => Self::ShowClose(parse_flag(value)),
            "resizable" => Self::Resizable(parse_flag(value)),
            "draggable" => Self::Draggable(parse_flag(value)),
            "width" => Self::Width(parse_size(value, defaults.width)?),
            "height" => Self::Height(parse_size(value, defaults.height)?),
            "id" => Self::Identity(value.filter(|id| !id.is_empty()).map(str::to_string)),
            _ => {
                debug!("Ignoring unknown panel attribute '{}'", name);
                return None;
            }
        };
        Some(option)
    }

    pub fn attribute_name(&self) -> &'static str {
        match self {
            Self::Title(_) => "title",
            Self::ShowClose(_) => "show-close",
            Self::Resizable(_) => "resizable",
            Self::Draggable(_) => "draggable",
            Self::Width(_) => "width",
            Self::Height(_) => "height",
            Self::Identity(_) => "id",
        }
    }
}

/// Presence semantics: a present attribute is on unless it says `"false"`,
/// so `""`, `"true"` and the attribute's own name all enable it.
fn parse_flag(value: Option<&str>) -> bool {
    match value {
        None => false,
        Some(v) => !v.trim().eq_ignore_ascii_case("false"),
    }
}

fn parse_size(value: Option<&str>, default: f32) -> Option<f32> {
    match value {
        None => Some(default),
        Some(raw) => match raw.parse::<Length>() {
            Ok(length) => Some(length.value()),
            Err(e) => {
                debug!("Ignoring size attribute: {}", e);
                None
            }
        },
    }
}

impl Config {
    /// Load configuration from the default location or fall back to defaults.
    ///
    /// Unlike [`load`](Self::load) this never fails; a missing or invalid
    /// file yields [`Config::default`].
    pub fn load_or_default() -> Self {
        match Self::load() {
            Ok(config) => config,
            Err(e) if e.is_io() => {
                debug!("Using default configuration: {}", e);
                Self::default()
            }
            Err(e) => {
                warn!("Ignoring unusable configuration file: {}", e);
                Self::default()
            }
        }
    }

    /// Load configuration from the default config file.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be located, read or parsed,
    /// or if it fails validation.
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path()?;
        Self::load_from_file(&config_path)
    }

    /// Load configuration from a specific file.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use floatpanel_core::Config;
    /// use std::path::Path;
    ///
    /// let config = Config::load_from_file(Path::new("floatpanel.toml"))?;
    /// # Ok::<(), floatpanel_core::Error>(())
    /// ```
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a specific file, creating parent directories.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.validate()?;

        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::config(format!("Failed to serialize config: {}", e)))?;

        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;

        Ok(())
    }

    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns a validation error naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        let panel = &self.panel;

        if !(panel.min_width > 0.0 && panel.min_height > 0.0) {
            return Err(Error::validation(
                "panel.min_size",
                "Minimum width and height must be positive",
            ));
        }

        if !(panel.width >= panel.min_width) {
            return Err(Error::validation(
                "panel.width",
                "Width must be at least min_width",
            ));
        }

        if !(panel.height >= panel.min_height) {
            return Err(Error::validation(
                "panel.height",
                "Height must be at least min_height",
            ));
        }

        if !(0.0..=1.0).contains(&panel.drag_opacity) {
            return Err(Error::validation(
                "panel.drag_opacity",
                "Drag opacity must be between 0.0 and 1.0",
            ));
        }

        if !LOG_LEVELS.contains(&self.logging.level.as_str()) {
            return Err(Error::validation(
                "logging.level",
                "Log level must be one of: error, warn, info, debug, trace",
            ));
        }

        Ok(())
    }

    /// Get the default configuration file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the config directory cannot be determined.
    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| Error::config("Could not determine config directory"))?
            .join("floatpanel");

        Ok(config_dir.join("config.toml"))
    }
}
