//! # Floatpanel
//!
//! Desktop host for the floatpanel geometry engine. Opens a window containing
//! one floating panel that can be dragged by its header, resized from its
//! bottom-right corner, shown, hidden and reset. Geometry is remembered
//! between runs.
//!
//! ## Usage
//!
//! ```bash
//! # Run with the default configuration
//! floatpanel
//!
//! # Use a specific config file and panel identity
//! floatpanel --config ./floatpanel.toml --identity inspector
//!
//! # Forget the saved geometry before starting
//! floatpanel --reset --debug
//! ```

use anyhow::Context as _;
use clap::{Arg, Command};
use eframe::egui;
use floatpanel_core::{Config, GeometryStore, JsonFileBackend};
use std::path::PathBuf;

mod app;

/// Command line arguments for Floatpanel
#[derive(Debug, Clone)]
pub struct AppArgs {
    /// Configuration file to use instead of the default location
    pub config_path: Option<PathBuf>,
    /// Panel identity, overriding the configured one
    pub identity: Option<String>,
    /// State file, overriding the configured one
    pub state_path: Option<PathBuf>,
    /// Clear saved geometry before mounting
    pub reset: bool,
    /// Enable debug logging
    pub debug: bool,
    /// Window width
    pub width: Option<f32>,
    /// Window height
    pub height: Option<f32>,
}

impl Default for AppArgs {
    fn default() -> Self {
        Self {
            config_path: None,
            identity: None,
            state_path: None,
            reset: false,
            debug: false,
            width: Some(1200.0),
            height: Some(800.0),
        }
    }
}

fn command() -> Command {
    Command::new("Floatpanel")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Floatpanel Team")
        .about("Floating, draggable, resizable panel with persisted geometry")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file to use")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("identity")
                .short('i')
                .long("identity")
                .value_name("ID")
                .help("Panel identity used to namespace saved geometry"),
        )
        .arg(
            Arg::new("state")
                .long("state")
                .value_name("FILE")
                .help("JSON file holding saved geometry")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("reset")
                .long("reset")
                .help("Forget saved geometry before starting")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("debug")
                .short('d')
                .long("debug")
                .help("Enable debug logging")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("width")
                .long("width")
                .value_name("PIXELS")
                .help("Initial window width")
                .value_parser(clap::value_parser!(f32)),
        )
        .arg(
            Arg::new("height")
                .long("height")
                .value_name("PIXELS")
                .help("Initial window height")
                .value_parser(clap::value_parser!(f32)),
        )
}

/// Parse command line arguments
fn parse_args_from<I, T>(args: I) -> Result<AppArgs, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let matches = command().try_get_matches_from(args)?;

    Ok(AppArgs {
        config_path: matches.get_one::<PathBuf>("config").cloned(),
        identity: matches.get_one::<String>("identity").cloned(),
        state_path: matches.get_one::<PathBuf>("state").cloned(),
        reset: matches.get_flag("reset"),
        debug: matches.get_flag("debug"),
        width: matches.get_one::<f32>("width").copied(),
        height: matches.get_one::<f32>("height").copied(),
    })
}

/// Resolve the configuration: explicit file, else default location, then
/// command line overrides.
///
/// Also returns the error that made the default location unusable, if any,
/// so it can be logged once tracing is up.
fn load_config(args: &AppArgs) -> anyhow::Result<(Config, Option<floatpanel_core::Error>)> {
    let (mut config, ignored) = match &args.config_path {
        Some(path) => {
            let config = Config::load_from_file(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?;
            (config, None)
        }
        None => config_or_host_defaults(Config::load()),
    };

    if let Some(identity) = &args.identity {
        config.panel.identity = Some(identity.clone());
    }
    if let Some(path) = &args.state_path {
        config.storage.path = Some(path.clone());
    }
    if args.debug {
        config.logging.level = "debug".to_string();
    }

    Ok((config, ignored))
}

/// Fall back to [`host_defaults`] when the default config file is missing
/// or unusable, handing back the reason.
fn config_or_host_defaults(
    loaded: floatpanel_core::Result<Config>,
) -> (Config, Option<floatpanel_core::Error>) {
    match loaded {
        Ok(config) => (config, None),
        Err(e) => (host_defaults(), Some(e)),
    }
}

/// A missing config file is expected; anything else is worth a warning.
fn log_ignored_config(error: &floatpanel_core::Error) {
    if error.is_io() {
        tracing::debug!("No config file, using host defaults: {}", error);
    } else {
        tracing::warn!("Ignoring unusable config file, using host defaults: {}", error);
    }
}

/// Defaults for the desktop host when no config file exists: every handle
/// enabled so the panel can be moved, resized and closed.
fn host_defaults() -> Config {
    let mut config = Config::default();
    config.panel.draggable = true;
    config.panel.resizable = true;
    config.panel.show_close = true;
    config
}

/// Open the geometry store named by the configuration.
///
/// Falls back to an in-memory store when no data directory is available, in
/// which case geometry only lives as long as the process.
fn open_store(config: &Config) -> GeometryStore {
    let backend = match &config.storage.path {
        Some(path) => Ok(JsonFileBackend::new(path)),
        None => JsonFileBackend::at_default_location(),
    };

    match backend {
        Ok(backend) => {
            tracing::info!("Saving panel geometry to {}", backend.path().display());
            GeometryStore::new(backend)
        }
        Err(e) => {
            tracing::warn!("Geometry will not persist: {}", e);
            GeometryStore::in_memory()
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = parse_args_from(std::env::args_os()).unwrap_or_else(|e| e.exit());
    let (config, ignored) = load_config(&args)?;
    floatpanel_core::init_tracing_with_level(&config.logging.level);
    if let Some(error) = &ignored {
        log_ignored_config(error);
    }

    tracing::info!("Starting Floatpanel v{}", env!("CARGO_PKG_VERSION"));

    let store = open_store(&config);
    if args.reset {
        let identity = floatpanel_core::PanelIdentity::new(config.panel.identity.as_deref());
        tracing::info!("Resetting saved geometry for '{}'", identity);
        store.reset(&identity);
    }

    let defaults = AppArgs::default();
    let window_size = [
        args.width.or(defaults.width).unwrap_or(1200.0),
        args.height.or(defaults.height).unwrap_or(800.0),
    ];
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Floatpanel")
            .with_inner_size(window_size),
        ..Default::default()
    };

    eframe::run_native(
        "Floatpanel",
        options,
        Box::new(move |cc| {
            setup_visuals(&cc.egui_ctx);
            Ok(Box::new(app::FloatpanelApp::new(config, store)))
        }),
    )
    .map_err(|e| anyhow::anyhow!("Application exited with error: {}", e))
}

/// Setup visual theme for the application
fn setup_visuals(ctx: &egui::Context) {
    let mut visuals = egui::Visuals::dark();

    visuals.selection.bg_fill = egui::Color32::from_rgb(64, 112, 192);
    visuals.hyperlink_color = egui::Color32::from_rgb(110, 160, 230);

    ctx.set_visuals(visuals);
}
