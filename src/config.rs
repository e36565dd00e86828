use crate::events::AppEvent;
use crate::store::PersistKey;
use crate::wheel::{Item, parse_items};
use async_channel::Sender;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use directories::ProjectDirs;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use serde::{Deserialize, Serialize};
use serde_with::{DeserializeFromStr, DurationMilliSeconds, serde_as};
use std::path::{Path, PathBuf};
use std::time::Duration;
use strum::{Display as StrumDisplay, EnumIter, EnumString};
use thiserror::Error;

pub const DEFAULT_TITLE: &str = "Wheel of Names";
pub const DEFAULT_SPIN_DURATION: Duration = Duration::from_millis(2500);

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    DeserializeFromStr,
    EnumString,
    EnumIter,
    StrumDisplay,
)]
#[strum(ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum LegendPosition {
    #[default]
    #[strum(serialize = "right", serialize = "r")]
    Right,
    #[strum(serialize = "top", serialize = "t")]
    Top,
}

/// Items may be written as a TOML array or as a single block of text.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum ItemsSource {
    List(Vec<String>),
    Text(String),
}

impl Default for ItemsSource {
    fn default() -> Self {
        Self::List(Vec::new())
    }
}

impl ItemsSource {
    pub fn parse(&self) -> Vec<Item> {
        match self {
            Self::List(entries) => entries.iter().flat_map(|e| parse_items(e)).collect(),
            Self::Text(text) => parse_items(text),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ViewConfig {
    pub size: f64,
    pub show_legend: bool,
    pub legend_position: LegendPosition,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            size: crate::wheel::DEFAULT_WHEEL_SIZE,
            show_legend: true,
            legend_position: LegendPosition::Right,
        }
    }
}

#[serde_as]
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub title: String,
    pub background_url: String,
    pub background_file: Option<PathBuf>,
    pub items: ItemsSource,
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    pub spin_duration: Duration,
    pub persist_key: PersistKey,
    pub view: ViewConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            background_url: String::new(),
            background_file: None,
            items: ItemsSource::default(),
            spin_duration: DEFAULT_SPIN_DURATION,
            persist_key: PersistKey::default(),
            view: ViewConfig::default(),
        }
    }
}

impl Config {
    /// Resolves the file-level settings into the snapshot a wheel session runs on.
    pub fn wheel(&self) -> WheelConfig {
        let background_url = match &self.background_file {
            Some(path) => embed_background(&self.background_url, path),
            None => self.background_url.clone(),
        };

        let spin_duration = if self.spin_duration.is_zero() {
            log::warn!(
                "spin_duration must be positive, using {}ms",
                DEFAULT_SPIN_DURATION.as_millis()
            );
            DEFAULT_SPIN_DURATION
        } else {
            self.spin_duration
        };

        WheelConfig {
            title: self.title.clone(),
            background_url,
            items: self.items.parse(),
            spin_duration,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WheelConfig {
    pub title: String,
    pub background_url: String,
    pub items: Vec<Item>,
    pub spin_duration: Duration,
}

impl Default for WheelConfig {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            background_url: String::new(),
            items: Vec::new(),
            spin_duration: DEFAULT_SPIN_DURATION,
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to determine config directory")]
    ConfigDirNotFound,
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Notify error: {0}")]
    Notify(#[from] notify::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Unsupported image type: {}", .0.display())]
    UnsupportedImage(PathBuf),
}

pub fn get_config_path() -> Result<PathBuf, ConfigError> {
    let proj_dirs = ProjectDirs::from("org", "spinwheel", "spinwheel")
        .ok_or(ConfigError::ConfigDirNotFound)?;
    Ok(proj_dirs.config_dir().join("config.toml"))
}

pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&get_config_path()?)
}

pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let s = config::Config::builder()
        .add_source(config::File::from(path.to_path_buf()).required(false))
        .add_source(
            config::Environment::with_prefix("SPINWHEEL")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    Ok(s.try_deserialize()?)
}

/// Falls back to the built-in defaults when there is no usable config file.
pub fn load_or_default(path: Option<&Path>) -> Config {
    let result = match path {
        Some(p) => load_config_from(p),
        None => load_config(),
    };
    result.unwrap_or_else(|e| {
        log::error!("Failed to load config, using defaults: {}", e);
        Config::default()
    })
}

pub fn write_default_config() -> std::io::Result<PathBuf> {
    let path =
        get_config_path().map_err(|e| std::io::Error::new(std::io::ErrorKind::NotFound, e))?;
    if let Some(parent) = path.parent() {
        fs_err::create_dir_all(parent)?;
    }
    if !path.exists() {
        fs_err::write(&path, DEFAULT_CONFIG)?;
    }
    Ok(path)
}

pub const DEFAULT_CONFIG: &str = include_str!("default_config.toml");

pub fn image_mime(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "webp" => Some("image/webp"),
        "gif" => Some("image/gif"),
        _ => None,
    }
}

pub fn read_file_base64(path: &Path) -> Result<String, ConfigError> {
    let bytes = fs_err::read(path)?;
    Ok(STANDARD.encode(bytes))
}

pub fn image_data_uri(path: &Path) -> Result<String, ConfigError> {
    let mime = image_mime(path).ok_or_else(|| ConfigError::UnsupportedImage(path.to_path_buf()))?;
    Ok(format!("data:{};base64,{}", mime, read_file_base64(path)?))
}

/// Embeds a local image as the background. On failure the current value is kept.
pub fn embed_background(current: &str, path: &Path) -> String {
    image_data_uri(path).unwrap_or_else(|e| {
        log::warn!("Keeping previous background: {}", e);
        current.to_string()
    })
}

fn is_config_change(event: &Event, config_path: &Path) -> bool {
    matches!(
        event.kind,
        EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
    ) && event.paths.iter().any(|p| p == config_path)
}

type WatchResult = Result<Event, notify::Error>;

fn watch_dir(dir: &Path, bridge_tx: Sender<WatchResult>) -> Result<RecommendedWatcher, ConfigError> {
    fs_err::create_dir_all(dir)?;
    let mut watcher = RecommendedWatcher::new(
        move |res| {
            let _ = bridge_tx.send_blocking(res);
        },
        notify::Config::default(),
    )?;
    watcher.watch(dir, RecursiveMode::NonRecursive)?;
    Ok(watcher)
}

/// Emits `ConfigReload` whenever `config_path` is written, created or removed.
pub async fn run_async_watcher(config_path: PathBuf, tx: Sender<AppEvent>) {
    let Some(config_dir) = config_path.parent().map(Path::to_path_buf) else {
        return;
    };

    let (bridge_tx, bridge_rx) = async_channel::unbounded();

    // dropping the watcher stops the notifications
    let _watcher = match watch_dir(&config_dir, bridge_tx) {
        Ok(w) => w,
        Err(e) => {
            log::error!("Failed to watch {}: {}", config_dir.display(), e);
            return;
        }
    };

    while let Ok(res) = bridge_rx.recv().await {
        match res {
            Ok(event) => {
                if is_config_change(&event, &config_path)
                    && tx.send(AppEvent::ConfigReload).await.is_err()
                {
                    break;
                }
            }
            Err(e) => log::error!("Watch error: {}", e),
        }
    }
}
