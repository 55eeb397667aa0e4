//! Where dogdisk keeps its files, and the config it starts from.
use std::path::PathBuf;

use once_cell::sync::Lazy;

const APP_DIR: &str = "dogdisk";

const DEFAULT_CONFIG: &str = include_str!("../data/config.yml");

static PLATFORM_CONFIG_BASE: Lazy<PathBuf> =
    Lazy::new(|| dirs::config_dir().unwrap_or_else(|| PathBuf::from("~/.config")));

static PLATFORM_DATA_BASE: Lazy<PathBuf> =
    Lazy::new(|| dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("~/.local/share")));

#[derive(Debug, Clone, Copy)]
enum Location {
    Config,
    Data,
}

impl Location {
    fn xdg_var(self) -> &'static str {
        match self {
            Location::Config => "XDG_CONFIG_HOME",
            Location::Data => "XDG_DATA_HOME",
        }
    }

    fn platform_base(self) -> &'static PathBuf {
        match self {
            Location::Config => &PLATFORM_CONFIG_BASE,
            Location::Data => &PLATFORM_DATA_BASE,
        }
    }

    /// `<base>/dogdisk`, where base is the XDG variable when set to something
    /// non-empty and the platform directory otherwise.
    fn resolve(self) -> PathBuf {
        std::env::var_os(self.xdg_var())
            .filter(|base| !base.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| self.platform_base().clone())
            .join(APP_DIR)
    }
}

pub fn get_config_dir() -> PathBuf {
    Location::Config.resolve()
}

/// Data directory, created when missing. Holds the log file.
pub fn get_data_dir() -> std::io::Result<PathBuf> {
    let path = Location::Data.resolve();
    std::fs::create_dir_all(&path)?;
    Ok(path)
}

/// Contents written to a fresh `dogdisk.yml`.
pub fn get_default_config() -> &'static str {
    DEFAULT_CONFIG
}
