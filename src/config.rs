use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum ConfigSortOrder {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum ConfigColorMode {
    Auto,
    Always,
    Never,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct Config {
    #[serde(default)]
    pub(crate) base_url: Option<String>,
    #[serde(default)]
    pub(crate) token: Option<String>,
    #[serde(default)]
    pub(crate) timeout_secs: Option<u64>,
    #[serde(default)]
    pub(crate) no_color: bool,
    #[serde(default)]
    pub(crate) no_generate: bool,
    #[serde(default)]
    pub(crate) debug: bool,
    #[serde(default)]
    pub(crate) order: Option<ConfigSortOrder>,
    #[serde(default)]
    pub(crate) color: Option<ConfigColorMode>,
    #[serde(default)]
    pub(crate) timezone: Option<String>,
    #[serde(default)]
    pub(crate) locale: Option<String>,
}

/// Where the effective config came from
#[derive(Debug)]
pub(crate) enum ConfigOrigin {
    Defaults,
    File(PathBuf),
}

/// A config file that exists but could not be used
#[derive(Debug)]
pub(crate) struct ConfigProblem {
    pub(crate) path: PathBuf,
    pub(crate) error: String,
}

#[derive(Debug)]
pub(crate) struct LoadedConfig {
    pub(crate) config: Config,
    pub(crate) origin: ConfigOrigin,
    pub(crate) problems: Vec<ConfigProblem>,
}

impl Config {
    /// Load the first readable config from the standard locations.
    ///
    /// Nothing is logged here because logging is configured from the result;
    /// the caller reports `origin` and `problems` once it is set up.
    pub(crate) fn load() -> LoadedConfig {
        Self::load_from(&Self::get_config_paths())
    }

    pub(crate) fn load_from(paths: &[PathBuf]) -> LoadedConfig {
        let mut problems = Vec::new();

        for path in paths {
            match Self::read(path) {
                Ok(Some(config)) => {
                    return LoadedConfig {
                        config,
                        origin: ConfigOrigin::File(path.clone()),
                        problems,
                    };
                }
                Ok(None) => {}
                Err(error) => problems.push(ConfigProblem {
                    path: path.clone(),
                    error,
                }),
            }
        }

        LoadedConfig {
            config: Self::default(),
            origin: ConfigOrigin::Defaults,
            problems,
        }
    }

    fn read(path: &Path) -> Result<Option<Config>, String> {
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(path).map_err(|e| e.to_string())?;
        toml::from_str::<Config>(&content)
            .map(Some)
            .map_err(|e| e.to_string())
    }

    fn get_config_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        // 1. XDG config: ~/.config/shopstats/config.toml (Linux/cross-platform)
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".config").join("shopstats").join("config.toml"));
        }

        // 2. Platform config dir (e.g. ~/Library/Application Support/shopstats/config.toml)
        if let Some(config_dir) = dirs::config_dir() {
            let platform_path = config_dir.join("shopstats").join("config.toml");
            if !paths.contains(&platform_path) {
                paths.push(platform_path);
            }
        }

        // 3. Home directory: ~/.shopstats.toml
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".shopstats.toml"));
        }

        paths
    }
}
