use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use roundmark_parser::{Flavor, ParserOptions};
use serde::Deserialize;

/// Per-extension overrides on top of the flavor defaults. Unset fields
/// keep whatever the flavor enables.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Extensions {
    pub strikethrough: Option<bool>,
    pub extended_autolinks: Option<bool>,
    pub task_list_items: Option<bool>,
    pub disallowed_raw_html: Option<bool>,
}

impl Extensions {
    fn apply(&self, mut options: ParserOptions) -> ParserOptions {
        if let Some(enabled) = self.strikethrough {
            options.strikethrough = enabled;
        }
        if let Some(enabled) = self.extended_autolinks {
            options.extended_autolinks = enabled;
        }
        if let Some(enabled) = self.task_list_items {
            options.task_list_items = enabled;
        }
        if let Some(enabled) = self.disallowed_raw_html {
            options.disallowed_raw_html = enabled;
        }
        options
    }
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LintConfig {
    /// Rule ids (`MD039`) or names (`no-space-in-links`) to skip.
    pub disable: Vec<String>,
}

impl LintConfig {
    pub fn is_disabled(&self, id: &str, name: &str) -> bool {
        self.disable
            .iter()
            .any(|rule| rule.eq_ignore_ascii_case(id) || rule == name)
    }
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub flavor: Flavor,
    pub extensions: Extensions,
    pub lint: LintConfig,
}

impl Config {
    pub fn parser_options(&self) -> ParserOptions {
        self.extensions
            .apply(ParserOptions::for_flavor(self.flavor))
    }
}

#[derive(Default, Clone)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn flavor(mut self, flavor: Flavor) -> Self {
        self.config.flavor = flavor;
        self
    }

    pub fn strikethrough(mut self, enabled: bool) -> Self {
        self.config.extensions.strikethrough = Some(enabled);
        self
    }

    pub fn extended_autolinks(mut self, enabled: bool) -> Self {
        self.config.extensions.extended_autolinks = Some(enabled);
        self
    }

    pub fn task_list_items(mut self, enabled: bool) -> Self {
        self.config.extensions.task_list_items = Some(enabled);
        self
    }

    pub fn disallowed_raw_html(mut self, enabled: bool) -> Self {
        self.config.extensions.disallowed_raw_html = Some(enabled);
        self
    }

    pub fn disable_rule(mut self, rule: impl Into<String>) -> Self {
        self.config.lint.disable.push(rule.into());
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: io::Error },
    Parse { path: PathBuf, source: toml::de::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io { path, source } => {
                write!(f, "cannot read config {}: {source}", path.display())
            }
            ConfigError::Parse { path, source } => {
                write!(f, "invalid config {}: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io { source, .. } => Some(source),
            ConfigError::Parse { source, .. } => Some(source),
        }
    }
}

impl From<ConfigError> for io::Error {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Io { source, .. } => source,
            ConfigError::Parse { .. } => io::Error::new(io::ErrorKind::InvalidData, err.to_string()),
        }
    }
}

const CANDIDATE_NAMES: &[&str] = &["roundmark.toml", ".roundmark.toml"];

fn parse_config_str(s: &str, path: &Path) -> Result<Config, ConfigError> {
    toml::from_str::<Config>(s).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn read_config(path: &Path) -> Result<Config, ConfigError> {
    log::debug!("Reading config from: {}", path.display());
    let s = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let config = parse_config_str(&s, path)?;
    log::info!("Loaded config from: {}", path.display());
    Ok(config)
}

fn find_in_tree(start_dir: &Path) -> Option<PathBuf> {
    for dir in start_dir.ancestors() {
        for name in CANDIDATE_NAMES {
            let p = dir.join(name);
            if p.is_file() {
                return Some(p);
            }
        }
    }
    None
}

/// Load configuration with precedence:
/// 1) explicit path (error if unreadable/invalid)
/// 2) walk up from start_dir: roundmark.toml, .roundmark.toml
/// 3) default config
///
/// A discovered file that fails to parse is an error as well.
pub fn load(
    explicit: Option<&Path>,
    start_dir: &Path,
) -> Result<(Config, Option<PathBuf>), ConfigError> {
    if let Some(path) = explicit {
        let cfg = read_config(path)?;
        return Ok((cfg, Some(path.to_path_buf())));
    }

    if let Some(p) = find_in_tree(start_dir) {
        let cfg = read_config(&p)?;
        return Ok((cfg, Some(p)));
    }

    log::debug!("No config file found, using defaults");
    Ok((Config::default(), None))
}
