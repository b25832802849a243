//! Configuration management for Quill.
//!
//! Parses `quill.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String values in the `[cms]` section support environment variable
//! expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! `cms.query` is not expanded: GROQ parameters use `$name` syntax.

mod expand;

use std::path::{Path, PathBuf};

use quill_renderer::{LinkTarget, RenderOptions};
use serde::Deserialize;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override local docs source directory.
    pub source_dir: Option<PathBuf>,
    /// Override raw HTML passthrough.
    pub allow_raw_markup: Option<bool>,
    /// Override where generated links open.
    pub link_target: Option<LinkTarget>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "quill.toml";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Headless CMS connection (optional section).
    /// When absent, documents are read from `docs.source_dir`.
    pub cms: Option<CmsConfig>,
    /// Local documents configuration (paths are relative strings from TOML).
    docs: DocsConfigRaw,
    /// Rendering options.
    pub render: RenderOptions,

    /// Resolved docs configuration (set after loading).
    #[serde(skip)]
    pub docs_resolved: DocsConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Raw docs configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct DocsConfigRaw {
    source_dir: Option<String>,
}

/// Resolved local documents configuration.
#[derive(Debug, Default)]
pub struct DocsConfig {
    /// Directory holding `<slug>.md` files.
    pub source_dir: PathBuf,
}

/// Headless CMS configuration.
#[derive(Debug, Deserialize)]
pub struct CmsConfig {
    /// Project identifier.
    pub project_id: String,
    /// Dataset name.
    pub dataset: String,
    /// Query API version.
    #[serde(default = "default_api_version")]
    pub api_version: String,
    /// Query the edge cache instead of the live API.
    #[serde(default)]
    pub use_cdn: bool,
    /// Document type bound to `$type`.
    #[serde(default = "default_document_type")]
    pub document_type: String,
    /// GROQ lookup query.
    #[serde(default = "default_query")]
    pub query: String,
    /// Overrides the host derived from `project_id`.
    #[serde(default)]
    pub base_url: Option<String>,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_api_version() -> String {
    "2024-01-01".to_owned()
}

fn default_document_type() -> String {
    "post".to_owned()
}

fn default_query() -> String {
    "*[_type == $type && slug.current == $slug]{title, body}".to_owned()
}

fn default_timeout_secs() -> u64 {
    30
}

impl CmsConfig {
    /// Validate that all required fields are properly set.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any field is empty or has invalid format.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.project_id, "cms.project_id")?;
        if !self
            .project_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-')
        {
            return Err(ConfigError::Validation(
                "cms.project_id may only contain letters, digits and dashes".to_owned(),
            ));
        }
        require_non_empty(&self.dataset, "cms.dataset")?;
        if !is_valid_api_version(&self.api_version) {
            return Err(ConfigError::Validation(format!(
                "cms.api_version must be 1, X or a YYYY-MM-DD date, got {:?}",
                self.api_version
            )));
        }
        require_non_empty(&self.document_type, "cms.document_type")?;
        require_non_empty(&self.query, "cms.query")?;
        if let Some(base_url) = &self.base_url {
            require_http_url(base_url, "cms.base_url")?;
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "cms.timeout_secs must be greater than 0".to_owned(),
            ));
        }
        Ok(())
    }
}

/// Check for `1`, `X` or a `YYYY-MM-DD` shaped date.
fn is_valid_api_version(version: &str) -> bool {
    if version == "1" || version == "X" {
        return true;
    }
    let bytes = version.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`cms.project_id`").
        field: String,
        /// Error message (e.g., "${`QUILL_PROJECT_ID`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a URL field to use http:// or https:// scheme.
fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `quill.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails or
    /// validation fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = std::env::current_dir()
            .ok()
            .and_then(|cwd| Self::discover_config(&cwd))
        {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(source_dir) = &settings.source_dir {
            self.docs_resolved.source_dir.clone_from(source_dir);
        }
        if let Some(allow) = settings.allow_raw_markup {
            self.render.allow_raw_markup = allow;
        }
        if let Some(target) = settings.link_target {
            self.render.link_target = target;
        }
    }

    /// Search for config file in `start` and its parents.
    fn discover_config(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            cms: None,
            docs: DocsConfigRaw::default(),
            render: RenderOptions::default(),
            docs_resolved: DocsConfig {
                source_dir: base.join("docs"),
            },
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(cms) = &self.cms {
            cms.validate()?;
        }
        Ok(())
    }

    /// Expand environment variable references in `[cms]` strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        if let Some(ref mut cms) = self.cms {
            cms.project_id = expand::expand_env(&cms.project_id, "cms.project_id")?;
            cms.dataset = expand::expand_env(&cms.dataset, "cms.dataset")?;
            cms.api_version = expand::expand_env(&cms.api_version, "cms.api_version")?;
            cms.document_type = expand::expand_env(&cms.document_type, "cms.document_type")?;
            if let Some(ref url) = cms.base_url {
                cms.base_url = Some(expand::expand_env(url, "cms.base_url")?);
            }
        }
        Ok(())
    }

    /// Resolve relative paths against the config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        self.docs_resolved = DocsConfig {
            source_dir: config_dir.join(self.docs.source_dir.as_deref().unwrap_or("docs")),
        };
    }
}
