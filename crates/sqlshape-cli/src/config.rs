use serde::Deserialize;
use sqlshape::{DEFAULT_MAX_DEPTH, RenderConfig};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Text,
}

impl OutputFormat {
    pub fn parse(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "text" => Ok(Self::Text),
            other => anyhow::bail!("unsupported output format: {other} (expected json or text)"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ProjectConfig {
    #[allow(dead_code)]
    pub config_path: PathBuf,
    pub file: ConfigFile,
}

impl ProjectConfig {
    /// Loads `config_path`. A missing file falls back to defaults unless `required`.
    pub fn load(config_path: PathBuf, required: bool) -> anyhow::Result<Self> {
        if !required && !config_path.exists() {
            tracing::debug!(path = %config_path.display(), "no config file, using defaults");
            return Ok(Self {
                config_path,
                file: ConfigFile::default(),
            });
        }

        let raw = std::fs::read_to_string(&config_path).map_err(|e| {
            anyhow::anyhow!(
                "failed to read config file {}: {e}",
                config_path.display()
            )
        })?;

        let file = ConfigFile::parse(&raw, &config_path)?;

        Ok(Self { config_path, file })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    #[serde(default = "default_version")]
    pub version: String,

    #[serde(default)]
    pub render: RenderSection,

    #[serde(default)]
    pub output: OutputSection,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            version: default_version(),
            render: RenderSection::default(),
            output: OutputSection::default(),
        }
    }
}

fn default_version() -> String {
    "1".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct RenderSection {
    /// Nesting limit; `0` disables the guard.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

impl Default for RenderSection {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
        }
    }
}

fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputSection {
    #[serde(default)]
    pub format: OutputFormat,
}

impl ConfigFile {
    fn parse(raw: &str, path: &Path) -> anyhow::Result<Self> {
        let file: ConfigFile = toml::from_str(raw).map_err(|e| {
            anyhow::anyhow!("failed to parse config file {}: {e}", path.display())
        })?;
        file.validate()?;
        Ok(file)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.version.trim() != "1" {
            anyhow::bail!("unsupported config version: {}", self.version);
        }
        Ok(())
    }
}

/// Final settings after CLI flags override the config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    pub render: RenderConfig,
    pub format: OutputFormat,
}

impl Settings {
    pub fn resolve(
        file: &ConfigFile,
        max_depth: Option<usize>,
        format: Option<OutputFormat>,
    ) -> Self {
        let depth = max_depth.unwrap_or(file.render.max_depth);
        let render = if depth == 0 {
            RenderConfig::new().unbounded()
        } else {
            RenderConfig::new().with_max_depth(depth)
        };
        Self {
            render,
            format: format.unwrap_or(file.output.format),
        }
    }
}
