//! Generation settings from `icongen.toml`, environment and command line.
//!
//! # Precedence
//!
//! command line / `ICONGEN_*` environment > `icongen.toml` > defaults
//!
//! # Example
//!
//! ```toml
//! namespace = "icon"
//!
//! [output]
//! component = "src/components/icon/Icon.tsx"
//! stylesheet = "src/components/icon/iconfont.css"
//! font_dir = "src/components/icon/assets"
//! preview = "docs/icons.html"
//! script = "public/iconfont.js"
//!
//! [format]
//! enable = true
//! command = ["prettier"]
//! config = ".prettierrc.json"
//!
//! [http]
//! timeout = 30
//! insecure = false
//! ```
//!
//! Relative paths are resolved against the directory holding the config
//! file, or the current directory when there is none. The resulting
//! [`GenConfig`] is built once per run and only read afterwards.

mod error;
mod util;

pub use error::{ConfigDiagnostics, ConfigError};
use util::find_config_file;

use crate::{cli::Cli, log, utils::path::normalize_path};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

/// Config file searched for when `--config` is not given.
pub const CONFIG_FILE: &str = "icongen.toml";

/// Default icon class prefix and font family.
pub const DEFAULT_NAMESPACE: &str = "iconfont";

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing icongen.toml
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GenConfig {
    /// Absolute path to the config file, if one was loaded (internal use only)
    #[serde(skip)]
    pub config_path: Option<PathBuf>,

    /// Base directory for relative paths (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    /// Icon class prefix and font family name
    pub namespace: String,

    /// Generated artifact locations
    pub output: OutputConfig,

    /// Formatter settings
    pub format: FormatConfig,

    /// HTTP client settings
    pub http: HttpConfig,
}

/// `[output]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Typed icon component.
    pub component: PathBuf,
    /// Local stylesheet.
    pub stylesheet: PathBuf,
    /// Directory for downloaded fonts.
    pub font_dir: PathBuf,
    /// Preview page, skipped when unset.
    pub preview: Option<PathBuf>,
    /// Companion script, skipped when unset.
    pub script: Option<PathBuf>,
}

/// `[format]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FormatConfig {
    /// Run the formatter over generated sources.
    pub enable: bool,
    /// Formatter command (e.g., `["prettier"]` or `["npx", "prettier"]`).
    pub command: Vec<String>,
    /// Formatter config file; the bundled one is used when unset.
    pub config: Option<PathBuf>,
}

/// `[http]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Global timeout per request, in seconds.
    pub timeout: Option<u64>,
    /// Accept invalid TLS certificates.
    pub insecure: bool,
}

impl Default for GenConfig {
    fn default() -> Self {
        Self {
            config_path: None,
            root: PathBuf::new(),
            namespace: DEFAULT_NAMESPACE.to_owned(),
            output: OutputConfig::default(),
            format: FormatConfig::default(),
            http: HttpConfig::default(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            component: "src/components/icon/Icon.tsx".into(),
            stylesheet: "src/components/icon/iconfont.css".into(),
            font_dir: "src/components/icon/assets".into(),
            preview: None,
            script: None,
        }
    }
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            enable: true,
            command: vec!["prettier".into()],
            config: None,
        }
    }
}

impl HttpConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout.map(Duration::from_secs)
    }
}

impl GenConfig {
    /// Load configuration from CLI arguments.
    ///
    /// An explicit `--config` must exist; otherwise `icongen.toml` is
    /// searched upward from cwd and defaults are used when none is found.
    pub fn load(cli: &Cli) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;

        let config_path = match &cli.config {
            Some(path) => {
                let path = normalize_path(path, &cwd);
                if !path.exists() {
                    return Err(ConfigError::NotFound(path).into());
                }
                Some(path)
            }
            None => find_config_file(Path::new(CONFIG_FILE)),
        };

        let mut config = match &config_path {
            Some(path) => Self::from_path(path)?,
            None => Self::default(),
        };

        let root = config_path
            .as_deref()
            .and_then(Path::parent)
            .map_or(cwd.clone(), Path::to_path_buf);

        config.config_path = config_path;
        config.finalize(cli, &root, &cwd);
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            let display_path = path
                .file_name()
                .map(|n| n.to_string_lossy())
                .unwrap_or_else(|| path.to_string_lossy());
            log!("warning"; "ignoring unknown fields in {}: {}", display_path, ignored.join(", "));
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>)> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })
        .map_err(ConfigError::Toml)?;
        Ok((config, ignored))
    }

    /// Apply CLI overrides and resolve every path.
    ///
    /// File paths are relative to `root`; CLI paths are relative to `cwd`.
    fn finalize(&mut self, cli: &Cli, root: &Path, cwd: &Path) {
        crate::logger::set_verbose(cli.verbose);

        self.root = root.to_path_buf();
        self.normalize_paths(root);
        self.apply_cli(cli, cwd);
    }

    fn normalize_paths(&mut self, root: &Path) {
        let output = &mut self.output;
        output.component = normalize_path(&output.component, root);
        output.stylesheet = normalize_path(&output.stylesheet, root);
        output.font_dir = normalize_path(&output.font_dir, root);
        output.preview = output.preview.take().map(|p| normalize_path(&p, root));
        output.script = output.script.take().map(|p| normalize_path(&p, root));
        self.format.config = self.format.config.take().map(|p| normalize_path(&p, root));
    }

    fn apply_cli(&mut self, cli: &Cli, cwd: &Path) {
        let resolve = |path: &Option<PathBuf>| path.as_ref().map(|p| normalize_path(p, cwd));

        Self::update_option(&mut self.namespace, cli.namespace.as_ref());
        Self::update_option(&mut self.output.component, resolve(&cli.component).as_ref());
        Self::update_option(&mut self.output.stylesheet, resolve(&cli.stylesheet).as_ref());
        Self::update_option(&mut self.output.font_dir, resolve(&cli.font_dir).as_ref());
        if let Some(preview) = resolve(&cli.preview) {
            self.output.preview = Some(preview);
        }
        if let Some(script) = resolve(&cli.script) {
            self.output.script = Some(script);
        }
        if let Some(prettier_config) = resolve(&cli.prettier_config) {
            self.format.config = Some(prettier_config);
        }
        if cli.no_format {
            self.format.enable = false;
        }
        Self::update_option(&mut self.http.timeout, cli.timeout.map(Some).as_ref());
        if cli.insecure {
            self.http.insecure = true;
        }
    }

    /// Update config option if CLI value is provided.
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    // ========================================================================
    // validation
    // ========================================================================

    /// Validate the resolved configuration.
    ///
    /// Collects all validation errors and returns them at once.
    pub fn validate(&self) -> Result<()> {
        let mut diag = ConfigDiagnostics::new();

        if self.namespace.is_empty() {
            diag.error("namespace", "must not be empty");
        } else if !self
            .namespace
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            diag.error_with_hint(
                "namespace",
                format!("`{}` contains unsupported characters", self.namespace),
                "use letters, digits, `-` or `_`",
            );
        }

        if self.output.font_dir.is_file() {
            diag.error(
                "output.font_dir",
                format!("{} is a file", self.output.font_dir.display()),
            );
        }

        let artifacts = [
            Some(&self.output.component),
            Some(&self.output.stylesheet),
            self.output.preview.as_ref(),
            self.output.script.as_ref(),
        ];
        let artifacts: Vec<_> = artifacts.into_iter().flatten().collect();
        for (i, path) in artifacts.iter().enumerate() {
            if artifacts[..i].contains(path) {
                diag.error(
                    "output",
                    format!("{} is used for more than one artifact", path.display()),
                );
            }
        }

        if self.format.enable {
            if self.format.command.is_empty() {
                diag.error_with_hint(
                    "format.command",
                    "format.enable is true but format.command is empty",
                    "set a formatter command or pass --no-format",
                );
            }
            if let Some(config) = &self.format.config
                && !config.is_file()
            {
                diag.error(
                    "format.config",
                    format!("formatter config not found: {}", config.display()),
                );
            }
        }

        diag.into_result()
            .map_err(|e| ConfigError::Diagnostics(e).into())
    }
}

// ============================================================================
// tests
// ============================================================================
