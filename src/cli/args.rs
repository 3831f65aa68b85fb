//! Command-line interface definitions.

use clap::{ColorChoice, Parser};
use std::path::PathBuf;

/// Generate a typed icon component, local stylesheet and fonts from an
/// icon-font service stylesheet.
///
/// Every option can also be set through the listed environment variable or
/// in `icongen.toml`; the command line wins over both.
#[derive(Parser, Debug, Clone, Default)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Stylesheet URL published by the icon service (`.css` or `.js`)
    #[arg(value_hint = clap::ValueHint::Url)]
    pub url: Option<String>,

    /// Control colored output (auto, always, never)
    #[arg(long, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: icongen.toml, searched upward from cwd)
    #[arg(short = 'C', long, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Icon class prefix and font family
    #[arg(short, long, env = "ICONGEN_NAMESPACE")]
    pub namespace: Option<String>,

    /// Output path of the generated component
    #[arg(long, env = "ICONGEN_COMPONENT_PATH", value_hint = clap::ValueHint::FilePath)]
    pub component: Option<PathBuf>,

    /// Output path of the local stylesheet
    #[arg(long, env = "ICONGEN_CSS_PATH", value_hint = clap::ValueHint::FilePath)]
    pub stylesheet: Option<PathBuf>,

    /// Directory receiving the font files
    #[arg(long, env = "ICONGEN_FONT_DIR", value_hint = clap::ValueHint::DirPath)]
    pub font_dir: Option<PathBuf>,

    /// Output path of the preview page (skipped when unset)
    #[arg(long, env = "ICONGEN_HTML_PATH", value_hint = clap::ValueHint::FilePath)]
    pub preview: Option<PathBuf>,

    /// Output path of the companion script (skipped when unset)
    #[arg(long, env = "ICONGEN_JS_PATH", value_hint = clap::ValueHint::FilePath)]
    pub script: Option<PathBuf>,

    /// Prettier config used to format generated sources (default: bundled)
    #[arg(long, env = "ICONGEN_PRETTIER_CONFIG", value_hint = clap::ValueHint::FilePath)]
    pub prettier_config: Option<PathBuf>,

    /// Skip formatting generated sources
    #[arg(long)]
    pub no_format: bool,

    /// HTTP timeout in seconds for every request
    #[arg(long, env = "ICONGEN_TIMEOUT")]
    pub timeout: Option<u64>,

    /// Accept invalid TLS certificates
    #[arg(long)]
    pub insecure: bool,

    /// Enable verbose output for debugging
    #[arg(short = 'V', long)]
    pub verbose: bool,
}
