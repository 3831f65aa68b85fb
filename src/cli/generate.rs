//! Generation run orchestration.
//!
//! Stages, in order:
//! - **FetchingCss** - Retrieve the remote stylesheet
//! - **Analyzing** - Extract icons, render component and local stylesheet
//! - **FetchingScript** - Retrieve the companion script (when configured)
//! - **DownloadingFonts** - Parallel font downloads, all joined
//! - **WritingArtifacts** - Stylesheet, component and script to disk
//! - **GeneratingPreview** - Preview page (when configured)
//! - **Formatting** - Formatter over stylesheet, then component
//!
//! The first failure ends the run; files already written stay in place.

use crate::{
    codegen::{Analysis, analyze, generate_preview},
    config::GenConfig,
    debug,
    embed::format::PRETTIER_CONFIG,
    error::{GenError, GenResult},
    font::{Transport, download_all, fetch::normalize_scheme, fetch_text},
    log,
    utils::{
        date::DateTimeUtc,
        exec::Cmd,
    },
};
use anyhow::{Context, Result};
use std::{
    fmt, fs,
    path::{Path, PathBuf},
};
use url::Url;

/// Pipeline stage, used for progress output and error context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    FetchingCss,
    Analyzing,
    FetchingScript,
    DownloadingFonts,
    WritingArtifacts,
    GeneratingPreview,
    Formatting,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::FetchingCss => "fetching stylesheet",
            Self::Analyzing => "analyzing stylesheet",
            Self::FetchingScript => "fetching script",
            Self::DownloadingFonts => "downloading fonts",
            Self::WritingArtifacts => "writing artifacts",
            Self::GeneratingPreview => "generating preview",
            Self::Formatting => "formatting",
        })
    }
}

/// Remote resources derived from the command-line URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceUrls {
    pub stylesheet: Url,
    pub script: Url,
}

impl SourceUrls {
    /// Derive the stylesheet and script URLs.
    ///
    /// `//host/font_1.css`, `http://host/font_1.js` and `http://host/font_1`
    /// all give `http://host/font_1.css` plus `http://host/font_1.js`.
    pub fn derive(input: Option<&str>) -> GenResult<Self> {
        let input = input
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(GenError::MissingInput)?;

        let normalized = normalize_scheme(input);
        let base = normalized
            .strip_suffix(".css")
            .or_else(|| normalized.strip_suffix(".js"))
            .unwrap_or(&normalized);

        let parse = |raw: String| Url::parse(&raw).map_err(|e| GenError::InvalidUrl(raw, e));
        Ok(Self {
            stylesheet: parse(format!("{base}.css"))?,
            script: parse(format!("{base}.js"))?,
        })
    }
}

// ============================================================================
// formatter
// ============================================================================

/// Formats one generated file in place.
pub trait Formatter {
    fn format(&self, file: &Path, config: &Path) -> GenResult<()>;
}

/// Prettier's notices when it cannot find an ignore file or plugins.
const FORMATTER_NOISE: &[&str] = &["[warn]"];

/// External formatter invoked as `<command...> --config <config> --write <file>`.
pub struct CommandFormatter {
    command: Vec<String>,
    cwd: PathBuf,
}

impl CommandFormatter {
    pub fn new(command: Vec<String>, cwd: impl Into<PathBuf>) -> Self {
        Self {
            command,
            cwd: cwd.into(),
        }
    }
}

impl Formatter for CommandFormatter {
    fn format(&self, file: &Path, config: &Path) -> GenResult<()> {
        let (program, args) = self
            .command
            .split_first()
            .ok_or_else(|| GenError::ExternalProcess("formatter command is empty".into()))?;

        // `which` also picks up `prettier.cmd` on Windows
        let exe = which::which(program).map_err(|e| {
            GenError::ExternalProcess(format!("formatter `{program}` not found: {e}"))
        })?;

        Cmd::new(exe)
            .args(args)
            .arg("--config")
            .arg(config)
            .arg("--write")
            .arg(file)
            .cwd(&self.cwd)
            .quiet(FORMATTER_NOISE)
            .run()?;
        Ok(())
    }
}

// ============================================================================
// run
// ============================================================================

/// Outcome of a successful run.
#[derive(Debug, Default)]
pub struct Report {
    pub icons: usize,
    pub fonts: usize,
    /// Files written, in write order.
    pub artifacts: Vec<PathBuf>,
    pub formatted: bool,
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let plural = |n: usize| if n == 1 { "" } else { "s" };
        write!(
            f,
            "{} icon{}, {} font{}, {} file{} written",
            self.icons,
            plural(self.icons),
            self.fonts,
            plural(self.fonts),
            self.artifacts.len(),
            plural(self.artifacts.len()),
        )?;
        if !self.formatted {
            f.write_str(" (unformatted)")?;
        }
        Ok(())
    }
}

/// Run every stage for `url`.
pub fn generate(
    url: Option<&str>,
    config: &GenConfig,
    transport: &dyn Transport,
    formatter: &dyn Formatter,
) -> Result<Report> {
    let urls = SourceUrls::derive(url)?;
    let mut report = Report::default();

    enter(Stage::FetchingCss);
    let css = fetch_text(transport, urls.stylesheet.as_str())
        .with_context(|| Stage::FetchingCss.to_string())?;
    log!("fetch"; "{}", urls.stylesheet);

    enter(Stage::Analyzing);
    let Analysis {
        icons,
        component,
        stylesheet,
        downloads,
    } = analyze(&css, config, Some(&urls.stylesheet))
        .with_context(|| Stage::Analyzing.to_string())?;
    report.icons = icons.len();
    log!("analyze"; "generated {} icons", icons.len());

    let script = match &config.output.script {
        Some(path) => {
            enter(Stage::FetchingScript);
            let text = fetch_text(transport, urls.script.as_str())
                .with_context(|| Stage::FetchingScript.to_string())?;
            log!("fetch"; "{}", urls.script);
            Some((path, text))
        }
        None => None,
    };

    enter(Stage::DownloadingFonts);
    let downloads = downloads.into_vec();
    download_all(transport, &downloads).with_context(|| Stage::DownloadingFonts.to_string())?;
    report.fonts = downloads.len();

    enter(Stage::WritingArtifacts);
    let mut write = |path: &Path, content: &str| -> Result<()> {
        write_artifact(path, content).with_context(|| Stage::WritingArtifacts.to_string())?;
        report.artifacts.push(path.to_path_buf());
        Ok(())
    };
    write(config.output.stylesheet.as_path(), stylesheet.as_str())?;
    write(config.output.component.as_path(), component.as_str())?;
    if let Some((path, text)) = &script {
        write(path.as_path(), text.as_str())?;
    }

    if let Some(path) = &config.output.preview {
        enter(Stage::GeneratingPreview);
        let generated_at = DateTimeUtc::now().to_display();
        let html = generate_preview(&icons, urls.stylesheet.as_str(), &config.namespace, &generated_at)
            .with_context(|| Stage::GeneratingPreview.to_string())?;
        write_artifact(path, &html).with_context(|| Stage::GeneratingPreview.to_string())?;
        report.artifacts.push(path.clone());
    }

    if config.format.enable {
        enter(Stage::Formatting);
        format_sources(config, formatter).with_context(|| Stage::Formatting.to_string())?;
        report.formatted = true;
    } else {
        log!("format"; "skipped");
    }

    Ok(report)
}

fn enter(stage: Stage) {
    debug!("generate"; "{}", stage);
}

/// Write `content`, creating missing parent directories.
fn write_artifact(path: &Path, content: &str) -> GenResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| GenError::Filesystem(parent.to_path_buf(), e))?;
    }
    fs::write(path, content).map_err(|e| GenError::Filesystem(path.to_path_buf(), e))?;
    debug!("write"; "{}", path.display());
    Ok(())
}

/// Format the stylesheet, then the component, strictly in sequence.
fn format_sources(config: &GenConfig, formatter: &dyn Formatter) -> GenResult<()> {
    let Some(formatter_config) = &config.format.config else {
        let bundled = materialize_bundled_config()?;
        let result = format_each(config, formatter, &bundled);
        fs::remove_file(&bundled).ok();
        return result;
    };
    format_each(config, formatter, formatter_config)
}

fn format_each(config: &GenConfig, formatter: &dyn Formatter, formatter_config: &Path) -> GenResult<()> {
    for file in [&config.output.stylesheet, &config.output.component] {
        formatter.format(file, formatter_config)?;
        log!("format"; "{}", file.display());
    }
    Ok(())
}

/// Write the bundled prettier config to a per-process file in the system
/// temp directory. Removed again once formatting is done.
fn materialize_bundled_config() -> GenResult<PathBuf> {
    let path = bundled_config_path();
    fs::write(&path, PRETTIER_CONFIG).map_err(|e| GenError::Filesystem(path.clone(), e))?;
    Ok(path)
}

fn bundled_config_path() -> PathBuf {
    std::env::temp_dir().join(format!("icongen-prettier-{}.json", std::process::id()))
}
