//! Font asset URL resolution.
//!
//! Maps every `url(...)` found in the remote `@font-face` rule to the
//! reference used in the local stylesheet, and schedules a download for
//! each remote font that ends up in the asset folder.

use super::kind::{FontFormat, WOFF2_DATA_URI_PREFIX, url_extension};
use crate::utils::path::relative_to;
use std::path::{Path, PathBuf};
use url::Url;

/// Reference written into the local `@font-face` `src` list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocalReference {
    /// Inline data URI, embedded unchanged.
    Inline { data_uri: String },
    /// Font file in the asset folder, relative to the stylesheet directory.
    File { path: String, format: FontFormat },
}

impl LocalReference {
    /// Render as a single `src` entry: `url("...") format("...")`.
    pub fn to_css(&self) -> String {
        match self {
            // the service only inlines woff2 but labels it woff
            Self::Inline { data_uri } => format!(r#"url("{data_uri}") format("woff")"#),
            Self::File { path, format } => {
                format!(r#"url("{path}") format("{}")"#, format.css_format())
            }
        }
    }
}

/// A font that must be fetched before the stylesheet is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    pub url: String,
    pub dest: PathBuf,
}

/// Downloads scheduled during resolution, one per destination file.
#[derive(Debug, Default)]
pub struct DownloadPlan {
    downloads: Vec<Download>,
}

impl DownloadPlan {
    /// Schedule a download. A second download to the same destination is
    /// ignored: the first reference in the stylesheet wins.
    pub fn schedule(&mut self, url: String, dest: PathBuf) {
        if self.downloads.iter().any(|d| d.dest == dest) {
            crate::debug!("resolve"; "skip duplicate font {}", url);
            return;
        }
        self.downloads.push(Download { url, dest });
    }

    pub fn into_vec(self) -> Vec<Download> {
        self.downloads
    }
}

/// Resolves font URLs against the output layout of one run.
#[derive(Debug)]
pub struct AssetResolver<'a> {
    /// Directory the local stylesheet is written to.
    stylesheet_dir: &'a Path,
    /// Directory receiving the downloaded fonts.
    font_dir: &'a Path,
    /// URL of the remote stylesheet, for relative asset references.
    base: Option<&'a Url>,
}

impl<'a> AssetResolver<'a> {
    pub const fn new(stylesheet_dir: &'a Path, font_dir: &'a Path, base: Option<&'a Url>) -> Self {
        Self {
            stylesheet_dir,
            font_dir,
            base,
        }
    }

    /// Resolve one asset URL.
    ///
    /// Returns `None` for formats that are not kept locally (eot, woff2 files
    /// etc.); callers drop those from the `src` list.
    pub fn resolve(&self, url: &str, plan: &mut DownloadPlan) -> Option<LocalReference> {
        if url.starts_with(WOFF2_DATA_URI_PREFIX) {
            return Some(LocalReference::Inline {
                data_uri: url.to_owned(),
            });
        }

        let format = FontFormat::from_extension(&url_extension(url))?;
        let dest = self.font_dir.join(format.file_name());
        let path = relative_to(self.stylesheet_dir, &dest);

        plan.schedule(self.remote_url(url), dest);
        Some(LocalReference::File { path, format })
    }

    /// Absolute URL used for the download.
    fn remote_url(&self, url: &str) -> String {
        if let Some(rest) = url.strip_prefix("//") {
            return format!("http://{rest}");
        }
        if Url::parse(url).is_ok() {
            return url.to_owned();
        }
        self.base
            .and_then(|base| base.join(url).ok())
            .map_or_else(|| url.to_owned(), String::from)
    }
}
