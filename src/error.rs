//! Error taxonomy for a generation run.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the generation pipeline.
///
/// Every variant is fatal: the run stops at the first one and `main`
/// reports it with exit code 1.
#[derive(Debug, Error)]
pub enum GenError {
    #[error("missing stylesheet URL in command line")]
    MissingInput,

    #[error("invalid stylesheet URL `{0}`")]
    InvalidUrl(String, #[source] url::ParseError),

    #[error(
        "no `.{namespace}-*:before` rule found, check the icon service settings: \
         1. font class prefix must be `{namespace}-` 2. font family must be `{namespace}`"
    )]
    MalformedInput { namespace: String },

    #[error("`{0}` does not conform to naming convention")]
    NamingConvention(String),

    #[error("failed to fetch `{url}`")]
    Fetch {
        url: String,
        #[source]
        source: ureq::Error,
    },

    #[error("failed to download `{url}` to `{}`", dest.display())]
    Download {
        url: String,
        dest: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{0}")]
    ExternalProcess(String),

    #[error("template `{template}` has no `{slot}` slot")]
    Template {
        template: &'static str,
        slot: &'static str,
    },

    #[error("IO error when writing `{}`", .0.display())]
    Filesystem(PathBuf, #[source] std::io::Error),
}

pub type GenResult<T> = std::result::Result<T, GenError>;
