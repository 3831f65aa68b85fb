//! Font assets: classification, local references and downloads.

pub mod fetch;
pub mod kind;
pub mod resolve;

pub use fetch::{HttpTransport, Transport, download_all, fetch_text};
pub use resolve::{AssetResolver, DownloadPlan};
