//! Remote retrieval of the stylesheet, companion script and font files.
//!
//! Network access goes through the [`Transport`] trait; the real
//! implementation is a blocking `ureq` agent, tests plug in an in-memory one.

use super::resolve::Download;
use crate::error::{GenError, GenResult};
use crate::logger::ProgressLine;
use rayon::prelude::*;
use std::{
    fs::{self, File},
    io::{self, Read},
    path::Path,
    time::Duration,
};
use ureq::Agent;
use ureq::tls::{RootCerts, TlsConfig, TlsProvider};

const USER_AGENT: &str = concat!("icongen/", env!("CARGO_PKG_VERSION"));

/// Fetch-by-URL capability.
pub trait Transport: Sync {
    /// Fetch a text resource.
    fn get_text(&self, url: &str) -> Result<String, ureq::Error>;

    /// Open a byte stream for a binary resource.
    fn get_stream(&self, url: &str) -> Result<Box<dyn Read + Send>, ureq::Error>;
}

/// HTTP transport backed by a `ureq` agent with native-tls.
pub struct HttpTransport {
    agent: Agent,
}

impl HttpTransport {
    /// Create an agent using the platform TLS library and root certificates.
    ///
    /// `insecure` disables certificate verification, for icon services
    /// behind broken certificate chains.
    pub fn new(timeout: Option<Duration>, insecure: bool) -> Self {
        let tls_config = TlsConfig::builder()
            .provider(TlsProvider::NativeTls)
            .root_certs(RootCerts::PlatformVerifier)
            .disable_verification(insecure)
            .build();

        let agent = Agent::config_builder()
            .tls_config(tls_config)
            .timeout_global(timeout)
            .build()
            .into();

        Self { agent }
    }
}

impl Transport for HttpTransport {
    fn get_text(&self, url: &str) -> Result<String, ureq::Error> {
        let mut body = self
            .agent
            .get(url)
            .header("User-Agent", USER_AGENT)
            .call()?
            .into_body();
        body.read_to_string()
    }

    fn get_stream(&self, url: &str) -> Result<Box<dyn Read + Send>, ureq::Error> {
        let body = self
            .agent
            .get(url)
            .header("User-Agent", USER_AGENT)
            .call()?
            .into_body();
        Ok(Box::new(body.into_reader()))
    }
}

/// Fetch a text resource, normalizing protocol-relative URLs first.
pub fn fetch_text(transport: &dyn Transport, url: &str) -> GenResult<String> {
    let url = normalize_scheme(url);
    transport
        .get_text(&url)
        .map_err(|source| GenError::Fetch { url, source })
}

/// Stream a remote binary resource into `dest`.
///
/// The parent directory is created first; an existing file is overwritten.
pub fn fetch_binary(transport: &dyn Transport, url: &str, dest: &Path) -> GenResult<()> {
    let url = normalize_scheme(url);
    let download_err = |source: io::Error| GenError::Download {
        url: url.clone(),
        dest: dest.to_path_buf(),
        source,
    };

    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent).map_err(|e| GenError::Filesystem(parent.to_path_buf(), e))?;
    }

    let mut stream = transport.get_stream(&url).map_err(|e| download_err(io::Error::other(e)))?;
    let mut file = File::create(dest).map_err(|e| GenError::Filesystem(dest.to_path_buf(), e))?;
    io::copy(&mut stream, &mut file).map_err(download_err)?;
    Ok(())
}

/// Run every scheduled download in parallel and wait for all of them.
///
/// Returns the first failure; other downloads still run to completion.
pub fn download_all(transport: &dyn Transport, downloads: &[Download]) -> GenResult<()> {
    if downloads.is_empty() {
        return Ok(());
    }

    let progress = ProgressLine::new("download", "fonts", downloads.len());
    let results: Vec<GenResult<()>> = downloads
        .par_iter()
        .map(|download| {
            let result = fetch_binary(transport, &download.url, &download.dest);
            progress.inc();
            result
        })
        .collect();
    progress.finish();

    results.into_iter().collect()
}

/// `//host/path` -> `http://host/path`; anything else is returned unchanged.
pub fn normalize_scheme(url: &str) -> String {
    match url.strip_prefix("//") {
        Some(rest) => format!("http://{rest}"),
        None => url.to_owned(),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::collections::HashMap;
    use std::io::Cursor;
    use tempfile::TempDir;

    /// In-memory transport; unknown URLs answer 404.
    #[derive(Default)]
    pub struct MemoryTransport {
        pub resources: HashMap<String, Vec<u8>>,
        pub requested: Mutex<Vec<String>>,
    }

    impl MemoryTransport {
        pub fn with(mut self, url: &str, body: impl Into<Vec<u8>>) -> Self {
            self.resources.insert(url.to_owned(), body.into());
            self
        }

        fn lookup(&self, url: &str) -> Result<Vec<u8>, ureq::Error> {
            self.requested.lock().push(url.to_owned());
            self.resources
                .get(url)
                .cloned()
                .ok_or(ureq::Error::StatusCode(404))
        }
    }

    impl Transport for MemoryTransport {
        fn get_text(&self, url: &str) -> Result<String, ureq::Error> {
            Ok(String::from_utf8_lossy(&self.lookup(url)?).into_owned())
        }

        fn get_stream(&self, url: &str) -> Result<Box<dyn Read + Send>, ureq::Error> {
            Ok(Box::new(Cursor::new(self.lookup(url)?)))
        }
    }

    /// Reader failing halfway through the body.
    struct BrokenStream;

    impl Read for BrokenStream {
        fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::ConnectionReset, "reset by peer"))
        }
    }

    struct BrokenTransport;

    impl Transport for BrokenTransport {
        fn get_text(&self, _: &str) -> Result<String, ureq::Error> {
            Err(ureq::Error::StatusCode(500))
        }

        fn get_stream(&self, _: &str) -> Result<Box<dyn Read + Send>, ureq::Error> {
            Ok(Box::new(BrokenStream))
        }
    }

    #[test]
    fn test_normalize_scheme() {
        assert_eq!(
            normalize_scheme("//cdn.example.com/a.css"),
            "http://cdn.example.com/a.css"
        );
        assert_eq!(normalize_scheme("https://x.com/a.css"), "https://x.com/a.css");
    }

    #[test]
    fn test_fetch_text_normalizes_protocol_relative() {
        let transport = MemoryTransport::default().with("http://cdn.example.com/a.css", "body{}");
        let text = fetch_text(&transport, "//cdn.example.com/a.css").unwrap();
        assert_eq!(text, "body{}");
        assert_eq!(
            transport.requested.lock().as_slice(),
            ["http://cdn.example.com/a.css"]
        );
    }

    #[test]
    fn test_fetch_text_error() {
        let err = fetch_text(&MemoryTransport::default(), "http://x.com/a.css").unwrap_err();
        assert!(matches!(err, GenError::Fetch { url, .. } if url == "http://x.com/a.css"));
    }

    #[test]
    fn test_fetch_binary_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("deep/nested/assets/iconfont.ttf");
        let transport = MemoryTransport::default().with("http://x.com/f.ttf", vec![0u8, 1, 2, 3]);

        fetch_binary(&transport, "//x.com/f.ttf", &dest).unwrap();
        assert_eq!(fs::read(&dest).unwrap(), vec![0u8, 1, 2, 3]);

        // idempotent directory creation, file overwritten
        fetch_binary(&transport, "http://x.com/f.ttf", &dest).unwrap();
        assert_eq!(fs::read(&dest).unwrap().len(), 4);
    }

    #[test]
    fn test_fetch_binary_transport_error_is_download_error() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("iconfont.woff");
        let err = fetch_binary(&MemoryTransport::default(), "http://x.com/f.woff", &dest)
            .unwrap_err();
        assert!(matches!(err, GenError::Download { .. }));
    }

    #[test]
    fn test_fetch_binary_stream_error_is_download_error() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("iconfont.woff");
        let err = fetch_binary(&BrokenTransport, "http://x.com/f.woff", &dest).unwrap_err();
        match err {
            GenError::Download { source, .. } => {
                assert_eq!(source.kind(), io::ErrorKind::ConnectionReset);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_download_all_runs_every_download() {
        let dir = TempDir::new().unwrap();
        let transport = MemoryTransport::default()
            .with("http://x.com/f.ttf", "ttf")
            .with("http://x.com/f.woff", "woff")
            .with("http://x.com/f.svg", "svg");

        let downloads: Vec<_> = ["ttf", "woff", "svg"]
            .iter()
            .map(|ext| Download {
                url: format!("http://x.com/f.{ext}"),
                dest: dir.path().join(format!("iconfont.{ext}")),
            })
            .collect();

        download_all(&transport, &downloads).unwrap();
        for ext in ["ttf", "woff", "svg"] {
            let body = fs::read_to_string(dir.path().join(format!("iconfont.{ext}"))).unwrap();
            assert_eq!(body, ext);
        }
    }

    #[test]
    fn test_download_all_reports_failure() {
        let dir = TempDir::new().unwrap();
        let transport = MemoryTransport::default().with("http://x.com/f.ttf", "ttf");
        let downloads = vec![
            Download {
                url: "http://x.com/f.ttf".into(),
                dest: dir.path().join("iconfont.ttf"),
            },
            Download {
                url: "http://x.com/missing.woff".into(),
                dest: dir.path().join("iconfont.woff"),
            },
        ];

        let err = download_all(&transport, &downloads).unwrap_err();
        assert!(matches!(err, GenError::Download { url, .. } if url == "http://x.com/missing.woff"));
        // the successful download still landed
        assert!(dir.path().join("iconfont.ttf").exists());
    }
}
