//! Font asset classification.

/// Data URI prefix the icon service uses for inline woff2 fonts.
pub const WOFF2_DATA_URI_PREFIX: &str = "data:application/x-font-woff2;";

/// Font formats that are downloaded into the asset folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontFormat {
    TrueType,
    Woff,
    Svg,
}

impl FontFormat {
    /// Classify by file extension (already lowercased).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "ttf" => Some(Self::TrueType),
            "woff" => Some(Self::Woff),
            "svg" => Some(Self::Svg),
            _ => None,
        }
    }

    /// Fixed local file name inside the asset folder.
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::TrueType => "iconfont.ttf",
            Self::Woff => "iconfont.woff",
            Self::Svg => "iconfont.svg",
        }
    }

    /// Value of the CSS `format()` hint.
    pub const fn css_format(self) -> &'static str {
        match self {
            Self::TrueType => "truetype",
            Self::Woff => "woff",
            Self::Svg => "svg",
        }
    }
}

/// Lowercased extension of an asset URL.
///
/// Takes everything after the last `.`, then drops any `?query` or
/// `#fragment` tail.
///
/// # Examples
/// ```ignore
/// url_extension("//at.cdn.com/font_1.ttf?t=123")  -> "ttf"
/// url_extension("http://x.com/f.WOFF")            -> "woff"
/// url_extension("http://x.com/f.svg#iconfont")    -> "svg"
/// ```
pub fn url_extension(url: &str) -> String {
    let tail = url.rsplit_once('.').map_or(url, |(_, ext)| ext);
    let ext = tail.split(['?', '#']).next().unwrap_or(tail);
    ext.to_ascii_lowercase()
}
