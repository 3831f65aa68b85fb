//! Remote stylesheet analysis.
//!
//! The icon service publishes a stylesheet shaped like:
//!
//! ```css
//! @font-face {
//!   font-family: "iconfont";
//!   src: url('//at.cdn.com/t/font_1.woff?t=1') format('woff'),
//!        url('//at.cdn.com/t/font_1.ttf?t=1') format('truetype');
//! }
//! .iconfont { font-family: "iconfont" !important; }
//! .iconfont-home:before { content: "\e900"; }
//! ```
//!
//! Nothing here parses CSS. Three namespace-scoped patterns pull out the
//! icon classes, the per-icon rules and the font URLs; the rules are carried
//! over byte-for-byte.

use super::naming::derive_enum_name;
use crate::config::GenConfig;
use crate::embed::component::{COMPONENT, ComponentVars};
use crate::embed::css::{STYLESHEET, StylesheetVars};
use crate::error::{GenError, GenResult};
use crate::font::{AssetResolver, DownloadPlan};
use crate::utils::path::{parent_dir, relative_to};
use regex::Regex;
use url::Url;

/// Everything derived from one remote stylesheet.
#[derive(Debug)]
pub struct Analysis {
    /// Icon class names in order of appearance, duplicates kept.
    pub icons: Vec<String>,
    /// Rendered component source.
    pub component: String,
    /// Rendered local stylesheet.
    pub stylesheet: String,
    /// Fonts the local stylesheet refers to.
    pub downloads: DownloadPlan,
}

/// Namespace-scoped extraction patterns.
struct Patterns {
    /// `.{ns}-<id>:before`, capturing `<id>`
    icon: Regex,
    /// `.{ns}-<id> ... }`, shortest block
    rule: Regex,
    /// `url('...')` or `url("...")`
    url: Regex,
}

impl Patterns {
    fn new(namespace: &str) -> Self {
        let ns = regex::escape(namespace);
        Self {
            icon: Regex::new(&format!(r"\.{ns}-([^\s:{{}},]+):before")).unwrap(),
            rule: Regex::new(&format!(r"(?s)\.{ns}-.*?\}}")).unwrap(),
            url: Regex::new(r#"(?s)url\('(.*?)'\)|url\("(.*?)"\)"#).unwrap(),
        }
    }
}

/// Analyze the remote stylesheet and render the component and local stylesheet.
///
/// `source_url` is the remote stylesheet address; relative font URLs are
/// resolved against it.
pub fn analyze(text: &str, config: &GenConfig, source_url: Option<&Url>) -> GenResult<Analysis> {
    let namespace = config.namespace.as_str();
    let patterns = Patterns::new(namespace);

    let icons = extract_icons(&patterns, namespace, text);
    if icons.is_empty() {
        return Err(GenError::MalformedInput {
            namespace: namespace.to_owned(),
        });
    }
    crate::debug!("analyze"; "found {} icon classes", icons.len());

    let component = render_component(&icons, config)?;

    let stylesheet_dir = parent_dir(&config.output.stylesheet);
    let resolver = AssetResolver::new(stylesheet_dir, &config.output.font_dir, source_url);
    let mut downloads = DownloadPlan::default();
    let font_sources = extract_urls(&patterns, text)
        .into_iter()
        .filter_map(|url| resolver.resolve(url, &mut downloads))
        .map(|reference| reference.to_css())
        .collect::<Vec<_>>()
        .join(",");

    let icon_rules = patterns
        .rule
        .find_iter(text)
        .map(|m| m.as_str())
        .collect::<Vec<_>>()
        .join("\n");

    let stylesheet = STYLESHEET.render(&StylesheetVars {
        font_sources: &font_sources,
        icon_rules: &icon_rules,
        namespace,
    })?;

    Ok(Analysis {
        icons,
        component,
        stylesheet,
        downloads,
    })
}

/// Icon class names (`{ns}-<id>`) in order of appearance.
fn extract_icons(patterns: &Patterns, namespace: &str, text: &str) -> Vec<String> {
    patterns
        .icon
        .captures_iter(text)
        .map(|caps| format!("{namespace}-{}", &caps[1]))
        .collect()
}

/// URLs inside `url(...)` tokens, first to last.
fn extract_urls<'t>(patterns: &Patterns, text: &'t str) -> Vec<&'t str> {
    patterns
        .url
        .captures_iter(text)
        .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)))
        .map(|m| m.as_str().trim())
        .collect()
}

fn render_component(icons: &[String], config: &GenConfig) -> GenResult<String> {
    let members = icons
        .iter()
        .map(|class| {
            let member = derive_enum_name(class, &config.namespace)?;
            Ok(format!(r#"{member} = "{class}","#))
        })
        .collect::<GenResult<Vec<_>>>()?
        .join("\n");

    let import = relative_to(parent_dir(&config.output.component), &config.output.stylesheet);

    COMPONENT.render(&ComponentVars {
        members: &members,
        stylesheet_import: &import,
        namespace: &config.namespace,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::resolve::LocalReference;
    use std::path::{Path, PathBuf};

    fn config(namespace: &str) -> GenConfig {
        let mut config = GenConfig::default();
        config.namespace = namespace.into();
        config.output.component = PathBuf::from("/app/src/icon/Icon.tsx");
        config.output.stylesheet = PathBuf::from("/app/src/icon/iconfont.css");
        config.output.font_dir = PathBuf::from("/app/src/icon/assets");
        config
    }

    const SAMPLE: &str = r#"@font-face {
  font-family: "iconfont";
  src: url('data:application/x-font-woff2;charset=utf-8;base64,d09GMgABAAAAAA') format('woff2'),
       url('//at.cdn.com/t/font_1.woff?t=1') format('woff'),
       url('//at.cdn.com/t/font_1.eot?t=1#iefix') format('embedded-opentype'),
       url('//at.cdn.com/t/font_1.ttf?t=1') format('truetype');
}

.iconfont {
  font-family: "iconfont" !important;
}

.iconfont-home:before {
  content: "\e900";
}

.iconfont-arrow-left:before {
  content: "\e901";
}
"#;

    #[test]
    fn test_extracts_icons_in_order() {
        let analysis = analyze(SAMPLE, &config("iconfont"), None).unwrap();
        assert_eq!(analysis.icons, ["iconfont-home", "iconfont-arrow-left"]);
    }

    #[test]
    fn test_component_members_and_import() {
        let analysis = analyze(SAMPLE, &config("iconfont"), None).unwrap();
        let component = &analysis.component;

        let home = component.find(r#"HOME = "iconfont-home","#).unwrap();
        let arrow = component.find(r#"ARROW_LEFT = "iconfont-arrow-left","#).unwrap();
        assert!(home < arrow);
        assert!(component.contains(r#"import "./iconfont.css";"#));
        assert!(component.contains(r#""iconfont""#));
    }

    #[test]
    fn test_component_import_climbs_out() {
        let mut config = config("iconfont");
        config.output.stylesheet = PathBuf::from("/app/styles/iconfont.css");
        let analysis = analyze(SAMPLE, &config, None).unwrap();
        assert!(analysis.component.contains(r#"import "../../styles/iconfont.css";"#));
    }

    #[test]
    fn test_font_sources_keep_order_and_drop_unknown() {
        let analysis = analyze(SAMPLE, &config("iconfont"), None).unwrap();
        let expected = [
            r#"url("data:application/x-font-woff2;charset=utf-8;base64,d09GMgABAAAAAA") format("woff")"#,
            r#"url("./assets/iconfont.woff") format("woff")"#,
            r#"url("./assets/iconfont.ttf") format("truetype")"#,
        ]
        .join(",");
        assert!(analysis.stylesheet.contains(&format!("src: {expected};")));
        assert!(!analysis.stylesheet.contains(".eot"));
    }

    #[test]
    fn test_downloads_scheduled_for_referenced_fonts() {
        let analysis = analyze(SAMPLE, &config("iconfont"), None).unwrap();
        let downloads = analysis.downloads.into_vec();
        assert_eq!(downloads.len(), 2);
        assert_eq!(downloads[0].url, "http://at.cdn.com/t/font_1.woff?t=1");
        assert_eq!(downloads[0].dest, Path::new("/app/src/icon/assets/iconfont.woff"));
        assert_eq!(downloads[1].url, "http://at.cdn.com/t/font_1.ttf?t=1");
    }

    #[test]
    fn test_icon_rules_copied_verbatim() {
        let analysis = analyze(SAMPLE, &config("iconfont"), None).unwrap();
        let rules = ".iconfont-home:before {\n  content: \"\\e900\";\n}\n\
                     .iconfont-arrow-left:before {\n  content: \"\\e901\";\n}";
        assert!(analysis.stylesheet.contains(rules));
        // the base `.iconfont` rule comes from the template, not the source
        assert_eq!(analysis.stylesheet.matches(".iconfont {").count(), 1);
    }

    #[test]
    fn test_plain_block_is_a_rule_not_an_icon() {
        let text = "@font-face{src:url('//x.com/f.woff') format('woff')}\n\
                    .iconfont-home{color:red}\n\
                    .iconfont-home:before{content:\"\\e900\"}";
        let analysis = analyze(text, &config("iconfont"), None).unwrap();

        assert_eq!(analysis.icons, ["iconfont-home"]);
        assert!(analysis.component.contains(r#"HOME = "iconfont-home","#));
        assert!(
            analysis
                .stylesheet
                .contains(r#"src: url("./assets/iconfont.woff") format("woff");"#)
        );
        assert!(analysis.stylesheet.contains(
            ".iconfont-home{color:red}\n.iconfont-home:before{content:\"\\e900\"}"
        ));
    }

    #[test]
    fn test_duplicates_are_kept() {
        let text = ".icon-a:before{content:\"1\"}.icon-b:before{content:\"2\"}.icon-a:before{content:\"1\"}";
        let analysis = analyze(text, &config("icon"), None).unwrap();
        assert_eq!(analysis.icons, ["icon-a", "icon-b", "icon-a"]);
        assert_eq!(analysis.component.matches(r#"A = "icon-a","#).count(), 2);

        let a = analysis.component.find(r#"A = "icon-a","#).unwrap();
        let b = analysis.component.find(r#"B = "icon-b","#).unwrap();
        assert!(a < b);
    }

    #[test]
    fn test_no_icons_is_malformed_input() {
        let text = ".other-home:before { content: \"\\e900\"; }";
        let err = analyze(text, &config("iconfont"), None).unwrap_err();
        assert!(matches!(err, GenError::MalformedInput { namespace } if namespace == "iconfont"));
    }

    #[test]
    fn test_bad_class_name_fails_whole_run() {
        let text = ".icon-home:before{content:\"1\"}.icon-Bad:before{content:\"2\"}";
        let err = analyze(text, &config("icon"), None).unwrap_err();
        assert!(matches!(err, GenError::NamingConvention(name) if name == "icon-Bad"));
    }

    #[test]
    fn test_no_urls_gives_empty_sources() {
        let text = ".icon-home:before{content:\"1\"}";
        let analysis = analyze(text, &config("icon"), None).unwrap();
        assert!(analysis.stylesheet.contains("src: ;"));
        assert!(analysis.downloads.into_vec().is_empty());
    }

    #[test]
    fn test_double_quoted_and_relative_urls() {
        let base = Url::parse("https://cdn.example.com/t/font_1.css").unwrap();
        let text = "@font-face{src:url(\"font_1.svg?t=1#iconfont\") format(\"svg\")}\n\
                    .icon-home:before{content:\"1\"}";
        let analysis = analyze(text, &config("icon"), Some(&base)).unwrap();
        let downloads = analysis.downloads.into_vec();
        assert_eq!(downloads[0].url, "https://cdn.example.com/t/font_1.svg?t=1#iconfont");
        assert!(analysis.stylesheet.contains(
            &LocalReference::File {
                path: "./assets/iconfont.svg".into(),
                format: crate::font::kind::FontFormat::Svg,
            }
            .to_css()
        ));
    }
}
