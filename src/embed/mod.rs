//! Embedded templates for generated artifacts.
//!
//! # Module Structure
//!
//! - `template` - Template types for typed slot injection
//! - `component` - Typed icon component (`Icon.tsx`)
//! - `css` - Local stylesheet (`iconfont.css`)
//! - `html` - Preview page (`preview.html`)
//! - `format` - Bundled formatter configuration
//!
//! # Usage
//!
//! ```ignore
//! use embed::css::{STYLESHEET, StylesheetVars};
//!
//! let css = STYLESHEET.render(&StylesheetVars {
//!     font_sources: r#"url("./assets/iconfont.woff") format("woff")"#,
//!     icon_rules: ".iconfont-home:before { content: \"\\e900\"; }",
//!     namespace: "iconfont",
//! })?;
//! ```

mod template;

pub use template::{Template, TemplateVars};

pub mod component {
    use super::{Template, TemplateVars};
    use std::borrow::Cow;

    /// Variables for Icon.tsx.
    pub struct ComponentVars<'a> {
        /// Enum members, one `NAME = "class",` per line.
        pub members: &'a str,
        /// Import path of the stylesheet, relative to the component.
        pub stylesheet_import: &'a str,
        pub namespace: &'a str,
    }

    impl TemplateVars for ComponentVars<'_> {
        fn slots(&self) -> Vec<(&'static str, Cow<'_, str>)> {
            vec![
                ("__ICON_MEMBERS__", Cow::Borrowed(self.members)),
                ("__STYLESHEET_IMPORT__", Cow::Borrowed(self.stylesheet_import)),
                ("__NAMESPACE__", Cow::Borrowed(self.namespace)),
            ]
        }
    }

    /// Typed icon component with the icon enumeration.
    pub const COMPONENT: Template<ComponentVars<'static>> =
        Template::new("Icon.tsx", include_str!("component/Icon.tsx"));
}

pub mod css {
    use super::{Template, TemplateVars};
    use std::borrow::Cow;

    /// Variables for iconfont.css.
    pub struct StylesheetVars<'a> {
        /// Comma separated `@font-face` `src` entries.
        pub font_sources: &'a str,
        /// Icon rules copied verbatim from the remote stylesheet.
        pub icon_rules: &'a str,
        pub namespace: &'a str,
    }

    impl TemplateVars for StylesheetVars<'_> {
        fn slots(&self) -> Vec<(&'static str, Cow<'_, str>)> {
            vec![
                ("__FONT_SOURCES__", Cow::Borrowed(self.font_sources)),
                ("__ICON_RULES__", Cow::Borrowed(self.icon_rules)),
                ("__NAMESPACE__", Cow::Borrowed(self.namespace)),
            ]
        }
    }

    /// Local stylesheet pointing at the downloaded fonts.
    pub const STYLESHEET: Template<StylesheetVars<'static>> =
        Template::new("iconfont.css", include_str!("css/iconfont.css"));
}

pub mod html {
    use super::{Template, TemplateVars};
    use std::borrow::Cow;

    /// Variables for preview.html.
    pub struct PreviewVars<'a> {
        pub stylesheet_url: &'a str,
        /// Concatenated icon item fragments.
        pub items: &'a str,
        pub generated_at: &'a str,
        pub namespace: &'a str,
    }

    impl TemplateVars for PreviewVars<'_> {
        fn slots(&self) -> Vec<(&'static str, Cow<'_, str>)> {
            vec![
                ("__STYLESHEET_URL__", Cow::Borrowed(self.stylesheet_url)),
                ("__ICON_ITEMS__", Cow::Borrowed(self.items)),
                ("__GENERATED_AT__", Cow::Borrowed(self.generated_at)),
                ("__NAMESPACE__", Cow::Borrowed(self.namespace)),
            ]
        }
    }

    /// Preview page listing every icon.
    pub const PREVIEW_HTML: Template<PreviewVars<'static>> =
        Template::new("preview.html", include_str!("html/preview.html"));
}

pub mod format {
    /// Bundled prettier configuration, used when none is configured.
    pub const PRETTIER_CONFIG: &str = include_str!("prettier.json");
}
