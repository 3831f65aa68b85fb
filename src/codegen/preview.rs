//! HTML preview page listing every icon with its enum member name.

use super::naming::derive_enum_name;
use crate::embed::html::{PREVIEW_HTML, PreviewVars};
use crate::error::GenResult;

/// Render the preview page.
///
/// Glyphs are drawn with the remote stylesheet at `stylesheet_url`, so the
/// page works before the local fonts are in place.
pub fn generate_preview(
    icons: &[String],
    stylesheet_url: &str,
    namespace: &str,
    generated_at: &str,
) -> GenResult<String> {
    let items = icons
        .iter()
        .map(|class| {
            Ok(format!(
                r#"<div class="item"><i class="{namespace} {class}"></i><span>{}</span></div>"#,
                derive_enum_name(class, namespace)?
            ))
        })
        .collect::<GenResult<Vec<_>>>()?
        .concat();

    PREVIEW_HTML.render(&PreviewVars {
        stylesheet_url,
        items: &items,
        generated_at,
        namespace,
    })
}
