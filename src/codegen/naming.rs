//! Icon class naming convention and enum member derivation.
//!
//! A class name is `<namespace>-<segment>(-<segment>)*` with every segment
//! matching `[a-z0-9]+`. The enum member is the part after the namespace,
//! upper-cased with `-` replaced by `_`:
//!
//! ```text
//! icon-arrow-left  (namespace = "icon")  ->  ARROW_LEFT
//! ```

use crate::error::{GenError, GenResult};

/// Derive the enum member name for `class_name`.
///
/// Fails with [`GenError::NamingConvention`] when the class does not
/// belong to `namespace` or a segment is empty or has characters outside
/// `[a-z0-9]`.
pub fn derive_enum_name(class_name: &str, namespace: &str) -> GenResult<String> {
    let id = class_name
        .strip_prefix(namespace)
        .and_then(|rest| rest.strip_prefix('-'))
        .filter(|id| id.split('-').all(is_segment))
        .ok_or_else(|| GenError::NamingConvention(class_name.to_owned()))?;

    Ok(id.replace('-', "_").to_ascii_uppercase())
}

fn is_segment(segment: &str) -> bool {
    !segment.is_empty()
        && segment
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit())
}
