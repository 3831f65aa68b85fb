//! Source generation from the remote stylesheet.
//!
//! - `naming` - class name validation and enum member derivation
//! - `stylesheet` - icon/rule/font extraction, component and stylesheet rendering
//! - `preview` - HTML preview page

pub mod naming;
pub mod preview;
pub mod stylesheet;

pub use preview::generate_preview;
pub use stylesheet::{Analysis, analyze};
