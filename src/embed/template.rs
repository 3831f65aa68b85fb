//! Template types for typed slot injection.
//!
//! Slots are `__UPPER_CASE__` tokens. Every slot a variable set declares must
//! occur in the template, otherwise rendering fails instead of silently
//! producing a half-filled file.

use crate::error::{GenError, GenResult};
use regex::{Captures, Regex};
use std::borrow::Cow;
use std::marker::PhantomData;
use std::sync::OnceLock;

/// Trait for template variable sets
pub trait TemplateVars {
    /// Slot tokens and the text each one is replaced with.
    fn slots(&self) -> Vec<(&'static str, Cow<'_, str>)>;
}

/// Template with typed variable injection
#[derive(Debug, Clone, Copy)]
pub struct Template<V> {
    name: &'static str,
    content: &'static str,
    _marker: PhantomData<V>,
}

impl<V> Template<V> {
    pub const fn new(name: &'static str, content: &'static str) -> Self {
        Self {
            name,
            content,
            _marker: PhantomData,
        }
    }
}

impl<V: TemplateVars> Template<V> {
    /// Substitute every slot in one pass.
    ///
    /// Replacement text is never rescanned, so values containing
    /// token-like text are inserted verbatim. Tokens that are not declared
    /// slots are left untouched.
    pub fn render(&self, vars: &V) -> GenResult<String> {
        let slots = vars.slots();

        if let Some((slot, _)) = slots.iter().find(|(slot, _)| !self.content.contains(*slot)) {
            return Err(GenError::Template {
                template: self.name,
                slot: *slot,
            });
        }

        let rendered = slot_pattern().replace_all(self.content, |caps: &Captures<'_>| {
            let token = &caps[0];
            slots
                .iter()
                .find(|(slot, _)| *slot == token)
                .map_or_else(|| token.to_owned(), |(_, value)| value.to_string())
        });
        Ok(rendered.into_owned())
    }
}

fn slot_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"__[A-Z][A-Z0-9_]*__").unwrap())
}
