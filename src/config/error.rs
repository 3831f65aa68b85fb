//! Configuration error types.

use owo_colors::OwoColorize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("invalid config file")]
    Toml(#[from] toml::de::Error),

    #[error("config file `{0}` not found")]
    NotFound(PathBuf),

    // no #[source]: the diagnostics already print every entry
    #[error("{0}")]
    Diagnostics(ConfigDiagnostics),
}

/// One rejected setting.
#[derive(Debug, Clone)]
struct Diagnostic {
    field: &'static str,
    message: String,
    hint: Option<String>,
}

/// Every rejected setting of one validation pass.
///
/// Rendered as
///
/// ```text
/// invalid configuration (2 problems)
///   namespace: must not be empty
///   format.command: format.enable is true but format.command is empty
///     hint: set a formatter command or pass --no-format
/// ```
#[derive(Debug, Default)]
pub struct ConfigDiagnostics {
    entries: Vec<Diagnostic>,
}

impl ConfigDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(&mut self, field: &'static str, message: impl Into<String>) {
        self.push(field, message.into(), None);
    }

    pub fn error_with_hint(
        &mut self,
        field: &'static str,
        message: impl Into<String>,
        hint: impl Into<String>,
    ) {
        self.push(field, message.into(), Some(hint.into()));
    }

    fn push(&mut self, field: &'static str, message: String, hint: Option<String>) {
        self.entries.push(Diagnostic {
            field,
            message,
            hint,
        });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `Ok` when nothing was rejected.
    pub fn into_result(self) -> Result<(), Self> {
        if self.entries.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ConfigDiagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let count = self.len();
        let noun = if count == 1 { "problem" } else { "problems" };
        write!(f, "{} ({count} {noun})", "invalid configuration".red().bold())?;

        for entry in &self.entries {
            write!(f, "\n  {}: {}", entry.field.cyan(), entry.message)?;
            if let Some(hint) = &entry.hint {
                write!(f, "\n    {} {hint}", "hint:".yellow())?;
            }
        }
        Ok(())
    }
}

impl std::error::Error for ConfigDiagnostics {}
