//! Blocking child processes for external tools.
//!
//! ```ignore
//! Cmd::new(prettier)
//!     .args(["--config", "prettier.json", "--write", "Icon.tsx"])
//!     .cwd(root)
//!     .quiet(&["[warn]"])
//!     .run()?;
//! ```

use crate::debug;
use crate::error::{GenError, GenResult};
use regex::Regex;
use std::{
    ffi::{OsStr, OsString},
    path::{Path, PathBuf},
    process::{Command, Output},
    sync::OnceLock,
};

/// One external command, run to completion.
#[derive(Debug, Default)]
pub struct Cmd {
    program: OsString,
    args: Vec<OsString>,
    cwd: Option<PathBuf>,
    quiet: &'static [&'static str],
}

impl Cmd {
    pub fn new(program: impl AsRef<OsStr>) -> Self {
        Self {
            program: program.as_ref().to_owned(),
            ..Default::default()
        }
    }

    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_owned());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args
            .extend(args.into_iter().map(|a| a.as_ref().to_owned()));
        self
    }

    pub fn cwd(mut self, dir: impl AsRef<Path>) -> Self {
        self.cwd = Some(dir.as_ref().to_owned());
        self
    }

    /// Stderr lines starting with one of `prefixes` are neither echoed nor
    /// included in failure messages.
    pub fn quiet(mut self, prefixes: &'static [&'static str]) -> Self {
        self.quiet = prefixes;
        self
    }

    /// Run and wait.
    ///
    /// Failing to start and exiting unsuccessfully are both
    /// [`GenError::ExternalProcess`]; the latter carries the stderr lines.
    pub fn run(self) -> GenResult<Output> {
        let mut command = Command::new(&self.program);
        command.args(&self.args);
        if let Some(dir) = &self.cwd {
            command.current_dir(dir);
        }

        let output = command.output().map_err(|e| {
            GenError::ExternalProcess(format!("cannot run `{}`: {e}", self.command_line()))
        })?;

        let stderr = self.notable_lines(&String::from_utf8_lossy(&output.stderr));
        if !output.status.success() {
            let mut message = format!("`{}` failed, {}", self.command_line(), output.status);
            for line in &stderr {
                message.push('\n');
                message.push_str(line);
            }
            return Err(GenError::ExternalProcess(message));
        }

        for line in &stderr {
            debug!(&self.tool_name(); "{}", line);
        }
        Ok(output)
    }

    fn command_line(&self) -> String {
        std::iter::once(&self.program)
            .chain(&self.args)
            .map(|s| s.to_string_lossy())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// `/usr/bin/prettier.cmd` -> `prettier`
    fn tool_name(&self) -> String {
        let program = Path::new(&self.program);
        program
            .file_stem()
            .unwrap_or(program.as_os_str())
            .to_string_lossy()
            .into_owned()
    }

    fn notable_lines(&self, stderr: &str) -> Vec<String> {
        stderr
            .lines()
            .map(|line| strip_ansi(line).trim().to_owned())
            .filter(|line| !line.is_empty())
            .filter(|line| !self.quiet.iter().any(|p| line.starts_with(p)))
            .collect()
    }
}

fn strip_ansi(s: &str) -> std::borrow::Cow<'_, str> {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\x1b\[[0-9;]*m").unwrap())
        .replace_all(s, "")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_line() {
        let cmd = Cmd::new("prettier")
            .args(["--config", "p.json"])
            .arg("--write")
            .arg(Path::new("src/Icon.tsx"));
        assert_eq!(cmd.command_line(), "prettier --config p.json --write src/Icon.tsx");
    }

    #[test]
    fn test_tool_name() {
        assert_eq!(Cmd::new("/usr/local/bin/prettier.cmd").tool_name(), "prettier");
        assert_eq!(Cmd::new("prettier").tool_name(), "prettier");
    }

    #[test]
    fn test_notable_lines_skip_quiet_and_ansi() {
        let cmd = Cmd::new("prettier").quiet(&["[warn]"]);
        let lines = cmd.notable_lines("\x1b[33m[warn]\x1b[0m no ignore file\n\n  \x1b[31m[error]\x1b[0m bad.css  \n");
        assert_eq!(lines, ["[error] bad.css"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_run_success() {
        let output = Cmd::new("echo").arg("hello").run().unwrap();
        assert!(String::from_utf8_lossy(&output.stdout).contains("hello"));
    }

    #[cfg(unix)]
    #[test]
    fn test_run_failure_carries_stderr() {
        let err = Cmd::new("sh")
            .args(["-c", "echo '[warn] noise' >&2; echo broken >&2; exit 3"])
            .quiet(&["[warn]"])
            .run()
            .unwrap_err();
        match err {
            GenError::ExternalProcess(msg) => {
                assert!(msg.contains("failed"));
                assert!(msg.contains('3'));
                assert!(msg.ends_with("\nbroken"));
                assert!(!msg.lines().skip(1).any(|line| line.contains("noise")));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_run_in_cwd() {
        let dir = tempfile::TempDir::new().unwrap();
        let output = Cmd::new("pwd").cwd(dir.path()).run().unwrap();
        let printed = String::from_utf8_lossy(&output.stdout);
        let expected = dir.path().canonicalize().unwrap();
        assert_eq!(Path::new(printed.trim()).canonicalize().unwrap(), expected);
    }

    #[test]
    fn test_missing_program() {
        let err = Cmd::new("icongen-definitely-not-installed").run().unwrap_err();
        assert!(matches!(err, GenError::ExternalProcess(msg) if msg.starts_with("cannot run")));
    }
}
