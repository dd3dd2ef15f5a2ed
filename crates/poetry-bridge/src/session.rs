//! Execution context used to run external commands.
//!
//! [`Session`] is the seam between the adapter and the task runner. The
//! adapter only needs one operation: run a program now, even when the runner
//! is in a mode that would normally skip commands, and hand back what it
//! printed. [`ProcessSession`] implements it on top of `std::process`.

use crate::error::{Error, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// What to do with the child's standard error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StderrMode {
    /// Pass through to our own stderr.
    #[default]
    Inherit,
    /// Capture and append to the returned output.
    Capture,
    /// Discard.
    Null,
}

/// Options for [`Session::run_always`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunOptions {
    /// Allow programs from outside the session's environment.
    pub external: bool,
    /// Do not echo captured output.
    pub silent: bool,
    pub stderr: StderrMode,
}

impl RunOptions {
    /// Run an external program, capture its output quietly and let stderr
    /// through.
    pub fn captured_external() -> Self {
        Self {
            external: true,
            silent: true,
            stderr: StderrMode::Inherit,
        }
    }
}

/// A task-runner session able to execute commands.
pub trait Session {
    /// Run `program` with `args` regardless of install-skipping modes.
    ///
    /// Returns the captured output, or `None` when the session decided not to
    /// run the command.
    fn run_always(
        &mut self,
        program: &str,
        args: &[String],
        options: &RunOptions,
    ) -> Result<Option<String>>;

    /// Directory holding the project manifest.
    fn project_dir(&self) -> Result<PathBuf> {
        std::env::current_dir().map_err(|e| Error::io(".", e))
    }
}

impl<S: Session + ?Sized> Session for &mut S {
    fn run_always(
        &mut self,
        program: &str,
        args: &[String],
        options: &RunOptions,
    ) -> Result<Option<String>> {
        (**self).run_always(program, args, options)
    }

    fn project_dir(&self) -> Result<PathBuf> {
        (**self).project_dir()
    }
}

/// Join a program and its arguments for display.
pub fn format_command(program: &str, args: &[String]) -> String {
    std::iter::once(program)
        .chain(args.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join(" ")
}

/// A session that spawns real processes.
#[derive(Debug, Clone)]
pub struct ProcessSession {
    working_dir: PathBuf,
    bin_dir: Option<PathBuf>,
    no_install: bool,
}

impl ProcessSession {
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        Self {
            working_dir: working_dir.into(),
            bin_dir: None,
            no_install: false,
        }
    }

    /// Use the virtualenv rooted at `venv` for program lookup.
    pub fn with_virtualenv(mut self, venv: impl AsRef<Path>) -> Self {
        let venv = venv.as_ref();
        self.bin_dir = Some(if cfg!(windows) {
            venv.join("Scripts")
        } else {
            venv.join("bin")
        });
        self
    }

    /// Skip install-related commands, as when an existing environment is
    /// reused.
    pub fn with_no_install(mut self, no_install: bool) -> Self {
        self.no_install = no_install;
        self
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    pub fn bin_dir(&self) -> Option<&Path> {
        self.bin_dir.as_deref()
    }

    fn resolve_program(&self, program: &str, external: bool) -> Result<PathBuf> {
        if let Some(bin_dir) = &self.bin_dir {
            let candidate = bin_dir.join(program);
            if candidate.is_file() {
                return Ok(candidate);
            }
            if cfg!(windows) {
                let exe = bin_dir.join(format!("{program}.exe"));
                if exe.is_file() {
                    return Ok(exe);
                }
            }
            if !external {
                return Err(Error::ExternalProgram {
                    program: program.to_string(),
                });
            }
        }
        Ok(PathBuf::from(program))
    }
}

impl Session for ProcessSession {
    fn run_always(
        &mut self,
        program: &str,
        args: &[String],
        options: &RunOptions,
    ) -> Result<Option<String>> {
        let command_line = format_command(program, args);

        if self.no_install {
            tracing::info!("Skipping {} (--no-install)", command_line);
            return Ok(None);
        }

        let resolved = self.resolve_program(program, options.external)?;
        tracing::info!("{}", command_line);

        let stderr = match options.stderr {
            StderrMode::Inherit => Stdio::inherit(),
            StderrMode::Capture => Stdio::piped(),
            StderrMode::Null => Stdio::null(),
        };

        let mut command = Command::new(&resolved);
        command
            .args(args)
            .current_dir(&self.working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(stderr);
        if let Some(bin_dir) = &self.bin_dir {
            command.env("VIRTUAL_ENV", bin_dir.parent().unwrap_or(bin_dir));
        }

        let output = command.output().map_err(|e| Error::CommandNotFound {
            command: command_line.clone(),
            message: e.to_string(),
        })?;

        let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
        if options.stderr == StderrMode::Capture {
            text.push_str(&String::from_utf8_lossy(&output.stderr));
        }

        if !options.silent {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(text.as_bytes())
                .and_then(|()| stdout.flush())
                .map_err(Error::Diagnostics)?;
        }

        if !output.status.success() {
            tracing::error!("Command {} failed", command_line);
            return Err(Error::CommandFailed {
                command: command_line,
                code: output.status.code(),
            });
        }

        Ok(Some(text))
    }

    fn project_dir(&self) -> Result<PathBuf> {
        Ok(self.working_dir.clone())
    }
}
