//! Scripted [`Session`] that records every command.

use poetry_bridge::session::format_command;
use poetry_bridge::{Result, RunOptions, Session};
use std::collections::VecDeque;
use std::path::{Path, PathBuf};

/// One recorded `run_always` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub program: String,
    pub args: Vec<String>,
    pub options: RunOptions,
}

impl Call {
    /// The full command line, e.g. `poetry build --format=wheel --no-ansi`.
    pub fn command_line(&self) -> String {
        format_command(&self.program, &self.args)
    }
}

/// A session replaying queued outputs.
///
/// Each call consumes the next queued response; once the queue is empty the
/// last response is repeated. `None` responses model a skipped command.
#[derive(Debug, Default)]
pub struct ScriptedSession {
    project_dir: PathBuf,
    responses: VecDeque<Option<String>>,
    last: Option<String>,
    calls: Vec<Call>,
}

impl ScriptedSession {
    pub fn new(project_dir: impl AsRef<Path>) -> Self {
        Self {
            project_dir: project_dir.as_ref().to_path_buf(),
            ..Self::default()
        }
    }

    /// Queue captured output for the next call.
    pub fn respond(mut self, output: &str) -> Self {
        self.responses.push_back(Some(output.to_string()));
        self
    }

    /// Queue a skip for the next call.
    pub fn skip(mut self) -> Self {
        self.responses.push_back(None);
        self
    }

    pub fn calls(&self) -> &[Call] {
        &self.calls
    }

    /// Arguments of the only recorded call.
    pub fn single_call_args(&self) -> Vec<&str> {
        assert_eq!(self.calls.len(), 1, "expected exactly one call");
        self.calls[0].args.iter().map(String::as_str).collect()
    }
}

impl Session for ScriptedSession {
    fn run_always(
        &mut self,
        program: &str,
        args: &[String],
        options: &RunOptions,
    ) -> Result<Option<String>> {
        self.calls.push(Call {
            program: program.to_string(),
            args: args.to_vec(),
            options: *options,
        });
        let response = match self.responses.pop_front() {
            Some(response) => response,
            None => self.last.clone(),
        };
        self.last = response.clone();
        Ok(response)
    }

    fn project_dir(&self) -> Result<PathBuf> {
        Ok(self.project_dir.clone())
    }
}
