//! End-to-end tests for `Poetry` running real subprocesses.
//!
//! A shell script named `poetry` is installed into a temporary virtualenv so
//! the adapter, `ProcessSession` and `DistInfoMetadata` are exercised
//! together without a real poetry installation.

#![cfg(unix)]

use poetry_bridge::{DistInfoMetadata, Error, Poetry, ProcessSession};
use poetry_bridge_test_utils::{SharedBuffer, TestProject};
use pretty_assertions::assert_eq;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use tempfile::TempDir;

struct FakeEnv {
    venv: TempDir,
    site: TempDir,
}

impl FakeEnv {
    /// A virtualenv with poetry `version` installed, whose `poetry` runs
    /// `body` as a shell script.
    fn new(version: &str, body: &str) -> Self {
        let venv = TempDir::new().unwrap();
        let bin = venv.path().join("bin");
        fs::create_dir_all(&bin).unwrap();
        let script = bin.join("poetry");
        fs::write(&script, format!("#!/bin/sh\n{body}\n")).unwrap();
        fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();

        let site = TempDir::new().unwrap();
        fs::create_dir_all(site.path().join(format!("poetry-{version}.dist-info"))).unwrap();

        Self { venv, site }
    }

    fn adapter(&self, project: &Path, no_install: bool) -> Poetry<ProcessSession, DistInfoMetadata> {
        let session = ProcessSession::new(project)
            .with_virtualenv(self.venv.path())
            .with_no_install(no_install);
        Poetry::new(session, DistInfoMetadata::new([self.site.path()]))
    }
}

#[test]
fn test_export_echoes_arguments_through_real_process() {
    let project = TestProject::new("foobar").with_extras(&["toml"]);
    let env = FakeEnv::new("1.2.0", "for arg in \"$@\"; do echo \"$arg\"; done");
    let mut poetry = env.adapter(project.root(), false);

    let output = poetry.export(None).unwrap();

    assert_eq!(
        output,
        "export\n--format=requirements.txt\n--extras=toml\n--without-hashes\n--with=dev\n"
    );
}

#[test]
fn test_export_runs_in_project_directory() {
    let project = TestProject::new("foobar");
    let env = FakeEnv::new("1.1.15", "test -f pyproject.toml && echo found");
    let mut poetry = env.adapter(project.root(), false);

    assert_eq!(poetry.export(None).unwrap(), "found\n");
}

#[test]
fn test_export_diverts_warnings() {
    let project = TestProject::new("foobar");
    let env = FakeEnv::new(
        "1.1.15",
        "echo 'Warning: The lock file is not up to date'\necho 'attrs==23.2.0'",
    );
    let diagnostics = SharedBuffer::new();
    let mut poetry = env
        .adapter(project.root(), false)
        .with_diagnostics(diagnostics.clone());

    assert_eq!(poetry.export(None).unwrap(), "attrs==23.2.0\n");
    assert_eq!(
        diagnostics.contents(),
        "Warning: The lock file is not up to date\n"
    );
}

#[test]
fn test_build_through_real_process() {
    let project = TestProject::new("foobar");
    let env = FakeEnv::new(
        "1.2.0",
        "echo 'Building foobar (0.1.0)'\necho '  - Building sdist'\necho '  - Built foobar-0.1.0.tar.gz'",
    );
    let mut poetry = env.adapter(project.root(), false);

    assert_eq!(poetry.build("sdist").unwrap(), "foobar-0.1.0.tar.gz");
}

#[test]
fn test_no_install_skips_both_commands() {
    let project = TestProject::new("foobar");
    let env = FakeEnv::new("1.2.0", "echo should-not-run");
    let mut poetry = env.adapter(project.root(), true);

    assert!(matches!(
        poetry.export(None).unwrap_err(),
        Error::CommandSkipped { .. }
    ));
    assert!(matches!(
        poetry.build("wheel").unwrap_err(),
        Error::CommandSkipped { .. }
    ));
}

#[test]
fn test_failing_poetry_is_reported() {
    let project = TestProject::new("foobar");
    let env = FakeEnv::new("1.2.0", "echo 'Poetry could not find a pyproject.toml' >&2\nexit 1");
    let mut poetry = env.adapter(project.root(), false);

    let err = poetry.build("wheel").unwrap_err();

    assert!(matches!(err, Error::CommandFailed { code: Some(1), .. }));
}
