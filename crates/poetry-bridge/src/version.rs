//! Installed-tool version parsing.
//!
//! Package metadata reports versions in PEP 440 form (`1.2.0b3`, `1.1.15`,
//! `1.2.0.post1`), while comparisons are done with [`semver::Version`]. The
//! mapping keeps the orderings that matter for capability checks:
//!
//! - `1.2` is padded to `1.2.0`
//! - pre-releases (`a`, `b`, `rc` and their long spellings) become semver
//!   pre-releases, so `1.2.0b3 < 1.2.0`
//! - dev releases sort below every other pre-release of the same release
//! - post releases and local labels become build metadata, which semver
//!   ignores for precedence
//!
//! ```
//! use poetry_bridge::version::{parse_version, MINIMUM_VERSION_SUPPORTING_GROUP_DEPS};
//!
//! assert!(parse_version("1.2.0").unwrap() >= MINIMUM_VERSION_SUPPORTING_GROUP_DEPS);
//! assert!(parse_version("1.2.0b3").unwrap() < MINIMUM_VERSION_SUPPORTING_GROUP_DEPS);
//! assert!(parse_version("1.1.15").unwrap() < MINIMUM_VERSION_SUPPORTING_GROUP_DEPS);
//! ```

use crate::error::{Error, Result};
use semver::{BuildMetadata, Prerelease, Version};

/// Minimum version of poetry that can support group dependencies.
pub const MINIMUM_VERSION_SUPPORTING_GROUP_DEPS: Version = Version::new(1, 2, 0);

/// Parse a version string reported by package metadata.
///
/// PEP 440 rules are applied first, so `1.2.0-1` is a post release of
/// `1.2.0` rather than a pre-release. Strings PEP 440 rejects are retried as
/// plain semver.
pub fn parse_version(raw: &str) -> Result<Version> {
    let trimmed = raw.trim();
    let s = trimmed.strip_prefix(['v', 'V']).unwrap_or(trimmed);

    match parse_pep440(raw, s) {
        Ok(version) => Ok(version),
        Err(err) => Version::parse(s).map_err(|_| err),
    }
}

fn parse_pep440(raw: &str, s: &str) -> Result<Version> {
    let invalid = |reason: String| Error::InvalidVersion {
        version: raw.to_string(),
        reason,
    };

    let (public, local) = match s.split_once('+') {
        Some((public, local)) => (public, Some(local)),
        None => (s, None),
    };
    let public = public.to_ascii_lowercase();

    let release_end = public
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(public.len());
    let (release, suffix) = public.split_at(release_end);
    let release = release.trim_end_matches('.');

    let components = release
        .split('.')
        .map(|part| {
            part.parse::<u64>()
                .map_err(|_| invalid(format!("invalid release component '{part}'")))
        })
        .collect::<Result<Vec<_>>>()?;

    let mut version = match components.as_slice() {
        [major] => Version::new(*major, 0, 0),
        [major, minor] => Version::new(*major, *minor, 0),
        [major, minor, patch] => Version::new(*major, *minor, *patch),
        _ => {
            return Err(invalid(format!(
                "expected at most three release components, found {}",
                components.len()
            )));
        }
    };

    let segments = parse_suffix(suffix).map_err(invalid)?;

    let mut pre = Vec::new();
    match (&segments.pre, segments.dev) {
        (Some((label, n)), dev) => {
            pre.push(format!("{label}.{n}"));
            if let Some(d) = dev {
                pre.push(format!("dev.{d}"));
            }
        }
        // A leading numeric identifier sorts below any alphanumeric one
        (None, Some(d)) => pre.push(format!("0.dev.{d}")),
        (None, None) => {}
    }
    if !pre.is_empty() {
        version.pre = Prerelease::new(&pre.join("."))
            .map_err(|e| invalid(format!("invalid pre-release: {e}")))?;
    }

    let mut build = Vec::new();
    if let Some(n) = segments.post {
        build.push(format!("post.{n}"));
    }
    if let Some(local) = local {
        build.push(local.replace(['_', '-'], "."));
    }
    if !build.is_empty() {
        version.build = BuildMetadata::new(&build.join("."))
            .map_err(|e| invalid(format!("invalid local label: {e}")))?;
    }

    Ok(version)
}

/// Whether `version` is new enough to understand dependency groups.
pub fn supports_group_deps(version: &Version) -> bool {
    *version >= MINIMUM_VERSION_SUPPORTING_GROUP_DEPS
}

#[derive(Debug, Default, PartialEq, Eq)]
struct Segments {
    pre: Option<(&'static str, u64)>,
    post: Option<u64>,
    dev: Option<u64>,
}

const SEPARATORS: [char; 3] = ['.', '-', '_'];

/// Parse everything after the release segment, e.g. `b3`, `.post1`, `rc1.dev2`.
fn parse_suffix(suffix: &str) -> std::result::Result<Segments, String> {
    let mut segments = Segments::default();
    let mut rest = suffix;

    loop {
        rest = rest.trim_start_matches(SEPARATORS);
        if rest.is_empty() {
            break;
        }

        let label_len = rest
            .find(|c: char| !c.is_ascii_alphabetic())
            .unwrap_or(rest.len());
        let label = &rest[..label_len];
        let after = rest[label_len..].trim_start_matches(SEPARATORS);
        let digits_len = after
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(after.len());
        let digits = &after[..digits_len];

        if label.is_empty() && digits.is_empty() {
            return Err(format!("unexpected text '{rest}'"));
        }

        let number = if digits.is_empty() {
            0
        } else {
            digits
                .parse::<u64>()
                .map_err(|e| format!("invalid number '{digits}': {e}"))?
        };

        match label {
            "a" | "alpha" => segments.pre = Some(("a", number)),
            "b" | "beta" => segments.pre = Some(("b", number)),
            "c" | "rc" | "pre" | "preview" => segments.pre = Some(("rc", number)),
            // `1.0-1` is an implicit post release
            "" | "post" | "rev" | "r" => segments.post = Some(number),
            "dev" => segments.dev = Some(number),
            other => return Err(format!("unknown version label '{other}'")),
        }

        rest = &after[digits_len..];
    }

    Ok(segments)
}
