//! Package-list expansion (`name` / `[name, version]` → package tokens).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One requested package, optionally pinned to a version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawPackageSpec", into = "RawPackageSpec")]
pub enum PackageSpec {
    Name(String),
    Pinned { name: String, version: Option<String> },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum RawPackageSpec {
    Name(String),
    Tuple(Vec<Option<String>>),
}

impl TryFrom<RawPackageSpec> for PackageSpec {
    type Error = String;

    fn try_from(raw: RawPackageSpec) -> Result<Self, Self::Error> {
        match raw {
            RawPackageSpec::Name(name) => Ok(PackageSpec::Name(name)),
            RawPackageSpec::Tuple(parts) => {
                let mut parts = parts.into_iter();
                match (parts.next(), parts.next(), parts.next()) {
                    (Some(Some(name)), version, None) => Ok(PackageSpec::Pinned {
                        name,
                        version: version.flatten(),
                    }),
                    _ => Err("Invalid package & version tuple.".to_string()),
                }
            }
        }
    }
}

impl From<PackageSpec> for RawPackageSpec {
    fn from(spec: PackageSpec) -> Self {
        match spec {
            PackageSpec::Name(name) => RawPackageSpec::Name(name),
            PackageSpec::Pinned { name, version } => match version {
                Some(v) => RawPackageSpec::Tuple(vec![Some(name), Some(v)]),
                None => RawPackageSpec::Tuple(vec![Some(name)]),
            },
        }
    }
}

impl PackageSpec {
    pub fn name(&self) -> &str {
        match self {
            PackageSpec::Name(name) | PackageSpec::Pinned { name, .. } => name,
        }
    }

    pub fn pinned(name: impl Into<String>, version: impl Into<String>) -> Self {
        PackageSpec::Pinned {
            name: name.into(),
            version: Some(version.into()),
        }
    }
}

impl From<&str> for PackageSpec {
    fn from(name: &str) -> Self {
        PackageSpec::Name(name.to_string())
    }
}

/// `name` or `name=version`.
impl FromStr for PackageSpec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s.split_once('=') {
            Some((name, _)) if name.trim().is_empty() => {
                Err(format!("Invalid package spec '{s}': missing name"))
            }
            Some((name, version)) => Ok(PackageSpec::Pinned {
                name: name.trim().to_string(),
                version: Some(version.trim().to_string()).filter(|v| !v.is_empty()),
            }),
            None if s.is_empty() => Err("Invalid package spec: empty".to_string()),
            None => Ok(PackageSpec::Name(s.to_string())),
        }
    }
}

impl fmt::Display for PackageSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PackageSpec::Pinned {
                name,
                version: Some(version),
            } => write!(f, "{name}={version}"),
            other => f.write_str(other.name()),
        }
    }
}

/// Substitute `%s` placeholders in `fmt` left to right.
fn render_version_format(fmt: &str, values: &[&str]) -> String {
    let extra: usize = values.iter().map(|v| v.len()).sum();
    let mut out = String::with_capacity(fmt.len() + extra);
    let mut values = values.iter();
    let mut rest = fmt;
    while let Some(pos) = rest.find("%s") {
        out.push_str(&rest[..pos]);
        out.push_str(values.next().copied().unwrap_or_default());
        rest = &rest[pos + 2..];
    }
    out.push_str(rest);
    out
}

/// Expand package specs into tool arguments.
///
/// Pinned specs with a version are rendered through `version_fmt` (e.g. `"%s-%s"`);
/// everything else is passed through as the bare name.
pub fn expand_package_list(version_fmt: &str, pkgs: &[PackageSpec]) -> Vec<String> {
    pkgs.iter()
        .map(|pkg| match pkg {
            PackageSpec::Pinned {
                name,
                version: Some(version),
            } if !version.is_empty() => {
                render_version_format(version_fmt, &[name.as_str(), version.as_str()])
            }
            other => other.name().to_string(),
        })
        .collect()
}
