use super::pkglist::{expand_package_list, PackageSpec};
use crate::errors::{DistroError, DistroResult};
use serde_json::Value;
use std::fmt;

/// Version pin format handed to the package-list expansion (`name-version`).
pub const PACKAGE_VERSION_FORMAT: &str = "%s-%s";

/// Extra arguments placed between `-y` and the sub-command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtraArgs {
    One(String),
    Many(Vec<String>),
}

impl ExtraArgs {
    /// Convert an untyped value (config, JSON) into extra arguments.
    ///
    /// `null` means no extra arguments; anything other than a string or a list
    /// of strings is a caller error.
    pub fn from_value(value: &Value) -> DistroResult<Option<Self>> {
        match value {
            Value::Null => Ok(None),
            Value::String(arg) => Ok(Some(ExtraArgs::One(arg.clone()))),
            Value::Array(items) => items
                .iter()
                .map(|item| match item {
                    Value::String(arg) => Ok(arg.clone()),
                    other => Err(DistroError::ContractViolation(format!(
                        "extra args list must contain only strings, got {other}"
                    ))),
                })
                .collect::<DistroResult<Vec<_>>>()
                .map(|args| Some(ExtraArgs::Many(args))),
            other => Err(DistroError::ContractViolation(format!(
                "extra args must be a string or a list of strings, got {other}"
            ))),
        }
    }

    fn append_to(&self, args: &mut Vec<String>) {
        match self {
            // An empty token or list contributes nothing.
            ExtraArgs::One(arg) if arg.is_empty() => {}
            ExtraArgs::One(arg) => args.push(arg.clone()),
            ExtraArgs::Many(list) => args.extend(list.iter().cloned()),
        }
    }
}

impl From<&str> for ExtraArgs {
    fn from(arg: &str) -> Self {
        ExtraArgs::One(arg.to_string())
    }
}

impl From<Vec<String>> for ExtraArgs {
    fn from(args: Vec<String>) -> Self {
        ExtraArgs::Many(args)
    }
}

impl From<&[&str]> for ExtraArgs {
    fn from(args: &[&str]) -> Self {
        ExtraArgs::Many(args.iter().map(|s| s.to_string()).collect())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>, args: &[&str]) -> Self {
        Self {
            program: program.into(),
            args: args.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Full argument vector, program first.
    pub fn argv(&self) -> Vec<String> {
        std::iter::once(self.program.clone())
            .chain(self.args.iter().cloned())
            .collect()
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// `<tool> -y [extra...] <subcommand> <expanded packages...>`
pub fn package_command_spec(
    tool: &str,
    subcommand: &str,
    extra_args: Option<&ExtraArgs>,
    pkgs: &[PackageSpec],
) -> CommandSpec {
    let mut args = vec!["-y".to_string()];
    if let Some(extra) = extra_args {
        extra.append_to(&mut args);
    }
    args.push(subcommand.to_string());
    args.extend(expand_package_list(PACKAGE_VERSION_FORMAT, pkgs));

    CommandSpec {
        program: tool.to_string(),
        args,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn scalar_extra_arg_precedes_subcommand() {
        let spec = package_command_spec(
            "dnf",
            "install",
            Some(&ExtraArgs::from("--refresh")),
            &[PackageSpec::from("foo")],
        );
        assert_eq!(spec.argv(), vec!["dnf", "-y", "--refresh", "install", "foo"]);
    }

    #[test]
    fn list_extra_args_with_no_packages() {
        let extra = ExtraArgs::from(&["--option", "x"][..]);
        let spec = package_command_spec("dnf", "makecache", Some(&extra), &[]);
        assert_eq!(spec.argv(), vec!["dnf", "-y", "--option", "x", "makecache"]);
    }

    #[test]
    fn install_expands_pinned_versions() {
        let spec = package_command_spec(
            "dnf",
            "install",
            None,
            &[PackageSpec::from("vim"), PackageSpec::pinned("git", "2.40")],
        );
        assert_eq!(spec.program, "dnf");
        assert_eq!(spec.args, vec!["-y", "install", "vim", "git-2.40"]);
        assert_eq!(spec.to_string(), "dnf -y install vim git-2.40");
    }

    #[test]
    fn makecache_command_is_expected() {
        let spec = package_command_spec("dnf", "makecache", None, &[]);
        assert_eq!(spec.argv(), vec!["dnf", "-y", "makecache"]);
    }

    #[test]
    fn empty_extra_args_are_skipped() {
        let spec = package_command_spec("dnf", "upgrade", Some(&ExtraArgs::from("")), &[]);
        assert_eq!(spec.argv(), vec!["dnf", "-y", "upgrade"]);

        let spec = package_command_spec("dnf", "upgrade", Some(&ExtraArgs::Many(vec![])), &[]);
        assert_eq!(spec.argv(), vec!["dnf", "-y", "upgrade"]);
    }

    #[test]
    fn extra_args_from_value_shapes() {
        assert_eq!(ExtraArgs::from_value(&Value::Null).unwrap(), None);
        assert_eq!(
            ExtraArgs::from_value(&json!("--refresh")).unwrap(),
            Some(ExtraArgs::One("--refresh".to_string()))
        );
        assert_eq!(
            ExtraArgs::from_value(&json!(["--option", "x"])).unwrap(),
            Some(ExtraArgs::Many(vec!["--option".to_string(), "x".to_string()]))
        );
    }

    #[test]
    fn extra_args_from_value_rejects_other_shapes() {
        for bad in [json!(42), json!(true), json!({"a": 1}), json!(["ok", 3])] {
            let err = ExtraArgs::from_value(&bad).unwrap_err();
            assert!(matches!(err, DistroError::ContractViolation(_)), "{bad}");
        }
    }
}
