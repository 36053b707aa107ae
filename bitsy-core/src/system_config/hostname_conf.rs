//! `/etc/hostname` parsing and serialization.
//!
//! The file holds a single hostname token. Comment lines (`#`) and blank lines
//! are kept verbatim so a parse/serialize cycle of an untouched file is
//! byte-identical; only the value of the hostname line is ever rewritten.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HostnameParseError {
    #[error("Multiple hostnames ({}) found", .0.join(", "))]
    MultipleHostnames(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Entry {
    Blank(String),
    Comment(String),
    Hostname {
        indent: String,
        value: String,
        /// Whitespace and/or trailing `# comment` after the value.
        tail: String,
    },
}

/// One source line and the terminator it ended with (`\n`, `\r\n`, or none).
#[derive(Debug, Clone, PartialEq, Eq)]
struct Line {
    entry: Entry,
    eol: &'static str,
}

/// In-memory view of a hostname file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostnameConf {
    lines: Vec<Line>,
}

fn split_eol(raw: &str) -> (&str, &'static str) {
    if let Some(body) = raw.strip_suffix("\r\n") {
        (body, "\r\n")
    } else if let Some(body) = raw.strip_suffix('\n') {
        (body, "\n")
    } else {
        (raw, "")
    }
}

impl HostnameConf {
    pub fn parse(text: &str) -> Result<Self, HostnameParseError> {
        let mut lines = Vec::new();
        let mut found = BTreeSet::new();

        for raw in text.split_inclusive('\n') {
            let (line, eol) = split_eol(raw);

            let body = line.trim_start();
            let entry = if body.trim().is_empty() {
                Entry::Blank(line.to_string())
            } else if body.starts_with('#') {
                Entry::Comment(line.to_string())
            } else {
                let indent = &line[..line.len() - body.len()];
                let head_end = body.find('#').unwrap_or(body.len());
                let value = body[..head_end].trim_end();
                found.insert(value.to_string());
                Entry::Hostname {
                    indent: indent.to_string(),
                    value: value.to_string(),
                    tail: body[value.len()..].to_string(),
                }
            };
            lines.push(Line { entry, eol });
        }

        if found.len() > 1 {
            return Err(HostnameParseError::MultipleHostnames(
                found.into_iter().collect(),
            ));
        }

        Ok(Self { lines })
    }

    /// The active hostname, if the file has one.
    pub fn hostname(&self) -> Option<&str> {
        self.lines.iter().find_map(|line| match &line.entry {
            Entry::Hostname { value, .. } => Some(value.as_str()),
            _ => None,
        })
    }

    /// Line ending new lines get: the file's first terminator, else `\n`.
    fn newline(&self) -> &'static str {
        self.lines
            .iter()
            .map(|line| line.eol)
            .find(|eol| !eol.is_empty())
            .unwrap_or("\n")
    }

    /// Replace the hostname value in place, or append a hostname line.
    ///
    /// Surrounding whitespace is stripped; an empty name leaves the config untouched.
    pub fn set_hostname(&mut self, name: &str) {
        let name = name.trim();
        if name.is_empty() {
            return;
        }

        let newline = self.newline();
        if let Some(last) = self.lines.last_mut() {
            if last.eol.is_empty() {
                last.eol = newline;
            }
        }

        let mut replaced = false;
        for line in &mut self.lines {
            if let Entry::Hostname { value, .. } = &mut line.entry {
                *value = name.to_string();
                replaced = true;
            }
        }
        if !replaced {
            self.lines.push(Line {
                entry: Entry::Hostname {
                    indent: String::new(),
                    value: name.to_string(),
                    tail: String::new(),
                },
                eol: newline,
            });
        }
    }
}

impl FromStr for HostnameConf {
    type Err = HostnameParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for HostnameConf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            match &line.entry {
                Entry::Blank(text) | Entry::Comment(text) => f.write_str(text)?,
                Entry::Hostname {
                    indent,
                    value,
                    tail,
                } => write!(f, "{indent}{value}{tail}")?,
            }
            f.write_str(line.eol)?;
        }
        Ok(())
    }
}
