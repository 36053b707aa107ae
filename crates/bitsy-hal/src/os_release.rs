//! Parsing helpers for `/etc/os-release`.

use crate::OsReleaseInfo;

fn unquote(value: &str) -> String {
    value.trim().trim_matches('"').trim_matches('\'').to_string()
}

/// Parses `os-release` content into `ID` / `VERSION_ID`. `id` is lowercased.
pub fn parse_os_release_info(content: &str) -> OsReleaseInfo {
    let mut id: Option<String> = None;
    let mut version_id: Option<String> = None;

    for line in content.lines() {
        if let Some(value) = line.strip_prefix("ID=") {
            id = Some(unquote(value).to_lowercase()).filter(|v| !v.is_empty());
        } else if let Some(value) = line.strip_prefix("VERSION_ID=") {
            version_id = Some(unquote(value)).filter(|v| !v.is_empty());
        }
    }

    OsReleaseInfo { id, version_id }
}
