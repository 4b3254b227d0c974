//! Host defaults: where BIND expects zone files and where output goes.

use std::fs;
use std::path::PathBuf;

const OS_RELEASE: &str = "/etc/os-release";
const RHEL_BIND_DIR: &str = "/etc/named";
const DEBIAN_BIND_DIR: &str = "/etc/bind";

/// BIND configuration directory for the running host.
pub fn detect_bind_dir() -> String {
    match fs::read_to_string(OS_RELEASE) {
        Ok(contents) => bind_dir_for_os_release(&contents).to_string(),
        Err(_) => DEBIAN_BIND_DIR.to_string(),
    }
}

/// Pick the BIND directory from `/etc/os-release` contents.
///
/// CentOS and RHEL derivatives use `/etc/named`; everything else gets the
/// Debian/Ubuntu layout.
pub fn bind_dir_for_os_release(contents: &str) -> &'static str {
    let rhel_like = contents.lines().any(|line| {
        let Some((key, value)) = line.split_once('=') else {
            return false;
        };
        if key.trim() != "ID" && key.trim() != "ID_LIKE" {
            return false;
        }
        value
            .trim()
            .trim_matches('"')
            .split_whitespace()
            .any(|id| matches!(id.to_ascii_lowercase().as_str(), "centos" | "rhel"))
    });

    if rhel_like {
        RHEL_BIND_DIR
    } else {
        DEBIAN_BIND_DIR
    }
}

/// Default output directory: `$HOME`, or the current directory without one.
pub fn default_output_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."))
}
