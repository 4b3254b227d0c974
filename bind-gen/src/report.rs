use std::path::PathBuf;

use colored::Colorize;
use serde::Serialize;

use crate::address::ParsedAddress;
use crate::changeset::{Changeset, Notice};
use crate::zone_id::{reverse_host_label, ReverseZoneIdentity};

/// Green status line for a completed step.
pub fn success(message: &str) -> String {
    message.green().to_string()
}

/// Yellow warning line.
pub fn warning(message: impl std::fmt::Display) -> String {
    format!("warning: {message}").yellow().to_string()
}

/// Red error line.
pub fn failure(message: impl std::fmt::Display) -> String {
    format!("error: {message}").red().to_string()
}

/// Render the notices of a changeset, one warning line each.
pub fn render_notices(notices: &[Notice]) -> Vec<String> {
    notices
        .iter()
        .map(|notice| match notice {
            Notice::SelfRegistered { .. } => success(&notice.to_string()),
            _ => warning(notice),
        })
        .collect()
}

/// Render the per-write summaries of an applied changeset.
pub fn render_applied(changeset: &Changeset) -> Vec<String> {
    changeset
        .writes
        .iter()
        .map(|write| success(&write.summary))
        .collect()
}

/// Names derived from one address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub address: String,
    pub prefix: u8,
    pub zone_file_id: String,
    pub zone_name: String,
    pub host_label: String,
}

impl Resolution {
    pub fn of(address: &ParsedAddress) -> Self {
        let ReverseZoneIdentity {
            zone_file_id,
            zone_name,
        } = ReverseZoneIdentity::of(address);
        Self {
            address: address.to_string(),
            prefix: address.prefix.bits(),
            zone_file_id,
            zone_name,
            host_label: reverse_host_label(address),
        }
    }
}

pub fn render_resolution(resolution: &Resolution) -> String {
    [
        format!("address={}", resolution.address),
        format!("zone_file={}", resolution.zone_file_id),
        format!("reverse_zone={}", resolution.zone_name),
        format!("host_label={}", resolution.host_label),
    ]
    .join("\n")
}

/// Outcome of a batch `generate` run.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateReport {
    pub domain: String,
    pub nameserver: String,
    pub serial: String,
    pub output_dir: PathBuf,
    pub reverse_zones: Vec<ReverseZoneIdentity>,
    pub files: Vec<PathBuf>,
    pub notices: Vec<Notice>,
}

pub fn render_generate_text(report: &GenerateReport) -> String {
    let mut out = Vec::new();
    out.push(format!(
        "generate domain={} nameserver={} serial={}",
        report.domain, report.nameserver, report.serial
    ));
    out.push(format!("output_dir={}", report.output_dir.display()));
    out.push("reverse_zones".to_string());
    for zone in &report.reverse_zones {
        out.push(format!("- {} file={}", zone.zone_name, zone.zone_file_id));
    }
    out.push("files".to_string());
    let mut files = report.files.clone();
    files.sort();
    files.dedup();
    for file in files {
        out.push(format!("- {}", file.display()));
    }
    out.extend(render_notices(&report.notices));
    out.join("\n")
}
