//! Text for resource records, zone file skeletons and `named.conf.local`
//! stanzas.
//!
//! Everything here is pure string assembly from already-validated fields;
//! each rendered piece ends with a newline so pieces can be appended to a
//! file back to back.

use zone_text_core::{render, Fields, RenderError};

use crate::serial::Serial;

/// Default `$TTL` and negative-cache TTL, in seconds.
pub const DEFAULT_TTL: u32 = 604_800;
pub const REFRESH: u32 = 604_800;
pub const RETRY: u32 = 86_400;
pub const EXPIRE: u32 = 2_419_200;
pub const NEGATIVE_CACHE_TTL: u32 = 604_800;

/// MX preference used when none is supplied.
pub const DEFAULT_MX_PREFERENCE: &str = "10";

const MASTER_STANZA: &str = "zone \"{{zone_name}}\" {
\ttype master;
\tfile \"{{bind_dir}}/{{file}}\";
\tallow-update { none; };
};
";

const SOA_HEADER: &str = "$TTL\t{{ttl}}
@\tIN\tSOA\t{{ns_hostname}}.{{domain_name}}. root.{{domain_name}}. (
\t\t{{serial}}\t; Serial
\t\t{{refresh}}\t; Refresh
\t\t{{retry}}\t; Retry
\t\t{{expire}}\t; Expire
\t\t{{negative}} )\t; Negative Cache TTL
;
@\tIN\tNS\t{{ns_hostname}}.{{domain_name}}.
";

const A_RECORD: &str = "{{hostname}}\tIN\tA\t{{address}}\n";
const PTR_RECORD: &str = "{{label}}\tIN\tPTR\t{{hostname}}.{{domain_name}}.\n";
const CNAME_RECORD: &str = "{{alias}}\tIN\tCNAME\t{{target}}.{{domain_name}}.\n";
const TXT_RECORD: &str = "{{name}}.{{domain_name}}.\tIN\tTXT\t\"{{contents}}\"\n";
const MX_RECORD: &str = "@\t{{ttl}}IN\tMX\t{{preference}} {{hostname}}.{{domain_name}}.\n";

/// A single record line destined for a zone file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceRecord {
    A {
        hostname: String,
        address: String,
    },
    Ptr {
        label: String,
        hostname: String,
    },
    Cname {
        alias: String,
        target: String,
    },
    Txt {
        name: String,
        contents: String,
    },
    Mx {
        preference: String,
        ttl: String,
        hostname: String,
    },
}

impl ResourceRecord {
    /// MX record with the default preference and no explicit TTL.
    pub fn mx(hostname: impl Into<String>) -> Self {
        Self::Mx {
            preference: DEFAULT_MX_PREFERENCE.to_string(),
            ttl: String::new(),
            hostname: hostname.into(),
        }
    }

    /// Record type mnemonic.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::A { .. } => "A",
            Self::Ptr { .. } => "PTR",
            Self::Cname { .. } => "CNAME",
            Self::Txt { .. } => "TXT",
            Self::Mx { .. } => "MX",
        }
    }

    /// Render the record line for a zone belonging to `domain_name`.
    pub fn render(&self, domain_name: &str) -> Result<String, RenderError> {
        let fields = Fields::new().set("domain_name", domain_name);
        match self {
            Self::A { hostname, address } => render(
                A_RECORD,
                &fields.set("hostname", hostname).set("address", address),
            ),
            Self::Ptr { label, hostname } => render(
                PTR_RECORD,
                &fields.set("label", label).set("hostname", hostname),
            ),
            Self::Cname { alias, target } => render(
                CNAME_RECORD,
                &fields.set("alias", alias).set("target", target),
            ),
            Self::Txt { name, contents } => render(
                TXT_RECORD,
                &fields
                    .set("name", name)
                    .set("contents", escape_txt(contents)),
            ),
            Self::Mx {
                preference,
                ttl,
                hostname,
            } => {
                let preference = match preference.trim() {
                    "" => DEFAULT_MX_PREFERENCE,
                    p => p,
                };
                let ttl = match ttl.trim() {
                    "" => String::new(),
                    t => format!("{t}\t"),
                };
                render(
                    MX_RECORD,
                    &fields
                        .set("preference", preference)
                        .set("ttl", ttl)
                        .set("hostname", hostname),
                )
            }
        }
    }
}

fn escape_txt(contents: &str) -> String {
    contents.replace('\\', "\\\\").replace('"', "\\\"")
}

/// The fixed header of a newly created zone file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ZoneSkeleton {
    /// Forward zone: SOA, NS, and the nameserver's own A record.
    Forward { ns_address: String },
    /// Reverse zone: SOA and NS.
    Reverse,
}

impl ZoneSkeleton {
    pub fn render(
        &self,
        domain_name: &str,
        ns_hostname: &str,
        serial: &Serial,
    ) -> Result<String, RenderError> {
        let fields = Fields::new()
            .set("ttl", DEFAULT_TTL.to_string())
            .set("ns_hostname", ns_hostname)
            .set("domain_name", domain_name)
            .set("serial", serial.as_str())
            .set("refresh", REFRESH.to_string())
            .set("retry", RETRY.to_string())
            .set("expire", EXPIRE.to_string())
            .set("negative", NEGATIVE_CACHE_TTL.to_string());
        let mut out = render(SOA_HEADER, &fields)?;

        if let Self::Forward { ns_address } = self {
            let own = ResourceRecord::A {
                hostname: ns_hostname.to_string(),
                address: ns_address.clone(),
            };
            out.push_str(&own.render(domain_name)?);
        }
        Ok(out)
    }
}

/// `named.conf.local` stanza declaring a master zone stored at
/// `<bind_dir>/<file>`.
pub fn master_stanza(zone_name: &str, bind_dir: &str, file: &str) -> Result<String, RenderError> {
    let bind_dir = bind_dir.trim_end_matches('/');
    render(
        MASTER_STANZA,
        &Fields::new()
            .set("zone_name", zone_name)
            .set("bind_dir", bind_dir)
            .set("file", file),
    )
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    use super::{master_stanza, ResourceRecord, ZoneSkeleton};
    use crate::serial::{Serial, SerialStyle};

    const DOMAIN: &str = "example.local";

    fn serial() -> Serial {
        let date = NaiveDate::from_ymd_opt(2026, 10, 16).expect("valid date");
        Serial::generate(date, 7, SerialStyle::Padded)
    }

    #[test]
    fn renders_each_record_kind() {
        let cases = [
            (
                ResourceRecord::A {
                    hostname: "www".into(),
                    address: "192.168.10.20".into(),
                },
                "www\tIN\tA\t192.168.10.20\n",
            ),
            (
                ResourceRecord::Ptr {
                    label: "20".into(),
                    hostname: "www".into(),
                },
                "20\tIN\tPTR\twww.example.local.\n",
            ),
            (
                ResourceRecord::Cname {
                    alias: "ftp".into(),
                    target: "files".into(),
                },
                "ftp\tIN\tCNAME\tfiles.example.local.\n",
            ),
            (
                ResourceRecord::Txt {
                    name: "_acme".into(),
                    contents: "v=spf1 -all".into(),
                },
                "_acme.example.local.\tIN\tTXT\t\"v=spf1 -all\"\n",
            ),
            (
                ResourceRecord::mx("mail"),
                "@\tIN\tMX\t10 mail.example.local.\n",
            ),
        ];

        for (record, expected) in cases {
            assert_eq!(record.render(DOMAIN).expect("render"), expected, "{}", record.kind());
        }
    }

    #[test]
    fn mx_with_ttl_and_preference() {
        let record = ResourceRecord::Mx {
            preference: "20".into(),
            ttl: "3600".into(),
            hostname: "backup".into(),
        };
        assert_eq!(
            record.render(DOMAIN).expect("render"),
            "@\t3600\tIN\tMX\t20 backup.example.local.\n"
        );
    }

    #[test]
    fn mx_blank_preference_falls_back_to_default() {
        let record = ResourceRecord::Mx {
            preference: " ".into(),
            ttl: String::new(),
            hostname: "mail".into(),
        };
        assert!(record.render(DOMAIN).expect("render").contains("MX\t10 mail"));
    }

    #[test]
    fn txt_contents_are_escaped() {
        let record = ResourceRecord::Txt {
            name: "note".into(),
            contents: r#"say "hi" \o/"#.into(),
        };
        assert_eq!(
            record.render(DOMAIN).expect("render"),
            "note.example.local.\tIN\tTXT\t\"say \\\"hi\\\" \\\\o/\"\n"
        );
    }

    #[test]
    fn forward_skeleton_has_soa_ns_and_own_a() {
        let text = ZoneSkeleton::Forward {
            ns_address: "192.168.10.1".into(),
        }
        .render(DOMAIN, "ns", &serial())
        .expect("render");

        assert!(text.starts_with("$TTL\t604800\n"));
        assert!(text.contains("@\tIN\tSOA\tns.example.local. root.example.local. ("));
        assert!(text.contains("26101607\t; Serial"));
        assert!(text.contains("86400\t; Retry"));
        assert!(text.contains("2419200\t; Expire"));
        assert!(text.contains("@\tIN\tNS\tns.example.local.\n"));
        assert!(text.ends_with("ns\tIN\tA\t192.168.10.1\n"));
    }

    #[test]
    fn reverse_skeleton_has_no_address_records() {
        let text = ZoneSkeleton::Reverse
            .render(DOMAIN, "ns", &serial())
            .expect("render");
        assert!(text.contains("@\tIN\tNS\tns.example.local.\n"));
        assert!(!text.contains("\tA\t"));
    }

    #[test]
    fn stanza_joins_bind_dir_and_file() {
        let text = master_stanza("10.168.192.in-addr.arpa", "/etc/bind/", "db.192.168.10")
            .expect("render");
        assert_eq!(
            text,
            "zone \"10.168.192.in-addr.arpa\" {\n\ttype master;\n\tfile \"/etc/bind/db.192.168.10\";\n\tallow-update { none; };\n};\n"
        );
    }
}
