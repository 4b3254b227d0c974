//! The nameserver session: domain identity, serial, output location and the
//! registry of reverse zones created so far.
//!
//! Operations never touch the filesystem. Each returns a [`Changeset`]
//! describing the text to write, which the caller hands to
//! [`crate::changeset::apply`]. Duplicate and missing zone errors are raised
//! before any text is produced. The registry only changes in
//! [`NameServer::commit`], which the caller invokes once the writes of a
//! changeset have landed, so a failed write never leaves a zone registered.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use thiserror::Error;
use zone_text_core::{RenderError, WriteMode};

use crate::address::{validate, AddressError, AddressWarning, ParsedAddress, Validated};
use crate::changeset::{Changeset, Effect, Notice};
use crate::config::Settings;
use crate::platform::{default_output_dir, detect_bind_dir};
use crate::records::{master_stanza, ResourceRecord, ZoneSkeleton};
use crate::serial::Serial;
use crate::zone_id::{reverse_host_label, ReverseZoneIdentity};

/// Master config file every zone stanza is appended to.
pub const MASTER_CONFIG: &str = "named.conf.local";

/// Errors returned by session operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error(transparent)]
    Address(#[from] AddressError),
    #[error("invalid nameserver FQDN {0:?}: expected <hostname>.<domain>")]
    InvalidFqdn(String),
    #[error("reverse zone {zone} already exists ({file})")]
    DuplicateZone { zone: String, file: String },
    #[error("reverse zone {zone} for {address} does not exist; PTR record for {hostname} not added")]
    MissingZone {
        address: String,
        zone: String,
        hostname: String,
    },
    #[error("{path} is not valid or does not exist")]
    Path { path: String },
    #[error("failed to render zone text: {0}")]
    Render(#[from] RenderError),
}

/// Outcome of [`NameServer::set_output_path`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputPathChange {
    /// Empty input; the current path is kept.
    Unchanged(PathBuf),
    Changed(PathBuf),
}

/// Fields for a record to add to an existing zone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordRequest {
    A { hostname: String, address: String },
    Ptr { hostname: String, address: String },
    Cname { alias: String, target: String },
    Txt { name: String, contents: String },
    Mx {
        hostname: String,
        preference: String,
        ttl: String,
    },
}

/// A freshly initialized session plus any warning raised for its address.
#[derive(Debug, Clone)]
pub struct Initialized {
    pub session: NameServer,
    pub warning: Option<AddressWarning>,
}

#[derive(Debug, Clone)]
pub struct NameServer {
    domain_name: String,
    ns_hostname: String,
    ns_address: ParsedAddress,
    serial: Serial,
    output_path: PathBuf,
    bind_dir: String,
    reverse_zones: BTreeSet<ReverseZoneIdentity>,
    forward_zone_created: bool,
}

impl NameServer {
    /// Start a session for the nameserver `fqdn` at `cidr_address`.
    pub fn initialize(
        fqdn: &str,
        cidr_address: &str,
        settings: &Settings,
    ) -> Result<Initialized, SessionError> {
        let serial = Serial::today(settings.serial.style);
        Self::initialize_with_serial(fqdn, cidr_address, settings, serial)
    }

    /// Like [`NameServer::initialize`] with a caller-chosen serial.
    pub fn initialize_with_serial(
        fqdn: &str,
        cidr_address: &str,
        settings: &Settings,
        serial: Serial,
    ) -> Result<Initialized, SessionError> {
        let (ns_hostname, domain_name) = split_fqdn(fqdn)?;
        let Validated { address, warning } = validate(cidr_address)?;

        let output_path = settings
            .paths
            .output_dir
            .clone()
            .unwrap_or_else(default_output_dir);
        let bind_dir = settings
            .paths
            .bind_dir
            .clone()
            .unwrap_or_else(detect_bind_dir);

        tracing::debug!(
            ns = %ns_hostname,
            domain = %domain_name,
            address = %address,
            serial = %serial,
            "initialized nameserver session"
        );

        Ok(Initialized {
            session: Self {
                domain_name,
                ns_hostname,
                ns_address: address,
                serial,
                output_path,
                bind_dir,
                reverse_zones: BTreeSet::new(),
                forward_zone_created: false,
            },
            warning,
        })
    }

    pub fn domain_name(&self) -> &str {
        &self.domain_name
    }

    pub fn ns_hostname(&self) -> &str {
        &self.ns_hostname
    }

    pub fn ns_address(&self) -> &ParsedAddress {
        &self.ns_address
    }

    pub fn serial(&self) -> &Serial {
        &self.serial
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    pub fn bind_dir(&self) -> &str {
        &self.bind_dir
    }

    pub fn forward_zone_created(&self) -> bool {
        self.forward_zone_created
    }

    pub fn reverse_zones(&self) -> impl Iterator<Item = &ReverseZoneIdentity> {
        self.reverse_zones.iter()
    }

    pub fn has_reverse_zone(&self, identity: &ReverseZoneIdentity) -> bool {
        self.reverse_zones.contains(identity)
    }

    /// Point output at `path`. Empty input keeps the current directory; a
    /// path that is not an existing directory is rejected and the current
    /// one kept.
    pub fn set_output_path(&mut self, path: &str) -> Result<OutputPathChange, SessionError> {
        let path = path.trim();
        if path.is_empty() {
            return Ok(OutputPathChange::Unchanged(self.output_path.clone()));
        }
        let candidate = PathBuf::from(path);
        if !candidate.is_dir() {
            return Err(SessionError::Path {
                path: path.to_string(),
            });
        }
        tracing::debug!(path = %candidate.display(), "output path changed");
        self.output_path = candidate.clone();
        Ok(OutputPathChange::Changed(candidate))
    }

    /// Stanza for the domain plus a fresh forward zone file.
    ///
    /// Once the forward zone has been committed, running it again only
    /// rewrites the zone file; `named.conf.local` keeps its single stanza.
    pub fn create_forward_zone(&self) -> Result<Changeset, SessionError> {
        let zone = ZoneSkeleton::Forward {
            ns_address: self.ns_address.ip().to_string(),
        }
        .render(&self.domain_name, &self.ns_hostname, &self.serial)?;

        let mut changeset = Changeset::default();
        if self.forward_zone_created {
            changeset.notice(Notice::ForwardZoneRewritten {
                domain: self.domain_name.clone(),
            });
        } else {
            let stanza = master_stanza(&self.domain_name, &self.bind_dir, &self.domain_name)?;
            changeset.push_write(
                MASTER_CONFIG,
                WriteMode::Append,
                stanza,
                format!("Set forward lookup zone for {} in {MASTER_CONFIG}", self.domain_name),
            );
        }
        changeset.push_write(
            self.domain_name.clone(),
            WriteMode::Create,
            zone,
            format!("Created forward lookup zone file {}", self.domain_name),
        );
        changeset.effect(Effect::ForwardZoneCreated);

        tracing::debug!(domain = %self.domain_name, "forward zone composed");
        Ok(changeset)
    }

    /// Compose the reverse zone containing `cidr_address`. The zone is
    /// registered when the changeset is committed.
    ///
    /// When the zone is the nameserver's own reverse zone its PTR record is
    /// appended as part of the same changeset.
    pub fn create_reverse_zone(&self, cidr_address: &str) -> Result<Changeset, SessionError> {
        let Validated { address, warning } = validate(cidr_address)?;
        let identity = ReverseZoneIdentity::of(&address);
        if self.reverse_zones.contains(&identity) {
            return Err(duplicate(&identity));
        }

        let stanza = master_stanza(&identity.zone_name, &self.bind_dir, &identity.zone_file_id)?;
        let zone =
            ZoneSkeleton::Reverse.render(&self.domain_name, &self.ns_hostname, &self.serial)?;
        let self_ptr = if identity == ReverseZoneIdentity::of(&self.ns_address) {
            let record = ResourceRecord::Ptr {
                label: reverse_host_label(&self.ns_address),
                hostname: self.ns_hostname.clone(),
            };
            Some(record.render(&self.domain_name)?)
        } else {
            None
        };

        let mut changeset = Changeset::default();
        if let Some(warning) = warning {
            changeset.notice(Notice::Address { warning });
        }
        changeset.push_write(
            MASTER_CONFIG,
            WriteMode::Append,
            stanza,
            format!("Added reverse lookup zone for {} to {MASTER_CONFIG}", identity.zone_name),
        );
        changeset.push_write(
            identity.zone_file_id.clone(),
            WriteMode::Create,
            zone,
            format!("Reverse lookup zone file {} created", identity.zone_file_id),
        );
        if let Some(line) = self_ptr {
            changeset.push_write(
                identity.zone_file_id.clone(),
                WriteMode::Append,
                line.clone(),
                format!("{} was added to {}", line.trim_end(), identity.zone_file_id),
            );
            changeset.notice(Notice::SelfRegistered {
                hostname: self.ns_hostname.clone(),
                zone: identity.zone_name.clone(),
            });
        }

        tracing::debug!(zone = %identity.zone_name, file = %identity.zone_file_id, "reverse zone composed");
        changeset.effect(Effect::ReverseZoneRegistered(identity));
        Ok(changeset)
    }

    /// Record the registry effects of a changeset whose writes were applied.
    pub fn commit(&mut self, changeset: &Changeset) {
        for effect in &changeset.effects {
            match effect {
                Effect::ForwardZoneCreated => self.forward_zone_created = true,
                Effect::ReverseZoneRegistered(identity) => {
                    tracing::debug!(zone = %identity.zone_name, "reverse zone registered");
                    self.reverse_zones.insert(identity.clone());
                }
            }
        }
    }

    /// Mark a reverse zone written by an earlier run as present, without
    /// producing any text, so PTR records can be appended to it.
    pub fn register_existing_reverse_zone(
        &mut self,
        cidr_address: &str,
    ) -> Result<ReverseZoneIdentity, SessionError> {
        let identity = ReverseZoneIdentity::of(&validate(cidr_address)?.address);
        if !self.reverse_zones.insert(identity.clone()) {
            return Err(duplicate(&identity));
        }
        tracing::debug!(zone = %identity.zone_name, "existing reverse zone adopted");
        Ok(identity)
    }

    /// Compose a single record.
    ///
    /// PTR records go to the reverse zone of their address, which must be
    /// registered. All other kinds go to the forward zone file.
    pub fn add_record(&self, request: RecordRequest) -> Result<Changeset, SessionError> {
        let mut changeset = Changeset::default();

        let (record, file) = match request {
            RecordRequest::Ptr { hostname, address } => {
                let Validated { address, warning } = validate(&address)?;
                let identity = ReverseZoneIdentity::of(&address);
                if !self.reverse_zones.contains(&identity) {
                    return Err(SessionError::MissingZone {
                        address: address.to_string(),
                        zone: identity.zone_name,
                        hostname,
                    });
                }
                if let Some(warning) = warning {
                    changeset.notice(Notice::Address { warning });
                }
                let record = ResourceRecord::Ptr {
                    label: reverse_host_label(&address),
                    hostname,
                };
                (record, identity.zone_file_id)
            }
            RecordRequest::A { hostname, address } => {
                let Validated { address, warning } = validate(&address)?;
                if let Some(warning) = warning {
                    changeset.notice(Notice::Address { warning });
                }
                let record = ResourceRecord::A {
                    hostname,
                    address: address.ip().to_string(),
                };
                (record, self.domain_name.clone())
            }
            RecordRequest::Cname { alias, target } => {
                (ResourceRecord::Cname { alias, target }, self.domain_name.clone())
            }
            RecordRequest::Txt { name, contents } => {
                (ResourceRecord::Txt { name, contents }, self.domain_name.clone())
            }
            RecordRequest::Mx {
                hostname,
                preference,
                ttl,
            } => (
                ResourceRecord::Mx {
                    preference,
                    ttl,
                    hostname,
                },
                self.domain_name.clone(),
            ),
        };

        if file == self.domain_name && !self.forward_zone_created {
            changeset.notice(Notice::ForwardZoneNotCreated {
                domain: self.domain_name.clone(),
            });
        }

        let line = record.render(&self.domain_name)?;
        tracing::debug!(kind = record.kind(), file = %file, "record composed");
        let summary = format!("{} was added to {file}", line.trim_end());
        changeset.push_write(file, WriteMode::Append, line, summary);
        Ok(changeset)
    }
}

fn duplicate(identity: &ReverseZoneIdentity) -> SessionError {
    SessionError::DuplicateZone {
        zone: identity.zone_name.clone(),
        file: identity.zone_file_id.clone(),
    }
}

/// Split `ns.example.local` into (`ns`, `example.local`).
fn split_fqdn(fqdn: &str) -> Result<(String, String), SessionError> {
    let fqdn = fqdn.trim().trim_end_matches('.');
    let invalid = || SessionError::InvalidFqdn(fqdn.to_string());

    let (host, domain) = fqdn.split_once('.').ok_or_else(invalid)?;
    if host.is_empty() || domain.split('.').any(str::is_empty) {
        return Err(invalid());
    }
    Ok((host.to_string(), domain.to_string()))
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use zone_text_core::WriteMode;

    use super::{NameServer, OutputPathChange, RecordRequest, SessionError, MASTER_CONFIG};
    use crate::address::{AddressError, AddressWarning, Prefix};
    use crate::changeset::{Changeset, Effect, Notice};
    use crate::config::Settings;
    use crate::serial::{Serial, SerialStyle};

    fn settings() -> Settings {
        let mut settings = Settings::default();
        settings.paths.bind_dir = Some("/etc/bind".to_string());
        settings.paths.output_dir = Some(std::env::temp_dir());
        settings
    }

    fn session(address: &str) -> NameServer {
        let date = NaiveDate::from_ymd_opt(2026, 10, 16).expect("valid date");
        NameServer::initialize_with_serial(
            "ns.example.local",
            address,
            &settings(),
            Serial::generate(date, 42, SerialStyle::Padded),
        )
        .expect("initialize")
        .session
    }

    fn forward(ns: &mut NameServer) -> Changeset {
        let changeset = ns.create_forward_zone().expect("forward");
        ns.commit(&changeset);
        changeset
    }

    fn reverse(ns: &mut NameServer, cidr: &str) -> Changeset {
        let changeset = ns.create_reverse_zone(cidr).expect("reverse");
        ns.commit(&changeset);
        changeset
    }

    fn ptr(hostname: &str, address: &str) -> RecordRequest {
        RecordRequest::Ptr {
            hostname: hostname.to_string(),
            address: address.to_string(),
        }
    }

    #[test]
    fn initialize_splits_fqdn() {
        let ns = session("192.168.10.1/24");
        assert_eq!(ns.ns_hostname(), "ns");
        assert_eq!(ns.domain_name(), "example.local");
        assert_eq!(ns.serial().as_str(), "26101642");
        assert_eq!(ns.bind_dir(), "/etc/bind");
        assert_eq!(ns.reverse_zones().count(), 0);
    }

    #[test]
    fn initialize_rejects_bare_hostname_and_bad_address() {
        let err = NameServer::initialize("localhost", "10.0.0.1/8", &settings())
            .expect_err("single label");
        assert!(matches!(err, SessionError::InvalidFqdn(_)));

        let err = NameServer::initialize("ns..local", "10.0.0.1/8", &settings())
            .expect_err("empty label");
        assert!(matches!(err, SessionError::InvalidFqdn(_)));

        let err = NameServer::initialize("ns.example.local", "10.0.0.1/32", &settings())
            .expect_err("bad prefix");
        assert_eq!(
            err,
            SessionError::Address(AddressError::UnsupportedPrefix("32".to_string()))
        );
    }

    #[test]
    fn initialize_reports_missing_prefix() {
        let init = NameServer::initialize("ns.example.local", "192.168.10.1", &settings())
            .expect("initialize");
        assert_eq!(
            init.warning,
            Some(AddressWarning::MissingPrefix {
                assumed: Prefix::Slash24
            })
        );
        assert_eq!(init.session.ns_address().prefix, Prefix::Slash24);
    }

    #[test]
    fn empty_output_path_is_a_no_op() {
        let mut ns = session("192.168.10.1/24");
        let before = ns.output_path().to_path_buf();
        assert_eq!(
            ns.set_output_path("  ").expect("no-op"),
            OutputPathChange::Unchanged(before.clone())
        );
        assert_eq!(ns.output_path(), before);
    }

    #[test]
    fn invalid_output_path_keeps_previous_value() {
        let mut ns = session("192.168.10.1/24");
        let dir = tempfile::tempdir().expect("tempdir");
        ns.set_output_path(dir.path().to_str().expect("utf-8"))
            .expect("valid dir");

        let missing = dir.path().join("nope");
        let err = ns
            .set_output_path(missing.to_str().expect("utf-8"))
            .expect_err("missing dir");
        assert!(matches!(err, SessionError::Path { .. }));
        assert_eq!(ns.output_path(), dir.path());
    }

    #[test]
    fn forward_zone_appends_stanza_and_creates_zone_file() {
        let mut ns = session("192.168.10.1/24");
        let changeset = forward(&mut ns);

        assert_eq!(changeset.writes.len(), 2);
        let stanza = &changeset.writes[0];
        assert_eq!(stanza.file, MASTER_CONFIG);
        assert_eq!(stanza.mode, WriteMode::Append);
        assert!(stanza.contents.contains("zone \"example.local\" {"));
        assert!(stanza.contents.contains("file \"/etc/bind/example.local\";"));

        let zone = &changeset.writes[1];
        assert_eq!(zone.file, "example.local");
        assert_eq!(zone.mode, WriteMode::Create);
        assert!(zone.contents.contains("26101642\t; Serial"));
        assert!(zone.contents.ends_with("ns\tIN\tA\t192.168.10.1\n"));
        assert!(ns.forward_zone_created());
    }

    #[test]
    fn recreated_forward_zone_rewrites_file_without_second_stanza() {
        let mut ns = session("192.168.10.1/24");
        forward(&mut ns);

        let again = forward(&mut ns);
        assert_eq!(again.writes_to(MASTER_CONFIG).count(), 0);
        assert_eq!(again.writes.len(), 1);
        assert_eq!(again.writes[0].file, "example.local");
        assert_eq!(again.writes[0].mode, WriteMode::Create);
        assert_eq!(
            again.notices,
            vec![Notice::ForwardZoneRewritten {
                domain: "example.local".to_string()
            }]
        );
    }

    #[test]
    fn composing_zones_leaves_registry_alone_until_commit() {
        let mut ns = session("192.168.10.1/24");

        let forward_zone = ns.create_forward_zone().expect("forward");
        let reverse_zone = ns.create_reverse_zone("10.20.0.0/16").expect("reverse");
        assert!(!ns.forward_zone_created());
        assert_eq!(ns.reverse_zones().count(), 0);
        assert!(matches!(
            ns.add_record(ptr("www", "10.20.30.40/16")),
            Err(SessionError::MissingZone { .. })
        ));
        ns.create_reverse_zone("10.20.0.0/16")
            .expect("uncommitted zone can be composed again");

        ns.commit(&forward_zone);
        ns.commit(&reverse_zone);
        assert!(ns.forward_zone_created());
        assert_eq!(ns.reverse_zones().count(), 1);
        assert!(matches!(
            reverse_zone.effects.as_slice(),
            [Effect::ReverseZoneRegistered(identity)] if identity.zone_file_id == "db.10.20"
        ));
        ns.add_record(ptr("www", "10.20.30.40/16")).expect("ptr after commit");
    }

    #[test]
    fn duplicate_reverse_zone_fails_and_leaves_registry_unchanged() {
        let mut ns = session("192.168.10.1/24");
        reverse(&mut ns, "10.20.0.0/16");
        let size = ns.reverse_zones().count();

        let err = ns.create_reverse_zone("10.20.99.1/16").expect_err("second");
        assert_eq!(
            err,
            SessionError::DuplicateZone {
                zone: "20.10.in-addr.arpa".to_string(),
                file: "db.10.20".to_string(),
            }
        );
        assert_eq!(ns.reverse_zones().count(), size);
    }

    #[test]
    fn same_network_different_prefix_is_a_new_zone() {
        let mut ns = session("192.168.10.1/24");
        reverse(&mut ns, "10.20.30.0/24");
        reverse(&mut ns, "10.20.30.0/16");
        assert_eq!(ns.reverse_zones().count(), 2);
    }

    #[test]
    fn ptr_without_reverse_zone_is_missing_zone() {
        let ns = session("192.168.10.1/24");
        let err = ns.add_record(ptr("www", "10.20.20.20/24")).expect_err("no zone");
        assert_eq!(
            err,
            SessionError::MissingZone {
                address: "10.20.20.20/24".to_string(),
                zone: "20.20.10.in-addr.arpa".to_string(),
                hostname: "www".to_string(),
            }
        );
    }

    #[test]
    fn ptr_targets_registered_reverse_zone() {
        let mut ns = session("192.168.10.1/24");
        reverse(&mut ns, "10.20.0.0/16");

        let changeset = ns.add_record(ptr("www", "10.20.30.40/16")).expect("ptr");
        assert_eq!(changeset.writes.len(), 1);
        assert_eq!(changeset.writes[0].file, "db.10.20");
        assert_eq!(changeset.writes[0].mode, WriteMode::Append);
        assert_eq!(changeset.writes[0].contents, "40.30\tIN\tPTR\twww.example.local.\n");
    }

    #[test]
    fn own_reverse_zone_registers_nameserver_ptr_once() {
        let mut ns = session("192.168.10.1/24");
        forward(&mut ns);

        let changeset = reverse(&mut ns, "192.168.10.0/24");
        let zone_writes: Vec<_> = changeset.writes_to("db.192.168.10").collect();
        assert_eq!(zone_writes.len(), 2);
        assert_eq!(zone_writes[0].mode, WriteMode::Create);
        assert_eq!(zone_writes[1].contents, "1\tIN\tPTR\tns.example.local.\n");
        assert!(changeset.notices.contains(&Notice::SelfRegistered {
            hostname: "ns".to_string(),
            zone: "10.168.192.in-addr.arpa".to_string(),
        }));

        assert!(ns.create_reverse_zone("192.168.10.77/24").is_err());
    }

    #[test]
    fn foreign_reverse_zone_has_no_nameserver_ptr() {
        let ns = session("192.168.10.1/24");
        let changeset = ns.create_reverse_zone("10.20.20.0/24").expect("reverse");
        assert!(changeset.writes.iter().all(|w| !w.contents.contains("PTR")));
        assert!(changeset.notices.is_empty());
    }

    #[test]
    fn wider_zone_around_nameserver_has_no_nameserver_ptr() {
        let ns = session("192.168.10.1/24");
        let changeset = ns.create_reverse_zone("192.168.0.0/16").expect("reverse");
        assert!(changeset.writes.iter().all(|w| !w.contents.contains("PTR")));
    }

    #[test]
    fn forward_records_before_forward_zone_carry_notice() {
        let mut ns = session("192.168.10.1/24");
        let request = RecordRequest::Cname {
            alias: "ftp".to_string(),
            target: "files".to_string(),
        };

        let before = ns.add_record(request.clone()).expect("cname");
        assert_eq!(before.writes[0].file, "example.local");
        assert!(matches!(
            before.notices.as_slice(),
            [Notice::ForwardZoneNotCreated { .. }]
        ));

        forward(&mut ns);
        let after = ns.add_record(request).expect("cname");
        assert!(after.notices.is_empty());
    }

    #[test]
    fn a_record_strips_mask_and_warns_without_prefix() {
        let mut ns = session("192.168.10.1/24");
        forward(&mut ns);
        let changeset = ns
            .add_record(RecordRequest::A {
                hostname: "mail".to_string(),
                address: "192.168.10.25".to_string(),
            })
            .expect("a record");
        assert_eq!(changeset.writes[0].contents, "mail\tIN\tA\t192.168.10.25\n");
        assert!(matches!(
            changeset.notices.as_slice(),
            [Notice::Address { .. }]
        ));
    }

    #[test]
    fn existing_zone_can_be_adopted_for_ptr_records() {
        let mut ns = session("192.168.10.1/24");
        let identity = ns
            .register_existing_reverse_zone("10.1.0.0/16")
            .expect("adopt");
        assert_eq!(identity.zone_file_id, "db.10.1");

        ns.add_record(ptr("db", "10.1.2.3/16")).expect("ptr now allowed");
        assert!(matches!(
            ns.create_reverse_zone("10.1.9.9/16"),
            Err(SessionError::DuplicateZone { .. })
        ));
    }
}
