//! BIND9 configuration generation for a single domain.
//!
//! Given a nameserver identity (`ns.example.local` at `192.168.10.1/24`) this
//! library produces the text of:
//!
//! - `named.conf.local` master zone stanzas (always appended),
//! - the forward zone file named after the domain,
//! - one `db.<network octets>` reverse zone file per /8, /16 or /24 network,
//!
//! and the individual A, PTR, CNAME, TXT and MX lines added to them later.
//!
//! # Architecture
//!
//! - [`address`] — CIDR validation restricted to /8, /16 and /24
//! - [`zone_id`] — address to zone file id, reverse zone name and PTR label
//! - [`session`] — the [`session::NameServer`] aggregate and its reverse zone
//!   registry
//! - [`records`] — record lines, zone skeletons and config stanzas
//! - [`changeset`] — file writes produced by session operations and their
//!   application to an output directory
//! - [`serial`] — `YYMMDD` + random suffix serial numbers
//! - [`config`] — TOML settings
//! - [`platform`] — host defaults for BIND and output directories
//! - [`interactive`] — the numbered operator menu
//! - [`report`] — terminal rendering
//!
//! # Examples
//!
//! ```no_run
//! use bind_gen::changeset::apply;
//! use bind_gen::config::Settings;
//! use bind_gen::session::{NameServer, RecordRequest};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut ns = NameServer::initialize("ns.example.local", "192.168.10.1/24", &Settings::embedded())?
//!     .session;
//! let dir = ns.output_path().to_path_buf();
//!
//! // Writes land first; the session records a zone only once they have.
//! for changeset in [ns.create_forward_zone()?, ns.create_reverse_zone("192.168.10.0/24")?] {
//!     apply(&changeset, &dir)?;
//!     ns.commit(&changeset);
//! }
//! apply(
//!     &ns.add_record(RecordRequest::Ptr {
//!         hostname: "www".into(),
//!         address: "192.168.10.20/24".into(),
//!     })?,
//!     &dir,
//! )?;
//! # Ok(())
//! # }
//! ```

pub mod address;
pub mod changeset;
pub mod config;
pub mod interactive;
pub mod platform;
pub mod records;
pub mod report;
pub mod serial;
pub mod session;
pub mod zone_id;
