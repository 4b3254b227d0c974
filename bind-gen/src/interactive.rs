//! Numbered menu driving a [`NameServer`] session from a terminal.
//!
//! Every failure aborts only the command that raised it; the menu is then
//! shown again. Only option 9 or end of input ends the loop.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use thiserror::Error;

use crate::changeset::{apply, ApplyError, Changeset};
use crate::config::Settings;
use crate::report;
use crate::session::{NameServer, OutputPathChange, RecordRequest, SessionError};
use crate::zone_id::ReverseZoneIdentity;

pub const MENU_OPTIONS: [(u8, &str); 10] = [
    (0, "Initialize the nameserver session (writes no files)"),
    (1, "Set output path (default: home directory)"),
    (2, "Create forward zone (and the nameserver's reverse zone)"),
    (3, "Create an additional reverse zone"),
    (4, "Add A record"),
    (5, "Add PTR record"),
    (6, "Add TXT record"),
    (7, "Add CNAME record"),
    (8, "Add MX record"),
    (9, "Exit"),
];

#[derive(Debug, Error)]
enum MenuError {
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Apply(#[from] ApplyError),
    #[error("no nameserver session yet; choose option 0 first")]
    NotInitialized,
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("end of input")]
    EndOfInput,
}

enum Flow {
    Continue,
    Exit,
}

/// Interactive menu over arbitrary input and output streams.
pub struct Menu<R, W> {
    input: R,
    output: W,
    settings: Settings,
    existing_reverse_zones: Vec<String>,
    session: Option<NameServer>,
}

impl<R: BufRead, W: Write> Menu<R, W> {
    pub fn new(input: R, output: W, settings: Settings) -> Self {
        Self {
            input,
            output,
            settings,
            existing_reverse_zones: Vec::new(),
            session: None,
        }
    }

    /// Reverse zones already on disk from an earlier run. They are adopted
    /// every time option 0 initializes a session, so PTR records can be
    /// appended to them.
    pub fn with_existing_reverse_zones(mut self, cidrs: Vec<String>) -> Self {
        self.existing_reverse_zones = cidrs;
        self
    }

    /// The current session, if option 0 has succeeded.
    pub fn session(&self) -> Option<&NameServer> {
        self.session.as_ref()
    }

    /// Run until the operator exits or input ends.
    pub fn run(&mut self) -> io::Result<()> {
        loop {
            self.print_menu()?;
            let choice = match self.prompt("Enter your choice") {
                Ok(choice) => choice,
                Err(MenuError::Io(err)) => return Err(err),
                Err(_) => return self.farewell(),
            };

            let Ok(option) = choice.trim().parse::<u8>() else {
                writeln!(self.output, "{}", report::warning("please enter a number from the menu"))?;
                continue;
            };

            match self.dispatch(option) {
                Ok(Flow::Continue) => {}
                Ok(Flow::Exit) | Err(MenuError::EndOfInput) => return self.farewell(),
                Err(MenuError::Io(err)) => return Err(err),
                Err(err) => writeln!(self.output, "{}", report::failure(&err))?,
            }
        }
    }

    fn print_menu(&mut self) -> io::Result<()> {
        writeln!(self.output)?;
        for (key, label) in MENU_OPTIONS {
            writeln!(self.output, "{key} -- {label}")?;
        }
        Ok(())
    }

    fn farewell(&mut self) -> io::Result<()> {
        writeln!(self.output, "Bye")?;
        self.output.flush()
    }

    fn dispatch(&mut self, option: u8) -> Result<Flow, MenuError> {
        match option {
            0 => self.initialize()?,
            1 => self.set_output_path()?,
            2 => self.forward_zone()?,
            3 => self.reverse_zone()?,
            4 => self.a_record()?,
            5 => self.ptr_record()?,
            6 => self.txt_record()?,
            7 => self.cname_record()?,
            8 => self.mx_record()?,
            9 => return Ok(Flow::Exit),
            _ => writeln!(self.output, "{}", report::warning("choose an option from the menu or exit"))?,
        }
        Ok(Flow::Continue)
    }

    fn initialize(&mut self) -> Result<(), MenuError> {
        let fqdn = self.prompt("FQDN of the nameserver (e.g. ns.example.local)")?;
        let address = self.prompt("Address of the nameserver (e.g. 192.168.1.1/24)")?;
        let init = NameServer::initialize(&fqdn, &address, &self.settings)?;
        if let Some(warning) = init.warning {
            writeln!(self.output, "{}", report::warning(warning))?;
        }
        writeln!(
            self.output,
            "{}",
            report::success(&format!("Initialized for editing {}", fqdn.trim()))
        )?;
        let mut session = init.session;
        for cidr in &self.existing_reverse_zones {
            match session.register_existing_reverse_zone(cidr) {
                Ok(identity) => writeln!(
                    self.output,
                    "{}",
                    report::success(&format!(
                        "Adopted existing reverse lookup zone {} ({})",
                        identity.zone_name, identity.zone_file_id
                    ))
                )?,
                Err(err) => writeln!(self.output, "{}", report::failure(&err))?,
            }
        }
        self.session = Some(session);
        Ok(())
    }

    fn set_output_path(&mut self) -> Result<(), MenuError> {
        self.active()?;
        let path = self.prompt("Directory to save all config files to (blank keeps current)")?;
        let change = self.active_mut()?.set_output_path(&path)?;
        let line = match change {
            OutputPathChange::Unchanged(current) => {
                format!("Output path left at {}", current.display())
            }
            OutputPathChange::Changed(new) => format!("Output path set to {}", new.display()),
        };
        writeln!(self.output, "{}", report::success(&line))?;
        Ok(())
    }

    fn forward_zone(&mut self) -> Result<(), MenuError> {
        let forward = self.active()?.create_forward_zone()?;
        self.commit(forward)?;

        let session = self.active()?;
        let own = ReverseZoneIdentity::of(session.ns_address());
        if session.has_reverse_zone(&own) {
            let line = format!("Reverse lookup zone {} already exists; left as is", own.zone_name);
            writeln!(self.output, "{}", report::warning(line))?;
            return Ok(());
        }
        let reverse = session.create_reverse_zone(&session.ns_address().to_string())?;
        self.commit(reverse)
    }

    fn reverse_zone(&mut self) -> Result<(), MenuError> {
        self.active()?;
        let address = self.prompt("An address in the new zone (e.g. 10.20.20.0/24)")?;
        let changeset = self.active()?.create_reverse_zone(&address)?;
        self.commit(changeset)
    }

    fn a_record(&mut self) -> Result<(), MenuError> {
        self.active()?;
        let hostname = self.prompt("Hostname (for www.example.local enter www)")?;
        let address = self.prompt("Host address (e.g. 10.20.20.20/24)")?;
        let with_ptr = self.confirm("Add a matching PTR record?")?;

        let mut changeset = Changeset::default();
        if with_ptr {
            changeset.extend(self.active()?.add_record(RecordRequest::Ptr {
                hostname: hostname.clone(),
                address: address.clone(),
            })?);
        }
        changeset.extend(
            self.active()?
                .add_record(RecordRequest::A { hostname, address })?,
        );
        self.commit(changeset)
    }

    fn ptr_record(&mut self) -> Result<(), MenuError> {
        self.active()?;
        let hostname = self.prompt("Hostname (for www.example.local enter www)")?;
        let address = self.prompt("Host address (e.g. 10.20.20.20/24)")?;
        let changeset = self
            .active()?
            .add_record(RecordRequest::Ptr { hostname, address })?;
        self.commit(changeset)
    }

    fn txt_record(&mut self) -> Result<(), MenuError> {
        self.active()?;
        let name = self.prompt("TXT record name (e.g. _example)")?;
        let contents = self.prompt("TXT record contents")?;
        let changeset = self
            .active()?
            .add_record(RecordRequest::Txt { name, contents })?;
        self.commit(changeset)
    }

    fn cname_record(&mut self) -> Result<(), MenuError> {
        self.active()?;
        let alias = self.prompt("Alias host (for ftp -> files enter ftp)")?;
        let target = self.prompt("Host being aliased (for ftp -> files enter files)")?;
        let changeset = self
            .active()?
            .add_record(RecordRequest::Cname { alias, target })?;
        self.commit(changeset)
    }

    fn mx_record(&mut self) -> Result<(), MenuError> {
        self.active()?;
        let hostname = self.prompt("Mail server hostname (for mail.example.local enter mail)")?;
        let preference = self.prompt("Preference number (blank = 10)")?;
        let ttl = self.prompt("TTL (blank = zone default)")?;

        let mut changeset = Changeset::default();
        if self.confirm("Add an A record for the mail server?")? {
            let address = self.prompt("Mail server address (e.g. 10.20.20.20/24)")?;
            changeset.extend(self.active()?.add_record(RecordRequest::A {
                hostname: hostname.clone(),
                address,
            })?);
        }
        changeset.extend(self.active()?.add_record(RecordRequest::Mx {
            hostname,
            preference,
            ttl,
        })?);
        self.commit(changeset)
    }

    /// Show notices, write the changeset and report each write. The session
    /// only records the changeset once every write has landed.
    fn commit(&mut self, changeset: Changeset) -> Result<(), MenuError> {
        for line in report::render_notices(&changeset.notices) {
            writeln!(self.output, "{line}")?;
        }
        let dir: PathBuf = self.active()?.output_path().to_path_buf();
        apply(&changeset, &dir)?;
        self.active_mut()?.commit(&changeset);
        for line in report::render_applied(&changeset) {
            writeln!(self.output, "{line}")?;
        }
        Ok(())
    }

    fn active(&self) -> Result<&NameServer, MenuError> {
        self.session.as_ref().ok_or(MenuError::NotInitialized)
    }

    fn active_mut(&mut self) -> Result<&mut NameServer, MenuError> {
        self.session.as_mut().ok_or(MenuError::NotInitialized)
    }

    fn prompt(&mut self, question: &str) -> Result<String, MenuError> {
        write!(self.output, "{question}\n> ")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(MenuError::EndOfInput);
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    /// Yes/no question defaulting to yes.
    fn confirm(&mut self, question: &str) -> Result<bool, MenuError> {
        let answer = self.prompt(&format!("{question} Y/n"))?;
        Ok(matches!(
            answer.trim().to_ascii_lowercase().as_str(),
            "" | "y" | "yes"
        ))
    }
}
