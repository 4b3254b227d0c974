use std::path::PathBuf;

use clap::{Parser, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "bind-gen")]
#[command(about = "Generate BIND9 master config, forward and reverse zone files")]
pub struct Cli {
    /// Settings TOML file. Defaults to the embedded settings.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    /// Enable debug diagnostics on stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(clap::Subcommand, Debug)]
pub enum Command {
    /// Numbered menu for building a configuration step by step (default).
    Interactive(InteractiveArgs),
    /// Show the zone names derived from one address.
    Resolve(ResolveArgs),
    /// Write the forward zone and reverse zones in one run.
    Generate(GenerateArgs),
}

#[derive(Parser, Debug, Default)]
pub struct InteractiveArgs {
    /// Directory generated files are written to.
    #[arg(long)]
    pub output_dir: Option<PathBuf>,
    /// Reverse zone written by an earlier run, given as any address inside
    /// it. PTR records may be appended to it. Repeatable.
    #[arg(long = "existing-reverse", value_name = "CIDR")]
    pub existing_reverse: Vec<String>,
}

#[derive(Parser, Debug)]
pub struct ResolveArgs {
    /// Address in CIDR notation, e.g. 192.168.10.1/24.
    pub address: String,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Parser, Debug)]
pub struct GenerateArgs {
    /// Nameserver FQDN, e.g. ns.example.local.
    #[arg(long)]
    pub fqdn: String,
    /// Nameserver address in CIDR notation.
    #[arg(long)]
    pub address: String,
    /// Additional reverse zone, given as any address inside it. Repeatable.
    #[arg(long)]
    pub reverse: Vec<String>,
    /// Reverse zone written by an earlier run, given as any address inside
    /// it. PTR records may be appended to it. Repeatable.
    #[arg(long = "existing-reverse", value_name = "CIDR")]
    pub existing_reverse: Vec<String>,
    /// Directory generated files are written to.
    #[arg(long)]
    pub output_dir: Option<PathBuf>,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
