use std::io;
use std::path::Path;

use anyhow::Result;
use bind_gen::config::{load_settings, Settings};
use bind_gen::interactive::Menu;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod generate_cmd;
mod resolve_cmd;

use cli::{Cli, Command, InteractiveArgs};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let settings = resolve_settings(cli.config.as_deref());

    match cli.command.unwrap_or(Command::Interactive(InteractiveArgs::default())) {
        Command::Interactive(args) => run_interactive(args, settings),
        Command::Resolve(args) => resolve_cmd::run_resolve(args),
        Command::Generate(args) => generate_cmd::run_generate(args, settings),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "bind_gen=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn resolve_settings(path: Option<&Path>) -> Settings {
    let Some(path) = path else {
        return Settings::embedded();
    };
    match load_settings(path) {
        Ok(settings) => settings,
        Err(err) => {
            eprintln!("warning: {err}; using embedded defaults");
            Settings::embedded()
        }
    }
}

fn run_interactive(args: InteractiveArgs, mut settings: Settings) -> Result<()> {
    if let Some(dir) = args.output_dir {
        settings.paths.output_dir = Some(dir);
    }
    let stdin = io::stdin();
    let mut menu = Menu::new(stdin.lock(), io::stdout(), settings)
        .with_existing_reverse_zones(args.existing_reverse);
    menu.run()?;
    Ok(())
}
