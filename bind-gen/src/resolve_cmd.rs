use anyhow::{Context, Result};
use bind_gen::address::validate;
use bind_gen::report::{render_resolution, warning, Resolution};

use crate::cli::{OutputFormat, ResolveArgs};

pub fn run_resolve(args: ResolveArgs) -> Result<()> {
    let validated =
        validate(&args.address).with_context(|| format!("cannot resolve {}", args.address))?;
    if let Some(w) = validated.warning {
        eprintln!("{}", warning(w));
    }

    let resolution = Resolution::of(&validated.address);
    match args.format {
        OutputFormat::Text => println!("{}", render_resolution(&resolution)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&resolution)?),
    }
    Ok(())
}
