use anyhow::{bail, Context, Result};
use bind_gen::changeset::{apply, Changeset};
use bind_gen::config::Settings;
use bind_gen::report::{render_generate_text, success, warning, GenerateReport};
use bind_gen::session::NameServer;
use bind_gen::zone_id::ReverseZoneIdentity;

use crate::cli::{GenerateArgs, OutputFormat};

/// Initialize a session, then write the forward zone, the nameserver's own
/// reverse zone and every `--reverse` zone.
///
/// Every step is composed against a scratch copy of the session first, so a
/// duplicate or invalid zone aborts the run before anything is written.
pub fn run_generate(args: GenerateArgs, mut settings: Settings) -> Result<()> {
    if let Some(dir) = &args.output_dir {
        if !dir.is_dir() {
            bail!("output directory {} does not exist", dir.display());
        }
        settings.paths.output_dir = Some(dir.clone());
    }

    let init = NameServer::initialize(&args.fqdn, &args.address, &settings)
        .with_context(|| format!("failed to initialize nameserver {}", args.fqdn))?;
    if let Some(w) = init.warning {
        eprintln!("{}", warning(w));
    }
    let mut ns = init.session;
    for zone in &args.existing_reverse {
        let identity = ns
            .register_existing_reverse_zone(zone)
            .with_context(|| format!("failed to adopt existing reverse zone {zone}"))?;
        eprintln!(
            "{}",
            success(&format!(
                "Adopted existing reverse lookup zone {}",
                identity.zone_name
            ))
        );
    }
    let dir = ns.output_path().to_path_buf();

    let mut plan = ns.clone();
    let mut steps = Vec::new();
    let forward = plan.create_forward_zone()?;
    plan.commit(&forward);
    steps.push(forward);

    let own = plan.ns_address().to_string();
    if !plan.has_reverse_zone(&ReverseZoneIdentity::of(plan.ns_address())) {
        let reverse = plan
            .create_reverse_zone(&own)
            .with_context(|| format!("failed to create reverse zone for {own}"))?;
        plan.commit(&reverse);
        steps.push(reverse);
    }
    for zone in &args.reverse {
        let reverse = plan
            .create_reverse_zone(zone)
            .with_context(|| format!("failed to create reverse zone for {zone}"))?;
        plan.commit(&reverse);
        steps.push(reverse);
    }

    let mut all = Changeset::default();
    let mut files = Vec::new();
    for changeset in steps {
        files.extend(
            apply(&changeset, &dir)
                .with_context(|| format!("failed to write zone files under {}", dir.display()))?,
        );
        ns.commit(&changeset);
        all.extend(changeset);
    }

    let report = GenerateReport {
        domain: ns.domain_name().to_string(),
        nameserver: format!("{}.{}", ns.ns_hostname(), ns.domain_name()),
        serial: ns.serial().to_string(),
        output_dir: dir,
        reverse_zones: ns.reverse_zones().cloned().collect(),
        files,
        notices: all.notices,
    };

    match args.format {
        OutputFormat::Text => println!("{}", render_generate_text(&report)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }
    Ok(())
}
