use std::path::PathBuf;

use clap::Args;
use maas_app::tiers::{TierConfiguration, TierError, tier_namespace};

/// Resolve groups against a tier document without touching the cluster.
#[derive(Debug, Args)]
pub(crate) struct LookupArgs {
    /// YAML tier list, as stored under the `tiers` key
    #[arg(long)]
    file: PathBuf,

    /// Instance name used for namespaces and service account groups
    #[arg(long, env = "INSTANCE_NAME")]
    tenant: String,

    /// Caller group; repeat for several
    #[arg(long = "group")]
    groups: Vec<String>,
}

pub(crate) fn run(args: &LookupArgs) -> Result<(), String> {
    let document = std::fs::read_to_string(&args.file)
        .map_err(|error| format!("failed to read {}: {error}", args.file.display()))?;

    for line in describe(&document, &args.tenant, &args.groups)? {
        println!("{line}");
    }

    Ok(())
}

fn describe(document: &str, tenant: &str, groups: &[String]) -> Result<Vec<String>, String> {
    let configuration =
        TierConfiguration::parse(document, tenant).map_err(|error| error.to_string())?;

    if groups.is_empty() {
        return Err(TierError::NoGroups.to_string());
    }

    let tier = configuration
        .resolve(groups)
        .map_err(|error| error.to_string())?;

    Ok(vec![
        format!("configuration ok: {} tier(s)", configuration.tiers().len()),
        format!("tier: {}", tier.name),
        format!("display_name: {}", tier.display_name()),
        format!("level: {}", tier.level),
        format!("namespace: {}", tier_namespace(tenant, &tier.name)),
    ])
}
