use clap::Args;
use maas_app::api_keys::MetadataStore;

use crate::cli::storage::StorageArgs;

/// Marks metadata expired only. Issued credentials stay valid until their
/// service account is recreated.
#[derive(Debug, Args)]
pub(crate) struct InvalidateKeysArgs {
    #[command(flatten)]
    storage: StorageArgs,

    /// Owner of the keys
    #[arg(long)]
    username: String,

    /// Tier namespace the keys were issued in
    #[arg(long)]
    namespace: String,
}

pub(crate) async fn run(args: InvalidateKeysArgs) -> Result<(), String> {
    let store = args.storage.open().await?;

    let expired = store
        .invalidate_all(&args.namespace, &args.username)
        .await
        .map_err(|error| format!("failed to invalidate api keys: {error}"))?;

    store.close().await;

    println!(
        "expired {expired} api key(s) for {} in {}",
        args.username, args.namespace
    );

    Ok(())
}
