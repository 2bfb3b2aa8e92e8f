use clap::Args;
use maas_app::api_keys::MetadataStore;

use crate::cli::storage::StorageArgs;

#[derive(Debug, Args)]
pub(crate) struct ListKeysArgs {
    #[command(flatten)]
    storage: StorageArgs,

    /// Owner of the keys
    #[arg(long)]
    username: String,

    /// Tier namespace the keys were issued in
    #[arg(long)]
    namespace: String,
}

pub(crate) async fn run(args: ListKeysArgs) -> Result<(), String> {
    let store = args.storage.open().await?;

    let keys = store
        .list(&args.namespace, &args.username)
        .await
        .map_err(|error| format!("failed to list api keys: {error}"))?;

    store.close().await;

    if keys.is_empty() {
        println!(
            "no api keys found for {} in {}",
            args.username, args.namespace
        );
        return Ok(());
    }

    for key in keys {
        println!("id: {}", key.id);
        println!("name: {}", key.name);
        println!(
            "description: {}",
            key.description.as_deref().unwrap_or("none")
        );
        println!("created: {}", key.creation_date);
        println!(
            "expires: {}",
            key.expiration_date
                .map_or_else(|| "unknown".to_string(), |value| value.to_string())
        );
        println!("status: {}", key.status());
        println!();
    }

    Ok(())
}
