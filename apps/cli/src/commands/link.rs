//! Shared-link management.

use anyhow::Result;
use droplink_client::ApiClient;
use droplink_protocol::types::SharedLinkPatch;

use super::LinkCommand;

pub async fn run(api: &ApiClient, command: LinkCommand) -> Result<()> {
    match command {
        LinkCommand::Update(args) => {
            let patch = SharedLinkPatch {
                expires_at: args.expires_at,
                max_downloads: args.max_downloads,
            };
            api.update_shared_link(args.id, &patch).await?;
            println!("Link {} updated", args.id);
        }
        LinkCommand::Delete(args) => {
            api.delete_shared_link(args.id).await?;
            println!("Link {} disabled", args.id);
        }
    }
    Ok(())
}
