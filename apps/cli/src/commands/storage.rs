//! Storage usage report.

use anyhow::Result;
use droplink_client::ApiClient;
use droplink_protocol::types::Role;
use droplink_upload::format_size;

pub async fn run(api: &ApiClient) -> Result<()> {
    let used = api.user_storage_usage().await?;
    println!("Your usage: {}", format_size(used));

    // Service-wide numbers are admin-only.
    if api.session().role() == Some(Role::Admin) {
        let info = api.storage_info().await?;
        println!(
            "Service:    {} of {} used",
            format_size(info.used_space),
            format_size(info.total_space)
        );
    }
    Ok(())
}
