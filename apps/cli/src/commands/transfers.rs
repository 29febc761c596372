//! Transfer listing, inspection and deletion.

use anyhow::Result;
use droplink_client::ApiClient;
use droplink_protocol::messages::TransferResponse;
use droplink_upload::format_size;

pub async fn list(api: &ApiClient) -> Result<()> {
    let transfers = api.list_transfers().await?;
    if transfers.is_empty() {
        println!("No transfers");
        return Ok(());
    }
    println!(
        "{:>6}  {:<19}  {:>10}  {:>5}  {}",
        "ID", "STARTED", "SIZE", "FILES", "LINK"
    );
    for transfer in &transfers {
        println!(
            "{:>6}  {:<19}  {:>10}  {:>5}  {}",
            transfer.id,
            transfer.start_time.format("%Y-%m-%d %H:%M:%S"),
            format_size(transfer.total_size),
            transfer.files.len(),
            transfer
                .shared_link
                .as_ref()
                .map(|link| link.url.as_str())
                .unwrap_or("-"),
        );
    }
    Ok(())
}

pub async fn info(api: &ApiClient, id: i64) -> Result<()> {
    let transfer = api.get_transfer(id).await?;
    print_transfer(&transfer);
    Ok(())
}

pub async fn view(api: &ApiClient, uuid: &str) -> Result<()> {
    let transfer = api.get_transfer_by_link(uuid).await?;
    print_transfer(&transfer);
    Ok(())
}

pub async fn delete(api: &ApiClient, id: i64) -> Result<()> {
    api.delete_transfer(id).await?;
    println!("Transfer {id} deleted");
    Ok(())
}

fn print_transfer(transfer: &TransferResponse) {
    println!("Transfer {}", transfer.id);
    println!("  Started:  {}", transfer.start_time);
    match &transfer.end_time {
        Some(end) => println!("  Finished: {end}"),
        None => println!("  Finished: (in progress)"),
    }
    println!("  Size:     {}", format_size(transfer.total_size));
    if let Some(link) = &transfer.shared_link {
        println!("  Link:     {}", link.url);
        println!(
            "  Downloads: {} / {}",
            link.downloads,
            link.max_downloads
                .map(|n| n.to_string())
                .unwrap_or_else(|| "unlimited".into())
        );
        if let Some(expires) = link.expires_at {
            println!("  Expires:  {expires}");
        }
    }
    println!("  Files:");
    for file in &transfer.files {
        println!(
            "    {:>6}  {:<30}  {:>10}  {}",
            file.id,
            file.file_name,
            format_size(file.file_size),
            file.file_type,
        );
    }
}
