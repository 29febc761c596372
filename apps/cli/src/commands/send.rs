//! Upload files as one transfer, rendering progress bars.

use anyhow::{Context, Result};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use tokio::sync::mpsc;

use droplink_client::ApiClient;
use droplink_upload::{LocalFile, UploadConfig, UploadEvent, UploadOrchestrator, format_size};

use super::SendArgs;

pub async fn run(api: &ApiClient, args: SendArgs) -> Result<()> {
    let files = args
        .paths
        .iter()
        .map(|path| {
            LocalFile::from_path(path.clone())
                .with_context(|| format!("opening {}", path.display()))
        })
        .collect::<Result<Vec<_>>>()?;
    let total_bytes: u64 = files.iter().map(LocalFile::size).sum();

    let config = UploadConfig {
        chunk_size: args.chunk_size,
        max_concurrent_uploads: args.concurrency,
        chunk_upload_retries: args.retries,
        ..UploadConfig::default()
    };
    let orchestrator = UploadOrchestrator::new(config);
    let events = orchestrator
        .take_events()
        .context("event receiver already taken")?;
    let renderer = tokio::spawn(render_progress(events, total_bytes));

    let outcome = orchestrator.upload(api, &files).await;
    drop(orchestrator); // closes the event channel so the renderer stops
    renderer.await?;

    let sealed = outcome?;
    println!();
    println!(
        "Transfer {} complete ({} in {} file(s))",
        sealed.id,
        format_size(sealed.total_size),
        sealed.files.len()
    );
    if let Some(link) = sealed.shared_link {
        println!("Shared link: {}", link.url);
    }
    Ok(())
}

fn bar_style() -> ProgressStyle {
    ProgressStyle::with_template(
        "{spinner:.green} {msg} [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec}, {eta})",
    )
    .unwrap_or_else(|_| ProgressStyle::default_bar())
    .progress_chars("#>-")
}

/// Drains upload events into one overall progress bar until the
/// orchestrator drops its sender.
async fn render_progress(mut events: mpsc::Receiver<UploadEvent>, total_bytes: u64) {
    let mp = MultiProgress::new();
    let bar = mp.add(ProgressBar::new(total_bytes));
    bar.set_style(bar_style());
    bar.set_message("Preparing");

    while let Some(event) = events.recv().await {
        match event {
            UploadEvent::Status(message) => {
                let _ = mp.println(message);
            }
            UploadEvent::ChecksumProgress {
                file_name,
                fraction,
                ..
            } => {
                bar.set_message(format!("Hashing {file_name} ({:.0}%)", fraction * 100.0));
            }
            UploadEvent::ChunkStarted {
                file_name,
                chunk_index,
                total_chunks,
                ..
            } => {
                bar.set_message(format!("{file_name} chunk {chunk_index}/{total_chunks}"));
            }
            UploadEvent::ChunkProgress { bytes } => {
                bar.inc(bytes);
            }
            UploadEvent::ChunkCompleted { .. } => {}
            UploadEvent::TransferFinalized { transfer_id } => {
                bar.finish_with_message(format!("Transfer {transfer_id} sealed"));
            }
        }
    }
    if !bar.is_finished() {
        bar.abandon_with_message("Upload did not finish");
    }
}
