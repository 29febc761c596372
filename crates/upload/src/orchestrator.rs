//! Transfer upload orchestrator.
//!
//! Coordinates one multi-file transfer end to end: pre-flight size
//! validation, sequential file checksums, registration, the flat
//! cross-file chunk task list driven through the bounded queue, and
//! finalization. Progress events are pushed on an mpsc channel.

use std::num::{NonZeroU32, NonZeroUsize};
use std::sync::Mutex;

use tokio::sync::mpsc;
use tracing::{debug, info};

use droplink_protocol::limits;
use droplink_protocol::messages::{FileRequest, StartTransferRequest, TransferResponse};
use droplink_transfer::{ChunkPlan, checksum_file_with_progress, run_limited};

use crate::api::TransferApi;
use crate::chunk_task::upload_chunk_with_retry;
use crate::error::UploadError;
use crate::events::UploadEvent;
use crate::source::LocalFile;

/// Tunables for one transfer upload.
#[derive(Debug, Clone)]
pub struct UploadConfig {
    /// Bytes per chunk.
    pub chunk_size: u64,
    /// Worker-pool width, global across all files of the transfer.
    pub max_concurrent_uploads: NonZeroUsize,
    /// Attempts per chunk before the transfer fails.
    pub chunk_upload_retries: NonZeroU32,
    /// Client-side per-file size limit.
    pub max_file_size: u64,
    /// Client-side aggregate size limit.
    pub max_total_size: u64,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            chunk_size: limits::DEFAULT_CHUNK_SIZE,
            max_concurrent_uploads: NonZeroUsize::new(limits::DEFAULT_MAX_CONCURRENT_UPLOADS)
                .expect("default concurrency is non-zero"),
            chunk_upload_retries: NonZeroU32::new(limits::DEFAULT_CHUNK_UPLOAD_RETRIES)
                .expect("default retry budget is non-zero"),
            max_file_size: limits::MAX_FILE_SIZE_BYTES,
            max_total_size: limits::MAX_TOTAL_SIZE_BYTES,
        }
    }
}

/// Drives whole multi-file transfers; see the crate docs for the
/// pipeline stages.
pub struct UploadOrchestrator {
    config: UploadConfig,
    events_tx: mpsc::Sender<UploadEvent>,
    // Held until taken or until the first upload; an unobserved
    // receiver must not back-pressure the pipeline.
    events_rx: Mutex<Option<mpsc::Receiver<UploadEvent>>>,
}

impl Default for UploadOrchestrator {
    fn default() -> Self {
        Self::new(UploadConfig::default())
    }
}

impl UploadOrchestrator {
    pub fn new(config: UploadConfig) -> Self {
        let (events_tx, events_rx) = mpsc::channel(256);
        Self {
            config,
            events_tx,
            events_rx: Mutex::new(Some(events_rx)),
        }
    }

    /// Takes the event receiver. Can only be called once, and before
    /// `upload`; callers that want progress must drain it while
    /// `upload` runs. If never taken, events are discarded.
    pub fn take_events(&self) -> Option<mpsc::Receiver<UploadEvent>> {
        self.events_rx.lock().unwrap().take()
    }

    /// Uploads `files` as one transfer and returns the sealed summary
    /// (including the shared link).
    ///
    /// Finalization runs only after every chunk of every file has been
    /// acknowledged; any earlier failure propagates without sealing,
    /// and a failed seal is reported as [`UploadError::Finalize`].
    pub async fn upload(
        &self,
        api: &dyn TransferApi,
        files: &[LocalFile],
    ) -> Result<TransferResponse, UploadError> {
        // Close the channel if nobody is listening, so event sends
        // become no-ops instead of filling the buffer and blocking.
        drop(self.events_rx.lock().unwrap().take());

        self.validate(files)?;

        let checksums = self.checksum_files(files).await?;

        let request = self.build_registration(files, &checksums)?;
        let registered = api
            .start_transfer(request)
            .await
            .map_err(UploadError::Registration)?;
        info!(
            transfer_id = registered.id,
            files = registered.files.len(),
            "transfer registered"
        );

        // One flat task list interleaving chunks across all files; the
        // server-assigned ids and chunk counts are authoritative.
        let mut tasks = Vec::new();
        for remote in &registered.files {
            let local = files
                .iter()
                .find(|f| f.name() == remote.file_name)
                .ok_or_else(|| UploadError::UnknownRemoteFile(remote.file_name.clone()))?;
            let plan = ChunkPlan::new(remote.file_size, self.config.chunk_size)?;
            for chunk_index in 1..=remote.total_chunks {
                tasks.push(upload_chunk_with_retry(
                    api,
                    local,
                    remote,
                    plan,
                    chunk_index,
                    self.config.chunk_upload_retries,
                    &self.events_tx,
                ));
            }
        }

        let _ = self
            .events_tx
            .send(UploadEvent::Status(format!(
                "Starting parallel upload of {} chunks with max {} concurrent uploads",
                tasks.len(),
                self.config.max_concurrent_uploads
            )))
            .await;

        let outcomes = run_limited(tasks, self.config.max_concurrent_uploads).await?;
        let uploaded: u64 = outcomes.iter().map(|o| o.size).sum();
        debug!(
            chunks = outcomes.len(),
            bytes = uploaded,
            "all chunks acknowledged"
        );

        let sealed = api
            .finish_transfer(registered.id)
            .await
            .map_err(UploadError::Finalize)?;
        let _ = self
            .events_tx
            .send(UploadEvent::TransferFinalized {
                transfer_id: sealed.id,
            })
            .await;
        info!(transfer_id = sealed.id, "transfer finalized");
        Ok(sealed)
    }

    /// Client-side pre-flight checks; nothing touches the network if
    /// these fail.
    fn validate(&self, files: &[LocalFile]) -> Result<(), UploadError> {
        if files.is_empty() {
            return Err(UploadError::NoFiles);
        }
        let mut total: u64 = 0;
        for file in files {
            if file.size() > self.config.max_file_size {
                return Err(UploadError::FileTooLarge {
                    name: file.name().to_string(),
                    size: file.size(),
                    limit: self.config.max_file_size,
                });
            }
            total += file.size();
        }
        if total > self.config.max_total_size {
            return Err(UploadError::TotalTooLarge {
                size: total,
                limit: self.config.max_total_size,
            });
        }
        Ok(())
    }

    /// Computes file checksums one at a time, in submission order, so
    /// progress messages stay coherent.
    async fn checksum_files(&self, files: &[LocalFile]) -> Result<Vec<String>, UploadError> {
        let mut checksums = Vec::with_capacity(files.len());
        for (file_index, file) in files.iter().enumerate() {
            let _ = self
                .events_tx
                .send(UploadEvent::Status(format!(
                    "Computing checksum for {}",
                    file.name()
                )))
                .await;

            let events = self.events_tx.clone();
            let file = file.clone();
            let checksum = tokio::task::spawn_blocking(move || {
                checksum_file_with_progress(file.path(), |fraction| {
                    let _ = events.try_send(UploadEvent::ChecksumProgress {
                        file_index,
                        file_name: file.name().to_string(),
                        fraction,
                    });
                })
            })
            .await
            .map_err(std::io::Error::other)??;
            checksums.push(checksum);
        }
        Ok(checksums)
    }

    fn build_registration(
        &self,
        files: &[LocalFile],
        checksums: &[String],
    ) -> Result<StartTransferRequest, UploadError> {
        let file_requests = files
            .iter()
            .zip(checksums)
            .map(|(file, checksum)| {
                let plan = ChunkPlan::new(file.size(), self.config.chunk_size)?;
                Ok(FileRequest {
                    file_name: file.name().to_string(),
                    file_type: file.mime_type().to_string(),
                    file_size: file.size(),
                    file_checksum: checksum.clone(),
                    chunk_size: self.config.chunk_size,
                    total_chunks: plan.total_chunks(),
                })
            })
            .collect::<Result<Vec<_>, UploadError>>()?;

        Ok(StartTransferRequest {
            start_time: chrono::Local::now().naive_local(),
            files: file_requests,
        })
    }
}
